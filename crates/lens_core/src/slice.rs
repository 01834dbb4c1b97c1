use serde::Serialize;

use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchStatus {
    Idle,
    Pending,
    Success,
    Error,
}

/// State of one independently tracked backend call.
///
/// A slice moves `Idle -> Pending -> Ready | Failed` and is reset to `Idle`
/// or `Pending` when its owner starts a new fetch cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum FetchSlice<T> {
    Idle,
    Pending,
    Ready(T),
    Failed(String),
}

impl<T> Default for FetchSlice<T> {
    fn default() -> Self {
        FetchSlice::Idle
    }
}

impl<T> FetchSlice<T> {
    pub fn status(&self) -> FetchStatus {
        match self {
            FetchSlice::Idle => FetchStatus::Idle,
            FetchSlice::Pending => FetchStatus::Pending,
            FetchSlice::Ready(_) => FetchStatus::Success,
            FetchSlice::Failed(_) => FetchStatus::Error,
        }
    }

    pub fn start(&mut self) {
        *self = FetchSlice::Pending;
    }

    pub fn reset(&mut self) {
        *self = FetchSlice::Idle;
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        *self = FetchSlice::Failed(message.into());
    }

    /// Applies a settled call. Failures are logged and kept as their message.
    pub fn settle(&mut self, outcome: Result<T>) {
        *self = match outcome {
            Ok(value) => FetchSlice::Ready(value),
            Err(e) => {
                tracing::warn!("fetch failed: {}", e);
                FetchSlice::Failed(e.to_string())
            }
        };
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, FetchSlice::Pending)
    }

    pub fn is_settled(&self) -> bool {
        matches!(self, FetchSlice::Ready(_) | FetchSlice::Failed(_))
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            FetchSlice::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            FetchSlice::Failed(message) => Some(message),
            _ => None,
        }
    }
}

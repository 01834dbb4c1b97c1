use std::future::Future;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// View state stamped with the fetch cycle that last reset it.
pub(crate) trait Generational {
    fn generation(&self) -> u64;
}

/// Applies `update` only if the view still belongs to `generation`.
///
/// The check runs under the channel's write lock, so a result from a
/// superseded cycle can never land after the reset of its successor.
pub(crate) fn apply<S, F>(state: &watch::Sender<S>, generation: u64, update: F) -> bool
where
    S: Generational,
    F: FnOnce(&mut S),
{
    state.send_if_modified(|view| {
        if view.generation() != generation {
            tracing::debug!(
                generation,
                current = view.generation(),
                "discarding result from superseded fetch cycle"
            );
            return false;
        }
        update(view);
        true
    })
}

struct Running {
    token: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

/// Tracks the fetch cycle currently feeding a controller's state.
#[derive(Default)]
pub(crate) struct Cycles {
    generation: u64,
    current: Option<Running>,
}

impl Cycles {
    /// Cancels the running cycle and hands out the next generation.
    pub(crate) fn begin(&mut self) -> (u64, CancellationToken) {
        self.cancel();
        self.generation += 1;
        let token = CancellationToken::new();
        self.current = Some(Running {
            token: token.clone(),
            handle: None,
        });
        (self.generation, token)
    }

    /// Spawns `work` as the body of the cycle begun with `token`.
    pub(crate) fn spawn<F>(&mut self, token: CancellationToken, work: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => tracing::debug!("fetch cycle cancelled"),
                _ = work => {}
            }
        });
        if let Some(running) = self.current.as_mut() {
            running.handle = Some(handle);
        }
    }

    /// Cancels the running cycle without starting another; results still in
    /// flight are discarded.
    pub(crate) fn invalidate(&mut self) -> u64 {
        self.cancel();
        self.generation += 1;
        self.generation
    }

    pub(crate) fn cancel(&mut self) {
        if let Some(running) = self.current.take() {
            running.token.cancel();
        }
    }

    /// Waits for the current cycle's task, if any, to finish.
    pub(crate) async fn settled(&mut self) {
        let Some(handle) = self.current.as_mut().and_then(|r| r.handle.take()) else {
            return;
        };
        if let Err(e) = handle.await {
            tracing::error!("fetch cycle task failed: {}", e);
        }
    }
}

impl Drop for Cycles {
    fn drop(&mut self) {
        self.cancel();
    }
}

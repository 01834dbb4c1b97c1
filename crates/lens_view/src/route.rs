use lens_core::{Error, Result};
use url::{form_urlencoded, Url};

const ARTICLE_PATH: &str = "/article";
const FACT_CHECK_PATH: &str = "/fact-check";
const URL_PARAM: &str = "url";

/// A page and the article URL carried in its `url` query parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Article { url: Option<String> },
    FactCheck { url: Option<String> },
}

impl Route {
    /// Parses `/article?url=...`, `/fact-check?url=...` or an absolute URL
    /// with one of those paths. An empty `url` parameter reads as absent.
    pub fn parse(target: &str) -> Result<Self> {
        let parsed = match Url::parse(target) {
            Ok(url) => url,
            Err(_) => Url::parse("http://lens.local/")
                .and_then(|base| base.join(target))
                .map_err(|e| Error::InvalidUrl(format!("{target}: {e}")))?,
        };

        let url = parsed
            .query_pairs()
            .find(|(key, _)| key == URL_PARAM)
            .map(|(_, value)| value.into_owned())
            .filter(|value| !value.is_empty());

        match parsed.path().trim_end_matches('/') {
            ARTICLE_PATH => Ok(Route::Article { url }),
            FACT_CHECK_PATH => Ok(Route::FactCheck { url }),
            other => Err(Error::InvalidUrl(format!("no page at {other:?}"))),
        }
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            Route::Article { url } | Route::FactCheck { url } => url.as_deref(),
        }
    }

    pub fn href(&self) -> String {
        let path = match self {
            Route::Article { .. } => ARTICLE_PATH,
            Route::FactCheck { .. } => FACT_CHECK_PATH,
        };
        match self.url() {
            Some(url) => format!("{path}?{}", encode_param(url)),
            None => path.to_string(),
        }
    }
}

/// Link from an article page to the fact-check page for the same article.
pub fn fact_check_href(article_url: &str) -> String {
    Route::FactCheck {
        url: Some(article_url.to_string()),
    }
    .href()
}

fn encode_param(value: &str) -> String {
    form_urlencoded::Serializer::new(String::new())
        .append_pair(URL_PARAM, value)
        .finish()
}

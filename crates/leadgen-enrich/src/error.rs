use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("response from {url} is not HTML (content-type \"{content_type}\")")]
    NotHtml { url: String, content_type: String },
}

/// Why a business's website was not fetched.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UrlRejection {
    #[error("website is not a parseable absolute URL")]
    Unparseable,

    #[error("scheme \"{0}\" is not allowed")]
    UnsupportedScheme(String),

    #[error("website has no host")]
    MissingHost,

    #[error("host \"{0}\" points at the local machine")]
    LoopbackHost(String),
}

//! Error types for VCS adapters.

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum VcsError {
    #[error("Invalid URL: {url}")]
    #[diagnostic(code(petrel_vcs::invalid_url))]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Network request failed: {0}")]
    #[diagnostic(
        code(petrel_vcs::network),
        help("Check your internet connection or try again later")
    )]
    Network(#[from] Box<ureq::Error>),

    #[error("HTTP {status}: {url}")]
    #[diagnostic(code(petrel_vcs::http_error))]
    HttpError { status: u16, url: String },

    #[error("I/O error: {0}")]
    #[diagnostic(code(petrel_vcs::io))]
    Io(#[from] std::io::Error),

    #[error("Invalid response from the {0} API")]
    #[diagnostic(code(petrel_vcs::invalid_response))]
    InvalidResponse(&'static str),

    #[error("Invalid commit date: {0}")]
    #[diagnostic(code(petrel_vcs::invalid_date))]
    InvalidDate(String),
}

/// A specialized Result type for VCS operations.
pub type Result<T> = std::result::Result<T, VcsError>;

impl From<ureq::Error> for VcsError {
    fn from(e: ureq::Error) -> Self {
        Self::Network(Box::new(e))
    }
}

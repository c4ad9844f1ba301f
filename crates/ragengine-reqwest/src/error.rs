//! Internal error types for ragengine-reqwest.

use thiserror::Error;

/// Result type alias for ragengine-reqwest operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Internal error type for ragengine-reqwest operations.
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Reqwest(#[from] reqwest::Error),
    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    /// The endpoint answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
    /// The endpoint answered with a payload of the wrong shape.
    #[error("{0}")]
    UnexpectedResponse(String),
    /// The configured endpoint is not a valid URL.
    #[error("invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

impl From<Error> for ragengine_core::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Reqwest(e) => {
                if e.is_timeout() {
                    ragengine_core::Error::new(ragengine_core::ErrorKind::Timeout)
                        .with_message(e.to_string())
                        .with_source(e)
                } else if e.is_connect() {
                    ragengine_core::Error::upstream("Connection failed").with_source(e)
                } else {
                    ragengine_core::Error::upstream(e.to_string()).with_source(e)
                }
            }
            Error::Serde(e) => {
                ragengine_core::Error::malformed_response(e.to_string()).with_source(e)
            }
            Error::Status { status, body } => {
                ragengine_core::Error::upstream(format!("HTTP {status}: {body}"))
            }
            Error::UnexpectedResponse(message) => ragengine_core::Error::upstream(message),
            err @ Error::InvalidUrl { .. } => ragengine_core::Error::configuration(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use ragengine_core::ErrorKind;

    use super::*;

    #[test]
    fn status_maps_to_upstream() {
        let error: ragengine_core::Error = Error::Status {
            status: 502,
            body: "bad gateway".to_owned(),
        }
        .into();
        assert_eq!(error.kind, ErrorKind::Upstream);
        assert_eq!(error.to_string(), "upstream: HTTP 502: bad gateway");
    }

    #[test]
    fn invalid_url_maps_to_configuration() {
        let source = url::Url::parse("not a url").err();
        let Some(source) = source else {
            panic!("url should not parse");
        };
        let error: ragengine_core::Error = Error::InvalidUrl {
            url: "not a url".to_owned(),
            source,
        }
        .into();
        assert_eq!(error.kind, ErrorKind::Configuration);
    }
}

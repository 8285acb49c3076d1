//! Passio client error types.

use std::path::PathBuf;

use crate::domain::SystemId;

use super::transport::Endpoint;

/// Failure to obtain a response body.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Connection failure, timeout, or a client-side request error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status
    #[error("API returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// A configured header value cannot be sent
    #[error("invalid {header} header: {value:?}")]
    InvalidHeader { header: &'static str, value: String },

    /// The fixture transport has no body for this request
    #[error("no fixture for {endpoint}{}", system.map(|s| format!(" (system {s})")).unwrap_or_default())]
    MissingFixture {
        endpoint: Endpoint,
        system: Option<SystemId>,
    },

    /// A fixture file could not be read
    #[error("failed to read fixture {}: {source}", path.display())]
    FixtureIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A decoded payload whose collection is neither a list nor a keyed mapping.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("expected `{collection}` to be a list or keyed mapping, found {found}")]
pub struct ShapeError {
    pub collection: &'static str,
    pub found: &'static str,
}

/// Errors surfaced by [`super::PassioClient`].
#[derive(Debug, thiserror::Error)]
pub enum PassioError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Response body was not JSON
    #[error("JSON parse error: {message}{}", body.as_ref().map(|b| format!(" (body: {b})")).unwrap_or_default())]
    Json {
        message: String,
        body: Option<String>,
    },

    #[error(transparent)]
    Shape(#[from] ShapeError),

    /// The API reported an error in its response envelope
    #[error("upstream error: {0}")]
    Upstream(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = PassioError::Upstream("bad system".into());
        assert_eq!(err.to_string(), "upstream error: bad system");

        let err = PassioError::from(TransportError::Status {
            status: 503,
            body: "Service Unavailable".into(),
        });
        assert_eq!(err.to_string(), "API returned status 503: Service Unavailable");

        let err = PassioError::Json {
            message: "expected value".into(),
            body: Some("<html>".into()),
        };
        assert!(err.to_string().contains("JSON parse error"));
        assert!(err.to_string().contains("<html>"));

        let err = PassioError::from(ShapeError {
            collection: "buses",
            found: "string",
        });
        assert_eq!(
            err.to_string(),
            "expected `buses` to be a list or keyed mapping, found string"
        );
    }

    #[test]
    fn missing_fixture_display() {
        let err = TransportError::MissingFixture {
            endpoint: Endpoint::Vehicles,
            system: Some(SystemId::new(1270)),
        };
        assert_eq!(err.to_string(), "no fixture for vehicles (system 1270)");

        let err = TransportError::MissingFixture {
            endpoint: Endpoint::Systems,
            system: None,
        };
        assert_eq!(err.to_string(), "no fixture for systems");
    }

    #[test]
    fn invalid_header_display() {
        let err = TransportError::InvalidHeader {
            header: "User-Agent",
            value: "bad\nagent".into(),
        };
        assert_eq!(err.to_string(), r#"invalid User-Agent header: "bad\nagent""#);
    }
}

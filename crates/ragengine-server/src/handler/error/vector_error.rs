//! Vector store error to HTTP error conversion.

use ragengine_vector::VectorError;

use super::http_error::{Error as HttpError, ErrorKind};

/// Tracing target for vector store error conversions.
const TRACING_TARGET: &str = "ragengine_server::handler::vector";

impl From<VectorError> for HttpError<'static> {
    fn from(error: VectorError) -> Self {
        let detail = error.to_string();

        match &error {
            // Unknown indexes answer 500, matching existing clients.
            VectorError::IndexNotFound(_) => {
                tracing::warn!(target: TRACING_TARGET, error = %error, "Index not found");
                ErrorKind::InternalServerError
                    .with_message(detail)
                    .with_resource("index")
            }
            VectorError::DocumentNotFound { .. } => {
                tracing::debug!(target: TRACING_TARGET, error = %error, "Document not found");
                ErrorKind::NotFound
                    .with_message(detail)
                    .with_resource("document")
            }
            VectorError::Unsupported { .. } => {
                tracing::debug!(
                    target: TRACING_TARGET,
                    error = %error,
                    "Operation unsupported by backend"
                );
                ErrorKind::NotImplemented.with_message(detail)
            }
            VectorError::InvalidIndexName { .. } => {
                tracing::warn!(target: TRACING_TARGET, error = %error, "Invalid index name");
                ErrorKind::BadRequest
                    .with_message(detail)
                    .with_resource("index")
            }
            VectorError::InvalidArgument(_) => {
                tracing::warn!(target: TRACING_TARGET, error = %error, "Invalid argument");
                ErrorKind::BadRequest.with_message(detail)
            }
            VectorError::Provider(provider) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %error,
                    error_kind = %provider.kind,
                    "Provider call failed"
                );
                ErrorKind::InternalServerError.with_message(detail)
            }
            _ => {
                tracing::error!(target: TRACING_TARGET, error = %error, "Vector store failure");
                ErrorKind::InternalServerError.with_message(detail)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use ragengine_core::DocumentId;

    use super::*;

    #[test]
    fn index_not_found_is_internal_with_fixed_detail() {
        let error = HttpError::from(VectorError::index_not_found("missing"));
        assert_eq!(error.kind(), ErrorKind::InternalServerError);
        assert_eq!(error.message(), Some("No such index: 'missing' exists."));
    }

    #[test]
    fn status_mapping() {
        let cases = [
            (
                VectorError::document_not_found("a", DocumentId::from_raw("b")),
                StatusCode::NOT_FOUND,
            ),
            (
                VectorError::unsupported("delete_document", "qdrant"),
                StatusCode::NOT_IMPLEMENTED,
            ),
            (
                VectorError::InvalidArgument("top_k must be positive".into()),
                StatusCode::BAD_REQUEST,
            ),
            (
                VectorError::Provider(ragengine_core::Error::upstream("HTTP 503")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, status) in cases {
            assert_eq!(HttpError::from(error).kind().status_code(), status);
        }
    }
}

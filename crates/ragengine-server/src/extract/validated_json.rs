//! JSON extractor that runs `validator` rules after deserialization.

use std::borrow::Cow;
use std::collections::HashMap;

use axum::extract::{FromRequest, Request};
use derive_more::{Deref, DerefMut, From};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use super::Json;
use crate::handler::{Error, ErrorKind};

/// Deserializes a JSON body and validates it, rejecting with `400`.
#[must_use]
#[derive(Debug, Clone, Copy, Default, Deref, DerefMut, From)]
pub struct ValidateJson<T>(pub T);

impl<T> ValidateJson<T> {
    /// Returns the inner validated value.
    #[inline]
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T, S> FromRequest<S> for ValidateJson<T>
where
    T: DeserializeOwned + Validate + 'static,
    S: Send + Sync,
{
    type Rejection = Error<'static>;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = <Json<T> as FromRequest<S>>::from_request(req, state).await?;
        data.validate()?;
        Ok(Self(data))
    }
}

fn extract_number(value: &serde_json::Value) -> Option<f64> {
    value.as_f64()
}

fn format_bounds(
    field: &str,
    params: &HashMap<Cow<'static, str>, serde_json::Value>,
    noun: &str,
) -> String {
    let min = params.get("min").and_then(extract_number);
    let max = params.get("max").and_then(extract_number);
    match (min, max) {
        (Some(min), Some(max)) => format!("Field '{field}' must be between {min} and {max}{noun}"),
        (Some(min), None) => format!("Field '{field}' must be at least {min}{noun}"),
        (None, Some(max)) => format!("Field '{field}' must be at most {max}{noun}"),
        (None, None) => format!("Field '{field}' is invalid"),
    }
}

fn format_validation_error(field: &str, error: &validator::ValidationError) -> String {
    if let Some(message) = &error.message {
        return format!("Field '{field}': {message}");
    }

    match &*error.code {
        "length" => format_bounds(field, &error.params, " characters long"),
        "range" => format_bounds(field, &error.params, ""),
        "required" => format!("Field '{field}' is required"),
        code => format!("Field '{field}' failed validation: {code}"),
    }
}

fn collect_messages(prefix: &str, errors: &ValidationErrors, messages: &mut Vec<String>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };

        match kind {
            validator::ValidationErrorsKind::Field(field_errors) => messages.extend(
                field_errors
                    .iter()
                    .map(|error| format_validation_error(&path, error)),
            ),
            validator::ValidationErrorsKind::Struct(nested) => {
                collect_messages(&path, nested, messages);
            }
            validator::ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    collect_messages(&format!("{path}[{index}]"), nested, messages);
                }
            }
        }
    }
}

impl From<ValidationErrors> for Error<'static> {
    fn from(errors: ValidationErrors) -> Self {
        let mut messages = Vec::new();
        collect_messages("", &errors, &mut messages);
        messages.sort();

        let message = match messages.as_slice() {
            [] => "Validation failed".to_owned(),
            [single] => single.clone(),
            multiple => multiple.join(". "),
        };

        tracing::warn!(
            target: crate::handler::TRACING_TARGET_VALIDATION,
            errors = %message,
            "Request validation failed"
        );

        ErrorKind::BadRequest
            .with_message(message)
            .with_resource("request")
    }
}

#[cfg(test)]
mod tests {
    use validator::Validate;

    use super::*;

    #[derive(Debug, Validate)]
    struct Inner {
        #[validate(length(min = 1))]
        text: String,
    }

    #[derive(Debug, Validate)]
    struct Outer {
        #[validate(range(min = 1))]
        top_k: usize,
        #[validate(nested)]
        items: Vec<Inner>,
    }

    #[test]
    fn nested_errors_name_their_path() {
        let value = Outer {
            top_k: 0,
            items: vec![Inner {
                text: String::new(),
            }],
        };
        let Err(errors) = value.validate() else {
            panic!("validation should fail");
        };

        let error = Error::from(errors);
        assert_eq!(error.kind(), ErrorKind::BadRequest);
        let message = error.message().unwrap_or_default();
        assert!(message.contains("Field 'top_k' must be at least 1"), "{message}");
        assert!(message.contains("Field 'items[0].text'"), "{message}");
    }
}

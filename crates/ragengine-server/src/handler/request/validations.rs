//! Request validation utilities.

use validator::ValidationError;

pub fn validation_error(code: &'static str, message: &str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.to_string().into());
    error
}

/// Accepts names usable as a single storage directory component.
pub fn is_index_name(name: &str) -> Result<(), ValidationError> {
    ragengine_vector::validate_index_name(name).map_err(|error| {
        validation_error("index_name", &error.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_names() {
        assert!(is_index_name("test_index").is_ok());
        assert!(is_index_name("v1.2-docs").is_ok());
        assert!(is_index_name("..").is_err());
        assert!(is_index_name("a/b").is_err());
        assert!(is_index_name("").is_err());
    }
}

//! Request extractors with [`Error`](crate::handler::Error) rejections.

mod json;
mod path;
mod validated_json;

pub use json::Json;
pub use path::Path;
pub use validated_json::ValidateJson;

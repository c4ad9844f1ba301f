//! Response types for HTTP handlers.

mod documents;
mod error_response;
mod monitors;
mod query;

pub use documents::*;
pub use error_response::ErrorResponse;
pub use monitors::*;
pub use query::*;

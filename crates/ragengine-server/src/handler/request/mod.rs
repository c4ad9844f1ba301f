//! Request types for HTTP handlers.

mod documents;
mod paths;
mod query;
mod validations;

pub use documents::*;
pub use paths::*;
pub use query::*;
pub use validations::*;

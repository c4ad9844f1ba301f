//! [`Error`], [`ErrorKind`] and [`Result`].

mod http_error;
mod vector_error;

pub use http_error::{Error, ErrorKind, Result};

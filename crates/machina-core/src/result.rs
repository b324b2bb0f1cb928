//! Result type alias for DAO operations.

use crate::DaoError;

/// A specialized `Result` type for DAO operations.
pub type DaoResult<T> = Result<T, DaoError>;

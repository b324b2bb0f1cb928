//! # Machina Core
//!
//! Generic Data Access Object contracts for arbitrary entity types keyed by
//! a serializable identifier.
//!
//! ```text
//! Consumer (service / business logic)
//!   ↓  &dyn Dao<T>  (ReadableDao<T> + WriteableDao<T>)
//! Adapter          (in-memory, ORM-backed, …)
//!   ↓
//! Backing store
//! ```
//!
//! Besides the traits this crate holds the [`SortCriterion`] value type,
//! property-path access used for sorting and query by example, pagination
//! helpers and the shared [`DaoError`].

pub mod entity;
pub mod error;
pub mod example;
pub mod pagination;
pub mod property;
pub mod result;
pub mod sort;
pub mod telemetry;
pub mod traits;
pub mod validation;

pub use entity::*;
pub use error::*;
pub use example::*;
pub use pagination::*;
pub use result::*;
pub use sort::*;
pub use telemetry::{init_tracing, LoggingConfig};
pub use traits::*;
pub use validation::*;

//! DAO (Data Access Object) adapters.
//!
//! The contracts live in `machina_core` ([`ReadableDao`], [`WriteableDao`],
//! [`Dao`]); this module holds implementations of them.
//!
//! ```text
//! Service → Arc<dyn Dao<T>> → adapter (in-memory, ...) → storage
//! ```
//!
//! [`ReadableDao`]: machina_core::ReadableDao
//! [`WriteableDao`]: machina_core::WriteableDao
//! [`Dao`]: machina_core::Dao

pub mod r#impl;

pub use r#impl::InMemoryDao;

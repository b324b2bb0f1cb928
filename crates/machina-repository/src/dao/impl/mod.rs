//! DAO implementations, organized by storage technology.

pub mod memory;

pub use memory::InMemoryDao;

//! # Machina Repository
//!
//! Adapters for the DAO contracts defined in `machina_core`:
//!
//! ```text
//! Service
//!   ↓  Arc<dyn Dao<T>>          (contract)
//! ValidatingDao<D>              (optional decorator: validator rules)
//!   ↓
//! InMemoryDao<T>                (reference adapter)
//!   ↓
//! BTreeMap<T::Key, T> + PersistenceContext<T>
//! ```
//!
//! ## Structure
//!
//! ```text
//! src/
//!   context.rs         ← PersistenceContext (managed instances)
//!   keys.rs            ← KeyGenerator, sequence and UUID generators
//!   validating.rs      ← ValidatingDao decorator
//!   conformance.rs     ← contract checks reusable by any adapter
//!   dao/
//!     impl/
//!       memory.rs      ← InMemoryDao
//! ```

pub mod conformance;
pub mod context;
pub mod dao;
pub mod keys;
pub mod validating;

pub use context::PersistenceContext;
pub use dao::InMemoryDao;
pub use keys::*;
pub use validating::ValidatingDao;

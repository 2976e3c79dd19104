//! entrance-core: student records, the entrance exam engine, and ranking.
//!
//! This crate owns the persisted student model, the fixed-width record
//! store, input validation, the timed exam, and the merit list that the
//! report and CLI crates build on.

pub mod codec;
pub mod config;
pub mod error;
pub mod exam;
pub mod file_store;
pub mod model;
pub mod questions;
pub mod ranking;
pub mod records;
pub mod session;
pub mod statistics;
pub mod store;
pub mod validate;

pub use error::{EntranceError, Result, ValidationError};
pub use file_store::FileStore;
pub use model::{NewStudent, Student, StudentChanges};
pub use session::{Role, Session};
pub use store::{MemoryStore, RecordPos, RecordStore};

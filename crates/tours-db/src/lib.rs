mod collection;
mod compare;
mod error;
mod eval;
mod projection;
pub mod seed;
mod sort;

pub use collection::{MemoryCollection, MemoryQuery};
pub use error::DbError;

//! Record storage.
//!
//! - **traits**: the `RecordStore` interface used by the vault service
//! - **types**: `RecordId` and `Record`
//! - **memory**: process-lifetime `HashMap` store

pub mod memory;
pub mod traits;
pub mod types;

pub use memory::MemoryStore;
pub use traits::RecordStore;
pub use types::{Record, RecordId};

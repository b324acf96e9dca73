//! Record store abstraction and its implementations.

mod base;
pub mod memory;
pub mod mysql;

pub use base::{HandleStore, HandleTransaction, StoreError, StoreResult, URL_HANDLE_TYPE};
pub use self::memory::MemoryHandleStore;
pub use self::mysql::MySqlHandleStore;

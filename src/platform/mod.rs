//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Input events (held-key state and bindings)
//! - Storage (LocalStorage on web, in-memory elsewhere)

pub mod input;
pub mod storage;

pub use input::{Action, InputSource, KeyBindings, KeyState};
pub use storage::{KeyValueStore, MemoryStore, StorageError, UnavailableStore};

#[cfg(target_arch = "wasm32")]
pub use storage::LocalStorage;

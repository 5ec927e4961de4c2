//! SentinelGRC snapshot persistence
//!
//! Every store's state is kept as one named entry that is overwritten on
//! each mutation and read back on startup. Entries are JSON [`Envelope`]s
//! carrying a Blake3 [`Checksum`] of their payload, so a hand-edited or
//! truncated entry is rejected instead of silently loaded.
//!
//! Backends:
//! - [`FileBackend`]: `<state_dir>/<key>.json`, written via temp file + rename
//! - [`MemoryBackend`]: in-process map

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod backend;
pub mod checksum;
pub mod envelope;
pub mod error;
pub mod key;
pub mod repository;

pub use backend::{FileBackend, MemoryBackend, SnapshotBackend};
pub use checksum::Checksum;
pub use envelope::Envelope;
pub use error::{PersistError, Result};
pub use key::SnapshotKey;
pub use repository::Repository;

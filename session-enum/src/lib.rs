//! Enumerate SMB sessions on Windows hosts through `NetSessionEnum`.
//!
//! [`SessionEnumerator`] makes one unbounded call per host, decodes the
//! returned `SESSION_INFO_*` array for the requested [`SessionLevel`] and
//! releases the netapi32 buffer when the sequence is dropped.

pub mod api;
pub mod batch;
pub mod buffer;
pub mod config;
pub mod enumerator;
pub mod error;
pub mod level;
pub mod logging;
pub mod output;
pub mod record;
pub mod run;
pub mod wide;

pub use api::{EnumResponse, NetApi, PlatformApi};
pub use batch::{BatchReport, BatchSummary, HostOutcome, HostSession};
pub use enumerator::{SessionEnumerator, Sessions};
pub use error::NativeCallError;
pub use level::SessionLevel;
pub use record::SessionRecord;

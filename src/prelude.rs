//! Commonly used types for ease of import.

pub use crate::{int_hash, key_eq, string_hash, Dictionary, Sequence, Stack};

pub use crate::{HistoryBook, MoveLog, Outcome};

#[cfg(feature = "std")]
pub use crate::{init_logging, Console};

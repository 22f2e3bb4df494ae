#![cfg_attr(not(feature = "std"), no_std)]

//! Containers behind the Battleship console: a doubly linked [`Sequence`]
//! with cursors, a separately chained [`Dictionary`] whose buckets are
//! sequences, and a singly linked [`Stack`]. The [`history`] module builds
//! the match log on top of them.

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

mod common;
mod config;
#[cfg(feature = "std")]
pub mod console;
pub mod dictionary;
pub mod hash;
pub mod history;
#[cfg(feature = "std")]
mod logging;
pub mod prelude;
pub mod sequence;
pub mod stack;

pub use common::*;
pub use config::*;
#[cfg(feature = "std")]
pub use console::{Command, CommandError, Console, Flow};
pub use dictionary::{Dictionary, Pair};
pub use hash::{int_hash, key_eq, same_ref, string_hash, EqualFn, HashFn};
pub use history::{HistoryBook, HistoryError, MatchRecord, MoveLog, Outcome, Shot};
#[cfg(feature = "std")]
pub use logging::{format_record, init_logging, level_from};
pub use sequence::{Cursor, CursorMut, NodeId, Sequence};
pub use stack::Stack;

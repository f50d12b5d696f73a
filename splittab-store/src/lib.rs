#![warn(clippy::uninlined_format_args)]

pub mod memory;
pub mod notify;

pub use memory::{InMemoryLedger, LedgerError};
pub use notify::ChangeNotifier;

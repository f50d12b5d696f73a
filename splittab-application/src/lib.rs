#![warn(clippy::uninlined_format_args)]

pub mod error;
pub mod model;
pub mod ports;
pub mod report;

pub use error::{EngineError, IntegrityError, NotFound};
pub use model::{BalanceReport, MemberBalance};
pub use ports::{SnapshotFetchError, SnapshotSource, StaleListener};
pub use report::BalanceReporter;

pub mod cli;
pub mod command;
pub mod entry;
pub mod error;
pub mod report;
pub mod session;
pub mod tree;

pub use entry::{Entry, MAX_KEY_LEN};
pub use error::{Error, Result};
pub use report::{Report, ReportFormat};
pub use session::{Session, Settings};
pub use tree::{Decrease, Lookup, OrderedTree};

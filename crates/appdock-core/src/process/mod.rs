pub mod errors;
pub mod monitor;
pub mod operations;
pub mod types;

pub use errors::ProcessError;
pub use monitor::ProcessMonitor;
pub use types::{Pid, ProcessInfo, ProcessMetadata, ProcessStatus};

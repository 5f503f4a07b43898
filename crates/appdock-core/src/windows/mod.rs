pub mod correlation;
pub mod errors;
pub mod manager;
pub mod provider;
pub mod types;

pub use correlation::{CorrelationCache, correlate};
pub use errors::WindowError;
pub use manager::WindowManager;
pub use provider::{SystemWindowProvider, WindowProvider};
pub use types::{WindowHandle, WindowInfo, WindowSnapshot};

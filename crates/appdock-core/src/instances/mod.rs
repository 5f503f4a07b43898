pub mod errors;
pub mod manager;
pub mod persistence;
pub mod types;

pub use errors::InstanceError;
pub use manager::InstanceManager;
pub use types::{ApplicationInstance, InstanceState, InstanceWindow};

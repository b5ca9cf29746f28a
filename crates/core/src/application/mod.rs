// Application Layer - Registry use cases

pub mod command;
pub mod registry;
pub mod tool;

// Re-exports
pub use command::AzCommand;
pub use registry::{RegistryService, TwinUpdate};
pub use tool::tool_version;

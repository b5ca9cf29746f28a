// Domain Layer - Registry records as the external tool reports them

pub mod connection_string;
pub mod device;
pub mod error;
pub mod timestamp;
pub mod tool;
pub mod twin;

// Re-exports
pub use connection_string::ConnectionString;
pub use device::{
    AuthenticationMechanism, AuthenticationType, ConnectionState, Device, DeviceCapabilities,
    DeviceId, DeviceStatus, SymmetricKey, X509Thumbprint,
};
pub use error::DomainError;
pub use tool::{ToolVersion, IOT_EXTENSION};
pub use twin::{Twin, TwinProperties};

pub mod agent;
pub mod config;
pub mod kernel;
pub mod payload;
pub mod render;
pub mod services;

// Re-export specific items if needed for convenient access
pub use kernel::context::RunContext;
pub use kernel::controller::{ControllerConfig, StageController};
pub use kernel::fallback::FallbackSupplier;
pub use kernel::stage::Stage;

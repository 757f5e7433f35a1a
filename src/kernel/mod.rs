pub mod context;
pub mod controller;
pub mod event;
pub mod fallback;
pub mod machine;
pub mod request;
pub mod stage;
pub mod state;
pub mod telemetry;

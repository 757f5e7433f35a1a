pub mod local;
pub mod rules;

pub use local::LocalAgent;

pub mod activity;
pub mod timestamp;
pub mod types;
pub mod update;

pub use activity::*;
pub use types::*;
pub use update::*;

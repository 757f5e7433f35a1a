pub mod backend;
pub mod events;
pub mod http;

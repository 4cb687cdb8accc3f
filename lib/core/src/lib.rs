pub mod config;
pub mod dom;
pub mod infinite_scroll;
pub mod rate_limit;
pub mod scheduler;
pub mod trigger;

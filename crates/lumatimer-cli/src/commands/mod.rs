pub mod config;
pub mod stats;
pub mod task;
pub mod theme;
pub mod timer;

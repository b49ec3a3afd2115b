pub mod config;
pub mod day;
pub mod task;
pub mod week;

pub use config::*;
pub use day::*;
pub use task::*;
pub use week::*;

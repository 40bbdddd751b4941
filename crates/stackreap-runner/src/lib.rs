pub mod config;
pub mod orchestrator;
pub mod report;
pub mod runner;
pub mod util;

pub use config::*;
pub use orchestrator::*;
pub use report::*;
pub use runner::*;
pub use util::*;

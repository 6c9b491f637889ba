pub mod cli;
pub mod logging;
pub mod report;
pub mod utils;

pub use cli::{Cli, run};

pub mod args;
pub mod commands;
pub mod root;
pub mod ui;

pub use args::{validate_analyze_args, AnalyzeArgs, Args, CliOverrides, Commands};
pub use root::RootCommand;

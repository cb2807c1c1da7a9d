pub mod analyze;
pub mod serve;

pub use analyze::run_analyze_command;
pub use serve::run_serve_command;

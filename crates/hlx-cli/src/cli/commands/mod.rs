//! CLI command handlers. Each command is in its own file.

mod extract;
mod serve;
mod sweep;

pub use extract::run_extract;
pub use serve::run_serve;
pub use sweep::run_sweep;

pub mod config;
pub mod logging;

pub mod artifact;
pub mod capture;
pub mod error;
pub mod extract;
pub mod rewrite;
pub mod server;

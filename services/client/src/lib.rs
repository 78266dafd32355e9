pub mod adapters;
pub mod config;
pub mod error;
pub mod render;
pub mod repl;

// Re-export the pieces the binary wires together.
pub use adapters::HttpBackendAdapter;
pub use config::Config;
pub use error::AppError;
pub use repl::Repl;

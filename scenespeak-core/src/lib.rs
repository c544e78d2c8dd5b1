pub mod config;
pub mod transcript;
pub mod types;

// Keep the public surface small and intentional.
pub use config::*;
pub use transcript::*;
pub use types::*;

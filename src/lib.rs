pub mod config;
pub mod error;
pub mod feature;
pub mod http;
pub mod logger;
pub mod tracker;
pub mod utils;

// Re-export commonly used types
pub use config::{ClientConfig, ConfigLoader};
pub use error::{MangoError, Result};
pub use tracker::{Mango, StoryState};

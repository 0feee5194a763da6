pub mod client;
pub mod state;

pub use client::Mango;
pub use state::StoryState;

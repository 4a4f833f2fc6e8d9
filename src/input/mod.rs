pub mod events;
pub mod handler;

// Re-export the essential types
pub use events::{InputEvent, LifecycleEvent, MapEvent};
pub use handler::InputHandler;

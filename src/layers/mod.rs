pub mod marker;
pub mod store;

pub use marker::{MarkerIcon, PinDescriptor};
pub use store::{MarkerStore, ToggleOutcome};

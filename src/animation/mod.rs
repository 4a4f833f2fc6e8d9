pub mod easing;

pub use easing::EasingType;

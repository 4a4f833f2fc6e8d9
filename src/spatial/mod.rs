pub mod proximity;

pub use proximity::{index_of, is_matched, ProximityMatcher, Tolerance};

// Pushwire - push notification clients for Rust
//
// Thin facade over the member crates; enable them with cargo features.

#[cfg(feature = "fcm")]
pub use pushwire_fcm as fcm;

// Prelude for common imports
pub mod prelude {
    #[cfg(feature = "fcm")]
    pub use pushwire_fcm::prelude::*;
}

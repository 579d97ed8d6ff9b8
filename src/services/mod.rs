//! Traits for external capabilities the engine consumes.

pub mod geocoder;

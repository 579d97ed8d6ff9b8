mod client;

pub use client::{parse_response, MapboxGeocoder, TOKEN_ENV};

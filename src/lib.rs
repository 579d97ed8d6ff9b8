pub mod analyzers;
pub mod config;
pub mod detection;
pub mod error;
pub mod facility;
pub mod fetch;
pub mod infra;
pub mod output;
pub mod parser;
pub mod roster;
pub mod scorecard;
pub mod services;
pub mod validate;

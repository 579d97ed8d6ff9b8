//! Scoring, risk, ranking and planning over a facility roster.
//!
//! Every analyzer is a pure function over borrowed facilities and the
//! relevant section of [`crate::config::EngineConfig`]. The report module
//! ties them together and handles persistence.

pub mod aggregate;
pub mod grade;
pub mod leaderboard;
pub mod report;
pub mod risk;
pub mod types;
pub mod utility;
pub mod waves;
pub mod writetos3;
pub mod yvs;

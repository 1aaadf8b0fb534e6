//! Candidate selection backend: reduces raw psychometric assessments to five
//! criteria per candidate and ranks them with VIKOR and ELECTRE.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;

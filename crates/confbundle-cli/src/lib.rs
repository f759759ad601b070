//! CLI library components for the conference bundle builder.

pub mod config;
pub mod logging;
pub mod pipeline;
pub mod types;

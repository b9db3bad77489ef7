//! Rental investment analysis: napkin-math cash flow and a trained buy/avoid
//! classifier applied to individual real-estate listings.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;

//! Health decision pipeline and the assessment service built around it.
//!
//! The [`pipeline`] module holds the pure decision stages (triage, diet signals, risk
//! scoring, trend analysis, recommendations, and the explanation/alert/projection
//! synthesizers). The [`assessment`] module wires those stages to storage traits and an
//! HTTP router.

pub mod assessment;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod telemetry;

//! Human-facing summaries derived from the score, trend, and recommendation bundle.

mod alerts;
mod explanation;
mod projections;

pub use alerts::{generate_alerts, AlertLevel, HealthAlert};
pub use explanation::{explain, Explanation, ExplanationDriver, Urgency};
pub use projections::{project_scores, ProjectedAction, ProjectionConfidence, ScoreProjection};

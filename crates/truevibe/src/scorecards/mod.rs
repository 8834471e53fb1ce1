//! Influencer scorecards: raw reviewer inputs, derived attribute scores, totals and fit tiers.
//!
//! Raw components are the only source of truth. Attribute scores, the total and the fit tier
//! are recomputed from them on every accepted write and stored alongside them, so any record
//! can be re-derived and checked at any time.

pub mod domain;
pub mod report;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;
pub mod suggest;
pub mod validation;

#[cfg(test)]
mod tests;

pub use domain::{
    Attribute, AttributeScore, AuditChange, AuditEntry, CampaignId, Completeness, ComponentInput,
    ComponentStore, EditorId, FitTier, InfluencerId, PairingId, TotalScore,
};
pub use report::{CampaignSummary, TierCount, TopPairing};
pub use repository::{
    InMemoryScorecardRepository, RepositoryError, ScorecardExportRow, ScorecardRecord,
    ScorecardRepository, ScorecardView,
};
pub use router::scorecard_router;
pub use scoring::{DerivedScores, ScoreExplanation, ScoringEngine};
pub use service::{ScorecardService, ScorecardServiceError};
pub use suggest::{QuantitativeMetrics, SuggestedRatings, Suggestion};
pub use validation::{InputGuard, ValidationError};

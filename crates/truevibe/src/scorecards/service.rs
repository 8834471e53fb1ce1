use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use super::domain::{
    Attribute, AuditChange, AuditEntry, CampaignId, ComponentInput, EditorId, PairingId,
};
use super::report::{summarize, CampaignSummary};
use super::repository::{
    RepositoryError, ScorecardExportRow, ScorecardRecord, ScorecardRepository,
};
use super::scoring::ScoringEngine;
use super::validation::{InputGuard, ValidationError};
use crate::config::ScorecardConfig;

/// Service composing the input guard, repository, and scoring engine.
///
/// Every write is validated, checked against the caller's expected version, recomputed,
/// audited and then committed as a single compare-and-swap.
pub struct ScorecardService<R> {
    guard: InputGuard,
    repository: Arc<R>,
    engine: ScoringEngine,
}

impl<R> ScorecardService<R>
where
    R: ScorecardRepository + 'static,
{
    pub fn new(repository: Arc<R>, config: ScorecardConfig) -> Self {
        Self {
            guard: InputGuard::from_config(&config),
            repository,
            engine: ScoringEngine::new(),
        }
    }

    pub fn engine(&self) -> &ScoringEngine {
        &self.engine
    }

    /// Ensure a scorecard exists for `pairing`, creating an empty one if needed.
    pub fn open(&self, pairing: PairingId) -> Result<ScorecardRecord, ScorecardServiceError> {
        let record = self
            .repository
            .insert_if_absent(ScorecardRecord::empty(pairing, Utc::now()))?;
        Ok(record)
    }

    /// Read the full record for dashboard rendering and export.
    pub fn get(&self, pairing: &PairingId) -> Result<ScorecardRecord, ScorecardServiceError> {
        self.repository
            .fetch(pairing)?
            .ok_or(ScorecardServiceError::NotFound(*pairing))
    }

    /// Replace one attribute's raw inputs and recompute everything derived from them.
    pub fn apply_component_edit(
        &self,
        pairing: PairingId,
        attribute: Attribute,
        editor: EditorId,
        input: ComponentInput,
        expected_version: u64,
    ) -> Result<ScorecardRecord, ScorecardServiceError> {
        self.guard.check_editor(&editor)?;
        self.guard.check_component(attribute, &input)?;

        self.write(pairing, Some(attribute), editor, expected_version, |record| {
            self.guard.check_transition(attribute, record.components.get(attribute), &input)?;
            let previous = record.components.replace(attribute, input);
            let (previous_score, next_score) = record.rescore(attribute);
            Ok(AuditChange::Component {
                attribute,
                previous,
                next: Some(input),
                previous_score,
                next_score,
            })
        })
    }

    /// Explicitly remove one attribute's raw inputs. The total drops back to undetermined.
    pub fn clear_component(
        &self,
        pairing: PairingId,
        attribute: Attribute,
        editor: EditorId,
        expected_version: u64,
    ) -> Result<ScorecardRecord, ScorecardServiceError> {
        self.guard.check_editor(&editor)?;

        self.write(pairing, Some(attribute), editor, expected_version, |record| {
            let previous = record.components.clear(attribute);
            let (previous_score, next_score) = record.rescore(attribute);
            Ok(AuditChange::Component {
                attribute,
                previous,
                next: None,
                previous_score,
                next_score,
            })
        })
    }

    /// Replace the reviewer's qualitative notes.
    pub fn update_notes(
        &self,
        pairing: PairingId,
        editor: EditorId,
        notes: &str,
        expected_version: u64,
    ) -> Result<ScorecardRecord, ScorecardServiceError> {
        self.guard.check_editor(&editor)?;
        let notes = self.guard.sanitize_notes(notes)?;

        self.write(pairing, None, editor, expected_version, |record| {
            let previous = std::mem::replace(&mut record.qualitative_notes, notes.clone());
            Ok(AuditChange::Notes {
                previous,
                next: notes,
            })
        })
    }

    /// Flattened rows for every scorecard in a campaign, ordered by influencer.
    pub fn campaign_export(
        &self,
        campaign_id: CampaignId,
    ) -> Result<Vec<ScorecardExportRow>, ScorecardServiceError> {
        let records = self.repository.list_campaign(campaign_id)?;
        Ok(records.iter().map(ScorecardRecord::export_row).collect())
    }

    pub fn campaign_summary(
        &self,
        campaign_id: CampaignId,
    ) -> Result<CampaignSummary, ScorecardServiceError> {
        let records = self.repository.list_campaign(campaign_id)?;
        Ok(summarize(campaign_id, &records))
    }

    /// Recompute the stored record from its components and report any divergence.
    pub fn verify(&self, pairing: &PairingId) -> Result<ScorecardRecord, ScorecardServiceError> {
        let record = self.get(pairing)?;
        let gaps = record.traceability_gaps(&self.engine);
        if gaps.is_empty() {
            Ok(record)
        } else {
            Err(ScorecardServiceError::Traceability {
                pairing: *pairing,
                detail: gaps.join("; "),
            })
        }
    }

    fn write<F>(
        &self,
        pairing: PairingId,
        attribute: Option<Attribute>,
        editor: EditorId,
        expected_version: u64,
        mutate: F,
    ) -> Result<ScorecardRecord, ScorecardServiceError>
    where
        F: FnOnce(&mut ScorecardRecord) -> Result<AuditChange, ScorecardServiceError>,
    {
        let now = Utc::now();
        let mut record = self
            .repository
            .fetch(&pairing)?
            .unwrap_or_else(|| ScorecardRecord::empty(pairing, now));

        if record.version != expected_version {
            return Err(self.conflict(pairing, attribute, expected_version, record.version));
        }

        let change = mutate(&mut record)?;
        record.version = expected_version + 1;
        record.updated_at = now;
        record.audit_log.push(AuditEntry {
            recorded_at: now,
            editor,
            version: record.version,
            change,
        });

        match self.repository.commit(record.clone(), expected_version) {
            Ok(()) => {
                info!(
                    %pairing,
                    attribute = attribute.map(Attribute::key).unwrap_or("notes"),
                    version = record.version,
                    fit_tier = record.fit_tier.label(),
                    "scorecard updated"
                );
                Ok(record)
            }
            Err(RepositoryError::VersionMismatch { expected, actual }) => {
                Err(self.conflict(pairing, attribute, expected, actual))
            }
            Err(err) => {
                warn!(%pairing, error = %err, "scorecard edit not persisted");
                Err(err.into())
            }
        }
    }

    fn conflict(
        &self,
        pairing: PairingId,
        attribute: Option<Attribute>,
        expected: u64,
        actual: u64,
    ) -> ScorecardServiceError {
        warn!(%pairing, expected, actual, "rejected stale scorecard edit");
        ScorecardServiceError::Conflict {
            pairing,
            attribute,
            expected,
            actual,
        }
    }
}

/// Error raised by the scorecard service.
#[derive(Debug, thiserror::Error)]
pub enum ScorecardServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("{pairing} changed since it was read (expected version {expected}, found {actual})")]
    Conflict {
        pairing: PairingId,
        attribute: Option<Attribute>,
        expected: u64,
        actual: u64,
    },
    #[error("no scorecard for {0}")]
    NotFound(PairingId),
    #[error("stored scores for {pairing} diverge from their components: {detail}")]
    Traceability { pairing: PairingId, detail: String },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

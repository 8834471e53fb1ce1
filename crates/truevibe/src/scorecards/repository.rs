use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{
    Attribute, AttributeScore, AuditEntry, CampaignId, Completeness, ComponentStore, FitTier,
    InfluencerId, PairingId, TotalScore,
};
use super::scoring::{
    classify, missing_attributes, score_attribute, total_score, DerivedScores, ScoringEngine,
};

/// Repository record holding raw components, derived scores, and the audit trail together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScorecardRecord {
    pub pairing: PairingId,
    pub components: ComponentStore,
    pub attribute_scores: BTreeMap<Attribute, AttributeScore>,
    pub total_score: Option<TotalScore>,
    pub fit_tier: FitTier,
    pub qualitative_notes: String,
    pub audit_log: Vec<AuditEntry>,
    pub version: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ScorecardRecord {
    pub fn empty(pairing: PairingId, now: DateTime<Utc>) -> Self {
        Self {
            pairing,
            components: ComponentStore::new(),
            attribute_scores: BTreeMap::new(),
            total_score: None,
            fit_tier: FitTier::Undetermined,
            qualitative_notes: String::new(),
            audit_log: Vec::new(),
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn completeness(&self) -> Completeness {
        if self.attribute_scores.len() == Attribute::ordered().len() {
            Completeness::Complete
        } else if self.components.is_empty() {
            Completeness::Empty
        } else {
            Completeness::Partial
        }
    }

    /// Re-derive `attribute` from its stored components, then the total and tier.
    ///
    /// Returns the attribute score before and after.
    pub(crate) fn rescore(
        &mut self,
        attribute: Attribute,
    ) -> (Option<AttributeScore>, Option<AttributeScore>) {
        let previous = self.attribute_scores.get(&attribute).copied();
        let next = score_attribute(attribute, self.components.get(attribute));
        match next {
            Some(score) => {
                self.attribute_scores.insert(attribute, score);
            }
            None => {
                self.attribute_scores.remove(&attribute);
            }
        }
        self.total_score = total_score(&self.attribute_scores);
        self.fit_tier = classify(self.total_score);
        (previous, next)
    }

    pub fn derived(&self) -> DerivedScores {
        DerivedScores {
            attribute_scores: self.attribute_scores.clone(),
            total_score: self.total_score,
            fit_tier: self.fit_tier,
        }
    }

    /// Compare stored derived values against a fresh recomputation.
    pub fn traceability_gaps(&self, engine: &ScoringEngine) -> Vec<String> {
        let expected = engine.derive(&self.components);
        let mut gaps = Vec::new();

        for attribute in Attribute::ordered() {
            let stored = self.attribute_scores.get(&attribute);
            let derived = expected.attribute_scores.get(&attribute);
            if stored != derived {
                gaps.push(format!(
                    "{} stored {} but components give {}",
                    attribute.label(),
                    describe(stored),
                    describe(derived)
                ));
            }
        }
        if self.total_score != expected.total_score {
            gaps.push(format!(
                "total stored {} but components give {}",
                describe(self.total_score.as_ref()),
                describe(expected.total_score.as_ref())
            ));
        }
        if self.fit_tier != expected.fit_tier {
            gaps.push(format!(
                "tier stored {} but components give {}",
                self.fit_tier.label(),
                expected.fit_tier.label()
            ));
        }

        gaps
    }

    pub fn export_row(&self) -> ScorecardExportRow {
        let score = |attribute: Attribute| {
            self.attribute_scores
                .get(&attribute)
                .map(|score| score.value())
        };
        ScorecardExportRow {
            campaign_id: self.pairing.campaign_id,
            influencer_id: self.pairing.influencer_id,
            reach: score(Attribute::Reach),
            interest: score(Attribute::Interest),
            engagement: score(Attribute::Engagement),
            content: score(Attribute::Content),
            authority: score(Attribute::Authority),
            values: score(Attribute::Values),
            total_score: self.total_score.map(TotalScore::value),
            fit_tier: self.fit_tier.label(),
            qualitative_notes: self.qualitative_notes.clone(),
            version: self.version,
            updated_at: self.updated_at,
        }
    }

    pub fn view(&self) -> ScorecardView {
        ScorecardView {
            completeness: self.completeness(),
            missing_attributes: missing_attributes(&self.attribute_scores),
            fit_tier_label: self.fit_tier.label(),
            record: self.clone(),
        }
    }
}

fn describe<T: std::fmt::Display>(value: Option<&T>) -> String {
    value
        .map(ToString::to_string)
        .unwrap_or_else(|| "nothing".to_string())
}

/// Read-API payload: the full record plus presentation helpers.
#[derive(Debug, Clone, Serialize)]
pub struct ScorecardView {
    #[serde(flatten)]
    pub record: ScorecardRecord,
    pub completeness: Completeness,
    pub missing_attributes: Vec<Attribute>,
    pub fit_tier_label: &'static str,
}

/// Flattened per-pairing row handed to the export collaborator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScorecardExportRow {
    pub campaign_id: CampaignId,
    pub influencer_id: InfluencerId,
    pub reach: Option<f64>,
    pub interest: Option<f64>,
    pub engagement: Option<f64>,
    pub content: Option<f64>,
    pub authority: Option<f64>,
    pub values: Option<f64>,
    pub total_score: Option<f64>,
    pub fit_tier: &'static str,
    pub qualitative_notes: String,
    pub version: u64,
    pub updated_at: DateTime<Utc>,
}

/// Storage abstraction so the service can be exercised in isolation.
///
/// `commit` is a compare-and-swap: it must store `record` only if the currently stored
/// version (0 for an absent pairing) equals `expected_version`, as one indivisible step.
pub trait ScorecardRepository: Send + Sync {
    fn fetch(&self, pairing: &PairingId) -> Result<Option<ScorecardRecord>, RepositoryError>;
    fn commit(&self, record: ScorecardRecord, expected_version: u64)
        -> Result<(), RepositoryError>;
    /// Store `record` unless the pairing already exists; returns whatever is stored afterwards.
    fn insert_if_absent(&self, record: ScorecardRecord)
        -> Result<ScorecardRecord, RepositoryError>;
    fn list_campaign(&self, campaign_id: CampaignId)
        -> Result<Vec<ScorecardRecord>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    #[error("stored version {actual} does not match expected version {expected}")]
    VersionMismatch { expected: u64, actual: u64 },
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Process-local repository. Each commit swaps a whole record under one lock.
#[derive(Debug, Default, Clone)]
pub struct InMemoryScorecardRepository {
    records: Arc<Mutex<HashMap<PairingId, ScorecardRecord>>>,
}

impl InMemoryScorecardRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, HashMap<PairingId, ScorecardRecord>>, RepositoryError>
    {
        self.records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("repository lock poisoned".to_string()))
    }
}

impl ScorecardRepository for InMemoryScorecardRepository {
    fn fetch(&self, pairing: &PairingId) -> Result<Option<ScorecardRecord>, RepositoryError> {
        Ok(self.lock()?.get(pairing).cloned())
    }

    fn commit(
        &self,
        record: ScorecardRecord,
        expected_version: u64,
    ) -> Result<(), RepositoryError> {
        let mut guard = self.lock()?;
        let actual = guard
            .get(&record.pairing)
            .map(|stored| stored.version)
            .unwrap_or(0);
        if actual != expected_version {
            return Err(RepositoryError::VersionMismatch {
                expected: expected_version,
                actual,
            });
        }
        guard.insert(record.pairing, record);
        Ok(())
    }

    fn insert_if_absent(
        &self,
        record: ScorecardRecord,
    ) -> Result<ScorecardRecord, RepositoryError> {
        let mut guard = self.lock()?;
        let stored = guard.entry(record.pairing).or_insert(record);
        Ok(stored.clone())
    }

    fn list_campaign(
        &self,
        campaign_id: CampaignId,
    ) -> Result<Vec<ScorecardRecord>, RepositoryError> {
        let guard = self.lock()?;
        let mut records: Vec<ScorecardRecord> = guard
            .values()
            .filter(|record| record.pairing.campaign_id == campaign_id)
            .cloned()
            .collect();
        records.sort_by_key(|record| record.pairing.influencer_id);
        Ok(records)
    }
}

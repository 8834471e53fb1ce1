use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;

use crate::config::ScorecardConfig;
use crate::scorecards::domain::{Attribute, CampaignId, ComponentInput, EditorId, PairingId};
use crate::scorecards::repository::{
    InMemoryScorecardRepository, RepositoryError, ScorecardRecord, ScorecardRepository,
};
use crate::scorecards::{scorecard_router, ScorecardService};

pub(super) fn pairing() -> PairingId {
    PairingId::new(7, 42)
}

pub(super) fn editor() -> EditorId {
    EditorId::from("reviewer-ana")
}

pub(super) fn build_service() -> (
    ScorecardService<InMemoryScorecardRepository>,
    Arc<InMemoryScorecardRepository>,
) {
    let repository = Arc::new(InMemoryScorecardRepository::new());
    let service = ScorecardService::new(repository.clone(), ScorecardConfig::default());
    (service, repository)
}

/// Raw input giving `attribute` a whole-number score of `value`.
pub(super) fn input_scoring(attribute: Attribute, value: u8) -> ComponentInput {
    match attribute {
        Attribute::Reach | Attribute::Interest | Attribute::Engagement => {
            ComponentInput::rating(value)
        }
        Attribute::Content => ComponentInput::content(value, value),
        Attribute::Authority => ComponentInput::authority(value),
        Attribute::Values => ComponentInput::values(value),
    }
}

/// Apply one edit per attribute, in order, starting from the record's current version.
pub(super) fn score_all<R>(
    service: &ScorecardService<R>,
    pairing: PairingId,
    values: [u8; 6],
) -> ScorecardRecord
where
    R: ScorecardRepository + 'static,
{
    let mut version = service.get(&pairing).map(|record| record.version).unwrap_or(0);
    let mut last = None;
    for (attribute, value) in Attribute::ordered().into_iter().zip(values) {
        let record = service
            .apply_component_edit(
                pairing,
                attribute,
                editor(),
                input_scoring(attribute, value),
                version,
            )
            .expect("edit applies");
        version = record.version;
        last = Some(record);
    }
    last.expect("six edits applied")
}

/// Reads succeed, commits fail while `offline` is set.
#[derive(Default)]
pub(super) struct FlakyRepository {
    pub(super) inner: InMemoryScorecardRepository,
    pub(super) offline: AtomicBool,
}

impl FlakyRepository {
    pub(super) fn go_offline(&self) {
        self.offline.store(true, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), RepositoryError> {
        if self.offline.load(Ordering::SeqCst) {
            Err(RepositoryError::Unavailable("database offline".to_string()))
        } else {
            Ok(())
        }
    }
}

impl ScorecardRepository for FlakyRepository {
    fn fetch(&self, pairing: &PairingId) -> Result<Option<ScorecardRecord>, RepositoryError> {
        self.inner.fetch(pairing)
    }

    fn commit(
        &self,
        record: ScorecardRecord,
        expected_version: u64,
    ) -> Result<(), RepositoryError> {
        self.check()?;
        self.inner.commit(record, expected_version)
    }

    fn insert_if_absent(
        &self,
        record: ScorecardRecord,
    ) -> Result<ScorecardRecord, RepositoryError> {
        self.check()?;
        self.inner.insert_if_absent(record)
    }

    fn list_campaign(
        &self,
        campaign_id: CampaignId,
    ) -> Result<Vec<ScorecardRecord>, RepositoryError> {
        self.inner.list_campaign(campaign_id)
    }
}

/// Every read and write fails.
pub(super) struct UnavailableRepository;

impl ScorecardRepository for UnavailableRepository {
    fn fetch(&self, _pairing: &PairingId) -> Result<Option<ScorecardRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn commit(&self, _record: ScorecardRecord, _expected: u64) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn insert_if_absent(
        &self,
        _record: ScorecardRecord,
    ) -> Result<ScorecardRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list_campaign(
        &self,
        _campaign_id: CampaignId,
    ) -> Result<Vec<ScorecardRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) fn router_with_service<R>(service: ScorecardService<R>) -> axum::Router
where
    R: ScorecardRepository + 'static,
{
    scorecard_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

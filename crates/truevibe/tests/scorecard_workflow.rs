//! End-to-end scorecard scenarios driven through the public service facade and HTTP router.
//!
//! A reviewer fills in a pairing attribute by attribute, colleagues race on stale reads, and
//! the campaign export and summary are checked against what was entered.

mod common {
    use std::collections::BTreeMap;
    use std::sync::{Arc, Mutex, MutexGuard};

    use truevibe::config::ScorecardConfig;
    use truevibe::scorecards::{
        Attribute, CampaignId, ComponentInput, EditorId, PairingId, RepositoryError,
        ScorecardRecord, ScorecardRepository, ScorecardService,
    };

    type Records = BTreeMap<PairingId, ScorecardRecord>;

    /// Ordered store written outside the crate to exercise the public repository contract.
    #[derive(Default)]
    pub(super) struct LedgerRepository {
        records: Mutex<Records>,
    }

    impl LedgerRepository {
        fn guard(&self) -> Result<MutexGuard<'_, Records>, RepositoryError> {
            self.records
                .lock()
                .map_err(|_| RepositoryError::Unavailable("ledger poisoned".to_string()))
        }
    }

    impl ScorecardRepository for LedgerRepository {
        fn fetch(&self, pairing: &PairingId) -> Result<Option<ScorecardRecord>, RepositoryError> {
            Ok(self.guard()?.get(pairing).cloned())
        }

        fn commit(
            &self,
            record: ScorecardRecord,
            expected_version: u64,
        ) -> Result<(), RepositoryError> {
            let mut records = self.guard()?;
            let actual = records
                .get(&record.pairing)
                .map_or(0, |stored| stored.version);
            if actual != expected_version {
                return Err(RepositoryError::VersionMismatch {
                    expected: expected_version,
                    actual,
                });
            }
            records.insert(record.pairing, record);
            Ok(())
        }

        fn insert_if_absent(
            &self,
            record: ScorecardRecord,
        ) -> Result<ScorecardRecord, RepositoryError> {
            let mut records = self.guard()?;
            Ok(records.entry(record.pairing).or_insert(record).clone())
        }

        fn list_campaign(
            &self,
            campaign_id: CampaignId,
        ) -> Result<Vec<ScorecardRecord>, RepositoryError> {
            Ok(self
                .guard()?
                .values()
                .filter(|record| record.pairing.campaign_id == campaign_id)
                .cloned()
                .collect())
        }
    }

    pub(super) fn service() -> Arc<ScorecardService<LedgerRepository>> {
        Arc::new(ScorecardService::new(
            Arc::new(LedgerRepository::default()),
            ScorecardConfig::default(),
        ))
    }

    pub(super) fn reviewer() -> EditorId {
        EditorId::from("reviewer-ana")
    }

    pub(super) fn fill(
        service: &ScorecardService<LedgerRepository>,
        pairing: PairingId,
        inputs: [(Attribute, ComponentInput); 6],
    ) -> ScorecardRecord {
        let mut version = service.open(pairing).expect("opens").version;
        let mut latest = None;
        for (attribute, input) in inputs {
            let record = service
                .apply_component_edit(pairing, attribute, reviewer(), input, version)
                .expect("edit applies");
            version = record.version;
            latest = Some(record);
        }
        latest.expect("six edits applied")
    }
}

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use common::{fill, reviewer, service};
use truevibe::scorecards::{
    scorecard_router, Attribute, CampaignId, Completeness, ComponentInput, EditorId, FitTier,
    InfluencerId, PairingId, ScorecardServiceError,
};

fn skincare_inputs() -> [(Attribute, ComponentInput); 6] {
    [
        (Attribute::Reach, ComponentInput::rating(5)),
        (Attribute::Interest, ComponentInput::rating(5)),
        (Attribute::Engagement, ComponentInput::rating(4)),
        (Attribute::Content, ComponentInput::content(5, 4)),
        (Attribute::Authority, ComponentInput::authority(4)),
        (
            Attribute::Values,
            ComponentInput::Values {
                value: 4,
                window_months: 3,
            },
        ),
    ]
}

#[test]
fn reviewer_fills_a_scorecard_to_ideal_fit() {
    let service = service();
    let pairing = PairingId::new(11, 5);

    let record = fill(&service, pairing, skincare_inputs());

    assert_eq!(record.completeness(), Completeness::Complete);
    // 5 + 5 + 4 + 4.5 + 4 + 4
    assert_eq!(record.total_score.map(|total| total.to_string()), Some("26.5".to_string()));
    assert_eq!(record.fit_tier, FitTier::IdealFit);
    assert_eq!(record.version, 6);
    assert_eq!(
        record
            .audit_log
            .iter()
            .map(|entry| entry.version)
            .collect::<Vec<_>>(),
        vec![1, 2, 3, 4, 5, 6]
    );
    service.verify(&pairing).expect("stored scores trace back");

    let explanations = service.engine().explain(&record.components);
    assert_eq!(explanations.len(), 6);
    assert!(explanations.iter().all(|explanation| explanation.score.is_some()));
}

#[test]
fn downgrading_content_moves_the_pairing_between_bands() {
    let service = service();
    let pairing = PairingId::new(11, 6);
    let record = fill(&service, pairing, skincare_inputs());

    let record = service
        .apply_component_edit(
            pairing,
            Attribute::Content,
            EditorId::from("reviewer-ben"),
            ComponentInput::content(1, 2),
            record.version,
        )
        .expect("edit applies");

    // 5 + 5 + 4 + 1.5 + 4 + 4
    assert_eq!(record.total_score.map(|total| total.tenths()), Some(235));
    assert_eq!(record.fit_tier, FitTier::GoodAlternative);
    assert_eq!(
        record.audit_log.last().map(|entry| entry.editor.clone()),
        Some(EditorId::from("reviewer-ben"))
    );
}

#[test]
fn second_reviewer_on_a_stale_read_must_reload() {
    let service = service();
    let pairing = PairingId::new(11, 7);
    let read = service.open(pairing).expect("opens");

    service
        .apply_component_edit(
            pairing,
            Attribute::Reach,
            reviewer(),
            ComponentInput::rating(4),
            read.version,
        )
        .expect("first reviewer wins");
    let stale = service.apply_component_edit(
        pairing,
        Attribute::Reach,
        EditorId::from("reviewer-ben"),
        ComponentInput::rating(2),
        read.version,
    );

    match stale {
        Err(ScorecardServiceError::Conflict {
            expected, actual, ..
        }) => {
            assert_eq!((expected, actual), (0, 1));
        }
        other => panic!("expected conflict, got {other:?}"),
    }

    let reloaded = service.get(&pairing).expect("record exists");
    let retried = service
        .apply_component_edit(
            pairing,
            Attribute::Reach,
            EditorId::from("reviewer-ben"),
            ComponentInput::rating(2),
            reloaded.version,
        )
        .expect("retry on fresh version applies");
    assert_eq!(
        retried
            .attribute_scores
            .get(&Attribute::Reach)
            .map(|score| score.tenths()),
        Some(20)
    );
}

#[test]
fn campaign_summary_ranks_pairings() {
    let service = service();
    fill(&service, PairingId::new(20, 3), skincare_inputs());
    let weaker = [
        (Attribute::Reach, ComponentInput::rating(2)),
        (Attribute::Interest, ComponentInput::rating(3)),
        (Attribute::Engagement, ComponentInput::rating(2)),
        (Attribute::Content, ComponentInput::content(3, 3)),
        (Attribute::Authority, ComponentInput::authority(2)),
        (Attribute::Values, ComponentInput::values(3)),
    ];
    fill(&service, PairingId::new(20, 1), weaker);
    service.open(PairingId::new(20, 2)).expect("opens");

    let summary = service
        .campaign_summary(CampaignId(20))
        .expect("summary builds");

    assert_eq!(summary.tracked, 3);
    assert_eq!(summary.scored, 2);
    assert_eq!(
        summary.top_pairing.map(|top| top.influencer_id),
        Some(InfluencerId(3))
    );

    let rows = service
        .campaign_export(CampaignId(20))
        .expect("export builds");
    assert_eq!(
        rows.iter().map(|row| row.fit_tier).collect::<Vec<_>>(),
        vec!["Less Ideal", "Undetermined", "Ideal Fit"]
    );
}

#[tokio::test]
async fn router_round_trip_reads_back_the_written_record() {
    let service = service();
    let router = scorecard_router(service.clone());

    let write = router
        .clone()
        .oneshot(
            Request::put("/api/v1/campaigns/30/influencers/8/scorecard/components/values")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({
                        "editor_id": "reviewer-ana",
                        "expected_version": 0,
                        "input": { "kind": "values", "value": 5 }
                    })
                    .to_string(),
                ))
                .expect("request builds"),
        )
        .await
        .expect("route executes");
    assert_eq!(write.status(), StatusCode::OK);

    let read = router
        .oneshot(
            Request::get("/api/v1/campaigns/30/influencers/8/scorecard")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");
    assert_eq!(read.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(read.into_body(), 64 * 1024)
        .await
        .expect("read body");
    let payload: Value = serde_json::from_slice(&bytes).expect("json payload");
    assert_eq!(payload["attribute_scores"]["values"], json!(5.0));
    assert_eq!(payload["components"]["values"]["window_months"], json!(6));
    assert_eq!(payload["completeness"], json!("partial"));
    assert_eq!(
        service
            .get(&PairingId::new(30, 8))
            .expect("record exists")
            .version,
        1
    );
}

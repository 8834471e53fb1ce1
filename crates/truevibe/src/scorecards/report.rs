use serde::Serialize;

use super::domain::{CampaignId, Completeness, FitTier, InfluencerId, TotalScore};
use super::repository::ScorecardRecord;

/// Campaign-level snapshot used by the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CampaignSummary {
    pub campaign_id: CampaignId,
    pub tracked: usize,
    pub scored: usize,
    pub average_total: Option<f64>,
    pub top_pairing: Option<TopPairing>,
    pub tier_distribution: Vec<TierCount>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TopPairing {
    pub influencer_id: InfluencerId,
    pub total_score: TotalScore,
    pub fit_tier: FitTier,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TierCount {
    pub tier: FitTier,
    pub tier_label: &'static str,
    pub count: usize,
}

pub fn summarize(campaign_id: CampaignId, records: &[ScorecardRecord]) -> CampaignSummary {
    let scored: Vec<(&ScorecardRecord, TotalScore)> = records
        .iter()
        .filter(|record| record.completeness() == Completeness::Complete)
        .filter_map(|record| record.total_score.map(|total| (record, total)))
        .collect();

    let average_total = if scored.is_empty() {
        None
    } else {
        let tenths: u64 = scored
            .iter()
            .map(|(_, total)| u64::from(total.tenths()))
            .sum();
        Some(tenths as f64 / 10.0 / scored.len() as f64)
    };

    // Highest total wins; ties go to the lowest influencer id.
    let top_pairing = scored
        .iter()
        .max_by(|(left, left_total), (right, right_total)| {
            left_total.cmp(right_total).then_with(|| {
                right
                    .pairing
                    .influencer_id
                    .cmp(&left.pairing.influencer_id)
            })
        })
        .map(|(record, total)| TopPairing {
            influencer_id: record.pairing.influencer_id,
            total_score: *total,
            fit_tier: record.fit_tier,
        });

    let tier_distribution = FitTier::ordered()
        .into_iter()
        .map(|tier| TierCount {
            tier,
            tier_label: tier.label(),
            count: records
                .iter()
                .filter(|record| record.fit_tier == tier)
                .count(),
        })
        .collect();

    CampaignSummary {
        campaign_id,
        tracked: records.len(),
        scored: scored.len(),
        average_total,
        top_pairing,
        tier_distribution,
    }
}

use clap::Args;
use std::sync::Arc;
use truevibe::config::ScorecardConfig;
use truevibe::error::AppError;
use truevibe::scorecards::suggest::suggest;
use truevibe::scorecards::{
    Attribute, CampaignId, ComponentInput, EditorId, InMemoryScorecardRepository, PairingId,
    QuantitativeMetrics, ScorecardRecord, ScorecardService, ScorecardServiceError,
};

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Campaign id used for the sample pairings.
    #[arg(long, default_value_t = 1)]
    pub(crate) campaign_id: u64,
    /// Print the top pairing's full scorecard payload as JSON.
    #[arg(long)]
    pub(crate) json: bool,
    /// Skip the stale-edit conflict walkthrough.
    #[arg(long)]
    pub(crate) skip_conflict: bool,
}

#[derive(Args, Debug)]
pub(crate) struct SuggestArgs {
    /// Follower count reported by the ingestion source.
    #[arg(long)]
    pub(crate) followers: Option<u64>,
    /// Engagement rate, either a bare number or text such as 4.2%.
    #[arg(long, value_parser = crate::infra::parse_engagement_rate)]
    pub(crate) engagement_rate: Option<String>,
    /// Content topic; repeat for several.
    #[arg(long)]
    pub(crate) topic: Vec<String>,
    /// Free-text campaign objective to compare topics against.
    #[arg(long)]
    pub(crate) objective: Option<String>,
}

struct SampleInfluencer {
    id: u64,
    handle: &'static str,
    metrics: QuantitativeMetrics,
    content: (u8, u8),
    authority: u8,
    values: u8,
}

const OBJECTIVE: &str = "Launch a clean skincare serum with wellness creators";

fn metrics(followers: u64, rate: &str, topics: &[&str]) -> QuantitativeMetrics {
    QuantitativeMetrics {
        follower_count: Some(followers),
        engagement_rate: Some(rate.to_string()),
        topics: topics.iter().map(|topic| topic.to_string()).collect(),
        campaign_objective: Some(OBJECTIVE.to_string()),
    }
}

fn sample_influencers() -> Vec<SampleInfluencer> {
    vec![
        SampleInfluencer {
            id: 101,
            handle: "@glowwithmira",
            metrics: metrics(640_000, "5.1%", &["skincare", "wellness", "clean beauty"]),
            content: (5, 4),
            authority: 5,
            values: 4,
        },
        SampleInfluencer {
            id: 102,
            handle: "@techtomas",
            metrics: metrics(1_200_000, "1.4%", &["gadgets", "reviews"]),
            content: (4, 3),
            authority: 2,
            values: 3,
        },
        SampleInfluencer {
            id: 103,
            handle: "@dailyserum",
            metrics: metrics(48_000, "6.3%", &["skincare", "routines"]),
            content: (4, 4),
            authority: 4,
            values: 5,
        },
    ]
}

pub(crate) fn run_suggest(args: SuggestArgs) -> Result<(), AppError> {
    let metrics = QuantitativeMetrics {
        follower_count: args.followers,
        engagement_rate: args.engagement_rate,
        topics: args.topic,
        campaign_objective: args.objective,
    };
    let ratings = suggest(&metrics);

    println!("Suggested pre-fill values (reviewer confirms before saving)");
    for attribute in [Attribute::Reach, Attribute::Interest, Attribute::Engagement] {
        if let Some(suggestion) = ratings.for_attribute(attribute) {
            println!(
                "- {}: slider {} (estimate {:.1})",
                attribute.label(),
                suggestion.slider,
                suggestion.estimate
            );
        }
    }
    println!(
        "Engagement rate read as {:.2}%",
        ratings.engagement_rate_percent
    );
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        campaign_id,
        json,
        skip_conflict,
    } = args;

    let service = ScorecardService::new(
        Arc::new(InMemoryScorecardRepository::new()),
        ScorecardConfig::default(),
    );
    let reviewer = EditorId::from("demo-reviewer");

    println!("Influencer scorecard demo (campaign {campaign_id})");
    println!("Objective: {OBJECTIVE}");

    for influencer in sample_influencers() {
        let pairing = PairingId::new(campaign_id, influencer.id);
        let record = score_influencer(&service, pairing, &reviewer, &influencer)?;
        render_scorecard(&service, influencer.handle, &record);
    }

    if !skip_conflict {
        demonstrate_conflict(&service, PairingId::new(campaign_id, 101))?;
    }

    let summary = service.campaign_summary(CampaignId(campaign_id))?;
    println!("\nCampaign summary");
    println!("- {} tracked, {} fully scored", summary.tracked, summary.scored);
    if let Some(average) = summary.average_total {
        println!("- Average total {average:.2} / 30");
    }
    for entry in &summary.tier_distribution {
        println!("- {}: {}", entry.tier_label, entry.count);
    }

    let Some(top) = summary.top_pairing else {
        println!("- No pairing has a complete scorecard yet");
        return Ok(());
    };
    println!(
        "- Top pairing: influencer {} with {} ({})",
        top.influencer_id.0,
        top.total_score,
        top.fit_tier.label()
    );

    if json {
        let record = service.get(&PairingId::new(campaign_id, top.influencer_id.0))?;
        match serde_json::to_string_pretty(&record.view()) {
            Ok(payload) => println!("\nScorecard payload:\n{payload}"),
            Err(err) => println!("\nScorecard payload unavailable: {err}"),
        }
    }

    Ok(())
}

fn score_influencer(
    service: &ScorecardService<InMemoryScorecardRepository>,
    pairing: PairingId,
    reviewer: &EditorId,
    influencer: &SampleInfluencer,
) -> Result<ScorecardRecord, ScorecardServiceError> {
    let suggestions = suggest(&influencer.metrics);
    let (originality, creative) = influencer.content;

    let mut edits: Vec<(Attribute, ComponentInput)> = Vec::new();
    for attribute in [Attribute::Reach, Attribute::Interest, Attribute::Engagement] {
        if let Some(suggestion) = suggestions.for_attribute(attribute) {
            edits.push((attribute, suggestion.as_input()));
        }
    }
    edits.push((
        Attribute::Content,
        ComponentInput::content(originality, creative),
    ));
    edits.push((
        Attribute::Authority,
        ComponentInput::authority(influencer.authority),
    ));
    edits.push((Attribute::Values, ComponentInput::values(influencer.values)));

    let mut record = service.open(pairing)?;
    for (attribute, input) in edits {
        record = service.apply_component_edit(
            pairing,
            attribute,
            reviewer.clone(),
            input,
            record.version,
        )?;
    }
    service.update_notes(
        pairing,
        reviewer.clone(),
        &format!("Scored from {} metrics plus manual review.", influencer.handle),
        record.version,
    )
}

fn render_scorecard(
    service: &ScorecardService<InMemoryScorecardRepository>,
    handle: &str,
    record: &ScorecardRecord,
) {
    let total = record
        .total_score
        .map(|total| total.to_string())
        .unwrap_or_else(|| "-".to_string());
    println!(
        "\n{handle} (influencer {}): total {total} -> {} [{}]",
        record.pairing.influencer_id.0,
        record.fit_tier.label(),
        record.completeness().label()
    );
    for explanation in service.engine().explain(&record.components) {
        let score = explanation
            .score
            .map(|score| score.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  - {:<10} {:>3}  {}",
            explanation.attribute.label(),
            score,
            explanation.notes
        );
    }
}

fn demonstrate_conflict(
    service: &ScorecardService<InMemoryScorecardRepository>,
    pairing: PairingId,
) -> Result<(), ScorecardServiceError> {
    println!("\nConcurrent edit walkthrough for {pairing}");
    let snapshot = service.get(&pairing)?;

    let first = service.apply_component_edit(
        pairing,
        Attribute::Authority,
        EditorId::from("reviewer-a"),
        ComponentInput::authority(4),
        snapshot.version,
    )?;
    println!(
        "- reviewer-a saved Authority at version {} (total {})",
        first.version,
        first
            .total_score
            .map(|total| total.to_string())
            .unwrap_or_else(|| "-".to_string())
    );

    match service.apply_component_edit(
        pairing,
        Attribute::Authority,
        EditorId::from("reviewer-b"),
        ComponentInput::authority(2),
        snapshot.version,
    ) {
        Err(ScorecardServiceError::Conflict {
            expected, actual, ..
        }) => println!(
            "- reviewer-b was rejected: read version {expected}, record is now at {actual}"
        ),
        Err(err) => return Err(err),
        Ok(record) => println!(
            "- reviewer-b unexpectedly saved version {}",
            record.version
        ),
    }

    service.verify(&pairing)?;
    println!("- stored scores still trace back to their components");
    Ok(())
}

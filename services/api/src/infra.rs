use metrics_exporter_prometheus::PrometheusHandle;
use std::io;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use truevibe::error::AppError;
use truevibe::scorecards::ScorecardExportRow;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Render export rows as CSV with a header line; missing scores become empty cells.
pub(crate) fn export_csv(rows: &[ScorecardExportRow]) -> Result<String, AppError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.serialize(row).map_err(csv_error)?;
    }
    if rows.is_empty() {
        writer.write_record(EXPORT_HEADER).map_err(csv_error)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| AppError::Io(err.into_error()))?;
    String::from_utf8(bytes)
        .map_err(|err| AppError::Io(io::Error::new(io::ErrorKind::InvalidData, err)))
}

const EXPORT_HEADER: [&str; 13] = [
    "campaign_id",
    "influencer_id",
    "reach",
    "interest",
    "engagement",
    "content",
    "authority",
    "values",
    "total_score",
    "fit_tier",
    "qualitative_notes",
    "version",
    "updated_at",
];

fn csv_error(err: csv::Error) -> AppError {
    AppError::Io(io::Error::new(io::ErrorKind::Other, err))
}

pub(crate) fn parse_engagement_rate(raw: &str) -> Result<String, String> {
    truevibe::scorecards::suggest::parse_percentage(raw)
        .map(|_| raw.trim().to_string())
        .ok_or_else(|| format!("failed to read '{raw}' as a percentage such as 4.2 or 4.2%"))
}

use super::super::domain::{FitTier, TotalScore};

/// Lowest total (in tenths) classified as an ideal fit.
pub const IDEAL_FIT_FLOOR: u16 = 260;
/// Lowest total (in tenths) classified as a good alternative.
pub const GOOD_ALTERNATIVE_FLOOR: u16 = 200;

/// Map a total to its fit tier. Totals between bands fall to the lower band.
pub fn classify(total: Option<TotalScore>) -> FitTier {
    match total.map(TotalScore::tenths) {
        Some(tenths) if tenths >= IDEAL_FIT_FLOOR => FitTier::IdealFit,
        Some(tenths) if tenths >= GOOD_ALTERNATIVE_FLOOR => FitTier::GoodAlternative,
        Some(_) => FitTier::LessIdeal,
        None => FitTier::Undetermined,
    }
}

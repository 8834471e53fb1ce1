use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Identifier wrapper for campaigns managed outside the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CampaignId(pub u64);

/// Identifier wrapper for influencers managed outside the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InfluencerId(pub u64);

/// A campaign–influencer association; the unit every scorecard is keyed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PairingId {
    pub campaign_id: CampaignId,
    pub influencer_id: InfluencerId,
}

impl PairingId {
    pub const fn new(campaign_id: u64, influencer_id: u64) -> Self {
        Self {
            campaign_id: CampaignId(campaign_id),
            influencer_id: InfluencerId(influencer_id),
        }
    }
}

impl fmt::Display for PairingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "campaign {}/influencer {}",
            self.campaign_id.0, self.influencer_id.0
        )
    }
}

/// Reviewer identity as supplied by the identity collaborator. Not authenticated here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EditorId(pub String);

impl From<&str> for EditorId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// The six equally weighted dimensions of a scorecard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    Reach,
    Interest,
    Engagement,
    Content,
    Authority,
    Values,
}

impl Attribute {
    pub const fn ordered() -> [Self; 6] {
        [
            Self::Reach,
            Self::Interest,
            Self::Engagement,
            Self::Content,
            Self::Authority,
            Self::Values,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Reach => "Reach",
            Self::Interest => "Interest",
            Self::Engagement => "Engagement",
            Self::Content => "Content",
            Self::Authority => "Authority",
            Self::Values => "Values",
        }
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::Reach => "reach",
            Self::Interest => "interest",
            Self::Engagement => "engagement",
            Self::Content => "content",
            Self::Authority => "authority",
            Self::Values => "values",
        }
    }
}

/// Default trailing window, in months, that a Values rating refers to.
pub const DEFAULT_VALUES_WINDOW_MONTHS: i64 = 6;

fn default_values_window() -> i64 {
    DEFAULT_VALUES_WINDOW_MONTHS
}

/// Raw reviewer input for one attribute. Each variant is the full raw set for its attribute.
///
/// Slider fields hold any integer the client sent; the input guard owns the range checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ComponentInput {
    /// Reach, Interest and Engagement: one reviewer-assigned integer.
    Rating { value: i64 },
    /// Content: two independent sliders, either of which may still be missing.
    Content {
        #[serde(default)]
        originality: Option<i64>,
        #[serde(default)]
        creative: Option<i64>,
    },
    Authority { value: i64 },
    /// `window_months` tags the review period; it never enters the score.
    Values {
        value: i64,
        #[serde(default = "default_values_window")]
        window_months: i64,
    },
}

impl ComponentInput {
    pub const fn rating(value: u8) -> Self {
        Self::Rating {
            value: value as i64,
        }
    }

    pub const fn content(originality: u8, creative: u8) -> Self {
        Self::Content {
            originality: Some(originality as i64),
            creative: Some(creative as i64),
        }
    }

    pub const fn authority(value: u8) -> Self {
        Self::Authority {
            value: value as i64,
        }
    }

    pub const fn values(value: u8) -> Self {
        Self::Values {
            value: value as i64,
            window_months: DEFAULT_VALUES_WINDOW_MONTHS,
        }
    }

    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Rating { .. } => "rating",
            Self::Content { .. } => "content",
            Self::Authority { .. } => "authority",
            Self::Values { .. } => "values",
        }
    }

    /// Whether this raw set has the shape `attribute` expects.
    pub const fn fits(&self, attribute: Attribute) -> bool {
        matches!(
            (attribute, self),
            (
                Attribute::Reach | Attribute::Interest | Attribute::Engagement,
                Self::Rating { .. }
            ) | (Attribute::Content, Self::Content { .. })
                | (Attribute::Authority, Self::Authority { .. })
                | (Attribute::Values, Self::Values { .. })
        )
    }

    /// A Content raw set with exactly one slider filled in.
    pub const fn is_half_filled(&self) -> bool {
        matches!(
            self,
            Self::Content {
                originality: Some(_),
                creative: None,
            } | Self::Content {
                originality: None,
                creative: Some(_),
            }
        )
    }
}

/// Raw per-attribute inputs for one pairing. Holds data only; scoring lives elsewhere.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentStore(BTreeMap<Attribute, ComponentInput>);

impl ComponentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, attribute: Attribute) -> Option<&ComponentInput> {
        self.0.get(&attribute)
    }

    /// Replace the whole raw set of `attribute`, returning what was there before.
    pub fn replace(
        &mut self,
        attribute: Attribute,
        input: ComponentInput,
    ) -> Option<ComponentInput> {
        self.0.insert(attribute, input)
    }

    pub fn clear(&mut self, attribute: Attribute) -> Option<ComponentInput> {
        self.0.remove(&attribute)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A derived attribute score held as exact tenths in `[10, 50]`, i.e. `[1.0, 5.0]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AttributeScore(u16);

impl AttributeScore {
    pub const MIN_TENTHS: u16 = 10;
    pub const MAX_TENTHS: u16 = 50;

    pub const fn from_tenths(tenths: u16) -> Option<Self> {
        if tenths >= Self::MIN_TENTHS && tenths <= Self::MAX_TENTHS {
            Some(Self(tenths))
        } else {
            None
        }
    }

    pub const fn whole(value: u8) -> Option<Self> {
        Self::from_tenths(value as u16 * 10)
    }

    pub const fn tenths(self) -> u16 {
        self.0
    }

    pub fn value(self) -> f64 {
        f64::from(self.0) / 10.0
    }
}

impl fmt::Display for AttributeScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.0 / 10, self.0 % 10)
    }
}

impl Serialize for AttributeScore {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.value())
    }
}

impl<'de> Deserialize<'de> for AttributeScore {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = f64::deserialize(deserializer)?;
        tenths_from_decimal(raw)
            .and_then(Self::from_tenths)
            .ok_or_else(|| {
                serde::de::Error::custom(format!("attribute score {raw} outside 1.0..=5.0"))
            })
    }
}

/// Sum of all six attribute scores, in exact tenths within `[60, 300]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TotalScore(u16);

impl TotalScore {
    pub const MIN_TENTHS: u16 = 60;
    pub const MAX_TENTHS: u16 = 300;

    pub const fn from_tenths(tenths: u16) -> Option<Self> {
        if tenths >= Self::MIN_TENTHS && tenths <= Self::MAX_TENTHS {
            Some(Self(tenths))
        } else {
            None
        }
    }

    pub const fn tenths(self) -> u16 {
        self.0
    }

    pub fn value(self) -> f64 {
        f64::from(self.0) / 10.0
    }
}

impl fmt::Display for TotalScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.0 / 10, self.0 % 10)
    }
}

impl Serialize for TotalScore {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.value())
    }
}

impl<'de> Deserialize<'de> for TotalScore {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = f64::deserialize(deserializer)?;
        tenths_from_decimal(raw)
            .and_then(Self::from_tenths)
            .ok_or_else(|| serde::de::Error::custom(format!("total score {raw} outside 6..=30")))
    }
}

fn tenths_from_decimal(raw: f64) -> Option<u16> {
    let tenths = (raw * 10.0).round();
    if tenths.is_finite() && (0.0..=f64::from(u16::MAX)).contains(&tenths) {
        Some(tenths as u16)
    } else {
        None
    }
}

/// Categorical classification of the total score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitTier {
    IdealFit,
    GoodAlternative,
    LessIdeal,
    Undetermined,
}

impl FitTier {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::IdealFit,
            Self::GoodAlternative,
            Self::LessIdeal,
            Self::Undetermined,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::IdealFit => "Ideal Fit",
            Self::GoodAlternative => "Good Alternative",
            Self::LessIdeal => "Less Ideal",
            Self::Undetermined => "Undetermined",
        }
    }
}

/// How far along a scorecard is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Completeness {
    Empty,
    Partial,
    Complete,
}

impl Completeness {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Partial => "partial",
            Self::Complete => "complete",
        }
    }
}

/// One append-only audit trail entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub recorded_at: DateTime<Utc>,
    pub editor: EditorId,
    /// Record version produced by this write.
    pub version: u64,
    pub change: AuditChange,
}

impl AuditEntry {
    pub fn attribute(&self) -> Option<Attribute> {
        match &self.change {
            AuditChange::Component { attribute, .. } => Some(*attribute),
            AuditChange::Notes { .. } => None,
        }
    }
}

/// Previous and new values captured by an audit entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AuditChange {
    Component {
        attribute: Attribute,
        previous: Option<ComponentInput>,
        next: Option<ComponentInput>,
        previous_score: Option<AttributeScore>,
        next_score: Option<AttributeScore>,
    },
    Notes {
        previous: String,
        next: String,
    },
}

//! Tasbeeh record and related types
//!
//! A tasbeeh is a named repetition counter with a completion target and a
//! recurrence period. The period is informational only; it drives no reset
//! scheduling.

use serde::{Deserialize, Serialize};

use crate::id::{generate_id, timestamp};
use crate::storage::HasId;

/// Prefix used for generated tasbeeh IDs
pub const ID_PREFIX: &str = "tasbeeh";

/// Recurrence period for a tasbeeh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Daily,
    Weekly,
    Monthly,
}

impl Period {
    /// Human-readable label for display
    pub fn label(&self) -> &'static str {
        match self {
            Period::Daily => "Daily",
            Period::Weekly => "Weekly",
            Period::Monthly => "Monthly",
        }
    }
}

impl std::str::FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "daily" => Ok(Period::Daily),
            "weekly" => Ok(Period::Weekly),
            "monthly" => Ok(Period::Monthly),
            other => Err(format!(
                "invalid period '{other}', expected daily, weekly or monthly"
            )),
        }
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Period::Daily => write!(f, "daily"),
            Period::Weekly => write!(f, "weekly"),
            Period::Monthly => write!(f, "monthly"),
        }
    }
}

/// A persisted tasbeeh record
///
/// Serialized camelCase to match the on-disk collection layout. The optional
/// text fields are omitted entirely when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tasbeeh {
    /// Unique identifier (`tasbeeh_<epoch-ms>_<random base36>`), immutable
    pub id: String,

    /// User-facing label
    pub name: String,

    /// Arabic text of the dhikr
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arabic_text: Option<String>,

    /// Translation of the dhikr
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translation: Option<String>,

    /// Completion threshold
    pub target_count: u32,

    /// Recurrence tag; informational only
    pub period: Period,

    /// Current repetition count; never negative
    pub current_count: u32,

    /// ISO-8601 creation timestamp
    pub created_at: String,

    /// ISO-8601 timestamp, refreshed on every mutation
    pub updated_at: String,
}

/// Payload for creating a new tasbeeh
#[derive(Debug, Clone)]
pub struct TasbeehInput {
    pub name: String,
    pub arabic_text: Option<String>,
    pub translation: Option<String>,
    pub target_count: u32,
    pub period: Period,
}

/// Partial patch for an existing tasbeeh
///
/// `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct TasbeehUpdate {
    pub name: Option<String>,
    pub arabic_text: Option<String>,
    pub translation: Option<String>,
    pub target_count: Option<u32>,
    pub period: Option<Period>,
    pub current_count: Option<u32>,
}

impl Tasbeeh {
    /// Create a new record from an input payload
    ///
    /// Stamps a fresh id, sets the count to zero and uses a single instant
    /// for both timestamps.
    pub fn new(input: TasbeehInput) -> Self {
        let now = timestamp();

        Self {
            id: generate_id(ID_PREFIX),
            name: input.name,
            arabic_text: input.arabic_text,
            translation: input.translation,
            target_count: input.target_count,
            period: input.period,
            current_count: 0,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Merge a partial patch into this record
    ///
    /// Does not refresh `updated_at`; callers pair this with [`Self::touch`].
    pub fn apply(&mut self, updates: TasbeehUpdate) {
        if let Some(name) = updates.name {
            self.name = name;
        }
        if let Some(arabic_text) = updates.arabic_text {
            self.arabic_text = Some(arabic_text);
        }
        if let Some(translation) = updates.translation {
            self.translation = Some(translation);
        }
        if let Some(target_count) = updates.target_count {
            self.target_count = target_count;
        }
        if let Some(period) = updates.period {
            self.period = period;
        }
        if let Some(current_count) = updates.current_count {
            self.current_count = current_count;
        }
    }

    /// Refresh the update timestamp
    pub fn touch(&mut self) {
        self.updated_at = timestamp();
    }

    /// Progress toward the target as a percentage, capped at 100
    ///
    /// A zero target reports 100, consistent with [`Self::is_complete`].
    pub fn progress(&self) -> u8 {
        if self.target_count == 0 {
            return 100;
        }
        let pct = (self.current_count as f64 / self.target_count as f64 * 100.0).round();
        pct.min(100.0) as u8
    }

    /// Whether the current count has reached the target
    pub fn is_complete(&self) -> bool {
        self.current_count >= self.target_count
    }
}

impl HasId for Tasbeeh {
    fn id(&self) -> &str {
        &self.id
    }
}

use crate::date_key::DateKey;
use serde::{Deserialize, Serialize};

/// Recomputed on every request, never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DerivedStats {
    pub today: DateKey,
    pub total_count: usize,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub completed_today: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct ToggleRequest {
    /// Defaults to today when omitted.
    #[serde(default)]
    pub date: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ToggleResponse {
    pub date: DateKey,
    pub completed: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecordsResponse {
    pub dates: Vec<DateKey>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ImportResponse {
    pub imported: usize,
}

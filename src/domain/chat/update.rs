//! Value objects describing a parsed statistic update.
//!
//! `ExtractedUpdate` is the ephemeral output of the extractor and the input
//! to the update resolver. It is never persisted on its own, but it must be
//! JSON-representable because it travels through the fallback model's
//! prompt/response and into UI badges.

use serde::{Deserialize, Serialize};

/// How an update is merged into the stored stat line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UpdateSemantics {
    /// Set mentioned fields to absolute values (cumulative total statement).
    Replace,
    /// Add mentioned values to the stored fields. The default reading of an
    /// unqualified number.
    #[default]
    Increment,
    /// Replace-like update triggered by language fixing a prior error.
    Correct,
}

/// The classified conversational intent behind an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ContextTag {
    Correction,
    Addition,
    TotalUpdate,
    #[default]
    Normal,
}

/// A statistic update extracted from one chat message.
///
/// Omitted counters mean "not mentioned"; an explicit zero means the author
/// asserted the value is zero. The distinction is what lets replace-semantics
/// updates leave unmentioned fields untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedUpdate {
    /// The claimed subject of the update (may not match a stored player).
    pub player_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goals: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assists: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saves: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matches_played: Option<u32>,
    /// Extraction confidence in [0, 1].
    pub confidence: f64,
    #[serde(default)]
    pub update_semantics: UpdateSemantics,
    #[serde(default)]
    pub context_tag: ContextTag,
    /// Free-text audit trail of why this update was extracted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
}

impl ExtractedUpdate {
    /// Returns true if at least one counter field is present.
    pub fn is_actionable(&self) -> bool {
        self.goals.is_some()
            || self.assists.is_some()
            || self.saves.is_some()
            || self.matches_played.is_some()
    }

    /// Returns the mentioned counters as Spanish display fragments,
    /// e.g. "2 goles, 1 asistencia".
    pub fn described_fields(&self) -> Vec<String> {
        let mut parts = Vec::new();
        if let Some(goals) = self.goals {
            parts.push(format!("{} goles", goals));
        }
        if let Some(assists) = self.assists {
            parts.push(format!("{} asistencias", assists));
        }
        if let Some(saves) = self.saves {
            parts.push(format!("{} atajadas", saves));
        }
        if let Some(matches) = self.matches_played {
            parts.push(format!("{} partidos", matches));
        }
        parts
    }
}

/// Outcome of resolving a batch of extracted updates against the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutoUpdateResult {
    /// True iff at least one player record was actually mutated.
    pub success: bool,
    /// Display names of the players that were mutated.
    pub updated_players: Vec<String>,
    /// Human-readable summary for the chat transcript.
    pub message: String,
    /// The originating updates, kept for traceability.
    pub updates: Vec<ExtractedUpdate>,
}

impl AutoUpdateResult {
    /// A result representing "nothing was detected or changed".
    pub fn empty(message: impl Into<String>) -> Self {
        Self {
            success: false,
            updated_players: Vec::new(),
            message: message.into(),
            updates: Vec::new(),
        }
    }
}

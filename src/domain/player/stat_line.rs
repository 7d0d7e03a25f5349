//! PlayerStatLine aggregate - one player's cumulative performance.

use serde::{Deserialize, Serialize};

use crate::domain::chat::{ExtractedUpdate, UpdateSemantics};
use crate::domain::foundation::{PlayerId, Timestamp, ValidationError};

use super::Position;

/// Placeholder visual theme assigned to auto-provisioned players.
pub const DEFAULT_CARD_THEME: &str = "glass";

/// Team name assigned when a message does not mention one.
pub const UNKNOWN_TEAM: &str = "Equipo Desconocido";

/// Partial set of counter values to write to a player record.
///
/// Only fields that were actually mentioned in a message are present;
/// `None` means "leave the stored value untouched". This is what makes
/// replace-semantics updates safe for unmentioned fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatPatch {
    pub goals: Option<u32>,
    pub assists: Option<u32>,
    pub saves: Option<u32>,
    pub matches_played: Option<u32>,
}

impl StatPatch {
    /// Returns true if no field is set.
    pub fn is_empty(&self) -> bool {
        self.goals.is_none()
            && self.assists.is_none()
            && self.saves.is_none()
            && self.matches_played.is_none()
    }
}

/// One player's cumulative performance record.
///
/// # Invariants
///
/// - `name` is non-empty (validated at construction)
/// - counters are non-negative by construction (`u32`)
/// - `mvp_count` is owned by the voting subsystem and never changed here
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStatLine {
    id: PlayerId,
    name: String,
    team: String,
    position: Position,
    goals: u32,
    assists: u32,
    saves: u32,
    matches_played: u32,
    mvp_count: u32,
    card_theme: String,
    created_at: Timestamp,
}

impl PlayerStatLine {
    /// Creates a new player with zeroed counters.
    ///
    /// # Errors
    ///
    /// - `EmptyField` if the name is blank
    pub fn new(
        name: impl Into<String>,
        team: impl Into<String>,
        position: Position,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::empty_field("name"));
        }

        Ok(Self {
            id: PlayerId::new(),
            name,
            team: team.into(),
            position,
            goals: 0,
            assists: 0,
            saves: 0,
            matches_played: 0,
            mvp_count: 0,
            card_theme: DEFAULT_CARD_THEME.to_string(),
            created_at: Timestamp::now(),
        })
    }

    /// Builds the record for a player mentioned in chat who has no stored
    /// stat line yet: default forward position, unknown team, placeholder
    /// theme, and the mentioned counters as starting values.
    pub fn provision(
        name: impl Into<String>,
        update: &ExtractedUpdate,
    ) -> Result<Self, ValidationError> {
        let mut player = Self::new(name, UNKNOWN_TEAM, Position::Forward)?;
        player.goals = update.goals.unwrap_or(0);
        player.assists = update.assists.unwrap_or(0);
        player.saves = update.saves.unwrap_or(0);
        player.matches_played = update.matches_played.unwrap_or(0);
        Ok(player)
    }

    /// Reconstitutes a player from persistence (no validation).
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: PlayerId,
        name: String,
        team: String,
        position: Position,
        goals: u32,
        assists: u32,
        saves: u32,
        matches_played: u32,
        mvp_count: u32,
        card_theme: String,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            name,
            team,
            position,
            goals,
            assists,
            saves,
            matches_played,
            mvp_count,
            card_theme,
            created_at,
        }
    }

    /// Computes the field values to store for an extracted update.
    ///
    /// Replace and correct semantics take the mentioned values verbatim;
    /// increment semantics add them to the stored values. Unmentioned
    /// fields stay `None` and are never written.
    pub fn patch_for(&self, update: &ExtractedUpdate) -> StatPatch {
        match update.update_semantics {
            UpdateSemantics::Replace | UpdateSemantics::Correct => StatPatch {
                goals: update.goals,
                assists: update.assists,
                saves: update.saves,
                matches_played: update.matches_played,
            },
            UpdateSemantics::Increment => StatPatch {
                goals: update.goals.map(|v| self.goals.saturating_add(v)),
                assists: update.assists.map(|v| self.assists.saturating_add(v)),
                saves: update.saves.map(|v| self.saves.saturating_add(v)),
                matches_played: update
                    .matches_played
                    .map(|v| self.matches_played.saturating_add(v)),
            },
        }
    }

    /// Applies a patch in place. Fields absent from the patch are untouched.
    pub fn apply_patch(&mut self, patch: &StatPatch) {
        if let Some(goals) = patch.goals {
            self.goals = goals;
        }
        if let Some(assists) = patch.assists {
            self.assists = assists;
        }
        if let Some(saves) = patch.saves {
            self.saves = saves;
        }
        if let Some(matches_played) = patch.matches_played {
            self.matches_played = matches_played;
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────

    /// Returns the player ID.
    pub fn id(&self) -> PlayerId {
        self.id
    }

    /// Returns the display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the team name.
    pub fn team(&self) -> &str {
        &self.team
    }

    /// Returns the playing position.
    pub fn position(&self) -> Position {
        self.position
    }

    /// Returns the goal count.
    pub fn goals(&self) -> u32 {
        self.goals
    }

    /// Returns the assist count.
    pub fn assists(&self) -> u32 {
        self.assists
    }

    /// Returns the save count.
    pub fn saves(&self) -> u32 {
        self.saves
    }

    /// Returns the matches played count.
    pub fn matches_played(&self) -> u32 {
        self.matches_played
    }

    /// Returns the MVP vote count (owned by the voting subsystem).
    pub fn mvp_count(&self) -> u32 {
        self.mvp_count
    }

    /// Returns the card visual theme.
    pub fn card_theme(&self) -> &str {
        &self.card_theme
    }

    /// Returns when the record was created.
    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    /// Returns true if the stored name contains the given text,
    /// case-insensitively.
    pub fn name_matches(&self, substring: &str) -> bool {
        self.name
            .to_lowercase()
            .contains(&substring.to_lowercase())
    }
}

//! Playing position of a player.

use serde::{Deserialize, Serialize};

/// Playing position, determining which counters are meaningful.
///
/// Goalkeepers track saves; outfield players track goals and assists.
/// Matches played applies to everyone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    /// Default position for auto-provisioned players.
    #[default]
    Forward,
    Midfielder,
    Defender,
    Goalkeeper,
    Utility,
}

impl Position {
    /// Returns true if saves are a meaningful counter for this position.
    pub fn tracks_saves(&self) -> bool {
        matches!(self, Self::Goalkeeper | Self::Utility)
    }

    /// Returns true if goals and assists are meaningful counters.
    pub fn tracks_goals(&self) -> bool {
        !matches!(self, Self::Goalkeeper)
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Position::Forward => "forward",
            Position::Midfielder => "midfielder",
            Position::Defender => "defender",
            Position::Goalkeeper => "goalkeeper",
            Position::Utility => "utility",
        };
        write!(f, "{}", s)
    }
}

impl std::str::FromStr for Position {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "forward" | "delantero" => Ok(Position::Forward),
            "midfielder" | "mediocampista" => Ok(Position::Midfielder),
            "defender" | "defensa" => Ok(Position::Defender),
            "goalkeeper" | "portero" | "arquero" => Ok(Position::Goalkeeper),
            "utility" | "utilitario" => Ok(Position::Utility),
            other => Err(format!("unknown position: {}", other)),
        }
    }
}

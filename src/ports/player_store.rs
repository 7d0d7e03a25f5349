//! Player Store Port - Persistence interface for player stat lines.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, PlayerId};
use crate::domain::player::{PlayerStatLine, StatPatch};

/// Port for storing and mutating player stat lines.
///
/// Implementations back this with Postgres in production and an in-memory
/// map in tests. Updates are partial: only the fields present in the patch
/// are written, so concurrent updates to disjoint fields do not clobber
/// each other.
#[async_trait]
pub trait PlayerStore: Send + Sync {
    /// Finds a player whose name contains `name` (case-insensitive).
    ///
    /// Returns the first match in storage order, or `None`.
    async fn find_by_name(&self, name: &str) -> Result<Option<PlayerStatLine>, DomainError>;

    /// Inserts a newly provisioned player.
    async fn insert(&self, player: &PlayerStatLine) -> Result<(), DomainError>;

    /// Applies a partial update to one player's counters.
    ///
    /// # Errors
    ///
    /// - `PlayerNotFound` if no row matches `id`
    async fn update_stats(&self, id: PlayerId, patch: &StatPatch) -> Result<(), DomainError>;
}

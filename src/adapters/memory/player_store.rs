//! In-memory PlayerStore implementation.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, PlayerId};
use crate::domain::player::{PlayerStatLine, StatPatch};
use crate::ports::PlayerStore;

/// In-memory player store.
///
/// Keeps players in insertion order so substring lookups resolve the same
/// way the production store does (first match wins).
#[derive(Debug, Clone, Default)]
pub struct InMemoryPlayerStore {
    players: Arc<RwLock<Vec<PlayerStatLine>>>,
}

impl InMemoryPlayerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store with an existing player (test setup helper).
    pub async fn seed(&self, player: PlayerStatLine) {
        self.players.write().await.push(player);
    }

    /// Returns a snapshot of every stored player.
    pub async fn all(&self) -> Vec<PlayerStatLine> {
        self.players.read().await.clone()
    }
}

#[async_trait]
impl PlayerStore for InMemoryPlayerStore {
    async fn find_by_name(&self, name: &str) -> Result<Option<PlayerStatLine>, DomainError> {
        let players = self.players.read().await;
        Ok(players.iter().find(|p| p.name_matches(name)).cloned())
    }

    async fn insert(&self, player: &PlayerStatLine) -> Result<(), DomainError> {
        self.players.write().await.push(player.clone());
        Ok(())
    }

    async fn update_stats(&self, id: PlayerId, patch: &StatPatch) -> Result<(), DomainError> {
        let mut players = self.players.write().await;
        match players.iter_mut().find(|p| p.id() == id) {
            Some(player) => {
                player.apply_patch(patch);
                Ok(())
            }
            None => Err(DomainError::new(
                ErrorCode::PlayerNotFound,
                format!("Player {} not found", id),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::chat::{ContextTag, ExtractedUpdate, UpdateSemantics};

    fn update_for(name: &str, goals: Option<u32>) -> ExtractedUpdate {
        ExtractedUpdate {
            player_name: name.to_string(),
            goals,
            assists: None,
            saves: None,
            matches_played: None,
            confidence: 0.9,
            update_semantics: UpdateSemantics::Increment,
            context_tag: ContextTag::Normal,
            reasoning: None,
        }
    }

    #[tokio::test]
    async fn find_by_name_is_case_insensitive_substring() {
        let store = InMemoryPlayerStore::new();
        let ana = PlayerStatLine::provision("Ana García", &update_for("Ana García", None)).unwrap();
        store.seed(ana).await;

        let found = store.find_by_name("ana").await.unwrap();
        assert!(found.is_some());
        assert_eq!(found.unwrap().name(), "Ana García");

        assert!(store.find_by_name("luis").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn first_match_wins_in_insertion_order() {
        let store = InMemoryPlayerStore::new();
        store
            .seed(PlayerStatLine::provision("Ana", &update_for("Ana", None)).unwrap())
            .await;
        store
            .seed(PlayerStatLine::provision("Anabel", &update_for("Anabel", None)).unwrap())
            .await;

        let found = store.find_by_name("Ana").await.unwrap().unwrap();
        assert_eq!(found.name(), "Ana");
    }

    #[tokio::test]
    async fn update_stats_applies_patch() {
        let store = InMemoryPlayerStore::new();
        let player = PlayerStatLine::provision("Ana", &update_for("Ana", Some(3))).unwrap();
        let id = player.id();
        store.seed(player).await;

        let patch = StatPatch {
            goals: Some(5),
            ..StatPatch::default()
        };
        store.update_stats(id, &patch).await.unwrap();

        let stored = store.find_by_name("Ana").await.unwrap().unwrap();
        assert_eq!(stored.goals(), 5);
    }

    #[tokio::test]
    async fn update_stats_for_unknown_id_errors() {
        let store = InMemoryPlayerStore::new();
        let result = store
            .update_stats(PlayerId::new(), &StatPatch::default())
            .await;
        assert!(result.is_err());
    }
}

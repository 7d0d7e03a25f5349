//! ResolveUpdates - Command handler that applies extracted updates to the
//! player store.
//!
//! Authorization lives here: a session may only mutate the stat line of the
//! player it is signed in as, and visitor sessions never mutate anything.
//! One failing player never aborts the rest of the batch; every rejected or
//! failed update is reported back in the result message.

use std::sync::Arc;

use crate::domain::chat::{AutoUpdateResult, ContextTag, ExtractedUpdate, SessionContext};
use crate::domain::foundation::DomainError;
use crate::domain::player::PlayerStatLine;
use crate::ports::PlayerStore;

/// Command to apply a batch of extracted updates.
#[derive(Debug, Clone)]
pub struct ResolveUpdatesCommand {
    pub updates: Vec<ExtractedUpdate>,
    pub session: SessionContext,
}

/// Handler that resolves extracted updates against stored players.
pub struct ResolveUpdatesHandler {
    players: Arc<dyn PlayerStore>,
}

impl ResolveUpdatesHandler {
    pub fn new(players: Arc<dyn PlayerStore>) -> Self {
        Self { players }
    }

    pub async fn handle(&self, cmd: ResolveUpdatesCommand) -> Result<AutoUpdateResult, DomainError> {
        if cmd.updates.is_empty() {
            return Ok(AutoUpdateResult::empty(
                "No se detectaron actualizaciones de estadísticas.",
            ));
        }

        if !cmd.session.can_update_stats {
            tracing::info!(
                author = %cmd.session.author_name,
                "rejected stat update from session without update rights"
            );
            return Ok(AutoUpdateResult::empty(
                "Solo los jugadores registrados pueden actualizar sus estadísticas.",
            ));
        }

        let mut updated_players = Vec::new();
        let mut applied_updates = Vec::new();
        let mut failures = Vec::new();

        for update in &cmd.updates {
            if !is_own_update(update, &cmd.session) {
                tracing::info!(
                    author = %cmd.session.author_name,
                    subject = %update.player_name,
                    "rejected stat update for another player"
                );
                failures.push(format!(
                    "{}: solo puedes actualizar tus propias estadísticas",
                    update.player_name.trim()
                ));
                continue;
            }

            match self.apply(update).await {
                Ok(name) => {
                    updated_players.push(name);
                    applied_updates.push(update.clone());
                }
                Err(error) => {
                    tracing::warn!(
                        subject = %update.player_name,
                        %error,
                        "failed to apply stat update"
                    );
                    failures.push(format!(
                        "Error actualizando {}: {}",
                        update.player_name.trim(),
                        error.message()
                    ));
                }
            }
        }

        // Every update either succeeded or produced a failure line, so an
        // empty success list guarantees a non-empty diagnostic.
        if updated_players.is_empty() {
            return Ok(AutoUpdateResult {
                success: false,
                updated_players,
                message: format!("❌ No se pudieron actualizar: {}", failures.join(", ")),
                updates: applied_updates,
            });
        }

        let verb = batch_verb(&applied_updates);
        let mut message = format!(
            "Estadísticas {} para: {}",
            verb,
            updated_players.join(", ")
        );
        if !failures.is_empty() {
            message.push_str(&format!(
                "\n⚠️ No se pudieron actualizar: {}",
                failures.join(", ")
            ));
        }

        Ok(AutoUpdateResult {
            success: true,
            updated_players,
            message,
            updates: applied_updates,
        })
    }

    /// Applies one update, provisioning the player if no record matches.
    async fn apply(&self, update: &ExtractedUpdate) -> Result<String, DomainError> {
        let subject = update.player_name.trim();

        match self.players.find_by_name(subject).await? {
            Some(player) => {
                let patch = player.patch_for(update);
                if !patch.is_empty() {
                    self.players.update_stats(player.id(), &patch).await?;
                }
                Ok(player.name().to_string())
            }
            None => {
                let player = PlayerStatLine::provision(subject, update)?;
                self.players.insert(&player).await?;
                tracing::info!(name = %player.name(), "provisioned new player from chat");
                Ok(player.name().to_string())
            }
        }
    }
}

/// A session may only update the player it is signed in as. Comparison is
/// trimmed and case-insensitive since chat names are typed by hand.
fn is_own_update(update: &ExtractedUpdate, session: &SessionContext) -> bool {
    update.player_name.trim().to_lowercase() == session.author_name.trim().to_lowercase()
}

/// Picks the summary verb from the first applied update's intent.
fn batch_verb(updates: &[ExtractedUpdate]) -> &'static str {
    match updates.first().map(|u| u.context_tag) {
        Some(ContextTag::Correction) => "corregidas",
        Some(ContextTag::Addition) => "incrementadas",
        Some(ContextTag::TotalUpdate) => "actualizadas (total)",
        _ => "actualizadas",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryPlayerStore;
    use crate::domain::chat::UpdateSemantics;
    use crate::domain::player::{Position, UNKNOWN_TEAM};

    fn update(
        name: &str,
        goals: Option<u32>,
        semantics: UpdateSemantics,
        tag: ContextTag,
    ) -> ExtractedUpdate {
        ExtractedUpdate {
            player_name: name.to_string(),
            goals,
            assists: None,
            saves: None,
            matches_played: None,
            confidence: 0.9,
            update_semantics: semantics,
            context_tag: tag,
            reasoning: None,
        }
    }

    async fn seeded_store(name: &str, goals: u32) -> (Arc<InMemoryPlayerStore>, ResolveUpdatesHandler) {
        let store = Arc::new(InMemoryPlayerStore::new());
        let mut player = PlayerStatLine::new(name, "Las Leonas", Position::Forward).unwrap();
        player.apply_patch(&crate::domain::player::StatPatch {
            goals: Some(goals),
            ..Default::default()
        });
        store.seed(player).await;
        let handler = ResolveUpdatesHandler::new(store.clone());
        (store, handler)
    }

    #[tokio::test]
    async fn increments_own_stats() {
        let (store, handler) = seeded_store("Ana", 3).await;

        let result = handler
            .handle(ResolveUpdatesCommand {
                updates: vec![update(
                    "Ana",
                    Some(2),
                    UpdateSemantics::Increment,
                    ContextTag::Addition,
                )],
                session: SessionContext::registered_player("Ana"),
            })
            .await
            .unwrap();

        assert!(result.success);
        assert_eq!(result.updated_players, vec!["Ana"]);
        assert!(result.message.contains("incrementadas"));

        let stored = store.find_by_name("Ana").await.unwrap().unwrap();
        assert_eq!(stored.goals(), 5);
    }

    #[tokio::test]
    async fn correction_replaces_only_mentioned_fields() {
        let (store, handler) = seeded_store("Ana", 3).await;

        let mut upd = update("Ana", None, UpdateSemantics::Correct, ContextTag::Correction);
        upd.assists = Some(1);

        let result = handler
            .handle(ResolveUpdatesCommand {
                updates: vec![upd],
                session: SessionContext::registered_player("Ana"),
            })
            .await
            .unwrap();

        assert!(result.success);
        assert!(result.message.contains("corregidas"));

        let stored = store.find_by_name("Ana").await.unwrap().unwrap();
        assert_eq!(stored.goals(), 3);
        assert_eq!(stored.assists(), 1);
    }

    #[tokio::test]
    async fn visitors_never_mutate() {
        let (store, handler) = seeded_store("Ana", 3).await;

        let result = handler
            .handle(ResolveUpdatesCommand {
                updates: vec![update(
                    "Ana",
                    Some(10),
                    UpdateSemantics::Replace,
                    ContextTag::TotalUpdate,
                )],
                session: SessionContext::visitor("Ana"),
            })
            .await
            .unwrap();

        assert!(!result.success);
        assert!(result.updated_players.is_empty());

        let stored = store.find_by_name("Ana").await.unwrap().unwrap();
        assert_eq!(stored.goals(), 3);
    }

    #[tokio::test]
    async fn cannot_update_someone_elses_stats() {
        let (store, handler) = seeded_store("Ana", 3).await;

        let result = handler
            .handle(ResolveUpdatesCommand {
                updates: vec![update(
                    "Ana",
                    Some(10),
                    UpdateSemantics::Replace,
                    ContextTag::TotalUpdate,
                )],
                session: SessionContext::registered_player("Carlos"),
            })
            .await
            .unwrap();

        assert!(!result.success);
        assert!(result.message.contains("propias"));

        let stored = store.find_by_name("Ana").await.unwrap().unwrap();
        assert_eq!(stored.goals(), 3);
    }

    #[tokio::test]
    async fn author_comparison_ignores_case_and_whitespace() {
        let (store, handler) = seeded_store("Ana", 0).await;

        let result = handler
            .handle(ResolveUpdatesCommand {
                updates: vec![update(
                    " ana ",
                    Some(1),
                    UpdateSemantics::Increment,
                    ContextTag::Addition,
                )],
                session: SessionContext::registered_player("Ana"),
            })
            .await
            .unwrap();

        assert!(result.success);
        let stored = store.find_by_name("Ana").await.unwrap().unwrap();
        assert_eq!(stored.goals(), 1);
    }

    #[tokio::test]
    async fn provisions_unknown_player_with_defaults() {
        let store = Arc::new(InMemoryPlayerStore::new());
        let handler = ResolveUpdatesHandler::new(store.clone());

        let result = handler
            .handle(ResolveUpdatesCommand {
                updates: vec![update(
                    "Carlos",
                    Some(2),
                    UpdateSemantics::Increment,
                    ContextTag::Addition,
                )],
                session: SessionContext::registered_player("Carlos"),
            })
            .await
            .unwrap();

        assert!(result.success);

        let stored = store.find_by_name("Carlos").await.unwrap().unwrap();
        assert_eq!(stored.goals(), 2);
        assert_eq!(stored.team(), UNKNOWN_TEAM);
        assert_eq!(stored.position(), Position::Forward);
    }

    #[tokio::test]
    async fn empty_batch_is_a_no_op() {
        let (_, handler) = seeded_store("Ana", 3).await;

        let result = handler
            .handle(ResolveUpdatesCommand {
                updates: vec![],
                session: SessionContext::registered_player("Ana"),
            })
            .await
            .unwrap();

        assert!(!result.success);
        assert!(result.message.contains("No se detectaron"));
    }

    /// Store whose reads succeed but whose writes always fail.
    struct BrokenPlayerStore {
        player: PlayerStatLine,
    }

    #[async_trait::async_trait]
    impl PlayerStore for BrokenPlayerStore {
        async fn find_by_name(
            &self,
            _name: &str,
        ) -> Result<Option<PlayerStatLine>, crate::domain::foundation::DomainError> {
            Ok(Some(self.player.clone()))
        }

        async fn insert(
            &self,
            _player: &PlayerStatLine,
        ) -> Result<(), crate::domain::foundation::DomainError> {
            Err(crate::domain::foundation::DomainError::new(
                crate::domain::foundation::ErrorCode::DatabaseError,
                "conexión perdida",
            ))
        }

        async fn update_stats(
            &self,
            _id: crate::domain::foundation::PlayerId,
            _patch: &crate::domain::player::StatPatch,
        ) -> Result<(), crate::domain::foundation::DomainError> {
            Err(crate::domain::foundation::DomainError::new(
                crate::domain::foundation::ErrorCode::DatabaseError,
                "conexión perdida",
            ))
        }
    }

    #[tokio::test]
    async fn store_failure_is_reported_per_player() {
        let player = PlayerStatLine::new("Ana", "Las Leonas", Position::Forward).unwrap();
        let handler = ResolveUpdatesHandler::new(Arc::new(BrokenPlayerStore { player }));

        let result = handler
            .handle(ResolveUpdatesCommand {
                updates: vec![update(
                    "Ana",
                    Some(2),
                    UpdateSemantics::Increment,
                    ContextTag::Addition,
                )],
                session: SessionContext::registered_player("Ana"),
            })
            .await
            .unwrap();

        assert!(!result.success);
        assert!(result.message.contains("❌ No se pudieron actualizar"));
        assert!(result.message.contains("Error actualizando Ana"));
        assert!(result.message.contains("conexión perdida"));
    }

    #[tokio::test]
    async fn mixed_batch_reports_rejected_updates_alongside_successes() {
        let (store, handler) = seeded_store("Ana", 3).await;

        let result = handler
            .handle(ResolveUpdatesCommand {
                updates: vec![
                    update("Ana", Some(2), UpdateSemantics::Increment, ContextTag::Addition),
                    update("Carlos", Some(1), UpdateSemantics::Increment, ContextTag::Addition),
                ],
                session: SessionContext::registered_player("Ana"),
            })
            .await
            .unwrap();

        assert!(result.success);
        assert_eq!(result.updated_players, vec!["Ana"]);
        assert!(result.message.contains("Estadísticas incrementadas para: Ana"));
        assert!(result.message.contains("⚠️ No se pudieron actualizar"));
        assert!(result.message.contains("Carlos: solo puedes actualizar tus propias"));

        // The rejected subject is never provisioned.
        assert!(store.find_by_name("Carlos").await.unwrap().is_none());
        assert_eq!(store.find_by_name("Ana").await.unwrap().unwrap().goals(), 5);
    }

    #[tokio::test]
    async fn total_update_replaces_values() {
        let (store, handler) = seeded_store("Ana", 3).await;

        let mut upd = update("Ana", Some(10), UpdateSemantics::Replace, ContextTag::TotalUpdate);
        upd.matches_played = Some(15);

        let result = handler
            .handle(ResolveUpdatesCommand {
                updates: vec![upd],
                session: SessionContext::registered_player("Ana"),
            })
            .await
            .unwrap();

        assert!(result.message.contains("actualizadas (total)"));

        let stored = store.find_by_name("Ana").await.unwrap().unwrap();
        assert_eq!(stored.goals(), 10);
        assert_eq!(stored.matches_played(), 15);
    }
}

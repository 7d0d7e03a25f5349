//! Property-based tests for update semantics.
//!
//! Each property drives the real pipeline (classifier, extractor, resolver)
//! through the in-memory stores with generated counter values and checks the
//! merge-semantics invariants:
//!
//! - cumulative totals replace exactly the mentioned fields
//! - match-event language increments
//! - replace-semantics updates are idempotent
//! - visitor sessions never mutate anything

use std::sync::Arc;

use proptest::prelude::*;

use liga_stats::adapters::ai::MockAIProvider;
use liga_stats::adapters::memory::{InMemoryChatStore, InMemoryPlayerStore};
use liga_stats::application::{
    ProcessMessageCommand, ProcessMessageHandler, ResolveUpdatesHandler,
};
use liga_stats::domain::chat::SessionContext;
use liga_stats::domain::player::{PlayerStatLine, Position, StatPatch};
use liga_stats::ports::PlayerStore;

const SEED_GOALS: u32 = 5;
const SEED_ASSISTS: u32 = 4;
const SEED_SAVES: u32 = 2;
const SEED_MATCHES: u32 = 12;

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

struct Pipeline {
    players: Arc<InMemoryPlayerStore>,
    handler: ProcessMessageHandler,
}

async fn seeded_pipeline() -> Pipeline {
    let chat = Arc::new(InMemoryChatStore::new());
    let players = Arc::new(InMemoryPlayerStore::new());

    let mut ana = PlayerStatLine::new("Ana", "Las Leonas", Position::Forward).unwrap();
    ana.apply_patch(&StatPatch {
        goals: Some(SEED_GOALS),
        assists: Some(SEED_ASSISTS),
        saves: Some(SEED_SAVES),
        matches_played: Some(SEED_MATCHES),
    });
    players.seed(ana).await;

    let resolver = ResolveUpdatesHandler::new(players.clone());
    let handler = ProcessMessageHandler::new(chat, Arc::new(MockAIProvider::new()), resolver);
    Pipeline { players, handler }
}

async fn send(p: &Pipeline, session: SessionContext, body: String) {
    p.handler
        .handle(ProcessMessageCommand { body, session })
        .await
        .unwrap();
}

async fn ana(p: &Pipeline) -> PlayerStatLine {
    p.players.find_by_name("Ana").await.unwrap().unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn cumulative_total_replaces_exactly_the_mentioned_fields(
        goals in 1u32..100,
        matches in 1u32..100,
    ) {
        runtime().block_on(async {
            let p = seeded_pipeline().await;
            send(
                &p,
                SessionContext::registered_player("Ana"),
                format!("Llevo {} goles en {} partidos", goals, matches),
            )
            .await;

            let stored = ana(&p).await;
            prop_assert_eq!(stored.goals(), goals);
            prop_assert_eq!(stored.matches_played(), matches);
            prop_assert_eq!(stored.assists(), SEED_ASSISTS);
            prop_assert_eq!(stored.saves(), SEED_SAVES);
            Ok(())
        })?;
    }

    #[test]
    fn match_event_language_increments(goals in 1u32..100) {
        runtime().block_on(async {
            let p = seeded_pipeline().await;
            send(
                &p,
                SessionContext::registered_player("Ana"),
                format!("Hice {} goles hoy", goals),
            )
            .await;

            let stored = ana(&p).await;
            prop_assert_eq!(stored.goals(), SEED_GOALS + goals);
            prop_assert_eq!(stored.assists(), SEED_ASSISTS);
            Ok(())
        })?;
    }

    #[test]
    fn repeating_a_total_statement_is_idempotent(
        goals in 1u32..100,
        matches in 1u32..100,
    ) {
        runtime().block_on(async {
            let p = seeded_pipeline().await;
            let body = format!("Llevo {} goles en {} partidos", goals, matches);

            send(&p, SessionContext::registered_player("Ana"), body.clone()).await;
            let once = ana(&p).await;

            send(&p, SessionContext::registered_player("Ana"), body).await;
            let twice = ana(&p).await;

            prop_assert_eq!(once.goals(), twice.goals());
            prop_assert_eq!(once.matches_played(), twice.matches_played());
            prop_assert_eq!(once.assists(), twice.assists());
            Ok(())
        })?;
    }

    #[test]
    fn visitor_sessions_never_mutate(goals in 1u32..100) {
        runtime().block_on(async {
            let p = seeded_pipeline().await;
            send(
                &p,
                SessionContext::visitor("Ana"),
                format!("Llevo {} goles", goals),
            )
            .await;

            let stored = ana(&p).await;
            prop_assert_eq!(stored.goals(), SEED_GOALS);
            prop_assert_eq!(stored.assists(), SEED_ASSISTS);
            prop_assert_eq!(stored.saves(), SEED_SAVES);
            prop_assert_eq!(stored.matches_played(), SEED_MATCHES);
            Ok(())
        })?;
    }

    #[test]
    fn increments_never_drive_counters_negative(
        deltas in proptest::collection::vec(1u32..50, 1..5),
    ) {
        runtime().block_on(async {
            let p = seeded_pipeline().await;
            let mut expected = SEED_GOALS;
            for delta in deltas {
                send(
                    &p,
                    SessionContext::registered_player("Ana"),
                    format!("Hice {} goles hoy", delta),
                )
                .await;
                expected += delta;
            }

            let stored = ana(&p).await;
            prop_assert_eq!(stored.goals(), expected);
            Ok(())
        })?;
    }

    #[test]
    fn saves_survive_goal_only_updates(goals in 1u32..100, saves in 1u32..100) {
        runtime().block_on(async {
            let p = seeded_pipeline().await;
            send(
                &p,
                SessionContext::registered_player("Ana"),
                format!("Llevo {} atajadas en total", saves),
            )
            .await;
            send(
                &p,
                SessionContext::registered_player("Ana"),
                format!("Hice {} goles hoy", goals),
            )
            .await;

            let stored = ana(&p).await;
            prop_assert_eq!(stored.saves(), saves);
            prop_assert_eq!(stored.goals(), SEED_GOALS + goals);
            Ok(())
        })?;
    }
}

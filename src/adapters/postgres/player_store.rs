//! PostgreSQL implementation of PlayerStore.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::foundation::{DomainError, ErrorCode, PlayerId, Timestamp};
use crate::domain::player::{PlayerStatLine, Position, StatPatch};
use crate::ports::PlayerStore;

/// PostgreSQL implementation of PlayerStore.
#[derive(Clone)]
pub struct PostgresPlayerStore {
    pool: PgPool,
}

impl PostgresPlayerStore {
    /// Creates a new PostgresPlayerStore.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PlayerStore for PostgresPlayerStore {
    async fn find_by_name(&self, name: &str) -> Result<Option<PlayerStatLine>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, name, team, position, goals, assists, saves,
                   matches_played, mvp_count, card_theme, created_at
            FROM players
            WHERE name ILIKE '%' || $1 || '%'
            ORDER BY created_at ASC
            LIMIT 1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to fetch player by name: {}", e),
            )
        })?;

        match row {
            Some(row) => Ok(Some(row_to_player(row)?)),
            None => Ok(None),
        }
    }

    async fn insert(&self, player: &PlayerStatLine) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO players (
                id, name, team, position, goals, assists, saves,
                matches_played, mvp_count, card_theme, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(player.id().as_uuid())
        .bind(player.name())
        .bind(player.team())
        .bind(player.position().to_string())
        .bind(player.goals() as i32)
        .bind(player.assists() as i32)
        .bind(player.saves() as i32)
        .bind(player.matches_played() as i32)
        .bind(player.mvp_count() as i32)
        .bind(player.card_theme())
        .bind(player.created_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to insert player: {}", e),
            )
        })?;

        Ok(())
    }

    async fn update_stats(&self, id: PlayerId, patch: &StatPatch) -> Result<(), DomainError> {
        if patch.is_empty() {
            return Ok(());
        }

        // COALESCE keeps columns the patch does not mention untouched, so
        // concurrent updates to disjoint fields never clobber each other.
        let result = sqlx::query(
            r#"
            UPDATE players SET
                goals = COALESCE($2, goals),
                assists = COALESCE($3, assists),
                saves = COALESCE($4, saves),
                matches_played = COALESCE($5, matches_played)
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .bind(patch.goals.map(|v| v as i32))
        .bind(patch.assists.map(|v| v as i32))
        .bind(patch.saves.map(|v| v as i32))
        .bind(patch.matches_played.map(|v| v as i32))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to update player stats: {}", e),
            )
        })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::PlayerNotFound,
                format!("Player not found: {}", id),
            ));
        }

        Ok(())
    }
}

fn row_to_player(row: sqlx::postgres::PgRow) -> Result<PlayerStatLine, DomainError> {
    let db_error = |e: sqlx::Error| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Failed to read player row: {}", e),
        )
    };

    let id: uuid::Uuid = row.try_get("id").map_err(db_error)?;
    let name: String = row.try_get("name").map_err(db_error)?;
    let team: String = row.try_get("team").map_err(db_error)?;
    let position_str: String = row.try_get("position").map_err(db_error)?;
    let goals: i32 = row.try_get("goals").map_err(db_error)?;
    let assists: i32 = row.try_get("assists").map_err(db_error)?;
    let saves: i32 = row.try_get("saves").map_err(db_error)?;
    let matches_played: i32 = row.try_get("matches_played").map_err(db_error)?;
    let mvp_count: i32 = row.try_get("mvp_count").map_err(db_error)?;
    let card_theme: String = row.try_get("card_theme").map_err(db_error)?;
    let created_at: chrono::DateTime<chrono::Utc> = row.try_get("created_at").map_err(db_error)?;

    let position: Position = position_str.parse().map_err(|e| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid position in player row: {}", e),
        )
    })?;

    Ok(PlayerStatLine::reconstitute(
        PlayerId::from_uuid(id),
        name,
        team,
        position,
        goals.max(0) as u32,
        assists.max(0) as u32,
        saves.max(0) as u32,
        matches_played.max(0) as u32,
        mvp_count.max(0) as u32,
        card_theme,
        Timestamp::from_datetime(created_at),
    ))
}

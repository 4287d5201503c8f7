use crate::models::Character;
use sqlx::postgres::PgArguments;
use sqlx::query::Query;
use sqlx::{PgPool, Postgres};

pub struct CharacterRepository {
    pool: PgPool,
}

impl CharacterRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<Character>, sqlx::Error> {
        sqlx::query_as::<_, Character>("SELECT * FROM characters WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn get_by_name(&self, name: &str) -> Result<Option<Character>, sqlx::Error> {
        sqlx::query_as::<_, Character>("SELECT * FROM characters WHERE LOWER(name) = LOWER($1)")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn get_all(&self) -> Result<Vec<Character>, sqlx::Error> {
        sqlx::query_as::<_, Character>("SELECT * FROM characters ORDER BY name")
            .fetch_all(&self.pool)
            .await
    }

    pub async fn upsert(&self, character: &Character) -> Result<(), sqlx::Error> {
        upsert_query(character).execute(&self.pool).await?;
        Ok(())
    }
}

/// Insert-or-update for one character row. Shared with the completion
/// transaction so both paths write the same columns.
pub(crate) fn upsert_query(character: &Character) -> Query<'_, Postgres, PgArguments> {
    sqlx::query(
        "INSERT INTO characters (
            id, name, is_admin, strength, agility, charisma, endurance,
            health, level, experience, points, game_over, last_daily_check,
            created_at, updated_at
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
        ON CONFLICT (id) DO UPDATE SET
            name = EXCLUDED.name,
            is_admin = EXCLUDED.is_admin,
            strength = EXCLUDED.strength,
            agility = EXCLUDED.agility,
            charisma = EXCLUDED.charisma,
            endurance = EXCLUDED.endurance,
            health = EXCLUDED.health,
            level = EXCLUDED.level,
            experience = EXCLUDED.experience,
            points = EXCLUDED.points,
            game_over = EXCLUDED.game_over,
            last_daily_check = EXCLUDED.last_daily_check,
            updated_at = EXCLUDED.updated_at",
    )
    .bind(&character.id)
    .bind(&character.name)
    .bind(character.is_admin)
    .bind(character.stats.strength)
    .bind(character.stats.agility)
    .bind(character.stats.charisma)
    .bind(character.stats.endurance)
    .bind(character.health)
    .bind(character.level)
    .bind(character.experience)
    .bind(character.points)
    .bind(character.game_over)
    .bind(character.last_daily_check)
    .bind(character.created_at)
    .bind(character.updated_at)
}

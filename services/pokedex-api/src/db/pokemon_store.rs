//! Postgres-backed Pokemon store.
//!
//! Uniqueness of `name` and `no` is enforced by the `pokemon_name_key` and
//! `pokemon_no_key` constraints; violations are classified from the
//! Postgres unique-violation error and its constraint name.

use async_trait::async_trait;
use pokedex_id::ObjectId;
use sqlx::{postgres::PgPool, postgres::PgRow, Postgres, QueryBuilder, Row};
use tracing::debug;

use crate::pokemon::{Pokemon, PokemonStore, StoreError, UniqueField, UpdatePokemon};

const NAME_CONSTRAINT: &str = "pokemon_name_key";
const NO_CONSTRAINT: &str = "pokemon_no_key";

/// Row wrapper so `Pokemon` itself stays free of sqlx.
struct PokemonRow(Pokemon);

impl<'r> sqlx::FromRow<'r, PgRow> for PokemonRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let id = ObjectId::parse(id.trim()).map_err(|e| sqlx::Error::ColumnDecode {
            index: "id".to_string(),
            source: Box::new(e),
        })?;

        Ok(Self(Pokemon {
            id,
            name: row.try_get("name")?,
            no: row.try_get("no")?,
        }))
    }
}

/// Map a unique constraint name to the field it protects.
fn field_for_constraint(constraint: &str) -> Option<UniqueField> {
    match constraint {
        NAME_CONSTRAINT => Some(UniqueField::Name),
        NO_CONSTRAINT => Some(UniqueField::No),
        _ => None,
    }
}

/// Classify a sqlx error into a store error.
fn classify(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            if let Some(field) = db_err.constraint().and_then(field_for_constraint) {
                return StoreError::Duplicate(field);
            }
        }
    }
    StoreError::Backend(err.to_string())
}

/// Store for Pokemon records in Postgres.
#[derive(Clone)]
pub struct PgPokemonStore {
    pool: PgPool,
}

impl PgPokemonStore {
    /// Create a new Pokemon store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PokemonStore for PgPokemonStore {
    async fn insert(&self, pokemon: &Pokemon) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO pokemon (id, name, "no")
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(pokemon.id.to_string())
        .bind(&pokemon.name)
        .bind(pokemon.no)
        .execute(&self.pool)
        .await
        .map_err(classify)?;

        debug!(id = %pokemon.id, "Inserted pokemon");
        Ok(())
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Pokemon>, StoreError> {
        let row = sqlx::query_as::<_, PokemonRow>(
            r#"
            SELECT id, name, "no"
            FROM pokemon
            WHERE id = $1
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(classify)?;

        Ok(row.map(|PokemonRow(pokemon)| pokemon))
    }

    async fn find_page(&self, limit: u32, skip: u64) -> Result<Vec<Pokemon>, StoreError> {
        let rows = sqlx::query_as::<_, PokemonRow>(
            r#"
            SELECT id, name, "no"
            FROM pokemon
            ORDER BY "no" ASC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(i64::from(limit))
        .bind(i64::try_from(skip).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await
        .map_err(classify)?;

        Ok(rows.into_iter().map(|PokemonRow(pokemon)| pokemon).collect())
    }

    async fn count(&self) -> Result<u64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM pokemon")
            .fetch_one(&self.pool)
            .await
            .map_err(classify)?;
        Ok(count.max(0) as u64)
    }

    async fn update_by_id(
        &self,
        id: &ObjectId,
        patch: &UpdatePokemon,
    ) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE pokemon
            SET name = COALESCE($2, name),
                "no" = COALESCE($3, "no"),
                version = version + 1
            WHERE id = $1
            "#,
        )
        .bind(id.to_string())
        .bind(patch.name.as_deref())
        .bind(patch.no)
        .execute(&self.pool)
        .await
        .map_err(classify)?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_by_id(&self, id: &ObjectId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM pokemon WHERE id = $1")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(classify)?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_all(&self) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM pokemon")
            .execute(&self.pool)
            .await
            .map_err(classify)?;

        Ok(result.rows_affected())
    }

    async fn insert_many(&self, pokemon: &[Pokemon]) -> Result<(), StoreError> {
        if pokemon.is_empty() {
            return Ok(());
        }

        let mut builder = QueryBuilder::<Postgres>::new(r#"INSERT INTO pokemon (id, name, "no") "#);
        builder.push_values(pokemon, |mut row, p| {
            row.push_bind(p.id.to_string())
                .push_bind(p.name.clone())
                .push_bind(p.no);
        });

        builder
            .build()
            .execute(&self.pool)
            .await
            .map_err(classify)?;

        debug!(count = pokemon.len(), "Inserted pokemon batch");
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(classify)?;
        Ok(())
    }
}

//! SQLite composition store
//!
//! One row per composition. Selections and quantity maps are JSON text
//! columns; timestamps are fixed-width RFC 3339 text so `ORDER BY
//! updated_at` is chronological.

use std::path::Path;

use async_trait::async_trait;
use sqlx::sqlite::{SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use tracing::{debug, info};
use uuid::Uuid;

use super::CompositionStore;
use crate::composition::SavedDrink;
use crate::model::{DrinkKind, Rim};
use crate::{time, uuid_utils, Error, Result};

/// Open (creating if needed) the database at `db_path` and ensure the schema
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    sqlx::query("PRAGMA journal_mode = WAL").execute(&pool).await?;
    sqlx::query("PRAGMA busy_timeout = 5000").execute(&pool).await?;

    create_compositions_table(&pool).await?;

    Ok(pool)
}

/// Idempotent schema creation
pub async fn create_compositions_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS compositions (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            kind TEXT NOT NULL CHECK (kind IN ('cocktail', 'mocktail')),
            notes TEXT NOT NULL DEFAULT '',
            rim TEXT NOT NULL DEFAULT 'None',
            spirits TEXT NOT NULL DEFAULT '[]',
            na_bases TEXT NOT NULL DEFAULT '[]',
            mixers TEXT NOT NULL DEFAULT '[]',
            liqueurs TEXT NOT NULL DEFAULT '[]',
            garnishes TEXT NOT NULL DEFAULT '[]',
            shots_per_spirit TEXT NOT NULL DEFAULT '{}',
            parts_per_base TEXT NOT NULL DEFAULT '{}',
            parts_per_mixer TEXT NOT NULL DEFAULT '{}',
            parts_per_liqueur TEXT NOT NULL DEFAULT '{}',
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_compositions_updated_at ON compositions(updated_at DESC)",
    )
    .execute(pool)
    .await?;

    Ok(())
}

#[derive(Debug, Clone)]
pub struct SqliteCompositionStore {
    pool: SqlitePool,
}

impl SqliteCompositionStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open the database file and wrap it in a store
    pub async fn open(db_path: &Path) -> Result<Self> {
        Ok(Self::new(init_database(db_path).await?))
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

const SELECT_COLUMNS: &str = "id, name, kind, notes, rim, spirits, na_bases, mixers, liqueurs, \
     garnishes, shots_per_spirit, parts_per_base, parts_per_mixer, parts_per_liqueur, \
     created_at, updated_at";

fn record_from_row(row: &SqliteRow) -> Result<SavedDrink> {
    let id: String = row.try_get("id")?;
    let kind: String = row.try_get("kind")?;
    let rim: String = row.try_get("rim")?;
    let created_at: String = row.try_get("created_at")?;
    let updated_at: String = row.try_get("updated_at")?;

    let json_column = |column: &str| -> Result<String> { Ok(row.try_get::<String, _>(column)?) };
    let timestamp = |column: &str, text: &str| {
        time::parse_sortable(text)
            .map_err(|e| Error::InvalidInput(format!("bad {column} for composition {id}: {e}")))
    };

    Ok(SavedDrink {
        id: uuid_utils::parse(&id)
            .map_err(|e| Error::InvalidInput(format!("bad composition id {id:?}: {e}")))?,
        name: row.try_get("name")?,
        kind: kind.parse::<DrinkKind>().map_err(Error::InvalidInput)?,
        notes: row.try_get("notes")?,
        rim: Rim::from_label(&rim),
        spirits: serde_json::from_str(&json_column("spirits")?)?,
        na_bases: serde_json::from_str(&json_column("na_bases")?)?,
        mixers: serde_json::from_str(&json_column("mixers")?)?,
        liqueurs: serde_json::from_str(&json_column("liqueurs")?)?,
        garnishes: serde_json::from_str(&json_column("garnishes")?)?,
        shots_per_spirit: serde_json::from_str(&json_column("shots_per_spirit")?)?,
        parts_per_base: serde_json::from_str(&json_column("parts_per_base")?)?,
        parts_per_mixer: serde_json::from_str(&json_column("parts_per_mixer")?)?,
        parts_per_liqueur: serde_json::from_str(&json_column("parts_per_liqueur")?)?,
        created_at: timestamp("created_at", &created_at)?,
        updated_at: timestamp("updated_at", &updated_at)?,
    })
}

/// Column values shared by insert and update, in `SELECT_COLUMNS` order after `id`
struct Columns {
    name: String,
    kind: &'static str,
    notes: String,
    rim: &'static str,
    json: [String; 9],
    created_at: String,
    updated_at: String,
}

impl Columns {
    fn from_record(record: &SavedDrink) -> Result<Self> {
        Ok(Self {
            name: record.name.clone(),
            kind: record.kind.as_str(),
            notes: record.notes.clone(),
            rim: record.rim.label(),
            json: [
                serde_json::to_string(&record.spirits)?,
                serde_json::to_string(&record.na_bases)?,
                serde_json::to_string(&record.mixers)?,
                serde_json::to_string(&record.liqueurs)?,
                serde_json::to_string(&record.garnishes)?,
                serde_json::to_string(&record.shots_per_spirit)?,
                serde_json::to_string(&record.parts_per_base)?,
                serde_json::to_string(&record.parts_per_mixer)?,
                serde_json::to_string(&record.parts_per_liqueur)?,
            ],
            created_at: time::to_sortable(&record.created_at),
            updated_at: time::to_sortable(&record.updated_at),
        })
    }
}

#[async_trait]
impl CompositionStore for SqliteCompositionStore {
    async fn create(&self, record: &SavedDrink) -> Result<()> {
        let c = Columns::from_record(record)?;
        let [spirits, na_bases, mixers, liqueurs, garnishes, shots, base_parts, mixer_parts, liqueur_parts] =
            c.json;

        let result = sqlx::query(
            r#"
            INSERT INTO compositions (
                id, name, kind, notes, rim, spirits, na_bases, mixers, liqueurs, garnishes,
                shots_per_spirit, parts_per_base, parts_per_mixer, parts_per_liqueur,
                created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO NOTHING
            "#,
        )
        .bind(record.id.to_string())
        .bind(c.name)
        .bind(c.kind)
        .bind(c.notes)
        .bind(c.rim)
        .bind(spirits)
        .bind(na_bases)
        .bind(mixers)
        .bind(liqueurs)
        .bind(garnishes)
        .bind(shots)
        .bind(base_parts)
        .bind(mixer_parts)
        .bind(liqueur_parts)
        .bind(c.created_at)
        .bind(c.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(Error::Conflict(format!("composition {} already exists", record.id)));
        }
        debug!(id = %record.id, "Inserted composition");
        Ok(())
    }

    async fn update(&self, record: &SavedDrink) -> Result<()> {
        let c = Columns::from_record(record)?;
        let [spirits, na_bases, mixers, liqueurs, garnishes, shots, base_parts, mixer_parts, liqueur_parts] =
            c.json;

        let result = sqlx::query(
            r#"
            UPDATE compositions SET
                name = ?, kind = ?, notes = ?, rim = ?,
                spirits = ?, na_bases = ?, mixers = ?, liqueurs = ?, garnishes = ?,
                shots_per_spirit = ?, parts_per_base = ?, parts_per_mixer = ?, parts_per_liqueur = ?,
                created_at = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(c.name)
        .bind(c.kind)
        .bind(c.notes)
        .bind(c.rim)
        .bind(spirits)
        .bind(na_bases)
        .bind(mixers)
        .bind(liqueurs)
        .bind(garnishes)
        .bind(shots)
        .bind(base_parts)
        .bind(mixer_parts)
        .bind(liqueur_parts)
        .bind(c.created_at)
        .bind(c.updated_at)
        .bind(record.id.to_string())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("composition {}", record.id)));
        }
        debug!(id = %record.id, "Updated composition");
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM compositions WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("composition {id}")));
        }
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<SavedDrink>> {
        let query = format!("SELECT {SELECT_COLUMNS} FROM compositions WHERE id = ?");
        let row = sqlx::query(&query)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(record_from_row).transpose()
    }

    async fn list_all(&self) -> Result<Vec<SavedDrink>> {
        let query = format!("SELECT {SELECT_COLUMNS} FROM compositions ORDER BY updated_at DESC, id ASC");
        let rows = sqlx::query(&query).fetch_all(&self.pool).await?;

        rows.iter().map(record_from_row).collect()
    }

    async fn delete_all(&self) -> Result<usize> {
        let result = sqlx::query("DELETE FROM compositions")
            .execute(&self.pool)
            .await?;
        let count = result.rows_affected() as usize;
        info!(count, "Deleted all compositions");
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composition::Composition;
    use crate::model::{Category, PresetDrink};

    async fn memory_store() -> SqliteCompositionStore {
        // Single connection: every new in-memory connection is a fresh database
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        create_compositions_table(&pool).await.unwrap();
        SqliteCompositionStore::new(pool)
    }

    fn negroni() -> SavedDrink {
        let preset = PresetDrink::new("Negroni", DrinkKind::Cocktail, None);
        let mut c = Composition::create_from(&preset);
        c.toggle(Category::Spirit, "Gin").unwrap();
        c.set_quantity(Category::Spirit, "Gin", 2).unwrap();
        c.toggle(Category::Liqueur, "Campari").unwrap();
        c.set_rim(Rim::Sugar);
        c.set_notes("stirred, not shaken");
        c.to_record()
    }

    #[tokio::test]
    async fn test_create_then_get_round_trips() {
        let store = memory_store().await;
        let record = negroni();
        store.create(&record).await.unwrap();

        let loaded = store.get(record.id).await.unwrap().unwrap();
        assert_eq!(loaded, record);
    }

    #[tokio::test]
    async fn test_get_unknown_is_none() {
        let store = memory_store().await;
        assert!(store.get(uuid_utils::generate()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_conflict_and_update_not_found() {
        let store = memory_store().await;
        let record = negroni();
        assert!(matches!(store.update(&record).await, Err(Error::NotFound(_))));
        store.create(&record).await.unwrap();
        assert!(matches!(store.create(&record).await, Err(Error::Conflict(_))));
    }

    #[tokio::test]
    async fn test_unknown_rim_label_reads_as_none() {
        let store = memory_store().await;
        let record = negroni();
        store.create(&record).await.unwrap();
        sqlx::query("UPDATE compositions SET rim = 'Cinnamon Rim'")
            .execute(store.pool())
            .await
            .unwrap();

        let loaded = store.get(record.id).await.unwrap().unwrap();
        assert_eq!(loaded.rim, Rim::None);
    }
}

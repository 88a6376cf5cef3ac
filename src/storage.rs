use crate::dlog;
use crate::types::{Coords, Metrics, Workout, WorkoutId, WorkoutKind};
use anyhow::{Context, Result, bail};
use chrono::{DateTime, Local};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::path::Path;

/// String key/value store that survives restarts.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Local store backed by a single SQLite table.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self> {
        let display = path.display();
        let conn =
            Connection::open(path).with_context(|| format!("Opening SQLite DB: {display}"))?;
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Opening in-memory SQLite DB")?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        if !table_exists(&conn, "local_storage")? {
            tracing::info!("creating local_storage table");
            conn.execute_batch(
                r"
                CREATE TABLE local_storage (
                  key    TEXT PRIMARY KEY,
                  value  TEXT NOT NULL
                );
                ",
            )
            .context("Creating local_storage table")?;
        }
        Ok(Self { conn })
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT value FROM local_storage WHERE key = ?1")?;
        let mut rows = stmt.query([key])?;
        match rows.next()? {
            Some(row) => Ok(Some(row.get(0)?)),
            None => Ok(None),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.conn
            .execute(
                r"
                INSERT INTO local_storage (key, value) VALUES (?1, ?2)
                ON CONFLICT (key) DO UPDATE SET value = excluded.value
                ",
                [key, value],
            )
            .with_context(|| format!("Writing local storage key {key:?}"))?;
        Ok(())
    }
}

fn table_exists(conn: &Connection, table: &str) -> Result<bool> {
    let mut stmt =
        conn.prepare("SELECT 1 FROM sqlite_master WHERE type='table' AND name=?1 LIMIT 1")?;
    let mut rows = stmt.query([table])?;
    Ok(rows.next()?.is_some())
}

/// In-process store, counts writes.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn writes(&self) -> usize {
        self.writes
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        self.writes += 1;
        Ok(())
    }
}

/// On-disk shape of one workout. Field names follow the page's stored JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredWorkout {
    pub date: DateTime<Local>,
    pub id: WorkoutId,
    pub coords: Coords,
    pub distance: f64,
    pub duration: f64,
    #[serde(rename = "type")]
    pub kind: WorkoutKind,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cadence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pace: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elevation_gain: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
}

impl From<&Workout> for StoredWorkout {
    fn from(w: &Workout) -> Self {
        let (cadence, pace, elevation_gain, speed) = match w.metrics {
            Metrics::Running { cadence, pace } => (Some(cadence), Some(pace), None, None),
            Metrics::Cycling {
                elevation_gain,
                speed,
            } => (None, None, Some(elevation_gain), Some(speed)),
        };
        Self {
            date: w.date,
            id: w.id.clone(),
            coords: w.coords,
            distance: w.distance,
            duration: w.duration,
            kind: w.kind(),
            description: w.description.clone(),
            cadence,
            pace,
            elevation_gain,
            speed,
        }
    }
}

impl StoredWorkout {
    /// Rebuild the typed workout named by `type`. The derived metric is
    /// recomputed; id, date and description are kept as stored.
    pub fn rehydrate(self) -> Result<Workout> {
        let mut w = match self.kind {
            WorkoutKind::Running => {
                let Some(cadence) = self.cadence else {
                    bail!("running workout {} has no cadence", self.id);
                };
                Workout::running(
                    self.id,
                    self.date,
                    self.coords,
                    self.distance,
                    self.duration,
                    cadence,
                )
            }
            WorkoutKind::Cycling => {
                let Some(elevation_gain) = self.elevation_gain else {
                    bail!("cycling workout {} has no elevationGain", self.id);
                };
                Workout::cycling(
                    self.id,
                    self.date,
                    self.coords,
                    self.distance,
                    self.duration,
                    elevation_gain,
                )
            }
        };
        if !self.description.is_empty() {
            w.description = self.description;
        }
        Ok(w)
    }
}

/// Serialize the whole list under `key`, replacing what was there.
pub fn save_workouts(
    store: &mut impl KeyValueStore,
    key: &str,
    workouts: &[Workout],
) -> Result<()> {
    let records: Vec<StoredWorkout> = workouts.iter().map(StoredWorkout::from).collect();
    let json = serde_json::to_string(&records).context("Serializing workouts")?;
    store.set(key, &json)?;
    dlog!("saved workouts key={key} count={} bytes={}", records.len(), json.len());
    Ok(())
}

/// `None` when nothing is stored under `key`. Records that can't be rebuilt
/// are skipped with a warning.
pub fn load_workouts(store: &impl KeyValueStore, key: &str) -> Result<Option<Vec<Workout>>> {
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };

    let value: JsonValue = serde_json::from_str(&raw)
        .with_context(|| format!("Parsing stored workouts under {key:?}"))?;
    let items = match value {
        JsonValue::Null => return Ok(None),
        JsonValue::Array(items) => items,
        other => bail!("stored workouts under {key:?} are not a list: {other}"),
    };

    let mut out = Vec::with_capacity(items.len());
    for (i, item) in items.into_iter().enumerate() {
        let rebuilt = serde_json::from_value::<StoredWorkout>(item)
            .map_err(anyhow::Error::from)
            .and_then(StoredWorkout::rehydrate);
        match rebuilt {
            Ok(w) => out.push(w),
            Err(e) => tracing::warn!(index = i, err = %e, "skipping unreadable stored workout"),
        }
    }

    dlog!("loaded workouts key={key} count={}", out.len());
    Ok(Some(out))
}

//! SQLite-based storage for habits, completions and achievements.
//!
//! Provides persistent storage for:
//! - Habits and the days they were completed
//! - Unlocked achievements
//! - Key-value store for application state

use std::collections::HashMap;
use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use super::data_dir;
use super::migrations;
use crate::error::{CoreError, DatabaseError};
use crate::habit::{Achievement, AchievementKind, Habit};

const DAY_FORMAT: &str = "%Y-%m-%d";

/// Counts of rows removed by [`HabitDb::reset_all_data`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
pub struct DataResetSummary {
    pub deleted_habits: usize,
    pub deleted_completions: usize,
    pub deleted_achievements: usize,
}

fn parse_datetime(dt_str: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(dt_str).map(|dt| dt.with_timezone(&Utc))
}

fn parse_day(day: &str) -> Result<NaiveDate, DatabaseError> {
    NaiveDate::parse_from_str(day, DAY_FORMAT)
        .map_err(|e| DatabaseError::QueryFailed(format!("bad day '{day}' in completions: {e}")))
}

fn format_day(day: NaiveDate) -> String {
    day.format(DAY_FORMAT).to_string()
}

/// Build a Habit (without completions) from a database row
fn row_to_habit(row: &rusqlite::Row) -> Result<Habit, rusqlite::Error> {
    let created_at: String = row.get(3)?;
    Ok(Habit {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        created_at: parse_datetime(&created_at).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e))
        })?,
        archived: row.get(4)?,
        completions: Default::default(),
    })
}

/// SQLite database for habit storage.
pub struct HabitDb {
    conn: Connection,
}

impl HabitDb {
    /// Open the database at `<data_dir>/habitkit.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, CoreError> {
        let path = data_dir()?.join("habitkit.db");
        Ok(Self::open_at(&path)?)
    }

    /// Open (or create) a database file at `path`.
    pub fn open_at(path: &Path) -> Result<Self, DatabaseError> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    #[cfg(test)]
    pub fn open_memory() -> Result<Self, DatabaseError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), DatabaseError> {
        self.conn
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS habits (
                    id          TEXT PRIMARY KEY,
                    name        TEXT NOT NULL,
                    description TEXT,
                    created_at  TEXT NOT NULL
                );

                CREATE TABLE IF NOT EXISTS completions (
                    habit_id TEXT NOT NULL,
                    day      TEXT NOT NULL,
                    PRIMARY KEY (habit_id, day)
                );

                CREATE TABLE IF NOT EXISTS achievements (
                    kind        TEXT NOT NULL,
                    habit_id    TEXT NOT NULL DEFAULT '',
                    habit_name  TEXT,
                    unlocked_at TEXT NOT NULL,
                    PRIMARY KEY (kind, habit_id)
                );

                CREATE TABLE IF NOT EXISTS kv (
                    key   TEXT PRIMARY KEY,
                    value TEXT NOT NULL
                );",
            )
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;

        migrations::migrate(&self.conn).map_err(|e| DatabaseError::MigrationFailed(e.to_string()))
    }

    // === Habits ===

    pub fn create_habit(&self, habit: &Habit) -> Result<(), DatabaseError> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO habits (id, name, description, created_at, archived)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                habit.id,
                habit.name,
                habit.description,
                habit.created_at.to_rfc3339(),
                habit.archived,
            ],
        )?;
        for day in &habit.completions {
            tx.execute(
                "INSERT OR IGNORE INTO completions (habit_id, day) VALUES (?1, ?2)",
                params![habit.id, format_day(*day)],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    /// Update name, description and archived flag.
    pub fn update_habit(&self, habit: &Habit) -> Result<(), DatabaseError> {
        let changed = self.conn.execute(
            "UPDATE habits SET name = ?2, description = ?3, archived = ?4 WHERE id = ?1",
            params![habit.id, habit.name, habit.description, habit.archived],
        )?;
        if changed == 0 {
            return Err(DatabaseError::NotFound {
                entity: "habit",
                id: habit.id.clone(),
            });
        }
        Ok(())
    }

    pub fn get_habit(&self, id: &str) -> Result<Option<Habit>, DatabaseError> {
        let habit = self
            .conn
            .query_row(
                "SELECT id, name, description, created_at, archived FROM habits WHERE id = ?1",
                params![id],
                row_to_habit,
            )
            .optional()?;

        match habit {
            Some(mut h) => {
                h.completions = self.load_completions(&h.id)?.into_iter().collect();
                Ok(Some(h))
            }
            None => Ok(None),
        }
    }

    /// Look up by exact id, unique id prefix, or case-insensitive name.
    pub fn find_habit(&self, key: &str) -> Result<Option<Habit>, DatabaseError> {
        let key = key.trim();
        if key.is_empty() {
            return Ok(None);
        }
        if let Some(h) = self.get_habit(key)? {
            return Ok(Some(h));
        }

        let all = self.list_habits(true)?;
        let by_name: Vec<&Habit> = all
            .iter()
            .filter(|h| h.name.eq_ignore_ascii_case(key))
            .collect();
        if let [one] = by_name.as_slice() {
            return Ok(Some((*one).clone()));
        }

        let by_prefix: Vec<&Habit> = all.iter().filter(|h| h.id.starts_with(key)).collect();
        match by_prefix.as_slice() {
            [one] => Ok(Some((*one).clone())),
            _ => Ok(None),
        }
    }

    /// All habits ordered by creation time, with completions loaded.
    pub fn list_habits(&self, include_archived: bool) -> Result<Vec<Habit>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, description, created_at, archived
             FROM habits
             WHERE archived = 0 OR ?1
             ORDER BY created_at ASC, name ASC",
        )?;
        let mut habits = stmt
            .query_map(params![include_archived], row_to_habit)?
            .collect::<Result<Vec<_>, _>>()?;

        let mut by_habit = self.load_all_completions()?;
        for habit in &mut habits {
            if let Some(days) = by_habit.remove(&habit.id) {
                habit.completions = days.into_iter().collect();
            }
        }
        Ok(habits)
    }

    /// Delete a habit with its completions and achievements.
    /// Returns `false` if no such habit existed.
    pub fn delete_habit(&self, id: &str) -> Result<bool, DatabaseError> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM completions WHERE habit_id = ?1", params![id])?;
        tx.execute("DELETE FROM achievements WHERE habit_id = ?1", params![id])?;
        let deleted = tx.execute("DELETE FROM habits WHERE id = ?1", params![id])?;
        tx.commit()?;
        Ok(deleted > 0)
    }

    // === Completions ===

    /// Set or clear one day. Returns whether anything changed.
    pub fn set_completion(&self, habit_id: &str, day: NaiveDate, done: bool) -> Result<bool, DatabaseError> {
        let changed = if done {
            self.conn.execute(
                "INSERT OR IGNORE INTO completions (habit_id, day) VALUES (?1, ?2)",
                params![habit_id, format_day(day)],
            )?
        } else {
            self.conn.execute(
                "DELETE FROM completions WHERE habit_id = ?1 AND day = ?2",
                params![habit_id, format_day(day)],
            )?
        };
        Ok(changed > 0)
    }

    fn load_completions(&self, habit_id: &str) -> Result<Vec<NaiveDate>, DatabaseError> {
        let mut stmt = self
            .conn
            .prepare("SELECT day FROM completions WHERE habit_id = ?1 ORDER BY day ASC")?;
        let days = stmt
            .query_map(params![habit_id], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        days.iter().map(|d| parse_day(d)).collect()
    }

    fn load_all_completions(&self) -> Result<HashMap<String, Vec<NaiveDate>>, DatabaseError> {
        let mut stmt = self.conn.prepare("SELECT habit_id, day FROM completions")?;
        let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?;

        let mut out: HashMap<String, Vec<NaiveDate>> = HashMap::new();
        for row in rows {
            let (habit_id, day) = row?;
            out.entry(habit_id).or_default().push(parse_day(&day)?);
        }
        Ok(out)
    }

    // === Achievements ===

    pub fn list_achievements(&self) -> Result<Vec<Achievement>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT kind, habit_id, habit_name, unlocked_at
             FROM achievements
             ORDER BY unlocked_at ASC, kind ASC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, Option<String>>(2)?,
                row.get::<_, String>(3)?,
            ))
        })?;

        let mut out = Vec::new();
        for row in rows {
            let (kind, habit_id, habit_name, unlocked_at) = row?;
            let Some(kind) = AchievementKind::parse(&kind) else {
                tracing::warn!(%kind, "skipping unknown achievement kind");
                continue;
            };
            out.push(Achievement {
                kind,
                habit_id: (!habit_id.is_empty()).then_some(habit_id),
                habit_name,
                unlocked_at: parse_datetime(&unlocked_at).map_err(|e| {
                    DatabaseError::QueryFailed(format!("bad unlocked_at '{unlocked_at}' in achievements: {e}"))
                })?,
            });
        }
        Ok(out)
    }

    /// Store newly unlocked achievements; duplicates are ignored.
    /// Returns how many rows were inserted.
    pub fn record_achievements(&self, achievements: &[Achievement]) -> Result<usize, DatabaseError> {
        let tx = self.conn.unchecked_transaction()?;
        let mut inserted = 0;
        for a in achievements {
            inserted += tx.execute(
                "INSERT OR IGNORE INTO achievements (kind, habit_id, habit_name, unlocked_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    a.kind.as_str(),
                    a.habit_id.as_deref().unwrap_or(""),
                    a.habit_name,
                    a.unlocked_at.to_rfc3339(),
                ],
            )?;
        }
        tx.commit()?;
        Ok(inserted)
    }

    // === Key-value ===

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, DatabaseError> {
        Ok(self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get::<_, String>(0)
            })
            .optional()?)
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    // === Reset ===

    /// Delete habits, completions and achievements in a single transaction.
    ///
    /// This backs the destructive "reset all data" action. The kv store is
    /// left alone.
    pub fn reset_all_data(&self) -> Result<DataResetSummary, DatabaseError> {
        let tx = self.conn.unchecked_transaction()?;
        let deleted_completions = tx.execute("DELETE FROM completions", [])?;
        let deleted_achievements = tx.execute("DELETE FROM achievements", [])?;
        let deleted_habits = tx.execute("DELETE FROM habits", [])?;
        tx.commit()?;

        tracing::info!(deleted_habits, deleted_completions, deleted_achievements, "all habit data reset");
        Ok(DataResetSummary {
            deleted_habits,
            deleted_completions,
            deleted_achievements,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn make_habit(name: &str) -> Habit {
        Habit::new(name, Some("test".into()), Utc.with_ymd_and_hms(2024, 3, 1, 7, 0, 0).unwrap()).unwrap()
    }

    #[test]
    fn migrations_reach_current_version() {
        let db = HabitDb::open_memory().unwrap();
        assert_eq!(migrations::get_schema_version(&db.conn), migrations::SCHEMA_VERSION);
    }

    #[test]
    fn create_and_get_with_completions() {
        let db = HabitDb::open_memory().unwrap();
        let mut habit = make_habit("Read");
        habit.completions.insert(day(2));
        db.create_habit(&habit).unwrap();
        db.set_completion(&habit.id, day(3), true).unwrap();

        let loaded = db.get_habit(&habit.id).unwrap().unwrap();
        assert_eq!(loaded.name, "Read");
        assert_eq!(loaded.description.as_deref(), Some("test"));
        assert_eq!(loaded.completions.len(), 2);
        assert!(loaded.is_completed_on(day(3)));
        assert_eq!(loaded.created_at, habit.created_at);
    }

    #[test]
    fn set_completion_reports_changes() {
        let db = HabitDb::open_memory().unwrap();
        let habit = make_habit("Walk");
        db.create_habit(&habit).unwrap();
        assert!(db.set_completion(&habit.id, day(5), true).unwrap());
        assert!(!db.set_completion(&habit.id, day(5), true).unwrap());
        assert!(db.set_completion(&habit.id, day(5), false).unwrap());
        assert!(!db.set_completion(&habit.id, day(5), false).unwrap());
    }

    #[test]
    fn list_hides_archived_unless_asked() {
        let db = HabitDb::open_memory().unwrap();
        let a = make_habit("A");
        let mut b = make_habit("B");
        db.create_habit(&a).unwrap();
        db.create_habit(&b).unwrap();
        b.archived = true;
        db.update_habit(&b).unwrap();

        assert_eq!(db.list_habits(false).unwrap().len(), 1);
        assert_eq!(db.list_habits(true).unwrap().len(), 2);
    }

    #[test]
    fn find_by_name_or_prefix() {
        let db = HabitDb::open_memory().unwrap();
        let habit = make_habit("Drink Water");
        db.create_habit(&habit).unwrap();
        assert_eq!(db.find_habit("drink water").unwrap().unwrap().id, habit.id);
        assert_eq!(db.find_habit(&habit.id[..8]).unwrap().unwrap().id, habit.id);
        assert!(db.find_habit("nothing").unwrap().is_none());
    }

    #[test]
    fn blank_key_finds_nothing() {
        let db = HabitDb::open_memory().unwrap();
        db.create_habit(&make_habit("Read")).unwrap();
        assert!(db.find_habit("").unwrap().is_none());
        assert!(db.find_habit("   ").unwrap().is_none());
    }

    #[test]
    fn corrupt_timestamps_are_errors() {
        let db = HabitDb::open_memory().unwrap();
        let habit = make_habit("Read");
        db.create_habit(&habit).unwrap();
        db.conn
            .execute("UPDATE habits SET created_at = 'yesterday-ish' WHERE id = ?1", params![habit.id])
            .unwrap();
        assert!(matches!(db.get_habit(&habit.id), Err(DatabaseError::QueryFailed(_))));
        assert!(matches!(db.list_habits(true), Err(DatabaseError::QueryFailed(_))));

        db.conn
            .execute(
                "INSERT INTO achievements (kind, habit_id, habit_name, unlocked_at)
                 VALUES ('first_step', '', NULL, 'not a date')",
                [],
            )
            .unwrap();
        assert!(matches!(db.list_achievements(), Err(DatabaseError::QueryFailed(_))));
    }

    #[test]
    fn update_missing_habit_fails() {
        let db = HabitDb::open_memory().unwrap();
        let habit = make_habit("Ghost");
        assert!(matches!(
            db.update_habit(&habit),
            Err(DatabaseError::NotFound { entity: "habit", .. })
        ));
    }

    #[test]
    fn delete_removes_completions() {
        let db = HabitDb::open_memory().unwrap();
        let habit = make_habit("Run");
        db.create_habit(&habit).unwrap();
        db.set_completion(&habit.id, day(4), true).unwrap();
        assert!(db.delete_habit(&habit.id).unwrap());
        assert!(!db.delete_habit(&habit.id).unwrap());
        assert!(db.load_all_completions().unwrap().is_empty());
    }

    #[test]
    fn achievements_are_recorded_once() {
        let db = HabitDb::open_memory().unwrap();
        let habit = make_habit("Run");
        let now = Utc.with_ymd_and_hms(2024, 3, 9, 12, 0, 0).unwrap();
        let list = vec![
            Achievement {
                kind: AchievementKind::FirstStep,
                habit_id: Some(habit.id.clone()),
                habit_name: Some(habit.name.clone()),
                unlocked_at: now,
            },
            Achievement {
                kind: AchievementKind::HabitCollector,
                habit_id: None,
                habit_name: None,
                unlocked_at: now,
            },
        ];
        assert_eq!(db.record_achievements(&list).unwrap(), 2);
        assert_eq!(db.record_achievements(&list).unwrap(), 0);

        let loaded = db.list_achievements().unwrap();
        assert_eq!(loaded.len(), 2);
        assert!(loaded.iter().any(|a| a.habit_id.is_none()));
    }

    #[test]
    fn reset_all_data_counts_rows() {
        let db = HabitDb::open_memory().unwrap();
        let habit = make_habit("Run");
        db.create_habit(&habit).unwrap();
        db.set_completion(&habit.id, day(1), true).unwrap();
        db.set_completion(&habit.id, day(2), true).unwrap();
        db.kv_set("last_reminder", "2024-03-02").unwrap();

        let summary = db.reset_all_data().unwrap();
        assert_eq!(
            summary,
            DataResetSummary {
                deleted_habits: 1,
                deleted_completions: 2,
                deleted_achievements: 0,
            }
        );
        assert!(db.list_habits(true).unwrap().is_empty());
        assert_eq!(db.kv_get("last_reminder").unwrap().as_deref(), Some("2024-03-02"));
    }

    #[test]
    fn kv_store() {
        let db = HabitDb::open_memory().unwrap();
        assert!(db.kv_get("test").unwrap().is_none());
        db.kv_set("test", "hello").unwrap();
        assert_eq!(db.kv_get("test").unwrap().unwrap(), "hello");
    }
}

//src/db.rs
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

use crate::model::{AbsExercise, CustomWorkoutData, CustomWorkoutTemplate, Exercise, Feel, WorkoutSet};

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database connection failed")]
    Connection(#[from] rusqlite::Error),
    #[error("Failed to get application data directory")]
    DataDir,
    #[error("I/O error accessing database file")]
    Io(#[from] std::io::Error),
    #[error("Database query failed: {0}")]
    QueryFailed(rusqlite::Error),
    #[error("Database update failed: {0}")]
    UpdateFailed(rusqlite::Error),
    #[error("Database insert failed: {0}")]
    InsertFailed(rusqlite::Error),
    #[error("Database delete failed: {0}")]
    DeleteFailed(rusqlite::Error),
    #[error("Custom workout not found: ID {0}")]
    TemplateNotFound(i64),
    #[error("Custom workout '{0}' not found")]
    TemplateNameNotFound(String),
    #[error("Workout name must be unique (case-insensitive): '{0}' already exists.")]
    TemplateNameNotUnique(String),
}

impl DbError {
    /// True for lookups that found nothing, as opposed to a failing database.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::TemplateNotFound(_) | Self::TemplateNameNotFound(_))
    }
}

const DB_FILE_NAME: &str = "templates.sqlite";
const APP_DATA_DIR: &str = "liftdeck"; // Same dir name as config

/// Gets the path to the SQLite database file within the app's data directory.
pub fn get_db_path() -> Result<PathBuf, DbError> {
    let app_dir = get_data_dir()?;
    Ok(app_dir.join(DB_FILE_NAME))
}

/// App data directory (database, TUI log file), created on first use.
pub fn get_data_dir() -> Result<PathBuf, DbError> {
    let data_dir = dirs::data_dir().ok_or(DbError::DataDir)?;
    let app_dir = data_dir.join(APP_DATA_DIR);
    if !app_dir.exists() {
        std::fs::create_dir_all(&app_dir)?;
    }
    Ok(app_dir)
}

pub fn open_db<P: AsRef<Path>>(path: P) -> Result<Connection, DbError> {
    let conn = Connection::open(path).map_err(DbError::Connection)?;
    Ok(conn)
}

/// Creates the template tables if they don't exist.
pub fn init_db(conn: &Connection) -> Result<(), DbError> {
    // Child rows rely on ON DELETE CASCADE
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS custom_templates (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE COLLATE NOCASE,
            include_in_auto_schedule INTEGER NOT NULL DEFAULT 0,
            updated_at TEXT NOT NULL -- RFC3339
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS template_exercises (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            template_id INTEGER NOT NULL REFERENCES custom_templates(id) ON DELETE CASCADE,
            position INTEGER NOT NULL,
            machine TEXT NOT NULL,
            region TEXT NOT NULL,
            feel TEXT NOT NULL DEFAULT 'Medium',
            completed INTEGER NOT NULL DEFAULT 0
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS template_sets (
            exercise_id INTEGER NOT NULL REFERENCES template_exercises(id) ON DELETE CASCADE,
            position INTEGER NOT NULL,
            weight REAL,
            reps INTEGER,
            rest TEXT NOT NULL DEFAULT '',
            completed INTEGER NOT NULL DEFAULT 0,
            PRIMARY KEY (exercise_id, position)
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS template_abs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            template_id INTEGER NOT NULL REFERENCES custom_templates(id) ON DELETE CASCADE,
            position INTEGER NOT NULL,
            name TEXT NOT NULL,
            reps INTEGER,
            time TEXT,
            completed INTEGER NOT NULL DEFAULT 0
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_template_exercises_template ON template_exercises(template_id)",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_template_abs_template ON template_abs(template_id)",
        [],
    )?;

    Ok(())
}

// Helper function to map a template header row; children are loaded separately
fn map_row_to_template(row: &Row) -> Result<CustomWorkoutTemplate, rusqlite::Error> {
    Ok(CustomWorkoutTemplate {
        id: row.get(0)?,
        name: row.get(1)?,
        include_in_auto_schedule: row.get(2)?,
        updated_at: Some(row.get::<_, DateTime<Utc>>(3)?),
        exercises: Vec::new(),
        abs: Vec::new(),
    })
}

fn name_taken(conn: &Connection, name: &str, except_id: Option<i64>) -> Result<bool, DbError> {
    let existing: Option<i64> = conn
        .query_row(
            "SELECT id FROM custom_templates WHERE name = ?1 COLLATE NOCASE",
            params![name],
            |row| row.get(0),
        )
        .optional()
        .map_err(DbError::QueryFailed)?;
    Ok(matches!(existing, Some(id) if Some(id) != except_id))
}

fn insert_children(tx: &Transaction, template_id: i64, data: &CustomWorkoutData) -> Result<(), DbError> {
    for (position, exercise) in data.exercises.iter().enumerate() {
        tx.execute(
            "INSERT INTO template_exercises (template_id, position, machine, region, feel, completed)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                template_id,
                position as i64,
                exercise.machine,
                exercise.region,
                exercise.feel.to_string(),
                exercise.completed
            ],
        )
        .map_err(DbError::InsertFailed)?;
        let exercise_id = tx.last_insert_rowid();

        for (set_position, set) in exercise.sets.iter().enumerate() {
            tx.execute(
                "INSERT INTO template_sets (exercise_id, position, weight, reps, rest, completed)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    exercise_id,
                    set_position as i64,
                    set.weight,
                    set.reps,
                    set.rest,
                    set.completed
                ],
            )
            .map_err(DbError::InsertFailed)?;
        }
    }

    for (position, abs) in data.abs.iter().enumerate() {
        tx.execute(
            "INSERT INTO template_abs (template_id, position, name, reps, time, completed)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                template_id,
                position as i64,
                abs.name,
                abs.reps,
                abs.time,
                abs.completed
            ],
        )
        .map_err(DbError::InsertFailed)?;
    }
    Ok(())
}

fn load_children(conn: &Connection, template: &mut CustomWorkoutTemplate) -> Result<(), DbError> {
    let mut stmt = conn
        .prepare(
            "SELECT id, machine, region, feel, completed FROM template_exercises
             WHERE template_id = ?1 ORDER BY position",
        )
        .map_err(DbError::QueryFailed)?;
    let rows = stmt
        .query_map(params![template.id], |row| {
            let feel_str: String = row.get(3)?;
            let feel = Feel::from_str(&feel_str).map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(
                    3,
                    rusqlite::types::Type::Text,
                    Box::new(e),
                )
            })?;
            Ok((
                row.get::<_, i64>(0)?,
                Exercise {
                    machine: row.get(1)?,
                    region: row.get(2)?,
                    feel,
                    completed: row.get(4)?,
                    sets: Default::default(),
                },
            ))
        })
        .map_err(DbError::QueryFailed)?;
    let exercises = rows
        .collect::<Result<Vec<_>, _>>()
        .map_err(DbError::QueryFailed)?;

    let mut set_stmt = conn
        .prepare(
            "SELECT position, weight, reps, rest, completed FROM template_sets
             WHERE exercise_id = ?1 ORDER BY position",
        )
        .map_err(DbError::QueryFailed)?;
    template.exercises = Vec::with_capacity(exercises.len());
    for (exercise_id, mut exercise) in exercises {
        let sets = set_stmt
            .query_map(params![exercise_id], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    WorkoutSet {
                        weight: row.get(1)?,
                        reps: row.get(2)?,
                        rest: row.get(3)?,
                        completed: row.get(4)?,
                    },
                ))
            })
            .map_err(DbError::QueryFailed)?;
        for set in sets {
            let (position, set) = set.map_err(DbError::QueryFailed)?;
            // Positions past the fixed set count have no slot and are dropped
            if let Some(slot) = usize::try_from(position)
                .ok()
                .and_then(|p| exercise.sets.get_mut(p))
            {
                *slot = set;
            }
        }
        template.exercises.push(exercise);
    }

    let mut abs_stmt = conn
        .prepare(
            "SELECT name, reps, time, completed FROM template_abs
             WHERE template_id = ?1 ORDER BY position",
        )
        .map_err(DbError::QueryFailed)?;
    let abs = abs_stmt
        .query_map(params![template.id], |row| {
            Ok(AbsExercise {
                name: row.get(0)?,
                reps: row.get(1)?,
                time: row.get(2)?,
                completed: row.get(3)?,
            })
        })
        .map_err(DbError::QueryFailed)?;
    template.abs = abs
        .collect::<Result<Vec<_>, _>>()
        .map_err(DbError::QueryFailed)?;
    Ok(())
}

/// Stores a new custom template with its exercises, sets and core exercises.
/// Returns the new template ID.
pub fn create_template(conn: &Connection, data: &CustomWorkoutData) -> Result<i64, DbError> {
    if name_taken(conn, &data.name, None)? {
        return Err(DbError::TemplateNameNotUnique(data.name.clone()));
    }

    let tx = conn.unchecked_transaction()?;
    tx.execute(
        "INSERT INTO custom_templates (name, include_in_auto_schedule, updated_at) VALUES (?1, ?2, ?3)",
        params![data.name, data.include_in_auto_schedule, Utc::now()],
    )
    .map_err(DbError::InsertFailed)?;
    let id = tx.last_insert_rowid();
    insert_children(&tx, id, data)?;
    tx.commit()?;
    Ok(id)
}

/// Replaces the template's fields and all of its children.
pub fn update_template(conn: &Connection, id: i64, data: &CustomWorkoutData) -> Result<(), DbError> {
    if name_taken(conn, &data.name, Some(id))? {
        return Err(DbError::TemplateNameNotUnique(data.name.clone()));
    }

    let tx = conn.unchecked_transaction()?;
    let rows = tx
        .execute(
            "UPDATE custom_templates SET name = ?1, include_in_auto_schedule = ?2, updated_at = ?3
             WHERE id = ?4",
            params![data.name, data.include_in_auto_schedule, Utc::now(), id],
        )
        .map_err(DbError::UpdateFailed)?;
    if rows == 0 {
        return Err(DbError::TemplateNotFound(id));
    }

    // Sets go with their exercises via cascade
    tx.execute(
        "DELETE FROM template_exercises WHERE template_id = ?1",
        params![id],
    )
    .map_err(DbError::DeleteFailed)?;
    tx.execute("DELETE FROM template_abs WHERE template_id = ?1", params![id])
        .map_err(DbError::DeleteFailed)?;
    insert_children(&tx, id, data)?;
    tx.commit()?;
    Ok(())
}

pub fn delete_template(conn: &Connection, id: i64) -> Result<(), DbError> {
    let rows = conn
        .execute("DELETE FROM custom_templates WHERE id = ?1", params![id])
        .map_err(DbError::DeleteFailed)?;
    if rows == 0 {
        return Err(DbError::TemplateNotFound(id));
    }
    Ok(())
}

pub fn get_template(conn: &Connection, id: i64) -> Result<CustomWorkoutTemplate, DbError> {
    let mut template = conn
        .query_row(
            "SELECT id, name, include_in_auto_schedule, updated_at FROM custom_templates WHERE id = ?1",
            params![id],
            map_row_to_template,
        )
        .optional()
        .map_err(DbError::QueryFailed)?
        .ok_or(DbError::TemplateNotFound(id))?;
    load_children(conn, &mut template)?;
    Ok(template)
}

/// Case-insensitive name lookup.
pub fn find_template_by_name(
    conn: &Connection,
    name: &str,
) -> Result<Option<CustomWorkoutTemplate>, DbError> {
    let template = conn
        .query_row(
            "SELECT id, name, include_in_auto_schedule, updated_at FROM custom_templates
             WHERE name = ?1 COLLATE NOCASE",
            params![name],
            map_row_to_template,
        )
        .optional()
        .map_err(DbError::QueryFailed)?;
    match template {
        Some(mut template) => {
            load_children(conn, &mut template)?;
            Ok(Some(template))
        }
        None => Ok(None),
    }
}

/// All custom templates in creation order.
pub fn list_templates(conn: &Connection) -> Result<Vec<CustomWorkoutTemplate>, DbError> {
    let mut stmt = conn
        .prepare("SELECT id, name, include_in_auto_schedule, updated_at FROM custom_templates ORDER BY id")
        .map_err(DbError::QueryFailed)?;
    let headers = stmt
        .query_map([], map_row_to_template)
        .map_err(DbError::QueryFailed)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(DbError::QueryFailed)?;

    let mut templates = Vec::with_capacity(headers.len());
    for mut template in headers {
        load_children(conn, &mut template)?;
        templates.push(template);
    }
    Ok(templates)
}

pub fn list_template_names(conn: &Connection) -> Result<Vec<String>, DbError> {
    let mut stmt = conn
        .prepare("SELECT name FROM custom_templates ORDER BY id")
        .map_err(DbError::QueryFailed)?;
    let names = stmt
        .query_map([], |row| row.get(0))
        .map_err(DbError::QueryFailed)?
        .collect::<Result<Vec<String>, _>>()
        .map_err(DbError::QueryFailed)?;
    Ok(names)
}

//! SQL schema for the rollcall SQLite store.
//!
//! Executed at startup via `SqliteStore::init_schema`; idempotent thanks to
//! `CREATE TABLE IF NOT EXISTS`. Future migrations will be gated on
//! `PRAGMA user_version`.
//!
//! Uniqueness (rut, activity name, person+instance pair) is declared here so
//! the database backs up the application-level existence checks under
//! concurrent writes. Foreign keys cascade on delete: removing an activity
//! removes its instances and their attendance, removing a person or an
//! instance removes its attendance rows.

/// Full schema DDL.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS persons (
    person_id  TEXT PRIMARY KEY,
    rut        TEXT NOT NULL UNIQUE,
    apellidos  TEXT NOT NULL,
    nombres    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS activities (
    activity_id  TEXT PRIMARY KEY,
    nombre       TEXT NOT NULL UNIQUE,
    tipo         TEXT NOT NULL,    -- 'taller' | 'entrega' | 'otra'
    descripcion  TEXT,
    coordinadora TEXT NOT NULL,
    lugar        TEXT NOT NULL,
    created_at   TEXT NOT NULL     -- ISO 8601 UTC; server-assigned
);

CREATE TABLE IF NOT EXISTS activity_instances (
    instance_id   TEXT PRIMARY KEY,
    activity_id   TEXT NOT NULL REFERENCES activities(activity_id) ON DELETE CASCADE,
    fecha         TEXT NOT NULL,   -- ISO 8601 date
    lugar         TEXT,            -- override; falls back to the activity's
    coordinadora  TEXT,            -- override; falls back to the activity's
    observaciones TEXT,
    created_at    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS attendance (
    attendance_id TEXT PRIMARY KEY,
    person_id     TEXT NOT NULL REFERENCES persons(person_id) ON DELETE CASCADE,
    instance_id   TEXT NOT NULL REFERENCES activity_instances(instance_id) ON DELETE CASCADE,
    asistio       INTEGER NOT NULL DEFAULT 0,
    fecha_marcado TEXT,            -- set only when attendance is marked
    updated_at    TEXT NOT NULL,
    UNIQUE (person_id, instance_id)
);

CREATE INDEX IF NOT EXISTS instances_activity_idx  ON activity_instances(activity_id);
CREATE INDEX IF NOT EXISTS attendance_instance_idx ON attendance(instance_id);
CREATE INDEX IF NOT EXISTS attendance_person_idx   ON attendance(person_id);

PRAGMA user_version = 1;
";

//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, dates as `YYYY-MM-DD`, UUIDs as
//! hyphenated lowercase strings, and the attended flag as an integer.

use chrono::{DateTime, NaiveDate, Utc};
use rollcall_core::{
  activity::{Activity, ActivityKind},
  attendance::Attendance,
  instance::ActivityInstance,
  person::Person,
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── NaiveDate ────────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── ActivityKind ─────────────────────────────────────────────────────────────

pub fn encode_kind(k: ActivityKind) -> &'static str {
  match k {
    ActivityKind::Workshop => "taller",
    ActivityKind::Delivery => "entrega",
    ActivityKind::Other => "otra",
  }
}

pub fn decode_kind(s: &str) -> Result<ActivityKind> {
  match s {
    "taller" => Ok(ActivityKind::Workshop),
    "entrega" => Ok(ActivityKind::Delivery),
    "otra" => Ok(ActivityKind::Other),
    other => Err(Error::UnknownKind(other.to_string())),
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `persons` row.
pub struct RawPerson {
  pub person_id: String,
  pub rut:       String,
  pub apellidos: String,
  pub nombres:   String,
}

impl RawPerson {
  pub fn into_person(self) -> Result<Person> {
    Ok(Person {
      id:        decode_uuid(&self.person_id)?,
      rut:       self.rut,
      apellidos: self.apellidos,
      nombres:   self.nombres,
    })
  }
}

/// Raw strings read directly from an `activities` row.
pub struct RawActivity {
  pub activity_id:  String,
  pub nombre:       String,
  pub tipo:         String,
  pub descripcion:  Option<String>,
  pub coordinadora: String,
  pub lugar:        String,
  pub created_at:   String,
}

impl RawActivity {
  pub fn into_activity(self) -> Result<Activity> {
    Ok(Activity {
      id:           decode_uuid(&self.activity_id)?,
      nombre:       self.nombre,
      tipo:         decode_kind(&self.tipo)?,
      descripcion:  self.descripcion,
      coordinadora: self.coordinadora,
      lugar:        self.lugar,
      created_at:   decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from an `activity_instances` row.
pub struct RawInstance {
  pub instance_id:   String,
  pub activity_id:   String,
  pub fecha:         String,
  pub lugar:         Option<String>,
  pub coordinadora:  Option<String>,
  pub observaciones: Option<String>,
  pub created_at:    String,
}

impl RawInstance {
  pub fn into_instance(self) -> Result<ActivityInstance> {
    Ok(ActivityInstance {
      id:            decode_uuid(&self.instance_id)?,
      asunto_id:     decode_uuid(&self.activity_id)?,
      fecha:         decode_date(&self.fecha)?,
      lugar:         self.lugar,
      coordinadora:  self.coordinadora,
      observaciones: self.observaciones,
      created_at:    decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from an `attendance` row.
pub struct RawAttendance {
  pub attendance_id: String,
  pub person_id:     String,
  pub instance_id:   String,
  pub asistio:       bool,
  pub fecha_marcado: Option<String>,
  pub updated_at:    String,
}

impl RawAttendance {
  pub fn into_attendance(self) -> Result<Attendance> {
    Ok(Attendance {
      id:                  decode_uuid(&self.attendance_id)?,
      persona_id:          decode_uuid(&self.person_id)?,
      asunto_instancia_id: decode_uuid(&self.instance_id)?,
      asistio:             self.asistio,
      fecha_marcado:       self
        .fecha_marcado
        .as_deref()
        .map(decode_dt)
        .transpose()?,
      updated_at:          decode_dt(&self.updated_at)?,
    })
  }
}

//! Attendance — a person's registration against one activity instance.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A person's registration and attended/absent status for one instance.
/// At most one row exists per (person, instance) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attendance {
  pub id:                  Uuid,
  pub persona_id:          Uuid,
  pub asunto_instancia_id: Uuid,
  pub asistio:             bool,
  /// Set the first time attendance is marked, and refreshed on every mark —
  /// in both directions (present and absent).
  pub fecha_marcado:       Option<DateTime<Utc>>,
  pub updated_at:          DateTime<Utc>,
}

/// Payload accepted by `POST /attendance/` (the strict registration path).
#[derive(Debug, Clone, Deserialize)]
pub struct NewAttendance {
  pub persona_id:          Uuid,
  pub asunto_instancia_id: Uuid,
  #[serde(default)]
  pub asistio:             bool,
}

/// One roster row: an attendance record joined with its person.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterEntry {
  pub id:         Uuid,
  pub persona_id: Uuid,
  /// Full name: `nombres` and `apellidos`, space-joined.
  pub nombre:     String,
  pub rut:        String,
  pub asistio:    bool,
}

/// One history row: an attendance record joined through its instance and
/// activity, with the effective location/coordinator already resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
  pub id:           Uuid,
  /// Activity name.
  pub asunto:       String,
  /// Instance date.
  pub fecha:        NaiveDate,
  pub asistio:      bool,
  /// Instance override when present, else the activity's location.
  pub lugar:        String,
  /// Instance override when present, else the activity's coordinator.
  pub coordinadora: String,
}

//! Activity instance — one dated occurrence of an activity.
//!
//! `lugar` and `coordinadora` are optional overrides; readers fall back to
//! the owning activity's values when they are absent.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  Error, Patch, Result,
  validate::{optional_str, patch_optional_str},
};

/// One dated occurrence of an activity. Owns zero or more attendance rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityInstance {
  pub id:            Uuid,
  /// Owning activity; immutable once set.
  pub asunto_id:     Uuid,
  pub fecha:         NaiveDate,
  pub lugar:         Option<String>,
  pub coordinadora:  Option<String>,
  pub observaciones: Option<String>,
  pub created_at:    DateTime<Utc>,
}

/// Payload accepted by `POST /instances/`.
#[derive(Debug, Clone, Deserialize)]
pub struct NewInstance {
  pub asunto_id:     Uuid,
  pub fecha:         NaiveDate,
  pub lugar:         Option<String>,
  pub coordinadora:  Option<String>,
  pub observaciones: Option<String>,
}

impl NewInstance {
  pub fn validate(&self) -> Result<()> {
    optional_str("lugar", &self.lugar, 255)?;
    optional_str("coordinadora", &self.coordinadora, 255)?;
    optional_str("observaciones", &self.observaciones, 500)?;
    Ok(())
  }
}

/// Partial update accepted by `PUT /instances/{id}`. The owning activity
/// reference is immutable and cannot be patched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InstancePatch {
  #[serde(default)]
  pub fecha:         Patch<NaiveDate>,
  #[serde(default)]
  pub lugar:         Patch<String>,
  #[serde(default)]
  pub coordinadora:  Patch<String>,
  #[serde(default)]
  pub observaciones: Patch<String>,
}

impl InstancePatch {
  pub fn validate(&self) -> Result<()> {
    if self.fecha.is_null() {
      return Err(Error::Validation("fecha must not be null".into()));
    }
    patch_optional_str("lugar", &self.lugar, 255)?;
    patch_optional_str("coordinadora", &self.coordinadora, 255)?;
    patch_optional_str("observaciones", &self.observaciones, 500)?;
    Ok(())
  }

  pub fn apply(self, instance: &mut ActivityInstance) {
    self.fecha.apply_to(&mut instance.fecha);
    self.lugar.apply_to_opt(&mut instance.lugar);
    self.coordinadora.apply_to_opt(&mut instance.coordinadora);
    self.observaciones.apply_to_opt(&mut instance.observaciones);
  }
}

/// Live aggregate counts for one instance, computed per request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InstanceCounts {
  /// Total attendance rows referencing the instance.
  pub registered: u64,
  /// Subset with `asistio = true`.
  pub present:    u64,
}

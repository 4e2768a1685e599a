//! Activity ("asunto") — a named recurring event definition.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  Error, Patch, Result,
  validate::{
    optional_str, patch_optional_str, patch_required_str, required_str,
  },
};

/// The kind of activity. Wire values are the Spanish originals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivityKind {
  #[serde(rename = "taller")]
  Workshop,
  #[serde(rename = "entrega")]
  Delivery,
  #[serde(rename = "otra")]
  Other,
}

/// A recurring named activity. Owns zero or more instances.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
  pub id:           Uuid,
  /// Unique across all activities.
  pub nombre:       String,
  pub tipo:         ActivityKind,
  pub descripcion:  Option<String>,
  pub coordinadora: String,
  pub lugar:        String,
  pub created_at:   DateTime<Utc>,
}

/// Payload accepted by `POST /activities/`.
#[derive(Debug, Clone, Deserialize)]
pub struct NewActivity {
  pub nombre:       String,
  pub tipo:         ActivityKind,
  pub descripcion:  Option<String>,
  pub coordinadora: String,
  pub lugar:        String,
}

impl NewActivity {
  pub fn validate(&self) -> Result<()> {
    required_str("nombre", &self.nombre, 255)?;
    optional_str("descripcion", &self.descripcion, 500)?;
    required_str("coordinadora", &self.coordinadora, 255)?;
    required_str("lugar", &self.lugar, 255)?;
    Ok(())
  }
}

/// Partial update accepted by `PUT /activities/{id}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActivityPatch {
  #[serde(default)]
  pub nombre:       Patch<String>,
  #[serde(default)]
  pub tipo:         Patch<ActivityKind>,
  #[serde(default)]
  pub descripcion:  Patch<String>,
  #[serde(default)]
  pub coordinadora: Patch<String>,
  #[serde(default)]
  pub lugar:        Patch<String>,
}

impl ActivityPatch {
  pub fn validate(&self) -> Result<()> {
    patch_required_str("nombre", &self.nombre, 255)?;
    if self.tipo.is_null() {
      return Err(Error::Validation("tipo must not be null".into()));
    }
    patch_optional_str("descripcion", &self.descripcion, 500)?;
    patch_required_str("coordinadora", &self.coordinadora, 255)?;
    patch_required_str("lugar", &self.lugar, 255)?;
    Ok(())
  }

  pub fn apply(self, activity: &mut Activity) {
    self.nombre.apply_to(&mut activity.nombre);
    self.tipo.apply_to(&mut activity.tipo);
    self.descripcion.apply_to_opt(&mut activity.descripcion);
    self.coordinadora.apply_to(&mut activity.coordinadora);
    self.lugar.apply_to(&mut activity.lugar);
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn kind_serialises_to_spanish_wire_values() {
    assert_eq!(
      serde_json::to_string(&ActivityKind::Workshop).unwrap(),
      r#""taller""#
    );
    assert_eq!(
      serde_json::to_string(&ActivityKind::Delivery).unwrap(),
      r#""entrega""#
    );
    assert_eq!(
      serde_json::to_string(&ActivityKind::Other).unwrap(),
      r#""otra""#
    );
  }

  #[test]
  fn unknown_kind_is_rejected() {
    assert!(serde_json::from_str::<ActivityKind>(r#""charla""#).is_err());
  }

  #[test]
  fn patch_null_clears_descripcion_only() {
    let mut activity = Activity {
      id:           Uuid::new_v4(),
      nombre:       "Taller A".into(),
      tipo:         ActivityKind::Workshop,
      descripcion:  Some("intro".into()),
      coordinadora: "Ana".into(),
      lugar:        "Sala 1".into(),
      created_at:   Utc::now(),
    };
    let patch: ActivityPatch =
      serde_json::from_str(r#"{"descripcion": null}"#).unwrap();
    patch.validate().unwrap();
    patch.apply(&mut activity);

    assert!(activity.descripcion.is_none());
    assert_eq!(activity.nombre, "Taller A");
  }
}

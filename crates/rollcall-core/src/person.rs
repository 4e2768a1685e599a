//! Person — an individual identified by a unique national ID (RUT).
//!
//! Wire field names follow the established Spanish API contract consumed by
//! the frontend; Rust-side names stay English.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  Patch, Result,
  validate::{patch_required_str, required_str},
};

/// A unique individual.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
  pub id:        Uuid,
  /// National ID; unique across all persons.
  pub rut:       String,
  /// Last name(s).
  pub apellidos: String,
  /// First name(s).
  pub nombres:   String,
}

/// Payload accepted by `POST /persons/`.
#[derive(Debug, Clone, Deserialize)]
pub struct NewPerson {
  pub rut:       String,
  pub apellidos: String,
  pub nombres:   String,
}

impl NewPerson {
  pub fn validate(&self) -> Result<()> {
    required_str("rut", &self.rut, 20)?;
    required_str("apellidos", &self.apellidos, 255)?;
    required_str("nombres", &self.nombres, 255)?;
    Ok(())
  }
}

/// Partial update accepted by `PUT /persons/{id}`. Every person field is
/// required on the entity, so `null` is rejected for each.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PersonPatch {
  #[serde(default)]
  pub rut:       Patch<String>,
  #[serde(default)]
  pub apellidos: Patch<String>,
  #[serde(default)]
  pub nombres:   Patch<String>,
}

impl PersonPatch {
  pub fn validate(&self) -> Result<()> {
    patch_required_str("rut", &self.rut, 20)?;
    patch_required_str("apellidos", &self.apellidos, 255)?;
    patch_required_str("nombres", &self.nombres, 255)?;
    Ok(())
  }

  pub fn apply(self, person: &mut Person) {
    self.rut.apply_to(&mut person.rut);
    self.apellidos.apply_to(&mut person.apellidos);
    self.nombres.apply_to(&mut person.nombres);
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn new_person_rejects_empty_rut() {
    let input = NewPerson {
      rut:       String::new(),
      apellidos: "Perez".into(),
      nombres:   "Juan".into(),
    };
    assert!(input.validate().is_err());
  }

  #[test]
  fn new_person_rejects_overlong_rut() {
    let input = NewPerson {
      rut:       "1".repeat(21),
      apellidos: "Perez".into(),
      nombres:   "Juan".into(),
    };
    assert!(input.validate().is_err());
  }

  #[test]
  fn patch_rejects_null_on_required_field() {
    let patch: PersonPatch =
      serde_json::from_str(r#"{"rut": null}"#).unwrap();
    assert!(patch.validate().is_err());
  }

  #[test]
  fn patch_applies_only_present_fields() {
    let mut person = Person {
      id:        Uuid::new_v4(),
      rut:       "1-9".into(),
      apellidos: "Perez".into(),
      nombres:   "Juan".into(),
    };
    let patch: PersonPatch =
      serde_json::from_str(r#"{"nombres": "Juan Pablo"}"#).unwrap();
    patch.validate().unwrap();
    patch.apply(&mut person);

    assert_eq!(person.nombres, "Juan Pablo");
    assert_eq!(person.rut, "1-9");
    assert_eq!(person.apellidos, "Perez");
  }
}

//! Three-state field wrapper for partial-update payloads.
//!
//! JSON partial updates must distinguish a field that was omitted from one
//! explicitly set to `null`. `Option<T>` collapses both into `None`;
//! [`Patch<T>`] keeps them apart.

use serde::{Deserialize, Deserializer};

/// One field of a partial-update payload.
///
/// With `#[serde(default)]` on the field, an omitted key deserialises to
/// [`Patch::Missing`] while an explicit `null` becomes [`Patch::Null`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Patch<T> {
  /// Field absent from the payload — leave the stored value untouched.
  #[default]
  Missing,
  /// Field explicitly `null` — clear the stored value (optional fields only).
  Null,
  /// Field present — replace the stored value.
  Value(T),
}

impl<T> Patch<T> {
  pub fn is_missing(&self) -> bool { matches!(self, Patch::Missing) }

  pub fn is_null(&self) -> bool { matches!(self, Patch::Null) }

  /// Apply to a required stored field. `Null` is a no-op here; payload
  /// validation rejects `null` on required fields before this runs.
  pub fn apply_to(self, slot: &mut T) {
    if let Patch::Value(v) = self {
      *slot = v;
    }
  }

  /// Apply to an optional stored field: `Null` clears it, `Value` replaces
  /// it, `Missing` leaves it untouched.
  pub fn apply_to_opt(self, slot: &mut Option<T>) {
    match self {
      Patch::Missing => {}
      Patch::Null => *slot = None,
      Patch::Value(v) => *slot = Some(v),
    }
  }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
  fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
  where
    D: Deserializer<'de>,
  {
    Option::<T>::deserialize(deserializer).map(|opt| match opt {
      Some(v) => Patch::Value(v),
      None => Patch::Null,
    })
  }
}

//! Field-level validation helpers shared by the payload types.

use crate::{Error, Patch, Result};

pub(crate) fn max_len(field: &str, value: &str, max: usize) -> Result<()> {
  if value.chars().count() > max {
    return Err(Error::Validation(format!(
      "{field} must be at most {max} characters"
    )));
  }
  Ok(())
}

/// Required string field: non-empty, at most `max` characters.
pub(crate) fn required_str(field: &str, value: &str, max: usize) -> Result<()> {
  if value.is_empty() {
    return Err(Error::Validation(format!("{field} must not be empty")));
  }
  max_len(field, value, max)
}

pub(crate) fn optional_str(
  field: &str,
  value: &Option<String>,
  max: usize,
) -> Result<()> {
  match value {
    Some(v) => max_len(field, v, max),
    None => Ok(()),
  }
}

/// Patch over a required string column: `null` is rejected, a present value
/// must pass the same checks as on create.
pub(crate) fn patch_required_str(
  field: &str,
  patch: &Patch<String>,
  max: usize,
) -> Result<()> {
  match patch {
    Patch::Missing => Ok(()),
    Patch::Null => {
      Err(Error::Validation(format!("{field} must not be null")))
    }
    Patch::Value(v) => required_str(field, v, max),
  }
}

/// Patch over an optional string column: `null` clears, a present value is
/// length-checked.
pub(crate) fn patch_optional_str(
  field: &str,
  patch: &Patch<String>,
  max: usize,
) -> Result<()> {
  match patch {
    Patch::Value(v) => max_len(field, v, max),
    _ => Ok(()),
  }
}

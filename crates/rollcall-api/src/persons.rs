//! Handlers for `/persons/` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/persons/` | list, no pagination |
//! | `GET`    | `/persons/:id` | 404 if absent |
//! | `POST`   | `/persons/` | 201; 400 on duplicate rut |
//! | `PUT`    | `/persons/:id` | partial update; 404 |
//! | `DELETE` | `/persons/:id` | 204; 404 |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use rollcall_core::{
  person::{NewPerson, Person, PersonPatch},
  store::AttendanceStore,
};
use uuid::Uuid;

use crate::error::ApiError;

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /persons/`
pub async fn list<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<Person>>, ApiError>
where
  S: AttendanceStore,
{
  let persons = store.list_persons().await.map_err(ApiError::from_store)?;
  Ok(Json(persons))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /persons/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Person>, ApiError>
where
  S: AttendanceStore,
{
  let person = store
    .get_person(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound(format!("person {id} not found")))?;
  Ok(Json(person))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /persons/` — body: [`NewPerson`]. Rejects a duplicate national ID.
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewPerson>,
) -> Result<impl IntoResponse, ApiError>
where
  S: AttendanceStore,
{
  body.validate()?;

  // Fast path with a precise message; the unique constraint backs it up.
  if store
    .find_person_by_rut(&body.rut)
    .await
    .map_err(ApiError::from_store)?
    .is_some()
  {
    return Err(ApiError::Conflict(format!(
      "rut {:?} is already registered",
      body.rut
    )));
  }

  let person = store
    .create_person(body)
    .await
    .map_err(|e| ApiError::from_write(e, "rut is already registered"))?;
  Ok((StatusCode::CREATED, Json(person)))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /persons/:id` — body: [`PersonPatch`]; only present fields change.
pub async fn update<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Json(patch): Json<PersonPatch>,
) -> Result<Json<Person>, ApiError>
where
  S: AttendanceStore,
{
  patch.validate()?;

  let person = store
    .update_person(id, patch)
    .await
    .map_err(|e| ApiError::from_write(e, "rut is already registered"))?
    .ok_or_else(|| ApiError::NotFound(format!("person {id} not found")))?;
  Ok(Json(person))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /persons/:id` — attendance rows referencing the person cascade.
pub async fn delete<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: AttendanceStore,
{
  if store.delete_person(id).await.map_err(ApiError::from_store)? {
    Ok(StatusCode::NO_CONTENT)
  } else {
    Err(ApiError::NotFound(format!("person {id} not found")))
  }
}

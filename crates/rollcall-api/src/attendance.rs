//! Handlers for attendance endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/instances/:id/attendance/` | roster joined with person; 404 |
//! | `GET`    | `/persons/:id/attendance/` | history, newest first; 404 |
//! | `POST`   | `/attendance/` | strict registration: 201; 404; 400 on duplicate pair |
//! | `PUT`    | `/attendance/:id` | marks attended + stamps timestamp; 404 |
//! | `POST`   | `/instances/:id/register` | idempotent convenience registration |
//! | `DELETE` | `/attendance/:id` | 204; 404 |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::{IntoResponse, Response},
};
use rollcall_core::{
  attendance::{Attendance, HistoryEntry, NewAttendance, RosterEntry},
  store::{AttendanceStore, StoreError as _},
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::error::ApiError;

// ─── Roster ───────────────────────────────────────────────────────────────────

/// `GET /instances/:id/attendance/`
pub async fn list_for_instance<S>(
  State(store): State<Arc<S>>,
  Path(instance_id): Path<Uuid>,
) -> Result<Json<Vec<RosterEntry>>, ApiError>
where
  S: AttendanceStore,
{
  if store
    .get_instance(instance_id)
    .await
    .map_err(ApiError::from_store)?
    .is_none()
  {
    return Err(ApiError::NotFound(format!(
      "instance {instance_id} not found"
    )));
  }

  let roster = store
    .list_roster(instance_id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(roster))
}

// ─── History ──────────────────────────────────────────────────────────────────

/// `GET /persons/:id/attendance/` — ordered by instance date descending;
/// location/coordinator fall back to the activity's values.
pub async fn history_for_person<S>(
  State(store): State<Arc<S>>,
  Path(person_id): Path<Uuid>,
) -> Result<Json<Vec<HistoryEntry>>, ApiError>
where
  S: AttendanceStore,
{
  if store
    .get_person(person_id)
    .await
    .map_err(ApiError::from_store)?
    .is_none()
  {
    return Err(ApiError::NotFound(format!("person {person_id} not found")));
  }

  let history = store
    .person_history(person_id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(history))
}

// ─── Create (strict) ──────────────────────────────────────────────────────────

/// `POST /attendance/` — body: [`NewAttendance`]. A duplicate
/// (person, instance) pair is a conflict.
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewAttendance>,
) -> Result<impl IntoResponse, ApiError>
where
  S: AttendanceStore,
{
  ensure_person_and_instance(
    store.as_ref(),
    body.persona_id,
    body.asunto_instancia_id,
  )
  .await?;

  if store
    .find_attendance(body.persona_id, body.asunto_instancia_id)
    .await
    .map_err(ApiError::from_store)?
    .is_some()
  {
    return Err(ApiError::Conflict(
      "person is already registered for this instance".into(),
    ));
  }

  let attendance = store.create_attendance(body).await.map_err(|e| {
    ApiError::from_write(e, "person is already registered for this instance")
  })?;
  Ok((StatusCode::CREATED, Json(attendance)))
}

// ─── Mark ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct MarkBody {
  pub asistio: bool,
}

/// `PUT /attendance/:id` — body: `{"asistio": true|false}`. Stamps
/// `fecha_marcado` in both directions.
pub async fn mark<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<MarkBody>,
) -> Result<Json<Attendance>, ApiError>
where
  S: AttendanceStore,
{
  let attendance = store
    .mark_attendance(id, body.asistio)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| {
      ApiError::NotFound(format!("attendance record {id} not found"))
    })?;
  Ok(Json(attendance))
}

// ─── Register (convenience) ───────────────────────────────────────────────────

/// Body accepted by `POST /instances/:id/register`.
///
/// `person_id` is validated by hand so its absence yields 400 rather than a
/// deserialisation rejection.
#[derive(Debug, Deserialize)]
pub struct RegisterBody {
  pub person_id: Option<Uuid>,
  #[serde(default)]
  pub asistio:   bool,
}

/// `POST /instances/:id/register` — the softer idempotent-registration path:
/// an already-registered pair answers with an informational message instead
/// of a conflict.
pub async fn register_default<S>(
  State(store): State<Arc<S>>,
  Path(instance_id): Path<Uuid>,
  Json(body): Json<RegisterBody>,
) -> Result<Response, ApiError>
where
  S: AttendanceStore,
{
  let Some(person_id) = body.person_id else {
    return Err(ApiError::BadRequest("person_id is required".into()));
  };

  ensure_person_and_instance(store.as_ref(), person_id, instance_id).await?;

  if store
    .find_attendance(person_id, instance_id)
    .await
    .map_err(ApiError::from_store)?
    .is_some()
  {
    return Ok(already_registered());
  }

  let input = NewAttendance {
    persona_id:          person_id,
    asunto_instancia_id: instance_id,
    asistio:             body.asistio,
  };
  match store.create_attendance(input).await {
    Ok(attendance) => Ok(
      (
        StatusCode::CREATED,
        Json(json!({
          "id": attendance.id,
          "person_id": attendance.persona_id,
          "asistio": attendance.asistio,
        })),
      )
        .into_response(),
    ),
    // A concurrent register won the race; stay idempotent.
    Err(e) if e.is_unique_violation() => Ok(already_registered()),
    Err(e) => Err(ApiError::Store(Box::new(e))),
  }
}

fn already_registered() -> Response {
  (
    StatusCode::OK,
    Json(json!({ "message": "person is already registered" })),
  )
    .into_response()
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /attendance/:id`
pub async fn delete<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: AttendanceStore,
{
  if store
    .delete_attendance(id)
    .await
    .map_err(ApiError::from_store)?
  {
    Ok(StatusCode::NO_CONTENT)
  } else {
    Err(ApiError::NotFound(format!(
      "attendance record {id} not found"
    )))
  }
}

// ─── Shared checks ────────────────────────────────────────────────────────────

async fn ensure_person_and_instance<S>(
  store: &S,
  person_id: Uuid,
  instance_id: Uuid,
) -> Result<(), ApiError>
where
  S: AttendanceStore,
{
  if store
    .get_person(person_id)
    .await
    .map_err(ApiError::from_store)?
    .is_none()
  {
    return Err(ApiError::NotFound(format!("person {person_id} not found")));
  }
  if store
    .get_instance(instance_id)
    .await
    .map_err(ApiError::from_store)?
    .is_none()
  {
    return Err(ApiError::NotFound(format!(
      "instance {instance_id} not found"
    )));
  }
  Ok(())
}

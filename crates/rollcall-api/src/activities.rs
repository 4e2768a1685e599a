//! Handlers for `/activities/` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/activities/` | list, each with `instance_count` |
//! | `GET`    | `/activities/:id` | with `instance_count`; 404 |
//! | `POST`   | `/activities/` | 201; 400 on duplicate name |
//! | `PUT`    | `/activities/:id` | partial update; 404 |
//! | `DELETE` | `/activities/:id` | 204; 404 — instances cascade |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use rollcall_core::{
  activity::{Activity, ActivityPatch, NewActivity},
  store::AttendanceStore,
};
use serde::Serialize;
use uuid::Uuid;

use crate::error::ApiError;

/// An activity enriched with its live instance count.
#[derive(Debug, Serialize)]
pub struct ActivityDetail {
  #[serde(flatten)]
  pub activity:       Activity,
  pub instance_count: u64,
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /activities/` — counts are computed per request, never cached.
pub async fn list<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<ActivityDetail>>, ApiError>
where
  S: AttendanceStore,
{
  let activities = store
    .list_activities()
    .await
    .map_err(ApiError::from_store)?;

  let mut details = Vec::with_capacity(activities.len());
  for activity in activities {
    let instance_count = store
      .instance_count(activity.id)
      .await
      .map_err(ApiError::from_store)?;
    details.push(ActivityDetail { activity, instance_count });
  }

  Ok(Json(details))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /activities/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<ActivityDetail>, ApiError>
where
  S: AttendanceStore,
{
  let activity = store
    .get_activity(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound(format!("activity {id} not found")))?;

  let instance_count = store
    .instance_count(id)
    .await
    .map_err(ApiError::from_store)?;

  Ok(Json(ActivityDetail { activity, instance_count }))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /activities/` — body: [`NewActivity`]. Rejects a duplicate name.
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewActivity>,
) -> Result<impl IntoResponse, ApiError>
where
  S: AttendanceStore,
{
  body.validate()?;

  if store
    .find_activity_by_name(&body.nombre)
    .await
    .map_err(ApiError::from_store)?
    .is_some()
  {
    return Err(ApiError::Conflict(format!(
      "activity name {:?} already exists",
      body.nombre
    )));
  }

  let activity = store
    .create_activity(body)
    .await
    .map_err(|e| ApiError::from_write(e, "activity name already exists"))?;
  Ok((StatusCode::CREATED, Json(activity)))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /activities/:id` — body: [`ActivityPatch`].
pub async fn update<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Json(patch): Json<ActivityPatch>,
) -> Result<Json<Activity>, ApiError>
where
  S: AttendanceStore,
{
  patch.validate()?;

  let activity = store
    .update_activity(id, patch)
    .await
    .map_err(|e| ApiError::from_write(e, "activity name already exists"))?
    .ok_or_else(|| ApiError::NotFound(format!("activity {id} not found")))?;
  Ok(Json(activity))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /activities/:id` — owned instances and their attendance cascade.
pub async fn delete<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: AttendanceStore,
{
  if store
    .delete_activity(id)
    .await
    .map_err(ApiError::from_store)?
  {
    Ok(StatusCode::NO_CONTENT)
  } else {
    Err(ApiError::NotFound(format!("activity {id} not found")))
  }
}

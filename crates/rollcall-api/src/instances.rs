//! Handlers for activity-instance endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/activities/:id/instances/` | list with registered/present counts |
//! | `GET`    | `/instances/:id` | with counts; 404 |
//! | `POST`   | `/instances/` | 201; 404 if the owning activity is missing |
//! | `PUT`    | `/instances/:id` | partial update; 404 |
//! | `DELETE` | `/instances/:id` | 204; 404 — attendance cascades |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use rollcall_core::{
  instance::{ActivityInstance, InstancePatch, NewInstance},
  store::AttendanceStore,
};
use serde::Serialize;
use uuid::Uuid;

use crate::error::ApiError;

/// An instance enriched with its live attendance counts.
#[derive(Debug, Serialize)]
pub struct InstanceDetail {
  #[serde(flatten)]
  pub instance:         ActivityInstance,
  pub registered_count: u64,
  pub present_count:    u64,
}

async fn with_counts<S>(
  store: &S,
  instance: ActivityInstance,
) -> Result<InstanceDetail, ApiError>
where
  S: AttendanceStore,
{
  let counts = store
    .instance_counts(instance.id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(InstanceDetail {
    instance,
    registered_count: counts.registered,
    present_count: counts.present,
  })
}

// ─── List for activity ────────────────────────────────────────────────────────

/// `GET /activities/:id/instances/`
///
/// An activity with zero instances legitimately returns an empty list; the
/// activity's own existence is only verified when the result set is empty.
pub async fn list_for_activity<S>(
  State(store): State<Arc<S>>,
  Path(activity_id): Path<Uuid>,
) -> Result<Json<Vec<InstanceDetail>>, ApiError>
where
  S: AttendanceStore,
{
  let instances = store
    .list_instances(activity_id)
    .await
    .map_err(ApiError::from_store)?;

  if instances.is_empty()
    && store
      .get_activity(activity_id)
      .await
      .map_err(ApiError::from_store)?
      .is_none()
  {
    return Err(ApiError::NotFound(format!(
      "activity {activity_id} not found"
    )));
  }

  let mut details = Vec::with_capacity(instances.len());
  for instance in instances {
    details.push(with_counts(store.as_ref(), instance).await?);
  }

  Ok(Json(details))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /instances/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<InstanceDetail>, ApiError>
where
  S: AttendanceStore,
{
  let instance = store
    .get_instance(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound(format!("instance {id} not found")))?;

  Ok(Json(with_counts(store.as_ref(), instance).await?))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /instances/` — body: [`NewInstance`]; 404 when the owning activity
/// does not exist.
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewInstance>,
) -> Result<impl IntoResponse, ApiError>
where
  S: AttendanceStore,
{
  body.validate()?;

  if store
    .get_activity(body.asunto_id)
    .await
    .map_err(ApiError::from_store)?
    .is_none()
  {
    return Err(ApiError::NotFound(format!(
      "activity {} not found",
      body.asunto_id
    )));
  }

  let instance = store
    .create_instance(body)
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(instance)))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /instances/:id` — body: [`InstancePatch`]. The owning activity
/// reference is immutable.
pub async fn update<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Json(patch): Json<InstancePatch>,
) -> Result<Json<ActivityInstance>, ApiError>
where
  S: AttendanceStore,
{
  patch.validate()?;

  let instance = store
    .update_instance(id, patch)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound(format!("instance {id} not found")))?;
  Ok(Json(instance))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /instances/:id` — attendance rows referencing the instance cascade.
pub async fn delete<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: AttendanceStore,
{
  if store
    .delete_instance(id)
    .await
    .map_err(ApiError::from_store)?
  {
    Ok(StatusCode::NO_CONTENT)
  } else {
    Err(ApiError::NotFound(format!("instance {id} not found")))
  }
}

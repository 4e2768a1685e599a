//! JSON REST API for Rollcall.
//!
//! Exposes an axum [`Router`] backed by any
//! [`rollcall_core::store::AttendanceStore`]. CORS, TLS, and transport
//! concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = rollcall_api::api_router(store.clone());
//! ```

pub mod activities;
pub mod attendance;
pub mod error;
pub mod instances;
pub mod persons;

use std::sync::Arc;

use axum::{
  Json, Router,
  routing::{get, post, put},
};
use rollcall_core::store::AttendanceStore;
use serde_json::{Value, json};

pub use error::ApiError;

async fn health() -> Json<Value> {
  Json(json!({ "status": "online" }))
}

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type. Collection routes carry a trailing slash.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: AttendanceStore + Clone + Send + Sync + 'static,
{
  Router::new()
    // Persons
    .route(
      "/persons/",
      get(persons::list::<S>).post(persons::create::<S>),
    )
    .route(
      "/persons/{id}",
      get(persons::get_one::<S>)
        .put(persons::update::<S>)
        .delete(persons::delete::<S>),
    )
    .route(
      "/persons/{id}/attendance/",
      get(attendance::history_for_person::<S>),
    )
    // Activities
    .route(
      "/activities/",
      get(activities::list::<S>).post(activities::create::<S>),
    )
    .route(
      "/activities/{id}",
      get(activities::get_one::<S>)
        .put(activities::update::<S>)
        .delete(activities::delete::<S>),
    )
    .route(
      "/activities/{id}/instances/",
      get(instances::list_for_activity::<S>),
    )
    // Instances
    .route("/instances/", post(instances::create::<S>))
    .route(
      "/instances/{id}",
      get(instances::get_one::<S>)
        .put(instances::update::<S>)
        .delete(instances::delete::<S>),
    )
    .route(
      "/instances/{id}/attendance/",
      get(attendance::list_for_instance::<S>),
    )
    .route(
      "/instances/{id}/register",
      post(attendance::register_default::<S>),
    )
    // Attendance
    .route("/attendance/", post(attendance::create::<S>))
    .route(
      "/attendance/{id}",
      put(attendance::mark::<S>).delete(attendance::delete::<S>),
    )
    // Liveness
    .route("/health", get(health))
    .with_state(store)
}

//! The `AttendanceStore` trait and its error contract.
//!
//! The trait is implemented by storage backends (e.g.
//! `rollcall-store-sqlite`). The API layer depends on this abstraction, not
//! on any concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::{
  activity::{Activity, ActivityPatch, NewActivity},
  attendance::{Attendance, HistoryEntry, NewAttendance, RosterEntry},
  instance::{ActivityInstance, InstanceCounts, InstancePatch, NewInstance},
  person::{NewPerson, Person, PersonPatch},
};

// ─── Error contract ──────────────────────────────────────────────────────────

/// Backend error contract.
///
/// Uniqueness is enforced twice: an application-level existence check (fast
/// path, better message) and a schema-level unique constraint that backs it
/// up under concurrent writes. `is_unique_violation` lets callers translate
/// the storage-level rejection — the loser of a check-then-insert race — into
/// the same CONFLICT signal the fast path produces.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  fn is_unique_violation(&self) -> bool;
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over an attendance store backend.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait AttendanceStore: Send + Sync {
  type Error: StoreError;

  // ── Persons ───────────────────────────────────────────────────────────

  /// Create and persist a new person. The identifier is store-assigned.
  fn create_person(
    &self,
    input: NewPerson,
  ) -> impl Future<Output = Result<Person, Self::Error>> + Send + '_;

  /// Retrieve a person by id. Returns `None` if not found.
  fn get_person(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + '_;

  /// List all persons; no pagination.
  fn list_persons(
    &self,
  ) -> impl Future<Output = Result<Vec<Person>, Self::Error>> + Send + '_;

  /// Look up a person by national ID; the uniqueness fast path.
  fn find_person_by_rut<'a>(
    &'a self,
    rut: &'a str,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + 'a;

  /// Apply a partial update. Returns `None` if the person does not exist.
  fn update_person(
    &self,
    id: Uuid,
    patch: PersonPatch,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + '_;

  /// Delete a person; dependent attendance rows cascade. Returns `false` if
  /// the person did not exist.
  fn delete_person(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Activities ────────────────────────────────────────────────────────

  fn create_activity(
    &self,
    input: NewActivity,
  ) -> impl Future<Output = Result<Activity, Self::Error>> + Send + '_;

  fn get_activity(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Activity>, Self::Error>> + Send + '_;

  fn list_activities(
    &self,
  ) -> impl Future<Output = Result<Vec<Activity>, Self::Error>> + Send + '_;

  /// Look up an activity by name; the uniqueness fast path.
  fn find_activity_by_name<'a>(
    &'a self,
    nombre: &'a str,
  ) -> impl Future<Output = Result<Option<Activity>, Self::Error>> + Send + 'a;

  /// Number of instances owned by the activity, computed live.
  fn instance_count(
    &self,
    activity_id: Uuid,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  fn update_activity(
    &self,
    id: Uuid,
    patch: ActivityPatch,
  ) -> impl Future<Output = Result<Option<Activity>, Self::Error>> + Send + '_;

  /// Delete an activity; its instances and their attendance cascade.
  fn delete_activity(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Instances ─────────────────────────────────────────────────────────

  /// Create an instance. The caller verifies the owning activity exists;
  /// the foreign key backs that check up.
  fn create_instance(
    &self,
    input: NewInstance,
  ) -> impl Future<Output = Result<ActivityInstance, Self::Error>> + Send + '_;

  fn get_instance(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<ActivityInstance>, Self::Error>> + Send + '_;

  /// All instances under one activity. An activity with zero instances
  /// yields an empty list, not an error.
  fn list_instances(
    &self,
    activity_id: Uuid,
  ) -> impl Future<Output = Result<Vec<ActivityInstance>, Self::Error>> + Send + '_;

  /// Registered/present counts for one instance, computed live.
  fn instance_counts(
    &self,
    instance_id: Uuid,
  ) -> impl Future<Output = Result<InstanceCounts, Self::Error>> + Send + '_;

  fn update_instance(
    &self,
    id: Uuid,
    patch: InstancePatch,
  ) -> impl Future<Output = Result<Option<ActivityInstance>, Self::Error>> + Send + '_;

  /// Delete an instance; its attendance rows cascade.
  fn delete_instance(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Attendance ────────────────────────────────────────────────────────

  /// Register a person against an instance. `fecha_marcado` is left unset.
  fn create_attendance(
    &self,
    input: NewAttendance,
  ) -> impl Future<Output = Result<Attendance, Self::Error>> + Send + '_;

  fn get_attendance(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Attendance>, Self::Error>> + Send + '_;

  /// Look up the row for one (person, instance) pair; the pair-uniqueness
  /// fast path.
  fn find_attendance(
    &self,
    person_id: Uuid,
    instance_id: Uuid,
  ) -> impl Future<Output = Result<Option<Attendance>, Self::Error>> + Send + '_;

  /// Roster for one instance: each attendance row joined with its person.
  fn list_roster(
    &self,
    instance_id: Uuid,
  ) -> impl Future<Output = Result<Vec<RosterEntry>, Self::Error>> + Send + '_;

  /// Full attendance history for one person, joined through instance and
  /// activity, ordered by instance date descending.
  fn person_history(
    &self,
    person_id: Uuid,
  ) -> impl Future<Output = Result<Vec<HistoryEntry>, Self::Error>> + Send + '_;

  /// Set the attended flag and stamp `fecha_marcado` to now, in both
  /// directions. Returns `None` if the row does not exist.
  fn mark_attendance(
    &self,
    id: Uuid,
    asistio: bool,
  ) -> impl Future<Output = Result<Option<Attendance>, Self::Error>> + Send + '_;

  fn delete_attendance(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}

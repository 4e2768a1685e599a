//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::NaiveDate;
use rollcall_core::{
  activity::{ActivityKind, ActivityPatch, NewActivity},
  attendance::NewAttendance,
  instance::{InstancePatch, NewInstance},
  person::{NewPerson, PersonPatch},
  store::{AttendanceStore, StoreError as _},
};
use uuid::Uuid;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn new_person(rut: &str) -> NewPerson {
  NewPerson {
    rut:       rut.into(),
    apellidos: "Perez".into(),
    nombres:   "Juan".into(),
  }
}

fn new_activity(nombre: &str) -> NewActivity {
  NewActivity {
    nombre:       nombre.into(),
    tipo:         ActivityKind::Workshop,
    descripcion:  None,
    coordinadora: "Ana".into(),
    lugar:        "Sala 1".into(),
  }
}

fn new_instance(activity_id: Uuid, fecha: &str) -> NewInstance {
  NewInstance {
    asunto_id:     activity_id,
    fecha:         fecha.parse::<NaiveDate>().unwrap(),
    lugar:         None,
    coordinadora:  None,
    observaciones: None,
  }
}

// ─── Persons ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_get_person() {
  let s = store().await;

  let person = s.create_person(new_person("1-9")).await.unwrap();
  assert_eq!(person.rut, "1-9");

  let fetched = s.get_person(person.id).await.unwrap().unwrap();
  assert_eq!(fetched.id, person.id);
  assert_eq!(fetched.apellidos, "Perez");
  assert_eq!(fetched.nombres, "Juan");
}

#[tokio::test]
async fn get_person_missing_returns_none() {
  let s = store().await;
  assert!(s.get_person(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn list_persons_returns_all() {
  let s = store().await;
  s.create_person(new_person("1-9")).await.unwrap();
  s.create_person(new_person("2-7")).await.unwrap();

  let all = s.list_persons().await.unwrap();
  assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn find_person_by_rut() {
  let s = store().await;
  let person = s.create_person(new_person("1-9")).await.unwrap();

  let found = s.find_person_by_rut("1-9").await.unwrap().unwrap();
  assert_eq!(found.id, person.id);
  assert!(s.find_person_by_rut("9-9").await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_rut_is_unique_violation() {
  let s = store().await;
  s.create_person(new_person("1-9")).await.unwrap();

  let err = s.create_person(new_person("1-9")).await.unwrap_err();
  assert!(err.is_unique_violation());
}

#[tokio::test]
async fn update_person_applies_only_present_fields() {
  let s = store().await;
  let person = s.create_person(new_person("1-9")).await.unwrap();

  let patch: PersonPatch =
    serde_json::from_str(r#"{"nombres": "Juan Pablo"}"#).unwrap();
  let updated = s.update_person(person.id, patch).await.unwrap().unwrap();

  assert_eq!(updated.nombres, "Juan Pablo");
  assert_eq!(updated.rut, "1-9");
  assert_eq!(updated.apellidos, "Perez");
}

#[tokio::test]
async fn update_person_to_taken_rut_is_unique_violation() {
  let s = store().await;
  s.create_person(new_person("1-9")).await.unwrap();
  let other = s.create_person(new_person("2-7")).await.unwrap();

  let patch: PersonPatch = serde_json::from_str(r#"{"rut": "1-9"}"#).unwrap();
  let err = s.update_person(other.id, patch).await.unwrap_err();
  assert!(err.is_unique_violation());
}

#[tokio::test]
async fn update_missing_person_returns_none() {
  let s = store().await;
  let result = s
    .update_person(Uuid::new_v4(), PersonPatch::default())
    .await
    .unwrap();
  assert!(result.is_none());
}

#[tokio::test]
async fn delete_person_returns_false_when_missing() {
  let s = store().await;
  let person = s.create_person(new_person("1-9")).await.unwrap();

  assert!(s.delete_person(person.id).await.unwrap());
  assert!(!s.delete_person(person.id).await.unwrap());
  assert!(s.get_person(person.id).await.unwrap().is_none());
}

// ─── Activities ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_get_activity() {
  let s = store().await;

  let activity = s.create_activity(new_activity("Taller A")).await.unwrap();
  let fetched = s.get_activity(activity.id).await.unwrap().unwrap();

  assert_eq!(fetched.nombre, "Taller A");
  assert_eq!(fetched.tipo, ActivityKind::Workshop);
  assert_eq!(fetched.coordinadora, "Ana");
  assert!(fetched.descripcion.is_none());
}

#[tokio::test]
async fn duplicate_activity_name_is_unique_violation() {
  let s = store().await;
  s.create_activity(new_activity("Taller A")).await.unwrap();

  let err = s
    .create_activity(new_activity("Taller A"))
    .await
    .unwrap_err();
  assert!(err.is_unique_violation());
}

#[tokio::test]
async fn instance_count_is_live() {
  let s = store().await;
  let activity = s.create_activity(new_activity("Taller A")).await.unwrap();

  assert_eq!(s.instance_count(activity.id).await.unwrap(), 0);

  s.create_instance(new_instance(activity.id, "2024-01-10"))
    .await
    .unwrap();
  let second = s
    .create_instance(new_instance(activity.id, "2024-01-17"))
    .await
    .unwrap();
  assert_eq!(s.instance_count(activity.id).await.unwrap(), 2);

  s.delete_instance(second.id).await.unwrap();
  assert_eq!(s.instance_count(activity.id).await.unwrap(), 1);
}

#[tokio::test]
async fn update_activity_null_clears_descripcion() {
  let s = store().await;
  let mut input = new_activity("Taller A");
  input.descripcion = Some("intro".into());
  let activity = s.create_activity(input).await.unwrap();

  let patch: ActivityPatch =
    serde_json::from_str(r#"{"descripcion": null, "lugar": "Sala 2"}"#)
      .unwrap();
  let updated = s.update_activity(activity.id, patch).await.unwrap().unwrap();

  assert!(updated.descripcion.is_none());
  assert_eq!(updated.lugar, "Sala 2");
  assert_eq!(updated.nombre, "Taller A");
}

// ─── Instances ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn list_instances_empty_for_activity_without_instances() {
  let s = store().await;
  let activity = s.create_activity(new_activity("Taller A")).await.unwrap();

  let instances = s.list_instances(activity.id).await.unwrap();
  assert!(instances.is_empty());
}

#[tokio::test]
async fn instance_counts_zero_for_fresh_instance() {
  let s = store().await;
  let activity = s.create_activity(new_activity("Taller A")).await.unwrap();
  let instance = s
    .create_instance(new_instance(activity.id, "2024-01-10"))
    .await
    .unwrap();

  let counts = s.instance_counts(instance.id).await.unwrap();
  assert_eq!(counts.registered, 0);
  assert_eq!(counts.present, 0);
}

#[tokio::test]
async fn instance_counts_track_registered_and_present() {
  let s = store().await;
  let activity = s.create_activity(new_activity("Taller A")).await.unwrap();
  let instance = s
    .create_instance(new_instance(activity.id, "2024-01-10"))
    .await
    .unwrap();
  let juan = s.create_person(new_person("1-9")).await.unwrap();
  let maria = s.create_person(new_person("2-7")).await.unwrap();

  let att = s
    .create_attendance(NewAttendance {
      persona_id:          juan.id,
      asunto_instancia_id: instance.id,
      asistio:             false,
    })
    .await
    .unwrap();
  s.create_attendance(NewAttendance {
    persona_id:          maria.id,
    asunto_instancia_id: instance.id,
    asistio:             false,
  })
  .await
  .unwrap();

  s.mark_attendance(att.id, true).await.unwrap();

  let counts = s.instance_counts(instance.id).await.unwrap();
  assert_eq!(counts.registered, 2);
  assert_eq!(counts.present, 1);
}

#[tokio::test]
async fn update_instance_patch_semantics() {
  let s = store().await;
  let activity = s.create_activity(new_activity("Taller A")).await.unwrap();
  let mut input = new_instance(activity.id, "2024-01-10");
  input.lugar = Some("Patio".into());
  let instance = s.create_instance(input).await.unwrap();

  let patch: InstancePatch =
    serde_json::from_str(r#"{"fecha": "2024-01-11", "lugar": null}"#).unwrap();
  let updated = s.update_instance(instance.id, patch).await.unwrap().unwrap();

  assert_eq!(updated.fecha, "2024-01-11".parse::<NaiveDate>().unwrap());
  assert!(updated.lugar.is_none());
  assert_eq!(updated.asunto_id, activity.id);
}

// ─── Attendance ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_attendance_leaves_fecha_marcado_unset() {
  let s = store().await;
  let activity = s.create_activity(new_activity("Taller A")).await.unwrap();
  let instance = s
    .create_instance(new_instance(activity.id, "2024-01-10"))
    .await
    .unwrap();
  let person = s.create_person(new_person("1-9")).await.unwrap();

  let att = s
    .create_attendance(NewAttendance {
      persona_id:          person.id,
      asunto_instancia_id: instance.id,
      asistio:             false,
    })
    .await
    .unwrap();

  let fetched = s.get_attendance(att.id).await.unwrap().unwrap();
  assert!(!fetched.asistio);
  assert!(fetched.fecha_marcado.is_none());
}

#[tokio::test]
async fn duplicate_pair_is_unique_violation() {
  let s = store().await;
  let activity = s.create_activity(new_activity("Taller A")).await.unwrap();
  let instance = s
    .create_instance(new_instance(activity.id, "2024-01-10"))
    .await
    .unwrap();
  let person = s.create_person(new_person("1-9")).await.unwrap();

  let input = NewAttendance {
    persona_id:          person.id,
    asunto_instancia_id: instance.id,
    asistio:             false,
  };
  s.create_attendance(input.clone()).await.unwrap();

  let err = s.create_attendance(input).await.unwrap_err();
  assert!(err.is_unique_violation());
}

#[tokio::test]
async fn find_attendance_by_pair() {
  let s = store().await;
  let activity = s.create_activity(new_activity("Taller A")).await.unwrap();
  let instance = s
    .create_instance(new_instance(activity.id, "2024-01-10"))
    .await
    .unwrap();
  let person = s.create_person(new_person("1-9")).await.unwrap();

  assert!(
    s.find_attendance(person.id, instance.id)
      .await
      .unwrap()
      .is_none()
  );

  let att = s
    .create_attendance(NewAttendance {
      persona_id:          person.id,
      asunto_instancia_id: instance.id,
      asistio:             false,
    })
    .await
    .unwrap();

  let found = s
    .find_attendance(person.id, instance.id)
    .await
    .unwrap()
    .unwrap();
  assert_eq!(found.id, att.id);
}

#[tokio::test]
async fn mark_attendance_stamps_fecha_marcado_in_both_directions() {
  let s = store().await;
  let activity = s.create_activity(new_activity("Taller A")).await.unwrap();
  let instance = s
    .create_instance(new_instance(activity.id, "2024-01-10"))
    .await
    .unwrap();
  let person = s.create_person(new_person("1-9")).await.unwrap();
  let att = s
    .create_attendance(NewAttendance {
      persona_id:          person.id,
      asunto_instancia_id: instance.id,
      asistio:             false,
    })
    .await
    .unwrap();

  let marked = s.mark_attendance(att.id, true).await.unwrap().unwrap();
  assert!(marked.asistio);
  assert!(marked.fecha_marcado.is_some());

  // Explicitly marking absent also stamps the timestamp.
  let unmarked = s.mark_attendance(att.id, false).await.unwrap().unwrap();
  assert!(!unmarked.asistio);
  assert!(unmarked.fecha_marcado.is_some());
  assert!(unmarked.fecha_marcado.unwrap() >= marked.fecha_marcado.unwrap());
}

#[tokio::test]
async fn mark_missing_attendance_returns_none() {
  let s = store().await;
  let result = s.mark_attendance(Uuid::new_v4(), true).await.unwrap();
  assert!(result.is_none());
}

// ─── Roster & history ────────────────────────────────────────────────────────

#[tokio::test]
async fn roster_joins_attendance_with_person() {
  let s = store().await;
  let activity = s.create_activity(new_activity("Taller A")).await.unwrap();
  let instance = s
    .create_instance(new_instance(activity.id, "2024-01-10"))
    .await
    .unwrap();
  let person = s.create_person(new_person("1-9")).await.unwrap();
  let att = s
    .create_attendance(NewAttendance {
      persona_id:          person.id,
      asunto_instancia_id: instance.id,
      asistio:             false,
    })
    .await
    .unwrap();

  let roster = s.list_roster(instance.id).await.unwrap();
  assert_eq!(roster.len(), 1);
  assert_eq!(roster[0].id, att.id);
  assert_eq!(roster[0].persona_id, person.id);
  assert_eq!(roster[0].nombre, "Juan Perez");
  assert_eq!(roster[0].rut, "1-9");
  assert!(!roster[0].asistio);
}

#[tokio::test]
async fn history_ordered_by_date_desc_with_fallbacks() {
  let s = store().await;
  let activity = s.create_activity(new_activity("Taller A")).await.unwrap();

  let older = s
    .create_instance(new_instance(activity.id, "2024-01-10"))
    .await
    .unwrap();
  let mut overridden = new_instance(activity.id, "2024-02-20");
  overridden.lugar = Some("Patio".into());
  overridden.coordinadora = Some("Rosa".into());
  let newer = s.create_instance(overridden).await.unwrap();

  let person = s.create_person(new_person("1-9")).await.unwrap();
  for instance_id in [older.id, newer.id] {
    s.create_attendance(NewAttendance {
      persona_id:          person.id,
      asunto_instancia_id: instance_id,
      asistio:             false,
    })
    .await
    .unwrap();
  }

  let history = s.person_history(person.id).await.unwrap();
  assert_eq!(history.len(), 2);

  // Most recent first; overrides win where present.
  assert_eq!(history[0].fecha, "2024-02-20".parse::<NaiveDate>().unwrap());
  assert_eq!(history[0].asunto, "Taller A");
  assert_eq!(history[0].lugar, "Patio");
  assert_eq!(history[0].coordinadora, "Rosa");

  // Older instance has no overrides; falls back to the activity's values.
  assert_eq!(history[1].fecha, "2024-01-10".parse::<NaiveDate>().unwrap());
  assert_eq!(history[1].lugar, "Sala 1");
  assert_eq!(history[1].coordinadora, "Ana");
}

// ─── Cascade deletes ─────────────────────────────────────────────────────────

#[tokio::test]
async fn delete_activity_cascades_instances_and_attendance() {
  let s = store().await;
  let activity = s.create_activity(new_activity("Taller A")).await.unwrap();
  let instance = s
    .create_instance(new_instance(activity.id, "2024-01-10"))
    .await
    .unwrap();
  let person = s.create_person(new_person("1-9")).await.unwrap();
  let att = s
    .create_attendance(NewAttendance {
      persona_id:          person.id,
      asunto_instancia_id: instance.id,
      asistio:             false,
    })
    .await
    .unwrap();

  assert!(s.delete_activity(activity.id).await.unwrap());

  assert!(s.get_instance(instance.id).await.unwrap().is_none());
  assert!(s.get_attendance(att.id).await.unwrap().is_none());
  // The person is referenced, never owned; it survives.
  assert!(s.get_person(person.id).await.unwrap().is_some());
}

#[tokio::test]
async fn delete_person_cascades_attendance() {
  let s = store().await;
  let activity = s.create_activity(new_activity("Taller A")).await.unwrap();
  let instance = s
    .create_instance(new_instance(activity.id, "2024-01-10"))
    .await
    .unwrap();
  let person = s.create_person(new_person("1-9")).await.unwrap();
  let att = s
    .create_attendance(NewAttendance {
      persona_id:          person.id,
      asunto_instancia_id: instance.id,
      asistio:             false,
    })
    .await
    .unwrap();

  assert!(s.delete_person(person.id).await.unwrap());

  assert!(s.get_attendance(att.id).await.unwrap().is_none());
  assert!(s.get_instance(instance.id).await.unwrap().is_some());
}

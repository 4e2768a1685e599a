//! [`SqliteStore`] — the SQLite implementation of [`AttendanceStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use rollcall_core::{
  activity::{Activity, ActivityPatch, NewActivity},
  attendance::{
    Attendance, HistoryEntry, NewAttendance, RosterEntry,
  },
  instance::{ActivityInstance, InstanceCounts, InstancePatch, NewInstance},
  person::{NewPerson, Person, PersonPatch},
  store::AttendanceStore,
};

use crate::{
  Error, Result,
  encode::{
    RawActivity, RawAttendance, RawInstance, RawPerson, decode_date,
    decode_uuid, encode_date, encode_dt, encode_kind, encode_uuid,
  },
  schema::SCHEMA,
};

const PERSON_COLS: &str = "person_id, rut, apellidos, nombres";
const ACTIVITY_COLS: &str =
  "activity_id, nombre, tipo, descripcion, coordinadora, lugar, created_at";
const INSTANCE_COLS: &str = "instance_id, activity_id, fecha, lugar, \
                             coordinadora, observaciones, created_at";
const ATTENDANCE_COLS: &str = "attendance_id, person_id, instance_id, \
                               asistio, fecha_marcado, updated_at";

fn person_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawPerson> {
  Ok(RawPerson {
    person_id: row.get(0)?,
    rut:       row.get(1)?,
    apellidos: row.get(2)?,
    nombres:   row.get(3)?,
  })
}

fn activity_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawActivity> {
  Ok(RawActivity {
    activity_id:  row.get(0)?,
    nombre:       row.get(1)?,
    tipo:         row.get(2)?,
    descripcion:  row.get(3)?,
    coordinadora: row.get(4)?,
    lugar:        row.get(5)?,
    created_at:   row.get(6)?,
  })
}

fn instance_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawInstance> {
  Ok(RawInstance {
    instance_id:   row.get(0)?,
    activity_id:   row.get(1)?,
    fecha:         row.get(2)?,
    lugar:         row.get(3)?,
    coordinadora:  row.get(4)?,
    observaciones: row.get(5)?,
    created_at:    row.get(6)?,
  })
}

fn attendance_from_row(
  row: &rusqlite::Row<'_>,
) -> rusqlite::Result<RawAttendance> {
  Ok(RawAttendance {
    attendance_id: row.get(0)?,
    person_id:     row.get(1)?,
    instance_id:   row.get(2)?,
    asistio:       row.get(3)?,
    fecha_marcado: row.get(4)?,
    updated_at:    row.get(5)?,
  })
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// An attendance store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) the database file at `path` without touching the
  /// schema. Call [`SqliteStore::init_schema`] before serving.
  pub async fn connect(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    Ok(Self { conn })
  }

  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let store = Self::connect(path).await?;
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store with the schema applied — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Ensure the expected tables exist. Creates, never migrates or alters.
  pub async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── AttendanceStore impl ────────────────────────────────────────────────────

impl AttendanceStore for SqliteStore {
  type Error = Error;

  // ── Persons ────────────────────────────────────────────────────────────────

  async fn create_person(&self, input: NewPerson) -> Result<Person> {
    let person = Person {
      id:        Uuid::new_v4(),
      rut:       input.rut,
      apellidos: input.apellidos,
      nombres:   input.nombres,
    };

    let id_str = encode_uuid(person.id);
    let (rut, apellidos, nombres) = (
      person.rut.clone(),
      person.apellidos.clone(),
      person.nombres.clone(),
    );

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO persons (person_id, rut, apellidos, nombres)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![id_str, rut, apellidos, nombres],
        )?;
        Ok(())
      })
      .await?;

    Ok(person)
  }

  async fn get_person(&self, id: Uuid) -> Result<Option<Person>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawPerson> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {PERSON_COLS} FROM persons WHERE person_id = ?1"),
              rusqlite::params![id_str],
              person_from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawPerson::into_person).transpose()
  }

  async fn list_persons(&self) -> Result<Vec<Person>> {
    let raws: Vec<RawPerson> = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare(&format!("SELECT {PERSON_COLS} FROM persons"))?;
        let rows = stmt
          .query_map([], person_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPerson::into_person).collect()
  }

  async fn find_person_by_rut(&self, rut: &str) -> Result<Option<Person>> {
    let rut = rut.to_owned();

    let raw: Option<RawPerson> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {PERSON_COLS} FROM persons WHERE rut = ?1"),
              rusqlite::params![rut],
              person_from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawPerson::into_person).transpose()
  }

  async fn update_person(
    &self,
    id: Uuid,
    patch: PersonPatch,
  ) -> Result<Option<Person>> {
    let Some(mut person) = self.get_person(id).await? else {
      return Ok(None);
    };
    patch.apply(&mut person);

    let id_str = encode_uuid(person.id);
    let (rut, apellidos, nombres) = (
      person.rut.clone(),
      person.apellidos.clone(),
      person.nombres.clone(),
    );

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE persons SET rut = ?2, apellidos = ?3, nombres = ?4
           WHERE person_id = ?1",
          rusqlite::params![id_str, rut, apellidos, nombres],
        )?;
        Ok(())
      })
      .await?;

    Ok(Some(person))
  }

  async fn delete_person(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);

    let deleted = self
      .conn
      .call(move |conn| {
        let n = conn.execute(
          "DELETE FROM persons WHERE person_id = ?1",
          rusqlite::params![id_str],
        )?;
        Ok(n > 0)
      })
      .await?;

    Ok(deleted)
  }

  // ── Activities ─────────────────────────────────────────────────────────────

  async fn create_activity(&self, input: NewActivity) -> Result<Activity> {
    let activity = Activity {
      id:           Uuid::new_v4(),
      nombre:       input.nombre,
      tipo:         input.tipo,
      descripcion:  input.descripcion,
      coordinadora: input.coordinadora,
      lugar:        input.lugar,
      created_at:   Utc::now(),
    };

    let id_str = encode_uuid(activity.id);
    let nombre = activity.nombre.clone();
    let tipo = encode_kind(activity.tipo).to_owned();
    let descripcion = activity.descripcion.clone();
    let coordinadora = activity.coordinadora.clone();
    let lugar = activity.lugar.clone();
    let created_at = encode_dt(activity.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO activities (
             activity_id, nombre, tipo, descripcion, coordinadora, lugar,
             created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          rusqlite::params![
            id_str,
            nombre,
            tipo,
            descripcion,
            coordinadora,
            lugar,
            created_at,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(activity)
  }

  async fn get_activity(&self, id: Uuid) -> Result<Option<Activity>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawActivity> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {ACTIVITY_COLS} FROM activities WHERE activity_id = ?1"
              ),
              rusqlite::params![id_str],
              activity_from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawActivity::into_activity).transpose()
  }

  async fn list_activities(&self) -> Result<Vec<Activity>> {
    let raws: Vec<RawActivity> = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare(&format!("SELECT {ACTIVITY_COLS} FROM activities"))?;
        let rows = stmt
          .query_map([], activity_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawActivity::into_activity).collect()
  }

  async fn find_activity_by_name(
    &self,
    nombre: &str,
  ) -> Result<Option<Activity>> {
    let nombre = nombre.to_owned();

    let raw: Option<RawActivity> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {ACTIVITY_COLS} FROM activities WHERE nombre = ?1"
              ),
              rusqlite::params![nombre],
              activity_from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawActivity::into_activity).transpose()
  }

  async fn instance_count(&self, activity_id: Uuid) -> Result<u64> {
    let id_str = encode_uuid(activity_id);

    let count: i64 = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "SELECT COUNT(*) FROM activity_instances WHERE activity_id = ?1",
          rusqlite::params![id_str],
          |row| row.get(0),
        )?)
      })
      .await?;

    Ok(count as u64)
  }

  async fn update_activity(
    &self,
    id: Uuid,
    patch: ActivityPatch,
  ) -> Result<Option<Activity>> {
    let Some(mut activity) = self.get_activity(id).await? else {
      return Ok(None);
    };
    patch.apply(&mut activity);

    let id_str = encode_uuid(activity.id);
    let nombre = activity.nombre.clone();
    let tipo = encode_kind(activity.tipo).to_owned();
    let descripcion = activity.descripcion.clone();
    let coordinadora = activity.coordinadora.clone();
    let lugar = activity.lugar.clone();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE activities
           SET nombre = ?2, tipo = ?3, descripcion = ?4, coordinadora = ?5,
               lugar = ?6
           WHERE activity_id = ?1",
          rusqlite::params![
            id_str,
            nombre,
            tipo,
            descripcion,
            coordinadora,
            lugar,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(Some(activity))
  }

  async fn delete_activity(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);

    let deleted = self
      .conn
      .call(move |conn| {
        let n = conn.execute(
          "DELETE FROM activities WHERE activity_id = ?1",
          rusqlite::params![id_str],
        )?;
        Ok(n > 0)
      })
      .await?;

    Ok(deleted)
  }

  // ── Instances ──────────────────────────────────────────────────────────────

  async fn create_instance(
    &self,
    input: NewInstance,
  ) -> Result<ActivityInstance> {
    let instance = ActivityInstance {
      id:            Uuid::new_v4(),
      asunto_id:     input.asunto_id,
      fecha:         input.fecha,
      lugar:         input.lugar,
      coordinadora:  input.coordinadora,
      observaciones: input.observaciones,
      created_at:    Utc::now(),
    };

    let id_str = encode_uuid(instance.id);
    let activity_id_str = encode_uuid(instance.asunto_id);
    let fecha = encode_date(instance.fecha);
    let lugar = instance.lugar.clone();
    let coordinadora = instance.coordinadora.clone();
    let observaciones = instance.observaciones.clone();
    let created_at = encode_dt(instance.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO activity_instances (
             instance_id, activity_id, fecha, lugar, coordinadora,
             observaciones, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          rusqlite::params![
            id_str,
            activity_id_str,
            fecha,
            lugar,
            coordinadora,
            observaciones,
            created_at,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(instance)
  }

  async fn get_instance(&self, id: Uuid) -> Result<Option<ActivityInstance>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawInstance> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {INSTANCE_COLS} FROM activity_instances
                 WHERE instance_id = ?1"
              ),
              rusqlite::params![id_str],
              instance_from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawInstance::into_instance).transpose()
  }

  async fn list_instances(
    &self,
    activity_id: Uuid,
  ) -> Result<Vec<ActivityInstance>> {
    let id_str = encode_uuid(activity_id);

    let raws: Vec<RawInstance> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {INSTANCE_COLS} FROM activity_instances
           WHERE activity_id = ?1"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![id_str], instance_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawInstance::into_instance).collect()
  }

  async fn instance_counts(&self, instance_id: Uuid) -> Result<InstanceCounts> {
    let id_str = encode_uuid(instance_id);

    let (registered, present): (i64, i64) = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "SELECT COUNT(*), COALESCE(SUM(asistio), 0)
           FROM attendance WHERE instance_id = ?1",
          rusqlite::params![id_str],
          |row| Ok((row.get(0)?, row.get(1)?)),
        )?)
      })
      .await?;

    Ok(InstanceCounts {
      registered: registered as u64,
      present:    present as u64,
    })
  }

  async fn update_instance(
    &self,
    id: Uuid,
    patch: InstancePatch,
  ) -> Result<Option<ActivityInstance>> {
    let Some(mut instance) = self.get_instance(id).await? else {
      return Ok(None);
    };
    patch.apply(&mut instance);

    let id_str = encode_uuid(instance.id);
    let fecha = encode_date(instance.fecha);
    let lugar = instance.lugar.clone();
    let coordinadora = instance.coordinadora.clone();
    let observaciones = instance.observaciones.clone();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE activity_instances
           SET fecha = ?2, lugar = ?3, coordinadora = ?4, observaciones = ?5
           WHERE instance_id = ?1",
          rusqlite::params![id_str, fecha, lugar, coordinadora, observaciones],
        )?;
        Ok(())
      })
      .await?;

    Ok(Some(instance))
  }

  async fn delete_instance(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);

    let deleted = self
      .conn
      .call(move |conn| {
        let n = conn.execute(
          "DELETE FROM activity_instances WHERE instance_id = ?1",
          rusqlite::params![id_str],
        )?;
        Ok(n > 0)
      })
      .await?;

    Ok(deleted)
  }

  // ── Attendance ─────────────────────────────────────────────────────────────

  async fn create_attendance(&self, input: NewAttendance) -> Result<Attendance> {
    let attendance = Attendance {
      id:                  Uuid::new_v4(),
      persona_id:          input.persona_id,
      asunto_instancia_id: input.asunto_instancia_id,
      asistio:             input.asistio,
      fecha_marcado:       None,
      updated_at:          Utc::now(),
    };

    let id_str = encode_uuid(attendance.id);
    let person_id_str = encode_uuid(attendance.persona_id);
    let instance_id_str = encode_uuid(attendance.asunto_instancia_id);
    let asistio = attendance.asistio;
    let updated_at = encode_dt(attendance.updated_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO attendance (
             attendance_id, person_id, instance_id, asistio, fecha_marcado,
             updated_at
           ) VALUES (?1, ?2, ?3, ?4, NULL, ?5)",
          rusqlite::params![
            id_str,
            person_id_str,
            instance_id_str,
            asistio,
            updated_at,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(attendance)
  }

  async fn get_attendance(&self, id: Uuid) -> Result<Option<Attendance>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawAttendance> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {ATTENDANCE_COLS} FROM attendance
                 WHERE attendance_id = ?1"
              ),
              rusqlite::params![id_str],
              attendance_from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawAttendance::into_attendance).transpose()
  }

  async fn find_attendance(
    &self,
    person_id: Uuid,
    instance_id: Uuid,
  ) -> Result<Option<Attendance>> {
    let person_id_str = encode_uuid(person_id);
    let instance_id_str = encode_uuid(instance_id);

    let raw: Option<RawAttendance> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {ATTENDANCE_COLS} FROM attendance
                 WHERE person_id = ?1 AND instance_id = ?2"
              ),
              rusqlite::params![person_id_str, instance_id_str],
              attendance_from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawAttendance::into_attendance).transpose()
  }

  async fn list_roster(&self, instance_id: Uuid) -> Result<Vec<RosterEntry>> {
    let id_str = encode_uuid(instance_id);

    let raws: Vec<(String, String, String, String, String, bool)> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT t.attendance_id, p.person_id, p.nombres, p.apellidos,
                  p.rut, t.asistio
           FROM attendance t
           JOIN persons p ON p.person_id = t.person_id
           WHERE t.instance_id = ?1",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![id_str], |row| {
            Ok((
              row.get(0)?,
              row.get(1)?,
              row.get(2)?,
              row.get(3)?,
              row.get(4)?,
              row.get(5)?,
            ))
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws
      .into_iter()
      .map(|(att_id, person_id, nombres, apellidos, rut, asistio)| {
        Ok(RosterEntry {
          id: decode_uuid(&att_id)?,
          persona_id: decode_uuid(&person_id)?,
          nombre: format!("{nombres} {apellidos}"),
          rut,
          asistio,
        })
      })
      .collect()
  }

  async fn person_history(&self, person_id: Uuid) -> Result<Vec<HistoryEntry>> {
    let id_str = encode_uuid(person_id);

    let raws: Vec<(String, String, String, bool, String, String)> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT t.attendance_id, a.nombre, i.fecha, t.asistio,
                  COALESCE(i.lugar, a.lugar)               AS lugar,
                  COALESCE(i.coordinadora, a.coordinadora) AS coordinadora
           FROM attendance t
           JOIN activity_instances i ON i.instance_id = t.instance_id
           JOIN activities a         ON a.activity_id = i.activity_id
           WHERE t.person_id = ?1
           ORDER BY i.fecha DESC",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![id_str], |row| {
            Ok((
              row.get(0)?,
              row.get(1)?,
              row.get(2)?,
              row.get(3)?,
              row.get(4)?,
              row.get(5)?,
            ))
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws
      .into_iter()
      .map(|(att_id, asunto, fecha, asistio, lugar, coordinadora)| {
        Ok(HistoryEntry {
          id: decode_uuid(&att_id)?,
          asunto,
          fecha: decode_date(&fecha)?,
          asistio,
          lugar,
          coordinadora,
        })
      })
      .collect()
  }

  async fn mark_attendance(
    &self,
    id: Uuid,
    asistio: bool,
  ) -> Result<Option<Attendance>> {
    let Some(mut attendance) = self.get_attendance(id).await? else {
      return Ok(None);
    };

    let now = Utc::now();
    attendance.asistio = asistio;
    attendance.fecha_marcado = Some(now);
    attendance.updated_at = now;

    let id_str = encode_uuid(attendance.id);
    let now_str = encode_dt(now);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE attendance
           SET asistio = ?2, fecha_marcado = ?3, updated_at = ?3
           WHERE attendance_id = ?1",
          rusqlite::params![id_str, asistio, now_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(Some(attendance))
  }

  async fn delete_attendance(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);

    let deleted = self
      .conn
      .call(move |conn| {
        let n = conn.execute(
          "DELETE FROM attendance WHERE attendance_id = ?1",
          rusqlite::params![id_str],
        )?;
        Ok(n > 0)
      })
      .await?;

    Ok(deleted)
  }
}

use attendance_core::db::open_db_in_memory;
use attendance_core::{
    AttendanceDate, AttendanceQuery, AttendanceRepository, AttendanceService, AttendanceStatus,
    ClassMarkRequest, DateRange, MarkOutcome, MarkedEntry, MissingEntity, RepoError,
    SqliteAttendanceRepository, SqliteStudentRepository, Student, StudentRepository,
    ValidationError,
};
use rusqlite::Connection;

fn date(value: &str) -> AttendanceDate {
    AttendanceDate::parse(value).unwrap()
}

fn add(conn: &Connection, name: &str, roll: &str, section: Option<&str>) -> Student {
    SqliteStudentRepository::try_new(conn)
        .unwrap()
        .add_student(&attendance_core::NewStudent::new(
            name,
            roll,
            section.map(str::to_string),
        ))
        .unwrap()
}

fn service(
    conn: &Connection,
) -> AttendanceService<SqliteStudentRepository<'_>, SqliteAttendanceRepository<'_>> {
    AttendanceService::new(
        SqliteStudentRepository::try_new(conn).unwrap(),
        SqliteAttendanceRepository::try_new(conn).unwrap(),
    )
}

#[test]
fn remarking_overwrites_and_keeps_one_record() {
    let conn = open_db_in_memory().unwrap();
    let asha = add(&conn, "Asha", "R1", None);
    let service = service(&conn);
    let day = date("2024-01-10");

    assert_eq!(
        service
            .mark_attendance(asha.id, day, AttendanceStatus::Present)
            .unwrap(),
        MarkOutcome::Created
    );
    assert_eq!(
        service
            .mark_attendance(asha.id, day, AttendanceStatus::Absent)
            .unwrap(),
        MarkOutcome::Updated
    );

    let records = SqliteAttendanceRepository::try_new(&conn)
        .unwrap()
        .query_attendance(&AttendanceQuery::for_student(asha.id))
        .unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].status, AttendanceStatus::Absent);
    assert_eq!(records[0].date, day);
}

#[test]
fn marking_same_status_twice_is_unchanged() {
    let conn = open_db_in_memory().unwrap();
    let asha = add(&conn, "Asha", "R1", None);
    let service = service(&conn);
    let day = date("2024-01-10");

    service
        .mark_attendance(asha.id, day, AttendanceStatus::Present)
        .unwrap();
    assert_eq!(
        service
            .mark_attendance(asha.id, day, AttendanceStatus::Present)
            .unwrap(),
        MarkOutcome::Unchanged
    );
}

#[test]
fn marking_unknown_student_fails_without_writing() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    assert!(matches!(
        service.mark_attendance(77, date("2024-01-10"), AttendanceStatus::Present),
        Err(RepoError::NotFound(MissingEntity::Student(77)))
    ));
    assert!(service.attendance_for_date(date("2024-01-10")).unwrap().is_empty());
}

#[test]
fn mark_from_input_validates_date_and_status() {
    let conn = open_db_in_memory().unwrap();
    let asha = add(&conn, "Asha", "R1", None);
    let service = service(&conn);

    assert_eq!(
        service
            .mark_from_input(asha.id, Some("2024-02-29"), "P")
            .unwrap(),
        MarkedEntry {
            student_id: asha.id,
            date: date("2024-02-29"),
            status: AttendanceStatus::Present,
            outcome: MarkOutcome::Created,
        }
    );
    assert!(matches!(
        service.mark_from_input(asha.id, Some("2023-02-29"), "present"),
        Err(RepoError::InvalidInput(ValidationError::InvalidDate(_)))
    ));
    assert!(matches!(
        service.mark_from_input(asha.id, Some("10/01/2024"), "present"),
        Err(RepoError::InvalidInput(ValidationError::InvalidDate(_)))
    ));
    assert!(matches!(
        service.mark_from_input(asha.id, Some("2024-01-10"), "late"),
        Err(RepoError::InvalidInput(ValidationError::InvalidStatus(_)))
    ));
}

#[test]
fn mark_from_input_defaults_to_today() {
    let conn = open_db_in_memory().unwrap();
    let asha = add(&conn, "Asha", "R1", None);
    let service = service(&conn);

    let before = AttendanceDate::today();
    let entry = service.mark_from_input(asha.id, None, "absent").unwrap();
    let after = AttendanceDate::today();

    assert!(entry.date == before || entry.date == after);
    assert_eq!(entry.status, AttendanceStatus::Absent);
    assert_eq!(entry.outcome, MarkOutcome::Created);
    assert_eq!(
        service.attendance_for_date(entry.date).unwrap().get(&asha.id),
        Some(&AttendanceStatus::Absent)
    );
}

#[test]
fn future_dates_are_accepted() {
    let conn = open_db_in_memory().unwrap();
    let asha = add(&conn, "Asha", "R1", None);
    let service = service(&conn);

    assert_eq!(
        service
            .mark_attendance(asha.id, date("2999-12-31"), AttendanceStatus::Present)
            .unwrap(),
        MarkOutcome::Created
    );
}

#[test]
fn mark_class_marks_roster_present_except_absentees() {
    let conn = open_db_in_memory().unwrap();
    let asha = add(&conn, "Asha", "R1", Some("7A"));
    let bilal = add(&conn, "Bilal", "R2", Some("7A"));
    let chen = add(&conn, "Chen", "R3", Some("7B"));
    let service = service(&conn);
    let day = date("2024-01-10");

    let summary = service
        .mark_class(&ClassMarkRequest {
            date: day,
            section: Some("7A".to_string()),
            absentees: vec![bilal.id],
        })
        .unwrap();

    assert_eq!(summary.present, 1);
    assert_eq!(summary.absent, 1);
    assert_eq!(
        summary.outcomes,
        vec![
            (asha.id, AttendanceStatus::Present, MarkOutcome::Created),
            (bilal.id, AttendanceStatus::Absent, MarkOutcome::Created),
        ]
    );

    let marked = service.attendance_for_date(day).unwrap();
    assert_eq!(marked.get(&asha.id), Some(&AttendanceStatus::Present));
    assert_eq!(marked.get(&bilal.id), Some(&AttendanceStatus::Absent));
    assert_eq!(marked.get(&chen.id), None);
}

#[test]
fn mark_class_with_unknown_absentee_writes_nothing() {
    let conn = open_db_in_memory().unwrap();
    add(&conn, "Asha", "R1", Some("7A"));
    let outsider = add(&conn, "Chen", "R3", Some("7B"));
    let service = service(&conn);
    let day = date("2024-01-10");

    let err = service
        .mark_class(&ClassMarkRequest {
            date: day,
            section: Some("7A".to_string()),
            absentees: vec![outsider.id],
        })
        .unwrap_err();

    assert!(matches!(err, RepoError::NotFound(MissingEntity::Student(id)) if id == outsider.id));
    assert!(service.attendance_for_date(day).unwrap().is_empty());
}

#[test]
fn clear_attendance_removes_record_and_reports_missing() {
    let conn = open_db_in_memory().unwrap();
    let asha = add(&conn, "Asha", "R1", None);
    let service = service(&conn);
    let day = date("2024-01-10");

    service
        .mark_attendance(asha.id, day, AttendanceStatus::Absent)
        .unwrap();
    service.clear_attendance(asha.id, day).unwrap();
    assert!(service.attendance_for_date(day).unwrap().is_empty());

    assert!(matches!(
        service.clear_attendance(asha.id, day),
        Err(RepoError::NotFound(MissingEntity::Attendance { .. }))
    ));
}

#[test]
fn query_orders_by_date_then_student_and_filters_range() {
    let conn = open_db_in_memory().unwrap();
    let asha = add(&conn, "Asha", "R1", None);
    let bilal = add(&conn, "Bilal", "R2", None);
    let repo = SqliteAttendanceRepository::try_new(&conn).unwrap();

    repo.upsert_attendance(bilal.id, date("2024-01-11"), AttendanceStatus::Present)
        .unwrap();
    repo.upsert_attendance(asha.id, date("2024-01-11"), AttendanceStatus::Absent)
        .unwrap();
    repo.upsert_attendance(bilal.id, date("2024-01-09"), AttendanceStatus::Present)
        .unwrap();
    repo.upsert_attendance(asha.id, date("2024-01-12"), AttendanceStatus::Present)
        .unwrap();

    let all = repo.query_attendance(&AttendanceQuery::default()).unwrap();
    let keys: Vec<(String, i64)> = all
        .iter()
        .map(|record| (record.date.to_string(), record.student_id))
        .collect();
    assert_eq!(
        keys,
        vec![
            ("2024-01-09".to_string(), bilal.id),
            ("2024-01-11".to_string(), asha.id),
            ("2024-01-11".to_string(), bilal.id),
            ("2024-01-12".to_string(), asha.id),
        ]
    );

    let range = DateRange::new(date("2024-01-10"), date("2024-01-11")).unwrap();
    let in_range = repo
        .query_attendance(&AttendanceQuery::for_range(range))
        .unwrap();
    assert_eq!(in_range.len(), 2);
    assert!(in_range.iter().all(|record| range.contains(record.date)));
}

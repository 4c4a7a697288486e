use attendance_core::db::open_db_in_memory;
use attendance_core::{
    AttendanceDate, AttendanceService, AttendanceStatus, DateEntryStatus, DateRange,
    MissingEntity, RepoError, ReportService, SqliteAttendanceRepository, SqliteStudentRepository,
    Student, StudentService,
};
use rusqlite::Connection;

fn date(value: &str) -> AttendanceDate {
    AttendanceDate::parse(value).unwrap()
}

fn students(conn: &Connection) -> StudentService<SqliteStudentRepository<'_>> {
    StudentService::new(SqliteStudentRepository::try_new(conn).unwrap())
}

fn marker(
    conn: &Connection,
) -> AttendanceService<SqliteStudentRepository<'_>, SqliteAttendanceRepository<'_>> {
    AttendanceService::new(
        SqliteStudentRepository::try_new(conn).unwrap(),
        SqliteAttendanceRepository::try_new(conn).unwrap(),
    )
}

fn reports(
    conn: &Connection,
) -> ReportService<SqliteStudentRepository<'_>, SqliteAttendanceRepository<'_>> {
    ReportService::new(
        SqliteStudentRepository::try_new(conn).unwrap(),
        SqliteAttendanceRepository::try_new(conn).unwrap(),
    )
}

/// Two students, A present and B absent on 2024-01-10.
fn seed_pair(conn: &Connection) -> (Student, Student) {
    let a = students(conn).add_student("A", "1", None).unwrap();
    let b = students(conn).add_student("B", "2", None).unwrap();
    let marker = marker(conn);
    marker
        .mark_attendance(a.id, date("2024-01-10"), AttendanceStatus::Present)
        .unwrap();
    marker
        .mark_attendance(b.id, date("2024-01-10"), AttendanceStatus::Absent)
        .unwrap();
    (a, b)
}

#[test]
fn date_report_lists_roster_with_statuses() {
    let conn = open_db_in_memory().unwrap();
    let (a, b) = seed_pair(&conn);

    let report = reports(&conn).date_report(date("2024-01-10"), None).unwrap();
    let rows: Vec<(i64, DateEntryStatus)> = report
        .rows
        .iter()
        .map(|row| (row.student.id, row.status))
        .collect();
    assert_eq!(
        rows,
        vec![
            (a.id, DateEntryStatus::Marked(AttendanceStatus::Present)),
            (b.id, DateEntryStatus::Marked(AttendanceStatus::Absent)),
        ]
    );
}

#[test]
fn date_report_shows_unmarked_students_as_not_marked() {
    let conn = open_db_in_memory().unwrap();
    let (a, b) = seed_pair(&conn);
    let c = students(&conn).add_student("C", "3", None).unwrap();

    let report = reports(&conn).date_report(date("2024-01-10"), None).unwrap();
    assert_eq!(report.rows.len(), 3);
    assert_eq!(report.rows[2].student.id, c.id);
    assert_eq!(report.rows[2].status, DateEntryStatus::NotMarked);
    assert_eq!(report.rows[2].status.label(), "Not Marked");

    let other_day = reports(&conn).date_report(date("2024-01-11"), None).unwrap();
    assert!(other_day
        .rows
        .iter()
        .all(|row| row.status == DateEntryStatus::NotMarked));
    assert_eq!(
        other_day.rows.iter().map(|row| row.student.id).collect::<Vec<_>>(),
        vec![a.id, b.id, c.id]
    );
}

#[test]
fn summary_over_single_day_gives_full_and_zero_percentages() {
    let conn = open_db_in_memory().unwrap();
    let (a, b) = seed_pair(&conn);

    let range = DateRange::single(date("2024-01-10"));
    let summary = reports(&conn).summary_report(range, None).unwrap();

    assert_eq!(summary.rows.len(), 2);
    assert_eq!(summary.rows[0].student.id, a.id);
    assert_eq!(summary.rows[0].percentage, Some(100.0));
    assert_eq!(summary.rows[1].student.id, b.id);
    assert_eq!(summary.rows[1].percentage, Some(0.0));
}

#[test]
fn summary_excludes_unmarked_days_and_rounds() {
    let conn = open_db_in_memory().unwrap();
    let a = students(&conn).add_student("A", "1", None).unwrap();
    let idle = students(&conn).add_student("Idle", "9", None).unwrap();
    let marker = marker(&conn);
    for (day, status) in [
        ("2024-01-08", AttendanceStatus::Present),
        ("2024-01-09", AttendanceStatus::Absent),
        ("2024-01-12", AttendanceStatus::Absent),
        ("2024-02-01", AttendanceStatus::Present),
    ] {
        marker.mark_attendance(a.id, date(day), status).unwrap();
    }

    let range = DateRange::new(date("2024-01-01"), date("2024-01-31")).unwrap();
    let summary = reports(&conn).summary_report(range, None).unwrap();

    let row_a = &summary.rows[0];
    assert_eq!((row_a.present_days, row_a.absent_days), (1, 2));
    assert_eq!(row_a.percentage, Some(33.33));

    let row_idle = &summary.rows[1];
    assert_eq!(row_idle.student.id, idle.id);
    assert_eq!((row_idle.present_days, row_idle.absent_days), (0, 0));
    assert_eq!(row_idle.percentage, None);
}

#[test]
fn section_filter_limits_roster() {
    let conn = open_db_in_memory().unwrap();
    let service = students(&conn);
    let a = service
        .add_student("A", "1", Some("7A".to_string()))
        .unwrap();
    service
        .add_student("B", "2", Some("7B".to_string()))
        .unwrap();

    let report = reports(&conn)
        .date_report(date("2024-01-10"), Some("7A"))
        .unwrap();
    assert_eq!(report.section.as_deref(), Some("7A"));
    assert_eq!(
        report.rows.iter().map(|row| row.student.id).collect::<Vec<_>>(),
        vec![a.id]
    );
}

#[test]
fn student_report_lists_history_in_date_order() {
    let conn = open_db_in_memory().unwrap();
    let a = students(&conn).add_student("A", "1", None).unwrap();
    let marker = marker(&conn);
    marker
        .mark_attendance(a.id, date("2024-01-12"), AttendanceStatus::Absent)
        .unwrap();
    marker
        .mark_attendance(a.id, date("2024-01-10"), AttendanceStatus::Present)
        .unwrap();
    marker
        .mark_attendance(a.id, date("2024-01-11"), AttendanceStatus::Present)
        .unwrap();

    let report = reports(&conn).student_report(a.id, None).unwrap();
    let dates: Vec<String> = report
        .entries
        .iter()
        .map(|entry| entry.date.to_string())
        .collect();
    assert_eq!(dates, vec!["2024-01-10", "2024-01-11", "2024-01-12"]);
    assert_eq!((report.present_days, report.absent_days), (2, 1));
    assert_eq!(report.percentage(), Some(66.67));

    let narrowed = reports(&conn)
        .student_report(
            a.id,
            Some(DateRange::new(date("2024-01-11"), date("2024-01-12")).unwrap()),
        )
        .unwrap();
    assert_eq!(narrowed.entries.len(), 2);
}

#[test]
fn student_report_for_deleted_student_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let (_, b) = seed_pair(&conn);

    students(&conn).delete_student(b.id).unwrap();

    let err = reports(&conn).student_report(b.id, None).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(MissingEntity::Student(id)) if id == b.id));
}

#[test]
fn repeated_reports_over_unchanged_data_are_identical() {
    let conn = open_db_in_memory().unwrap();
    seed_pair(&conn);
    let reports = reports(&conn);
    let range = DateRange::single(date("2024-01-10"));

    assert_eq!(
        reports.summary_report(range, None).unwrap(),
        reports.summary_report(range, None).unwrap()
    );
    assert_eq!(
        reports.date_report(date("2024-01-10"), None).unwrap(),
        reports.date_report(date("2024-01-10"), None).unwrap()
    );
    assert_eq!(
        reports.attendance_detail(None).unwrap(),
        reports.attendance_detail(None).unwrap()
    );
}

#[test]
fn attendance_detail_joins_student_identity() {
    let conn = open_db_in_memory().unwrap();
    let (a, b) = seed_pair(&conn);

    let detail = reports(&conn).attendance_detail(None).unwrap();
    assert_eq!(detail.len(), 2);
    assert_eq!(detail[0].student, a);
    assert_eq!(detail[0].status, AttendanceStatus::Present);
    assert_eq!(detail[1].student, b);
    assert_eq!(detail[1].status, AttendanceStatus::Absent);
}

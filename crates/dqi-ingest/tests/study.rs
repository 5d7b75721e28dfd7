//! End-to-end study directory loading.

use std::fs;
use std::path::Path;

use dqi_ingest::{IngestError, files, load_study};

fn write_report(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).unwrap();
}

fn staging_csv() -> &'static str {
    "Project Name,Region,Country,Site ID,Subject ID,Latest Visit (SV),Subject Status,\
     Missing Visits,Missing Page,Coded terms,Uncoded Terms,Total Queries,Pages Entered,\
     Pages with Non-Conformant data\n\
     Study 1,EU,Netherlands,101,1001,Week 4 (2),Enrolled,1,0,3,1,5,120,6\n\
     Study 1,EU,Netherlands,101,1002,,Enrolled,0,2,0,0,0,80,0\n"
}

#[test]
fn loads_study_with_all_reports() {
    let dir = tempfile::tempdir().unwrap();
    write_report(dir.path(), files::SUBJECT_LEVEL_METRICS, staging_csv());
    write_report(
        dir.path(),
        files::COMPLETED_VISITS,
        "Subject,Site,Visit,Visit Date\n1001,101,Week 1,28-Mar-25\n1001,101,Week 4,25-Apr-25\n",
    );
    write_report(
        dir.path(),
        files::COMPILED_EDRR,
        "Subject,Total Open issue Count per subject\n1001,3\n",
    );
    write_report(
        dir.path(),
        files::CODING_MEDDRA,
        "Subject,Coding Status,Require Coding\n1001,Coded,Yes\n1002,,Yes\n",
    );
    write_report(
        dir.path(),
        files::CODING_WHODD,
        "Subject,Coding Status,Require Coding\n1001,,No\n",
    );
    write_report(
        dir.path(),
        files::ESAE_DM,
        "Subject,Site,Review Status\n1001,-,Pending\n",
    );

    let study = load_study(dir.path()).unwrap();

    assert_eq!(study.staging.len(), 2);
    let first = &study.staging[0];
    assert_eq!(first.project, "Study 1");
    assert_eq!(first.latest_visit.as_deref(), Some("Week 4"));
    assert_eq!(first.total_queries, 5);
    assert_eq!(study.staging[1].latest_visit, None);

    assert_eq!(study.tables.completed_visits.len(), 2);
    assert_eq!(study.tables.edrr_issues[0].total_open_issue_count, 3);
    // MedDRA and WHODD merge into one coding table.
    assert_eq!(study.tables.coding_records.len(), 3);
    assert_eq!(study.tables.esae_dm[0].site.as_deref(), Some("-"));
    // Reports that were never written come back empty, not as errors.
    assert!(study.tables.queries.is_empty());
    assert!(study.tables.missing_pages.is_empty());
}

#[test]
fn project_falls_back_to_directory_name() {
    let root = tempfile::tempdir().unwrap();
    let dir = root.path().join("Study 42");
    fs::create_dir(&dir).unwrap();
    write_report(
        &dir,
        files::SUBJECT_LEVEL_METRICS,
        "Site ID,Subject ID\n101,1001\n",
    );

    let study = load_study(&dir).unwrap();
    assert_eq!(study.project, "Study 42");
    assert_eq!(study.staging[0].project, "Study 42");
}

#[test]
fn missing_staging_report_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = load_study(dir.path());
    assert!(matches!(result, Err(IngestError::FileNotFound { .. })));
}

#[test]
fn missing_directory_is_an_error() {
    let result = load_study(Path::new("/nonexistent/Study 1"));
    assert!(matches!(result, Err(IngestError::DirectoryNotFound { .. })));
}

#[test]
fn garbage_numeric_cells_coerce_to_zero() {
    let dir = tempfile::tempdir().unwrap();
    write_report(
        dir.path(),
        files::SUBJECT_LEVEL_METRICS,
        "Site ID,Subject ID,Missing Visits,Total Queries\n101,1001,n/a,seven\n",
    );

    let study = load_study(dir.path()).unwrap();
    assert_eq!(study.staging[0].missing_visits, 0);
    assert_eq!(study.staging[0].total_queries, 0);
}

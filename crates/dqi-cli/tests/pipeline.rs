//! End-to-end pipeline runs against a synthetic study directory.

use std::fs;
use std::path::Path;

use dqi_cli::pipeline::run_study;
use dqi_ingest::files;
use dqi_model::DqiCategory;
use dqi_score::ScoringConfig;
use dqi_store::SqliteSink;

fn write_report(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).unwrap();
}

/// Reports without a project column inherit the directory name, so the
/// study directory has to carry the project name the staging rows use.
fn study_dir(root: &Path) -> std::path::PathBuf {
    let dir = root.join("Study 9");
    fs::create_dir(&dir).unwrap();
    dir
}

/// Two subjects: 1001 carries open queries and an eSAE backlog, 1002 is
/// spotless.
fn write_study(dir: &Path) {
    write_report(
        dir,
        files::SUBJECT_LEVEL_METRICS,
        "Project Name,Site ID,Subject ID,Latest Visit (SV),Total Queries,Pages Entered,\
         Pages with Non-Conformant data\n\
         Study 9,101,1001,,8,100,0\n\
         Study 9,101,1002,Week 2,0,50,0\n",
    );
    write_report(
        dir,
        files::COMPLETED_VISITS,
        "Subject,Site,Visit,Visit Date\n1001,101,Week 1,28-Mar-25\n1001,101,Week 4,25-Apr-25\n",
    );
    write_report(
        dir,
        files::ESAE_DM,
        "Subject,Site,Review Status\n1001,-,Pending\n1001,-,Pending\n1001,,Pending\n",
    );
}

#[test]
fn full_run_persists_both_result_tables() {
    let root = tempfile::tempdir().unwrap();
    let dir = study_dir(root.path());
    write_study(&dir);
    let db_path = dir.join("dqi.db");

    let result = run_study(&dir, ScoringConfig::default(), &db_path).unwrap();

    assert_eq!(result.subjects, 2);
    // 1001 fails no_open_queries and no_safety_issues; 1002 is clean.
    assert_eq!(result.clean, 1);
    assert_eq!(result.not_clean, 1);
    assert_eq!(result.report.latest_visits_backfilled, 1);
    // All three eSAE rows resolve their site from the staging population.
    assert_eq!(result.report.unresolved_sites, 0);

    let sink = SqliteSink::open(&db_path).unwrap();
    assert_eq!(sink.subject_count().unwrap(), 2);
    assert_eq!(sink.result_count().unwrap(), 2);
}

#[test]
fn rerun_upserts_instead_of_duplicating() {
    let root = tempfile::tempdir().unwrap();
    let dir = study_dir(root.path());
    write_study(&dir);
    let db_path = dir.join("dqi.db");

    run_study(&dir, ScoringConfig::default(), &db_path).unwrap();
    run_study(&dir, ScoringConfig::default(), &db_path).unwrap();

    let sink = SqliteSink::open(&db_path).unwrap();
    assert_eq!(sink.subject_count().unwrap(), 2);
    assert_eq!(sink.result_count().unwrap(), 2);
}

#[test]
fn spotless_subject_lands_in_excellent() {
    let dir = tempfile::tempdir().unwrap();
    write_report(
        dir.path(),
        files::SUBJECT_LEVEL_METRICS,
        "Project Name,Site ID,Subject ID\nStudy 9,101,1002\n",
    );
    let db_path = dir.path().join("dqi.db");

    let result = run_study(dir.path(), ScoringConfig::default(), &db_path).unwrap();

    assert_eq!(
        result.category_counts.get(&DqiCategory::Excellent).copied(),
        Some(1)
    );
    assert_eq!(result.clean, 1);
}

#[test]
fn missing_study_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("dqi.db");
    let missing = dir.path().join("does-not-exist");

    let error = run_study(&missing, ScoringConfig::default(), &db_path).unwrap_err();
    assert!(error.to_string().contains("load study reports"));
}

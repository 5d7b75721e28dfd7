//! Site-ID backfill for sources that lack site granularity.
//!
//! The eSAE dashboards, lab-issue report, and inactivated-forms report often
//! ship without a usable site column (absent, blank, or the `"-"` sentinel).
//! Their rows are resolved against the staging population by
//! `(project, subject)` before any site-scoped aggregation runs. Unresolved
//! rows keep their sentinel site and are counted, never dropped.

use std::collections::HashMap;

use tracing::warn;

use dqi_model::{EventTables, ProjectSubject, SubjectMasterRecord};

/// `(project, subject)` → site lookup built from the staging population.
#[derive(Debug, Default)]
pub struct SiteLookup {
    sites: HashMap<ProjectSubject, String>,
}

impl SiteLookup {
    pub fn from_staging(staging: &[SubjectMasterRecord]) -> Self {
        let mut sites = HashMap::with_capacity(staging.len());
        for record in staging {
            sites.insert(
                ProjectSubject::new(record.project.clone(), record.subject.clone()),
                record.site.clone(),
            );
        }
        Self { sites }
    }

    pub fn resolve(&self, project: &str, subject: &str) -> Option<&str> {
        self.sites
            .get(&ProjectSubject::new(project, subject))
            .map(String::as_str)
    }
}

fn is_missing_site(site: Option<&String>) -> bool {
    match site {
        None => true,
        Some(value) => value.trim().is_empty() || value.trim() == "-",
    }
}

/// Resolve missing site ids in place across the site-less tables. Returns
/// the number of rows left unresolved.
pub fn backfill_sites(tables: &mut EventTables, lookup: &SiteLookup) -> usize {
    let mut unresolved = 0usize;

    let mut resolve = |project: &str, subject: &str, site: &mut Option<String>, table: &str| {
        if !is_missing_site(site.as_ref()) {
            return;
        }
        match lookup.resolve(project, subject) {
            Some(resolved) => *site = Some(resolved.to_string()),
            None => {
                unresolved += 1;
                warn!(table, project, subject, "no site match for subject");
            }
        }
    };

    for row in &mut tables.esae_dm {
        resolve(&row.project, &row.subject, &mut row.site, "esae_dm");
    }
    for row in &mut tables.esae_safety {
        resolve(&row.project, &row.subject, &mut row.site, "esae_safety");
    }
    for row in &mut tables.lab_issues {
        resolve(&row.project, &row.subject, &mut row.site, "lab_issues");
    }
    for row in &mut tables.inactivated_forms {
        resolve(
            &row.project,
            &row.subject,
            &mut row.site,
            "inactivated_forms",
        );
    }

    unresolved
}

#[cfg(test)]
mod tests {
    use super::*;
    use dqi_model::SaeReview;

    fn staging() -> Vec<SubjectMasterRecord> {
        vec![SubjectMasterRecord {
            project: "Study 1".to_string(),
            site: "101".to_string(),
            subject: "101-001".to_string(),
            ..Default::default()
        }]
    }

    #[test]
    fn resolves_sentinel_and_missing_sites() {
        let lookup = SiteLookup::from_staging(&staging());
        let mut tables = EventTables {
            esae_dm: vec![
                SaeReview {
                    project: "Study 1".to_string(),
                    site: None,
                    subject: "101-001".to_string(),
                    ..Default::default()
                },
                SaeReview {
                    project: "Study 1".to_string(),
                    site: Some("-".to_string()),
                    subject: "101-001".to_string(),
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        let unresolved = backfill_sites(&mut tables, &lookup);
        assert_eq!(unresolved, 0);
        for row in &tables.esae_dm {
            assert_eq!(row.site.as_deref(), Some("101"));
        }
    }

    #[test]
    fn unresolved_rows_are_counted_and_retained() {
        let lookup = SiteLookup::from_staging(&staging());
        let mut tables = EventTables {
            esae_safety: vec![SaeReview {
                project: "Study 1".to_string(),
                site: None,
                subject: "999-999".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        };
        let unresolved = backfill_sites(&mut tables, &lookup);
        assert_eq!(unresolved, 1);
        assert_eq!(tables.esae_safety.len(), 1);
        assert!(tables.esae_safety[0].site.is_none());
    }

    #[test]
    fn explicit_sites_are_left_alone() {
        let lookup = SiteLookup::from_staging(&staging());
        let mut tables = EventTables {
            esae_dm: vec![SaeReview {
                project: "Study 1".to_string(),
                site: Some("202".to_string()),
                subject: "101-001".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        };
        backfill_sites(&mut tables, &lookup);
        assert_eq!(tables.esae_dm[0].site.as_deref(), Some("202"));
    }
}

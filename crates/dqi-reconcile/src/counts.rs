//! Group-by row counts for the count-replacement dimensions.
//!
//! The event-level reports are authoritative: each count dimension on the
//! staging record is wholly replaced by the row count here, 0 when no rows
//! match. Hash-map grouping keeps the pass linear in row count.

use std::collections::HashMap;
use std::hash::Hash;

use dqi_model::{EventTables, ProjectSubject, SubjectKey};

/// Count rows per key.
pub fn count_by<K, I>(keys: I) -> HashMap<K, u32>
where
    K: Eq + Hash,
    I: IntoIterator<Item = K>,
{
    let mut counts = HashMap::new();
    for key in keys {
        *counts.entry(key).or_insert(0) += 1;
    }
    counts
}

fn site_or_blank(site: Option<&String>) -> String {
    site.cloned().unwrap_or_default()
}

/// Per-subject row counts for every count-replacement table.
#[derive(Debug, Default)]
pub struct EventCounts {
    pub missing_visits: HashMap<SubjectKey, u32>,
    pub missing_pages: HashMap<SubjectKey, u32>,
    pub lab_issues: HashMap<SubjectKey, u32>,
    pub inactivated_forms: HashMap<SubjectKey, u32>,
    pub esae_dm: HashMap<SubjectKey, u32>,
    pub esae_safety: HashMap<SubjectKey, u32>,
    /// EDRR issue totals, summed by `(project, subject)` — the register has
    /// no site dimension.
    pub edrr_open_issues: HashMap<ProjectSubject, u32>,
}

impl EventCounts {
    pub fn from_tables(tables: &EventTables) -> Self {
        let missing_visits = count_by(tables.missing_visits.iter().map(|row| {
            SubjectKey::new(row.project.clone(), row.site.clone(), row.subject.clone())
        }));
        let missing_pages = count_by(tables.missing_pages.iter().map(|row| {
            SubjectKey::new(row.project.clone(), row.site.clone(), row.subject.clone())
        }));
        let lab_issues = count_by(tables.lab_issues.iter().map(|row| {
            SubjectKey::new(
                row.project.clone(),
                site_or_blank(row.site.as_ref()),
                row.subject.clone(),
            )
        }));
        let inactivated_forms = count_by(tables.inactivated_forms.iter().map(|row| {
            SubjectKey::new(
                row.project.clone(),
                site_or_blank(row.site.as_ref()),
                row.subject.clone(),
            )
        }));
        let esae_dm = count_by(tables.esae_dm.iter().map(|row| {
            SubjectKey::new(
                row.project.clone(),
                site_or_blank(row.site.as_ref()),
                row.subject.clone(),
            )
        }));
        let esae_safety = count_by(tables.esae_safety.iter().map(|row| {
            SubjectKey::new(
                row.project.clone(),
                site_or_blank(row.site.as_ref()),
                row.subject.clone(),
            )
        }));

        let mut edrr_open_issues: HashMap<ProjectSubject, u32> = HashMap::new();
        for row in &tables.edrr_issues {
            *edrr_open_issues
                .entry(ProjectSubject::new(row.project.clone(), row.subject.clone()))
                .or_insert(0) += row.total_open_issue_count;
        }

        Self {
            missing_visits,
            missing_pages,
            lab_issues,
            inactivated_forms,
            esae_dm,
            esae_safety,
            edrr_open_issues,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dqi_model::{EdrrIssue, MissingPage};

    #[test]
    fn counts_group_by_full_key() {
        let tables = EventTables {
            missing_pages: vec![
                MissingPage {
                    project: "Study 1".to_string(),
                    site: "101".to_string(),
                    subject: "A".to_string(),
                    ..Default::default()
                },
                MissingPage {
                    project: "Study 1".to_string(),
                    site: "101".to_string(),
                    subject: "A".to_string(),
                    ..Default::default()
                },
                MissingPage {
                    project: "Study 1".to_string(),
                    site: "102".to_string(),
                    subject: "A".to_string(),
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        let counts = EventCounts::from_tables(&tables);
        assert_eq!(
            counts
                .missing_pages
                .get(&SubjectKey::new("Study 1", "101", "A")),
            Some(&2)
        );
        assert_eq!(
            counts
                .missing_pages
                .get(&SubjectKey::new("Study 1", "102", "A")),
            Some(&1)
        );
    }

    #[test]
    fn edrr_sums_pre_aggregated_counts_without_site() {
        let tables = EventTables {
            edrr_issues: vec![
                EdrrIssue {
                    project: "Study 1".to_string(),
                    subject: "A".to_string(),
                    total_open_issue_count: 3,
                },
                EdrrIssue {
                    project: "Study 1".to_string(),
                    subject: "A".to_string(),
                    total_open_issue_count: 2,
                },
            ],
            ..Default::default()
        };
        let counts = EventCounts::from_tables(&tables);
        assert_eq!(
            counts
                .edrr_open_issues
                .get(&ProjectSubject::new("Study 1", "A")),
            Some(&5)
        );
    }
}

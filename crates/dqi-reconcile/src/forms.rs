//! CRF set logic across the query and non-conformant reports.
//!
//! Per subject: `crfs_with_queries_nc` is the number of distinct form names
//! appearing in both reports, `crfs_without_queries_nc` the number of
//! non-conformant forms with no query. An absent side is an empty set, so a
//! subject with non-conformant forms and no queries keeps all of them in the
//! "without" bucket.

use std::collections::{HashMap, HashSet};

use dqi_model::{EventTables, SubjectKey};

/// Distinct non-null form names per subject for one report.
fn form_sets<'a, I>(rows: I) -> HashMap<SubjectKey, HashSet<&'a str>>
where
    I: IntoIterator<Item = (&'a str, &'a str, &'a str, Option<&'a str>)>,
{
    let mut sets: HashMap<SubjectKey, HashSet<&'a str>> = HashMap::new();
    for (project, site, subject, form) in rows {
        let Some(form) = form else { continue };
        let trimmed = form.trim();
        if trimmed.is_empty() {
            continue;
        }
        sets.entry(SubjectKey::new(project, site, subject))
            .or_default()
            .insert(trimmed);
    }
    sets
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FormOverlap {
    /// |non-conformant ∩ queried|
    pub with_queries: u32,
    /// |non-conformant − queried|
    pub without_queries: u32,
}

/// Compute the form-set overlap for every subject present in either report.
pub fn form_overlap_by_subject(tables: &EventTables) -> HashMap<SubjectKey, FormOverlap> {
    let nc_sets = form_sets(tables.non_conformant.iter().map(|row| {
        (
            row.project.as_str(),
            row.site.as_str(),
            row.subject.as_str(),
            row.form_name.as_deref(),
        )
    }));
    let query_sets = form_sets(tables.queries.iter().map(|row| {
        (
            row.project.as_str(),
            row.site.as_str(),
            row.subject.as_str(),
            row.form_name.as_deref(),
        )
    }));

    let empty = HashSet::new();
    let mut overlaps = HashMap::new();
    for (key, nc_forms) in &nc_sets {
        let queried = query_sets.get(key).unwrap_or(&empty);
        overlaps.insert(
            key.clone(),
            FormOverlap {
                with_queries: nc_forms.intersection(queried).count() as u32,
                without_queries: nc_forms.difference(queried).count() as u32,
            },
        );
    }
    // Subjects with queries but no non-conformant forms have an empty NC
    // set: both buckets are 0, which the default already encodes.
    overlaps
}

#[cfg(test)]
mod tests {
    use super::*;
    use dqi_model::{NonConformantRow, QueryRow};

    fn nc(subject: &str, form: Option<&str>) -> NonConformantRow {
        NonConformantRow {
            project: "Study 1".to_string(),
            site: "101".to_string(),
            subject: subject.to_string(),
            form_name: form.map(str::to_string),
            ..Default::default()
        }
    }

    fn query(subject: &str, form: Option<&str>) -> QueryRow {
        QueryRow {
            project: "Study 1".to_string(),
            site: "101".to_string(),
            subject: subject.to_string(),
            form_name: form.map(str::to_string),
            ..Default::default()
        }
    }

    fn key(subject: &str) -> SubjectKey {
        SubjectKey::new("Study 1", "101", subject)
    }

    #[test]
    fn intersection_and_difference() {
        let tables = EventTables {
            non_conformant: vec![nc("S1", Some("A")), nc("S1", Some("B"))],
            queries: vec![query("S1", Some("B")), query("S1", Some("C"))],
            ..Default::default()
        };
        let overlap = form_overlap_by_subject(&tables);
        let result = overlap.get(&key("S1")).copied().unwrap_or_default();
        assert_eq!(result.with_queries, 1);
        assert_eq!(result.without_queries, 1);
    }

    #[test]
    fn duplicate_rows_collapse_to_distinct_forms() {
        let tables = EventTables {
            non_conformant: vec![nc("S1", Some("A")), nc("S1", Some("A")), nc("S1", Some("A"))],
            queries: vec![query("S1", Some("A"))],
            ..Default::default()
        };
        let overlap = form_overlap_by_subject(&tables);
        let result = overlap.get(&key("S1")).copied().unwrap_or_default();
        assert_eq!(result.with_queries, 1);
        assert_eq!(result.without_queries, 0);
    }

    #[test]
    fn missing_query_side_treated_as_empty() {
        let tables = EventTables {
            non_conformant: vec![nc("S1", Some("A")), nc("S1", Some("B"))],
            ..Default::default()
        };
        let overlap = form_overlap_by_subject(&tables);
        let result = overlap.get(&key("S1")).copied().unwrap_or_default();
        assert_eq!(result.with_queries, 0);
        assert_eq!(result.without_queries, 2);
    }

    #[test]
    fn null_form_names_are_ignored() {
        let tables = EventTables {
            non_conformant: vec![nc("S1", None), nc("S1", Some("A"))],
            queries: vec![query("S1", None)],
            ..Default::default()
        };
        let overlap = form_overlap_by_subject(&tables);
        let result = overlap.get(&key("S1")).copied().unwrap_or_default();
        assert_eq!(result.with_queries, 0);
        assert_eq!(result.without_queries, 1);
    }
}

//! Latest-visit backfill from the completed-visits (SV) export.

use std::collections::HashMap;

use chrono::NaiveDate;

use dqi_model::{CompletedVisit, SubjectKey};

/// Most recent completed visit per subject.
///
/// "Most recent" means the greatest visit date; rows without a date lose to
/// any dated row. Ties keep the earliest source row, so the result is a
/// deterministic function of the export order.
pub fn latest_visit_by_subject(visits: &[CompletedVisit]) -> HashMap<SubjectKey, String> {
    let mut best: HashMap<SubjectKey, (Option<NaiveDate>, &str)> = HashMap::new();
    for visit in visits {
        let key = SubjectKey::new(
            visit.project.clone(),
            visit.site.clone(),
            visit.subject.clone(),
        );
        match best.get(&key) {
            // None sorts below any date, so undated candidates never win.
            Some((current_date, _)) if visit.visit_date <= *current_date => {}
            _ => {
                best.insert(key, (visit.visit_date, visit.visit_name.as_str()));
            }
        }
    }
    best.into_iter()
        .map(|(key, (_, name))| (key, name.to_string()))
        .collect()
}

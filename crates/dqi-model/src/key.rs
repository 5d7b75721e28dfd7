use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of one subject within one study: `(project, site, subject)`.
///
/// Every persisted record is keyed by this triple. Some source reports lack
/// the site dimension; those are aggregated by [`ProjectSubject`] instead and
/// joined back to the full key during reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SubjectKey {
    pub project: String,
    pub site: String,
    pub subject: String,
}

impl SubjectKey {
    pub fn new(
        project: impl Into<String>,
        site: impl Into<String>,
        subject: impl Into<String>,
    ) -> Self {
        Self {
            project: project.into(),
            site: site.into(),
            subject: subject.into(),
        }
    }

    /// Drop the site dimension, for joins against site-less sources.
    pub fn project_subject(&self) -> ProjectSubject {
        ProjectSubject {
            project: self.project.clone(),
            subject: self.subject.clone(),
        }
    }
}

impl fmt::Display for SubjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.project, self.site, self.subject)
    }
}

/// Reduced key for sources without site granularity (coding reports, EDRR).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectSubject {
    pub project: String,
    pub subject: String,
}

impl ProjectSubject {
    pub fn new(project: impl Into<String>, subject: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            subject: subject.into(),
        }
    }
}

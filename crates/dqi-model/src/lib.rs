pub mod error;
pub mod events;
pub mod key;
pub mod master;
pub mod results;

pub use error::{DqiError, Result};
pub use events::{
    CodingDictionary, CodingRecord, CompletedVisit, EdrrIssue, EventTables, InactivatedForm,
    LabIssue, MissingPage, MissingVisit, NonConformantRow, QueryRow, SaeReview,
};
pub use key::{ProjectSubject, SubjectKey};
pub use master::SubjectMasterRecord;
pub use results::{
    CLEAN_CRITERIA_TOTAL, CleanCriteria, CleanStatus, CleanStatusResult, DqiCategory, DqiResult,
    NormalizedScores,
};

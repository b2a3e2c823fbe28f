use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    domain::{CompilationStatus, SemesterId, SemesterName, SourceType, SubjectId, TexFile, YearId},
    timestamp::{lenient_date, lenient_datetime},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateYearRequest {
    pub year: u8,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateSemesterRequest {
    pub year_id: YearId,
    pub name: SemesterName,
    pub description: String,
    #[serde(with = "lenient_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(with = "lenient_date")]
    pub end_date: Option<NaiveDate>,
}

/// Terms carry full timestamps on the wire, unlike semesters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateTermRequest {
    pub name: String,
    pub description: String,
    #[serde(with = "lenient_datetime")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(with = "lenient_datetime")]
    pub end_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateSubjectRequest {
    pub name: String,
    pub description: String,
    pub semester_id: SemesterId,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateFileRequest {
    pub name: String,
    pub year_id: YearId,
    pub semester_id: SemesterId,
    pub subject_id: SubjectId,
    pub content: String,
    pub tags: Vec<String>,
    pub notes: String,
    pub source_type: SourceType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiUploadEntry {
    pub name: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiUploadRequest {
    pub files: Vec<MultiUploadEntry>,
    pub subject_id: SubjectId,
    pub semester_id: SemesterId,
    pub tags: Vec<String>,
    pub notes: String,
}

/// Partial file update. Unset fields stay off the wire; a changed `content`
/// makes the backend append a version.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateFileRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl UpdateFileRequest {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.content.is_none() && self.tags.is_none() && self.notes.is_none()
    }
}

/// `term_id` is the backend's filter key; it carries the selected semester.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    pub term_id: Option<SemesterId>,
    pub subject_id: Option<SubjectId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    #[serde(default)]
    pub total_years: u64,
    #[serde(default)]
    pub total_semesters: u64,
    #[serde(default)]
    pub total_terms: u64,
    #[serde(default)]
    pub total_subjects: u64,
    #[serde(default)]
    pub total_files: u64,
    #[serde(default)]
    pub compilation_stats: HashMap<String, u64>,
    #[serde(default)]
    pub recent_files: Vec<TexFile>,
}

impl DashboardStats {
    pub fn compilation_count(&self, status: CompilationStatus) -> u64 {
        self.compilation_stats
            .get(status.as_str())
            .copied()
            .unwrap_or(0)
    }
}

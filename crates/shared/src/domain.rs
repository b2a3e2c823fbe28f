use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::timestamp::{lenient_date, lenient_datetime};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

id_newtype!(YearId);
id_newtype!(SemesterId);
id_newtype!(TermId);
id_newtype!(SubjectId);
id_newtype!(FileId);
id_newtype!(VersionId);

pub const DEFAULT_SUBJECT_COLOR: &str = "#3B82F6";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompilationStatus {
    Success,
    Error,
    #[default]
    #[serde(other)]
    Unknown,
}

impl CompilationStatus {
    pub const ALL: [CompilationStatus; 3] = [Self::Success, Self::Error, Self::Unknown];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for CompilationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    #[default]
    Manual,
    Paste,
    Git,
    Upload,
    #[serde(other)]
    Other,
}

impl SourceType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Paste => "paste",
            Self::Git => "git",
            Self::Upload => "upload",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SemesterName {
    #[default]
    A,
    B,
}

impl SemesterName {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Year {
    pub id: YearId,
    pub year: u8,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Semester {
    pub id: SemesterId,
    pub year_id: YearId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, with = "lenient_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, with = "lenient_date")]
    pub end_date: Option<NaiveDate>,
}

/// Legacy grouping that predates semesters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Term {
    pub id: TermId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, with = "lenient_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, with = "lenient_date")]
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    pub id: SubjectId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semester_id: Option<SemesterId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub term_id: Option<TermId>,
    #[serde(default)]
    pub color: Option<String>,
}

impl Subject {
    /// Semester id, or the legacy term id reinterpreted as one.
    pub fn grouping_id(&self) -> Option<SemesterId> {
        grouping_id(self.semester_id.as_ref(), self.term_id.as_ref())
    }

    pub fn color_or_default(&self) -> &str {
        self.color.as_deref().unwrap_or(DEFAULT_SUBJECT_COLOR)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileVersion {
    pub id: VersionId,
    pub content: String,
    #[serde(default)]
    pub word_count: u64,
    #[serde(default)]
    pub file_size: u64,
    #[serde(default)]
    pub compilation_status: CompilationStatus,
    #[serde(default, with = "lenient_datetime")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TexFile {
    pub id: FileId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_id: Option<SubjectId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semester_id: Option<SemesterId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub term_id: Option<TermId>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub word_count: u64,
    #[serde(default)]
    pub file_size: u64,
    #[serde(default)]
    pub compilation_status: CompilationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compilation_output: Option<String>,
    #[serde(default)]
    pub source_type: SourceType,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default, with = "lenient_datetime")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "lenient_datetime")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub versions: Vec<FileVersion>,
}

impl TexFile {
    pub fn grouping_id(&self) -> Option<SemesterId> {
        grouping_id(self.semester_id.as_ref(), self.term_id.as_ref())
    }
}

fn grouping_id(semester_id: Option<&SemesterId>, term_id: Option<&TermId>) -> Option<SemesterId> {
    semester_id
        .cloned()
        .or_else(|| term_id.map(|term_id| SemesterId(term_id.0.clone())))
}

//! Controlled forms behind the create modals.
//!
//! Only fields the UI marks as required are checked; duplicates, overlapping
//! dates and the like are left to the backend.

use chrono::{DateTime, NaiveDate, Utc};
use shared::{
    domain::{SemesterId, SemesterName, TexFile, YearId, DEFAULT_SUBJECT_COLOR},
    protocol::{
        CreateSemesterRequest, CreateSubjectRequest, CreateTermRequest, CreateYearRequest,
        UpdateFileRequest,
    },
};
use thiserror::Error;

use crate::upload::parse_tags;

pub const YEAR_CHOICES: [u8; 4] = [1, 2, 3, 4];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("{field} must be a YYYY-MM-DD date, got '{value}'")]
    InvalidDate { field: &'static str, value: String },
    #[error("year must be between 1 and 4, got {0}")]
    YearOutOfRange(u8),
}

fn required(value: &str, field: &'static str) -> Result<String, FormError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(FormError::MissingField(field));
    }
    Ok(trimmed.to_string())
}

fn required_id<T: Clone>(value: &Option<T>, field: &'static str) -> Result<T, FormError> {
    value.clone().ok_or(FormError::MissingField(field))
}

/// Blank input is "no date".
pub fn parse_optional_date(value: &str, field: &'static str) -> Result<Option<NaiveDate>, FormError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| FormError::InvalidDate {
            field,
            value: trimmed.to_string(),
        })
}

fn date_to_midnight_utc(date: Option<NaiveDate>) -> Option<DateTime<Utc>> {
    date.and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearForm {
    pub year: u8,
    pub description: String,
}

impl Default for YearForm {
    fn default() -> Self {
        Self {
            year: 1,
            description: String::new(),
        }
    }
}

impl YearForm {
    pub fn to_request(&self) -> Result<CreateYearRequest, FormError> {
        if !YEAR_CHOICES.contains(&self.year) {
            return Err(FormError::YearOutOfRange(self.year));
        }
        Ok(CreateYearRequest {
            year: self.year,
            description: self.description.clone(),
        })
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SemesterForm {
    pub year_id: Option<YearId>,
    pub name: SemesterName,
    pub description: String,
    pub start_date: String,
    pub end_date: String,
}

impl SemesterForm {
    pub fn to_request(&self) -> Result<CreateSemesterRequest, FormError> {
        Ok(CreateSemesterRequest {
            year_id: required_id(&self.year_id, "academic year")?,
            name: self.name,
            description: self.description.clone(),
            start_date: parse_optional_date(&self.start_date, "start date")?,
            end_date: parse_optional_date(&self.end_date, "end date")?,
        })
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TermForm {
    pub name: String,
    pub description: String,
    pub start_date: String,
    pub end_date: String,
}

impl TermForm {
    pub fn to_request(&self) -> Result<CreateTermRequest, FormError> {
        Ok(CreateTermRequest {
            name: required(&self.name, "name")?,
            description: self.description.clone(),
            start_date: date_to_midnight_utc(parse_optional_date(&self.start_date, "start date")?),
            end_date: date_to_midnight_utc(parse_optional_date(&self.end_date, "end date")?),
        })
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectForm {
    pub name: String,
    pub description: String,
    pub semester_id: Option<SemesterId>,
    pub color: String,
}

impl Default for SubjectForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            semester_id: None,
            color: DEFAULT_SUBJECT_COLOR.to_string(),
        }
    }
}

impl SubjectForm {
    pub fn to_request(&self) -> Result<CreateSubjectRequest, FormError> {
        let color = if self.color.trim().is_empty() {
            DEFAULT_SUBJECT_COLOR.to_string()
        } else {
            self.color.trim().to_string()
        };
        Ok(CreateSubjectRequest {
            name: required(&self.name, "name")?,
            description: self.description.clone(),
            semester_id: required_id(&self.semester_id, "semester")?,
            color,
        })
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Editable copy of a file's user fields, seeded from the fetched record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditFileForm {
    pub name: String,
    pub content: String,
    /// Comma separated, as in the add-file form.
    pub tags: String,
    pub notes: String,
}

impl EditFileForm {
    pub fn from_file(file: &TexFile) -> Self {
        Self {
            name: file.name.clone(),
            content: file.content.clone(),
            tags: file.tags.join(", "),
            notes: file.notes.clone().unwrap_or_default(),
        }
    }

    /// Carries only the fields that differ from `original`.
    pub fn to_request(&self, original: &TexFile) -> Result<UpdateFileRequest, FormError> {
        let name = required(&self.name, "file name")?;
        let tags = parse_tags(&self.tags);
        let original_notes = original.notes.as_deref().unwrap_or_default();
        Ok(UpdateFileRequest {
            name: (name != original.name).then_some(name),
            content: (self.content != original.content).then(|| self.content.clone()),
            tags: (tags != original.tags).then_some(tags),
            notes: (self.notes != original_notes).then(|| self.notes.clone()),
        })
    }
}

/// Parses `#RRGGBB` into channels, for swatches.
pub fn parse_hex_color(value: &str) -> Option<[u8; 3]> {
    let hex = value.trim().strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
    Some([channel(0..2)?, channel(2..4)?, channel(4..6)?])
}

pub fn format_hex_color(rgb: [u8; 3]) -> String {
    format!("#{:02X}{:02X}{:02X}", rgb[0], rgb[1], rgb[2])
}

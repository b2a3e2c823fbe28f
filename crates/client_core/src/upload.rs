//! Add-file modal state and the three working upload modes.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use futures::future::try_join_all;
use shared::{
    domain::{SemesterId, SourceType, SubjectId, YearId},
    protocol::{CreateFileRequest, MultiUploadEntry, MultiUploadRequest},
};

use crate::forms::FormError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UploadTab {
    #[default]
    Manual,
    Paste,
    /// Placeholder; nothing is ever submitted from this tab.
    Git,
}

impl UploadTab {
    pub const ALL: [UploadTab; 3] = [UploadTab::Manual, UploadTab::Paste, UploadTab::Git];

    pub fn label(self) -> &'static str {
        match self {
            UploadTab::Manual => "Manual Upload",
            UploadTab::Paste => "Copy & Paste",
            UploadTab::Git => "Git Integration",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub content: String,
    pub size: u64,
}

/// One file sent as multipart form data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub subject_id: SubjectId,
    pub semester_id: SemesterId,
    /// Raw comma separated string; the backend splits it.
    pub tags: String,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FileSubmission {
    Create(CreateFileRequest),
    MultiUpload(MultiUploadRequest),
    Unsupported,
}

pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddFileForm {
    pub tab: UploadTab,
    pub name: String,
    pub content: String,
    pub tags: String,
    pub notes: String,
    year_id: Option<YearId>,
    semester_id: Option<SemesterId>,
    subject_id: Option<SubjectId>,
    multi_file_mode: bool,
    selected_files: Vec<SelectedFile>,
}

impl AddFileForm {
    pub fn year_id(&self) -> Option<&YearId> {
        self.year_id.as_ref()
    }

    pub fn semester_id(&self) -> Option<&SemesterId> {
        self.semester_id.as_ref()
    }

    pub fn subject_id(&self) -> Option<&SubjectId> {
        self.subject_id.as_ref()
    }

    pub fn multi_file_mode(&self) -> bool {
        self.multi_file_mode
    }

    pub fn selected_files(&self) -> &[SelectedFile] {
        &self.selected_files
    }

    pub fn set_tab(&mut self, tab: UploadTab) {
        self.tab = tab;
    }

    pub fn set_year(&mut self, year_id: Option<YearId>) {
        self.year_id = year_id;
        self.semester_id = None;
        self.subject_id = None;
    }

    pub fn set_semester(&mut self, semester_id: Option<SemesterId>) {
        self.semester_id = semester_id;
        self.subject_id = None;
    }

    pub fn set_subject(&mut self, subject_id: Option<SubjectId>) {
        self.subject_id = subject_id;
    }

    pub fn set_multi_file_mode(&mut self, enabled: bool) {
        self.multi_file_mode = enabled;
        if !enabled {
            self.selected_files.clear();
        }
    }

    /// Replaces the selection and switches into multi-file mode.
    pub fn set_selected_files(&mut self, files: Vec<SelectedFile>) {
        if files.is_empty() {
            return;
        }
        self.selected_files = files;
        self.multi_file_mode = true;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn placement(&self) -> Result<(SemesterId, SubjectId), FormError> {
        if self.year_id.is_none() {
            return Err(FormError::MissingField("academic year"));
        }
        let semester_id = self
            .semester_id
            .clone()
            .ok_or(FormError::MissingField("semester"))?;
        let subject_id = self
            .subject_id
            .clone()
            .ok_or(FormError::MissingField("subject"))?;
        Ok((semester_id, subject_id))
    }

    /// Payload for the single-file multipart upload, sent as soon as a file
    /// is picked.
    pub fn upload_for(&self, file_name: String, bytes: Vec<u8>) -> Result<FileUpload, FormError> {
        let (semester_id, subject_id) = self.placement()?;
        Ok(FileUpload {
            file_name,
            bytes,
            subject_id,
            semester_id,
            tags: self.tags.clone(),
            notes: self.notes.clone(),
        })
    }

    pub fn submission(&self) -> Result<FileSubmission, FormError> {
        match self.tab {
            UploadTab::Git => Ok(FileSubmission::Unsupported),
            UploadTab::Manual if self.multi_file_mode => {
                let (semester_id, subject_id) = self.placement()?;
                if self.selected_files.is_empty() {
                    return Err(FormError::MissingField(".tex files"));
                }
                Ok(FileSubmission::MultiUpload(MultiUploadRequest {
                    files: self
                        .selected_files
                        .iter()
                        .map(|file| MultiUploadEntry {
                            name: file.name.clone(),
                            content: file.content.clone(),
                        })
                        .collect(),
                    subject_id,
                    semester_id,
                    tags: parse_tags(&self.tags),
                    notes: self.notes.clone(),
                }))
            }
            UploadTab::Manual => Err(FormError::MissingField(".tex file")),
            UploadTab::Paste => {
                let (semester_id, subject_id) = self.placement()?;
                let name = self.name.trim();
                if name.is_empty() {
                    return Err(FormError::MissingField("file name"));
                }
                if self.content.trim().is_empty() {
                    return Err(FormError::MissingField("LaTeX content"));
                }
                Ok(FileSubmission::Create(CreateFileRequest {
                    name: name.to_string(),
                    year_id: self
                        .year_id
                        .clone()
                        .ok_or(FormError::MissingField("academic year"))?,
                    semester_id,
                    subject_id,
                    content: self.content.clone(),
                    tags: parse_tags(&self.tags),
                    notes: self.notes.clone(),
                    source_type: SourceType::Paste,
                }))
            }
        }
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

async fn read_selected_file(path: PathBuf) -> Result<SelectedFile> {
    let bytes = tokio::fs::read(&path)
        .await
        .with_context(|| format!("failed to read '{}'", path.display()))?;
    let size = bytes.len() as u64;
    // Legacy Latin-1 sources still load; invalid sequences become U+FFFD.
    let content = String::from_utf8_lossy(&bytes).into_owned();
    Ok(SelectedFile {
        name: display_name(&path),
        content,
        size,
    })
}

/// Reads every chosen file's text concurrently, keeping the chosen order.
pub async fn read_selected_files(paths: &[PathBuf]) -> Result<Vec<SelectedFile>> {
    let files = try_join_all(paths.iter().cloned().map(read_selected_file)).await?;
    tracing::debug!(count = files.len(), "read selected files");
    Ok(files)
}

pub async fn read_upload_source(path: &Path) -> Result<(String, Vec<u8>)> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read '{}'", path.display()))?;
    Ok((display_name(path), bytes))
}

#[cfg(test)]
#[path = "tests/upload_tests.rs"]
mod tests;

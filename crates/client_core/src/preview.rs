//! Read-only file preview and local export.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Local, Utc};
use shared::domain::{FileVersion, TexFile};

pub const VERSION_EXCERPT_CHARS: usize = 200;
pub const CARD_TAG_LIMIT: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PreviewTab {
    #[default]
    Content,
    Info,
    Versions,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilePreview {
    pub file: TexFile,
    pub tab: PreviewTab,
}

impl FilePreview {
    pub fn open(file: TexFile) -> Self {
        Self {
            file,
            tab: PreviewTab::Content,
        }
    }

    pub fn tab_label(&self, tab: PreviewTab) -> String {
        match tab {
            PreviewTab::Content => "Content".to_string(),
            PreviewTab::Info => "Info".to_string(),
            PreviewTab::Versions => format!("Versions ({})", self.file.versions.len()),
        }
    }

    /// Versions as stored (newest first), each with its display number.
    pub fn numbered_versions(&self) -> impl Iterator<Item = (usize, &FileVersion)> {
        let total = self.file.versions.len();
        self.file
            .versions
            .iter()
            .enumerate()
            .map(move |(index, version)| (total - index, version))
    }
}

pub fn version_excerpt(content: &str) -> String {
    let mut chars = content.chars();
    let excerpt: String = chars.by_ref().take(VERSION_EXCERPT_CHARS).collect();
    if chars.next().is_some() {
        format!("{excerpt}...")
    } else {
        excerpt
    }
}

/// First few tags plus a "+N more" chip for the rest.
pub fn tag_chips(tags: &[String]) -> Vec<String> {
    let mut chips: Vec<String> = tags.iter().take(CARD_TAG_LIMIT).cloned().collect();
    if tags.len() > CARD_TAG_LIMIT {
        chips.push(format!("+{} more", tags.len() - CARD_TAG_LIMIT));
    }
    chips
}

pub fn format_local_date(value: Option<DateTime<Utc>>) -> String {
    value
        .map(|value| value.with_timezone(&Local).format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

pub fn format_local_datetime(value: Option<DateTime<Utc>>) -> String {
    value
        .map(|value| {
            value
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string()
        })
        .unwrap_or_default()
}

/// Only the final component of the record name is used, so a name such as
/// `../x.tex` still lands inside `dir`.
pub fn export_file_name(file: &TexFile) -> Result<String> {
    let name = Path::new(file.name.trim())
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .filter(|name| !name.is_empty())
        .ok_or_else(|| anyhow!("file '{}' has no usable name for export", file.id))?;
    Ok(name)
}

/// Writes the already-fetched content to disk; no backend round trip.
pub async fn export_to_dir(file: &TexFile, dir: &Path) -> Result<PathBuf> {
    let target = dir.join(export_file_name(file)?);
    export_to_path(file, &target).await?;
    Ok(target)
}

pub async fn export_to_path(file: &TexFile, target: &Path) -> Result<()> {
    tokio::fs::write(target, file.content.as_bytes())
        .await
        .with_context(|| format!("failed to write '{}'", target.display()))?;
    tracing::info!(file_id = %file.id, path = %target.display(), "exported file");
    Ok(())
}

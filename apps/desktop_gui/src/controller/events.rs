//! Backend-to-UI events and error modeling for the desktop controller.

use std::path::PathBuf;

use client_core::{upload::SelectedFile, TrackerState};
use shared::domain::{FileId, TexFile};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Year,
    Semester,
    Term,
    Subject,
}

impl EntityKind {
    pub fn label(self) -> &'static str {
        match self {
            EntityKind::Year => "Academic year",
            EntityKind::Semester => "Semester",
            EntityKind::Term => "Term",
            EntityKind::Subject => "Subject",
        }
    }
}

pub enum UiEvent {
    Info(String),
    DataLoaded(Box<TrackerState>),
    SearchFinished {
        generation: u64,
        state: Box<TrackerState>,
    },
    Created(EntityKind),
    FileSubmitted {
        count: usize,
    },
    FilesRead(Vec<SelectedFile>),
    PreviewLoaded(Box<TexFile>),
    Exported(PathBuf),
    FileUpdated(Box<TexFile>),
    FileDeleted(FileId),
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Transport,
    Validation,
    NotFound,
    Server,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    Load,
    Search,
    Create,
    Upload,
    Preview,
    Export,
    Update,
    Delete,
}

pub fn classify_load_failure(message: &str) -> String {
    let lower = message.to_ascii_lowercase();
    if lower.contains("backend worker startup failure") {
        "Backend worker startup failure; check the backend URL setting and relaunch.".to_string()
    } else if lower.contains("error sending request")
        || lower.contains("connection refused")
        || lower.contains("dns")
        || lower.contains("timed out")
    {
        "Backend unreachable; check that it is running and reload.".to_string()
    } else {
        format!("Error loading data: {message}")
    }
}

pub fn err_label(category: UiErrorCategory) -> &'static str {
    match category {
        UiErrorCategory::Transport => "Connection error",
        UiErrorCategory::Validation => "Invalid input",
        UiErrorCategory::NotFound => "Not found",
        UiErrorCategory::Server => "Backend error",
        UiErrorCategory::Unknown => "Error",
    }
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if message_lower.contains("is required")
            || message_lower.contains("must be")
            || message_lower.contains("(validation)")
            || message_lower.contains("not valid utf-8")
        {
            UiErrorCategory::Validation
        } else if message_lower.contains("(notfound)") || message_lower.contains("not found") {
            UiErrorCategory::NotFound
        } else if message_lower.contains("(internal)") || message_lower.contains("(unexpected)") {
            UiErrorCategory::Server
        } else if message_lower.contains("timed out")
            || message_lower.contains("connection")
            || message_lower.contains("error sending request")
            || message_lower.contains("unreachable")
            || message_lower.contains("disconnected")
        {
            UiErrorCategory::Transport
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

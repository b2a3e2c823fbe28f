//! Backend commands queued from UI to backend worker.

use std::path::PathBuf;

use client_core::{
    forms::{SemesterForm, SubjectForm, TermForm, YearForm},
    search::SearchAction,
    upload::AddFileForm,
};
use shared::{
    domain::{FileId, TexFile},
    protocol::UpdateFileRequest,
};

pub enum BackendCommand {
    Reload,
    Search {
        generation: u64,
        action: SearchAction,
    },
    CreateYear(YearForm),
    CreateSemester(SemesterForm),
    CreateTerm(TermForm),
    CreateSubject(SubjectForm),
    /// Paste, multi-file and Git tabs.
    SubmitFile(Box<AddFileForm>),
    /// Single manual upload, sent as soon as the file is picked.
    UploadFile {
        path: PathBuf,
        form: Box<AddFileForm>,
    },
    ReadSelectedFiles {
        paths: Vec<PathBuf>,
    },
    RefreshPreview {
        file_id: FileId,
    },
    ExportFile {
        file: Box<TexFile>,
        target: PathBuf,
    },
    UpdateFile {
        file_id: FileId,
        request: UpdateFileRequest,
    },
    DeleteFile {
        file_id: FileId,
    },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::Reload => "reload",
            BackendCommand::Search { .. } => "search",
            BackendCommand::CreateYear(_) => "create_year",
            BackendCommand::CreateSemester(_) => "create_semester",
            BackendCommand::CreateTerm(_) => "create_term",
            BackendCommand::CreateSubject(_) => "create_subject",
            BackendCommand::SubmitFile(_) => "submit_file",
            BackendCommand::UploadFile { .. } => "upload_file",
            BackendCommand::ReadSelectedFiles { .. } => "read_selected_files",
            BackendCommand::RefreshPreview { .. } => "refresh_preview",
            BackendCommand::ExportFile { .. } => "export_file",
            BackendCommand::UpdateFile { .. } => "update_file",
            BackendCommand::DeleteFile { .. } => "delete_file",
        }
    }
}

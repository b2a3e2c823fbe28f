//! Reducer-like view model: every backend event and UI intent is a plain
//! state transition, so the egui layer only draws and forwards clicks.

use std::{
    path::PathBuf,
    time::{Duration, Instant},
};

use client_core::{
    filter::FileFilter,
    forms::{EditFileForm, SemesterForm, SubjectForm, TermForm, YearForm},
    preview::FilePreview,
    search::SearchDebouncer,
    upload::{AddFileForm, UploadTab},
    view::ViewRouter,
    TrackerState,
};
use shared::domain::{SemesterId, SubjectId, TexFile};

use crate::{
    backend_bridge::commands::BackendCommand,
    controller::events::{err_label, EntityKind, UiError, UiErrorContext, UiEvent},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalKind {
    Year,
    Semester,
    Term,
    Subject,
    AddFile,
}

impl From<EntityKind> for ModalKind {
    fn from(kind: EntityKind) -> Self {
        match kind {
            EntityKind::Year => ModalKind::Year,
            EntityKind::Semester => ModalKind::Semester,
            EntityKind::Term => ModalKind::Term,
            EntityKind::Subject => ModalKind::Subject,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Modals {
    pub open: Option<ModalKind>,
    pub submitting: bool,
    pub year: YearForm,
    pub semester: SemesterForm,
    pub term: TermForm,
    pub subject: SubjectForm,
    pub add_file: AddFileForm,
}

impl Modals {
    fn reset(&mut self, kind: ModalKind) {
        match kind {
            ModalKind::Year => self.year.reset(),
            ModalKind::Semester => self.semester.reset(),
            ModalKind::Term => self.term.reset(),
            ModalKind::Subject => self.subject.reset(),
            ModalKind::AddFile => self.add_file.reset(),
        }
    }
}

/// In-place edit of the previewed file.
#[derive(Debug, Clone, Default)]
pub struct FileEdit {
    pub form: EditFileForm,
    pub saving: bool,
}

pub struct ViewModel {
    pub data: TrackerState,
    pub router: ViewRouter,
    pub filter: FileFilter,
    pub search_query: String,
    pub modals: Modals,
    pub preview: Option<FilePreview>,
    pub edit: Option<FileEdit>,
    pub status: String,
    pub last_error: Option<UiError>,
    debouncer: SearchDebouncer,
}

impl ViewModel {
    pub fn new(search_debounce: Duration) -> Self {
        Self {
            data: TrackerState::default(),
            router: ViewRouter::default(),
            filter: FileFilter::default(),
            search_query: String::new(),
            modals: Modals::default(),
            preview: None,
            edit: None,
            status: String::new(),
            last_error: None,
            debouncer: SearchDebouncer::new(search_debounce),
        }
    }

    pub fn begin_reload(&mut self) -> BackendCommand {
        self.data.loading = true;
        BackendCommand::Reload
    }

    /// A command never reached the worker, so no event will clear the busy
    /// flags it set.
    pub fn dispatch_failed(&mut self) {
        self.data.loading = false;
        self.modals.submitting = false;
        if let Some(edit) = self.edit.as_mut() {
            edit.saving = false;
        }
    }

    pub fn search_pending_for(&self, now: Instant) -> Option<Duration> {
        self.debouncer.time_until_due(now)
    }

    pub fn apply_event(&mut self, event: UiEvent) {
        match event {
            UiEvent::Info(message) => {
                self.status = message;
            }
            UiEvent::DataLoaded(state) => {
                self.data = *state;
                self.data.loading = false;
                self.debouncer.note_external_reload();
                self.last_error = None;
            }
            UiEvent::SearchFinished { generation, state } => {
                if !self.debouncer.is_current(generation) {
                    tracing::debug!(generation, "dropping stale search results");
                    return;
                }
                self.data = *state;
                self.data.loading = false;
            }
            UiEvent::Created(kind) => {
                let modal = ModalKind::from(kind);
                self.finish_submit(modal);
                self.status = format!("{} created", kind.label());
            }
            UiEvent::FileSubmitted { count } => {
                self.finish_submit(ModalKind::AddFile);
                self.status = if count == 1 {
                    "File added".to_string()
                } else {
                    format!("{count} files uploaded")
                };
            }
            UiEvent::FilesRead(files) => {
                let count = files.len();
                self.modals.add_file.set_selected_files(files);
                self.status = format!("{count} files selected");
            }
            UiEvent::PreviewLoaded(file) => {
                if let Some(preview) = self
                    .preview
                    .as_mut()
                    .filter(|preview| preview.file.id == file.id)
                {
                    preview.file = *file;
                }
            }
            UiEvent::Exported(path) => {
                self.status = format!("Saved to {}", path.display());
            }
            UiEvent::FileUpdated(file) => {
                if let Some(preview) = self
                    .preview
                    .as_mut()
                    .filter(|preview| preview.file.id == file.id)
                {
                    preview.file = *file;
                    self.edit = None;
                }
                self.status = "File updated".to_string();
            }
            UiEvent::FileDeleted(file_id) => {
                if self
                    .preview
                    .as_ref()
                    .is_some_and(|preview| preview.file.id == file_id)
                {
                    self.close_preview();
                }
                self.status = "File deleted".to_string();
            }
            UiEvent::Error(err) => {
                match err.context() {
                    UiErrorContext::Create | UiErrorContext::Upload => {
                        self.modals.submitting = false;
                    }
                    UiErrorContext::Update => {
                        if let Some(edit) = self.edit.as_mut() {
                            edit.saving = false;
                        }
                    }
                    _ => {}
                }
                self.data.loading = false;
                self.status = format!("{}: {}", err_label(err.category()), err.message());
                self.last_error = Some(err);
            }
        }
    }

    /// Closes the modal and resets its form only once the backend accepted it.
    fn finish_submit(&mut self, modal: ModalKind) {
        self.modals.submitting = false;
        self.modals.reset(modal);
        if self.modals.open == Some(modal) {
            self.modals.open = None;
        }
    }

    pub fn set_search_query(&mut self, query: String, now: Instant) {
        self.search_query = query;
        self.debouncer
            .input_changed(&self.search_query, &self.filter, now);
    }

    pub fn select_semester_filter(&mut self, semester: Option<SemesterId>, now: Instant) {
        self.filter.select_semester(semester);
        self.debouncer
            .input_changed(&self.search_query, &self.filter, now);
    }

    pub fn select_subject_filter(&mut self, subject: Option<SubjectId>, now: Instant) {
        self.filter.select_subject(subject);
        self.debouncer
            .input_changed(&self.search_query, &self.filter, now);
    }

    pub fn poll_search(&mut self, now: Instant) -> Option<BackendCommand> {
        let due = self.debouncer.poll(now)?;
        self.data.loading = true;
        Some(BackendCommand::Search {
            generation: due.generation,
            action: due.action,
        })
    }

    pub fn visible_files(&self) -> Vec<&TexFile> {
        self.filter.apply(&self.data.files)
    }

    pub fn open_modal(&mut self, kind: ModalKind) {
        self.modals.open = Some(kind);
        self.modals.submitting = false;
    }

    pub fn close_modal(&mut self) {
        self.modals.open = None;
        self.modals.submitting = false;
    }

    /// Validates the open form locally and builds its command. Invalid input
    /// stays in the modal with a status message.
    pub fn submit_modal(&mut self) -> Option<BackendCommand> {
        let kind = self.modals.open?;
        if self.modals.submitting {
            return None;
        }
        let checked = match kind {
            ModalKind::Year => self
                .modals
                .year
                .to_request()
                .map(|_| BackendCommand::CreateYear(self.modals.year.clone())),
            ModalKind::Semester => self
                .modals
                .semester
                .to_request()
                .map(|_| BackendCommand::CreateSemester(self.modals.semester.clone())),
            ModalKind::Term => self
                .modals
                .term
                .to_request()
                .map(|_| BackendCommand::CreateTerm(self.modals.term.clone())),
            ModalKind::Subject => self
                .modals
                .subject
                .to_request()
                .map(|_| BackendCommand::CreateSubject(self.modals.subject.clone())),
            ModalKind::AddFile => {
                if self.modals.add_file.tab == UploadTab::Git {
                    self.status = "Git integration is not available yet".to_string();
                    return None;
                }
                self.modals
                    .add_file
                    .submission()
                    .map(|_| BackendCommand::SubmitFile(Box::new(self.modals.add_file.clone())))
            }
        };
        match checked {
            Ok(command) => {
                self.modals.submitting = true;
                Some(command)
            }
            Err(err) => {
                self.apply_event(UiEvent::Error(UiError::from_message(
                    UiErrorContext::Create,
                    err.to_string(),
                )));
                None
            }
        }
    }

    /// Manual single-file mode uploads as soon as a file is picked.
    pub fn upload_picked(&mut self, path: PathBuf) -> Option<BackendCommand> {
        if self.modals.submitting || self.modals.add_file.subject_id().is_none() {
            return None;
        }
        self.modals.submitting = true;
        Some(BackendCommand::UploadFile {
            path,
            form: Box::new(self.modals.add_file.clone()),
        })
    }

    pub fn open_preview(&mut self, file: TexFile) {
        self.preview = Some(FilePreview::open(file));
        self.edit = None;
    }

    pub fn close_preview(&mut self) {
        self.preview = None;
        self.edit = None;
    }

    pub fn begin_edit(&mut self) {
        if let Some(preview) = self.preview.as_ref() {
            self.edit = Some(FileEdit {
                form: EditFileForm::from_file(&preview.file),
                saving: false,
            });
        }
    }

    pub fn cancel_edit(&mut self) {
        self.edit = None;
    }

    /// Builds the update for the fields that changed. An unchanged form just
    /// leaves edit mode.
    pub fn submit_edit(&mut self) -> Option<BackendCommand> {
        let preview = self.preview.as_ref()?;
        let edit = self.edit.as_mut()?;
        if edit.saving {
            return None;
        }
        match edit.form.to_request(&preview.file) {
            Ok(request) if request.is_empty() => {
                self.edit = None;
                self.status = "No changes to save".to_string();
                None
            }
            Ok(request) => {
                edit.saving = true;
                Some(BackendCommand::UpdateFile {
                    file_id: preview.file.id.clone(),
                    request,
                })
            }
            Err(err) => {
                self.apply_event(UiEvent::Error(UiError::from_message(
                    UiErrorContext::Update,
                    err.to_string(),
                )));
                None
            }
        }
    }
}

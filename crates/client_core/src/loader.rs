use std::sync::Arc;

use anyhow::{Context, Result};
use shared::{
    domain::{FileId, TexFile},
    protocol::UpdateFileRequest,
};
use tracing::{error, info, warn};

use crate::{
    forms::{SemesterForm, SubjectForm, TermForm, YearForm},
    search::SearchAction,
    state::{Snapshot, TrackerState},
    upload::{AddFileForm, FileSubmission, FileUpload},
    TrackerApi,
};

/// Fetches the five collections concurrently. All-or-nothing: the first
/// failing read fails the load.
pub async fn load_snapshot(api: &dyn TrackerApi) -> Result<Snapshot> {
    let (years, semesters, subjects, files, stats) = tokio::try_join!(
        api.list_years(),
        api.list_semesters(),
        api.list_subjects(),
        api.list_files(),
        api.fetch_stats(),
    )?;
    Ok(Snapshot {
        years,
        semesters,
        subjects,
        files,
        stats,
    })
}

/// Local state plus the backend it mirrors. Every mutation posts once and
/// then reloads everything; nothing is updated optimistically.
pub struct TrackerSession {
    api: Arc<dyn TrackerApi>,
    state: TrackerState,
}

impl TrackerSession {
    pub fn new(api: Arc<dyn TrackerApi>) -> Self {
        Self {
            api,
            state: TrackerState::default(),
        }
    }

    pub fn api(&self) -> &Arc<dyn TrackerApi> {
        &self.api
    }

    pub fn state(&self) -> &TrackerState {
        &self.state
    }

    /// On failure the previous collections stay in place.
    pub async fn reload(&mut self) -> Result<()> {
        self.state.loading = true;
        let result = load_snapshot(self.api.as_ref()).await;
        self.state.loading = false;

        match result {
            Ok(snapshot) => {
                info!(
                    years = snapshot.years.len(),
                    semesters = snapshot.semesters.len(),
                    subjects = snapshot.subjects.len(),
                    files = snapshot.files.len(),
                    "loaded tracker data"
                );
                self.state.apply_snapshot(snapshot);
                self.refresh_terms().await;
                Ok(())
            }
            Err(err) => {
                error!("error loading data: {err:#}");
                Err(err)
            }
        }
    }

    async fn refresh_terms(&mut self) {
        match self.api.list_terms().await {
            Ok(terms) => self.state.replace_terms(terms),
            Err(err) => {
                warn!("legacy terms unavailable: {err:#}");
                self.state.replace_terms(Vec::new());
            }
        }
    }

    async fn reload_after_mutation(&mut self) {
        // reload() already logs its failure; the mutation itself went through.
        let _ = self.reload().await;
    }

    pub async fn run_search(&mut self, action: &SearchAction) -> Result<()> {
        match action {
            SearchAction::Reload => self.reload().await,
            SearchAction::Search(request) => {
                let files = self.api.search(request).await.map_err(|err| {
                    error!(query = %request.query, "error searching files: {err:#}");
                    err
                })?;
                info!(query = %request.query, results = files.len(), "search completed");
                self.state.replace_files(files);
                Ok(())
            }
        }
    }

    /// One-shot listing: a search only needs the semester and subject
    /// lookups next to its results, so it skips the full reload.
    pub async fn load_listing(&mut self, action: &SearchAction) -> Result<()> {
        if let SearchAction::Search(_) = action {
            let (semesters, subjects) =
                tokio::try_join!(self.api.list_semesters(), self.api.list_subjects())
                    .context("error loading lookups")?;
            self.state.replace_lookups(semesters, subjects);
        }
        self.run_search(action).await
    }

    pub async fn create_year(&mut self, form: &YearForm) -> Result<()> {
        let request = form.to_request()?;
        self.api
            .create_year(&request)
            .await
            .context("error creating year")?;
        self.reload_after_mutation().await;
        Ok(())
    }

    pub async fn create_semester(&mut self, form: &SemesterForm) -> Result<()> {
        let request = form.to_request()?;
        self.api
            .create_semester(&request)
            .await
            .context("error creating semester")?;
        self.reload_after_mutation().await;
        Ok(())
    }

    pub async fn create_term(&mut self, form: &TermForm) -> Result<()> {
        let request = form.to_request()?;
        self.api
            .create_term(&request)
            .await
            .context("error creating term")?;
        self.reload_after_mutation().await;
        Ok(())
    }

    pub async fn create_subject(&mut self, form: &SubjectForm) -> Result<()> {
        let request = form.to_request()?;
        self.api
            .create_subject(&request)
            .await
            .context("error creating subject")?;
        self.reload_after_mutation().await;
        Ok(())
    }

    /// Returns `false` when the form's tab has nothing to submit (Git).
    pub async fn submit_file(&mut self, form: &AddFileForm) -> Result<bool> {
        match form.submission()? {
            FileSubmission::Unsupported => {
                info!("git import is not available yet; nothing submitted");
                return Ok(false);
            }
            FileSubmission::Create(request) => {
                self.api
                    .create_file(&request)
                    .await
                    .context("error creating file")?;
            }
            FileSubmission::MultiUpload(request) => {
                let count = request.files.len();
                self.api
                    .multi_upload(&request)
                    .await
                    .with_context(|| format!("error uploading {count} files"))?;
            }
        }
        self.reload_after_mutation().await;
        Ok(true)
    }

    pub async fn upload_file(&mut self, upload: FileUpload) -> Result<()> {
        let file_name = upload.file_name.clone();
        self.api
            .upload_file(upload)
            .await
            .with_context(|| format!("error uploading file '{file_name}'"))?;
        self.reload_after_mutation().await;
        Ok(())
    }

    /// Returns the record as the backend stored it, versions included.
    pub async fn update_file(
        &mut self,
        file_id: &FileId,
        request: &UpdateFileRequest,
    ) -> Result<TexFile> {
        let updated = self
            .api
            .update_file(file_id, request)
            .await
            .with_context(|| format!("error updating file {file_id}"))?;
        info!(file_id = %file_id, versions = updated.versions.len(), "file updated");
        self.reload_after_mutation().await;
        Ok(updated)
    }

    pub async fn delete_file(&mut self, file_id: &FileId) -> Result<()> {
        self.api
            .delete_file(file_id)
            .await
            .with_context(|| format!("error deleting file {file_id}"))?;
        self.reload_after_mutation().await;
        Ok(())
    }

    pub async fn fetch_file(&self, file_id: &FileId) -> Result<TexFile> {
        self.api
            .fetch_file(file_id)
            .await
            .with_context(|| format!("error fetching file {file_id}"))
    }
}

#[cfg(test)]
#[path = "tests/loader_tests.rs"]
mod tests;

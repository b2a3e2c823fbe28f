use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{multipart, Client, Response};
use serde::{de::DeserializeOwned, Serialize};
use shared::{
    domain::{FileId, Semester, Subject, Term, TexFile, Year},
    error::BackendError,
    protocol::{
        CreateFileRequest, CreateSemesterRequest, CreateSubjectRequest, CreateTermRequest,
        CreateYearRequest, DashboardStats, MultiUploadRequest, SearchRequest, UpdateFileRequest,
    },
};
use tracing::debug;

pub mod config;
pub mod filter;
pub mod forms;
pub mod loader;
pub mod preview;
pub mod search;
pub mod state;
pub mod stats;
pub mod upload;
pub mod view;

pub use config::Settings;
pub use loader::{load_snapshot, TrackerSession};
pub use state::{Snapshot, TrackerState};
pub use upload::FileUpload;

const TEX_MIME: &str = "application/x-tex";

/// Every backend call the client makes. Callers always follow a mutation
/// with a full reload.
#[async_trait]
pub trait TrackerApi: Send + Sync {
    async fn list_years(&self) -> Result<Vec<Year>>;
    async fn list_semesters(&self) -> Result<Vec<Semester>>;
    async fn list_terms(&self) -> Result<Vec<Term>>;
    async fn list_subjects(&self) -> Result<Vec<Subject>>;
    async fn list_files(&self) -> Result<Vec<TexFile>>;
    async fn fetch_stats(&self) -> Result<DashboardStats>;
    async fn fetch_file(&self, file_id: &FileId) -> Result<TexFile>;
    async fn create_year(&self, request: &CreateYearRequest) -> Result<()>;
    async fn create_semester(&self, request: &CreateSemesterRequest) -> Result<()>;
    async fn create_term(&self, request: &CreateTermRequest) -> Result<()>;
    async fn create_subject(&self, request: &CreateSubjectRequest) -> Result<()>;
    async fn create_file(&self, request: &CreateFileRequest) -> Result<()>;
    async fn upload_file(&self, upload: FileUpload) -> Result<()>;
    async fn multi_upload(&self, request: &MultiUploadRequest) -> Result<()>;
    async fn search(&self, request: &SearchRequest) -> Result<Vec<TexFile>>;
    /// The one mutation that answers with the record, since a content change
    /// adds a version.
    async fn update_file(&self, file_id: &FileId, request: &UpdateFileRequest) -> Result<TexFile>;
    async fn delete_file(&self, file_id: &FileId) -> Result<()>;
}

pub struct HttpTrackerClient {
    http: Client,
    api_base: String,
}

impl HttpTrackerClient {
    pub fn new(api_base: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let api_base = settings.api_base()?;
        let http = Client::builder()
            .timeout(settings.request_timeout())
            .build()
            .context("failed to build http client")?;
        Ok(Self { http, api_base })
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.api_base)
    }

    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(BackendError::from_response(status.as_u16(), &body).into())
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        debug!(path, "GET");
        let response = self
            .http
            .get(self.url(path))
            .send()
            .await
            .with_context(|| format!("GET {path} failed"))?;
        Self::check(response)
            .await?
            .json()
            .await
            .with_context(|| format!("invalid payload from GET {path}"))
    }

    async fn post_json<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Response> {
        debug!(path, "POST");
        let response = self
            .http
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .with_context(|| format!("POST {path} failed"))?;
        Self::check(response).await
    }

    async fn put_json<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Response> {
        debug!(path, "PUT");
        let response = self
            .http
            .put(self.url(path))
            .json(body)
            .send()
            .await
            .with_context(|| format!("PUT {path} failed"))?;
        Self::check(response).await
    }
}

#[async_trait]
impl TrackerApi for HttpTrackerClient {
    async fn list_years(&self) -> Result<Vec<Year>> {
        self.get_json("/years").await
    }

    async fn list_semesters(&self) -> Result<Vec<Semester>> {
        self.get_json("/semesters").await
    }

    async fn list_terms(&self) -> Result<Vec<Term>> {
        self.get_json("/terms").await
    }

    async fn list_subjects(&self) -> Result<Vec<Subject>> {
        self.get_json("/subjects").await
    }

    async fn list_files(&self) -> Result<Vec<TexFile>> {
        self.get_json("/files").await
    }

    async fn fetch_stats(&self) -> Result<DashboardStats> {
        self.get_json("/stats").await
    }

    async fn fetch_file(&self, file_id: &FileId) -> Result<TexFile> {
        self.get_json(&format!("/files/{file_id}")).await
    }

    async fn create_year(&self, request: &CreateYearRequest) -> Result<()> {
        self.post_json("/years", request).await?;
        Ok(())
    }

    async fn create_semester(&self, request: &CreateSemesterRequest) -> Result<()> {
        self.post_json("/semesters", request).await?;
        Ok(())
    }

    async fn create_term(&self, request: &CreateTermRequest) -> Result<()> {
        self.post_json("/terms", request).await?;
        Ok(())
    }

    async fn create_subject(&self, request: &CreateSubjectRequest) -> Result<()> {
        self.post_json("/subjects", request).await?;
        Ok(())
    }

    async fn create_file(&self, request: &CreateFileRequest) -> Result<()> {
        self.post_json("/files", request).await?;
        Ok(())
    }

    async fn upload_file(&self, upload: FileUpload) -> Result<()> {
        let FileUpload {
            file_name,
            bytes,
            subject_id,
            semester_id,
            tags,
            notes,
        } = upload;
        debug!(file_name = %file_name, size = bytes.len(), "POST /files/upload");

        let part = multipart::Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(TEX_MIME)
            .context("invalid upload mime type")?;
        let form = multipart::Form::new()
            .part("file", part)
            .text("subject_id", subject_id.0)
            .text("semester_id", semester_id.0.clone())
            .text("term_id", semester_id.0)
            .text("tags", tags)
            .text("notes", notes);

        let response = self
            .http
            .post(self.url("/files/upload"))
            .multipart(form)
            .send()
            .await
            .context("POST /files/upload failed")?;
        Self::check(response).await?;
        Ok(())
    }

    async fn multi_upload(&self, request: &MultiUploadRequest) -> Result<()> {
        self.post_json("/files/multi-upload", request).await?;
        Ok(())
    }

    async fn search(&self, request: &SearchRequest) -> Result<Vec<TexFile>> {
        self.post_json("/search", request)
            .await?
            .json()
            .await
            .context("invalid payload from POST /search")
    }

    async fn update_file(&self, file_id: &FileId, request: &UpdateFileRequest) -> Result<TexFile> {
        let path = format!("/files/{file_id}");
        self.put_json(&path, request)
            .await?
            .json()
            .await
            .with_context(|| format!("invalid payload from PUT {path}"))
    }

    async fn delete_file(&self, file_id: &FileId) -> Result<()> {
        let path = format!("/files/{file_id}");
        debug!(path = %path, "DELETE");
        let response = self
            .http
            .delete(self.url(&path))
            .send()
            .await
            .with_context(|| format!("DELETE {path} failed"))?;
        Self::check(response).await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/support.rs"]
pub(crate) mod test_support;

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;

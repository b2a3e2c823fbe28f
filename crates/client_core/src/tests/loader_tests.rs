use std::{collections::HashSet, sync::Mutex};

use anyhow::anyhow;
use async_trait::async_trait;
use shared::{
    domain::{Semester, SemesterId, Subject, SubjectId, Term, Year, YearId},
    protocol::{
        CreateFileRequest, CreateSemesterRequest, CreateSubjectRequest, CreateTermRequest,
        CreateYearRequest, DashboardStats, MultiUploadRequest, SearchRequest, UpdateFileRequest,
    },
};

use super::*;
use crate::{
    filter::FileFilter,
    search::plan_search,
    forms::EditFileForm,
    test_support::{file, semester, subject, term, version, year},
    upload::{SelectedFile, UploadTab},
};

#[derive(Default)]
struct RecordingApi {
    years: Vec<Year>,
    semesters: Vec<Semester>,
    terms: Vec<Term>,
    subjects: Vec<Subject>,
    files: Vec<TexFile>,
    stats: DashboardStats,
    search_results: Vec<TexFile>,
    failing: HashSet<&'static str>,
    calls: Mutex<Vec<String>>,
    posted_years: Mutex<Vec<CreateYearRequest>>,
    multi_uploads: Mutex<Vec<MultiUploadRequest>>,
    updates: Mutex<Vec<(FileId, UpdateFileRequest)>>,
}

impl RecordingApi {
    fn seeded() -> Self {
        let mut stats = DashboardStats {
            total_files: 2,
            ..DashboardStats::default()
        };
        stats.compilation_stats.insert("success".into(), 2);
        Self {
            years: vec![year("y1", 1), year("y2", 2)],
            semesters: vec![semester("sem-a", "y1", "A")],
            terms: vec![term("t1", "Legacy Fall")],
            subjects: vec![subject("calc", "Calculus", "sem-a")],
            files: vec![
                file("f1", "limits.tex", "sem-a", "calc"),
                file("f2", "series.tex", "sem-a", "calc"),
            ],
            stats,
            search_results: vec![file("f2", "series.tex", "sem-a", "calc")],
            ..Self::default()
        }
    }

    fn failing(mut self, call: &'static str) -> Self {
        self.failing.insert(call);
        self
    }

    fn record(&self, call: &'static str) -> Result<()> {
        self.calls.lock().expect("calls lock").push(call.to_string());
        if self.failing.contains(call) {
            return Err(anyhow!("{call} unavailable"));
        }
        Ok(())
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock").clone()
    }
}

#[async_trait]
impl TrackerApi for RecordingApi {
    async fn list_years(&self) -> Result<Vec<Year>> {
        self.record("GET /years")?;
        Ok(self.years.clone())
    }

    async fn list_semesters(&self) -> Result<Vec<Semester>> {
        self.record("GET /semesters")?;
        Ok(self.semesters.clone())
    }

    async fn list_terms(&self) -> Result<Vec<Term>> {
        self.record("GET /terms")?;
        Ok(self.terms.clone())
    }

    async fn list_subjects(&self) -> Result<Vec<Subject>> {
        self.record("GET /subjects")?;
        Ok(self.subjects.clone())
    }

    async fn list_files(&self) -> Result<Vec<TexFile>> {
        self.record("GET /files")?;
        Ok(self.files.clone())
    }

    async fn fetch_stats(&self) -> Result<DashboardStats> {
        self.record("GET /stats")?;
        Ok(self.stats.clone())
    }

    async fn fetch_file(&self, file_id: &FileId) -> Result<TexFile> {
        self.record("GET /files/{id}")?;
        self.files
            .iter()
            .find(|file| &file.id == file_id)
            .cloned()
            .ok_or_else(|| anyhow!("File not found"))
    }

    async fn create_year(&self, request: &CreateYearRequest) -> Result<()> {
        self.record("POST /years")?;
        self.posted_years
            .lock()
            .expect("years lock")
            .push(request.clone());
        Ok(())
    }

    async fn create_semester(&self, _request: &CreateSemesterRequest) -> Result<()> {
        self.record("POST /semesters")
    }

    async fn create_term(&self, _request: &CreateTermRequest) -> Result<()> {
        self.record("POST /terms")
    }

    async fn create_subject(&self, _request: &CreateSubjectRequest) -> Result<()> {
        self.record("POST /subjects")
    }

    async fn create_file(&self, _request: &CreateFileRequest) -> Result<()> {
        self.record("POST /files")
    }

    async fn upload_file(&self, _upload: FileUpload) -> Result<()> {
        self.record("POST /files/upload")
    }

    async fn multi_upload(&self, request: &MultiUploadRequest) -> Result<()> {
        self.record("POST /files/multi-upload")?;
        self.multi_uploads
            .lock()
            .expect("uploads lock")
            .push(request.clone());
        Ok(())
    }

    async fn search(&self, _request: &SearchRequest) -> Result<Vec<TexFile>> {
        self.record("POST /search")?;
        Ok(self.search_results.clone())
    }

    async fn update_file(&self, file_id: &FileId, request: &UpdateFileRequest) -> Result<TexFile> {
        self.record("PUT /files/{id}")?;
        self.updates
            .lock()
            .expect("updates lock")
            .push((file_id.clone(), request.clone()));
        let mut updated = self
            .files
            .iter()
            .find(|file| &file.id == file_id)
            .cloned()
            .ok_or_else(|| anyhow!("File not found"))?;
        if let Some(content) = &request.content {
            updated.versions.push(version("v-new", content));
            updated.content = content.clone();
        }
        Ok(updated)
    }

    async fn delete_file(&self, _file_id: &FileId) -> Result<()> {
        self.record("DELETE /files/{id}")
    }
}

const RELOAD_CALLS: [&str; 5] = [
    "GET /years",
    "GET /semesters",
    "GET /subjects",
    "GET /files",
    "GET /stats",
];

fn assert_is_reload(calls: &[String]) {
    let mut reads: Vec<&str> = calls.iter().map(String::as_str).collect();
    reads.sort_unstable();
    let mut expected = RELOAD_CALLS.to_vec();
    expected.push("GET /terms");
    expected.sort_unstable();
    assert_eq!(reads, expected);
}

#[tokio::test]
async fn successful_load_mirrors_fetched_payloads_exactly() {
    let api = Arc::new(RecordingApi::seeded());
    let mut session = TrackerSession::new(api.clone());

    session.reload().await.expect("reload");

    let state = session.state();
    assert_eq!(state.years, api.years);
    assert_eq!(state.semesters, api.semesters);
    assert_eq!(state.subjects, api.subjects);
    assert_eq!(state.files, api.files);
    assert_eq!(state.stats, api.stats);
    assert_eq!(state.terms, api.terms);
    assert!(!state.loading);
    assert_is_reload(&api.calls());
}

#[tokio::test]
async fn load_snapshot_is_all_or_nothing() {
    let api = RecordingApi::seeded().failing("GET /subjects");
    let err = load_snapshot(&api).await.expect_err("must fail");
    assert!(err.to_string().contains("GET /subjects"));
}

#[tokio::test]
async fn failed_reload_keeps_previous_collections() {
    let good = Arc::new(RecordingApi::seeded());
    let mut session = TrackerSession::new(good);
    session.reload().await.expect("first load");
    let before = session.state().clone();

    session.api = Arc::new(RecordingApi::default().failing("GET /stats"));
    session.reload().await.expect_err("second load fails");

    assert_eq!(session.state(), &before);
    assert!(!session.state().loading);
}

#[tokio::test]
async fn missing_terms_endpoint_degrades_to_empty_list() {
    let api = Arc::new(RecordingApi::seeded().failing("GET /terms"));
    let mut session = TrackerSession::new(api.clone());
    session.reload().await.expect("reload still succeeds");
    assert!(session.state().terms.is_empty());
    assert_eq!(session.state().files.len(), 2);
}

#[tokio::test]
async fn create_year_posts_once_then_reloads() {
    let api = Arc::new(RecordingApi::seeded());
    let mut session = TrackerSession::new(api.clone());
    let form = YearForm {
        year: 2,
        description: "Second year modules".into(),
    };

    session.create_year(&form).await.expect("create year");

    let posted = api.posted_years.lock().expect("years lock").clone();
    assert_eq!(
        posted,
        vec![CreateYearRequest {
            year: 2,
            description: "Second year modules".into()
        }]
    );

    let calls = api.calls();
    assert_eq!(calls[0], "POST /years");
    assert_eq!(calls.iter().filter(|c| c.starts_with("POST")).count(), 1);
    assert_is_reload(&calls[1..]);
    assert_eq!(session.state().years, api.years);
}

#[tokio::test]
async fn failed_create_skips_reload() {
    let api = Arc::new(RecordingApi::seeded().failing("POST /subjects"));
    let mut session = TrackerSession::new(api.clone());
    let form = SubjectForm {
        name: "Topology".into(),
        semester_id: Some(SemesterId::from("sem-a")),
        ..SubjectForm::default()
    };

    let err = session.create_subject(&form).await.expect_err("must fail");
    assert!(format!("{err:#}").contains("error creating subject"));
    assert_eq!(api.calls(), vec!["POST /subjects".to_string()]);
}

#[tokio::test]
async fn invalid_form_never_reaches_backend() {
    let api = Arc::new(RecordingApi::seeded());
    let mut session = TrackerSession::new(api.clone());
    session
        .create_term(&TermForm::default())
        .await
        .expect_err("name is required");
    session
        .create_semester(&SemesterForm::default())
        .await
        .expect_err("year is required");
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn search_replaces_files_and_blank_query_reloads() {
    let api = Arc::new(RecordingApi::seeded());
    let mut session = TrackerSession::new(api.clone());
    session.reload().await.expect("initial load");

    let filter = FileFilter::default();
    session
        .run_search(&plan_search("series", &filter))
        .await
        .expect("search");
    assert_eq!(session.state().files, api.search_results);

    let before = api.calls().len();
    session
        .run_search(&plan_search("", &filter))
        .await
        .expect("reload");
    let after = api.calls();
    assert!(!after[before..].iter().any(|c| c == "POST /search"));
    assert_is_reload(&after[before..]);
    assert_eq!(session.state().files, api.files);
}

#[tokio::test]
async fn search_listing_fetches_lookups_instead_of_reloading() {
    let api = Arc::new(RecordingApi::seeded());
    let mut session = TrackerSession::new(api.clone());
    let filter = FileFilter::default();

    session
        .load_listing(&plan_search("series", &filter))
        .await
        .expect("listing");
    assert_eq!(
        api.calls(),
        vec!["GET /semesters", "GET /subjects", "POST /search"]
    );
    assert_eq!(session.state().files, api.search_results);
    assert_eq!(session.state().subjects, api.subjects);
    assert!(session.state().years.is_empty());

    let before = api.calls().len();
    session
        .load_listing(&plan_search("  ", &filter))
        .await
        .expect("blank listing");
    let after = api.calls();
    assert_is_reload(&after[before..]);
    assert!(!after[before..].iter().any(|c| c == "POST /search"));
}

#[tokio::test]
async fn multi_file_submission_posts_batch_then_reloads() {
    let api = Arc::new(RecordingApi::seeded());
    let mut session = TrackerSession::new(api.clone());

    let mut form = AddFileForm::default();
    form.set_year(Some(YearId::from("y1")));
    form.set_semester(Some(SemesterId::from("sem-a")));
    form.set_subject(Some(SubjectId::from("calc")));
    form.set_selected_files(
        ["a.tex", "b.tex", "c.tex"]
            .iter()
            .map(|name| SelectedFile {
                name: name.to_string(),
                content: format!("% {name}"),
                size: 7,
            })
            .collect(),
    );

    assert!(session.submit_file(&form).await.expect("submit"));
    let uploads = api.multi_uploads.lock().expect("uploads lock").clone();
    assert_eq!(uploads.len(), 1);
    assert_eq!(uploads[0].files.len(), 3);
    assert_eq!(api.calls()[0], "POST /files/multi-upload");
}

#[tokio::test]
async fn git_tab_submits_nothing() {
    let api = Arc::new(RecordingApi::seeded());
    let mut session = TrackerSession::new(api.clone());
    let mut form = AddFileForm::default();
    form.set_tab(UploadTab::Git);

    assert!(!session.submit_file(&form).await.expect("no-op"));
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn delete_reloads_and_fetch_reports_missing_file() {
    let api = Arc::new(RecordingApi::seeded());
    let mut session = TrackerSession::new(api.clone());

    session
        .delete_file(&FileId::from("f1"))
        .await
        .expect("delete");
    assert_eq!(api.calls()[0], "DELETE /files/{id}");

    let found = session.fetch_file(&FileId::from("f2")).await.expect("fetch");
    assert_eq!(found.name, "series.tex");
    let err = session
        .fetch_file(&FileId::from("nope"))
        .await
        .expect_err("missing");
    assert!(format!("{err:#}").contains("File not found"));
}

#[tokio::test]
async fn edit_puts_changed_fields_once_then_reloads() {
    let api = Arc::new(RecordingApi::seeded());
    let mut session = TrackerSession::new(api.clone());
    let original = api.files[0].clone();

    let mut form = EditFileForm::from_file(&original);
    form.content = "\\section{Limits} v2".into();
    let request = form.to_request(&original).expect("valid edit");
    let updated = session
        .update_file(&original.id, &request)
        .await
        .expect("update");

    assert_eq!(updated.content, "\\section{Limits} v2");
    assert_eq!(updated.versions.len(), original.versions.len() + 1);
    let calls = api.calls();
    assert_eq!(calls[0], "PUT /files/{id}");
    assert_is_reload(&calls[1..]);

    let updates = api.updates.lock().expect("updates lock");
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].0, original.id);
    assert_eq!(updates[0].1.name, None);
}

#[tokio::test]
async fn failed_edit_skips_reload() {
    let api = Arc::new(RecordingApi::seeded().failing("PUT /files/{id}"));
    let mut session = TrackerSession::new(api.clone());
    let request = UpdateFileRequest {
        notes: Some("revise".into()),
        ..UpdateFileRequest::default()
    };

    let err = session
        .update_file(&FileId::from("f1"), &request)
        .await
        .expect_err("must fail");
    assert!(format!("{err:#}").contains("error updating file f1"));
    assert_eq!(api.calls(), vec!["PUT /files/{id}".to_string()]);
}

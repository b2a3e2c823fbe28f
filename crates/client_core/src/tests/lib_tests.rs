use std::{collections::HashMap, sync::Arc};

use super::*;
use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use shared::{
    domain::{CompilationStatus, SemesterId, SemesterName, SubjectId, YearId},
    error::ErrorCode,
};
use tokio::{net::TcpListener, sync::Mutex};
use uuid::Uuid;

#[derive(Clone, Default)]
struct FakeBackend {
    posts: Arc<Mutex<Vec<(String, Value)>>>,
    uploads: Arc<Mutex<Vec<UploadedForm>>>,
    deleted: Arc<Mutex<Vec<String>>>,
}

#[derive(Debug, Default)]
struct UploadedForm {
    file_name: Option<String>,
    content_type: Option<String>,
    file_body: String,
    fields: HashMap<String, String>,
}

fn year_id() -> String {
    Uuid::new_v4().to_string()
}

async fn list_years() -> Json<Value> {
    Json(json!([
        {"id": year_id(), "year": 1, "description": "Foundations", "created_at": "2024-09-01T10:00:00"},
        {"id": year_id(), "year": 2, "description": null}
    ]))
}

async fn list_semesters() -> Json<Value> {
    Json(json!([
        {"id": "sem-a", "year_id": "y1", "name": "A", "start_date": "2024-09-01T00:00:00", "end_date": null}
    ]))
}

async fn list_subjects() -> Json<Value> {
    Json(json!([
        {"id": "calc", "name": "Calculus", "semester_id": "sem-a", "color": "#10B981"},
        {"id": "legacy", "name": "History", "term_id": "t1"}
    ]))
}

fn file_json(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "subject_id": "calc",
        "semester_id": "sem-a",
        "content": "\\documentclass{article}",
        "word_count": 1,
        "file_size": 23,
        "compilation_status": "success",
        "source_type": "paste",
        "tags": ["limits", "exam"],
        "created_at": "2024-10-01T08:30:00.123456",
        "updated_at": "2024-10-02T08:30:00Z",
        "versions": [
            {"id": "v1", "content": "old", "word_count": 1, "file_size": 3, "compilation_status": "pending"}
        ]
    })
}

async fn list_files() -> Json<Value> {
    Json(json!([file_json("f1", "limits.tex")]))
}

async fn get_file(Path(id): Path<String>) -> impl IntoResponse {
    if id == "f1" {
        (StatusCode::OK, Json(file_json("f1", "limits.tex")))
    } else {
        (StatusCode::NOT_FOUND, Json(json!({"detail": "File not found"})))
    }
}

async fn update_file(
    State(state): State<FakeBackend>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    if id != "f1" {
        return (StatusCode::NOT_FOUND, Json(json!({"detail": "File not found"})));
    }
    record_post(&state, "PUT /files/f1", body.clone()).await;
    let mut file = file_json("f1", "limits.tex");
    if let Some(content) = body.get("content").and_then(Value::as_str) {
        file["content"] = json!(content);
        if let Some(versions) = file["versions"].as_array_mut() {
            versions.push(json!({"id": "v2", "content": content, "compilation_status": "success"}));
        }
    }
    if let Some(tags) = body.get("tags") {
        file["tags"] = tags.clone();
    }
    (StatusCode::OK, Json(file))
}

async fn delete_file(State(state): State<FakeBackend>, Path(id): Path<String>) -> Json<Value> {
    state.deleted.lock().await.push(id);
    Json(json!({"message": "File deleted successfully"}))
}

async fn stats() -> Json<Value> {
    Json(json!({
        "total_terms": 1,
        "total_subjects": 2,
        "total_files": 1,
        "compilation_stats": {"success": 1},
        "recent_files": [file_json("f1", "limits.tex")]
    }))
}

async fn record_post(state: &FakeBackend, path: &str, body: Value) {
    state.posts.lock().await.push((path.to_string(), body));
}

async fn create_year(State(state): State<FakeBackend>, Json(body): Json<Value>) -> Json<Value> {
    record_post(&state, "/years", body.clone()).await;
    Json(json!({"id": year_id(), "year": body["year"], "description": body["description"]}))
}

async fn create_semester(State(state): State<FakeBackend>, Json(body): Json<Value>) -> Json<Value> {
    record_post(&state, "/semesters", body.clone()).await;
    Json(body)
}

async fn create_term(State(state): State<FakeBackend>, Json(body): Json<Value>) -> Json<Value> {
    record_post(&state, "/terms", body.clone()).await;
    Json(body)
}

async fn create_subject(State(state): State<FakeBackend>, Json(body): Json<Value>) -> impl IntoResponse {
    if body["name"].as_str().unwrap_or_default().is_empty() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({"detail": [
                {"loc": ["body", "name"], "msg": "field required", "type": "value_error.missing"}
            ]})),
        );
    }
    record_post(&state, "/subjects", body.clone()).await;
    (StatusCode::OK, Json(body))
}

async fn multi_upload(State(state): State<FakeBackend>, Json(body): Json<Value>) -> Json<Value> {
    record_post(&state, "/files/multi-upload", body).await;
    Json(json!({"message": "Successfully uploaded 3 files", "files": []}))
}

async fn search(State(state): State<FakeBackend>, Json(body): Json<Value>) -> Json<Value> {
    record_post(&state, "/search", body).await;
    Json(json!([file_json("f9", "series.tex")]))
}

async fn upload(State(state): State<FakeBackend>, mut multipart: Multipart) -> Json<Value> {
    let mut form = UploadedForm::default();
    while let Some(field) = multipart.next_field().await.expect("multipart field") {
        let name = field.name().unwrap_or_default().to_string();
        if name == "file" {
            form.file_name = field.file_name().map(str::to_string);
            form.content_type = field.content_type().map(str::to_string);
            form.file_body = field.text().await.expect("file body");
        } else {
            let value = field.text().await.expect("text field");
            form.fields.insert(name, value);
        }
    }
    state.uploads.lock().await.push(form);
    Json(file_json("f2", "upload.tex"))
}

async fn broken_stats() -> impl IntoResponse {
    (StatusCode::INTERNAL_SERVER_ERROR, "")
}

async fn spawn_backend() -> Result<(HttpTrackerClient, FakeBackend)> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let state = FakeBackend::default();
    let api = Router::new()
        .route("/years", get(list_years).post(create_year))
        .route("/semesters", get(list_semesters).post(create_semester))
        .route("/terms", post(create_term))
        .route("/subjects", get(list_subjects).post(create_subject))
        .route("/files", get(list_files))
        .route("/files/:id", get(get_file).put(update_file).delete(delete_file))
        .route("/files/upload", post(upload))
        .route("/files/multi-upload", post(multi_upload))
        .route("/search", post(search))
        .route("/stats", get(stats))
        .route("/broken/stats", get(broken_stats))
        .with_state(state.clone());
    let app = Router::new().nest("/api", api);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok((HttpTrackerClient::new(format!("http://{addr}/api")), state))
}

#[tokio::test]
async fn snapshot_decodes_backend_payloads() {
    let (client, _state) = spawn_backend().await.expect("spawn backend");

    let snapshot = load_snapshot(&client).await.expect("snapshot");
    assert_eq!(snapshot.years.len(), 2);
    assert_eq!(snapshot.years[0].year, 1);
    assert_eq!(snapshot.years[1].description, None);

    assert_eq!(snapshot.semesters[0].name, "A");
    assert_eq!(
        snapshot.semesters[0].start_date,
        chrono::NaiveDate::from_ymd_opt(2024, 9, 1)
    );

    assert_eq!(snapshot.subjects[0].color_or_default(), "#10B981");
    assert_eq!(snapshot.subjects[1].color_or_default(), "#3B82F6");
    assert_eq!(
        snapshot.subjects[1].grouping_id(),
        Some(SemesterId::from("t1"))
    );

    let file = &snapshot.files[0];
    assert_eq!(file.compilation_status, CompilationStatus::Success);
    assert_eq!(file.versions[0].compilation_status, CompilationStatus::Unknown);
    assert!(file.created_at.is_some());
    assert!(file.updated_at.is_some());

    assert_eq!(snapshot.stats.total_terms, 1);
    assert_eq!(snapshot.stats.total_years, 0);
    assert_eq!(snapshot.stats.compilation_count(CompilationStatus::Success), 1);
    assert_eq!(snapshot.stats.compilation_count(CompilationStatus::Error), 0);
}

#[tokio::test]
async fn missing_terms_route_surfaces_not_found() {
    let (client, _state) = spawn_backend().await.expect("spawn backend");
    let err = client.list_terms().await.expect_err("no GET /terms");
    let backend = err.downcast_ref::<BackendError>().expect("backend error");
    assert_eq!(backend.code, ErrorCode::NotFound);
}

#[tokio::test]
async fn create_requests_post_exact_payloads() {
    let (client, state) = spawn_backend().await.expect("spawn backend");

    client
        .create_year(&CreateYearRequest {
            year: 2,
            description: "Second".into(),
        })
        .await
        .expect("create year");
    client
        .create_semester(&CreateSemesterRequest {
            year_id: YearId::from("y1"),
            name: SemesterName::B,
            description: String::new(),
            start_date: chrono::NaiveDate::from_ymd_opt(2025, 2, 1),
            end_date: None,
        })
        .await
        .expect("create semester");
    client
        .create_term(&CreateTermRequest {
            name: "Fall".into(),
            description: String::new(),
            start_date: "2024-09-01T00:00:00Z".parse().ok(),
            end_date: None,
        })
        .await
        .expect("create term");

    let posts = state.posts.lock().await.clone();
    assert_eq!(posts.len(), 3);
    assert_eq!(posts[0], ("/years".to_string(), json!({"year": 2, "description": "Second"})));

    let (path, semester) = &posts[1];
    assert_eq!(path, "/semesters");
    assert_eq!(semester["year_id"], "y1");
    assert_eq!(semester["name"], "B");
    assert_eq!(semester["start_date"], "2025-02-01");
    assert!(semester["end_date"].is_null());

    let (path, term) = &posts[2];
    assert_eq!(path, "/terms");
    assert!(term["start_date"]
        .as_str()
        .expect("start date string")
        .starts_with("2024-09-01T00:00:00"));
}

#[tokio::test]
async fn validation_errors_carry_backend_detail() {
    let (client, state) = spawn_backend().await.expect("spawn backend");

    let err = client
        .create_subject(&CreateSubjectRequest {
            name: String::new(),
            description: String::new(),
            semester_id: SemesterId::from("sem-a"),
            color: "#3B82F6".into(),
        })
        .await
        .expect_err("empty name rejected");

    let backend = err.downcast_ref::<BackendError>().expect("backend error");
    assert_eq!(backend.status, 422);
    assert_eq!(backend.code, ErrorCode::Validation);
    assert_eq!(backend.message, "field required");
    assert!(state.posts.lock().await.is_empty());
}

#[tokio::test]
async fn fetch_and_delete_single_file() {
    let (client, state) = spawn_backend().await.expect("spawn backend");

    let file = client.fetch_file(&FileId::from("f1")).await.expect("fetch");
    assert_eq!(file.tags, vec!["limits", "exam"]);

    let err = client
        .fetch_file(&FileId::from("missing"))
        .await
        .expect_err("not found");
    let backend = err.downcast_ref::<BackendError>().expect("backend error");
    assert_eq!(backend.message, "File not found");

    client
        .delete_file(&FileId::from("f1"))
        .await
        .expect("delete");
    assert_eq!(*state.deleted.lock().await, vec!["f1".to_string()]);
}

#[tokio::test]
async fn update_puts_only_set_fields_and_returns_new_version() {
    let (client, state) = spawn_backend().await.expect("spawn backend");
    let request = UpdateFileRequest {
        content: Some("\\section{Limits}".into()),
        tags: Some(vec!["exam".into()]),
        ..UpdateFileRequest::default()
    };

    let updated = client
        .update_file(&FileId::from("f1"), &request)
        .await
        .expect("update");
    assert_eq!(updated.content, "\\section{Limits}");
    assert_eq!(updated.tags, vec!["exam"]);
    assert_eq!(updated.versions.len(), 2);
    assert_eq!(updated.versions[1].id.as_str(), "v2");

    let posts = state.posts.lock().await;
    assert_eq!(
        *posts,
        vec![(
            "PUT /files/f1".to_string(),
            json!({"content": "\\section{Limits}", "tags": ["exam"]})
        )]
    );
    drop(posts);

    let err = client
        .update_file(&FileId::from("missing"), &request)
        .await
        .expect_err("not found");
    let backend = err.downcast_ref::<BackendError>().expect("backend error");
    assert_eq!(backend.code, ErrorCode::NotFound);
}

#[tokio::test]
async fn single_upload_sends_multipart_fields() {
    let (client, state) = spawn_backend().await.expect("spawn backend");

    client
        .upload_file(FileUpload {
            file_name: "notes.tex".into(),
            bytes: b"\\section{Intro}".to_vec(),
            subject_id: SubjectId::from("calc"),
            semester_id: SemesterId::from("sem-a"),
            tags: "exam, week1".into(),
            notes: "draft".into(),
        })
        .await
        .expect("upload");

    let uploads = state.uploads.lock().await;
    assert_eq!(uploads.len(), 1);
    let form = &uploads[0];
    assert_eq!(form.file_name.as_deref(), Some("notes.tex"));
    assert_eq!(form.content_type.as_deref(), Some("application/x-tex"));
    assert_eq!(form.file_body, "\\section{Intro}");
    assert_eq!(form.fields["subject_id"], "calc");
    assert_eq!(form.fields["semester_id"], "sem-a");
    assert_eq!(form.fields["term_id"], "sem-a");
    assert_eq!(form.fields["tags"], "exam, week1");
    assert_eq!(form.fields["notes"], "draft");
}

#[tokio::test]
async fn multi_upload_posts_one_batch() {
    let (client, state) = spawn_backend().await.expect("spawn backend");

    let request = MultiUploadRequest {
        files: ["a.tex", "b.tex", "c.tex"]
            .iter()
            .map(|name| shared::protocol::MultiUploadEntry {
                name: name.to_string(),
                content: format!("% {name}"),
            })
            .collect(),
        subject_id: SubjectId::from("calc"),
        semester_id: SemesterId::from("sem-a"),
        tags: vec!["batch".into()],
        notes: String::new(),
    };
    client.multi_upload(&request).await.expect("multi upload");

    let posts = state.posts.lock().await;
    assert_eq!(posts.len(), 1);
    let (path, body) = &posts[0];
    assert_eq!(path, "/files/multi-upload");
    assert_eq!(body["files"].as_array().map(Vec::len), Some(3));
    assert_eq!(body["files"][1]["name"], "b.tex");
    assert_eq!(body["tags"], json!(["batch"]));
}

#[tokio::test]
async fn search_sends_scope_and_returns_matches() {
    let (client, state) = spawn_backend().await.expect("spawn backend");

    let results = client
        .search(&SearchRequest {
            query: "series".into(),
            term_id: Some(SemesterId::from("sem-a")),
            subject_id: None,
            tags: Vec::new(),
        })
        .await
        .expect("search");
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].name, "series.tex");

    let posts = state.posts.lock().await;
    let (path, body) = &posts[0];
    assert_eq!(path, "/search");
    assert_eq!(body["query"], "series");
    assert_eq!(body["term_id"], "sem-a");
    assert!(body["subject_id"].is_null());
    assert!(body.get("tags").is_none());
}

#[tokio::test]
async fn empty_error_body_is_reported() {
    let (client, _state) = spawn_backend().await.expect("spawn backend");
    let broken = HttpTrackerClient::new(format!("{}/broken", client.api_base()));

    let err = broken.fetch_stats().await.expect_err("500");
    let backend = err.downcast_ref::<BackendError>().expect("backend error");
    assert_eq!(backend.code, ErrorCode::Internal);
    assert_eq!(backend.message, "empty response body");
}

#[test]
fn settings_build_client_against_api_prefix() {
    let settings = Settings {
        backend_url: "http://tracker.local:8001/".into(),
        ..Settings::default()
    };
    let client = HttpTrackerClient::from_settings(&settings).expect("client");
    assert_eq!(client.api_base(), "http://tracker.local:8001/api");
}

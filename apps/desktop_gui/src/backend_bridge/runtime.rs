//! Backend worker thread: owns the tokio runtime and the tracker session,
//! turns queued commands into UI events.

use std::{path::Path, sync::Arc, thread};

use client_core::{
    preview::export_to_path,
    upload::{read_selected_files, read_upload_source, AddFileForm, UploadTab},
    HttpTrackerClient, Settings, TrackerSession,
};
use crossbeam_channel::{Receiver, Sender};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{
    classify_load_failure, EntityKind, UiError, UiErrorContext, UiEvent,
};

pub fn launch(settings: Settings, cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    thread::spawn(move || {
        let _ = ui_tx.try_send(UiEvent::Info("Backend worker starting...".to_string()));
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let client = match HttpTrackerClient::from_settings(&settings) {
                Ok(client) => client,
                Err(err) => {
                    let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                        UiErrorContext::BackendStartup,
                        classify_load_failure(&format!("backend worker startup failure: {err:#}")),
                    )));
                    tracing::error!("invalid backend settings: {err:#}");
                    return;
                }
            };
            tracing::info!(api_base = client.api_base(), "backend worker ready");
            let mut session = TrackerSession::new(Arc::new(client));

            while let Ok(cmd) = cmd_rx.recv() {
                for event in execute(&mut session, cmd).await {
                    if ui_tx.try_send(event).is_err() {
                        tracing::warn!("ui event queue unavailable; dropping event");
                    }
                }
            }
            tracing::info!("command queue closed; backend worker stopping");
        });
    });
}

fn loaded(session: &TrackerSession) -> UiEvent {
    UiEvent::DataLoaded(Box::new(session.state().clone()))
}

fn failed(context: UiErrorContext, err: anyhow::Error) -> UiEvent {
    let message = format!("{err:#}");
    tracing::error!(?context, "{message}");
    let message = match context {
        UiErrorContext::Load => classify_load_failure(&message),
        _ => message,
    };
    UiEvent::Error(UiError::from_message(context, message))
}

/// Runs one command against the session. Mutations that went through are
/// followed by the freshly reloaded state.
pub async fn execute(session: &mut TrackerSession, cmd: BackendCommand) -> Vec<UiEvent> {
    match cmd {
        BackendCommand::Reload => match session.reload().await {
            Ok(()) => vec![loaded(session)],
            Err(err) => vec![failed(UiErrorContext::Load, err)],
        },
        BackendCommand::Search { generation, action } => {
            match session.run_search(&action).await {
                Ok(()) => vec![UiEvent::SearchFinished {
                    generation,
                    state: Box::new(session.state().clone()),
                }],
                Err(err) => vec![failed(UiErrorContext::Search, err)],
            }
        }
        BackendCommand::CreateYear(form) => {
            created(session.create_year(&form).await, session, EntityKind::Year)
        }
        BackendCommand::CreateSemester(form) => created(
            session.create_semester(&form).await,
            session,
            EntityKind::Semester,
        ),
        BackendCommand::CreateTerm(form) => {
            created(session.create_term(&form).await, session, EntityKind::Term)
        }
        BackendCommand::CreateSubject(form) => created(
            session.create_subject(&form).await,
            session,
            EntityKind::Subject,
        ),
        BackendCommand::SubmitFile(form) => {
            let count = match form.tab {
                UploadTab::Manual => form.selected_files().len(),
                _ => 1,
            };
            match session.submit_file(&form).await {
                Ok(true) => vec![UiEvent::FileSubmitted { count }, loaded(session)],
                Ok(false) => vec![UiEvent::Info(
                    "Git integration is not available yet".to_string(),
                )],
                Err(err) => vec![failed(UiErrorContext::Upload, err)],
            }
        }
        BackendCommand::UploadFile { path, form } => {
            match upload_picked(session, &path, &form).await {
                Ok(()) => vec![UiEvent::FileSubmitted { count: 1 }, loaded(session)],
                Err(err) => vec![failed(UiErrorContext::Upload, err)],
            }
        }
        BackendCommand::ReadSelectedFiles { paths } => match read_selected_files(&paths).await {
            Ok(files) => vec![UiEvent::FilesRead(files)],
            Err(err) => vec![failed(UiErrorContext::Upload, err)],
        },
        BackendCommand::RefreshPreview { file_id } => match session.fetch_file(&file_id).await {
            Ok(file) => vec![UiEvent::PreviewLoaded(Box::new(file))],
            Err(err) => vec![failed(UiErrorContext::Preview, err)],
        },
        BackendCommand::ExportFile { file, target } => {
            match export_to_path(&file, &target).await {
                Ok(()) => vec![UiEvent::Exported(target)],
                Err(err) => vec![failed(UiErrorContext::Export, err)],
            }
        }
        BackendCommand::UpdateFile { file_id, request } => {
            match session.update_file(&file_id, &request).await {
                Ok(file) => vec![UiEvent::FileUpdated(Box::new(file)), loaded(session)],
                Err(err) => vec![failed(UiErrorContext::Update, err)],
            }
        }
        BackendCommand::DeleteFile { file_id } => match session.delete_file(&file_id).await {
            Ok(()) => vec![UiEvent::FileDeleted(file_id), loaded(session)],
            Err(err) => vec![failed(UiErrorContext::Delete, err)],
        },
    }
}

async fn upload_picked(
    session: &mut TrackerSession,
    path: &Path,
    form: &AddFileForm,
) -> anyhow::Result<()> {
    let (file_name, bytes) = read_upload_source(path).await?;
    let upload = form.upload_for(file_name, bytes)?;
    session.upload_file(upload).await
}

fn created(
    result: anyhow::Result<()>,
    session: &TrackerSession,
    kind: EntityKind,
) -> Vec<UiEvent> {
    match result {
        Ok(()) => vec![UiEvent::Created(kind), loaded(session)],
        Err(err) => vec![failed(UiErrorContext::Create, err)],
    }
}

use std::{path::PathBuf, sync::Arc};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use client_core::{
    config::load_settings,
    filter::FileFilter,
    forms::{EditFileForm, SemesterForm, SubjectForm, TermForm, YearForm},
    preview::{export_to_dir, export_to_path, FilePreview, PreviewTab},
    search::plan_search,
    upload::{read_selected_files, read_upload_source, AddFileForm, UploadTab},
    view::View,
    HttpTrackerClient, TrackerSession,
};
use shared::domain::{FileId, SemesterId, SemesterName, SubjectId, YearId};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod render;

#[derive(Parser, Debug)]
#[command(about = "Organize LaTeX files by year, semester and subject")]
struct Cli {
    /// Overrides the configured backend origin.
    #[arg(long, global = true)]
    backend_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SemesterArg {
    A,
    B,
}

impl From<SemesterArg> for SemesterName {
    fn from(value: SemesterArg) -> Self {
        match value {
            SemesterArg::A => SemesterName::A,
            SemesterArg::B => SemesterName::B,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
enum TabArg {
    #[default]
    Content,
    Info,
    Versions,
}

impl From<TabArg> for PreviewTab {
    fn from(value: TabArg) -> Self {
        match value {
            TabArg::Content => PreviewTab::Content,
            TabArg::Info => PreviewTab::Info,
            TabArg::Versions => PreviewTab::Versions,
        }
    }
}

#[derive(clap::Args, Debug)]
struct Placement {
    #[arg(long)]
    year_id: String,
    #[arg(long)]
    semester_id: String,
    #[arg(long)]
    subject_id: String,
    /// Comma separated.
    #[arg(long, default_value = "")]
    tags: String,
    #[arg(long, default_value = "")]
    notes: String,
}

impl Placement {
    fn into_form(self, tab: UploadTab) -> AddFileForm {
        let mut form = AddFileForm::default();
        form.set_tab(tab);
        form.set_year(Some(YearId(self.year_id)));
        form.set_semester(Some(SemesterId(self.semester_id)));
        form.set_subject(Some(SubjectId(self.subject_id)));
        form.tags = self.tags;
        form.notes = self.notes;
        form
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    Dashboard,
    Files {
        #[arg(long)]
        semester: Option<String>,
        #[arg(long)]
        subject: Option<String>,
        /// Server-side search; blank lists everything.
        #[arg(long, default_value = "")]
        query: String,
    },
    Management,
    CreateYear {
        #[arg(value_parser = clap::value_parser!(u8).range(1..=4))]
        year: u8,
        #[arg(long, default_value = "")]
        description: String,
    },
    CreateSemester {
        #[arg(long)]
        year_id: String,
        #[arg(long, value_enum)]
        name: SemesterArg,
        #[arg(long, default_value = "")]
        description: String,
        /// YYYY-MM-DD
        #[arg(long, default_value = "")]
        start_date: String,
        #[arg(long, default_value = "")]
        end_date: String,
    },
    CreateTerm {
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "")]
        start_date: String,
        #[arg(long, default_value = "")]
        end_date: String,
    },
    CreateSubject {
        name: String,
        #[arg(long)]
        semester_id: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "")]
        color: String,
    },
    /// Creates a file from text, like the paste tab.
    AddFile {
        name: String,
        /// Reads the content from this path instead of --content.
        #[arg(long, conflicts_with = "content")]
        content_file: Option<PathBuf>,
        #[arg(long)]
        content: Option<String>,
        #[command(flatten)]
        placement: Placement,
    },
    Upload {
        path: PathBuf,
        #[command(flatten)]
        placement: Placement,
    },
    MultiUpload {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        #[command(flatten)]
        placement: Placement,
    },
    Show {
        file_id: String,
        #[arg(long, value_enum, default_value_t)]
        tab: TabArg,
        /// Prints the raw record instead.
        #[arg(long)]
        json: bool,
    },
    /// Changes name, content, tags or notes; unset flags keep the stored value.
    Edit {
        file_id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long, conflicts_with = "content_file")]
        content: Option<String>,
        #[arg(long)]
        content_file: Option<PathBuf>,
        /// Comma separated; an empty value clears the tags.
        #[arg(long)]
        tags: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    Export {
        file_id: String,
        /// Directory (file keeps its name) or full target path.
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
    Delete {
        file_id: String,
    },
}

impl Command {
    fn view(&self) -> Option<View> {
        match self {
            Command::Dashboard => Some(View::Dashboard),
            Command::Files { .. } => Some(View::Files),
            Command::Management => Some(View::Management),
            _ => None,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let settings = load_settings().with_backend_url(cli.backend_url.clone());
    let client = HttpTrackerClient::from_settings(&settings)?;
    info!(api_base = client.api_base(), "using backend");
    let mut session = TrackerSession::new(Arc::new(client));

    if let Some(view) = cli.command.view() {
        println!("== {} ==", view.label());
    }

    match cli.command {
        Command::Dashboard => {
            session.reload().await?;
            let mut out = String::new();
            render::dashboard(&mut out, session.state())?;
            print!("{out}");
        }
        Command::Files {
            semester,
            subject,
            query,
        } => {
            let mut filter = FileFilter::default();
            filter.select_semester(semester.map(SemesterId));
            filter.select_subject(subject.map(SubjectId));
            session.load_listing(&plan_search(&query, &filter)).await?;
            let state = session.state();
            let visible = filter.apply(&state.files);
            let mut out = String::new();
            render::file_cards(&mut out, state, &visible)?;
            print!("{out}");
        }
        Command::Management => {
            session.reload().await?;
            let mut out = String::new();
            render::management(&mut out, session.state())?;
            print!("{out}");
        }
        Command::CreateYear { year, description } => {
            session.create_year(&YearForm { year, description }).await?;
            println!("created Year {year}");
        }
        Command::CreateSemester {
            year_id,
            name,
            description,
            start_date,
            end_date,
        } => {
            let form = SemesterForm {
                year_id: Some(YearId(year_id)),
                name: name.into(),
                description,
                start_date,
                end_date,
            };
            session.create_semester(&form).await?;
            println!("created Semester {}", form.name.as_str());
        }
        Command::CreateTerm {
            name,
            description,
            start_date,
            end_date,
        } => {
            let form = TermForm {
                name,
                description,
                start_date,
                end_date,
            };
            session.create_term(&form).await?;
            println!("created term {}", form.name.trim());
        }
        Command::CreateSubject {
            name,
            semester_id,
            description,
            color,
        } => {
            let form = SubjectForm {
                name,
                description,
                semester_id: Some(SemesterId(semester_id)),
                color,
            };
            session.create_subject(&form).await?;
            println!("created subject {}", form.name.trim());
        }
        Command::AddFile {
            name,
            content_file,
            content,
            placement,
        } => {
            let content = match (content_file, content) {
                (Some(path), _) => tokio::fs::read_to_string(&path)
                    .await
                    .with_context(|| format!("failed to read '{}'", path.display()))?,
                (None, Some(content)) => content,
                (None, None) => bail!("either --content or --content-file is required"),
            };
            let mut form = placement.into_form(UploadTab::Paste);
            form.name = name;
            form.content = content;
            session.submit_file(&form).await?;
            println!("created {}", form.name.trim());
        }
        Command::Upload { path, placement } => {
            let form = placement.into_form(UploadTab::Manual);
            let (file_name, bytes) = read_upload_source(&path).await?;
            let upload = form.upload_for(file_name.clone(), bytes)?;
            session.upload_file(upload).await?;
            println!("uploaded {file_name}");
        }
        Command::MultiUpload { paths, placement } => {
            let mut form = placement.into_form(UploadTab::Manual);
            form.set_selected_files(read_selected_files(&paths).await?);
            session.submit_file(&form).await?;
            println!("uploaded {} files", form.selected_files().len());
        }
        Command::Show { file_id, tab, json } => {
            let file = session.fetch_file(&FileId(file_id)).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&file)?);
            } else {
                let mut preview = FilePreview::open(file);
                preview.tab = tab.into();
                let mut out = String::new();
                render::preview(&mut out, &preview)?;
                print!("{out}");
            }
        }
        Command::Edit {
            file_id,
            name,
            content,
            content_file,
            tags,
            notes,
        } => {
            let file_id = FileId(file_id);
            let original = session.fetch_file(&file_id).await?;
            let mut form = EditFileForm::from_file(&original);
            if let Some(path) = content_file {
                form.content = tokio::fs::read_to_string(&path)
                    .await
                    .with_context(|| format!("failed to read '{}'", path.display()))?;
            }
            form.name = name.unwrap_or(form.name);
            form.content = content.unwrap_or(form.content);
            form.tags = tags.unwrap_or(form.tags);
            form.notes = notes.unwrap_or(form.notes);
            let request = form.to_request(&original)?;
            if request.is_empty() {
                println!("no changes for {}", original.name);
            } else {
                let updated = session.update_file(&file_id, &request).await?;
                println!(
                    "updated {} ({} versions)",
                    updated.name,
                    updated.versions.len()
                );
            }
        }
        Command::Export { file_id, out } => {
            let file = session.fetch_file(&FileId(file_id)).await?;
            let target = if out.is_dir() {
                export_to_dir(&file, &out).await?
            } else {
                export_to_path(&file, &out).await?;
                out
            };
            println!("exported to {}", target.display());
        }
        Command::Delete { file_id } => {
            let file_id = FileId(file_id);
            session.delete_file(&file_id).await?;
            println!("deleted {file_id}");
        }
    }

    Ok(())
}

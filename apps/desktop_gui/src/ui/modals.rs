use std::path::PathBuf;

use client_core::{
    filter::{find_semester, find_subject, find_year, semester_label, semesters_for_year,
        subjects_for_semester, year_label},
    forms::{format_hex_color, parse_hex_color, YEAR_CHOICES},
    preview::{
        export_file_name, format_local_datetime, version_excerpt, PreviewTab,
    },
    upload::UploadTab,
};
use eframe::egui;
use shared::domain::{SemesterName, DEFAULT_SUBJECT_COLOR};

use super::app::TrackerApp;
use super::widgets::{human_readable_bytes, required_label, status_badge, tag_chip};
use crate::backend_bridge::commands::BackendCommand;
use crate::controller::reducer::ModalKind;

fn default_pick_dir() -> Option<PathBuf> {
    dirs::document_dir()
        .or_else(dirs::download_dir)
        .or_else(dirs::home_dir)
}

fn tex_dialog() -> rfd::FileDialog {
    let mut dialog = rfd::FileDialog::new().add_filter("LaTeX", &["tex"]);
    if let Some(dir) = default_pick_dir() {
        dialog = dialog.set_directory(dir);
    }
    dialog
}

enum ModalAction {
    None,
    Submit,
    Cancel,
}

fn modal_footer(ui: &mut egui::Ui, submitting: bool, submit_label: &str) -> ModalAction {
    let mut action = ModalAction::None;
    ui.separator();
    ui.horizontal(|ui| {
        if ui
            .add_enabled(!submitting, egui::Button::new(submit_label))
            .clicked()
        {
            action = ModalAction::Submit;
        }
        if ui.button("Cancel").clicked() {
            action = ModalAction::Cancel;
        }
        if submitting {
            ui.spinner();
        }
    });
    action
}

fn date_field(ui: &mut egui::Ui, label: &str, value: &mut String) {
    ui.label(label);
    ui.add(egui::TextEdit::singleline(value).hint_text("YYYY-MM-DD"));
}

impl TrackerApp {
    pub(super) fn show_open_modal(&mut self, ctx: &egui::Context) {
        let Some(kind) = self.model.modals.open else {
            return;
        };
        let title = match kind {
            ModalKind::Year => "Add Academic Year",
            ModalKind::Semester => "Add Semester",
            ModalKind::Term => "Add Term",
            ModalKind::Subject => "Add Subject",
            ModalKind::AddFile => "Add LaTeX File",
        };

        let mut open = true;
        let mut action = ModalAction::None;
        egui::Window::new(title)
            .collapsible(false)
            .resizable(kind == ModalKind::AddFile)
            .open(&mut open)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                action = match kind {
                    ModalKind::Year => self.year_form(ui),
                    ModalKind::Semester => self.semester_form(ui),
                    ModalKind::Term => self.term_form(ui),
                    ModalKind::Subject => self.subject_form(ui),
                    ModalKind::AddFile => self.add_file_form(ui),
                };
            });

        match action {
            ModalAction::Submit => {
                if let Some(cmd) = self.model.submit_modal() {
                    self.dispatch(cmd);
                }
            }
            ModalAction::Cancel => self.model.close_modal(),
            ModalAction::None if !open => self.model.close_modal(),
            ModalAction::None => {}
        }
    }

    fn year_form(&mut self, ui: &mut egui::Ui) -> ModalAction {
        let modals = &mut self.model.modals;
        let form = &mut modals.year;
        required_label(ui, "Year");
        egui::ComboBox::from_id_salt("year_choice")
            .selected_text(format!("Year {}", form.year))
            .show_ui(ui, |ui| {
                for choice in YEAR_CHOICES {
                    ui.selectable_value(&mut form.year, choice, format!("Year {choice}"));
                }
            });
        ui.label("Description");
        ui.text_edit_multiline(&mut form.description);
        modal_footer(ui, modals.submitting, "Create Year")
    }

    fn semester_form(&mut self, ui: &mut egui::Ui) -> ModalAction {
        let years = &self.model.data.years;
        let modals = &mut self.model.modals;
        let form = &mut modals.semester;

        required_label(ui, "Academic Year");
        let selected = form
            .year_id
            .as_ref()
            .and_then(|id| find_year(years, id))
            .map(year_label)
            .unwrap_or_else(|| "Select year".to_string());
        egui::ComboBox::from_id_salt("semester_year")
            .selected_text(selected)
            .show_ui(ui, |ui| {
                for year in years {
                    let active = form.year_id.as_ref() == Some(&year.id);
                    if ui.selectable_label(active, year_label(year)).clicked() {
                        form.year_id = Some(year.id.clone());
                    }
                }
            });

        required_label(ui, "Semester");
        ui.horizontal(|ui| {
            ui.radio_value(&mut form.name, SemesterName::A, "Semester A");
            ui.radio_value(&mut form.name, SemesterName::B, "Semester B");
        });
        ui.label("Description");
        ui.text_edit_multiline(&mut form.description);
        date_field(ui, "Start date", &mut form.start_date);
        date_field(ui, "End date", &mut form.end_date);
        modal_footer(ui, modals.submitting, "Create Semester")
    }

    fn term_form(&mut self, ui: &mut egui::Ui) -> ModalAction {
        let modals = &mut self.model.modals;
        let form = &mut modals.term;
        required_label(ui, "Name");
        ui.text_edit_singleline(&mut form.name);
        ui.label("Description");
        ui.text_edit_multiline(&mut form.description);
        date_field(ui, "Start date", &mut form.start_date);
        date_field(ui, "End date", &mut form.end_date);
        modal_footer(ui, modals.submitting, "Create Term")
    }

    fn subject_form(&mut self, ui: &mut egui::Ui) -> ModalAction {
        let semesters = &self.model.data.semesters;
        let modals = &mut self.model.modals;
        let form = &mut modals.subject;

        required_label(ui, "Name");
        ui.text_edit_singleline(&mut form.name);
        ui.label("Description");
        ui.text_edit_multiline(&mut form.description);

        required_label(ui, "Semester");
        let selected = form
            .semester_id
            .as_ref()
            .and_then(|id| find_semester(semesters, id))
            .map(semester_label)
            .unwrap_or_else(|| "Select semester".to_string());
        egui::ComboBox::from_id_salt("subject_semester")
            .selected_text(selected)
            .show_ui(ui, |ui| {
                for semester in semesters {
                    let active = form.semester_id.as_ref() == Some(&semester.id);
                    if ui.selectable_label(active, semester_label(semester)).clicked() {
                        form.semester_id = Some(semester.id.clone());
                    }
                }
            });

        ui.label("Color");
        ui.horizontal(|ui| {
            let mut rgb = parse_hex_color(&form.color)
                .or_else(|| parse_hex_color(DEFAULT_SUBJECT_COLOR))
                .unwrap_or([59, 130, 246]);
            if ui.color_edit_button_srgb(&mut rgb).changed() {
                form.color = format_hex_color(rgb);
            }
            ui.add(egui::TextEdit::singleline(&mut form.color).desired_width(80.0));
        });
        modal_footer(ui, modals.submitting, "Create Subject")
    }

    fn add_file_form(&mut self, ui: &mut egui::Ui) -> ModalAction {
        let mut picked_single: Option<PathBuf> = None;
        let mut picked_many: Option<Vec<PathBuf>> = None;

        let data = &self.model.data;
        let modals = &mut self.model.modals;
        let form = &mut modals.add_file;

        ui.horizontal(|ui| {
            for tab in UploadTab::ALL {
                if ui.selectable_label(form.tab == tab, tab.label()).clicked() {
                    form.set_tab(tab);
                }
            }
        });
        ui.separator();

        egui::Grid::new("add_file_placement")
            .num_columns(2)
            .spacing([12.0, 6.0])
            .show(ui, |ui| {
                required_label(ui, "Academic Year");
                let selected = form
                    .year_id()
                    .and_then(|id| find_year(&data.years, id))
                    .map(year_label)
                    .unwrap_or_else(|| "Select year".to_string());
                let mut year_choice = None;
                egui::ComboBox::from_id_salt("add_file_year")
                    .selected_text(selected)
                    .show_ui(ui, |ui| {
                        for year in &data.years {
                            let active = form.year_id() == Some(&year.id);
                            if ui.selectable_label(active, year_label(year)).clicked() {
                                year_choice = Some(year.id.clone());
                            }
                        }
                    });
                if let Some(year) = year_choice {
                    form.set_year(Some(year));
                }
                ui.end_row();

                required_label(ui, "Semester");
                let selected = form
                    .semester_id()
                    .and_then(|id| find_semester(&data.semesters, id))
                    .map(semester_label)
                    .unwrap_or_else(|| "Select semester".to_string());
                let mut semester_choice = None;
                ui.add_enabled_ui(form.year_id().is_some(), |ui| {
                    egui::ComboBox::from_id_salt("add_file_semester")
                        .selected_text(selected)
                        .show_ui(ui, |ui| {
                            for semester in semesters_for_year(&data.semesters, form.year_id()) {
                                let active = form.semester_id() == Some(&semester.id);
                                if ui.selectable_label(active, semester_label(semester)).clicked() {
                                    semester_choice = Some(semester.id.clone());
                                }
                            }
                        });
                });
                if let Some(semester) = semester_choice {
                    form.set_semester(Some(semester));
                }
                ui.end_row();

                required_label(ui, "Subject");
                let selected = form
                    .subject_id()
                    .and_then(|id| find_subject(&data.subjects, id))
                    .map(|subject| subject.name.clone())
                    .unwrap_or_else(|| "Select subject".to_string());
                let mut subject_choice = None;
                ui.add_enabled_ui(form.semester_id().is_some(), |ui| {
                    egui::ComboBox::from_id_salt("add_file_subject")
                        .selected_text(selected)
                        .show_ui(ui, |ui| {
                            for subject in subjects_for_semester(&data.subjects, form.semester_id()) {
                                let active = form.subject_id() == Some(&subject.id);
                                if ui.selectable_label(active, &subject.name).clicked() {
                                    subject_choice = Some(subject.id.clone());
                                }
                            }
                        });
                });
                if let Some(subject) = subject_choice {
                    form.set_subject(Some(subject));
                }
                ui.end_row();
            });
        ui.separator();

        let placed = form.subject_id().is_some();
        let submit_label = match form.tab {
            UploadTab::Manual => {
                let mut multi = form.multi_file_mode();
                if ui.checkbox(&mut multi, "Upload multiple files").changed() {
                    form.set_multi_file_mode(multi);
                }
                if form.multi_file_mode() {
                    if ui
                        .add_enabled(placed, egui::Button::new("Choose .tex files..."))
                        .clicked()
                    {
                        picked_many = tex_dialog().pick_files();
                    }
                    if !form.selected_files().is_empty() {
                        ui.label(format!("Selected files ({}):", form.selected_files().len()));
                        egui::ScrollArea::vertical()
                            .max_height(120.0)
                            .show(ui, |ui| {
                                for file in form.selected_files() {
                                    ui.horizontal(|ui| {
                                        ui.label(&file.name);
                                        ui.weak(human_readable_bytes(file.size));
                                    });
                                }
                            });
                    }
                    "Upload Files"
                } else {
                    ui.label("The file is uploaded as soon as it is chosen.");
                    if ui
                        .add_enabled(
                            placed && !modals.submitting,
                            egui::Button::new("Choose .tex file..."),
                        )
                        .clicked()
                    {
                        picked_single = tex_dialog().pick_file();
                    }
                    "Add File"
                }
            }
            UploadTab::Paste => {
                required_label(ui, "File name");
                ui.add(egui::TextEdit::singleline(&mut form.name).hint_text("notes.tex"));
                required_label(ui, "LaTeX content");
                ui.add(
                    egui::TextEdit::multiline(&mut form.content)
                        .code_editor()
                        .desired_rows(14)
                        .desired_width(f32::INFINITY),
                );
                "Add File"
            }
            UploadTab::Git => {
                ui.weak("Git integration is coming soon. Nothing is submitted from this tab.");
                "Add File"
            }
        };

        if form.tab != UploadTab::Git {
            ui.label("Tags (comma separated)");
            ui.add(egui::TextEdit::singleline(&mut form.tags).hint_text("exam, week1"));
            ui.label("Notes");
            ui.text_edit_multiline(&mut form.notes);
        }

        let action = modal_footer(ui, modals.submitting, submit_label);

        if let Some(paths) = picked_many {
            self.dispatch(BackendCommand::ReadSelectedFiles { paths });
        }
        if let Some(cmd) = picked_single.and_then(|path| self.model.upload_picked(path)) {
            self.dispatch(cmd);
        }
        action
    }

    pub(super) fn show_preview(&mut self, ctx: &egui::Context) {
        let Some(preview) = self.model.preview.as_mut() else {
            return;
        };
        let mut edit = self.model.edit.as_mut();

        let mut open = true;
        let mut close = false;
        let mut begin_edit = false;
        let mut cancel_edit = false;
        let mut save_edit = false;
        let mut refresh = None;
        let mut delete = None;
        let mut export = None;

        egui::Window::new(preview.file.name.clone())
            .id(egui::Id::new("file_preview"))
            .collapsible(false)
            .resizable(true)
            .default_size([720.0, 560.0])
            .open(&mut open)
            .show(ctx, |ui| {
                let file = &preview.file;
                ui.horizontal(|ui| {
                    ui.label(format!(
                        "{} words • {}",
                        file.word_count,
                        human_readable_bytes(file.file_size)
                    ));
                    status_badge(ui, file.compilation_status);
                });
                if let Some(edit) = edit.as_deref_mut() {
                    ui.separator();
                    let form = &mut edit.form;
                    egui::ScrollArea::vertical()
                        .max_height(440.0)
                        .auto_shrink([false, false])
                        .show(ui, |ui| {
                            required_label(ui, "File name");
                            ui.add(egui::TextEdit::singleline(&mut form.name));
                            required_label(ui, "LaTeX content");
                            ui.add(
                                egui::TextEdit::multiline(&mut form.content)
                                    .code_editor()
                                    .desired_rows(14)
                                    .desired_width(f32::INFINITY),
                            );
                            ui.label("Tags (comma separated)");
                            ui.add(egui::TextEdit::singleline(&mut form.tags));
                            ui.label("Notes");
                            ui.text_edit_multiline(&mut form.notes);
                        });
                    ui.separator();
                    ui.horizontal(|ui| {
                        let label = if edit.saving { "Saving..." } else { "Save" };
                        if ui.add_enabled(!edit.saving, egui::Button::new(label)).clicked() {
                            save_edit = true;
                        }
                        if ui.button("Cancel").clicked() {
                            cancel_edit = true;
                        }
                    });
                    return;
                }

                ui.horizontal(|ui| {
                    for tab in [PreviewTab::Content, PreviewTab::Info, PreviewTab::Versions] {
                        let label = preview.tab_label(tab);
                        if ui.selectable_label(preview.tab == tab, label).clicked() {
                            preview.tab = tab;
                        }
                    }
                });
                ui.separator();

                let file = &preview.file;
                egui::ScrollArea::vertical()
                    .max_height(420.0)
                    .auto_shrink([false, false])
                    .show(ui, |ui| match preview.tab {
                        PreviewTab::Content => {
                            let mut content = file.content.as_str();
                            ui.add(
                                egui::TextEdit::multiline(&mut content)
                                    .code_editor()
                                    .desired_width(f32::INFINITY),
                            );
                        }
                        PreviewTab::Info => {
                            egui::Grid::new("preview_info").num_columns(2).show(ui, |ui| {
                                ui.label("Word count");
                                ui.label(file.word_count.to_string());
                                ui.end_row();
                                ui.label("File size");
                                ui.label(format!("{} bytes", file.file_size));
                                ui.end_row();
                                ui.label("Compilation");
                                status_badge(ui, file.compilation_status);
                                ui.end_row();
                                ui.label("Source");
                                ui.label(file.source_type.as_str());
                                ui.end_row();
                                ui.label("Created");
                                ui.label(format_local_datetime(file.created_at));
                                ui.end_row();
                                ui.label("Updated");
                                ui.label(format_local_datetime(file.updated_at));
                                ui.end_row();
                            });
                            if !file.tags.is_empty() {
                                ui.horizontal_wrapped(|ui| {
                                    ui.label("Tags");
                                    for tag in &file.tags {
                                        tag_chip(ui, tag);
                                    }
                                });
                            }
                            if let Some(notes) = file.notes.as_deref().filter(|n| !n.is_empty()) {
                                ui.label("Notes");
                                ui.weak(notes);
                            }
                            if let Some(output) = file.compilation_output.as_deref() {
                                ui.collapsing("Compilation output", |ui| {
                                    ui.monospace(output);
                                });
                            }
                        }
                        PreviewTab::Versions => {
                            if file.versions.is_empty() {
                                ui.weak("No versions recorded");
                            }
                            for (number, version) in preview.numbered_versions() {
                                egui::Frame::group(ui.style()).show(ui, |ui| {
                                    ui.set_width(ui.available_width());
                                    ui.horizontal(|ui| {
                                        ui.strong(format!("Version {number}"));
                                        ui.weak(format_local_datetime(version.created_at));
                                    });
                                    ui.small(format!(
                                        "{} words • {}",
                                        version.word_count,
                                        human_readable_bytes(version.file_size)
                                    ));
                                    ui.monospace(version_excerpt(&version.content));
                                });
                            }
                        }
                    });

                ui.separator();
                ui.horizontal(|ui| {
                    if ui.button("Download").clicked() {
                        export = Some(file.clone());
                    }
                    if ui.button("Edit").clicked() {
                        begin_edit = true;
                    }
                    if ui.button("Refresh").clicked() {
                        refresh = Some(file.id.clone());
                    }
                    if ui.button("Delete").clicked() {
                        delete = Some(file.id.clone());
                    }
                    if ui.button("Close").clicked() {
                        close = true;
                    }
                });
            });

        if !open || close {
            self.model.close_preview();
            return;
        }
        if begin_edit {
            self.model.begin_edit();
        }
        if cancel_edit {
            self.model.cancel_edit();
        }
        if save_edit {
            if let Some(cmd) = self.model.submit_edit() {
                self.dispatch(cmd);
            }
        }
        if let Some(file) = export {
            match export_file_name(&file) {
                Ok(name) => {
                    if let Some(target) = rfd::FileDialog::new().set_file_name(&name).save_file() {
                        self.dispatch(BackendCommand::ExportFile {
                            file: Box::new(file),
                            target,
                        });
                    }
                }
                Err(err) => self.model.status = format!("{err:#}"),
            }
        }
        if let Some(file_id) = refresh {
            self.dispatch(BackendCommand::RefreshPreview { file_id });
        }
        if let Some(file_id) = delete {
            self.dispatch(BackendCommand::DeleteFile { file_id });
        }
    }
}

//! The three read-only views. Each draws from the view model and turns clicks
//! into view-model intents.

use std::time::Instant;

use client_core::{
    filter::{
        file_location, files_in_subject, find_semester, find_subject, semester_label,
        semesters_in_year, subjects_for_semester, subjects_in_semester, subjects_in_term,
        term_date_range, year_label,
    },
    preview::{format_local_date, tag_chips},
    stats::DashboardSummary,
};
use eframe::egui;
use shared::domain::TexFile;

use super::app::TrackerApp;
use super::widgets::{
    color_swatch, human_readable_bytes, stat_card, status_badge, status_color, tag_chip,
};
use crate::controller::reducer::ModalKind;

const CARD_WIDTH: f32 = 280.0;

impl TrackerApp {
    pub(super) fn show_dashboard(&mut self, ui: &mut egui::Ui) {
        let summary = DashboardSummary::from_stats(&self.model.data.stats);
        let mut opened: Option<TexFile> = None;

        egui::ScrollArea::vertical().show(ui, |ui| {
            ui.horizontal_wrapped(|ui| {
                stat_card(ui, "Academic Years", summary.total_years);
                stat_card(ui, "Semesters", summary.total_semesters);
                stat_card(ui, "Subjects", summary.total_subjects);
                stat_card(ui, "LaTeX Files", summary.total_files);
            });
            ui.add_space(12.0);

            ui.columns(2, |columns| {
                columns[0].heading("Compilation Status");
                for (status, count) in summary.compilation {
                    columns[0].horizontal(|ui| {
                        ui.colored_label(status_color(status), "●");
                        ui.label(status.as_str());
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            ui.strong(count.to_string());
                        });
                    });
                }

                columns[1].heading("Recent Files");
                if summary.recent_files.is_empty() {
                    columns[1].weak("No files yet");
                }
                for file in summary.recent_files {
                    columns[1].horizontal(|ui| {
                        if ui.link(&file.name).clicked() {
                            opened = Some(file.clone());
                        }
                        status_badge(ui, file.compilation_status);
                        ui.weak(format_local_date(file.updated_at));
                    });
                }
            });
        });

        if let Some(file) = opened {
            self.model.open_preview(file);
        }
    }

    pub(super) fn show_files(&mut self, ui: &mut egui::Ui) {
        let now = Instant::now();
        ui.horizontal(|ui| {
            let mut query = self.model.search_query.clone();
            let response = ui.add(
                egui::TextEdit::singleline(&mut query)
                    .hint_text("Search files...")
                    .desired_width(260.0),
            );
            if response.changed() {
                self.model.set_search_query(query, now);
            }

            self.semester_filter_combo(ui, now);
            self.subject_filter_combo(ui, now);

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("Add File").clicked() {
                    self.model.open_modal(ModalKind::AddFile);
                }
            });
        });
        ui.separator();

        let mut opened: Option<TexFile> = None;
        let visible = self.model.visible_files();
        if visible.is_empty() {
            ui.vertical_centered(|ui| {
                ui.add_space(40.0);
                ui.heading("No files found");
                ui.weak("Add a .tex file or change the filters.");
            });
            return;
        }

        let data = &self.model.data;
        egui::ScrollArea::vertical().show(ui, |ui| {
            ui.horizontal_wrapped(|ui| {
                for file in visible {
                    egui::Frame::group(ui.style()).show(ui, |ui| {
                        ui.set_width(CARD_WIDTH);
                        ui.horizontal(|ui| {
                            ui.strong(&file.name);
                            ui.with_layout(
                                egui::Layout::right_to_left(egui::Align::Center),
                                |ui| status_badge(ui, file.compilation_status),
                            );
                        });
                        ui.weak(file_location(file, &data.semesters, &data.subjects));
                        ui.label(format!(
                            "{} words • {}",
                            file.word_count,
                            human_readable_bytes(file.file_size)
                        ));
                        let chips = tag_chips(&file.tags);
                        if !chips.is_empty() {
                            ui.horizontal_wrapped(|ui| {
                                for chip in &chips {
                                    tag_chip(ui, chip);
                                }
                            });
                        }
                        ui.horizontal(|ui| {
                            ui.weak(format_local_date(file.updated_at));
                            ui.with_layout(
                                egui::Layout::right_to_left(egui::Align::Center),
                                |ui| {
                                    if ui.button("Preview").clicked() {
                                        opened = Some(file.clone());
                                    }
                                },
                            );
                        });
                    });
                }
            });
        });

        if let Some(file) = opened {
            self.model.open_preview(file);
        }
    }

    fn semester_filter_combo(&mut self, ui: &mut egui::Ui, now: Instant) {
        let data = &self.model.data;
        let selected = self
            .model
            .filter
            .semester
            .as_ref()
            .and_then(|id| find_semester(&data.semesters, id))
            .map(semester_label)
            .unwrap_or_else(|| "All Semesters".to_string());
        let mut choice = None;
        egui::ComboBox::from_id_salt("files_semester_filter")
            .selected_text(selected)
            .show_ui(ui, |ui| {
                if ui
                    .selectable_label(self.model.filter.semester.is_none(), "All Semesters")
                    .clicked()
                {
                    choice = Some(None);
                }
                for semester in &data.semesters {
                    let active = self.model.filter.semester.as_ref() == Some(&semester.id);
                    if ui.selectable_label(active, semester_label(semester)).clicked() {
                        choice = Some(Some(semester.id.clone()));
                    }
                }
            });
        if let Some(semester) = choice {
            self.model.select_semester_filter(semester, now);
        }
    }

    fn subject_filter_combo(&mut self, ui: &mut egui::Ui, now: Instant) {
        let data = &self.model.data;
        let selected = self
            .model
            .filter
            .subject
            .as_ref()
            .and_then(|id| find_subject(&data.subjects, id))
            .map(|subject| subject.name.clone())
            .unwrap_or_else(|| "All Subjects".to_string());
        let mut choice = None;
        egui::ComboBox::from_id_salt("files_subject_filter")
            .selected_text(selected)
            .show_ui(ui, |ui| {
                if ui
                    .selectable_label(self.model.filter.subject.is_none(), "All Subjects")
                    .clicked()
                {
                    choice = Some(None);
                }
                for subject in subjects_for_semester(&data.subjects, self.model.filter.semester.as_ref()) {
                    let active = self.model.filter.subject.as_ref() == Some(&subject.id);
                    if ui.selectable_label(active, &subject.name).clicked() {
                        choice = Some(Some(subject.id.clone()));
                    }
                }
            });
        if let Some(subject) = choice {
            self.model.select_subject_filter(subject, now);
        }
    }

    pub(super) fn show_management(&mut self, ui: &mut egui::Ui) {
        let mut open: Option<ModalKind> = None;
        let data = &self.model.data;

        egui::ScrollArea::vertical().show(ui, |ui| {
            ui.columns(3, |columns| {
                columns[0].horizontal(|ui| {
                    ui.heading("Academic Years");
                    if ui.small_button("Add").clicked() {
                        open = Some(ModalKind::Year);
                    }
                });
                for year in &data.years {
                    egui::Frame::group(columns[0].style()).show(&mut columns[0], |ui| {
                        ui.set_width(ui.available_width());
                        ui.strong(year_label(year));
                        if let Some(description) = year.description.as_deref() {
                            ui.weak(description);
                        }
                        ui.small(format!(
                            "{} semesters",
                            semesters_in_year(&data.semesters, &year.id)
                        ));
                    });
                }

                columns[1].horizontal(|ui| {
                    ui.heading("Semesters");
                    if ui.small_button("Add").clicked() {
                        open = Some(ModalKind::Semester);
                    }
                });
                for semester in &data.semesters {
                    egui::Frame::group(columns[1].style()).show(&mut columns[1], |ui| {
                        ui.set_width(ui.available_width());
                        ui.strong(semester_label(semester));
                        if let Some(description) = semester.description.as_deref() {
                            ui.weak(description);
                        }
                        if let Some(start) = semester.start_date {
                            let end = semester
                                .end_date
                                .map(|end| end.format("%Y-%m-%d").to_string())
                                .unwrap_or_else(|| "Present".to_string());
                            ui.small(format!("{} - {end}", start.format("%Y-%m-%d")));
                        }
                        ui.small(format!(
                            "{} subjects",
                            subjects_in_semester(&data.subjects, &semester.id)
                        ));
                    });
                }

                columns[1].add_space(12.0);
                columns[1].horizontal(|ui| {
                    ui.heading("Terms");
                    if ui.small_button("Add").clicked() {
                        open = Some(ModalKind::Term);
                    }
                });
                if data.terms.is_empty() {
                    columns[1].weak("No legacy terms");
                }
                for term in &data.terms {
                    egui::Frame::group(columns[1].style()).show(&mut columns[1], |ui| {
                        ui.set_width(ui.available_width());
                        ui.strong(&term.name);
                        if let Some(range) = term_date_range(term) {
                            ui.small(range);
                        }
                        ui.small(format!(
                            "{} subjects",
                            subjects_in_term(&data.subjects, &term.id)
                        ));
                    });
                }

                columns[2].horizontal(|ui| {
                    ui.heading("Subjects");
                    if ui.small_button("Add").clicked() {
                        open = Some(ModalKind::Subject);
                    }
                });
                for subject in &data.subjects {
                    egui::Frame::group(columns[2].style()).show(&mut columns[2], |ui| {
                        ui.set_width(ui.available_width());
                        ui.horizontal(|ui| {
                            color_swatch(ui, subject.color_or_default());
                            ui.strong(&subject.name);
                        });
                        if let Some(description) = subject.description.as_deref() {
                            ui.weak(description);
                        }
                        ui.small(format!(
                            "{} files",
                            files_in_subject(&data.files, &subject.id)
                        ));
                    });
                }
            });
        });

        if let Some(kind) = open {
            self.model.open_modal(kind);
        }
    }
}

use std::time::{Duration, Instant};

use client_core::view::View;
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::controller::orchestration::dispatch_backend_command;
use crate::controller::reducer::ViewModel;

const IDLE_REPAINT: Duration = Duration::from_millis(100);

pub struct TrackerApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    pub(super) model: ViewModel,
}

impl TrackerApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        search_debounce: Duration,
    ) -> Self {
        let mut app = Self {
            cmd_tx,
            ui_rx,
            model: ViewModel::new(search_debounce),
        };
        let reload = app.model.begin_reload();
        app.dispatch(reload);
        app
    }

    pub(super) fn dispatch(&mut self, cmd: BackendCommand) {
        if !dispatch_backend_command(&self.cmd_tx, cmd, &mut self.model.status) {
            self.model.dispatch_failed();
        }
    }

    pub(super) fn reload(&mut self) {
        let cmd = self.model.begin_reload();
        self.dispatch(cmd);
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            self.model.apply_event(event);
        }
    }

    fn show_top_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("app_top_nav").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("LaTeX Tracker");
                ui.separator();
                for view in View::ALL {
                    let active = self.model.router.is_active(view);
                    if ui.selectable_label(active, view.label()).clicked() {
                        self.model.router.select(view);
                    }
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui
                        .add_enabled(!self.model.data.loading, egui::Button::new("Reload"))
                        .clicked()
                    {
                        self.reload();
                    }
                    if self.model.data.loading {
                        ui.spinner();
                    }
                });
            });
        });
    }

    fn show_status_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if self.model.last_error.is_some() {
                    let color = ui.visuals().error_fg_color;
                    ui.colored_label(color, &self.model.status);
                } else {
                    ui.label(&self.model.status);
                }
            });
        });
    }
}

impl eframe::App for TrackerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        let now = Instant::now();
        if let Some(cmd) = self.model.poll_search(now) {
            self.dispatch(cmd);
        }

        self.show_top_bar(ctx);
        self.show_status_bar(ctx);
        egui::CentralPanel::default().show(ctx, |ui| match self.model.router.current() {
            View::Dashboard => self.show_dashboard(ui),
            View::Files => self.show_files(ui),
            View::Management => self.show_management(ui),
        });
        self.show_open_modal(ctx);
        self.show_preview(ctx);

        let wake = self
            .model
            .search_pending_for(Instant::now())
            .map_or(IDLE_REPAINT, |due| due.min(IDLE_REPAINT));
        ctx.request_repaint_after(wake);
    }
}

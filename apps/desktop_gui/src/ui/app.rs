use std::time::Duration;

use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use shared::domain::Movie;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::{
    events::UiEvent,
    orchestration::dispatch_backend_command,
    reducer::{content_section, CatalogState, ContentSection},
};
use crate::ui::form::MovieForm;

const ERROR_TEXT_COLOR: egui::Color32 = egui::Color32::from_rgb(220, 110, 110);
const BANNER_FILL: egui::Color32 = egui::Color32::from_rgb(111, 53, 53);

pub struct MovieCatalogApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    state: CatalogState,
    form: MovieForm,
}

impl MovieCatalogApp {
    pub fn new(cmd_tx: Sender<BackendCommand>, ui_rx: Receiver<UiEvent>) -> Self {
        Self {
            cmd_tx,
            ui_rx,
            state: CatalogState::default(),
            form: MovieForm::default(),
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            self.state.apply(event);
        }
    }

    fn dispatch(&mut self, cmd: BackendCommand) {
        dispatch_backend_command(&self.cmd_tx, cmd, &mut self.state.banner);
    }

    fn show_status_banner(&mut self, ui: &mut egui::Ui) {
        let Some(banner) = self.state.banner.clone() else {
            return;
        };
        let mut dismissed = false;
        egui::Frame::group(ui.style()).fill(BANNER_FILL).show(ui, |ui| {
            ui.horizontal_wrapped(|ui| {
                ui.label(egui::RichText::new(banner.message()).color(egui::Color32::WHITE));
                if !banner.is_fatal() && ui.button("Dismiss").clicked() {
                    dismissed = true;
                }
            });
        });
        if dismissed {
            self.state.dismiss_banner();
        }
        ui.add_space(8.0);
    }

    fn show_add_movie_form(&mut self, ui: &mut egui::Ui) {
        let form = &mut self.form;
        egui::Grid::new("add_movie_form")
            .num_columns(2)
            .spacing([12.0, 8.0])
            .show(ui, |ui| {
                ui.label("Title:");
                ui.text_edit_singleline(&mut form.title);
                ui.end_row();

                ui.label("Opening Text:");
                ui.text_edit_multiline(&mut form.opening_text);
                ui.end_row();

                ui.label("Release Date:");
                ui.text_edit_singleline(&mut form.release_date);
                ui.end_row();
            });

        let enabled = self.form.can_submit() && self.state.backend_available();
        if ui
            .add_enabled(enabled, egui::Button::new("Add Movie"))
            .clicked()
        {
            if let Some(movie) = self.form.take_submission() {
                self.dispatch(BackendCommand::AddMovie(movie));
            }
        }
    }

    fn show_content(&mut self, ui: &mut egui::Ui) {
        let mut pending = None;

        match content_section(&self.state.snapshot.view) {
            ContentSection::Placeholder(text) => {
                ui.label(text);
            }
            ContentSection::Error(message) => {
                ui.label(egui::RichText::new(message).color(ERROR_TEXT_COLOR));
                ui.horizontal(|ui| {
                    if ui.button("Retry").clicked() {
                        pending = Some(BackendCommand::Retry);
                    }
                    if ui.button("Cancel").clicked() {
                        pending = Some(BackendCommand::Cancel);
                    }
                });
            }
            ContentSection::Retrying(attempt) => {
                ui.label(format!("Retrying... attempt {attempt}"));
                if ui.button("Cancel").clicked() {
                    pending = Some(BackendCommand::Cancel);
                }
            }
            ContentSection::List(movies) => {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    for movie in movies {
                        if let Some(cmd) = movie_row(ui, movie) {
                            pending = Some(cmd);
                        }
                    }
                });
            }
        }

        if let Some(cmd) = pending {
            self.dispatch(cmd);
        }
    }
}

fn movie_row(ui: &mut egui::Ui, movie: &Movie) -> Option<BackendCommand> {
    let mut delete = false;
    ui.group(|ui| {
        ui.set_width(ui.available_width());
        ui.heading(&movie.title);
        ui.label(egui::RichText::new(&movie.release_date).weak());
        ui.label(&movie.opening_text);
        if ui.button("Delete Movie").clicked() {
            delete = true;
        }
    });
    ui.add_space(6.0);
    delete.then(|| BackendCommand::DeleteMovie(movie.id.clone()))
}

impl eframe::App for MovieCatalogApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        egui::CentralPanel::default().show(ctx, |ui| {
            self.show_status_banner(ui);

            ui.group(|ui| self.show_add_movie_form(ui));
            ui.add_space(8.0);

            let backend_available = self.state.backend_available();
            if ui
                .add_enabled(backend_available, egui::Button::new("Fetch Movies"))
                .clicked()
            {
                self.dispatch(BackendCommand::FetchMovies);
            }
            ui.separator();

            self.show_content(ui);

            if let Some(info) = &self.state.info {
                ui.separator();
                ui.label(egui::RichText::new(info).small().weak());
            }
        });

        ctx.request_repaint_after(Duration::from_millis(100));
    }
}

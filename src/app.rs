//! Main application state and UI coordination

use std::sync::Arc;

use anyhow::{Context, Result};
use eframe::egui;

use crate::core::config::AppConfig;
use crate::core::photo::PhotoLoader;
use crate::core::state::{AppState, Command, Event};
use crate::core::store::{FileStore, LocalStore, MemoryStore};
use crate::export::typst::TypstExporter;
use crate::export::ExportOrchestrator;
use crate::ui::dialogs;
use crate::ui::form::FormPanel;
use crate::ui::login::{LoginForm, LoginPanel};
use crate::ui::preview::{PhotoCache, PreviewPanel};
use crate::ui::profiles::ProfilesPanel;

/// Main application
pub struct PortfolioApp {
    /// Form, preview, session and saved profiles
    state: AppState<Box<dyn LocalStore>>,
    /// Application configuration
    config: AppConfig,
    /// Background photo reads
    photos: PhotoLoader,
    /// Background exports
    exports: ExportOrchestrator,
    /// Login input buffers
    login: LoginForm,
    /// Decoded photos for the preview and thumbnails
    photo_cache: PhotoCache,
    /// Runtime driving photo reads and exports, kept alive with the app
    _runtime: tokio::runtime::Runtime,
}

impl PortfolioApp {
    /// Create a new application instance
    pub fn new(cc: &eframe::CreationContext<'_>) -> Result<Self> {
        egui_extras::install_image_loaders(&cc.egui_ctx);

        // Load config or use defaults
        let config = AppConfig::load().unwrap_or_default();
        Self::configure_theme(&cc.egui_ctx, &config);

        let store: Box<dyn LocalStore> = match FileStore::open(config.data_dir()) {
            Ok(store) => Box::new(store),
            Err(e) => {
                tracing::error!("Profiles will not persist this session: {}", e);
                Box::new(MemoryStore::new())
            }
        };

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("portfolio-worker")
            .enable_all()
            .build()
            .context("Failed to start background runtime")?;

        let exporter = TypstExporter::new(
            config.export.typst_binary.clone(),
            config.output_dir(),
            config.export.open_after_export,
        );

        Ok(Self {
            state: AppState::new(store),
            photos: PhotoLoader::new(runtime.handle().clone()),
            exports: ExportOrchestrator::new(runtime.handle().clone(), Arc::new(exporter)),
            login: LoginForm::default(),
            photo_cache: PhotoCache::default(),
            config,
            _runtime: runtime,
        })
    }

    fn configure_theme(ctx: &egui::Context, config: &AppConfig) {
        if config.dark_theme() {
            ctx.set_visuals(egui::Visuals::dark());
        } else {
            ctx.set_visuals(egui::Visuals::light());
        }
    }

    /// Feed events to the state and carry out the resulting commands
    fn handle_events(&mut self, ctx: &egui::Context, events: Vec<Event>) {
        if events.is_empty() {
            return;
        }

        for event in events {
            for command in self.state.apply(event) {
                self.run(ctx, command);
            }
        }

        if self.state.session.is_logged_in() {
            self.login.password.clear();
        }
        ctx.request_repaint();
    }

    fn run(&mut self, ctx: &egui::Context, command: Command) {
        match command {
            Command::LoadPhoto(path) => {
                let ctx = ctx.clone();
                self.photos.load(path, move || ctx.request_repaint());
            }
            Command::Export(job) => self.exports.dispatch(job),
        }
    }

    /// Render the top menu bar
    fn render_menu_bar(&mut self, ctx: &egui::Context, events: &mut Vec<Event>) {
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Save profile").clicked() {
                        events.push(Event::Save);
                        ui.close();
                    }
                    if ui.button("Generate PDF").clicked() {
                        events.push(Event::RequestExportLive);
                        ui.close();
                    }
                    if ui.button("Clear form").clicked() {
                        events.push(Event::RequestClear);
                        ui.close();
                    }
                    ui.separator();
                    if ui.button("Exit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Logout").clicked() {
                        events.push(Event::RequestLogout);
                    }
                    if let crate::core::session::SessionState::LoggedIn { email } =
                        &self.state.session
                    {
                        ui.weak(email);
                    }
                });
            });
        });
    }
}

impl eframe::App for PortfolioApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let mut events: Vec<Event> = self
            .photos
            .poll()
            .into_iter()
            .map(Event::PhotoLoaded)
            .collect();

        if !self.state.session.is_logged_in() {
            egui::CentralPanel::default().show(ctx, |ui| {
                LoginPanel::show(ui, &mut self.login, &mut events);
            });
        } else {
            // Handle keyboard shortcuts, unless a dialog is waiting for an answer
            let dialog_open = self.state.pending.is_some() || self.state.notice.is_some();
            ctx.input(|i| {
                if dialog_open {
                    return;
                }
                if i.modifiers.ctrl && i.key_pressed(egui::Key::S) {
                    events.push(Event::Save);
                }
                if i.modifiers.ctrl && i.key_pressed(egui::Key::P) {
                    events.push(Event::RequestExportLive);
                }
            });

            self.render_menu_bar(ctx, &mut events);

            egui::SidePanel::left("profiles_panel")
                .resizable(true)
                .default_width(self.config.ui.sidebar_width)
                .min_width(180.0)
                .show(ctx, |ui| {
                    ProfilesPanel::show(ui, &self.state.profiles, &mut self.photo_cache, &mut events);
                });

            egui::SidePanel::left("form_panel")
                .resizable(true)
                .default_width(self.config.ui.form_width)
                .min_width(280.0)
                .show(ctx, |ui| {
                    FormPanel::show(ui, &self.state.form, &mut events);
                });

            egui::CentralPanel::default().show(ctx, |ui| {
                PreviewPanel::show(ui, &self.state.preview, &mut self.photo_cache);
            });
        }

        // Notices block confirmations, as a notice is the answer to the last action
        if let Some(notice) = &self.state.notice {
            dialogs::show_notice(ctx, notice, &mut events);
        } else if let Some(pending) = self.state.pending {
            dialogs::show_confirm(ctx, pending, &mut events);
        }

        self.photo_cache.retain_used(ctx);
        self.handle_events(ctx, events);
    }
}

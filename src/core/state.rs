//! Application state and the events that change it
//!
//! UI code never mutates state directly. It turns interactions into
//! [`Event`]s, feeds them to [`AppState::apply`], and carries out the
//! [`Command`]s that come back (background photo reads, exports).

use std::path::PathBuf;

use super::form::{Field, FormState};
use super::photo::{image_mime_for_path, PhotoError, PhotoLoad};
use super::preview::{derive_preview, Preview};
use super::profile::Profile;
use super::repository::{ProfileRepository, RepositoryError, SaveError};
use super::session::{self, SessionState};
use super::store::LocalStore;
use crate::export::{prepare, requires_confirmation, ExportJob, ExportSource};

/// An action waiting for the user to confirm it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pending {
    Clear,
    /// Profile id, resolved to a position only once confirmed
    Delete(i64),
    ExportLive,
    Logout,
}

impl Pending {
    /// Question shown in the confirmation dialog
    pub fn question(self) -> &'static str {
        match self {
            Pending::Clear => "Clear form? Unsaved changes will be lost.",
            Pending::Delete(_) => "Delete this profile?",
            Pending::ExportLive => {
                "Name or Contact info is missing. Continue to generate PDF anyway?"
            }
            Pending::Logout => "Are you sure you want to log out?",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

/// Blocking message for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    fn info(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            message: message.into(),
        }
    }

    fn error(message: impl ToString) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.to_string(),
        }
    }
}

#[derive(Debug)]
pub enum Event {
    FieldEdited { field: Field, value: String },
    PhotoSelected(PathBuf),
    PhotoLoaded(PhotoLoad),
    Save,
    RequestClear,
    Load(usize),
    RequestDelete(usize),
    RequestExportLive,
    ExportStored(usize),
    Login { email: String, password: String },
    RequestLogout,
    Confirm,
    Cancel,
    DismissNotice,
}

/// Side effect for the UI layer to carry out
#[derive(Debug)]
pub enum Command {
    LoadPhoto(PathBuf),
    Export(ExportJob),
}

/// Everything the app knows, plus the store it persists to
pub struct AppState<S> {
    store: S,
    pub session: SessionState,
    pub form: FormState,
    pub preview: Preview,
    /// Saved profiles as last read from the store
    pub profiles: Vec<Profile>,
    pub pending: Option<Pending>,
    pub notice: Option<Notice>,
}

impl<S: LocalStore> AppState<S> {
    /// Restore session and saved profiles from `store`
    pub fn new(store: S) -> Self {
        let session = session::restore(&store);
        let form = FormState::default();
        let preview = derive_preview(&form);
        let mut state = Self {
            store,
            session,
            form,
            preview,
            profiles: Vec::new(),
            pending: None,
            notice: None,
        };
        state.reload_profiles();
        state
    }

    fn repository(&self) -> ProfileRepository<&S> {
        ProfileRepository::new(&self.store)
    }

    fn reload_profiles(&mut self) {
        self.profiles = self.repository().list();
    }

    fn refresh_preview(&mut self) {
        self.preview = derive_preview(&self.form);
    }

    /// Apply one event, returning the side effects it asks for
    pub fn apply(&mut self, event: Event) -> Vec<Command> {
        match event {
            Event::FieldEdited { field, value } => {
                self.form.set(field, value);
                self.refresh_preview();
            }
            Event::PhotoSelected(path) => match image_mime_for_path(&path) {
                Ok(_) => return vec![Command::LoadPhoto(path)],
                Err(e) => {
                    tracing::warn!("Rejected photo: {}", e.path.display());
                    self.notice = Some(Notice::error(e));
                }
            },
            Event::PhotoLoaded(load) => self.photo_loaded(load),
            Event::Save => self.save(),
            Event::RequestClear => self.pending = Some(Pending::Clear),
            Event::Load(index) => self.load(index),
            Event::RequestDelete(index) => {
                let stored = self.repository().get(index);
                match stored {
                    Ok(profile) => self.pending = Some(Pending::Delete(profile.id)),
                    Err(e) => tracing::warn!("Cannot delete: {}", e),
                }
            }
            Event::RequestExportLive => {
                if requires_confirmation(&self.form) {
                    self.pending = Some(Pending::ExportLive);
                } else {
                    return vec![self.export_live()];
                }
            }
            Event::ExportStored(index) => {
                let stored = self.repository().get(index);
                match stored {
                    Ok(profile) => {
                        return vec![Command::Export(prepare(ExportSource::Stored(&profile)))]
                    }
                    Err(e) => tracing::warn!("Cannot export: {}", e),
                }
            }
            Event::Login { email, password } => {
                match session::login(&self.store, &email, &password) {
                    Ok(state) => {
                        self.session = state;
                        self.reload_profiles();
                    }
                    Err(e) => self.notice = Some(Notice::error(e)),
                }
            }
            Event::RequestLogout => self.pending = Some(Pending::Logout),
            Event::Confirm => {
                if let Some(pending) = self.pending.take() {
                    return self.confirm(pending);
                }
            }
            Event::Cancel => self.pending = None,
            Event::DismissNotice => self.notice = None,
        }
        Vec::new()
    }

    fn confirm(&mut self, pending: Pending) -> Vec<Command> {
        match pending {
            Pending::Clear => {
                self.form.clear();
                self.refresh_preview();
            }
            Pending::Delete(id) => {
                let repository = self.repository();
                let deleted = match repository.position(id) {
                    Some(index) => repository.delete(index),
                    None => Err(RepositoryError::Missing(id)),
                };
                if let Err(e) = deleted {
                    tracing::warn!("Failed to delete profile: {}", e);
                    if let RepositoryError::Store(e) = e {
                        self.notice = Some(Notice::error(e));
                    }
                }
                self.reload_profiles();
            }
            Pending::ExportLive => return vec![self.export_live()],
            Pending::Logout => match session::logout(&self.store) {
                Ok(state) => self.session = state,
                Err(e) => self.notice = Some(Notice::error(e)),
            },
        }
        Vec::new()
    }

    fn export_live(&self) -> Command {
        Command::Export(prepare(ExportSource::Live(&self.form)))
    }

    fn photo_loaded(&mut self, load: PhotoLoad) {
        match load.result {
            Ok(data_uri) => {
                tracing::info!("Loaded photo: {}", load.path.display());
                self.form.photo = data_uri;
                self.refresh_preview();
            }
            Err(PhotoError::Unsupported(e)) => self.notice = Some(Notice::error(e)),
            Err(e) => {
                tracing::error!("Failed to load photo: {}", e);
                self.notice = Some(Notice::error(e));
            }
        }
    }

    fn save(&mut self) {
        let saved = self.repository().save(self.form.to_profile(0));
        match saved {
            Ok(_) => {
                self.reload_profiles();
                self.notice = Some(Notice::info("Profile saved locally."));
            }
            Err(SaveError::Validation(e)) => self.notice = Some(Notice::error(e)),
            Err(SaveError::Store(e)) => {
                tracing::error!("Failed to save profile: {}", e);
                self.notice = Some(Notice::error(format!("Failed to save profile: {e}")));
            }
        }
    }

    fn load(&mut self, index: usize) {
        let stored = self.repository().get(index);
        match stored {
            Ok(profile) => {
                self.form = FormState::from_profile(&profile);
                self.refresh_preview();
            }
            Err(e) => tracing::warn!("Cannot load profile: {}", e),
        }
    }
}

//! Core functionality for profiles, persistence, preview and session state

pub mod config;
pub mod form;
pub mod photo;
pub mod preview;
pub mod profile;
pub mod repository;
pub mod session;
pub mod state;
pub mod store;

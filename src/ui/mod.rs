//! UI components for Portfolio Generator

pub mod dialogs;
pub mod form;
pub mod login;
pub mod preview;
pub mod profiles;

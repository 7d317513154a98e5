//! Profile form panel

use eframe::egui;

use crate::core::form::{Field, FormState};
use crate::core::photo::IMAGE_EXTENSIONS;
use crate::core::state::Event;

/// Form panel with the profile fields and the form actions
pub struct FormPanel;

impl FormPanel {
    /// Show the form panel
    pub fn show(ui: &mut egui::Ui, form: &FormState, events: &mut Vec<Event>) {
        ui.vertical(|ui| {
            ui.heading("Your details");
            ui.separator();

            egui::ScrollArea::vertical()
                .id_salt("form_scroll")
                .show(ui, |ui| {
                    for field in Field::ALL {
                        Self::show_field(ui, form, field, events);

                        // Photo picker sits right after the contact details
                        if field == Field::ContactInfo {
                            Self::show_photo_picker(ui, form, events);
                        }
                    }

                    ui.add_space(12.0);
                    Self::show_actions(ui, events);
                });
        });
    }

    fn show_field(ui: &mut egui::Ui, form: &FormState, field: Field, events: &mut Vec<Event>) {
        ui.label(field.label());

        let mut value = form.get(field).to_string();
        let edit = if field.is_multiline() {
            egui::TextEdit::multiline(&mut value).desired_rows(3)
        } else {
            egui::TextEdit::singleline(&mut value)
        };
        let response = ui.add(edit.id_salt(field.name()).desired_width(f32::INFINITY));

        if response.changed() {
            events.push(Event::FieldEdited { field, value });
        }
        ui.add_space(4.0);
    }

    fn show_photo_picker(ui: &mut egui::Ui, form: &FormState, events: &mut Vec<Event>) {
        ui.label("Photo");
        ui.horizontal(|ui| {
            if ui.button("Choose image...").clicked() {
                if let Some(path) = rfd::FileDialog::new()
                    .add_filter("Images", IMAGE_EXTENSIONS)
                    .pick_file()
                {
                    events.push(Event::PhotoSelected(path));
                }
            }
            if form.photo.is_empty() {
                ui.weak("No photo selected");
            } else {
                ui.weak("Photo attached");
            }
        });
        ui.add_space(4.0);
    }

    fn show_actions(ui: &mut egui::Ui, events: &mut Vec<Event>) {
        ui.horizontal(|ui| {
            if ui.button("Save profile").clicked() {
                events.push(Event::Save);
            }
            if ui.button("Generate PDF").clicked() {
                events.push(Event::RequestExportLive);
            }
            if ui.button("Clear").clicked() {
                events.push(Event::RequestClear);
            }
        });
    }
}

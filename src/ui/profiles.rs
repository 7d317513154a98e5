//! Saved profiles panel

use eframe::egui::{self, Color32, RichText};

use super::preview::PhotoCache;
use crate::core::profile::Profile;
use crate::core::state::Event;

const THUMB_SIZE: f32 = 40.0;

/// List of saved profiles with per-entry actions
pub struct ProfilesPanel;

impl ProfilesPanel {
    /// Show the saved profiles panel
    pub fn show(
        ui: &mut egui::Ui,
        profiles: &[Profile],
        photos: &mut PhotoCache,
        events: &mut Vec<Event>,
    ) {
        ui.vertical(|ui| {
            ui.heading("Saved profiles");
            ui.separator();

            egui::ScrollArea::vertical()
                .id_salt("profiles_scroll")
                .show(ui, |ui| {
                    if profiles.is_empty() {
                        ui.label("No saved profiles yet.");
                        return;
                    }

                    for (index, profile) in profiles.iter().enumerate() {
                        ui.push_id(profile.id, |ui| {
                            Self::show_entry(ui, index, profile, photos, events);
                        });
                        ui.separator();
                    }
                });
        });
    }

    fn show_entry(
        ui: &mut egui::Ui,
        index: usize,
        profile: &Profile,
        photos: &mut PhotoCache,
        events: &mut Vec<Event>,
    ) {
        ui.horizontal(|ui| {
            let size = egui::vec2(THUMB_SIZE, THUMB_SIZE);
            match (!profile.photo.is_empty())
                .then(|| photos.image(&profile.photo))
                .flatten()
            {
                Some(image) => {
                    ui.add(image.fit_to_exact_size(size));
                }
                None => {
                    let (rect, _) = ui.allocate_exact_size(size, egui::Sense::hover());
                    ui.painter().rect_filled(
                        rect,
                        egui::CornerRadius::same(6),
                        Color32::from_rgb(243, 244, 246),
                    );
                }
            }

            ui.vertical(|ui| {
                ui.label(RichText::new(profile.display_name()).strong());
                ui.label(RichText::new(&profile.contact_info).small().color(Color32::GRAY));
            });
        });

        ui.horizontal(|ui| {
            if ui.button("Load").clicked() {
                events.push(Event::Load(index));
            }
            if ui.button("PDF").clicked() {
                events.push(Event::ExportStored(index));
            }
            if ui
                .button(RichText::new("Delete").color(Color32::from_rgb(220, 38, 38)))
                .clicked()
            {
                events.push(Event::RequestDelete(index));
            }
        });
    }
}

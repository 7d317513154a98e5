//! Live preview panel

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use eframe::egui::{self, Color32, RichText};
use eframe::egui::load::Bytes;

use crate::core::photo::decode_data_uri;
use crate::core::preview::Preview;

const PHOTO_SIZE: f32 = 120.0;
const PLACEHOLDER_FILL: Color32 = Color32::from_rgb(243, 244, 246);

struct CachedPhoto {
    uri: String,
    bytes: Bytes,
    used: bool,
}

/// Decoded photo bytes keyed by data URI, so base64 is decoded once
///
/// Entries not shown during a frame are dropped by [`PhotoCache::retain_used`].
#[derive(Default)]
pub struct PhotoCache {
    entries: HashMap<u64, CachedPhoto>,
}

impl PhotoCache {
    /// Image widget for a data URI, `None` if it cannot be decoded
    pub fn image(&mut self, data_uri: &str) -> Option<egui::Image<'static>> {
        let mut hasher = DefaultHasher::new();
        data_uri.hash(&mut hasher);
        let key = hasher.finish();

        if !self.entries.contains_key(&key) {
            let (mime, bytes) = decode_data_uri(data_uri)?;
            let extension = mime.strip_prefix("image/").unwrap_or("png");
            self.entries.insert(
                key,
                CachedPhoto {
                    uri: format!("bytes://photo-{key:016x}.{extension}"),
                    bytes: Bytes::Shared(Arc::from(bytes)),
                    used: false,
                },
            );
        }

        let photo = self.entries.get_mut(&key)?;
        photo.used = true;
        Some(egui::Image::from_bytes(photo.uri.clone(), photo.bytes.clone()))
    }

    /// Drop photos not shown since the last call, releasing their textures
    pub fn retain_used(&mut self, ctx: &egui::Context) {
        for uri in self.sweep() {
            ctx.forget_image(&uri);
        }
    }

    /// Remove unused entries and reset the marks, returning the evicted URIs
    fn sweep(&mut self) -> Vec<String> {
        let mut evicted = Vec::new();
        self.entries.retain(|_, photo| {
            if !photo.used {
                evicted.push(photo.uri.clone());
            }
            std::mem::take(&mut photo.used)
        });
        evicted
    }
}

/// Preview panel
pub struct PreviewPanel;

impl PreviewPanel {
    /// Show the preview panel
    pub fn show(ui: &mut egui::Ui, preview: &Preview, photos: &mut PhotoCache) {
        egui::ScrollArea::vertical()
            .id_salt("preview_scroll")
            .show(ui, |ui| {
                egui::Frame::new()
                    .fill(ui.visuals().extreme_bg_color)
                    .inner_margin(egui::Margin::same(14))
                    .corner_radius(8)
                    .show(ui, |ui| {
                        ui.set_min_width(ui.available_width());
                        Self::show_header(ui, preview, photos);

                        Self::section(ui, "About");
                        ui.label(&preview.bio);

                        Self::section(ui, "Skills");
                        Self::labeled(ui, "Soft:", &preview.soft_skills);
                        Self::labeled(ui, "Technical:", &preview.tech_skills);

                        if let Some(academics) = &preview.academics {
                            Self::section(ui, "Academics");
                            ui.label(academics);
                        }

                        Self::section(ui, "Work Experience");
                        ui.label(RichText::new(&preview.company).strong());
                        Self::bullets(ui, &preview.responsibilities);

                        if let Some(projects) = &preview.projects {
                            Self::section(ui, "Projects / Publications");
                            Self::bullets(ui, projects);
                        }
                    });
            });
    }

    fn show_header(ui: &mut egui::Ui, preview: &Preview, photos: &mut PhotoCache) {
        ui.horizontal(|ui| {
            let size = egui::vec2(PHOTO_SIZE, PHOTO_SIZE);
            match preview.photo.as_deref().and_then(|uri| photos.image(uri)) {
                Some(image) => {
                    ui.add(image.fit_to_exact_size(size));
                }
                None => {
                    let (rect, _) = ui.allocate_exact_size(size, egui::Sense::hover());
                    ui.painter().rect_filled(rect, egui::CornerRadius::same(8), PLACEHOLDER_FILL);
                }
            }

            ui.add_space(12.0);
            ui.vertical(|ui| {
                ui.label(RichText::new(&preview.name).size(28.0).strong());
                ui.add_space(6.0);
                ui.label(RichText::new(&preview.contact).color(Color32::GRAY));
            });
        });
    }

    fn section(ui: &mut egui::Ui, title: &str) {
        ui.add_space(10.0);
        ui.label(RichText::new(title).size(17.0).strong());
        ui.add_space(4.0);
    }

    fn labeled(ui: &mut egui::Ui, label: &str, value: &str) {
        ui.horizontal_wrapped(|ui| {
            ui.label(RichText::new(label).strong());
            ui.label(value);
        });
    }

    fn bullets(ui: &mut egui::Ui, items: &[String]) {
        for item in items {
            ui.horizontal_wrapped(|ui| {
                ui.label("\u{2022}");
                ui.label(item);
            });
        }
    }
}

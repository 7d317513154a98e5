//! Blocking confirmation and notice dialogs

use eframe::egui::{self, Color32, RichText};

use crate::core::state::{Event, Notice, NoticeKind, Pending};

/// Ask the user to confirm a pending action
pub fn show_confirm(ctx: &egui::Context, pending: Pending, events: &mut Vec<Event>) {
    let modal = egui::Modal::new(egui::Id::new("confirm_dialog")).show(ctx, |ui| {
        ui.heading("Please confirm");
        ui.add_space(8.0);
        ui.label(pending.question());
        ui.add_space(8.0);
        ui.horizontal(|ui| {
            if ui.button("Cancel").clicked() {
                events.push(Event::Cancel);
            }
            if ui.button("OK").clicked() {
                events.push(Event::Confirm);
            }
        });
    });

    // Escape or a click outside the dialog
    if modal.should_close() {
        events.push(Event::Cancel);
    }
}

/// Show a notice until it is dismissed
pub fn show_notice(ctx: &egui::Context, notice: &Notice, events: &mut Vec<Event>) {
    let title = match notice.kind {
        NoticeKind::Info => "Notice",
        NoticeKind::Error => "Error",
    };

    let modal = egui::Modal::new(egui::Id::new("notice_dialog")).show(ctx, |ui| {
        ui.heading(title);
        ui.add_space(8.0);
        let text = RichText::new(&notice.message);
        match notice.kind {
            NoticeKind::Info => ui.label(text),
            NoticeKind::Error => ui.label(text.color(Color32::from_rgb(220, 38, 38))),
        };
        ui.add_space(8.0);
        let ok = ui.button("OK");
        if ok.clicked() || ui.input(|i| i.key_pressed(egui::Key::Enter)) {
            events.push(Event::DismissNotice);
        }
    });

    if modal.should_close() {
        events.push(Event::DismissNotice);
    }
}

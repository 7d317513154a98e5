//! Login view shown while the session gate is closed

use eframe::egui;

use crate::core::state::Event;

/// Input buffers of the login view
#[derive(Debug, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    /// Event for the current input
    fn submit(&self) -> Event {
        Event::Login {
            email: self.email.clone(),
            password: self.password.clone(),
        }
    }
}

/// Login panel
pub struct LoginPanel;

impl LoginPanel {
    /// Show the login panel
    pub fn show(ui: &mut egui::Ui, form: &mut LoginForm, events: &mut Vec<Event>) {
        ui.vertical_centered(|ui| {
            ui.add_space(100.0);
            ui.heading("Portfolio Generator");
            ui.add_space(8.0);
            ui.label("Sign in to build and export your portfolio.");
            ui.add_space(20.0);

            ui.allocate_ui(egui::vec2(320.0, 0.0), |ui| {
                ui.label("Email");
                ui.add(
                    egui::TextEdit::singleline(&mut form.email)
                        .hint_text("you@example.com")
                        .desired_width(f32::INFINITY),
                );
                ui.add_space(6.0);

                ui.label("Password");
                let password = ui.add(
                    egui::TextEdit::singleline(&mut form.password)
                        .password(true)
                        .desired_width(f32::INFINITY),
                );
                ui.add_space(12.0);

                let enter = password.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                if ui.button("Login").clicked() || enter {
                    events.push(form.submit());
                }
            });
        });
    }
}

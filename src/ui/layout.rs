use egui::{CentralPanel, Context, Frame, RichText, Ui, Visuals};
use crate::CourseApp;
use crate::model::AppState;

pub fn top_panel(app: &mut CourseApp, ctx: &Context) {
    let course_ready = app.session.is_some();

    egui::TopBottomPanel::top("menu_panel").show(ctx, |ui| {
        ui.horizontal_centered(|ui| {
            if ui.button("📚 Cursos").clicked() {
                app.state = AppState::CourseSelect;
                app.message.clear();
            }

            if ui.button("Capítulos").clicked() {
                app.state = AppState::Chapters;
            }

            if ui
                .add_enabled(course_ready, egui::Button::new("Curso"))
                .clicked()
            {
                app.volver_al_curso();
            }

            if ui
                .add_enabled(course_ready, egui::Button::new("Tareas"))
                .clicked()
            {
                if let Some(id) = app.current_course_id().map(str::to_string) {
                    app.open_workspace(&id, None);
                }
            }

            if let Some(session) = &app.session {
                ui.separator();
                ui.label(RichText::new(&session.content.course.title).strong());
            }
        });
    });
}

pub fn bottom_panel(app: &mut CourseApp, ctx: &Context) {
    egui::TopBottomPanel::bottom("bottom_panel").show(ctx, |ui| {
        ui.horizontal(|ui| {
            if !app.message.is_empty() {
                ui.label(RichText::new(&app.message).color(egui::Color32::YELLOW));
                if ui.small_button("✖").clicked() {
                    app.message.clear();
                }
            }

            // ----------- BOTONES DE TEMA -----------
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("🌙 Modo oscuro").clicked() {
                    ctx.set_visuals(Visuals::dark());
                }
                if ui.button("☀Modo claro").clicked() {
                    ctx.set_visuals(Visuals::light());
                }
            });
        });
    });
}

/// Panel centrado tanto vertical como horizontalmente,
/// con un tamaño de contenido máximo y un bloque interior `inner`.
pub fn centered_panel(
    ctx: &Context,
    est_height: f32,
    max_width: f32,
    inner: impl FnOnce(&mut Ui),
) {
    CentralPanel::default().show(ctx, |ui| {
        let extra = ((ui.available_height() - est_height) / 2.0).max(0.0);
        ui.add_space(extra);
        ui.vertical_centered(|ui| {
            Frame::default()
                .fill(ui.visuals().window_fill())
                .inner_margin(egui::Margin::symmetric(16, 16))
                .show(ui, |ui| {
                    let w = ui.available_width().min(max_width);
                    ui.set_width(w);
                    inner(ui);
                });
        });
        ui.add_space(extra);
    });
}

/// Panel con scroll para listas largas (lecciones, capítulos, tareas).
pub fn simple_panel(ctx: &Context, max_width: f32, inner: impl FnOnce(&mut Ui)) {
    CentralPanel::default().show(ctx, |ui| {
        egui::ScrollArea::vertical()
            .auto_shrink([false; 2])
            .show(ui, |ui| {
                let w = ui.available_width().min(max_width);
                Frame::default()
                    .fill(ui.visuals().window_fill())
                    .inner_margin(egui::Margin::symmetric(16, 16))
                    .show(ui, |ui| {
                        ui.set_width(w);
                        inner(ui);
                    });
            });
    });
}

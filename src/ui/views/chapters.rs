use crate::CourseApp;
use crate::loader::LoadStatus;
use crate::ui::helpers::{big_list_button, status_label};
use crate::ui::layout::simple_panel;
use egui::{Context, RichText};

/// Ficha del curso y su índice de capítulos.
pub fn ui_chapters(app: &mut CourseApp, ctx: &Context) {
    let mut start = false;

    simple_panel(ctx, 720.0, |ui| {
        let width = ui.available_width();

        if !status_label(ui, &app.details) {
            if let Some(details) = app.details.ready() {
                ui.heading(&details.title);
                ui.add_space(6.0);
                if !details.overview.is_empty() {
                    ui.label(&details.overview);
                }
                ui.add_space(6.0);
                egui::Grid::new("course_details").num_columns(2).show(ui, |ui| {
                    for (name, value) in [
                        ("Duración", &details.duration),
                        ("Profesor", &details.instructor),
                        ("Requisitos", &details.prerequisites),
                    ] {
                        if !value.is_empty() {
                            ui.label(RichText::new(name).strong());
                            ui.label(value);
                            ui.end_row();
                        }
                    }
                });
                if !details.curriculum.is_empty() {
                    egui::CollapsingHeader::new("Temario")
                        .id_salt("curriculum")
                        .show(ui, |ui| ui.label(&details.curriculum));
                }
            }
        }

        ui.separator();
        ui.heading("Capítulos");
        ui.add_space(8.0);

        if !status_label(ui, &app.chapters) {
            if let Some(chapters) = app.chapters.ready() {
                for chapter in chapters {
                    ui.label(RichText::new(&chapter.title).strong());
                    if !chapter.description.is_empty() {
                        ui.label(&chapter.description);
                    }
                    ui.add_space(6.0);
                }
            }
        }

        ui.separator();
        ui.add_space(8.0);

        match &app.course_status {
            Some(status @ (LoadStatus::Loading | LoadStatus::Failed(_) | LoadStatus::NotFound)) => {
                status_label(ui, status);
            }
            _ => {
                let ready = app.session.is_some();
                start = big_list_button(ui, "▶ Empezar el curso".into(), width, 40.0, ready);
            }
        }
    });

    if start {
        app.volver_al_curso();
    }
}

use crate::CourseApp;
use crate::ui::layout::centered_panel;
use egui::{Button, Context, RichText, TextEdit};

pub fn ui_course_select(app: &mut CourseApp, ctx: &Context) {
    centered_panel(ctx, 300.0, 420.0, |ui| {
        let width = ui.available_width();
        let btn_h = 36.0;

        ui.vertical_centered(|ui| {
            ui.heading("Cursos");
            ui.add_space(16.0);

            ui.label("Id del curso");
            let course_field = ui.add(
                TextEdit::singleline(&mut app.course_input)
                    .hint_text("p. ej. C01")
                    .desired_width(width),
            );
            let enter = course_field.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            ui.add_space(8.0);
            let open = ui.add_sized([width, btn_h], Button::new("▶ Abrir curso")).clicked();

            ui.add_space(20.0);
            ui.label("Ir directamente a una tarea (opcional)");
            ui.add(
                TextEdit::singleline(&mut app.task_input)
                    .hint_text("id de la tarea")
                    .desired_width(width),
            );
            ui.add_space(8.0);
            let open_tasks = ui
                .add_sized([width, btn_h], Button::new("📝 Abrir tareas del curso"))
                .clicked();

            if let Some(session) = &app.session {
                ui.add_space(20.0);
                ui.label(
                    RichText::new(format!("Curso abierto: {}", session.content.course.title)).italics(),
                );
            }

            if open || enter {
                let id = app.course_input.clone();
                app.open_course(&id);
            } else if open_tasks {
                let course_id = app.course_input.trim().to_string();
                if course_id.is_empty() {
                    app.message = "⚠ Escribe el id de un curso.".into();
                } else {
                    let task = app.task_input.trim().to_string();
                    let task = (!task.is_empty()).then_some(task);
                    app.open_workspace(&course_id, task.as_deref());
                }
            }
        });
    });
}

use crate::CourseApp;
use crate::ui::helpers::{big_list_button, status_label};
use crate::ui::layout::simple_panel;
use egui::{Context, RichText};

/// Lista de tareas del curso con la seleccionada en detalle.
pub fn ui_workspace(app: &mut CourseApp, ctx: &Context) {
    let mut select = None;
    let mut complete = false;
    let mut back = false;

    simple_panel(ctx, 760.0, |ui| {
        let width = ui.available_width();
        ui.heading("Tareas");
        ui.add_space(8.0);

        if let Some(status) = &app.workspace_status {
            status_label(ui, status);
        }

        if let Some(ws) = &app.workspace {
            if ws.workspace.tasks.is_empty() {
                ui.label(RichText::new("No hay tareas para este curso.").italics());
            }
            if ws.workspace.selected.is_none() && !ws.workspace.tasks.is_empty() {
                ui.label(RichText::new("Elige una tarea de la lista.").italics());
            }

            for (i, task) in ws.workspace.tasks.iter().enumerate() {
                let mark = if ws.is_completed(&task.id) { "✅" } else { "📝" };
                let current = ws.workspace.selected == Some(i);
                if ui.selectable_label(current, format!("{mark} {}", task.title)).clicked() {
                    select = Some(i);
                }
            }

            if let Some(task) = ws.selected_task() {
                ui.separator();
                ui.heading(&task.title);
                if !task.kind.is_empty() {
                    ui.label(RichText::new(format!("Tipo: {}", task.kind)).small());
                }
                ui.add_space(6.0);
                ui.label(&task.description);
                ui.add_space(12.0);

                let done = ws.is_completed(&task.id);
                let label = if done { "✅ Completada" } else { "Marcar como completada" };
                complete = big_list_button(ui, label.into(), width, 36.0, !done);
            }
        }

        ui.add_space(16.0);
        back = ui.button("Volver al curso").clicked();
    });

    if let Some(index) = select {
        if let Some(ws) = app.workspace.as_mut() {
            ws.select(index);
        }
    }
    if complete {
        if let Some(ws) = app.workspace.as_mut() {
            let event = ws.complete_selected();
            app.notify(event);
        }
    }
    if back {
        let course_id = match &app.workspace {
            Some(ws) => ws.workspace.course_id.clone(),
            None => app.course_input.trim().to_string(),
        };
        if app.current_course_id() == Some(course_id.as_str()) {
            app.volver_al_curso();
        } else {
            app.open_course(&course_id);
        }
    }
}

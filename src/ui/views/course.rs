use crate::CourseApp;
use crate::model::AppState;
use crate::ui::helpers::{labeled_progress, status_label};
use crate::ui::layout::simple_panel;
use egui::{Button, Context, RichText};

enum CourseAction {
    SelectVideo(usize),
    ShowTopics(String),
    StartQuiz,
    RetakeQuiz,
    SkipQuiz,
    CompleteTask(String),
    OpenTask(String),
}

/// Pantalla de aprendizaje: vídeos, temas de la lección actual, quiz y tareas.
pub fn ui_course(app: &mut CourseApp, ctx: &Context) {
    let Some(session) = app.session.as_ref() else {
        app.state = AppState::Chapters;
        return;
    };

    let summary = session.summary();
    let lessons = session.lesson_rows();
    let tasks = session.task_rows();
    let lesson_ids: Vec<String> = session.content.lessons.iter().map(|l| l.id.clone()).collect();
    let title = session.content.course.title.clone();
    let description = session.content.course.description.clone();
    let mut action = None;

    simple_panel(ctx, 760.0, |ui| {
        let width = ui.available_width();

        ui.heading(&title);
        if !description.is_empty() {
            ui.label(&description);
        }
        ui.add_space(10.0);

        ui.columns(3, |cols| {
            labeled_progress(&mut cols[0], summary.video_percent(), summary.videos_label());
            labeled_progress(&mut cols[1], summary.task_percent(), summary.tasks_label());
            cols[2].label(RichText::new(summary.quiz_label()).strong());
        });

        ui.separator();
        ui.heading("Vídeos");
        if lessons.is_empty() {
            ui.label(RichText::new("Este curso no tiene lecciones.").italics());
        }
        for row in &lessons {
            ui.horizontal(|ui| {
                let label = RichText::new(row.label());
                let label = if row.current { label.strong() } else { label };
                if ui.add(Button::new(label).min_size([width * 0.7, 28.0].into())).clicked() {
                    action = Some(CourseAction::SelectVideo(row.index));
                }
                if !row.video_url.is_empty() {
                    ui.hyperlink_to("🎬 ver", &row.video_url);
                }
                if ui.small_button("Temas").clicked() {
                    if let Some(id) = lesson_ids.get(row.index) {
                        action = Some(CourseAction::ShowTopics(id.clone()));
                    }
                }
            });
        }

        if let Some(panel) = &app.topics {
            ui.add_space(8.0);
            egui::CollapsingHeader::new(format!("Temas de la lección {}", panel.lesson_id))
                .id_salt("topics_panel")
                .default_open(true)
                .show(ui, |ui| {
                    if !status_label(ui, &panel.status) {
                        for topic in panel.status.ready().into_iter().flatten() {
                            ui.label(RichText::new(&topic.title).strong());
                            if !topic.description.is_empty() {
                                ui.label(&topic.description);
                            }
                            if topic.hours > 0 {
                                ui.label(RichText::new(format!("{} h", topic.hours)).small());
                            }
                            if !topic.video_url.is_empty() {
                                ui.hyperlink_to("🎬 vídeo del tema", &topic.video_url);
                            }
                            ui.add_space(4.0);
                        }
                    }
                });
        }

        ui.separator();
        ui.heading("Quiz de práctica");
        ui.horizontal(|ui| {
            if summary.quiz_completed {
                if ui
                    .add_enabled(summary.quiz_unlocked, Button::new("⟲ Repetir quiz"))
                    .clicked()
                {
                    action = Some(CourseAction::RetakeQuiz);
                }
            } else if ui
                .add_enabled(summary.quiz_unlocked, Button::new("▶ Empezar quiz"))
                .on_disabled_hover_text("Mira todos los vídeos para desbloquearlo")
                .clicked()
            {
                action = Some(CourseAction::StartQuiz);
            }
            if !summary.tasks_unlocked && ui.button("⏩ Saltar a las tareas").clicked() {
                action = Some(CourseAction::SkipQuiz);
            }
        });

        ui.separator();
        ui.heading("Tareas");
        if !summary.tasks_unlocked {
            ui.label(RichText::new("🔒 Termina o salta el quiz para desbloquearlas.").italics());
        }
        for row in &tasks {
            ui.horizontal(|ui| {
                ui.label(row.label());
                if summary.tasks_unlocked {
                    if !row.completed && ui.small_button("Completar").clicked() {
                        action = Some(CourseAction::CompleteTask(row.id.clone()));
                    }
                    if ui.small_button("Abrir").clicked() {
                        action = Some(CourseAction::OpenTask(row.id.clone()));
                    }
                }
            });
            if !row.description.is_empty() {
                ui.label(RichText::new(&row.description).small());
            }
        }
    });

    let Some(action) = action else {
        return;
    };
    match action {
        CourseAction::ShowTopics(lesson_id) => app.open_topics(&lesson_id),
        CourseAction::OpenTask(task_id) => {
            let course_id = app.current_course_id().unwrap_or_default().to_string();
            app.open_workspace(&course_id, Some(&task_id));
        }
        other => {
            let Some(session) = app.session.as_mut() else {
                return;
            };
            let event = match other {
                CourseAction::SelectVideo(index) => session.select_video(index),
                CourseAction::StartQuiz => session.start_quiz(),
                CourseAction::RetakeQuiz => session.retake_quiz(),
                CourseAction::SkipQuiz => session.skip_quiz_to_tasks(),
                CourseAction::CompleteTask(id) => session.complete_task(&id),
                CourseAction::ShowTopics(_) | CourseAction::OpenTask(_) => return,
            };
            if session.quiz.active {
                app.state = AppState::Quiz;
            }
            app.notify(event);
        }
    }
}

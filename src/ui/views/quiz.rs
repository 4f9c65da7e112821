use crate::CourseApp;
use crate::model::AppState;
use crate::ui::layout::centered_panel;
use egui::{Button, Context, ProgressBar, RichText};

pub fn ui_quiz(app: &mut CourseApp, ctx: &Context) {
    let Some(session) = app.session.as_ref() else {
        app.state = AppState::Chapters;
        return;
    };
    if !session.quiz.active {
        app.state = AppState::Course;
        return;
    }

    let total = session.content.quiz.len();
    let position = session.quiz.current_question;
    let question = session.current_question().cloned();
    let selected = session.selected_answer();
    let last = session.is_last_question();
    let progress = session.quiz_position_percent() as f32 / 100.0;

    let mut picked = None;
    let mut advance = false;
    let mut leave = false;

    centered_panel(ctx, 360.0, 620.0, |ui| {
        let width = ui.available_width();
        ui.add(ProgressBar::new(progress).text(format!("{}/{}", (position + 1).min(total), total)));
        ui.add_space(12.0);

        match &question {
            Some(q) => {
                ui.heading(format!("Pregunta {}", position + 1));
                ui.add_space(6.0);
                ui.label(RichText::new(&q.question).size(16.0));
                ui.add_space(10.0);
                for (i, option) in q.options.iter().enumerate() {
                    if ui.radio(selected == Some(i), option).clicked() {
                        picked = Some(i);
                    }
                }
            }
            None => {
                ui.label(RichText::new("Este curso no tiene preguntas de práctica.").italics());
            }
        }

        ui.add_space(16.0);
        let next_label = if last || question.is_none() {
            "✅ Terminar quiz"
        } else {
            "Siguiente ▶"
        };
        ui.horizontal(|ui| {
            let w = (width - 8.0) / 2.0;
            leave = ui.add_sized([w, 36.0], Button::new("Volver al curso")).clicked();
            advance = ui
                .add_enabled(selected.is_some() || question.is_none(), Button::new(next_label).min_size([w, 36.0].into()))
                .clicked();
        });
    });

    if leave {
        app.state = AppState::Course;
        return;
    }
    let Some(session) = app.session.as_mut() else {
        return;
    };
    if let Some(option) = picked {
        let event = session.answer(option);
        app.notify(event);
    } else if advance {
        let event = session.advance_quiz();
        if !session.quiz.active {
            app.state = AppState::Course;
        }
        app.notify(event);
    }
}

use super::*;
use crate::app::completion::{mark_task_done, score_quiz};

impl LearningSession {
    /// Pone el vídeo como actual y lo marca visto; volver a elegirlo no cambia nada más.
    pub fn select_video(&mut self, index: usize) -> FlowEvent {
        if index >= self.content.lessons.len() {
            return FlowEvent::UnknownVideo { index };
        }

        let moved = self.progress.current_video != index;
        self.progress.current_video = index;
        let newly_completed = self.progress.mark_video_completed(index);
        let unlocked = newly_completed && self.try_unlock_quiz();

        if moved || newly_completed {
            self.guardar_progreso();
        }
        if unlocked {
            log::info!("{}: quiz desbloqueado", self.course_id);
            FlowEvent::AllVideosCompleted
        } else {
            FlowEvent::VideoSelected { index }
        }
    }

    pub fn start_quiz(&mut self) -> FlowEvent {
        if !self.progress.quiz_unlocked {
            return FlowEvent::QuizLocked;
        }
        self.quiz = QuizRun {
            active: true,
            current_question: 0,
            selected_answers: Vec::new(),
        };
        FlowEvent::QuizStarted
    }

    /// Respuesta a la pregunta actual; una segunda respuesta sustituye a la primera.
    pub fn answer(&mut self, option: usize) -> FlowEvent {
        if !self.quiz.active {
            return FlowEvent::NoActiveQuiz;
        }
        let current = self.quiz.current_question;
        if self.quiz.selected_answers.len() <= current {
            self.quiz.selected_answers.resize(current + 1, None);
        }
        self.quiz.selected_answers[current] = Some(option);
        FlowEvent::AnswerRecorded
    }

    pub fn selected_answer(&self) -> Option<usize> {
        self.quiz
            .selected_answers
            .get(self.quiz.current_question)
            .copied()
            .flatten()
    }

    /// Pasa a la siguiente pregunta; en la última termina y puntúa el quiz.
    pub fn advance_quiz(&mut self) -> FlowEvent {
        if !self.quiz.active {
            return FlowEvent::NoActiveQuiz;
        }
        let next = self.quiz.current_question + 1;
        if next < self.content.quiz.len() {
            self.quiz.current_question = next;
            return FlowEvent::NextQuestion { position: next };
        }
        self.finish_quiz()
    }

    fn finish_quiz(&mut self) -> FlowEvent {
        let score = score_quiz(&self.content.quiz, &self.quiz.selected_answers);
        self.progress.quiz_score = score;
        self.progress.quiz_completed = true;
        // las tareas se abren siempre, sin nota mínima
        self.progress.tasks_unlocked = true;
        self.quiz.active = false;
        self.guardar_progreso();

        log::info!("{}: quiz terminado con {score}%", self.course_id);
        FlowEvent::QuizFinished { score }
    }

    /// Abre las tareas sin hacer el quiz; no toca `quiz_completed` ni la nota.
    pub fn skip_quiz_to_tasks(&mut self) -> FlowEvent {
        self.quiz.active = false;
        if !self.progress.tasks_unlocked {
            self.progress.tasks_unlocked = true;
            self.guardar_progreso();
        }
        FlowEvent::QuizSkipped
    }

    /// Vuelve a empezar el quiz. La nota anterior se conserva hasta terminar de nuevo.
    pub fn retake_quiz(&mut self) -> FlowEvent {
        if !self.progress.quiz_unlocked {
            return FlowEvent::QuizLocked;
        }
        if self.progress.quiz_completed {
            self.progress.quiz_completed = false;
            self.guardar_progreso();
        }
        self.start_quiz()
    }

    pub fn complete_task(&mut self, task_id: &str) -> FlowEvent {
        if !self.has_task(task_id) {
            return FlowEvent::UnknownTask;
        }
        let event = mark_task_done(&mut self.progress, task_id);
        if event == FlowEvent::TaskCompleted {
            self.guardar_progreso();
        }
        event
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::testing::{content, session};
    use crate::progress::{KeyValueStore, MemoryStore};

    #[test]
    fn quiz_unlocks_exactly_once() {
        let memory = MemoryStore::new();
        let mut s = session(content(2, &[0], &[]), &memory);

        assert_eq!(s.select_video(0), FlowEvent::VideoSelected { index: 0 });
        assert!(!s.progress.quiz_unlocked);
        assert_eq!(s.select_video(1), FlowEvent::AllVideosCompleted);
        assert!(s.progress.quiz_unlocked);

        // volver a elegir vídeos ya vistos no repite el aviso
        assert_eq!(s.select_video(1), FlowEvent::VideoSelected { index: 1 });
        assert_eq!(s.select_video(0), FlowEvent::VideoSelected { index: 0 });
        assert_eq!(s.progress.completed_videos.len(), 2);
        assert_eq!(s.progress.current_video, 0);
    }

    #[test]
    fn out_of_range_video_is_ignored() {
        let memory = MemoryStore::new();
        let mut s = session(content(1, &[], &[]), &memory);
        assert_eq!(s.select_video(5), FlowEvent::UnknownVideo { index: 5 });
        assert!(s.progress.completed_videos.is_empty());
        assert!(memory.get("lms_progress_X").is_none());
    }

    #[test]
    fn quiz_is_locked_until_videos_are_done() {
        let memory = MemoryStore::new();
        let mut s = session(content(2, &[0], &[]), &memory);
        assert_eq!(s.start_quiz(), FlowEvent::QuizLocked);
        assert_eq!(s.answer(0), FlowEvent::NoActiveQuiz);
        assert_eq!(s.advance_quiz(), FlowEvent::NoActiveQuiz);
    }

    #[test]
    fn answers_overwrite_and_quiz_scores_on_last_question() {
        let memory = MemoryStore::new();
        let mut s = session(content(1, &[0, 1, 2, 0], &["t1"]), &memory);
        s.select_video(0);
        assert_eq!(s.start_quiz(), FlowEvent::QuizStarted);

        s.answer(2);
        s.answer(0);
        assert_eq!(s.selected_answer(), Some(0));
        assert_eq!(s.advance_quiz(), FlowEvent::NextQuestion { position: 1 });
        s.answer(1);
        s.advance_quiz();
        s.answer(2);
        s.advance_quiz();
        s.answer(1);
        assert_eq!(s.advance_quiz(), FlowEvent::QuizFinished { score: 75 });

        assert!(!s.quiz.active);
        assert!(s.progress.quiz_completed);
        assert!(s.progress.tasks_unlocked);
        assert_eq!(s.progress.quiz_score, 75);
    }

    #[test]
    fn low_score_still_unlocks_tasks() {
        let memory = MemoryStore::new();
        let mut s = session(content(1, &[0, 0], &["t1"]), &memory);
        s.select_video(0);
        s.start_quiz();
        s.advance_quiz();
        assert_eq!(s.advance_quiz(), FlowEvent::QuizFinished { score: 0 });
        assert!(s.progress.tasks_unlocked);
    }

    #[test]
    fn empty_quiz_finishes_with_zero() {
        let memory = MemoryStore::new();
        let mut s = session(content(1, &[], &[]), &memory);
        s.select_video(0);
        s.start_quiz();
        assert_eq!(s.advance_quiz(), FlowEvent::QuizFinished { score: 0 });
        assert!(s.progress.quiz_completed);
    }

    #[test]
    fn skip_only_unlocks_tasks() {
        let memory = MemoryStore::new();
        let mut s = session(content(1, &[0], &["t1"]), &memory);
        assert_eq!(s.skip_quiz_to_tasks(), FlowEvent::QuizSkipped);
        assert!(s.progress.tasks_unlocked);
        assert!(!s.progress.quiz_completed);
        assert!(!s.progress.quiz_unlocked);
        assert_eq!(s.progress.quiz_score, 0);
    }

    #[test]
    fn retake_keeps_previous_score_until_next_finish() {
        let memory = MemoryStore::new();
        let mut s = session(content(1, &[0, 0], &[]), &memory);
        s.select_video(0);
        s.start_quiz();
        s.answer(0);
        s.advance_quiz();
        s.answer(0);
        s.advance_quiz();
        assert_eq!(s.progress.quiz_score, 100);

        assert_eq!(s.retake_quiz(), FlowEvent::QuizStarted);
        assert!(!s.progress.quiz_completed);
        assert!(s.quiz.selected_answers.is_empty());
        assert_eq!(s.progress.quiz_score, 100);

        s.advance_quiz();
        assert_eq!(s.advance_quiz(), FlowEvent::QuizFinished { score: 0 });
        assert_eq!(s.progress.quiz_score, 0);
    }

    #[test]
    fn tasks_complete_once() {
        let memory = MemoryStore::new();
        let mut s = session(content(1, &[], &["t1", "t2"]), &memory);
        assert_eq!(s.complete_task("t1"), FlowEvent::TasksLocked);
        s.skip_quiz_to_tasks();
        assert_eq!(s.complete_task("t1"), FlowEvent::TaskCompleted);
        assert_eq!(s.complete_task("t1"), FlowEvent::TaskAlreadyCompleted);
        assert_eq!(s.complete_task("zz"), FlowEvent::UnknownTask);
        assert_eq!(s.progress.completed_tasks.len(), 1);
        assert!(s.is_task_completed("t1"));
    }

    #[test]
    fn course_x_flow_survives_reload() {
        let memory = MemoryStore::new();
        let mut s = session(content(3, &[1, 0], &["t1", "t2"]), &memory);

        s.select_video(0);
        s.select_video(2);
        assert_eq!(s.select_video(1), FlowEvent::AllVideosCompleted);
        s.start_quiz();
        s.answer(1);
        s.advance_quiz();
        s.answer(2);
        assert_eq!(s.advance_quiz(), FlowEvent::QuizFinished { score: 50 });
        assert_eq!(s.complete_task("t2"), FlowEvent::TaskCompleted);
        let before = s.progress.clone();

        // recarga: nueva sesión sobre el mismo almacén
        let reloaded = session(content(3, &[1, 0], &["t1", "t2"]), &memory);
        assert_eq!(reloaded.progress, before);
        assert_eq!(reloaded.progress.current_video, 1);
        assert!(reloaded.progress.quiz_unlocked);
        assert!(reloaded.progress.quiz_completed);
        assert_eq!(reloaded.progress.quiz_score, 50);
        assert!(reloaded.progress.tasks_unlocked);
        assert!(reloaded.is_task_completed("t2"));
        assert!(!reloaded.quiz.active);

        let raw = memory.get("lms_progress_X").expect("progreso guardado");
        assert!(raw.contains("\"quizScore\":50"));
    }

    #[test]
    fn course_x_two_lessons_one_question_one_task() {
        let memory = MemoryStore::new();
        let mut s = session(content(2, &[0], &["task-1"]), &memory);

        s.select_video(0);
        assert!(!s.progress.quiz_unlocked);
        assert_eq!(s.select_video(1), FlowEvent::AllVideosCompleted);
        assert_eq!(s.start_quiz(), FlowEvent::QuizStarted);
        s.answer(0);
        assert_eq!(s.advance_quiz(), FlowEvent::QuizFinished { score: 100 });
        assert_eq!(s.complete_task("task-1"), FlowEvent::TaskCompleted);

        let reloaded = session(content(2, &[0], &["task-1"]), &memory);
        let p = &reloaded.progress;
        assert_eq!(p.current_video, 1);
        assert_eq!(p.completed_videos, vec![0, 1]);
        assert!(p.quiz_unlocked);
        assert!(p.quiz_completed);
        assert_eq!(p.quiz_score, 100);
        assert!(p.tasks_unlocked);
        assert_eq!(p.completed_tasks.iter().collect::<Vec<_>>(), vec!["task-1"]);

        let raw = memory.get("lms_progress_X").expect("progreso guardado");
        assert!(raw.contains(r#""completedTasks":["task-1"]"#), "{raw}");
    }

    #[test]
    fn stored_videos_follow_watch_order() {
        let memory = MemoryStore::new();
        let mut s = session(content(3, &[], &[]), &memory);
        s.select_video(2);
        s.select_video(0);

        let raw = memory.get("lms_progress_X").expect("progreso guardado");
        assert!(raw.contains(r#""completedVideos":[2,0]"#), "{raw}");
    }
}

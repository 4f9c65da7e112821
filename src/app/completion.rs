use super::*;
use crate::model::QuizQuestion;

/// `round(100 × aciertos / total)`; sin preguntas la nota es 0.
pub fn score_quiz(questions: &[QuizQuestion], answers: &[Option<usize>]) -> u32 {
    let total = questions.len();
    if total == 0 {
        return 0;
    }
    let correct = questions
        .iter()
        .enumerate()
        .filter(|(i, q)| q.is_answered_correctly(answers.get(*i).copied().flatten()))
        .count();
    // redondeo al entero más cercano, .5 hacia arriba
    ((200 * correct + total) / (2 * total)) as u32
}

/// Marca la tarea como hecha; repetirla no cambia nada.
pub fn mark_task_done(progress: &mut CourseProgress, task_id: &str) -> FlowEvent {
    if !progress.tasks_unlocked {
        return FlowEvent::TasksLocked;
    }
    if progress.completed_tasks.insert(task_id.to_string()) {
        FlowEvent::TaskCompleted
    } else {
        FlowEvent::TaskAlreadyCompleted
    }
}

impl LearningSession {
    /// Vídeos completados que siguen existiendo en el curso.
    pub fn completed_lesson_count(&self) -> usize {
        let total = self.content.lessons.len();
        self.progress
            .completed_videos
            .iter()
            .filter(|&&i| i < total)
            .count()
    }

    pub fn all_videos_completed(&self) -> bool {
        !self.content.lessons.is_empty() && self.completed_lesson_count() == self.content.lessons.len()
    }

    pub fn is_video_completed(&self, index: usize) -> bool {
        self.progress.completed_videos.contains(&index)
    }

    pub fn is_task_completed(&self, task_id: &str) -> bool {
        self.progress.completed_tasks.contains(task_id)
    }

    pub fn has_task(&self, task_id: &str) -> bool {
        self.content.tasks.iter().any(|t| t.id == task_id)
    }

    /// Desbloquea el quiz la primera vez que se completan todos los vídeos.
    pub(crate) fn try_unlock_quiz(&mut self) -> bool {
        if self.progress.quiz_unlocked || !self.all_videos_completed() {
            return false;
        }
        self.progress.quiz_unlocked = true;
        true
    }
}

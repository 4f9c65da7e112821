use super::*;
use crate::model::QuizQuestion;
use crate::view_models::quiz_position_percent;

impl LearningSession {
    pub fn lesson_rows(&self) -> Vec<LessonRow> {
        self.content
            .lessons
            .iter()
            .enumerate()
            .map(|(i, lesson)| LessonRow {
                index: i,
                title: lesson.title.clone(),
                video_url: lesson.video_url.clone(),
                completed: self.is_video_completed(i),
                current: self.progress.current_video == i,
            })
            .collect()
    }

    pub fn task_rows(&self) -> Vec<TaskRow> {
        self.content
            .tasks
            .iter()
            .map(|task| TaskRow {
                id: task.id.clone(),
                title: task.title.clone(),
                description: task.description.clone(),
                kind: task.kind.clone(),
                completed: self.is_task_completed(&task.id),
            })
            .collect()
    }

    pub fn summary(&self) -> ProgressSummary {
        ProgressSummary {
            videos_done: self.completed_lesson_count(),
            videos_total: self.content.lessons.len(),
            tasks_done: self
                .content
                .tasks
                .iter()
                .filter(|t| self.is_task_completed(&t.id))
                .count(),
            tasks_total: self.content.tasks.len(),
            quiz_unlocked: self.progress.quiz_unlocked,
            quiz_completed: self.progress.quiz_completed,
            quiz_score: self.progress.quiz_score,
            tasks_unlocked: self.progress.tasks_unlocked,
        }
    }

    pub fn current_question(&self) -> Option<&QuizQuestion> {
        if !self.quiz.active {
            return None;
        }
        self.content.quiz.get(self.quiz.current_question)
    }

    pub fn quiz_position_percent(&self) -> u32 {
        quiz_position_percent(self.quiz.current_question, self.content.quiz.len())
    }

    pub fn is_last_question(&self) -> bool {
        self.quiz.current_question + 1 >= self.content.quiz.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::testing::{content, session};
    use crate::progress::MemoryStore;

    #[test]
    fn summary_counts_only_existing_items() {
        let memory = MemoryStore::new();
        let mut s = session(content(4, &[0, 0], &["t1", "t2"]), &memory);
        s.progress.completed_videos.push(9);
        s.select_video(1);
        s.skip_quiz_to_tasks();
        s.complete_task("t2");

        let summary = s.summary();
        assert_eq!(summary.videos_done, 1);
        assert_eq!(summary.video_percent(), 25);
        assert_eq!(summary.task_percent(), 50);
        assert!(summary.tasks_unlocked);

        let rows = s.lesson_rows();
        assert!(rows[1].completed && rows[1].current);
        assert!(!rows[0].completed);
        assert!(s.task_rows()[1].completed);
    }

    #[test]
    fn quiz_position_follows_current_question() {
        let memory = MemoryStore::new();
        let mut s = session(content(1, &[0, 0, 0, 0], &[]), &memory);
        assert!(s.current_question().is_none());
        s.select_video(0);
        s.start_quiz();
        assert_eq!(s.quiz_position_percent(), 25);
        s.advance_quiz();
        assert_eq!(s.current_question().map(|q| q.id.as_str()), Some("q1"));
        assert_eq!(s.quiz_position_percent(), 50);
        assert!(!s.is_last_question());
    }
}

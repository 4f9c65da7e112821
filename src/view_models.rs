// src/view_models.rs

/// Porcentaje entero `done/total`; 0 si no hay nada que hacer.
pub fn percent(done: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (done.min(total) * 100 / total) as u32
}

/// Posición en el quiz: `((actual + 1) / max(1, total)) × 100`.
pub fn quiz_position_percent(current: usize, total: usize) -> u32 {
    ((current + 1) * 100 / total.max(1)).min(100) as u32
}

#[derive(Clone, Debug)]
pub struct LessonRow {
    pub index: usize,       // posición 0-based en la lista ordenada
    pub title: String,
    pub video_url: String,
    pub completed: bool,
    pub current: bool,
}

#[derive(Clone, Debug)]
pub struct TaskRow {
    pub id: String,
    pub title: String,
    pub description: String,
    pub kind: String,
    pub completed: bool,
}

#[derive(Clone, Debug, Default)]
pub struct ProgressSummary {
    pub videos_done: usize,
    pub videos_total: usize,
    pub tasks_done: usize,
    pub tasks_total: usize,
    pub quiz_unlocked: bool,
    pub quiz_completed: bool,
    pub quiz_score: u32,
    pub tasks_unlocked: bool,
}

impl LessonRow {
    pub fn label(&self) -> String {
        let mark = if self.completed { "✅" } else { "▶" };
        let here = if self.current { "  ⬅" } else { "" };
        format!("{mark} {}. {}{here}", self.index + 1, self.title)
    }
}

impl TaskRow {
    pub fn label(&self) -> String {
        let kind = if self.kind.is_empty() {
            String::new()
        } else {
            format!(" [{}]", self.kind)
        };
        if self.completed {
            format!("✅ {}{kind}", self.title)
        } else {
            format!("📝 {}{kind}", self.title)
        }
    }
}

impl ProgressSummary {
    pub fn video_percent(&self) -> u32 {
        percent(self.videos_done, self.videos_total)
    }

    pub fn task_percent(&self) -> u32 {
        percent(self.tasks_done, self.tasks_total)
    }

    pub fn videos_label(&self) -> String {
        format!("Vídeos {}/{}", self.videos_done, self.videos_total)
    }

    pub fn tasks_label(&self) -> String {
        format!("Tareas {}/{}", self.tasks_done, self.tasks_total)
    }

    pub fn quiz_label(&self) -> String {
        if self.quiz_completed {
            format!("Quiz ✅ {}%", self.quiz_score)
        } else if self.quiz_unlocked {
            "Quiz 🔓".to_string()
        } else {
            "Quiz 🔒".to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentages_handle_empty_totals() {
        assert_eq!(percent(0, 0), 0);
        assert_eq!(percent(1, 3), 33);
        assert_eq!(percent(5, 4), 100);
        assert_eq!(quiz_position_percent(0, 0), 100);
        assert_eq!(quiz_position_percent(0, 4), 25);
        assert_eq!(quiz_position_percent(3, 4), 100);
    }

    #[test]
    fn labels_reflect_state() {
        let summary = ProgressSummary {
            videos_done: 2,
            videos_total: 3,
            quiz_unlocked: true,
            ..ProgressSummary::default()
        };
        assert_eq!(summary.videos_label(), "Vídeos 2/3");
        assert_eq!(summary.quiz_label(), "Quiz 🔓");

        let row = TaskRow {
            id: "t1".into(),
            title: "Informe".into(),
            description: String::new(),
            kind: "lab".into(),
            completed: true,
        };
        assert_eq!(row.label(), "✅ Informe [lab]");
    }
}

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: String,
    pub title: String,
    pub description: String,
}

/// Ficha ampliada de un curso (hoja de descripciones).
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CourseDetails {
    pub course_id: String,
    pub title: String,
    pub overview: String,
    pub curriculum: String,
    pub duration: String,
    pub image_url: String,
    pub instructor: String,
    pub prerequisites: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    pub raw_course_id: String, // texto original de la hoja
    pub course_id: String,     // normalizado con `normalize_id`
    pub chapter_id: String,    // nunca vacío
    pub title: String,
    pub description: String,
    pub order: i64,
    pub image_url: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub course_id: String,
    pub id: String,
    pub title: String,
    pub description: String,
    pub order: i64,
    pub video_url: String, // ya en forma embebible
    pub image_url: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    pub course_id: String,
    pub chapter_id: String,
    pub lesson_id: String,
    pub topic_id: String,
    pub title: String,
    pub description: String,
    pub video_url: String,
    pub order: i64,
    pub image_url: String,
    pub sub_topics: String,
    pub tasks: String,
    pub hours: i64,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub course_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub topic_id: String,
    pub id: String,
    pub question: String,
    pub options: Vec<String>,
    pub correct: i64, // índice 0-based; fuera de rango nunca puntúa
}

impl QuizQuestion {
    /// `true` solo si hay respuesta, es una opción existente y coincide con `correct`.
    pub fn is_answered_correctly(&self, selected: Option<usize>) -> bool {
        match selected {
            Some(idx) if idx < self.options.len() => {
                i64::try_from(idx).is_ok_and(|idx| idx == self.correct)
            }
            _ => false,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub course_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub topic_id: String,
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    CourseSelect,
    Chapters,
    Course,
    Quiz,
    Workspace,
}

impl Default for AppState {
    fn default() -> Self {
        AppState::CourseSelect
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_correct_never_scores() {
        let mut q = QuizQuestion {
            options: vec!["a".into(), "b".into()],
            correct: 1,
            ..QuizQuestion::default()
        };
        assert!(q.is_answered_correctly(Some(1)));
        assert!(!q.is_answered_correctly(Some(0)));
        assert!(!q.is_answered_correctly(None));

        q.correct = 5;
        assert!(!q.is_answered_correctly(Some(5)));
        q.correct = -1;
        assert!(!q.is_answered_correctly(Some(0)));
    }
}

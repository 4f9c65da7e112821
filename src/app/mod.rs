use crate::loader::CourseContent;
use crate::progress::{CourseProgress, ProgressStore};

// Submódulos
pub mod actions;
pub mod completion;
pub mod view_models;
pub mod workspace;

// Re-export de view models
pub use crate::view_models::{LessonRow, ProgressSummary, TaskRow};
pub use workspace::WorkspaceSession;

/// Resultado de una acción del alumno; la UI lo convierte en aviso.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FlowEvent {
    VideoSelected { index: usize },
    AllVideosCompleted,
    UnknownVideo { index: usize },
    QuizLocked,
    QuizStarted,
    AnswerRecorded,
    NoActiveQuiz,
    NextQuestion { position: usize },
    QuizFinished { score: u32 },
    QuizSkipped,
    TasksLocked,
    UnknownTask,
    TaskCompleted,
    TaskAlreadyCompleted,
}

impl FlowEvent {
    /// Texto de la notificación, si la acción merece una.
    pub fn notice(&self) -> Option<String> {
        let text = match self {
            FlowEvent::AllVideosCompleted => {
                "🎉 ¡Todos los vídeos completados! Quiz de práctica desbloqueado.".to_string()
            }
            FlowEvent::UnknownVideo { index } => format!("⚠ El vídeo {} no existe.", index + 1),
            FlowEvent::QuizLocked => "🔒 Mira todos los vídeos para desbloquear el quiz.".into(),
            FlowEvent::NoActiveQuiz => "⚠ No hay ningún quiz en curso.".into(),
            FlowEvent::QuizFinished { score } => {
                format!("✅ Quiz completado. Puntuación: {score}%. Tareas desbloqueadas.")
            }
            FlowEvent::QuizSkipped => "⏩ Quiz saltado. Tareas desbloqueadas.".into(),
            FlowEvent::TasksLocked => "🔒 Termina o salta el quiz para desbloquear las tareas.".into(),
            FlowEvent::UnknownTask => "⚠ Esa tarea no pertenece a este curso.".into(),
            FlowEvent::TaskCompleted => "✅ Tarea completada.".into(),
            FlowEvent::TaskAlreadyCompleted => "ℹ Esta tarea ya estaba completada.".into(),
            FlowEvent::VideoSelected { .. }
            | FlowEvent::QuizStarted
            | FlowEvent::AnswerRecorded
            | FlowEvent::NextQuestion { .. } => return None,
        };
        Some(text)
    }
}

/// Estado efímero del quiz: no se persiste, se reinicia al empezar.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QuizRun {
    pub active: bool,
    pub current_question: usize,
    pub selected_answers: Vec<Option<usize>>,
}

/// Sesión de aprendizaje de un curso: contenido cargado + máquina de progreso.
pub struct LearningSession {
    pub course_id: String,
    pub content: CourseContent,
    pub progress: CourseProgress,
    pub quiz: QuizRun,
    store: Box<dyn ProgressStore>,
}

impl LearningSession {
    /// Abre la sesión leyendo el progreso guardado (o uno vacío la primera vez).
    pub fn new(course_id: &str, content: CourseContent, store: Box<dyn ProgressStore>) -> Self {
        let progress = store.load(course_id);
        log::debug!("progreso de {course_id}: {progress:?}");
        Self {
            course_id: course_id.to_string(),
            content,
            progress,
            quiz: QuizRun::default(),
            store,
        }
    }

    /// Devuelve el almacén, p. ej. para reabrir el mismo curso tras una recarga.
    pub fn into_store(self) -> Box<dyn ProgressStore> {
        self.store
    }

    /// Vuelve a leer el progreso guardado (otra pantalla pudo escribirlo).
    pub fn reload_progress(&mut self) {
        self.progress = self.store.load(&self.course_id);
    }

    pub(crate) fn guardar_progreso(&mut self) {
        if let Err(err) = self.store.save(&self.course_id, &self.progress) {
            log::warn!("no se pudo guardar el progreso de {}: {err}", self.course_id);
        }
    }
}

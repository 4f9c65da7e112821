mod helpers;
pub mod layout;
pub mod loading;
pub mod views;

use crate::app::{FlowEvent, LearningSession, WorkspaceSession};
use crate::data::SheetConfig;
use crate::fetch::{CancelToken, HttpFetcher};
use crate::loader::{CourseContent, LoadStatus, TaskWorkspace};
use crate::model::{AppState, Chapter, CourseDetails, Topic};
use crate::progress::{JsonFileStore, KeyedProgressStore, ProgressStore};
use eframe::{APP_KEY, App, CreationContext, Frame, get_value, set_value};
use egui::Context;
use layout::{bottom_panel, top_panel};
use loading::Loaded;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender, channel};
use std::time::Duration;

/// Lo que sobrevive entre ejecuciones (vía almacenamiento de eframe).
#[derive(Serialize, Deserialize, Default, Clone, Debug)]
pub struct Remembered {
    pub last_course: String,
}

/// Temas cargados para una lección concreta.
pub struct TopicsPanel {
    pub lesson_id: String,
    pub status: LoadStatus<Vec<Topic>>,
}

pub struct CourseApp {
    pub config: SheetConfig,
    pub state: AppState,
    pub remembered: Remembered,
    pub course_input: String,
    pub task_input: String,
    pub message: String,

    pub course_status: Option<LoadStatus<CourseContent>>,
    pub session: Option<LearningSession>,
    pub chapters: LoadStatus<Vec<Chapter>>,
    pub details: LoadStatus<CourseDetails>,
    pub topics: Option<TopicsPanel>,
    pub workspace_status: Option<LoadStatus<TaskWorkspace>>,
    pub workspace: Option<WorkspaceSession>,

    fetcher: Arc<HttpFetcher>,
    course_cancel: CancelToken,
    topics_cancel: CancelToken,
    workspace_cancel: CancelToken,
    tx: Sender<Loaded>,
    rx: Receiver<Loaded>,
}

impl CourseApp {
    pub fn new(cc: &CreationContext<'_>, config: SheetConfig) -> Self {
        let remembered: Remembered = cc
            .storage
            .and_then(|storage| get_value(storage, APP_KEY))
            .unwrap_or_default();
        Self::with_remembered(config, remembered)
    }

    pub fn with_remembered(config: SheetConfig, remembered: Remembered) -> Self {
        let course_input = if remembered.last_course.is_empty() {
            config.default_course.clone()
        } else {
            remembered.last_course.clone()
        };
        let (tx, rx) = channel();
        Self {
            config,
            state: AppState::CourseSelect,
            remembered,
            course_input,
            task_input: String::new(),
            message: String::new(),
            course_status: None,
            session: None,
            chapters: LoadStatus::Loading,
            details: LoadStatus::Loading,
            topics: None,
            workspace_status: None,
            workspace: None,
            fetcher: Arc::new(HttpFetcher::new()),
            course_cancel: CancelToken::new(),
            topics_cancel: CancelToken::new(),
            workspace_cancel: CancelToken::new(),
            tx,
            rx,
        }
    }

    /// Un almacén nuevo sobre la carpeta de progreso configurada.
    pub fn progress_store(&self) -> Box<dyn ProgressStore> {
        Box::new(KeyedProgressStore::new(
            self.config.storage_namespace.clone(),
            JsonFileStore::new(self.config.data_dir.clone()),
        ))
    }

    pub fn current_course_id(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.course_id.as_str())
    }

    /// Convierte el resultado de una acción en el aviso de la barra inferior.
    pub fn notify(&mut self, event: FlowEvent) {
        if let Some(text) = event.notice() {
            self.message = text;
        }
    }

    pub fn volver_al_curso(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.reload_progress();
            self.state = if session.quiz.active {
                AppState::Quiz
            } else {
                AppState::Course
            };
        }
    }

    fn is_loading(&self) -> bool {
        self.course_status.as_ref().is_some_and(LoadStatus::is_loading)
            || self.chapters.is_loading()
            || self.topics.as_ref().is_some_and(|t| t.status.is_loading())
            || self.workspace_status.as_ref().is_some_and(LoadStatus::is_loading)
    }
}

impl App for CourseApp {
    fn update(&mut self, ctx: &Context, _frame: &mut Frame) {
        self.poll_loads();

        if self.state != AppState::CourseSelect {
            top_panel(self, ctx);
        }
        bottom_panel(self, ctx);

        match self.state {
            AppState::CourseSelect => views::course_select::ui_course_select(self, ctx),
            AppState::Chapters => views::chapters::ui_chapters(self, ctx),
            AppState::Course => views::course::ui_course(self, ctx),
            AppState::Quiz => views::quiz::ui_quiz(self, ctx),
            AppState::Workspace => views::workspace::ui_workspace(self, ctx),
        }

        if self.is_loading() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        set_value(storage, APP_KEY, &self.remembered);
    }
}

// Cargas en segundo plano: un hilo por hoja/pantalla, resultado por canal.
use super::*;
use crate::fetch::SheetFetcher;
use crate::loader::{load_chapters, load_course, load_course_details, load_topics, load_workspace};

pub enum Loaded {
    Course(String, LoadStatus<CourseContent>),
    Chapters(LoadStatus<Vec<Chapter>>),
    Details(LoadStatus<CourseDetails>),
    Topics(String, LoadStatus<Vec<Topic>>),
    Workspace(LoadStatus<TaskWorkspace>),
}

impl CourseApp {
    fn spawn_load<F>(&self, cancel: &CancelToken, job: F)
    where
        F: FnOnce(&dyn SheetFetcher, &SheetConfig, &CancelToken) -> Option<Loaded> + Send + 'static,
    {
        let fetcher = Arc::clone(&self.fetcher);
        let config = self.config.clone();
        let cancel = cancel.clone();
        let tx = self.tx.clone();
        std::thread::spawn(move || {
            if let Some(loaded) = job(fetcher.as_ref(), &config, &cancel) {
                if !cancel.is_cancelled() {
                    let _ = tx.send(loaded);
                }
            }
        });
    }

    /// Abre un curso: capítulos, ficha y contenido se piden a la vez.
    pub fn open_course(&mut self, course_id: &str) {
        let course_id = course_id.trim().to_string();
        if course_id.is_empty() {
            self.message = "⚠ Escribe el id de un curso.".into();
            return;
        }

        self.course_cancel.cancel();
        self.topics_cancel.cancel();
        self.course_cancel = CancelToken::new();

        self.session = None;
        self.topics = None;
        self.course_status = Some(LoadStatus::Loading);
        self.chapters = LoadStatus::Loading;
        self.details = LoadStatus::Loading;
        self.message.clear();
        self.remembered.last_course = course_id.clone();
        self.state = AppState::Chapters;

        let id = course_id.clone();
        self.spawn_load(&self.course_cancel, move |f, cfg, cancel| {
            load_course(f, cfg, &id, cancel).map(|status| Loaded::Course(id, status))
        });
        let id = course_id.clone();
        self.spawn_load(&self.course_cancel, move |f, cfg, cancel| {
            load_chapters(f, cfg, &id, cancel).map(Loaded::Chapters)
        });
        self.spawn_load(&self.course_cancel, move |f, cfg, cancel| {
            load_course_details(f, cfg, &course_id, cancel).map(Loaded::Details)
        });
    }

    pub fn open_topics(&mut self, lesson_id: &str) {
        self.topics_cancel.cancel();
        self.topics_cancel = CancelToken::new();
        self.topics = Some(TopicsPanel {
            lesson_id: lesson_id.to_string(),
            status: LoadStatus::Loading,
        });

        let id = lesson_id.to_string();
        self.spawn_load(&self.topics_cancel, move |f, cfg, cancel| {
            load_topics(f, cfg, &id, cancel).map(|status| Loaded::Topics(id, status))
        });
    }

    pub fn open_workspace(&mut self, course_id: &str, task_id: Option<&str>) {
        self.workspace_cancel.cancel();
        self.workspace_cancel = CancelToken::new();
        self.workspace = None;
        self.workspace_status = Some(LoadStatus::Loading);
        self.state = AppState::Workspace;

        let course_id = course_id.to_string();
        let task_id = task_id.map(str::to_string);
        self.spawn_load(&self.workspace_cancel, move |f, cfg, cancel| {
            load_workspace(f, cfg, &course_id, task_id.as_deref(), cancel).map(Loaded::Workspace)
        });
    }

    pub(crate) fn poll_loads(&mut self) {
        while let Ok(loaded) = self.rx.try_recv() {
            self.apply_loaded(loaded);
        }
    }

    fn apply_loaded(&mut self, loaded: Loaded) {
        match loaded {
            Loaded::Course(course_id, status) => {
                // resultado de un curso que ya no es el activo
                if self.remembered.last_course != course_id {
                    return;
                }
                match status {
                    LoadStatus::Ready(content) => {
                        let store = self.progress_store();
                        self.session = Some(LearningSession::new(&course_id, content, store));
                        self.course_status = None;
                    }
                    other => self.course_status = Some(other),
                }
            }
            Loaded::Chapters(status) => self.chapters = status,
            Loaded::Details(status) => self.details = status,
            Loaded::Topics(lesson_id, status) => {
                if let Some(panel) = self.topics.as_mut().filter(|p| p.lesson_id == lesson_id) {
                    panel.status = status;
                }
            }
            Loaded::Workspace(status) => match status {
                LoadStatus::Ready(workspace) => {
                    let store = self.progress_store();
                    self.workspace = Some(WorkspaceSession::new(workspace, store));
                    self.workspace_status = None;
                }
                other => self.workspace_status = Some(other),
            },
        }
    }
}

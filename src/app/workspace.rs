use super::*;
use crate::app::completion::mark_task_done;
use crate::loader::TaskWorkspace;
use crate::model::Task;

/// Espacio de trabajo de tareas: comparte el registro de progreso con la sesión del curso.
pub struct WorkspaceSession {
    pub workspace: TaskWorkspace,
    pub progress: CourseProgress,
    store: Box<dyn ProgressStore>,
}

impl WorkspaceSession {
    pub fn new(workspace: TaskWorkspace, store: Box<dyn ProgressStore>) -> Self {
        let progress = store.load(&workspace.course_id);
        Self {
            workspace,
            progress,
            store,
        }
    }

    pub fn into_store(self) -> Box<dyn ProgressStore> {
        self.store
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.workspace.selected_task()
    }

    pub fn select(&mut self, index: usize) {
        if index < self.workspace.tasks.len() {
            self.workspace.selected = Some(index);
        }
    }

    pub fn is_completed(&self, task_id: &str) -> bool {
        self.progress.completed_tasks.contains(task_id)
    }

    pub fn complete_selected(&mut self) -> FlowEvent {
        let Some(task_id) = self.selected_task().map(|t| t.id.clone()) else {
            return FlowEvent::UnknownTask;
        };
        let event = mark_task_done(&mut self.progress, &task_id);
        if event == FlowEvent::TaskCompleted {
            if let Err(err) = self.store.save(&self.workspace.course_id, &self.progress) {
                log::warn!(
                    "no se pudo guardar el progreso de {}: {err}",
                    self.workspace.course_id
                );
            }
        }
        event
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::testing::{content, session};
    use crate::loader::build_workspace;
    use crate::progress::{KeyedProgressStore, MemoryStore};

    const TASKS: &str = "courseId,id,title\nX,t1,Uno\nX,t2,Dos\n";

    fn open(memory: &MemoryStore, task: Option<&str>) -> WorkspaceSession {
        let store = KeyedProgressStore::new("lms_progress", memory.clone());
        WorkspaceSession::new(build_workspace("X", TASKS, task), Box::new(store))
    }

    #[test]
    fn workspace_writes_into_course_progress() {
        let memory = MemoryStore::new();
        let mut course = session(content(1, &[], &["t1", "t2"]), &memory);
        course.skip_quiz_to_tasks();

        let mut ws = open(&memory, Some("t2"));
        assert_eq!(ws.complete_selected(), FlowEvent::TaskCompleted);
        assert_eq!(ws.complete_selected(), FlowEvent::TaskAlreadyCompleted);

        let reopened = session(content(1, &[], &["t1", "t2"]), &memory);
        assert!(reopened.is_task_completed("t2"));
        assert!(!reopened.is_task_completed("t1"));

        assert!(!course.is_task_completed("t2"));
        course.reload_progress();
        assert!(course.is_task_completed("t2"));
    }

    #[test]
    fn locked_or_missing_task_does_nothing() {
        let memory = MemoryStore::new();
        let mut ws = open(&memory, Some("t1"));
        assert_eq!(ws.complete_selected(), FlowEvent::TasksLocked);

        let mut ws = open(&memory, Some("nope"));
        assert_eq!(ws.complete_selected(), FlowEvent::UnknownTask);
        ws.select(1);
        assert_eq!(ws.selected_task().map(|t| t.id.as_str()), Some("t2"));
        ws.select(7);
        assert_eq!(ws.workspace.selected, Some(1));
    }
}

// src/loader.rs
//! Cargas completas por pantalla: descarga, parseo, mapeo y filtrado por id.
//!
//! Todas devuelven `None` si la carga se canceló; si no, un `LoadStatus` que la UI
//! muestra tal cual. Ningún error de ingesta sale de aquí.

use crate::data::SheetConfig;
use crate::fetch::{CancelToken, SheetFetcher, SheetText, fetch_all};
use crate::model::{Chapter, Course, CourseDetails, Lesson, QuizQuestion, Task, Topic};
use crate::sheets::records::{
    map_chapters, map_course_details, map_courses, map_lessons, map_quiz, map_tasks, map_topics,
};
use crate::sheets::{CsvMode, MatchMode, Table};

// Las hojas del curso y de temas se leen línea a línea; capítulos y fichas con el lector completo.
const COURSE_SHEETS_MODE: CsvMode = CsvMode::PerLine;
const TOPICS_MODE: CsvMode = CsvMode::PerLine;
const CHAPTERS_MODE: CsvMode = CsvMode::Strict;
const DETAILS_MODE: CsvMode = CsvMode::Strict;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadStatus<T> {
    Loading,
    Failed(String),
    NotFound,
    Ready(T),
}

/// Textos de estado propios de cada tipo de carga.
pub trait Loadable {
    const LOADING: &'static str;
    const NOT_FOUND: &'static str;
}

impl<T: Loadable> LoadStatus<T> {
    /// Texto a mostrar en lugar del contenido; `None` cuando ya está listo.
    pub fn indicator(&self) -> Option<String> {
        match self {
            LoadStatus::Loading => Some(T::LOADING.to_string()),
            LoadStatus::Failed(msg) => Some(format!("Error: {msg}")),
            LoadStatus::NotFound => Some(T::NOT_FOUND.to_string()),
            LoadStatus::Ready(_) => None,
        }
    }
}

impl<T> LoadStatus<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            LoadStatus::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, LoadStatus::Loading)
    }
}

/// Todo lo que necesita la pantalla de aprendizaje de un curso.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CourseContent {
    pub course: Course,
    pub lessons: Vec<Lesson>,
    pub quiz: Vec<QuizQuestion>,
    pub tasks: Vec<Task>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TaskWorkspace {
    pub course_id: String,
    pub tasks: Vec<Task>,
    pub selected: Option<usize>,
}

impl TaskWorkspace {
    pub fn selected_task(&self) -> Option<&Task> {
        self.selected.and_then(|i| self.tasks.get(i))
    }
}

impl Loadable for CourseContent {
    const LOADING: &'static str = "Cargando curso…";
    const NOT_FOUND: &'static str = "Curso no encontrado.";
}

impl Loadable for Vec<Chapter> {
    const LOADING: &'static str = "Cargando capítulos…";
    const NOT_FOUND: &'static str = "No hay capítulos para este curso.";
}

impl Loadable for Vec<Topic> {
    const LOADING: &'static str = "Cargando temas…";
    const NOT_FOUND: &'static str = "No hay temas para esta lección.";
}

impl Loadable for CourseDetails {
    const LOADING: &'static str = "Cargando ficha del curso…";
    const NOT_FOUND: &'static str = "No hay detalles disponibles para este curso.";
}

impl Loadable for TaskWorkspace {
    const LOADING: &'static str = "Cargando tareas…";
    const NOT_FOUND: &'static str = "No hay tareas para este curso.";
}

fn log_table(name: &str, table: &Table) {
    log::debug!("{name}: cabeceras {:?}", table.headers);
    log::debug!(
        "{name}: {} filas, muestra {:?}",
        table.rows.len(),
        table.rows.iter().take(3).collect::<Vec<_>>()
    );
}

fn parse_sheet(name: &str, sheet: &SheetText, mode: CsvMode) -> Table {
    let table = Table::parse(sheet.text(), mode);
    log_table(name, &table);
    table
}

/// Parte pura de la carga del curso: recibe el texto de las cuatro hojas.
pub fn build_course_content(
    course_id: &str,
    courses_csv: &str,
    lessons_csv: &str,
    quiz_csv: &str,
    tasks_csv: &str,
) -> Option<CourseContent> {
    let by_course = |record_course: &str| MatchMode::Strict.matches(course_id, record_course);

    let course = map_courses(&Table::parse(courses_csv, COURSE_SHEETS_MODE))
        .into_iter()
        .find(|c| by_course(&c.id))?;

    let mut lessons: Vec<Lesson> = map_lessons(&Table::parse(lessons_csv, COURSE_SHEETS_MODE))
        .into_iter()
        .filter(|l| by_course(&l.course_id))
        .collect();
    lessons.sort_by_key(|l| l.order);

    let quiz = map_quiz(&Table::parse(quiz_csv, COURSE_SHEETS_MODE))
        .into_iter()
        .filter(|q| by_course(&q.course_id))
        .collect();

    let tasks = map_tasks(&Table::parse(tasks_csv, COURSE_SHEETS_MODE))
        .into_iter()
        .filter(|t| by_course(&t.course_id))
        .collect();

    Some(CourseContent {
        course,
        lessons,
        quiz,
        tasks,
    })
}

pub fn load_course(
    fetcher: &dyn SheetFetcher,
    config: &SheetConfig,
    course_id: &str,
    cancel: &CancelToken,
) -> Option<LoadStatus<CourseContent>> {
    let urls = [
        config.courses.as_str(),
        config.lessons.as_str(),
        config.quizzes.as_str(),
        config.tasks.as_str(),
    ];
    let sheets = fetch_all(fetcher, &urls, cancel)?;

    if sheets.iter().all(SheetText::is_failed) {
        return Some(LoadStatus::Failed(
            "no se pudieron descargar las hojas del curso".into(),
        ));
    }

    let names = ["cursos", "lecciones", "quiz", "tareas"];
    for (name, sheet) in names.iter().zip(&sheets) {
        log::debug!("{name}: {} bytes", sheet.text().len());
    }

    let status = match build_course_content(
        course_id,
        sheets[0].text(),
        sheets[1].text(),
        sheets[2].text(),
        sheets[3].text(),
    ) {
        Some(content) => {
            log::info!(
                "curso {course_id}: {} lecciones, {} preguntas, {} tareas",
                content.lessons.len(),
                content.quiz.len(),
                content.tasks.len()
            );
            LoadStatus::Ready(content)
        }
        None => {
            log::info!("curso {course_id} no encontrado");
            LoadStatus::NotFound
        }
    };
    Some(status)
}

/// Descarga una sola hoja respetando la cancelación.
fn fetch_single(
    fetcher: &dyn SheetFetcher,
    url: &str,
    cancel: &CancelToken,
) -> Option<SheetText> {
    fetch_all(fetcher, &[url], cancel)?.into_iter().next()
}

pub fn filter_chapters(chapters: Vec<Chapter>, course_id: &str) -> Vec<Chapter> {
    let mut matched: Vec<Chapter> = chapters
        .into_iter()
        .filter(|ch| {
            MatchMode::Forgiving.matches(course_id, &ch.course_id)
                || MatchMode::Forgiving.matches(course_id, &ch.raw_course_id)
        })
        .collect();
    matched.sort_by_key(|ch| ch.order);
    matched
}

pub fn load_chapters(
    fetcher: &dyn SheetFetcher,
    config: &SheetConfig,
    course_id: &str,
    cancel: &CancelToken,
) -> Option<LoadStatus<Vec<Chapter>>> {
    let sheet = fetch_single(fetcher, &config.chapters, cancel)?;
    if sheet.is_failed() {
        return Some(LoadStatus::Failed("no se pudo descargar la hoja de capítulos".into()));
    }

    let table = parse_sheet("capítulos", &sheet, CHAPTERS_MODE);
    let chapters = filter_chapters(map_chapters(&table), course_id);
    log::info!("curso {course_id}: {} capítulos", chapters.len());

    Some(if chapters.is_empty() {
        LoadStatus::NotFound
    } else {
        LoadStatus::Ready(chapters)
    })
}

/// Temas de una lección, ordenados por `order`.
pub fn topics_for_lesson(topics: Vec<Topic>, lesson_id: &str) -> Vec<Topic> {
    let mut matched: Vec<Topic> = topics
        .into_iter()
        .filter(|t| MatchMode::Loose.matches(lesson_id, &t.lesson_id))
        .collect();
    matched.sort_by_key(|t| t.order);
    matched
}

pub fn load_topics(
    fetcher: &dyn SheetFetcher,
    config: &SheetConfig,
    lesson_id: &str,
    cancel: &CancelToken,
) -> Option<LoadStatus<Vec<Topic>>> {
    let sheet = fetch_single(fetcher, &config.topics, cancel)?;
    if sheet.is_failed() {
        return Some(LoadStatus::Failed("no se pudo descargar la hoja de temas".into()));
    }

    let table = parse_sheet("temas", &sheet, TOPICS_MODE);
    let topics = topics_for_lesson(map_topics(&table), lesson_id);

    Some(if topics.is_empty() {
        LoadStatus::NotFound
    } else {
        LoadStatus::Ready(topics)
    })
}

pub fn load_course_details(
    fetcher: &dyn SheetFetcher,
    config: &SheetConfig,
    course_id: &str,
    cancel: &CancelToken,
) -> Option<LoadStatus<CourseDetails>> {
    let sheet = fetch_single(fetcher, &config.course_details, cancel)?;
    if sheet.is_failed() {
        return Some(LoadStatus::Failed("no se pudo descargar la ficha del curso".into()));
    }

    let table = parse_sheet("fichas", &sheet, DETAILS_MODE);
    let wanted = course_id.trim();
    let details = map_course_details(&table)
        .into_iter()
        .find(|d| d.course_id.trim() == wanted);

    Some(match details {
        Some(details) => LoadStatus::Ready(details),
        None => LoadStatus::NotFound,
    })
}

pub fn build_workspace(course_id: &str, tasks_csv: &str, task_id: Option<&str>) -> TaskWorkspace {
    let tasks: Vec<Task> = map_tasks(&Table::parse(tasks_csv, COURSE_SHEETS_MODE))
        .into_iter()
        .filter(|t| MatchMode::Strict.matches(course_id, &t.course_id))
        .collect();
    let selected = match task_id {
        Some(id) => tasks.iter().position(|t| t.id == id),
        None if tasks.is_empty() => None,
        None => Some(0),
    };
    TaskWorkspace {
        course_id: course_id.to_string(),
        tasks,
        selected,
    }
}

pub fn load_workspace(
    fetcher: &dyn SheetFetcher,
    config: &SheetConfig,
    course_id: &str,
    task_id: Option<&str>,
    cancel: &CancelToken,
) -> Option<LoadStatus<TaskWorkspace>> {
    let sheet = fetch_single(fetcher, &config.tasks, cancel)?;
    if sheet.is_failed() {
        return Some(LoadStatus::Failed("no se pudo descargar la hoja de tareas".into()));
    }

    let workspace = build_workspace(course_id, sheet.text(), task_id);
    if let Some(id) = task_id {
        if workspace.selected.is_none() {
            log::warn!("tarea {id} no existe en el curso {course_id}");
        }
    }

    Some(if workspace.tasks.is_empty() {
        LoadStatus::NotFound
    } else {
        LoadStatus::Ready(workspace)
    })
}

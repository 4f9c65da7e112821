// src/progress.rs
//! Progreso por curso y su almacenamiento clave-valor.
//!
//! El registro se guarda como JSON con las mismas claves camelCase en cualquier
//! almacén, así un progreso escrito por una versión anterior se sigue leyendo.

use serde::{Deserialize, Deserializer, Serialize};
use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::rc::Rc;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("error de E/S en {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("no se pudo serializar el progreso: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct CourseProgress {
    pub current_video: usize,
    /// En el orden en que se vieron, sin repetidos.
    #[serde(deserialize_with = "unique_in_order")]
    pub completed_videos: Vec<usize>,
    pub quiz_unlocked: bool,
    pub quiz_completed: bool,
    pub quiz_score: u32,
    pub tasks_unlocked: bool,
    pub completed_tasks: BTreeSet<String>,
}

fn unique_in_order<'de, D>(deserializer: D) -> Result<Vec<usize>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<usize>::deserialize(deserializer)?;
    let mut seen = Vec::with_capacity(raw.len());
    for index in raw {
        if !seen.contains(&index) {
            seen.push(index);
        }
    }
    Ok(seen)
}

impl CourseProgress {
    /// Añade el vídeo al final si aún no estaba; `true` si es nuevo.
    pub fn mark_video_completed(&mut self, index: usize) -> bool {
        if self.completed_videos.contains(&index) {
            return false;
        }
        self.completed_videos.push(index);
        true
    }

    /// Lectura tolerante: JSON ilegible equivale a progreso vacío.
    pub fn from_json(text: &str) -> Self {
        match serde_json::from_str(text) {
            Ok(progress) => progress,
            Err(err) => {
                log::warn!("progreso guardado ilegible, se empieza de cero: {err}");
                Self::default()
            }
        }
    }

    pub fn to_json(&self) -> Result<String, StoreError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Almacén persistente `get`/`set` de cadenas.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError>;
}

/// Almacén en memoria; los clones comparten contenido (útil para simular una recarga).
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        self.entries.borrow_mut().insert(key.to_string(), value);
        Ok(())
    }
}

/// Un fichero `<clave>.json` por entrada dentro de `dir`.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{name}.json"))
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        std::fs::read_to_string(self.path_for(key)).ok()
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.dir).map_err(|source| io_error(&self.dir, source))?;
        let path = self.path_for(key);
        std::fs::write(&path, value).map_err(|source| io_error(&path, source))
    }
}

fn io_error(path: &Path, source: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Carga/guardado del progreso de un curso; la sesión solo conoce esta interfaz.
pub trait ProgressStore {
    fn load(&self, course_id: &str) -> CourseProgress;
    fn save(&mut self, course_id: &str, progress: &CourseProgress) -> Result<(), StoreError>;
}

/// Progreso sobre un `KeyValueStore` con claves `"<namespace>_<curso>"`.
pub struct KeyedProgressStore<S> {
    namespace: String,
    store: S,
}

impl<S: KeyValueStore> KeyedProgressStore<S> {
    pub fn new(namespace: impl Into<String>, store: S) -> Self {
        Self {
            namespace: namespace.into(),
            store,
        }
    }

    pub fn key(&self, course_id: &str) -> String {
        format!("{}_{course_id}", self.namespace)
    }

    pub fn inner(&self) -> &S {
        &self.store
    }
}

impl<S: KeyValueStore> ProgressStore for KeyedProgressStore<S> {
    fn load(&self, course_id: &str) -> CourseProgress {
        self.store
            .get(&self.key(course_id))
            .map(|text| CourseProgress::from_json(&text))
            .unwrap_or_default()
    }

    fn save(&mut self, course_id: &str, progress: &CourseProgress) -> Result<(), StoreError> {
        let key = self.key(course_id);
        self.store.set(&key, progress.to_json()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CourseProgress {
        CourseProgress {
            current_video: 2,
            completed_videos: vec![2, 0],
            quiz_unlocked: true,
            quiz_completed: false,
            quiz_score: 75,
            tasks_unlocked: true,
            completed_tasks: ["t1".to_string()].into_iter().collect(),
        }
    }

    #[test]
    fn json_uses_camel_case_keys() {
        let json = sample().to_json().expect("json");
        for key in [
            "currentVideo",
            "completedVideos",
            "quizUnlocked",
            "quizCompleted",
            "quizScore",
            "tasksUnlocked",
            "completedTasks",
        ] {
            assert!(json.contains(key), "falta {key} en {json}");
        }
    }

    #[test]
    fn completed_videos_keep_watch_order() {
        let mut progress = CourseProgress::default();
        assert!(progress.mark_video_completed(2));
        assert!(progress.mark_video_completed(0));
        assert!(!progress.mark_video_completed(2));
        assert_eq!(progress.completed_videos, vec![2, 0]);

        let json = progress.to_json().expect("json");
        assert!(json.contains(r#""completedVideos":[2,0]"#), "{json}");
        assert_eq!(CourseProgress::from_json(&json), progress);
    }

    #[test]
    fn partial_or_broken_json_is_tolerated() {
        let partial = CourseProgress::from_json(r#"{"quizUnlocked":true,"completedVideos":[1,0,1]}"#);
        assert!(partial.quiz_unlocked);
        assert_eq!(partial.completed_videos, vec![1, 0]);
        assert_eq!(partial.current_video, 0);

        assert_eq!(CourseProgress::from_json("{no es json"), CourseProgress::default());
        assert_eq!(CourseProgress::from_json("{}"), CourseProgress::default());
    }

    #[test]
    fn keyed_store_uses_namespace_prefix() {
        let memory = MemoryStore::new();
        let mut store = KeyedProgressStore::new("lms_progress", memory.clone());
        assert_eq!(store.load("X"), CourseProgress::default());

        store.save("X", &sample()).expect("guardado");
        assert!(memory.get("lms_progress_X").is_some());
        assert!(memory.get("lms_progress_Y").is_none());
        assert_eq!(store.load("X"), sample());
    }

    #[test]
    fn file_store_round_trips_through_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store = KeyedProgressStore::new("lms_progress", JsonFileStore::new(dir.path().join("p")));
        store.save("Quality/Assurance", &sample()).expect("guardado");

        let path = store.inner().path_for("lms_progress_Quality/Assurance");
        assert!(path.starts_with(dir.path()));
        assert!(path.exists());

        let reopened = KeyedProgressStore::new("lms_progress", JsonFileStore::new(dir.path().join("p")));
        assert_eq!(reopened.load("Quality/Assurance"), sample());
    }

    #[test]
    fn file_store_reports_write_errors() {
        let dir = tempfile::tempdir().expect("tempdir");
        let blocker = dir.path().join("ocupado");
        std::fs::write(&blocker, "fichero, no carpeta").expect("write");
        let mut store = JsonFileStore::new(&blocker);
        let err = store.set("k", "v".into()).expect_err("no es un directorio");
        assert!(matches!(err, StoreError::Io { .. }));
    }
}

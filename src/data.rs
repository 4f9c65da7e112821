// src/data.rs

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const EMBEDDED_SHEETS: &str = include_str!("data/sheets.yaml");

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("no se pudo leer la configuración {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("YAML de configuración inválido: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// URLs de las hojas publicadas y ajustes de almacenamiento/proxy.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SheetConfig {
    #[serde(default)]
    pub courses: String,
    #[serde(default)]
    pub course_details: String,
    #[serde(default)]
    pub chapters: String,
    #[serde(default)]
    pub lessons: String,
    #[serde(default)]
    pub quizzes: String,
    #[serde(default)]
    pub tasks: String,
    #[serde(default)]
    pub topics: String,
    #[serde(default = "default_namespace")]
    pub storage_namespace: String,
    #[serde(default)]
    pub default_course: String,
    #[serde(default = "default_bind")]
    pub proxy_bind: String,
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

fn default_namespace() -> String {
    "lms_progress".to_string()
}

fn default_bind() -> String {
    "0.0.0.0:8788".to_string()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("progress")
}

impl SheetConfig {
    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&text)
    }

    /// Aplica `COURSE_SHEETS_*` sobre la configuración cargada.
    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        let set = |name: &str, slot: &mut String| {
            if let Some(value) = var(name).filter(|v| !v.trim().is_empty()) {
                *slot = value.trim().to_string();
            }
        };
        set("COURSE_SHEETS_COURSES_URL", &mut self.courses);
        set("COURSE_SHEETS_COURSE_DETAILS_URL", &mut self.course_details);
        set("COURSE_SHEETS_CHAPTERS_URL", &mut self.chapters);
        set("COURSE_SHEETS_LESSONS_URL", &mut self.lessons);
        set("COURSE_SHEETS_QUIZZES_URL", &mut self.quizzes);
        set("COURSE_SHEETS_TASKS_URL", &mut self.tasks);
        set("COURSE_SHEETS_TOPICS_URL", &mut self.topics);
        set("COURSE_SHEETS_NAMESPACE", &mut self.storage_namespace);
        set("COURSE_SHEETS_BIND", &mut self.proxy_bind);

        if let Some(dir) = var("COURSE_SHEETS_DATA_DIR").filter(|v| !v.trim().is_empty()) {
            self.data_dir = PathBuf::from(dir.trim());
        }
    }
}

/// Carga la configuración embebida
pub fn read_sheet_config_embedded() -> SheetConfig {
    SheetConfig::from_yaml(EMBEDDED_SHEETS).expect("sheets.yaml embebido inválido")
}

/// Configuración efectiva: `COURSE_SHEETS_CONFIG` (si existe) o la embebida, más variables de entorno.
pub fn load_sheet_config() -> SheetConfig {
    let mut config = match std::env::var("COURSE_SHEETS_CONFIG") {
        Ok(path) if !path.trim().is_empty() => match SheetConfig::from_file(Path::new(path.trim())) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("{err}; se usa la configuración embebida");
                read_sheet_config_embedded()
            }
        },
        _ => read_sheet_config_embedded(),
    };
    config.apply_env(|name| std::env::var(name).ok());
    config
}

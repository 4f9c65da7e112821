// src/proxy.rs
//! Respuestas del proxy HTTP: vuelve a descargar una hoja y la devuelve como JSON.

use crate::data::SheetConfig;
use crate::fetch::{FetchError, SheetFetcher};
use crate::model::{Lesson, QuizQuestion, Task, Topic};
use crate::sheets::records::{map_lessons, map_quiz, map_tasks, map_topics};
use crate::sheets::{CsvMode, Table};
use serde::Serialize;
use serde_json::{Value, json};
use std::collections::HashMap;

/// Lo que el servidor debe escribir en el socket.
#[derive(Debug, Clone, PartialEq)]
pub enum ProxyReply {
    Json { status: u16, body: Value },
    Text { status: u16, body: String },
    Empty { status: u16 },
}

impl ProxyReply {
    pub fn status(&self) -> u16 {
        match self {
            ProxyReply::Json { status, .. }
            | ProxyReply::Text { status, .. }
            | ProxyReply::Empty { status } => *status,
        }
    }

    fn error(status: u16, message: impl Into<String>) -> Self {
        ProxyReply::Json {
            status,
            body: json!({ "error": message.into() }),
        }
    }

    fn ok<T: Serialize>(body: &T) -> Self {
        match serde_json::to_value(body) {
            Ok(body) => ProxyReply::Json { status: 200, body },
            Err(err) => Self::error(500, format!("error serializando respuesta JSON: {err}")),
        }
    }
}

/// Carga útil de `/api/sheets/learning`.
#[derive(Debug, Serialize)]
pub struct LearningPayload {
    pub video: Option<Lesson>,
    pub quiz: Vec<QuizQuestion>,
    pub task: Option<Task>,
}

fn upstream_error(err: &FetchError) -> u16 {
    match err {
        FetchError::Status(_) => 502,
        FetchError::Transport(_) | FetchError::Body(_) => 500,
    }
}

fn fetch_table(fetcher: &dyn SheetFetcher, url: &str) -> Result<Table, FetchError> {
    let text = fetcher.fetch_text(url)?;
    Ok(Table::parse(&text, CsvMode::Strict))
}

pub fn split_target(target: &str) -> (&str, HashMap<String, String>) {
    let (path, query) = target.split_once('?').unwrap_or((target, ""));
    let params = url::form_urlencoded::parse(query.as_bytes())
        .into_owned()
        .collect();
    (path, params)
}

fn non_empty<'a>(params: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    params
        .get(key)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
}

pub fn learning_payload(
    fetcher: &dyn SheetFetcher,
    config: &SheetConfig,
    topic_id: &str,
) -> Result<Option<LearningPayload>, FetchError> {
    let topics = map_topics(&fetch_table(fetcher, &config.topics)?);
    let Some(topic) = topics.into_iter().find(|t| t.topic_id == topic_id) else {
        return Ok(None);
    };

    let video = map_lessons(&fetch_table(fetcher, &config.lessons)?)
        .into_iter()
        .find(|l| l.id == topic.lesson_id);

    let quiz = map_quiz(&fetch_table(fetcher, &config.quizzes)?)
        .into_iter()
        .filter(|q| q.course_id == topic.course_id && q.topic_id == topic_id)
        .collect();

    let task = map_tasks(&fetch_table(fetcher, &config.tasks)?)
        .into_iter()
        .find(|t| t.course_id == topic.course_id && t.topic_id == topic_id);

    Ok(Some(LearningPayload { video, quiz, task }))
}

pub fn learning_response(
    fetcher: &dyn SheetFetcher,
    config: &SheetConfig,
    topic_id: Option<&str>,
) -> ProxyReply {
    let Some(topic_id) = topic_id else {
        return ProxyReply::error(400, "Missing topicId");
    };
    match learning_payload(fetcher, config, topic_id) {
        Ok(Some(payload)) => ProxyReply::ok(&payload),
        Ok(None) => ProxyReply::error(404, "Topic not found"),
        Err(err) => {
            log::warn!("learning {topic_id}: {err}");
            ProxyReply::error(upstream_error(&err), "Failed to fetch learning data")
        }
    }
}

pub fn topics_response(
    fetcher: &dyn SheetFetcher,
    config: &SheetConfig,
    lesson_id: Option<&str>,
    sheet_url: Option<&str>,
) -> ProxyReply {
    let url = sheet_url.unwrap_or(config.topics.as_str());
    if url.trim().is_empty() {
        return ProxyReply::error(400, "No sheetUrl provided.");
    }

    let table = match fetch_table(fetcher, url) {
        Ok(table) => table,
        Err(FetchError::Status(code)) => {
            return ProxyReply::error(502, format!("Failed to fetch sheet: {code}"));
        }
        Err(err) => {
            log::warn!("topics: {err}");
            return ProxyReply::error(500, err.to_string());
        }
    };

    let mut topics: Vec<Topic> = map_topics(&table)
        .into_iter()
        .filter(|t| lesson_id.is_none_or(|id| t.lesson_id == id))
        .collect();
    topics.sort_by_key(|t| t.order);
    ProxyReply::ok(&topics)
}

/// Despacha una petición ya leída: método + destino (`/ruta?query`).
pub fn route(
    fetcher: &dyn SheetFetcher,
    config: &SheetConfig,
    method: &str,
    target: &str,
) -> ProxyReply {
    if method == "OPTIONS" {
        return ProxyReply::Empty { status: 204 };
    }
    let (path, params) = split_target(target);

    match (method, path) {
        ("GET", "/health") => ProxyReply::Text {
            status: 200,
            body: "ok".into(),
        },
        ("GET", "/api/sheets/learning") => {
            learning_response(fetcher, config, non_empty(&params, "topicId"))
        }
        ("GET", "/api/sheets/topics") => topics_response(
            fetcher,
            config,
            non_empty(&params, "lessonId"),
            non_empty(&params, "sheetUrl"),
        ),
        _ => ProxyReply::Text {
            status: 404,
            body: "not found".into(),
        },
    }
}

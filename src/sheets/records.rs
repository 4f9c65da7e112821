//! Filas normalizadas -> registros tipados, mediante tablas de campos con cadenas de respaldo.

use crate::model::{Chapter, Course, CourseDetails, Lesson, QuizQuestion, Task, Topic};
use crate::sheets::csv_parser::{CsvMode, parse_csv};
use crate::sheets::headers::{HeaderStrategy, resolve_columns};
use crate::sheets::id_match::normalize_id;
use crate::sheets::video::canonical_embed_url;
use serde_json::Value;

pub const UNORDERED_CHAPTER: i64 = 9999;
pub const UNTITLED_CHAPTER: &str = "Untitled Chapter";
pub const FALLBACK_IMAGE: &str = "https://via.placeholder.com/640x360?text=No+Image";

/// Hoja ya tokenizada: cabeceras originales (recortadas) y filas de datos no vacías.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn parse(text: &str, mode: CsvMode) -> Self {
        let text = text.trim_start_matches('\u{feff}');
        let mut rows = parse_csv(text, mode).into_iter();
        let Some(headers) = rows.next() else {
            return Self::default();
        };
        Self::from_parts(headers, rows.collect())
    }

    pub fn from_parts(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let headers = headers.into_iter().map(|h| h.trim().to_string()).collect();
        let rows = rows
            .into_iter()
            .filter(|row| row.iter().any(|cell| !cell.trim().is_empty()))
            .collect();
        Self { headers, rows }
    }

    /// Filas de un proveedor estructurado (objetos JSON); las claves se unen en orden de aparición.
    pub fn from_json_rows(items: &[Value]) -> Self {
        let mut headers: Vec<String> = Vec::new();
        for item in items {
            if let Value::Object(map) = item {
                for key in map.keys() {
                    if !headers.contains(key) {
                        headers.push(key.clone());
                    }
                }
            }
        }

        let rows = items
            .iter()
            .filter_map(Value::as_object)
            .map(|map| {
                headers
                    .iter()
                    .map(|h| map.get(h).map(json_cell).unwrap_or_default())
                    .collect()
            })
            .collect();
        Self::from_parts(headers, rows)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn json_cell(value: &Value) -> String {
    let text = match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items.iter().map(json_cell).collect::<Vec<_>>().join(""),
        Value::Object(map) => ["plain_text", "name", "content"]
            .iter()
            .find_map(|k| map.get(*k))
            .map(json_cell)
            .unwrap_or_default(),
    };
    text.trim().to_string()
}

/// Qué valor gana cuando varias columnas aceptan el mismo campo.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fallback {
    /// La primera columna presente, aunque la celda esté vacía.
    FirstPresent,
    /// La primera celda no vacía.
    FirstNonEmpty,
}

/// Campo destino y claves de origen aceptables, en orden de prioridad.
#[derive(Debug)]
pub struct FieldSpec {
    pub name: &'static str,
    pub sources: &'static [&'static str],
}

#[derive(Debug)]
pub struct EntitySchema {
    pub strategy: HeaderStrategy,
    pub fallback: Fallback,
    pub fields: &'static [FieldSpec],
}

const fn field(name: &'static str, sources: &'static [&'static str]) -> FieldSpec {
    FieldSpec { name, sources }
}

pub const COURSE_SCHEMA: EntitySchema = EntitySchema {
    strategy: HeaderStrategy::CamelCase,
    fallback: Fallback::FirstPresent,
    fields: &[
        field("id", &["id", "courseid"]),
        field("title", &["title"]),
        field("description", &["description"]),
    ],
};

pub const COURSE_DETAILS_SCHEMA: EntitySchema = EntitySchema {
    strategy: HeaderStrategy::Candidates,
    fallback: Fallback::FirstPresent,
    fields: &[
        field("courseId", &["courseId", "course id", "course_id", "id"]),
        field("title", &["title", "courseTitle"]),
        field("overview", &["overview", "description"]),
        field("curriculum", &["curriculum"]),
        field("duration", &["duration"]),
        field("imageUrl", &["imageUrl", "image", "image url"]),
        field("instructor", &["instructor"]),
        field("prerequisites", &["prerequisites"]),
    ],
};

pub const CHAPTER_SCHEMA: EntitySchema = EntitySchema {
    strategy: HeaderStrategy::Candidates,
    fallback: Fallback::FirstPresent,
    fields: &[
        field("courseId", &["courseId", "course", "course_id", "course id"]),
        field("chapterId", &["chapterId", "chapter", "chapter_id", "chapter id"]),
        field("title", &["chapterTitle", "title", "chapter_title", "chapter title"]),
        field(
            "description",
            &["chapterDescription", "description", "chapter_description", "chapter description"],
        ),
        field("order", &["order", "position", "sort", "seq"]),
        field("imageUrl", &["imageUrl", "image", "image_url", "image url", "thumbnail"]),
    ],
};

pub const LESSON_SCHEMA: EntitySchema = EntitySchema {
    strategy: HeaderStrategy::CamelCase,
    fallback: Fallback::FirstPresent,
    fields: &[
        field("courseId", &["courseid", "course"]),
        field("id", &["id", "lessonid"]),
        field("title", &["title"]),
        field("description", &["description"]),
        field("order", &["order"]),
        field("videoUrl", &["videourl", "v", "video"]),
        field("imageUrl", &["imageurl", "image"]),
    ],
};

pub const QUIZ_SCHEMA: EntitySchema = EntitySchema {
    strategy: HeaderStrategy::CamelCase,
    fallback: Fallback::FirstPresent,
    fields: &[
        field("courseId", &["courseid", "course"]),
        field("topicId", &["topicid", "topic"]),
        field("id", &["id"]),
        field("question", &["question"]),
        field("options", &["options", "opts"]),
        field("correct", &["correct"]),
    ],
};

pub const TASK_SCHEMA: EntitySchema = EntitySchema {
    strategy: HeaderStrategy::CamelCase,
    fallback: Fallback::FirstPresent,
    fields: &[
        field("courseId", &["courseid", "course"]),
        field("topicId", &["topicid", "topic"]),
        field("id", &["id", "taskid"]),
        field("title", &["title"]),
        field("description", &["description"]),
        field("type", &["type"]),
    ],
};

pub const TOPIC_SCHEMA: EntitySchema = EntitySchema {
    strategy: HeaderStrategy::Candidates,
    fallback: Fallback::FirstNonEmpty,
    fields: &[
        field("courseId", &["Course ID", "courseId"]),
        field("chapterId", &["Chapter ID", "chapterId"]),
        field("lessonId", &["Lesson ID", "lessonId"]),
        field("topicId", &["Topic ID", "topicId", "id"]),
        field("title", &["Topic Title", "title"]),
        field("description", &["Description", "description"]),
        field("videoUrl", &["Video URL", "videoUrl"]),
        field("order", &["Order", "order"]),
        field("imageUrl", &["Image URL", "imageUrl"]),
        field("subTopics", &["Sub Topics", "subTopics"]),
        field("tasks", &["Tasks", "tasks"]),
        field("hours", &["Hours", "hours"]),
    ],
};

/// Columnas resueltas una sola vez por hoja para un esquema.
#[derive(Debug)]
pub struct ColumnMap {
    fallback: Fallback,
    columns: Vec<(&'static str, Vec<usize>)>,
}

impl ColumnMap {
    pub fn resolve(headers: &[String], schema: &EntitySchema) -> Self {
        let columns = schema
            .fields
            .iter()
            .map(|f| (f.name, resolve_columns(headers, schema.strategy, f.sources)))
            .collect();
        Self {
            fallback: schema.fallback,
            columns,
        }
    }

    pub fn has(&self, name: &str) -> bool {
        self.columns
            .iter()
            .any(|(n, cols)| *n == name && !cols.is_empty())
    }

    pub fn row<'a>(&'a self, cells: &'a [String]) -> RowView<'a> {
        RowView { map: self, cells }
    }
}

pub struct RowView<'a> {
    map: &'a ColumnMap,
    cells: &'a [String],
}

impl<'a> RowView<'a> {
    /// Valor del campo según la cadena de respaldo; `""` si ninguna columna aporta nada.
    pub fn text(&self, name: &str) -> &'a str {
        let Some((_, cols)) = self.map.columns.iter().find(|(n, _)| *n == name) else {
            return "";
        };
        let mut present = cols.iter().filter_map(|&c| self.cells.get(c));
        let found = match self.map.fallback {
            Fallback::FirstPresent => present.next(),
            Fallback::FirstNonEmpty => present.find(|cell| !cell.trim().is_empty()),
        };
        found.map(|cell| cell.trim()).unwrap_or("")
    }

    pub fn owned(&self, name: &str) -> String {
        self.text(name).to_string()
    }
}

/// Conserva dígitos y `-` y parsea; si no queda un entero válido devuelve `default`.
pub fn parse_order(raw: &str, default: i64) -> i64 {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit() || *c == '-').collect();
    if digits.is_empty() {
        return default;
    }
    digits.parse().unwrap_or(default)
}

/// Índice que ninguna opción puede tener.
pub const NEVER_CORRECT: i64 = -1;

/// Índice de la respuesta correcta: vacío es 0, cualquier texto no entero nunca acierta.
pub fn parse_correct(raw: &str) -> i64 {
    let raw = raw.trim();
    if raw.is_empty() {
        return 0;
    }
    raw.parse().unwrap_or(NEVER_CORRECT)
}

pub fn split_options(raw: &str) -> Vec<String> {
    raw.split('|')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn random_chapter_id() -> String {
    let id = uuid::Uuid::new_v4().simple().to_string();
    format!("chap-{}", &id[..6])
}

fn or_default(value: &str, default: &str) -> String {
    if value.is_empty() { default.to_string() } else { value.to_string() }
}

fn map_rows<T>(table: &Table, schema: &EntitySchema, build: impl Fn(&RowView) -> T) -> Vec<T> {
    let map = ColumnMap::resolve(&table.headers, schema);
    table.rows.iter().map(|cells| build(&map.row(cells))).collect()
}

pub fn map_courses(table: &Table) -> Vec<Course> {
    map_rows(table, &COURSE_SCHEMA, |r| Course {
        id: r.owned("id"),
        title: r.owned("title"),
        description: r.owned("description"),
    })
}

pub fn map_course_details(table: &Table) -> Vec<CourseDetails> {
    map_rows(table, &COURSE_DETAILS_SCHEMA, |r| CourseDetails {
        course_id: r.owned("courseId"),
        title: r.owned("title"),
        overview: r.owned("overview"),
        curriculum: r.owned("curriculum"),
        duration: r.owned("duration"),
        image_url: r.owned("imageUrl"),
        instructor: r.owned("instructor"),
        prerequisites: r.owned("prerequisites"),
    })
}

pub fn map_chapters(table: &Table) -> Vec<Chapter> {
    map_rows(table, &CHAPTER_SCHEMA, |r| {
        let raw_course = r.text("courseId");
        let chapter_id = r.text("chapterId");
        Chapter {
            raw_course_id: raw_course.to_string(),
            course_id: normalize_id(raw_course),
            chapter_id: if chapter_id.is_empty() {
                random_chapter_id()
            } else {
                chapter_id.to_string()
            },
            title: or_default(r.text("title"), UNTITLED_CHAPTER),
            description: r.owned("description"),
            order: parse_order(r.text("order"), UNORDERED_CHAPTER),
            image_url: or_default(r.text("imageUrl"), FALLBACK_IMAGE),
        }
    })
}

pub fn map_lessons(table: &Table) -> Vec<Lesson> {
    map_rows(table, &LESSON_SCHEMA, |r| Lesson {
        course_id: r.owned("courseId"),
        id: r.owned("id"),
        title: r.owned("title"),
        description: r.owned("description"),
        order: parse_order(r.text("order"), 0),
        video_url: canonical_embed_url(r.text("videoUrl")),
        image_url: r.owned("imageUrl"),
    })
}

pub fn map_quiz(table: &Table) -> Vec<QuizQuestion> {
    map_rows(table, &QUIZ_SCHEMA, |r| QuizQuestion {
        course_id: r.owned("courseId"),
        topic_id: r.owned("topicId"),
        id: r.owned("id"),
        question: r.owned("question"),
        options: split_options(r.text("options")),
        correct: parse_correct(r.text("correct")),
    })
}

pub fn map_tasks(table: &Table) -> Vec<Task> {
    map_rows(table, &TASK_SCHEMA, |r| Task {
        course_id: r.owned("courseId"),
        topic_id: r.owned("topicId"),
        id: r.owned("id"),
        title: r.owned("title"),
        description: r.owned("description"),
        kind: r.owned("type"),
    })
}

pub fn map_topics(table: &Table) -> Vec<Topic> {
    map_rows(table, &TOPIC_SCHEMA, |r| Topic {
        course_id: r.owned("courseId"),
        chapter_id: r.owned("chapterId"),
        lesson_id: r.owned("lessonId"),
        topic_id: r.owned("topicId"),
        title: r.owned("title"),
        description: r.owned("description"),
        video_url: canonical_embed_url(r.text("videoUrl")),
        order: parse_order(r.text("order"), 0),
        image_url: r.owned("imageUrl"),
        sub_topics: r.owned("subTopics"),
        tasks: r.owned("tasks"),
        hours: parse_order(r.text("hours"), 0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn table(csv: &str) -> Table {
        Table::parse(csv, CsvMode::Strict)
    }

    #[test]
    fn blank_rows_are_dropped_before_mapping() {
        let t = table("id,title\n , \n1,Uno\n,,\n");
        assert_eq!(t.rows.len(), 1);
        assert_eq!(map_courses(&t)[0].title, "Uno");
    }

    #[test]
    fn bom_and_empty_input() {
        assert!(Table::parse("", CsvMode::Strict).headers.is_empty());
        let t = table("\u{feff}Id,Title\nc1,Curso");
        assert_eq!(map_courses(&t)[0].id, "c1");
    }

    #[test]
    fn lesson_fallback_chain_and_coercions() {
        let t = table(
            "Course Id,Course,ID,Title,Order,Video\n\
             QA,ignored,l1,Intro,#2,https://youtu.be/abc\n\
             QA,ignored,l2,Setup,n/a,\n",
        );
        let lessons = map_lessons(&t);
        assert_eq!(lessons.len(), 2);
        assert_eq!(lessons[0].course_id, "QA");
        assert_eq!(lessons[0].order, 2);
        assert_eq!(lessons[0].video_url, "https://www.youtube.com/embed/abc");
        assert_eq!(lessons[1].order, 0);
        assert_eq!(lessons[1].video_url, "");
        assert_eq!(lessons[1].description, "");
    }

    #[test]
    fn course_column_is_used_when_course_id_missing() {
        let t = table("course,id,title\nQA,l1,Intro\n");
        assert_eq!(map_lessons(&t)[0].course_id, "QA");
    }

    #[test]
    fn quiz_options_split_on_pipe() {
        let t = table("courseId,id,question,options,correct\nQA,q1,¿Qué?, a | b || c ,2\nQA,q2,?,,x\n");
        let quiz = map_quiz(&t);
        assert_eq!(quiz[0].options, vec!["a", "b", "c"]);
        assert_eq!(quiz[0].correct, 2);
        assert!(quiz[1].options.is_empty());
        assert_eq!(quiz[1].correct, NEVER_CORRECT);
    }

    #[test]
    fn unparsable_correct_never_scores() {
        let t = table("courseId,id,question,options,correct
X,q1,Q,a|b,x
X,q2,Q,a|b|c,2 (b)
X,q3,Q,a|b,
X,q4,Q,a|b, 1 
");
        let quiz = map_quiz(&t);
        let correct: Vec<i64> = quiz.iter().map(|q| q.correct).collect();
        assert_eq!(correct, vec![NEVER_CORRECT, NEVER_CORRECT, 0, 1]);

        assert!(!quiz[0].is_answered_correctly(Some(0)));
        assert!(!quiz[1].is_answered_correctly(Some(2)));
        assert!(quiz[2].is_answered_correctly(Some(0)));
        assert!(quiz[3].is_answered_correctly(Some(1)));
    }

    #[test]
    fn lenient_order_parsing() {
        assert_eq!(parse_order("12", 0), 12);
        assert_eq!(parse_order(" -3 ", 0), -3);
        assert_eq!(parse_order("order: 7", 0), 7);
        assert_eq!(parse_order("", 9999), 9999);
        assert_eq!(parse_order("abc", 9999), 9999);
        assert_eq!(parse_order("1-2", 9999), 9999);
    }

    #[test]
    fn chapter_defaults() {
        let t = table("Course ID,Chapter Title,Position\n\"Quality Assurance\",,abc\n");
        let chapters = map_chapters(&t);
        let ch = &chapters[0];
        assert_eq!(ch.raw_course_id, "Quality Assurance");
        assert_eq!(ch.course_id, "quality-assurance");
        assert!(ch.chapter_id.starts_with("chap-"));
        assert_eq!(ch.chapter_id.len(), 11);
        assert_eq!(ch.title, UNTITLED_CHAPTER);
        assert_eq!(ch.order, UNORDERED_CHAPTER);
        assert_eq!(ch.image_url, FALLBACK_IMAGE);
    }

    #[test]
    fn unordered_chapters_sort_last_in_every_permutation() {
        let rows = ["c,a,3", "c,b,", "c,c,1", "c,d,x", "c,e,2"];
        let perms: [[usize; 5]; 4] = [[0, 1, 2, 3, 4], [4, 3, 2, 1, 0], [1, 3, 0, 2, 4], [3, 1, 4, 0, 2]];
        for perm in perms {
            let body: Vec<&str> = perm.iter().map(|&i| rows[i]).collect();
            let csv = format!("course,chapter,order\n{}", body.join("\n"));
            let mut chapters = map_chapters(&table(&csv));
            chapters.sort_by_key(|c| c.order);
            let explicit: Vec<&str> = chapters[..3].iter().map(|c| c.chapter_id.as_str()).collect();
            assert_eq!(explicit, vec!["c", "e", "a"], "{perm:?}");
            assert!(chapters[3..].iter().all(|c| c.order == UNORDERED_CHAPTER));
        }
    }

    #[test]
    fn topics_prefer_first_non_empty_column() {
        let t = table(
            "Lesson ID,lessonId,Topic ID,Topic Title,title,Order,Hours\n\
             ,L1,t1,,Fallback title,3,2h\n",
        );
        let topic = &map_topics(&t)[0];
        assert_eq!(topic.lesson_id, "L1");
        assert_eq!(topic.title, "Fallback title");
        assert_eq!(topic.order, 3);
        assert_eq!(topic.hours, 2);
    }

    #[test]
    fn short_rows_map_to_defaults() {
        let t = table("courseId,id,title,description,type\nQA\n");
        let task = &map_tasks(&t)[0];
        assert_eq!(task.course_id, "QA");
        assert!(task.id.is_empty() && task.title.is_empty() && task.kind.is_empty());
    }

    #[test]
    fn structured_rows_use_same_mapper() {
        let rows = vec![
            json!({
                "Course ID": "QA",
                "Lesson ID": "L1",
                "Topic ID": [{"plain_text": "t-"}, {"plain_text": "1"}],
                "Topic Title": {"plain_text": "Tema"},
                "Order": 4,
                "Hours": null
            }),
            json!({"Topic ID": "t2", "extra": true}),
            json!("ignorado"),
        ];
        let t = Table::from_json_rows(&rows);
        assert_eq!(t.headers.len(), 7);
        let topics = map_topics(&t);
        assert_eq!(topics.len(), 2);
        assert_eq!(topics[0].topic_id, "t-1");
        assert_eq!(topics[0].title, "Tema");
        assert_eq!(topics[0].order, 4);
        assert_eq!(topics[1].topic_id, "t2");
        assert_eq!(topics[1].lesson_id, "");
    }
}

//! Normalización de cabeceras escritas a mano.

use std::collections::HashMap;

/// Cómo se reconocen las columnas de una hoja.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeaderStrategy {
    /// Estrategia A: cabecera -> clave camelCase ("Course Id" -> "courseId").
    CamelCase,
    /// Estrategia B: lista priorizada de grafías aceptables.
    Candidates,
}

/// Minúsculas y solo alfanuméricos ASCII (también elimina el BOM).
pub fn squash_header(header: &str) -> String {
    header
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

pub fn camel_key(header: &str) -> String {
    let mut key = String::new();
    for part in header.split_whitespace() {
        let clean: String = part.chars().filter(char::is_ascii_alphanumeric).collect();
        if clean.is_empty() {
            continue;
        }
        if key.is_empty() {
            key.push_str(&clean.to_ascii_lowercase());
        } else {
            let mut chars = clean.chars();
            if let Some(first) = chars.next() {
                key.push(first.to_ascii_uppercase());
                key.push_str(&chars.as_str().to_ascii_lowercase());
            }
        }
    }
    key
}

/// Claves camelCase de toda la fila de cabeceras; las vacías pasan a `col{i}`.
pub fn camel_keys(headers: &[String]) -> Vec<String> {
    headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            let key = camel_key(h);
            if key.is_empty() { format!("col{i}") } else { key }
        })
        .collect()
}

/// Índice cabecera-normalizada -> columna, para la estrategia B.
#[derive(Debug, Clone)]
pub struct HeaderIndex {
    originals: Vec<String>,
    by_squashed: HashMap<String, Vec<usize>>,
}

impl HeaderIndex {
    pub fn new(headers: &[String]) -> Self {
        let mut by_squashed: HashMap<String, Vec<usize>> = HashMap::new();
        for (i, header) in headers.iter().enumerate() {
            let key = squash_header(header);
            if !key.is_empty() {
                by_squashed.entry(key).or_default().push(i);
            }
        }
        Self {
            originals: headers.to_vec(),
            by_squashed,
        }
    }

    /// Primera columna que coincide con algún candidato, en orden de prioridad.
    pub fn guess(&self, candidates: &[&str]) -> Option<usize> {
        candidates.iter().find_map(|c| {
            self.by_squashed
                .get(&squash_header(c))
                .and_then(|cols| cols.first().copied())
        })
    }

    /// Cabecera original (tal como la escribió el autor) del primer candidato encontrado.
    pub fn guess_header(&self, candidates: &[&str]) -> Option<&str> {
        self.guess(candidates).map(|i| self.originals[i].as_str())
    }

    /// Todas las columnas que aceptan los candidatos, sin repetir, en orden de prioridad.
    pub fn columns_for(&self, candidates: &[&str]) -> Vec<usize> {
        let mut cols = Vec::new();
        for candidate in candidates {
            let found = self.by_squashed.get(&squash_header(candidate));
            for &col in found.into_iter().flatten() {
                if !cols.contains(&col) {
                    cols.push(col);
                }
            }
        }
        cols
    }
}

/// Columnas que aceptan `sources` según la estrategia elegida.
pub fn resolve_columns(headers: &[String], strategy: HeaderStrategy, sources: &[&str]) -> Vec<usize> {
    match strategy {
        HeaderStrategy::Candidates => HeaderIndex::new(headers).columns_for(sources),
        HeaderStrategy::CamelCase => {
            let keys = camel_keys(headers);
            let mut cols = Vec::new();
            for source in sources {
                for (i, key) in keys.iter().enumerate() {
                    if key.eq_ignore_ascii_case(source) && !cols.contains(&i) {
                        cols.push(i);
                    }
                }
            }
            cols
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn camel_case_derivation() {
        assert_eq!(camel_key("Course Id"), "courseId");
        assert_eq!(camel_key("  Video   URL "), "videoUrl");
        assert_eq!(camel_key("image_url"), "imageurl");
        assert_eq!(camel_key("Chapter #1 (draft)"), "chapter1Draft");
        assert_eq!(camel_key("¿?"), "");
    }

    #[test]
    fn empty_headers_get_positional_keys() {
        let keys = camel_keys(&headers(&["id", "", "Title"]));
        assert_eq!(keys, vec!["id", "col1", "title"]);
    }

    #[test]
    fn candidate_matching_finds_course_id() {
        let index = HeaderIndex::new(&headers(&["\u{feff}Title", "Course Id", "Order"]));
        let course_candidates = ["courseId", "course", "course_id", "course id"];
        assert_eq!(index.guess(&course_candidates), Some(1));
        assert_eq!(index.guess_header(&course_candidates), Some("Course Id"));
        assert_eq!(index.guess(&["chapterTitle", "title"]), Some(0));
        assert_eq!(index.guess(&["missing"]), None);
    }

    #[test]
    fn camel_strategy_is_case_insensitive_on_keys() {
        let cols = resolve_columns(
            &headers(&["Course", "Course Id", "Title"]),
            HeaderStrategy::CamelCase,
            &["courseid", "course"],
        );
        assert_eq!(cols, vec![1, 0]);
    }

    #[test]
    fn candidate_strategy_keeps_priority_order() {
        let cols = resolve_columns(
            &headers(&["title", "Chapter Title"]),
            HeaderStrategy::Candidates,
            &["chapterTitle", "title", "chapter_title"],
        );
        assert_eq!(cols, vec![1, 0]);
    }
}

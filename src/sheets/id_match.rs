//! Comparación de identificadores de ruta contra identificadores de hoja.

/// Regla de equivalencia usada en cada búsqueda.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchMode {
    /// Normaliza y acepta igualdad, prefijo o subcadena en cualquier sentido (capítulos).
    Forgiving,
    /// Igualdad exacta de cadenas, sin normalizar (cursos, lecciones, quiz, tareas).
    Strict,
    /// Igualdad tras `trim` y minúsculas (temas por lección).
    Loose,
}

impl MatchMode {
    pub fn matches(self, route_id: &str, record_id: &str) -> bool {
        match self {
            MatchMode::Forgiving => forgiving_match(route_id, record_id),
            MatchMode::Strict => route_id == record_id,
            MatchMode::Loose => {
                route_id.trim().to_lowercase() == record_id.trim().to_lowercase()
            }
        }
    }
}

/// Deja un id en forma de slug: `[a-z0-9]` separados por guiones simples.
pub fn normalize_id(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .filter(|&c| c != '\u{feff}')
        .map(|c| if c == '\u{a0}' { ' ' } else { c })
        .filter(|c| !c.is_control())
        .collect();
    let lowered = cleaned.trim().to_lowercase();
    let unquoted = strip_outer_quotes(&lowered);

    let mut slug = String::with_capacity(unquoted.len());
    for c in unquoted.chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            slug.push(c);
        } else if !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_matches('-').to_string()
}

/// Solo comillas dobles; las simples acaban como separador.
fn strip_outer_quotes(s: &str) -> &str {
    if s.len() >= 2 && s.starts_with('"') && s.ends_with('"') {
        return &s[1..s.len() - 1];
    }
    s
}

/// Ids vacíos tras normalizar nunca coinciden.
pub fn forgiving_match(route_id: &str, record_id: &str) -> bool {
    let route = normalize_id(route_id);
    let record = normalize_id(record_id);
    if route.is_empty() || record.is_empty() {
        return false;
    }
    // `contains` cubre también igualdad y prefijos
    record.contains(&route) || route.contains(&record)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_handles_sheet_noise() {
        assert_eq!(normalize_id("  Quality Assurance  "), "quality-assurance");
        assert_eq!(normalize_id("\u{feff}\"QA/QC\u{a0}Basics\""), "qa-qc-basics");
        assert_eq!(normalize_id("--Clinical__Research--"), "clinical-research");
        assert_eq!(normalize_id("tab\there"), "tabhere");
        assert_eq!(normalize_id("'quoted'"), "quoted");
        assert_eq!(normalize_id("\""), "");
    }

    #[test]
    fn only_double_quotes_are_unwrapped() {
        assert_eq!(strip_outer_quotes("\"qa\""), "qa");
        assert_eq!(strip_outer_quotes("'qa'"), "'qa'");
        assert_eq!(normalize_id("\"'QA'\""), "qa");
    }

    #[test]
    fn forgiving_accepts_prefix_drift() {
        assert!(forgiving_match("quality-assurance", "quality-assurance-quality-control"));
        assert!(forgiving_match("Quality-Assurance-Quality-Control", "quality assurance"));
        assert!(forgiving_match("control", "quality-assurance-quality-control"));
        assert!(!forgiving_match("abc", "xyz"));
    }

    #[test]
    fn forgiving_rejects_empty_ids() {
        assert!(!forgiving_match("", "anything"));
        assert!(!forgiving_match("anything", "  ---  "));
    }

    #[test]
    fn strict_mode_does_not_normalize() {
        assert!(MatchMode::Strict.matches("QA-101", "QA-101"));
        assert!(!MatchMode::Strict.matches("qa-101", "QA-101"));
        assert!(!MatchMode::Strict.matches("QA-101 ", "QA-101"));
    }

    #[test]
    fn loose_mode_ignores_case_and_padding() {
        assert!(MatchMode::Loose.matches(" Lesson-1", "lesson-1 "));
        assert!(!MatchMode::Loose.matches("lesson-1", "lesson-2"));
    }
}

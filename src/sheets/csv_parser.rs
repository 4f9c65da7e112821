//! Lectura tolerante de CSV publicados desde hojas de cálculo.
//!
//! Nunca falla: una fila ilegible se descarta con un aviso y el resto sigue.

use csv::{ReaderBuilder, Trim};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CsvMode {
    /// Lector completo: los campos entre comillas pueden contener saltos de línea.
    #[default]
    Strict,
    /// Línea a línea: un salto de línea siempre termina la fila.
    PerLine,
}

pub fn parse_csv(text: &str, mode: CsvMode) -> Vec<Vec<String>> {
    match mode {
        CsvMode::Strict => parse_strict(text),
        CsvMode::PerLine => parse_per_line(text),
    }
}

pub fn parse_strict(text: &str) -> Vec<Vec<String>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        match result {
            Ok(record) => {
                let row: Vec<String> = record.iter().map(str::to_string).collect();
                if is_blank_line(&row) {
                    continue;
                }
                rows.push(row);
            }
            Err(err) => log::warn!("fila CSV {} descartada: {err}", i + 1),
        }
    }
    rows
}

pub fn parse_per_line(text: &str) -> Vec<Vec<String>> {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !line.trim().is_empty())
        .map(split_line)
        .collect()
}

// Una línea con solo espacios llega como una única celda vacía.
fn is_blank_line(row: &[String]) -> bool {
    row.len() == 1 && row[0].is_empty()
}

fn split_line(line: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    field.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            '"' if field.trim().is_empty() => {
                field.clear();
                in_quotes = true;
            }
            ',' if !in_quotes => {
                cells.push(field.trim().to_string());
                field.clear();
            }
            _ => field.push(ch),
        }
    }
    cells.push(field.trim().to_string());
    cells
}

// Pipeline de ingesta: CSV -> cabeceras -> registros, más utilidades de ids y vídeo.
pub mod csv_parser;
pub mod headers;
pub mod id_match;
pub mod records;
pub mod video;

pub use csv_parser::CsvMode;
pub use id_match::MatchMode;
pub use records::Table;

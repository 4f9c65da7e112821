pub mod app;
pub mod data;
pub mod fetch;
pub mod loader;
pub mod model;
pub mod progress;
pub mod proxy;
pub mod sheets;
pub mod ui;
pub mod view_models;

pub use app::LearningSession;
pub use ui::CourseApp;

/// Logger para los binarios: `RUST_LOG` manda, por defecto solo avisos.
/// Los `log::*` de la librería llegan por el puente de `tracing-log`.
pub fn init_logging() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

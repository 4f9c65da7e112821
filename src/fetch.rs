// src/fetch.rs
//! Descarga de hojas publicadas. Un fallo nunca sale de aquí como error:
//! la hoja queda como `SheetText::Failed` y el resto de la carga continúa.

use reqwest::blocking::Client;
use reqwest::header::USER_AGENT;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

const AGENT: &str = concat!("course-sheets/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("error de red: {0}")]
    Transport(String),
    #[error("la hoja respondió HTTP {0}")]
    Status(u16),
    #[error("cuerpo ilegible: {0}")]
    Body(String),
}

pub trait SheetFetcher: Sync {
    fn fetch_text(&self, url: &str) -> Result<String, FetchError>;
}

/// Cliente HTTP bloqueante (se usa desde hilos de fondo, nunca desde el hilo de UI).
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(20))
            .build()
            .unwrap_or_else(|err| {
                log::warn!("no se pudo configurar el cliente HTTP ({err}), se usa el de serie");
                Client::new()
            });
        Self { client }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl SheetFetcher for HttpFetcher {
    fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        let resp = self
            .client
            .get(url)
            .header(USER_AGENT, AGENT)
            .send()
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        resp.text().map_err(|e| FetchError::Body(e.to_string()))
    }
}

/// Bandera compartida: una carga cancelada descarta sus resultados tardíos.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SheetText {
    Loaded(String),
    Failed,
}

impl SheetText {
    /// Texto de la hoja; una descarga fallida cuenta como hoja vacía.
    pub fn text(&self) -> &str {
        match self {
            SheetText::Loaded(text) => text,
            SheetText::Failed => "",
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, SheetText::Failed)
    }
}

pub fn fetch_one(fetcher: &dyn SheetFetcher, url: &str) -> SheetText {
    if url.trim().is_empty() {
        log::warn!("hoja sin URL configurada");
        return SheetText::Failed;
    }
    match fetcher.fetch_text(url) {
        Ok(text) => SheetText::Loaded(text),
        Err(err) => {
            log::warn!("no se pudo descargar {url}: {err}");
            SheetText::Failed
        }
    }
}

/// Descarga todas las URLs en paralelo; el resultado respeta el orden de entrada.
/// Devuelve `None` si el token se canceló mientras tanto.
pub fn fetch_all(
    fetcher: &dyn SheetFetcher,
    urls: &[&str],
    cancel: &CancelToken,
) -> Option<Vec<SheetText>> {
    if cancel.is_cancelled() {
        return None;
    }

    let results: Vec<SheetText> = std::thread::scope(|scope| {
        let handles: Vec<_> = urls
            .iter()
            .map(|url| scope.spawn(move || fetch_one(fetcher, url)))
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().unwrap_or(SheetText::Failed))
            .collect()
    });

    if cancel.is_cancelled() {
        log::debug!("carga cancelada, se descartan {} hojas", results.len());
        return None;
    }
    Some(results)
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Sirve CSV enlatados por URL; cualquier otra URL responde 404.
    #[derive(Default)]
    pub struct ScriptedFetcher {
        pub pages: HashMap<String, Result<String, u16>>,
        pub calls: Mutex<Vec<String>>,
    }

    impl ScriptedFetcher {
        pub fn with(mut self, url: &str, body: &str) -> Self {
            self.pages.insert(url.to_string(), Ok(body.to_string()));
            self
        }

        pub fn failing(mut self, url: &str, status: u16) -> Self {
            self.pages.insert(url.to_string(), Err(status));
            self
        }
    }

    impl SheetFetcher for ScriptedFetcher {
        fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
            if let Ok(mut calls) = self.calls.lock() {
                calls.push(url.to_string());
            }
            match self.pages.get(url) {
                Some(Ok(body)) => Ok(body.clone()),
                Some(Err(0)) => Err(FetchError::Transport("conexión rechazada".into())),
                Some(Err(status)) => Err(FetchError::Status(*status)),
                None => Err(FetchError::Status(404)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::ScriptedFetcher;
    use super::*;

    #[test]
    fn results_keep_input_order_and_failures_become_failed() {
        let fetcher = ScriptedFetcher::default()
            .with("a", "uno")
            .failing("b", 500)
            .with("c", "tres");
        let out = fetch_all(&fetcher, &["a", "b", "c", ""], &CancelToken::new())
            .expect("no cancelado");
        assert_eq!(out[0], SheetText::Loaded("uno".into()));
        assert!(out[1].is_failed());
        assert_eq!(out[1].text(), "");
        assert_eq!(out[2].text(), "tres");
        assert!(out[3].is_failed());
        // la URL vacía no llega a pedirse
        assert_eq!(fetcher.calls.lock().expect("lock").len(), 3);
    }

    #[test]
    fn cancelled_token_discards_results() {
        let fetcher = ScriptedFetcher::default().with("a", "uno");
        let token = CancelToken::new();
        let clone = token.clone();
        clone.cancel();
        assert!(token.is_cancelled());
        assert!(fetch_all(&fetcher, &["a"], &token).is_none());
    }
}

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::time::Duration;

use anyhow::Context;
use course_sheets::data::{SheetConfig, load_sheet_config};
use course_sheets::fetch::HttpFetcher;
use course_sheets::proxy::{ProxyReply, route};

const MAX_HEADER_BYTES: usize = 64 * 1024;

struct HttpRequest {
    method: String,
    target: String,
    headers: HashMap<String, String>,
}

fn main() -> anyhow::Result<()> {
    course_sheets::init_logging();

    let config = load_sheet_config();
    let bind = config.proxy_bind.clone();
    let listener = TcpListener::bind(&bind)
        .with_context(|| format!("no se pudo abrir el puerto del proxy en {bind}"))?;

    println!("course_sheets proxy escuchando en http://{bind}");

    let fetcher = HttpFetcher::new();
    for stream in listener.incoming() {
        match stream {
            Ok(stream) => {
                if let Err(err) = handle_connection(stream, &fetcher, &config) {
                    log::warn!("error en conexión del proxy: {err:#}");
                }
            }
            Err(err) => log::warn!("error aceptando conexión: {err}"),
        }
    }
    Ok(())
}

fn handle_connection(
    mut stream: TcpStream,
    fetcher: &HttpFetcher,
    config: &SheetConfig,
) -> anyhow::Result<()> {
    stream
        .set_read_timeout(Some(Duration::from_secs(5)))
        .context("no se pudo fijar el timeout de lectura")?;

    let request = match read_http_request(&mut stream) {
        Ok(req) => req,
        Err(err) => {
            write_text_response(&mut stream, 400, &format!("bad request: {err}"));
            return Ok(());
        }
    };

    log::debug!(
        "{} {} ({})",
        request.method,
        request.target,
        request.header("user-agent").unwrap_or("-")
    );

    let reply = route(fetcher, config, &request.method, &request.target);
    log::info!("{} {} -> {}", request.method, request.target, reply.status());
    write_reply(&mut stream, &reply);
    Ok(())
}

fn read_http_request(stream: &mut TcpStream) -> Result<HttpRequest, String> {
    let mut buffer = Vec::with_capacity(4096);
    let mut temp = [0_u8; 1024];

    loop {
        let n = stream
            .read(&mut temp)
            .map_err(|e| format!("no se pudo leer request: {e}"))?;
        if n == 0 {
            break;
        }
        buffer.extend_from_slice(&temp[..n]);

        if find_header_end(&buffer).is_some() {
            break;
        }

        if buffer.len() > MAX_HEADER_BYTES {
            return Err("headers demasiado grandes".into());
        }
    }

    let header_end = find_header_end(&buffer).ok_or_else(|| "headers incompletos".to_string())?;
    let header_text = std::str::from_utf8(&buffer[..header_end])
        .map_err(|_| "headers no son UTF-8 válido".to_string())?;

    let mut lines = header_text.split("\r\n");
    let request_line = lines
        .next()
        .ok_or_else(|| "faltó request line".to_string())?;
    let mut parts = request_line.split_whitespace();
    let method = parts
        .next()
        .ok_or_else(|| "faltó método HTTP".to_string())?
        .to_string();
    let target = parts
        .next()
        .ok_or_else(|| "faltó path HTTP".to_string())?
        .to_string();

    // Solo GET/OPTIONS: el cuerpo, si lo hay, se ignora.
    let headers = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(k, v)| (k.trim().to_ascii_lowercase(), v.trim().to_string()))
        .collect();

    Ok(HttpRequest {
        method,
        target,
        headers,
    })
}

fn find_header_end(bytes: &[u8]) -> Option<usize> {
    bytes.windows(4).position(|w| w == b"\r\n\r\n")
}

impl HttpRequest {
    fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .get(&key.to_ascii_lowercase())
            .map(|s| s.as_str())
    }
}

fn write_reply(stream: &mut TcpStream, reply: &ProxyReply) {
    match reply {
        ProxyReply::Json { status, body } => write_json_response(stream, *status, body),
        ProxyReply::Text { status, body } => write_text_response(stream, *status, body),
        ProxyReply::Empty { status } => write_http_response(stream, *status, "text/plain", ""),
    }
}

fn write_text_response(stream: &mut TcpStream, status: u16, body: &str) {
    write_http_response(stream, status, "text/plain; charset=utf-8", body)
}

fn write_json_response(stream: &mut TcpStream, status: u16, body: &serde_json::Value) {
    match serde_json::to_string(body) {
        Ok(json) => write_http_response(stream, status, "application/json", &json),
        Err(err) => write_http_response(
            stream,
            500,
            "text/plain; charset=utf-8",
            &format!("error serializando respuesta JSON: {err}"),
        ),
    }
}

fn write_http_response(stream: &mut TcpStream, status: u16, content_type: &str, body: &str) {
    let status_text = match status {
        200 => "OK",
        204 => "No Content",
        400 => "Bad Request",
        404 => "Not Found",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        _ => "OK",
    };

    let response = format!(
        "HTTP/1.1 {status} {status_text}\r\nContent-Type: {content_type}\r\nAccess-Control-Allow-Origin: *\r\nAccess-Control-Allow-Methods: GET, OPTIONS\r\nAccess-Control-Allow-Headers: Content-Type\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        body.len(),
        body
    );

    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
}

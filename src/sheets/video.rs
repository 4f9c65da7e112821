//! Reescritura de enlaces de vídeo a su forma embebible.

use regex::Regex;
use std::sync::LazyLock;
use url::Url;

const EMBED_BASE: &str = "https://www.youtube.com/embed/";
const PLAYLIST_EMBED: &str = "https://www.youtube.com/embed?listType=playlist&list=";

static WATCH_PARAM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[?&]v=([^&]+)").expect("regex v= válida"));
static SHORT_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"youtu\.be/([^?&/]+)").expect("regex youtu.be válida"));

/// Devuelve la URL embebible, `""` si no hay entrada, o la original si no se reconoce.
///
/// Es idempotente: una URL ya embebible se devuelve sin tocar.
pub fn canonical_embed_url(raw: &str) -> String {
    let url = raw.trim();
    if url.is_empty() {
        return String::new();
    }
    if is_embeddable(url) {
        return url.to_string();
    }

    Url::parse(url)
        .ok()
        .and_then(|parsed| from_parsed(&parsed))
        .or_else(|| from_patterns(url))
        .unwrap_or_else(|| url.to_string())
}

fn is_embeddable(url: &str) -> bool {
    url.contains("/embed/") || url.contains("/embed?") || url.contains("youtube-nocookie.com")
}

fn query_param(url: &Url, name: &str) -> Option<String> {
    url.query_pairs()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

fn with_playlist(id: &str, list: Option<String>) -> String {
    match list {
        Some(list) => format!("{EMBED_BASE}{id}?list={list}"),
        None => format!("{EMBED_BASE}{id}"),
    }
}

fn from_parsed(url: &Url) -> Option<String> {
    let host = url.host_str()?.to_ascii_lowercase();
    let list = query_param(url, "list");

    if host.contains("youtu.be") {
        let id = url.path_segments()?.find(|segment| !segment.is_empty())?;
        return Some(with_playlist(id, list));
    }

    if host.contains("youtube.com") {
        if let Some(v) = query_param(url, "v") {
            return Some(with_playlist(&v, list));
        }
        if url.path().contains("/playlist") {
            return list.map(|list| format!("{PLAYLIST_EMBED}{list}"));
        }
    }
    None
}

fn from_patterns(url: &str) -> Option<String> {
    WATCH_PARAM
        .captures(url)
        .or_else(|| SHORT_LINK.captures(url))
        .and_then(|caps| caps.get(1))
        .map(|id| format!("{EMBED_BASE}{}", id.as_str()))
}

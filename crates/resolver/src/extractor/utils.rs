use regex::Regex;
use serde_json::Value;
use url::Url;

use crate::media::ManifestType;

#[inline]
pub fn capture_group_1<'a>(re: &Regex, input: &'a str) -> Option<&'a str> {
    re.captures(input)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Checks the URL host against `hosts`, ignoring a leading `www.` or `m.`.
///
/// Returns the index of the matching host. Only http(s) URLs can match.
pub fn uri_matches_hosts(url: &Url, hosts: &[&str]) -> Option<usize> {
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }

    let host = url.host_str()?.to_ascii_lowercase();
    let host = host
        .strip_prefix("www.")
        .or_else(|| host.strip_prefix("m."))
        .unwrap_or(&host);

    hosts.iter().position(|candidate| candidate.eq_ignore_ascii_case(host))
}

/// Guesses the manifest kind from a URL path and an optional content type.
pub fn detect_manifest_type(url: &str, content_type: Option<&str>) -> ManifestType {
    if let Some(content_type) = content_type {
        let content_type = content_type.to_ascii_lowercase();
        if content_type.contains("mpegurl") {
            return ManifestType::Hls;
        }
        if content_type.contains("dash+xml") {
            return ManifestType::Dash;
        }
    }

    let path = Url::parse(url)
        .map(|u| u.path().to_ascii_lowercase())
        .unwrap_or_else(|_| url.to_ascii_lowercase());
    if path.ends_with(".m3u8") || path.ends_with(".m3u") {
        ManifestType::Hls
    } else if path.ends_with(".mpd") {
        ManifestType::Dash
    } else {
        ManifestType::Unknown
    }
}

/// Walks `path` through nested JSON objects.
#[inline]
pub fn json_get<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(value, |current, key| current.get(key))
}

#[inline]
pub fn json_get_str<'a>(value: &'a Value, path: &[&str]) -> Option<&'a str> {
    json_get(value, path).and_then(Value::as_str)
}

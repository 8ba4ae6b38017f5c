use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::adaptive_stream::AdaptiveStream;
use super::stream::Stream;

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
/// Media information resolved from a single page URL.
///
/// A fresh instance is created for every resolve call and filled in by the
/// active handler while it parses responses.
///
/// # Fields
///
/// * `id` - Site specific identifier of the media, if known
/// * `title` - Title of the media
/// * `description` - Free form description
/// * `duration` - Duration in seconds, `0` when unknown
/// * `streams` - Progressive streams, in the order the handler found them
/// * `adaptive_streams` - Segmented streams, in the order the handler found them
/// * `request_headers` - Headers a player has to send when fetching the streams
///
/// # Examples
///
/// ```rust
/// use media_resolver::media::{MediaInfo, Stream};
///
/// let mut info = MediaInfo::new();
/// info.set_title("Sample");
/// info.set_duration(85);
/// info.add_stream(Stream::builder("https://example.com/video.mp4").build());
///
/// assert_eq!(info.title(), Some("Sample"));
/// assert_eq!(info.streams().len(), 1);
/// ```
pub struct MediaInfo {
    id: Option<String>,
    title: Option<String>,
    description: Option<String>,
    duration: u32,
    streams: Vec<Stream>,
    adaptive_streams: Vec<AdaptiveStream>,
    #[serde(default, skip_serializing_if = "FxHashMap::is_empty")]
    request_headers: FxHashMap<String, String>,
}

impl MediaInfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn set_id<S: Into<String>>(&mut self, id: S) {
        self.id = Some(id.into());
    }

    pub fn set_id_opt(&mut self, id: Option<String>) {
        self.id = id;
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn set_title<S: Into<String>>(&mut self, title: S) {
        self.title = Some(title.into());
    }

    pub fn set_title_opt(&mut self, title: Option<String>) {
        self.title = title;
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn set_description<S: Into<String>>(&mut self, description: S) {
        self.description = Some(description.into());
    }

    pub fn set_description_opt(&mut self, description: Option<String>) {
        self.description = description;
    }

    /// Duration in seconds, `0` when unknown.
    pub fn duration(&self) -> u32 {
        self.duration
    }

    pub fn set_duration(&mut self, duration: u32) {
        self.duration = duration;
    }

    pub fn streams(&self) -> &[Stream] {
        &self.streams
    }

    pub fn add_stream(&mut self, stream: Stream) {
        self.streams.push(stream);
    }

    pub fn adaptive_streams(&self) -> &[AdaptiveStream] {
        &self.adaptive_streams
    }

    pub fn add_adaptive_stream(&mut self, stream: AdaptiveStream) {
        self.adaptive_streams.push(stream);
    }

    pub fn has_streams(&self) -> bool {
        !self.streams.is_empty() || !self.adaptive_streams.is_empty()
    }

    pub fn request_headers(&self) -> &FxHashMap<String, String> {
        &self.request_headers
    }

    pub fn insert_request_header<K: Into<String>, V: Into<String>>(&mut self, name: K, value: V) {
        self.request_headers.insert(name.into(), value.into());
    }

    /// Serialize the MediaInfo to a JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize the MediaInfo to a pretty-formatted JSON string
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize a MediaInfo from a JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Returns a boxed, human readable summary of the media.
    pub fn pretty_print(&self) -> String {
        use std::fmt::Write;

        let mut output = String::new();
        let width = 60;
        let border_top = format!("╔{}╗", "═".repeat(width));
        let border_bottom = format!("╚{}╝", "═".repeat(width));
        let separator = format!("╟{}╢", "─".repeat(width));

        let format_line = |label: &str, value: &str| -> String {
            let mut content = format!("  {label} {value}");
            if content.chars().count() > width {
                content = content.chars().take(width - 3).collect::<String>() + "...";
            }
            let padding = width.saturating_sub(content.chars().count());
            format!("║{}{}║", content, " ".repeat(padding))
        };

        let _ = writeln!(output, "{border_top}");
        let _ = writeln!(output, "{}", format_line("Title:", self.title().unwrap_or("-")));
        if let Some(id) = self.id() {
            let _ = writeln!(output, "{}", format_line("Id:", id));
        }
        let _ = writeln!(
            output,
            "{}",
            format_line("Duration:", &format!("{}s", self.duration))
        );

        for stream in &self.streams {
            let _ = writeln!(output, "{separator}");
            let _ = writeln!(output, "{}", format_line("Stream:", &stream.to_string()));
            let _ = writeln!(output, "{}", format_line("URI:", &stream.uri));
        }

        for stream in &self.adaptive_streams {
            let _ = writeln!(output, "{separator}");
            let _ = writeln!(
                output,
                "{}",
                format_line(
                    "Adaptive:",
                    &format!("[{}] {}", stream.manifest_type().as_str(), stream.stream)
                )
            );
            let _ = writeln!(output, "{}", format_line("URI:", &stream.uri));
        }

        let _ = write!(output, "{border_bottom}");
        output
    }
}

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Container/media type hint of a stream.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum StreamMimeType {
    #[default]
    Unknown,
    VideoMp4,
    AudioMp4,
    VideoWebm,
    AudioWebm,
}

impl StreamMimeType {
    pub fn as_str(&self) -> &str {
        match self {
            StreamMimeType::Unknown => "application/octet-stream",
            StreamMimeType::VideoMp4 => "video/mp4",
            StreamMimeType::AudioMp4 => "audio/mp4",
            StreamMimeType::VideoWebm => "video/webm",
            StreamMimeType::AudioWebm => "audio/webm",
        }
    }

    /// Parses a mime string, ignoring any `; codecs=...` parameters.
    pub fn from_mime(mime: &str) -> Self {
        let essence = mime.split(';').next().unwrap_or_default().trim();
        match essence.to_ascii_lowercase().as_str() {
            "video/mp4" => StreamMimeType::VideoMp4,
            "audio/mp4" => StreamMimeType::AudioMp4,
            "video/webm" => StreamMimeType::VideoWebm,
            "audio/webm" => StreamMimeType::AudioWebm,
            _ => StreamMimeType::Unknown,
        }
    }

    pub fn is_video(&self) -> bool {
        matches!(self, StreamMimeType::VideoMp4 | StreamMimeType::VideoWebm)
    }

    pub fn is_audio(&self) -> bool {
        matches!(self, StreamMimeType::AudioMp4 | StreamMimeType::AudioWebm)
    }
}

impl fmt::Display for StreamMimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const VIDEO_CODEC_PREFIXES: &[&str] = &[
    "avc1", "avc3", "hev1", "hvc1", "vp8", "vp9", "vp09", "av01", "dvh1", "dvhe",
];

/// Whether an RFC 6381 codec string names a video codec.
pub(crate) fn is_video_codec(codec: &str) -> bool {
    let family = codec.split('.').next().unwrap_or_default();
    VIDEO_CODEC_PREFIXES
        .iter()
        .any(|prefix| family.eq_ignore_ascii_case(prefix))
}

/// A directly playable stream.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Stream {
    // Numeric identifier of the stream within its media, e.g. a format id
    pub itag: u32,
    pub uri: String,
    pub mime_type: StreamMimeType,
    // RFC 6381 codec list, e.g. "avc1.64001F,mp4a.40.2"
    pub codecs: Option<String>,
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    // Bits per second
    pub bitrate: u64,
    #[serde(default, skip_serializing_if = "FxHashMap::is_empty")]
    pub extras: FxHashMap<String, String>,
}

impl Stream {
    pub fn builder(uri: impl Into<String>) -> StreamBuilder {
        StreamBuilder::new(uri)
    }

    /// Splits the codec list into its video and audio parts.
    ///
    /// Returns `None` when no codecs are known. Either side of the pair is
    /// `None` when the stream does not carry that kind of track.
    pub fn codecs_split(&self) -> Option<(Option<&str>, Option<&str>)> {
        let codecs = self.codecs.as_deref()?;

        let mut video = None;
        let mut audio = None;
        for codec in codecs.split(',').map(str::trim).filter(|c| !c.is_empty()) {
            if is_video_codec(codec) {
                video.get_or_insert(codec);
            } else {
                audio.get_or_insert(codec);
            }
        }

        if video.is_none() && audio.is_none() {
            return None;
        }
        Some((video, audio))
    }

    pub fn extra(&self, key: &str) -> Option<&str> {
        self.extras.get(key).map(String::as_str)
    }
}

impl fmt::Display for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}x{}@{} ({} bps)",
            self.mime_type, self.width, self.height, self.fps, self.bitrate
        )
    }
}

#[derive(Debug, Clone)]
pub struct StreamBuilder {
    stream: Stream,
}

impl StreamBuilder {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            stream: Stream {
                uri: uri.into(),
                ..Default::default()
            },
        }
    }

    pub fn itag(mut self, itag: u32) -> Self {
        self.stream.itag = itag;
        self
    }

    pub fn mime_type(mut self, mime_type: StreamMimeType) -> Self {
        self.stream.mime_type = mime_type;
        self
    }

    pub fn codecs(mut self, codecs: impl Into<String>) -> Self {
        self.stream.codecs = Some(codecs.into());
        self
    }

    pub fn codecs_opt(mut self, codecs: Option<String>) -> Self {
        self.stream.codecs = codecs;
        self
    }

    pub fn resolution(mut self, width: u32, height: u32) -> Self {
        self.stream.width = width;
        self.stream.height = height;
        self
    }

    pub fn fps(mut self, fps: u32) -> Self {
        self.stream.fps = fps;
        self
    }

    pub fn bitrate(mut self, bitrate: u64) -> Self {
        self.stream.bitrate = bitrate;
        self
    }

    pub fn extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.stream.extras.insert(key.into(), value.into());
        self
    }

    pub fn build(self) -> Stream {
        self.stream
    }
}

use serde::{Deserialize, Serialize};
use std::ops::{Deref, DerefMut};

use super::stream::Stream;

/// Which kind of manifest describes the segments of an adaptive stream.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ManifestType {
    #[default]
    Unknown,
    Dash,
    Hls,
}

impl ManifestType {
    pub fn as_str(&self) -> &str {
        match self {
            ManifestType::Unknown => "unknown",
            ManifestType::Dash => "dash",
            ManifestType::Hls => "hls",
        }
    }
}

/// Half-open byte interval `[start, end)` inside a stream resource.
///
/// Any pair of values may be stored. The range only reads as present when
/// `end > start`, so a zeroed (default) range is absent.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ByteRange {
    pub start: u64,
    pub end: u64,
}

impl ByteRange {
    pub fn new(start: u64, end: u64) -> Self {
        Self { start, end }
    }

    pub fn is_valid(&self) -> bool {
        self.end > self.start
    }

    pub fn get(&self) -> Option<(u64, u64)> {
        self.is_valid().then_some((self.start, self.end))
    }

    /// Length in bytes, `0` when the range is absent.
    pub fn len(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        !self.is_valid()
    }
}

/// A segmented stream, addressed through a manifest and byte ranges.
///
/// Dereferences to [`Stream`] for the shared attribute set.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct AdaptiveStream {
    #[serde(flatten)]
    pub stream: Stream,
    pub manifest_type: ManifestType,
    #[serde(default)]
    init_range: ByteRange,
    #[serde(default)]
    index_range: ByteRange,
}

impl AdaptiveStream {
    pub fn new(stream: Stream) -> Self {
        Self {
            stream,
            ..Default::default()
        }
    }

    pub fn with_manifest(stream: Stream, manifest_type: ManifestType) -> Self {
        Self {
            stream,
            manifest_type,
            ..Default::default()
        }
    }

    pub fn manifest_type(&self) -> ManifestType {
        self.manifest_type
    }

    pub fn set_manifest_type(&mut self, manifest_type: ManifestType) {
        self.manifest_type = manifest_type;
    }

    /// Byte range of the initialization segment, `None` unless `end > start`.
    pub fn init_range(&self) -> Option<(u64, u64)> {
        self.init_range.get()
    }

    pub fn set_init_range(&mut self, start: u64, end: u64) {
        self.init_range = ByteRange::new(start, end);
    }

    /// Byte range of the segment index, `None` unless `end > start`.
    pub fn index_range(&self) -> Option<(u64, u64)> {
        self.index_range.get()
    }

    pub fn set_index_range(&mut self, start: u64, end: u64) {
        self.index_range = ByteRange::new(start, end);
    }
}

impl Deref for AdaptiveStream {
    type Target = Stream;

    fn deref(&self) -> &Self::Target {
        &self.stream
    }
}

impl DerefMut for AdaptiveStream {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.stream
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranges_absent_by_default() {
        let stream = AdaptiveStream::default();
        assert_eq!(stream.init_range(), None);
        assert_eq!(stream.index_range(), None);
        assert_eq!(stream.manifest_type(), ManifestType::Unknown);
    }

    #[test]
    fn test_degenerate_ranges_read_as_absent() {
        let samples = [(0, 0), (1, 1), (500, 500), (10, 3), (u64::MAX, 0), (u64::MAX, u64::MAX)];
        let mut stream = AdaptiveStream::default();

        for (start, end) in samples {
            stream.set_init_range(start, end);
            stream.set_index_range(start, end);
            assert_eq!(stream.init_range(), None, "init ({start}, {end})");
            assert_eq!(stream.index_range(), None, "index ({start}, {end})");
        }
    }

    #[test]
    fn test_forward_ranges_are_returned_exactly() {
        let samples = [(0, 1), (0, 500), (741, 1204), (u64::MAX - 1, u64::MAX)];
        let mut stream = AdaptiveStream::default();

        for (start, end) in samples {
            stream.set_init_range(start, end);
            stream.set_index_range(start, end);
            assert_eq!(stream.init_range(), Some((start, end)));
            assert_eq!(stream.index_range(), Some((start, end)));
        }
    }

    #[test]
    fn test_init_present_index_absent() {
        let mut stream = AdaptiveStream::with_manifest(
            Stream::builder("https://example.com/video.mp4").build(),
            ManifestType::Dash,
        );
        stream.set_init_range(0, 500);
        stream.set_index_range(500, 500);

        assert_eq!(stream.init_range(), Some((0, 500)));
        assert_eq!(stream.index_range(), None);
    }

    #[test]
    fn test_speculative_range_can_be_finalized_later() {
        let mut stream = AdaptiveStream::default();
        stream.set_index_range(900, 0);
        assert_eq!(stream.index_range(), None);

        stream.set_index_range(900, 1800);
        assert_eq!(stream.index_range(), Some((900, 1800)));
    }

    #[test]
    fn test_deref_exposes_stream_attributes() {
        let mut stream = AdaptiveStream::new(Stream::builder("https://example.com/a").build());
        stream.width = 1280;
        stream.height = 720;
        assert_eq!(stream.uri, "https://example.com/a");
        assert_eq!((stream.stream.width, stream.stream.height), (1280, 720));
    }

    #[test]
    fn test_byte_range_len() {
        assert_eq!(ByteRange::new(10, 30).len(), 20);
        assert_eq!(ByteRange::new(30, 10).len(), 0);
        assert!(ByteRange::new(5, 5).is_empty());
    }
}

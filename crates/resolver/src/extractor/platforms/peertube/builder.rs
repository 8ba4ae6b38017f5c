use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;
use url::Url;

use crate::{
    extractor::{
        error::ExtractorError,
        handler::{Flow, Handler, MatchContext, ResponseBody},
        platforms::peertube::models::{VideoDetails, VideoFile},
        request::RequestDescriptor,
        utils::capture_group_1,
    },
    media::{AdaptiveStream, ManifestType, MediaInfo, Stream, StreamMimeType},
};

static URL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/(?:videos/watch|w)/([0-9A-Za-z-]+)/?$").unwrap());

/// Videos hosted on any PeerTube instance.
pub struct PeerTube {
    // Scheme, host and port of the instance
    origin: String,
    video_id: String,
}

impl PeerTube {
    pub fn matches(url: &Url) -> Option<MatchContext> {
        if !matches!(url.scheme(), "http" | "https") {
            return None;
        }
        url.host_str()?;

        let video_id = capture_group_1(&URL_REGEX, url.path())?;
        Some(MatchContext::new(url.clone(), video_id))
    }

    pub fn new(context: MatchContext) -> Self {
        Self {
            origin: context.url.origin().ascii_serialization(),
            video_id: context.video_id,
        }
    }

    fn api_url(&self) -> String {
        format!("{}/api/v1/videos/{}", self.origin, self.video_id)
    }
}

fn file_stream(itag: u32, file: VideoFile) -> Option<Stream> {
    let uri = file.file_url?;
    let height = file.resolution.map(|r| r.id).unwrap_or(0);

    let extension = Url::parse(&uri)
        .ok()
        .and_then(|url| url.path().rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase()));

    let mime_type = match (extension.as_deref(), height) {
        (Some("webm"), 0) => StreamMimeType::AudioWebm,
        (Some("webm"), _) => StreamMimeType::VideoWebm,
        (Some("mp4"), 0) => StreamMimeType::AudioMp4,
        (Some("mp4"), _) => StreamMimeType::VideoMp4,
        _ => StreamMimeType::Unknown,
    };

    let mut builder = Stream::builder(uri)
        .itag(itag)
        .mime_type(mime_type)
        .resolution(0, height)
        .fps(file.fps.map(|f| f.max(0.0).round() as u32).unwrap_or(0));
    if let Some(size) = file.size {
        builder = builder.extra("size", size.to_string());
    }

    Some(builder.build())
}

impl Handler for PeerTube {
    fn name(&self) -> &'static str {
        "peertube"
    }

    fn create_request(&mut self, _info: &MediaInfo) -> Result<RequestDescriptor, ExtractorError> {
        Ok(RequestDescriptor::get(self.api_url()))
    }

    fn parse_response(
        &mut self,
        body: ResponseBody,
        info: &mut MediaInfo,
    ) -> Result<Flow, ExtractorError> {
        let details: VideoDetails = serde_json::from_value(body.into_json()?)?;

        info.set_id_opt(details.uuid);
        info.set_title_opt(details.name);
        info.set_description_opt(details.description);
        info.set_duration(details.duration);

        let mut itag = 0;
        for file in details.files {
            if let Some(stream) = file_stream(itag, file) {
                info.add_stream(stream);
                itag += 1;
            }
        }

        for playlist in details.streaming_playlists {
            if let Some(playlist_url) = playlist.playlist_url {
                info.add_adaptive_stream(AdaptiveStream::with_manifest(
                    Stream::builder(playlist_url).build(),
                    ManifestType::Hls,
                ));
            }
            for file in playlist.files {
                if let Some(stream) = file_stream(itag, file) {
                    info.add_stream(stream);
                    itag += 1;
                }
            }
        }

        if !info.has_streams() {
            return Err(ExtractorError::NoStreamsFound);
        }

        debug!(
            streams = info.streams().len(),
            adaptive_streams = info.adaptive_streams().len(),
            "Parsed PeerTube video"
        );
        Ok(Flow::Ok)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::engine::Resolver;
    use crate::extractor::platforms::peertube::models::Resolution;
    use crate::extractor::testing::ScriptedTransport;
    use serde_json::{Value, json};
    use std::sync::Arc;

    const UUID: &str = "9c9de5e8-0a1e-484a-b099-e80766180a6d";

    fn handler(url: &str) -> PeerTube {
        PeerTube::new(PeerTube::matches(&Url::parse(url).unwrap()).unwrap())
    }

    fn video_details() -> Value {
        json!({
            "uuid": UUID,
            "name": "What is PeerTube?",
            "description": "A short introduction",
            "duration": 113,
            "files": [
                {
                    "fileUrl": "https://framatube.org/static/web-videos/video-1080.mp4",
                    "resolution": {"id": 1080, "label": "1080p"},
                    "fps": 25,
                    "size": 43_210_000
                },
                {
                    "fileUrl": "https://framatube.org/static/web-videos/video-0.mp4",
                    "resolution": {"id": 0, "label": "Audio"},
                    "fps": -1
                }
            ],
            "streamingPlaylists": [
                {
                    "playlistUrl": "https://framatube.org/static/streaming-playlists/hls/master.m3u8",
                    "files": [
                        {
                            "fileUrl": "https://framatube.org/static/streaming-playlists/hls/video-720-fragmented.mp4",
                            "resolution": {"id": 720},
                            "fps": 25
                        }
                    ]
                }
            ]
        })
    }

    #[test]
    fn test_matches_watch_paths() {
        for url in [
            "https://framatube.org/videos/watch/9c9de5e8-0a1e-484a-b099-e80766180a6d",
            "https://framatube.org/w/9c9de5e8-0a1e-484a-b099-e80766180a6d",
            "http://peertube.example.net/w/9c9de5e8-0a1e-484a-b099-e80766180a6d/",
        ] {
            let context = PeerTube::matches(&Url::parse(url).unwrap()).unwrap();
            assert_eq!(context.video_id, UUID, "{url}");
        }

        let short_url = Url::parse("https://framatube.org/w/kkGMgK9ZtnKfYAgnEtQxbv").unwrap();
        let short = PeerTube::matches(&short_url);
        assert_eq!(short.unwrap().video_id, "kkGMgK9ZtnKfYAgnEtQxbv");
    }

    #[test]
    fn test_rejects_other_paths() {
        for url in [
            "https://framatube.org/videos/local",
            "https://framatube.org/w/p/some-playlist",
            "ftp://framatube.org/w/9c9de5e8",
        ] {
            assert!(PeerTube::matches(&Url::parse(url).unwrap()).is_none(), "{url}");
        }
    }

    #[test]
    fn test_api_request_keeps_port() {
        let mut peertube = handler("https://tube.example.org:8443/w/abc");
        let request = peertube.create_request(&MediaInfo::new()).unwrap();
        assert_eq!(request.url, "https://tube.example.org:8443/api/v1/videos/abc");
    }

    #[test]
    fn test_api_request_keeps_scheme() {
        let mut peertube = handler("http://localhost:9000/w/abc");
        let request = peertube.create_request(&MediaInfo::new()).unwrap();
        assert_eq!(request.url, "http://localhost:9000/api/v1/videos/abc");

        let mut peertube = handler("https://framatube.org/w/abc");
        let request = peertube.create_request(&MediaInfo::new()).unwrap();
        assert_eq!(request.url, "https://framatube.org/api/v1/videos/abc");
    }

    #[test]
    fn test_mime_type_ignores_query() {
        let file = |url: &str, height: u32| VideoFile {
            file_url: Some(url.to_string()),
            resolution: Some(Resolution { id: height }),
            fps: None,
            size: None,
        };

        let stream = file_stream(0, file("https://x.example/v-720.mp4?token=1", 720)).unwrap();
        assert_eq!(stream.mime_type, StreamMimeType::VideoMp4);
        assert_eq!(stream.uri, "https://x.example/v-720.mp4?token=1");

        let stream = file_stream(0, file("https://x.example/a.WEBM#t=0", 0)).unwrap();
        assert_eq!(stream.mime_type, StreamMimeType::AudioWebm);

        let stream = file_stream(0, file("https://x.example/v.mp4/download", 720)).unwrap();
        assert_eq!(stream.mime_type, StreamMimeType::Unknown);
    }

    #[test]
    fn test_parse_video_details() {
        let mut peertube = handler("https://framatube.org/w/9c9de5e8-0a1e-484a-b099-e80766180a6d");
        let mut info = MediaInfo::new();

        let flow = peertube
            .parse_response(ResponseBody::Json(video_details()), &mut info)
            .unwrap();

        assert_eq!(flow, Flow::Ok);
        assert_eq!(info.id(), Some(UUID));
        assert_eq!(info.title(), Some("What is PeerTube?"));
        assert_eq!(info.duration(), 113);

        let streams = info.streams();
        assert_eq!(streams.len(), 3);
        assert_eq!(streams[0].height, 1080);
        assert_eq!(streams[0].fps, 25);
        assert_eq!(streams[0].mime_type, StreamMimeType::VideoMp4);
        assert_eq!(streams[0].extra("size"), Some("43210000"));
        assert_eq!(streams[1].mime_type, StreamMimeType::AudioMp4);
        assert_eq!(streams[1].fps, 0);
        assert_eq!(streams[2].itag, 2);
        assert_eq!(streams[2].height, 720);

        let adaptive = info.adaptive_streams();
        assert_eq!(adaptive.len(), 1);
        assert_eq!(adaptive[0].manifest_type(), ManifestType::Hls);
        assert!(adaptive[0].uri.ends_with("master.m3u8"));
    }

    #[test]
    fn test_no_streams() {
        let mut peertube = handler("https://framatube.org/w/abc");
        let result = peertube.parse_response(
            ResponseBody::Json(json!({"uuid": "abc", "name": "Live soon", "files": []})),
            &mut MediaInfo::new(),
        );
        assert!(matches!(result, Err(ExtractorError::NoStreamsFound)));
    }

    #[tokio::test]
    async fn test_resolve_single_round() {
        let transport = Arc::new(ScriptedTransport::new().respond_json(
            "https://framatube.org/api/v1/videos/9c9de5e8-0a1e-484a-b099-e80766180a6d",
            video_details(),
        ));
        let resolver = Resolver::with_transport(transport.clone());

        let info = resolver
            .resolve("https://framatube.org/videos/watch/9c9de5e8-0a1e-484a-b099-e80766180a6d")
            .await
            .unwrap();

        assert_eq!(transport.sends(), 1);
        assert_eq!(
            transport.requests()[0].url,
            "https://framatube.org/api/v1/videos/9c9de5e8-0a1e-484a-b099-e80766180a6d"
        );
        assert_eq!(info.streams().len(), 3);
    }
}

use serde_json::{Value, json};
use tracing::debug;
use url::Url;

use crate::{
    extractor::{
        error::ExtractorError,
        handler::{Flow, Handler, MatchContext, ResponseBody},
        hls::parse_hls_playlist,
        platforms::odysee::models::{GetResult, ResolveResult, RpcResponse},
        request::RequestDescriptor,
        transport::Response,
        utils::{detect_manifest_type, uri_matches_hosts},
    },
    media::{ManifestType, MediaInfo, Stream, StreamMimeType},
};

/// Secondary resource the handler has to fetch next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecondaryFetch {
    /// Follow the streaming URL to learn what it points at.
    Head(String),
    /// Download and parse the HLS playlist.
    Manifest(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    NotStarted,
    SecondaryPending(SecondaryFetch),
    SecondaryDone,
}

/// Odysee (LBRY) videos.
///
/// The streaming URL comes from the `get` API method and is followed to find
/// out whether it is an HLS playlist or a plain file. The metadata comes from
/// `resolve` in the last round.
pub struct Odysee {
    video_id: String,
    phase: Phase,
    direct_url: Option<String>,
}

impl Odysee {
    const API_URL: &str = "https://api.na-backend.odysee.com/api/v1/proxy";
    const RPC_CONTENT_TYPE: &str = "application/json-rpc";
    // The CDN expects requests coming from the site
    const REFERER: &str = "https://odysee.com/";

    pub fn matches(url: &Url) -> Option<MatchContext> {
        uri_matches_hosts(url, &["odysee.com"])?;

        // Claim paths always start with a channel name
        let path = url.path();
        if !path.starts_with("/@") {
            return None;
        }

        let mut video_id = path[1..].to_string();
        if let Some(fragment) = url.fragment() {
            video_id.push('#');
            video_id.push_str(fragment);
        }

        Some(MatchContext::new(url.clone(), video_id))
    }

    pub fn new(context: MatchContext) -> Self {
        debug!("Requested video: {}", context.video_id);
        Self {
            video_id: context.video_id,
            phase: Phase::NotStarted,
            direct_url: None,
        }
    }

    pub fn video_id(&self) -> &str {
        &self.video_id
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    fn api_request(&self, method: &str, param: &str) -> Result<RequestDescriptor, ExtractorError> {
        let body = json!({
            "method": method,
            "params": { param: self.video_id },
        });
        Ok(RequestDescriptor::post(Self::API_URL)
            .json_body(Self::RPC_CONTENT_TYPE, &body)?)
    }

    fn acquire_streaming_url(&mut self, value: Value) -> Result<Flow, ExtractorError> {
        debug!("Searching for streaming URL...");

        let response: RpcResponse<GetResult> = serde_json::from_value(value)?;
        if let Some(error) = response.error {
            return Err(ExtractorError::ValidationError(error.message));
        }

        let streaming_url = response
            .result
            .and_then(|r| r.streaming_url)
            .ok_or_else(|| {
                ExtractorError::ValidationError("Streaming URL is missing".to_string())
            })?;

        debug!("Got streaming URL: {}", streaming_url);
        self.phase = Phase::SecondaryPending(SecondaryFetch::Head(streaming_url));

        Ok(Flow::Restart)
    }

    fn inspect_streaming_url(&mut self, response: Response) -> Flow {
        let manifest_type = detect_manifest_type(&response.url, response.content_type.as_deref());
        debug!(url = %response.url, ?manifest_type, "Checked streaming URL");

        if manifest_type == ManifestType::Hls {
            self.phase = Phase::SecondaryPending(SecondaryFetch::Manifest(response.url));
        } else {
            self.direct_url = Some(response.url);
            self.phase = Phase::SecondaryDone;
        }

        Flow::Restart
    }

    fn parse_hls(
        &mut self,
        response: Response,
        info: &mut MediaInfo,
    ) -> Result<Flow, ExtractorError> {
        debug!("Parsing HLS...");

        parse_hls_playlist(&response.body, &response.url, info)?;
        self.phase = Phase::SecondaryDone;

        Ok(Flow::Restart)
    }

    fn fill_media_info(
        &mut self,
        value: Value,
        info: &mut MediaInfo,
    ) -> Result<Flow, ExtractorError> {
        debug!("Filling media info...");

        let invalid =
            || ExtractorError::ValidationError("Invalid website API response".to_string());

        let response: RpcResponse<ResolveResult> = serde_json::from_value(value)?;
        let mut result = response.result.ok_or_else(invalid)?;
        let claim = result.remove(&self.video_id).ok_or_else(invalid)?;
        let claim_value = claim.value.ok_or_else(invalid)?;

        info.set_id_opt(claim.claim_id);
        info.set_title_opt(claim_value.title);
        info.set_description_opt(claim_value.description);

        let meta = claim_value.video.or(claim_value.audio);
        if let Some(duration) = meta.as_ref().and_then(|m| m.duration) {
            info.set_duration(duration);
        }

        if let Some(url) = self.direct_url.take() {
            let (width, height) = meta
                .as_ref()
                .map(|m| (m.width.unwrap_or(0), m.height.unwrap_or(0)))
                .unwrap_or_default();
            let mime_type = if width > 0 {
                StreamMimeType::VideoMp4
            } else {
                StreamMimeType::Unknown
            };
            info.add_stream(
                Stream::builder(url)
                    .mime_type(mime_type)
                    .resolution(width, height)
                    .build(),
            );
        }

        if info.has_streams() {
            info.insert_request_header("Referer", Self::REFERER);
        }

        debug!("Media info filled");
        Ok(Flow::Ok)
    }
}

impl Handler for Odysee {
    fn name(&self) -> &'static str {
        "odysee"
    }

    fn handles_raw_body(&self) -> bool {
        matches!(self.phase, Phase::SecondaryPending(_))
    }

    fn create_request(&mut self, _info: &MediaInfo) -> Result<RequestDescriptor, ExtractorError> {
        match &self.phase {
            Phase::NotStarted => self.api_request("get", "uri"),
            Phase::SecondaryPending(SecondaryFetch::Head(url)) => {
                Ok(RequestDescriptor::head(url.as_str())
                    .header("Referer", Self::REFERER))
            }
            Phase::SecondaryPending(SecondaryFetch::Manifest(url)) => {
                Ok(RequestDescriptor::get(url.as_str())
                    .header("Referer", Self::REFERER))
            }
            Phase::SecondaryDone => self.api_request("resolve", "urls"),
        }
    }

    fn parse_response(
        &mut self,
        body: ResponseBody,
        info: &mut MediaInfo,
    ) -> Result<Flow, ExtractorError> {
        match self.phase {
            Phase::NotStarted => self.acquire_streaming_url(body.into_json()?),
            Phase::SecondaryPending(SecondaryFetch::Head(_)) => {
                Ok(self.inspect_streaming_url(body.into_raw()?))
            }
            Phase::SecondaryPending(SecondaryFetch::Manifest(_)) => {
                self.parse_hls(body.into_raw()?, info)
            }
            Phase::SecondaryDone => self.fill_media_info(body.into_json()?, info),
        }
    }
}

use m3u8_rs::{MasterPlaylist, Playlist, VariantStream};
use tracing::debug;
use url::Url;

use super::error::ExtractorError;
use crate::media::stream::is_video_codec;
use crate::media::{AdaptiveStream, ManifestType, MediaInfo, Stream, StreamMimeType};

/// Parses an HLS playlist and appends its streams to `info`.
///
/// A master playlist yields one adaptive stream per variant, a media playlist
/// a single adaptive stream pointing at the playlist itself. Returns the
/// number of streams added.
pub fn parse_hls_playlist(
    body: &[u8],
    playlist_url: &str,
    info: &mut MediaInfo,
) -> Result<usize, ExtractorError> {
    let base_url =
        Url::parse(playlist_url).map_err(|e| ExtractorError::HlsPlaylistError(e.to_string()))?;

    let playlist = m3u8_rs::parse_playlist_res(body)
        .map_err(|e| ExtractorError::HlsPlaylistError(e.to_string()))?;

    let streams = match playlist {
        Playlist::MasterPlaylist(pl) => process_master_playlist(pl, &base_url)?,
        Playlist::MediaPlaylist(pl) => {
            if info.duration() == 0 {
                let total: f32 = pl.segments.iter().map(|s| s.duration).sum();
                if pl.end_list && total > 0.0 {
                    info.set_duration(total.round() as u32);
                }
            }
            vec![AdaptiveStream::with_manifest(
                Stream::builder(playlist_url).build(),
                ManifestType::Hls,
            )]
        }
    };

    let count = streams.len();
    debug!(count, playlist_url, "Parsed HLS playlist");
    for stream in streams {
        info.add_adaptive_stream(stream);
    }
    Ok(count)
}

fn guess_mime_type(variant: &VariantStream) -> StreamMimeType {
    let has_video = variant.resolution.is_some()
        || variant
            .codecs
            .as_deref()
            .is_some_and(|codecs| codecs.split(',').any(|c| is_video_codec(c.trim())));

    if has_video {
        StreamMimeType::VideoMp4
    } else if variant.codecs.is_some() {
        StreamMimeType::AudioMp4
    } else {
        StreamMimeType::Unknown
    }
}

fn process_master_playlist(
    playlist: MasterPlaylist,
    base_url: &Url,
) -> Result<Vec<AdaptiveStream>, ExtractorError> {
    playlist
        .variants
        .into_iter()
        .filter(|variant| !variant.is_i_frame)
        .enumerate()
        .map(|(index, variant)| {
            let stream_url = base_url
                .join(&variant.uri)
                .map_err(|e| ExtractorError::HlsPlaylistError(e.to_string()))?;
            let (width, height) = variant
                .resolution
                .as_ref()
                .map(|r| (r.width as u32, r.height as u32))
                .unwrap_or_default();

            let stream = Stream::builder(stream_url.to_string())
                .itag(index as u32)
                .mime_type(guess_mime_type(&variant))
                .codecs_opt(variant.codecs.clone())
                .resolution(width, height)
                .fps(variant.frame_rate.map(|f| f.round() as u32).unwrap_or(0))
                .bitrate(variant.bandwidth)
                .build();

            Ok(AdaptiveStream::with_manifest(stream, ManifestType::Hls))
        })
        .collect()
}

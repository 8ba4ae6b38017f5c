//! DASH manifest generation from adaptive streams that carry byte ranges.
//!
//! Streams addressed by `SegmentBase` (an init segment plus a `sidx` index
//! inside a single file) can be played without the site's own manifest. This
//! module turns those streams back into a static MPD a player can load.

use std::fmt::Write;

use super::{AdaptiveStream, ManifestType, MediaInfo};

fn escape_xml(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Streams that can be described with `SegmentBase`.
fn dash_candidates(info: &MediaInfo) -> impl Iterator<Item = &AdaptiveStream> {
    info.adaptive_streams().iter().filter(|stream| {
        stream.manifest_type() == ManifestType::Dash
            && stream.init_range().is_some()
            && stream.index_range().is_some()
    })
}

fn write_representation(output: &mut String, stream: &AdaptiveStream) {
    // Both ranges were checked by `dash_candidates`
    let (Some((init_start, init_end)), Some((index_start, index_end))) =
        (stream.init_range(), stream.index_range())
    else {
        return;
    };

    let _ = write!(
        output,
        "      <Representation id=\"{}\" bandwidth=\"{}\"",
        stream.itag, stream.bitrate
    );
    if let Some(codecs) = &stream.codecs {
        let _ = write!(output, " codecs=\"{}\"", escape_xml(codecs));
    }
    if stream.mime_type.is_video() || stream.width > 0 {
        let _ = write!(
            output,
            " width=\"{}\" height=\"{}\"",
            stream.width, stream.height
        );
        if stream.fps > 0 {
            let _ = write!(output, " frameRate=\"{}\"", stream.fps);
        }
    }
    let _ = writeln!(output, ">");
    let _ = writeln!(
        output,
        "        <BaseURL>{}</BaseURL>",
        escape_xml(&stream.uri)
    );
    // MPD byte ranges are inclusive on both ends
    let _ = writeln!(
        output,
        "        <SegmentBase indexRange=\"{}-{}\">",
        index_start,
        index_end - 1
    );
    let _ = writeln!(
        output,
        "          <Initialization range=\"{}-{}\"/>",
        init_start,
        init_end - 1
    );
    let _ = writeln!(output, "        </SegmentBase>");
    let _ = writeln!(output, "      </Representation>");
}

/// Generates a static DASH manifest for every DASH adaptive stream whose init
/// and index ranges are both present.
///
/// Returns `None` when no stream qualifies.
pub fn generate_manifest(info: &MediaInfo) -> Option<String> {
    // Group by mime type, keeping the order of first appearance
    let mut sets: Vec<(&str, Vec<&AdaptiveStream>)> = Vec::new();
    for stream in dash_candidates(info) {
        let mime = stream.mime_type.as_str();
        match sets.iter_mut().find(|(m, _)| *m == mime) {
            Some((_, streams)) => streams.push(stream),
            None => sets.push((mime, vec![stream])),
        }
    }

    if sets.is_empty() {
        return None;
    }

    let mut output = String::new();
    let _ = writeln!(output, "<?xml version=\"1.0\" encoding=\"UTF-8\"?>");
    let _ = writeln!(
        output,
        "<MPD xmlns=\"urn:mpeg:dash:schema:mpd:2011\" profiles=\"urn:mpeg:dash:profile:isoff-on-demand:2011\" type=\"static\" minBufferTime=\"PT2S\" mediaPresentationDuration=\"PT{}S\">",
        info.duration()
    );
    let _ = writeln!(output, "  <Period>");

    for (id, (mime, streams)) in sets.iter().enumerate() {
        let _ = writeln!(
            output,
            "    <AdaptationSet id=\"{id}\" mimeType=\"{mime}\" subsegmentAlignment=\"true\">"
        );
        for stream in streams {
            write_representation(&mut output, stream);
        }
        let _ = writeln!(output, "    </AdaptationSet>");
    }

    let _ = writeln!(output, "  </Period>");
    let _ = writeln!(output, "</MPD>");

    Some(output)
}

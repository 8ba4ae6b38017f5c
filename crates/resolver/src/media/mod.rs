pub mod adaptive_stream;
pub mod dash;
pub mod media_info;
pub mod stream;

pub use adaptive_stream::{AdaptiveStream, ByteRange, ManifestType};
pub use media_info::MediaInfo;
pub use stream::{Stream, StreamBuilder, StreamMimeType};

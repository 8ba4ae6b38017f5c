//! Resolves video page URLs into playable stream descriptions.
//!
//! ```no_run
//! use media_resolver::{Resolver, ResolverConfig};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let resolver = Resolver::new(&ResolverConfig::default())?;
//! let info = resolver.resolve("https://odysee.com/@Odysee:8/odysee-intro:3").await?;
//! println!("{}", info.pretty_print());
//! # Ok(())
//! # }
//! ```

pub mod extractor;
pub mod media;

pub use extractor::{ResolveError, Resolver, ResolverConfig};
pub use media::MediaInfo;

pub mod config;
pub mod engine;
pub mod error;
pub mod factory;
pub mod handler;
pub mod hls;
pub mod platforms;
pub mod request;
pub mod transport;
pub mod utils;

#[cfg(test)]
mod testing;

pub use config::{DEFAULT_MAX_ROUNDS, ResolverConfig, ResolverConfigBuilder};
pub use engine::Resolver;
pub use error::{ExtractorError, ResolveError, TransportError};
pub use factory::{HandlerEntry, HandlerFactory};
pub use handler::{Flow, Handler, MatchContext, ResponseBody};
pub use request::RequestDescriptor;
pub use transport::{HttpTransport, Response, Transport};

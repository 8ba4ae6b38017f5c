//! The request/response loop shared by every handler.
//!
//! Each round asks the handler for a request, sends it through the
//! [`Transport`], and lets the handler parse the response. The returned
//! [`Flow`] decides whether the loop stops, continues or fails.

use std::sync::Arc;
use tracing::{debug, trace};

use super::config::{DEFAULT_MAX_ROUNDS, ResolverConfig};
use super::error::{ResolveError, TransportError};
use super::factory::HandlerFactory;
use super::handler::{Flow, Handler, ResponseBody};
use super::transport::{HttpTransport, Transport};
use crate::media::MediaInfo;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FetchState {
    AwaitRequest,
    Fetching,
    Parsing,
    Done,
    Failed,
}

/// One resolve invocation: a handler and the media info it fills.
struct Session {
    handler: Box<dyn Handler>,
    info: MediaInfo,
    state: FetchState,
    round: usize,
}

impl Session {
    fn new(handler: Box<dyn Handler>) -> Self {
        Self {
            handler,
            info: MediaInfo::new(),
            state: FetchState::AwaitRequest,
            round: 0,
        }
    }

    fn transition(&mut self, next: FetchState) {
        trace!(
            handler = self.handler.name(),
            round = self.round,
            from = ?self.state,
            to = ?next,
            "State transition"
        );
        self.state = next;
    }

    fn fail(&mut self, error: ResolveError) -> ResolveError {
        self.transition(FetchState::Failed);
        debug!(handler = self.handler.name(), round = self.round, error = %error, "Resolve failed");
        error
    }
}

/// Resolves page URLs into [`MediaInfo`].
///
/// A resolver is cheap to share: concurrent calls each get their own handler
/// instance and media info.
pub struct Resolver {
    factory: HandlerFactory,
    transport: Arc<dyn Transport>,
    max_rounds: usize,
}

impl Resolver {
    /// Creates a resolver using the default handlers and an HTTP transport.
    pub fn new(config: &ResolverConfig) -> Result<Self, TransportError> {
        let transport = HttpTransport::new(config)?;
        let resolver = Self::with_transport(Arc::new(transport));
        Ok(resolver.max_rounds(config.max_rounds))
    }

    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self {
            factory: HandlerFactory::default(),
            transport,
            max_rounds: DEFAULT_MAX_ROUNDS,
        }
    }

    pub fn factory(mut self, factory: HandlerFactory) -> Self {
        self.factory = factory;
        self
    }

    /// Sets the round cap, never below one round.
    pub fn max_rounds(mut self, max_rounds: usize) -> Self {
        self.max_rounds = max_rounds.max(1);
        self
    }

    pub fn handler_factory(&self) -> &HandlerFactory {
        &self.factory
    }

    /// Selects the handler for `url` and drives it to completion.
    pub async fn resolve(&self, url: &str) -> Result<MediaInfo, ResolveError> {
        let handler = self.factory.create_handler(url)?;
        self.run(handler).await
    }

    /// Drives an already selected handler until it reports [`Flow::Ok`].
    pub async fn run(&self, handler: Box<dyn Handler>) -> Result<MediaInfo, ResolveError> {
        let mut session = Session::new(handler);
        let name = session.handler.name();

        while session.round < self.max_rounds {
            session.round += 1;

            let request = match session.handler.create_request(&session.info) {
                Ok(request) => request,
                Err(source) => {
                    return Err(session.fail(ResolveError::RequestConstruction {
                        handler: name,
                        source,
                    }));
                }
            };

            session.transition(FetchState::Fetching);
            debug!(
                handler = name,
                round = session.round,
                method = %request.method,
                url = %request.url,
                "Sending request"
            );

            let response = match self.transport.send(&request).await {
                Ok(response) => response,
                Err(source) => {
                    return Err(session.fail(ResolveError::Transport {
                        handler: name,
                        source,
                    }));
                }
            };

            session.transition(FetchState::Parsing);
            let body = if session.handler.handles_raw_body() {
                ResponseBody::Raw(response)
            } else {
                match serde_json::from_slice(&response.body) {
                    Ok(value) => ResponseBody::Json(value),
                    Err(e) => {
                        return Err(session.fail(ResolveError::Parse {
                            handler: name,
                            source: Some(e.into()),
                        }));
                    }
                }
            };

            match session.handler.parse_response(body, &mut session.info) {
                Ok(Flow::Ok) => {
                    session.transition(FetchState::Done);
                    debug!(handler = name, rounds = session.round, "Media info resolved");
                    return Ok(session.info);
                }
                Ok(Flow::Restart) => {
                    session.transition(FetchState::AwaitRequest);
                }
                Ok(Flow::Error) => {
                    return Err(session.fail(ResolveError::Parse {
                        handler: name,
                        source: None,
                    }));
                }
                Err(source) => {
                    return Err(session.fail(ResolveError::Parse {
                        handler: name,
                        source: Some(source),
                    }));
                }
            }
        }

        Err(session.fail(ResolveError::ProtocolExceeded {
            handler: name,
            rounds: session.round,
        }))
    }
}

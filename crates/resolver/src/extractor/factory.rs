use tracing::{debug, warn};
use url::Url;

use super::error::ResolveError;
use super::handler::{Handler, MatchContext};
use crate::extractor::platforms::{odysee::Odysee, peertube::PeerTube};

/// Pure predicate deciding whether a handler accepts a URL.
pub type HandlerMatcher = fn(&Url) -> Option<MatchContext>;

// A type alias for a thread-safe constructor function.
pub type HandlerConstructor = fn(MatchContext) -> Box<dyn Handler>;

/// One registered handler variant.
#[derive(Clone, Copy)]
pub struct HandlerEntry {
    pub name: &'static str,
    pub matches: HandlerMatcher,
    pub constructor: HandlerConstructor,
}

impl std::fmt::Debug for HandlerEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerEntry")
            .field("name", &self.name)
            .finish()
    }
}

macro_rules! handler_registry {
    ( $( $name:literal => $handler:ty ),+ $(,)? ) => {
        &[
            $(
                HandlerEntry {
                    name: $name,
                    matches: <$handler>::matches,
                    constructor: |context| Box::new(<$handler>::new(context)) as Box<dyn Handler>,
                },
            )+
        ]
    };
}

// Static handler registry, evaluated in order.
static HANDLERS: &[HandlerEntry] = handler_registry![
    "odysee" => Odysee,
    "peertube" => PeerTube,
];

/// Selects the handler for a URL. First match in registration order wins.
#[derive(Debug, Clone)]
pub struct HandlerFactory {
    entries: Vec<HandlerEntry>,
}

impl Default for HandlerFactory {
    fn default() -> Self {
        Self::new(HANDLERS.to_vec())
    }
}

impl HandlerFactory {
    pub fn new(entries: Vec<HandlerEntry>) -> Self {
        Self { entries }
    }

    /// Appends a handler after all existing ones.
    pub fn register(&mut self, entry: HandlerEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[HandlerEntry] {
        &self.entries
    }

    /// Finds the first entry accepting `url` along with its match context.
    pub fn find(&self, url: &str) -> Result<(&HandlerEntry, MatchContext), ResolveError> {
        let parsed = Url::parse(url).map_err(|e| {
            warn!(url, error = %e, "Unparseable URL");
            ResolveError::unsupported(url)
        })?;

        self.entries
            .iter()
            .find_map(|entry| (entry.matches)(&parsed).map(|context| (entry, context)))
            .ok_or_else(|| ResolveError::unsupported(url))
    }

    pub fn create_handler(&self, url: &str) -> Result<Box<dyn Handler>, ResolveError> {
        let (entry, context) = self.find(url)?;
        debug!(
            handler = entry.name,
            video_id = %context.video_id,
            "Selected handler"
        );
        Ok((entry.constructor)(context))
    }
}

//! Centre details loading with stale-response protection
//!
//! Selecting centres in quick succession leaves several detail requests in
//! flight. Each selection takes a generation token; a response is handed back
//! only while its token is still the newest, so an older centre can never
//! overwrite a newer one.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::debug;

use crate::adapter::adapt_records;
use crate::api::CentreSource;
use crate::error::Result;
use crate::filter::{AgeBracket, filter_by_age};
use crate::models::{CentreDetails, DropInProgram, Identifier, RegisteredProgram};

/// Monotonic request counter
#[derive(Debug, Default)]
pub struct RequestGeneration {
    latest: AtomicU64,
}

/// Token identifying one request generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct GenerationToken(u64);

impl RequestGeneration {
    /// Start a new generation, superseding every earlier token
    pub fn next(&self) -> GenerationToken {
        GenerationToken(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    #[must_use]
    pub fn is_current(&self, token: GenerationToken) -> bool {
        self.latest.load(Ordering::SeqCst) == token.0
    }
}

/// Loads centre details and drops responses that were superseded
pub struct CentreDetailsLoader<S> {
    source: S,
    generation: Arc<RequestGeneration>,
}

impl<S: CentreSource> CentreDetailsLoader<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            generation: Arc::new(RequestGeneration::default()),
        }
    }

    /// Fetch details for `id`
    ///
    /// Returns `Ok(None)` when another selection started while this one was
    /// in flight. Errors are reported only for the current selection.
    pub async fn load(&self, id: &Identifier) -> Result<Option<CentreDetails>> {
        let token = self.generation.next();
        let result = self.source.centre_details(id).await;
        if !self.generation.is_current(token) {
            debug!("Discarding stale details for centre {}", id);
            return Ok(None);
        }
        result.map(Some)
    }

    /// Invalidate every in-flight request, e.g. when the sidebar closes
    pub fn cancel(&self) {
        self.generation.next();
    }
}

/// Program lists of a loaded centre, narrowed by age bracket
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CentreProgramView {
    pub dropin: Vec<DropInProgram>,
    pub registered: Vec<RegisteredProgram>,
}

impl CentreProgramView {
    #[must_use]
    pub fn new(details: &CentreDetails, age: Option<AgeBracket>) -> Self {
        let registered = adapt_records(&details.programs.registered);
        Self {
            dropin: filter_by_age(&details.programs.dropin, age),
            registered: filter_by_age(&registered, age),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dropin.is_empty() && self.registered.is_empty()
    }
}

// Copyright 2025 the Fibermap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Debounced, supersedable place search.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use hashbrown::HashSet;
use tokio::task::{AbortHandle, JoinHandle};

use crate::{BackendError, BackendResult, Geocoder, Place};

/// What a finished search produced.
#[derive(Clone, Debug, PartialEq)]
pub enum SearchOutcome {
    /// Results for the latest query, de-duplicated by display name.
    Results(Vec<Place>),
    /// A newer query was submitted; these results must not be shown.
    Superseded,
}

/// A search in flight. Await [`SearchTicket::outcome`] for its result.
#[derive(Debug)]
pub struct SearchTicket {
    generation: u64,
    latest: Arc<AtomicU64>,
    handle: JoinHandle<BackendResult<Vec<Place>>>,
}

impl SearchTicket {
    /// Wait for the search to finish or be superseded.
    pub async fn outcome(self) -> BackendResult<SearchOutcome> {
        let places = match self.handle.await {
            Ok(result) => result?,
            Err(err) if err.is_cancelled() => return Ok(SearchOutcome::Superseded),
            Err(err) => return Err(BackendError::Transport(err.to_string())),
        };
        if self.latest.load(Ordering::Acquire) != self.generation {
            return Ok(SearchOutcome::Superseded);
        }
        Ok(SearchOutcome::Results(places))
    }
}

/// Type-ahead search over a [`Geocoder`].
///
/// Each [`submit`](Self::submit) aborts the previous search, waits out the
/// debounce, then queries the geocoder. A generation counter marks every
/// older ticket as superseded, even one whose request already completed.
#[derive(Debug)]
pub struct PlaceSearch<G> {
    geocoder: Arc<G>,
    debounce: Duration,
    limit: usize,
    latest: Arc<AtomicU64>,
    in_flight: Option<AbortHandle>,
}

impl<G: Geocoder + 'static> PlaceSearch<G> {
    /// A search issuing at most `limit` results after `debounce` of quiet.
    pub fn new(geocoder: Arc<G>, debounce: Duration, limit: usize) -> Self {
        Self {
            geocoder,
            debounce,
            limit,
            latest: Arc::new(AtomicU64::new(0)),
            in_flight: None,
        }
    }

    /// Start searching for `query`, superseding any earlier search.
    ///
    /// A query that is blank after trimming resolves to no results without
    /// consulting the geocoder. Must be called within a Tokio runtime.
    pub fn submit(&mut self, query: &str) -> SearchTicket {
        self.cancel();
        let generation = self.latest.load(Ordering::Acquire);
        let query = query.trim().to_owned();
        let geocoder = Arc::clone(&self.geocoder);
        let debounce = self.debounce;
        let limit = self.limit;
        let handle = tokio::spawn(async move {
            if query.is_empty() {
                return Ok(Vec::new());
            }
            tokio::time::sleep(debounce).await;
            tracing::debug!(%query, "place search");
            let places = geocoder.search(&query, limit).await?;
            Ok(dedup_by_display_name(places))
        });
        self.in_flight = Some(handle.abort_handle());
        SearchTicket {
            generation,
            latest: Arc::clone(&self.latest),
            handle,
        }
    }

    /// Abort the search in flight, if any, and supersede every ticket.
    pub fn cancel(&mut self) {
        self.latest.fetch_add(1, Ordering::AcqRel);
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
    }
}

impl<G> Drop for PlaceSearch<G> {
    fn drop(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
    }
}

fn dedup_by_display_name(places: Vec<Place>) -> Vec<Place> {
    let mut seen = HashSet::new();
    places
        .into_iter()
        .filter(|p| seen.insert(p.display_name.clone()))
        .collect()
}

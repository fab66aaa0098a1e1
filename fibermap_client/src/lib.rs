// Copyright 2025 the Fibermap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fibermap Client: collaborators and the editing session.
//!
//! The map editor talks to two services, both behind async traits so they
//! can be swapped in tests:
//!
//! - [`Backend`] is the network REST API: objects, cables, splices, regions
//!   and reference tables. [`HttpBackend`] speaks it over HTTP;
//!   [`MemoryBackend`] keeps everything in process and records each [`Call`].
//! - [`Geocoder`] searches places and reverse-geocodes coordinates.
//!   [`NominatimGeocoder`] talks to a Nominatim instance, and
//!   [`PlaceSearch`] debounces interactive queries so that only the latest
//!   one produces results.
//!
//! [`Editor`] ties them to the pure crates. It keeps a local mirror of the
//! network, rebuilds the cable graph on every change, gates splices through
//! the splice store before any request, cascades object deletion through
//! attached cables, and narrows the map to the selected regions. Every
//! failure comes back as an [`EditorError`], which converts to a [`Notice`]
//! for the operator, and leaves the mirror consistent with the backend.
//!
//! [`ClientConfig`] carries endpoints, debounce intervals and tool tuning,
//! and loads from RON.
//!
//! # Example
//!
//! ```rust
//! use fibermap_client::{Call, Editor, MemoryBackend};
//! use fibermap_model::{CableDraft, LatLng, ObjectDraft, ObjectKind};
//!
//! let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
//! rt.block_on(async {
//!     let mut editor = Editor::new(MemoryBackend::new());
//!
//!     let mut draft = ObjectDraft::new(ObjectKind::Node, LatLng::new(50.45, 30.52));
//!     draft.name = "Node A".into();
//!     let a = editor.create_object(draft.clone()).await.unwrap();
//!     draft.name = "Node B".into();
//!     draft.position = LatLng::new(50.46, 30.52);
//!     let b = editor.create_object(draft).await.unwrap();
//!
//!     let mut cable = CableDraft::between(a.id, b.id);
//!     cable.name = "Trunk".into();
//!     let cable = editor.create_cable(cable).await.unwrap();
//!     assert!(cable.distance_km.is_some());
//!
//!     // Deleting an object takes its cables with it.
//!     let removed = editor.delete_object(a.id).await.unwrap();
//!     assert_eq!(removed, vec![cable.id]);
//!     assert!(editor.cables().is_empty());
//!     assert_eq!(
//!         editor.backend().calls().await.last(),
//!         Some(&Call::DeleteObject(a.id))
//!     );
//! });
//! ```

mod backend;
mod config;
mod editor;
mod error;
mod geocoder;
mod http;
mod memory;
mod search;

pub use backend::{Backend, BackendResult};
pub use config::{ClientConfig, ConfigError};
pub use editor::{Editor, EditorResult};
pub use error::{BackendError, EditorError, Notice, NoticeLevel};
pub use geocoder::{Address, Geocoder, NominatimGeocoder, Place, object_draft_at};
pub use http::HttpBackend;
pub use memory::{Call, MemoryBackend};
pub use search::{PlaceSearch, SearchOutcome, SearchTicket};

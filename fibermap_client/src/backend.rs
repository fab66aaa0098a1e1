// Copyright 2025 the Fibermap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The persistence contract of the editing session.

use async_trait::async_trait;
use fibermap_model::{
    Cable, CableDraft, CableId, CableTypeRecord, FiberSplice, NetworkObject, ObjectDraft,
    ObjectId, ObjectTypeRecord, Region, RegionContents, RegionDraft, RegionId, SpliceDraft,
    SpliceId,
};

use crate::BackendError;

/// Result of a backend call.
pub type BackendResult<T> = Result<T, BackendError>;

/// The backend that persists the network.
///
/// Create calls return the persisted record carrying its server id. Every
/// call may fail; the session never retries.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Every network object.
    async fn list_objects(&self) -> BackendResult<Vec<NetworkObject>>;
    /// Persist a new object.
    async fn create_object(&self, draft: &ObjectDraft) -> BackendResult<NetworkObject>;
    /// Overwrite an object.
    async fn update_object(&self, id: ObjectId, draft: &ObjectDraft)
    -> BackendResult<NetworkObject>;
    /// Delete an object. Attached cables must be deleted first.
    async fn delete_object(&self, id: ObjectId) -> BackendResult<()>;

    /// Every cable.
    async fn list_cables(&self) -> BackendResult<Vec<Cable>>;
    /// Persist a new cable.
    async fn create_cable(&self, draft: &CableDraft) -> BackendResult<Cable>;
    /// Overwrite a cable.
    async fn update_cable(&self, id: CableId, draft: &CableDraft) -> BackendResult<Cable>;
    /// Delete a cable.
    async fn delete_cable(&self, id: CableId) -> BackendResult<()>;

    /// Splices whose source fiber is on `cable`.
    async fn list_splices(&self, cable: CableId) -> BackendResult<Vec<FiberSplice>>;
    /// Persist a new splice.
    async fn create_splice(&self, draft: &SpliceDraft) -> BackendResult<FiberSplice>;
    /// Delete a splice.
    async fn delete_splice(&self, id: SpliceId) -> BackendResult<()>;

    /// Every region, without members.
    async fn list_regions(&self) -> BackendResult<Vec<Region>>;
    /// A region with its current members.
    async fn region_contents(&self, id: RegionId) -> BackendResult<RegionContents>;
    /// Persist a new region.
    async fn create_region(&self, draft: &RegionDraft) -> BackendResult<Region>;
    /// Add an object to a region.
    async fn add_object_to_region(&self, region: RegionId, object: ObjectId) -> BackendResult<()>;
    /// Add a cable to a region.
    async fn add_cable_to_region(&self, region: RegionId, cable: CableId) -> BackendResult<()>;

    /// The object-type reference table.
    async fn object_types(&self) -> BackendResult<Vec<ObjectTypeRecord>>;
    /// The cable-type reference table.
    async fn cable_types(&self) -> BackendResult<Vec<CableTypeRecord>>;
}

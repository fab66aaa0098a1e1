// Copyright 2025 the Fibermap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! An in-process backend that records every call.

use std::collections::BTreeMap;

use async_trait::async_trait;
use fibermap_model::{
    Cable, CableDraft, CableId, CableTypeRecord, DraftError, FiberSplice, NetworkObject,
    ObjectDraft, ObjectId, ObjectTypeRecord, Region, RegionContents, RegionDraft, RegionId,
    SpliceDraft, SpliceId,
};
use tokio::sync::Mutex;

use crate::{Backend, BackendError, BackendResult};

/// One call made against a [`MemoryBackend`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[allow(missing_docs, reason = "variants mirror the Backend methods")]
pub enum Call {
    ListObjects,
    CreateObject,
    UpdateObject(ObjectId),
    DeleteObject(ObjectId),
    ListCables,
    CreateCable,
    UpdateCable(CableId),
    DeleteCable(CableId),
    ListSplices(CableId),
    CreateSplice,
    DeleteSplice(SpliceId),
    ListRegions,
    RegionContents(RegionId),
    CreateRegion,
    AddObjectToRegion(RegionId, ObjectId),
    AddCableToRegion(RegionId, CableId),
    ObjectTypes,
    CableTypes,
}

#[derive(Debug, Default)]
struct State {
    last_id: i64,
    objects: BTreeMap<ObjectId, NetworkObject>,
    cables: BTreeMap<CableId, Cable>,
    splices: BTreeMap<SpliceId, FiberSplice>,
    regions: BTreeMap<RegionId, RegionContents>,
    object_types: Vec<ObjectTypeRecord>,
    cable_types: Vec<CableTypeRecord>,
    calls: Vec<Call>,
    failing: Vec<Call>,
}

impl State {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    /// Log `call` and fail it if it was marked to fail.
    fn enter(&mut self, call: Call) -> BackendResult<()> {
        let fail = self.failing.contains(&call);
        self.calls.push(call);
        if fail {
            return Err(BackendError::Status {
                status: 500,
                detail: "injected failure".into(),
            });
        }
        Ok(())
    }
}

fn not_found(what: &str) -> BackendError {
    BackendError::Status {
        status: 404,
        detail: format!("{what} not found"),
    }
}

fn unprocessable(err: DraftError) -> BackendError {
    BackendError::Status {
        status: 422,
        detail: err.to_string(),
    }
}

fn cable_from_draft(id: CableId, draft: &CableDraft) -> BackendResult<Cable> {
    let (Some(from), Some(to)) = (draft.from, draft.to) else {
        return Err(unprocessable(DraftError::MissingEndpoint));
    };
    Ok(Cable {
        id,
        name: draft.name.clone(),
        kind: draft.kind,
        cable_type_id: draft.cable_type_id,
        color: None,
        from,
        to,
        fiber_count: draft.fiber_count,
        distance_km: draft.distance_km,
        description: draft.description.clone(),
    })
}

fn object_from_draft(id: ObjectId, draft: &ObjectDraft) -> NetworkObject {
    NetworkObject {
        id,
        name: draft.name.clone(),
        kind: draft.kind,
        position: draft.position,
        address: draft.address.clone(),
        description: draft.description.clone(),
    }
}

/// A [`Backend`] keeping everything in memory.
///
/// It assigns increasing ids, refuses to delete an object that still has
/// cables, and removes a cable's splices along with it, like the real API.
/// Every call is recorded, and individual calls can be made to fail.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    state: Mutex<State>,
}

impl MemoryBackend {
    /// An empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed objects, keeping their ids.
    pub fn with_objects(mut self, objects: impl IntoIterator<Item = NetworkObject>) -> Self {
        let state = self.state.get_mut();
        for object in objects {
            state.last_id = state.last_id.max(object.id.get());
            state.objects.insert(object.id, object);
        }
        self
    }

    /// Seed cables, keeping their ids.
    pub fn with_cables(mut self, cables: impl IntoIterator<Item = Cable>) -> Self {
        let state = self.state.get_mut();
        for cable in cables {
            state.last_id = state.last_id.max(cable.id.get());
            state.cables.insert(cable.id, cable);
        }
        self
    }

    /// Seed splices, keeping their ids.
    pub fn with_splices(mut self, splices: impl IntoIterator<Item = FiberSplice>) -> Self {
        let state = self.state.get_mut();
        for splice in splices {
            state.last_id = state.last_id.max(splice.id.get());
            state.splices.insert(splice.id, splice);
        }
        self
    }

    /// Seed regions with their members.
    pub fn with_regions(mut self, regions: impl IntoIterator<Item = RegionContents>) -> Self {
        let state = self.state.get_mut();
        for contents in regions {
            state.last_id = state.last_id.max(contents.region.id.get());
            state.regions.insert(contents.region.id, contents);
        }
        self
    }

    /// Seed the reference tables.
    pub fn with_reference(
        mut self,
        object_types: Vec<ObjectTypeRecord>,
        cable_types: Vec<CableTypeRecord>,
    ) -> Self {
        let state = self.state.get_mut();
        state.object_types = object_types;
        state.cable_types = cable_types;
        self
    }

    /// Make every future `call` fail with a server error.
    pub async fn fail_on(&self, call: Call) {
        self.state.lock().await.failing.push(call);
    }

    /// Calls made so far, in order.
    pub async fn calls(&self) -> Vec<Call> {
        self.state.lock().await.calls.clone()
    }

    /// Forget the recorded calls.
    pub async fn clear_calls(&self) {
        self.state.lock().await.calls.clear();
    }

    /// Current members of `region`.
    pub async fn region_members(&self, region: RegionId) -> Option<RegionContents> {
        self.state.lock().await.regions.get(&region).cloned()
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn list_objects(&self) -> BackendResult<Vec<NetworkObject>> {
        let mut state = self.state.lock().await;
        state.enter(Call::ListObjects)?;
        Ok(state.objects.values().cloned().collect())
    }

    async fn create_object(&self, draft: &ObjectDraft) -> BackendResult<NetworkObject> {
        let mut state = self.state.lock().await;
        state.enter(Call::CreateObject)?;
        let id = ObjectId(state.next_id());
        let object = object_from_draft(id, draft);
        state.objects.insert(id, object.clone());
        Ok(object)
    }

    async fn update_object(
        &self,
        id: ObjectId,
        draft: &ObjectDraft,
    ) -> BackendResult<NetworkObject> {
        let mut state = self.state.lock().await;
        state.enter(Call::UpdateObject(id))?;
        let slot = state.objects.get_mut(&id).ok_or_else(|| not_found("object"))?;
        *slot = object_from_draft(id, draft);
        Ok(slot.clone())
    }

    async fn delete_object(&self, id: ObjectId) -> BackendResult<()> {
        let mut state = self.state.lock().await;
        state.enter(Call::DeleteObject(id))?;
        if state.cables.values().any(|c| c.touches(id)) {
            return Err(BackendError::Status {
                status: 409,
                detail: "object still has cables".into(),
            });
        }
        state.objects.remove(&id).ok_or_else(|| not_found("object"))?;
        for contents in state.regions.values_mut() {
            contents.objects.retain(|&o| o != id);
        }
        Ok(())
    }

    async fn list_cables(&self) -> BackendResult<Vec<Cable>> {
        let mut state = self.state.lock().await;
        state.enter(Call::ListCables)?;
        Ok(state.cables.values().cloned().collect())
    }

    async fn create_cable(&self, draft: &CableDraft) -> BackendResult<Cable> {
        let mut state = self.state.lock().await;
        state.enter(Call::CreateCable)?;
        let id = CableId(state.next_id());
        let cable = cable_from_draft(id, draft)?;
        state.cables.insert(id, cable.clone());
        Ok(cable)
    }

    async fn update_cable(&self, id: CableId, draft: &CableDraft) -> BackendResult<Cable> {
        let mut state = self.state.lock().await;
        state.enter(Call::UpdateCable(id))?;
        if !state.cables.contains_key(&id) {
            return Err(not_found("cable"));
        }
        let cable = cable_from_draft(id, draft)?;
        state.cables.insert(id, cable.clone());
        Ok(cable)
    }

    async fn delete_cable(&self, id: CableId) -> BackendResult<()> {
        let mut state = self.state.lock().await;
        state.enter(Call::DeleteCable(id))?;
        state.cables.remove(&id).ok_or_else(|| not_found("cable"))?;
        state.splices.retain(|_, s| !s.touches_cable(id));
        for contents in state.regions.values_mut() {
            contents.cables.retain(|&c| c != id);
        }
        Ok(())
    }

    async fn list_splices(&self, cable: CableId) -> BackendResult<Vec<FiberSplice>> {
        let mut state = self.state.lock().await;
        state.enter(Call::ListSplices(cable))?;
        Ok(state
            .splices
            .values()
            .filter(|s| s.cable_id == cable)
            .cloned()
            .collect())
    }

    async fn create_splice(&self, draft: &SpliceDraft) -> BackendResult<FiberSplice> {
        let mut state = self.state.lock().await;
        state.enter(Call::CreateSplice)?;
        let id = SpliceId(state.next_id());
        let splice = draft.clone().into_splice(id);
        state.splices.insert(id, splice.clone());
        Ok(splice)
    }

    async fn delete_splice(&self, id: SpliceId) -> BackendResult<()> {
        let mut state = self.state.lock().await;
        state.enter(Call::DeleteSplice(id))?;
        state.splices.remove(&id).ok_or_else(|| not_found("splice"))?;
        Ok(())
    }

    async fn list_regions(&self) -> BackendResult<Vec<Region>> {
        let mut state = self.state.lock().await;
        state.enter(Call::ListRegions)?;
        Ok(state.regions.values().map(|c| c.region.clone()).collect())
    }

    async fn region_contents(&self, id: RegionId) -> BackendResult<RegionContents> {
        let mut state = self.state.lock().await;
        state.enter(Call::RegionContents(id))?;
        state.regions.get(&id).cloned().ok_or_else(|| not_found("region"))
    }

    async fn create_region(&self, draft: &RegionDraft) -> BackendResult<Region> {
        let mut state = self.state.lock().await;
        state.enter(Call::CreateRegion)?;
        if state.regions.values().any(|c| c.region.name == draft.name) {
            return Err(BackendError::Status {
                status: 400,
                detail: "region already exists".into(),
            });
        }
        let region = Region {
            id: RegionId(state.next_id()),
            name: draft.name.clone(),
            position: draft.position,
            display_name: draft.display_name.clone(),
            country: draft.country.clone(),
            state: draft.state.clone(),
            nominatim_id: None,
            description: None,
        };
        state.regions.insert(
            region.id,
            RegionContents {
                region: region.clone(),
                objects: Vec::new(),
                cables: Vec::new(),
            },
        );
        Ok(region)
    }

    async fn add_object_to_region(&self, region: RegionId, object: ObjectId) -> BackendResult<()> {
        let mut state = self.state.lock().await;
        state.enter(Call::AddObjectToRegion(region, object))?;
        if !state.objects.contains_key(&object) {
            return Err(not_found("object"));
        }
        let contents = state.regions.get_mut(&region).ok_or_else(|| not_found("region"))?;
        if !contents.objects.contains(&object) {
            contents.objects.push(object);
        }
        Ok(())
    }

    async fn add_cable_to_region(&self, region: RegionId, cable: CableId) -> BackendResult<()> {
        let mut state = self.state.lock().await;
        state.enter(Call::AddCableToRegion(region, cable))?;
        if !state.cables.contains_key(&cable) {
            return Err(not_found("cable"));
        }
        let contents = state.regions.get_mut(&region).ok_or_else(|| not_found("region"))?;
        if !contents.cables.contains(&cable) {
            contents.cables.push(cable);
        }
        Ok(())
    }

    async fn object_types(&self) -> BackendResult<Vec<ObjectTypeRecord>> {
        let mut state = self.state.lock().await;
        state.enter(Call::ObjectTypes)?;
        Ok(state.object_types.clone())
    }

    async fn cable_types(&self) -> BackendResult<Vec<CableTypeRecord>> {
        let mut state = self.state.lock().await;
        state.enter(Call::CableTypes)?;
        Ok(state.cable_types.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fibermap_model::{CableKind, FiberEnd, LatLng, ObjectKind};

    fn object(id: i64) -> NetworkObject {
        NetworkObject {
            id: ObjectId(id),
            name: format!("O{id}"),
            kind: ObjectKind::Node,
            position: LatLng::new(0.0, 0.0),
            address: None,
            description: None,
        }
    }

    fn cable(id: i64, from: i64, to: i64) -> Cable {
        Cable {
            id: CableId(id),
            name: format!("C{id}"),
            kind: CableKind::Optical,
            cable_type_id: None,
            color: None,
            from: ObjectId(from),
            to: ObjectId(to),
            fiber_count: Some(4),
            distance_km: None,
            description: None,
        }
    }

    #[tokio::test]
    async fn ids_continue_after_seeded_records() {
        let backend = MemoryBackend::new().with_objects([object(1), object(5)]);
        let mut draft = ObjectDraft::new(ObjectKind::Pole, LatLng::new(1.0, 1.0));
        draft.name = "P".into();
        let created = backend.create_object(&draft).await.unwrap();
        assert_eq!(created.id, ObjectId(6));
    }

    #[tokio::test]
    async fn object_with_cables_cannot_be_deleted() {
        let backend = MemoryBackend::new()
            .with_objects([object(1), object(2)])
            .with_cables([cable(3, 1, 2)]);
        let err = backend.delete_object(ObjectId(1)).await.unwrap_err();
        assert!(matches!(err, BackendError::Status { status: 409, .. }));
        backend.delete_cable(CableId(3)).await.unwrap();
        backend.delete_object(ObjectId(1)).await.unwrap();
    }

    #[tokio::test]
    async fn deleting_a_cable_drops_its_splices() {
        let splice = SpliceDraft::new(FiberEnd::new(CableId(3), 0), FiberEnd::new(CableId(4), 0))
            .into_splice(SpliceId(9));
        let backend = MemoryBackend::new()
            .with_objects([object(1), object(2), object(5)])
            .with_cables([cable(3, 1, 2), cable(4, 2, 5)])
            .with_splices([splice]);
        backend.delete_cable(CableId(4)).await.unwrap();
        assert!(backend.list_splices(CableId(3)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn injected_failures_are_recorded() {
        let backend = MemoryBackend::new();
        backend.fail_on(Call::ListCables).await;
        assert!(backend.list_objects().await.is_ok());
        assert!(backend.list_cables().await.is_err());
        assert_eq!(backend.calls().await, vec![Call::ListObjects, Call::ListCables]);
    }

    #[tokio::test]
    async fn region_names_are_unique() {
        let backend = MemoryBackend::new();
        let draft = RegionDraft::new("Lviv", LatLng::new(49.8, 24.0));
        let region = backend.create_region(&draft).await.unwrap();
        assert!(backend.create_region(&draft).await.is_err());
        backend.add_object_to_region(region.id, ObjectId(1)).await.unwrap_err();
        assert!(backend.region_members(region.id).await.unwrap().objects.is_empty());
    }
}

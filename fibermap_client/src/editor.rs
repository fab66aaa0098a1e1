// Copyright 2025 the Fibermap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The editing session: a local mirror of the network kept in step with the
//! backend.

use core::fmt;

use fibermap_graph::{CableGraph, ObjectSet, build_adjacency};
use fibermap_model::{
    Cable, CableDraft, CableId, DraftError, FiberSplice, LatLng, NetworkObject, ObjectDraft,
    ObjectId, ReferenceData, Region, RegionDraft, RegionId, SpliceDraft, SpliceId,
};
use fibermap_region::{
    Filtered, RegionCandidate, RegionSelection, SelectedRegion, Suggestion, cables_within,
    merge_suggestions, objects_matching_city, search_cables,
};
use fibermap_splice::SpliceStore;

use crate::{Backend, EditorError};

/// Result of an editing operation.
pub type EditorResult<T> = Result<T, EditorError>;

/// An editing session over a [`Backend`].
///
/// The session owns the local mirror: objects, cables, the cable graph built
/// from them, the splice list of the selected cable, reference data, regions,
/// and the region selection. Every mutation goes to the backend first and is
/// applied locally only once it succeeded; a failed call leaves the mirror
/// as it was.
pub struct Editor<B> {
    backend: B,
    objects: Vec<NetworkObject>,
    cables: Vec<Cable>,
    graph: CableGraph,
    splices: SpliceStore,
    reference: ReferenceData,
    regions: Vec<Region>,
    selection: RegionSelection,
}

impl<B> fmt::Debug for Editor<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Editor")
            .field("objects", &self.objects.len())
            .field("cables", &self.cables.len())
            .field("splice_scope", &self.splices.scope())
            .field("regions", &self.regions.len())
            .field("selection", &self.selection)
            .finish_non_exhaustive()
    }
}

impl<B: Backend> Editor<B> {
    /// An empty session. Call the `refresh_*` operations to load data.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            objects: Vec::new(),
            cables: Vec::new(),
            graph: CableGraph::default(),
            splices: SpliceStore::new(),
            reference: ReferenceData::default(),
            regions: Vec::new(),
            selection: RegionSelection::new(),
        }
    }

    /// The backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Every object, in backend order.
    pub fn objects(&self) -> &[NetworkObject] {
        &self.objects
    }

    /// The object with `id`.
    pub fn object(&self, id: ObjectId) -> Option<&NetworkObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    /// Every cable, in backend order.
    pub fn cables(&self) -> &[Cable] {
        &self.cables
    }

    /// The cable with `id`.
    pub fn cable(&self, id: CableId) -> Option<&Cable> {
        self.cables.iter().find(|c| c.id == id)
    }

    /// Adjacency over the current cables.
    pub fn graph(&self) -> &CableGraph {
        &self.graph
    }

    /// Splices of the selected cable.
    pub fn splices(&self) -> &SpliceStore {
        &self.splices
    }

    /// Current reference data.
    pub fn reference(&self) -> &ReferenceData {
        &self.reference
    }

    /// Known regions.
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Regions picked for filtering.
    pub fn region_selection(&self) -> &RegionSelection {
        &self.selection
    }

    /// Regions picked for filtering, for toggling and clearing.
    pub fn region_selection_mut(&mut self) -> &mut RegionSelection {
        &mut self.selection
    }

    /// Reload every object.
    pub async fn refresh_objects(&mut self) -> EditorResult<usize> {
        let objects = self.backend.list_objects().await.inspect_err(warn_failed)?;
        tracing::debug!(count = objects.len(), "objects refreshed");
        self.objects = objects;
        Ok(self.objects.len())
    }

    /// Reload every cable and rebuild the graph.
    pub async fn refresh_cables(&mut self) -> EditorResult<usize> {
        let cables = self.backend.list_cables().await.inspect_err(warn_failed)?;
        tracing::debug!(count = cables.len(), "cables refreshed");
        self.cables = cables;
        self.rebuild_graph();
        Ok(self.cables.len())
    }

    /// Reload both reference tables; the old value stays on failure.
    pub async fn refresh_reference(&mut self) -> EditorResult<()> {
        let (object_types, cable_types) =
            tokio::try_join!(self.backend.object_types(), self.backend.cable_types())
                .inspect_err(warn_failed)?;
        tracing::debug!(
            object_types = object_types.len(),
            cable_types = cable_types.len(),
            "reference data refreshed"
        );
        self.reference = ReferenceData::from_records(&object_types, cable_types);
        Ok(())
    }

    /// Reload the region list.
    pub async fn refresh_regions(&mut self) -> EditorResult<usize> {
        let regions = self.backend.list_regions().await.inspect_err(warn_failed)?;
        tracing::debug!(count = regions.len(), "regions refreshed");
        let stale: Vec<RegionId> = self
            .selection
            .regions()
            .iter()
            .filter(|s| !regions.iter().any(|r| r.id == s.id))
            .map(|s| s.id)
            .collect();
        for id in stale {
            self.selection.remove(id);
        }
        self.regions = regions;
        Ok(self.regions.len())
    }

    /// Validate and persist a new object.
    #[tracing::instrument(skip(self, draft), name = "editor.create_object")]
    pub async fn create_object(&mut self, draft: ObjectDraft) -> EditorResult<NetworkObject> {
        let draft = draft.validated().inspect_err(warn_rejected)?;
        let object = self
            .backend
            .create_object(&draft)
            .await
            .inspect_err(warn_failed)?;
        tracing::info!(object = %object.id, name = %object.name, "object created");
        self.objects.push(object.clone());
        Ok(object)
    }

    /// Validate and persist changes to an object.
    #[tracing::instrument(skip(self, draft), name = "editor.update_object")]
    pub async fn update_object(
        &mut self,
        id: ObjectId,
        draft: ObjectDraft,
    ) -> EditorResult<NetworkObject> {
        let index = self
            .objects
            .iter()
            .position(|o| o.id == id)
            .ok_or(EditorError::UnknownObject(id))?;
        let draft = draft.validated().inspect_err(warn_rejected)?;
        let object = self
            .backend
            .update_object(id, &draft)
            .await
            .inspect_err(warn_failed)?;
        tracing::info!(object = %id, "object updated");
        self.objects[index] = object.clone();
        Ok(object)
    }

    /// Delete an object and every cable attached to it.
    ///
    /// Attached cables are deleted one by one in id order before the object
    /// itself. Each deletion is applied locally as soon as it succeeds, so a
    /// failure part-way leaves the cables already deleted gone and the rest
    /// in place. Returns the deleted cables.
    #[tracing::instrument(skip(self), name = "editor.delete_object")]
    pub async fn delete_object(&mut self, id: ObjectId) -> EditorResult<Vec<CableId>> {
        if self.object(id).is_none() {
            return Err(EditorError::UnknownObject(id));
        }
        let attached = self.graph.cables_at(id);
        for &cable in &attached {
            self.backend
                .delete_cable(cable)
                .await
                .inspect_err(warn_failed)?;
            tracing::info!(%cable, object = %id, "attached cable deleted");
            self.forget_cable(cable);
        }
        self.backend
            .delete_object(id)
            .await
            .inspect_err(warn_failed)?;
        tracing::info!(object = %id, cables = attached.len(), "object deleted");
        self.objects.retain(|o| o.id != id);
        Ok(attached)
    }

    /// Validate and persist a new cable.
    ///
    /// Unless the operator typed a distance, it is filled from the endpoint
    /// positions in the mirror.
    #[tracing::instrument(skip(self, draft), name = "editor.create_cable")]
    pub async fn create_cable(&mut self, draft: CableDraft) -> EditorResult<Cable> {
        let draft = self.prepare_cable(draft)?;
        let cable = self
            .backend
            .create_cable(&draft)
            .await
            .inspect_err(warn_failed)?;
        tracing::info!(cable = %cable.id, from = %cable.from, to = %cable.to, "cable created");
        self.cables.push(cable.clone());
        self.rebuild_graph();
        Ok(cable)
    }

    /// Validate and persist changes to a cable.
    #[tracing::instrument(skip(self, draft), name = "editor.update_cable")]
    pub async fn update_cable(&mut self, id: CableId, draft: CableDraft) -> EditorResult<Cable> {
        let index = self
            .cables
            .iter()
            .position(|c| c.id == id)
            .ok_or(EditorError::UnknownCable(id))?;
        let draft = self.prepare_cable(draft)?;
        let cable = self
            .backend
            .update_cable(id, &draft)
            .await
            .inspect_err(warn_failed)?;
        tracing::info!(cable = %id, "cable updated");
        self.cables[index] = cable.clone();
        self.rebuild_graph();
        Ok(cable)
    }

    /// Delete a cable.
    #[tracing::instrument(skip(self), name = "editor.delete_cable")]
    pub async fn delete_cable(&mut self, id: CableId) -> EditorResult<()> {
        if self.cable(id).is_none() {
            return Err(EditorError::UnknownCable(id));
        }
        self.backend
            .delete_cable(id)
            .await
            .inspect_err(warn_failed)?;
        tracing::info!(cable = %id, "cable deleted");
        self.forget_cable(id);
        Ok(())
    }

    /// Bring `id` into splice scope and load the splices touching it.
    ///
    /// The backend lists splices by their source cable, so the lists of the
    /// cable and each adjacent cable are fetched and merged. Any failed fetch
    /// fails the whole selection and keeps the previous scope.
    #[tracing::instrument(skip(self), name = "editor.select_cable")]
    pub async fn select_cable(&mut self, id: CableId) -> EditorResult<usize> {
        if self.cable(id).is_none() {
            return Err(EditorError::UnknownCable(id));
        }
        let mut records: Vec<FiberSplice> = Vec::new();
        let sources = core::iter::once(id).chain(self.graph.neighbors(id));
        for cable in sources {
            let fetched = self
                .backend
                .list_splices(cable)
                .await
                .inspect_err(warn_failed)?;
            for splice in fetched {
                if splice.touches_cable(id) && !records.iter().any(|r| r.id == splice.id) {
                    records.push(splice);
                }
            }
        }
        tracing::debug!(cable = %id, count = records.len(), "splices loaded");
        self.splices.focus(Some(id));
        self.splices.replace(id, records);
        Ok(self.splices.all().len())
    }

    /// Leave splice scope.
    pub fn deselect_cable(&mut self) {
        self.splices.focus(None);
    }

    /// Validate and persist a splice.
    ///
    /// The source fiber must belong to the selected cable: the store then
    /// holds every splice that could duplicate the draft or consume its
    /// source. Validation runs before any request is made.
    #[tracing::instrument(skip(self, draft), name = "editor.create_splice")]
    pub async fn create_splice(&mut self, draft: SpliceDraft) -> EditorResult<FiberSplice> {
        let source = draft.source().cable;
        if self.splices.scope() != Some(source) {
            let err = EditorError::SourceNotSelected(source);
            warn_rejected(&err);
            return Err(err);
        }
        self.splices
            .check(&self.graph, &draft)
            .inspect_err(warn_rejected)?;
        let splice = self
            .backend
            .create_splice(&draft)
            .await
            .inspect_err(warn_failed)?;
        tracing::info!(
            splice = %splice.id,
            source = %splice.source(),
            target = %splice.target(),
            "splice created"
        );
        self.splices.insert(splice.clone());
        Ok(splice)
    }

    /// Delete a splice.
    #[tracing::instrument(skip(self), name = "editor.delete_splice")]
    pub async fn delete_splice(&mut self, id: SpliceId) -> EditorResult<Option<FiberSplice>> {
        self.backend
            .delete_splice(id)
            .await
            .inspect_err(warn_failed)?;
        tracing::info!(splice = %id, "splice deleted");
        Ok(self.splices.delete(id))
    }

    /// Every object reachable over cables from either end of `cable`.
    pub fn dependent_objects(&self, cable: CableId) -> EditorResult<ObjectSet> {
        if self.graph.cable(cable).is_none() {
            return Err(EditorError::UnknownCable(cable));
        }
        Ok(self.graph.reachable_objects(cable))
    }

    /// Objects in `ids`, resolved against the mirror, in mirror order.
    pub fn objects_in(&self, ids: &ObjectSet) -> Vec<&NetworkObject> {
        self.objects.iter().filter(|o| ids.contains(&o.id)).collect()
    }

    /// Cables whose name or endpoint address contains `term`.
    pub fn search_cables(&self, term: &str) -> Vec<&Cable> {
        search_cables(&self.cables, &self.objects, term)
    }

    /// Region picker entries for `query`: known regions plus geocoder places.
    pub fn region_suggestions(
        &self,
        query: &str,
        places: Vec<RegionCandidate>,
    ) -> Vec<Suggestion> {
        merge_suggestions(&self.regions, query, places)
    }

    /// The visible network under the current region selection.
    ///
    /// Every selected region's members are fetched fresh. Any failure fails
    /// the pass; nothing is cached.
    #[tracing::instrument(skip(self), name = "editor.filter_by_regions")]
    pub async fn filter_by_regions(&self) -> EditorResult<Filtered> {
        let mut contents = Vec::with_capacity(self.selection.regions().len());
        for selected in self.selection.regions() {
            let fetched = self
                .backend
                .region_contents(selected.id)
                .await
                .inspect_err(warn_failed)?;
            contents.push(fetched);
        }
        let filtered = fibermap_region::filter_by_regions(&self.objects, &self.cables, &contents);
        tracing::debug!(
            regions = contents.len(),
            objects = filtered.objects.len(),
            cables = filtered.cables.len(),
            "region filter applied"
        );
        Ok(filtered)
    }

    /// Pick a region picker entry.
    ///
    /// A known region is toggled in the selection. A geocoder place becomes
    /// a region through [`select_region_for_city`](Self::select_region_for_city).
    /// Returns whether the entry is selected afterwards.
    pub async fn pick_suggestion(&mut self, suggestion: &Suggestion) -> EditorResult<bool> {
        match suggestion {
            Suggestion::Existing(region) => Ok(self.selection.toggle(SelectedRegion {
                id: region.id,
                name: region.name.clone(),
            })),
            Suggestion::Place(place) => {
                self.select_region_for_city(&place.name, place.position)
                    .await?;
                Ok(true)
            }
        }
    }

    /// Select the region for `city`, creating it when needed.
    ///
    /// A region of the same name (ignoring case) is reused. The region is
    /// selected, then objects whose address mentions the city, and cables
    /// between them, are added as members through the backend. If adding a
    /// member fails, the region stays known and selected with the members
    /// added so far; calling again reuses it and adds the rest.
    #[tracing::instrument(skip(self), name = "editor.select_region_for_city")]
    pub async fn select_region_for_city(
        &mut self,
        city: &str,
        position: LatLng,
    ) -> EditorResult<Region> {
        let city = city.trim();
        if city.is_empty() {
            return Err(DraftError::MissingName.into());
        }
        let lower = city.to_lowercase();
        let existing = self
            .regions
            .iter()
            .find(|r| r.name.to_lowercase() == lower)
            .cloned();
        let region = match existing {
            Some(region) => region,
            None => {
                let created = self
                    .backend
                    .create_region(&RegionDraft::new(city, position))
                    .await
                    .inspect_err(warn_failed)?;
                tracing::info!(region = %created.id, name = %created.name, "region created");
                self.regions.push(created.clone());
                created
            }
        };

        self.selection.insert(SelectedRegion {
            id: region.id,
            name: region.name.clone(),
        });

        let members: Vec<ObjectId> = objects_matching_city(&self.objects, city)
            .iter()
            .map(|o| o.id)
            .collect();
        let cables: Vec<CableId> = cables_within(&self.cables, members.iter().copied())
            .iter()
            .map(|c| c.id)
            .collect();
        for &object in &members {
            self.backend
                .add_object_to_region(region.id, object)
                .await
                .inspect_err(warn_failed)?;
        }
        for &cable in &cables {
            self.backend
                .add_cable_to_region(region.id, cable)
                .await
                .inspect_err(warn_failed)?;
        }
        tracing::info!(
            region = %region.id,
            objects = members.len(),
            cables = cables.len(),
            "region members added"
        );
        Ok(region)
    }

    fn prepare_cable(&self, draft: CableDraft) -> EditorResult<CableDraft> {
        let mut draft = draft.validated().inspect_err(warn_rejected)?;
        let (Some(from), Some(to)) = (draft.from, draft.to) else {
            return Err(DraftError::MissingEndpoint.into());
        };
        let start = self.object(from).ok_or(EditorError::UnknownObject(from))?;
        let end = self.object(to).ok_or(EditorError::UnknownObject(to))?;
        draft.auto_distance(&start.position, &end.position);
        Ok(draft)
    }

    fn forget_cable(&mut self, id: CableId) {
        self.cables.retain(|c| c.id != id);
        self.rebuild_graph();
        if self.splices.scope() == Some(id) {
            self.splices.focus(None);
        }
    }

    fn rebuild_graph(&mut self) {
        self.graph = build_adjacency(&self.cables);
    }
}

fn warn_failed(err: &crate::BackendError) {
    tracing::warn!(%err, "backend call failed");
}

fn warn_rejected<E: fmt::Display>(err: &E) {
    tracing::warn!(%err, "input rejected");
}

use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use roomview_geometry::{Mesh, PrismSize, build_edges, merge_border_mesh};

use crate::draw::MeshKey;

/// Generated meshes shared between closures and across rebuilds.
///
/// Lookups during a build pass mark their key as used; [`finish_pass`]
/// drops every mesh the pass did not touch.
///
/// [`finish_pass`]: GeometryCache::finish_pass
#[derive(Debug, Default)]
pub struct GeometryCache {
    meshes: HashMap<MeshKey, Rc<Mesh>>,
    used: HashSet<MeshKey>,
    generated: u64,
}

impl GeometryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prism(&mut self, size: PrismSize) -> (MeshKey, Rc<Mesh>) {
        let key = MeshKey::Prism(size.key());
        let mesh = self.get_or_build(key, || size.build());
        (key, mesh)
    }

    /// Merged border mesh outlining a box with the given extents.
    pub fn border(&mut self, size: PrismSize, thickness: f32) -> (MeshKey, Rc<Mesh>) {
        let [l, h, w] = size.key();
        let key = MeshKey::Border([l, h, w, thickness.to_bits()]);
        let mesh = self.get_or_build(key, || {
            merge_border_mesh(&build_edges(
                size.length,
                size.height,
                size.width,
                thickness,
            ))
        });
        (key, mesh)
    }

    /// Evict meshes not requested since the previous pass.
    pub fn finish_pass(&mut self) {
        let before = self.meshes.len();
        let used = std::mem::take(&mut self.used);
        self.meshes.retain(|key, _| used.contains(key));
        let evicted = before - self.meshes.len();
        if evicted > 0 {
            tracing::debug!(evicted, kept = self.meshes.len(), "geometry cache trimmed");
        }
    }

    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    /// Total meshes generated, counting regenerations after eviction.
    pub fn generated(&self) -> u64 {
        self.generated
    }

    fn get_or_build(&mut self, key: MeshKey, build: impl FnOnce() -> Mesh) -> Rc<Mesh> {
        self.used.insert(key);
        if let Some(mesh) = self.meshes.get(&key) {
            return Rc::clone(mesh);
        }
        self.generated += 1;
        let mesh = Rc::new(build());
        self.meshes.insert(key, Rc::clone(&mesh));
        mesh
    }
}

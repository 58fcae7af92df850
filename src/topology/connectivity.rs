//! The inter-tree connectivity store.
//!
//! A [`Connectivity`] holds the complete static topology of a forest of
//! octrees as parallel fixed-stride arrays plus offset-delimited slices:
//!
//! - `tree_to_vertex`: 8 vertex indices per tree, in z-order.
//! - `tree_to_tree` / `tree_to_face`: 6 entries per tree in face order
//!   -x, +x, -y, +y, -z, +z. A face code `c` names the neighbor face
//!   `c % 6` and the face orientation `c / 6`. A face without a neighbor
//!   points to its own tree and face with orientation 0.
//! - `tree_to_edge` / `tree_to_corner`: the global edge/corner index of each
//!   local entity, or `-1` when no other tree shares it.
//! - `ett_offset` delimits, per global edge, a slice of `edge_to_tree` and
//!   `edge_to_edge` (codes 0..24: `code % 12` is the local edge,
//!   `code >= 12` marks the opposite direction). Corners are analogous with
//!   `ctt_offset`, `corner_to_tree`, `corner_to_corner`.
//!
//! The store owns all of its arrays; resolvers hand out plain values,
//! never references into the arrays. A built store is immutable except for
//! attribute toggling and completion, so it can be shared freely for
//! concurrent reads.

use std::fmt;
use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::debug_invariants::DebugInvariants;
use crate::forest_error::ForestError;
use crate::topology::tables::{CHILDREN, DIM, EDGES, FACES};
use crate::topology::validation;

/// Index of a tree, vertex, or global edge/corner. Fits the persisted
/// 32-bit width; `-1` is the "no adjacency" sentinel.
pub type TopIdx = i32;

/// Sentinel stored in `tree_to_edge` / `tree_to_corner` for unshared entities.
pub const NO_ENTITY: TopIdx = -1;

/// Which tree boundary entities count as adjacency for higher layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ConnectType {
    /// Entities are adjacent if they share a face.
    Face,
    /// Entities are adjacent if they share a face or an edge.
    #[default]
    Edge,
    /// Entities are adjacent if they share a face, an edge, or a corner.
    Corner,
}

impl ConnectType {
    /// The full adjacency.
    pub const FULL: ConnectType = ConnectType::Corner;

    /// 1 for faces, 2 for edges, 3 for corners.
    pub fn as_int(self) -> u8 {
        match self {
            ConnectType::Face => 1,
            ConnectType::Edge => 2,
            ConnectType::Corner => 3,
        }
    }
}

impl fmt::Display for ConnectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConnectType::Face => "FACE",
            ConnectType::Edge => "EDGE",
            ConnectType::Corner => "CORNER",
        };
        f.write_str(s)
    }
}

/// Decoded `tree_to_tree` / `tree_to_face` entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FaceNeighbor {
    pub tree: TopIdx,
    pub face: usize,
    pub orientation: usize,
}

impl FaceNeighbor {
    /// Split a face code into `(face, orientation)`.
    #[inline]
    pub fn decode(tree: TopIdx, code: i8) -> Self {
        let code = code as usize;
        Self {
            tree,
            face: code % FACES,
            orientation: code / FACES,
        }
    }

    /// The face code stored in `tree_to_face`.
    #[inline]
    pub fn code(&self) -> i8 {
        (self.face + FACES * self.orientation) as i8
    }
}

/// Borrowed raw arrays for [`Connectivity::from_arrays`].
///
/// `tree_to_edge` may be empty when `num_edges == 0`, and `tree_to_corner`
/// when `num_corners == 0`; both are then filled with [`NO_ENTITY`].
/// `ett_offset` must hold `num_edges + 1` values, `ctt_offset`
/// `num_corners + 1`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConnectivityArrays<'a> {
    pub num_vertices: usize,
    pub num_trees: usize,
    pub num_edges: usize,
    pub num_corners: usize,
    pub vertices: &'a [f64],
    pub tree_to_vertex: &'a [TopIdx],
    pub tree_to_tree: &'a [TopIdx],
    pub tree_to_face: &'a [i8],
    pub tree_to_edge: &'a [TopIdx],
    pub ett_offset: &'a [TopIdx],
    pub edge_to_tree: &'a [TopIdx],
    pub edge_to_edge: &'a [i8],
    pub tree_to_corner: &'a [TopIdx],
    pub ctt_offset: &'a [TopIdx],
    pub corner_to_tree: &'a [TopIdx],
    pub corner_to_corner: &'a [i8],
}

/// Inter-tree connectivity of a forest of octrees.
///
/// Deserializing validates the arrays and fails on the first violated
/// invariant, like [`Connectivity::from_arrays`].
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "ConnectivityRepr")]
pub struct Connectivity {
    num_vertices: usize,
    num_trees: usize,
    num_edges: usize,
    num_corners: usize,

    vertices: Vec<f64>,
    tree_to_vertex: Vec<TopIdx>,
    tree_to_attr: Option<Vec<i8>>,

    tree_to_tree: Vec<TopIdx>,
    tree_to_face: Vec<i8>,

    tree_to_edge: Vec<TopIdx>,
    ett_offset: Vec<TopIdx>,
    edge_to_tree: Vec<TopIdx>,
    edge_to_edge: Vec<i8>,

    tree_to_corner: Vec<TopIdx>,
    ctt_offset: Vec<TopIdx>,
    corner_to_tree: Vec<TopIdx>,
    corner_to_corner: Vec<i8>,
}

/// Unchecked serde image of [`Connectivity`].
#[derive(Deserialize)]
struct ConnectivityRepr {
    num_vertices: usize,
    num_trees: usize,
    num_edges: usize,
    num_corners: usize,
    vertices: Vec<f64>,
    tree_to_vertex: Vec<TopIdx>,
    tree_to_attr: Option<Vec<i8>>,
    tree_to_tree: Vec<TopIdx>,
    tree_to_face: Vec<i8>,
    tree_to_edge: Vec<TopIdx>,
    ett_offset: Vec<TopIdx>,
    edge_to_tree: Vec<TopIdx>,
    edge_to_edge: Vec<i8>,
    tree_to_corner: Vec<TopIdx>,
    ctt_offset: Vec<TopIdx>,
    corner_to_tree: Vec<TopIdx>,
    corner_to_corner: Vec<i8>,
}

impl TryFrom<ConnectivityRepr> for Connectivity {
    type Error = ForestError;

    fn try_from(raw: ConnectivityRepr) -> Result<Self, Self::Error> {
        if let Some(attr) = &raw.tree_to_attr {
            if attr.len() != raw.num_trees {
                return Err(ForestError::ArrayLength {
                    array: "tree_to_attr",
                    expected: raw.num_trees,
                    found: attr.len(),
                });
            }
        }
        let conn = Self {
            num_vertices: raw.num_vertices,
            num_trees: raw.num_trees,
            num_edges: raw.num_edges,
            num_corners: raw.num_corners,
            vertices: raw.vertices,
            tree_to_vertex: raw.tree_to_vertex,
            tree_to_attr: raw.tree_to_attr,
            tree_to_tree: raw.tree_to_tree,
            tree_to_face: raw.tree_to_face,
            tree_to_edge: raw.tree_to_edge,
            ett_offset: raw.ett_offset,
            edge_to_tree: raw.edge_to_tree,
            edge_to_edge: raw.edge_to_edge,
            tree_to_corner: raw.tree_to_corner,
            ctt_offset: raw.ctt_offset,
            corner_to_tree: raw.corner_to_tree,
            corner_to_corner: raw.corner_to_corner,
        };
        if let Err(e) = conn.validate() {
            log::warn!("rejecting deserialized connectivity: {e}");
            return Err(e);
        }
        Ok(conn)
    }
}

impl Connectivity {
    /// Allocate a store sized exactly to the given counts.
    ///
    /// Face arrays are zeroed, `tree_to_edge`/`tree_to_corner` start at
    /// [`NO_ENTITY`], and the offset arrays are zero except for their
    /// terminal entries `num_ett` / `num_ctt`. Vertex arrays are empty when
    /// `num_vertices == 0`; attributes start disabled. The caller fills the
    /// arrays through the `*_mut` accessors and should validate afterwards.
    pub fn new(
        num_vertices: usize,
        num_trees: usize,
        num_edges: usize,
        num_ett: usize,
        num_corners: usize,
        num_ctt: usize,
    ) -> Self {
        let (vertices, tree_to_vertex) = if num_vertices > 0 {
            (vec![0.0; DIM * num_vertices], vec![0; CHILDREN * num_trees])
        } else {
            (Vec::new(), Vec::new())
        };
        let mut ett_offset = vec![0; num_edges + 1];
        ett_offset[num_edges] = num_ett as TopIdx;
        let mut ctt_offset = vec![0; num_corners + 1];
        ctt_offset[num_corners] = num_ctt as TopIdx;

        Self {
            num_vertices,
            num_trees,
            num_edges,
            num_corners,
            vertices,
            tree_to_vertex,
            tree_to_attr: None,
            tree_to_tree: vec![0; FACES * num_trees],
            tree_to_face: vec![0; FACES * num_trees],
            tree_to_edge: vec![NO_ENTITY; EDGES * num_trees],
            ett_offset,
            edge_to_tree: vec![0; num_ett],
            edge_to_edge: vec![0; num_ett],
            tree_to_corner: vec![NO_ENTITY; CHILDREN * num_trees],
            ctt_offset,
            corner_to_tree: vec![0; num_ctt],
            corner_to_corner: vec![0; num_ctt],
        }
    }

    /// Copy caller-supplied arrays into a new store and validate it.
    pub fn from_arrays(arrays: ConnectivityArrays<'_>) -> Result<Self, ForestError> {
        let ConnectivityArrays {
            num_vertices,
            num_trees,
            num_edges,
            num_corners,
            ..
        } = arrays;
        let tree_to_edge = if num_edges == 0 && arrays.tree_to_edge.is_empty() {
            vec![NO_ENTITY; EDGES * num_trees]
        } else {
            arrays.tree_to_edge.to_vec()
        };
        let tree_to_corner = if num_corners == 0 && arrays.tree_to_corner.is_empty() {
            vec![NO_ENTITY; CHILDREN * num_trees]
        } else {
            arrays.tree_to_corner.to_vec()
        };

        let conn = Self {
            num_vertices,
            num_trees,
            num_edges,
            num_corners,
            vertices: arrays.vertices.to_vec(),
            tree_to_vertex: arrays.tree_to_vertex.to_vec(),
            tree_to_attr: None,
            tree_to_tree: arrays.tree_to_tree.to_vec(),
            tree_to_face: arrays.tree_to_face.to_vec(),
            tree_to_edge,
            ett_offset: arrays.ett_offset.to_vec(),
            edge_to_tree: arrays.edge_to_tree.to_vec(),
            edge_to_edge: arrays.edge_to_edge.to_vec(),
            tree_to_corner,
            ctt_offset: arrays.ctt_offset.to_vec(),
            corner_to_tree: arrays.corner_to_tree.to_vec(),
            corner_to_corner: arrays.corner_to_corner.to_vec(),
        };
        if let Err(e) = conn.validate() {
            log::warn!("rejecting connectivity built from arrays: {e}");
            return Err(e);
        }
        Ok(conn)
    }

    // --- counts ---------------------------------------------------------------

    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.num_vertices
    }

    #[inline]
    pub fn num_trees(&self) -> usize {
        self.num_trees
    }

    #[inline]
    pub fn num_edges(&self) -> usize {
        self.num_edges
    }

    #[inline]
    pub fn num_corners(&self) -> usize {
        self.num_corners
    }

    /// Total length of the `edge_to_*` arrays.
    #[inline]
    pub fn num_ett(&self) -> usize {
        self.edge_to_tree.len()
    }

    /// Total length of the `corner_to_*` arrays.
    #[inline]
    pub fn num_ctt(&self) -> usize {
        self.corner_to_tree.len()
    }

    // --- raw arrays -----------------------------------------------------------

    pub fn vertices(&self) -> &[f64] {
        &self.vertices
    }
    pub fn vertices_mut(&mut self) -> &mut [f64] {
        &mut self.vertices
    }
    pub fn tree_to_vertex(&self) -> &[TopIdx] {
        &self.tree_to_vertex
    }
    pub fn tree_to_vertex_mut(&mut self) -> &mut [TopIdx] {
        &mut self.tree_to_vertex
    }
    pub fn tree_to_tree(&self) -> &[TopIdx] {
        &self.tree_to_tree
    }
    pub fn tree_to_tree_mut(&mut self) -> &mut [TopIdx] {
        &mut self.tree_to_tree
    }
    pub fn tree_to_face(&self) -> &[i8] {
        &self.tree_to_face
    }
    pub fn tree_to_face_mut(&mut self) -> &mut [i8] {
        &mut self.tree_to_face
    }
    pub fn tree_to_edge(&self) -> &[TopIdx] {
        &self.tree_to_edge
    }
    pub fn tree_to_edge_mut(&mut self) -> &mut [TopIdx] {
        &mut self.tree_to_edge
    }
    pub fn ett_offset(&self) -> &[TopIdx] {
        &self.ett_offset
    }
    pub fn ett_offset_mut(&mut self) -> &mut [TopIdx] {
        &mut self.ett_offset
    }
    pub fn edge_to_tree(&self) -> &[TopIdx] {
        &self.edge_to_tree
    }
    pub fn edge_to_tree_mut(&mut self) -> &mut [TopIdx] {
        &mut self.edge_to_tree
    }
    pub fn edge_to_edge(&self) -> &[i8] {
        &self.edge_to_edge
    }
    pub fn edge_to_edge_mut(&mut self) -> &mut [i8] {
        &mut self.edge_to_edge
    }
    pub fn tree_to_corner(&self) -> &[TopIdx] {
        &self.tree_to_corner
    }
    pub fn tree_to_corner_mut(&mut self) -> &mut [TopIdx] {
        &mut self.tree_to_corner
    }
    pub fn ctt_offset(&self) -> &[TopIdx] {
        &self.ctt_offset
    }
    pub fn ctt_offset_mut(&mut self) -> &mut [TopIdx] {
        &mut self.ctt_offset
    }
    pub fn corner_to_tree(&self) -> &[TopIdx] {
        &self.corner_to_tree
    }
    pub fn corner_to_tree_mut(&mut self) -> &mut [TopIdx] {
        &mut self.corner_to_tree
    }
    pub fn corner_to_corner(&self) -> &[i8] {
        &self.corner_to_corner
    }
    pub fn corner_to_corner_mut(&mut self) -> &mut [i8] {
        &mut self.corner_to_corner
    }

    /// Per-tree attribute bytes, if enabled.
    pub fn tree_to_attr(&self) -> Option<&[i8]> {
        self.tree_to_attr.as_deref()
    }
    pub fn tree_to_attr_mut(&mut self) -> Option<&mut [i8]> {
        self.tree_to_attr.as_deref_mut()
    }

    // --- per-entity lookups ---------------------------------------------------

    /// Coordinates of a vertex.
    pub fn vertex(&self, vertex: TopIdx) -> [f64; DIM] {
        let v = DIM * vertex as usize;
        [self.vertices[v], self.vertices[v + 1], self.vertices[v + 2]]
    }

    /// The 8 vertex indices of a tree, empty when the store has no vertices.
    pub fn tree_vertices(&self, tree: TopIdx) -> &[TopIdx] {
        if self.tree_to_vertex.is_empty() {
            return &[];
        }
        let t = CHILDREN * tree as usize;
        &self.tree_to_vertex[t..t + CHILDREN]
    }

    /// Decoded neighbor across a face; a boundary face decodes to itself.
    #[inline]
    pub fn face_neighbor(&self, tree: TopIdx, face: usize) -> FaceNeighbor {
        debug_assert!(face < FACES);
        let slot = FACES * tree as usize + face;
        FaceNeighbor::decode(self.tree_to_tree[slot], self.tree_to_face[slot])
    }

    /// True when the face has no neighbor (self-reference, same face).
    #[inline]
    pub fn is_boundary_face(&self, tree: TopIdx, face: usize) -> bool {
        let slot = FACES * tree as usize + face;
        self.tree_to_tree[slot] == tree && self.tree_to_face[slot] as usize == face
    }

    /// Global edge of a tree edge, `None` when no other tree shares it.
    #[inline]
    pub fn tree_edge(&self, tree: TopIdx, edge: usize) -> Option<TopIdx> {
        debug_assert!(edge < EDGES);
        let g = self.tree_to_edge[EDGES * tree as usize + edge];
        (g != NO_ENTITY).then_some(g)
    }

    /// Global corner of a tree corner, `None` when no other tree shares it.
    #[inline]
    pub fn tree_corner(&self, tree: TopIdx, corner: usize) -> Option<TopIdx> {
        debug_assert!(corner < CHILDREN);
        let g = self.tree_to_corner[CHILDREN * tree as usize + corner];
        (g != NO_ENTITY).then_some(g)
    }

    /// Slot range of a global edge in the `edge_to_*` arrays.
    #[inline]
    pub fn edge_slots(&self, edge: TopIdx) -> Range<usize> {
        let e = edge as usize;
        self.ett_offset[e] as usize..self.ett_offset[e + 1] as usize
    }

    /// Slot range of a global corner in the `corner_to_*` arrays.
    #[inline]
    pub fn corner_slots(&self, corner: TopIdx) -> Range<usize> {
        let c = corner as usize;
        self.ctt_offset[c] as usize..self.ctt_offset[c + 1] as usize
    }

    /// `(tree, edge code)` members of a global edge.
    pub fn edge_members(&self, edge: TopIdx) -> impl Iterator<Item = (TopIdx, i8)> + '_ {
        self.edge_slots(edge)
            .map(move |s| (self.edge_to_tree[s], self.edge_to_edge[s]))
    }

    /// `(tree, corner)` members of a global corner.
    pub fn corner_members(&self, corner: TopIdx) -> impl Iterator<Item = (TopIdx, i8)> + '_ {
        self.corner_slots(corner)
            .map(move |s| (self.corner_to_tree[s], self.corner_to_corner[s]))
    }

    // --- mutation points ------------------------------------------------------

    /// Allocate (`true`) or free (`false`) the per-tree attribute bytes.
    ///
    /// Enabling requires attributes to be disabled; disabling is always
    /// allowed.
    pub fn set_attr(&mut self, enable_tree_attr: bool) -> Result<(), ForestError> {
        if enable_tree_attr {
            if self.tree_to_attr.is_some() {
                return Err(ForestError::AttrAlreadyEnabled);
            }
            self.tree_to_attr = Some(vec![0; self.num_trees]);
        } else {
            self.tree_to_attr = None;
        }
        Ok(())
    }

    /// Replace the whole edge section. Lengths are the caller's contract.
    pub(crate) fn replace_edges(
        &mut self,
        tree_to_edge: Vec<TopIdx>,
        ett_offset: Vec<TopIdx>,
        edge_to_tree: Vec<TopIdx>,
        edge_to_edge: Vec<i8>,
    ) {
        self.num_edges = ett_offset.len() - 1;
        self.tree_to_edge = tree_to_edge;
        self.ett_offset = ett_offset;
        self.edge_to_tree = edge_to_tree;
        self.edge_to_edge = edge_to_edge;
    }

    /// Replace the whole corner section. Lengths are the caller's contract.
    pub(crate) fn replace_corners(
        &mut self,
        tree_to_corner: Vec<TopIdx>,
        ctt_offset: Vec<TopIdx>,
        corner_to_tree: Vec<TopIdx>,
        corner_to_corner: Vec<i8>,
    ) {
        self.num_corners = ctt_offset.len() - 1;
        self.tree_to_corner = tree_to_corner;
        self.ctt_offset = ctt_offset;
        self.corner_to_tree = corner_to_tree;
        self.corner_to_corner = corner_to_corner;
    }

    // --- diagnostics ----------------------------------------------------------

    /// Bytes owned by this store, including the struct itself.
    pub fn memory_used(&self) -> usize {
        use std::mem::size_of;
        let idx = size_of::<TopIdx>();
        size_of::<Self>()
            + self.vertices.capacity() * size_of::<f64>()
            + self.tree_to_attr.as_ref().map_or(0, Vec::capacity)
            + (self.tree_to_vertex.capacity()
                + self.tree_to_tree.capacity()
                + self.tree_to_edge.capacity()
                + self.ett_offset.capacity()
                + self.edge_to_tree.capacity()
                + self.tree_to_corner.capacity()
                + self.ctt_offset.capacity()
                + self.corner_to_tree.capacity())
                * idx
            + self.tree_to_face.capacity()
            + self.edge_to_edge.capacity()
            + self.corner_to_corner.capacity()
    }

    /// Check every structural invariant; `Err` names the first violation.
    pub fn validate(&self) -> Result<(), ForestError> {
        validation::validate_connectivity(self)
    }

    /// Boolean form of [`validate`](Self::validate).
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Deep structural equality; attributes are not compared.
    pub fn is_equal(&self, other: &Self) -> bool {
        self == other
    }
}

/// Field-by-field comparison. Vertex coordinates compare bitwise;
/// attribute bytes are user data and are ignored.
impl PartialEq for Connectivity {
    fn eq(&self, other: &Self) -> bool {
        self.num_vertices == other.num_vertices
            && self.num_trees == other.num_trees
            && self.num_edges == other.num_edges
            && self.num_corners == other.num_corners
            && self.vertices.len() == other.vertices.len()
            && self
                .vertices
                .iter()
                .zip(&other.vertices)
                .all(|(a, b)| a.to_bits() == b.to_bits())
            && self.tree_to_vertex == other.tree_to_vertex
            && self.tree_to_tree == other.tree_to_tree
            && self.tree_to_face == other.tree_to_face
            && self.tree_to_edge == other.tree_to_edge
            && self.ett_offset == other.ett_offset
            && self.edge_to_tree == other.edge_to_tree
            && self.edge_to_edge == other.edge_to_edge
            && self.tree_to_corner == other.tree_to_corner
            && self.ctt_offset == other.ctt_offset
            && self.corner_to_tree == other.corner_to_tree
            && self.corner_to_corner == other.corner_to_corner
    }
}

impl DebugInvariants for Connectivity {
    fn validate_invariants(&self) -> Result<(), ForestError> {
        self.validate()
    }
}

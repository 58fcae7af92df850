//! ForestError: Unified error type for forest-topology public APIs
//!
//! Validation, construction from caller arrays, face connection and the
//! persisted format all report through this enum. Resolvers never fail;
//! they assume a store that passed validation.

use thiserror::Error;

use crate::topology::connectivity::TopIdx;

/// Unified error type for connectivity operations.
#[derive(Debug, Error)]
pub enum ForestError {
    /// An array does not have the length implied by the counts.
    #[error("array `{array}` has length {found}, expected {expected}")]
    ArrayLength {
        array: &'static str,
        expected: usize,
        found: usize,
    },
    /// An offset array does not start at zero or decreases.
    #[error("offset array `{array}` is malformed at position {index}")]
    OffsetMalformed { array: &'static str, index: usize },
    /// `tree_to_vertex` references a vertex outside `[0, num_vertices)`.
    #[error("tree {tree} corner {corner} references vertex {vertex} out of range")]
    VertexOutOfRange {
        tree: TopIdx,
        corner: usize,
        vertex: TopIdx,
    },
    /// `tree_to_tree` references a tree outside `[0, num_trees)`.
    #[error("tree {tree} face {face} references neighbor tree {neighbor} out of range")]
    FaceNeighborOutOfRange {
        tree: TopIdx,
        face: usize,
        neighbor: TopIdx,
    },
    /// `tree_to_face` holds a code outside `[0, 24)`.
    #[error("tree {tree} face {face} has face code {code} out of range")]
    FaceCodeOutOfRange { tree: TopIdx, face: usize, code: i8 },
    /// A boundary face (self, same face) carries a non-zero orientation.
    #[error("boundary face {face} of tree {tree} has non-zero orientation (code {code})")]
    BoundaryOrientation { tree: TopIdx, face: usize, code: i8 },
    /// The neighbor does not point back with the same orientation.
    #[error("face connection of tree {tree} face {face} is not reciprocated")]
    FaceReciprocity { tree: TopIdx, face: usize },
    /// `tree_to_edge` holds a value outside `[-1, num_edges)`.
    #[error("tree {tree} edge {edge} references global edge {value} out of range")]
    EdgeOutOfRange {
        tree: TopIdx,
        edge: usize,
        value: TopIdx,
    },
    /// An `edge_to_tree`/`edge_to_edge` slot holds an out-of-range value.
    #[error("global edge slot {slot} holds an out-of-range tree or edge code")]
    EdgeSlotOutOfRange { slot: usize },
    /// The same (tree, edge, flip) appears twice in one global edge.
    #[error("tree {tree} edge {edge} appears twice with the same orientation")]
    EdgeDuplicate { tree: TopIdx, edge: usize },
    /// A tree edge maps to a global edge whose slice does not list it.
    #[error("global edge {global} does not contain tree {tree} edge {edge}")]
    EdgeMembershipMissing {
        tree: TopIdx,
        edge: usize,
        global: TopIdx,
    },
    /// A global edge lists a (tree, edge) that does not map back to it.
    #[error("global edge {global} slot {slot} is not referenced back by its tree")]
    EdgeBackReference { global: TopIdx, slot: usize },
    /// `tree_to_corner` holds a value outside `[-1, num_corners)`.
    #[error("tree {tree} corner {corner} references global corner {value} out of range")]
    CornerOutOfRange {
        tree: TopIdx,
        corner: usize,
        value: TopIdx,
    },
    /// A `corner_to_tree`/`corner_to_corner` slot holds an out-of-range value.
    #[error("global corner slot {slot} holds an out-of-range tree or corner")]
    CornerSlotOutOfRange { slot: usize },
    /// A tree corner maps to a global corner whose slice does not list it.
    #[error("global corner {global} does not contain tree {tree} corner {corner}")]
    CornerMembershipMissing {
        tree: TopIdx,
        corner: usize,
        global: TopIdx,
    },
    /// A global corner lists a (tree, corner) that does not map back to it.
    #[error("global corner {global} slot {slot} is not referenced back by its tree")]
    CornerBackReference { global: TopIdx, slot: usize },
    /// Attributes enabled while already enabled.
    #[error("tree attributes are already allocated")]
    AttrAlreadyEnabled,
    /// More than two tree faces share the same four vertices.
    #[error("vertices {vertices:?} are shared by {count} tree faces")]
    NonManifoldFace { vertices: [TopIdx; 4], count: usize },
    /// Vertex-based operations need vertices.
    #[error("connectivity has no vertices")]
    MissingVertices,
    /// A generator received unusable parameters.
    #[error("invalid generator input: {0}")]
    InvalidInput(String),
    /// The stream does not start with the expected identification string.
    #[error("bad magic in persisted connectivity")]
    FormatMagic,
    /// The persisted format version differs from the compiled one.
    #[error("persisted format {found:#x} does not match {expected:#x}")]
    FormatVersion { found: u64, expected: u64 },
    /// The persisted index width differs from the compiled one.
    #[error("persisted index width {found} does not match {expected}")]
    IndexWidth { found: u64, expected: u64 },
    /// A persisted count does not fit the index type.
    #[error("persisted count `{field}` = {value} is out of range")]
    CountOutOfRange { field: &'static str, value: u64 },
    /// Underlying reader or writer failed, including short reads.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

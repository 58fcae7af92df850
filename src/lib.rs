#![cfg_attr(docsrs, feature(doc_cfg))]
//! # forest-topology
//!
//! forest-topology describes the global connection topology of a forest of
//! cube-shaped trees tiling a 3-D domain. For any face, edge or corner of any
//! tree it resolves the neighbors elsewhere in the forest together with the
//! coordinate transform across the shared boundary.
//!
//! ## Features
//! - A compact [`Connectivity`](topology::Connectivity) store: fixed-stride
//!   per-tree arrays plus offset-delimited slices for shared edges and corners
//! - Face, edge and corner transform resolvers
//! - Completion of edge/corner adjacency (and optionally face adjacency)
//!   from vertex coincidence
//! - A bit-exact, versioned persisted format
//! - Named constructors: unit cube, periodic cube, two cubes, bricks
//!
//! ## Usage
//!
//! ```
//! use forest_topology::prelude::*;
//!
//! let conn = brick(2, 1, 1, false, false, false).unwrap();
//! assert!(conn.is_valid());
//!
//! let (neighbor, ft) = find_face_transform(&conn, 0, 1).unwrap();
//! assert_eq!(neighbor, 1);
//! assert_eq!(ft.transform_point([0.5, 0.25, 0.75]), [-0.5, 0.25, 0.75]);
//! ```
//!
//! ## Invariant checking
//!
//! Debug builds re-validate a store after completion. Enable the
//! `strict-invariants` or `check-invariants` feature to keep those checks in
//! release builds.
//!
//! ## Concurrency
//!
//! A built store is plain owned data. Share it by reference across threads
//! for queries; mutation (attribute toggling, completion) needs `&mut`.

pub mod algs;
pub mod debug_invariants;
pub mod forest_error;
pub mod io;
pub mod mesh_generation;
pub mod topology;

pub use debug_invariants::DebugInvariants;
pub use forest_error::ForestError;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::algs::completion::{complete_connectivity, connect_faces};
    pub use crate::algs::corner_transform::{
        CornerInfo, CornerTransform, corner_neighbors, find_corner_transform,
    };
    pub use crate::algs::edge_transform::{
        EdgeInfo, EdgeTransform, edge_neighbors, find_edge_transform,
    };
    pub use crate::algs::face_transform::{
        FaceTransform, expand_face_transform, find_face_transform,
    };
    pub use crate::debug_invariants::DebugInvariants;
    pub use crate::forest_error::ForestError;
    pub use crate::io::{load, load_file, save, save_file};
    pub use crate::mesh_generation::{brick, periodic, twocubes, unitcube};
    pub use crate::topology::connectivity::{
        ConnectType, Connectivity, ConnectivityArrays, FaceNeighbor, NO_ENTITY, TopIdx,
    };
    pub use crate::topology::orientation::{EdgeFlip, FacePerm, Orientation, Perm};
}

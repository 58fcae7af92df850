//! Edge transform resolver.
//!
//! Lists every other (tree, edge, flip) sharing a global edge with the
//! query, except those already reachable through one of the two faces that
//! meet at the edge: a neighbor-finding pass visits those through the face
//! transform.

use serde::{Deserialize, Serialize};

use crate::topology::connectivity::{Connectivity, TopIdx};
use crate::topology::orientation::{
    EdgeFlip, Orientation, accumulate_path, face_corner_permutation,
};
use crate::topology::tables::{
    DIM, EDGE_FACE_CORNERS, EDGE_FACES, EDGES, FACE_CORNERS, edge_axis, edge_between,
};

/// One edge neighbor of a tree edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdgeTransform {
    pub ntree: TopIdx,
    pub nedge: usize,
    /// Direction axis of the neighbor edge, then the two remaining axes.
    pub naxis: [usize; DIM],
    /// Whether the neighbor edge runs against the query edge.
    pub nflip: EdgeFlip,
    /// Position of the neighbor edge within its group of four parallel edges.
    pub corners: usize,
}

impl EdgeTransform {
    fn new(ntree: TopIdx, nedge: usize, nflip: EdgeFlip) -> Self {
        Self {
            ntree,
            nedge,
            naxis: edge_axes(nedge),
            nflip,
            corners: nedge % 4,
        }
    }
}

/// Result of an edge query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeInfo {
    /// The queried local edge.
    pub iedge: usize,
    pub transforms: Vec<EdgeTransform>,
}

/// Direction axis of an edge followed by the other two axes in order.
#[inline]
pub const fn edge_axes(edge: usize) -> [usize; DIM] {
    [
        edge_axis(edge),
        if edge < 4 { 1 } else { 0 },
        if edge < 8 { 2 } else { 1 },
    ]
}

/// All members of the global edge of `(tree, edge)` other than the query's
/// own slot, with flips taken relative to the query's direction.
///
/// Empty when the edge is unshared. A periodic identification of the edge
/// with itself in the other direction is a separate slot and is reported.
pub(crate) fn edge_slot_neighbors(
    conn: &Connectivity,
    tree: TopIdx,
    edge: usize,
) -> Vec<(TopIdx, usize, EdgeFlip)> {
    let Some(global) = conn.tree_edge(tree, edge) else {
        return Vec::new();
    };
    let mut origin = None;
    for (slot, (ntree, code)) in conn.edge_slots(global).zip(conn.edge_members(global)) {
        if ntree == tree && code as usize % EDGES == edge {
            origin = Some((slot, EdgeFlip::from_code(code)));
            break;
        }
    }
    let Some((origin, iflip)) = origin else {
        return Vec::new();
    };
    conn.edge_slots(global)
        .zip(conn.edge_members(global))
        .filter(|&(slot, _)| slot != origin)
        .map(|(_, (ntree, code))| {
            // query -> global edge direction -> neighbor
            let nflip = accumulate_path([EdgeFlip::inverse(iflip), EdgeFlip::from_code(code)]);
            (ntree, code as usize % EDGES, nflip)
        })
        .collect()
}

/// Every other member of the global edge of `(tree, edge)`, face-reachable
/// or not. Only the query's own slot is skipped; empty when the edge is
/// unshared.
pub fn edge_neighbors(conn: &Connectivity, tree: TopIdx, edge: usize) -> Vec<EdgeTransform> {
    debug_assert!(edge < EDGES);
    edge_slot_neighbors(conn, tree, edge)
        .into_iter()
        .map(|(ntree, nedge, nflip)| EdgeTransform::new(ntree, nedge, nflip))
        .collect()
}

/// Images of `(tree, edge)` through the faces adjacent to it.
fn face_reachable_edges(
    conn: &Connectivity,
    tree: TopIdx,
    edge: usize,
) -> impl Iterator<Item = (TopIdx, usize, EdgeFlip)> + '_ {
    EDGE_FACES[edge].iter().filter_map(move |&face| {
        if conn.is_boundary_face(tree, face) {
            return None;
        }
        let nb = conn.face_neighbor(tree, face);
        let perm = face_corner_permutation(face, nb.face, nb.orientation);
        let [c0, c1] = EDGE_FACE_CORNERS[edge][face]
            .map(|fc| FACE_CORNERS[nb.face][perm.apply(fc as usize)]);
        let (nedge, reversed) = edge_between(c0, c1)?;
        Some((nb.tree, nedge, EdgeFlip(reversed)))
    })
}

/// Edge neighbors of `edge` of `tree` not reachable through a face.
///
/// The store must be valid; nothing is re-checked here.
pub fn find_edge_transform(conn: &Connectivity, tree: TopIdx, edge: usize) -> EdgeInfo {
    debug_assert!(edge < EDGES);
    let via_faces: Vec<_> = face_reachable_edges(conn, tree, edge).collect();
    let transforms = edge_slot_neighbors(conn, tree, edge)
        .into_iter()
        .filter(|entry| !via_faces.contains(entry))
        .map(|(ntree, nedge, nflip)| EdgeTransform::new(ntree, nedge, nflip))
        .collect();
    EdgeInfo {
        iedge: edge,
        transforms,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh_generation::{brick, periodic};

    #[test]
    fn axes_of_edges() {
        assert_eq!(edge_axes(0), [0, 1, 2]);
        assert_eq!(edge_axes(5), [1, 0, 2]);
        assert_eq!(edge_axes(11), [2, 0, 1]);
    }

    #[test]
    fn periodic_cube_edges_reach_the_diagonal_copy() {
        let conn = periodic();
        for edge in 0..EDGES {
            let info = find_edge_transform(&conn, 0, edge);
            assert_eq!(info.iedge, edge);
            assert_eq!(info.transforms.len(), 1, "edge {edge}");
            let t = info.transforms[0];
            assert_eq!(t.ntree, 0);
            // the diagonally opposite parallel edge
            assert_eq!(t.nedge, 4 * (edge / 4) + 3 - edge % 4);
            assert_eq!(t.nflip, EdgeFlip(false));
            assert_eq!(t.naxis, edge_axes(edge));
        }
    }

    #[test]
    fn unshared_edge_is_empty() {
        let conn = brick(1, 1, 1, false, false, false).unwrap();
        for edge in 0..EDGES {
            assert!(find_edge_transform(&conn, 0, edge).transforms.is_empty());
        }
    }

    #[test]
    fn slot_neighbors_include_face_reachable_ones() {
        let conn = periodic();
        // edge 0 is shared with 1, 2 and 3; only 3 is not face-reachable
        let all = edge_slot_neighbors(&conn, 0, 0);
        let edges: Vec<_> = all.iter().map(|&(_, e, _)| e).collect();
        assert_eq!(edges, vec![1, 2, 3]);
        let listed: Vec<_> = edge_neighbors(&conn, 0, 0).iter().map(|t| t.nedge).collect();
        assert_eq!(listed, edges);
    }
}

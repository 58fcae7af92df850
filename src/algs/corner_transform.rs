//! Corner transform resolver.
//!
//! Like edges, but a corner has no direction: a neighbor is just a
//! (tree, corner) pair. Neighbors reachable through any of the three faces
//! or three edges meeting at the corner are left out.

use serde::{Deserialize, Serialize};

use crate::algs::edge_transform::edge_slot_neighbors;
use crate::topology::connectivity::{Connectivity, TopIdx};
use crate::topology::orientation::face_corner_permutation;
use crate::topology::tables::{
    CHILDREN, CORNER_EDGES, CORNER_FACE_CORNERS, CORNER_FACES, EDGE_CORNERS, FACE_CORNERS,
};

/// One corner neighbor of a tree corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CornerTransform {
    pub ntree: TopIdx,
    pub ncorner: usize,
}

/// Result of a corner query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CornerInfo {
    /// The queried local corner.
    pub icorner: usize,
    pub transforms: Vec<CornerTransform>,
}

/// Images of `(tree, corner)` through adjacent faces and shared adjacent edges.
fn reachable_corners(conn: &Connectivity, tree: TopIdx, corner: usize) -> Vec<CornerTransform> {
    let mut out = Vec::new();
    for &face in &CORNER_FACES[corner] {
        if conn.is_boundary_face(tree, face) {
            continue;
        }
        let nb = conn.face_neighbor(tree, face);
        let perm = face_corner_permutation(face, nb.face, nb.orientation);
        let fc = CORNER_FACE_CORNERS[corner][face] as usize;
        out.push(CornerTransform {
            ntree: nb.tree,
            ncorner: FACE_CORNERS[nb.face][perm.apply(fc)],
        });
    }
    for &edge in &CORNER_EDGES[corner] {
        let pos = usize::from(EDGE_CORNERS[edge][1] == corner);
        for (ntree, nedge, nflip) in edge_slot_neighbors(conn, tree, edge) {
            out.push(CornerTransform {
                ntree,
                ncorner: EDGE_CORNERS[nedge][pos ^ nflip.as_u8() as usize],
            });
        }
    }
    out
}

/// Every other member of the global corner of `(tree, corner)`, reachable
/// through a face or edge or not. Only the query's own slot is skipped;
/// empty when the corner is unshared.
pub fn corner_neighbors(
    conn: &Connectivity,
    tree: TopIdx,
    corner: usize,
) -> Vec<CornerTransform> {
    debug_assert!(corner < CHILDREN);
    let Some(global) = conn.tree_corner(tree, corner) else {
        return Vec::new();
    };
    let mut skipped_origin = false;
    conn.corner_members(global)
        .filter_map(|(ntree, ncorner)| {
            let ncorner = ncorner as usize;
            if !skipped_origin && ntree == tree && ncorner == corner {
                skipped_origin = true;
                return None;
            }
            Some(CornerTransform { ntree, ncorner })
        })
        .collect()
}

/// Corner neighbors of `corner` of `tree` not reachable through a face or
/// an edge.
///
/// The store must be valid; nothing is re-checked here.
pub fn find_corner_transform(conn: &Connectivity, tree: TopIdx, corner: usize) -> CornerInfo {
    let mut transforms = corner_neighbors(conn, tree, corner);
    if !transforms.is_empty() {
        let reachable = reachable_corners(conn, tree, corner);
        transforms.retain(|t| !reachable.contains(t));
    }
    CornerInfo {
        icorner: corner,
        transforms,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh_generation::{brick, periodic};

    #[test]
    fn periodic_cube_corners_reach_the_opposite_corner() {
        let conn = periodic();
        for corner in 0..CHILDREN {
            let info = find_corner_transform(&conn, 0, corner);
            assert_eq!(info.icorner, corner);
            assert_eq!(
                info.transforms,
                vec![CornerTransform {
                    ntree: 0,
                    ncorner: 7 - corner
                }]
            );
        }
    }

    #[test]
    fn center_corner_reports_only_the_diagonal_tree() {
        // of the seven other trees around the center vertex, only tree 7
        // shares neither a face nor an edge with tree 0
        let conn = brick(2, 2, 2, false, false, false).unwrap();
        let info = find_corner_transform(&conn, 0, 7);
        assert_eq!(info.transforms, vec![CornerTransform { ntree: 7, ncorner: 0 }]);

        let all = corner_neighbors(&conn, 0, 7);
        let trees: Vec<_> = all.iter().map(|t| t.ntree).collect();
        assert_eq!(trees, vec![1, 2, 3, 4, 5, 6, 7]);
        assert!(all.iter().all(|t| t.ncorner == 7 - t.ntree as usize));
    }

    #[test]
    fn boundary_corner_has_no_neighbors() {
        let conn = brick(2, 2, 2, false, false, false).unwrap();
        assert!(find_corner_transform(&conn, 0, 0).transforms.is_empty());
    }
}

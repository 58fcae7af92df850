//! Structural validation of a [`Connectivity`].
//!
//! A read-only scan in O(num_trees * 6 + num_ett + num_ctt) expected time.
//! It is the last line of defense before resolvers run: they assume a store
//! that passed and do not re-check per query.

use itertools::Itertools;

use crate::forest_error::ForestError;
use crate::topology::connectivity::{Connectivity, NO_ENTITY, TopIdx};
use crate::topology::tables::{CHILDREN, DIM, EDGES, FACES, HALF};

/// Validate `conn`, returning the first violated invariant.
pub fn validate_connectivity(conn: &Connectivity) -> Result<(), ForestError> {
    let result = check_lengths(conn)
        .and_then(|()| check_offsets("ett_offset", conn.ett_offset(), conn.num_ett()))
        .and_then(|()| check_offsets("ctt_offset", conn.ctt_offset(), conn.num_ctt()))
        .and_then(|()| check_edge_slots(conn))
        .and_then(|()| check_corner_slots(conn))
        .and_then(|()| check_trees(conn));
    if let Err(e) = &result {
        log::debug!("connectivity invalid: {e}");
    }
    result
}

fn expect_len(array: &'static str, found: usize, expected: usize) -> Result<(), ForestError> {
    if found == expected {
        Ok(())
    } else {
        Err(ForestError::ArrayLength {
            array,
            expected,
            found,
        })
    }
}

fn check_lengths(conn: &Connectivity) -> Result<(), ForestError> {
    let nt = conn.num_trees();
    let nv = conn.num_vertices();
    expect_len("vertices", conn.vertices().len(), DIM * nv)?;
    expect_len(
        "tree_to_vertex",
        conn.tree_to_vertex().len(),
        if nv > 0 { CHILDREN * nt } else { 0 },
    )?;
    expect_len("tree_to_tree", conn.tree_to_tree().len(), FACES * nt)?;
    expect_len("tree_to_face", conn.tree_to_face().len(), FACES * nt)?;
    expect_len("tree_to_edge", conn.tree_to_edge().len(), EDGES * nt)?;
    expect_len("ett_offset", conn.ett_offset().len(), conn.num_edges() + 1)?;
    expect_len("edge_to_edge", conn.edge_to_edge().len(), conn.num_ett())?;
    expect_len("tree_to_corner", conn.tree_to_corner().len(), CHILDREN * nt)?;
    expect_len("ctt_offset", conn.ctt_offset().len(), conn.num_corners() + 1)?;
    expect_len("corner_to_corner", conn.corner_to_corner().len(), conn.num_ctt())?;
    if let Some(attr) = conn.tree_to_attr() {
        expect_len("tree_to_attr", attr.len(), nt)?;
    }
    Ok(())
}

/// Offsets start at zero, never decrease, and end at the slot count.
fn check_offsets(
    array: &'static str,
    offsets: &[TopIdx],
    num_slots: usize,
) -> Result<(), ForestError> {
    if offsets.first() != Some(&0) {
        return Err(ForestError::OffsetMalformed { array, index: 0 });
    }
    if let Some(i) = offsets.iter().tuple_windows().position(|(a, b)| b < a) {
        return Err(ForestError::OffsetMalformed {
            array,
            index: i + 1,
        });
    }
    let last = offsets.len() - 1;
    if offsets[last] as usize != num_slots {
        return Err(ForestError::OffsetMalformed { array, index: last });
    }
    Ok(())
}

/// Every slot names a valid (tree, local edge) that maps back to its edge.
fn check_edge_slots(conn: &Connectivity) -> Result<(), ForestError> {
    let nt = conn.num_trees() as TopIdx;
    for global in 0..conn.num_edges() as TopIdx {
        for slot in conn.edge_slots(global) {
            let tree = conn.edge_to_tree()[slot];
            let code = conn.edge_to_edge()[slot];
            if !(0..nt).contains(&tree) || !(0..2 * EDGES as i8).contains(&code) {
                return Err(ForestError::EdgeSlotOutOfRange { slot });
            }
            if conn.tree_to_edge()[EDGES * tree as usize + code as usize % EDGES] != global {
                return Err(ForestError::EdgeBackReference { global, slot });
            }
        }
    }
    Ok(())
}

/// Every slot names a valid (tree, corner) that maps back to its corner.
fn check_corner_slots(conn: &Connectivity) -> Result<(), ForestError> {
    let nt = conn.num_trees() as TopIdx;
    for global in 0..conn.num_corners() as TopIdx {
        for slot in conn.corner_slots(global) {
            let tree = conn.corner_to_tree()[slot];
            let corner = conn.corner_to_corner()[slot];
            if !(0..nt).contains(&tree) || !(0..CHILDREN as i8).contains(&corner) {
                return Err(ForestError::CornerSlotOutOfRange { slot });
            }
            if conn.tree_to_corner()[CHILDREN * tree as usize + corner as usize] != global {
                return Err(ForestError::CornerBackReference { global, slot });
            }
        }
    }
    Ok(())
}

fn check_trees(conn: &Connectivity) -> Result<(), ForestError> {
    let nt = conn.num_trees() as TopIdx;
    let nv = conn.num_vertices() as TopIdx;

    for tree in 0..nt {
        for (corner, &vertex) in conn.tree_vertices(tree).iter().enumerate() {
            if !(0..nv).contains(&vertex) {
                return Err(ForestError::VertexOutOfRange {
                    tree,
                    corner,
                    vertex,
                });
            }
        }

        for face in 0..FACES {
            check_face(conn, tree, face)?;
        }

        for edge in 0..EDGES {
            let value = conn.tree_to_edge()[EDGES * tree as usize + edge];
            if value == NO_ENTITY {
                continue;
            }
            if !(0..conn.num_edges() as TopIdx).contains(&value) {
                return Err(ForestError::EdgeOutOfRange { tree, edge, value });
            }
            let mut seen_flip = None;
            for (ntree, code) in conn.edge_members(value) {
                if ntree != tree || code as usize % EDGES != edge {
                    continue;
                }
                let flip = code as usize / EDGES;
                if seen_flip == Some(flip) {
                    return Err(ForestError::EdgeDuplicate { tree, edge });
                }
                seen_flip = Some(flip);
            }
            if seen_flip.is_none() {
                return Err(ForestError::EdgeMembershipMissing {
                    tree,
                    edge,
                    global: value,
                });
            }
        }

        for corner in 0..CHILDREN {
            let value = conn.tree_to_corner()[CHILDREN * tree as usize + corner];
            if value == NO_ENTITY {
                continue;
            }
            if !(0..conn.num_corners() as TopIdx).contains(&value) {
                return Err(ForestError::CornerOutOfRange {
                    tree,
                    corner,
                    value,
                });
            }
            let found = conn
                .corner_members(value)
                .any(|(ntree, ncorner)| ntree == tree && ncorner as usize == corner);
            if !found {
                return Err(ForestError::CornerMembershipMissing {
                    tree,
                    corner,
                    global: value,
                });
            }
        }
    }
    Ok(())
}

fn check_face(conn: &Connectivity, tree: TopIdx, face: usize) -> Result<(), ForestError> {
    let slot = FACES * tree as usize + face;
    let neighbor = conn.tree_to_tree()[slot];
    let code = conn.tree_to_face()[slot];
    if !(0..conn.num_trees() as TopIdx).contains(&neighbor) {
        return Err(ForestError::FaceNeighborOutOfRange {
            tree,
            face,
            neighbor,
        });
    }
    if !(0..(FACES * HALF) as i8).contains(&code) {
        return Err(ForestError::FaceCodeOutOfRange { tree, face, code });
    }
    let nface = code as usize % FACES;
    let orientation = code as usize / FACES;
    if neighbor == tree && nface == face {
        if orientation != 0 {
            return Err(ForestError::BoundaryOrientation { tree, face, code });
        }
        return Ok(());
    }
    let back = FACES * neighbor as usize + nface;
    if conn.tree_to_tree()[back] != tree
        || conn.tree_to_face()[back] as usize != face + FACES * orientation
    {
        return Err(ForestError::FaceReciprocity { tree, face });
    }
    Ok(())
}

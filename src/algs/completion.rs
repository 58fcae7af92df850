//! Completion of inter-tree adjacency from shared vertices.
//!
//! [`complete_connectivity`] discards the edge and corner sections and
//! rebuilds them from `tree_to_vertex`: tree edges with the same pair of end
//! vertices form one global edge, tree corners on the same vertex one global
//! corner. Groups with a single member stay unshared (`-1`).
//!
//! [`connect_faces`] does the same for faces, matching tree faces by their
//! four vertices. Periodicity encoded only in `tree_to_tree`/`tree_to_face`
//! and not in vertex identities is invisible to both.

use hashbrown::HashMap;

use crate::debug_invariants::DebugInvariants;
use crate::forest_error::ForestError;
use crate::topology::connectivity::{Connectivity, FaceNeighbor, NO_ENTITY, TopIdx};
use crate::topology::tables::{CHILDREN, EDGE_CORNERS, EDGES, FACE_CORNERS, FACES, HALF};

/// Groups of `(tree, code)` members keyed by vertex set, in order of first
/// appearance.
pub(crate) struct Grouping<K> {
    index: HashMap<K, usize>,
    groups: Vec<Vec<(TopIdx, i8)>>,
}

impl<K: std::hash::Hash + Eq> Grouping<K> {
    pub(crate) fn new() -> Self {
        Self {
            index: HashMap::new(),
            groups: Vec::new(),
        }
    }

    pub(crate) fn insert(&mut self, key: K, member: (TopIdx, i8)) {
        let groups = &mut self.groups;
        let g = *self.index.entry(key).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        self.groups[g].push(member);
    }

    /// Offset-delimited arrays of the groups with at least two members,
    /// plus the per-tree map with `stride` entries per tree.
    pub(crate) fn materialize(
        &self,
        num_trees: usize,
        stride: usize,
    ) -> (Vec<TopIdx>, Vec<TopIdx>, Vec<TopIdx>, Vec<i8>) {
        let mut tree_map = vec![NO_ENTITY; stride * num_trees];
        let mut offsets = vec![0];
        let mut to_tree = Vec::new();
        let mut to_entity = Vec::new();
        for members in self.groups.iter().filter(|m| m.len() >= 2) {
            let global = (offsets.len() - 1) as TopIdx;
            for &(tree, code) in members {
                tree_map[stride * tree as usize + code as usize % stride] = global;
                to_tree.push(tree);
                to_entity.push(code);
            }
            offsets.push(to_tree.len() as TopIdx);
        }
        (tree_map, offsets, to_tree, to_entity)
    }
}

fn require_vertices(conn: &Connectivity) -> Result<(), ForestError> {
    if conn.num_trees() > 0 && conn.num_vertices() == 0 {
        return Err(ForestError::MissingVertices);
    }
    Ok(())
}

/// Rebuild the edge and corner sections from vertex coincidence.
///
/// An edge member's flip is set when its tree traverses the edge from the
/// higher to the lower vertex index. The face section is left untouched.
/// Running this twice yields identical sections.
pub fn complete_connectivity(conn: &mut Connectivity) -> Result<(), ForestError> {
    require_vertices(conn)?;
    complete_from_vertices(conn);
    Ok(())
}

/// Completion body for stores known to carry vertices.
pub(crate) fn complete_from_vertices(conn: &mut Connectivity) {
    let num_trees = conn.num_trees();

    let mut edges = Grouping::new();
    let mut corners = Grouping::new();
    for tree in 0..num_trees as TopIdx {
        let ttv = conn.tree_vertices(tree);
        for (edge, &[c0, c1]) in EDGE_CORNERS.iter().enumerate() {
            let (a, b) = (ttv[c0], ttv[c1]);
            let code = if a > b { edge + EDGES } else { edge };
            edges.insert((a.min(b), a.max(b)), (tree, code as i8));
        }
        for (corner, &v) in ttv.iter().enumerate() {
            corners.insert(v, (tree, corner as i8));
        }
    }

    let (tte, eoff, ett, ete) = edges.materialize(num_trees, EDGES);
    let (ttc, coff, ctt, ctc) = corners.materialize(num_trees, CHILDREN);
    conn.replace_edges(tte, eoff, ett, ete);
    conn.replace_corners(ttc, coff, ctt, ctc);

    log::debug!(
        "completed connectivity of {} trees: {} edges ({} slots), {} corners ({} slots)",
        num_trees,
        conn.num_edges(),
        conn.num_ett(),
        conn.num_corners(),
        conn.num_ctt()
    );
    conn.debug_assert_invariants();
}

/// Rebuild `tree_to_tree`/`tree_to_face` by matching tree faces on their
/// four vertices.
///
/// Faces without a partner become boundaries. The orientation is the
/// position, among the higher face's corners, of the vertex at the lower
/// face's first corner. Fails without modifying the store if more than two
/// tree faces share one set of four vertices.
pub fn connect_faces(conn: &mut Connectivity) -> Result<(), ForestError> {
    require_vertices(conn)?;
    let num_trees = conn.num_trees();

    let mut faces: Grouping<[TopIdx; HALF]> = Grouping::new();
    for tree in 0..num_trees as TopIdx {
        let ttv = conn.tree_vertices(tree);
        for (face, corners) in FACE_CORNERS.iter().enumerate() {
            let mut key = corners.map(|c| ttv[c]);
            key.sort_unstable();
            faces.insert(key, (tree, face as i8));
        }
    }

    let mut ttt = Vec::with_capacity(FACES * num_trees);
    let mut ttf = Vec::with_capacity(FACES * num_trees);
    for tree in 0..num_trees as TopIdx {
        for face in 0..FACES {
            ttt.push(tree);
            ttf.push(face as i8);
        }
    }

    let mut glued = 0usize;
    for (key, members) in faces.index.iter().map(|(k, &g)| (k, &faces.groups[g])) {
        match members.as_slice() {
            [_] => {}
            &[(t0, f0), (t1, f1)] => {
                let (f0, f1) = (f0 as usize, f1 as usize);
                let orientation = if f0 <= f1 {
                    face_orientation(conn, (t0, f0), (t1, f1))?
                } else {
                    face_orientation(conn, (t1, f1), (t0, f0))?
                };
                let code0 = FaceNeighbor { tree: t1, face: f1, orientation }.code();
                let code1 = FaceNeighbor { tree: t0, face: f0, orientation }.code();
                ttt[FACES * t0 as usize + f0] = t1;
                ttf[FACES * t0 as usize + f0] = code0;
                ttt[FACES * t1 as usize + f1] = t0;
                ttf[FACES * t1 as usize + f1] = code1;
                glued += 1;
            }
            _ => {
                return Err(ForestError::NonManifoldFace {
                    vertices: *key,
                    count: members.len(),
                });
            }
        }
    }

    conn.tree_to_tree_mut().copy_from_slice(&ttt);
    conn.tree_to_face_mut().copy_from_slice(&ttf);
    log::debug!("connected {glued} tree faces of {num_trees} trees");
    Ok(())
}

/// Orientation of the connection between a lower face and a higher (or
/// equal) face sharing the same four vertices.
fn face_orientation(
    conn: &Connectivity,
    (lo_tree, lo_face): (TopIdx, usize),
    (hi_tree, hi_face): (TopIdx, usize),
) -> Result<usize, ForestError> {
    let v = conn.tree_vertices(lo_tree)[FACE_CORNERS[lo_face][0]];
    let hi = conn.tree_vertices(hi_tree);
    FACE_CORNERS[hi_face]
        .iter()
        .position(|&c| hi[c] == v)
        .ok_or_else(|| ForestError::InvalidInput(format!("tree {lo_tree} face {lo_face} is degenerate")))
}

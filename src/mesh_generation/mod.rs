//! Named connectivity constructors.
//!
//! Every constructor returns a store that already passes validation:
//! - [`unitcube`]: one tree, all faces on the boundary.
//! - [`periodic`]: one tree glued to itself in all three directions.
//! - [`twocubes`]: two trees sharing one face, with the edges and corners of
//!   that face listed explicitly.
//! - [`brick`]: an `m x n x p` block of trees with optional periodicity per axis.

use crate::algs::completion::{Grouping, complete_from_vertices};
use crate::debug_invariants::DebugInvariants;
use crate::forest_error::ForestError;
use crate::topology::connectivity::{Connectivity, TopIdx};
use crate::topology::tables::{CHILDREN, DIM, EDGE_CORNERS, EDGES, FACES, corner_coords, edge_axis};

fn invalid_input(message: impl Into<String>) -> ForestError {
    ForestError::InvalidInput(message.into())
}

/// Fill the vertex arrays with the unit cube corners and identity corner map.
fn unit_cube_vertices(conn: &mut Connectivity) {
    for c in 0..CHILDREN {
        let xyz = corner_coords(c);
        for a in 0..DIM {
            conn.vertices_mut()[DIM * c + a] = xyz[a] as f64;
        }
        conn.tree_to_vertex_mut()[c] = c as TopIdx;
    }
}

/// A single tree with six boundary faces.
pub fn unitcube() -> Connectivity {
    let mut conn = Connectivity::new(8, 1, 0, 0, 0, 0);
    unit_cube_vertices(&mut conn);
    for f in 0..FACES {
        conn.tree_to_face_mut()[f] = f as i8;
    }
    conn.debug_assert_invariants();
    conn
}

/// A single tree whose opposite faces are identified: a 3-torus.
///
/// Each group of four parallel edges forms one global edge and all eight
/// corners form one global corner.
pub fn periodic() -> Connectivity {
    let mut conn = Connectivity::new(8, 1, 3, EDGES, 1, CHILDREN);
    unit_cube_vertices(&mut conn);
    conn.tree_to_face_mut().copy_from_slice(&[1, 0, 3, 2, 5, 4]);
    for e in 0..EDGES {
        conn.tree_to_edge_mut()[e] = edge_axis(e) as TopIdx;
        conn.edge_to_edge_mut()[e] = e as i8;
    }
    conn.ett_offset_mut().copy_from_slice(&[0, 4, 8, 12]);
    for c in 0..CHILDREN {
        conn.tree_to_corner_mut()[c] = 0;
        conn.corner_to_corner_mut()[c] = c as i8;
    }
    conn.debug_assert_invariants();
    conn
}

/// Two trees side by side in x, glued along tree 0's +x face.
pub fn twocubes() -> Connectivity {
    let mut conn = Connectivity::new(12, 2, 0, 0, 0, 0);
    for z in 0..2 {
        for y in 0..2 {
            for x in 0..3 {
                let v = x + 3 * (y + 2 * z);
                conn.vertices_mut()[DIM * v..DIM * (v + 1)]
                    .copy_from_slice(&[x as f64, y as f64, z as f64]);
            }
        }
    }
    conn.tree_to_vertex_mut()
        .copy_from_slice(&[0, 1, 3, 4, 6, 7, 9, 10, 1, 2, 4, 5, 7, 8, 10, 11]);
    conn.tree_to_tree_mut()
        .copy_from_slice(&[0, 1, 0, 0, 0, 0, 0, 1, 1, 1, 1, 1]);
    conn.tree_to_face_mut()
        .copy_from_slice(&[0, 0, 2, 3, 4, 5, 1, 1, 2, 3, 4, 5]);
    complete_from_vertices(&mut conn);
    conn
}

/// An `m x n x p` brick of unit trees. Trees are numbered with x fastest,
/// then y, then z; vertices lie on the integer lattice.
///
/// With `periodic_a` (resp. `_b`, `_c`) the brick wraps around in x (y, z):
/// the last layer of trees is glued to the first, and wrapped edges and
/// corners are identified. Faces always connect with orientation 0 and
/// shared edges never flip.
pub fn brick(
    m: usize,
    n: usize,
    p: usize,
    periodic_a: bool,
    periodic_b: bool,
    periodic_c: bool,
) -> Result<Connectivity, ForestError> {
    if m == 0 || n == 0 || p == 0 {
        return Err(invalid_input(format!(
            "brick dimensions must be positive, got {m} x {n} x {p}"
        )));
    }
    let dims = [m, n, p];
    let periodic = [periodic_a, periodic_b, periodic_c];
    let num_vertices = [m, n, p]
        .into_iter()
        .try_fold(1usize, |acc, d| d.checked_add(1).and_then(|d1| acc.checked_mul(d1)))
        .filter(|&v| v <= TopIdx::MAX as usize)
        .ok_or_else(|| invalid_input(format!("brick {m} x {n} x {p} is too large")))?;
    let num_trees = m * n * p;

    let vertex_id = |x: usize, y: usize, z: usize| (x + (m + 1) * (y + (n + 1) * z)) as TopIdx;
    let tree_id = |ijk: [usize; DIM]| (ijk[0] + m * (ijk[1] + n * ijk[2])) as TopIdx;
    let trees = || {
        (0..p).flat_map(move |k| (0..n).flat_map(move |j| (0..m).map(move |i| [i, j, k])))
    };
    // Lattice point with periodic axes wrapped back to 0.
    let wrap = |mut pt: [usize; DIM]| {
        for a in 0..DIM {
            if periodic[a] && pt[a] == dims[a] {
                pt[a] = 0;
            }
        }
        pt
    };

    let mut conn = Connectivity::new(num_vertices, num_trees, 0, 0, 0, 0);
    for z in 0..=p {
        for y in 0..=n {
            for x in 0..=m {
                let v = vertex_id(x, y, z) as usize;
                conn.vertices_mut()[DIM * v..DIM * (v + 1)]
                    .copy_from_slice(&[x as f64, y as f64, z as f64]);
            }
        }
    }

    let mut edges = Grouping::new();
    let mut corners = Grouping::new();
    for ijk in trees() {
        let t = tree_id(ijk);
        let tu = t as usize;

        for c in 0..CHILDREN {
            let d = corner_coords(c);
            let pt = [ijk[0] + d[0], ijk[1] + d[1], ijk[2] + d[2]];
            conn.tree_to_vertex_mut()[CHILDREN * tu + c] = vertex_id(pt[0], pt[1], pt[2]);
            corners.insert(wrap(pt), (t, c as i8));
        }

        for f in 0..FACES {
            let axis = f / 2;
            let mut nb = ijk;
            let neighbor = if f % 2 == 0 {
                if ijk[axis] > 0 {
                    nb[axis] -= 1;
                    Some(nb)
                } else if periodic[axis] {
                    nb[axis] = dims[axis] - 1;
                    Some(nb)
                } else {
                    None
                }
            } else if ijk[axis] + 1 < dims[axis] {
                nb[axis] += 1;
                Some(nb)
            } else if periodic[axis] {
                nb[axis] = 0;
                Some(nb)
            } else {
                None
            };
            let (ntree, nface) = match neighbor {
                Some(nb) => (tree_id(nb), f ^ 1),
                None => (t, f),
            };
            conn.tree_to_tree_mut()[FACES * tu + f] = ntree;
            conn.tree_to_face_mut()[FACES * tu + f] = nface as i8;
        }

        for (e, &[c0, _]) in EDGE_CORNERS.iter().enumerate() {
            let d = corner_coords(c0);
            let pt = [ijk[0] + d[0], ijk[1] + d[1], ijk[2] + d[2]];
            edges.insert((edge_axis(e), wrap(pt)), (t, e as i8));
        }
    }

    let (tte, eoff, ett, ete) = edges.materialize(num_trees, EDGES);
    let (ttc, coff, ctt, ctc) = corners.materialize(num_trees, CHILDREN);
    conn.replace_edges(tte, eoff, ett, ete);
    conn.replace_corners(ttc, coff, ctt, ctc);

    log::debug!(
        "built {m} x {n} x {p} brick: {} edges, {} corners",
        conn.num_edges(),
        conn.num_corners()
    );
    conn.debug_assert_invariants();
    Ok(conn)
}

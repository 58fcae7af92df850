//! Fixed combinatorial tables of the reference octree.
//!
//! Corners are numbered in z-order (binary `zyx`: 000, 001, ..., 111).
//! Faces are ordered -x, +x, -y, +y, -z, +z. Edges 0..4 run along x,
//! 4..8 along y, 8..12 along z; within each group the two remaining
//! coordinates count up in the same binary order as corners.
//!
//! Entries of `-1` mean "no such relation". Everything here is `const`
//! data: there is nothing to initialize.

/// Spatial dimension.
pub const DIM: usize = 3;
/// Faces of a tree.
pub const FACES: usize = 2 * DIM;
/// Children of an octant, equal to the number of tree corners.
pub const CHILDREN: usize = 8;
/// Corners on a face.
pub const HALF: usize = CHILDREN / 2;
/// Edges of a tree.
pub const EDGES: usize = 12;
/// Size of the insulation layer around an octant.
pub const INSUL: usize = 27;
/// Number of integers in an expanded face transform.
pub const FTRANSFORM: usize = 9;

/// Corner numbers 0..8 for each tree face.
pub const FACE_CORNERS: [[usize; HALF]; FACES] = [
    [0, 2, 4, 6],
    [1, 3, 5, 7],
    [0, 1, 4, 5],
    [2, 3, 6, 7],
    [0, 1, 2, 3],
    [4, 5, 6, 7],
];

/// Edge numbers 0..12 for each tree face.
pub const FACE_EDGES: [[usize; 4]; FACES] = [
    [4, 6, 8, 10],
    [5, 7, 9, 11],
    [0, 2, 8, 9],
    [1, 3, 10, 11],
    [0, 1, 4, 5],
    [2, 3, 6, 7],
];

/// The face opposite each face, i.e. the face number seen from a
/// neighbor across an aligned connection.
pub const FACE_DUAL: [usize; FACES] = [1, 0, 3, 2, 5, 4];

/// The 8 of the 24 permutations of face corners that occur between
/// right-handed trees.
pub const FACE_PERMUTATIONS: [[usize; HALF]; 8] = [
    [0, 1, 2, 3],
    [0, 2, 1, 3],
    [1, 0, 3, 2],
    [1, 3, 0, 2],
    [2, 0, 3, 1],
    [2, 3, 0, 1],
    [3, 1, 2, 0],
    [3, 2, 1, 0],
];

/// The 3 sets of 4 permutations, indexed by face orientation.
pub const FACE_PERMUTATION_SETS: [[usize; 4]; 3] = [
    [1, 2, 5, 6],
    [0, 3, 4, 7],
    [0, 4, 3, 7],
];

/// Permutation set for each face pair, indexed `[my_face][neighbor_face]`.
pub const FACE_PERMUTATION_REFS: [[usize; FACES]; FACES] = [
    [0, 1, 1, 0, 0, 1],
    [2, 0, 0, 1, 1, 0],
    [2, 0, 0, 1, 1, 0],
    [0, 2, 2, 0, 0, 1],
    [0, 2, 2, 0, 0, 1],
    [2, 0, 0, 2, 2, 0],
];

/// Face numbers 0..6 touching each tree edge.
pub const EDGE_FACES: [[usize; 2]; EDGES] = [
    [2, 4],
    [3, 4],
    [2, 5],
    [3, 5],
    [0, 4],
    [1, 4],
    [0, 5],
    [1, 5],
    [0, 2],
    [1, 2],
    [0, 3],
    [1, 3],
];

/// Corner numbers 0..8 at both ends of each tree edge, in edge direction.
pub const EDGE_CORNERS: [[usize; 2]; EDGES] = [
    [0, 1],
    [2, 3],
    [4, 5],
    [6, 7],
    [0, 2],
    [1, 3],
    [4, 6],
    [5, 7],
    [0, 4],
    [1, 5],
    [2, 6],
    [3, 7],
];

/// Face corner numbers of both edge ends, for each face touching the edge.
#[rustfmt::skip]
pub const EDGE_FACE_CORNERS: [[[i8; 2]; FACES]; EDGES] = [
    [[-1, -1], [-1, -1], [ 0,  1], [-1, -1], [ 0,  1], [-1, -1]],
    [[-1, -1], [-1, -1], [-1, -1], [ 0,  1], [ 2,  3], [-1, -1]],
    [[-1, -1], [-1, -1], [ 2,  3], [-1, -1], [-1, -1], [ 0,  1]],
    [[-1, -1], [-1, -1], [-1, -1], [ 2,  3], [-1, -1], [ 2,  3]],
    [[ 0,  1], [-1, -1], [-1, -1], [-1, -1], [ 0,  2], [-1, -1]],
    [[-1, -1], [ 0,  1], [-1, -1], [-1, -1], [ 1,  3], [-1, -1]],
    [[ 2,  3], [-1, -1], [-1, -1], [-1, -1], [-1, -1], [ 0,  2]],
    [[-1, -1], [ 2,  3], [-1, -1], [-1, -1], [-1, -1], [ 1,  3]],
    [[ 0,  2], [-1, -1], [ 0,  2], [-1, -1], [-1, -1], [-1, -1]],
    [[-1, -1], [ 0,  2], [ 1,  3], [-1, -1], [-1, -1], [-1, -1]],
    [[ 1,  3], [-1, -1], [-1, -1], [ 0,  2], [-1, -1], [-1, -1]],
    [[-1, -1], [ 1,  3], [-1, -1], [ 1,  3], [-1, -1], [-1, -1]],
];

/// Face numbers 0..6 touching each tree corner.
pub const CORNER_FACES: [[usize; 3]; CHILDREN] = [
    [0, 2, 4],
    [1, 2, 4],
    [0, 3, 4],
    [1, 3, 4],
    [0, 2, 5],
    [1, 2, 5],
    [0, 3, 5],
    [1, 3, 5],
];

/// Edge numbers 0..12 touching each tree corner.
pub const CORNER_EDGES: [[usize; 3]; CHILDREN] = [
    [0, 4, 8],
    [0, 5, 9],
    [1, 4, 10],
    [1, 5, 11],
    [2, 6, 8],
    [2, 7, 9],
    [3, 6, 10],
    [3, 7, 11],
];

/// Face corner number of each tree corner on each face touching it.
#[rustfmt::skip]
pub const CORNER_FACE_CORNERS: [[i8; FACES]; CHILDREN] = [
    [ 0, -1,  0, -1,  0, -1],
    [-1,  0,  1, -1,  1, -1],
    [ 1, -1, -1,  0,  2, -1],
    [-1,  1, -1,  1,  3, -1],
    [ 2, -1,  2, -1, -1,  0],
    [-1,  2,  3, -1, -1,  1],
    [ 3, -1, -1,  2, -1,  2],
    [-1,  3, -1,  3, -1,  3],
];

/// For child `c` and the child's edge `e`: the parent face containing the
/// edge when it lies inside a parent face, else -1.
#[rustfmt::skip]
pub const CHILD_EDGE_FACES: [[i8; EDGES]; CHILDREN] = [
    [-1,  4,  2, -1, -1,  4,  0, -1, -1,  2,  0, -1],
    [-1,  4,  2, -1,  4, -1, -1,  1,  2, -1, -1,  1],
    [ 4, -1, -1,  3, -1,  4,  0, -1,  0, -1, -1,  3],
    [ 4, -1, -1,  3,  4, -1, -1,  1, -1,  1,  3, -1],
    [ 2, -1, -1,  5,  0, -1, -1,  5, -1,  2,  0, -1],
    [ 2, -1, -1,  5, -1,  1,  5, -1,  2, -1, -1,  1],
    [-1,  3,  5, -1,  0, -1, -1,  5,  0, -1, -1,  3],
    [-1,  3,  5, -1, -1,  1,  5, -1, -1,  1,  3, -1],
];

/// For child `c` and the child's corner `k`: the parent face containing
/// the corner when it lies inside a parent face, else -1.
#[rustfmt::skip]
pub const CHILD_CORNER_FACES: [[i8; CHILDREN]; CHILDREN] = [
    [-1, -1, -1,  4, -1,  2,  0, -1],
    [-1, -1,  4, -1,  2, -1, -1,  1],
    [-1,  4, -1, -1,  0, -1, -1,  3],
    [ 4, -1, -1, -1, -1,  1,  3, -1],
    [-1,  2,  0, -1, -1, -1, -1,  5],
    [ 2, -1, -1,  1, -1, -1,  5, -1],
    [ 0, -1, -1,  3, -1,  5, -1, -1],
    [-1,  1,  3, -1,  5, -1, -1, -1],
];

/// For child `c` and the child's corner `k`: the parent edge containing
/// the corner when it lies inside a parent edge, else -1.
#[rustfmt::skip]
pub const CHILD_CORNER_EDGES: [[i8; CHILDREN]; CHILDREN] = [
    [-1,  0,  4, -1,  8, -1, -1, -1],
    [ 0, -1, -1,  5, -1,  9, -1, -1],
    [ 4, -1, -1,  1, -1, -1, 10, -1],
    [-1,  5,  1, -1, -1, -1, -1, 11],
    [ 8, -1, -1, -1, -1,  2,  6, -1],
    [-1,  9, -1, -1,  2, -1, -1,  7],
    [-1, -1, 10, -1,  6, -1, -1,  3],
    [-1, -1, -1, 11, -1,  7,  3, -1],
];

/// Coordinate axis normal to a face.
#[inline]
pub const fn face_axis(face: usize) -> usize {
    face / 2
}

/// Coordinate axis an edge runs along.
#[inline]
pub const fn edge_axis(edge: usize) -> usize {
    edge / 4
}

/// Reference-cube coordinates (0 or 1 per axis) of a tree corner.
#[inline]
pub const fn corner_coords(corner: usize) -> [usize; DIM] {
    [corner & 1, (corner >> 1) & 1, (corner >> 2) & 1]
}

/// Edge whose end corners are exactly `a` then `b`, in either direction.
/// Returns the edge and whether `a -> b` runs against the edge direction.
pub fn edge_between(a: usize, b: usize) -> Option<(usize, bool)> {
    EDGE_CORNERS.iter().enumerate().find_map(|(e, &[c0, c1])| {
        if c0 == a && c1 == b {
            Some((e, false))
        } else if c0 == b && c1 == a {
            Some((e, true))
        } else {
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn face_corner_and_edge_tables_agree() {
        for f in 0..FACES {
            for (i, &c) in FACE_CORNERS[f].iter().enumerate() {
                assert_eq!(CORNER_FACE_CORNERS[c][f], i as i8);
                assert!(CORNER_FACES[c].contains(&f));
                assert_eq!(corner_coords(c)[face_axis(f)], f % 2);
            }
            for &e in &FACE_EDGES[f] {
                assert!(EDGE_FACES[e].contains(&f));
                assert!(EDGE_CORNERS[e].iter().all(|c| FACE_CORNERS[f].contains(c)));
            }
            assert_eq!(FACE_DUAL[FACE_DUAL[f]], f);
        }
    }

    #[test]
    fn edge_face_corners_match_face_corners() {
        for e in 0..EDGES {
            for f in 0..FACES {
                let [a, b] = EDGE_FACE_CORNERS[e][f];
                if EDGE_FACES[e].contains(&f) {
                    assert_eq!(FACE_CORNERS[f][a as usize], EDGE_CORNERS[e][0]);
                    assert_eq!(FACE_CORNERS[f][b as usize], EDGE_CORNERS[e][1]);
                } else {
                    assert_eq!((a, b), (-1, -1));
                }
            }
        }
    }

    #[test]
    fn corner_edges_contain_the_corner() {
        for c in 0..CHILDREN {
            for &e in &CORNER_EDGES[c] {
                assert!(EDGE_CORNERS[e].contains(&c));
            }
            let axes: Vec<_> = CORNER_EDGES[c].iter().map(|&e| edge_axis(e)).collect();
            assert_eq!(axes, vec![0, 1, 2]);
        }
    }

    #[test]
    fn child_tables_are_consistent() {
        for c in 0..CHILDREN {
            // a child corner that touches the parent's interior lies on no face or edge
            let inner = 7 - c;
            assert_eq!(CHILD_CORNER_FACES[c][inner], -1);
            assert_eq!(CHILD_CORNER_EDGES[c][inner], -1);
            // the child's own parent corner is on a parent corner, not face/edge
            assert_eq!(CHILD_CORNER_FACES[c][c], -1);
            assert_eq!(CHILD_CORNER_EDGES[c][c], -1);
            for k in 0..CHILDREN {
                let f = CHILD_CORNER_FACES[c][k];
                if f >= 0 {
                    assert!(CORNER_FACES[c].contains(&(f as usize)));
                }
                let e = CHILD_CORNER_EDGES[c][k];
                if e >= 0 {
                    assert!(CORNER_EDGES[c].contains(&(e as usize)));
                }
            }
            for e in 0..EDGES {
                let f = CHILD_EDGE_FACES[c][e];
                if f >= 0 {
                    assert!(CORNER_FACES[c].contains(&(f as usize)));
                }
            }
        }
    }

    #[test]
    fn edge_between_finds_direction() {
        assert_eq!(edge_between(0, 1), Some((0, false)));
        assert_eq!(edge_between(7, 3), Some((11, true)));
        assert_eq!(edge_between(0, 7), None);
    }
}

//! Face transform resolver.
//!
//! A [`FaceTransform`] maps reference-cube coordinates of one tree to those
//! of its neighbor across a face. It is the 9-integer descriptor
//! `[my_axis; 3] ++ [target_axis; 3] ++ [edge_reverse; 3]`:
//!
//! - `my_axis`: the in-plane axes (u, v) of the origin face, then its normal.
//! - `target_axis`: the axes of the target tree that u, v and the normal map to.
//! - `edge_reverse[0..2]`: whether u and v run backwards on the target face;
//!   `edge_reverse[2]` is the face code `2 * (f % 2) + nf % 2`, which selects
//!   how the normal coordinate is reflected and shifted.

use serde::{Deserialize, Serialize};

use crate::topology::connectivity::{Connectivity, TopIdx};
use crate::topology::orientation::face_corner_permutation;
use crate::topology::tables::{DIM, FACE_CORNERS, FACES, FTRANSFORM, HALF, face_axis};

/// Axis permutation and reflection across one tree face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FaceTransform {
    pub my_axis: [usize; DIM],
    pub target_axis: [usize; DIM],
    pub edge_reverse: [usize; DIM],
}

/// In-plane axes (u, v) of a face, in increasing order.
#[inline]
const fn face_plane_axes(face: usize) -> [usize; 2] {
    [
        if face < 2 { 1 } else { 0 },
        if face < 4 { 2 } else { 1 },
    ]
}

/// Expand a face code into its transform without consulting a store.
///
/// `iface` is the origin face, `code` the `tree_to_face` entry read for it.
pub fn expand_face_transform(iface: usize, code: i8) -> FaceTransform {
    debug_assert!(iface < FACES);
    debug_assert!((0..(FACES * HALF) as i8).contains(&code));
    let nface = code as usize % FACES;
    let orientation = code as usize / FACES;

    let [mu, mv] = face_plane_axes(iface);
    let [tu, tv] = face_plane_axes(nface);
    let perm = face_corner_permutation(iface, nface, orientation);

    // Face corner i sits at (u, v) = (i & 1, i >> 1). Stepping along u moves
    // corner 0 to corner 1; its image tells which target axis changes.
    let uv = |i: usize| (i & 1, i >> 1);
    let (a0, b0) = uv(perm.apply(0));
    let (a1, _) = uv(perm.apply(1));
    let (a2, _) = uv(perm.apply(2));

    let (target_u, rev_u) = if a0 != a1 { (tu, a0) } else { (tv, b0) };
    let (target_v, rev_v) = if a0 != a2 { (tu, a0) } else { (tv, b0) };

    FaceTransform {
        my_axis: [mu, mv, face_axis(iface)],
        target_axis: [target_u, target_v, face_axis(nface)],
        edge_reverse: [rev_u, rev_v, 2 * (iface % 2) + nface % 2],
    }
}

/// Neighbor tree and transform across face `face` of `tree`.
///
/// Returns `None` for a boundary face. A face glued to the same tree
/// (periodicity) is a regular neighbor.
pub fn find_face_transform(
    conn: &Connectivity,
    tree: TopIdx,
    face: usize,
) -> Option<(TopIdx, FaceTransform)> {
    debug_assert!(face < FACES);
    if conn.is_boundary_face(tree, face) {
        return None;
    }
    let slot = FACES * tree as usize + face;
    let ntree = conn.tree_to_tree()[slot];
    Some((ntree, expand_face_transform(face, conn.tree_to_face()[slot])))
}

impl FaceTransform {
    /// The flat 9-integer form.
    pub fn as_array(&self) -> [i32; FTRANSFORM] {
        let mut out = [0; FTRANSFORM];
        for i in 0..DIM {
            out[i] = self.my_axis[i] as i32;
            out[DIM + i] = self.target_axis[i] as i32;
            out[2 * DIM + i] = self.edge_reverse[i] as i32;
        }
        out
    }

    /// Inverse of [`as_array`](Self::as_array); `None` if any entry is out
    /// of range.
    pub fn from_array(raw: [i32; FTRANSFORM]) -> Option<Self> {
        let axis = |v: i32| usize::try_from(v).ok().filter(|&a| a < DIM);
        let flag = |v: i32, max: usize| usize::try_from(v).ok().filter(|&a| a <= max);
        let mut ft = FaceTransform {
            my_axis: [0; DIM],
            target_axis: [0; DIM],
            edge_reverse: [0; DIM],
        };
        for i in 0..DIM {
            ft.my_axis[i] = axis(raw[i])?;
            ft.target_axis[i] = axis(raw[DIM + i])?;
            ft.edge_reverse[i] = flag(raw[2 * DIM + i], if i < 2 { 1 } else { 3 })?;
        }
        Some(ft)
    }

    /// Map a point in the origin tree's reference cube to the neighbor's
    /// frame. Points of the origin tree land outside `[0, 1]` along the
    /// neighbor's face normal.
    pub fn transform_point(&self, xyz: [f64; DIM]) -> [f64; DIM] {
        let mut out = [0.0; DIM];
        for i in 0..2 {
            let x = xyz[self.my_axis[i]];
            out[self.target_axis[i]] = if self.edge_reverse[i] == 1 { 1.0 - x } else { x };
        }
        let z = xyz[self.my_axis[2]];
        out[self.target_axis[2]] = match self.edge_reverse[2] {
            0 => -z,
            1 => 1.0 + z,
            2 => z - 1.0,
            _ => 2.0 - z,
        };
        out
    }

    /// Tree corner of the neighbor that a corner on the origin face maps to.
    pub fn transform_corner(&self, corner: usize) -> usize {
        let mut out = [0usize; DIM];
        let c = [corner & 1, (corner >> 1) & 1, (corner >> 2) & 1];
        for i in 0..2 {
            let x = c[self.my_axis[i]];
            out[self.target_axis[i]] = if self.edge_reverse[i] == 1 { 1 - x } else { x };
        }
        // corners on the shared face sit on the neighbor's face side
        out[self.target_axis[2]] = self.edge_reverse[2] % 2;
        out[0] | (out[1] << 1) | (out[2] << 2)
    }
}

/// Face-corner mapping of a face connection, read directly from the tables.
/// Equal to what [`FaceTransform::transform_corner`] gives for face corners.
pub fn face_corner_images(iface: usize, code: i8) -> [usize; HALF] {
    let nface = code as usize % FACES;
    let perm = face_corner_permutation(iface, nface, code as usize / FACES);
    let mut out = [0; HALF];
    for (i, slot) in out.iter_mut().enumerate() {
        *slot = FACE_CORNERS[nface][perm.apply(i)];
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn straight_x_connection() {
        let ft = expand_face_transform(1, 0);
        assert_eq!(ft.as_array(), [1, 2, 0, 1, 2, 0, 0, 0, 2]);
        assert_eq!(ft.transform_point([1.0, 0.25, 0.5]), [0.0, 0.25, 0.5]);
    }

    #[test]
    fn periodic_self_connection_shifts_by_one() {
        // -z glued to +z of the same tree
        let ft = expand_face_transform(4, 5);
        assert_eq!(ft.transform_point([0.25, 0.5, 0.0]), [0.25, 0.5, 1.0]);
        assert_eq!(ft.transform_point([0.25, 0.5, 0.5]), [0.25, 0.5, 1.5]);
    }

    #[test]
    fn corner_images_agree_with_transform() {
        for f in 0..FACES {
            for code in 0..(FACES * HALF) as i8 {
                let ft = expand_face_transform(f, code);
                let images = face_corner_images(f, code);
                for (i, &c) in FACE_CORNERS[f].iter().enumerate() {
                    assert_eq!(ft.transform_corner(c), images[i], "face {f} code {code}");
                }
            }
        }
    }

    #[test]
    fn array_form_round_trips() {
        for f in 0..FACES {
            for code in 0..(FACES * HALF) as i8 {
                let ft = expand_face_transform(f, code);
                assert_eq!(FaceTransform::from_array(ft.as_array()), Some(ft));
            }
        }
        assert_eq!(FaceTransform::from_array([3, 0, 0, 0, 0, 0, 0, 0, 0]), None);
    }

    #[test]
    fn target_axes_form_a_permutation() {
        for f in 0..FACES {
            for code in 0..(FACES * HALF) as i8 {
                let mut axes = expand_face_transform(f, code).target_axis;
                axes.sort_unstable();
                assert_eq!(axes, [0, 1, 2]);
            }
        }
    }
}

//! Orientation groups for inter-tree connections with small, copyable
//! representations.
//!
//! - [`EdgeFlip`] is the group C₂ of edge reversals.
//! - [`FacePerm`] is a permutation of the 4 corners of a face; only the
//!   8 permutations in [`FACE_PERMUTATIONS`] occur between right-handed trees.
//!
//! `compose(a, b)` reads "do `a`, then `b`" along a path of connections;
//! `inverse(a)` is the orientation seen when the same connection is
//! traversed from the other side.

use core::fmt::{Debug, Formatter};

use serde::{Deserialize, Serialize};

use super::tables::{
    FACE_PERMUTATION_REFS, FACE_PERMUTATION_SETS, FACE_PERMUTATIONS, FACES, HALF,
};

/// A finite group of orientations.
/// Implementations **must** satisfy for all `a`, `b`, `c`:
///   - associativity: `compose(a, compose(b, c)) == compose(compose(a, b), c)`
///   - identity:      `compose(id, a) == a == compose(a, id)` where `id = Default::default()`
///   - inverse:       `compose(a, inverse(a)) == id == compose(inverse(a), a)`
pub trait Orientation: Copy + Default + Debug + 'static {
    fn compose(a: Self, b: Self) -> Self;
    fn inverse(a: Self) -> Self;
}

/// 1-bit flip (edge reversal); group C₂.
/// Compose = XOR; inverse = self.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct EdgeFlip(pub bool);

impl EdgeFlip {
    /// Decode the flip half of an `edge_to_edge` code (`code >= 12`).
    #[inline]
    pub fn from_code(code: i8) -> Self {
        EdgeFlip(code as usize >= super::tables::EDGES)
    }

    #[inline]
    pub fn as_u8(self) -> u8 {
        self.0 as u8
    }
}

impl Debug for EdgeFlip {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("EdgeFlip").field(&self.0).finish()
    }
}

impl Orientation for EdgeFlip {
    #[inline]
    fn compose(a: Self, b: Self) -> Self {
        EdgeFlip(a.0 ^ b.0)
    }
    #[inline]
    fn inverse(a: Self) -> Self {
        a
    }
}

/// Small, fixed-size permutation group S_K, represented as mapping [0..K) -> [0..K).
/// Compose(p,q) = "apply p, then q".
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct Perm<const K: usize>(pub [u8; K]);

impl<const K: usize> Default for Perm<K> {
    fn default() -> Self {
        let mut id = [0u8; K];
        let mut i = 0;
        while i < K {
            id[i] = i as u8;
            i += 1;
        }
        Perm(id)
    }
}

impl<const K: usize> Debug for Perm<K> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("Perm").field(&self.0).finish()
    }
}

impl<const K: usize> Perm<K> {
    /// Where `i` is sent.
    #[inline]
    pub fn apply(&self, i: usize) -> usize {
        self.0[i] as usize
    }

    #[inline]
    pub fn invert(&self) -> Self {
        let mut inv = [0u8; K];
        let mut i = 0;
        while i < K {
            inv[self.0[i] as usize] = i as u8;
            i += 1;
        }
        Perm(inv)
    }
}

impl<const K: usize> Orientation for Perm<K> {
    #[inline]
    fn compose(a: Self, b: Self) -> Self {
        let mut out = [0u8; K];
        let mut i = 0;
        while i < K {
            out[i] = b.0[a.0[i] as usize];
            i += 1;
        }
        Perm(out)
    }
    #[inline]
    fn inverse(a: Self) -> Self {
        a.invert()
    }
}

/// Face corner permutation between two connected faces.
pub type FacePerm = Perm<HALF>;

/// The permutation sending face corners of `my_face` to face corners of
/// `neighbor_face` for a connection with the given face orientation (0..4).
pub fn face_corner_permutation(my_face: usize, neighbor_face: usize, orientation: usize) -> FacePerm {
    debug_assert!(my_face < FACES && neighbor_face < FACES && orientation < HALF);
    let pref = FACE_PERMUTATION_REFS[my_face][neighbor_face];
    let pset = FACE_PERMUTATION_SETS[pref][orientation];
    let p = FACE_PERMUTATIONS[pset];
    Perm([p[0] as u8, p[1] as u8, p[2] as u8, p[3] as u8])
}

/// Accumulate a sequence of orientation steps along a path, left-to-right.
/// Identity is `O::default()`.
#[inline]
pub fn accumulate_path<O, I>(path: I) -> O
where
    O: Orientation,
    I: IntoIterator<Item = O>,
{
    path.into_iter()
        .fold(O::default(), |acc, step| O::compose(acc, step))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reciprocal_permutations_are_inverse() {
        for f in 0..FACES {
            for nf in 0..FACES {
                for o in 0..HALF {
                    let there = face_corner_permutation(f, nf, o);
                    let back = face_corner_permutation(nf, f, o);
                    assert_eq!(Perm::compose(there, back), FacePerm::default(), "{f} {nf} {o}");
                    assert_eq!(back, Perm::inverse(there));
                }
            }
        }
    }

    #[test]
    fn orientation_is_image_of_lower_first_corner() {
        for f in 0..FACES {
            for nf in f..FACES {
                for o in 0..HALF {
                    assert_eq!(face_corner_permutation(f, nf, o).apply(0), o);
                    assert_eq!(face_corner_permutation(nf, f, o).invert().apply(0), o);
                }
            }
        }
    }

    #[test]
    fn edge_flip_path() {
        let total: EdgeFlip = accumulate_path([EdgeFlip(true), EdgeFlip(false), EdgeFlip(true)]);
        assert_eq!(total, EdgeFlip(false));
        assert_eq!(EdgeFlip::from_code(13), EdgeFlip(true));
        assert_eq!(EdgeFlip::from_code(11), EdgeFlip(false));
    }

    #[test]
    fn edge_flip_serializes_as_its_bit() {
        assert_eq!(serde_json::to_string(&EdgeFlip(true)).unwrap(), "true");
        let back: EdgeFlip = serde_json::from_str("false").unwrap();
        assert_eq!(back, EdgeFlip(false));
        // face permutations are computed from the tables, never stored
        assert_eq!(face_corner_permutation(1, 0, 0), FacePerm::default());
    }

    #[test]
    fn perm_compose_order() {
        let a = Perm::<4>([1, 2, 3, 0]);
        let c = Perm::compose(a, Perm([3, 2, 1, 0]));
        // 0 -> 1 -> 2
        assert_eq!(c.apply(0), 2);
        assert_eq!(accumulate_path::<Perm<4>, _>([a, a, a, a]), Perm::default());
    }
}

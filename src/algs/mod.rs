//! Re-export public algorithms.

pub mod completion;
pub mod corner_transform;
pub mod edge_transform;
pub mod face_transform;

pub use completion::{complete_connectivity, connect_faces};
pub use corner_transform::{corner_neighbors, find_corner_transform};
pub use edge_transform::{edge_neighbors, find_edge_transform};
pub use face_transform::{expand_face_transform, find_face_transform};

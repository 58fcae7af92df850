//! Top-level module for the static inter-tree topology.
//!
//! This module provides the core types for representing how the trees of a
//! forest of octrees are glued together.
//! It includes:
//! - The [`Connectivity`] store and its accessors
//! - The fixed combinatorial tables of the reference cube
//! - Orientation groups for face and edge connections
//! - Structural validation
//!
//! Resolvers that query a store live in [`crate::algs`].

pub mod connectivity;
pub mod orientation;
pub mod tables;
pub mod validation;

pub use connectivity::{
    ConnectType, Connectivity, ConnectivityArrays, FaceNeighbor, NO_ENTITY, TopIdx,
};
pub use orientation::*;

use forest_topology::algs::completion::{complete_connectivity, connect_faces};
use forest_topology::mesh_generation::{brick, periodic, twocubes, unitcube};
use forest_topology::topology::connectivity::{Connectivity, NO_ENTITY, TopIdx};
use forest_topology::topology::tables::{CHILDREN, EDGES};

fn edge_section(conn: &Connectivity) -> (Vec<TopIdx>, Vec<TopIdx>, Vec<TopIdx>, Vec<i8>) {
    (
        conn.tree_to_edge().to_vec(),
        conn.ett_offset().to_vec(),
        conn.edge_to_tree().to_vec(),
        conn.edge_to_edge().to_vec(),
    )
}

fn corner_section(conn: &Connectivity) -> (Vec<TopIdx>, Vec<TopIdx>, Vec<TopIdx>, Vec<i8>) {
    (
        conn.tree_to_corner().to_vec(),
        conn.ctt_offset().to_vec(),
        conn.corner_to_tree().to_vec(),
        conn.corner_to_corner().to_vec(),
    )
}

#[test]
fn completion_twice_gives_identical_sections() {
    let mut conn = brick(3, 2, 2, false, true, false).unwrap();
    complete_connectivity(&mut conn).unwrap();
    let (edges, corners) = (edge_section(&conn), corner_section(&conn));
    complete_connectivity(&mut conn).unwrap();
    assert_eq!(edge_section(&conn), edges);
    assert_eq!(corner_section(&conn), corners);
}

#[test]
fn completion_reproduces_unperiodic_bricks() {
    for (m, n, p) in [(1, 1, 1), (2, 1, 1), (2, 2, 1), (3, 2, 2)] {
        let reference = brick(m, n, p, false, false, false).unwrap();
        let mut conn = reference.clone();
        complete_connectivity(&mut conn).unwrap();
        assert!(conn.is_equal(&reference), "{m} x {n} x {p}");
    }
}

#[test]
fn isolated_tree_shares_nothing() {
    let mut conn = unitcube();
    complete_connectivity(&mut conn).unwrap();
    assert_eq!((conn.num_edges(), conn.num_corners()), (0, 0));
    assert_eq!(conn.tree_to_edge(), &[NO_ENTITY; EDGES]);
    assert_eq!(conn.tree_to_corner(), &[NO_ENTITY; CHILDREN]);
    assert_eq!(conn.ett_offset(), &[0]);
    assert_eq!(conn.ctt_offset(), &[0]);
}

#[test]
fn periodicity_not_in_vertices_is_lost() {
    let mut conn = periodic();
    assert_eq!(conn.num_edges(), 3);
    complete_connectivity(&mut conn).unwrap();
    assert_eq!(conn.num_edges(), 0);
    assert_eq!(conn.num_corners(), 0);
    // the face gluing survives; only edges and corners are rebuilt
    assert_eq!(conn.tree_to_face(), &[1, 0, 3, 2, 5, 4]);
    assert!(conn.is_valid());
}

#[test]
fn faces_then_completion_rebuilds_twocubes() {
    let reference = twocubes();
    let mut conn = Connectivity::new(12, 2, 0, 0, 0, 0);
    conn.vertices_mut().copy_from_slice(reference.vertices());
    conn.tree_to_vertex_mut().copy_from_slice(reference.tree_to_vertex());
    connect_faces(&mut conn).unwrap();
    complete_connectivity(&mut conn).unwrap();
    assert!(conn.is_equal(&reference));
}

#[test]
fn completion_keeps_attributes() {
    let mut conn = brick(2, 1, 1, false, false, false).unwrap();
    conn.set_attr(true).unwrap();
    conn.tree_to_attr_mut().unwrap()[1] = 9;
    complete_connectivity(&mut conn).unwrap();
    assert_eq!(conn.tree_to_attr(), Some(&[0i8, 9][..]));
}

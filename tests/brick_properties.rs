use proptest::prelude::*;

use forest_topology::algs::completion::complete_connectivity;
use forest_topology::algs::corner_transform::find_corner_transform;
use forest_topology::algs::edge_transform::find_edge_transform;
use forest_topology::io::{load, save};
use forest_topology::mesh_generation::brick;
use forest_topology::topology::connectivity::{Connectivity, TopIdx};
use forest_topology::topology::tables::{CHILDREN, EDGES, FACES};

fn arb_brick() -> impl Strategy<Value = Connectivity> {
    (1usize..4, 1usize..4, 1usize..4, any::<bool>(), any::<bool>(), any::<bool>())
        .prop_map(|(m, n, p, a, b, c)| brick(m, n, p, a, b, c).unwrap())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn bricks_are_valid(conn in arb_brick()) {
        prop_assert!(conn.is_valid());
    }

    #[test]
    fn bricks_round_trip_through_the_persisted_format(conn in arb_brick()) {
        let mut buf = Vec::new();
        save(&conn, &mut buf).unwrap();
        let (back, _) = load(&mut buf.as_slice()).unwrap();
        prop_assert!(back.is_equal(&conn));
    }

    #[test]
    fn face_connections_are_reciprocal(conn in arb_brick()) {
        for t in 0..conn.num_trees() as TopIdx {
            for f in 0..FACES {
                let nb = conn.face_neighbor(t, f);
                let back = conn.face_neighbor(nb.tree, nb.face);
                prop_assert_eq!((back.tree, back.face, back.orientation), (t, f, nb.orientation));
            }
        }
    }

    #[test]
    fn every_shared_edge_lists_its_tree_once(conn in arb_brick()) {
        for t in 0..conn.num_trees() as TopIdx {
            for e in 0..EDGES {
                if let Some(g) = conn.tree_edge(t, e) {
                    let hits = conn
                        .edge_members(g)
                        .filter(|&(tree, code)| tree == t && code as usize % EDGES == e)
                        .count();
                    prop_assert_eq!(hits, 1);
                }
            }
        }
    }

    #[test]
    fn completion_is_idempotent(conn in arb_brick()) {
        let mut once = conn.clone();
        complete_connectivity(&mut once).unwrap();
        prop_assert!(once.is_valid());
        let mut twice = once.clone();
        complete_connectivity(&mut twice).unwrap();
        prop_assert!(twice.is_equal(&once));
    }

    #[test]
    fn resolved_neighbors_resolve_back(conn in arb_brick()) {
        for t in 0..conn.num_trees() as TopIdx {
            for e in 0..EDGES {
                for tr in find_edge_transform(&conn, t, e).transforms {
                    let back = find_edge_transform(&conn, tr.ntree, tr.nedge);
                    prop_assert!(back
                        .transforms
                        .iter()
                        .any(|b| b.ntree == t && b.nedge == e && b.nflip == tr.nflip));
                }
            }
            for c in 0..CHILDREN {
                for tr in find_corner_transform(&conn, t, c).transforms {
                    let back = find_corner_transform(&conn, tr.ntree, tr.ncorner);
                    prop_assert!(back
                        .transforms
                        .iter()
                        .any(|b| b.ntree == t && b.ncorner == c));
                }
            }
        }
    }
}

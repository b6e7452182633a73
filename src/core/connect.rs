//! Turn connection building
//!
//! Given the finally-numbered segment list, joins segments that meet at a
//! shared OSM node into probability-weighted turn connections. Adjacency is
//! keyed on node identity carried through decomposition, never recomputed
//! from coordinates: independently decomposed segments that share a node
//! must join even if a coordinate comparison would be fragile.

use std::collections::HashMap;

use crate::core::decompose::SegmentDraft;
use crate::core::network::Connection;

/// Build each segment's outgoing connection list, indexed like `drafts`.
///
/// For every node with a non-empty outgoing set, every incoming segment
/// connects to every outgoing segment with probability 1/|outgoing|, except
/// self-connections and immediate geometric U-turns. The probability is NOT
/// renormalized when U-turn suppression removes an entry: a node with two
/// outgoing segments where one is suppressed leaves the survivor at 0.5.
/// Known asymmetry, kept deliberately; downstream consumers rely on it.
pub fn build_connections(drafts: &[SegmentDraft]) -> Vec<Vec<Connection>> {
    let mut incoming_at: HashMap<i64, Vec<usize>> = HashMap::new();
    let mut outgoing_at: HashMap<i64, Vec<usize>> = HashMap::new();

    for (id, draft) in drafts.iter().enumerate() {
        incoming_at.entry(draft.end_node).or_default().push(id);
        outgoing_at.entry(draft.start_node).or_default().push(id);
    }

    let mut connections: Vec<Vec<Connection>> = vec![Vec::new(); drafts.len()];

    for (node, incoming) in &incoming_at {
        let outgoing = match outgoing_at.get(node) {
            Some(ids) => ids,
            // No outgoing segments: the incoming ones dead-end here
            None => continue,
        };

        let probability = round6(1.0 / outgoing.len() as f64);

        for &in_id in incoming {
            for &out_id in outgoing {
                if in_id == out_id {
                    continue;
                }
                if is_uturn(&drafts[in_id], &drafts[out_id]) {
                    continue;
                }
                connections[in_id].push(Connection {
                    road_id: out_id,
                    lane: 0,
                    probability,
                });
            }
        }
    }

    // Each segment has exactly one end node, so its connections were filled
    // in one batch; sort by target for a deterministic document.
    for list in &mut connections {
        list.sort_by_key(|c| c.road_id);
    }

    connections
}

/// An immediate reversal: the outgoing segment retraces the incoming one
/// between the same two endpoints, in swapped order.
fn is_uturn(incoming: &SegmentDraft, outgoing: &SegmentDraft) -> bool {
    incoming.start == outgoing.end && incoming.end == outgoing.start
}

fn round6(value: f64) -> f64 {
    (value * 1_000_000.0).round() / 1_000_000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geo::GeoPoint;

    fn draft(
        start_node: i64,
        end_node: i64,
        start: (f64, f64),
        end: (f64, f64),
    ) -> SegmentDraft {
        SegmentDraft {
            osm_way_id: 7,
            name: String::new(),
            start: GeoPoint::new(start.0, start.1),
            end: GeoPoint::new(end.0, end.1),
            start_node,
            end_node,
            length: 111.2,
            max_speed: 8.3,
            lanes: 1,
        }
    }

    /// A(0,0) - B(0,0.001) - C(0,0.002), bidirectional:
    /// 0: A->B, 1: B->A, 2: B->C, 3: C->B
    fn three_node_chain() -> Vec<SegmentDraft> {
        let a = (0.0, 0.0);
        let b = (0.0, 0.001);
        let c = (0.0, 0.002);
        vec![
            draft(1, 2, a, b),
            draft(2, 1, b, a),
            draft(2, 3, b, c),
            draft(3, 2, c, b),
        ]
    }

    #[test]
    fn test_through_connections_with_uturn_suppression() {
        let drafts = three_node_chain();
        let connections = build_connections(&drafts);

        // A->B may only continue to B->C; B->A is its own reversal
        assert_eq!(connections[0].len(), 1);
        assert_eq!(connections[0][0].road_id, 2);
        assert_eq!(connections[0][0].lane, 0);
        assert_eq!(connections[0][0].probability, 0.5);

        // C->B may only continue to B->A
        assert_eq!(connections[3].len(), 1);
        assert_eq!(connections[3][0].road_id, 1);
        assert_eq!(connections[3][0].probability, 0.5);

        // B->A and B->C end at degree-one nodes where the only outgoing
        // segment is their own reversal
        assert!(connections[1].is_empty());
        assert!(connections[2].is_empty());
    }

    #[test]
    fn test_probability_not_renormalized_after_suppression() {
        let drafts = three_node_chain();
        let connections = build_connections(&drafts);

        // Node B has two outgoing segments; A->B keeps 0.5 even though its
        // U-turn candidate was suppressed, so its mass does not sum to 1.
        let total: f64 = connections[0].iter().map(|c| c.probability).sum();
        assert_eq!(total, 0.5);
    }

    #[test]
    fn test_no_connection_to_self() {
        // Degenerate loop segment: starts and ends at the same node
        let drafts = vec![draft(1, 1, (0.0, 0.0), (0.0, 0.001))];
        let connections = build_connections(&drafts);
        assert!(connections[0].is_empty());
    }

    #[test]
    fn test_probability_uniform_across_incoming() {
        // Three one-way spokes out of node 2, two one-way spokes in
        let drafts = vec![
            draft(1, 2, (0.0, 0.0), (0.0, 0.001)),
            draft(5, 2, (0.0, 0.002), (0.0, 0.001)),
            draft(2, 3, (0.0, 0.001), (0.001, 0.001)),
            draft(2, 4, (0.0, 0.001), (-0.001, 0.001)),
            draft(2, 6, (0.0, 0.001), (0.0, 0.0015)),
        ];
        let connections = build_connections(&drafts);

        for in_id in [0usize, 1] {
            assert_eq!(connections[in_id].len(), 3);
            for conn in &connections[in_id] {
                assert_eq!(conn.probability, 0.333333);
            }
        }
    }

    #[test]
    fn test_connections_sorted_by_target() {
        let drafts = vec![
            draft(1, 2, (0.0, 0.0), (0.0, 0.001)),
            draft(2, 3, (0.0, 0.001), (0.001, 0.001)),
            draft(2, 4, (0.0, 0.001), (-0.001, 0.001)),
        ];
        let connections = build_connections(&drafts);

        let targets: Vec<usize> = connections[0].iter().map(|c| c.road_id).collect();
        assert_eq!(targets, vec![1, 2]);
    }

    #[test]
    fn test_dead_end_node_yields_no_connections() {
        // Single one-way segment; nothing leaves node 2
        let drafts = vec![draft(1, 2, (0.0, 0.0), (0.0, 0.001))];
        let connections = build_connections(&drafts);
        assert!(connections[0].is_empty());
    }

    #[test]
    fn test_adjacency_is_node_keyed_not_coordinate_keyed() {
        // Segments meet at node 2 even though a third segment ends at the
        // same coordinates under a different node id
        let b = (0.0, 0.001);
        let drafts = vec![
            draft(1, 2, (0.0, 0.0), b),
            draft(2, 3, b, (0.0, 0.002)),
            draft(4, 9, (0.001, 0.001), b), // same end coords, node 9
        ];
        let connections = build_connections(&drafts);

        assert_eq!(connections[0].len(), 1);
        assert_eq!(connections[0][0].road_id, 1);
        // Node 9 has no outgoing set; coordinate equality must not join it
        assert!(connections[2].is_empty());
    }
}

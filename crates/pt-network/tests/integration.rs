//! Integration tests for pt-network.

use std::collections::{HashMap, VecDeque};

use proptest::prelude::*;
use pt_core::{CellState, GridCoord, Raster};
use pt_network::{DrillCell, apply_drill, segment};

/// Independent 8-connected flood fill; returns a component index per cell.
fn flood_fill(layer: &Raster<CellState>) -> Raster<Option<usize>> {
    let mut out = Raster::new(layer.rows(), layer.cols(), None);
    let mut next = 0;
    for (start, state) in layer.iter_coords() {
        if !state.is_conductor() || out[start].is_some() {
            continue;
        }
        let mut queue = VecDeque::from([start]);
        out[start] = Some(next);
        while let Some(c) = queue.pop_front() {
            for n in layer.neighbors8(c) {
                if layer[n].is_conductor() && out[n].is_none() {
                    out[n] = Some(next);
                    queue.push_back(n);
                }
            }
        }
        next += 1;
    }
    out
}

fn layer_strategy() -> impl Strategy<Value = Raster<CellState>> {
    (1usize..12, 1usize..12).prop_flat_map(|(rows, cols)| {
        prop::collection::vec(
            prop_oneof![
                3 => Just(CellState::Conductor),
                2 => Just(CellState::Insulator),
                1 => Just(CellState::Air),
            ],
            rows * cols,
        )
        .prop_map(move |cells| Raster::from_vec(rows, cols, cells).unwrap())
    })
}

proptest! {
    #[test]
    fn labels_match_flood_fill_partition(layer in layer_strategy()) {
        let map = segment(&layer);
        let reference = flood_fill(&layer);

        // Bijection between union-find labels and flood-fill components.
        let mut forward = HashMap::new();
        let mut backward = HashMap::new();
        for (coord, expected) in reference.iter_coords() {
            let label = map.network_at(coord);
            prop_assert_eq!(label.is_some(), expected.is_some());
            if let (Some(label), Some(expected)) = (label, *expected) {
                prop_assert_eq!(*forward.entry(label).or_insert(expected), expected);
                prop_assert_eq!(*backward.entry(expected).or_insert(label), label);
            }
        }
        prop_assert_eq!(forward.len(), map.network_count());

        let counted: usize = map.networks().iter().map(|n| n.cell_count).sum();
        prop_assert_eq!(counted, layer.iter().filter(|s| s.is_conductor()).count());
    }
}

#[test]
fn plated_via_joins_two_pads() {
    // Two pads separated by a one-cell insulator gap; a plated barrel bridges it.
    let mut layer = Raster::new(1, 5, CellState::Conductor);
    layer[GridCoord::new(0, 2)] = CellState::Insulator;
    assert_eq!(segment(&layer).network_count(), 2);

    let mut pattern = Raster::new(1, 5, DrillCell::None);
    pattern[GridCoord::new(0, 2)] = DrillCell::Plated;
    apply_drill(&mut layer, &pattern).unwrap();
    assert_eq!(segment(&layer).network_count(), 1);
}

#[test]
fn void_splits_a_trace() {
    let mut layer = Raster::new(3, 5, CellState::Insulator);
    for col in 0..5 {
        layer[GridCoord::new(1, col)] = CellState::Conductor;
    }
    let mut pattern = Raster::new(3, 5, DrillCell::None);
    for row in 0..3 {
        pattern[GridCoord::new(row, 2)] = DrillCell::Void;
    }
    apply_drill(&mut layer, &pattern).unwrap();

    let map = segment(&layer);
    assert_eq!(map.network_count(), 2);
    assert_ne!(
        map.network_at(GridCoord::new(1, 0)),
        map.network_at(GridCoord::new(1, 4))
    );
}

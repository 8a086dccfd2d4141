//! Integration tests for pt-current.

use proptest::prelude::*;
use pt_core::units::{amps, oz_copper, to_mil};
use pt_core::{CellState, GridCoord, Material, Raster, Tolerances, nearly_equal};
use pt_current::{ElectricLoad, MapperConfig, accumulate_losses, find_route, map_resistance};
use pt_network::segment;

const RHO_COPPER: f64 = 6.61e-4;

const TIGHT: Tolerances = Tolerances { abs: 0.0, rel: 1e-9 };

/// 1000 x 1000 mil board at 1 mil per cell with one 50 mil wide trace,
/// 501 cells long, on rows 100..150.
fn straight_trace_board() -> Raster<CellState> {
    Raster::from_fn(1000, 1000, |c| {
        if (100..150).contains(&c.row) && c.col <= 500 {
            CellState::Conductor
        } else {
            CellState::Insulator
        }
    })
}

#[test]
fn straight_trace_end_to_end() {
    let layer = straight_trace_board();
    let networks = segment(&layer);
    assert_eq!(networks.network_count(), 1);

    let depth = to_mil(oz_copper(1.0));
    let start = GridCoord::new(124, 0);
    let end = GridCoord::new(124, 500);
    let map = map_resistance(
        &networks,
        start,
        end,
        depth,
        Material::Copper,
        &MapperConfig::default(),
    )
    .unwrap();

    let per_cell = RHO_COPPER / (50.0 * 50.0 * depth);
    assert!((per_cell - 1.93e-7).abs() < 1e-9);
    for (c, state) in layer.iter_coords() {
        let r = map.resistance[c];
        if state.is_conductor() {
            assert!(nearly_equal(r, per_cell, TIGHT), "{c}: {r}");
        } else {
            assert_eq!(r, 0.0);
        }
    }

    let load = ElectricLoad::new("main", amps(1.0), start, end);
    let losses =
        accumulate_losses(&networks, &[load], depth, Material::Copper, &MapperConfig::default())
            .unwrap();
    let trace_cells = 50.0 * 501.0;
    let expected_w = per_cell * trace_cells;
    assert!(nearly_equal(losses.total_watts(), expected_w, TIGHT));
    // Same as the bulk resistance rho * L / (W * D) of the trace.
    let bulk = RHO_COPPER * 501.0 / (50.0 * depth);
    assert!(nearly_equal(losses.total_watts(), bulk, TIGHT));
}

#[test]
fn l_shaped_trace_stays_on_its_network() {
    // Horizontal leg rows 10..20, vertical leg cols 60..70, plus a separate
    // parallel trace that must stay untouched.
    let layer = Raster::from_fn(120, 120, |c| {
        let horizontal = (10..20).contains(&c.row) && c.col < 70;
        let vertical = (60..70).contains(&c.col) && (10..100).contains(&c.row);
        let other = (40..45).contains(&c.row) && c.col < 40;
        if horizontal || vertical || other {
            CellState::Conductor
        } else {
            CellState::Insulator
        }
    });
    let networks = segment(&layer);
    assert_eq!(networks.network_count(), 2);

    let map = map_resistance(
        &networks,
        GridCoord::new(14, 0),
        GridCoord::new(99, 64),
        1.0,
        Material::Copper,
        &MapperConfig::default(),
    )
    .unwrap();

    let label = networks.network_at(GridCoord::new(14, 0));
    for (c, r) in map.resistance.iter_coords() {
        if networks.network_at(c) == label {
            assert!(*r > 0.0, "{c} on the current network has no resistance");
        } else {
            assert_eq!(*r, 0.0);
        }
    }
    let first = map.path.first().copied().unwrap();
    let last = map.path.last().copied().unwrap();
    assert!(first.chebyshev(GridCoord::new(14, 0)) <= 5);
    assert!(last.chebyshev(GridCoord::new(99, 64)) <= 5);
}

#[test]
fn edge_terminals_on_a_corner_trace() {
    // 50 mil wide trace on rows 0..50 from col 0 to col 500, with both
    // terminals on its top edge.
    let layer = Raster::from_fn(1000, 1000, |c| {
        if c.row < 50 && c.col <= 500 {
            CellState::Conductor
        } else {
            CellState::Insulator
        }
    });
    let networks = segment(&layer);
    let depth = to_mil(oz_copper(1.0));
    let start = GridCoord::new(0, 0);
    let end = GridCoord::new(0, 500);
    let cfg = MapperConfig::default();
    let map = map_resistance(&networks, start, end, depth, Material::Copper, &cfg).unwrap();

    assert!(map.used_centerline);
    assert!(map.path.iter().all(|c| c.row == map.path[0].row));

    let per_cell = RHO_COPPER / (50.0 * 50.0 * depth);
    assert!(nearly_equal(per_cell, 1.93e-7, Tolerances { abs: 1e-9, rel: 0.0 }));
    for (c, state) in layer.iter_coords() {
        let r = map.resistance[c];
        if state.is_conductor() {
            assert!(nearly_equal(r, per_cell, TIGHT), "{c}: {r}");
        } else {
            assert_eq!(r, 0.0);
        }
    }

    let load = ElectricLoad::new("edge", amps(1.0), start, end);
    let losses = accumulate_losses(&networks, &[load], depth, Material::Copper, &cfg).unwrap();
    let bulk = RHO_COPPER * 501.0 / (50.0 * depth);
    assert!(nearly_equal(losses.total_watts(), bulk, TIGHT));
}

#[test]
fn removing_loads_zeroes_the_layer() {
    let layer = straight_trace_board();
    let networks = segment(&layer);
    let losses = accumulate_losses(&networks, &[], 1.37, Material::Copper, &MapperConfig::default())
        .unwrap();
    assert!(losses.raster().iter().all(|w| *w == 0.0));
}

proptest! {
    #[test]
    fn open_trace_route_is_chebyshev(
        r0 in 0usize..12, c0 in 0usize..30,
        r1 in 0usize..12, c1 in 0usize..30,
    ) {
        let mask = Raster::new(12, 30, true);
        let (a, b) = (GridCoord::new(r0, c0), GridCoord::new(r1, c1));
        let path = find_route(&mask, a, b).unwrap();
        prop_assert_eq!(path.len() - 1, a.chebyshev(b));
        prop_assert_eq!(path[0], a);
        prop_assert_eq!(path[path.len() - 1], b);
    }
}

//! Conductor segmentation into electrical networks.
//!
//! Two conductor cells belong to the same network iff a chain of
//! 8-connected conductor cells joins them. Labels are assigned in raster
//! order of each network's first cell, drawn from [`NetworkIdSequence`].

use pt_core::{CellState, GridCoord, NetworkId, NetworkIdSequence, Raster, Step};
use tracing::debug;

use crate::error::{NetworkError, NetworkResult};
use crate::union_find::UnionFind;

/// Neighbours already visited by a row-major sweep: W, NW, N, NE.
const VISITED_NEIGHBORS: [Step; 4] = [
    Step::new(0, -1),
    Step::new(-1, -1),
    Step::new(-1, 0),
    Step::new(-1, 1),
];

/// Summary of one electrical network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Network {
    pub id: NetworkId,
    /// First cell of the network in raster order.
    pub anchor: GridCoord,
    pub cell_count: usize,
}

/// Network labels for one layer.
///
/// Every conductor cell carries `Some(id)`; insulator and air cells carry
/// `None`. Immutable once built.
#[derive(Debug, Clone)]
pub struct NetworkMap {
    labels: Raster<Option<NetworkId>>,
    networks: Vec<Network>,
}

impl NetworkMap {
    /// The label raster.
    pub fn labels(&self) -> &Raster<Option<NetworkId>> {
        &self.labels
    }

    /// All networks in order of discovery.
    pub fn networks(&self) -> &[Network] {
        &self.networks
    }

    pub fn network_count(&self) -> usize {
        self.networks.len()
    }

    pub fn shape(&self) -> (usize, usize) {
        self.labels.shape()
    }

    /// Network holding `coord`, `None` for non-conductors or off-raster cells.
    pub fn network_at(&self, coord: GridCoord) -> Option<NetworkId> {
        self.labels.get(coord).copied().flatten()
    }

    /// Look up a network summary by ID.
    pub fn network(&self, id: NetworkId) -> Option<&Network> {
        self.networks.iter().find(|n| n.id == id)
    }

    /// Boolean mask of the cells belonging to `id`.
    pub fn mask(&self, id: NetworkId) -> NetworkResult<Raster<bool>> {
        if self.network(id).is_none() {
            return Err(NetworkError::UnknownNetwork { id });
        }
        Ok(self.labels.map(|l| *l == Some(id)))
    }

    /// Raw labels with 0 for unlabeled cells, for export.
    pub fn to_raw(&self) -> Raster<u32> {
        self.labels.map(|l| l.map(NetworkId::get).unwrap_or(0))
    }
}

/// Label the connected conductor regions of a layer.
///
/// Runs a single raster-order sweep that unions each conductor cell with its
/// already-visited conductor neighbours, then labels each resulting set.
/// A layer without conductor cells yields an empty map.
pub fn segment(layer: &Raster<CellState>) -> NetworkMap {
    let mut sets = UnionFind::new(layer.len());

    for (coord, state) in layer.iter_coords() {
        if !state.is_conductor() {
            continue;
        }
        let here = layer.index_of(coord);
        for step in VISITED_NEIGHBORS {
            let Some(neighbor) = coord.offset(step) else {
                continue;
            };
            if layer.get(neighbor).is_some_and(|s| s.is_conductor()) {
                sets.union(here, layer.index_of(neighbor));
            }
        }
    }

    let mut ids = NetworkIdSequence::new();
    let mut root_slot: Vec<Option<usize>> = vec![None; layer.len()];
    let mut networks: Vec<Network> = Vec::new();
    let mut labels = Raster::new(layer.rows(), layer.cols(), None);

    for (coord, state) in layer.iter_coords() {
        if !state.is_conductor() {
            continue;
        }
        let root = sets.find(layer.index_of(coord));
        let slot = match root_slot[root] {
            Some(slot) => slot,
            None => {
                let id = ids
                    .next()
                    .unwrap_or_else(|| unreachable!("network label space exhausted"));
                networks.push(Network {
                    id,
                    anchor: coord,
                    cell_count: 0,
                });
                root_slot[root] = Some(networks.len() - 1);
                networks.len() - 1
            }
        };
        networks[slot].cell_count += 1;
        labels[coord] = Some(networks[slot].id);
    }

    debug!(
        rows = layer.rows(),
        cols = layer.cols(),
        networks = networks.len(),
        "segmented layer"
    );

    NetworkMap { labels, networks }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layer_from(rows: &[&str]) -> Raster<CellState> {
        let cols = rows[0].len();
        Raster::from_fn(rows.len(), cols, |c| {
            match rows[c.row].as_bytes()[c.col] {
                b'#' => CellState::Conductor,
                b'o' => CellState::Air,
                _ => CellState::Insulator,
            }
        })
    }

    #[test]
    fn diagonal_contact_joins_networks() {
        let layer = layer_from(&["#..", ".#.", "..#"]);
        let map = segment(&layer);
        assert_eq!(map.network_count(), 1);
        assert_eq!(map.networks()[0].cell_count, 3);
    }

    #[test]
    fn u_shape_merges_late() {
        // Two arms only meet on the last row, after both were labeled.
        let layer = layer_from(&["#...#", "#...#", "#####"]);
        let map = segment(&layer);
        assert_eq!(map.network_count(), 1);
        let id = map.network_at(GridCoord::new(0, 0));
        assert_eq!(map.network_at(GridCoord::new(0, 4)), id);
        assert_eq!(map.network_at(GridCoord::new(2, 2)), id);
    }

    #[test]
    fn singletons_and_air() {
        let layer = layer_from(&["#.#", "...", "o.#"]);
        let map = segment(&layer);
        assert_eq!(map.network_count(), 3);
        assert!(map.network_at(GridCoord::new(2, 0)).is_none());
        assert!(map.networks().iter().all(|n| n.cell_count == 1));
    }

    #[test]
    fn empty_layer_has_no_networks() {
        let layer = Raster::new(4, 4, CellState::Insulator);
        let map = segment(&layer);
        assert_eq!(map.network_count(), 0);
        assert!(map.labels().iter().all(Option::is_none));
    }

    #[test]
    fn labels_follow_perturbed_sequence() {
        let layer = layer_from(&["#.#.#"]);
        let map = segment(&layer);
        let ids: Vec<u32> = map.networks().iter().map(|n| n.id.get()).collect();
        assert_eq!(ids, vec![1, 8, 13]);
    }

    #[test]
    fn mask_of_unknown_network_is_an_error() {
        let layer = layer_from(&["#"]);
        let map = segment(&layer);
        let bogus = NetworkId::new(999).unwrap();
        assert_eq!(
            map.mask(bogus).unwrap_err(),
            NetworkError::UnknownNetwork { id: bogus }
        );
        let id = map.network_at(GridCoord::new(0, 0)).unwrap();
        assert!(map.mask(id).unwrap()[GridCoord::new(0, 0)]);
    }
}

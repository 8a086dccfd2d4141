//! pt-network: electrical network segmentation for pcbtherm.
//!
//! Provides:
//! - Union-find labeling of 8-connected conductor regions
//! - [`NetworkMap`], the per-layer label raster with per-network summaries
//! - Via drilling applied to layer rasters before segmentation
//!
//! # Example
//!
//! ```
//! use pt_core::{CellState, GridCoord, Raster};
//! use pt_network::segment;
//!
//! let mut layer = Raster::new(3, 5, CellState::Insulator);
//! layer[GridCoord::new(1, 0)] = CellState::Conductor;
//! layer[GridCoord::new(1, 1)] = CellState::Conductor;
//! layer[GridCoord::new(1, 4)] = CellState::Conductor;
//!
//! let networks = segment(&layer);
//! assert_eq!(networks.network_count(), 2);
//! assert_eq!(
//!     networks.network_at(GridCoord::new(1, 0)),
//!     networks.network_at(GridCoord::new(1, 1)),
//! );
//! ```

pub mod drill;
pub mod error;
pub mod segment;
pub(crate) mod union_find;

// Re-exports for ergonomics
pub use drill::{DrillCell, apply_drill};
pub use error::{NetworkError, NetworkResult};
pub use segment::{Network, NetworkMap, segment};

//! pt-core: stable foundation for pcbtherm.
//!
//! Contains:
//! - grid (rasters, coordinates, 8-connected steps, cell states)
//! - ids (compact network identifiers)
//! - material (conductivity and resistivity tables)
//! - numeric (Real + tolerances + float helpers)
//! - units (uom SI types + mil-based conversions)
//! - error (shared error types)

pub mod error;
pub mod grid;
pub mod ids;
pub mod material;
pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{PtError, PtResult};
pub use grid::{CellState, GridCoord, Raster, Step};
pub use ids::*;
pub use material::{Conductivity, Material};
pub use numeric::*;

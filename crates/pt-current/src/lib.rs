//! pt-current: current-path resistance mapping for pcbtherm.
//!
//! Given two terminal cells of a load on a segmented layer, the mapper
//! - routes between them over the terminals' network (A*, 8-connected)
//! - moves the route onto the trace centerline where that is safe
//! - measures the local trace width at every step and assigns
//!   `rho / (width² · depth)` across the width
//! - fills pads and stubs from the nearest assigned cell, clears copper
//!   beyond the terminals, and smooths the result
//!
//! Losses from all loads on a layer are summed into a [`LossMap`].

pub mod centerline;
pub mod clip;
pub mod error;
pub mod fill;
pub mod load;
pub mod mapper;
pub mod route;
pub mod width;

pub use error::{CurrentError, CurrentResult};
pub use load::{ElectricLoad, LossMap, accumulate_losses};
pub use mapper::{MapperConfig, ResistanceMap, map_resistance};
pub use route::find_route;

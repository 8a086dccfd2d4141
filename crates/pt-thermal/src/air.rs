//! Still-air properties at film temperature.

use pt_core::interp_clamped;
use tracing::warn;

const FILM_TEMPS_C: [f64; 7] = [0.0, 20.0, 40.0, 60.0, 80.0, 100.0, 200.0];

/// g / nu^2, 1 / (K in^3)
const G_OVER_NU2: [f64; 7] = [8.28e5, 6.54e5, 5.2e5, 4.27e5, 3.47e5, 2.89e5, 1.28e5];

/// Thermal conductivity of air, W / (in K)
const K_AIR: [f64; 7] = [6.02e-4, 6.375e-4, 6.731e-4, 7.087e-4, 7.442e-4, 7.798e-4, 9.398e-4];

pub const PRANDTL: f64 = 0.71;

/// Surface emissivity assumed for solder mask.
pub const EMISSIVITY: f64 = 0.8;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AirProperties {
    pub g_over_nu2: f64,
    pub conductivity: f64,
}

/// Interpolate air properties at `film_c`, clamping outside 0..200 C.
pub fn air_properties(film_c: f64) -> AirProperties {
    let (g_over_nu2, clamped) = interp_clamped(&FILM_TEMPS_C, &G_OVER_NU2, film_c);
    let (conductivity, _) = interp_clamped(&FILM_TEMPS_C, &K_AIR, film_c);
    if clamped {
        warn!(film_c, "film temperature outside air property table, clamping");
    }
    AirProperties {
        g_over_nu2,
        conductivity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interpolates_between_rows() {
        let p = air_properties(30.0);
        assert!((p.g_over_nu2 - 5.87e5).abs() < 1e-6);
        assert!((p.conductivity - 6.553e-4).abs() < 1e-12);
    }

    #[test]
    fn clamps_outside_table() {
        assert_eq!(air_properties(-40.0), air_properties(0.0));
        assert_eq!(air_properties(500.0), air_properties(200.0));
    }
}

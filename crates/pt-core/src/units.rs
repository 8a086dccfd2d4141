// pt-core/src/units.rs
//
// The solver core works in mil, degrees Celsius, watts and ohms. Lengths,
// powers and currents that cross the file boundary go through uom first.

use uom::si::f64::{ElectricCurrent as UomElectricCurrent, Length as UomLength, Power as UomPower};

// Public canonical unit types (SI, f64)
pub type Current = UomElectricCurrent;
pub type Length = UomLength;
pub type Power = UomPower;

/// Thickness of one ounce of copper per square foot, in mil.
pub const MIL_PER_OZ_COPPER: f64 = 1.37;

#[inline]
pub fn mil(v: f64) -> Length {
    use uom::si::length::mil;
    Length::new::<mil>(v)
}

#[inline]
pub fn mm(v: f64) -> Length {
    use uom::si::length::millimeter;
    Length::new::<millimeter>(v)
}

#[inline]
pub fn inch(v: f64) -> Length {
    use uom::si::length::inch;
    Length::new::<inch>(v)
}

/// Copper weight expressed as a plating thickness.
#[inline]
pub fn oz_copper(v: f64) -> Length {
    mil(v * MIL_PER_OZ_COPPER)
}

#[inline]
pub fn to_mil(l: Length) -> f64 {
    use uom::si::length::mil;
    l.get::<mil>()
}

#[inline]
pub fn watts(v: f64) -> Power {
    use uom::si::power::watt;
    Power::new::<watt>(v)
}

#[inline]
pub fn to_watts(p: Power) -> f64 {
    use uom::si::power::watt;
    p.get::<watt>()
}

#[inline]
pub fn amps(v: f64) -> Current {
    use uom::si::electric_current::ampere;
    Current::new::<ampere>(v)
}

#[inline]
pub fn to_amps(i: Current) -> f64 {
    use uom::si::electric_current::ampere;
    i.get::<ampere>()
}

pub mod constants {
    /// Offset between Celsius and Kelvin used by the radiation terms.
    pub const C_TO_K: f64 = 273.16;

    /// Stefan-Boltzmann constant converted to W / (in^2 K^4).
    pub const SIGMA_W_PER_IN2_K4: f64 = 5.67e-8 / 1550.0;

    /// mil^2 per in^2, for converting film coefficients to per-cell units.
    pub const MIL2_PER_IN2: f64 = 1.0e6;

    pub const MIL_PER_IN: f64 = 1000.0;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_conversions() {
        assert!((to_mil(inch(1.0)) - 1000.0).abs() < 1e-9);
        assert!((to_mil(mm(25.4)) - 1000.0).abs() < 1e-9);
        assert!((to_mil(oz_copper(2.0)) - 2.74).abs() < 1e-12);
    }

    #[test]
    fn constructors_smoke() {
        assert!((to_watts(watts(1.5)) - 1.5).abs() < 1e-12);
        assert!((to_amps(amps(2.0)) - 2.0).abs() < 1e-12);
    }
}

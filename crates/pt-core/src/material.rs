//! Board materials and their bulk properties.

use crate::units::constants::MIL_PER_IN;

/// Direction-dependent thermal conductivity, W / (in K).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Conductivity {
    /// Across the layer stack (k direction).
    pub through_plane: f64,
    /// Within a layer (row and column directions).
    pub in_plane: f64,
}

impl Conductivity {
    pub const fn isotropic(k: f64) -> Self {
        Self {
            through_plane: k,
            in_plane: k,
        }
    }

    /// Same conductivity expressed in W / (mil K).
    pub fn per_mil(self) -> Self {
        Self {
            through_plane: self.through_plane / MIL_PER_IN,
            in_plane: self.in_plane / MIL_PER_IN,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Material {
    Copper,
    Aluminum,
    Gold,
    Silver,
    Nickel,
    Solder,
    Epoxy,
    #[cfg_attr(feature = "serde", serde(rename = "FR-4", alias = "Fr4"))]
    Fr4,
    Polyimide,
    ThermalCompound,
}

impl Material {
    pub const ALL: [Material; 10] = [
        Material::Copper,
        Material::Aluminum,
        Material::Gold,
        Material::Silver,
        Material::Nickel,
        Material::Solder,
        Material::Epoxy,
        Material::Fr4,
        Material::Polyimide,
        Material::ThermalCompound,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Material::Copper => "Copper",
            Material::Aluminum => "Aluminum",
            Material::Gold => "Gold",
            Material::Silver => "Silver",
            Material::Nickel => "Nickel",
            Material::Solder => "Solder",
            Material::Epoxy => "Epoxy",
            Material::Fr4 => "FR-4",
            Material::Polyimide => "Polyimide",
            Material::ThermalCompound => "ThermalCompound",
        }
    }

    /// Bulk thermal conductivity in W / (in K).
    pub fn conductivity(self) -> Conductivity {
        match self {
            Material::Copper => Conductivity::isotropic(9.9),
            Material::Aluminum => Conductivity::isotropic(5.5),
            Material::Gold => Conductivity::isotropic(7.5),
            Material::Silver => Conductivity::isotropic(10.6),
            Material::Nickel => Conductivity::isotropic(2.3),
            Material::Solder => Conductivity::isotropic(1.46),
            Material::Epoxy => Conductivity::isotropic(0.09),
            Material::Fr4 => Conductivity {
                through_plane: 0.00737,
                in_plane: 0.020574,
            },
            Material::Polyimide => Conductivity::isotropic(0.005),
            Material::ThermalCompound => Conductivity::isotropic(0.02),
        }
    }

    /// Electrical resistivity in ohm mil; `None` for non-metals.
    pub fn resistivity(self) -> Option<f64> {
        match self {
            Material::Copper => Some(6.61e-4),
            Material::Aluminum => Some(8.98e-4),
            Material::Gold => Some(9.61e-4),
            Material::Silver => Some(6.26e-4),
            Material::Nickel => Some(2.75e-3),
            _ => None,
        }
    }
}

impl core::fmt::Display for Material {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metals_have_resistivity() {
        assert_eq!(Material::Copper.resistivity(), Some(6.61e-4));
        assert!(Material::Fr4.resistivity().is_none());
        assert!(Material::Solder.resistivity().is_none());
    }

    #[test]
    fn fr4_is_anisotropic() {
        let k = Material::Fr4.conductivity();
        assert!(k.in_plane > k.through_plane);
        let per_mil = k.per_mil();
        assert!((per_mil.in_plane - 0.020574e-3).abs() < 1e-15);
    }

    #[test]
    fn names_are_unique() {
        let mut names: Vec<_> = Material::ALL.iter().map(|m| m.name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), Material::ALL.len());
    }
}

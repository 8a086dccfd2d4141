//! Surface heat-transfer coefficients for exposed cell faces.

use pt_core::units::constants::{C_TO_K, MIL2_PER_IN2, SIGMA_W_PER_IN2_K4};

use crate::air::EMISSIVITY;
use crate::ambient::FaceCoefficients;
use crate::settings::{BoardOrientation, Corrections};

/// Direction from a cell toward a neighbour that lies outside the volume.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BoundaryDir {
    /// Toward layer `k - 1`
    LayerAbove,
    /// Toward layer `k + 1`
    LayerBelow,
    RowMinus,
    RowPlus,
    ColMinus,
    ColPlus,
}

impl BoundaryDir {
    pub const ALL: [BoundaryDir; 6] = [
        BoundaryDir::LayerAbove,
        BoundaryDir::LayerBelow,
        BoundaryDir::RowMinus,
        BoundaryDir::RowPlus,
        BoundaryDir::ColMinus,
        BoundaryDir::ColPlus,
    ];

    /// `(dk, dr, dc)` offset of the neighbour.
    pub fn offset(self) -> (isize, isize, isize) {
        match self {
            BoundaryDir::LayerAbove => (-1, 0, 0),
            BoundaryDir::LayerBelow => (1, 0, 0),
            BoundaryDir::RowMinus => (0, -1, 0),
            BoundaryDir::RowPlus => (0, 1, 0),
            BoundaryDir::ColMinus => (0, 0, -1),
            BoundaryDir::ColPlus => (0, 0, 1),
        }
    }

    pub fn is_through_plane(self) -> bool {
        matches!(self, BoundaryDir::LayerAbove | BoundaryDir::LayerBelow)
    }
}

/// Free-convection regime of an exposed face.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Face {
    Top,
    Bottom,
    Vertical,
}

/// Which convection regime a boundary direction sees in `orientation`.
pub fn face_for(orientation: BoardOrientation, dir: BoundaryDir) -> Face {
    use BoundaryDir as D;
    let (top, bottom) = match orientation {
        BoardOrientation::Horizontal => (D::LayerAbove, D::LayerBelow),
        BoardOrientation::ColsUp => (D::ColPlus, D::ColMinus),
        BoardOrientation::ColsDown => (D::ColMinus, D::ColPlus),
        BoardOrientation::RowsUp => (D::RowMinus, D::RowPlus),
        BoardOrientation::RowsDown => (D::RowPlus, D::RowMinus),
    };
    if dir == top {
        Face::Top
    } else if dir == bottom {
        Face::Bottom
    } else {
        Face::Vertical
    }
}

impl FaceCoefficients {
    pub fn for_face(&self, face: Face) -> f64 {
        match face {
            Face::Top => self.top,
            Face::Bottom => self.bottom,
            Face::Vertical => self.side,
        }
    }
}

/// Linearized convection plus radiation coefficient of a face at
/// `surface_c`, in W / (mil² K).
pub fn surface_htc(
    face: Face,
    coefficients: &FaceCoefficients,
    surface_c: f64,
    ambient_c: f64,
    corrections: &Corrections,
) -> f64 {
    let tsk = surface_c + C_TO_K;
    let tak = ambient_c + C_TO_K;
    let h_rad = EMISSIVITY * SIGMA_W_PER_IN2_K4 * (tsk * tsk + tak * tak) * (tsk + tak)
        / corrections.radiation_divisor(surface_c - ambient_c);
    (coefficients.for_face(face) + h_rad) / MIL2_PER_IN2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn horizontal_board_faces() {
        let o = BoardOrientation::Horizontal;
        assert_eq!(face_for(o, BoundaryDir::LayerAbove), Face::Top);
        assert_eq!(face_for(o, BoundaryDir::LayerBelow), Face::Bottom);
        assert_eq!(face_for(o, BoundaryDir::RowPlus), Face::Vertical);
    }

    #[test]
    fn standing_board_faces() {
        assert_eq!(face_for(BoardOrientation::ColsUp, BoundaryDir::ColPlus), Face::Top);
        assert_eq!(face_for(BoardOrientation::ColsDown, BoundaryDir::ColPlus), Face::Bottom);
        assert_eq!(face_for(BoardOrientation::RowsUp, BoundaryDir::RowMinus), Face::Top);
        assert_eq!(face_for(BoardOrientation::RowsDown, BoundaryDir::RowMinus), Face::Bottom);
        assert_eq!(
            face_for(BoardOrientation::RowsDown, BoundaryDir::LayerAbove),
            Face::Vertical
        );
    }

    #[test]
    fn htc_grows_with_surface_temperature() {
        let coeffs = FaceCoefficients {
            top: 0.006,
            side: 0.005,
            bottom: 0.003,
        };
        let corr = Corrections::default();
        let cool = surface_htc(Face::Top, &coeffs, 30.0, 25.0, &corr);
        let hot = surface_htc(Face::Top, &coeffs, 90.0, 25.0, &corr);
        assert!(cool > 0.0 && hot > cool);
        assert!(surface_htc(Face::Bottom, &coeffs, 30.0, 25.0, &corr) < cool);
        // Same order as 0.006 W/(in² K) once scaled to mil².
        assert!(cool > 0.006e-6 && cool < 0.02e-6);
    }
}

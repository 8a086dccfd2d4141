use core::fmt;
use core::num::NonZeroU32;

/// Compact, stable identifier of an electrical network on one layer.
///
/// - `u32` keeps label rasters small
/// - `NonZero` enables `Option<NetworkId>` to be niche-optimized, so an
///   unlabeled cell costs nothing extra
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NetworkId(NonZeroU32);

impl NetworkId {
    /// Wrap a raw label. Returns `None` for zero.
    pub fn new(raw: u32) -> Option<Self> {
        NonZeroU32::new(raw).map(Self)
    }

    /// The raw (nonzero) label value.
    pub fn get(self) -> u32 {
        self.0.get()
    }
}

impl fmt::Debug for NetworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NetworkId({})", self.get())
    }
}

impl fmt::Display for NetworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

/// Label sequence for newly discovered networks.
///
/// Labels advance by a repeating +7, +5, -3 pattern so neighbouring networks
/// get visibly different values when a label raster is plotted. Each cycle
/// advances by 9 and the three offsets land on distinct residues mod 9, so the
/// sequence never repeats a value.
#[derive(Debug, Clone)]
pub struct NetworkIdSequence {
    next: u32,
    phase: usize,
}

const SEQUENCE_STEPS: [i64; 3] = [7, 5, -3];

impl Default for NetworkIdSequence {
    fn default() -> Self {
        Self { next: 1, phase: 0 }
    }
}

impl NetworkIdSequence {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Iterator for NetworkIdSequence {
    type Item = NetworkId;

    fn next(&mut self) -> Option<NetworkId> {
        let id = NetworkId::new(self.next)?;
        let advanced = i64::from(self.next) + SEQUENCE_STEPS[self.phase];
        self.next = u32::try_from(advanced).ok()?;
        self.phase = (self.phase + 1) % SEQUENCE_STEPS.len();
        Some(id)
    }
}

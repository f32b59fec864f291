use core::fmt;
use core::num::NonZeroU32;

use crate::error::{KfError, KfResult};

/// Compact, stable identifier used across network topologies.
///
/// - `u32` keeps memory small
/// - `NonZero` enables `Option<Id>` to be pointer-optimized
///
/// The index doubles as the position of the object in solver vectors, so an
/// id handed out at build time names the same unknown for the whole solve.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id(NonZeroU32);

impl Id {
    /// Create an Id from a 0-based position by storing index+1.
    ///
    /// Positions that do not fit below `u32::MAX` are rejected rather than
    /// wrapped, so two positions never share an id.
    pub fn try_from_usize(index: usize) -> KfResult<Self> {
        u32::try_from(index)
            .ok()
            .and_then(|i| i.checked_add(1))
            .and_then(NonZeroU32::new)
            .map(Self)
            .ok_or_else(|| KfError::InvalidArg {
                what: format!("id index {index} does not fit in 32 bits"),
            })
    }

    /// Recover the 0-based index.
    pub fn index(self) -> u32 {
        self.0.get() - 1
    }

    /// Recover the 0-based index as a `usize` for slice access.
    pub fn slot(self) -> usize {
        self.index() as usize
    }
}

impl fmt::Debug for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.index())
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index())
    }
}

/// Domain-specific ID aliases for clarity (no runtime cost).
pub type NodeId = Id;
pub type EdgeId = Id;
pub type LoopId = Id;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_round_trip_index() {
        for i in [0_usize, 1, 2, 42, 10_000] {
            let id = Id::try_from_usize(i).unwrap();
            assert_eq!(id.index() as usize, i);
            assert_eq!(id.slot(), i);
        }
    }

    #[test]
    fn largest_positions_are_rejected_not_wrapped() {
        let last = Id::try_from_usize(u32::MAX as usize - 1).unwrap();
        assert_eq!(last.index(), u32::MAX - 1);
        assert!(Id::try_from_usize(u32::MAX as usize).is_err());
        if let Some(beyond) = (u32::MAX as usize).checked_add(1) {
            assert!(Id::try_from_usize(beyond).is_err());
        }
    }

    #[test]
    fn option_id_is_small() {
        assert_eq!(
            core::mem::size_of::<Id>(),
            core::mem::size_of::<Option<Id>>()
        );
    }

    #[test]
    fn ids_order_by_index() {
        assert!(Id::try_from_usize(3).unwrap() < Id::try_from_usize(7).unwrap());
    }
}

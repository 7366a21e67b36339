//! Status conditions carried by a combatant.
//!
//! Only `frozen` is consumed by the engine (the next acting turn is skipped).
//! `burned` and the accuracy debuff countdown are recorded so collaborators and
//! renderers see them, but no damage-over-time or hit-chance logic reads them.

use bitflags::bitflags;

bitflags! {
    /// Boolean status conditions.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[cfg_attr(feature = "serde", serde(transparent))]
    pub struct StatusFlags: u8 {
        const FROZEN = 1 << 0;
        const BURNED = 1 << 1;
    }
}

/// Status block of one combatant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Status {
    pub flags: StatusFlags,
    /// Remaining turns of reduced accuracy. Decremented outside the engine.
    pub accuracy_debuff: u8,
}

impl Status {
    #[inline]
    pub fn is_frozen(&self) -> bool {
        self.flags.contains(StatusFlags::FROZEN)
    }

    #[inline]
    pub fn is_burned(&self) -> bool {
        self.flags.contains(StatusFlags::BURNED)
    }

    pub fn freeze(&mut self) {
        self.flags.insert(StatusFlags::FROZEN);
    }

    /// Clears the frozen flag. Returns whether it was set.
    pub fn thaw(&mut self) -> bool {
        let was_frozen = self.is_frozen();
        self.flags.remove(StatusFlags::FROZEN);
        was_frozen
    }

    pub fn burn(&mut self) {
        self.flags.insert(StatusFlags::BURNED);
    }
}

//! Modifier key flags.

use bitflags::bitflags;
use winit::keyboard::ModifiersState;

bitflags! {
    /// Held modifier keys.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0000_0001;
        const CTRL  = 0b0000_0010;
        const ALT   = 0b0000_0100;
        /// Windows / Command key.
        const SUPER = 0b0000_1000;
    }
}

impl From<ModifiersState> for Modifiers {
    fn from(state: ModifiersState) -> Self {
        [
            (state.shift_key(), Self::SHIFT),
            (state.control_key(), Self::CTRL),
            (state.alt_key(), Self::ALT),
            (state.super_key(), Self::SUPER),
        ]
        .into_iter()
        .filter(|(held, _)| *held)
        .fold(Self::empty(), |acc, (_, flag)| acc | flag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_winit_state() {
        let state = ModifiersState::SHIFT | ModifiersState::ALT;
        let mods = Modifiers::from(state);
        assert!(mods.contains(Modifiers::SHIFT));
        assert!(mods.contains(Modifiers::ALT));
        assert!(!mods.contains(Modifiers::CTRL));
    }

    #[test]
    fn empty_state() {
        assert_eq!(Modifiers::from(ModifiersState::empty()), Modifiers::empty());
    }
}

//! Frame-counted cooldown gating round resolution.

/// Frames a resolved round blocks further rounds for.
pub const COOLDOWN_FRAMES: u32 = 60;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CooldownState {
    /// Counter is zero; a round may resolve.
    Idle,
    /// Counter is positive; rounds are suppressed.
    Cooling,
}

/// Decrementing frame counter. Only `start` raises it; nothing cancels it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Cooldown {
    remaining: u32,
}

impl Cooldown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames left before the resolver is eligible again.
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn state(&self) -> CooldownState {
        if self.remaining == 0 {
            CooldownState::Idle
        } else {
            CooldownState::Cooling
        }
    }

    pub fn is_idle(&self) -> bool {
        self.state() == CooldownState::Idle
    }

    /// Enter COOLING at the full window.
    pub fn start(&mut self) {
        self.remaining = COOLDOWN_FRAMES;
    }

    /// Advance one frame.
    pub fn tick(&mut self) {
        self.remaining = self.remaining.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_cooldown_is_idle() {
        let c = Cooldown::new();
        assert!(c.is_idle());
        assert_eq!(c.remaining(), 0);
    }

    #[test]
    fn full_window_decays_to_idle() {
        let mut c = Cooldown::new();
        c.start();
        assert_eq!(c.state(), CooldownState::Cooling);
        assert_eq!(c.remaining(), COOLDOWN_FRAMES);
        for _ in 0..COOLDOWN_FRAMES - 1 {
            c.tick();
            assert_eq!(c.state(), CooldownState::Cooling);
        }
        c.tick();
        assert!(c.is_idle());
    }

    #[test]
    fn tick_saturates_at_zero() {
        let mut c = Cooldown::new();
        c.tick();
        c.tick();
        assert_eq!(c.remaining(), 0);
    }
}

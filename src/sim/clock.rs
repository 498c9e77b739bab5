//! Tick clock and animation frame derivation
//!
//! One tick is the sole time unit in the sim. Every animation and cooldown is
//! expressed as "N ticks since some recorded start tick", so the whole game
//! replays identically from the tick counter alone.

use serde::{Deserialize, Serialize};

/// Playback mode for [`Clock::frame_index`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FrameMode {
    /// Cycle through the frames forever
    Loop,
    /// Play each frame once, then report completion with `None`
    Once,
}

/// Monotonic tick counter with elapsed-time and frame queries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clock {
    now: u64,
}

impl Clock {
    /// Clock positioned at an arbitrary tick
    pub fn at(now: u64) -> Self {
        Self { now }
    }

    /// Current tick
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Advance one tick
    pub fn advance(&mut self) {
        self.now += 1;
    }

    /// True once `duration` ticks have passed since `since`
    pub fn elapsed(&self, since: u64, duration: u64) -> bool {
        self.now.saturating_sub(since) >= duration
    }

    /// Derive the animation frame for a clip started at `start` whose frames
    /// are each held for `hold` ticks.
    ///
    /// In `Once` mode a finished clip yields `None`; callers use that to
    /// transition out of the animation state.
    pub fn frame_index(
        &self,
        start: u64,
        frame_count: u32,
        hold: u32,
        mode: FrameMode,
    ) -> Option<u32> {
        debug_assert!(frame_count > 0 && hold > 0);
        let raw = self.now.saturating_sub(start) / hold as u64;
        match mode {
            FrameMode::Loop => Some((raw % frame_count as u64) as u32),
            FrameMode::Once => (raw < frame_count as u64).then_some(raw as u32),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn elapsed_threshold() {
        let clock = Clock::at(100);
        assert!(clock.elapsed(50, 50));
        assert!(clock.elapsed(50, 49));
        assert!(!clock.elapsed(50, 51));
        // A start tick in the future never counts as elapsed
        assert!(!clock.elapsed(200, 1));
    }

    #[test]
    fn loop_mode_walks_frames() {
        // 3 frames held 10 ticks: frame changes at ticks 10, 20, cycles at 30
        let cases = [(0, 0), (9, 0), (10, 1), (19, 1), (20, 2), (29, 2), (30, 0)];
        for (now, want) in cases {
            let clock = Clock::at(now);
            assert_eq!(
                clock.frame_index(0, 3, 10, FrameMode::Loop),
                Some(want),
                "at tick {now}"
            );
        }
    }

    #[test]
    fn once_mode_completes() {
        // 5 frames held 3 ticks starting at tick 7: done from tick 22 on
        let clock = Clock::at(21);
        assert_eq!(clock.frame_index(7, 5, 3, FrameMode::Once), Some(4));
        let clock = Clock::at(22);
        assert_eq!(clock.frame_index(7, 5, 3, FrameMode::Once), None);
    }

    proptest! {
        #[test]
        fn loop_mode_is_modular(
            start in 0u64..10_000,
            t in 0u64..100_000,
            frames in 1u32..12,
            hold in 1u32..30,
        ) {
            let clock = Clock::at(start + t);
            let got = clock.frame_index(start, frames, hold, FrameMode::Loop);
            prop_assert_eq!(got, Some(((t / hold as u64) % frames as u64) as u32));
            // Cycles with period frames * hold
            let later = Clock::at(start + t + frames as u64 * hold as u64);
            prop_assert_eq!(later.frame_index(start, frames, hold, FrameMode::Loop), got);
        }

        #[test]
        fn once_mode_absent_past_end(
            start in 0u64..10_000,
            t in 0u64..100_000,
            frames in 1u32..12,
            hold in 1u32..30,
        ) {
            let clock = Clock::at(start + t);
            let got = clock.frame_index(start, frames, hold, FrameMode::Once);
            if t >= frames as u64 * hold as u64 {
                prop_assert_eq!(got, None);
            } else {
                prop_assert_eq!(got, Some((t / hold as u64) as u32));
            }
        }
    }
}

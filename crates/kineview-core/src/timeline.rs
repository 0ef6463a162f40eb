//! Time cursor: current time, bounds, playback clock and sample lookup.

use crate::constants::{PLAYBACK_RATE_LIMIT, TIME_EPSILON};
use crate::error::PlayerError;
use crate::scene::SampledTrack;
use std::time::Duration;

/// Index of the sample at or before `time`, if any.
#[inline]
pub fn sample_index(times: &[f64], time: f64) -> Option<usize> {
    let after = times.partition_point(|&s| s <= time + TIME_EPSILON);
    after.checked_sub(1)
}

/// Value of `track` at `time`: the nearest sample at or before `time`, with
/// no interpolation. Times before the first sample and missing samples both
/// yield `None`.
pub fn sample<T: Copy>(track: &SampledTrack<T>, time: f64) -> Option<T> {
    let i = sample_index(track.times(), time)?;
    track.samples().get(i).copied().flatten()
}

#[derive(Clone, Debug, PartialEq)]
pub struct TimeCursor {
    current_time: f64,
    min_time: f64,
    max_time: f64,
    playing: bool,
    playback_rate: f64,
    looping: bool,
}

impl Default for TimeCursor {
    fn default() -> Self {
        Self {
            current_time: 0.0,
            min_time: 0.0,
            max_time: 0.0,
            playing: false,
            playback_rate: 1.0,
            looping: true,
        }
    }
}

impl TimeCursor {
    pub fn new(min_time: f64, max_time: f64) -> Self {
        let mut cursor = Self::default();
        cursor.set_bounds(min_time, max_time);
        cursor
    }

    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    pub fn min_time(&self) -> f64 {
        self.min_time
    }

    pub fn max_time(&self) -> f64 {
        self.max_time
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn playback_rate(&self) -> f64 {
        self.playback_rate
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    pub fn play(&mut self) {
        self.playing = true;
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    pub fn toggle_play(&mut self) {
        self.playing = !self.playing;
    }

    pub fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }

    pub fn set_playback_rate(&mut self, rate: f64) -> Result<(), PlayerError> {
        if !rate.is_finite() {
            return Err(PlayerError::invalid("playback_rate", format!("{rate} is not finite")));
        }
        self.playback_rate = rate;
        Ok(())
    }

    /// Multiply the playback rate, keeping its magnitude within
    /// `[1 / PLAYBACK_RATE_LIMIT, PLAYBACK_RATE_LIMIT]`.
    pub fn scale_playback_rate(&mut self, factor: f64) {
        let scaled = self.playback_rate * factor;
        let magnitude = scaled.abs().clamp(1.0 / PLAYBACK_RATE_LIMIT, PLAYBACK_RATE_LIMIT);
        let sign = if self.playback_rate < 0.0 { -1.0 } else { 1.0 };
        self.playback_rate = sign * magnitude;
    }

    /// Reset bounds from the active scene and clamp the current time into them.
    pub fn set_bounds(&mut self, min_time: f64, max_time: f64) {
        let (lo, hi) = if min_time <= max_time {
            (min_time, max_time)
        } else {
            (max_time, min_time)
        };
        self.min_time = lo;
        self.max_time = hi;
        self.current_time = self.current_time.clamp(lo, hi);
    }

    /// Move to `time`, clamped into bounds. NaN leaves the cursor in place.
    pub fn seek(&mut self, time: f64) {
        if time.is_nan() {
            return;
        }
        self.current_time = time.clamp(self.min_time, self.max_time);
    }

    pub fn seek_start(&mut self) {
        self.current_time = self.min_time;
    }

    pub fn seek_end(&mut self) {
        self.current_time = self.max_time;
    }

    /// Move to the next sample stamp of `times` after the current time, or
    /// the previous one before it. Stays put at the ends.
    pub fn step(&mut self, times: &[f64], forward: bool) {
        let target = if forward {
            let i = times.partition_point(|&s| s <= self.current_time + TIME_EPSILON);
            times.get(i).copied()
        } else {
            let i = times.partition_point(|&s| s < self.current_time - TIME_EPSILON);
            i.checked_sub(1).and_then(|i| times.get(i).copied())
        };
        if let Some(t) = target {
            self.seek(t);
        }
    }

    /// Advance the clock by a wall-clock interval.
    ///
    /// Leaving the range forward wraps to `min_time`, and leaving it backward
    /// (negative rate) wraps to `max_time`, when looping. Without looping the
    /// time clamps at the bound it crossed and playback stops. Returns whether
    /// the current time changed.
    pub fn advance(&mut self, dt: Duration) -> bool {
        if !self.playing {
            return false;
        }
        let before = self.current_time;
        let next = self.current_time + dt.as_secs_f64() * self.playback_rate;
        if next > self.max_time {
            if self.looping {
                self.current_time = self.min_time;
            } else {
                self.current_time = self.max_time;
                self.playing = false;
            }
        } else if next < self.min_time {
            if self.looping {
                self.current_time = self.max_time;
            } else {
                self.current_time = self.min_time;
                self.playing = false;
            }
        } else {
            self.current_time = next;
        }
        self.current_time != before
    }
}

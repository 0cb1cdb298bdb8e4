//! Shared debounce primitives
//!
//! Every detector is assembled from the same few pieces: a two-threshold
//! latch, a confirmation counter, a rolling window and a cooldown or grace
//! timer. None of them know which gesture they serve.

use std::collections::VecDeque;
use std::time::Duration;

use gestura_core::FrameTime;

/// Which side of the thresholds counts as "active"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    /// Active when the signal rises above `enter`, released below `exit`
    Above,
    /// Active when the signal falls to `enter`, released above `exit`
    Below,
}

/// Two-threshold latch
///
/// The enter threshold is stricter than the exit threshold, so a signal
/// hovering near one boundary does not flicker.
#[derive(Debug, Clone)]
pub struct Hysteresis {
    enter: f32,
    exit: f32,
    polarity: Polarity,
    active: bool,
}

impl Hysteresis {
    pub fn above(enter: f32, exit: f32) -> Self {
        Self {
            enter,
            exit,
            polarity: Polarity::Above,
            active: false,
        }
    }

    pub fn below(enter: f32, exit: f32) -> Self {
        Self {
            enter,
            exit,
            polarity: Polarity::Below,
            active: false,
        }
    }

    /// Whether `value` would keep (or make) the latch active, without
    /// changing it
    pub fn would_hold(&self, value: f32) -> bool {
        let threshold = if self.active { self.exit } else { self.enter };
        match self.polarity {
            Polarity::Above => value >= threshold,
            Polarity::Below => value <= threshold,
        }
    }

    /// Feed one sample, returning the new state
    pub fn update(&mut self, value: f32) -> bool {
        self.active = self.would_hold(value);
        self.active
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn reset(&mut self) {
        self.active = false;
    }
}

/// Hysteresis latch that only flips after `required` consecutive samples
/// agree on the other side of the relevant threshold
#[derive(Debug, Clone)]
pub struct StableHysteresis {
    enter: f32,
    exit: f32,
    required: usize,
    active: bool,
    streak: usize,
}

impl StableHysteresis {
    /// Signal must exceed `enter` to activate and drop below `exit` to release
    pub fn new(enter: f32, exit: f32, required: usize) -> Self {
        Self {
            enter,
            exit,
            required: required.max(1),
            active: false,
            streak: 0,
        }
    }

    pub fn update(&mut self, value: f32) -> bool {
        let crossing = if self.active {
            value < self.exit
        } else {
            value > self.enter
        };
        if crossing {
            self.streak += 1;
        } else {
            self.streak = 0;
        }
        if self.streak >= self.required {
            self.active = !self.active;
            self.streak = 0;
        }
        self.active
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn reset(&mut self) {
        self.active = false;
        self.streak = 0;
    }
}

/// Counts consecutive frames on which a condition held
#[derive(Debug, Clone)]
pub struct StableCounter {
    required: usize,
    count: usize,
}

impl StableCounter {
    pub fn new(required: usize) -> Self {
        Self { required, count: 0 }
    }

    /// Feed one frame; true once the condition has held `required` frames
    pub fn update(&mut self, condition: bool) -> bool {
        if condition {
            self.count = self.count.saturating_add(1);
        } else {
            self.count = 0;
        }
        self.is_stable()
    }

    pub fn is_stable(&self) -> bool {
        self.count >= self.required
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn reset(&mut self) {
        self.count = 0;
    }
}

/// Passes a value through only once it has repeated `required` frames in a row
#[derive(Debug, Clone)]
pub struct Debounce<T> {
    required: usize,
    last: Option<T>,
    count: usize,
}

impl<T: Copy + PartialEq> Debounce<T> {
    pub fn new(required: usize) -> Self {
        Self {
            required: required.max(1),
            last: None,
            count: 0,
        }
    }

    pub fn update(&mut self, value: T) -> Option<T> {
        if self.last == Some(value) {
            self.count = self.count.saturating_add(1);
        } else {
            self.last = Some(value);
            self.count = 1;
        }
        (self.count >= self.required).then_some(value)
    }

    pub fn reset(&mut self) {
        self.last = None;
        self.count = 0;
    }
}

/// Rolling window of the most recent samples
#[derive(Debug, Clone)]
pub struct MovingAverage {
    window: usize,
    samples: VecDeque<f32>,
}

impl MovingAverage {
    pub fn new(window: usize) -> Self {
        let window = window.max(1);
        Self {
            window,
            samples: VecDeque::with_capacity(window),
        }
    }

    /// Add a sample and return the mean of the window
    pub fn push(&mut self, value: f32) -> f32 {
        if self.samples.len() == self.window {
            self.samples.pop_front();
        }
        self.samples.push_back(value);
        self.mean().unwrap_or(value)
    }

    pub fn mean(&self) -> Option<f32> {
        if self.samples.is_empty() {
            return None;
        }
        Some(self.samples.iter().sum::<f32>() / self.samples.len() as f32)
    }

    pub fn is_full(&self) -> bool {
        self.samples.len() == self.window
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &f32> {
        self.samples.iter()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

/// "N of the last M frames" vote
#[derive(Debug, Clone)]
pub struct Agreement {
    window: usize,
    required: usize,
    votes: VecDeque<bool>,
}

impl Agreement {
    pub fn new(required: usize, window: usize) -> Self {
        let window = window.max(1);
        Self {
            window,
            required,
            votes: VecDeque::with_capacity(window),
        }
    }

    /// Record a vote; true when at least `required` of the window agree
    pub fn push(&mut self, vote: bool) -> bool {
        if self.votes.len() == self.window {
            self.votes.pop_front();
        }
        self.votes.push_back(vote);
        self.is_satisfied()
    }

    pub fn is_satisfied(&self) -> bool {
        self.count() >= self.required
    }

    pub fn count(&self) -> usize {
        self.votes.iter().filter(|v| **v).count()
    }

    /// Fraction of recorded votes that were true
    pub fn ratio(&self) -> f32 {
        if self.votes.is_empty() {
            return 0.0;
        }
        self.count() as f32 / self.votes.len() as f32
    }

    pub fn len(&self) -> usize {
        self.votes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.votes.is_empty()
    }

    pub fn clear(&mut self) {
        self.votes.clear();
    }
}

/// Time-based re-trigger suppression
#[derive(Debug, Clone)]
pub struct Cooldown {
    period: Duration,
    last: Option<FrameTime>,
}

impl Cooldown {
    pub fn new(period: Duration) -> Self {
        Self { period, last: None }
    }

    pub fn is_ready(&self, now: FrameTime) -> bool {
        self.last.map_or(true, |last| now.since(last) >= self.period)
    }

    pub fn trigger(&mut self, now: FrameTime) {
        self.last = Some(now);
    }

    /// Trigger if ready; returns whether the trigger happened
    pub fn try_trigger(&mut self, now: FrameTime) -> bool {
        if self.is_ready(now) {
            self.trigger(now);
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}

/// Frame-counted re-trigger suppression
#[derive(Debug, Clone)]
pub struct FrameCooldown {
    frames: u32,
    remaining: u32,
}

impl FrameCooldown {
    pub fn new(frames: u32) -> Self {
        Self {
            frames,
            remaining: 0,
        }
    }

    pub fn start(&mut self) {
        self.remaining = self.frames;
    }

    /// Consume one frame of the cooldown
    pub fn tick(&mut self) {
        self.remaining = self.remaining.saturating_sub(1);
    }

    pub fn is_ready(&self) -> bool {
        self.remaining == 0
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn reset(&mut self) {
        self.remaining = 0;
    }
}

/// Bridges short gaps in a continuous signal
#[derive(Debug, Clone)]
pub struct GracePeriod {
    window: Duration,
    last_seen: Option<FrameTime>,
}

impl GracePeriod {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_seen: None,
        }
    }

    /// Record that the signal was present at `now`
    pub fn mark(&mut self, now: FrameTime) {
        self.last_seen = Some(now);
    }

    /// True once the signal has been absent for longer than the window
    pub fn expired(&self, now: FrameTime) -> bool {
        self.last_seen
            .map_or(true, |seen| now.since(seen) > self.window)
    }

    pub fn reset(&mut self) {
        self.last_seen = None;
    }
}

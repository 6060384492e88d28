//! Buffered direction changes
//!
//! Input usually arrives faster than the simulation ticks. Turns are queued
//! here and consumed one per tick, oldest first, so quick key sequences such
//! as "up then left" are both honoured instead of the second overwriting the
//! first.

use std::collections::VecDeque;

use super::direction::Direction;

/// Why a turn was or was not accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnResult {
    Queued,
    /// Same as the direction the snake will already be travelling in
    Redundant,
    /// Would reverse the snake onto itself
    Reversal,
    QueueFull,
    /// The game is over; turns are ignored until reset
    NotRunning,
}

impl TurnResult {
    pub fn is_accepted(self) -> bool {
        self == TurnResult::Queued
    }
}

/// Bounded FIFO of pending directions
#[derive(Debug, Clone, PartialEq)]
pub struct TurnQueue {
    pending: VecDeque<Direction>,
    capacity: usize,
}

impl TurnQueue {
    /// Create a queue holding at most `capacity` turns (minimum one)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            pending: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// The direction a new turn is validated against: the most recently
    /// queued turn, or `current` when nothing is pending.
    pub fn reference(&self, current: Direction) -> Direction {
        self.pending.back().copied().unwrap_or(current)
    }

    /// Offer a turn, given the snake's current direction
    pub fn offer(&mut self, direction: Direction, current: Direction) -> TurnResult {
        let reference = self.reference(current);

        if direction == reference {
            return TurnResult::Redundant;
        }
        if direction.is_opposite(reference) {
            return TurnResult::Reversal;
        }
        if self.pending.len() >= self.capacity {
            return TurnResult::QueueFull;
        }

        self.pending.push_back(direction);
        TurnResult::Queued
    }

    /// Take the oldest pending turn
    pub fn pop(&mut self) -> Option<Direction> {
        self.pending.pop_front()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Pending turns, oldest first
    pub fn iter(&self) -> impl Iterator<Item = Direction> + '_ {
        self.pending.iter().copied()
    }
}

use std::collections::{HashSet, VecDeque};

use super::direction::Direction;

/// A cell on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position one cell in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }

    /// Check if the position lies within a `width` x `height` grid
    pub fn is_within(&self, width: usize, height: usize) -> bool {
        self.x >= 0 && (self.x as usize) < width && self.y >= 0 && (self.y as usize) < height
    }
}

/// The snake in the game.
///
/// The ordered body (head first) is mirrored by a set of occupied cells so
/// collision and placement checks do not scan the body.
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    body: VecDeque<Position>,
    occupied: HashSet<Position>,
    /// Current direction of travel
    pub direction: Direction,
}

impl Snake {
    /// Create a snake with its head at `head` and `length - 1` segments trailing
    /// behind it, opposite to `direction`. A length of zero is treated as one.
    pub fn new(head: Position, direction: Direction, length: usize) -> Self {
        let (dx, dy) = direction.opposite().delta();
        let mut snake = Self {
            body: VecDeque::with_capacity(length.max(1)),
            occupied: HashSet::with_capacity(length.max(1)),
            direction,
        };

        let mut segment = head;
        for _ in 0..length.max(1) {
            snake.body.push_back(segment);
            snake.occupied.insert(segment);
            segment = segment.moved_by(dx, dy);
        }

        snake
    }

    /// Build a snake from explicit cells, head first. Returns `None` for an
    /// empty sequence or one that visits a cell twice.
    pub fn from_cells<I>(cells: I, direction: Direction) -> Option<Self>
    where
        I: IntoIterator<Item = Position>,
    {
        let mut body = VecDeque::new();
        let mut occupied = HashSet::new();

        for cell in cells {
            if !occupied.insert(cell) {
                return None;
            }
            body.push_back(cell);
        }

        if body.is_empty() {
            return None;
        }

        Some(Self {
            body,
            occupied,
            direction,
        })
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Get the tail position (last segment)
    pub fn tail(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    /// Iterate over the cells, head first
    pub fn cells(&self) -> impl Iterator<Item = Position> + '_ {
        self.body.iter().copied()
    }

    /// The set of cells currently covered by the snake
    pub fn occupied(&self) -> &HashSet<Position> {
        &self.occupied
    }

    /// Check if any segment, head or tail included, covers `pos`
    pub fn occupies(&self, pos: Position) -> bool {
        self.occupied.contains(&pos)
    }

    /// Insert a new head. Refuses (returns false) if the cell is already part
    /// of the body, so the snake never intersects itself.
    pub fn push_head(&mut self, pos: Position) -> bool {
        if !self.occupied.insert(pos) {
            return false;
        }
        self.body.push_front(pos);
        true
    }

    /// Drop the tail segment. The last remaining cell is never removed.
    pub fn pop_tail(&mut self) -> Option<Position> {
        if self.body.len() <= 1 {
            return None;
        }
        let tail = self.body.pop_back()?;
        self.occupied.remove(&tail);
        Some(tail)
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Never true for a constructed snake
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Type of collision that ended a game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionType {
    /// Snake hit a wall
    Wall,
    /// Snake hit itself
    SelfCollision,
}

/// Run status of a game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Running,
    Lost,
    Won,
}

impl RunStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, RunStatus::Running)
    }
}

/// Read-only view of a game handed to renderers
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub width: usize,
    pub height: usize,
    /// Snake cells, head first
    pub snake: Vec<Position>,
    pub food: Option<Position>,
    pub score: u32,
    pub status: RunStatus,
}

impl Snapshot {
    pub fn head(&self) -> Option<Position> {
        self.snake.first().copied()
    }
}

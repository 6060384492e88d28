use std::collections::HashSet;

use rand::Rng;
use rand::seq::IteratorRandom;
use serde::{Deserialize, Serialize};

use super::state::Position;

/// How a free cell is chosen for new food
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FoodPlacement {
    /// Draw random cells until one is free. Cheap on a sparse board; the number
    /// of draws is unbounded and grows as the board fills.
    Rejection,
    /// Enumerate the free cells and pick one. Always O(width * height).
    #[default]
    FreeCells,
}

/// Choose a cell uniformly among those not in `occupied`.
///
/// Returns `None` only when every cell of the `width` x `height` board is
/// occupied.
pub fn place<R: Rng + ?Sized>(
    strategy: FoodPlacement,
    occupied: &HashSet<Position>,
    width: usize,
    height: usize,
    rng: &mut R,
) -> Option<Position> {
    let free = count_free(occupied, width, height);
    if free == 0 {
        return None;
    }

    match strategy {
        FoodPlacement::Rejection => loop {
            let x = rng.gen_range(0..width) as i32;
            let y = rng.gen_range(0..height) as i32;
            let pos = Position::new(x, y);

            if !occupied.contains(&pos) {
                return Some(pos);
            }
        },
        FoodPlacement::FreeCells => cells(width, height)
            .filter(|pos| !occupied.contains(pos))
            .choose(rng),
    }
}

fn count_free(occupied: &HashSet<Position>, width: usize, height: usize) -> usize {
    let on_board = occupied
        .iter()
        .filter(|pos| pos.is_within(width, height))
        .count();
    (width * height).saturating_sub(on_board)
}

fn cells(width: usize, height: usize) -> impl Iterator<Item = Position> {
    (0..height).flat_map(move |y| (0..width).map(move |x| Position::new(x as i32, y as i32)))
}

use anyhow::{Result, bail, ensure};
use log::{debug, error, info};
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::{
    config::GameConfig,
    direction::Direction,
    food::{self, FoodPlacement},
    state::{CollisionType, Position, RunStatus, Snake, Snapshot},
    turn_queue::{TurnQueue, TurnResult},
};

/// What a single tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The game was not running; nothing changed
    Idle,
    /// Moved one cell without eating
    Moved,
    /// Ate food and grew by one
    Ate,
    /// Ate the last free cell
    Won,
    /// Hit something and lost
    Collided(CollisionType),
}

impl TickOutcome {
    /// True if this tick ended the game
    pub fn is_terminal(self) -> bool {
        matches!(self, TickOutcome::Won | TickOutcome::Collided(_))
    }
}

/// The game-state machine.
///
/// Owns the board, snake, pending turns, food and score. A host drives it by
/// calling [`GameState::tick`] on a timer and [`GameState::enqueue_turn`] from
/// its input source; both must be called from the same thread of control (or
/// under one lock guarding the whole state).
#[derive(Debug, Clone)]
pub struct GameState {
    width: usize,
    height: usize,
    snake: Snake,
    food: Option<Position>,
    turns: TurnQueue,
    score: u32,
    steps: u32,
    status: RunStatus,
    placement: FoodPlacement,
    rng: StdRng,
}

impl GameState {
    /// Start a new game: single-cell snake at the centre heading right.
    ///
    /// Fails if the configuration does not describe a playable board.
    pub fn new(config: &GameConfig) -> Result<Self> {
        let mut state = Self::unstarted(config)?;
        state.reset();
        Ok(state)
    }

    /// Start a running game from an explicit snake and food cell.
    ///
    /// Fails if the snake leaves the board or the food is off the board or
    /// under the snake. With `food` as `None` a cell is placed at random.
    pub fn with_snake(config: &GameConfig, snake: Snake, food: Option<Position>) -> Result<Self> {
        let mut state = Self::unstarted(config)?;

        if let Some(cell) = snake.cells().find(|cell| !state.in_bounds(*cell)) {
            bail!("snake cell ({}, {}) is outside the board", cell.x, cell.y);
        }
        if let Some(food) = food {
            ensure!(
                state.in_bounds(food),
                "food ({}, {}) is outside the board",
                food.x,
                food.y
            );
            ensure!(
                !snake.occupies(food),
                "food ({}, {}) overlaps the snake",
                food.x,
                food.y
            );
        }

        state.snake = snake;
        state.food = match food {
            Some(food) => Some(food),
            None => state.spawn_food(),
        };

        info!(
            "New game on {}x{} board from a {}-cell snake, food at {:?}",
            state.width,
            state.height,
            state.snake.len(),
            state.food
        );
        Ok(state)
    }

    /// Validated fields for a game that has not been reset yet
    fn unstarted(config: &GameConfig) -> Result<Self> {
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let width = config.grid_width;
        let height = config.grid_height;

        Ok(Self {
            width,
            height,
            snake: Self::starting_snake(width, height),
            food: None,
            turns: TurnQueue::new(config.max_queued_turns),
            score: 0,
            steps: 0,
            status: RunStatus::Running,
            placement: config.food_placement,
            rng,
        })
    }

    fn starting_snake(width: usize, height: usize) -> Snake {
        let center = Position::new((width / 2) as i32, (height / 2) as i32);
        Snake::new(center, Direction::Right, 1)
    }

    /// Reinitialise every field for a fresh game. The RNG carries on.
    pub fn reset(&mut self) {
        self.snake = Self::starting_snake(self.width, self.height);
        self.turns.clear();
        self.score = 0;
        self.steps = 0;
        self.status = RunStatus::Running;
        self.food = None;
        self.food = self.spawn_food();

        info!(
            "New game on {}x{} board, food at {:?}",
            self.width, self.height, self.food
        );
    }

    /// Buffer a direction change for a later tick.
    ///
    /// Turns are checked against the last buffered turn, or the current
    /// direction if none is pending. Redundant turns and reversals are dropped.
    pub fn enqueue_turn(&mut self, direction: Direction) -> TurnResult {
        if self.status != RunStatus::Running {
            return TurnResult::NotRunning;
        }

        let result = self.turns.offer(direction, self.snake.direction);
        if !result.is_accepted() {
            debug!("Ignoring turn {direction:?}: {result:?}");
        }
        result
    }

    /// Advance the simulation by one step
    pub fn tick(&mut self) -> TickOutcome {
        if self.status != RunStatus::Running {
            return TickOutcome::Idle;
        }

        if let Some(direction) = self.turns.pop() {
            self.snake.direction = direction;
        }

        let new_head = self.snake.head().moved_in_direction(self.snake.direction);

        if !self.in_bounds(new_head) {
            return self.lose(CollisionType::Wall);
        }
        if !self.snake.push_head(new_head) {
            return self.lose(CollisionType::SelfCollision);
        }
        self.steps += 1;

        if self.food != Some(new_head) {
            self.snake.pop_tail();
            return TickOutcome::Moved;
        }

        self.score += 1;
        if self.is_board_full() {
            self.status = RunStatus::Won;
            self.food = None;
            info!("Board filled, game won with score {}", self.score);
            return TickOutcome::Won;
        }

        self.food = self.spawn_food();
        TickOutcome::Ate
    }

    fn lose(&mut self, collision: CollisionType) -> TickOutcome {
        self.status = RunStatus::Lost;
        info!(
            "Game lost ({collision:?}) with score {} after {} steps",
            self.score, self.steps
        );
        TickOutcome::Collided(collision)
    }

    /// Pick a new food cell. `None` means the board is full.
    fn spawn_food(&mut self) -> Option<Position> {
        if self.is_board_full() {
            return None;
        }

        let food = food::place(
            self.placement,
            self.snake.occupied(),
            self.width,
            self.height,
            &mut self.rng,
        );
        match food {
            Some(pos) => debug!("Placed food at ({}, {})", pos.x, pos.y),
            None => error!(
                "No free cell for food although snake covers {} of {} cells",
                self.snake.len(),
                self.width * self.height
            ),
        }
        debug_assert!(food.is_some(), "food placement on a full board");
        food
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.is_within(self.width, self.height)
    }

    pub fn is_board_full(&self) -> bool {
        self.snake.len() >= self.width * self.height
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            width: self.width,
            height: self.height,
            snake: self.snake.cells().collect(),
            food: self.food,
            score: self.score,
            status: self.status,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn direction(&self) -> Direction {
        self.snake.direction
    }

    pub fn food(&self) -> Option<Position> {
        self.food
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Ticks that moved the snake in the current game
    pub fn steps(&self) -> u32 {
        self.steps
    }

    pub fn status(&self) -> RunStatus {
        self.status
    }

    pub fn is_running(&self) -> bool {
        self.status == RunStatus::Running
    }

    pub fn queued_turns(&self) -> &TurnQueue {
        &self.turns
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::config::MAX_GRID_SIDE;

    fn seeded(width: usize, height: usize) -> GameConfig {
        GameConfig::new(width, height).with_seed(17)
    }

    fn assert_food_disjoint(state: &GameState) {
        if let Some(food) = state.food() {
            assert!(!state.snake().occupies(food), "food under snake at {food:?}");
            assert!(state.in_bounds(food));
        }
    }

    #[test]
    fn test_reset() {
        let mut state = GameState::new(&seeded(10, 10)).unwrap();
        state.tick();
        state.enqueue_turn(Direction::Up);
        state.reset();

        assert!(state.is_running());
        assert_eq!(state.score(), 0);
        assert_eq!(state.steps(), 0);
        assert_eq!(state.snake().len(), 1);
        assert_eq!(state.snake().head(), Position::new(5, 5));
        assert_eq!(state.direction(), Direction::Right);
        assert!(state.queued_turns().is_empty());
        assert!(state.food().is_some());
        assert_food_disjoint(&state);
    }

    #[test]
    fn test_reset_after_loss() {
        let mut state = GameState::new(&seeded(4, 4)).unwrap();
        while state.is_running() {
            state.tick();
        }
        assert_eq!(state.status(), RunStatus::Lost);

        state.reset();
        assert_eq!(state.status(), RunStatus::Running);
        assert_eq!(state.snake().len(), 1);
        assert_food_disjoint(&state);
    }

    #[test]
    fn test_straight_run_until_wall() {
        let mut state = GameState::new(&seeded(10, 10)).unwrap();
        // keep food out of the way so the run is pure movement
        state.food = Some(Position::new(0, 0));

        for expected_x in 6..10 {
            assert_eq!(state.tick(), TickOutcome::Moved);
            assert_eq!(state.snake().head(), Position::new(expected_x, 5));
            assert_eq!(state.snake().len(), 1);
        }

        assert_eq!(state.tick(), TickOutcome::Collided(CollisionType::Wall));
        assert_eq!(state.status(), RunStatus::Lost);

        let frozen = state.snapshot();
        assert_eq!(state.tick(), TickOutcome::Idle);
        assert_eq!(state.snapshot(), frozen);
    }

    #[test]
    fn test_wall_collision_does_not_move_snake() {
        let config = seeded(10, 10);
        let snake = Snake::new(Position::new(0, 5), Direction::Left, 3);
        let mut state = GameState::with_snake(&config, snake, Some(Position::new(5, 5))).unwrap();

        let before = state.snapshot();
        assert_eq!(state.tick(), TickOutcome::Collided(CollisionType::Wall));
        let after = state.snapshot();
        assert_eq!(after.snake, before.snake);
        assert_eq!(after.score, before.score);
        assert_eq!(after.status, RunStatus::Lost);
    }

    #[test]
    fn test_self_collision() {
        let config = seeded(10, 10);
        // Body: (5,5), (4,5), (3,5), (2,5), (1,5)
        let snake = Snake::new(Position::new(5, 5), Direction::Right, 5);
        let mut state = GameState::with_snake(&config, snake, Some(Position::new(8, 8))).unwrap();

        // Down to (5,6), Left to (4,6), Up into (4,5) which is still body
        assert!(state.enqueue_turn(Direction::Down).is_accepted());
        assert!(state.enqueue_turn(Direction::Left).is_accepted());
        assert!(state.enqueue_turn(Direction::Up).is_accepted());

        assert_eq!(state.tick(), TickOutcome::Moved);
        assert_eq!(state.tick(), TickOutcome::Moved);
        assert_eq!(
            state.tick(),
            TickOutcome::Collided(CollisionType::SelfCollision)
        );
        assert_eq!(state.status(), RunStatus::Lost);
    }

    #[test]
    fn test_moving_into_own_tail_is_a_collision() {
        let config = seeded(10, 10);
        // 2x2 loop: head (1,0), then (0,0), (0,1), tail (1,1); heading down into the tail
        let cells = [
            Position::new(1, 0),
            Position::new(0, 0),
            Position::new(0, 1),
            Position::new(1, 1),
        ];
        let snake = Snake::from_cells(cells, Direction::Down).unwrap();
        let mut state = GameState::with_snake(&config, snake, Some(Position::new(5, 5))).unwrap();

        assert_eq!(
            state.tick(),
            TickOutcome::Collided(CollisionType::SelfCollision)
        );
    }

    #[test]
    fn test_reversal_rejected_and_queue_unchanged() {
        let mut state = GameState::new(&seeded(10, 10)).unwrap();
        let before = state.queued_turns().len();

        assert_eq!(state.enqueue_turn(Direction::Left), TurnResult::Reversal);
        assert_eq!(state.queued_turns().len(), before);
        assert_eq!(state.enqueue_turn(Direction::Right), TurnResult::Redundant);
        assert_eq!(state.queued_turns().len(), before);
    }

    #[test]
    fn test_turns_ignored_after_game_over() {
        let mut state = GameState::new(&seeded(3, 3)).unwrap();
        while state.is_running() {
            state.tick();
        }
        assert_eq!(state.enqueue_turn(Direction::Up), TurnResult::NotRunning);
        assert!(state.queued_turns().is_empty());
    }

    #[test]
    fn test_queue_bound_from_config() {
        let config = GameConfig {
            max_queued_turns: 2,
            ..seeded(10, 10)
        };
        let mut state = GameState::new(&config).unwrap();

        assert!(state.enqueue_turn(Direction::Up).is_accepted());
        assert!(state.enqueue_turn(Direction::Left).is_accepted());
        assert_eq!(state.enqueue_turn(Direction::Down), TurnResult::QueueFull);
    }

    #[test]
    fn test_one_turn_consumed_per_tick() {
        let mut state = GameState::new(&seeded(10, 10)).unwrap();
        state.food = Some(Position::new(0, 9));

        state.enqueue_turn(Direction::Up);
        state.enqueue_turn(Direction::Left);

        state.tick();
        assert_eq!(state.direction(), Direction::Up);
        assert_eq!(state.snake().head(), Position::new(5, 4));
        assert_eq!(state.queued_turns().len(), 1);

        state.tick();
        assert_eq!(state.direction(), Direction::Left);
        assert_eq!(state.snake().head(), Position::new(4, 4));
        assert!(state.queued_turns().is_empty());
    }

    #[test]
    fn test_scenario_ten_by_ten_turns() {
        let mut state = GameState::new(&seeded(10, 10)).unwrap();
        state.food = Some(Position::new(0, 0));
        assert_eq!(state.snake().head(), Position::new(5, 5));

        for _ in 0..3 {
            state.tick();
        }
        assert_eq!(state.snake().head(), Position::new(8, 5));
        assert_eq!(state.snake().len(), 1);
        assert_eq!(state.score(), 0);

        // before the tick Up is validated against Down (queued), so it is a reversal
        assert!(state.enqueue_turn(Direction::Down).is_accepted());
        assert_eq!(state.enqueue_turn(Direction::Up), TurnResult::Reversal);

        state.tick();
        assert_eq!(state.snake().head(), Position::new(8, 6));

        // once Down is current, Up is still a reversal
        assert_eq!(state.enqueue_turn(Direction::Up), TurnResult::Reversal);
        assert!(state.queued_turns().is_empty());
    }

    #[test]
    fn test_up_accepted_against_right_when_nothing_queued() {
        let mut state = GameState::new(&seeded(10, 10)).unwrap();
        assert_eq!(state.enqueue_turn(Direction::Up), TurnResult::Queued);
    }

    #[test]
    fn test_scenario_eat_at_three_five() {
        let config = seeded(10, 10);
        // (4,5) head, (5,5), (6,5) tail, moving left
        let snake = Snake::new(Position::new(4, 5), Direction::Left, 3);
        let mut state = GameState::with_snake(&config, snake, Some(Position::new(3, 5))).unwrap();

        assert_eq!(state.tick(), TickOutcome::Ate);
        assert_eq!(state.snake().head(), Position::new(3, 5));
        assert_eq!(state.snake().len(), 4);
        assert_eq!(state.score(), 1);

        let food = state.food().unwrap();
        let eaten_area = [
            Position::new(3, 5),
            Position::new(4, 5),
            Position::new(5, 5),
            Position::new(6, 5),
        ];
        assert!(!eaten_area.contains(&food));
        assert_food_disjoint(&state);
    }

    #[test]
    fn test_scenario_two_by_one_board_win() {
        let config = seeded(2, 1);
        let snake = Snake::new(Position::new(0, 0), Direction::Right, 1);
        let mut state = GameState::with_snake(&config, snake, Some(Position::new(1, 0))).unwrap();

        assert_eq!(state.tick(), TickOutcome::Won);
        assert_eq!(state.status(), RunStatus::Won);
        assert_eq!(state.snake().len(), 2);
        assert_eq!(state.score(), 1);
        assert_eq!(state.food(), None);

        // stays won until reset
        assert_eq!(state.tick(), TickOutcome::Idle);
        assert_eq!(state.enqueue_turn(Direction::Up), TurnResult::NotRunning);
        assert_eq!(state.status(), RunStatus::Won);

        state.reset();
        assert_eq!(state.status(), RunStatus::Running);
    }

    #[test]
    fn test_fresh_two_by_one_board_has_food_left_of_head() {
        let state = GameState::new(&seeded(2, 1)).unwrap();
        assert_eq!(state.snake().head(), Position::new(1, 0));
        assert_eq!(state.food(), Some(Position::new(0, 0)));
    }

    #[test]
    fn test_single_cell_board_starts_without_food() {
        let mut state = GameState::new(&seeded(1, 1)).unwrap();
        assert!(state.is_running());
        assert!(state.is_board_full());
        assert_eq!(state.food(), None);
        assert_eq!(state.tick(), TickOutcome::Collided(CollisionType::Wall));
    }

    #[test]
    fn test_growth_and_score_accounting() {
        let mut state = GameState::new(&seeded(10, 10)).unwrap();
        let mut previous = (state.snake().len(), state.score());

        for step in 0..500 {
            if step % 7 == 0 {
                let turn = [Direction::Up, Direction::Left, Direction::Down, Direction::Right]
                    [step % 4];
                state.enqueue_turn(turn);
            }
            let outcome = state.tick();
            let current = (state.snake().len(), state.score());

            match outcome {
                TickOutcome::Ate | TickOutcome::Won => {
                    assert_eq!(current, (previous.0 + 1, previous.1 + 1));
                }
                _ => assert_eq!(current, previous),
            }
            assert_food_disjoint(&state);

            if !state.is_running() {
                state.reset();
            }
            previous = (state.snake().len(), state.score());
        }
    }

    #[test]
    fn test_food_invariant_with_rejection_sampling() {
        let config = GameConfig {
            food_placement: FoodPlacement::Rejection,
            ..seeded(4, 4)
        };
        let mut state = GameState::new(&config).unwrap();

        // sweep the board in a serpentine so food is eaten regularly
        let plan = [
            Direction::Down,
            Direction::Left,
            Direction::Down,
            Direction::Right,
        ];
        let mut ticks = 0;
        while state.is_running() && ticks < 200 {
            if ticks % 3 == 2 {
                state.enqueue_turn(plan[(ticks / 3) % plan.len()]);
            }
            state.tick();
            assert_food_disjoint(&state);
            ticks += 1;
        }
    }

    #[test]
    fn test_with_snake_rejects_invalid_setups() {
        let config = seeded(5, 5);

        let off_board = Snake::new(Position::new(1, 1), Direction::Right, 3);
        assert!(GameState::with_snake(&config, off_board, None).is_err());

        let snake = Snake::new(Position::new(3, 3), Direction::Right, 2);
        assert!(GameState::with_snake(&config, snake.clone(), Some(Position::new(2, 3))).is_err());
        assert!(GameState::with_snake(&config, snake.clone(), Some(Position::new(5, 0))).is_err());

        let state = GameState::with_snake(&config, snake, None).unwrap();
        assert_food_disjoint(&state);
        assert!(state.food().is_some());
    }

    #[test]
    fn test_unplayable_config_rejected() {
        assert!(GameState::new(&GameConfig::new(0, 4)).is_err());
        assert!(GameState::new(&GameConfig::new(4, 0)).is_err());
        assert!(GameState::new(&GameConfig::new(MAX_GRID_SIDE + 1, 2)).is_err());
        assert!(GameState::new(&GameConfig::new(usize::MAX, 2)).is_err());

        let snake = Snake::new(Position::new(0, 0), Direction::Right, 1);
        assert!(GameState::with_snake(&GameConfig::new(0, 4), snake, None).is_err());
    }

    #[test]
    fn test_largest_board_starts_in_bounds() {
        let state = GameState::new(&seeded(MAX_GRID_SIDE, MAX_GRID_SIDE)).unwrap();
        assert!(state.in_bounds(state.snake().head()));
        assert_food_disjoint(&state);
    }

    #[test]
    fn test_with_snake_draws_no_discarded_food() {
        let config = seeded(6, 6);
        let snake = Snake::new(Position::new(2, 2), Direction::Right, 2);
        let mut state =
            GameState::with_snake(&config, snake, Some(Position::new(3, 2))).unwrap();

        assert_eq!(state.tick(), TickOutcome::Ate);

        // the first draw from the seeded RNG is the food placed after eating
        let mut fresh = StdRng::seed_from_u64(17);
        let expected = food::place(
            config.food_placement,
            state.snake().occupied(),
            6,
            6,
            &mut fresh,
        );
        assert_eq!(state.food(), expected);
    }

    #[test]
    fn test_same_seed_same_food() {
        let a = GameState::new(&seeded(20, 20)).unwrap();
        let b = GameState::new(&seeded(20, 20)).unwrap();
        assert_eq!(a.food(), b.food());
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let state = GameState::new(&seeded(8, 6)).unwrap();
        let snapshot = state.snapshot();

        assert_eq!(snapshot.width, 8);
        assert_eq!(snapshot.height, 6);
        assert_eq!(snapshot.head(), Some(Position::new(4, 3)));
        assert_eq!(snapshot.food, state.food());
        assert_eq!(snapshot.score, 0);
        assert_eq!(snapshot.status, RunStatus::Running);
    }
}

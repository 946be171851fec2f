use std::ops::Range;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::debug;

use super::config::{ConfigError, GameConfig};
use super::state::Position;

/// Random draws tried before scanning the grid for free cells
const SAMPLE_ATTEMPTS: usize = 64;

/// Picks food cells that the snake does not occupy
#[derive(Debug, Clone)]
pub struct FoodSpawner {
    rng: StdRng,
    region: Range<i32>,
    grid_size: i32,
}

impl FoodSpawner {
    /// Fails when the config leaves no cell to spawn on
    pub fn new(config: &GameConfig) -> Result<Self, ConfigError> {
        Self::with_rng(config, StdRng::from_entropy())
    }

    pub fn with_seed(config: &GameConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: &GameConfig, rng: StdRng) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            rng,
            region: config.spawn_range(),
            grid_size: config.grid_size as i32,
        })
    }

    /// Choose a free cell uniformly from the spawn region.
    ///
    /// Draws random cells first. If the snake keeps getting in the way the
    /// free cells are listed and one is picked from the list, widening to
    /// the whole grid when the region itself is full. `None` means the snake
    /// covers every cell.
    pub fn spawn(&mut self, occupied: &[Position]) -> Option<Position> {
        for _ in 0..SAMPLE_ATTEMPTS {
            let pos = Position::new(
                self.rng.gen_range(self.region.clone()),
                self.rng.gen_range(self.region.clone()),
            );
            if !occupied.contains(&pos) {
                return Some(pos);
            }
        }

        debug!(
            snake_len = occupied.len(),
            "Random food placement kept hitting the snake, scanning free cells"
        );
        let region = self.region.clone();
        if let Some(pos) = self.pick_free(region, occupied) {
            return Some(pos);
        }

        debug!("Spawn region is full, placing food anywhere on the grid");
        self.pick_free(0..self.grid_size, occupied)
    }

    fn pick_free(&mut self, range: Range<i32>, occupied: &[Position]) -> Option<Position> {
        let free: Vec<Position> = range
            .clone()
            .flat_map(|y| range.clone().map(move |x| Position::new(x, y)))
            .filter(|pos| !occupied.contains(pos))
            .collect();

        free.choose(&mut self.rng).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_cells(size: i32) -> Vec<Position> {
        (0..size)
            .flat_map(|y| (0..size).map(move |x| Position::new(x, y)))
            .collect()
    }

    #[test]
    fn test_food_never_on_snake() {
        let config = GameConfig::small();
        let mut spawner = FoodSpawner::with_seed(&config, 42).unwrap();
        let snake: Vec<Position> = (0..10).map(|x| Position::new(x, 4)).collect();

        for _ in 0..500 {
            let food = spawner.spawn(&snake).unwrap();
            assert!(!snake.contains(&food));
            assert!((0..10).contains(&food.x) && (0..10).contains(&food.y));
        }
    }

    #[test]
    fn test_food_stays_inside_margin() {
        let config = GameConfig {
            food_margin: 2,
            ..GameConfig::small()
        };
        let mut spawner = FoodSpawner::with_seed(&config, 3).unwrap();

        for _ in 0..500 {
            let food = spawner.spawn(&[Position::new(5, 5)]).unwrap();
            assert!((2..8).contains(&food.x), "x out of region: {:?}", food);
            assert!((2..8).contains(&food.y), "y out of region: {:?}", food);
        }
    }

    #[test]
    fn test_only_free_cell_is_found() {
        let config = GameConfig::small();
        let mut spawner = FoodSpawner::with_seed(&config, 9).unwrap();
        let free = Position::new(7, 3);
        let snake: Vec<Position> = all_cells(10).into_iter().filter(|p| *p != free).collect();

        assert_eq!(spawner.spawn(&snake), Some(free));
    }

    #[test]
    fn test_falls_back_outside_full_region() {
        let config = GameConfig {
            grid_size: 4,
            food_margin: 1,
            ..Default::default()
        };
        let mut spawner = FoodSpawner::with_seed(&config, 5).unwrap();
        // Fill the 2x2 spawn region in the middle
        let snake = vec![
            Position::new(1, 1),
            Position::new(2, 1),
            Position::new(2, 2),
            Position::new(1, 2),
        ];

        let food = spawner.spawn(&snake).unwrap();
        assert!(!snake.contains(&food));
        assert!((0..4).contains(&food.x) && (0..4).contains(&food.y));
    }

    #[test]
    fn test_rejects_config_without_spawn_region() {
        let config = GameConfig {
            grid_size: 4,
            food_margin: 2,
            ..Default::default()
        };

        assert!(matches!(
            FoodSpawner::with_seed(&config, 1),
            Err(ConfigError::MarginTooWide { .. })
        ));
        assert!(FoodSpawner::new(&config).is_err());
    }

    #[test]
    fn test_full_grid_has_no_food() {
        let config = GameConfig::new(3);
        let mut spawner = FoodSpawner::with_seed(&config, 1).unwrap();

        assert_eq!(spawner.spawn(&all_cells(3)), None);
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let config = GameConfig::default();
        let mut a = FoodSpawner::with_seed(&config, 11).unwrap();
        let mut b = FoodSpawner::with_seed(&config, 11).unwrap();
        let snake = [Position::new(10, 10)];

        for _ in 0..20 {
            assert_eq!(a.spawn(&snake), b.spawn(&snake));
        }
    }
}

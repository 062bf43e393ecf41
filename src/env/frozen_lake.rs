//! Frozen lake grid world.
//!
//! The agent walks from the start tile to the goal across frozen tiles while
//! avoiding holes. On a slippery lake a move may slide sideways.

use super::{DiscreteAction, Environment, Step};
use crate::error::ConfigError;
use rand::Rng;

const MAP_4X4: [&str; 4] = ["SFFF", "FHFH", "FFFH", "HFFG"];

const MAP_8X8: [&str; 8] = [
    "SFFFFFFF", "FFFFFFFF", "FFFHFFFF", "FFFFFHFF", "FFFHFFFF", "FHHFFFHF", "FHFFHFHF",
    "FFFHFFFG",
];

/// Upper bound on map generation attempts.
const MAX_GENERATION_ATTEMPTS: usize = 10_000;

/// Smallest side length of a random lake.
pub const MIN_RANDOM_SIZE: usize = 2;
/// Largest side length of a random lake.
pub const MAX_RANDOM_SIZE: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tile {
    Start,
    Frozen,
    Hole,
    Goal,
}

impl Tile {
    fn from_char(c: char) -> Option<Self> {
        match c {
            'S' => Some(Tile::Start),
            'F' => Some(Tile::Frozen),
            'H' => Some(Tile::Hole),
            'G' => Some(Tile::Goal),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Tile::Start => 'S',
            Tile::Frozen => 'F',
            Tile::Hole => 'H',
            Tile::Goal => 'G',
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Tile::Hole | Tile::Goal)
    }
}

/// Which lake to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapSpec {
    Preset4x4,
    Preset8x8,
    Random { size: usize },
}

impl MapSpec {
    /// Parses `4x4`, `8x8` or `random`.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown names or a random size outside
    /// `MIN_RANDOM_SIZE..=MAX_RANDOM_SIZE`.
    pub fn parse(name: &str, random_size: usize) -> Result<Self, ConfigError> {
        match name.trim().to_lowercase().as_str() {
            "4x4" => Ok(MapSpec::Preset4x4),
            "8x8" => Ok(MapSpec::Preset8x8),
            "random" if (MIN_RANDOM_SIZE..=MAX_RANDOM_SIZE).contains(&random_size) => {
                Ok(MapSpec::Random { size: random_size })
            }
            "random" => Err(ConfigError::InvalidMap(format!(
                "random maps need a size between {MIN_RANDOM_SIZE} and {MAX_RANDOM_SIZE}, \
                 got {random_size}"
            ))),
            other => Err(ConfigError::InvalidMap(format!(
                "unknown map '{other}' (expected 4x4, 8x8 or random)"
            ))),
        }
    }

    /// Short name used in model file names.
    pub fn slug(self) -> String {
        match self {
            MapSpec::Preset4x4 => "4x4".to_string(),
            MapSpec::Preset8x8 => "8x8".to_string(),
            MapSpec::Random { size } => format!("random{size}x{size}"),
        }
    }

    /// Builds the lake layout.
    pub fn build<R: Rng>(self, frozen_probability: f64, rng: &mut R) -> LakeMap {
        match self {
            MapSpec::Preset4x4 => LakeMap::preset(&MAP_4X4),
            MapSpec::Preset8x8 => LakeMap::preset(&MAP_8X8),
            MapSpec::Random { size } => LakeMap::generate(size, frozen_probability, rng),
        }
    }
}

/// A rectangular lake layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LakeMap {
    rows: usize,
    cols: usize,
    tiles: Vec<Tile>,
}

impl LakeMap {
    /// Parses rows of `S`, `F`, `H` and `G`.
    ///
    /// # Errors
    ///
    /// Returns an error for ragged rows, unknown tiles, or a missing or
    /// repeated start tile.
    pub fn parse<S: AsRef<str>>(rows: &[S]) -> Result<Self, ConfigError> {
        let cols = rows.first().map_or(0, |r| r.as_ref().len());
        if rows.is_empty() || cols == 0 {
            return Err(ConfigError::InvalidMap("map is empty".to_string()));
        }

        let mut tiles = Vec::with_capacity(rows.len() * cols);
        for (i, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != cols {
                return Err(ConfigError::InvalidMap(format!(
                    "row {i} has {} tiles, expected {cols}",
                    row.len()
                )));
            }
            for c in row.chars() {
                let tile = Tile::from_char(c)
                    .ok_or_else(|| ConfigError::InvalidMap(format!("unknown tile '{c}'")))?;
                tiles.push(tile);
            }
        }

        let starts = tiles.iter().filter(|t| **t == Tile::Start).count();
        if starts != 1 {
            return Err(ConfigError::InvalidMap(format!(
                "map needs exactly one start tile, found {starts}"
            )));
        }
        if !tiles.contains(&Tile::Goal) {
            return Err(ConfigError::InvalidMap("map has no goal tile".to_string()));
        }

        Ok(Self {
            rows: rows.len(),
            cols,
            tiles,
        })
    }

    /// Parses the compact `SFFF/FHFH/...` form stored alongside models.
    pub fn from_layout(layout: &str) -> Result<Self, ConfigError> {
        let rows: Vec<&str> = layout.split('/').collect();
        Self::parse(&rows)
    }

    /// Compact `SFFF/FHFH/...` form.
    pub fn layout(&self) -> String {
        self.row_strings().join("/")
    }

    pub fn row_strings(&self) -> Vec<String> {
        self.tiles
            .chunks(self.cols)
            .map(|row| row.iter().map(|t| t.as_char()).collect())
            .collect()
    }

    fn preset(rows: &[&str]) -> Self {
        let cols = rows[0].len();
        let tiles = rows
            .iter()
            .flat_map(|r| r.chars())
            .filter_map(Tile::from_char)
            .collect();
        Self {
            rows: rows.len(),
            cols,
            tiles,
        }
    }

    /// Generates a random `size`×`size` lake with a guaranteed path from the
    /// top-left start to the bottom-right goal.
    pub fn generate<R: Rng>(size: usize, frozen_probability: f64, rng: &mut R) -> Self {
        let size = size.clamp(MIN_RANDOM_SIZE, MAX_RANDOM_SIZE);
        let p = frozen_probability.clamp(0.0, 1.0);

        for _ in 0..MAX_GENERATION_ATTEMPTS {
            let mut tiles: Vec<Tile> = (0..size * size)
                .map(|_| {
                    if rng.random_bool(p) {
                        Tile::Frozen
                    } else {
                        Tile::Hole
                    }
                })
                .collect();
            tiles[0] = Tile::Start;
            tiles[size * size - 1] = Tile::Goal;

            let map = Self {
                rows: size,
                cols: size,
                tiles,
            };
            if map.is_solvable() {
                return map;
            }
        }

        // Open lake as a last resort for pathological probabilities.
        tracing::warn!(size, p, "map generation gave up, using an open lake");
        let mut tiles = vec![Tile::Frozen; size * size];
        tiles[0] = Tile::Start;
        tiles[size * size - 1] = Tile::Goal;
        Self {
            rows: size,
            cols: size,
            tiles,
        }
    }

    /// Depth-first search from the start over non-hole tiles.
    pub fn is_solvable(&self) -> bool {
        let mut visited = vec![false; self.tiles.len()];
        let mut frontier = vec![self.start()];

        while let Some(cell) = frontier.pop() {
            if visited[cell] {
                continue;
            }
            visited[cell] = true;

            let (row, col) = self.coords(cell);
            for mv in Move::ALL {
                let next = self.neighbour(row, col, mv);
                match self.tiles[next] {
                    Tile::Goal => return true,
                    Tile::Hole => {}
                    _ if !visited[next] => frontier.push(next),
                    _ => {}
                }
            }
        }
        false
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn n_states(&self) -> usize {
        self.tiles.len()
    }

    pub fn tile(&self, state: usize) -> Tile {
        self.tiles[state]
    }

    pub fn start(&self) -> usize {
        self.tiles
            .iter()
            .position(|t| *t == Tile::Start)
            .unwrap_or(0)
    }

    pub fn coords(&self, state: usize) -> (usize, usize) {
        (state / self.cols, state % self.cols)
    }

    /// Cell reached by moving once from `(row, col)`, clamped at the border.
    fn neighbour(&self, row: usize, col: usize, mv: Move) -> usize {
        let (row, col) = match mv {
            Move::Left => (row, col.saturating_sub(1)),
            Move::Down => ((row + 1).min(self.rows - 1), col),
            Move::Right => (row, (col + 1).min(self.cols - 1)),
            Move::Up => (row.saturating_sub(1), col),
        };
        row * self.cols + col
    }

    /// Default episode length limit for a lake of this size.
    pub fn default_max_steps(&self) -> usize {
        if self.rows.max(self.cols) <= 4 {
            100
        } else {
            200
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    Left,
    Down,
    Right,
    Up,
}

impl Move {
    pub const ALL: [Move; 4] = [Move::Left, Move::Down, Move::Right, Move::Up];

    /// The two moves at right angles to this one.
    fn perpendicular(self) -> [Move; 2] {
        let i = self.index();
        [Move::from_index(i + 3), Move::from_index(i + 1)]
    }

    pub fn arrow(self) -> char {
        match self {
            Move::Left => '←',
            Move::Down => '↓',
            Move::Right => '→',
            Move::Up => '↑',
        }
    }
}

impl DiscreteAction for Move {
    const COUNT: usize = 4;

    fn index(self) -> usize {
        match self {
            Move::Left => 0,
            Move::Down => 1,
            Move::Right => 2,
            Move::Up => 3,
        }
    }

    fn from_index(index: usize) -> Self {
        Move::ALL[index % Self::COUNT]
    }
}

#[derive(Debug, Clone)]
pub struct FrozenLake {
    map: LakeMap,
    slippery: bool,
    position: usize,
    steps: usize,
    max_steps: usize,
    last_move: Option<Move>,
}

impl FrozenLake {
    pub fn new(map: LakeMap, slippery: bool) -> Self {
        let max_steps = map.default_max_steps();
        let position = map.start();
        Self {
            map,
            slippery,
            position,
            steps: 0,
            max_steps,
            last_move: None,
        }
    }

    pub fn map(&self) -> &LakeMap {
        &self.map
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn is_slippery(&self) -> bool {
        self.slippery
    }

    /// The move actually taken on the last step, after any slide.
    pub fn last_move(&self) -> Option<Move> {
        self.last_move
    }
}

impl Environment for FrozenLake {
    type Observation = usize;
    type Action = Move;

    fn reset<R: Rng>(&mut self, _rng: &mut R) -> usize {
        self.position = self.map.start();
        self.steps = 0;
        self.last_move = None;
        self.position
    }

    fn step<R: Rng>(&mut self, action: Move, rng: &mut R) -> Step<usize> {
        let actual = if self.slippery {
            let [left, right] = action.perpendicular();
            match rng.random_range(0..3) {
                0 => left,
                1 => action,
                _ => right,
            }
        } else {
            action
        };

        let (row, col) = self.map.coords(self.position);
        self.position = self.map.neighbour(row, col, actual);
        self.steps += 1;
        self.last_move = Some(actual);

        let tile = self.map.tile(self.position);
        let terminated = tile.is_terminal();

        Step {
            observation: self.position,
            reward: if tile == Tile::Goal { 1.0 } else { 0.0 },
            terminated,
            truncated: !terminated && self.steps >= self.max_steps,
        }
    }

    fn is_success(step: &Step<usize>) -> bool {
        step.terminated && step.reward > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn lake_4x4(slippery: bool) -> FrozenLake {
        FrozenLake::new(LakeMap::preset(&MAP_4X4), slippery)
    }

    #[test]
    fn test_moves_clamp_at_border() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut env = lake_4x4(false);
        env.reset(&mut rng);
        assert_eq!(env.step(Move::Left, &mut rng).observation, 0);
        assert_eq!(env.step(Move::Up, &mut rng).observation, 0);
        assert_eq!(env.step(Move::Right, &mut rng).observation, 1);
    }

    #[test]
    fn test_hole_terminates_without_reward() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut env = lake_4x4(false);
        env.reset(&mut rng);
        env.step(Move::Down, &mut rng);
        let step = env.step(Move::Right, &mut rng);
        assert_eq!(step.observation, 5);
        assert!(step.terminated);
        assert!(step.reward.abs() < f64::EPSILON);
        assert!(!FrozenLake::is_success(&step));
    }

    #[test]
    fn test_goal_path_rewards_one() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut env = lake_4x4(false);
        env.reset(&mut rng);
        let path = [
            Move::Down,
            Move::Down,
            Move::Right,
            Move::Right,
            Move::Down,
            Move::Right,
        ];
        let mut last = None;
        for mv in path {
            last = Some(env.step(mv, &mut rng));
        }
        let last = last.unwrap();
        assert_eq!(last.observation, 15);
        assert!(last.terminated);
        assert!((last.reward - 1.0).abs() < f64::EPSILON);
        assert!(FrozenLake::is_success(&last));
    }

    #[test]
    fn test_slippery_moves_stay_perpendicular() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut env = lake_4x4(true);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..300 {
            env.reset(&mut rng);
            // From the start, Right can slide Up (stay) or Down.
            env.step(Move::Right, &mut rng);
            let taken = env.last_move().unwrap();
            assert_ne!(taken, Move::Left);
            seen.insert(taken);
        }
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn test_truncates_after_limit() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut env = lake_4x4(false);
        env.reset(&mut rng);
        for i in 1..=100 {
            let step = env.step(Move::Up, &mut rng);
            assert_eq!(step.truncated, i == 100);
        }
    }

    #[test]
    fn test_generated_maps_are_solvable() {
        let mut rng = StdRng::seed_from_u64(9);
        for size in [3, 5, 8] {
            for _ in 0..20 {
                let map = LakeMap::generate(size, 0.6, &mut rng);
                assert_eq!(map.rows(), size);
                assert_eq!(map.tile(0), Tile::Start);
                assert_eq!(map.tile(size * size - 1), Tile::Goal);
                assert!(map.is_solvable());
            }
        }
    }

    #[test]
    fn test_generated_size_is_bounded() {
        let mut rng = StdRng::seed_from_u64(3);
        let map = LakeMap::generate(100_000, 0.8, &mut rng);
        assert_eq!(map.rows(), MAX_RANDOM_SIZE);
        assert_eq!(map.n_states(), MAX_RANDOM_SIZE * MAX_RANDOM_SIZE);
    }

    #[test]
    fn test_unsolvable_map_detected() {
        let map = LakeMap::parse(&["SH", "HG"]).unwrap();
        assert!(!map.is_solvable());
        assert!(LakeMap::preset(&MAP_8X8).is_solvable());
    }

    #[test]
    fn test_layout_round_trip() {
        let map = LakeMap::preset(&MAP_4X4);
        assert_eq!(map.layout(), "SFFF/FHFH/FFFH/HFFG");
        assert_eq!(LakeMap::from_layout(&map.layout()).unwrap(), map);
    }

    #[test]
    fn test_parse_rejects_bad_maps() {
        assert!(LakeMap::parse(&["SFX"]).is_err());
        assert!(LakeMap::parse(&["SF", "F"]).is_err());
        assert!(LakeMap::parse(&["FF", "FG"]).is_err());
        assert!(LakeMap::parse(&["SF", "FF"]).is_err());
    }

    #[test]
    fn test_map_spec_parse() {
        assert_eq!(MapSpec::parse("4x4", 8).unwrap(), MapSpec::Preset4x4);
        assert_eq!(MapSpec::parse(" 8X8 ", 8).unwrap(), MapSpec::Preset8x8);
        assert_eq!(
            MapSpec::parse("random", 6).unwrap(),
            MapSpec::Random { size: 6 }
        );
        assert!(MapSpec::parse("random", 1).is_err());
        assert_eq!(
            MapSpec::parse("random", MAX_RANDOM_SIZE).unwrap(),
            MapSpec::Random {
                size: MAX_RANDOM_SIZE
            }
        );
        assert!(MapSpec::parse("random", MAX_RANDOM_SIZE + 1).is_err());
        assert!(MapSpec::parse("random", 100_000).is_err());
        assert!(MapSpec::parse("16x16", 8).is_err());
        assert_eq!(MapSpec::Random { size: 6 }.slug(), "random6x6");
    }
}

//! Maze layout, patrol path and route finding
//!
//! Cells are addressed as `IVec2 { x: column, y: row }` with y growing down.

use std::collections::VecDeque;

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::manhattan;

/// Built-in maze
pub const DEFAULT_LAYOUT: [&str; 13] = [
    "################",
    "#S.....#.......#",
    "#.###.###.###..#",
    "#...#.....#....#",
    "###.#.#####.####",
    "#...#...#......#",
    "#.#####.#.####.#",
    "#.....#.#.#....#",
    "#.###.#.#.#.##.#",
    "#.#...#...#..#.#",
    "#.#.#######.#..#",
    "#...#.....#.#G.#",
    "################",
];

/// Patrol cells must be at least this far from the goal...
const PATROL_MIN_GOAL_DIST: i32 = 2;
/// ...at most this far from the goal...
const PATROL_MAX_GOAL_DIST: i32 = 4;
/// ...and at least this far from the start
const PATROL_MIN_START_DIST: i32 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    Wall,
    Open,
}

/// Cardinal move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit step in grid coordinates
    pub fn delta(self) -> IVec2 {
        match self {
            Direction::Up => IVec2::NEG_Y,
            Direction::Down => IVec2::Y,
            Direction::Left => IVec2::NEG_X,
            Direction::Right => IVec2::X,
        }
    }

    /// Map a keyboard `key` value (arrows or WASD)
    pub fn from_key(key: &str) -> Option<Self> {
        match key.to_lowercase().as_str() {
            "arrowup" | "w" => Some(Direction::Up),
            "arrowdown" | "s" => Some(Direction::Down),
            "arrowleft" | "a" => Some(Direction::Left),
            "arrowright" | "d" => Some(Direction::Right),
            _ => None,
        }
    }
}

/// A rectangular maze with one start and one goal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grid {
    cols: i32,
    rows: i32,
    /// Row-major
    cells: Vec<Cell>,
    start: IVec2,
    goal: IVec2,
}

impl Default for Grid {
    fn default() -> Self {
        Self::parse(&DEFAULT_LAYOUT)
    }
}

impl Grid {
    /// Build a grid from text rows: `#` wall, `S` start, `G` goal, anything else open
    ///
    /// Never fails. Ragged rows are padded with walls, a missing start or goal
    /// is guessed, and an empty layout falls back to [`DEFAULT_LAYOUT`].
    pub fn parse<S: AsRef<str>>(layout: &[S]) -> Self {
        let width = layout
            .iter()
            .map(|row| row.as_ref().chars().count())
            .max()
            .unwrap_or(0);
        if width == 0 {
            log::warn!("Empty maze layout, using the built-in maze");
            return Self::parse(&DEFAULT_LAYOUT);
        }

        let cols = width as i32;
        let rows = layout.len() as i32;
        let mut cells = Vec::with_capacity(width * layout.len());
        let mut start = None;
        let mut goal = None;
        let mut ragged = false;

        for (y, row) in layout.iter().enumerate() {
            let mut len = 0;
            for (x, ch) in row.as_ref().chars().enumerate() {
                let pos = IVec2::new(x as i32, y as i32);
                let cell = match ch {
                    '#' => Cell::Wall,
                    'S' => {
                        if start.is_some() {
                            log::warn!("Extra maze start at {pos}, treating as open");
                        } else {
                            start = Some(pos);
                        }
                        Cell::Open
                    }
                    'G' => {
                        if goal.is_some() {
                            log::warn!("Extra maze goal at {pos}, treating as open");
                        } else {
                            goal = Some(pos);
                        }
                        Cell::Open
                    }
                    _ => Cell::Open,
                };
                cells.push(cell);
                len += 1;
            }
            if len < width {
                ragged = true;
                cells.extend(std::iter::repeat_n(Cell::Wall, width - len));
            }
        }
        if ragged {
            log::warn!("Ragged maze rows padded with walls to width {width}");
        }

        let last = IVec2::new(cols - 1, rows - 1);
        let start = start.unwrap_or_else(|| {
            let guess = IVec2::ONE.min(last);
            log::warn!("Maze has no start, guessing {guess}");
            guess
        });
        let goal = goal.unwrap_or_else(|| {
            let guess = (last - IVec2::ONE).max(IVec2::ZERO);
            log::warn!("Maze has no goal, guessing {guess}");
            guess
        });

        let mut grid = Self {
            cols,
            rows,
            cells,
            start,
            goal,
        };
        // Guessed cells may land on walls; the player must always stand on open ground
        for pos in [start, goal] {
            if let Some(i) = grid.index(pos) {
                if grid.cells[i] == Cell::Wall {
                    log::warn!("Carving maze cell {pos} open");
                    grid.cells[i] = Cell::Open;
                }
            }
        }
        grid
    }

    #[inline]
    pub fn cols(&self) -> i32 {
        self.cols
    }

    #[inline]
    pub fn rows(&self) -> i32 {
        self.rows
    }

    #[inline]
    pub fn start(&self) -> IVec2 {
        self.start
    }

    #[inline]
    pub fn goal(&self) -> IVec2 {
        self.goal
    }

    pub fn in_bounds(&self, pos: IVec2) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.cols && pos.y < self.rows
    }

    fn index(&self, pos: IVec2) -> Option<usize> {
        self.in_bounds(pos)
            .then(|| (pos.y * self.cols + pos.x) as usize)
    }

    /// Cell at `pos`, `None` outside the grid
    pub fn cell(&self, pos: IVec2) -> Option<Cell> {
        self.index(pos).map(|i| self.cells[i])
    }

    /// Inside the grid and not a wall
    pub fn is_open(&self, pos: IVec2) -> bool {
        self.cell(pos) == Some(Cell::Open)
    }

    /// All open cells in row-major order
    pub fn open_cells(&self) -> impl Iterator<Item = IVec2> + '_ {
        (0..self.rows)
            .flat_map(move |y| (0..self.cols).map(move |x| IVec2::new(x, y)))
            .filter(|&pos| self.is_open(pos))
    }
}

/// Cells the patrol cycles through: open cells a short walk from the goal
/// and well away from the start, in row-major order
///
/// Falls back to a single cell two columns left of the goal when nothing qualifies.
pub fn patrol_path(grid: &Grid) -> Vec<IVec2> {
    let start = grid.start();
    let goal = grid.goal();

    let candidates: Vec<IVec2> = grid
        .open_cells()
        .filter(|&pos| pos != start && pos != goal)
        .filter(|&pos| {
            let to_goal = manhattan(pos, goal);
            (PATROL_MIN_GOAL_DIST..=PATROL_MAX_GOAL_DIST).contains(&to_goal)
                && manhattan(pos, start) >= PATROL_MIN_START_DIST
        })
        .collect();

    if candidates.is_empty() {
        vec![IVec2::new((goal.x - 2).max(1), goal.y)]
    } else {
        candidates
    }
}

/// Breadth-first shortest route between two open cells (patrol ignored)
pub fn shortest_route(grid: &Grid, from: IVec2, to: IVec2) -> Option<Vec<Direction>> {
    if !grid.is_open(from) || !grid.is_open(to) {
        return None;
    }

    let idx = |pos: IVec2| (pos.y * grid.cols() + pos.x) as usize;
    let mut came_from: Vec<Option<(IVec2, Direction)>> =
        vec![None; (grid.cols() * grid.rows()) as usize];
    let mut seen = vec![false; came_from.len()];
    let mut queue = VecDeque::from([from]);
    seen[idx(from)] = true;

    while let Some(pos) = queue.pop_front() {
        if pos == to {
            let mut route = Vec::new();
            let mut cur = to;
            while let Some((prev, dir)) = came_from[idx(cur)] {
                route.push(dir);
                cur = prev;
            }
            route.reverse();
            return Some(route);
        }
        for dir in Direction::ALL {
            let next = pos + dir.delta();
            if grid.is_open(next) && !seen[idx(next)] {
                seen[idx(next)] = true;
                came_from[idx(next)] = Some((pos, dir));
                queue.push_back(next);
            }
        }
    }
    None
}

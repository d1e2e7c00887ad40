//! Procedural Maze Generation
//!
//! Square grid of cells carved into a spanning tree with an iterative
//! depth-first search, then opened up: one entrance on the top row, one
//! exit on the bottom row, and a fraction of interior walls removed to
//! create loops.
//!
//! World mapping: the maze occupies x in [-w/2, w/2] and z in [-w, 0]
//! where w = size * cell_size. Row 0 sits nearest z = 0 (the entrance
//! side), row size-1 nearest z = -w (the exit side). The floor is the
//! y = 0 plane.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::MazeConfig;
use crate::core::aabb::Aabb;
use crate::core::rng::GameRng;

/// One of a cell's four walls.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Wall {
    /// Toward z = 0 (smaller row index).
    Top = 0,
    /// Toward +x (larger column index).
    Right = 1,
    /// Toward -z (larger row index).
    Bottom = 2,
    /// Toward -x (smaller column index).
    Left = 3,
}

impl Wall {
    /// All four walls, in top/right/bottom/left order.
    pub const ALL: [Wall; 4] = [Wall::Top, Wall::Right, Wall::Bottom, Wall::Left];

    /// The matching wall on the neighboring cell.
    pub fn opposite(self) -> Wall {
        match self {
            Wall::Top => Wall::Bottom,
            Wall::Right => Wall::Left,
            Wall::Bottom => Wall::Top,
            Wall::Left => Wall::Right,
        }
    }

    /// Grid offset of the neighbor behind this wall.
    pub fn delta(self) -> (isize, isize) {
        match self {
            Wall::Top => (0, -1),
            Wall::Right => (1, 0),
            Wall::Bottom => (0, 1),
            Wall::Left => (-1, 0),
        }
    }
}

/// A single grid cell and its wall flags.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct MazeCell {
    walls: [bool; 4],
    visited: bool,
}

impl MazeCell {
    fn closed() -> Self {
        Self {
            walls: [true; 4],
            visited: false,
        }
    }

    /// Is the given wall present?
    pub fn has_wall(&self, wall: Wall) -> bool {
        self.walls[wall as usize]
    }
}

/// A generated maze with its world-space dimensions.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Maze {
    size: usize,
    cell_size: f32,
    wall_height: f32,
    wall_thickness: f32,
    cells: Vec<MazeCell>,
    entrance_col: usize,
    exit_col: usize,
    walls: Vec<Aabb>,
}

impl Maze {
    /// Carve a new maze from the configuration and RNG.
    pub fn generate(config: &MazeConfig, rng: &mut GameRng) -> Maze {
        let size = config.size;
        let mut maze = Maze {
            size,
            cell_size: config.cell_size,
            wall_height: config.wall_height,
            wall_thickness: config.wall_thickness,
            cells: vec![MazeCell::closed(); size * size],
            entrance_col: 0,
            exit_col: 0,
            walls: Vec::new(),
        };

        maze.carve(rng);

        // Entrance and exit punch through the outer boundary, so they
        // have no paired cell to mirror into.
        maze.entrance_col = rng.index(size);
        maze.exit_col = rng.index(size);
        maze.cell_mut(maze.entrance_col, 0).walls[Wall::Top as usize] = false;
        maze.cell_mut(maze.exit_col, size - 1).walls[Wall::Bottom as usize] = false;

        maze.open_extra(config.extra_opening_fraction, rng);
        maze.walls = maze.build_wall_segments();

        debug!(
            size,
            entrance_col = maze.entrance_col,
            exit_col = maze.exit_col,
            wall_boxes = maze.walls.len(),
            "maze generated"
        );
        maze
    }

    /// Iterative DFS over the grid, removing the shared wall pair each
    /// time an unvisited neighbor is entered. Produces a spanning tree.
    fn carve(&mut self, rng: &mut GameRng) {
        let start = (rng.index(self.size), rng.index(self.size));
        self.cell_mut(start.0, start.1).visited = true;

        let mut stack = vec![start];
        while let Some(&(i, j)) = stack.last() {
            let mut dirs = Wall::ALL;
            rng.shuffle(&mut dirs);

            let next = dirs.iter().find_map(|&wall| {
                let (ni, nj) = self.neighbor(i, j, wall)?;
                (!self.cell(ni, nj).visited).then_some((wall, ni, nj))
            });

            match next {
                Some((wall, ni, nj)) => {
                    self.open_between(i, j, wall);
                    self.cell_mut(ni, nj).visited = true;
                    stack.push((ni, nj));
                }
                None => {
                    stack.pop();
                }
            }
        }
    }

    /// Attempt budget for [`Self::open_extra`]: `fraction` of the
    /// interior wall count. An n x n grid has `2n(n-1)` interior walls.
    fn extra_opening_attempts(size: usize, fraction: f32) -> usize {
        ((2 * size * (size - 1)) as f32 * fraction) as usize
    }

    /// Remove roughly `fraction` of the interior walls to introduce
    /// loops. Removal only opens passages, so connectivity is
    /// preserved.
    fn open_extra(&mut self, fraction: f32, rng: &mut GameRng) {
        let attempts = Self::extra_opening_attempts(self.size, fraction);
        for _ in 0..attempts {
            let i = rng.index(self.size);
            let j = rng.index(self.size);
            let wall = if rng.chance(0.5) {
                Wall::Right
            } else {
                Wall::Bottom
            };
            if self.neighbor(i, j, wall).is_some() && self.cell(i, j).has_wall(wall) {
                self.open_between(i, j, wall);
            }
        }
    }

    /// Clear a wall and its mirror on the neighboring cell. The only
    /// way interior wall flags are ever mutated, which keeps the two
    /// sides in agreement.
    fn open_between(&mut self, i: usize, j: usize, wall: Wall) {
        let (ni, nj) = match self.neighbor(i, j, wall) {
            Some(n) => n,
            None => return,
        };
        self.cell_mut(i, j).walls[wall as usize] = false;
        self.cell_mut(ni, nj).walls[wall.opposite() as usize] = false;
    }

    fn neighbor(&self, i: usize, j: usize, wall: Wall) -> Option<(usize, usize)> {
        let (di, dj) = wall.delta();
        let ni = i.checked_add_signed(di)?;
        let nj = j.checked_add_signed(dj)?;
        (ni < self.size && nj < self.size).then_some((ni, nj))
    }

    fn cell(&self, i: usize, j: usize) -> &MazeCell {
        &self.cells[j * self.size + i]
    }

    fn cell_mut(&mut self, i: usize, j: usize) -> &mut MazeCell {
        &mut self.cells[j * self.size + i]
    }

    /// Grid dimension.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Side length of one cell.
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Entrance column on row 0.
    pub fn entrance_col(&self) -> usize {
        self.entrance_col
    }

    /// Exit column on the last row.
    pub fn exit_col(&self) -> usize {
        self.exit_col
    }

    /// Wall flags of a cell. Panics on out-of-range indices.
    pub fn cell_at(&self, i: usize, j: usize) -> &MazeCell {
        self.cell(i, j)
    }

    /// World-space center of a cell, on the floor plane.
    pub fn cell_center(&self, i: usize, j: usize) -> Vec3 {
        let half_w = self.world_width() * 0.5;
        Vec3::new(
            -half_w + (i as f32 + 0.5) * self.cell_size,
            0.0,
            -(j as f32 + 0.5) * self.cell_size,
        )
    }

    /// Cell containing a world position, if inside the grid footprint.
    pub fn cell_of(&self, pos: Vec3) -> Option<(usize, usize)> {
        let half_w = self.world_width() * 0.5;
        let fi = (pos.x + half_w) / self.cell_size;
        let fj = -pos.z / self.cell_size;
        if fi < 0.0 || fj < 0.0 {
            return None;
        }
        let (i, j) = (fi as usize, fj as usize);
        (i < self.size && j < self.size).then_some((i, j))
    }

    /// Total world-space side length of the maze.
    pub fn world_width(&self) -> f32 {
        self.size as f32 * self.cell_size
    }

    /// Collision boxes for every present wall.
    ///
    /// Each cell contributes its top and right walls; the bottom row
    /// adds bottom walls and the first column adds left walls, so each
    /// physical wall appears exactly once.
    pub fn wall_segments(&self) -> &[Aabb] {
        &self.walls
    }

    fn build_wall_segments(&self) -> Vec<Aabb> {
        let mut out = Vec::new();
        let c = self.cell_size;
        let t = self.wall_thickness;
        let h = self.wall_height;
        let across = Vec3::new(c, h, t);
        let along = Vec3::new(t, h, c);

        for j in 0..self.size {
            for i in 0..self.size {
                let center = self.cell_center(i, j) + Vec3::new(0.0, h * 0.5, 0.0);
                let cell = self.cell(i, j);
                if cell.has_wall(Wall::Top) {
                    out.push(Aabb::from_center_size(
                        center + Vec3::new(0.0, 0.0, c * 0.5),
                        across,
                    ));
                }
                if cell.has_wall(Wall::Right) {
                    out.push(Aabb::from_center_size(
                        center + Vec3::new(c * 0.5, 0.0, 0.0),
                        along,
                    ));
                }
                if j == self.size - 1 && cell.has_wall(Wall::Bottom) {
                    out.push(Aabb::from_center_size(
                        center + Vec3::new(0.0, 0.0, -c * 0.5),
                        across,
                    ));
                }
                if i == 0 && cell.has_wall(Wall::Left) {
                    out.push(Aabb::from_center_size(
                        center + Vec3::new(-c * 0.5, 0.0, 0.0),
                        along,
                    ));
                }
            }
        }
        out
    }

    /// Does the given footprint stay clear of every wall box?
    pub fn footprint_clear(&self, volume: &Aabb) -> bool {
        !self.walls.iter().any(|w| w.intersects(volume))
    }

    /// Where the player drops in: above the entrance cell.
    pub fn spawn_point(&self) -> Vec3 {
        let c = self.cell_center(self.entrance_col, 0);
        Vec3::new(c.x, 10.0, c.z)
    }

    /// Detection volume over the goal pad in the exit cell, expanded
    /// for forgiving detection.
    pub fn goal_volume(&self) -> Aabb {
        let c = self.cell_size;
        let exit = self.cell_center(self.exit_col, self.size - 1);
        let center = Vec3::new(exit.x, 0.1, exit.z);
        Aabb::from_center_size(center, Vec3::new(c, 0.2, c)).expanded(1.5)
    }

    /// Bonus volume around the marker at the center of the map.
    pub fn midpoint_volume(&self) -> Aabb {
        let w = self.world_width();
        Aabb::from_sphere(Vec3::new(0.0, 1.5, -w * 0.5), 1.0).expanded(1.5)
    }

    /// Flood fill through open walls, counting reachable cells.
    pub fn reachable_from(&self, i: usize, j: usize) -> usize {
        let mut seen = vec![false; self.size * self.size];
        let mut stack = vec![(i, j)];
        seen[j * self.size + i] = true;
        let mut count = 0;

        while let Some((ci, cj)) = stack.pop() {
            count += 1;
            for wall in Wall::ALL {
                if self.cell(ci, cj).has_wall(wall) {
                    continue;
                }
                if let Some((ni, nj)) = self.neighbor(ci, cj, wall) {
                    if !seen[nj * self.size + ni] {
                        seen[nj * self.size + ni] = true;
                        stack.push((ni, nj));
                    }
                }
            }
        }
        count
    }

    /// Is a world position inside the playable region?
    ///
    /// Horizontal slack of `buffer` extends past the walls on every
    /// side; below `floor_y` the position counts as fallen out.
    pub fn in_bounds(&self, pos: Vec3, buffer: f32, floor_y: f32) -> bool {
        let half_w = self.world_width() * 0.5;
        let w = self.world_width();
        pos.x > -half_w - buffer
            && pos.x < half_w + buffer
            && pos.z > -w - buffer
            && pos.z < buffer
            && pos.y > floor_y
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn gen_maze(size: usize, seed: u64) -> Maze {
        let config = MazeConfig {
            size,
            ..MazeConfig::default()
        };
        Maze::generate(&config, &mut GameRng::new(seed))
    }

    fn assert_wall_symmetry(maze: &Maze) {
        let n = maze.size();
        for j in 0..n {
            for i in 0..n {
                if i + 1 < n {
                    assert_eq!(
                        maze.cell_at(i, j).has_wall(Wall::Right),
                        maze.cell_at(i + 1, j).has_wall(Wall::Left),
                        "right/left mismatch at ({i}, {j})"
                    );
                }
                if j + 1 < n {
                    assert_eq!(
                        maze.cell_at(i, j).has_wall(Wall::Bottom),
                        maze.cell_at(i, j + 1).has_wall(Wall::Top),
                        "bottom/top mismatch at ({i}, {j})"
                    );
                }
            }
        }
    }

    fn open_interior_pairs(maze: &Maze) -> usize {
        let n = maze.size();
        let mut count = 0;
        for j in 0..n {
            for i in 0..n {
                if i + 1 < n && !maze.cell_at(i, j).has_wall(Wall::Right) {
                    count += 1;
                }
                if j + 1 < n && !maze.cell_at(i, j).has_wall(Wall::Bottom) {
                    count += 1;
                }
            }
        }
        count
    }

    #[test]
    fn test_extra_opening_attempts_scale_with_interior_walls() {
        // A 15x15 grid has 2*15*14 = 420 interior walls
        assert_eq!(Maze::extra_opening_attempts(15, 0.1), 42);
        assert_eq!(Maze::extra_opening_attempts(15, 0.0), 0);
        assert_eq!(Maze::extra_opening_attempts(2, 0.5), 2);
    }

    #[test]
    fn test_extra_openings_add_loops() {
        let tree_only = Maze::generate(
            &MazeConfig {
                extra_opening_fraction: 0.0,
                ..MazeConfig::default()
            },
            &mut GameRng::new(21),
        );
        // A spanning tree over n^2 cells opens exactly n^2 - 1 walls
        assert_eq!(open_interior_pairs(&tree_only), 15 * 15 - 1);

        let with_loops = Maze::generate(
            &MazeConfig {
                extra_opening_fraction: 0.5,
                ..MazeConfig::default()
            },
            &mut GameRng::new(21),
        );
        assert!(open_interior_pairs(&with_loops) > 15 * 15 - 1);
        assert_eq!(with_loops.reachable_from(0, 0), 15 * 15);
    }

    #[test]
    fn test_all_cells_reachable() {
        let maze = gen_maze(15, 42);
        assert_eq!(maze.reachable_from(0, 0), 15 * 15);
    }

    #[test]
    fn test_entrance_and_exit_open() {
        let maze = gen_maze(15, 7);
        assert!(!maze.cell_at(maze.entrance_col(), 0).has_wall(Wall::Top));
        assert!(!maze.cell_at(maze.exit_col(), 14).has_wall(Wall::Bottom));
    }

    #[test]
    fn test_same_seed_same_maze() {
        let a = gen_maze(15, 99);
        let b = gen_maze(15, 99);
        assert_eq!(a.entrance_col(), b.entrance_col());
        assert_eq!(a.exit_col(), b.exit_col());
        assert_eq!(a.wall_segments(), b.wall_segments());
    }

    #[test]
    fn test_cell_center_roundtrip() {
        let maze = gen_maze(15, 3);
        for j in [0, 7, 14] {
            for i in [0, 7, 14] {
                let center = maze.cell_center(i, j);
                assert_eq!(maze.cell_of(center), Some((i, j)));
            }
        }
    }

    #[test]
    fn test_cell_of_outside_is_none() {
        let maze = gen_maze(15, 3);
        assert_eq!(maze.cell_of(Vec3::new(1000.0, 0.0, -1.0)), None);
        assert_eq!(maze.cell_of(Vec3::new(0.0, 0.0, 5.0)), None);
        assert_eq!(maze.cell_of(Vec3::new(0.0, 0.0, -80.0)), None);
    }

    #[test]
    fn test_spawn_above_entrance() {
        let maze = gen_maze(15, 11);
        let spawn = maze.spawn_point();
        assert_eq!(spawn.y, 10.0);
        assert_eq!(maze.cell_of(spawn), Some((maze.entrance_col(), 0)));
    }

    #[test]
    fn test_goal_volume_at_exit_cell() {
        let maze = gen_maze(15, 11);
        let goal = maze.goal_volume();
        let exit = maze.cell_center(maze.exit_col(), 14);
        assert!(goal.contains_point(exit + Vec3::new(0.0, 1.0, 0.0)));
    }

    #[test]
    fn test_in_bounds() {
        let maze = gen_maze(15, 1);
        let w = maze.world_width();

        assert!(maze.in_bounds(Vec3::new(0.0, 1.0, -w * 0.5), 5.0, -20.0));
        // Inside the horizontal buffer
        assert!(maze.in_bounds(Vec3::new(w * 0.5 + 4.0, 1.0, -1.0), 5.0, -20.0));
        // Past the buffer
        assert!(!maze.in_bounds(Vec3::new(w * 0.5 + 6.0, 1.0, -1.0), 5.0, -20.0));
        assert!(!maze.in_bounds(Vec3::new(0.0, 1.0, 6.0), 5.0, -20.0));
        // Fallen through
        assert!(!maze.in_bounds(Vec3::new(0.0, -25.0, -1.0), 5.0, -20.0));
    }

    #[test]
    fn test_footprint_clear_at_cell_center() {
        let maze = gen_maze(15, 5);
        let center = maze.cell_center(7, 7);
        let small = Aabb::from_center_size(center + Vec3::new(0.0, 0.5, 0.0), Vec3::splat(1.0));
        assert!(maze.footprint_clear(&small));
    }

    proptest! {
        #[test]
        fn prop_maze_fully_connected(seed in any::<u64>(), size in 2usize..=24) {
            let maze = gen_maze(size, seed);
            prop_assert_eq!(maze.reachable_from(0, 0), size * size);
        }

        #[test]
        fn prop_wall_flags_symmetric(seed in any::<u64>(), size in 2usize..=24) {
            let maze = gen_maze(size, seed);
            assert_wall_symmetry(&maze);
        }
    }
}

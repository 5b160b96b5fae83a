//! Food placement
//!
//! Picks uniformly among the cells the snake does not cover. Free cells are
//! counted and indexed directly, so placement finishes in one pass over the
//! grid however crowded the board is.

use rand::Rng;
use std::collections::HashSet;

use super::state::{Position, Snake};

/// Pick a free cell for food, or `None` when the snake covers the board
pub fn spawn_food<R: Rng + ?Sized>(
    snake: &Snake,
    grid_width: usize,
    grid_height: usize,
    rng: &mut R,
) -> Option<Position> {
    let occupied: HashSet<Position> = snake.segments().copied().collect();
    let free_count = (grid_width * grid_height).saturating_sub(occupied.len());
    if free_count == 0 {
        return None;
    }

    let pick = rng.gen_range(0..free_count);
    free_cells(grid_width, grid_height, &occupied).nth(pick)
}

/// Row-major iterator over cells not in `occupied`
fn free_cells<'a>(
    grid_width: usize,
    grid_height: usize,
    occupied: &'a HashSet<Position>,
) -> impl Iterator<Item = Position> + 'a {
    (0..grid_height as i32)
        .flat_map(move |y| (0..grid_width as i32).map(move |x| Position::new(x, y)))
        .filter(move |pos| !occupied.contains(pos))
}

//! Loop injection over a finished spanning tree.

use crate::maze::{Maze, MazeError};
use crate::rng::RandomSource;
use crate::types::{Dir, Pos};

/// Walks cells in row-major order and, for each still-walled RIGHT and DOWN
/// edge, opens it when a draw in `[0, 100)` falls below `openness`.
/// Non-positive openness returns before drawing anything.
pub(super) fn inject_loops(
    maze: &mut Maze,
    openness: i32,
    rng: &mut RandomSource,
) -> Result<usize, MazeError> {
    if openness <= 0 {
        return Ok(0);
    }
    let threshold = openness.min(100) as u64;

    let mut opened = 0_usize;
    for y in 0..maze.height() {
        for x in 0..maze.width() {
            let pos = Pos { y: y as i32, x: x as i32 };
            for dir in [Dir::Right, Dir::Down] {
                if maze.neighbor(pos, dir).is_none() || !maze.has_wall(pos, dir) {
                    continue;
                }
                if rng.below(100) < threshold {
                    maze.open_wall(pos, dir)?;
                    opened += 1;
                }
            }
        }
    }

    Ok(opened)
}

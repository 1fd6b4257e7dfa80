//! Iterative randomized depth-first carving of a spanning tree.

use crate::maze::{Maze, MazeError};
use crate::rng::RandomSource;
use crate::types::{Dir, Pos};

/// Carves from the origin with an explicit stack and returns the number of
/// opened edges, which is always `width * height - 1`.
pub(super) fn carve_spanning_tree(
    maze: &mut Maze,
    rng: &mut RandomSource,
) -> Result<usize, MazeError> {
    let width = maze.width();
    let cell_index = |pos: Pos| (pos.y as usize) * width + (pos.x as usize);

    let mut visited = vec![false; maze.cell_count()];
    let mut stack = vec![Pos::ORIGIN];
    visited[cell_index(Pos::ORIGIN)] = true;
    let mut carved = 0_usize;

    while let Some(&current) = stack.last() {
        let mut candidates: Vec<(Pos, Dir)> = Dir::ALL
            .into_iter()
            .filter_map(|dir| maze.neighbor(current, dir).map(|next| (next, dir)))
            .filter(|&(next, _)| !visited[cell_index(next)])
            .collect();

        if candidates.is_empty() {
            stack.pop();
            continue;
        }

        rng.shuffle(&mut candidates);
        let (next, dir) = candidates[0];
        maze.open_wall(current, dir)?;
        visited[cell_index(next)] = true;
        stack.push(next);
        carved += 1;
    }

    Ok(carved)
}

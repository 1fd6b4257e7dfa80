//! Cell-offset templates used as location footprints. Every template contains
//! the origin, which lands on the chosen anchor cell.

use crate::types::Pos;

pub type Shape = &'static [Pos];

const fn at(x: i32, y: i32) -> Pos {
    Pos { y, x }
}

pub const DEFAULT_SHAPES: &[Shape] = &[
    // pairs
    &[at(0, 0), at(1, 0)],
    &[at(0, 0), at(0, 1)],
    // straight triples
    &[at(0, 0), at(1, 0), at(2, 0)],
    &[at(0, 0), at(0, 1), at(0, 2)],
    // L triples
    &[at(0, 0), at(1, 0), at(0, 1)],
    &[at(0, 0), at(-1, 0), at(0, 1)],
    &[at(0, 0), at(1, 0), at(0, -1)],
    &[at(0, 0), at(-1, 0), at(0, -1)],
    // square
    &[at(0, 0), at(1, 0), at(0, 1), at(1, 1)],
    // straight quads
    &[at(0, 0), at(1, 0), at(2, 0), at(3, 0)],
    &[at(0, 0), at(0, 1), at(0, 2), at(0, 3)],
    // T quads
    &[at(0, 0), at(-1, 0), at(1, 0), at(0, 1)],
    &[at(0, 0), at(-1, 0), at(1, 0), at(0, -1)],
];

/// Squares and L triples only, for rooms that should read as chambers.
pub const COMPACT_SHAPES: &[Shape] = &[
    &[at(0, 0), at(1, 0), at(0, 1), at(1, 1)],
    &[at(0, 0), at(1, 0), at(0, 1)],
    &[at(0, 0), at(-1, 0), at(0, 1)],
    &[at(0, 0), at(1, 0), at(0, -1)],
    &[at(0, 0), at(-1, 0), at(0, -1)],
];

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::types::Dir;

    fn is_edge_connected(shape: Shape) -> bool {
        let cells: BTreeSet<Pos> = shape.iter().copied().collect();
        let mut seen = BTreeSet::from([Pos::ORIGIN]);
        let mut open = vec![Pos::ORIGIN];
        while let Some(pos) = open.pop() {
            for dir in Dir::ALL {
                let next = pos.offset(dir.offset());
                if cells.contains(&next) && seen.insert(next) {
                    open.push(next);
                }
            }
        }
        seen.len() == cells.len()
    }

    #[test]
    fn default_catalog_has_thirteen_templates_of_two_to_four_cells() {
        assert_eq!(DEFAULT_SHAPES.len(), 13);
        for shape in DEFAULT_SHAPES {
            assert!((2..=4).contains(&shape.len()), "bad template size: {shape:?}");
        }
    }

    #[test]
    fn every_template_is_anchored_unique_and_connected() {
        for shape in DEFAULT_SHAPES.iter().chain(COMPACT_SHAPES) {
            assert!(shape.contains(&Pos::ORIGIN), "{shape:?} must contain the anchor");
            let unique: BTreeSet<Pos> = shape.iter().copied().collect();
            assert_eq!(unique.len(), shape.len(), "{shape:?} repeats a cell");
            assert!(is_edge_connected(*shape), "{shape:?} is not one connected room");
        }
    }

    #[test]
    fn compact_templates_are_drawn_from_the_default_set() {
        for shape in COMPACT_SHAPES {
            assert!(DEFAULT_SHAPES.contains(shape), "{shape:?} missing from defaults");
        }
    }
}

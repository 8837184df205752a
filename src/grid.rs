use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

// One of the eight compass-style placement vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Direction {
    pub dx: i8,
    pub dy: i8,
}

impl Direction {
    pub const fn new(dx: i8, dy: i8) -> Self {
        Self { dx, dy }
    }

    pub fn reversed(self) -> Self {
        Self {
            dx: -self.dx,
            dy: -self.dy,
        }
    }
}

// Enabled subset of placement vectors. Forward means left-to-right /
// top-to-bottom reading order; `backward` mirrors every enabled axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectionPolicy {
    pub horizontal: bool,
    pub vertical: bool,
    pub diagonal: bool,
    pub backward: bool,
}

impl DirectionPolicy {
    pub fn all() -> Self {
        Self {
            horizontal: true,
            vertical: true,
            diagonal: true,
            backward: true,
        }
    }

    pub fn forward_only() -> Self {
        Self {
            horizontal: true,
            vertical: true,
            diagonal: true,
            backward: false,
        }
    }

    pub fn expand(&self) -> Vec<Direction> {
        let mut forward = Vec::new();
        if self.horizontal {
            forward.push(Direction::new(1, 0));
        }
        if self.vertical {
            forward.push(Direction::new(0, 1));
        }
        if self.diagonal {
            forward.push(Direction::new(1, 1));
            forward.push(Direction::new(1, -1));
        }
        let mut directions = forward.clone();
        if self.backward {
            directions.extend(forward.iter().map(|dir| dir.reversed()));
        }
        directions
    }
}

impl Default for DirectionPolicy {
    fn default() -> Self {
        DirectionPolicy::forward_only()
    }
}

// Ordered cell path a placed word occupies. Consecutive positions differ by
// the placement direction; the letter at each position equals the word's
// letter at the same index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordPlacement {
    pub word: String,
    pub positions: Vec<(usize, usize)>,
}

impl WordPlacement {
    // The constant step between consecutive positions, if the path has one.
    pub fn direction(&self) -> Option<Direction> {
        let first = *self.positions.first()?;
        let second = *self.positions.get(1)?;
        Some(Direction::new(
            (second.0 as i64 - first.0 as i64) as i8,
            (second.1 as i64 - first.1 as i64) as i8,
        ))
    }
}

// Square letter matrix. Every cell holds a single A-Z letter once
// synthesis has finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    size: usize,
    letters: Vec<char>,
}

impl Grid {
    pub(crate) fn from_letters(size: usize, letters: Vec<char>) -> Self {
        debug_assert_eq!(letters.len(), size * size);
        Self { size, letters }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn letter(&self, x: usize, y: usize) -> char {
        self.letters[y * self.size + x]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[char]> {
        self.letters.chunks(self.size)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Puzzle {
    pub grid: Grid,
    pub placements: Vec<WordPlacement>,
    pub used_words: Vec<String>,
    pub theme: Option<String>,
    pub fact: Option<String>,
}

impl Puzzle {
    // Every coordinate covered by any placement, deduplicated. Ordered by
    // (y, x) so answer-key rendering is stable across runs.
    pub fn solution_cells(&self) -> Vec<(usize, usize)> {
        let mut cells: BTreeSet<(usize, usize)> = BTreeSet::new();
        for placement in &self.placements {
            for &(x, y) in &placement.positions {
                cells.insert((y, x));
            }
        }
        cells.into_iter().map(|(y, x)| (x, y)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_expansion_counts() {
        assert_eq!(DirectionPolicy::all().expand().len(), 8);
        assert_eq!(DirectionPolicy::forward_only().expand().len(), 4);

        let horizontal_only = DirectionPolicy {
            horizontal: true,
            vertical: false,
            diagonal: false,
            backward: false,
        };
        assert_eq!(horizontal_only.expand(), vec![Direction::new(1, 0)]);

        let diagonal_mirrored = DirectionPolicy {
            horizontal: false,
            vertical: false,
            diagonal: true,
            backward: true,
        };
        assert_eq!(diagonal_mirrored.expand().len(), 4);
    }

    #[test]
    fn backward_mirrors_each_enabled_axis() {
        let directions = DirectionPolicy::all().expand();
        for dir in &directions[..4] {
            assert!(directions.contains(&dir.reversed()));
        }
    }

    #[test]
    fn placement_direction_is_the_step() {
        let placement = WordPlacement {
            word: "CAT".to_string(),
            positions: vec![(4, 4), (3, 3), (2, 2)],
        };
        assert_eq!(placement.direction(), Some(Direction::new(-1, -1)));
    }

    #[test]
    fn solution_cells_deduplicate_crossings() {
        let puzzle = Puzzle {
            grid: Grid::from_letters(2, vec!['A', 'B', 'C', 'D']),
            placements: vec![
                WordPlacement {
                    word: "AB".to_string(),
                    positions: vec![(0, 0), (1, 0)],
                },
                WordPlacement {
                    word: "AC".to_string(),
                    positions: vec![(0, 0), (0, 1)],
                },
            ],
            used_words: vec!["AB".to_string(), "AC".to_string()],
            theme: None,
            fact: None,
        };
        assert_eq!(puzzle.solution_cells(), vec![(0, 0), (1, 0), (0, 1)]);
    }
}

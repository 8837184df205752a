use crate::error::GridPressError;
use crate::grid::{Difficulty, Direction, DirectionPolicy, Grid, Puzzle, WordPlacement};
use log::debug;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

// Random trials per word before it is dropped. Dropping is best-effort
// degradation, never an error; callers observe it via `used_words`.
pub const MAX_ATTEMPTS: usize = 100;

// Chance that medium difficulty accepts an offered letter-matching overlap,
// evaluated once per overlapping cell.
const MEDIUM_OVERLAP_CHANCE: f64 = 0.3;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PuzzleSpec {
    pub words: Vec<String>,
    pub grid_size: usize,
    #[serde(default)]
    pub directions: DirectionPolicy,
    pub difficulty: Difficulty,
    pub max_words: usize,
    #[serde(default)]
    pub theme: Option<String>,
    #[serde(default)]
    pub fact: Option<String>,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl PuzzleSpec {
    pub fn new(words: Vec<String>, grid_size: usize) -> Self {
        Self {
            words,
            grid_size,
            directions: DirectionPolicy::default(),
            difficulty: Difficulty::Medium,
            max_words: usize::MAX,
            theme: None,
            fact: None,
            seed: None,
        }
    }
}

pub fn synthesize_seeded(spec: &PuzzleSpec, seed: u64) -> Result<Puzzle, GridPressError> {
    synthesize(spec, &mut StdRng::seed_from_u64(seed))
}

pub fn synthesize(spec: &PuzzleSpec, rng: &mut impl Rng) -> Result<Puzzle, GridPressError> {
    if spec.grid_size == 0 {
        return Err(GridPressError::InvalidGridSize(spec.grid_size));
    }

    let size = spec.grid_size;
    let words = normalize_words(&spec.words, size);
    let directions = spec.directions.expand();

    let mut cells: Vec<Option<char>> = vec![None; size * size];
    let mut placements: Vec<WordPlacement> = Vec::new();
    let mut used_words: Vec<String> = Vec::new();

    if !directions.is_empty() {
        for word in &words {
            if used_words.len() >= spec.max_words {
                break;
            }
            match place_word(&mut cells, size, word, &directions, spec.difficulty, rng) {
                Some(positions) => {
                    placements.push(WordPlacement {
                        word: word.clone(),
                        positions,
                    });
                    used_words.push(word.clone());
                }
                None => {
                    debug!("dropped {word:?}: no accepted placement in {MAX_ATTEMPTS} trials");
                }
            }
        }
    }

    let letters = cells
        .into_iter()
        .map(|cell| cell.unwrap_or_else(|| noise_letter(rng)))
        .collect();

    Ok(Puzzle {
        grid: Grid::from_letters(size, letters),
        placements,
        used_words,
        theme: spec.theme.clone(),
        fact: spec.fact.clone(),
    })
}

// Uppercase, strip non-alphabetic characters ("ice cream" -> "ICECREAM"),
// drop empties and entries longer than the grid, dedupe case-insensitively,
// then sort longest first: long words have the fewest valid start positions,
// so they get the emptiest grid.
fn normalize_words(words: &[String], grid_size: usize) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::new();
    for raw in words {
        let word: String = raw
            .chars()
            .filter(|ch| ch.is_ascii_alphabetic())
            .map(|ch| ch.to_ascii_uppercase())
            .collect();
        if word.is_empty() || word.chars().count() > grid_size {
            continue;
        }
        if normalized.contains(&word) {
            continue;
        }
        normalized.push(word);
    }
    normalized.sort_by(|a, b| b.len().cmp(&a.len()));
    normalized
}

fn place_word(
    cells: &mut [Option<char>],
    size: usize,
    word: &str,
    directions: &[Direction],
    difficulty: Difficulty,
    rng: &mut impl Rng,
) -> Option<Vec<(usize, usize)>> {
    let letters: Vec<char> = word.chars().collect();
    for _ in 0..MAX_ATTEMPTS {
        let dir = directions[rng.gen_range(0..directions.len())];
        let (x_lo, x_hi) = start_range(letters.len(), dir.dx, size);
        let (y_lo, y_hi) = start_range(letters.len(), dir.dy, size);
        let x0 = rng.gen_range(x_lo..=x_hi);
        let y0 = rng.gen_range(y_lo..=y_hi);

        if let Some(positions) = accept_placement(cells, size, &letters, x0, y0, dir, difficulty, rng)
        {
            for (&(x, y), &letter) in positions.iter().zip(letters.iter()) {
                cells[y * size + x] = Some(letter);
            }
            return Some(positions);
        }
    }
    None
}

// Inclusive range of start coordinates keeping `len` cells in bounds along
// one axis. `len <= size` is guaranteed by normalization.
fn start_range(len: usize, delta: i8, size: usize) -> (usize, usize) {
    match delta {
        1 => (0, size - len),
        -1 => (len - 1, size - 1),
        _ => (0, size - 1),
    }
}

#[allow(clippy::too_many_arguments)]
fn accept_placement(
    cells: &[Option<char>],
    size: usize,
    letters: &[char],
    x0: usize,
    y0: usize,
    dir: Direction,
    difficulty: Difficulty,
    rng: &mut impl Rng,
) -> Option<Vec<(usize, usize)>> {
    let mut positions = Vec::with_capacity(letters.len());
    for (step, &letter) in letters.iter().enumerate() {
        let x = x0 as i64 + step as i64 * dir.dx as i64;
        let y = y0 as i64 + step as i64 * dir.dy as i64;
        // The start range already keeps the path in bounds.
        if x < 0 || y < 0 || x >= size as i64 || y >= size as i64 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);

        match cells[y * size + x] {
            None => {}
            Some(existing) if existing != letter => return None,
            Some(_) => match difficulty {
                Difficulty::Easy => return None,
                Difficulty::Medium => {
                    if !rng.gen_bool(MEDIUM_OVERLAP_CHANCE) {
                        return None;
                    }
                }
                Difficulty::Hard => {}
            },
        }
        positions.push((x, y));
    }
    Some(positions)
}

fn noise_letter(rng: &mut impl Rng) -> char {
    (b'A' + rng.gen_range(0..26u8)) as char
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|w| w.to_string()).collect()
    }

    fn spec(list: &[&str], grid_size: usize, difficulty: Difficulty) -> PuzzleSpec {
        PuzzleSpec {
            difficulty,
            ..PuzzleSpec::new(words(list), grid_size)
        }
    }

    #[test]
    fn zero_grid_size_is_rejected() {
        let err = synthesize_seeded(&spec(&["CAT"], 0, Difficulty::Easy), 1).unwrap_err();
        assert!(matches!(err, GridPressError::InvalidGridSize(0)));
    }

    #[test]
    fn grid_is_fully_dense_uppercase() {
        for grid_size in [5, 10, 15, 20] {
            let puzzle =
                synthesize_seeded(&spec(&["CAT", "DOG", "BIRD"], grid_size, Difficulty::Medium), 7)
                    .unwrap();
            assert_eq!(puzzle.grid.size(), grid_size);
            let mut rows = 0;
            for row in puzzle.grid.rows() {
                rows += 1;
                assert_eq!(row.len(), grid_size);
                assert!(row.iter().all(|ch| ch.is_ascii_uppercase()));
            }
            assert_eq!(rows, grid_size);
        }
    }

    #[test]
    fn placements_spell_their_words_along_a_constant_step() {
        let puzzle = synthesize_seeded(
            &spec(&["LIGHTHOUSE", "HARBOR", "WAVE", "TIDE"], 12, Difficulty::Medium),
            99,
        )
        .unwrap();
        assert!(!puzzle.placements.is_empty());
        let allowed = DirectionPolicy::default().expand();
        for placement in &puzzle.placements {
            assert_eq!(placement.positions.len(), placement.word.chars().count());
            let dir = placement.direction().expect("multi-letter word");
            assert!(allowed.contains(&dir));
            for (step, (&(x, y), letter)) in placement
                .positions
                .iter()
                .zip(placement.word.chars())
                .enumerate()
            {
                assert_eq!(puzzle.grid.letter(x, y), letter);
                let expected_x = placement.positions[0].0 as i64 + step as i64 * dir.dx as i64;
                let expected_y = placement.positions[0].1 as i64 + step as i64 * dir.dy as i64;
                assert_eq!((x as i64, y as i64), (expected_x, expected_y));
            }
        }
    }

    #[test]
    fn easy_difficulty_never_shares_cells() {
        let puzzle = synthesize_seeded(
            &spec(&["CAT", "DOG", "SUN", "MAP", "RIVER"], 9, Difficulty::Easy),
            4242,
        )
        .unwrap();
        assert!(puzzle.used_words.len() >= 2);
        let mut seen: HashSet<(usize, usize)> = HashSet::new();
        for placement in &puzzle.placements {
            for pos in &placement.positions {
                assert!(seen.insert(*pos), "easy placement reused cell {pos:?}");
            }
        }
    }

    #[test]
    fn scenario_cat_dog_on_five_grid() {
        let request = PuzzleSpec {
            difficulty: Difficulty::Easy,
            max_words: 10,
            ..PuzzleSpec::new(words(&["CAT", "DOG"]), 5)
        };
        let puzzle = synthesize_seeded(&request, 12).unwrap();
        assert_eq!(puzzle.used_words, words(&["CAT", "DOG"]));
        assert!(puzzle.grid.rows().all(|row| row.iter().all(|c| c.is_ascii_uppercase())));
        let cat_cells: HashSet<_> = puzzle.placements[0].positions.iter().collect();
        assert!(puzzle.placements[1]
            .positions
            .iter()
            .all(|pos| !cat_cells.contains(pos)));
    }

    #[test]
    fn hard_difficulty_accepts_matching_crossings() {
        // Dense request on a tiny grid: hard mode keeps crossing words that
        // easy mode would have to reject outright.
        let request = spec(
            &["STONE", "NOTES", "TONES", "ONSET", "SETON", "TENS", "NEST", "SENT", "NETS"],
            5,
            Difficulty::Hard,
        );
        let mut crossed = false;
        for seed in 0..40u64 {
            let puzzle = synthesize_seeded(&request, seed).unwrap();
            let mut seen: HashSet<(usize, usize)> = HashSet::new();
            let mut shared = false;
            for placement in &puzzle.placements {
                for pos in &placement.positions {
                    if !seen.insert(*pos) {
                        shared = true;
                    }
                }
            }
            if shared {
                crossed = true;
                break;
            }
        }
        assert!(crossed, "hard difficulty never produced a crossing in 40 seeds");
    }

    #[test]
    fn words_longer_than_grid_are_discarded() {
        let puzzle = synthesize_seeded(
            &spec(&["EXTRAORDINARY", "CAT"], 5, Difficulty::Medium),
            3,
        )
        .unwrap();
        assert!(!puzzle.used_words.iter().any(|w| w == "EXTRAORDINARY"));
    }

    #[test]
    fn max_words_caps_placements() {
        let request = PuzzleSpec {
            difficulty: Difficulty::Medium,
            max_words: 2,
            ..PuzzleSpec::new(words(&["ONE", "TWO", "SIX", "TEN", "ACE"]), 10)
        };
        let puzzle = synthesize_seeded(&request, 8).unwrap();
        assert_eq!(puzzle.used_words.len(), 2);
        assert_eq!(puzzle.placements.len(), 2);
    }

    #[test]
    fn normalization_strips_dedupes_and_sorts() {
        let normalized = normalize_words(
            &words(&["ice cream!", "Cat", "CAT", "sea-horse", "", "42"]),
            10,
        );
        assert_eq!(normalized, words(&["ICECREAM", "SEAHORSE", "CAT"]));
    }

    #[test]
    fn empty_word_list_yields_pure_noise() {
        let puzzle = synthesize_seeded(&spec(&[], 6, Difficulty::Easy), 77).unwrap();
        assert!(puzzle.used_words.is_empty());
        assert!(puzzle.placements.is_empty());
        assert!(puzzle.grid.rows().all(|row| row.iter().all(|c| c.is_ascii_uppercase())));
    }

    #[test]
    fn empty_direction_set_places_nothing() {
        let request = PuzzleSpec {
            directions: DirectionPolicy {
                horizontal: false,
                vertical: false,
                diagonal: false,
                backward: false,
            },
            ..spec(&["CAT"], 5, Difficulty::Hard)
        };
        let puzzle = synthesize_seeded(&request, 5).unwrap();
        assert!(puzzle.used_words.is_empty());
    }

    #[test]
    fn equal_seeds_reproduce_the_grid() {
        let request = spec(&["ORBIT", "COMET", "STAR", "MOON"], 8, Difficulty::Medium);
        let a = synthesize_seeded(&request, 2024).unwrap();
        let b = synthesize_seeded(&request, 2024).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn start_range_narrows_with_direction_sign() {
        assert_eq!(start_range(4, 1, 10), (0, 6));
        assert_eq!(start_range(4, -1, 10), (3, 9));
        assert_eq!(start_range(4, 0, 10), (0, 9));
        assert_eq!(start_range(10, 1, 10), (0, 0));
    }
}

mod canvas;
mod compose;
mod error;
mod font;
mod grid;
mod metrics;
mod settings;
mod synth;
mod types;

pub use canvas::{Canvas, Command, Document, Page};
pub use compose::{
    KIND_ANSWERS, KIND_ANSWERS_TITLE, KIND_COVER, KIND_PUZZLES, KIND_TOC, PAGE_KIND_KEY, compose,
    compose_with_metrics,
};
pub use error::GridPressError;
pub use grid::{Difficulty, Direction, DirectionPolicy, Grid, Puzzle, WordPlacement};
pub use metrics::{BookMetrics, PageMetrics};
pub use settings::{BLEED_PT, BookSettings, FontFamily, Palette, Theme, TrimSize};
pub use synth::{MAX_ATTEMPTS, PuzzleSpec, synthesize, synthesize_seeded};
pub use types::{Color, Margins, Pt, RENDER_DPI, Rect, Size};

use rayon::prelude::*;

// Golden-ratio gamma, the usual seed-stream splitter.
const SLOT_SEED_GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;

#[derive(Debug, Clone)]
pub struct Book {
    pub document: Document,
    pub puzzles: Vec<Puzzle>,
    pub metrics: BookMetrics,
}

// Collects puzzle requests against validated book settings, synthesizes
// every grid in parallel (one rayon task per puzzle slot), then runs the
// single compose reduction over the finished array.
pub struct BookBuilder {
    settings: BookSettings,
    specs: Vec<PuzzleSpec>,
}

impl BookBuilder {
    pub fn new(settings: BookSettings) -> Result<Self, GridPressError> {
        settings.validate()?;
        Ok(Self {
            settings,
            specs: Vec::new(),
        })
    }

    pub fn add_puzzle(&mut self, spec: PuzzleSpec) -> &mut Self {
        self.specs.push(spec);
        self
    }

    pub fn with_puzzle(mut self, spec: PuzzleSpec) -> Self {
        self.specs.push(spec);
        self
    }

    pub fn settings(&self) -> &BookSettings {
        &self.settings
    }

    pub fn build(&self) -> Result<Book, GridPressError> {
        let base_seed = self.settings.cover_seed;
        let puzzles = self
            .specs
            .par_iter()
            .enumerate()
            .map(|(slot, spec)| {
                let seed = spec.seed.unwrap_or_else(|| slot_seed(base_seed, slot));
                synthesize_seeded(spec, seed)
            })
            .collect::<Result<Vec<Puzzle>, GridPressError>>()?;

        let (document, metrics) = compose_with_metrics(&self.settings, &puzzles)?;
        Ok(Book {
            document,
            puzzles,
            metrics,
        })
    }
}

// Per-slot synthesis seed when the spec does not pin one. Derived from the
// book seed so a whole book reproduces from a single value.
fn slot_seed(base: u64, slot: usize) -> u64 {
    base ^ (slot as u64 + 1).wrapping_mul(SLOT_SEED_GAMMA)
}

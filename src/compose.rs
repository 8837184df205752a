use crate::canvas::{Canvas, Document};
use crate::error::GridPressError;
use crate::font;
use crate::grid::Puzzle;
use crate::metrics::{BookMetrics, PageMetrics};
use crate::settings::{BookSettings, Palette};
use crate::types::{Color, Pt, Rect};
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

// Meta key tagging every page with its role in the book sequence.
pub const PAGE_KIND_KEY: &str = "__gp_page_kind";

pub const KIND_COVER: &str = "cover";
pub const KIND_TOC: &str = "toc";
pub const KIND_PUZZLES: &str = "puzzles";
pub const KIND_ANSWERS_TITLE: &str = "answers-title";
pub const KIND_ANSWERS: &str = "answers";

// Height reserved under each grid for the word list, independent of how
// many words the puzzle actually placed. Long lists overflow the band and
// the TOC estimate never learns about it; both halves of that behavior are
// preserved intentionally (see DESIGN.md).
const WORD_LIST_RESERVE: f32 = 60.0;
const WORDS_PER_ROW: usize = 4;

const FACT_BLOCK: f32 = 26.0;
const GRID_LINE_WIDTH: f32 = 0.75;
const PAGE_NUMBER_SIZE: f32 = 9.0;
const PAGE_NUMBER_RISE: f32 = 24.0;
const TOC_ROW_HEIGHT: f32 = 18.0;
const COVER_GRID_SIDE: usize = 8;
const COVER_HIGHLIGHT_CHANCE: f64 = 0.18;
const ANSWER_HIGHLIGHT_OPACITY: f32 = 0.35;

pub fn compose(settings: &BookSettings, puzzles: &[Puzzle]) -> Result<Document, GridPressError> {
    compose_with_metrics(settings, puzzles).map(|(document, _)| document)
}

pub fn compose_with_metrics(
    settings: &BookSettings,
    puzzles: &[Puzzle],
) -> Result<(Document, BookMetrics), GridPressError> {
    settings.validate()?;

    let mut composer = BookComposer {
        settings,
        palette: settings.theme.palette(),
        canvas: Canvas::new(settings.page_size()),
        page_number: 0,
        metrics: BookMetrics::default(),
    };

    if settings.include_cover {
        composer.cover_page();
    }
    composer.toc_page(puzzles);

    let per_page = settings.puzzles_per_page as usize;
    for (chunk_index, chunk) in puzzles.chunks(per_page).enumerate() {
        composer.puzzle_page(chunk, chunk_index * per_page + 1, false);
    }

    if settings.include_answers {
        composer.answer_title_page();
        for (chunk_index, chunk) in puzzles.chunks(per_page).enumerate() {
            composer.puzzle_page(chunk, chunk_index * per_page + 1, true);
        }
    }

    let metrics = composer.metrics;
    Ok((composer.canvas.finish_without_show(), metrics))
}

struct BookComposer<'a> {
    settings: &'a BookSettings,
    palette: Palette,
    canvas: Canvas,
    page_number: usize,
    metrics: BookMetrics,
}

impl BookComposer<'_> {
    fn begin_page(&mut self, kind: &str) {
        self.page_number += 1;
        self.canvas.meta(PAGE_KIND_KEY, kind);
        let size = self.canvas.page_size();
        let background = if kind == KIND_COVER {
            self.palette.accent
        } else {
            self.palette.background
        };
        self.canvas.set_fill_color(background);
        self.canvas.draw_rect(Pt::ZERO, Pt::ZERO, size.width, size.height);
        self.canvas.fill();
    }

    fn end_page(&mut self, kind: &str) {
        if self.settings.include_page_numbers && kind != KIND_COVER {
            let size = self.canvas.page_size();
            let label = self.page_number.to_string();
            let font_size = Pt::from_f32(PAGE_NUMBER_SIZE);
            self.set_font(false, font_size);
            self.canvas.set_fill_color(self.palette.text);
            let width = font::measure_text(self.settings.font_family, false, font_size, &label);
            let x = (size.width - width) / 2;
            let y = size.height - self.settings.bleed_edge() - Pt::from_f32(PAGE_NUMBER_RISE);
            self.canvas.draw_string(x, y, label);
        }
        self.metrics.pages.push(PageMetrics {
            page_number: self.page_number,
            kind: kind.to_string(),
            command_count: self.canvas.current_command_count(),
        });
        self.metrics.total_commands += self.canvas.current_command_count();
        self.canvas.show_page();
    }

    fn set_font(&mut self, bold: bool, size: Pt) {
        let name = if bold {
            self.settings.font_family.bold_name()
        } else {
            self.settings.font_family.regular_name()
        };
        self.canvas.set_font_name(name);
        self.canvas.set_font_size(size);
    }

    fn draw_text_centered(&mut self, text: &str, bold: bool, font_size: Pt, center_x: Pt, baseline: Pt) {
        let width = font::measure_text(self.settings.font_family, bold, font_size, text);
        self.set_font(bold, font_size);
        self.canvas.draw_string(center_x - width / 2, baseline, text);
    }

    fn cover_page(&mut self) {
        self.begin_page(KIND_COVER);
        let size = self.canvas.page_size();
        let content = self.settings.content_rect();
        let center_x = size.width / 2;
        let mut rng = StdRng::seed_from_u64(self.settings.cover_seed);

        // Title block, wrapped to the content width.
        let title_size = Pt::from_f32(30.0);
        self.canvas.set_fill_color(Color::WHITE);
        let mut baseline = content.y + content.height * 0.16;
        for line in font::wrap_text(
            self.settings.font_family,
            true,
            title_size,
            content.width,
            &self.settings.title,
        ) {
            self.draw_text_centered(&line, true, title_size, center_x, baseline);
            baseline += title_size * 1.25;
        }
        if let Some(subtitle) = &self.settings.subtitle {
            baseline += Pt::from_f32(6.0);
            let subtitle_size = Pt::from_f32(15.0);
            for line in font::wrap_text(
                self.settings.font_family,
                false,
                subtitle_size,
                content.width,
                subtitle,
            ) {
                self.draw_text_centered(&line, false, subtitle_size, center_x, baseline);
                baseline += subtitle_size * 1.3;
            }
        }

        // Decorative sample grid: random letters, a few highlight cells.
        // Cosmetic only; it never reflects a real puzzle.
        let side = (content.width * 0.62).min(content.height * 0.4);
        let cell = side / (COVER_GRID_SIDE as i32);
        let grid_x = center_x - side / 2;
        let grid_y = content.y + content.height * 0.42;
        let letter_size = cell * 0.55;
        self.canvas.set_stroke_color(Color::WHITE);
        self.canvas.set_line_width(Pt::from_f32(GRID_LINE_WIDTH));
        for row in 0..COVER_GRID_SIDE {
            for col in 0..COVER_GRID_SIDE {
                let x = grid_x + cell * (col as i32);
                let y = grid_y + cell * (row as i32);
                if rng.gen_bool(COVER_HIGHLIGHT_CHANCE) {
                    self.canvas.set_fill_color(self.palette.highlight);
                    self.canvas.draw_rect(x, y, cell, cell);
                    self.canvas.fill();
                }
                self.canvas.draw_rect(x, y, cell, cell);
                self.canvas.stroke();
                let letter = (b'A' + rng.gen_range(0..26u8)) as char;
                self.canvas.set_fill_color(Color::WHITE);
                self.draw_text_centered(
                    &letter.to_string(),
                    false,
                    letter_size,
                    x + cell / 2,
                    y + cell * 0.72,
                );
            }
        }

        if let Some(author) = &self.settings.author {
            self.canvas.set_fill_color(Color::WHITE);
            self.draw_text_centered(
                author,
                false,
                Pt::from_f32(12.0),
                center_x,
                content.bottom() - Pt::from_f32(20.0),
            );
        }
        self.end_page(KIND_COVER);
    }

    fn toc_page(&mut self, puzzles: &[Puzzle]) {
        self.begin_page(KIND_TOC);
        let content = self.settings.content_rect();
        self.canvas.set_fill_color(self.palette.text);
        self.set_font(true, Pt::from_f32(20.0));
        self.canvas
            .draw_string(content.x, content.y + Pt::from_f32(20.0), "Contents");

        // Entry targets are estimates from the grouping arithmetic; layout
        // never feeds the real page numbers back into this table.
        let per_page = self.settings.puzzles_per_page as usize;
        let first_puzzle_page = self.page_number + 1;
        let entry_size = Pt::from_f32(11.0);
        let row_height = Pt::from_f32(TOC_ROW_HEIGHT);
        let mut baseline = content.y + Pt::from_f32(52.0);

        self.set_font(false, entry_size);
        for (index, puzzle) in puzzles.iter().enumerate() {
            let label = puzzle_label(index + 1, puzzle);
            let target = (first_puzzle_page + index / per_page).to_string();
            let target_width =
                font::measure_text(self.settings.font_family, false, entry_size, &target);
            self.canvas.draw_string(content.x, baseline, label);
            self.canvas
                .draw_string(content.right() - target_width, baseline, target);
            baseline += row_height;
        }

        if self.settings.include_answers {
            let target =
                (first_puzzle_page + puzzles.len().div_ceil(per_page)).to_string();
            let target_width =
                font::measure_text(self.settings.font_family, false, entry_size, &target);
            self.canvas.draw_string(content.x, baseline, "Answer Key");
            self.canvas
                .draw_string(content.right() - target_width, baseline, target);
        }
        self.end_page(KIND_TOC);
    }

    fn puzzle_page(&mut self, chunk: &[Puzzle], first_number: usize, answers: bool) {
        let kind = if answers { KIND_ANSWERS } else { KIND_PUZZLES };
        self.begin_page(kind);
        let slots = slot_rects(self.settings.content_rect(), self.settings.puzzles_per_page);
        for (offset, puzzle) in chunk.iter().enumerate() {
            self.puzzle_slot(slots[offset], puzzle, first_number + offset, answers);
        }
        self.end_page(kind);
    }

    fn puzzle_slot(&mut self, slot: Rect, puzzle: &Puzzle, number: usize, answers: bool) {
        let per_page = self.settings.puzzles_per_page;
        let title_size = Pt::from_f32(match per_page {
            1 => 18.0,
            2 => 14.0,
            _ => 11.0,
        });
        let word_size = Pt::from_f32(match per_page {
            1 => 10.0,
            2 => 9.0,
            _ => 8.0,
        });
        let center_x = slot.x + slot.width / 2;

        self.canvas.set_fill_color(self.palette.text);
        self.draw_text_centered(
            &puzzle_label(number, puzzle),
            true,
            title_size,
            center_x,
            slot.y + title_size,
        );

        let title_block = title_size * 1.6;
        let show_fact =
            !answers && self.settings.include_theme_facts && puzzle.fact.is_some();
        let fact_block = if show_fact {
            Pt::from_f32(FACT_BLOCK)
        } else {
            Pt::ZERO
        };
        let grid_size = puzzle.grid.size();
        let available = slot.height - title_block - Pt::from_f32(WORD_LIST_RESERVE) - fact_block;
        // Cell from the limiting axis, so the grid is always square and fits.
        let cell = slot.width.min(available.max(Pt::ZERO)) / (grid_size as i32);
        let side = cell * (grid_size as i32);
        let grid_x = center_x - side / 2;
        let grid_y = slot.y + title_block;

        if answers {
            // Translucent overlay on every cell any placement covers.
            self.canvas.save_state();
            self.canvas.set_opacity(ANSWER_HIGHLIGHT_OPACITY, 1.0);
            self.canvas.set_fill_color(self.palette.highlight);
            for (x, y) in puzzle.solution_cells() {
                self.canvas.draw_rect(
                    grid_x + cell * (x as i32),
                    grid_y + cell * (y as i32),
                    cell,
                    cell,
                );
                self.canvas.fill();
            }
            self.canvas.restore_state();
        }

        let letter_size = cell * 0.55;
        self.canvas.set_fill_color(self.palette.text);
        let solution: std::collections::HashSet<(usize, usize)> = if answers {
            puzzle.solution_cells().into_iter().collect()
        } else {
            std::collections::HashSet::new()
        };
        // Two passes keep the font selection from flip-flopping per cell.
        for bold_pass in [false, true] {
            if bold_pass && solution.is_empty() {
                break;
            }
            for y in 0..grid_size {
                for x in 0..grid_size {
                    if solution.contains(&(x, y)) != bold_pass {
                        continue;
                    }
                    self.draw_text_centered(
                        &puzzle.grid.letter(x, y).to_string(),
                        bold_pass,
                        letter_size,
                        grid_x + cell * (x as i32) + cell / 2,
                        grid_y + cell * (y as i32) + cell * 0.72,
                    );
                }
            }
        }

        self.canvas.set_stroke_color(self.palette.grid_line);
        self.canvas.set_line_width(Pt::from_f32(GRID_LINE_WIDTH));
        for y in 0..grid_size {
            for x in 0..grid_size {
                self.canvas.draw_rect(
                    grid_x + cell * (x as i32),
                    grid_y + cell * (y as i32),
                    cell,
                    cell,
                );
                self.canvas.stroke();
            }
        }

        // Word list, four per row, centered in fixed columns.
        let column_width = slot.width / (WORDS_PER_ROW as i32);
        let mut word_baseline = grid_y + side + word_size * 1.4;
        self.set_font(false, word_size);
        self.canvas.set_fill_color(self.palette.text);
        for (index, word) in puzzle.used_words.iter().enumerate() {
            let column = index % WORDS_PER_ROW;
            if index > 0 && column == 0 {
                word_baseline += word_size * 1.5;
            }
            let width = font::measure_text(self.settings.font_family, false, word_size, word);
            let x = slot.x + column_width * (column as i32) + (column_width - width) / 2;
            self.canvas.draw_string(x, word_baseline, word);
        }

        if show_fact {
            let fact = puzzle.fact.as_deref().unwrap_or_default();
            let fact_size = Pt::from_f32(8.0);
            let mut baseline = slot.bottom() - fact_block + fact_size * 1.2;
            for line in font::wrap_text(
                self.settings.font_family,
                false,
                fact_size,
                slot.width,
                fact,
            )
            .into_iter()
            .take(2)
            {
                self.draw_text_centered(&line, false, fact_size, center_x, baseline);
                baseline += fact_size * 1.3;
            }
        }
    }

    fn answer_title_page(&mut self) {
        self.begin_page(KIND_ANSWERS_TITLE);
        let size = self.canvas.page_size();
        self.canvas.set_fill_color(self.palette.text);
        self.draw_text_centered(
            "Answer Key",
            true,
            Pt::from_f32(26.0),
            size.width / 2,
            size.height * 0.45,
        );
        self.end_page(KIND_ANSWERS_TITLE);
    }
}

fn puzzle_label(number: usize, puzzle: &Puzzle) -> String {
    match &puzzle.theme {
        Some(theme) => format!("Puzzle {number}: {theme}"),
        None => format!("Puzzle {number}"),
    }
}

fn slot_rects(content: Rect, per_page: u8) -> Vec<Rect> {
    match per_page {
        1 => vec![content],
        2 => {
            let half = content.height / 2;
            vec![
                Rect {
                    height: half,
                    ..content
                },
                Rect {
                    y: content.y + half,
                    height: content.height - half,
                    ..content
                },
            ]
        }
        _ => {
            let half_width = content.width / 2;
            let half_height = content.height / 2;
            let mut slots = Vec::with_capacity(4);
            for row in 0..2 {
                for col in 0..2 {
                    slots.push(Rect {
                        x: content.x + half_width * col,
                        y: content.y + half_height * row,
                        width: half_width,
                        height: half_height,
                    });
                }
            }
            slots
        }
    }
}

use crate::error::GridPressError;
use crate::types::{Color, Margins, Pt, Rect, Size};
use serde::{Deserialize, Serialize};

// Industry bleed allowance: 0.125in beyond the trim line on every edge.
pub const BLEED_PT: f32 = 9.0;

const DEFAULT_COVER_SEED: u64 = 0x4752_4944_5052_5353;

// Named KDP trim sizes. Unknown keys fall back to 6x9, the most common
// puzzle-book trim; that fallback is deliberate and documented rather than
// an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TrimSize {
    Trim5x8,
    Trim5_5x8_5,
    Trim6x9,
    Trim7x10,
    Trim8x10,
    Trim8_5x11,
}

impl TrimSize {
    pub fn parse(key: &str) -> TrimSize {
        match key.trim() {
            "5x8" => TrimSize::Trim5x8,
            "5.5x8.5" => TrimSize::Trim5_5x8_5,
            "6x9" => TrimSize::Trim6x9,
            "7x10" => TrimSize::Trim7x10,
            "8x10" => TrimSize::Trim8x10,
            "8.5x11" => TrimSize::Trim8_5x11,
            _ => TrimSize::Trim6x9,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            TrimSize::Trim5x8 => "5x8",
            TrimSize::Trim5_5x8_5 => "5.5x8.5",
            TrimSize::Trim6x9 => "6x9",
            TrimSize::Trim7x10 => "7x10",
            TrimSize::Trim8x10 => "8x10",
            TrimSize::Trim8_5x11 => "8.5x11",
        }
    }

    pub fn size(self) -> Size {
        match self {
            TrimSize::Trim5x8 => Size::from_inches(5.0, 8.0),
            TrimSize::Trim5_5x8_5 => Size::from_inches(5.5, 8.5),
            TrimSize::Trim6x9 => Size::from_inches(6.0, 9.0),
            TrimSize::Trim7x10 => Size::from_inches(7.0, 10.0),
            TrimSize::Trim8x10 => Size::from_inches(8.0, 10.0),
            TrimSize::Trim8_5x11 => Size::from_inches(8.5, 11.0),
        }
    }
}

impl Default for TrimSize {
    fn default() -> Self {
        TrimSize::Trim6x9
    }
}

impl From<String> for TrimSize {
    fn from(value: String) -> Self {
        TrimSize::parse(&value)
    }
}

impl From<TrimSize> for String {
    fn from(value: TrimSize) -> Self {
        value.key().to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn palette(self) -> Palette {
        match self {
            Theme::Light => Palette {
                text: Color::from_rgb8(26, 26, 26),
                background: Color::WHITE,
                grid_line: Color::from_rgb8(120, 120, 120),
                highlight: Color::from_rgb8(255, 214, 64),
                accent: Color::from_rgb8(31, 71, 136),
            },
            Theme::Dark => Palette {
                text: Color::from_rgb8(235, 235, 235),
                background: Color::from_rgb8(28, 30, 34),
                grid_line: Color::from_rgb8(110, 114, 122),
                highlight: Color::from_rgb8(224, 170, 32),
                accent: Color::from_rgb8(16, 36, 70),
            },
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Theme::Light
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub text: Color,
    pub background: Color,
    pub grid_line: Color,
    pub highlight: Color,
    pub accent: Color,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontFamily {
    Helvetica,
    Times,
    Courier,
}

impl FontFamily {
    pub fn regular_name(self) -> &'static str {
        match self {
            FontFamily::Helvetica => "Helvetica",
            FontFamily::Times => "Times-Roman",
            FontFamily::Courier => "Courier",
        }
    }

    pub fn bold_name(self) -> &'static str {
        match self {
            FontFamily::Helvetica => "Helvetica-Bold",
            FontFamily::Times => "Times-Bold",
            FontFamily::Courier => "Courier-Bold",
        }
    }
}

impl Default for FontFamily {
    fn default() -> Self {
        FontFamily::Helvetica
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookSettings {
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub trim_size: TrimSize,
    #[serde(default)]
    pub bleed: bool,
    // Fixed per-side print margins; programmatic override only.
    #[serde(skip, default = "Margins::print_safe")]
    pub margins: Margins,
    #[serde(default = "default_puzzles_per_page")]
    pub puzzles_per_page: u8,
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub font_family: FontFamily,
    #[serde(default = "default_true")]
    pub include_cover: bool,
    #[serde(default = "default_true")]
    pub include_page_numbers: bool,
    #[serde(default = "default_true")]
    pub include_answers: bool,
    #[serde(default)]
    pub include_theme_facts: bool,
    #[serde(default = "default_cover_seed")]
    pub cover_seed: u64,
}

fn default_puzzles_per_page() -> u8 {
    1
}

fn default_true() -> bool {
    true
}

fn default_cover_seed() -> u64 {
    DEFAULT_COVER_SEED
}

impl BookSettings {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: None,
            author: None,
            trim_size: TrimSize::default(),
            bleed: false,
            margins: Margins::print_safe(),
            puzzles_per_page: default_puzzles_per_page(),
            theme: Theme::default(),
            font_family: FontFamily::default(),
            include_cover: true,
            include_page_numbers: true,
            include_answers: true,
            include_theme_facts: false,
            cover_seed: DEFAULT_COVER_SEED,
        }
    }

    pub fn bleed_edge(&self) -> Pt {
        if self.bleed {
            Pt::from_f32(BLEED_PT)
        } else {
            Pt::ZERO
        }
    }

    // Trim plus the bleed allowance on every edge.
    pub fn page_size(&self) -> Size {
        self.trim_size.size().grow(self.bleed_edge())
    }

    // Usable area after the bleed inset and the print margins.
    pub fn content_rect(&self) -> Rect {
        Rect::from_size(self.page_size())
            .inset_all(self.bleed_edge())
            .inset(self.margins)
    }

    pub fn validate(&self) -> Result<(), GridPressError> {
        if !matches!(self.puzzles_per_page, 1 | 2 | 4) {
            return Err(GridPressError::InvalidPuzzlesPerPage(self.puzzles_per_page));
        }
        if self.title.trim().is_empty() {
            return Err(GridPressError::InvalidConfiguration(
                "book title must not be empty".to_string(),
            ));
        }
        let content = self.content_rect();
        if content.width <= Pt::ZERO || content.height <= Pt::ZERO {
            return Err(GridPressError::InvalidConfiguration(
                "margins leave no usable content area".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_trim_key_falls_back_to_6x9() {
        assert_eq!(TrimSize::parse("6x9"), TrimSize::Trim6x9);
        assert_eq!(TrimSize::parse("8.5x11"), TrimSize::Trim8_5x11);
        assert_eq!(TrimSize::parse("13x19"), TrimSize::Trim6x9);
        assert_eq!(TrimSize::parse(""), TrimSize::Trim6x9);
    }

    #[test]
    fn page_size_adds_bleed_per_edge() {
        let mut settings = BookSettings::new("Test");
        settings.bleed = true;
        let size = settings.page_size();
        assert_eq!(size.width.to_f32(), 6.0 * 72.0 + 18.0);
        assert_eq!(size.height.to_f32(), 9.0 * 72.0 + 18.0);

        settings.bleed = false;
        let size = settings.page_size();
        assert_eq!(size.width.to_f32(), 432.0);
        assert_eq!(size.height.to_f32(), 648.0);
    }

    #[test]
    fn validate_rejects_bad_puzzles_per_page() {
        for count in [0u8, 3, 5, 6] {
            let mut settings = BookSettings::new("Test");
            settings.puzzles_per_page = count;
            assert!(matches!(
                settings.validate(),
                Err(GridPressError::InvalidPuzzlesPerPage(c)) if c == count
            ));
        }
        for count in [1u8, 2, 4] {
            let mut settings = BookSettings::new("Test");
            settings.puzzles_per_page = count;
            assert!(settings.validate().is_ok());
        }
    }

    #[test]
    fn validate_rejects_empty_title_and_degenerate_margins() {
        let settings = BookSettings::new("  ");
        assert!(settings.validate().is_err());

        let mut settings = BookSettings::new("Test");
        settings.margins = Margins::all(400.0);
        assert!(settings.validate().is_err());
    }

    #[test]
    fn settings_deserialize_from_caller_json() {
        let json = r#"{
            "title": "Ocean Animals Word Search",
            "subtitle": "50 Puzzles",
            "trim_size": "8.5x11",
            "bleed": true,
            "puzzles_per_page": 2,
            "theme": "dark",
            "font_family": "times",
            "include_theme_facts": true
        }"#;
        let settings: BookSettings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.trim_size, TrimSize::Trim8_5x11);
        assert_eq!(settings.puzzles_per_page, 2);
        assert_eq!(settings.theme, Theme::Dark);
        assert_eq!(settings.font_family, FontFamily::Times);
        assert!(settings.include_answers, "answers default on");
        assert!(settings.include_theme_facts);
        assert_eq!(settings.margins, Margins::print_safe());
        assert_eq!(settings.cover_seed, super::DEFAULT_COVER_SEED);
    }

    #[test]
    fn unknown_trim_in_json_uses_fallback() {
        let settings: BookSettings =
            serde_json::from_str(r#"{"title": "T", "trim_size": "a4"}"#).unwrap();
        assert_eq!(settings.trim_size, TrimSize::Trim6x9);
    }

    #[test]
    fn dark_palette_swaps_text_and_background() {
        let light = Theme::Light.palette();
        let dark = Theme::Dark.palette();
        assert!(light.background.r > light.text.r);
        assert!(dark.text.r > dark.background.r);
    }
}

use crate::settings::FontFamily;
use crate::types::Pt;

// Average per-character advance as a fraction of the font size. Layout only
// needs stable estimates for centering and wrapping; the external renderer
// owns the real font programs and their exact metrics.
fn width_factor(family: FontFamily, bold: bool) -> f32 {
    match (family, bold) {
        (FontFamily::Helvetica, false) => 0.54,
        (FontFamily::Helvetica, true) => 0.58,
        (FontFamily::Times, false) => 0.50,
        (FontFamily::Times, true) => 0.53,
        // Courier is fixed pitch: every advance is exactly 600/1000 em.
        (FontFamily::Courier, _) => 0.60,
    }
}

pub(crate) fn measure_text(family: FontFamily, bold: bool, font_size: Pt, text: &str) -> Pt {
    font_size * width_factor(family, bold) * (text.chars().count() as i32)
}

// Greedy word wrap against a maximum line width. A single word wider than
// the limit stays on its own line rather than being broken mid-word.
pub(crate) fn wrap_text(
    family: FontFamily,
    bold: bool,
    font_size: Pt,
    max_width: Pt,
    text: &str,
) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };
        if current.is_empty() || measure_text(family, bold, font_size, &candidate) <= max_width {
            current = candidate;
        } else {
            lines.push(std::mem::take(&mut current));
            current = word.to_string();
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

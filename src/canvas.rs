use crate::types::{Color, Pt, Size};

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    SaveState,
    RestoreState,
    // Non-rendered metadata used for page-aware reporting. Ignored by renderers.
    Meta {
        key: String,
        value: String,
    },
    SetFillColor(Color),
    SetStrokeColor(Color),
    SetLineWidth(Pt),
    // Applies both fill and stroke alpha. Values outside 0..1 are clamped.
    SetOpacity {
        fill: f32,
        stroke: f32,
    },
    SetFontName(String),
    SetFontSize(Pt),
    DrawRect {
        x: Pt,
        y: Pt,
        width: Pt,
        height: Pt,
    },
    Fill,
    Stroke,
    FillStroke,
    DrawString {
        x: Pt,
        y: Pt,
        text: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub commands: Vec<Command>,
}

impl Page {
    fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub page_size: Size,
    pub pages: Vec<Page>,
}

#[derive(Debug, Clone)]
struct GraphicsState {
    fill_color: Color,
    stroke_color: Color,
    line_width: Pt,
    font_size: Pt,
    font_name: String,
}

impl GraphicsState {
    fn page_default() -> Self {
        Self {
            fill_color: Color::BLACK,
            stroke_color: Color::BLACK,
            line_width: Pt::from_f32(1.0),
            font_size: Pt::from_f32(12.0),
            font_name: "Helvetica".to_string(),
        }
    }
}

// Records draw commands into pages. Coordinates are points, origin at the
// top-left corner of the page, y increasing downward. State setters are
// deduplicated against the tracked graphics state so repeated color/font
// selection does not bloat the command stream.
pub struct Canvas {
    page_size: Size,
    pages: Vec<Page>,
    current: Page,
    state_stack: Vec<GraphicsState>,
    current_state: GraphicsState,
}

impl Canvas {
    pub fn new(page_size: Size) -> Self {
        Self {
            page_size,
            pages: Vec::new(),
            current: Page::new(),
            state_stack: Vec::new(),
            current_state: GraphicsState::page_default(),
        }
    }

    pub fn page_size(&self) -> Size {
        self.page_size
    }

    pub fn save_state(&mut self) {
        self.state_stack.push(self.current_state.clone());
        self.current.commands.push(Command::SaveState);
    }

    pub fn restore_state(&mut self) {
        if let Some(state) = self.state_stack.pop() {
            self.current_state = state;
            self.current.commands.push(Command::RestoreState);
        }
    }

    pub fn meta(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.current.commands.push(Command::Meta {
            key: key.into(),
            value: value.into(),
        });
    }

    pub fn set_fill_color(&mut self, color: Color) {
        if self.current_state.fill_color == color {
            return;
        }
        self.current_state.fill_color = color;
        self.current.commands.push(Command::SetFillColor(color));
    }

    pub fn set_stroke_color(&mut self, color: Color) {
        if self.current_state.stroke_color == color {
            return;
        }
        self.current_state.stroke_color = color;
        self.current.commands.push(Command::SetStrokeColor(color));
    }

    pub fn set_line_width(&mut self, width: Pt) {
        let width = if width < Pt::ZERO { Pt::ZERO } else { width };
        if self.current_state.line_width == width {
            return;
        }
        self.current_state.line_width = width;
        self.current.commands.push(Command::SetLineWidth(width));
    }

    pub fn set_opacity(&mut self, fill: f32, stroke: f32) {
        self.current.commands.push(Command::SetOpacity {
            fill: fill.clamp(0.0, 1.0),
            stroke: stroke.clamp(0.0, 1.0),
        });
    }

    pub fn set_font_name(&mut self, name: &str) {
        if self.current_state.font_name == name {
            return;
        }
        self.current_state.font_name = name.to_string();
        self.current
            .commands
            .push(Command::SetFontName(self.current_state.font_name.clone()));
    }

    pub fn set_font_size(&mut self, size: Pt) {
        if self.current_state.font_size == size {
            return;
        }
        self.current_state.font_size = size;
        self.current.commands.push(Command::SetFontSize(size));
    }

    pub fn draw_rect(&mut self, x: Pt, y: Pt, width: Pt, height: Pt) {
        self.current.commands.push(Command::DrawRect {
            x,
            y,
            width,
            height,
        });
    }

    pub fn fill(&mut self) {
        self.current.commands.push(Command::Fill);
    }

    pub fn stroke(&mut self) {
        self.current.commands.push(Command::Stroke);
    }

    pub fn fill_stroke(&mut self) {
        self.current.commands.push(Command::FillStroke);
    }

    pub fn draw_string(&mut self, x: Pt, y: Pt, text: impl Into<String>) {
        self.current.commands.push(Command::DrawString {
            x,
            y,
            text: text.into(),
        });
    }

    pub fn current_command_count(&self) -> usize {
        self.current.commands.len()
    }

    pub fn is_current_empty(&self) -> bool {
        self.current.commands.is_empty()
    }

    pub fn show_page(&mut self) {
        let current = std::mem::replace(&mut self.current, Page::new());
        self.pages.push(current);
        self.state_stack.clear();
        self.current_state = GraphicsState::page_default();
    }

    pub fn finish(mut self) -> Document {
        if !self.current.commands.is_empty() || self.pages.is_empty() {
            self.show_page();
        }
        Document {
            page_size: self.page_size,
            pages: self.pages,
        }
    }

    pub fn finish_without_show(self) -> Document {
        Document {
            page_size: self.page_size,
            pages: self.pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Size;

    fn canvas() -> Canvas {
        Canvas::new(Size::from_inches(6.0, 9.0))
    }

    #[test]
    fn repeated_state_setters_are_deduplicated() {
        let mut canvas = canvas();
        canvas.set_fill_color(Color::rgb(0.2, 0.2, 0.2));
        canvas.set_fill_color(Color::rgb(0.2, 0.2, 0.2));
        canvas.set_font_name("Courier");
        canvas.set_font_name("Courier");
        canvas.set_font_size(Pt::from_f32(10.0));
        canvas.set_font_size(Pt::from_f32(10.0));
        assert_eq!(canvas.current_command_count(), 3);
    }

    #[test]
    fn state_resets_between_pages() {
        let mut canvas = canvas();
        canvas.set_fill_color(Color::rgb(0.5, 0.5, 0.5));
        canvas.show_page();
        // Same color on the new page must be recorded again.
        canvas.set_fill_color(Color::rgb(0.5, 0.5, 0.5));
        assert_eq!(canvas.current_command_count(), 1);
    }

    #[test]
    fn restore_pops_tracked_state() {
        let mut canvas = canvas();
        canvas.set_fill_color(Color::WHITE);
        canvas.save_state();
        canvas.set_fill_color(Color::BLACK);
        canvas.restore_state();
        // White is the tracked color again, so re-setting it is a no-op.
        let before = canvas.current_command_count();
        canvas.set_fill_color(Color::WHITE);
        assert_eq!(canvas.current_command_count(), before);
    }

    #[test]
    fn finish_flushes_trailing_page() {
        let mut canvas = canvas();
        canvas.draw_string(Pt::ZERO, Pt::ZERO, "x");
        let doc = canvas.finish();
        assert_eq!(doc.pages.len(), 1);

        let empty = Canvas::new(Size::from_inches(6.0, 9.0)).finish();
        assert_eq!(empty.pages.len(), 1);
    }

    #[test]
    fn opacity_is_clamped() {
        let mut canvas = canvas();
        canvas.set_opacity(1.4, -0.2);
        assert_eq!(
            canvas.current.commands[0],
            Command::SetOpacity {
                fill: 1.0,
                stroke: 0.0
            }
        );
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageMetrics {
    pub page_number: usize,
    pub kind: String,
    pub command_count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookMetrics {
    pub pages: Vec<PageMetrics>,
    pub total_commands: usize,
}

impl BookMetrics {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

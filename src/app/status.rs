#[derive(Debug, Clone)]
pub struct StatusLine {
    message: String,
}

pub const READY_STATUS: &str = "Ready. Tab navigates, Ctrl+S submits, Ctrl+Q quits.";

impl Default for StatusLine {
    fn default() -> Self {
        Self {
            message: READY_STATUS.to_string(),
        }
    }
}

impl StatusLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_raw(&mut self, msg: impl Into<String>) {
        self.message = msg.into();
    }

    pub fn ready(&mut self) {
        self.message = READY_STATUS.to_string();
    }

    pub fn editing(&mut self, label: &str) {
        self.message = format!("Editing {label}");
    }

    pub fn loading(&mut self, what: &str) {
        self.message = format!("Loading {what}…");
    }

    pub fn submitting(&mut self) {
        self.message = "Submitting…".to_string();
    }

    pub fn blocked(&mut self, invalid: usize) {
        self.message = format!("{invalid} field(s) need attention before submitting");
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

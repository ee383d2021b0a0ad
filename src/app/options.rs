use std::time::Duration;

use anyhow::Result;

#[derive(Debug, Clone)]
pub struct UiOptions {
    pub tick_rate: Duration,
    /// How long the success banner stays up before returning to the overview.
    pub return_delay: Duration,
    pub page_size: u32,
}

impl Default for UiOptions {
    fn default() -> Self {
        Self {
            tick_rate: Duration::from_millis(250),
            return_delay: Duration::from_millis(1000),
            page_size: 10,
        }
    }
}

/// Entry point: connect to a forms server and run the TUI.
#[derive(Debug, Clone)]
pub struct DynaForm {
    base_url: String,
    form_id: Option<String>,
    options: UiOptions,
}

impl DynaForm {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            form_id: None,
            options: UiOptions::default(),
        }
    }

    /// Skip the overview and open the fill view for one form.
    pub fn with_form(mut self, id: impl Into<String>) -> Self {
        self.form_id = Some(id.into());
        self
    }

    pub fn with_options(mut self, options: UiOptions) -> Self {
        self.options = options;
        self
    }

    pub fn run(self) -> Result<()> {
        let DynaForm {
            base_url,
            form_id,
            options,
        } = self;
        super::App::new(base_url, form_id, options).run()
    }
}

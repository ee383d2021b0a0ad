pub(crate) mod build;
mod options;
mod runtime;
mod status;
mod terminal;
mod worker;

pub use options::{DynaForm, UiOptions};
pub(crate) use runtime::App;
pub(crate) use status::StatusLine;
#[cfg(test)]
pub(crate) use worker::ApiEvent;

use std::fs::File;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use dynaform::{DynaForm, UiOptions};

#[derive(Debug, Parser)]
#[command(
    name = "dynaform",
    version,
    about = "Browse, build, and fill dynamic forms from the terminal"
)]
struct Cli {
    /// Base URL of the forms server
    #[arg(
        short = 'u',
        long = "base-url",
        env = "DYNAFORM_SERVER_URL",
        value_name = "URL"
    )]
    base_url: String,

    /// Open the fill view for one form instead of the overview
    #[arg(short = 'f', long = "form", value_name = "ID")]
    form: Option<String>,

    /// Event poll interval in milliseconds
    #[arg(long = "tick-ms", value_name = "MS", default_value_t = 250)]
    tick_ms: u64,

    /// Write tracing output to this file (stdout belongs to the UI)
    #[arg(long = "log-file", value_name = "PATH")]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        let file = File::create(path)
            .wrap_err_with(|| format!("cannot open log file {}", path.display()))?;
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "dynaform=debug".into()),
            )
            .with_writer(file)
            .with_ansi(false)
            .init();
    }

    let options = UiOptions {
        tick_rate: Duration::from_millis(cli.tick_ms),
        ..UiOptions::default()
    };

    let mut ui = DynaForm::new(cli.base_url).with_options(options);
    if let Some(form) = cli.form {
        ui = ui.with_form(form);
    }
    ui.run().map_err(|err| color_eyre::eyre::eyre!(err))
}

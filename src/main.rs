//! tagpick - fill in a form of pickers and tag inputs from the terminal.
//!
//! Reads a form file, lets the user pick values, and prints the submitted
//! fields on stdout.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tracing::{error, warn};

use tagpick::app::{self, App, Submission};
use tagpick::config::{FormSpec, Settings};
use tagpick::error::{AppError, Result};
use tagpick::logging;
use tagpick::mount::Form;
use tagpick::ui::Theme;

/// Fill in a form of pickers and tag inputs.
#[derive(Debug, Parser)]
#[command(name = "tagpick", version, about)]
struct Cli {
    /// Form file to mount.
    form: PathBuf,

    /// Settings file to use instead of the default location.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print the submission as a JSON object.
    #[arg(long)]
    json: bool,

    /// Log debug output.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose) {
        // Logging is optional; the form still works without it
        eprintln!("Warning: could not initialize logging: {e}");
    }

    let code = match run(&cli) {
        Ok(Some(submission)) => match print_submission(&submission, cli.json) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                error!(error = %e, "Could not print submission");
                eprintln!("{}", e.user_message());
                ExitCode::FAILURE
            }
        },
        Ok(None) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, critical = e.is_critical(), "tagpick failed");
            eprintln!("{}", e.user_message());
            ExitCode::FAILURE
        }
    };

    logging::shutdown();
    code
}

fn run(cli: &Cli) -> Result<Option<Submission>> {
    let settings = Settings::load(cli.config.as_deref())?;
    let spec = FormSpec::load(&cli.form)?;
    if spec.controls.is_empty() {
        warn!(path = %cli.form.display(), "Form has no controls");
    }

    let form = Form::mount(&spec, &settings);
    let app = App::new(form, Theme::named(&settings.theme));
    app::run(app, Duration::from_millis(settings.tick_rate_ms))
}

fn print_submission(submission: &Submission, json: bool) -> Result<()> {
    if json {
        let object: serde_json::Map<String, serde_json::Value> = submission
            .iter()
            .map(|(name, value)| (name.clone(), serde_json::Value::String(value.clone())))
            .collect();
        let text = serde_json::to_string_pretty(&object)
            .map_err(|e| AppError::other(format!("Could not encode submission: {e}")))?;
        println!("{text}");
    } else {
        for (name, value) in submission {
            println!("{name}={value}");
        }
    }
    Ok(())
}

use clap::Parser;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use serde_json::Value;
use std::{
    fs::File,
    io::{stderr, BufReader},
    path::{Path, PathBuf},
    sync::Arc,
};

use wrap_context::{arg_context, raw_context, wohyna};

use chooser::{utils, JsonFileResolver, Select, SelectConfig};

mod app;
mod dropdown_model;
mod dropdown_view;
mod event;
mod handler;
mod logging;
mod textline_model;
mod textline_view;
mod tui;
mod types;

use crate::{app::App, event::EventHandler, tui::Tui, utils::DEBUG_PRINT_LIMIT};

/// Pick values from a JSON list in the terminal
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// JSON array of records
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// JSON file with select settings, flags below override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Allow picking several values
    #[arg(short, long)]
    multiple: bool,

    /// Record field holding the value
    #[arg(long)]
    value_key: Option<String>,

    /// Record field holding the label
    #[arg(long)]
    label_key: Option<String>,

    /// Record field holding the tag color, also turns colored tags on
    #[arg(long)]
    color_key: Option<String>,

    /// Show at most this many options at once
    #[arg(long)]
    max_displayed: Option<usize>,

    /// Initial value: JSON (`"fr"`, `["fr","de"]`, `42`) or a bare string
    #[arg(long)]
    value: Option<String>,

    /// JSON object of `value -> label` for values FILE doesn't contain
    #[arg(long)]
    fallback: Option<PathBuf>,

    /// Text shown while nothing is selected
    #[arg(short, long)]
    placeholder: Option<String>,

    /// Log file
    #[arg(long, default_value = "chooser.log")]
    log_file: PathBuf,

    /// Log at debug level unless CHOOSER_LOG or RUST_LOG say otherwise
    #[arg(short, long)]
    verbose: bool,

    /// Debug print limit
    #[arg(short, long, default_value = "1")]
    debug_print_limit: usize,
}

impl Cli {
    fn select_config(&self) -> anyhow::Result<SelectConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let text = arg_context!(std::fs::read_to_string(path))?;
                raw_context!(serde_json::from_str::<SelectConfig>(&text))?
            }
            None => SelectConfig::default(),
        };

        if self.multiple {
            config.multiple = true;
        }
        if let Some(key) = &self.value_key {
            config.keys.value = key.clone();
        }
        if let Some(key) = &self.label_key {
            config.keys.label = key.clone();
        }
        if let Some(key) = &self.color_key {
            config.keys.color = Some(key.clone());
            config.custom_colored_tags = true;
        }
        if let Some(max) = self.max_displayed {
            config.max_displayed_options = Some(max);
        }
        if let Some(placeholder) = &self.placeholder {
            config.placeholder = placeholder.clone();
        }

        anyhow::Ok(config)
    }
}

/// `--value fr` is taken as the string "fr", anything parsable as JSON as that JSON
fn parse_value(value: &str) -> Value {
    serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()))
}

fn read_records(path: &Path) -> anyhow::Result<Vec<Value>> {
    let reader = BufReader::new(arg_context!(File::open(path))?);
    let records = raw_context!(serde_json::from_reader::<_, Vec<Value>>(reader))?;

    anyhow::Ok(records)
}

fn exit<B: Backend>(tui: &mut Tui<B>) {
    if let Err(err) = tui.exit() {
        eprintln!(
            "Failed to restore terminal. Run `reset` / `stty sane` or restart your terminal to recover: {}",
            err
        );
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    raw_context!(DEBUG_PRINT_LIMIT
        .set(args.debug_print_limit)
        .map_err(|err| wohyna!("Second initialization with value: {:?}", err)))?;

    arg_context!(logging::init(&args.log_file, args.verbose))?;

    let config = arg_context!(args.select_config())?;
    let records = arg_context!(read_records(&args.file))?;

    let mut select = Select::new(config);
    if let Some(value) = &args.value {
        arg_context!(select.write_value(&parse_value(value)))?;
    }
    select.set_options(Some(records));

    let resolver = args
        .fallback
        .clone()
        .map(|path| Arc::new(JsonFileResolver::new(path)));

    let backend = CrosstermBackend::new(stderr());
    let terminal = raw_context!(Terminal::new(backend))?;
    let terminal_size = arg_context!(terminal.size())?;
    let events = EventHandler::new(250);
    let sender = events.sender();

    let mut tui = Tui::new(terminal, events);
    arg_context!(tui.init()).map_err(|err| {
        exit(&mut tui);
        err
    })?;

    let mut app = raw_context!(App::new(
        terminal_size,
        &args.file,
        select,
        resolver,
        sender
    ))
    .map_err(|err| {
        exit(&mut tui);
        err
    })?;

    arg_context!(app.run(&mut tui).await).map_err(|err| {
        exit(&mut tui);
        err
    })?;

    exit(&mut tui);

    arg_context!(app.print())?;

    anyhow::Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn values_from_the_command_line() {
        assert_eq!(parse_value("fr"), json!("fr"));
        assert_eq!(parse_value(r#"["fr","de"]"#), json!(["fr", "de"]));
        assert_eq!(parse_value("42"), json!(42));
    }

    #[test]
    fn flags_fill_the_config() {
        let cli = Cli::try_parse_from([
            "chooser",
            "countries.json",
            "--multiple",
            "--label-key",
            "name",
            "--color-key",
            "flag",
            "--max-displayed",
            "10",
        ]);
        assert!(cli.is_ok());

        let config = cli.ok().and_then(|cli| cli.select_config().ok());
        let expected = {
            let mut expected = SelectConfig::default();
            expected.multiple = true;
            expected.keys.label = "name".into();
            expected.keys.color = Some("flag".into());
            expected.custom_colored_tags = true;
            expected.max_displayed_options = Some(10);
            expected
        };

        assert_eq!(config, Some(expected));
    }
}

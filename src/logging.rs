use std::{fs::OpenOptions, path::Path, sync::Mutex};
use tracing_subscriber::EnvFilter;

use wrap_context::{arg_context, raw_context, wohyna};

/// First parsable of `CHOOSER_LOG`, `RUST_LOG`, then `debug` or `warn`
/// depending on `--verbose`.
fn build_env_filter(chooser_log: Option<&str>, rust_log: Option<&str>, verbose: bool) -> EnvFilter {
    for directives in [chooser_log, rust_log].into_iter().flatten() {
        if let Ok(filter) = EnvFilter::try_new(directives) {
            return filter;
        }
    }

    EnvFilter::new(if verbose { "debug" } else { "warn" })
}

/// Logs go to `log_file`, the terminal belongs to the UI.
pub fn init(log_file: &Path, verbose: bool) -> anyhow::Result<()> {
    let filter = build_env_filter(
        std::env::var("CHOOSER_LOG").ok().as_deref(),
        std::env::var("RUST_LOG").ok().as_deref(),
        verbose,
    );

    let file = arg_context!(OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file))?;

    raw_context!(tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|err| wohyna!("Failed to install the log subscriber: {}", err)))?;

    anyhow::Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn priority_chain() {
        assert_eq!(
            build_env_filter(Some("chooser=trace"), Some("info"), false).to_string(),
            "chooser=trace"
        );
        assert_eq!(build_env_filter(None, Some("info"), false).to_string(), "info");
        assert_eq!(build_env_filter(None, None, true).to_string(), "debug");
        assert_eq!(build_env_filter(None, None, false).to_string(), "warn");
    }
}

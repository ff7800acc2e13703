use anyhow::{bail, Context, Result};
use std::fs;
use std::io::{IsTerminal, Read};
use std::path::Path;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Route tracing output to stderr. `RUST_LOG` wins over `--debug`.
pub fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .try_init();
}

pub fn read_stdin() -> Result<String> {
    let mut buf = Vec::new();
    std::io::stdin().read_to_end(&mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Lossy read: the query tool may emit stray non-UTF-8 bytes.
pub fn read_text_file(path: &Path) -> Result<String> {
    let bytes = fs::read(path).with_context(|| format!("read {}", path.display()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Report text from `--input`, else from piped stdin.
pub fn read_report(input: Option<&Path>) -> Result<String> {
    if let Some(path) = input {
        return read_text_file(path);
    }
    if std::io::stdin().is_terminal() {
        bail!(
            "no report on stdin; pipe `dslsstat -usage` output into license-level or pass --input <FILE>"
        );
    }
    read_stdin().context("read report from stdin")
}

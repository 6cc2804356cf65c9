use snippets_core::Result;
use std::io::BufRead;
use tracing_subscriber::EnvFilter;

/// Install the stderr log subscriber. `RUST_LOG` wins over `debug`.
pub fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Read a whole message, dropping the trailing newline a shell pipe adds
pub fn read_message<R: BufRead>(mut reader: R) -> Result<String> {
    let mut message = String::new();
    reader.read_to_string(&mut message)?;

    if message.ends_with('\n') {
        message.pop();
        if message.ends_with('\r') {
            message.pop();
        }
    }
    Ok(message)
}

//! The default command: fetch events and render them.

use std::io::Write;

use tracing::debug;

use crate::error::{ClientError, ClientResult};
use crate::render::{OutputFormat, render};
use crate::service::{EventService, FetchParams};

/// Fetches events for `params` and writes them to `out` in `format`.
pub async fn run(
    service: &EventService,
    params: &FetchParams,
    format: OutputFormat,
    out: &mut impl Write,
) -> ClientResult<()> {
    let result = service.fetch_events(params).await?;
    writeln!(out, "{}", render(&result, format)?)?;
    Ok(())
}

/// Reports a failed command.
///
/// JSON output gets the `{"error": ...}` body on `out`; everything else,
/// and JSON output that cannot be written, gets a plain `error:` line on
/// `err_out`.
pub fn report_error(
    err: &ClientError,
    format: OutputFormat,
    out: &mut impl Write,
    err_out: &mut impl Write,
) -> std::io::Result<()> {
    if format == OutputFormat::Json {
        match writeln!(out, "{}", err.error_body()) {
            Ok(()) => return Ok(()),
            Err(e) => debug!(error = %e, "Failed to write JSON error body"),
        }
    }
    writeln!(err_out, "error: {}", err)
}

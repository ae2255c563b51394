//! Marker tag sync hook - binary entry point.
//!
//! Reads the invocation payload from stdin, syncs the marker's tags onto its
//! scene and prints the terminal result object on stdout.

use std::io;
use std::process::ExitCode;

use anyhow::Context;

use markertag_engine::api::{report, HookPayload, HookResult, Stopwatch};
use markertag_engine::infrastructure::host_log;
use markertag_engine::HookError;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    let stopwatch = Stopwatch::start();

    host_log::init().context("failed to install logger")?;

    let outcome = match HookPayload::from_reader(io::stdin().lock()) {
        Ok(payload) => markertag_engine::run_hook(&payload).await,
        Err(e) => Err(e),
    };

    let result = match outcome {
        Ok(outcome) => match outcome.message() {
            Some(message) => HookResult::output(message),
            // No scene in the event: nothing to report.
            None => return Ok(ExitCode::SUCCESS),
        },
        Err(e) => {
            log_failure(&e);
            HookResult::failure(&e)
        }
    };

    report(&result, &stopwatch, io::stdout().lock()).context("failed to write hook result")?;

    Ok(if result.is_failure() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn log_failure(error: &HookError) {
    if error.is_fatal() {
        tracing::error!(error = %error, "Marker tag sync aborted");
    } else {
        tracing::warn!(error = %error, "Marker tag sync failed");
    }
}

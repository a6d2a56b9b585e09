//! User-facing error message formatting.
//!
//! Matches on `GridError` variants and `io::ErrorKind` rather than parsing
//! strings, so notices stay short and actionable.

use crate::error::GridError;
use std::io;

/// Format a request failure as a one-line notice. `action` names what the user tried,
/// e.g. "Loading detail for 51a0c".
pub fn user_message(err: &GridError, action: &str) -> String {
    let reason = match err {
        GridError::NetworkFailure(msg) => {
            format!("Could not reach the server ({}). Try again.", msg)
        }
        GridError::ServerError { status, message } if message.is_empty() => {
            format!("Server returned {}.", status)
        }
        GridError::ServerError { status, message } => {
            format!("Server returned {}: {}", status, message)
        }
        GridError::Decode(msg) => format!("Server sent an unexpected response: {}", msg),
        GridError::StaleResponse => return String::new(),
    };
    if action.is_empty() {
        reason
    } else {
        format!("{} failed. {}", action, reason)
    }
}

/// Format an io::Error from the transport by its kind.
pub fn user_message_from_io(err: &io::Error) -> String {
    use std::io::ErrorKind;

    match err.kind() {
        ErrorKind::ConnectionRefused => "connection refused".to_string(),
        ErrorKind::ConnectionReset => "connection reset".to_string(),
        ErrorKind::ConnectionAborted => "connection aborted".to_string(),
        ErrorKind::TimedOut => "request timed out".to_string(),
        ErrorKind::NotFound => "host not found".to_string(),
        ErrorKind::UnexpectedEof => "connection closed early".to_string(),
        _ => err.to_string(),
    }
}

/// Format a color_eyre Report by walking its cause chain for known error types.
pub fn user_message_from_report(report: &color_eyre::eyre::Report) -> String {
    for cause in report.chain() {
        if let Some(grid_err) = cause.downcast_ref::<GridError>() {
            return user_message(grid_err, "");
        }
        if let Some(io_err) = cause.downcast_ref::<io::Error>() {
            return user_message_from_io(io_err);
        }
    }

    // Fallback: first line of the display to avoid long tracebacks
    let display = report.to_string();
    display
        .lines()
        .next()
        .map(str::trim)
        .unwrap_or("An error occurred")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_failure_mentions_action() {
        let msg = user_message(
            &GridError::NetworkFailure("connection refused".into()),
            "Loading detail for r1",
        );
        assert!(msg.starts_with("Loading detail for r1 failed."), "{}", msg);
        assert!(msg.contains("connection refused"), "{}", msg);
    }

    #[test]
    fn test_server_error_includes_status() {
        let msg = user_message(&GridError::server(500, ""), "");
        assert_eq!(msg, "Server returned 500.");
        let msg = user_message(&GridError::server(409, "already traded"), "");
        assert!(msg.contains("409") && msg.contains("already traded"));
    }

    #[test]
    fn test_stale_response_is_silent() {
        assert!(user_message(&GridError::StaleResponse, "anything").is_empty());
    }

    #[test]
    fn test_report_chain_finds_grid_error() {
        let report = color_eyre::eyre::Report::new(GridError::Decode("not json".into()));
        let msg = user_message_from_report(&report);
        assert!(msg.contains("not json"), "{}", msg);
    }

    #[test]
    fn test_io_timeout() {
        let err = io::Error::new(io::ErrorKind::TimedOut, "timed out");
        assert_eq!(user_message_from_io(&err), "request timed out");
    }
}

mod cli;
mod infra;
mod routes;
mod server;

use std::error::Error;

use receipt_points::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}

/// One line per error in the `source` chain. A cause whose message its parent already
/// quotes is left out.
pub fn error_report(err: &(dyn Error + 'static)) -> String {
    let mut report = err.to_string();
    let mut shown = report.clone();
    let mut cause = err.source();

    while let Some(inner) = cause {
        let message = inner.to_string();
        if !shown.contains(&message) {
            report.push_str("\n  caused by: ");
            report.push_str(&message);
        }
        shown = message;
        cause = inner.source();
    }

    report
}

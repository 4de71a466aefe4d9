use std::process::ExitCode;

use receipt_points_api::{error_report, run};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("receipt-points-api: {}", error_report(&err));
            ExitCode::FAILURE
        }
    }
}

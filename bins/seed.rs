use dotenvy::dotenv;
use tracing::error;

#[tokio::main]
async fn main() -> std::process::ExitCode {
    dotenv().ok();
    common::utils::logging::init_logging_default();

    match server::seed::run().await {
        Ok(summary) => {
            println!(
                "seed complete: {} users, {} customers, {} locations, {} work orders",
                summary.users, summary.customers, summary.locations, summary.work_orders
            );
            std::process::ExitCode::SUCCESS
        }
        Err(e) => {
            error!(service = "fieldserve", event = "seed_failed", error = %e, "database seed failed");
            eprintln!("seed failed: {e}");
            std::process::ExitCode::FAILURE
        }
    }
}

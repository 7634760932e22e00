mod app;
mod bot;
mod config;
mod domain;
mod infrastructure;
mod managers;

use app::App;
use config::Config;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load environment variables
    dotenv::dotenv().ok();

    let config = Config::from_env().expect("Invalid configuration");
    let app = App::build(&config).expect("Failed to wire the storefront");

    tracing::info!(
        data_dir = %config.data_dir.display(),
        sweep_interval_secs = config.sweep_interval_secs,
        "Storefront core ready, sweep loop running"
    );
    // The host chat transport drives `app.router`; this binary keeps
    // the background sweep loop alive.
    app.sweeper.run().await;
}

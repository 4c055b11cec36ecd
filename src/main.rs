use std::env;

use hiresim::{cli, telemetry};
use tracing::Level;

fn main() {
    let json_logs = env::var("HIRESIM_LOG_JSON").is_ok_and(|v| v == "1");
    telemetry::init_tracing(json_logs, Level::WARN);

    let args: Vec<String> = env::args().collect();
    std::process::exit(cli::run_with_args(&args));
}

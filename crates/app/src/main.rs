use std::process;

mod headless;
mod logging;

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let parsed = match headless::parse_args(&args) {
        Ok(parsed) => parsed,
        Err(err) => {
            eprintln!("error: {err}");
            process::exit(2);
        }
    };
    if parsed.help {
        headless::print_help();
        return;
    }

    let initial = parsed
        .log_level
        .unwrap_or(tracing_subscriber::filter::LevelFilter::INFO);
    let log_level = logging::setup_tracing(initial);
    tracing::info!("geograph starting");

    if let Err(err) = headless::run(&parsed, &log_level) {
        eprintln!("error: {err}");
        process::exit(1);
    }
}

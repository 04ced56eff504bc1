use harvest::command_argument_builder;
use harvest::handlers::{handle_download, handle_scrape};
use harvest::log_filter;
use harvest_core::print_banner;
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: u8, quiet: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_filter(verbose, quiet)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() {
    let cmd = command_argument_builder();
    let chosen_command = cmd.get_matches();
    let quiet = chosen_command.get_flag("quiet");
    let verbose = chosen_command.get_count("verbose");

    init_tracing(verbose, quiet);

    // Show banner unless --quiet flag is set
    if !quiet {
        print_banner();
    }

    let code = match chosen_command.subcommand() {
        Some(("scrape", primary_command)) => handle_scrape(primary_command, quiet).await,
        Some(("download", primary_command)) => handle_download(primary_command, quiet).await,
        // No subcommand provided, just show the banner
        None => 0,
        _ => unreachable!("clap should ensure we don't get here"),
    };

    std::process::exit(code);
}

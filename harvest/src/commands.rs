use crate::CLAP_STYLING;
use clap::{arg, command};
use harvest_core::AcquireMode;

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("harvest")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("harvest")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress banner, spinner and non-essential output").required(false))
        .arg(
            arg!(-v --"verbose" ... "Increase log verbosity (-v info, -vv debug, -vvv trace)")
                .required(false),
        )
        .subcommand_required(false)
        .subcommand(
            command!("scrape")
                .about(
                    "Render a page and extract its code blocks and links to .js, .css and .html \
                files.",
                )
                .arg(
                    arg!(-u --"url" <URL>)
                        .required(true)
                        .help("The page to scrape"),
                )
                .arg(
                    arg!(--"username" <USERNAME>)
                        .required(false)
                        .help("Log in with this account before scraping (implies a browser)")
                        .requires("password"),
                )
                .arg(
                    arg!(--"password" <PASSWORD>)
                        .required(false)
                        .env("HARVEST_PASSWORD")
                        .hide_env_values(true)
                        .help("Password for --username"),
                )
                .arg(
                    arg!(-m --"mode" <MODE>)
                        .required(false)
                        .help(
                            "Acquisition mode: auto, static or dynamic (auto picks the browser \
                        only when logging in)",
                        )
                        .value_parser(clap::value_parser!(AcquireMode))
                        .default_value("auto"),
                )
                .arg(
                    arg!(--"login-url" <URL>)
                        .required(false)
                        .help("Page holding the login form (default: the target URL)"),
                )
                .arg(
                    arg!(--"wait-for" <SELECTOR>)
                        .required(false)
                        .help("CSS selector that marks a rendered page as ready (default: pre)"),
                )
                .arg(
                    arg!(-t --"timeout" <SECONDS>)
                        .required(false)
                        .help("Request and navigation timeout in seconds")
                        .value_parser(clap::value_parser!(u64).range(1..)),
                )
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Report format: text, json, markdown")
                        .value_parser(["text", "json", "markdown", "md"])
                        .default_value("text"),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Save report to file (default: display to screen)"),
                ),
        )
        .subcommand(
            command!("download")
                .about("Download a single asset and save it as <FILENAME>.zip")
                .arg(
                    arg!(-u --"url" <URL>)
                        .required(true)
                        .help("The asset to download"),
                )
                .arg(
                    arg!(-n --"filename" <FILENAME>)
                        .required(true)
                        .help("Name of the file inside the archive"),
                )
                .arg(
                    arg!(-o --"output" <DIR>)
                        .required(false)
                        .help("Directory to write the archive into")
                        .default_value("."),
                )
                .arg(
                    arg!(-t --"timeout" <SECONDS>)
                        .required(false)
                        .help("Request timeout in seconds")
                        .value_parser(clap::value_parser!(u64).range(1..)),
                ),
        )
}

use crate::CLAP_STYLING;
use clap::arg;
use url::Url;

/// Validate a `--url` value but keep the string exactly as typed
fn parse_page_url(value: &str) -> Result<String, url::ParseError> {
    Url::parse(value).map(|_| value.to_string())
}

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("sitepulse")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("sitepulse")
        .styles(CLAP_STYLING)
        .about(
            "Fetch a list of pages concurrently and report each page's title, status and \
            response time.",
        )
        .arg(arg!(-q --"quiet" "Suppress banner, progress spinner and info logging").required(false))
        .arg(
            arg!(-u --"url" <URL>)
                .required(false)
                .help("A page to fetch; repeat for several (default: built-in target list)")
                .value_parser(parse_page_url)
                .action(clap::ArgAction::Append)
                .conflicts_with("hosts-file"),
        )
        .arg(
            arg!(-H --"hosts-file" <PATH>)
                .required(false)
                .help("Path to a newline-delimited file of URLs to fetch")
                .conflicts_with("url"),
        )
        .arg(
            arg!(-o --"output" <PATH>)
                .required(false)
                .help("Where to save the results (default: results.csv or results.json)"),
        )
        .arg(
            arg!(-f --"format" <FORMAT>)
                .required(false)
                .help("Saved results format: csv, json")
                .value_parser(["csv", "json"])
                .default_value("csv"),
        )
        .arg(
            arg!(--"no-table")
                .required(false)
                .help("Only print the summary, not the per-page results table")
                .action(clap::ArgAction::SetTrue),
        )
}

//! recsort: order delimited text rows by typed fields
//!
//! Each line is split into cells that are typed as numbers, booleans or
//! text, and rows are ordered by any number of `FIELD[:asc|:desc]` keys.
//! Empty cells always sort after filled ones.

use clap::{Arg, ArgAction, Command};
use std::process;

use recsort::{
    config::{SortConfig, SortConfigBuilder},
    error::{SortError, SortResult},
    sort,
    sort_spec::SortKey,
};

fn main() {
    let matches = build_cli().get_matches();
    init_logging(matches.get_flag("debug"));

    let result = parse_config_from_matches(&matches).and_then(|config| sort(&config));
    match result {
        Ok(exit_code) => process::exit(exit_code),
        Err(e) => {
            eprintln!("recsort: {}", e);
            process::exit(e.exit_code());
        }
    }
}

fn init_logging(debug: bool) {
    let default_filter = if debug { "debug" } else { "warn" };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .try_init();
}

fn build_cli() -> Command {
    Command::new("recsort")
        .version(env!("CARGO_PKG_VERSION"))
        .override_usage("recsort [OPTION]... [FILE]...")
        .about("Sort delimited text rows by typed fields")
        .long_about("Sort delimited text rows by typed fields.\n\nCells are typed as integers, floats, booleans or text. Text compares case-insensitively, numbers numerically, and an empty cell always sorts after a filled one whatever the key's direction.")

        .arg(Arg::new("files")
            .help("Input files to sort (use '-' or omit for stdin)")
            .num_args(0..)
            .value_name("FILE"))

        .arg(Arg::new("key")
            .short('k')
            .long("key")
            .help("Sort via a field; KEYDEF is FIELD[:asc|:desc]")
            .long_help("Sort via a field; KEYDEF is FIELD[:asc|:desc].\n\nFIELD is a column name when --header is given, otherwise a 1-based column number. Field 0 is the whole line. Keys are applied in the order given; later keys only break ties.\n\nExamples:\n  size:desc  - largest first\n  2          - second column ascending")
            .value_name("KEYDEF")
            .action(ArgAction::Append))
        .arg(Arg::new("reverse")
            .short('r')
            .long("reverse")
            .help("Reverse the direction of every key")
            .action(ArgAction::SetTrue))
        .arg(Arg::new("field-separator")
            .short('t')
            .long("field-separator")
            .help("Use SEP to split columns (default TAB)")
            .value_name("SEP"))
        .arg(Arg::new("header")
            .short('H')
            .long("header")
            .help("First line names the columns and is kept on top")
            .action(ArgAction::SetTrue))
        .arg(Arg::new("text")
            .long("text")
            .help("Treat every cell as text")
            .action(ArgAction::SetTrue))

        .arg(Arg::new("output")
            .short('o')
            .long("output")
            .help("Write result to FILE instead of standard output")
            .value_name("FILE"))
        .arg(Arg::new("check")
            .short('c')
            .long("check")
            .help("Check for sorted input; do not sort")
            .action(ArgAction::SetTrue))
        .arg(Arg::new("debug")
            .long("debug")
            .help("Log the effective sort keys and input details to stderr")
            .action(ArgAction::SetTrue))
}

fn parse_separator(sep: &str) -> SortResult<char> {
    if sep == "\\t" {
        return Ok('\t');
    }
    let mut chars = sep.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(SortError::invalid_field_separator(sep)),
    }
}

/// Parse configuration from command line matches
fn parse_config_from_matches(matches: &clap::ArgMatches) -> SortResult<SortConfig> {
    let mut builder = SortConfigBuilder::new();

    for keydef in matches.get_many::<String>("key").unwrap_or_default() {
        builder = builder.key(SortKey::parse(keydef)?);
    }

    if matches.get_flag("reverse") {
        builder = builder.reverse();
    }
    if matches.get_flag("header") {
        builder = builder.header();
    }
    if matches.get_flag("text") {
        builder = builder.text_only();
    }
    if matches.get_flag("check") {
        builder = builder.check();
    }
    if matches.get_flag("debug") {
        builder = builder.debug();
    }
    if let Some(sep) = matches.get_one::<String>("field-separator") {
        builder = builder.field_separator(parse_separator(sep)?);
    }
    if let Some(output) = matches.get_one::<String>("output") {
        builder = builder.output_file(output.clone());
    }

    let files: Vec<String> = matches
        .get_many::<String>("files")
        .unwrap_or_default()
        .cloned()
        .collect();

    builder.input_files(files).build()
}

use std::path::PathBuf;

use clap::parser::ValueSource;
use clap::{
    Arg, ArgMatches, Command, command, crate_authors, crate_description, crate_name,
    crate_version, value_parser,
};

use crate::config::ConfigOverrides;
use crate::constants::{
    CONFIG_HELP, DEFAULT_CONFIG_PATH, DRY_RUN_HELP, EXTENSION_HELP, INPUT_HELP, JOBS_HELP,
    LOCAL_LOGGING_HELP, LOG_FILE_DEFAULT, LOG_FILE_HELP, OUTPUT_HELP, SUFFIX_HELP,
    VERBOSE_HELP,
};
use crate::errors::{Result, generic_error};
use crate::logging::LogLevel;
use crate::utils::find_project_folder;

/// Builds the command-line interface
///
/// Defines the following arguments:
/// - `config`: Path to the configuration file
/// - `input`, `output`, `extension`, `suffix`, `jobs`: configuration overrides
/// - `dry`: List planned conversions only
/// - `verbose`: Increase verbosity level
/// - `log_file`, `log_locally`: Log file name and location
pub fn build_command() -> Command {
    let arg_config = Arg::new("config")
        .short('c')
        .long("config")
        .help(CONFIG_HELP)
        .default_value(DEFAULT_CONFIG_PATH);

    let arg_input = Arg::new("input")
        .short('i')
        .long("input")
        .help(INPUT_HELP)
        .value_parser(value_parser!(PathBuf));

    let arg_output = Arg::new("output")
        .short('o')
        .long("output")
        .help(OUTPUT_HELP)
        .value_parser(value_parser!(PathBuf));

    let arg_extension = Arg::new("extension")
        .short('e')
        .long("extension")
        .help(EXTENSION_HELP);

    let arg_suffix = Arg::new("suffix")
        .short('s')
        .long("suffix")
        .help(SUFFIX_HELP);

    let arg_jobs = Arg::new("jobs")
        .short('j')
        .long("jobs")
        .help(JOBS_HELP)
        .value_parser(value_parser!(usize));

    let arg_dry = Arg::new("dry")
        .short('n')
        .long("dry")
        .help(DRY_RUN_HELP)
        .action(clap::ArgAction::SetTrue);

    let arg_verbose = Arg::new("verbose")
        .short('v')
        .long("verbose")
        .help(VERBOSE_HELP)
        .action(clap::ArgAction::Count);

    let log_file = Arg::new("log_file")
        .short('l')
        .long("log-file")
        .help(LOG_FILE_HELP)
        .num_args(0..=1)
        .default_missing_value(LOG_FILE_DEFAULT);

    let log_locally = Arg::new("log_locally")
        .short('L')
        .long("log-locally")
        .help(LOCAL_LOGGING_HELP)
        .action(clap::ArgAction::SetTrue);

    command!()
        .author(crate_authors!())
        .about(crate_description!())
        .name(crate_name!())
        .version(crate_version!())
        .arg(arg_config)
        .arg(arg_input)
        .arg(arg_output)
        .arg(arg_extension)
        .arg(arg_suffix)
        .arg(arg_jobs)
        .arg(arg_dry)
        .arg(log_file)
        .arg(log_locally)
        .arg(arg_verbose)
}

/// Parses the process arguments
pub fn get_matches() -> ArgMatches {
    build_command().get_matches()
}

/// Gets the verbosity level from the number of -v/--verbose flags
pub fn get_verbosity(matches: &ArgMatches) -> LogLevel {
    LogLevel::from_occurrences(matches.get_count("verbose"))
}

/// Gets the configuration file path and whether it was given explicitly
pub fn get_config_path(matches: &ArgMatches) -> (PathBuf, bool) {
    let path = matches
        .get_one::<String>("config")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
    let explicit = matches.value_source("config") == Some(ValueSource::CommandLine);
    (path, explicit)
}

pub fn is_dry_run(matches: &ArgMatches) -> bool {
    matches.get_flag("dry")
}

/// Collects the configuration values given on the command line
pub fn get_overrides(matches: &ArgMatches) -> ConfigOverrides {
    ConfigOverrides {
        input_root: matches.get_one::<PathBuf>("input").cloned(),
        output_root: matches.get_one::<PathBuf>("output").cloned(),
        eligible_extension: matches.get_one::<String>("extension").cloned(),
        output_extension_suffix: matches.get_one::<String>("suffix").cloned(),
        jobs: matches.get_one::<usize>("jobs").copied(),
    }
}

/// Gets the log file location, if file logging was requested
///
/// The file lives in the platform configuration directory unless
/// `--log-locally` is given.
pub fn get_log_file(matches: &ArgMatches) -> Result<Option<PathBuf>> {
    let Some(filename) = matches.get_one::<String>("log_file") else {
        return Ok(None);
    };
    if matches.get_flag("log_locally") {
        return Ok(Some(PathBuf::from(filename)));
    }
    let folder = find_project_folder()
        .map_err(|e| generic_error(&format!("Cannot place log file {filename}: {e}")))?;
    Ok(Some(folder.config_dir().join(filename)))
}

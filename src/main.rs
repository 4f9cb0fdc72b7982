use std::process::ExitCode;

use anyhow::{Context, Result};
use colored::Colorize;
use log::info;

use rustify::cli::{
    get_config_path, get_log_file, get_matches, get_overrides, get_verbosity, is_dry_run,
};
use rustify::config::load_with_overrides;
use rustify::discovery::{ExtensionFilter, ensure_input_root};
use rustify::logging::{format_message, init_logger};
use rustify::transform::build_transformer;
use rustify::workflow::{TreeTransformer, print_plan, print_summary};

fn main() -> ExitCode {
    human_panic::setup_panic!();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let plain = format!("Error: {e:#}");
            eprintln!("{}", format_message(&plain, &plain.as_str().red().to_string()));
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let matches = get_matches();

    let log_file = get_log_file(&matches)?;
    init_logger(get_verbosity(&matches), log_file.as_deref())
        .context("Failed to initialise logging")?;

    let (config_path, explicit) = get_config_path(&matches);
    let config = load_with_overrides(&config_path, explicit, get_overrides(&matches))?;

    let engine = TreeTransformer::from_config(&config)?;
    let predicate = ExtensionFilter::new(&config.eligible_extension);
    let input_root = config.input_root.as_path();
    let output_root = config.resolved_output_root();

    ensure_input_root(input_root)?;

    if is_dry_run(&matches) {
        let plan = engine.plan(input_root, &output_root, &predicate)?;
        print_plan(&plan);
        return Ok(());
    }

    let transformer = build_transformer(&config.assistant)?;

    info!("Starting the Rustification process...");
    let summary = engine.run(input_root, &output_root, &predicate, transformer.as_ref())?;
    print_summary(&summary);

    Ok(())
}

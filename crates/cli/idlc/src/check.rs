//! Check command implementation

use crate::input;
use anyhow::Result;
use colored::Colorize;
use idl_driver::{ResolutionError, ResolverConfig};
use std::path::PathBuf;

/// Returns whether every tree resolved without errors
pub fn check(paths: &[PathBuf], config: &ResolverConfig) -> Result<bool> {
    let mut total_errors = 0;

    for path in paths {
        println!("{} {}", "Checking".green().bold(), path.display());

        let definitions = match input::tree(path) {
            Ok(definitions) => definitions,
            Err(err) => {
                total_errors += 1;
                eprintln!("    {} {err:#}", "✗".red());
                continue;
            }
        };

        match idl_driver::resolve_batched(&definitions, config) {
            Ok(output) => {
                for error in &output.errors {
                    report(error);
                }
                total_errors += output.errors.len();
                println!("    {} {} definitions resolved", "✓".green(), output.definitions.len());
            }
            Err(error) => {
                total_errors += 1;
                report(&error);
            }
        }
    }

    println!();
    if total_errors == 0 {
        println!("{} No errors found", "Success:".green().bold());
    } else {
        eprintln!("{} {} errors found", "Failed:".red().bold(), total_errors);
    }
    Ok(total_errors == 0)
}

fn report(error: &ResolutionError) {
    eprintln!("    {} {error}", "✗".red());
    if let ResolutionError::Unresolved { suggestions, .. } = error {
        if !suggestions.is_empty() {
            eprintln!("      {} did you mean `{}`?", "help:".cyan().bold(), suggestions.join("`, `"));
        }
    }
}

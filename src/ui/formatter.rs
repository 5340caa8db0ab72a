//! Pure formatting functions for UI output.
//!
//! Status lines go to stdout; errors go to stderr. Markers: `✓` success,
//! `⚠` warning or partial result, `✗` failure, `→` progress.

use console::style;

use crate::warning::SyncWarning;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// A version that was processed but not completely.
pub fn display_partial(message: &str) {
    println!("{} {}", style("⚠").yellow(), message);
}

/// A version or step that produced nothing.
pub fn display_failure(message: &str) {
    println!("{} {}", style("✗").red(), message);
}

/// Display a non-fatal warning.
pub fn display_warning(warning: &SyncWarning) {
    println!("{} {}", style("⚠ Warning:").yellow(), warning);
}

/// Banner printed before any work starts.
pub fn display_start(strategy: &str, max_versions: usize, workers: usize) {
    let cap = if max_versions == 0 {
        "unlimited".to_string()
    } else {
        max_versions.to_string()
    };
    println!(
        "{}",
        style("Starting versioned documentation sync...").bold()
    );
    println!(
        "Strategy: {}, Max versions: {}, Parallel workers: {}",
        strategy, cap, workers
    );
}

/// Final summary after a successful run.
///
/// # Arguments
/// * `versions` - Successful version keys, newest first
/// * `shown` - How many versions to list
pub fn display_summary(versions: &[String], shown: usize) {
    let Some(latest) = versions.first() else {
        return;
    };
    let available: Vec<&str> = versions.iter().take(shown).map(String::as_str).collect();

    println!();
    display_success("Documentation sync completed!");
    display_success(&format!("Processed {} versions", versions.len()));
    display_success(&format!("Latest version: {}", latest));
    display_success(&format!("Available versions: {}", available.join(", ")));
}

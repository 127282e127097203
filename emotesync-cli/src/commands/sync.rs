//! Sync mode summary output.

use colored::Colorize;

use emotesync_sync::SyncResult;

pub fn print_result(season: &str, result: &SyncResult) {
    if result.attempted() == 0 {
        println!("{} '{season}': no emote images found", "✓".green());
        return;
    }

    let mark = if result.failed_count == 0 {
        "✓".green()
    } else {
        "!".yellow()
    };
    println!(
        "{mark} '{season}' synced ({} created, {} failed)",
        result.created_count, result.failed_count
    );

    for (name, failure) in &result.failures {
        println!("  {}  {name}: {failure}", "✗".red());
    }
}

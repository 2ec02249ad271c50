/// Utility functions for user interaction.
use crate::error::Result;
use std::io::{self, BufRead, Write};

/// Prompt user for confirmation before emptying a folder.
pub fn confirm_folder_cleanup(folder: &str, entries: usize, force: bool) -> Result<bool> {
    if force {
        return Ok(true);
    }

    println!("About to delete {entries} item(s) inside {folder}");
    print!("Continue? (y/N): ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().lock().read_line(&mut input)?;

    Ok(is_affirmative(&input))
}

fn is_affirmative(input: &str) -> bool {
    matches!(input.trim().to_lowercase().as_str(), "y" | "yes")
}

mod config_cmd;
mod ingredient;
mod recipe;

pub use config_cmd::ConfigCommand;
pub use ingredient::IngredientCommand;
pub use recipe::RecipeCommand;

use clap::ValueEnum;
use std::io::{self, Write};

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Shortens `text` to `width` characters, marking the cut with "...".
fn truncate(text: &str, width: usize) -> String {
    let first_line = text.lines().next().unwrap_or("");
    if first_line.chars().count() > width || first_line.len() != text.len() {
        let kept: String = first_line.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", kept)
    } else {
        first_line.to_string()
    }
}

/// Asks a yes/no question on stdin; anything but "y" declines.
fn confirm(prompt: &str) -> io::Result<bool> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().eq_ignore_ascii_case("y"))
}

//! Colorized console output.
//!
//! The transcript is for humans only; the text and CSV reports are the
//! machine-facing outputs.

use colored::{Color, Colorize};

use crate::diff::DiffRecord;

/// Raw line with kept words green and changed/dropped words red, followed by
/// the normalized form in cyan.
pub fn highlight_changes(raw: &str, norm: &str) -> String {
    let norm_words: Vec<&str> = norm.split_whitespace().collect();
    let highlighted: Vec<String> = raw
        .split_whitespace()
        .map(|word| {
            let lower = word.to_lowercase();
            if norm_words.iter().any(|n| *n == lower) {
                word.green().to_string()
            } else {
                word.red().to_string()
            }
        })
        .collect();
    format!(
        "{}  {}",
        highlighted.join(" "),
        format!("-->  {norm}").cyan()
    )
}

/// Score colored relative to the threshold: at or above is green, within 10
/// below is yellow, else red.
pub fn score_colored(score: u32, threshold: u32) -> String {
    let text = score.to_string();
    if score >= threshold {
        text.green()
    } else if score + 10 >= threshold {
        text.yellow()
    } else {
        text.red()
    }
    .to_string()
}

/// Per-line normalization preview for both input lists.
pub fn debug_preview(
    main_raw: &[String],
    main_norm: &[String],
    new_raw: &[String],
    new_norm: &[String],
) {
    println!("{}", "\n--- DEBUG: Normalization Preview ---".magenta());
    println!("{}", "\nMain file (master list):".cyan());
    for (raw, norm) in main_raw.iter().zip(main_norm) {
        println!("{}", highlight_changes(raw, norm));
    }
    println!("{}", "\nNew file (current list):".cyan());
    for (raw, norm) in new_raw.iter().zip(new_norm) {
        println!("{}", highlight_changes(raw, norm));
    }
    println!("{}", "--- END DEBUG ---\n".magenta());
}

/// Tagged debug line (`[TAG] message`), printed only when enabled.
pub fn debug_tag(enabled: bool, tag: &str, message: &str, color: Color) {
    if enabled {
        println!("{} {message}", format!("[{tag}]").color(color));
    }
}

/// One diff section of the console transcript.
pub fn print_diff_section(header: &str, banner: &str, records: &[DiffRecord], threshold: u32) {
    println!("{}", header.cyan());
    println!("{banner}\n");
    for rec in records {
        println!(
            "{}  --> Closest: '{}'  (Score: {})",
            rec.line,
            rec.best_match.as_deref().unwrap_or(""),
            score_colored(rec.score, threshold)
        );
    }
}

pub fn notice(message: &str) {
    println!("{}", message.magenta());
}

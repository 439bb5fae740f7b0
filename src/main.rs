use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;

use tracklist_tools::config;
use tracklist_tools::console;
use tracklist_tools::diff::{self, DiffOptions, SortMode};
use tracklist_tools::input;
use tracklist_tools::normalize::normalize;
use tracklist_tools::report::{self, DiffReportMeta};

#[derive(Parser)]
#[command(name = "tracklist-diff")]
#[command(about = "Fuzzy-diff two tracklist files and report lines missing from either side")]
struct Args {
    /// TOML config file with a [diff] section
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let cfg = config::load(&args.config)?.diff()?;

    let main_raw = input::read_trimmed_lines(&cfg.main_file).context("reading main file")?;
    let new_raw = input::read_trimmed_lines(&cfg.new_file).context("reading new file")?;

    if cfg.debug_mode {
        let main_norm: Vec<String> = main_raw
            .iter()
            .map(|l| normalize(l, cfg.strip_leading_numbers))
            .collect();
        let new_norm: Vec<String> = new_raw
            .iter()
            .map(|l| normalize(l, cfg.strip_leading_numbers))
            .collect();
        console::debug_preview(&main_raw, &main_norm, &new_raw, &new_norm);
    }

    let threads = diff::resolve_thread_count(cfg.thread_cap);
    println!(
        "{}",
        format!("[DEBUG] Using {threads} thread(s) for fuzzy matching").yellow()
    );

    let opts = DiffOptions {
        similarity_threshold: cfg.similarity_threshold,
        strip_leading_numbers: cfg.strip_leading_numbers,
        thread_cap: cfg.thread_cap,
    };
    let mut outcome = diff::compare_lists(&main_raw, &new_raw, &opts)?;

    let sort_by = cfg.sort_by.to_lowercase();
    let mode = SortMode::from_config(&sort_by);
    diff::sort_records(&mut outcome.only_in_main, mode);
    diff::sort_records(&mut outcome.only_in_new, mode);

    let banner = format!(
        "Threshold: {} | Sort: {} | Threads: {}",
        cfg.similarity_threshold, sort_by, outcome.threads_used
    );
    console::print_diff_section(
        &format!(
            "\n=== Lines only in main_file: {} (missing from new_file: {}) ===",
            cfg.main_file.display(),
            cfg.new_file.display()
        ),
        &banner,
        &outcome.only_in_main,
        cfg.similarity_threshold,
    );
    console::print_diff_section(
        &format!(
            "\n=== Lines only in new_file: {} (not in main_file: {}) ===",
            cfg.new_file.display(),
            cfg.main_file.display()
        ),
        &banner,
        &outcome.only_in_new,
        cfg.similarity_threshold,
    );

    let meta = DiffReportMeta {
        main_file: &cfg.main_file,
        new_file: &cfg.new_file,
        threshold: cfg.similarity_threshold,
        sort_by: &sort_by,
        threads: outcome.threads_used,
    };
    let ts = report::timestamp();

    let txt_path = report::diff_report_path(&cfg.main_file, &cfg.new_file, &ts, "txt");
    report::write_diff_txt(&txt_path, &meta, &outcome.only_in_main, &outcome.only_in_new)?;
    console::notice(&format!(
        "\nDifferences report saved to '{}'",
        txt_path.display()
    ));

    if cfg.save_csv {
        let csv_path = report::diff_report_path(&cfg.main_file, &cfg.new_file, &ts, "csv");
        report::write_diff_csv(&csv_path, &meta, &outcome.only_in_main, &outcome.only_in_new)?;
        console::notice(&format!("CSV report saved to '{}'", csv_path.display()));
    }

    Ok(())
}

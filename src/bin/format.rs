use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use tracklist_tools::config;
use tracklist_tools::input;
use tracklist_tools::report;
use tracklist_tools::segment::{self, Segmenter, SegmenterConfig, TrackRecord};

#[derive(Parser)]
#[command(name = "tracklist-format")]
#[command(about = "Format a scraped playlist tracklist into numbered output and CSV")]
struct Args {
    /// TOML config file with a [format] section
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Text prepended verbatim to the output
    #[arg(long, default_value = "header.txt")]
    header: PathBuf,

    /// Text appended verbatim to the output
    #[arg(long, default_value = "footer.txt")]
    footer: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let cfg = config::load(&args.config)?.format()?;

    let lines = input::read_trimmed_lines(&cfg.input_file).context("reading input file")?;
    let blocklist = input::load_blocklist(cfg.blocklist_file.as_deref())?;

    let seg_cfg = SegmenterConfig {
        separators: cfg.separator_list(),
        prefix: cfg.prefix,
        max_length: cfg.max_length,
        blocklist,
        replace_separator: cfg.replace_separator,
        replace_with: cfg.replacement().to_string(),
    };
    let segmenter = Segmenter::new(&lines, &seg_cfg, cfg.debug)?;
    let (formatted, records): (Vec<String>, Vec<TrackRecord>) =
        segmenter.map(|t| (t.display, t.record)).unzip();

    // Sort happens before prefix removal, so "number" still sees numbers.
    let mut formatted = segment::sort_formatted(formatted, &cfg.sort_option)?;
    if cfg.remove_prefix {
        formatted = segment::strip_number_prefixes(formatted);
    }

    let header = input::read_verbatim(&args.header).context("reading header file")?;
    let footer = input::read_verbatim(&args.footer).context("reading footer file")?;
    let mut output = Vec::with_capacity(formatted.len() + 2);
    output.push(header);
    output.extend(formatted);
    output.push(footer);

    let ts = report::timestamp();
    let txt_path = report::output_path(&ts, "txt");
    report::write_formatted_txt(&txt_path, &output)?;
    println!("Successfully written to '{}'!", txt_path.display());

    if cfg.save_as_csv {
        let csv_path = report::output_path(&ts, "csv");
        report::write_tracks_csv(&csv_path, &records)?;
        println!("Successfully written CSV to '{}'!", csv_path.display());
    }

    Ok(())
}

//! Timestamped text and CSV report writers.
//!
//! Writers run only after all records are processed, so no partially
//! written report is ever left behind by a processing failure.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::diff::DiffRecord;
use crate::error::{Error, Result};
use crate::segment::TrackRecord;

/// Local-time timestamp used in output filenames.
pub fn timestamp() -> String {
    Local::now().format("%Y%m%d_%H%M%S").to_string()
}

fn file_stem(path: &Path) -> &str {
    path.file_stem().and_then(|s| s.to_str()).unwrap_or("input")
}

/// `DIFF_{main}_vs_{new}_{timestamp}.{ext}`
pub fn diff_report_path(main_file: &Path, new_file: &Path, ts: &str, ext: &str) -> PathBuf {
    PathBuf::from(format!(
        "DIFF_{}_vs_{}_{ts}.{ext}",
        file_stem(main_file),
        file_stem(new_file)
    ))
}

/// `OUTPUT_{timestamp}.{ext}`
pub fn output_path(ts: &str, ext: &str) -> PathBuf {
    PathBuf::from(format!("OUTPUT_{ts}.{ext}"))
}

/// Run parameters echoed into the diff report banners.
pub struct DiffReportMeta<'a> {
    pub main_file: &'a Path,
    pub new_file: &'a Path,
    pub threshold: u32,
    pub sort_by: &'a str,
    pub threads: usize,
}

fn push_section(
    out: &mut String,
    header: &str,
    meta: &DiffReportMeta<'_>,
    records: &[DiffRecord],
) {
    out.push_str(header);
    out.push_str(&format!(
        "Threshold: {} | Sort: {} | Threads: {}\n\n",
        meta.threshold, meta.sort_by, meta.threads
    ));
    for rec in records {
        out.push_str(&format!(
            "{}  --> Closest: '{}'  (Score: {})\n\n",
            rec.line,
            rec.best_match.as_deref().unwrap_or(""),
            rec.score
        ));
    }
}

pub fn write_diff_txt(
    path: &Path,
    meta: &DiffReportMeta<'_>,
    only_in_main: &[DiffRecord],
    only_in_new: &[DiffRecord],
) -> Result<()> {
    let mut out = String::new();
    push_section(
        &mut out,
        &format!(
            "=== Lines only in main_file: {} (missing from new_file: {}) ===\n",
            meta.main_file.display(),
            meta.new_file.display()
        ),
        meta,
        only_in_main,
    );
    push_section(
        &mut out,
        &format!(
            "\n=== Lines only in new_file: {} (not in main_file: {}) ===\n",
            meta.new_file.display(),
            meta.main_file.display()
        ),
        meta,
        only_in_new,
    );
    fs::write(path, out).map_err(|source| Error::FileWrite {
        path: path.to_path_buf(),
        source,
    })
}

pub fn write_diff_csv(
    path: &Path,
    meta: &DiffReportMeta<'_>,
    only_in_main: &[DiffRecord],
    only_in_new: &[DiffRecord],
) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["Section", "Line", "Closest Match", "Score"])?;
    let sections = [
        (format!("Only in {}", meta.main_file.display()), only_in_main),
        (format!("Only in {}", meta.new_file.display()), only_in_new),
    ];
    for (section, records) in &sections {
        for rec in *records {
            writer.write_record([
                section.as_str(),
                rec.line.as_str(),
                rec.best_match.as_deref().unwrap_or(""),
                rec.score.to_string().as_str(),
            ])?;
        }
    }
    writer.flush().map_err(|source| Error::FileWrite {
        path: path.to_path_buf(),
        source,
    })
}

/// Newline-joined formatter output (header + formatted lines + footer).
pub fn write_formatted_txt(path: &Path, lines: &[String]) -> Result<()> {
    fs::write(path, lines.join("\n")).map_err(|source| Error::FileWrite {
        path: path.to_path_buf(),
        source,
    })
}

pub fn write_tracks_csv(path: &Path, records: &[TrackRecord]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["Track number", "Artist", "Title", "Plays"])?;
    for rec in records {
        writer.write_record([
            rec.number.to_string().as_str(),
            rec.artist.as_str(),
            rec.title.as_str(),
            rec.popularity.as_str(),
        ])?;
    }
    writer.flush().map_err(|source| Error::FileWrite {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_records() -> Vec<DiffRecord> {
        vec![DiffRecord {
            line: "2. Beta - Song Two".into(),
            best_match: Some("alpha - song one".into()),
            score: 43,
        }]
    }

    fn meta<'a>(main: &'a Path, new: &'a Path) -> DiffReportMeta<'a> {
        DiffReportMeta {
            main_file: main,
            new_file: new,
            threshold: 85,
            sort_by: "default",
            threads: 1,
        }
    }

    #[test]
    fn test_report_filenames() {
        let path = diff_report_path(
            Path::new("lists/master.txt"),
            Path::new("current.txt"),
            "20260823_120000",
            "txt",
        );
        assert_eq!(
            path,
            PathBuf::from("DIFF_master_vs_current_20260823_120000.txt")
        );
        assert_eq!(
            output_path("20260823_120000", "csv"),
            PathBuf::from("OUTPUT_20260823_120000.csv")
        );
    }

    #[test]
    fn test_timestamp_shape() {
        let ts = timestamp();
        assert_eq!(ts.len(), 15);
        assert_eq!(&ts[8..9], "_");
    }

    #[test]
    fn test_diff_txt_contains_both_sections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.txt");
        let (main, new) = (Path::new("master.txt"), Path::new("current.txt"));
        write_diff_txt(&path, &meta(main, new), &sample_records(), &[]).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("=== Lines only in main_file: master.txt"));
        assert!(text.contains("=== Lines only in new_file: current.txt"));
        assert!(text.contains("Threshold: 85 | Sort: default | Threads: 1"));
        assert!(text.contains("2. Beta - Song Two  --> Closest: 'alpha - song one'  (Score: 43)"));
    }

    #[test]
    fn test_diff_csv_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.csv");
        let (main, new) = (Path::new("master.txt"), Path::new("current.txt"));
        write_diff_csv(&path, &meta(main, new), &sample_records(), &[]).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("Section,Line,Closest Match,Score"));
        assert_eq!(
            lines.next(),
            Some("Only in master.txt,2. Beta - Song Two,alpha - song one,43")
        );
    }

    #[test]
    fn test_tracks_csv_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tracks.csv");
        let records = vec![TrackRecord {
            number: 1,
            artist: "Artist A".into(),
            title: "Title A".into(),
            popularity: "57.4K".into(),
        }];
        write_tracks_csv(&path, &records).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("Track number,Artist,Title,Plays"));
        assert_eq!(lines.next(), Some("1,Artist A,Title A,57.4K"));
    }

    #[test]
    fn test_formatted_txt_is_newline_joined() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let lines = vec!["header".to_string(), "1. A - B".to_string(), "footer".to_string()];
        write_formatted_txt(&path, &lines).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "header\n1. A - B\nfooter");
    }
}

//! Tracklist segmenter.
//!
//! A forward-scanning parser over trimmed non-empty lines. A line matching
//! "number + configured separator" starts a record; the following line is
//! the track line (split into artist/title), and a third line is consumed as
//! popularity if it looks like a play count. Stray header/garbage lines
//! between records are skipped, and malformed records are dropped without
//! aborting the run.

use colored::Color;
use once_cell::sync::Lazy;
use regex::Regex;
use rustc_hash::FxHashSet;

use crate::console::debug_tag;
use crate::error::{Error, Result};

/// A finalized track entry. Immutable once emitted; blocklist/replacement
/// policy is applied before finalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackRecord {
    pub number: i64,
    pub artist: String,
    pub title: String,
    /// Raw popularity line ("57.4K"), or empty when absent.
    pub popularity: String,
}

/// A record together with its rendered display line ("12. Artist - Title",
/// content hard-cut to the configured maximum length).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentedTrack {
    pub record: TrackRecord,
    pub display: String,
}

#[derive(Debug, Clone)]
pub struct SegmenterConfig {
    /// Candidate artist/title separators, checked in order.
    pub separators: Vec<String>,
    /// Added to every parsed source number (may be negative).
    pub prefix: i64,
    /// Hard cut for the display line's content portion, in characters.
    pub max_length: usize,
    /// Lowercased artist names whose records lose their artist field.
    pub blocklist: FxHashSet<String>,
    pub replace_separator: bool,
    pub replace_with: String,
}

/// A standalone play count: digits with optional thousands separators and
/// decimal, optional K/M/B suffix, nothing else on the line.
static POPULARITY_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*\d{1,3}(?:,\d{3})*(?:\.\d+)?[KMBkmb]?\s*$").unwrap());

pub fn is_popularity_line(line: &str) -> bool {
    POPULARITY_LINE.is_match(line)
}

/// Hard cut to at most `max_length` characters, no ellipsis.
pub fn truncate(text: &str, max_length: usize) -> String {
    text.chars().take(max_length).collect()
}

/// Split a track line into (artist, title) at the first configured
/// separator found. For each separator a space-padded occurrence is
/// preferred over a bare one; with no separator present the whole line is
/// the artist and the title stays empty (a valid, non-error state).
pub fn split_artist_title(text: &str, separators: &[String]) -> (String, String) {
    for sep in separators.iter().filter(|s| !s.is_empty()) {
        let padded = format!(" {sep} ");
        if let Some(idx) = text.find(&padded) {
            let artist = text[..idx].trim().to_string();
            let title = text[idx + padded.len()..].trim().to_string();
            return (artist, title);
        }
        if let Some(idx) = text.find(sep.as_str()) {
            let artist = text[..idx].trim().to_string();
            let title = text[idx + sep.len()..].trim().to_string();
            return (artist, title);
        }
    }
    (text.trim().to_string(), String::new())
}

/// Cursor-based segmenter. The scan position lives here, never in ambient
/// state, so individual transitions are unit-testable.
pub struct Segmenter<'a> {
    lines: &'a [String],
    pos: usize,
    number_line: Option<Regex>,
    config: &'a SegmenterConfig,
    debug: bool,
}

impl<'a> Segmenter<'a> {
    pub fn new(lines: &'a [String], config: &'a SegmenterConfig, debug: bool) -> Result<Self> {
        let number_line = if config.separators.is_empty() {
            // No separators configured: nothing can start a record.
            None
        } else {
            let alternation = config
                .separators
                .iter()
                .map(|s| regex::escape(s))
                .collect::<Vec<_>>()
                .join("|");
            let pattern = format!(r"^\s*(\d+)\s*(?:{alternation})");
            Some(Regex::new(&pattern).map_err(|e| {
                Error::Config(format!("invalid separator list '{alternation}': {e}"))
            })?)
        };
        Ok(Self {
            lines,
            pos: 0,
            number_line,
            config,
            debug,
        })
    }

    fn emit(&mut self, source_number: i64) -> Option<SegmentedTrack> {
        let number = source_number + self.config.prefix;

        let Some(track_line) = self.lines.get(self.pos + 1) else {
            debug_tag(
                self.debug,
                "ERROR",
                &format!("missing track line after number at [{}]", self.pos),
                Color::Red,
            );
            self.pos = self.lines.len();
            return None;
        };
        debug_tag(self.debug, "RAW", &format!("track line: {track_line:?}"), Color::Cyan);

        let (mut artist, title) = split_artist_title(track_line, &self.config.separators);
        debug_tag(
            self.debug,
            "SPLIT",
            &format!("artist: {artist:?}, title: {title:?}"),
            Color::Cyan,
        );

        let mut display_line = track_line.clone();
        if self.config.blocklist.contains(&artist.to_lowercase()) {
            debug_tag(
                self.debug,
                "BLOCKLIST",
                &format!("artist {artist:?} matched blocklist; removing artist"),
                Color::Red,
            );
            display_line = title.clone();
            artist.clear();
        } else if self.config.replace_separator && !title.is_empty() {
            display_line = format!("{artist}{}{title}", self.config.replace_with)
                .trim()
                .to_string();
            debug_tag(
                self.debug,
                "REPLACE",
                &format!("after replacement: {display_line:?}"),
                Color::Green,
            );
        }

        let mut popularity = String::new();
        match self.lines.get(self.pos + 2) {
            Some(next) if is_popularity_line(next) => {
                debug_tag(
                    self.debug,
                    "POPULARITY",
                    &format!("popularity line at [{}]: {next:?}", self.pos + 2),
                    Color::Magenta,
                );
                popularity = next.clone();
                self.pos += 3;
            }
            _ => self.pos += 2,
        }

        let display = format!("{number}. {}", truncate(&display_line, self.config.max_length));
        Some(SegmentedTrack {
            record: TrackRecord {
                number,
                artist,
                title,
                popularity,
            },
            display,
        })
    }
}

impl Iterator for Segmenter<'_> {
    type Item = SegmentedTrack;

    fn next(&mut self) -> Option<SegmentedTrack> {
        while self.pos < self.lines.len() {
            let line = &self.lines[self.pos];
            let Some(caps) = self.number_line.as_ref().and_then(|p| p.captures(line)) else {
                debug_tag(
                    self.debug,
                    "SKIP",
                    &format!("skipping non-number line [{}]: {line:?}", self.pos),
                    Color::Yellow,
                );
                self.pos += 1;
                continue;
            };
            let Ok(source_number) = caps[1].parse::<i64>() else {
                // Only possible on absurd digit runs; skip and keep scanning.
                debug_tag(
                    self.debug,
                    "ERROR",
                    &format!("could not parse number at [{}]: {line:?}", self.pos),
                    Color::Red,
                );
                self.pos += 1;
                continue;
            };
            match self.emit(source_number) {
                Some(track) => return Some(track),
                None => return None,
            }
        }
        None
    }
}

/// Sort rendered display lines: "track" orders case-insensitively by the
/// text after the "N. " prefix, "number" by the leading integer. Any other
/// option is fatal, reported before anything is written.
pub fn sort_formatted(mut lines: Vec<String>, sort_option: &str) -> Result<Vec<String>> {
    match sort_option {
        "track" => lines.sort_by_key(|l| match l.split_once(". ") {
            Some((_, rest)) => rest.to_lowercase(),
            None => l.to_lowercase(),
        }),
        "number" => lines.sort_by_key(|l| {
            l.split('.')
                .next()
                .and_then(|n| n.trim().parse::<i64>().ok())
                .unwrap_or(i64::MAX)
        }),
        other => return Err(Error::InvalidSortOption(other.to_string())),
    }
    Ok(lines)
}

/// Drop the "N. " prefix from each display line, where present. Runs after
/// sorting, so sorting by number still works with RemovePrefix enabled.
pub fn strip_number_prefixes(lines: Vec<String>) -> Vec<String> {
    lines
        .into_iter()
        .map(|l| match l.split_once(". ") {
            Some((_, rest)) => rest.to_string(),
            None => l,
        })
        .collect()
}

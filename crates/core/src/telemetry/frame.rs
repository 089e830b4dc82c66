//! Telemetry frame
//!
//! Rendered per section as a header line, one `key: value` line per entry,
//! then a blank separator line.

use super::value::{TelemetryMap, TelemetryValue};
use core::fmt;
use heapless::{String, Vec};

/// Sections per frame: op-mode, three subsystems, robot, vision, spare
pub const MAX_SECTIONS: usize = 8;

/// Longest section title kept
pub const TITLE_LEN: usize = 48;

/// One titled group of entries
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TelemetrySection {
    pub title: String<TITLE_LEN>,
    pub entries: TelemetryMap,
}

/// One rendered line
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TelemetryLine<'a> {
    Header(&'a str),
    Entry(&'a str, &'a TelemetryValue),
    Blank,
}

impl fmt::Display for TelemetryLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryLine::Header(title) => f.write_str(title),
            TelemetryLine::Entry(label, value) => write!(f, "{}: {}", label, value),
            TelemetryLine::Blank => Ok(()),
        }
    }
}

/// Everything reported in one tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TelemetryFrame {
    sections: Vec<TelemetrySection, MAX_SECTIONS>,
}

impl TelemetryFrame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.sections.clear();
    }

    /// Append a section; `title` is truncated to [`TITLE_LEN`]
    ///
    /// Returns `false` if the frame is full and the section was dropped.
    pub fn push_section(&mut self, title: &str, entries: TelemetryMap) -> bool {
        let mut section = TelemetrySection {
            title: String::new(),
            entries,
        };
        for c in title.chars() {
            if section.title.push(c).is_err() {
                break;
            }
        }
        self.sections.push(section).is_ok()
    }

    pub fn sections(&self) -> &[TelemetrySection] {
        &self.sections
    }

    /// Section by exact title
    pub fn section(&self, title: &str) -> Option<&TelemetrySection> {
        self.sections.iter().find(|s| s.title.as_str() == title)
    }

    /// Value by section title and label
    pub fn value(&self, title: &str, label: &str) -> Option<&TelemetryValue> {
        self.section(title).and_then(|s| s.entries.get(label))
    }

    /// Lines in display order
    pub fn lines(&self) -> impl Iterator<Item = TelemetryLine<'_>> {
        self.sections.iter().flat_map(|section| {
            core::iter::once(TelemetryLine::Header(section.title.as_str()))
                .chain(
                    section
                        .entries
                        .iter()
                        .map(|(label, value)| TelemetryLine::Entry(label, value)),
                )
                .chain(core::iter::once(TelemetryLine::Blank))
        })
    }

    /// Write every line, newline terminated
    pub fn render(&self, out: &mut impl fmt::Write) -> fmt::Result {
        for line in self.lines() {
            writeln!(out, "{}", line)?;
        }
        Ok(())
    }
}

/// Format a loop duration as `"<ms> ms (<hz> hz)"`, truncating both
pub fn format_loop_time(nanos: f64) -> TelemetryValue {
    let ms = (nanos * 1e-6) as i32;
    let hz = if nanos > 0.0 {
        (1.0 / (nanos * 1e-9)) as i32
    } else {
        0
    };
    TelemetryValue::formatted(format_args!("{} ms ({} hz)", ms, hz))
}

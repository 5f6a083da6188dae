use std::fmt;
use std::time::Instant;

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Key under which the whole call's duration is reported
pub const TOTAL: &str = "TOTAL";

/// Phases of one render call, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    DataPreparation,
    Rendering,
    SvgConversion,
    AddingAnnotations,
}

impl Phase {
    pub fn label(&self) -> &'static str {
        match self {
            Phase::DataPreparation => "Data Preparation",
            Phase::Rendering => "Rendering",
            Phase::SvgConversion => "SVG Conversion",
            Phase::AddingAnnotations => "Adding Annotations",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Measures consecutive phases against one wall clock
///
/// Each [`PhaseTimer::mark`] closes the phase that began at the previous
/// boundary, so no phase includes time spent in an earlier one.
#[derive(Debug)]
pub struct PhaseTimer {
    start: Instant,
    boundary: Instant,
    phases: Vec<(Phase, u64)>,
}

impl PhaseTimer {
    pub fn start() -> Self {
        let now = Instant::now();
        PhaseTimer {
            start: now,
            boundary: now,
            phases: Vec::with_capacity(4),
        }
    }

    /// Close `phase` at the current instant
    pub fn mark(&mut self, phase: Phase) {
        let now = Instant::now();
        let ms = whole_millis(now.duration_since(self.boundary));
        log::debug!("{}: {} ms", phase, ms);
        self.phases.push((phase, ms));
        self.boundary = now;
    }

    /// Stop the clock at the last boundary
    pub fn finish(self) -> Timings {
        Timings {
            total: whole_millis(self.boundary.duration_since(self.start)),
            phases: self.phases,
        }
    }
}

fn whole_millis(duration: std::time::Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Whole-millisecond duration of each phase plus the total
///
/// Serializes as a map whose keys keep phase order, with [`TOTAL`] last.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timings {
    phases: Vec<(Phase, u64)>,
    total: u64,
}

impl Timings {
    /// Duration of a phase or of [`TOTAL`], by label
    pub fn get(&self, label: &str) -> Option<u64> {
        if label == TOTAL {
            return Some(self.total);
        }
        self.phases
            .iter()
            .find(|(phase, _)| phase.label() == label)
            .map(|(_, ms)| *ms)
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    /// `(label, ms)` pairs in phase order, [`TOTAL`] last
    pub fn entries(&self) -> Vec<(&'static str, u64)> {
        self.phases
            .iter()
            .map(|(phase, ms)| (phase.label(), *ms))
            .chain(std::iter::once((TOTAL, self.total)))
            .collect()
    }
}

impl Serialize for Timings {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let entries = self.entries();
        let mut map = serializer.serialize_map(Some(entries.len()))?;
        for (label, ms) in entries {
            map.serialize_entry(label, &ms)?;
        }
        map.end()
    }
}

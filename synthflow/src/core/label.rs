//! Checkpoint labels and label ranges.

use crate::errors::ConfigurationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A named checkpoint of the synthesis script.
///
/// Declaration order is the only legal execution order; `Ord` follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Label {
    /// Read the cell library and elaborate the hierarchy.
    Begin,
    /// Process, flatten and clean up the design.
    Prepare,
    /// Coarse-grain optimization, DSP inference and memory extraction.
    Coarse,
    /// Block RAM inference.
    MapBram,
    /// Map remaining memories to flip-flops.
    MapFfram,
    /// Technology mapping to generic gates.
    MapGates,
    /// Flip-flop legalization and mapping.
    MapFfs,
    /// LUT mapping.
    MapLuts,
    /// Map LUTs to family cells.
    MapCells,
    /// Design checks and statistics.
    Check,
    /// I/O pad insertion.
    Iomap,
    /// Final clean up before writing netlists.
    Finalize,
    /// Write the BLIF netlist.
    Blif,
    /// Write the EDIF netlist.
    Edif,
    /// Write the Verilog netlist.
    Verilog,
}

impl Label {
    /// All labels in declaration order.
    pub const ALL: [Self; 15] = [
        Self::Begin,
        Self::Prepare,
        Self::Coarse,
        Self::MapBram,
        Self::MapFfram,
        Self::MapGates,
        Self::MapFfs,
        Self::MapLuts,
        Self::MapCells,
        Self::Check,
        Self::Iomap,
        Self::Finalize,
        Self::Blif,
        Self::Edif,
        Self::Verilog,
    ];

    /// The first declared label.
    #[must_use]
    pub const fn first() -> Self {
        Self::Begin
    }

    /// The last declared label.
    #[must_use]
    pub const fn last() -> Self {
        Self::Verilog
    }

    /// Returns the label name as written in `-run` and in plan reports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Begin => "begin",
            Self::Prepare => "prepare",
            Self::Coarse => "coarse",
            Self::MapBram => "map_bram",
            Self::MapFfram => "map_ffram",
            Self::MapGates => "map_gates",
            Self::MapFfs => "map_ffs",
            Self::MapLuts => "map_luts",
            Self::MapCells => "map_cells",
            Self::Check => "check",
            Self::Iomap => "iomap",
            Self::Finalize => "finalize",
            Self::Blif => "blif",
            Self::Edif => "edif",
            Self::Verilog => "verilog",
        }
    }

    /// Returns the zero-based declaration index.
    #[must_use]
    pub fn position(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Label {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|label| label.as_str() == s)
            .ok_or_else(|| ConfigurationError::UnknownLabel {
                label: s.to_string(),
            })
    }
}

/// An inclusive, non-empty range of labels.
///
/// Deserialization goes through [`LabelRange::new`], so an inverted pair of
/// bounds is rejected there as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawLabelRange")]
pub struct LabelRange {
    start: Label,
    end: Label,
}

#[derive(Deserialize)]
struct RawLabelRange {
    start: Label,
    end: Label,
}

impl TryFrom<RawLabelRange> for LabelRange {
    type Error = ConfigurationError;

    fn try_from(raw: RawLabelRange) -> Result<Self, Self::Error> {
        Self::new(raw.start, raw.end)
    }
}

impl Default for LabelRange {
    fn default() -> Self {
        Self::full()
    }
}

impl LabelRange {
    /// The range covering every declared label.
    #[must_use]
    pub const fn full() -> Self {
        Self {
            start: Label::first(),
            end: Label::last(),
        }
    }

    /// A range covering exactly one label.
    #[must_use]
    pub const fn single(label: Label) -> Self {
        Self {
            start: label,
            end: label,
        }
    }

    /// Creates a range from two labels.
    ///
    /// # Errors
    ///
    /// Returns an error if `start` is declared after `end`.
    pub fn new(start: Label, end: Label) -> Result<Self, ConfigurationError> {
        if start > end {
            return Err(ConfigurationError::InvertedRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Creates a range from optional bounds, defaulting to the first and
    /// last declared labels.
    ///
    /// # Errors
    ///
    /// Returns an error if the resulting range is inverted.
    pub fn from_bounds(start: Option<Label>, end: Option<Label>) -> Result<Self, ConfigurationError> {
        Self::new(
            start.unwrap_or_else(Label::first),
            end.unwrap_or_else(Label::last),
        )
    }

    /// Parses optional label names into a range.
    ///
    /// # Errors
    ///
    /// Returns an error if a name is not a declared label or the range is
    /// inverted.
    pub fn parse(start: Option<&str>, end: Option<&str>) -> Result<Self, ConfigurationError> {
        let start = start.map(str::parse::<Label>).transpose()?;
        let end = end.map(str::parse::<Label>).transpose()?;
        Self::from_bounds(start, end)
    }

    /// Parses the `-run` argument syntax: `from`, `from:to`, `:to` or `from:`.
    ///
    /// A lone `from` runs from that label to the end.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown labels or an inverted range.
    pub fn parse_run_spec(spec: &str) -> Result<Self, ConfigurationError> {
        let (start, end) = match spec.split_once(':') {
            Some((start, end)) => (start, end),
            None => (spec, ""),
        };
        Self::parse(non_empty(start), non_empty(end))
    }

    /// Returns the first label of the range.
    #[must_use]
    pub const fn start(&self) -> Label {
        self.start
    }

    /// Returns the last label of the range.
    #[must_use]
    pub const fn end(&self) -> Label {
        self.end
    }

    /// Returns true if `label` lies within the range.
    #[must_use]
    pub fn contains(&self, label: Label) -> bool {
        self.start <= label && label <= self.end
    }

    /// Returns true if the range spans every declared label.
    #[must_use]
    pub fn is_full(&self) -> bool {
        *self == Self::full()
    }
}

fn non_empty(s: &str) -> Option<&str> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

impl fmt::Display for LabelRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_are_declared_in_order() {
        for pair in Label::ALL.windows(2) {
            assert!(pair[0] < pair[1]);
        }
        assert_eq!(Label::ALL[0], Label::first());
        assert_eq!(Label::ALL[Label::ALL.len() - 1], Label::last());
    }

    #[test]
    fn test_position_matches_declaration() {
        for (index, label) in Label::ALL.iter().enumerate() {
            assert_eq!(label.position(), index);
        }
    }

    #[test]
    fn test_label_from_str() {
        assert_eq!("map_bram".parse::<Label>().unwrap(), Label::MapBram);
        let err = "map_dsp".parse::<Label>().unwrap_err();
        assert!(matches!(err, ConfigurationError::UnknownLabel { .. }));
    }

    #[test]
    fn test_range_defaults_to_full() {
        let range = LabelRange::parse(None, None).unwrap();
        assert!(range.is_full());
        assert_eq!(range, LabelRange::default());
    }

    #[test]
    fn test_range_inverted() {
        let err = LabelRange::new(Label::MapLuts, Label::Coarse).unwrap_err();
        assert!(matches!(
            err,
            ConfigurationError::InvertedRange {
                start: Label::MapLuts,
                end: Label::Coarse
            }
        ));
    }

    #[test]
    fn test_range_contains() {
        let range = LabelRange::new(Label::Coarse, Label::MapGates).unwrap();
        assert!(!range.contains(Label::Prepare));
        assert!(range.contains(Label::Coarse));
        assert!(range.contains(Label::MapFfram));
        assert!(range.contains(Label::MapGates));
        assert!(!range.contains(Label::MapFfs));
    }

    #[test]
    fn test_parse_run_spec() {
        let range = LabelRange::parse_run_spec("coarse:map_ffs").unwrap();
        assert_eq!(range.start(), Label::Coarse);
        assert_eq!(range.end(), Label::MapFfs);

        let range = LabelRange::parse_run_spec("map_luts").unwrap();
        assert_eq!(range.start(), Label::MapLuts);
        assert_eq!(range.end(), Label::last());

        let range = LabelRange::parse_run_spec(":prepare").unwrap();
        assert_eq!(range.start(), Label::first());
        assert_eq!(range.end(), Label::Prepare);

        assert!(LabelRange::parse_run_spec("coarse:nowhere").is_err());
    }

    #[test]
    fn test_deserialize_rejects_inverted_range() {
        let err = serde_json::from_str::<LabelRange>(r#"{"start":"check","end":"begin"}"#)
            .unwrap_err();
        assert!(err.to_string().contains("inverted"));

        let range: LabelRange =
            serde_json::from_str(r#"{"start":"coarse","end":"map_ffs"}"#).unwrap();
        assert_eq!(range, LabelRange::new(Label::Coarse, Label::MapFfs).unwrap());
    }

    #[test]
    fn test_range_display() {
        let range = LabelRange::single(Label::MapGates);
        assert_eq!(range.to_string(), "map_gates:map_gates");
    }
}

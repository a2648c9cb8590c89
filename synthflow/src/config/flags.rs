//! Feature toggles and output artifacts.

use crate::core::TargetFamily;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An independently switchable feature of the synthesis script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    /// Map multipliers onto DSP blocks.
    Dsp,
    /// Map arithmetic onto adder cells.
    Adder,
    /// Infer block RAM.
    Bram,
    /// Run the flip-flop techmap.
    FfMap,
    /// Tuned ABC logic optimization.
    AbcOpt,
    /// ABC9 LUT mapping (pp3 only).
    Abc9,
}

impl Feature {
    /// Every feature, in help-text order.
    pub const ALL: [Self; 6] = [
        Self::Dsp,
        Self::Adder,
        Self::Bram,
        Self::FfMap,
        Self::AbcOpt,
        Self::Abc9,
    ];

    /// Returns the switch that turns the feature off.
    #[must_use]
    pub const fn disable_switch(self) -> &'static str {
        match self {
            Self::Dsp => "-no_dsp",
            Self::Adder => "-no_adder",
            Self::Bram => "-no_bram",
            Self::FfMap => "-no_ff_map",
            Self::AbcOpt => "-no_abc_opt",
            Self::Abc9 => "-no_abc9",
        }
    }

    /// Looks a feature up by its disable switch.
    #[must_use]
    pub fn from_disable_switch(switch: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.disable_switch() == switch)
    }

    /// Returns true if the feature has any meaning for `family`.
    #[must_use]
    pub fn applies_to(self, family: TargetFamily) -> bool {
        match self {
            Self::Abc9 => family == TargetFamily::Pp3,
            _ => true,
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dsp => write!(f, "dsp"),
            Self::Adder => write!(f, "adder"),
            Self::Bram => write!(f, "bram"),
            Self::FfMap => write!(f, "ff_map"),
            Self::AbcOpt => write!(f, "abc_opt"),
            Self::Abc9 => write!(f, "abc9"),
        }
    }
}

fn enabled() -> bool {
    true
}

/// On/off state of every [`Feature`]. Everything is on by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureFlags {
    /// DSP inference.
    #[serde(default = "enabled")]
    pub dsp: bool,
    /// Adder inference.
    #[serde(default = "enabled")]
    pub adder: bool,
    /// Block RAM inference.
    #[serde(default = "enabled")]
    pub bram: bool,
    /// Flip-flop techmap.
    #[serde(default = "enabled")]
    pub ff_map: bool,
    /// ABC optimization.
    #[serde(default = "enabled")]
    pub abc_opt: bool,
    /// ABC9 mapping.
    #[serde(default = "enabled")]
    pub abc9: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            dsp: true,
            adder: true,
            bram: true,
            ff_map: true,
            abc_opt: true,
            abc9: true,
        }
    }
}

impl FeatureFlags {
    /// Returns the state of `feature`.
    #[must_use]
    pub const fn get(&self, feature: Feature) -> bool {
        match feature {
            Feature::Dsp => self.dsp,
            Feature::Adder => self.adder,
            Feature::Bram => self.bram,
            Feature::FfMap => self.ff_map,
            Feature::AbcOpt => self.abc_opt,
            Feature::Abc9 => self.abc9,
        }
    }

    /// Sets the state of `feature`.
    pub fn set(&mut self, feature: Feature, on: bool) {
        let slot = match feature {
            Feature::Dsp => &mut self.dsp,
            Feature::Adder => &mut self.adder,
            Feature::Bram => &mut self.bram,
            Feature::FfMap => &mut self.ff_map,
            Feature::AbcOpt => &mut self.abc_opt,
            Feature::Abc9 => &mut self.abc9,
        };
        *slot = on;
    }

    /// Returns a copy with `feature` set to `on`.
    #[must_use]
    pub fn with(mut self, feature: Feature, on: bool) -> Self {
        self.set(feature, on);
        self
    }
}

/// A netlist artifact the script can write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputKind {
    /// EDIF netlist.
    Edif,
    /// BLIF netlist.
    Blif,
    /// Verilog netlist.
    Verilog,
}

impl OutputKind {
    /// Returns the option that requests this artifact.
    #[must_use]
    pub const fn switch(self) -> &'static str {
        match self {
            Self::Edif => "-edif",
            Self::Blif => "-blif",
            Self::Verilog => "-verilog",
        }
    }
}

/// Requested output paths. `None` means the artifact is not written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputFiles {
    /// EDIF output path.
    #[serde(default)]
    pub edif: Option<String>,
    /// BLIF output path.
    #[serde(default)]
    pub blif: Option<String>,
    /// Verilog output path.
    #[serde(default)]
    pub verilog: Option<String>,
}

impl OutputFiles {
    /// Returns the path requested for `kind`.
    #[must_use]
    pub fn get(&self, kind: OutputKind) -> Option<&str> {
        match kind {
            OutputKind::Edif => self.edif.as_deref(),
            OutputKind::Blif => self.blif.as_deref(),
            OutputKind::Verilog => self.verilog.as_deref(),
        }
    }

    /// Sets the path for `kind`.
    pub fn set(&mut self, kind: OutputKind, path: impl Into<String>) {
        let slot = match kind {
            OutputKind::Edif => &mut self.edif,
            OutputKind::Blif => &mut self.blif,
            OutputKind::Verilog => &mut self.verilog,
        };
        *slot = Some(path.into());
    }

    /// Drops empty paths, which mean "do not emit".
    #[must_use]
    pub fn normalized(mut self) -> Self {
        for slot in [&mut self.edif, &mut self.blif, &mut self.verilog] {
            if slot.as_deref().is_some_and(str::is_empty) {
                *slot = None;
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_default_on() {
        let flags = FeatureFlags::default();
        for feature in Feature::ALL {
            assert!(flags.get(feature), "{feature} should default on");
        }
    }

    #[test]
    fn test_flag_set_touches_one_feature() {
        let flags = FeatureFlags::default().with(Feature::Bram, false);
        for feature in Feature::ALL {
            assert_eq!(flags.get(feature), feature != Feature::Bram);
        }
    }

    #[test]
    fn test_disable_switch_lookup() {
        assert_eq!(Feature::from_disable_switch("-no_ff_map"), Some(Feature::FfMap));
        assert_eq!(Feature::from_disable_switch("-no_luts"), None);
    }

    #[test]
    fn test_abc9_applies_only_to_pp3() {
        assert!(Feature::Abc9.applies_to(TargetFamily::Pp3));
        assert!(!Feature::Abc9.applies_to(TargetFamily::QlfK4n8));
        assert!(!Feature::Abc9.applies_to(TargetFamily::QlfK6n10));
        assert!(Feature::Dsp.applies_to(TargetFamily::QlfK4n8));
    }

    #[test]
    fn test_flags_deserialize_with_defaults() {
        let flags: FeatureFlags = serde_json::from_str(r#"{"dsp": false}"#).unwrap();
        assert!(!flags.dsp);
        assert!(flags.adder);
        assert!(flags.abc9);
    }

    #[test]
    fn test_outputs_normalized() {
        let mut outputs = OutputFiles::default();
        outputs.set(OutputKind::Blif, "");
        outputs.set(OutputKind::Edif, "top.edif");
        let outputs = outputs.normalized();

        assert_eq!(outputs.get(OutputKind::Blif), None);
        assert_eq!(outputs.get(OutputKind::Edif), Some("top.edif"));
    }
}

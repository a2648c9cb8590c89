//! Target families and their per-family argument table.

use crate::errors::ConfigurationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The QuickLogic architecture a plan is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetFamily {
    /// EOS S3 / PolarPro 3.
    Pp3,
    /// K4N8 eFPGA fabric (4-input LUTs).
    QlfK4n8,
    /// K6N10 eFPGA fabric (6-input LUTs, DSP and block RAM).
    QlfK6n10,
}

impl Default for TargetFamily {
    fn default() -> Self {
        Self::QlfK4n8
    }
}

impl TargetFamily {
    /// Every supported family, in help-text order.
    pub const ALL: [Self; 3] = [Self::Pp3, Self::QlfK4n8, Self::QlfK6n10];

    /// Returns the name used on the command line and in share paths.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pp3 => "pp3",
            Self::QlfK4n8 => "qlf_k4n8",
            Self::QlfK6n10 => "qlf_k6n10",
        }
    }

    /// Returns the argument table for this family.
    #[must_use]
    pub const fn rules(self) -> &'static FamilyRules {
        match self {
            Self::Pp3 => &PP3_RULES,
            Self::QlfK4n8 => &QLF_K4N8_RULES,
            Self::QlfK6n10 => &QLF_K6N10_RULES,
        }
    }

    /// Returns a path below this family's share directory, e.g.
    /// `+/quicklogic/qlf_k6n10/brams.txt`.
    #[must_use]
    pub fn share_path(self, file: &str) -> String {
        format!("+/quicklogic/{}/{}", self.as_str(), file)
    }
}

impl fmt::Display for TargetFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetFamily {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|family| family.as_str() == s)
            .ok_or_else(|| ConfigurationError::InvalidFamily {
                value: s.to_string(),
            })
    }
}

/// Hard-coded argument strings that differ between families.
///
/// The table only carries *what* a step is given. Whether a step runs at all
/// is decided by the gates in the pipeline script. A `None` entry means the
/// family has no such step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FamilyRules {
    /// Arguments for shift-register inference.
    pub shregmap: Option<&'static str>,
    /// Cell set accepted by `dfflegalize`.
    pub dff_legalize: &'static str,
    /// Arguments for LUT mapping with the stock ABC flow.
    pub abc_lut: Option<&'static str>,
    /// LUT size handed to ABC9.
    pub abc9_lut: Option<&'static str>,
}

const PP3_RULES: FamilyRules = FamilyRules {
    shregmap: None,
    dff_legalize: "-cell $_DFFSRE_PPPP_ 0 -cell $_DLATCH_?_ x",
    abc_lut: None,
    abc9_lut: Some("-maxlut 4 -dff"),
};

const QLF_K4N8_RULES: FamilyRules = FamilyRules {
    shregmap: Some("-minlen 8 -maxlen 8"),
    dff_legalize: "-cell $_DFF_P_ 0 -cell $_DFF_P??_ 0 -cell $_DFF_N_ 0 -cell $_DFF_N??_ 0 \
                   -cell $_DFFSR_???_ 0",
    abc_lut: Some("-lut 4"),
    abc9_lut: None,
};

const QLF_K6N10_RULES: FamilyRules = FamilyRules {
    shregmap: Some("-minlen 20 -maxlen 20"),
    dff_legalize: "-cell $_DFF_P_ 0 -cell $_DFF_PP?_ 0 -cell $_DFFE_PP?P_ 0 \
                   -cell $_DFFSR_PPP_ 0 -cell $_DFFSRE_PPPP_ 0 -cell $_DLATCHSR_PPP_ 0",
    abc_lut: Some("-lut 6"),
    abc9_lut: None,
};

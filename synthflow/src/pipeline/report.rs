//! Textual plan report.

use super::stage::Stage;
use serde::Serialize;
use std::fmt::{self, Write as _};

const INDENT: &str = "    ";

/// A rendered describe-mode plan.
///
/// Every stage prints its label followed by one indented line per planned
/// invocation. Skipped invocations carry their annotation. The text depends
/// only on the stages rendered, so it is stable across builds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanReport {
    text: String,
}

impl PlanReport {
    /// Renders the given stages.
    pub fn render<'a>(stages: impl IntoIterator<Item = &'a Stage>) -> Self {
        let mut text = String::new();
        for stage in stages {
            let _ = writeln!(text, "{}:", stage.label());
            for invocation in stage.planned() {
                match invocation.skip_annotation() {
                    Some(annotation) => {
                        let _ = writeln!(text, "{INDENT}{invocation}{INDENT}{annotation}");
                    }
                    None => {
                        let _ = writeln!(text, "{INDENT}{invocation}");
                    }
                }
            }
            text.push('\n');
        }
        Self { text }
    }

    /// Returns the report text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Returns the planned lines of one stage, without indentation.
    #[must_use]
    pub fn stage_lines(&self, label: &str) -> Vec<&str> {
        let header = format!("{label}:");
        self.text
            .lines()
            .skip_while(|line| *line != header)
            .skip(1)
            .take_while(|line| line.starts_with(INDENT))
            .map(str::trim)
            .collect()
    }
}

impl fmt::Display for PlanReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SynthConfig;
    use crate::core::{Label, TargetFamily};
    use crate::pipeline::invocation::Gate;
    use crate::pipeline::stage::StageSpec;
    use crate::config::OutputKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_render_layout() {
        let config = SynthConfig::new(TargetFamily::QlfK4n8);
        let mut check = StageSpec::new(Label::Check);
        check.scope().run("autoname", "").run("check", "-noinit");
        let mut blif = StageSpec::new(Label::Blif);
        blif.scope().when(Gate::output(OutputKind::Blif), |s| {
            s.run("write_blif", "out.blif");
        });
        let stages = [check.resolve(&config).unwrap(), blif.resolve(&config).unwrap()];

        let report = PlanReport::render(&stages);
        assert_eq!(
            report.as_str(),
            "check:\n    autoname\n    check -noinit\n\nblif:\n    write_blif out.blif    (skip if no -blif)\n\n"
        );
        assert_eq!(report.stage_lines("check"), vec!["autoname", "check -noinit"]);
        assert!(report.stage_lines("finalize").is_empty());
    }
}

//! Yosys-style option vector parsing and help text.

use super::{Feature, OutputKind, SynthOptions};
use crate::core::{LabelRange, TargetFamily};
use crate::errors::ConfigurationError;
use std::fmt::Write as _;

/// Parses a Yosys-style option vector (without the command name).
///
/// # Errors
///
/// Returns an error for unknown options, options missing their value, or a
/// malformed `-run` range. The family is not validated here.
pub fn parse_args<S: AsRef<str>>(args: &[S]) -> Result<SynthOptions, ConfigurationError> {
    let mut options = SynthOptions::default();
    let mut iter = args.iter().map(|arg| arg.as_ref());

    while let Some(arg) = iter.next() {
        let mut value = || {
            iter.next().map(str::to_string).ok_or_else(|| ConfigurationError::MissingValue {
                option: arg.to_string(),
            })
        };

        match arg {
            "-top" => options.top = Some(value()?),
            "-family" => options.family = value()?,
            "-edif" => options.outputs.set(OutputKind::Edif, value()?),
            "-blif" => options.outputs.set(OutputKind::Blif, value()?),
            "-verilog" => options.outputs.set(OutputKind::Verilog, value()?),
            "-run" => {
                let spec = value()?;
                LabelRange::parse_run_spec(&spec)?;
                let (from, to) = spec.split_once(':').unwrap_or((spec.as_str(), ""));
                options.run_from = Some(from.to_string()).filter(|s| !s.is_empty());
                options.run_to = Some(to.to_string()).filter(|s| !s.is_empty());
            }
            "-describe" => options.describe = true,
            other => match Feature::from_disable_switch(other) {
                Some(feature) => options.features.set(feature, false),
                None => {
                    return Err(ConfigurationError::UnknownOption {
                        option: other.to_string(),
                    })
                }
            },
        }
    }

    Ok(options)
}

/// Returns the option reference for the `synth_quicklogic` command.
#[must_use]
pub fn help_text() -> String {
    let mut out = String::new();
    let families: Vec<&str> = TargetFamily::ALL.iter().map(|f| f.as_str()).collect();

    let _ = writeln!(out, "    synth_quicklogic [options]");
    let _ = writeln!(out);
    let _ = writeln!(out, "This command runs synthesis for QuickLogic FPGAs");
    let _ = writeln!(out);
    option(&mut out, "-top <module>", &["use the specified module as top module"]);
    option(
        &mut out,
        "-family <family>",
        &[
            "run synthesis for the specified QuickLogic architecture.",
            &format!("supported values: {}", families.join(", ")),
            &format!("default: {}", TargetFamily::default()),
        ],
    );
    for kind in [OutputKind::Edif, OutputKind::Blif, OutputKind::Verilog] {
        option(
            &mut out,
            &format!("{} <file>", kind.switch()),
            &[
                "write the design to the specified file. writing of an output file",
                "is omitted if this parameter is not specified.",
            ],
        );
    }
    option(&mut out, "-no_dsp", &["do not use DSP blocks to implement multipliers"]);
    option(&mut out, "-no_adder", &["do not use adder cells in the output netlist"]);
    option(&mut out, "-no_bram", &["do not use block RAM in the output netlist"]);
    option(&mut out, "-no_ff_map", &["do not run the flip-flop techmap"]);
    option(&mut out, "-no_abc_opt", &["turn off the tuned ABC logic optimization"]);
    option(&mut out, "-no_abc9", &["use the stock ABC flow instead of ABC9 (pp3 only)"]);
    option(
        &mut out,
        "-run <from_label>[:<to_label>]",
        &["only run the commands between the labels (inclusive)"],
    );
    option(&mut out, "-describe", &["print the planned commands instead of running them"]);

    out
}

fn option(out: &mut String, usage: &str, lines: &[&str]) {
    let _ = writeln!(out, "    {usage}");
    for line in lines {
        let _ = writeln!(out, "        {line}");
    }
    let _ = writeln!(out);
}

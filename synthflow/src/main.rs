//! `synthflow` command line.
//!
//! Plans `synth_quicklogic` for an option vector and prints the result. With
//! `-describe` the annotated plan is printed; otherwise the included
//! invocations of the selected range are written out as a flat script.

use anyhow::{Context, Result};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::io::Write;
use std::sync::Arc;
use synthflow::config::{parse_args, SynthOptions};
use synthflow::dispatch::{DesignGraph, OperationExecutor};
use synthflow::events::LoggingEventSink;
use synthflow::pass::SynthPass;
use tracing_subscriber::EnvFilter;

/// Collects dispatched invocations as script lines.
#[derive(Default)]
struct ScriptWriter {
    lines: Mutex<Vec<String>>,
}

#[async_trait]
impl OperationExecutor for ScriptWriter {
    async fn invoke(
        &self,
        operation: &str,
        arguments: &str,
        _design: &mut dyn DesignGraph,
    ) -> Result<()> {
        let line = if arguments.is_empty() {
            operation.to_string()
        } else {
            format!("{operation} {arguments}")
        };
        self.lines.lock().push(line);
        Ok(())
    }
}

/// A fully selected design that only keeps its scratchpad.
#[derive(Default)]
struct ScratchpadDesign {
    scratchpad: HashMap<String, i64>,
}

impl DesignGraph for ScratchpadDesign {
    fn is_fully_selected(&self) -> bool {
        true
    }

    fn scratchpad_int(&self, key: &str) -> Option<i64> {
        self.scratchpad.get(key).copied()
    }

    fn set_scratchpad_int(&mut self, key: &str, value: i64) {
        self.scratchpad.insert(key.to_string(), value);
    }
}

struct Cli {
    json: bool,
    help: bool,
    options: SynthOptions,
}

fn parse_cli(args: Vec<String>) -> Result<Cli> {
    let mut json = false;
    let mut help = false;
    let mut options_file = None;
    let mut rest = Vec::new();

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-json" => json = true,
            "-help" | "--help" => help = true,
            "-options" => {
                options_file = Some(iter.next().context("-options requires a file name")?);
            }
            _ => rest.push(arg),
        }
    }

    let options = match options_file {
        Some(path) => {
            if !rest.is_empty() {
                anyhow::bail!("-options cannot be combined with other synthesis options");
            }
            SynthOptions::from_json_file(&path)?
        }
        None => parse_args(rest.as_slice())?,
    };

    Ok(Cli {
        json,
        help,
        options,
    })
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = parse_cli(std::env::args().skip(1).collect())?;
    let mut stdout = std::io::stdout().lock();

    if cli.help {
        write!(stdout, "{}", SynthPass::help()?)?;
        return Ok(());
    }

    let writer = Arc::new(ScriptWriter::default());
    let mut pass =
        SynthPass::new(writer.clone()).with_event_sink(Arc::new(LoggingEventSink::debug()));
    let mut design = ScratchpadDesign::default();
    let summary = pass.run_options(&cli.options, &mut design).await?;

    if cli.json {
        writeln!(stdout, "{}", serde_json::to_string_pretty(&summary)?)?;
    } else if let Some(report) = summary.report_text() {
        write!(stdout, "{report}")?;
    } else {
        for line in writer.lines.lock().iter() {
            writeln!(stdout, "{line}")?;
        }
    }

    Ok(())
}

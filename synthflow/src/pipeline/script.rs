//! The QuickLogic synthesis script.

use super::definition::PipelineDefinition;
use super::invocation::Gate;
use super::PipelineBuilder;
use crate::config::{Feature, OutputKind, SynthConfig, SynthOptions};
use crate::core::{Label, TargetFamily};
use crate::errors::{PlanningError, SynthflowError};

const PP3: &[TargetFamily] = &[TargetFamily::Pp3];
const K6N10: &[TargetFamily] = &[TargetFamily::QlfK6n10];
const QLF: &[TargetFamily] = &[TargetFamily::QlfK4n8, TargetFamily::QlfK6n10];
const WITH_BRAM: &[TargetFamily] = &[TargetFamily::Pp3, TargetFamily::QlfK6n10];

const DSP_MAP_DEFINES: &str = "-D DSP_A_MAXWIDTH=16 -D DSP_B_MAXWIDTH=16 \
    -D DSP_A_MINWIDTH=2 -D DSP_B_MINWIDTH=2 -D DSP_Y_MINWIDTH=11 -D DSP_NAME=$__MUL16X16";

const MEMORY_MAP_ATTRS: &str = "-iattr -attr !ram_block -attr !rom_block -attr logic_block \
    -attr syn_ramstyle=auto -attr syn_ramstyle=registers \
    -attr syn_romstyle=auto -attr syn_romstyle=logic";

const ABC_SCRIPT: &str = "strash;ifraig;scorr;dc2;dretime;strash;dch,-f;if;mfs2;\
    sweep;eliminate;if;mfs;lutpack;dress";

/// Declares the full script for `config`.
///
/// Argument constants that vary by family come from
/// [`crate::core::FamilyRules`]; whether a step runs at all is decided by
/// the gates.
#[must_use]
pub fn quicklogic_script(config: &SynthConfig) -> PipelineBuilder {
    let family = config.family();
    let rules = family.rules();
    let share = |file: &str| family.share_path(file);

    PipelineBuilder::new()
        .stage(Label::Begin, |s| {
            s.run(
                "read_verilog",
                format!(
                    "-lib -specify -nomem2reg +/quicklogic/common/cells_sim.v {}",
                    share("cells_sim.v")
                ),
            )
            .run("hierarchy", format!("-check {}", config.top_argument()));
        })
        .stage(Label::Prepare, |s| {
            s.run("proc", "")
                .run("flatten", "")
                .when(Gate::families(PP3), |s| {
                    s.run("tribuf", "-logic");
                })
                .run("deminout", "")
                .run("opt_expr", "")
                .run("opt_clean", "");
        })
        .stage(Label::Coarse, |s| {
            s.run("check", "")
                .run("opt", "-nodffe -nosdff")
                .run("fsm", "")
                .run("opt", "")
                .run("wreduce", "")
                .run("peepopt", "")
                .run("opt_clean", "")
                .run("share", "")
                .when(Gate::families(K6N10), |s| {
                    s.when(Gate::feature(Feature::Dsp), |s| {
                        s.run("memory_dff", "")
                            .run("wreduce", "t:$mul")
                            .run(
                                "techmap",
                                format!(
                                    "-map +/mul2dsp.v -map {} {DSP_MAP_DEFINES}",
                                    share("dsp_map.v")
                                ),
                            )
                            .run("select", "a:mul2dsp")
                            .run("setattr", "-unset mul2dsp")
                            .run("opt_expr", "-fine")
                            .run("wreduce", "")
                            .run("select", "-clear")
                            .run("ql_dsp", "")
                            .run("chtype", "-set $mul t:$__soft_mul");
                    });
                })
                .run("techmap", "-map +/cmp2lut.v -D LUT_WIDTH=4")
                .run("opt_expr", "")
                .run("opt_clean", "")
                .run("alumacc", "")
                .run("pmuxtree", "")
                .run("opt", "")
                .run("memory", "-nomap")
                .run("opt_clean", "");
        })
        .stage(Label::MapBram, |s| {
            s.when(Gate::families(WITH_BRAM), |s| {
                s.when(Gate::feature(Feature::Bram), |s| {
                    s.run("memory_bram", format!("-rules {}", share("brams.txt")))
                        .when(Gate::families(PP3), |s| {
                            s.run("pp3_braminit", "");
                        })
                        .run("techmap", format!("-map {}", share("brams_map.v")));
                });
            });
        })
        .stage(Label::MapFfram, |s| {
            s.run("opt", "-fast -mux_undef -undriven -fine")
                .run("memory_map", MEMORY_MAP_ATTRS)
                .run("opt", "-undriven -fine");
        })
        .stage(Label::MapGates, |s| {
            s.when(Gate::families(QLF), |s| {
                s.when(Gate::feature(Feature::Adder), |s| {
                    s.run(
                        "techmap",
                        format!("-map +/techmap.v -map {}", share("arith_map.v")),
                    );
                })
                .when(Gate::without(Feature::Adder), |s| {
                    s.run("techmap", "");
                });
            })
            .when(Gate::families(PP3), |s| {
                s.run("techmap", "");
            })
            .run("opt", "-fast")
            .when(Gate::families(PP3), |s| {
                s.run("muxcover", "-mux8 -mux4");
            })
            .run("opt_expr", "")
            .run("opt_merge", "")
            .run("opt_clean", "")
            .run("opt", "");
        })
        .stage(Label::MapFfs, |s| {
            s.run("opt_expr", "");
            if let Some(bounds) = rules.shregmap {
                s.run("shregmap", bounds);
            }
            s.run("dfflegalize", rules.dff_legalize)
                .when(Gate::families(PP3), |s| {
                    s.run("techmap", format!("-map {}", share("cells_map.v")));
                })
                .when(Gate::feature(Feature::FfMap), |s| {
                    s.run(
                        "techmap",
                        format!("-map +/techmap.v -map {}", share("ffs_map.v")),
                    );
                })
                .when(Gate::families(PP3), |s| {
                    s.run("opt_expr", "-mux_undef");
                })
                .run("opt_merge", "")
                .run("opt_clean", "")
                .run("opt", "");
        })
        .stage(Label::MapLuts, |s| {
            s.when(Gate::feature(Feature::AbcOpt), |s| {
                if let Some(lut) = rules.abc_lut {
                    s.run("abc", lut);
                }
                s.when(Gate::families(PP3), |s| {
                    s.run("techmap", format!("-map {}", share("latches_map.v")))
                        .when(Gate::feature(Feature::Abc9), |s| {
                            s.run(
                                "read_verilog",
                                format!("-lib -specify -icells {}", share("abc9_model.v")),
                            )
                            .run("techmap", format!("-map {}", share("abc9_map.v")))
                            .run("abc9", rules.abc9_lut.unwrap_or_default())
                            .run("techmap", format!("-map {}", share("abc9_unmap.v")));
                        })
                        .when(Gate::without(Feature::Abc9), |s| {
                            s.run(
                                "abc",
                                format!("-script +read_lut,{};{ABC_SCRIPT}", share("lutdefs.txt")),
                            );
                        });
                });
            })
            .run("clean", "")
            .run("opt_lut", "");
        })
        .stage(Label::MapCells, |s| {
            s.when(Gate::families(PP3), |s| {
                s.run("techmap", format!("-map {}", share("lut_map.v")))
                    .run("clean", "");
            });
        })
        .stage(Label::Check, |s| {
            s.run("autoname", "")
                .run("hierarchy", "-check")
                .run("stat", "")
                .run("check", "-noinit");
        })
        .stage(Label::Iomap, |s| {
            s.when(Gate::families(PP3), |s| {
                s.run("clkbufmap", "-inpad ckpad Q:P").run(
                    "iopadmap",
                    "-bits -outpad outpad A:P -inpad inpad Q:P -tinoutpad bipad EN:Q:A:P A:top",
                );
            });
        })
        .stage(Label::Finalize, |s| {
            let hilomap = "-hicell logic_1 a -locell logic_0 a -singleton A:top";
            s.when(Gate::families(PP3), |s| {
                s.run("setundef", "-zero -params -undriven")
                    .run("hilomap", hilomap);
            })
            .when(Gate::families(QLF), |s| {
                s.when(Gate::output(OutputKind::Edif), |s| {
                    s.run("hilomap", hilomap);
                });
            })
            .run("opt_clean", "-purge")
            .run("check", "")
            .run("blackbox", "=A:whitebox");
        })
        .stage(Label::Blif, |s| {
            let path = config.output_argument(OutputKind::Blif);
            s.when(Gate::output(OutputKind::Blif), |s| {
                s.when(Gate::feature(Feature::Adder), |s| {
                    s.run("write_blif", format!("-param {path}"));
                })
                .when(Gate::without(Feature::Adder), |s| {
                    s.run("write_blif", path);
                });
            });
        })
        .stage(Label::Edif, |s| {
            let path = config.output_argument(OutputKind::Edif);
            let arguments = match config.top_module_name() {
                Some(top) => format!("-nogndvcc -attrprop -pvector par {top} {path}"),
                None => format!("-nogndvcc -attrprop -pvector par {path}"),
            };
            s.when(Gate::output(OutputKind::Edif), |s| {
                s.run("splitnets", "-ports -format ()")
                    .run("quicklogic_eqn", "")
                    .run("write_ql_edif", arguments);
            });
        })
        .stage(Label::Verilog, |s| {
            let path = config.output_argument(OutputKind::Verilog);
            s.when(Gate::output(OutputKind::Verilog), |s| {
                s.run("write_verilog", format!("-noattr -nohex {path}"));
            });
        })
}

/// Builds the pipeline definition for `config`.
///
/// # Errors
///
/// Returns an error if a gate cannot be evaluated for this configuration.
pub fn build_pipeline(config: &SynthConfig) -> Result<PipelineDefinition, PlanningError> {
    quicklogic_script(config).build(config)
}

/// Resolves raw options and builds their pipeline definition.
///
/// # Errors
///
/// Returns a configuration error for an unsupported family, or a planning
/// error if the script cannot be resolved.
pub fn plan(options: &SynthOptions) -> Result<PipelineDefinition, SynthflowError> {
    let config = SynthConfig::resolve(options)?;
    Ok(build_pipeline(&config)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{LabelRange, RunMode};
    use pretty_assertions::assert_eq;

    fn describe(family: TargetFamily) -> SynthConfig {
        SynthConfig::new(family).with_mode(RunMode::Describe)
    }

    fn lines(config: &SynthConfig, label: Label) -> Vec<String> {
        build_pipeline(config)
            .unwrap()
            .stage(label)
            .unwrap()
            .planned()
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    #[test]
    fn test_every_family_declares_every_label() {
        for family in TargetFamily::ALL {
            let definition = build_pipeline(&SynthConfig::new(family)).unwrap();
            assert_eq!(definition.labels(), Label::ALL.to_vec(), "{family}");
        }
    }

    #[test]
    fn test_k6n10_describe_report() {
        let definition = build_pipeline(&describe(TargetFamily::QlfK6n10)).unwrap();
        let report = definition.report(LabelRange::full());

        assert_eq!(
            report.stage_lines("map_bram"),
            vec![
                "memory_bram -rules +/quicklogic/qlf_k6n10/brams.txt",
                "techmap -map +/quicklogic/qlf_k6n10/brams_map.v",
            ]
        );
        let coarse = report.stage_lines("coarse");
        assert!(coarse.contains(&"memory_dff"));
        assert!(coarse.contains(&"ql_dsp"));
        assert!(coarse.contains(&"chtype -set $mul t:$__soft_mul"));
        assert!(!report.as_str().contains("shregmap -minlen 8 -maxlen 8"));
        assert!(!report.as_str().contains("abc -lut 4"));
        assert!(report.as_str().contains("abc -lut 6"));
    }

    #[test]
    fn test_dsp_chain_is_one_unit() {
        let on = build_pipeline(&SynthConfig::new(TargetFamily::QlfK6n10)).unwrap();
        let off = build_pipeline(
            &SynthConfig::new(TargetFamily::QlfK6n10).with_feature(Feature::Dsp, false),
        )
        .unwrap();

        let coarse_on = on.stage(Label::Coarse).unwrap();
        let coarse_off = off.stage(Label::Coarse).unwrap();
        assert_eq!(coarse_on.planned().len(), coarse_off.planned().len());
        assert_eq!(
            coarse_on.included().count() - coarse_off.included().count(),
            10
        );
        assert!(coarse_off
            .planned()
            .iter()
            .filter(|i| !i.is_included())
            .all(|i| i.skip_annotation() == Some("(skip if -no_dsp)")));
    }

    #[test]
    fn test_dsp_chain_absent_outside_k6n10() {
        for family in [TargetFamily::Pp3, TargetFamily::QlfK4n8] {
            let coarse = lines(&SynthConfig::new(family), Label::Coarse);
            assert!(!coarse.iter().any(|l| l == "ql_dsp"), "{family}");
        }
    }

    #[test]
    fn test_bram_stage_empty_for_k4n8() {
        let definition = build_pipeline(&SynthConfig::new(TargetFamily::QlfK4n8)).unwrap();
        assert!(definition.stage(Label::MapBram).unwrap().is_empty());
    }

    #[test]
    fn test_pp3_bram_includes_braminit() {
        assert_eq!(
            lines(&SynthConfig::new(TargetFamily::Pp3), Label::MapBram),
            vec![
                "memory_bram -rules +/quicklogic/pp3/brams.txt",
                "pp3_braminit",
                "techmap -map +/quicklogic/pp3/brams_map.v",
            ]
        );
    }

    #[test]
    fn test_map_gates_adder_choice() {
        let k4 = SynthConfig::new(TargetFamily::QlfK4n8);
        let definition = build_pipeline(&k4).unwrap();
        let stage = definition.stage(Label::MapGates).unwrap();
        let first = stage.included().next().unwrap();
        assert_eq!(
            first.command_line(),
            "techmap -map +/techmap.v -map +/quicklogic/qlf_k4n8/arith_map.v"
        );

        let definition = build_pipeline(&k4.with_feature(Feature::Adder, false)).unwrap();
        let stage = definition.stage(Label::MapGates).unwrap();
        assert_eq!(stage.included().next().unwrap().command_line(), "techmap");

        let pp3 = lines(&SynthConfig::new(TargetFamily::Pp3), Label::MapGates);
        assert_eq!(pp3[0], "techmap");
        assert!(pp3.contains(&"muxcover -mux8 -mux4".to_string()));
        assert!(!pp3.iter().any(|l| l.contains("arith_map.v")));
    }

    #[test]
    fn test_map_ffs_uses_family_rules() {
        let k4 = lines(&SynthConfig::new(TargetFamily::QlfK4n8), Label::MapFfs);
        assert_eq!(k4[1], "shregmap -minlen 8 -maxlen 8");
        assert!(k4[2].starts_with("dfflegalize -cell $_DFF_P_ 0"));

        let pp3 = lines(&SynthConfig::new(TargetFamily::Pp3), Label::MapFfs);
        assert_eq!(pp3[1], "dfflegalize -cell $_DFFSRE_PPPP_ 0 -cell $_DLATCH_?_ x");
        assert_eq!(pp3[2], "techmap -map +/quicklogic/pp3/cells_map.v");
    }

    #[test]
    fn test_pp3_abc9_or_abc_script() {
        let pp3 = SynthConfig::new(TargetFamily::Pp3);
        let definition = build_pipeline(&pp3).unwrap();
        let included: Vec<String> = definition
            .stage(Label::MapLuts)
            .unwrap()
            .included()
            .map(ToString::to_string)
            .collect();
        assert_eq!(
            included,
            vec![
                "techmap -map +/quicklogic/pp3/latches_map.v",
                "read_verilog -lib -specify -icells +/quicklogic/pp3/abc9_model.v",
                "techmap -map +/quicklogic/pp3/abc9_map.v",
                "abc9 -maxlut 4 -dff",
                "techmap -map +/quicklogic/pp3/abc9_unmap.v",
                "clean",
                "opt_lut",
            ]
        );

        let definition = build_pipeline(&pp3.with_feature(Feature::Abc9, false)).unwrap();
        let stage = definition.stage(Label::MapLuts).unwrap();
        let abc = stage.included().nth(1).unwrap();
        assert_eq!(abc.operation(), "abc");
        assert!(abc
            .arguments()
            .starts_with("-script +read_lut,+/quicklogic/pp3/lutdefs.txt;strash;"));
        assert!(abc.arguments().ends_with("lutpack;dress"));
    }

    #[test]
    fn test_abc_opt_off_skips_lut_mapping() {
        let config = SynthConfig::new(TargetFamily::QlfK4n8).with_feature(Feature::AbcOpt, false);
        let definition = build_pipeline(&config).unwrap();
        let stage = definition.stage(Label::MapLuts).unwrap();

        assert_eq!(stage.planned()[0].skip_annotation(), Some("(skip if -no_abc_opt)"));
        let included: Vec<&str> = stage.included().map(|i| i.operation()).collect();
        assert_eq!(included, vec!["clean", "opt_lut"]);
    }

    #[test]
    fn test_placeholders_in_describe_mode() {
        let config = describe(TargetFamily::QlfK4n8);
        assert_eq!(
            lines(&config, Label::Begin)[1],
            "hierarchy -check -top <top>"
        );
        assert_eq!(
            lines(&config, Label::Blif)[0],
            "write_blif -param <file-name>"
        );
        assert_eq!(
            lines(&config, Label::Edif)[2],
            "write_ql_edif -nogndvcc -attrprop -pvector par <top> <file-name>"
        );
        assert_eq!(
            lines(&config, Label::Verilog),
            vec!["write_verilog -noattr -nohex <file-name>"]
        );
    }

    #[test]
    fn test_execute_arguments_use_configured_values() {
        let config = SynthConfig::new(TargetFamily::QlfK6n10)
            .with_output(OutputKind::Edif, "chip.edif")
            .with_output(OutputKind::Blif, "chip.blif");
        assert_eq!(lines(&config, Label::Begin)[1], "hierarchy -check -auto-top");
        assert_eq!(
            lines(&config, Label::Edif)[2],
            "write_ql_edif -nogndvcc -attrprop -pvector par chip.edif"
        );

        let config = config.with_top("chip");
        assert_eq!(lines(&config, Label::Begin)[1], "hierarchy -check -top chip");
        assert_eq!(
            lines(&config, Label::Edif)[2],
            "write_ql_edif -nogndvcc -attrprop -pvector par chip chip.edif"
        );
        assert_eq!(lines(&config, Label::Blif), vec!["write_blif -param chip.blif", "write_blif chip.blif"]);
    }

    #[test]
    fn test_hilomap_rules() {
        let pp3 = lines(&SynthConfig::new(TargetFamily::Pp3), Label::Finalize);
        assert!(pp3[1].starts_with("hilomap"));

        let k4 = SynthConfig::new(TargetFamily::QlfK4n8);
        let definition = build_pipeline(&k4).unwrap();
        let hilomap = &definition.stage(Label::Finalize).unwrap().planned()[0];
        assert_eq!(hilomap.skip_annotation(), Some("(skip if no -edif)"));

        let definition = build_pipeline(&k4.with_output(OutputKind::Edif, "a.edif")).unwrap();
        let hilomap = &definition.stage(Label::Finalize).unwrap().planned()[0];
        assert!(hilomap.is_included());
    }

    #[test]
    fn test_flag_only_touches_gated_stages() {
        let base = build_pipeline(&SynthConfig::new(TargetFamily::QlfK6n10)).unwrap();
        let no_bram = build_pipeline(
            &SynthConfig::new(TargetFamily::QlfK6n10).with_feature(Feature::Bram, false),
        )
        .unwrap();

        for label in Label::ALL {
            if label != Label::MapBram {
                assert_eq!(base.stage(label), no_bram.stage(label), "{label}");
            }
        }
        assert_ne!(base.stage(Label::MapBram), no_bram.stage(Label::MapBram));
    }

    #[test]
    fn test_plan_rejects_unknown_family() {
        let err = plan(&SynthOptions::default().with_family("k7")).unwrap_err();
        assert!(matches!(err, SynthflowError::Configuration(_)));
    }
}

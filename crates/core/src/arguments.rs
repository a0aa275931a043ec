//! Argument vector construction for the analyzer CLI.
//!
//! `--in` and `--eps` are always emitted first. Optional flags follow in a
//! fixed order, each only when its field is set. Values are passed through
//! verbatim; the analyzer is the only validator.

use crate::submission::AnalysisOptions;

pub const FLAG_IN: &str = "--in";
pub const FLAG_EPS: &str = "--eps";
pub const FLAG_OUT_GRAPH: &str = "--out-graph";
pub const FLAG_OUT_HASSE: &str = "--out-hasse";
pub const FLAG_KEEP_TRANSITIVE: &str = "--keep-transitive";
pub const FLAG_MATRIX_POWER: &str = "--matrix-power";
pub const FLAG_CONVERGE_MAX: &str = "--converge-max";
pub const FLAG_DIST_START: &str = "--dist-start";
pub const FLAG_DIST_STEPS: &str = "--dist-steps";
pub const FLAG_NO_STATIONARY: &str = "--no-stationary";
pub const FLAG_PERIOD: &str = "--period";

/// Maps analysis options onto the analyzer's command line.
pub struct ArgumentBuilder;

impl ArgumentBuilder {
    /// Build the argument vector for a run on `input_path`.
    ///
    /// `eps` is emitted even when blank; the analyzer reports it.
    pub fn build(input_path: &str, options: &AnalysisOptions) -> Vec<String> {
        let mut args = Args::default();
        args.pair(FLAG_IN, input_path);
        args.pair(FLAG_EPS, &options.eps);

        args.optional(FLAG_OUT_GRAPH, &options.out_graph);
        args.optional(FLAG_OUT_HASSE, &options.out_hasse);
        args.switch(FLAG_KEEP_TRANSITIVE, options.keep_transitive);
        args.optional(FLAG_MATRIX_POWER, &options.matrix_power);
        args.optional(FLAG_CONVERGE_MAX, &options.converge_max);
        args.optional(FLAG_DIST_START, &options.dist_start);
        args.optional(FLAG_DIST_STEPS, &options.dist_steps);
        args.switch(FLAG_NO_STATIONARY, options.no_stationary);
        args.switch(FLAG_PERIOD, options.period);

        args.0
    }
}

#[derive(Default)]
struct Args(Vec<String>);

impl Args {
    fn pair(&mut self, flag: &str, value: &str) {
        self.0.push(flag.to_string());
        self.0.push(value.to_string());
    }

    /// Flag and value, only when the value is non-blank.
    fn optional(&mut self, flag: &str, value: &str) {
        let value = value.trim();
        if !value.is_empty() {
            self.pair(flag, value);
        }
    }

    fn switch(&mut self, flag: &str, on: bool) {
        if on {
            self.0.push(flag.to_string());
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Process-wide defaults for the analyzer front-end.
//!
//! Everything the form falls back to when a field is left blank lives in
//! [`AnalyzerDefaults`], which is passed explicitly to the resolver, the
//! argument builder and the request handler.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::CoreError;

/// Analyzer binary, relative to the project root.
pub const DEFAULT_BINARY: &str = "./cmake-build-debug/markov_graph_analyzer";

/// Epsilon used when the form does not send one.
pub const DEFAULT_EPS: &str = "0.01";

/// Convergence iteration limit shown in a fresh form.
pub const DEFAULT_CONVERGE_MAX: &str = "30";

/// Invocation limit applied when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// What to do when the manual or editor tab is active but carries no graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptyInputPolicy {
    /// Analyze the default input file instead.
    #[default]
    Fallback,
    /// Refuse the submission without running the analyzer.
    Reject,
}

impl EmptyInputPolicy {
    /// Parse the policy from its configuration name (`fallback` or `reject`).
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "fallback" => Ok(Self::Fallback),
            "reject" => Ok(Self::Reject),
            other => Err(CoreError::Validation(format!(
                "unknown empty input policy '{other}' (expected 'fallback' or 'reject')"
            ))),
        }
    }
}

/// Defaults and limits shared by every submission.
#[derive(Debug, Clone)]
pub struct AnalyzerDefaults {
    /// Working directory of the analyzer; relative paths resolve against it.
    pub project_root: PathBuf,
    /// Analyzer binary used when the form leaves it blank.
    pub binary: String,
    /// Graph file analyzed when no other input is supplied.
    pub infile: String,
    /// Epsilon used when the field is absent.
    pub eps: String,
    /// Mermaid export path shown in a fresh form.
    pub out_graph: String,
    /// Hasse export path shown in a fresh form.
    pub out_hasse: String,
    /// Convergence iteration limit shown in a fresh form.
    pub converge_max: String,
    /// Wall-clock limit for one analyzer run.
    pub timeout: Duration,
    pub empty_input: EmptyInputPolicy,
}

impl AnalyzerDefaults {
    /// Standard defaults for a project checked out at `root`.
    pub fn for_root(root: impl Into<PathBuf>) -> Self {
        let project_root = root.into();
        let infile = path_string(&project_root.join("data").join("exemple_valid_step3.txt"));
        let mermaid = project_root.join("out").join("mermaid");

        Self {
            binary: DEFAULT_BINARY.to_string(),
            infile,
            eps: DEFAULT_EPS.to_string(),
            out_graph: path_string(&mermaid.join("graph.mmd")),
            out_hasse: path_string(&mermaid.join("hasse.mmd")),
            converge_max: DEFAULT_CONVERGE_MAX.to_string(),
            timeout: DEFAULT_TIMEOUT,
            empty_input: EmptyInputPolicy::default(),
            project_root,
        }
    }

    /// Resolve a program path the way the analyzer's working directory sees it.
    ///
    /// Relative paths with a directory component (`./bin/x`, `build/x`) are
    /// joined onto the project root. Bare names are left for `PATH` lookup.
    pub fn program_path(&self, program: &str) -> PathBuf {
        let path = Path::new(program);
        if path.is_relative() && path.components().count() > 1 {
            self.project_root.join(path)
        } else {
            path.to_path_buf()
        }
    }
}

fn path_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

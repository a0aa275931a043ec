//! Submission data model.
//!
//! [`RawSubmission`] mirrors the HTML form field for field. It is normalised
//! into a [`SubmissionForm`], where exactly one [`GraphInput`] variant is
//! authoritative and fields of the other input tabs are dropped.

use serde::{Deserialize, Serialize};

use crate::defaults::{AnalyzerDefaults, DEFAULT_EPS};
use crate::error::CoreError;

/// Which of the three input tabs supplied the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputMode {
    #[serde(rename = "tab-file")]
    File,
    #[serde(rename = "tab-manual")]
    ManualText,
    #[serde(rename = "tab-editor")]
    EditorJson,
}

impl InputMode {
    /// Tab identifier used by the form's `active_tab` field.
    pub fn selector(self) -> &'static str {
        match self {
            Self::File => "tab-file",
            Self::ManualText => "tab-manual",
            Self::EditorJson => "tab-editor",
        }
    }

    /// Parse an `active_tab` value. Blank means the file tab.
    pub fn from_selector(value: &str) -> Result<Self, CoreError> {
        match value.trim() {
            "" | "tab-file" => Ok(Self::File),
            "tab-manual" => Ok(Self::ManualText),
            "tab-editor" => Ok(Self::EditorJson),
            other => Err(CoreError::Validation(format!("unknown input tab '{other}'"))),
        }
    }
}

/// Graph data carried by the active input tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum GraphInput {
    /// Path to an existing graph file. Blank selects the default input file.
    File { path: String },
    /// Graph text typed by hand.
    ManualText { text: String },
    /// Raw JSON produced by the node/edge editor. Parsed by the resolver.
    EditorJson { payload: String },
}

impl GraphInput {
    pub fn mode(&self) -> InputMode {
        match self {
            Self::File { .. } => InputMode::File,
            Self::ManualText { .. } => InputMode::ManualText,
            Self::EditorJson { .. } => InputMode::EditorJson,
        }
    }
}

/// Analyzer options. Strings are passed through unvalidated; blank means unset,
/// except `eps`, which is always emitted. An absent `eps` defaults to `0.01`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisOptions {
    pub eps: String,
    pub out_graph: String,
    pub out_hasse: String,
    pub keep_transitive: bool,
    pub matrix_power: String,
    pub converge_max: String,
    pub dist_start: String,
    pub dist_steps: String,
    pub no_stationary: bool,
    pub period: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            eps: DEFAULT_EPS.to_string(),
            out_graph: String::new(),
            out_hasse: String::new(),
            keep_transitive: false,
            matrix_power: String::new(),
            converge_max: String::new(),
            dist_start: String::new(),
            dist_steps: String::new(),
            no_stationary: false,
            period: false,
        }
    }
}

/// One normalised submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionForm {
    /// Analyzer binary. Blank selects the default binary.
    #[serde(default)]
    pub binary: String,
    pub input: GraphInput,
    #[serde(default)]
    pub options: AnalysisOptions,
}

/// Form fields exactly as posted by the browser.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawSubmission {
    pub binary: Option<String>,
    pub active_tab: Option<String>,
    pub infile: Option<String>,
    pub graph_text: Option<String>,
    pub editor_payload: Option<String>,
    pub eps: Option<String>,
    pub out_graph: Option<String>,
    pub out_hasse: Option<String>,
    pub matrix_power: Option<String>,
    pub converge_max: Option<String>,
    pub dist_start: Option<String>,
    pub dist_steps: Option<String>,
    pub keep_transitive: Option<String>,
    pub no_stationary: Option<String>,
    pub period: Option<String>,
}

impl RawSubmission {
    /// Normalise the posted fields into a [`SubmissionForm`].
    ///
    /// Only the active tab's payload survives. A missing `eps` field takes
    /// the configured default; a posted but blank one stays blank. Fails on
    /// an unknown tab.
    pub fn into_form(&self, defaults: &AnalyzerDefaults) -> Result<SubmissionForm, CoreError> {
        let mode = InputMode::from_selector(self.active_tab.as_deref().unwrap_or_default())?;

        let input = match mode {
            InputMode::File => GraphInput::File {
                path: trimmed(&self.infile),
            },
            InputMode::ManualText => GraphInput::ManualText {
                text: trimmed(&self.graph_text),
            },
            InputMode::EditorJson => GraphInput::EditorJson {
                payload: self.editor_payload.clone().unwrap_or_default(),
            },
        };

        Ok(SubmissionForm {
            binary: trimmed(&self.binary),
            input,
            options: AnalysisOptions {
                eps: match &self.eps {
                    Some(eps) => eps.trim().to_string(),
                    None => defaults.eps.clone(),
                },
                out_graph: trimmed(&self.out_graph),
                out_hasse: trimmed(&self.out_hasse),
                keep_transitive: checked(&self.keep_transitive),
                matrix_power: trimmed(&self.matrix_power),
                converge_max: trimmed(&self.converge_max),
                dist_start: trimmed(&self.dist_start),
                dist_steps: trimmed(&self.dist_steps),
                no_stationary: checked(&self.no_stationary),
                period: checked(&self.period),
            },
        })
    }

    /// Values to put back into the form, falling back to display defaults.
    pub fn echo(&self, defaults: &AnalyzerDefaults) -> FormState {
        FormState {
            binary: or(&self.binary, &defaults.binary),
            active_tab: or(&self.active_tab, InputMode::File.selector()),
            infile: or(&self.infile, &defaults.infile),
            graph_text: or(&self.graph_text, ""),
            editor_payload: or(&self.editor_payload, ""),
            eps: or(&self.eps, &defaults.eps),
            out_graph: or(&self.out_graph, &defaults.out_graph),
            out_hasse: or(&self.out_hasse, &defaults.out_hasse),
            matrix_power: or(&self.matrix_power, ""),
            converge_max: or(&self.converge_max, &defaults.converge_max),
            dist_start: or(&self.dist_start, ""),
            dist_steps: or(&self.dist_steps, ""),
            keep_transitive: checked(&self.keep_transitive),
            no_stationary: checked(&self.no_stationary),
            period: checked(&self.period),
        }
    }
}

impl From<&SubmissionForm> for RawSubmission {
    /// Express a typed submission as the form fields it corresponds to.
    fn from(form: &SubmissionForm) -> Self {
        let flag = |on: bool| on.then(|| "on".to_string());
        let mut raw = RawSubmission {
            binary: Some(form.binary.clone()),
            active_tab: Some(form.input.mode().selector().to_string()),
            eps: Some(form.options.eps.clone()),
            out_graph: Some(form.options.out_graph.clone()),
            out_hasse: Some(form.options.out_hasse.clone()),
            matrix_power: Some(form.options.matrix_power.clone()),
            converge_max: Some(form.options.converge_max.clone()),
            dist_start: Some(form.options.dist_start.clone()),
            dist_steps: Some(form.options.dist_steps.clone()),
            keep_transitive: flag(form.options.keep_transitive),
            no_stationary: flag(form.options.no_stationary),
            period: flag(form.options.period),
            ..Default::default()
        };

        match &form.input {
            GraphInput::File { path } => raw.infile = Some(path.clone()),
            GraphInput::ManualText { text } => raw.graph_text = Some(text.clone()),
            GraphInput::EditorJson { payload } => raw.editor_payload = Some(payload.clone()),
        }
        raw
    }
}

/// The form as it should be re-rendered after a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormState {
    pub binary: String,
    pub active_tab: String,
    pub infile: String,
    pub graph_text: String,
    pub editor_payload: String,
    pub eps: String,
    pub out_graph: String,
    pub out_hasse: String,
    pub matrix_power: String,
    pub converge_max: String,
    pub dist_start: String,
    pub dist_steps: String,
    pub keep_transitive: bool,
    pub no_stationary: bool,
    pub period: bool,
}

impl FormState {
    /// State of a form that has not been submitted yet.
    pub fn initial(defaults: &AnalyzerDefaults) -> Self {
        RawSubmission::default().echo(defaults)
    }
}

fn trimmed(value: &Option<String>) -> String {
    value.as_deref().unwrap_or_default().trim().to_string()
}

fn or(value: &Option<String>, fallback: &str) -> String {
    value.clone().unwrap_or_else(|| fallback.to_string())
}

fn checked(value: &Option<String>) -> bool {
    value.as_deref() == Some("on")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

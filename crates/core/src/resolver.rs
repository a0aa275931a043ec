//! Input resolution: turn the active input tab into a graph file path.
//!
//! File mode passes its path through untouched. Manual text and editor JSON
//! are materialised into a uniquely named temporary file owned by a
//! [`TempArtifact`], which deletes the file when released or dropped.

use std::fmt;
use std::io::{self, Write};
use std::path::Path;

use serde::de::Error as _;
use serde::Deserialize;
use serde_json::Value;
use tempfile::TempPath;

use crate::defaults::{AnalyzerDefaults, EmptyInputPolicy};
use crate::submission::{GraphInput, InputMode};

/// Errors raised while resolving the graph input.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// The editor payload is not a valid graph description.
    #[error("invalid editor payload: {0}")]
    Payload(#[from] serde_json::Error),

    /// The active tab carried no graph and the policy forbids falling back.
    #[error("no graph data supplied in {}", .mode.selector())]
    EmptyInput { mode: InputMode },

    /// The temporary graph file could not be written.
    #[error("failed to write temporary graph file: {0}")]
    Materialize(#[source] io::Error),
}

// ---------------------------------------------------------------------------
// Editor payload
// ---------------------------------------------------------------------------

/// A scalar from the editor: JSON number or string, rendered without quotes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum GraphScalar {
    Number(serde_json::Number),
    Text(String),
}

impl fmt::Display for GraphScalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// One edge drawn in the editor.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EditorEdge {
    pub from: GraphScalar,
    pub to: GraphScalar,
    pub proba: GraphScalar,
}

/// Graph authored in the node/edge editor: `{"n": .., "edges": [..]}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EditorGraphPayload {
    #[serde(default)]
    pub n: Option<GraphScalar>,
    #[serde(default)]
    pub edges: Vec<EditorEdge>,
}

impl EditorGraphPayload {
    /// Parse an editor payload. The payload and each of its edges must be
    /// JSON objects; positional arrays are refused.
    pub fn parse(payload: &str) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_str(payload)?;
        let Value::Object(fields) = &value else {
            return Err(serde_json::Error::custom("expected a JSON object"));
        };
        if let Some(Value::Array(edges)) = fields.get("edges") {
            if edges.iter().any(|edge| !edge.is_object()) {
                return Err(serde_json::Error::custom("expected every edge to be a JSON object"));
            }
        }
        serde_json::from_value(value)
    }

    /// Node count as text, or `None` when missing or blank.
    pub fn node_count(&self) -> Option<String> {
        let n = self.n.as_ref()?.to_string();
        let n = n.trim();
        (!n.is_empty()).then(|| n.to_string())
    }

    /// Graph file text: the node count, then `from to proba` per edge in
    /// payload order. `None` when the node count is blank.
    pub fn to_graph_text(&self) -> Option<String> {
        let n = self.node_count()?;
        let lines = std::iter::once(n).chain(
            self.edges
                .iter()
                .map(|e| format!("{} {} {}", e.from, e.to, e.proba)),
        );
        Some(lines.collect::<Vec<_>>().join("\n"))
    }
}

// ---------------------------------------------------------------------------
// Temporary artifact
// ---------------------------------------------------------------------------

/// A temporary graph file owned by one submission.
///
/// The file is removed by [`TempArtifact::release`] or, failing that, when
/// the artifact is dropped.
#[derive(Debug)]
pub struct TempArtifact {
    path: TempPath,
}

impl TempArtifact {
    /// Write `contents` to a fresh, uniquely named `.txt` file.
    pub fn write(contents: &str) -> io::Result<Self> {
        let mut file = tempfile::Builder::new()
            .prefix("mga-graph-")
            .suffix(".txt")
            .tempfile()?;
        file.write_all(contents.as_bytes())?;
        file.flush()?;

        // Closes the handle; the file itself lives as long as the TempPath.
        let path = file.into_temp_path();
        tracing::debug!(path = %path.display(), bytes = contents.len(), "Wrote temporary graph file");
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete the file now. A file that is already gone is not an error.
    pub fn release(self) -> io::Result<()> {
        match self.path.close() {
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }
}

// ---------------------------------------------------------------------------
// Resolver
// ---------------------------------------------------------------------------

/// Outcome of a successful resolution.
#[derive(Debug)]
pub struct ResolvedInput {
    /// Path handed to the analyzer's `--in` flag.
    pub path: String,
    /// Temporary file backing `path`, if one was created.
    pub artifact: Option<TempArtifact>,
    /// Human-readable source description; empty for plain file input.
    pub used_file: String,
}

impl ResolvedInput {
    fn file(path: String) -> Self {
        Self {
            path,
            artifact: None,
            used_file: String::new(),
        }
    }

    fn temporary(artifact: TempArtifact, source: &str) -> Self {
        let path = artifact.path().to_string_lossy().into_owned();
        Self {
            used_file: format!("temporary file generated ({source}): {path}"),
            path,
            artifact: Some(artifact),
        }
    }
}

/// Resolves the active input tab to a path the analyzer can read.
pub struct InputResolver<'a> {
    defaults: &'a AnalyzerDefaults,
}

impl<'a> InputResolver<'a> {
    pub fn new(defaults: &'a AnalyzerDefaults) -> Self {
        Self { defaults }
    }

    pub fn resolve(&self, input: &GraphInput) -> Result<ResolvedInput, ResolveError> {
        match input {
            GraphInput::File { path } => {
                let path = path.trim();
                if path.is_empty() {
                    Ok(ResolvedInput::file(self.defaults.infile.clone()))
                } else {
                    Ok(ResolvedInput::file(path.to_string()))
                }
            }
            GraphInput::ManualText { text } => {
                if text.trim().is_empty() {
                    return self.no_data(InputMode::ManualText);
                }
                let artifact = TempArtifact::write(text).map_err(ResolveError::Materialize)?;
                Ok(ResolvedInput::temporary(artifact, "manual text"))
            }
            GraphInput::EditorJson { payload } => {
                if payload.trim().is_empty() {
                    return self.no_data(InputMode::EditorJson);
                }
                let graph = EditorGraphPayload::parse(payload)?;
                let Some(text) = graph.to_graph_text() else {
                    return self.no_data(InputMode::EditorJson);
                };
                let artifact = TempArtifact::write(&text).map_err(ResolveError::Materialize)?;
                Ok(ResolvedInput::temporary(artifact, "editor"))
            }
        }
    }

    /// Active tab without data: fall back to the default file or refuse.
    fn no_data(&self, mode: InputMode) -> Result<ResolvedInput, ResolveError> {
        match self.defaults.empty_input {
            EmptyInputPolicy::Fallback => {
                tracing::debug!(tab = mode.selector(), "Empty input tab, using default graph file");
                Ok(ResolvedInput::file(self.defaults.infile.clone()))
            }
            EmptyInputPolicy::Reject => Err(ResolveError::EmptyInput { mode }),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Per-submission orchestration.
//!
//! [`RequestHandler`] resolves the input, builds the argument vector, runs
//! the analyzer and folds every outcome into an [`AnalysisReport`]. Failures
//! never escape as errors: they become a report with a diagnostic.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::arguments::ArgumentBuilder;
use crate::defaults::AnalyzerDefaults;
use crate::error::CoreError;
use crate::invocation::{
    AnalysisInvoker, InvocationRequest, InvocationResult, InvokeError, ProcessInvoker,
};
use crate::resolver::{InputResolver, ResolveError, ResolvedInput};
use crate::submission::{FormState, RawSubmission, SubmissionForm};

/// How a submission ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// The analyzer ran; inspect `exit_code` and `stderr` for its verdict.
    Completed,
    /// The editor payload could not be parsed. The analyzer was not run.
    PayloadRejected,
    /// The active tab carried no graph under the reject policy.
    EmptyInput,
    /// The temporary graph file could not be written.
    InputFailed,
    /// The analyzer could not be started.
    LaunchFailed,
    /// The analyzer exceeded its time limit.
    TimedOut,
    /// The analyzer started but waiting on it failed.
    InvocationFailed,
}

/// Everything needed to re-render the form after a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub outcome: Outcome,
    pub stdout: String,
    pub stderr: String,
    pub exit_code: Option<i32>,
    pub duration_ms: Option<u64>,
    /// Description of the generated input file; empty for file input.
    pub used_file: String,
    /// Arguments passed to the analyzer; empty if it was never invoked.
    pub args: Vec<String>,
    /// Message for outcomes other than [`Outcome::Completed`].
    pub diagnostic: Option<String>,
    pub form: FormState,
}

impl AnalysisReport {
    fn new(form: FormState) -> Self {
        Self {
            outcome: Outcome::Completed,
            stdout: String::new(),
            stderr: String::new(),
            exit_code: None,
            duration_ms: None,
            used_file: String::new(),
            args: Vec::new(),
            diagnostic: None,
            form,
        }
    }

    /// Record a failure. The message doubles as stderr so a plain renderer
    /// shows it where analyzer errors normally appear.
    fn fail(mut self, outcome: Outcome, message: String) -> Self {
        self.outcome = outcome;
        self.stderr = message.clone();
        self.diagnostic = Some(message);
        self
    }

    fn complete(mut self, result: InvocationResult) -> Self {
        self.outcome = Outcome::Completed;
        self.stdout = result.stdout;
        self.stderr = result.stderr;
        self.exit_code = result.exit_code;
        self.duration_ms = Some(result.duration_ms);
        self
    }
}

/// Orchestrates resolve → build → invoke → release for one submission.
pub struct RequestHandler<I = ProcessInvoker> {
    defaults: Arc<AnalyzerDefaults>,
    invoker: I,
}

impl RequestHandler<ProcessInvoker> {
    pub fn new(defaults: Arc<AnalyzerDefaults>) -> Self {
        Self::with_invoker(defaults, ProcessInvoker)
    }
}

impl<I: AnalysisInvoker> RequestHandler<I> {
    pub fn with_invoker(defaults: Arc<AnalyzerDefaults>, invoker: I) -> Self {
        Self { defaults, invoker }
    }

    pub fn defaults(&self) -> &AnalyzerDefaults {
        &self.defaults
    }

    /// Handle a browser form post. Only an unknown input tab is an error.
    pub async fn handle_form(&self, raw: &RawSubmission) -> Result<AnalysisReport, CoreError> {
        let form = raw.into_form(&self.defaults)?;
        Ok(self.run(&form, raw.echo(&self.defaults)).await)
    }

    /// Handle a typed submission.
    pub async fn handle(&self, form: &SubmissionForm) -> AnalysisReport {
        let echo = RawSubmission::from(form).echo(&self.defaults);
        self.run(form, echo).await
    }

    async fn run(&self, form: &SubmissionForm, echo: FormState) -> AnalysisReport {
        let mut report = AnalysisReport::new(echo);
        let mode = form.input.mode().selector();

        let ResolvedInput {
            path,
            artifact,
            used_file,
        } = match InputResolver::new(&self.defaults).resolve(&form.input) {
            Ok(resolved) => resolved,
            Err(e) => {
                tracing::warn!(tab = mode, error = %e, "Input resolution failed");
                let outcome = match e {
                    ResolveError::Payload(_) => Outcome::PayloadRejected,
                    ResolveError::EmptyInput { .. } => Outcome::EmptyInput,
                    ResolveError::Materialize(_) => Outcome::InputFailed,
                };
                return report.fail(outcome, e.to_string());
            }
        };

        // From here on `artifact` owns the temp file; dropping it on any
        // path (including cancellation of this future) deletes the file.
        let args = ArgumentBuilder::build(&path, &form.options);
        let binary = match form.binary.trim() {
            "" => self.defaults.binary.as_str(),
            binary => binary,
        };
        let request = InvocationRequest {
            program: self.defaults.program_path(binary),
            args: args.clone(),
            working_directory: self.defaults.project_root.clone(),
            timeout: self.defaults.timeout,
        };

        tracing::info!(
            program = %request.program.display(),
            arg_count = args.len(),
            tab = mode,
            "Invoking analyzer"
        );
        let result = self.invoker.invoke(request).await;

        if let Some(artifact) = artifact {
            let temp_path = artifact.path().to_path_buf();
            if let Err(e) = artifact.release() {
                tracing::warn!(path = %temp_path.display(), error = %e, "Failed to remove temporary graph file");
            }
        }

        report.used_file = used_file;
        report.args = args;

        match result {
            Ok(output) => {
                tracing::info!(
                    exit_code = ?output.exit_code,
                    duration_ms = output.duration_ms,
                    stderr_bytes = output.stderr.len(),
                    "Analyzer finished"
                );
                report.complete(output)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Analyzer invocation failed");
                let outcome = match e {
                    InvokeError::Launch { .. } => Outcome::LaunchFailed,
                    InvokeError::Timeout { .. } => Outcome::TimedOut,
                    InvokeError::Io(_) => Outcome::InvocationFailed,
                };
                report.fail(outcome, e.to_string())
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    use assert_matches::assert_matches;

    use super::*;
    use crate::defaults::EmptyInputPolicy;
    use crate::submission::{AnalysisOptions, GraphInput};

    /// Records every request and the input file contents seen at invoke time.
    #[derive(Default)]
    struct RecordingInvoker {
        calls: AtomicUsize,
        requests: Mutex<Vec<InvocationRequest>>,
        inputs: Mutex<Vec<Option<String>>>,
    }

    impl RecordingInvoker {
        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn last_request(&self) -> InvocationRequest {
            self.requests.lock().unwrap().last().cloned().expect("a request")
        }
    }

    impl AnalysisInvoker for &RecordingInvoker {
        async fn invoke(
            &self,
            request: InvocationRequest,
        ) -> Result<InvocationResult, InvokeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let input = std::fs::read_to_string(&request.args[1]).ok();
            self.inputs.lock().unwrap().push(input);
            self.requests.lock().unwrap().push(request);
            Ok(InvocationResult {
                stdout: "[OK] Graphe valide\n".into(),
                stderr: String::new(),
                exit_code: Some(0),
                duration_ms: 3,
            })
        }
    }

    fn defaults() -> Arc<AnalyzerDefaults> {
        Arc::new(AnalyzerDefaults::for_root(std::env::temp_dir()))
    }

    fn submission(input: GraphInput) -> SubmissionForm {
        SubmissionForm {
            binary: String::new(),
            input,
            options: AnalysisOptions {
                eps: "0.01".into(),
                ..Default::default()
            },
        }
    }

    fn input_path(report: &AnalysisReport) -> PathBuf {
        assert_eq!(report.args[0], "--in");
        PathBuf::from(&report.args[1])
    }

    #[tokio::test]
    async fn manual_text_reaches_the_analyzer_and_is_cleaned_up() {
        let invoker = RecordingInvoker::default();
        let handler = RequestHandler::with_invoker(defaults(), &invoker);
        let text = "3\n0 1 0.5\n1 2 0.5";

        let report = handler
            .handle(&submission(GraphInput::ManualText { text: text.into() }))
            .await;

        assert_eq!(report.outcome, Outcome::Completed);
        assert_eq!(report.stdout, "[OK] Graphe valide\n");
        assert_eq!(invoker.inputs.lock().unwrap()[0].as_deref(), Some(text));
        assert!(report.used_file.contains("manual text"));
        assert!(!input_path(&report).exists(), "temp file must be removed");
    }

    #[tokio::test]
    async fn editor_payload_reaches_the_analyzer_as_graph_text() {
        let invoker = RecordingInvoker::default();
        let handler = RequestHandler::with_invoker(defaults(), &invoker);

        let report = handler
            .handle(&submission(GraphInput::EditorJson {
                payload: r#"{"n": "2", "edges": [{"from":0,"to":1,"proba":1.0}]}"#.into(),
            }))
            .await;

        assert_eq!(report.outcome, Outcome::Completed);
        assert_eq!(invoker.inputs.lock().unwrap()[0].as_deref(), Some("2\n0 1 1.0"));
        assert!(!input_path(&report).exists());
    }

    #[tokio::test]
    async fn invalid_payload_never_invokes_the_analyzer() {
        let invoker = RecordingInvoker::default();
        let handler = RequestHandler::with_invoker(defaults(), &invoker);

        let report = handler
            .handle(&submission(GraphInput::EditorJson {
                payload: "{not json".into(),
            }))
            .await;

        assert_eq!(invoker.calls(), 0);
        assert_eq!(report.outcome, Outcome::PayloadRejected);
        assert!(report.args.is_empty());
        assert_matches!(report.diagnostic, Some(ref msg) if msg.starts_with("invalid editor payload"));
        assert_eq!(report.stderr, report.diagnostic.clone().unwrap());
        assert_eq!(report.stdout, "");
    }

    #[tokio::test]
    async fn empty_tab_under_reject_policy_is_reported() {
        let invoker = RecordingInvoker::default();
        let defaults = Arc::new(AnalyzerDefaults {
            empty_input: EmptyInputPolicy::Reject,
            ..AnalyzerDefaults::for_root(std::env::temp_dir())
        });
        let handler = RequestHandler::with_invoker(defaults, &invoker);

        let report = handler
            .handle(&submission(GraphInput::ManualText {
                text: String::new(),
            }))
            .await;

        assert_eq!(invoker.calls(), 0);
        assert_eq!(report.outcome, Outcome::EmptyInput);
    }

    #[tokio::test]
    async fn file_mode_is_idempotent() {
        let invoker = RecordingInvoker::default();
        let handler = RequestHandler::with_invoker(defaults(), &invoker);
        let form = submission(GraphInput::File {
            path: "data/graph.txt".into(),
        });

        let first = handler.handle(&form).await;
        let second = handler.handle(&form).await;

        assert_eq!(first.args, ["--in", "data/graph.txt", "--eps", "0.01"]);
        assert_eq!(first.args, second.args);
        assert_eq!(first.used_file, "");
        assert_eq!(invoker.calls(), 2);
    }

    #[tokio::test]
    async fn blank_binary_uses_default_under_project_root() {
        let invoker = RecordingInvoker::default();
        let defaults = defaults();
        let handler = RequestHandler::with_invoker(Arc::clone(&defaults), &invoker);

        handler
            .handle(&submission(GraphInput::File {
                path: String::new(),
            }))
            .await;

        let request = invoker.last_request();
        assert_eq!(
            request.program,
            defaults.project_root.join("./cmake-build-debug/markov_graph_analyzer")
        );
        assert_eq!(request.working_directory, defaults.project_root);
        assert_eq!(request.args[1], defaults.infile);
    }

    #[tokio::test]
    async fn launch_failure_is_reported_and_temp_file_removed() {
        let handler = RequestHandler::new(defaults());
        let mut form = submission(GraphInput::ManualText {
            text: "1\n1 1 1.0".into(),
        });
        form.binary = "/nonexistent/markov_graph_analyzer".into();

        let report = handler.handle(&form).await;

        assert_eq!(report.outcome, Outcome::LaunchFailed);
        assert_matches!(report.diagnostic, Some(ref msg) if msg.contains("/nonexistent/markov_graph_analyzer"));
        assert_eq!(report.exit_code, None);
        assert!(!input_path(&report).exists(), "temp file must be removed");
    }

    #[tokio::test]
    async fn program_failure_is_a_completed_run() {
        let handler = RequestHandler::new(defaults());
        let mut form = submission(GraphInput::File {
            path: "missing.txt".into(),
        });
        form.binary = "/bin/cat".into();

        let report = handler.handle(&form).await;

        // cat rejects the unknown `--in` option and exits non-zero.
        assert_eq!(report.outcome, Outcome::Completed);
        assert_ne!(report.exit_code, Some(0));
        assert!(!report.stderr.is_empty());
        assert_eq!(report.diagnostic, None);
    }

    #[tokio::test]
    async fn timeout_is_reported() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let script = dir.path().join("slow.sh");
        std::fs::write(&script, "#!/bin/sh\nsleep 60\n").expect("write script");
        make_executable(&script);

        let defaults = Arc::new(AnalyzerDefaults {
            timeout: Duration::from_millis(200),
            ..AnalyzerDefaults::for_root(dir.path())
        });
        let handler = RequestHandler::new(defaults);
        let mut form = submission(GraphInput::ManualText {
            text: "1\n1 1 1.0".into(),
        });
        form.binary = "./slow.sh".into();

        let report = handler.handle(&form).await;

        assert_eq!(report.outcome, Outcome::TimedOut);
        assert!(!input_path(&report).exists());
    }

    #[tokio::test]
    async fn form_post_echoes_submitted_values() {
        let invoker = RecordingInvoker::default();
        let handler = RequestHandler::with_invoker(defaults(), &invoker);
        let raw = RawSubmission {
            active_tab: Some("tab-file".into()),
            infile: Some(" data/g.txt ".into()),
            eps: Some("0.2".into()),
            period: Some("on".into()),
            ..Default::default()
        };

        let report = handler.handle_form(&raw).await.unwrap();

        assert_eq!(report.args, ["--in", "data/g.txt", "--eps", "0.2", "--period"]);
        assert_eq!(report.form.infile, " data/g.txt ");
        assert_eq!(report.form.converge_max, "30");
        assert!(report.form.period);
    }

    #[tokio::test]
    async fn form_post_with_blank_eps_passes_it_through() {
        let handler = RequestHandler::new(defaults());
        let raw = RawSubmission {
            binary: Some("/bin/echo".into()),
            infile: Some("g.txt".into()),
            eps: Some(String::new()),
            ..Default::default()
        };

        let report = handler.handle_form(&raw).await.unwrap();

        assert_eq!(report.args, ["--in", "g.txt", "--eps", ""]);
        assert_eq!(report.outcome, Outcome::Completed);
        assert_eq!(report.stdout, "--in g.txt --eps \n");
    }

    #[tokio::test]
    async fn form_post_without_eps_uses_the_default() {
        let invoker = RecordingInvoker::default();
        let handler = RequestHandler::with_invoker(defaults(), &invoker);
        let raw = RawSubmission {
            infile: Some("g.txt".into()),
            ..Default::default()
        };

        let report = handler.handle_form(&raw).await.unwrap();

        assert_eq!(report.args, ["--in", "g.txt", "--eps", "0.01"]);
    }

    #[tokio::test]
    async fn form_post_with_unknown_tab_is_rejected() {
        let invoker = RecordingInvoker::default();
        let handler = RequestHandler::with_invoker(defaults(), &invoker);
        let raw = RawSubmission {
            active_tab: Some("tab-upload".into()),
            ..Default::default()
        };

        assert_matches!(handler.handle_form(&raw).await, Err(CoreError::Validation(_)));
        assert_eq!(invoker.calls(), 0);
    }

    #[cfg(unix)]
    fn make_executable(path: &Path) {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
            .expect("chmod script");
    }
}

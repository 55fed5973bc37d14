//! Application composition root
//!
//! Wires the core session store, auth flow and mock analyzer to the CLI's
//! adapters: file-backed client storage, tokio latency and a terminal
//! notifier. One `XrayApp` lives for one process; the interactive shell keeps
//! it for the whole run.

use std::path::Path;

use tracing::{debug, info};

use xray_insight_core::{
    dashboard::{self, AnalysisRecord, DashboardSummary},
    media_type_for, AnalysisReport, AuthFlow, Identity, ImageUpload, MemoryDirectory,
    MockAnalyzer, Notice, Notifier, RegistrationForm, Route, Session, SessionStore,
    TokioLatency, XrayError,
};

use crate::{
    config::CliAppConfig,
    error::Result,
    notifier::ConsoleNotifier,
    state::FileStorage,
};

/// Auth flow as wired by the CLI
pub type CliAuthFlow<N> = AuthFlow<MemoryDirectory, FileStorage, TokioLatency, N>;

/// Main application state
pub struct XrayApp<N = ConsoleNotifier> {
    config: CliAppConfig,
    flow: CliAuthFlow<N>,
    analyzer: MockAnalyzer<TokioLatency>,
    records: Vec<AnalysisRecord>,
}

impl XrayApp<ConsoleNotifier> {
    /// Create the application with a terminal notifier
    pub fn new(config: CliAppConfig) -> Result<Self> {
        let notifier = ConsoleNotifier::new(config.cli.colored_output);
        Self::with_notifier(config, notifier)
    }
}

impl<N: Notifier> XrayApp<N> {
    /// Create the application, restoring any stored session
    pub fn with_notifier(config: CliAppConfig, notifier: N) -> Result<Self> {
        let state_dir = config.state_dir()?;
        let storage = FileStorage::open(&state_dir);
        let session_config = config.core.session.clone();

        let mut store = SessionStore::new(
            MemoryDirectory::from_config(&session_config),
            storage,
            TokioLatency,
            session_config,
        );
        store.subscribe(|event| {
            debug!(
                event = ?event.kind,
                state = %event.session.state,
                loading = event.session.loading,
                "Session changed"
            );
        });
        let session = store.restore();
        info!(state = %session.state, dir = %state_dir.display(), "XRay Insight CLI ready");

        Ok(Self {
            analyzer: MockAnalyzer::new(TokioLatency, config.core.analysis.clone()),
            flow: AuthFlow::new(store, notifier),
            records: dashboard::canned_records(),
            config,
        })
    }

    // ----------------------------------------------------------------------------
    // Session
    // ----------------------------------------------------------------------------

    pub async fn login(&mut self, email: &str, password: &str) -> Result<Route> {
        Ok(self.flow.login(email, password).await?)
    }

    pub async fn register(&mut self, form: &RegistrationForm) -> Result<Route> {
        Ok(self.flow.register(form).await?)
    }

    pub fn logout(&mut self) -> Result<Route> {
        Ok(self.flow.logout()?)
    }

    pub fn social_login(&mut self, provider: &str) {
        self.flow.social_login(provider);
    }

    pub fn social_register(&mut self, provider: &str) {
        self.flow.social_register(provider);
    }

    /// Snapshot of the current session
    pub fn session(&self) -> Session {
        self.flow.store().session()
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.flow.identity()
    }

    // ----------------------------------------------------------------------------
    // Dashboard & Analysis
    // ----------------------------------------------------------------------------

    /// Records matching a search query, and the summary of all records
    pub fn dashboard(&self, query: Option<&str>) -> (Vec<&AnalysisRecord>, DashboardSummary) {
        let matches = dashboard::search(&self.records, query.unwrap_or_default());
        (matches, DashboardSummary::from_records(&self.records))
    }

    /// Read an image from disk and run the mock analyzer over it
    ///
    /// Files whose extension is not an image type are rejected unread.
    pub async fn analyze(&mut self, path: &Path) -> Result<AnalysisReport> {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let media_type = media_type_for(&file_name);

        let outcome = match ImageUpload::check_media_type(media_type) {
            Ok(()) => {
                let bytes = tokio::fs::read(path).await?;
                match ImageUpload::new(file_name, media_type, bytes) {
                    Ok(upload) => self.analyzer.analyze(Some(&upload)).await,
                    Err(e) => Err(e.into()),
                }
            }
            Err(e) => Err(e.into()),
        };

        match outcome {
            Ok(report) => {
                self.flow.notifier_mut().notify(&report.notice());
                Ok(report)
            }
            Err(XrayError::Analysis(e)) => {
                self.flow
                    .notifier_mut()
                    .notify(&Notice::error(e.description()).titled(e.title()));
                Err(XrayError::Analysis(e).into())
            }
            Err(e) => Err(e.into()),
        }
    }

    // ----------------------------------------------------------------------------
    // Accessors
    // ----------------------------------------------------------------------------

    pub fn config(&self) -> &CliAppConfig {
        &self.config
    }

    pub fn flow(&self) -> &CliAuthFlow<N> {
        &self.flow
    }

    pub fn notifier(&self) -> &N {
        self.flow.notifier()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use xray_insight_core::{AnalysisError, RecordingNotifier, SessionState, XrayConfig};

    fn test_app(dir: &TempDir) -> XrayApp<RecordingNotifier> {
        let mut config = CliAppConfig::default();
        config.core = XrayConfig::testing();
        config.state.state_dir = Some(dir.path().to_path_buf());
        XrayApp::with_notifier(config, RecordingNotifier::new()).unwrap()
    }

    #[tokio::test]
    async fn test_fresh_app_is_unauthenticated() {
        let dir = TempDir::new().unwrap();
        let app = test_app(&dir);
        assert_eq!(app.session().state, SessionState::Unauthenticated);
        assert!(app.identity().is_none());
    }

    #[tokio::test]
    async fn test_dashboard_search() {
        let dir = TempDir::new().unwrap();
        let app = test_app(&dir);

        let (all, summary) = app.dashboard(None);
        assert_eq!(all.len(), 3);
        assert_eq!(summary.abnormal, 2);

        let (pneumonia, _) = app.dashboard(Some("pneu"));
        assert_eq!(pneumonia.len(), 1);
        assert_eq!(pneumonia[0].patient_id, "P12345");
    }

    #[tokio::test]
    async fn test_analyze_image_file() {
        let dir = TempDir::new().unwrap();
        let image = dir.path().join("chest.png");
        std::fs::write(&image, [0x89, b'P', b'N', b'G']).unwrap();

        let mut app = test_app(&dir);
        let report = app.analyze(&image).await.unwrap();

        assert_eq!(report.file_name, "chest.png");
        assert_eq!(report.findings.len(), 4);
        let notice = app.notifier().last().unwrap();
        assert_eq!(notice.title.as_deref(), Some("Analysis complete"));
    }

    #[tokio::test]
    async fn test_analyze_rejects_non_image() {
        let dir = TempDir::new().unwrap();
        let notes = dir.path().join("notes.txt");
        std::fs::write(&notes, "hello").unwrap();

        let mut app = test_app(&dir);
        assert!(app.analyze(&notes).await.is_err());

        let notice = app.notifier().last().unwrap();
        assert_eq!(notice.title.as_deref(), Some("Invalid file type"));
        assert_eq!(notice.message, "Please upload an image file.");
    }

    #[tokio::test]
    async fn test_analyze_rejects_non_image_unread() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(&dir);

        // Never created, so reading it would surface an IO error instead
        let err = app.analyze(&dir.path().join("missing.pdf")).await.unwrap_err();
        assert!(matches!(
            err,
            crate::CliError::Core(XrayError::Analysis(AnalysisError::UnsupportedFileType { .. }))
        ));
        assert!(err.is_notified());
        assert_eq!(
            app.notifier().last().unwrap().title.as_deref(),
            Some("Invalid file type")
        );
    }

    #[tokio::test]
    async fn test_unreadable_storage_file_starts_signed_out() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join(crate::state::STORAGE_FILE)).unwrap();

        let app = test_app(&dir);
        assert_eq!(app.session().state, SessionState::Unauthenticated);
    }

    #[tokio::test]
    async fn test_analyze_missing_file() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(&dir);
        let err = app.analyze(&dir.path().join("absent.png")).await.unwrap_err();
        assert!(matches!(err, crate::CliError::Io(_)));
    }
}

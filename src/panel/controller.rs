//! Panel controller: host handshake and the story generation workflow
//!
//! The controller owns the only mutable panel state. It publishes every
//! change on a watch channel so the UI can render without blocking a run,
//! and it processes commands one at a time, so two runs never overlap.

use super::error::{InitError, WorkflowError};
use super::state::{Lifecycle, PanelState, RunSummary, StatusMessage};
use crate::backend::{count_created, StoryBackend};
use crate::host::{EpicRef, HostSdk, WorkItemForm, FIELD_TITLE, WORK_ITEM_FORM_SERVICE};
use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::Instrument;
use uuid::Uuid;

/// Delay before asking the host to re-read the Epic after stories are created
pub const DEFAULT_REFRESH_DELAY: Duration = Duration::from_millis(2000);

const READY_MESSAGE: &str = "Ready. Press Enter to generate user stories.";
const NO_PAGES_MESSAGE: &str = "No related wiki pages found for this Epic.";

/// Requests the UI can make of the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelCommand {
    /// Generate stories (the panel button)
    Trigger,
    /// Probe the backend's health endpoint
    CheckBackend,
    /// Ask the host to re-read the Epic now
    Refresh,
}

/// How a completed run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Stories were generated; `created` of `total` were persisted
    Created {
        pages: usize,
        created: usize,
        total: usize,
    },
    /// The backend found no related pages, so nothing was generated
    NoPages,
}

pub struct PanelController {
    sdk: Arc<dyn HostSdk>,
    backend: Arc<dyn StoryBackend>,
    form: Option<Arc<dyn WorkItemForm>>,
    refresh_delay: Duration,
    state: watch::Sender<PanelState>,
    pending_refresh: Option<JoinHandle<()>>,
}

impl PanelController {
    pub fn new(
        sdk: Arc<dyn HostSdk>,
        backend: Arc<dyn StoryBackend>,
        refresh_delay: Duration,
        state: watch::Sender<PanelState>,
    ) -> Self {
        Self {
            sdk,
            backend,
            form: None,
            refresh_delay,
            state,
            pending_refresh: None,
        }
    }

    /// Current state snapshot
    #[cfg(test)]
    pub fn state(&self) -> PanelState {
        self.state.borrow().clone()
    }

    fn update(&self, modify: impl FnOnce(&mut PanelState)) {
        self.state.send_modify(modify);
    }

    fn set_status(&self, status: StatusMessage) {
        self.update(|s| s.status = status);
    }

    /// Attach to the host and obtain the work-item form.
    ///
    /// On failure the host is told the load failed and the controller stays
    /// in the terminal `Failed` state.
    pub async fn initialize(&mut self) -> Result<(), InitError> {
        self.set_status(StatusMessage::loading("Connecting to host..."));

        let form = match self.connect().await {
            Ok(form) => form,
            Err(err) => {
                let message = err.to_string();
                tracing::error!("{message}");
                self.sdk.notify_load_failed(&message);
                self.update(|s| {
                    s.lifecycle = Lifecycle::Failed(message.clone());
                    s.status = StatusMessage::error(message);
                });
                return Err(err);
            }
        };

        let epic = match describe_epic(form.as_ref()).await {
            Ok(epic) => Some(epic),
            Err(err) => {
                tracing::warn!("Could not read Epic for display: {err}");
                None
            }
        };

        self.form = Some(form);
        self.update(|s| {
            s.lifecycle = Lifecycle::Ready;
            s.status = StatusMessage::info(READY_MESSAGE);
            s.epic = epic;
        });
        Ok(())
    }

    async fn connect(&self) -> Result<Arc<dyn WorkItemForm>, InitError> {
        self.sdk.init().await.map_err(InitError::Init)?;
        self.sdk.ready().await.map_err(InitError::Ready)?;
        self.sdk.notify_load_succeeded();
        self.sdk
            .get_service(WORK_ITEM_FORM_SERVICE)
            .await
            .map_err(InitError::Service)
    }

    /// Handle a press of the generate button.
    ///
    /// Returns `None` when the trigger is disabled. Otherwise the run's result,
    /// which has already been rendered to the status display; the trigger is
    /// enabled again on every exit path.
    pub async fn on_trigger(&mut self) -> Option<Result<RunOutcome, WorkflowError>> {
        let result = self.start_run().await?;
        self.update(|s| s.lifecycle = Lifecycle::Ready);
        Some(result)
    }

    /// Run the workflow, leaving the panel `Busy` for the caller to re-enable
    async fn start_run(&mut self) -> Option<Result<RunOutcome, WorkflowError>> {
        if !self.state.borrow().trigger_enabled() {
            tracing::debug!("Trigger ignored while {:?}", self.state.borrow().lifecycle);
            return None;
        }
        let form = Arc::clone(self.form.as_ref()?);

        self.update(|s| {
            s.lifecycle = Lifecycle::Busy;
            s.status = StatusMessage::loading("Reading Epic...");
        });

        let run_id = Uuid::new_v4();
        let result = self
            .run_workflow(form.as_ref())
            .instrument(tracing::info_span!("workflow", %run_id))
            .await;

        match &result {
            Ok(RunOutcome::Created { .. }) => self.schedule_refresh(form),
            Ok(RunOutcome::NoPages) => {}
            Err(err) => {
                tracing::error!(%run_id, status = ?err.status_code(), "Story generation failed: {err}");
                self.set_status(StatusMessage::error(err.to_string()));
            }
        }
        Some(result)
    }

    async fn run_workflow(&self, form: &dyn WorkItemForm) -> Result<RunOutcome, WorkflowError> {
        let epic = read_epic(form).await?;
        tracing::info!("Generating stories for Epic {} \"{}\"", epic.id, epic.title);
        self.update(|s| {
            s.epic = Some(epic.clone());
            s.status = StatusMessage::loading(format!(
                "Finding wiki pages related to \"{}\"...",
                epic.title
            ));
        });

        let pages = self
            .backend
            .find_wiki_pages(&epic.title)
            .await
            .map_err(WorkflowError::lookup)?;
        if pages.is_empty() {
            tracing::info!("No related wiki pages");
            self.set_status(StatusMessage::info(NO_PAGES_MESSAGE));
            return Ok(RunOutcome::NoPages);
        }

        let paths: Vec<String> = pages.iter().map(|p| p.path.clone()).collect();
        tracing::info!("Found {} wiki pages: {:?}", paths.len(), paths);
        self.set_status(StatusMessage::loading(format!(
            "Found {} wiki pages. Generating user stories...",
            paths.len()
        )));

        let stories = self
            .backend
            .generate_stories(&paths, epic.id)
            .await
            .map_err(WorkflowError::generation)?;

        let created = count_created(&stories);
        let total = stories.len();
        tracing::info!("Backend created {created} of {total} stories");

        self.update(|s| {
            s.status = StatusMessage::success(format!("Created {created} user stories!"));
            s.last_run = Some(RunSummary {
                pages,
                stories,
                created,
                finished_at: Utc::now(),
            });
        });

        Ok(RunOutcome::Created {
            pages: paths.len(),
            created,
            total,
        })
    }

    /// Refresh the host once the backend has had time to persist the stories
    fn schedule_refresh(&mut self, form: Arc<dyn WorkItemForm>) {
        let delay = self.refresh_delay;
        tracing::debug!("Refreshing work item in {delay:?}");
        self.pending_refresh = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Err(err) = form.refresh().await {
                tracing::warn!("Work item refresh failed: {err}");
            }
        }));
    }

    /// Handle of the most recently scheduled refresh
    #[cfg(test)]
    pub fn take_pending_refresh(&mut self) -> Option<JoinHandle<()>> {
        self.pending_refresh.take()
    }

    /// Report whether the backend answers its health check
    pub async fn check_backend(&mut self) {
        if !self.state.borrow().trigger_enabled() {
            return;
        }
        self.set_status(StatusMessage::loading("Checking story backend..."));

        let status = match self.backend.health().await {
            Ok(health) => StatusMessage::info(format!(
                "{} is {}",
                health.service.as_deref().unwrap_or("Story backend"),
                health.status
            )),
            Err(err) => {
                tracing::warn!("Backend health check failed: {err}");
                StatusMessage::error(format!("Story backend unreachable: {err}"))
            }
        };
        self.set_status(status);
    }

    /// Ask the host to re-read the Epic immediately
    pub async fn refresh_now(&mut self) {
        if !self.state.borrow().trigger_enabled() {
            return;
        }
        let Some(form) = self.form.clone() else {
            return;
        };
        self.set_status(StatusMessage::loading("Refreshing Epic..."));

        let refreshed = match form.refresh().await {
            Ok(()) => describe_epic(form.as_ref()).await,
            Err(err) => Err(err),
        };
        match refreshed {
            Ok(epic) => self.update(|s| {
                s.epic = Some(epic);
                s.status = StatusMessage::info("Epic refreshed.");
            }),
            Err(err) => {
                tracing::warn!("Manual refresh failed: {err}");
                self.set_status(StatusMessage::error(format!("Refresh failed: {err}")));
            }
        }
    }

    async fn handle(&mut self, command: PanelCommand) {
        match command {
            PanelCommand::Trigger => {
                self.on_trigger().await;
            }
            PanelCommand::CheckBackend => self.check_backend().await,
            PanelCommand::Refresh => self.refresh_now().await,
        }
    }

    /// Initialize, then serve commands until every sender is dropped
    pub async fn run(mut self, mut commands: mpsc::Receiver<PanelCommand>) {
        if self.initialize().await.is_err() {
            tracing::warn!("Panel failed to load; commands will be ignored");
        }

        while let Some(command) = commands.recv().await {
            if command != PanelCommand::Trigger {
                self.handle(command).await;
                continue;
            }
            if self.start_run().await.is_none() {
                continue;
            }
            // Drain before re-enabling; later presses stay queued
            let deferred = discard_queued_triggers(&mut commands);
            self.update(|s| s.lifecycle = Lifecycle::Ready);
            for command in deferred {
                self.handle(command).await;
            }
        }
        tracing::debug!("Panel command channel closed");
    }
}

/// Presses that arrived during a run hit a disabled button; other commands
/// are returned in arrival order
fn discard_queued_triggers(commands: &mut mpsc::Receiver<PanelCommand>) -> Vec<PanelCommand> {
    let mut deferred = Vec::new();
    while let Ok(command) = commands.try_recv() {
        match command {
            PanelCommand::Trigger => tracing::debug!("Discarding trigger received while busy"),
            other => deferred.push(other),
        }
    }
    deferred
}

/// Read the Epic's id and title, allowing an empty title
async fn describe_epic(form: &dyn WorkItemForm) -> Result<EpicRef, crate::host::HostError> {
    let id = form.get_id().await?;
    let title = form
        .get_field_value(FIELD_TITLE)
        .await?
        .as_ref()
        .and_then(Value::as_str)
        .map(|t| t.trim().to_string())
        .unwrap_or_default();
    Ok(EpicRef { id, title })
}

/// Read the Epic for a run; the title must be non-empty
async fn read_epic(form: &dyn WorkItemForm) -> Result<EpicRef, WorkflowError> {
    let epic = describe_epic(form).await?;
    if epic.title.is_empty() {
        return Err(WorkflowError::MissingTitle);
    }
    Ok(epic)
}

//! Conversation session
//!
//! Orchestrates one request/response turn: interpreter -> planner ->
//! aggregator -> view builder, then appends the turn to conversation
//! history. The session is single-flight: a submission is accepted only when
//! the state is `Idle`, and anything arriving mid-pipeline is rejected with
//! `SessionBusy` rather than queued, so two in-flight questions can never
//! interleave partial results.
//!
//! The aggregation call into the store is the only operation that may block;
//! it is raced against a cancellation signal, and a cancelled submission
//! discards its result without appending any turn. History is append-only
//! and mutated only here; readers polling it never observe a torn write.
//! Independent sessions share no state.

use crate::aggregate;
use crate::interpreter::Interpreter;
use crate::planner;
use crate::view::{self, ViewModel};
use chrono::{DateTime, Utc};
use sdk::errors::{ExplorerError, ExplorerErrorExt};
use sdk::store::ProfileStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, Notify, RwLock};
use tracing::{info, warn};

/// Where the session currently is in its turn.
///
/// Expressed as a tagged variant rather than flags so that an illegal
/// transition has no representation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Interpreting,
    Planning,
    Aggregating,
    Rendered,
    Failed(String),
}

/// Author of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One committed turn of the conversation. Never edited or reordered once
/// appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub text: String,
    /// Present on assistant turns that carry a rendered answer.
    pub view: Option<ViewModel>,
}

/// How a submission resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Pipeline completed; the view model was appended to history.
    Answered(ViewModel),
    /// The in-flight store call was cancelled; nothing was appended.
    Cancelled,
}

/// A single conversation with its pipeline and history.
pub struct Session {
    interpreter: Interpreter,
    store: Arc<dyn ProfileStore>,
    state: Mutex<SessionState>,
    history: RwLock<Vec<ConversationTurn>>,
    cancel: Notify,
    store_timeout: Duration,
}

impl Session {
    pub fn new(
        interpreter: Interpreter,
        store: Arc<dyn ProfileStore>,
        store_timeout: Duration,
    ) -> Self {
        Self {
            interpreter,
            store,
            state: Mutex::new(SessionState::Idle),
            history: RwLock::new(Vec::new()),
            cancel: Notify::new(),
            store_timeout,
        }
    }

    /// Submit one question and drive it through the pipeline.
    ///
    /// Rejected with `SessionBusy` unless the session is idle. On success
    /// the user turn and an assistant turn carrying the view model are
    /// appended together; on failure the assistant turn carries a
    /// plain-language explanation instead; on cancellation nothing is
    /// appended. The session is idle again by the time this returns,
    /// whatever the outcome.
    pub async fn submit(
        &self,
        text: &str,
        now: DateTime<Utc>,
    ) -> Result<SubmitOutcome, ExplorerError> {
        self.begin().await?;
        info!(question = text, "submission accepted");

        let filter = match self.interpreter.interpret(text, now) {
            Ok(filter) => filter,
            Err(e) => return Err(self.fail(text, e).await),
        };

        self.set_state(SessionState::Planning).await;
        let planned = planner::plan(&filter);

        // Register the cancel waiter before the state becomes observable as
        // Aggregating, so a cancel issued right after seeing that state
        // cannot slip between the two
        let cancelled = self.cancel.notified();
        tokio::pin!(cancelled);
        cancelled.as_mut().enable();

        self.set_state(SessionState::Aggregating).await;
        let aggregated = tokio::select! {
            _ = &mut cancelled => None,
            outcome = tokio::time::timeout(
                self.store_timeout,
                aggregate::aggregate(&planned, self.store.as_ref()),
            ) => Some(outcome.unwrap_or(Err(ExplorerError::StoreTimeout))),
        };

        let result = match aggregated {
            None => {
                info!("submission cancelled; in-flight result discarded");
                self.set_state(SessionState::Idle).await;
                return Ok(SubmitOutcome::Cancelled);
            }
            Some(Ok(result)) => result,
            Some(Err(e)) => return Err(self.fail(text, e).await),
        };

        let view = view::build_view(&result);
        self.set_state(SessionState::Rendered).await;

        {
            let mut history = self.history.write().await;
            history.push(ConversationTurn {
                role: Role::User,
                text: text.to_string(),
                view: None,
            });
            history.push(ConversationTurn {
                role: Role::Assistant,
                text: view.summary.clone(),
                view: Some(view.clone()),
            });
        }

        info!(
            profiles = view.kpis.profile_count,
            floats = view.kpis.float_count,
            "submission rendered"
        );
        self.set_state(SessionState::Idle).await;

        Ok(SubmitOutcome::Answered(view))
    }

    /// Cancel any in-flight store call. A no-op when nothing is in flight.
    pub fn cancel(&self) {
        self.cancel.notify_waiters();
    }

    /// Snapshot of the current state.
    pub async fn state(&self) -> SessionState {
        self.state.lock().await.clone()
    }

    /// Snapshot of the conversation history.
    pub async fn history(&self) -> Vec<ConversationTurn> {
        self.history.read().await.clone()
    }

    /// `Idle -> Interpreting`, or `SessionBusy` for any other state.
    async fn begin(&self) -> Result<(), ExplorerError> {
        let mut state = self.state.lock().await;
        if *state != SessionState::Idle {
            warn!(state = ?*state, "submission rejected while busy");
            return Err(ExplorerError::SessionBusy);
        }
        *state = SessionState::Interpreting;
        Ok(())
    }

    async fn set_state(&self, next: SessionState) {
        *self.state.lock().await = next;
    }

    /// Record a pipeline failure: one user turn plus exactly one assistant
    /// turn carrying the explanation, then back to idle.
    async fn fail(&self, text: &str, err: ExplorerError) -> ExplorerError {
        warn!(error = %err, "submission failed");
        self.set_state(SessionState::Failed(err.to_string())).await;

        {
            let mut history = self.history.write().await;
            history.push(ConversationTurn {
                role: Role::User,
                text: text.to_string(),
                view: None,
            });
            history.push(ConversationTurn {
                role: Role::Assistant,
                text: format!("{}. {}", err, err.user_hint()),
                view: None,
            });
        }

        self.set_state(SessionState::Idle).await;
        err
    }
}

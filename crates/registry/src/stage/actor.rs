use std::sync::Arc;
use std::time::Duration;

use hudkit_primitives::Family;
use hudkit_schema::ComponentInstance;
use serde_json::Value;
use tokio::sync::{Mutex, mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::{Stage, StageCommand, StageOutcome, StageSnapshot};
use crate::manager::Admission;

/// Command queue capacity between handles and the stage task.
const COMMAND_CAPACITY: usize = 256;

/// Sleep horizon used when no expiry is pending.
const IDLE_HORIZON: Duration = Duration::from_secs(3600);

#[derive(Debug, thiserror::Error)]
pub enum StageError {
	#[error("stage task has stopped")]
	Closed,
	#[error("stage returned an unexpected outcome for {command}")]
	UnexpectedOutcome { command: &'static str },
}

enum Request {
	Command {
		command: StageCommand,
		reply: oneshot::Sender<StageOutcome>,
	},
	Snapshot {
		reply: oneshot::Sender<Arc<StageSnapshot>>,
	},
}

/// Async front-end to a [`Stage`] running on its own task.
///
/// Cloning the handle shares the same stage. Dropping every handle, or
/// calling [`StageHandle::shutdown`], stops the task.
#[derive(Debug, Clone)]
pub struct StageHandle {
	tx: mpsc::Sender<Request>,
	snapshots: watch::Receiver<Arc<StageSnapshot>>,
	cancel: CancellationToken,
	task: Arc<Mutex<Option<JoinHandle<()>>>>,
}

/// Moves `stage` onto a new tokio task and returns a handle to it.
///
/// All mutation is serialized through the task. The task sleeps until the
/// earliest expiry deadline, fires due timers, and publishes a fresh
/// snapshot after every change.
pub fn spawn_stage(stage: Stage) -> StageHandle {
	let (tx, rx) = mpsc::channel(COMMAND_CAPACITY);
	let (publish, snapshots) = watch::channel(Arc::new(stage.snapshot()));
	let cancel = CancellationToken::new();
	let task = tokio::spawn(run(stage, rx, publish, cancel.clone()));
	tracing::debug!("stage.spawn");
	StageHandle {
		tx,
		snapshots,
		cancel,
		task: Arc::new(Mutex::new(Some(task))),
	}
}

async fn run(
	mut stage: Stage,
	mut rx: mpsc::Receiver<Request>,
	publish: watch::Sender<Arc<StageSnapshot>>,
	cancel: CancellationToken,
) {
	let mut published = stage.revision();
	loop {
		let deadline = stage.next_deadline().map(Instant::from_std);
		let wake = deadline.unwrap_or_else(|| Instant::now() + IDLE_HORIZON);
		tokio::select! {
			biased;
			_ = cancel.cancelled() => break,
			request = rx.recv() => {
				let Some(request) = request else {
					break;
				};
				match request {
					Request::Command { command, reply } => {
						tracing::trace!(?command, "stage.command");
						let outcome = stage.apply(command, Instant::now().into_std());
						let _ = reply.send(outcome);
					}
					Request::Snapshot { reply } => {
						let _ = reply.send(Arc::clone(&publish.borrow()));
					}
				}
			}
			_ = tokio::time::sleep_until(wake), if deadline.is_some() => {
				let expired = stage.advance(Instant::now().into_std());
				if !expired.is_empty() {
					tracing::debug!(count = expired.len(), "stage.expire");
				}
			}
		}

		let revision = stage.revision();
		if revision != published {
			published = revision;
			publish.send_replace(Arc::new(stage.snapshot()));
		}
	}
	tracing::debug!("stage.stop");
}

impl StageHandle {
	async fn command(&self, command: StageCommand) -> Result<StageOutcome, StageError> {
		let (reply, outcome) = oneshot::channel();
		self.tx
			.send(Request::Command { command, reply })
			.await
			.map_err(|_| StageError::Closed)?;
		outcome.await.map_err(|_| StageError::Closed)
	}

	async fn applied(&self, name: &'static str, command: StageCommand) -> Result<bool, StageError> {
		match self.command(command).await? {
			StageOutcome::Applied(changed) => Ok(changed),
			StageOutcome::Admission(_) => Err(StageError::UnexpectedOutcome { command: name }),
		}
	}

	pub async fn add(&self, instance: ComponentInstance) -> Result<Admission, StageError> {
		match self.command(StageCommand::Add(instance)).await? {
			StageOutcome::Admission(admission) => Ok(admission),
			StageOutcome::Applied(_) => Err(StageError::UnexpectedOutcome { command: "add" }),
		}
	}

	pub async fn remove(&self, family: Family, id: impl Into<String>) -> Result<bool, StageError> {
		self.applied("remove", StageCommand::Remove { family, id: id.into() }).await
	}

	pub async fn update(&self, family: Family, id: impl Into<String>, patch: Value) -> Result<bool, StageError> {
		self.applied(
			"update",
			StageCommand::Update {
				family,
				id: id.into(),
				patch,
			},
		)
		.await
	}

	pub async fn dismiss(&self, family: Family, id: impl Into<String>) -> Result<bool, StageError> {
		self.applied("dismiss", StageCommand::Dismiss { family, id: id.into() }).await
	}

	pub async fn clear(&self, family: Option<Family>) -> Result<bool, StageError> {
		self.applied("clear", StageCommand::Clear(family)).await
	}

	/// Latest published snapshot, after every command sent before this call.
	pub async fn snapshot(&self) -> Result<Arc<StageSnapshot>, StageError> {
		let (reply, snapshot) = oneshot::channel();
		self.tx
			.send(Request::Snapshot { reply })
			.await
			.map_err(|_| StageError::Closed)?;
		snapshot.await.map_err(|_| StageError::Closed)
	}

	/// Receiver that observes every published snapshot.
	pub fn subscribe(&self) -> watch::Receiver<Arc<StageSnapshot>> {
		self.snapshots.clone()
	}

	/// Stops the stage task and waits for it to exit.
	pub async fn shutdown(&self) {
		self.cancel.cancel();
		let task = self.task.lock().await.take();
		if let Some(task) = task
			&& let Err(error) = task.await
		{
			tracing::warn!(%error, "stage.join_failed");
		}
	}
}

//! Operator interrupts
//!
//! The first interrupt cancels the record in progress and the batch moves on
//! to the next one. An interrupt between records cancels the record that
//! starts next. A second interrupt while the cancelled record is still
//! winding down, or before the next record has started, aborts the whole
//! batch.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, warn};

/// What an interrupt did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterruptEffect {
    /// The current record was cancelled
    RecordCancelled,
    /// No record was running; the next one starts cancelled
    NextRecordCancelled,
    /// The batch was aborted
    BatchAborted,
    /// The batch had already been aborted
    Ignored,
}

/// Scope of the record currently running, or of the one that ran last
#[derive(Debug)]
struct RecordScope {
    token: CancellationToken,
    running: bool,
    /// Interrupt received while no record was running
    pending: bool,
}

/// Cancellation scopes for a batch and the record currently running
#[derive(Debug, Clone)]
pub struct Interrupts {
    batch: CancellationToken,
    current: Arc<Mutex<RecordScope>>,
}

impl Interrupts {
    pub fn new() -> Self {
        let batch = CancellationToken::new();
        let token = batch.child_token();
        Self {
            batch,
            current: Arc::new(Mutex::new(RecordScope {
                token,
                running: false,
                pending: false,
            })),
        }
    }

    /// Open the cancellation scope of the next record
    ///
    /// The returned token is also cancelled when the batch is aborted. It is
    /// already cancelled when an interrupt arrived since the last record ended.
    pub fn begin_record(&self) -> CancellationToken {
        let mut scope = self.current.lock();
        let token = self.batch.child_token();
        if scope.pending {
            token.cancel();
        }
        *scope = RecordScope {
            token: token.clone(),
            running: true,
            pending: false,
        };
        token
    }

    /// Close the scope opened by [`Interrupts::begin_record`]
    pub fn end_record(&self) {
        self.current.lock().running = false;
    }

    /// Deliver one interrupt
    pub fn interrupt(&self) -> InterruptEffect {
        let mut scope = self.current.lock();
        if self.batch.is_cancelled() {
            InterruptEffect::Ignored
        } else if scope.token.is_cancelled() || scope.pending {
            self.batch.cancel();
            InterruptEffect::BatchAborted
        } else if scope.running {
            scope.token.cancel();
            InterruptEffect::RecordCancelled
        } else {
            scope.pending = true;
            InterruptEffect::NextRecordCancelled
        }
    }

    /// True once the batch has been aborted
    pub fn is_aborted(&self) -> bool {
        self.batch.is_cancelled()
    }

    /// Token cancelled when the batch is aborted
    pub fn batch_token(&self) -> CancellationToken {
        self.batch.clone()
    }

    /// Route Ctrl+C to [`Interrupts::interrupt`] until the batch is aborted
    pub fn listen_for_ctrl_c(&self) -> JoinHandle<()> {
        let interrupts = self.clone();
        tokio::spawn(async move {
            loop {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    error!("Cannot listen for interrupts: {}", e);
                    return;
                }
                match interrupts.interrupt() {
                    InterruptEffect::RecordCancelled => {
                        warn!("Interrupted: cancelling the current repository, press Ctrl+C again to abort")
                    }
                    InterruptEffect::NextRecordCancelled => {
                        warn!("Interrupted: skipping the next repository, press Ctrl+C again to abort")
                    }
                    InterruptEffect::BatchAborted | InterruptEffect::Ignored => {
                        warn!("Interrupted again: aborting the batch");
                        return;
                    }
                }
            }
        })
    }
}

impl Default for Interrupts {
    fn default() -> Self {
        Self::new()
    }
}

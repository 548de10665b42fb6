//! Command runner seam

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::{config::ProcessConfig, error::Result, output::ProcessOutput, ProcessSupervisor};

/// Something that can run an external command to completion
///
/// [`ProcessSupervisor`] is the production implementation. Components that
/// shell out take a `&dyn CommandRunner` so tests can script the external
/// tools instead of requiring them.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `config` and return its exit code and captured output
    async fn run(&self, config: ProcessConfig, cancel: &CancellationToken)
        -> Result<ProcessOutput>;
}

#[async_trait]
impl CommandRunner for ProcessSupervisor {
    async fn run(
        &self,
        config: ProcessConfig,
        cancel: &CancellationToken,
    ) -> Result<ProcessOutput> {
        self.supervise(config, cancel).await
    }
}

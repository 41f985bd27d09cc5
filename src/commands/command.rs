//! Command trait definition for CLI commands.

use anyhow::Result;

/// Trait implemented by bam2fastq CLI commands.
pub trait Command {
    /// Runs the command to completion.
    #[allow(clippy::missing_errors_doc)]
    fn execute(&self) -> Result<()>;
}

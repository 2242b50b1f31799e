//! Cancellable background analysis.

use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;

use crate::analyzer::AnalysisReport;
use crate::error::{FieldscopeError, Result};
use crate::value::FieldValue;

/// Identifies what an analysis was started for.
///
/// A result is only applied while its ticket is the context's latest and the
/// context still holds the same path, key and value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisTicket {
    pub id: u64,
    pub path: Vec<String>,
    pub key: String,
    pub value: FieldValue,
}

/// A finished analysis, ready to be applied to its context.
#[derive(Debug)]
pub struct AnalysisOutcome {
    pub ticket: AnalysisTicket,
    pub result: Result<AnalysisReport>,
}

/// An analysis running on a Tokio task.
#[derive(Debug)]
pub struct AnalysisTask {
    ticket: AnalysisTicket,
    handle: JoinHandle<Result<AnalysisReport>>,
}

impl AnalysisTask {
    pub(crate) fn new(ticket: AnalysisTicket, handle: JoinHandle<Result<AnalysisReport>>) -> Self {
        Self { ticket, handle }
    }

    pub fn ticket(&self) -> &AnalysisTicket {
        &self.ticket
    }

    /// Abort the analysis. Joining afterwards yields `AnalysisCancelled`.
    pub fn cancel(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the analysis to finish.
    pub async fn join(self) -> AnalysisOutcome {
        let result = match self.handle.await {
            Ok(result) => result,
            Err(e) if e.is_cancelled() => Err(FieldscopeError::AnalysisCancelled),
            Err(e) => Err(FieldscopeError::Analyzer(format!("analysis task failed: {}", e))),
        };

        AnalysisOutcome {
            ticket: self.ticket,
            result,
        }
    }
}

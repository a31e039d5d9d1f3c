//! Extraction tasks: which instruction/schema pair governs an invocation.
//!
//! A task variant fixes everything the pipeline varies on: the instruction
//! text sent to the backend, the output budget, and which interpretation the
//! reply receives downstream. Keeping that policy on the enum (rather than
//! scattered through call sites) means adding a third document type is a
//! one-variant change.

use crate::prompts::{INVOICE_INSTRUCTION, WEIGHT_INSTRUCTION};

/// The two extraction tasks the service performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtractionTask {
    /// Full invoice-field extraction into the large invoice schema.
    Invoice,
    /// Single numeric weight (kilograms) from a weigh-slip.
    Weight,
}

impl ExtractionTask {
    /// The instruction text sent to the backend for this task.
    ///
    /// Total function — the same task always yields the identical text.
    pub fn instruction(self) -> &'static str {
        match self {
            ExtractionTask::Invoice => INVOICE_INSTRUCTION,
            ExtractionTask::Weight => WEIGHT_INSTRUCTION,
        }
    }

    /// Maximum output tokens requested from the backend.
    ///
    /// The invoice schema is large (25+ keys plus a line-item array) and
    /// needs headroom; the weight reply is a single key-value object.
    /// Setting these too low silently truncates the JSON mid-object.
    pub fn max_tokens(self) -> u32 {
        match self {
            ExtractionTask::Invoice => 1200,
            ExtractionTask::Weight => 200,
        }
    }

    /// Short label used in log lines.
    pub fn label(self) -> &'static str {
        match self {
            ExtractionTask::Invoice => "invoice",
            ExtractionTask::Weight => "weight",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instruction_selection_is_idempotent() {
        assert_eq!(
            ExtractionTask::Invoice.instruction(),
            ExtractionTask::Invoice.instruction()
        );
        assert_eq!(
            ExtractionTask::Weight.instruction(),
            ExtractionTask::Weight.instruction()
        );
        assert_ne!(
            ExtractionTask::Invoice.instruction(),
            ExtractionTask::Weight.instruction()
        );
    }

    #[test]
    fn token_budgets_match_schema_sizes() {
        assert_eq!(ExtractionTask::Invoice.max_tokens(), 1200);
        assert_eq!(ExtractionTask::Weight.max_tokens(), 200);
    }
}

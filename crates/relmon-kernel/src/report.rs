//! Shared report surface.
//!
//! Every analysis returns a report carrying `holds`, `issues`, `details`
//! and a `truncated` flag. The flag is what lets a caller tell a proof
//! (exhaustive within the stated bounds) from a probe (a sample came back
//! truncated, so "no counterexample found" is all that can be said).

use crate::digest::report_digest;
use crate::error::{Axiom, AxiomTally, RelmonError};
use serde::{Deserialize, Serialize};

/// What a report licenses a caller to conclude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// No violation, and nothing was truncated.
    Holds,
    /// No violation on the sampled data, but some sample was truncated.
    HoldsOnSample,
    /// At least one issue was recorded.
    Violated,
}

pub trait Report: Serialize {
    fn holds(&self) -> bool;

    fn issues(&self) -> &[String];

    fn truncated(&self) -> bool;

    fn verdict(&self) -> Verdict {
        match (self.holds(), self.truncated()) {
            (false, _) => Verdict::Violated,
            (true, true) => Verdict::HoldsOnSample,
            (true, false) => Verdict::Holds,
        }
    }

    /// Stable content digest; identical inputs and limits give identical digests.
    fn digest(&self) -> String {
        report_digest(self)
    }
}

/// Accumulator threaded through one analysis sweep.
#[derive(Debug, Default)]
pub(crate) struct Findings {
    pub issues: Vec<String>,
    pub details: Vec<String>,
    pub checks: AxiomTally,
    pub violations: AxiomTally,
    pub truncated: bool,
}

impl Findings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn checked(&mut self, axiom: Axiom) {
        self.checks.record(axiom);
    }

    pub fn issue(&mut self, axiom: Axiom, message: String) {
        tracing::debug!(%axiom, %message, "law issue");
        self.violations.record(axiom);
        self.issues.push(message);
    }

    pub fn detail(&mut self, message: String) {
        self.details.push(message);
    }

    /// A configuration error isolated to one comparison.
    ///
    /// A blown enumeration guard means part of the sweep was skipped, so the
    /// report can no longer claim exhaustiveness.
    pub fn configuration(&mut self, context: &str, error: &RelmonError) {
        if matches!(error, RelmonError::EnumerationTooLarge { .. }) {
            self.truncated = true;
        }
        tracing::warn!(context, %error, "comparison aborted by configuration error");
        self.issue(Axiom::Configuration, format!("{context}: {error}"));
    }

    pub fn holds(&self) -> bool {
        self.issues.is_empty()
    }

    /// Close the sweep: append the per-axiom summaries to `details`.
    pub fn summarize(&mut self) {
        for line in self.checks.lines() {
            self.details.push(format!("checked {line}"));
        }
        for line in self.violations.lines() {
            self.details.push(format!("violated {line}"));
        }
    }
}

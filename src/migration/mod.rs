// Migration module for notify-migrate
// Rules are pure text transformations; a Migration runs them in a fixed order

pub mod notifications;
pub mod rules;

use serde::Serialize;
use std::fmt;
use tracing::{debug, info};

pub use notifications::{notification_migration, StepOrder};
pub use rules::{Rule, RuleOutcome, RuleStatus};

/// An ordered sequence of rules
#[derive(Debug, Clone, Default)]
pub struct Migration {
    rules: Vec<Rule>,
}

/// Per-rule outcomes of a migration run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MigrationReport {
    pub outcomes: Vec<RuleOutcome>,
    pub changed: bool,
}

impl MigrationReport {
    /// Names of required rules that did not apply
    pub fn missed_required(&self) -> Vec<String> {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.missed())
            .map(|outcome| outcome.name.clone())
            .collect()
    }

    pub fn applied_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.status == RuleStatus::Applied)
            .count()
    }

    pub fn outcome(&self, name: &str) -> Option<&RuleOutcome> {
        self.outcomes.iter().find(|outcome| outcome.name == name)
    }
}

impl fmt::Display for MigrationReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for outcome in &self.outcomes {
            let marker = if outcome.missed() { " (required)" } else { "" };
            writeln!(
                f,
                "{:<32} {:<10} {}{}",
                outcome.name, outcome.status, outcome.edits, marker
            )?;
        }
        Ok(())
    }
}

impl Migration {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// Run every rule in order, threading the text through each one
    pub fn run(&self, source: &str) -> (String, MigrationReport) {
        let mut text = source.to_string();
        let mut outcomes = Vec::with_capacity(self.rules.len());

        for rule in &self.rules {
            let (next, outcome) = rule.apply(&text);
            text = next;
            outcomes.push(outcome);
        }

        let changed = text != source;
        let report = MigrationReport { outcomes, changed };

        info!(
            "Migration finished: {} of {} rules applied",
            report.applied_count(),
            self.rules.len()
        );
        if !changed {
            debug!("Migration left the text unchanged");
        }

        (text, report)
    }
}

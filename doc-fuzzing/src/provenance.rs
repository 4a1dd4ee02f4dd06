// doc-fuzzing/src/provenance.rs
//! Provenance log: a tree recording what one fuzzing call changed.
//!
//! Entries are built bottom-up. A mutator that recurses wraps whatever its
//! callee returned as the children of its own [`LogEntry::Parent`], so the
//! shape of the tree follows the shape of the call tree.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LogEntry {
    /// A leaf change applied in place.
    Operation { text: String },
    /// A recursive step and what happened beneath it.
    Parent { text: String, children: Vec<LogEntry> },
    /// A new element attached to the graph.
    Add { text: String, detail: String },
    /// Nothing changed, and why.
    NoOp { reason: String },
}

impl LogEntry {
    pub fn operation(text: impl Into<String>) -> Self {
        LogEntry::Operation { text: text.into() }
    }

    pub fn parent(text: impl Into<String>, children: Vec<LogEntry>) -> Self {
        LogEntry::Parent {
            text: text.into(),
            children,
        }
    }

    pub fn add(text: impl Into<String>, detail: impl Into<String>) -> Self {
        LogEntry::Add {
            text: text.into(),
            detail: detail.into(),
        }
    }

    pub fn no_op(reason: impl Into<String>) -> Self {
        LogEntry::NoOp {
            reason: reason.into(),
        }
    }

    pub fn is_no_op(&self) -> bool {
        matches!(self, LogEntry::NoOp { .. })
    }

    pub fn children(&self) -> &[LogEntry] {
        match self {
            LogEntry::Parent { children, .. } => children,
            _ => &[],
        }
    }

    /// Whether anything beneath this entry changed the graph.
    pub fn changed(&self) -> bool {
        match self {
            LogEntry::Operation { .. } | LogEntry::Add { .. } => true,
            LogEntry::Parent { children, .. } => children.iter().any(LogEntry::changed),
            LogEntry::NoOp { .. } => false,
        }
    }

    /// Number of levels, counting this entry.
    pub fn depth(&self) -> usize {
        1 + self
            .children()
            .iter()
            .map(LogEntry::depth)
            .max()
            .unwrap_or(0)
    }

    /// Visit this entry and all descendants in pre-order.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a LogEntry)) {
        visit(self);
        for child in self.children() {
            child.walk(visit);
        }
    }

    /// Counts of leaves by kind.
    pub fn summary(&self) -> LogSummary {
        let mut summary = LogSummary::default();
        self.walk(&mut |entry| match entry {
            LogEntry::Operation { .. } => summary.operations += 1,
            LogEntry::Add { .. } => summary.additions += 1,
            LogEntry::NoOp { .. } => summary.no_ops += 1,
            LogEntry::Parent { .. } => summary.parents += 1,
        });
        summary
    }

    fn fmt_indented(&self, f: &mut fmt::Formatter<'_>, level: usize) -> fmt::Result {
        let indent = "  ".repeat(level);
        match self {
            LogEntry::Operation { text } => writeln!(f, "{}* {}", indent, text),
            LogEntry::Add { text, detail } => writeln!(f, "{}+ {}: {}", indent, text, detail),
            LogEntry::NoOp { reason } => writeln!(f, "{}- no-op: {}", indent, reason),
            LogEntry::Parent { text, children } => {
                writeln!(f, "{}{}", indent, text)?;
                for child in children {
                    child.fmt_indented(f, level + 1)?;
                }
                Ok(())
            }
        }
    }
}

/// Renders the tree with two spaces of indentation per level.
impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_indented(f, 0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogSummary {
    pub operations: usize,
    pub additions: usize,
    pub no_ops: usize,
    pub parents: usize,
}

impl std::ops::AddAssign for LogSummary {
    fn add_assign(&mut self, other: Self) {
        self.operations += other.operations;
        self.additions += other.additions;
        self.no_ops += other.no_ops;
        self.parents += other.parents;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> LogEntry {
        LogEntry::parent(
            "Patient",
            vec![
                LogEntry::parent(
                    "Patient.name[0]",
                    vec![LogEntry::operation("HumanName.family: case inversion")],
                ),
                LogEntry::add("Patient.contained", "embedded new Organization"),
                LogEntry::no_op("no mutators registered for Reference"),
            ],
        )
    }

    #[test]
    fn test_depth_and_summary() {
        let entry = sample();
        assert_eq!(entry.depth(), 3);
        assert_eq!(
            entry.summary(),
            LogSummary {
                operations: 1,
                additions: 1,
                no_ops: 1,
                parents: 2,
            }
        );
        assert!(entry.changed());
        assert!(!LogEntry::parent("x", vec![LogEntry::no_op("y")]).changed());
    }

    #[test]
    fn test_display_indents_children() {
        let rendered = sample().to_string();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "Patient");
        assert_eq!(lines[1], "  Patient.name[0]");
        assert_eq!(lines[2], "    * HumanName.family: case inversion");
        assert_eq!(lines[3], "  + Patient.contained: embedded new Organization");
        assert_eq!(lines[4], "  - no-op: no mutators registered for Reference");
    }

    #[test]
    fn test_json_shape() {
        let json = serde_json::to_value(LogEntry::operation("x")).unwrap();
        assert_eq!(json, serde_json::json!({ "kind": "operation", "text": "x" }));

        let parsed: LogEntry = serde_json::from_value(serde_json::to_value(sample()).unwrap()).unwrap();
        assert_eq!(parsed, sample());
    }
}

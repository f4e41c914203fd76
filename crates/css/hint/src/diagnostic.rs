//! Diagnostic records and the shared collector rules append them to.

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// One positioned rule violation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticRecord {
    pub rule_name: String,
    /// 1-based line of the offending value component.
    pub line: u32,
    /// 1-based column of the offending value component.
    pub col: u32,
    /// Plain-text message.
    pub message: String,
    /// Same message with ANSI styling for terminals.
    pub color_message: String,
}

impl fmt::Display for DiagnosticRecord {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "line {}, col {}: {}", self.line, self.col, self.message)
    }
}

/// Ordered, append-only collector shared between the host and its rules.
///
/// Clones are handles to the same list. Rules only ever [`push`](Self::push);
/// reading back is left to the host once the walk is over.
#[derive(Clone, Debug, Default)]
pub struct DiagnosticSink {
    records: Rc<RefCell<Vec<DiagnosticRecord>>>,
}

impl DiagnosticSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, record: DiagnosticRecord) {
        self.records.borrow_mut().push(record);
    }

    pub fn len(&self) -> usize {
        self.records.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.borrow().is_empty()
    }

    /// Copy of the records collected so far.
    pub fn snapshot(&self) -> Vec<DiagnosticRecord> {
        self.records.borrow().clone()
    }

    /// Drain every record, leaving the sink empty.
    pub fn take(&self) -> Vec<DiagnosticRecord> {
        self.records.take()
    }

    /// Whether both handles point at the same list.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.records, &other.records)
    }
}

impl From<Vec<DiagnosticRecord>> for DiagnosticSink {
    fn from(records: Vec<DiagnosticRecord>) -> Self {
        Self {
            records: Rc::new(RefCell::new(records)),
        }
    }
}

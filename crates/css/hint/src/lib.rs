//! Style-sheet lint rules driven by typed property events.
//!
//! A host parses a stylesheet with an [`EventParser`]; each rule subscribes a
//! [`PropertyObserver`] on it through its `register` function and appends
//! [`DiagnosticRecord`]s to an injected [`DiagnosticSink`].

pub mod context;
pub mod diagnostic;
pub mod event;
pub mod report;
pub mod rules;
pub mod util;

pub use context::{RuleContext, Threshold};
pub use css_syntax::{PropertyValue, ValuePart};
pub use diagnostic::{DiagnosticRecord, DiagnosticSink};
pub use event::{EventParser, PropertyEvent, PropertyObserver};

//! `min-font-size`: Chinese text shown on Windows needs a font size of at
//! least the configured value (12px by convention) to stay legible.

use crate::context::{RuleContext, Threshold};
use crate::diagnostic::{DiagnosticRecord, DiagnosticSink};
use crate::event::{EventParser, PropertyEvent, PropertyObserver};
use crate::util::{highlight_substring, muted};
use css_syntax::ValuePart;
use log::{debug, warn};
use serde_json::Value;
use std::rc::Rc;

/// Name this rule is configured under.
pub const RULE_NAME: &str = "min-font-size";

const PROPERTY: &str = "font-size";
const MESSAGE: &str = "font-size should not be less than ";

/// Flags `font-size` components below the threshold.
pub struct MinFontSize {
    context: RuleContext,
    sink: DiagnosticSink,
}

impl MinFontSize {
    pub const fn new(context: RuleContext, sink: DiagnosticSink) -> Self {
        Self { context, sink }
    }

    fn diagnose(&self, part: &ValuePart) -> Option<DiagnosticRecord> {
        let threshold = self.context.threshold();
        if !threshold.is_violated_by(part.value?) {
            return None;
        }
        let Some(line) = self.context.line(part.line) else {
            warn!(
                "{}: line {} is outside the source, dropping diagnostic for `{}`",
                self.context.rule_name(),
                part.line,
                part.text
            );
            return None;
        };
        let stem = format!("{MESSAGE}{threshold}px");
        let start = part.col.saturating_sub(1) as usize;
        Some(DiagnosticRecord {
            rule_name: self.context.rule_name().to_owned(),
            line: part.line,
            col: part.col,
            message: format!("`{line}` {stem}"),
            color_message: format!(
                "`{}` {}",
                highlight_substring(line, start, &part.text),
                muted(&stem)
            ),
        })
    }
}

impl PropertyObserver for MinFontSize {
    fn on_property(&mut self, event: &PropertyEvent<'_>) {
        if event.property != PROPERTY {
            return;
        }
        for part in &event.value.parts {
            if let Some(record) = self.diagnose(part) {
                self.sink.push(record);
            }
        }
    }
}

/// Subscribe the rule on `parser`. Without a threshold nothing is subscribed
/// and `invalid_list` comes back untouched; either way the same sink is
/// returned so callers can chain rules.
pub fn register(
    parser: &mut EventParser,
    file_content: &Rc<str>,
    rule_name: &str,
    threshold: Option<Threshold>,
    invalid_list: DiagnosticSink,
) -> DiagnosticSink {
    let Some(threshold) = threshold else {
        debug!("{rule_name}: no usable threshold configured, skipping");
        return invalid_list;
    };
    debug!("{rule_name}: minimum font size {threshold}px");
    let context = RuleContext::new(Rc::clone(file_content), rule_name, threshold);
    parser.add_listener(MinFontSize::new(context, invalid_list.clone()));
    invalid_list
}

/// [`register`] for a raw configuration value such as `12`, `"12"` or `null`.
pub fn register_from_value(
    parser: &mut EventParser,
    file_content: &Rc<str>,
    rule_name: &str,
    rule_val: &Value,
    invalid_list: DiagnosticSink,
) -> DiagnosticSink {
    register(
        parser,
        file_content,
        rule_name,
        Threshold::from_value(rule_val),
        invalid_list,
    )
}

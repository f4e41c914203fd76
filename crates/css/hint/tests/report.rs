use css_hint::rules::min_font_size::{self, RULE_NAME};
use css_hint::{DiagnosticSink, EventParser, Threshold, report};
use serde_json::Value;
use std::rc::Rc;

#[test]
fn walked_stylesheet_renders_and_serializes() -> anyhow::Result<()> {
    let _ = env_logger::builder().is_test(true).try_init();
    let css = ".note {\n  font-size: 10px;\n}\n.body {\n  font-size: 14px;\n}\n";
    let source: Rc<str> = Rc::from(css);
    let mut parser = EventParser::new();
    let threshold: Threshold = "12".parse()?;
    let sink = min_font_size::register(
        &mut parser,
        &source,
        RULE_NAME,
        Some(threshold),
        DiagnosticSink::new(),
    );
    parser.parse(css);
    let records = sink.take();

    assert_eq!(
        report::render(&records, false),
        "    line 2, col 14: `  font-size: 10px;` font-size should not be less than 12px (min-font-size)\n"
    );

    let json: Value = serde_json::from_str(&report::to_json(&records)?)?;
    let entries = json.as_array().map(Vec::len);
    assert_eq!(entries, Some(1));
    assert_eq!(json[0]["ruleName"], RULE_NAME);
    assert_eq!(json[0]["line"], 2);
    assert_eq!(json[0]["col"], 14);
    Ok(())
}

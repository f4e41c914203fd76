use css_hint::rules::min_font_size::{self, RULE_NAME};
use css_hint::{DiagnosticRecord, DiagnosticSink, EventParser, PropertyEvent, Threshold};
use serde_json::{Value, json};
use std::rc::Rc;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Register the rule with `rule_val`, walk `css`, and return the collected records.
fn check(css: &str, rule_val: &Value) -> Vec<DiagnosticRecord> {
    init_logger();
    let mut parser = EventParser::new();
    let source: Rc<str> = Rc::from(css);
    let sink = min_font_size::register_from_value(
        &mut parser,
        &source,
        RULE_NAME,
        rule_val,
        DiagnosticSink::new(),
    );
    parser.parse(css);
    sink.take()
}

fn positions(records: &[DiagnosticRecord]) -> Vec<(u32, u32)> {
    records.iter().map(|record| (record.line, record.col)).collect()
}

#[test]
fn scenario_a_value_below_threshold() {
    let css = format!("a {{\n{}font-size: 10px;\n}}", "\n".repeat(8));
    let records = check(&css, &json!(12));
    assert_eq!(records.len(), 1);
    assert_eq!(positions(&records), [(10, 12)]);
    assert_eq!(records[0].rule_name, RULE_NAME);
    assert!(
        records[0]
            .message
            .contains("`font-size: 10px;` font-size should not be less than 12px"),
        "unexpected message: {}",
        records[0].message
    );
    assert!(records[0].color_message.contains("\x1b[35m10px\x1b[39m"));
}

#[test]
fn scenario_b_equal_value_is_compliant() {
    assert!(check("a { font-size: 12px }", &json!(12)).is_empty());
}

#[test]
fn scenario_c_invalid_threshold_is_a_no_op() {
    init_logger();
    let css = "a { font-size: 1px }";
    let source: Rc<str> = Rc::from(css);
    let existing = DiagnosticRecord {
        rule_name: "other-rule".to_owned(),
        line: 1,
        col: 1,
        message: "kept".to_owned(),
        color_message: "kept".to_owned(),
    };
    let invalid_list = DiagnosticSink::from(vec![existing.clone()]);
    let mut parser = EventParser::new();

    let returned = min_font_size::register_from_value(
        &mut parser,
        &source,
        RULE_NAME,
        &json!("notanumber"),
        invalid_list.clone(),
    );
    assert!(returned.ptr_eq(&invalid_list));
    assert_eq!(parser.listener_count(), 0);

    parser.parse(css);
    assert_eq!(invalid_list.snapshot(), [existing]);
}

#[test]
fn scenario_d_near_match_properties_are_ignored() {
    let css = "a { font-size-adjust: 5; -webkit-font-size: 5px; font: 5px serif; size: 5px }";
    assert!(check(css, &json!(12)).is_empty());
}

#[test]
fn scenario_e_rules_do_not_interfere() {
    init_logger();
    let css = "a {\n  font-size: 10px;\n  line-height: 0.5;\n}";
    let source: Rc<str> = Rc::from(css);
    let mut parser = EventParser::new();

    let font_list = min_font_size::register(
        &mut parser,
        &source,
        RULE_NAME,
        Threshold::new(12.0),
        DiagnosticSink::new(),
    );

    let line_height_list = DiagnosticSink::new();
    let line_height_sink = line_height_list.clone();
    parser.add_listener(move |event: &PropertyEvent<'_>| {
        if event.property != "line-height" {
            return;
        }
        for part in &event.value.parts {
            if part.value.is_some_and(|magnitude| magnitude < 1.0) {
                line_height_sink.push(DiagnosticRecord {
                    rule_name: "min-line-height".to_owned(),
                    line: part.line,
                    col: part.col,
                    message: "too tight".to_owned(),
                    color_message: "too tight".to_owned(),
                });
            }
        }
    });
    assert_eq!(parser.listener_count(), 2);

    parser.parse(css);

    let fonts = font_list.take();
    let line_heights = line_height_list.take();
    assert_eq!(positions(&fonts), [(2, 14)]);
    assert!(fonts.iter().all(|record| record.rule_name == RULE_NAME));
    assert_eq!(positions(&line_heights), [(3, 16)]);
    assert!(
        line_heights
            .iter()
            .all(|record| record.rule_name == "min-line-height")
    );
}

#[test]
fn threshold_filter_is_strict() {
    for (size, flagged) in [("0.5", true), ("11.9", true), ("12", false), ("12.1", false), ("40", false)] {
        let css = format!("a {{ font-size: {size}px }}");
        let records = check(&css, &json!(12));
        assert_eq!(records.len(), usize::from(flagged), "font-size {size}px");
    }
}

#[test]
fn unusable_thresholds_subscribe_nothing() {
    for rule_val in [json!(null), json!(""), json!("abc"), json!(false), json!(0)] {
        init_logger();
        let mut parser = EventParser::new();
        let source: Rc<str> = Rc::from("a { font-size: 1px }");
        let sink = min_font_size::register_from_value(
            &mut parser,
            &source,
            RULE_NAME,
            &rule_val,
            DiagnosticSink::new(),
        );
        assert_eq!(parser.listener_count(), 0, "{rule_val} should disable the rule");
        parser.parse("a { font-size: 1px }");
        assert!(sink.is_empty());
    }
}

#[test]
fn numeric_string_threshold_is_accepted() {
    let records = check("a { font-size: 11px }", &json!("12"));
    assert_eq!(records.len(), 1);
    assert!(records[0].message.ends_with("font-size should not be less than 12px"));
}

#[test]
fn fractional_threshold_is_printed_as_configured() {
    let records = check("a { font-size: 12px }", &json!(12.5));
    assert_eq!(records.len(), 1);
    assert!(records[0].message.ends_with("less than 12.5px"));
}

#[test]
fn each_violating_component_is_reported_in_order() {
    let records = check("a { font-size: 10px 13px 9px 11px }", &json!(12));
    assert_eq!(positions(&records), [(1, 16), (1, 26), (1, 30)]);
}

#[test]
fn positions_follow_the_source() {
    let css = "\n\n.title {\n    color: red;\n        font-size:\n            8px;\n}\n";
    let records = check(css, &json!(12));
    assert_eq!(positions(&records), [(6, 13)]);
    assert_eq!(
        records[0].message,
        "`            8px;` font-size should not be less than 12px"
    );
}

#[test]
fn keywords_and_functions_are_compliant() {
    let css = "a { font-size: small } b { font-size: calc(1px + 1px) } c { font-size: inherit }";
    assert!(check(css, &json!(12)).is_empty());
}

#[test]
fn magnitudes_are_compared_without_units() {
    let records = check("a { font-size: 1em } b { font-size: 80% }", &json!(12));
    assert_eq!(positions(&records), [(1, 16)]);
}

#[test]
fn important_declarations_are_checked() {
    let records = check("a { font-size: 9px !important }", &json!(12));
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].col, 16);
}

#[test]
fn grouped_rules_are_checked() {
    let css = "@media screen {\n  a { font-size: 9px }\n}\n@supports (display: grid) {\n  b { font-size: 10px }\n}";
    let records = check(css, &json!(12));
    assert_eq!(positions(&records), [(2, 18), (5, 18)]);
}

#[test]
fn new_records_are_appended_after_existing_ones() {
    init_logger();
    let css = "a { font-size: 9px }";
    let source: Rc<str> = Rc::from(css);
    let earlier = DiagnosticRecord {
        rule_name: "earlier-rule".to_owned(),
        line: 1,
        col: 1,
        message: "first".to_owned(),
        color_message: "first".to_owned(),
    };
    let mut parser = EventParser::new();
    let sink = min_font_size::register(
        &mut parser,
        &source,
        "font-size-floor",
        Threshold::new(12.0),
        DiagnosticSink::from(vec![earlier.clone()]),
    );
    parser.parse(css);

    let records = sink.take();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0], earlier);
    assert_eq!(records[1].rule_name, "font-size-floor");
}

#[test]
fn equal_fractional_percentages_are_compliant() {
    for whole in [2, 5, 9, 13, 53, 59, 105, 106, 117, 299] {
        for fraction in ["", ".1", ".3", ".5", ".7", ".9"] {
            let size = format!("{whole}{fraction}");
            let css = format!("a {{ font-size: {size}% }}");
            let records = check(&css, &json!(size));
            assert!(records.is_empty(), "{size}% flagged against {size}");
        }
    }
}

#[test]
fn equal_fractional_lengths_are_compliant() {
    for size in ["2.9", "5.3", "12.3", "13.1", "53.7"] {
        let css = format!("a {{ font-size: {size}px }}");
        assert!(check(&css, &json!(size)).is_empty(), "{size}px flagged");
    }
}

#[test]
fn carriage_return_sources_are_checked() {
    let records = check("a {\r  font-size: 10px;\r}", &json!(12));
    assert_eq!(positions(&records), [(2, 14)]);
    assert!(records[0].message.starts_with("`  font-size: 10px;` "));
}

#[test]
fn form_feed_sources_are_checked() {
    let records = check("a {\x0C  font-size: 10px;\x0C}", &json!(12));
    assert_eq!(positions(&records), [(2, 14)]);
    assert!(records[0].message.starts_with("`  font-size: 10px;` "));
}

#[test]
fn property_names_match_case_insensitively() {
    let records = check("a { FONT-SIZE: 9px; Font-Size: 13px }", &json!(12));
    assert_eq!(positions(&records), [(1, 16)]);
}

use std::collections::BTreeMap;

use proptest::prelude::*;

use tickmark_core::waveform::ValueKind;
use tickmark_parser::{Timeline, error::ErrorCode, parse};

#[test]
fn test_clock_and_data() {
    let source = r#"
        // one clock, one data line
        clk=0, data=X.
        clk=1; clk => data=1.
        clk=0.
        clk=1; clk => data=0.
    "#;

    let dataset = parse(source).expect("Failed to parse");

    assert_eq!(dataset.signal_count(), 2);
    assert_eq!(dataset.max_length(), 4);

    let names: Vec<&str> = dataset.signals().map(|s| s.name()).collect();
    assert_eq!(names, ["clk", "data"]);

    let data = dataset.find("data").unwrap();
    let kinds: Vec<ValueKind> = data.values().iter().map(|v| v.kind()).collect();
    assert_eq!(
        kinds,
        [
            ValueKind::Unknown,
            ValueKind::One,
            ValueKind::One,
            ValueKind::Zero
        ]
    );

    let steps: Vec<(usize, usize)> = dataset
        .dependencies()
        .iter()
        .map(|d| (d.trigger_step(), d.effect_step()))
        .collect();
    assert_eq!(steps, [(1, 1), (3, 3)]);
}

#[test]
fn test_trigger_seen_first_in_dependency() {
    let dataset = parse("req => ack=1.\nreq=1.").expect("Failed to parse");
    let names: Vec<&str> = dataset.signals().map(|s| s.name()).collect();
    assert_eq!(names, ["ack", "req"]);

    let req: Vec<&str> = dataset
        .find("req")
        .unwrap()
        .values()
        .iter()
        .map(|v| v.text())
        .collect();
    assert_eq!(req, ["X", "1"]);
}

#[test]
fn test_pulse_and_tick() {
    let dataset = parse("strobe=pulse, clk=tick.\nen=1.").expect("Failed to parse");

    let strobe = dataset.find("strobe").unwrap();
    assert_eq!(strobe.values()[0].kind(), ValueKind::Pulse);
    assert_eq!(strobe.values()[1].kind(), ValueKind::Zero);

    let clk = dataset.find("clk").unwrap();
    assert_eq!(clk.values()[1].kind(), ValueKind::Tick);
}

#[test]
fn test_stacked_delays() {
    let source = "a=0, b=0, c=0.\na=1.\na -t1> b=1; a -t2> c=1.";
    let dataset = parse(source).expect("Failed to parse");

    let offsets: Vec<u32> = dataset.delays().iter().map(|d| d.offset()).collect();
    assert_eq!(offsets, [0, 1]);
    assert_eq!(dataset.find("a").unwrap().max_delay_slots(), 2);
}

#[test]
fn test_multiple_sources_share_steps() {
    let mut timeline = Timeline::new();
    timeline.extend("clk=0.\nclk=1.").unwrap();
    timeline.extend("irq=1.").unwrap();

    let dataset = timeline.finish();
    assert_eq!(dataset.max_length(), 3);
    assert_eq!(dataset.find("clk").unwrap().values()[2].text(), "1");
}

#[test]
fn test_every_lexer_error_is_reported() {
    let err = parse("a=1 $.\nb=\"open\n").unwrap_err();
    let codes: Vec<_> = err.diagnostics().iter().filter_map(|d| d.code()).collect();
    assert_eq!(codes, [ErrorCode::E002, ErrorCode::E001]);
}

#[test]
fn test_parser_error_has_span() {
    let source = "a=1.\na b=1.";
    let err = parse(source).unwrap_err();
    let diag = &err.diagnostics()[0];
    assert_eq!(diag.code(), Some(ErrorCode::E100));

    let span = diag.labels()[0].span();
    assert_eq!(&source[span.range()], "b");
}

#[test]
fn test_signal_not_found_after_parse() {
    let dataset = parse("a=1.").unwrap();
    let err = dataset.find("b").unwrap_err();
    assert_eq!(err.name(), "b");
}

/// Each statement changes a set of distinct signals.
fn description() -> impl Strategy<Value = Vec<BTreeMap<usize, u8>>> {
    prop::collection::vec(prop::collection::btree_map(0..4usize, 0..4u8, 1..4), 1..8)
}

fn render(statements: &[BTreeMap<usize, u8>]) -> String {
    const NAMES: [&str; 4] = ["clk", "data", "en", "bus"];
    const VALUES: [&str; 4] = ["0", "1", "X", "\"idle\""];

    statements
        .iter()
        .map(|changes| {
            let changes: Vec<String> = changes
                .iter()
                .map(|(&s, &v)| format!("{}={}", NAMES[s], VALUES[v as usize]))
                .collect();
            format!("{}.", changes.join(", "))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

proptest! {
    #[test]
    fn prop_every_signal_spans_every_step(statements in description()) {
        let dataset = parse(&render(&statements)).unwrap();
        prop_assert_eq!(dataset.max_length(), statements.len());
        for signal in dataset.signals() {
            prop_assert_eq!(signal.len(), statements.len());
        }
    }
}

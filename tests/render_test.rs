use license_level::display::{render, FeatureSelection};
use license_level::models::{FeatureStatus, Summary, UsageEntry};
use license_level::report::parse;

fn summary_with_qax() -> Summary {
    let mut qax = FeatureStatus::new("QAX");
    qax.total = 10;
    qax.in_use = 3;
    qax.model = "token".to_string();
    qax.record_usage(UsageEntry::from_line("jobA using 2 licenses (userX, hostY)"));
    qax.record_usage(UsageEntry::from_line("jobB using 1 licenses (userZ, hostZ)"));

    let mut summary = Summary::default();
    summary.features.insert("QAX".to_string(), qax);
    summary
}

#[test]
fn availability_line_and_usage_order() {
    let lines = render(
        &summary_with_qax(),
        &FeatureSelection::Codes(vec!["QAX".into()]),
    );
    assert_eq!(
        lines,
        vec![
            "QAX 7 available of 10 tokens",
            "\tjobA using 2 licenses",
            "\tjobB using 1 licenses",
        ]
    );
}

#[test]
fn requested_codes_are_case_insensitive() {
    let lines = render(
        &summary_with_qax(),
        &FeatureSelection::Codes(vec!["qax".into()]),
    );
    assert_eq!(lines[0], "QAX 7 available of 10 tokens");
}

#[test]
fn unknown_codes_are_skipped() {
    let lines = render(
        &summary_with_qax(),
        &FeatureSelection::Codes(vec!["ZZZ".into(), "QAX".into(), "QPT".into()]),
    );
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("QAX "));
}

#[test]
fn all_is_sorted_regardless_of_report_order() {
    let report = "\
Licenses:
| Feature | Number | Inuse | Model |
| SUN | 100 | 0 | Credit |
| QXT | 8 | 8 | Token |
| QAT | 2 | 1 | Token |
";
    let lines = render(&parse(report, None), &FeatureSelection::All);
    assert_eq!(
        lines,
        vec![
            "QAT 1 available of 2 tokens",
            "QXT 0 available of 8 tokens",
            "SUN 100 available of 100 credits",
        ]
    );
}

#[test]
fn error_block_comes_first() {
    let summary = parse("", Some("license server unreachable\nretry later\n"));
    let lines = render(&summary, &FeatureSelection::All);
    assert_eq!(lines, vec!["license server unreachable", "retry later"]);

    let mut summary = summary_with_qax();
    summary.error = Some("partial data".to_string());
    let lines = render(&summary, &FeatureSelection::Default);
    assert_eq!(lines[0], "partial data");
    assert_eq!(lines[1], "QAX 7 available of 10 tokens");
}

#[test]
fn negative_availability_is_not_clamped() {
    let mut summary = summary_with_qax();
    if let Some(qax) = summary.features.get_mut("QAX") {
        qax.in_use = 12;
    }
    let lines = render(&summary, &FeatureSelection::Default);
    assert_eq!(lines[0], "QAX -2 available of 10 tokens");
}

//! End-to-end checks of the built-in rules over stylesheet dumps.

use bem_lint_core::{Analyzer, AnalyzerError, Config, Severity};
use bem_lint_rules::{configured_rules, NoChainedEntities, NoSideEffects};
use std::path::PathBuf;

fn fixtures() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn analyzer(config: Config) -> Analyzer {
    let mut builder = Analyzer::builder().root(fixtures()).config(config.clone());
    for rule in configured_rules(&config).unwrap() {
        builder = builder.rule_box(rule);
    }
    builder.build().unwrap()
}

#[test]
fn reports_nested_violations_at_their_source() {
    let result = analyzer(Config::default()).analyze().unwrap();

    assert_eq!(result.files_checked, 2);
    let found: Vec<(String, usize, usize, String)> = result
        .violations
        .iter()
        .map(|v| {
            (
                v.location.file.display().to_string(),
                v.location.line,
                v.location.column,
                v.code.clone(),
            )
        })
        .collect();
    assert_eq!(
        found,
        vec![
            ("card.css".to_string(), 3, 3, "BEM001".to_string()),
            ("card.css".to_string(), 4, 4, "BEM002".to_string()),
        ]
    );
    assert!(result.has_errors());
    assert_eq!(result.count_by_severity(), (1, 1, 0));
}

#[test]
fn violation_text_is_stable() {
    let result = analyzer(Config::default()).analyze().unwrap();
    let lines: Vec<String> = result.violations.iter().map(ToString::to_string).collect();
    insta::assert_snapshot!(lines.join("\n"), @r"
    card.css:3:3: error [BEM001] `.icon` is outside block `card`
    card.css:4:4: warning [BEM002] `.card.button` chains block `button` onto `card`
    ");
}

#[test]
fn config_overrides_apply() {
    let config = Config::parse(
        "preset = \"strict\"\n[rules.no-side-effects]\nseverity = \"info\"\n",
    )
    .unwrap();
    let result = analyzer(config).analyze().unwrap();
    let severities: Vec<Severity> = result.violations.iter().map(|v| v.severity).collect();
    assert_eq!(severities, vec![Severity::Info, Severity::Error]);
}

#[test]
fn disabled_rules_do_not_run() {
    let config = Config::parse("[rules.no-chained-entities]\nenabled = false\n").unwrap();
    let result = analyzer(config).analyze().unwrap();
    assert!(result.violations.iter().all(|v| v.rule == "no-side-effects"));
}

#[test]
fn broken_dumps_fail_only_when_asked() {
    let analyzer = Analyzer::builder()
        .root(fixtures())
        .rule(NoSideEffects::new())
        .rule(NoChainedEntities::new())
        .fail_on_parse_error(true)
        .build()
        .unwrap();
    let err = analyzer.analyze().unwrap_err();
    assert!(matches!(err, AnalyzerError::Load { ref path, .. } if path.ends_with("broken.ast.json")));
}

#[test]
fn single_dump_can_be_checked() {
    let analyzer = Analyzer::builder()
        .root(fixtures().join("card.css.ast.json"))
        .rule(NoSideEffects::new())
        .build()
        .unwrap();
    let result = analyzer.analyze().unwrap();
    assert_eq!(result.files_checked, 1);
    assert_eq!(result.violations.len(), 1);
    assert_eq!(result.violations[0].location.file, PathBuf::from("card.css"));
}

#[test]
fn repeated_runs_are_identical() {
    let analyzer = analyzer(Config::default());
    let first = serde_json::to_string(&analyzer.analyze().unwrap()).unwrap();
    let second = serde_json::to_string(&analyzer.analyze().unwrap()).unwrap();
    assert_eq!(first, second);
}

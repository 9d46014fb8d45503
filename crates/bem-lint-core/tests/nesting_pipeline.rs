//! Resolution, source mapping and entity extraction working together on a
//! nested stylesheet.

use bem_lint_core::bem::{resolve_bem_entities, BemPartKind, Separators};
use bem_lint_core::selector::{
    parse_resolved, parse_selector, resolve_nested_selector, stringify, AdjustedNode,
    SelectorNodeKind,
};
use bem_lint_core::stylesheet::{NodeKind, Position, SourceSpan};
use bem_lint_core::{NodeId, Stylesheet};

const CONTENT: &str = "\
.nav, .menu {
  &__item {
    &--active {}
    .icon + & {}
  }
  @media (min-width: 1px) {
    &__link:is(.x, &__y) {}
  }
}
";

/// Span starting at the first occurrence of `needle`.
fn at(needle: &str) -> Option<SourceSpan> {
    let offset = CONTENT.find(needle)?;
    let before = &CONTENT[..offset];
    let start = Position {
        line: before.matches('\n').count() + 1,
        column: offset - before.rfind('\n').map_or(0, |i| i + 1) + 1,
        offset,
    };
    Some(SourceSpan { start, end: start })
}

fn sheet() -> Stylesheet {
    let mut sheet = Stylesheet::new();
    let list = sheet.append_rule(NodeId::ROOT, ".nav, .menu", at(".nav, .menu"));
    let item = sheet.append_rule(list, "&__item", at("&__item"));
    sheet.append_rule(item, "&--active", at("&--active"));
    sheet.append_rule(item, ".icon + &", at(".icon + &"));
    let media = sheet.append(
        list,
        NodeKind::AtRule {
            name: "media".into(),
            params: "(min-width: 1px)".into(),
            after_name: " ".into(),
        },
        at("@media"),
    );
    sheet.append_rule(media, "&__link:is(.x, &__y)", at("&__link"));
    sheet
}

fn flatten<'a>(nodes: &'a [AdjustedNode], out: &mut Vec<&'a AdjustedNode>) {
    for node in nodes {
        out.push(node);
        flatten(&node.children, out);
    }
}

#[test]
fn resolves_every_rule() {
    let sheet = sheet();
    let lines: Vec<String> = sheet
        .rules()
        .into_iter()
        .map(|id| {
            resolve_nested_selector(&sheet, id)
                .into_iter()
                .map(|r| r.text)
                .collect::<Vec<_>>()
                .join(" | ")
        })
        .collect();
    insta::assert_snapshot!(lines.join("\n"), @r"
    .nav, .menu
    .nav__item | .menu__item
    .nav__item--active | .menu__item--active
    .icon + .nav__item | .icon + .menu__item
    .nav__link:is(.x, .nav__y) | .menu__link:is(.x, .menu__y)
    ");
}

#[test]
fn class_nodes_map_back_to_their_source_text() {
    let sheet = sheet();
    let mut checked = 0;
    for id in sheet.rules() {
        let start = sheet.get(id).and_then(|n| n.source).unwrap().start.offset;
        for resolved in resolve_nested_selector(&sheet, id) {
            let groups = parse_resolved(&resolved, 0);
            let mut nodes = Vec::new();
            flatten(&groups, &mut nodes);
            for node in nodes {
                if node.node.kind != SelectorNodeKind::Class {
                    continue;
                }
                let Some(meta) = node.meta else {
                    continue;
                };
                let range = meta.source_range();
                let written = &CONTENT[start + range.start..start + range.end];
                if meta.literal {
                    assert_eq!(written, node.node.text(), "in {:?}", resolved.text);
                } else {
                    assert!(written.starts_with('&'), "{written:?} in {:?}", resolved.text);
                }
                checked += 1;
            }
        }
    }
    assert!(checked >= 10);
}

#[test]
fn entity_parts_point_at_what_was_written() {
    let sheet = sheet();
    let separators = Separators::default();
    let active = sheet.rules()[2];
    let start = sheet.get(active).and_then(|n| n.source).unwrap().start.offset;

    for resolved in resolve_nested_selector(&sheet, active) {
        let groups = parse_resolved(&resolved, 0);
        let entities = resolve_bem_entities(&groups, &separators);
        assert_eq!(entities.len(), 1);

        let (part, kind) = entities[0].most_specific_part();
        assert_eq!(kind, BemPartKind::ModifierName);
        let range = part.source_range(&resolved).unwrap();
        assert_eq!(&CONTENT[start + range.start..start + range.end], "active");

        let block = entities[0].block.source_range(&resolved).unwrap();
        assert_eq!(&CONTENT[start + block.start..start + block.end], "&");
    }
}

#[test]
fn resolution_is_deterministic() {
    let sheet = sheet();
    for id in sheet.walk() {
        assert_eq!(
            resolve_nested_selector(&sheet, id),
            resolve_nested_selector(&sheet, id)
        );
    }
}

#[test]
fn resolved_text_round_trips_through_the_parser() {
    let sheet = sheet();
    for id in sheet.rules() {
        for resolved in resolve_nested_selector(&sheet, id) {
            let groups = parse_selector(&resolved.text);
            assert!(!groups.is_empty(), "{:?}", resolved.text);
            assert_eq!(stringify(&groups).trim(), resolved.text.trim());
        }
    }
}

//! Round-trip tests: load and dump are exact inverses
//!
//! Fixture cases come from real annotation files; the property tests generate
//! random well-formed markup structurally (so group heads are always
//! unambiguous) and assert the round-trip laws over it.

use proptest::prelude::*;

use qmarkup::markup::{dump_query, load_query, mark_down};
use qmarkup::query::QueryFactory;

fn roundtrip(markup: &str) {
    let factory = QueryFactory::new();
    let processed = load_query(markup, &factory).expect("markup should load");
    assert_eq!(dump_query(&processed).unwrap(), markup);
}

#[test]
fn test_load_dump_entity() {
    roundtrip("When does the {Elm Street|store_name} store close?");
}

#[test]
fn test_load_dump_nested() {
    roundtrip("show me houses under {{600,000|sys:number} dollars|price}");
}

#[test]
fn test_load_dump_groups() {
    roundtrip(
        "Order [{one|quantity} {large|size} {Tesora|product} with \
         [{medium|size} {cream|option}|option]|product] from \
         [{Philz|store} in {Downtown Sunnyvale|location}|store]",
    );
}

#[test]
fn test_load_dump_irregular_separators() {
    // Exact commas and doubled spaces inside and around groups survive.
    roundtrip(
        "i'm extra hungry get me a {chicken leg|dish}, [{1|quantity} \
         {kheema nan|dish}|dish] [{2|quantity} regular {nans|dish}|dish] \
         [{one|quantity} {chicken karahi|dish}|dish], [{1|quantity} \
         {saag paneer|dish}|dish] and [{1|quantity} {chicken biryani|dish}|dish]",
    );
}

#[test]
fn test_load_dump_structural_equality() {
    let factory = QueryFactory::new();
    let markup = "a [{large|size} {latte|product} with {nonfat milk|option}|product] please";
    let processed = load_query(markup, &factory).unwrap();
    let reloaded = load_query(&dump_query(&processed).unwrap(), &factory).unwrap();
    assert_eq!(reloaded, processed);
}

// ---------------------------------------------------------------------------
// Generators for well-formed markup
// ---------------------------------------------------------------------------

fn word() -> impl Strategy<Value = String> {
    "[a-z]{1,8}"
}

/// `{content|type}`, optionally with nested entities in the content.
fn entity(depth: u32) -> BoxedStrategy<String> {
    if depth == 0 {
        (word(), word())
            .prop_map(|(text, ty)| format!("{{{}|{}}}", text, ty))
            .boxed()
    } else {
        let piece = prop_oneof![word().boxed(), entity(depth - 1)];
        (proptest::collection::vec(piece, 1..3), word())
            .prop_map(|(pieces, ty)| format!("{{{}|{}}}", pieces.join(" "), ty))
            .boxed()
    }
}

/// `[members|type]` with member types made distinct by position, so head
/// resolution always finds exactly one candidate.
fn group() -> impl Strategy<Value = String> {
    (
        proptest::collection::vec((word(), word()), 1..4),
        any::<proptest::sample::Index>(),
    )
        .prop_map(|(pairs, head)| {
            let members: Vec<String> = pairs
                .iter()
                .enumerate()
                .map(|(position, (text, ty))| format!("{{{}|{}{}}}", text, ty, position))
                .collect();
            let head = head.index(pairs.len());
            let group_type = format!("{}{}", pairs[head].1, head);
            format!("[{}|{}]", members.join(" "), group_type)
        })
}

fn markup() -> impl Strategy<Value = String> {
    let segment = prop_oneof![word().boxed(), entity(2), group().boxed()];
    proptest::collection::vec(segment, 0..6).prop_map(|segments| segments.join(" "))
}

proptest! {
    #[test]
    fn prop_dump_inverts_load(markup_text in markup()) {
        let factory = QueryFactory::new();
        let processed = load_query(&markup_text, &factory).unwrap();
        prop_assert_eq!(dump_query(&processed).unwrap(), markup_text);
    }

    #[test]
    fn prop_spans_address_entity_text(markup_text in markup()) {
        let factory = QueryFactory::new();
        let processed = load_query(&markup_text, &factory).unwrap();
        for entity in &processed.entities {
            prop_assert_eq!(processed.query.span_text(&entity.span), entity.text());
        }
    }

    #[test]
    fn prop_entities_sorted_by_start(markup_text in markup()) {
        let factory = QueryFactory::new();
        let processed = load_query(&markup_text, &factory).unwrap();
        for pair in processed.entities.windows(2) {
            prop_assert!(pair[0].span.start <= pair[1].span.start);
        }
    }

    #[test]
    fn prop_raw_text_equals_mark_down(markup_text in markup()) {
        let factory = QueryFactory::new();
        let processed = load_query(&markup_text, &factory).unwrap();
        prop_assert_eq!(processed.query.text(), mark_down(&markup_text));
    }

    #[test]
    fn prop_group_heads_match_group_type(markup_text in markup()) {
        let factory = QueryFactory::new();
        let processed = load_query(&markup_text, &factory).unwrap();
        for group in &processed.entity_groups {
            prop_assert_eq!(group.head.entity_type(), group.entity_type());
            for leaf in group.leaf_entities() {
                prop_assert!(processed.entities.contains(leaf));
            }
        }
    }
}

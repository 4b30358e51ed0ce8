use proptest::prelude::*;
use respcheck::compare::compare_maps;
use respcheck::config::CompareConfig;
use respcheck::types::Value;
use respcheck::validate::validate_response;
use serde_json::json;

fn leaf() -> impl Strategy<Value = serde_json::Value> {
    prop_oneof![
        Just(serde_json::Value::Null),
        any::<bool>().prop_map(serde_json::Value::Bool),
        any::<i64>().prop_map(|n| json!(n)),
        (-1.0e9f64..1.0e9).prop_map(|f| json!(f)),
        "[a-z]{0,8}".prop_map(serde_json::Value::String),
        "20[0-9]{2}-0[1-9]-[0-2][0-9]T[01][0-9]:[0-5][0-9]:[0-5][0-9](\\.[0-9]{1,9})?Z?"
            .prop_map(serde_json::Value::String),
    ]
}

fn tree() -> impl Strategy<Value = serde_json::Value> {
    leaf().prop_recursive(4, 48, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..5).prop_map(serde_json::Value::Array),
            prop::collection::btree_map("[a-z]{1,6}", inner, 0..5)
                .prop_map(|m| serde_json::Value::Object(m.into_iter().collect())),
        ]
    })
}

fn document() -> impl Strategy<Value = Value> {
    prop::collection::btree_map("[a-z]{1,6}", tree(), 1..6)
        .prop_map(|m| Value::from(serde_json::Value::Object(m.into_iter().collect())))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn structure_matches_itself(doc in document()) {
        let map = doc.as_map().unwrap();
        let mut unmatched = Vec::new();
        let result = compare_maps(map, &map.clone(), &CompareConfig::default(), &mut unmatched);
        prop_assert!(result.is_ok(), "{:?}", result);
        prop_assert!(unmatched.is_empty(), "{:?}", unmatched);
    }

    #[test]
    fn structure_matches_itself_with_sorted_lists(doc in document()) {
        let map = doc.as_map().unwrap();
        let config = CompareConfig::default().with_sort_lists(true);
        let mut unmatched = Vec::new();
        let result = compare_maps(map, &map.clone(), &config, &mut unmatched);
        prop_assert!(result.is_ok(), "{:?}", result);
        prop_assert!(unmatched.is_empty(), "{:?}", unmatched);
    }

    #[test]
    fn list_response_matches_itself_positionally(docs in prop::collection::vec(document(), 1..4)) {
        let list = Value::List(docs);
        let config = CompareConfig::default().with_full_list_validation(true);
        let result = validate_response(&list, &list.clone(), &config);
        prop_assert!(result.is_ok(), "{:?}", result);
    }

    #[test]
    fn ignored_key_never_reported(doc in document(), a in any::<i64>(), b in any::<i64>()) {
        let (Value::Map(mut actual), Value::Map(mut expected)) = (doc.clone(), doc) else {
            unreachable!()
        };
        actual.insert("zz_ignored", a);
        expected.insert("zz_ignored", b);
        let config = CompareConfig::default().with_ignored_keys(["zz_ignored"]);
        let result = validate_response(&Value::Map(actual), &Value::Map(expected), &config);
        prop_assert!(result.is_ok(), "{:?}", result);
    }
}

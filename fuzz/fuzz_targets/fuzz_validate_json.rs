#![no_main]

use arbitrary::{Arbitrary, Unstructured};
use libfuzzer_sys::fuzz_target;
use respcheck::{CompareConfig, Value, validate_json};

/// Generate a small expected structure from fuzzer bytes.
fn arbitrary_expected(u: &mut Unstructured<'_>, depth: u8) -> arbitrary::Result<serde_json::Value> {
    let choice = if depth == 0 { u.int_in_range(0..=3)? } else { u.int_in_range(0..=5)? };
    match choice {
        0 => Ok(serde_json::Value::Null),
        1 => Ok(serde_json::Value::Bool(bool::arbitrary(u)?)),
        2 => Ok(serde_json::Value::from(i64::arbitrary(u)?)),
        3 => Ok(serde_json::Value::String(String::arbitrary(u)?)),
        4 => {
            let len = u.int_in_range(0..=3)?;
            let mut items = Vec::with_capacity(len);
            for _ in 0..len {
                items.push(arbitrary_expected(u, depth - 1)?);
            }
            Ok(serde_json::Value::Array(items))
        }
        _ => {
            let len = u.int_in_range(0..=3)?;
            let mut map = serde_json::Map::new();
            for _ in 0..len {
                map.insert(String::arbitrary(u)?, arbitrary_expected(u, depth - 1)?);
            }
            Ok(serde_json::Value::Object(map))
        }
    }
}

fuzz_target!(|data: &[u8]| {
    let mut u = Unstructured::new(data);

    let expected = match arbitrary_expected(&mut u, 3) {
        Ok(v) => Value::from(v),
        Err(_) => return,
    };
    let config = CompareConfig::default()
        .with_sort_lists(bool::arbitrary(&mut u).unwrap_or(false))
        .with_full_list_validation(bool::arbitrary(&mut u).unwrap_or(false));
    let body = String::from_utf8_lossy(u.take_rest());

    let _ = validate_json(&body, &expected, &config);
});

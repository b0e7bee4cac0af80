use churn_core::hashing::hash_value;
use serde_json::json;

#[test]
fn hash_value_is_order_independent_hex() {
    let h = hash_value(&json!({"b": 2, "a": 1}));
    assert_eq!(h.len(), 64);
    assert_eq!(h, hash_value(&json!({"a": 1, "b": 2})));
    assert_ne!(h, hash_value(&json!({"a": 1, "b": 3})));
}

//! Property-based tests for value round trips using proptest
//!
//! Every round trip here goes through a real in-memory database, so these
//! exercise the bind and column paths rather than just Rust-side
//! conversions.

use proptest::prelude::*;
use sqlite_guard::prelude::*;

fn open_db() -> Database {
    let mut db = Database::new();
    db.open_in_memory().expect("Failed to open");
    db
}

// ============================================================================
// Engine Echo Tests
// ============================================================================

proptest! {
    /// Blobs of any content come back byte for byte
    #[test]
    fn test_blob_echo(value in prop::collection::vec(any::<u8>(), 0..1000)) {
        let db = open_db();
        let ctx = DatabaseContext::new(&db);

        let mut run = ctx.use_once("select ?1").expect("Failed to prepare");
        run.bind_blob(1, &value).expect("Failed to bind");
        assert_eq!(run.step().expect("Failed to step"), Step::Row);
        assert_eq!(run.column_type(0), StorageClass::Blob);
        assert_eq!(run.column_blob(0), value);
    }

    /// Text comes back exactly, including embedded NUL bytes, because the
    /// engine stores it length-delimited
    #[test]
    fn test_text_echo(value in ".*") {
        let db = open_db();
        let ctx = DatabaseContext::new(&db);

        let mut run = ctx.use_once("select ?1").expect("Failed to prepare");
        run.bind_text(1, &value).expect("Failed to bind");
        assert_eq!(run.step().expect("Failed to step"), Step::Row);
        assert_eq!(run.column_type(0), StorageClass::Text);
        assert_eq!(run.column_text(0), value);
    }

    /// Integers echo exactly across the full i64 range
    #[test]
    fn test_integer_echo(value in any::<i64>()) {
        let db = open_db();
        let ctx = DatabaseContext::new(&db);

        let mut run = ctx.use_once("select ?1").expect("Failed to prepare");
        run.bind_int64(1, value).expect("Failed to bind");
        assert_eq!(run.step().expect("Failed to step"), Step::Row);
        assert_eq!(run.column_int64(0), value);
    }

    /// Finite doubles echo exactly; the engine stores IEEE 754 doubles as-is
    #[test]
    fn test_double_echo(value in any::<f64>().prop_filter("finite", |v| v.is_finite())) {
        let db = open_db();
        let ctx = DatabaseContext::new(&db);

        let mut run = ctx.use_once("select ?1").expect("Failed to prepare");
        run.bind_double(1, value).expect("Failed to bind");
        assert_eq!(run.step().expect("Failed to step"), Step::Row);
        assert_eq!(run.column_double(0), value);
    }
}

// ============================================================================
// Stored Round-Trip Tests
// ============================================================================

proptest! {
    /// Values survive an insert and a later select, not just a bind echo
    #[test]
    fn test_stored_blob_round_trip(value in prop::collection::vec(any::<u8>(), 0..256)) {
        let db = open_db();
        let ctx = DatabaseContext::new(&db);
        run_statements(&ctx, "create table bin (data blob)").expect("Failed to apply schema");

        let mut insert = ctx
            .use_once("insert into bin (data) values (?1)")
            .expect("Failed to prepare");
        insert.bind_blob(1, &value).expect("Failed to bind");
        assert_eq!(insert.step().expect("Failed to step"), Step::Done);
        drop(insert);

        let mut select = ctx.use_once("select data from bin").expect("Failed to prepare");
        assert_eq!(select.step().expect("Failed to step"), Step::Row);
        assert_eq!(select.column_blob(0), value);
    }

    /// Any Value variant keeps its storage class through storage
    #[test]
    fn test_stored_value_keeps_storage_class(value in prop_oneof![
        Just(Value::Null),
        any::<i64>().prop_map(Value::Integer),
        any::<f64>().prop_filter("finite", |v| v.is_finite()).prop_map(Value::Real),
        ".*".prop_map(Value::Text),
        prop::collection::vec(any::<u8>(), 0..100).prop_map(Value::Blob),
    ]) {
        let db = open_db();
        let ctx = DatabaseContext::new(&db);
        run_statements(&ctx, "create table bag (item)").expect("Failed to apply schema");

        let mut insert = ctx
            .use_once("insert into bag (item) values (?1)")
            .expect("Failed to prepare");
        insert.bind_value(1, &value).expect("Failed to bind");
        assert_eq!(insert.step().expect("Failed to step"), Step::Done);
        drop(insert);

        let mut select = ctx.use_once("select item from bag").expect("Failed to prepare");
        assert_eq!(select.step().expect("Failed to step"), Step::Row);
        assert_eq!(select.column_type(0), value.storage_class());
        assert_eq!(select.column_value(0), value);
    }
}

// ============================================================================
// Coercion Tests
// ============================================================================

proptest! {
    /// A text read of an integer cell is its decimal rendering
    #[test]
    fn test_integer_reads_as_decimal_text(value in any::<i64>()) {
        let db = open_db();
        let ctx = DatabaseContext::new(&db);

        let mut run = ctx.use_once("select ?1").expect("Failed to prepare");
        run.bind_int64(1, value).expect("Failed to bind");
        assert_eq!(run.step().expect("Failed to step"), Step::Row);
        assert_eq!(run.column_text(0), value.to_string());
    }

    /// An integer read of a numeric text cell parses the digits
    #[test]
    fn test_numeric_text_reads_as_integer(value in any::<i32>()) {
        let db = open_db();
        let ctx = DatabaseContext::new(&db);

        let mut run = ctx.use_once("select ?1").expect("Failed to prepare");
        run.bind_text(1, &value.to_string()).expect("Failed to bind");
        assert_eq!(run.step().expect("Failed to step"), Step::Row);
        assert_eq!(run.column_int64(0), i64::from(value));
    }
}

// ============================================================================
// Value Conversion Tests
// ============================================================================

proptest! {
    /// Integer conversions round trip without loss
    #[test]
    fn test_value_integer_conversion(value in any::<i64>()) {
        let val = Value::from(value);
        assert_eq!(val.as_integer(), Some(value));
        assert!(!val.is_null());
        assert_eq!(val.storage_class(), StorageClass::Integer);
    }

    /// String conversions preserve content
    #[test]
    fn test_value_text_conversion(value in ".*") {
        let val = Value::from(value.clone());
        assert_eq!(val.as_str(), Some(value.as_str()));
        assert_eq!(val.as_string(), value);
    }

    /// None always becomes Null regardless of the inner type
    #[test]
    fn test_none_becomes_null(_value in 0..100u32) {
        let val = Value::from(Option::<i64>::None);
        assert!(val.is_null());
        assert_eq!(val.as_integer(), None);
        assert_eq!(val.as_string(), "");
    }

    /// Rendering any value as a string never panics
    #[test]
    fn test_display_never_panics(value in prop_oneof![
        Just(Value::Null),
        any::<i64>().prop_map(Value::Integer),
        any::<f64>().prop_filter("finite", |v| v.is_finite()).prop_map(Value::Real),
        ".*".prop_map(Value::Text),
        prop::collection::vec(any::<u8>(), 0..100).prop_map(Value::Blob),
    ]) {
        let _ = value.to_string();
        let _ = value.as_string();
    }
}

// ============================================================================
// JSON Serialization Tests
// ============================================================================

proptest! {
    /// Values round trip through JSON without loss
    #[test]
    fn test_json_round_trip(value in prop_oneof![
        Just(Value::Null),
        any::<i64>().prop_map(Value::Integer),
        any::<f64>().prop_filter("finite", |v| v.is_finite()).prop_map(Value::Real),
        ".*".prop_map(Value::Text),
        prop::collection::vec(any::<u8>(), 0..100).prop_map(Value::Blob),
    ]) {
        let encoded = serde_json::to_string(&value).expect("Failed to serialize");
        let decoded: Value = serde_json::from_str(&encoded).expect("Failed to deserialize");
        assert_eq!(decoded, value);
    }
}

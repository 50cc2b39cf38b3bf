//! Value types example
//!
//! This example demonstrates the storage classes a cell can hold and how
//! reads behave across them:
//! - Storing every storage class through one untyped column
//! - Reading values back without coercion
//! - Engine coercion on mismatched reads
//! - Null handling
//! - JSON rendering of captured values
//!
//! Run with: cargo run --example value_types

use sqlite_guard::prelude::*;

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    println!("=== SQLite Guard - Value Types Example ===\n");

    let mut db = Database::new();
    db.open_in_memory()?;
    let ctx = DatabaseContext::new(&db);

    // A bare column has no affinity, so every storage class passes through
    println!("1. Creating an untyped table...");
    run_statements(&ctx, "create table cell (item)")?;
    println!("   ✓ Table created\n");

    println!("2. Storing one row per storage class...");
    let samples = vec![
        Value::Null,
        Value::Integer(i64::MAX),
        Value::Real(std::f64::consts::E),
        Value::Text("Hello, World!".to_string()),
        Value::Blob(vec![0x48, 0x65, 0x6c, 0x6c, 0x6f]),
    ];

    let mut insert = db.prepare("insert into cell (item) values (?1)")?;
    for sample in &samples {
        let mut run = ctx.borrow(&mut insert);
        run.bind_value(1, sample)?;
        run.step()?;
        println!("   ✓ Stored {} as {}", sample, sample.storage_class());
    }
    println!();

    println!("3. Reading back without coercion...\n");
    let mut select = ctx.use_once("select item from cell order by rowid")?;
    while select.step()? == Step::Row {
        let value = select.column_value(0);
        println!("   {} cell:", select.column_type(0));
        println!("     Raw: {:?}", value);
        println!("     Display: {}", value);
        println!("     Is null: {}", value.is_null());
        println!();
    }
    drop(select);

    // Mismatched reads go through the engine's conversion rules rather
    // than failing
    println!("4. Engine coercion on mismatched reads...\n");

    let mut run = ctx.use_once("select ?1")?;
    run.bind_int64(1, 42)?;
    run.step()?;
    println!("   Integer cell 42:");
    println!("     As text: {:?}", run.column_text(0));
    println!("     As double: {}", run.column_double(0));
    drop(run);

    let mut run = ctx.use_once("select ?1")?;
    run.bind_text(1, "37 degrees")?;
    run.step()?;
    println!("   Text cell '37 degrees':");
    println!("     As integer: {} (leading digits parsed)", run.column_int64(0));
    println!("     As double: {}", run.column_double(0));
    drop(run);

    let mut run = ctx.use_once("select null")?;
    run.step()?;
    println!("   NULL cell:");
    println!("     As text: {:?} (empty)", run.column_text(0));
    println!("     As integer: {}", run.column_int64(0));
    println!("     As blob: {:?}", run.column_blob(0));
    drop(run);
    println!();

    println!("5. Creating values from Rust types...\n");
    let conversions = vec![
        ("bool", Value::from(true)),
        ("i32", Value::from(42i32)),
        ("i64", Value::from(1_234_567_890i64)),
        ("f64", Value::from(std::f64::consts::PI)),
        ("&str", Value::from("Rust")),
        ("Vec<u8>", Value::from(vec![1u8, 2, 3, 4, 5])),
        ("Option::<i64>::None", Value::from(Option::<i64>::None)),
    ];

    for (name, value) in &conversions {
        println!("   {} -> {} ({})", name, value, value.storage_class());
    }
    println!();

    println!("6. JSON rendering...\n");
    for value in &samples {
        let json = serde_json::to_string(value)
            .map_err(|e| Error::other(format!("JSON encoding failed: {e}")))?;
        println!("   {} -> {}", value.storage_class(), json);
    }

    println!("\n=== Example completed successfully! ===");

    Ok(())
}

//! Basic usage example
//!
//! This example demonstrates the full statement lifecycle against an
//! in-memory database:
//! - Opening a database
//! - Applying a schema script
//! - Inserting through a reused prepared statement
//! - Querying through scoped execution handles
//! - Reading engine-reported change counts
//!
//! Run with: cargo run --example basic_usage

use sqlite_guard::prelude::*;

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    println!("=== SQLite Guard - Basic Usage Example ===\n");

    // Open an in-memory database
    println!("1. Opening database...");
    let mut db = Database::new();
    db.open_in_memory()?;
    println!("   ✓ Open\n");

    // All execution is scoped through a context
    let ctx = DatabaseContext::new(&db);

    // Apply the schema as one script
    println!("2. Applying schema...");
    run_statements(
        &ctx,
        "create table camera (
             uuid blob primary key not null,
             short_name text not null,
             retain_bytes integer not null
         );
         create index camera_by_name on camera (short_name);",
    )?;
    println!("   ✓ Schema applied\n");

    // Insert through one prepared statement, re-borrowed per row
    println!("3. Registering cameras...");
    let cameras: &[(&str, i64)] = &[
        ("porch", 8 << 30),
        ("garage", 4 << 30),
        ("lobby", 16 << 30),
        ("driveway", 2 << 30),
    ];

    let mut insert = db.prepare(
        "insert into camera (uuid, short_name, retain_bytes) \
         values (:uuid, :short_name, :retain_bytes)",
    )?;
    for (i, (name, retain)) in cameras.iter().enumerate() {
        let mut run = ctx.borrow(&mut insert);
        run.bind_blob(1, &[i as u8; 16])?;
        run.bind_text(2, name)?;
        run.bind_int64(3, *retain)?;
        run.step()?;
        println!("   ✓ Registered {} ({} row)", name, db.changes());
    }
    println!();

    // Query everything back
    println!("4. Listing cameras...");
    let mut list =
        ctx.use_once("select short_name, retain_bytes from camera order by short_name")?;
    while list.step()? == Step::Row {
        println!(
            "   - {}: {} GiB retained",
            list.column_text(0),
            list.column_int64(1) >> 30
        );
    }
    drop(list);
    println!();

    // Filtered query with a bound threshold
    println!("5. Cameras retaining at least 8 GiB...");
    let mut big = ctx.use_once(
        "select short_name from camera where retain_bytes >= ?1 order by retain_bytes desc",
    )?;
    big.bind_int64(1, 8 << 30)?;
    while big.step()? == Step::Row {
        println!("   - {}", big.column_text(0));
    }
    drop(big);
    println!();

    // Update and report the change count
    println!("6. Doubling retention for small cameras...");
    let mut update = ctx
        .use_once("update camera set retain_bytes = retain_bytes * 2 where retain_bytes < ?1")?;
    update.bind_int64(1, 8 << 30)?;
    update.step()?;
    drop(update);
    println!("   ✓ Updated {} row(s)\n", db.changes());

    // Delete and count what is left
    println!("7. Removing the driveway camera...");
    let mut delete = ctx.use_once("delete from camera where short_name = ?1")?;
    delete.bind_text(1, "driveway")?;
    delete.step()?;
    drop(delete);
    println!("   ✓ Deleted {} row(s)\n", db.changes());

    println!("8. Final camera count...");
    let mut count = ctx.use_once("select count(*) from camera")?;
    count.step()?;
    println!("   Remaining cameras: {}\n", count.column_int64(0));
    drop(count);

    // Close explicitly; dropping the database would also close it
    println!("9. Closing database...");
    drop(ctx);
    drop(insert);
    db.close()?;
    println!("   ✓ Closed");

    println!("\n=== Example completed successfully! ===");

    Ok(())
}

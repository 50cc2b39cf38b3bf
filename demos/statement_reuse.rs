//! Statement reuse example
//!
//! This example demonstrates how scoped execution handles make prepared
//! statement reuse safe:
//! - One statement re-borrowed across many executions
//! - Automatic cursor rewind and binding cleanup on release
//! - Explicit reset inside a tight loop
//! - The cost of compiling throwaway SQL on every call
//!
//! Run with: cargo run --example statement_reuse

use sqlite_guard::prelude::*;
use std::time::Instant;

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    println!("=== SQLite Guard - Statement Reuse Example ===\n");

    let mut db = Database::new();
    db.open_in_memory()?;
    let ctx = DatabaseContext::new(&db);

    println!("1. Applying schema...");
    run_statements(
        &ctx,
        "create table reading (sensor text not null, value real not null, note text);
         create table sample (n integer not null);",
    )?;
    println!("   ✓ Schema applied\n");

    // Each borrow gets a clean statement: cursor rewound, bindings cleared
    println!("2. Borrow, execute, release...");
    let mut insert = db.prepare("insert into reading (sensor, value, note) values (?1, ?2, ?3)")?;
    {
        let mut run = ctx.borrow(&mut insert);
        run.bind_text(1, "thermo-1")?;
        run.bind_double(2, 21.5)?;
        run.bind_text(3, "calibrated")?;
        run.step()?;
    }
    {
        let mut run = ctx.borrow(&mut insert);
        run.bind_text(1, "thermo-2")?;
        run.bind_double(2, 19.0)?;
        // the note parameter is left unbound on purpose; the previous
        // borrow's "calibrated" was cleared on release, so this inserts NULL
        run.step()?;
    }

    let mut check = ctx.use_once("select note is null from reading where sensor = 'thermo-2'")?;
    check.step()?;
    println!("   thermo-2 note is NULL: {}\n", check.column_int64(0) == 1);
    drop(check);

    // A single borrow can execute many times with explicit resets
    println!("3. Tight loop over one borrow...");
    let mut bulk = db.prepare("insert into sample (n) values (?1)")?;
    let started = Instant::now();
    {
        let mut run = ctx.borrow(&mut bulk);
        for n in 0..1000 {
            run.bind_int64(1, n)?;
            run.step()?;
            run.reset()?;
        }
    }
    let reused = started.elapsed();
    println!("   ✓ 1000 inserts through one prepared statement: {:?}\n", reused);

    println!("4. The same loop compiling SQL every time...");
    let started = Instant::now();
    for n in 1000..2000 {
        let mut run = ctx.use_once("insert into sample (n) values (?1)")?;
        run.bind_int64(1, n)?;
        run.step()?;
    }
    let throwaway = started.elapsed();
    println!("   ✓ 1000 inserts through use_once: {:?}", throwaway);
    println!("   (prepared reuse skips one compile per insert)\n");

    // Releasing mid-result rewinds the cursor for the next borrower
    println!("5. Releasing a query mid-result...");
    let mut scan = db.prepare("select sensor from reading order by sensor")?;
    {
        let mut run = ctx.borrow(&mut scan);
        run.step()?;
        println!("   first row: {}", run.column_text(0));
    }
    {
        let mut run = ctx.borrow(&mut scan);
        run.step()?;
        println!("   after release, the scan starts over: {}", run.column_text(0));
    }

    println!("\n=== Example completed successfully! ===");

    Ok(())
}

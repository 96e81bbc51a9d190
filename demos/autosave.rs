use stock_table::{SavePolicy, StockTable};
use std::time::Duration;

fn main() -> Result<(), stock_table::Error> {
    tracing_subscriber::fmt()
        .with_env_filter("stock_table=debug")
        .init();

    let path = std::env::temp_dir().join("stock_table_example_autosave.json");

    // indented JSON, saved in the background every 5 seconds and on drop
    let table = StockTable::builder()
        .path(&path)
        .pretty(true)
        .policy(SavePolicy::Background(Duration::from_secs(5)))
        .build()?;

    table.add("bolts", 250)?;
    table.add("nuts", 240)?;
    table.add("washers", 3)?;
    table.remove("bolts", 20)?;
    table.flush()?;

    let contents = std::fs::read_to_string(&path)?;
    println!("On-disk JSON:\n{contents}");
    println!("\nDebug output: {table:?}");

    drop(table);
    let _ = std::fs::remove_file(&path);
    Ok(())
}

use dashmap::DashMap;
use stock_table::{ItemId, Quantity, StockTableBuilder};

fn main() -> Result<(), stock_table::Error> {
    let path = std::env::temp_dir().join("stock_table_example_dashmap.json");

    let table = StockTableBuilder::<DashMap<ItemId, Quantity>>::new()
        .path(&path)
        .build()?;

    std::thread::scope(|s| {
        for worker in 0..4 {
            let table = &table;
            s.spawn(move || {
                let part = format!("part-{worker}");
                for _ in 0..(worker * 3) {
                    let _ = table.add(&part, 1);
                }
            });
        }
    });

    table.flush()?;
    table.report();
    println!("low (< 5): {:?}", table.low_stock());

    let _ = std::fs::remove_file(&path);
    Ok(())
}

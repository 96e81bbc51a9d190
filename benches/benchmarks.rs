use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use shardmap::ShardMap;
use std::hint::black_box;
use std::path::PathBuf;
use std::time::Duration;
use stock_table::{ItemId, Quantity, StockTable};

fn bench_path(name: &str, size: usize) -> PathBuf {
    std::env::temp_dir().join(format!("stock_table_bench_{}_{}.json", name, size))
}

fn item_names(size: usize) -> Vec<String> {
    (0..size).map(|i| format!("item{i}")).collect()
}

fn bench_add_remove(c: &mut Criterion) {
    let mut group = c.benchmark_group("add_remove");
    for size in [10, 100, 1000] {
        let names = item_names(size);
        group.bench_with_input(BenchmarkId::new("btreemap", size), &names, |b, names| {
            let table = StockTable::new();
            b.iter(|| {
                for name in names {
                    table.add(name, 10).unwrap();
                }
                for name in names {
                    black_box(table.get_quantity(name).unwrap());
                }
                for name in names {
                    table.remove(name, 10).unwrap();
                }
            });
        });
        group.bench_with_input(BenchmarkId::new("shardmap", size), &names, |b, names| {
            let table = StockTable::with_backend(ShardMap::<ItemId, Quantity>::default());
            b.iter(|| {
                for name in names {
                    table.add(name, 10).unwrap();
                }
                for name in names {
                    table.remove(name, 10).unwrap();
                }
            });
        });
    }
}

fn bench_save(c: &mut Criterion) {
    let mut group = c.benchmark_group("save");
    group.sample_size(50);
    group.measurement_time(Duration::from_secs(8));
    for size in [100, 1000, 10_000] {
        group.bench_with_input(BenchmarkId::new("btreemap", size), &size, |b, &size| {
            let path = bench_path("save", size);
            let table = StockTable::new();
            for (i, name) in item_names(size).iter().enumerate() {
                table.add(name, i as Quantity).unwrap();
            }
            b.iter(|| table.save(&path).unwrap());
            let _ = std::fs::remove_file(&path);
        });
    }
}

fn bench_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("load");
    group.sample_size(50);
    for size in [100, 1000, 10_000] {
        group.bench_with_input(BenchmarkId::new("btreemap", size), &size, |b, &size| {
            let path = bench_path("load", size);
            let source = StockTable::new();
            for (i, name) in item_names(size).iter().enumerate() {
                source.add(name, i as Quantity).unwrap();
            }
            source.save(&path).unwrap();
            let table = StockTable::new();
            b.iter(|| table.load(&path).unwrap());
            let _ = std::fs::remove_file(&path);
        });
    }
}

fn bench_list_below(c: &mut Criterion) {
    let mut group = c.benchmark_group("list_below");
    for size in [100, 1000, 10_000] {
        group.bench_with_input(BenchmarkId::new("btreemap", size), &size, |b, &size| {
            let table = StockTable::new();
            for (i, name) in item_names(size).iter().enumerate() {
                table.add(name, (i % 10) as Quantity).unwrap();
            }
            b.iter(|| black_box(table.list_below(5)));
        });
    }
}

criterion_group!(
    benches,
    bench_add_remove,
    bench_save,
    bench_load,
    bench_list_below,
);
criterion_main!(benches);

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use smartshelf_core::{Aggregate, StockItemId};
use smartshelf_inventory::StockItemDraft;
use smartshelf_sales::OrderRequest;
use smartshelf_store::{
    AdjustStockQuantity, InventoryStore, Snapshot, StoreCommand, StoreConfig, StoreEvent,
};

/// A store holding `items` stock items with plenty of quantity each.
fn setup_store(items: usize) -> (InventoryStore, Vec<StockItemId>) {
    let mut store = InventoryStore::new(StoreConfig::default());
    let drafts = (0..items)
        .map(|i| {
            StockItemDraft::new(format!("Item {i}"), "Bench", 1_000_000_000, "units", 10)
                .with_unit_price(100)
        })
        .collect();
    let committed = store.dispatch(StoreCommand::ImportStockItems(drafts)).unwrap();
    let ids = committed
        .iter()
        .filter_map(|e| match e.payload() {
            StoreEvent::StockItemSaved(saved) => Some(saved.item.id),
            _ => None,
        })
        .collect();
    (store, ids)
}

fn bench_place_order(c: &mut Criterion) {
    let mut group = c.benchmark_group("place_order");

    for store_size in [10usize, 100, 1000] {
        let id = BenchmarkId::new("three_lines", store_size);
        group.bench_with_input(id, &store_size, |b, &size| {
            let (mut store, ids) = setup_store(size);
            let request = OrderRequest::new("Bench Customer")
                .with_line(ids[0], 1)
                .with_line(ids[size / 2], 2)
                .with_line(ids[size - 1], 3);

            b.iter(|| {
                black_box(store.place_order(black_box(request.clone())).unwrap());
            });
        });
    }

    group.finish();
}

fn bench_dispatch_adjust(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch_adjust");
    group.throughput(Throughput::Elements(1));

    group.bench_function("adjust_quantity", |b| {
        let (mut store, ids) = setup_store(100);
        b.iter(|| {
            store
                .dispatch(StoreCommand::AdjustStockQuantity(AdjustStockQuantity {
                    item_id: ids[42],
                    delta: black_box(-1),
                }))
                .unwrap();
        });
    });

    group.finish();
}

fn bench_journal_replay(c: &mut Criterion) {
    let mut group = c.benchmark_group("journal_replay");

    for orders in [10usize, 100, 1000] {
        let (mut store, ids) = setup_store(10);
        for i in 0..orders {
            store
                .place_order(OrderRequest::new("Bench Customer").with_line(ids[i % ids.len()], 1))
                .unwrap();
        }

        group.throughput(Throughput::Elements(store.journal().len() as u64));
        group.bench_with_input(BenchmarkId::new("replay", orders), &store, |b, store| {
            b.iter(|| {
                let replayed = Snapshot::replay(store.config().delete_policy, store.journal());
                black_box(replayed.version());
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_place_order, bench_dispatch_adjust, bench_journal_replay);
criterion_main!(benches);

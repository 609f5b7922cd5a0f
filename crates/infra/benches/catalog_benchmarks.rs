use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use catalog_infra::{CategoryManager, InMemoryCatalogStore, ProductManager, SqliteCatalogStore};
use rust_decimal::Decimal;
use std::sync::Arc;
use tokio::runtime::Runtime;

fn runtime() -> Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

/// Seed `cats` categories and `items` products spread round-robin across them.
async fn seed<S>(categories: &CategoryManager<S>, products: &ProductManager<S>, cats: usize, items: usize)
where
    S: catalog_infra::CatalogStore,
{
    let mut ids = Vec::with_capacity(cats);
    for i in 0..cats {
        let c = categories.create(Some(&format!("Category {i}"))).await.unwrap();
        ids.push(catalog_core::Entity::id(&c));
    }
    for i in 0..items {
        products
            .create(
                Some(ids[i % ids.len()]),
                Some(&format!("Product {i}")),
                Some(Decimal::new(i as i64 * 101, 2)),
            )
            .await
            .unwrap();
    }
}

fn bench_product_create_latency(c: &mut Criterion) {
    let rt = runtime();
    let mut group = c.benchmark_group("product_create_latency");

    group.bench_function("in_memory", |b| {
        let store = Arc::new(InMemoryCatalogStore::new());
        let categories = CategoryManager::new(store.clone());
        let products = ProductManager::new(store);
        let category = rt.block_on(categories.create(Some("Bench"))).unwrap();
        let category_id = catalog_core::Entity::id(&category);

        b.iter(|| {
            black_box(
                rt.block_on(products.create(
                    Some(category_id),
                    Some("Widget"),
                    Some(Decimal::new(1999, 2)),
                ))
                .unwrap(),
            );
        });
    });

    group.bench_function("sqlite_memory", |b| {
        let store = Arc::new(rt.block_on(SqliteCatalogStore::connect("sqlite::memory:", 1)).unwrap());
        let categories = CategoryManager::new(store.clone());
        let products = ProductManager::new(store);
        let category = rt.block_on(categories.create(Some("Bench"))).unwrap();
        let category_id = catalog_core::Entity::id(&category);

        b.iter(|| {
            black_box(
                rt.block_on(products.create(
                    Some(category_id),
                    Some("Widget"),
                    Some(Decimal::new(1999, 2)),
                ))
                .unwrap(),
            );
        });
    });

    group.finish();
}

fn bench_product_list_resolution(c: &mut Criterion) {
    let rt = runtime();
    let mut group = c.benchmark_group("product_list_resolution");

    for size in [10usize, 100, 1000].iter() {
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::new("in_memory", size), size, |b, &size| {
            let store = Arc::new(InMemoryCatalogStore::new());
            let categories = CategoryManager::new(store.clone());
            let products = ProductManager::new(store);
            rt.block_on(seed(&categories, &products, 10, size));

            b.iter(|| {
                black_box(rt.block_on(products.list()).unwrap());
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_product_create_latency, bench_product_list_resolution);
criterion_main!(benches);

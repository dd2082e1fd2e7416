use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sentiment_web::server::records_to_csv;
use sentiment_web::{Sentiment, SentimentStore, SqliteStore};

fn populated_store(count: usize) -> SqliteStore {
    let store = SqliteStore::open_in_memory().unwrap();
    for i in 0..count {
        let sentiment = Sentiment::from_class_index(i % 3).unwrap();
        store
            .insert(&format!("Record number {}, with a comma and some text", i), sentiment)
            .unwrap();
    }
    store
}

fn bench_fetch_all(c: &mut Criterion) {
    let mut group = c.benchmark_group("Store");
    group.sample_size(50);
    group.warm_up_time(std::time::Duration::from_secs(1));

    for count in [100, 10_000] {
        let store = populated_store(count);
        group.bench_function(format!("fetch_all_{}", count), |b| {
            b.iter(|| black_box(store.fetch_all().unwrap()))
        });
    }

    group.bench_function("insert", |b| {
        let store = SqliteStore::open_in_memory().unwrap();
        b.iter(|| store.insert(black_box("I love this"), Sentiment::Positive).unwrap())
    });

    group.finish();
}

fn bench_csv_export(c: &mut Criterion) {
    let mut group = c.benchmark_group("Export");
    group.sample_size(50);

    let records = populated_store(10_000).fetch_all().unwrap();
    group.bench_function("csv_10000", |b| {
        b.iter(|| records_to_csv(black_box(&records)).unwrap())
    });

    group.finish();
}

criterion_group!(benches, bench_fetch_all, bench_csv_export);
criterion_main!(benches);

// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use gantry_model::{
    index::ItemId,
    item::{Item, TimeWindow},
};
use gantry_sim::policy::{
    baseline::BaselinePolicy, priority::PriorityPolicy, RetrievalPolicy,
};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::io;

/// Deterministic synthetic manifest, sorted by arrival start.
fn manifest(len: usize, seed: u64) -> Vec<Item> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut items = Vec::with_capacity(len);
    let mut arrival_start: i64 = 0;
    for id in 1..=len {
        arrival_start += rng.gen_range(0..3);
        let arrival_len = rng.gen_range(3..10);
        let delivery_start = arrival_start + rng.gen_range(1..15);
        let delivery_len = rng.gen_range(1..20);
        let item = Item::new(
            ItemId::new(id),
            rng.gen_range(1..=4),
            rng.gen_range(0..100),
            TimeWindow::new(arrival_start, arrival_start + arrival_len),
            TimeWindow::new(delivery_start, delivery_start + delivery_len),
        )
        .expect("generated item is valid");
        items.push(item);
    }
    items
}

fn run_policy<P: RetrievalPolicy>(mut policy: P, items: &[Item]) -> i64 {
    for item in items {
        policy
            .handle_arrival(item.clone())
            .expect("policy run failed");
    }
    policy.cash()
}

fn bench_policies(c: &mut Criterion) {
    let mut group = c.benchmark_group("policies");
    for len in [100usize, 1_000] {
        let items = manifest(len, 42);
        group.bench_with_input(BenchmarkId::new("baseline", len), &items, |b, items| {
            b.iter(|| {
                let policy =
                    BaselinePolicy::new(20, io::sink()).expect("yard wide enough");
                run_policy(policy, items)
            })
        });
        group.bench_with_input(BenchmarkId::new("priority", len), &items, |b, items| {
            b.iter(|| {
                let policy =
                    PriorityPolicy::new(34, io::sink()).expect("yard wide enough");
                run_policy(policy, items)
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_policies);
criterion_main!(benches);

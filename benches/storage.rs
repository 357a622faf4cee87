use criterion::{criterion_group, criterion_main, BatchSize, Bencher, Criterion};

use entpool::{Component, Entity, Storage};

type EntityType = u32;

const TIMES: &[usize] = &[10_000];

#[derive(Clone, Copy)]
struct Value(u64);
impl Component for Value {}

#[derive(Clone, Copy)]
struct Pinned(u64);
impl Component for Pinned {
	const IN_PLACE_DELETE: bool = true;
}

fn filled(times: usize) -> Storage<Value, EntityType> {
	let mut pool = Storage::new();
	for idx in 0..times {
		pool.emplace(<EntityType as Entity>::new(idx), Value(idx as u64));
	}
	pool
}

fn emplace(c: &mut Criterion) {
	let mut group = c.benchmark_group(format!(
		"emplace/{}",
		std::any::type_name::<Storage<Value, EntityType>>()
	));
	for &times in TIMES {
		group.bench_with_input(format!("{}", times), &times, |b: &mut Bencher<_>, &times| {
			b.iter_batched(
				Storage::<Value, EntityType>::new,
				|mut pool| {
					for idx in 0..times {
						pool.emplace(<EntityType as Entity>::new(idx), Value(idx as u64));
					}
					pool
				},
				BatchSize::PerIteration,
			);
		});
	}
	group.finish();
}

fn lookup(c: &mut Criterion) {
	let mut group = c.benchmark_group(format!(
		"lookup/{}",
		std::any::type_name::<Storage<Value, EntityType>>()
	));
	for &times in TIMES {
		let pool = filled(times);
		group.bench_with_input(format!("{}", times), &times, |b: &mut Bencher<_>, &times| {
			b.iter(|| {
				let mut total = 0u64;
				for idx in 0..times {
					total += pool.value(<EntityType as Entity>::new(idx)).0;
				}
				criterion::black_box(total)
			});
		});
	}
	group.finish();
}

fn iterate(c: &mut Criterion) {
	let mut group = c.benchmark_group(format!(
		"iterate/{}",
		std::any::type_name::<Storage<Value, EntityType>>()
	));
	for &times in TIMES {
		let pool = filled(times);
		group.bench_with_input(format!("{}", times), &times, |b: &mut Bencher<_>, _| {
			b.iter(|| {
				let total: u64 = pool.iter().map(|value| value.0).sum();
				criterion::black_box(total)
			});
		});
	}
	group.finish();
}

fn recycle(c: &mut Criterion) {
	let mut group = c.benchmark_group(format!(
		"recycle/{}",
		std::any::type_name::<Storage<Pinned, EntityType>>()
	));
	for &times in TIMES {
		group.bench_with_input(format!("{}", times), &times, |b: &mut Bencher<_>, &times| {
			b.iter_batched(
				|| {
					let mut pool = Storage::<Pinned, EntityType>::new();
					for idx in 0..times {
						pool.emplace(<EntityType as Entity>::new(idx), Pinned(0));
					}
					pool
				},
				|mut pool| {
					for idx in 0..times {
						pool.erase(<EntityType as Entity>::new(idx));
					}
					for idx in 0..times {
						pool.emplace(<EntityType as Entity>::new(idx), Pinned(1));
					}
					pool
				},
				BatchSize::PerIteration,
			);
		});
	}
	group.finish();
}

criterion_group! {
	benchmarks,
	emplace, lookup, iterate, recycle
}

criterion_main!(benchmarks);

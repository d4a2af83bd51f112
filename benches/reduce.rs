use criterion::{black_box, criterion_group, criterion_main, Criterion};

use xtree::{attribute_kinds, element_kinds, Node, Recording, Reducer};

element_kinds! {
	enum El {
		Section = "section",
		Item = "item",
	}
}

attribute_kinds! {
	enum At {
		Id = "id",
		Kind = "kind",
	}
}

fn deep_document(depth: usize) -> Recording {
	let mut rec = Recording::new();
	for _ in 0..depth {
		rec = rec
			.start_with("section", None, &[("kind", "nested")])
			.characters("\n  some   text\t");
	}
	for _ in 0..depth {
		rec = rec.end("section");
	}
	rec
}

fn wide_document(width: usize) -> Recording {
	let mut rec = Recording::new().start("section");
	for i in 0..width {
		let id = i.to_string();
		rec = rec
			.ignorable_whitespace("\n  ")
			.start_with("item", None, &[("id", id.as_str()), ("kind", "leaf")])
			.characters("item ")
			.cdata(&id)
			.end("item");
	}
	rec.end("section")
}

fn reduce(rec: Recording) -> Node<El, At> {
	Reducer::new().parse(&mut rec.into_replay()).unwrap()
}

fn reduce_perf(c: &mut Criterion) {
	let mut group = c.benchmark_group("reduce");
	let deep = deep_document(512);
	let wide = wide_document(4096);

	group.bench_function("deep", |b| b.iter(|| reduce(black_box(deep.clone()))));
	group.bench_function("wide", |b| b.iter(|| reduce(black_box(wide.clone()))));
	group.finish();
}

criterion_group!(benches, reduce_perf);
criterion_main!(benches);

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use shunting_core::{ShuntingDynamics, ShuntingParams};

fn bench_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("shunting_update");

    for &size in &[16usize, 64, 256] {
        let params = ShuntingParams::new(1.0, 1.0, -0.2)
            .unwrap()
            .with_lateral(2, 0.4, 5, 0.6)
            .unwrap()
            .with_self_excitation(0.3)
            .unwrap();
        let mut field = ShuntingDynamics::new(size, params).unwrap();
        let drive: Vec<f64> = (0..size).map(|i| (i % 7) as f64 * 0.1).collect();
        field.set_excitatory(&drive).unwrap();

        group.bench_function(format!("size_{size}"), |b| {
            b.iter(|| {
                black_box(field.update(0.001));
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_update);
criterion_main!(benches);

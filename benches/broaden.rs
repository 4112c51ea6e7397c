use criterion::{black_box, Criterion};

use vibspectra::{Gaussian, Lorentzian, SpectralConvolver, SpectralLine};

fn line_list(n: usize) -> Vec<SpectralLine> {
    (0..n)
        .map(|i| SpectralLine::new(200.0 + 37.3 * i as f64, 5.0 + (i % 7) as f64 * 3.0))
        .collect()
}

fn broadening(c: &mut Criterion) {
    let lines = line_list(90);
    let convolver = SpectralConvolver::new(8.0, 4000.0, 4000, 10.0);

    c.bench_function("broaden_lorentzian", |b| {
        b.iter(|| black_box(convolver.broaden(&lines, &Lorentzian).unwrap()))
    });

    c.bench_function("broaden_gaussian", |b| {
        b.iter(|| black_box(convolver.broaden(&lines, &Gaussian).unwrap()))
    });
}

criterion::criterion_group!(benches, broadening);
criterion::criterion_main!(benches);

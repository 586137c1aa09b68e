use criterion::{criterion_group, criterion_main, Criterion};
use fhe_core::{CrtContext, FftContext, NttContext, Polynomial};
use num_bigint::BigInt;

fn random_poly(degree: usize, bound: u64) -> Polynomial {
	let coeffs = fhe_core::sample_uniform(&BigInt::from(0), &BigInt::from(bound), degree).unwrap();
	Polynomial::new(degree, coeffs).unwrap()
}

fn bench_multiply_strategies(c: &mut Criterion) {
	// 12289 = 3 * 2^12 + 1 supports the negacyclic NTT up to degree 2048
	let degree = 1024;
	let ntt = NttContext::new(degree, 12289).unwrap();
	let fft = FftContext::new(8 * degree).unwrap();
	let a = random_poly(degree, 12289);
	let b = random_poly(degree, 12289);

	c.bench_function("ntt_multiply_1024", |bencher| {
		bencher.iter(|| a.multiply_ntt(&b, &ntt).unwrap())
	});
	c.bench_function("fft_multiply_1024", |bencher| {
		bencher.iter(|| a.multiply_fft(&b, &fft).unwrap())
	});

	let small_a = random_poly(64, 12289);
	let small_b = random_poly(64, 12289);
	c.bench_function("simple_multiply_64", |bencher| {
		bencher.iter(|| small_a.multiply(&small_b, Some(&BigInt::from(12289))).unwrap())
	});

	let crt = CrtContext::new(8, 59, 64).unwrap();
	c.bench_function("crt_multiply_64x8_primes", |bencher| {
		bencher.iter(|| small_a.multiply_crt(&small_b, &crt).unwrap())
	});
}

fn bench_ntt_transform(c: &mut Criterion) {
	let degree = 4096;
	let ntt = NttContext::new(degree, 0x3fffffff000001).unwrap();
	let coeffs: Vec<u64> = (0..degree as u64).collect();

	c.bench_function("ntt_forward_4096", |bencher| {
		bencher.iter(|| ntt.ftt_fwd(&coeffs).unwrap())
	});
}

criterion_group!(benches, bench_multiply_strategies, bench_ntt_transform);
criterion_main!(benches);

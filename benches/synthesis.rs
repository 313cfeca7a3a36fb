use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ndarray::Array2;
use spectroglyph::config::{SynthesisConfig, TextConfig};
use spectroglyph::field::render_text_field;
use spectroglyph::spectrogram::StftParams;
use spectroglyph::{AdditiveSynthesizer, LuminanceField, Spectrogram};

fn bench_config() -> SynthesisConfig {
    SynthesisConfig { duration: 1.0, ..SynthesisConfig::default() }
}

fn text_field(config: &SynthesisConfig) -> LuminanceField {
    render_text_field(&TextConfig::default(), config.width(), config.height).flipped_vertically()
}

fn synthesis(c: &mut Criterion) {
    let config = bench_config();
    let synth = AdditiveSynthesizer::new(&config).unwrap();
    let text = text_field(&config);
    let dense = LuminanceField::new(Array2::from_elem((config.height, config.width()), 0.5)).unwrap();

    c.bench_function("synthesize_text_1s", |b| b.iter(|| synth.synthesize(black_box(&text)).unwrap()));
    c.bench_function("synthesize_dense_1s", |b| b.iter(|| synth.synthesize(black_box(&dense)).unwrap()));
}

fn stft(c: &mut Criterion) {
    let config = bench_config();
    let synth = AdditiveSynthesizer::new(&config).unwrap();
    let mut wave = synth.synthesize(&text_field(&config)).unwrap();
    wave.normalize();
    let samples = wave.to_f32();

    c.bench_function("stft_1s", |b| {
        b.iter(|| Spectrogram::compute(black_box(&samples), config.sample_rate, StftParams::default()).unwrap())
    });
}

criterion_group!(benches, synthesis, stft);
criterion_main!(benches);

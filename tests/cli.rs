use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Small, fast synthesis settings shared by the encoding tests
const FAST: [&str; 6] = ["-d", "1", "-r", "16000", "--max-freq", "7000"];

fn spectroglyph(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("spectroglyph").unwrap();
    cmd.current_dir(dir.path());
    cmd
}

fn wav_len(path: &std::path::Path) -> u32 {
    hound::WavReader::open(path).unwrap().duration()
}

#[test]
fn image_without_path_is_a_usage_error() {
    let dir = TempDir::new().unwrap();
    spectroglyph(&dir)
        .arg("image")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn missing_image_reports_the_cause() {
    let dir = TempDir::new().unwrap();
    spectroglyph(&dir)
        .args(["image", "does_not_exist.png"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error").and(predicate::str::contains("does_not_exist.png")));
    assert!(!dir.path().join("message_cache_custom.wav").exists());
}

#[test]
fn undecodable_image_fails() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("junk.png"), b"definitely not a png").unwrap();
    spectroglyph(&dir)
        .args(["image", "junk.png"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Cannot load image"));
}

#[test]
fn text_writes_default_wav_without_plot() {
    let dir = TempDir::new().unwrap();
    spectroglyph(&dir)
        .arg("text")
        .args(FAST)
        .assert()
        .success()
        .stdout(predicate::str::contains("Encoding Complete"));

    assert_eq!(wav_len(&dir.path().join("message_cache_lisible.wav")), 16000);
    assert!(!dir.path().join("spectrogramme_custom.png").exists());
}

#[test]
fn text_with_custom_message_output_and_verify() {
    let dir = TempDir::new().unwrap();
    spectroglyph(&dir)
        .args(["text", "-m", "HELLO", "-o", "out/hello.wav", "--plot", "hello.png", "--verify", "--dpi", "50"])
        .args(FAST)
        .assert()
        .success()
        .stdout(predicate::str::contains("correlation"));

    assert_eq!(wav_len(&dir.path().join("out/hello.wav")), 16000);
    assert!(dir.path().join("hello.png").exists());
}

#[test]
fn image_writes_wav_and_plot() {
    let dir = TempDir::new().unwrap();
    let img = image::GrayImage::from_fn(64, 32, |x, _| image::Luma([if x < 32 { 255 } else { 0 }]));
    img.save(dir.path().join("input.png")).unwrap();

    spectroglyph(&dir)
        .args(["image", "input.png", "--dpi", "50", "--preview", "preview.png"])
        .args(FAST)
        .assert()
        .success();

    assert_eq!(wav_len(&dir.path().join("message_cache_custom.wav")), 16000);
    assert!(dir.path().join("spectrogramme_custom.png").exists());
    assert!(dir.path().join("preview.png").exists());
}

#[test]
fn no_plot_suppresses_image_plot() {
    let dir = TempDir::new().unwrap();
    image::GrayImage::from_pixel(8, 8, image::Luma([200])).save(dir.path().join("in.png")).unwrap();

    spectroglyph(&dir)
        .args(["image", "in.png", "--no-plot"])
        .args(FAST)
        .assert()
        .success();

    assert!(dir.path().join("message_cache_custom.wav").exists());
    assert!(!dir.path().join("spectrogramme_custom.png").exists());
}

#[test]
fn read_renders_spectrogram() {
    let dir = TempDir::new().unwrap();
    spectroglyph(&dir)
        .args(["text", "-o", "message_cache.wav"])
        .args(FAST)
        .assert()
        .success();

    spectroglyph(&dir)
        .args(["read", "--dpi", "50"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dominant frequency"));

    assert!(dir.path().join("spectrogram.png").exists());
}

#[test]
fn read_accepts_low_sample_rate_override() {
    let dir = TempDir::new().unwrap();
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 8000,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(dir.path().join("low.wav"), spec).unwrap();
    for n in 0..8000 {
        let x = (n as f32 * 2.0 * std::f32::consts::PI * 1000.0 / 8000.0).sin();
        writer.write_sample((x * 16000.0) as i16).unwrap();
    }
    writer.finalize().unwrap();

    // The default 8 kHz synthesis ceiling is above this rate's Nyquist frequency
    spectroglyph(&dir)
        .args(["read", "low.wav", "-r", "8000", "--dpi", "50"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dominant frequency"));

    assert!(dir.path().join("spectrogram.png").exists());
}

#[test]
fn read_missing_wav_fails() {
    let dir = TempDir::new().unwrap();
    spectroglyph(&dir)
        .args(["read", "nothing.wav"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("nothing.wav"));
}

#[test]
fn init_config_round_trips() {
    let dir = TempDir::new().unwrap();
    spectroglyph(&dir).arg("init-config").assert().success();

    let path = dir.path().join("spectroglyph.toml");
    let config = spectroglyph::Config::from_file(&path).unwrap();
    assert_eq!(config.synthesis.sample_rate, 44100);

    // A config file drives later runs
    std::fs::write(&path, "[synthesis]\nduration = 0.5\nsample_rate = 8000\nmax_freq = 3000.0\n").unwrap();
    spectroglyph(&dir)
        .args(["-c", "spectroglyph.toml", "text"])
        .assert()
        .success();
    assert_eq!(wav_len(&dir.path().join("message_cache_lisible.wav")), 4000);
}

#[test]
fn invalid_frequency_range_is_rejected() {
    let dir = TempDir::new().unwrap();
    spectroglyph(&dir)
        .args(["text", "-r", "16000", "--max-freq", "9000"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Nyquist"));
}

#[test]
fn help_exits_cleanly() {
    let dir = TempDir::new().unwrap();
    spectroglyph(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("image"));
}

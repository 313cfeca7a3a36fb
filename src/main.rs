//! Spectroglyph - Spectrogram Message Encoder

use std::path::{Path, PathBuf};
use std::process;
use anyhow::{Context, Result};
use clap::Parser;
use spectroglyph::config::EncodeArgs;
use spectroglyph::{init_logging, Cli, Command, Config, EncodePipeline, EncodeReport, FieldSource, ReadPipeline};

const TEXT_WAV: &str = "message_cache_lisible.wav";
const IMAGE_WAV: &str = "message_cache_custom.wav";
const IMAGE_PLOT: &str = "spectrogramme_custom.png";

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Help and version go to stdout and are not failures
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            process::exit(code);
        }
    };

    init_logging(cli.common.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    if cli.common.verbose {
        println!("{}", spectroglyph::get_library_info());
        println!();
    }

    if let Command::InitConfig { path } = &cli.command {
        Config::create_default_config(path)
            .with_context(|| format!("Cannot write {}", path.display()))?;
        println!("Default config written: {}", path.display());
        return Ok(());
    }

    // Each pipeline validates the sections it needs
    let mut config = Config::from_args(&cli.common)?;

    match cli.command {
        Command::Text { message, encode } => {
            if let Some(message) = message {
                config.text.message = message;
            }
            let source = FieldSource::Text(config.text.clone());
            let plot = plot_path(&encode, None);
            encode_source(config, &source, &encode, TEXT_WAV, plot, "Spectrogram (readable text)")
        }
        Command::Image { image, encode } => {
            let source = FieldSource::Image(image);
            let plot = plot_path(&encode, Some(IMAGE_PLOT));
            encode_source(config, &source, &encode, IMAGE_WAV, plot, "Spectrogram of your image")
        }
        Command::Read { input, output } => {
            println!("=== Spectroglyph Reader ===");
            println!("Input: {}", input.display());
            println!("Plot: {}", output.display());
            println!("===========================\n");

            let report = ReadPipeline::new(config)?.run(&input, &output)?;

            println!("=== Read Complete ===");
            println!("Audio: {:.2}s, {}Hz, {}ch", report.duration, report.sample_rate, report.channels);
            println!("Frames: {}", report.frames);
            println!("Dominant frequency: {:.1} Hz", report.dominant_frequency);
            println!("Time: {:.2}s", report.processing_time.as_secs_f64());
            Ok(())
        }
        Command::InitConfig { .. } => Ok(()),
    }
}

/// `--no-plot` wins, then `--plot`, then the command's default
fn plot_path(encode: &EncodeArgs, default: Option<&str>) -> Option<PathBuf> {
    if encode.no_plot {
        return None;
    }
    encode.plot.clone().or_else(|| default.map(PathBuf::from))
}

fn encode_source(
    config: Config,
    source: &FieldSource,
    encode: &EncodeArgs,
    default_wav: &str,
    plot: Option<PathBuf>,
    title: &str,
) -> Result<()> {
    let wav = encode.output.clone().unwrap_or_else(|| PathBuf::from(default_wav));

    println!("=== Spectroglyph Encoder ===");
    println!("Source: {}", source.describe());
    println!("Output: {}", wav.display());
    println!("Band: {:.0}-{:.0} Hz, {:.2}s @ {}Hz",
             config.synthesis.min_freq, config.synthesis.max_freq,
             config.synthesis.duration, config.synthesis.sample_rate);
    println!("============================\n");

    let pipeline = EncodePipeline::new(config)?
        .with_plot_title(title)
        .with_verification(encode.verify);
    let report = pipeline
        .run_source(source, &wav, plot.as_deref(), encode.preview.as_deref())
        .with_context(|| format!("Encoding {} failed", source.describe()))?;

    print_encode_report(&report, encode.preview.as_deref());
    Ok(())
}

fn print_encode_report(report: &EncodeReport, preview: Option<&Path>) {
    println!("=== Encoding Complete ===");
    println!("Field: {}x{} ({} lit rows)", report.field_width, report.field_height, report.lit_rows);
    println!("Samples: {} ({:.2}s)", report.samples, report.duration);
    if report.normalization.applied {
        println!("Peak before normalization: {:.4}", report.normalization.peak);
    } else {
        println!("Silent field, audio left unnormalized");
    }
    println!("WAV: {}", report.wav_path.display());
    if let Some(plot) = &report.plot_path {
        println!("Plot: {}", plot.display());
    }
    if let Some(preview) = preview {
        println!("Preview: {}", preview.display());
    }
    if let Some(r) = report.correlation {
        println!("Field/spectrogram correlation: {:.3}", r);
    }
    println!("Time: {:.2}s", report.processing_time.as_secs_f64());
    println!("RTF: {:.3}", report.real_time_factor);
}

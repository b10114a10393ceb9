//! parazip - multi-threaded DEFLATE ZIP writer.
//!
//! Compresses one or more source files into a single ZIP archive, buffered
//! entirely in memory and written in one pass.

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use parazip_archive::{CompressionMethod, ZipEntry, ZipWriter};
use parazip_core::Progress;
use parazip_deflate::{CodingMode, DeflateOptions, Lz77Level};
use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

#[derive(Parser)]
#[command(name = "parazip")]
#[command(version, about = "Multi-threaded DEFLATE ZIP writer")]
struct Cli {
    /// The filename of the resulting archive
    target: PathBuf,

    /// The source files to be compressed
    #[arg(required = true)]
    source: Vec<PathBuf>,

    /// Compression method: store | deflate
    #[arg(short = 'm', long, default_value = "deflate")]
    method: String,

    /// LZ77 effort level
    #[arg(short = 'l', long, default_value_t = 2, value_parser = clap::value_parser!(u32).range(0..=3))]
    level: u32,

    /// Number of worker threads used for deflate
    #[arg(short = 't', long = "thread")]
    thread: Option<usize>,

    /// Use fixed-Huffman coding in deflate
    #[arg(long = "deflate_static")]
    deflate_static: bool,

    /// Verbose mode
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let method = CompressionMethod::from_name(&cli.method)?;
    let workers = cli.thread.unwrap_or_else(num_cpus::get).max(1);
    let options = DeflateOptions {
        mode: if cli.deflate_static {
            CodingMode::Fixed
        } else {
            CodingMode::Dynamic
        },
        level: Lz77Level::new(cli.level)?,
        workers,
    };

    if cli.verbose && method == CompressionMethod::Deflate {
        eprintln!("deflate: {workers} worker(s), LZ77 level {}", cli.level);
    }

    let started = Instant::now();
    let mut writer = ZipWriter::new();
    for path in &cli.source {
        let total = fs::metadata(path)?.len();
        let bar = create_progress_bar(total, method == CompressionMethod::Deflate);
        bar.set_message(path.display().to_string());

        // Compression runs off-thread; this thread only polls the counter.
        let progress = Progress::new();
        let entry = std::thread::scope(|scope| {
            let worker = scope.spawn(|| ZipEntry::from_file(path, method, &options, &progress));
            while !worker.is_finished() {
                bar.set_position(progress.total());
                std::thread::sleep(Duration::from_millis(50));
            }
            worker.join().expect("compression worker panicked")
        })?;
        bar.finish_and_clear();

        if cli.verbose {
            eprintln!(
                "{}: {} -> {} bytes",
                entry.name(),
                entry.uncompressed_size(),
                entry.compressed_size(),
            );
        }
        writer.add_entry(entry);
    }

    writer.write_to(&cli.target)?;

    if cli.verbose {
        eprintln!(
            "wrote {} ({} entries) in {:.2}s",
            cli.target.display(),
            writer.entry_count(),
            started.elapsed().as_secs_f64(),
        );
    }
    Ok(())
}

/// Progress bar with standard styling; hidden when compression is trivial.
fn create_progress_bar(len: u64, enable: bool) -> ProgressBar {
    if !enable || len == 0 {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:30.cyan/blue}] {bytes}/{total_bytes} {msg}")
            .expect("progress bar template is valid")
            .progress_chars("=> "),
    );
    pb
}

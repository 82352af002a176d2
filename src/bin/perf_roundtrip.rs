use std::hint::black_box;

use anyhow::ensure;
use clap::Parser;
use rand::Rng;
use huffman_rust::{utils::Timer, Transcoder};

#[derive(Parser, Debug)]
#[command(about = "Time Huffman encoding and decoding of random skewed inputs")]
struct Args {
    /// Bytes per generated input
    #[arg(short, long, default_value_t = 1 << 20)]
    size: usize,
    /// Number of distinct byte values drawn from (1..=256)
    #[arg(short, long, default_value_t = 64)]
    alphabet: usize,
    /// Number of inputs to generate
    #[arg(short, long, default_value_t = 5)]
    runs: usize,
}

/// Smaller symbols are drawn more often: the minimum of two uniform draws.
fn gen_input(size: usize, alphabet: usize) -> Vec<u8> {
    let mut rng = rand::thread_rng();
    (0..size)
        .map(|_| rng.gen_range(0..alphabet).min(rng.gen_range(0..alphabet)) as u8)
        .collect()
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    ensure!((1..=256).contains(&args.alphabet), "the alphabet must hold between 1 and 256 symbols");

    let transcoder = Transcoder::new();
    let mut enc_timer = Timer::new();
    let mut dec_timer = Timer::new();
    let mut container_bytes = 0;

    for _ in 0..args.runs {
        let input = gen_input(args.size, args.alphabet);

        let mut container = Vec::new();
        let stats = enc_timer.time(|| transcoder.encode(&input, &mut container))?;
        container_bytes += stats.output_bytes;

        let mut output = Vec::with_capacity(input.len());
        dec_timer.time(|| transcoder.decode(black_box(&container[..]), &mut output))?;

        ensure!(output == input, "round trip mismatch");
    }

    let total_bytes = (args.size * args.runs) as f64;
    println!("mean encode time {}ns", enc_timer.mean());
    println!("mean decode time {}ns", dec_timer.mean());
    println!("encode throughput {:.2} MB/s", total_bytes / enc_timer.total_time.max(1) as f64 * 1e3);
    println!("decode throughput {:.2} MB/s", total_bytes / dec_timer.total_time.max(1) as f64 * 1e3);
    println!("compression ratio {:.4}", container_bytes as f64 / total_bytes);

    Ok(())
}

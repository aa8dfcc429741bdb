use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

use clk_core::{
    consts::{DEFAULT_K, DEFAULT_M, DEFAULT_Q, DEFAULT_SAMPLE_SIZE, DEFAULT_SEED},
    mask_words_with_frequency, optimal_k, run_attack,
    table::{
        load_encoded_table, load_plaintext_table, load_word_column, write_attack_results,
        write_encoded_table,
    },
    AttackConfig, EarlyExitPolicy, EncodingParams, MaskingParams, Summary,
};

#[derive(Parser)]
#[command(name = "clk", version, about = "Frequency attack on Bloom-filter encodings (CLKs)")]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum ReportFormat {
    Human,
    Csv,
    Json,
}

#[derive(Subcommand)]
enum Cmd {
    /// Draw a masked CLK table from a word frequency table
    Encode {
        /// word,frequency rows
        words: PathBuf,
        /// output: base64 CLK,count,word rows
        output: PathBuf,
        /// amount of words to mask
        #[arg(short = 'n', default_value_t = DEFAULT_SAMPLE_SIZE)]
        n: usize,
        /// token size
        #[arg(short = 'q', default_value_t = DEFAULT_Q)]
        q: usize,
        /// bloom filter size
        #[arg(short = 'm', default_value_t = DEFAULT_M)]
        m: usize,
        /// amount of hash values
        #[arg(short = 'k', default_value_t = DEFAULT_K)]
        k: usize,
        /// seed for rng-based operations
        #[arg(short = 's', default_value_t = DEFAULT_SEED)]
        seed: u64,
    },

    /// Re-identify CLKs from a word frequency table
    Attack {
        /// word,frequency rows
        words: PathBuf,
        /// base64 CLK,frequency,word rows
        clks: PathBuf,
        /// output: word,candidates rows
        output: PathBuf,
        /// token size
        #[arg(short = 'q', default_value_t = DEFAULT_Q)]
        q: usize,
        /// keep scanning set bits after a singleton diagnostic set
        #[arg(long, default_value_t = false)]
        exhaustive: bool,
        #[arg(long, value_enum, default_value_t = ReportFormat::Human)]
        format: ReportFormat,
        /// single-line CSV summary (same as --format csv)
        #[arg(long, default_value_t = false)]
        stdout_csv: bool,
    },

    /// Print the false-positive optimal hash count for a word list
    OptimalK {
        /// one word per row; further columns are ignored
        words: PathBuf,
        /// bloom filter size
        #[arg(short = 'm', default_value_t = DEFAULT_M)]
        m: usize,
        /// token size
        #[arg(short = 'q', default_value_t = DEFAULT_Q)]
        q: usize,
    },
}

fn create_output(path: &Path) -> Result<BufWriter<File>> {
    let f = File::create(path).with_context(|| format!("create {}", path.display()))?;
    Ok(BufWriter::new(f))
}

fn print_summary(summary: &Summary, format: ReportFormat) -> Result<()> {
    match format {
        ReportFormat::Human => println!("{summary}"),
        ReportFormat::Csv => println!("{}", summary.to_csv_line()),
        ReportFormat::Json => println!("{}", summary.to_json()?),
    }
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.cmd {
        Cmd::Encode { words, output, n, q, m, k, seed } => {
            let params = MaskingParams { n, seed, encoding: EncodingParams { m, q, k } };
            let table = load_plaintext_table(&words)
                .with_context(|| format!("read {}", words.display()))?;
            let masked = mask_words_with_frequency(&table, &params)?;

            let mut out = create_output(&output)?;
            write_encoded_table(&mut out, &masked)?;
            out.flush()?;
            info!(rows = masked.len(), output = %output.display(), "wrote masked table");
        }
        Cmd::Attack { words, clks, output, q, exhaustive, format, stdout_csv } => {
            let early_exit = if exhaustive {
                EarlyExitPolicy::Exhaustive
            } else {
                EarlyExitPolicy::SingletonDiagnostic
            };
            let config = AttackConfig { q, early_exit };
            let plain = load_plaintext_table(&words)
                .with_context(|| format!("read {}", words.display()))?;
            let encoded = load_encoded_table(&clks)
                .with_context(|| format!("read {}", clks.display()))?;

            let results = run_attack(&plain, &encoded, config)?;

            let mut out = create_output(&output)?;
            write_attack_results(&mut out, &results)?;
            out.flush()?;

            let format = if stdout_csv { ReportFormat::Csv } else { format };
            print_summary(&Summary::from_results(&results), format)?;
        }
        Cmd::OptimalK { words, m, q } => {
            let list = load_word_column(&words)
                .with_context(|| format!("read {}", words.display()))?;
            let k = optimal_k(list.iter().map(String::as_str), m, q)?;
            println!("{k}");
        }
    }
    Ok(())
}

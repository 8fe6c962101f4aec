use std::fs::File;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use slog::{debug, info, o, warn, Drain, Level, Logger};

use gindex_merkle::{
    dump, dump_subtree, merkleize, parse_gindex_list, Gindex, Multiproof, Node, Sha256Hasher,
    TreeError, WitnessPlan,
};

#[derive(Parser, Debug)]
#[clap(name = "gindex-merkle")]
#[clap(
    about = "Builds merkle multiproofs and dumps merkle trees of binary data, addressed by generalized indices.",
    long_about = None
)]
#[command(version)]
struct Args {
    #[clap(subcommand)]
    command: Commands,

    /// Verbosity level (-v=warning, -vv=info, -vvv=debug, -vvvv=trace).
    #[clap(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Enable JSON output for logs
    #[clap(long, global = true)]
    log_format_json: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the root, the requested nodes and the witnesses needed to prove them
    Proof {
        #[clap(flatten)]
        input: InputArgs,

        /// Comma separated list of generalized indices, in any base (`12`, `0xc`, `0b1100`)
        #[clap(long)]
        gindices: GindexList,

        /// Recompute the root from the printed nodes and check it
        #[clap(long)]
        verify: bool,
    },
    /// Dump the merkle tree as JSON
    Tree {
        #[clap(flatten)]
        input: InputArgs,

        /// Only dump the subtree at this generalized index
        #[clap(long)]
        gindex: Option<Gindex>,
    },
    /// Print the merkle root
    Root {
        #[clap(flatten)]
        input: InputArgs,
    },
}

#[derive(clap::Args, Debug)]
struct InputArgs {
    /// Input file, `-` for standard input
    #[clap(default_value = "-")]
    input: PathBuf,

    /// Input encoding
    #[clap(long, value_enum, env = "GINDEX_MERKLE_FORMAT", default_value_t = InputFormat::Bin)]
    format: InputFormat,

    /// Depth of the chunk level, defaults to the smallest depth fitting the input
    #[clap(long, env = "GINDEX_MERKLE_DEPTH")]
    depth: Option<u32>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum InputFormat {
    /// Raw bytes
    Bin,
    /// Hexadecimal text, optionally `0x` prefixed
    Hex,
}

#[derive(Debug, Clone)]
struct GindexList(Vec<Gindex>);

impl FromStr for GindexList {
    type Err = TreeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_gindex_list(s).map(Self)
    }
}

impl InputArgs {
    fn read(&self) -> anyhow::Result<Vec<u8>> {
        let mut raw = Vec::new();
        if self.input.as_os_str() == "-" {
            io::stdin()
                .read_to_end(&mut raw)
                .context("Can not read standard input")?;
        } else {
            File::open(&self.input)
                .and_then(|mut file| file.read_to_end(&mut raw))
                .with_context(|| format!("Can not read input file: {}", self.input.display()))?;
        }
        match self.format {
            InputFormat::Bin => Ok(raw),
            InputFormat::Hex => decode_hex(&raw),
        }
    }

    fn load_tree(&self, logger: &Logger) -> anyhow::Result<Node<32>> {
        let data = self.read()?;
        let tree = merkleize(&data, self.depth, &Sha256Hasher)?;
        debug!(logger, "Merkleized input"; "bytes" => data.len(), "depth" => ?self.depth);
        Ok(tree)
    }
}

fn decode_hex(raw: &[u8]) -> anyhow::Result<Vec<u8>> {
    let text = std::str::from_utf8(raw).context("Hex input is not valid UTF-8")?;
    let digits: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    let digits = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
        .unwrap_or(&digits);
    hex::decode(digits).context("Can not decode hex input")
}

impl Args {
    fn execute(&self, logger: &Logger) -> anyhow::Result<()> {
        debug!(logger, "gindex-merkle version: {}", env!("CARGO_PKG_VERSION"));
        let hasher = Sha256Hasher;
        let stdout = io::stdout();
        match &self.command {
            Commands::Proof {
                input,
                gindices,
                verify,
            } => {
                let tree = input.load_tree(logger)?;
                let plan = WitnessPlan::new(gindices.0.iter().copied());
                debug!(
                    logger,
                    "Computed witnesses";
                    "targets" => plan.targets().len(),
                    "interest" => plan.interest().len(),
                    "witnesses" => plan.witnesses().len()
                );
                let proof = Multiproof::from_plan(&tree, &plan, &hasher);
                for entry in proof.entries().filter(|entry| entry.value.is_none()) {
                    warn!(logger, "Node not available"; "role" => %entry.role, "gindex" => %entry.gindex);
                }
                write!(stdout.lock(), "{}", proof)?;
                if *verify {
                    proof
                        .verify(&proof.root(), &hasher)
                        .context("Multiproof verification failed")?;
                    info!(logger, "Multiproof verified");
                    writeln!(stdout.lock(), "verified: ok")?;
                }
            }
            Commands::Tree { input, gindex } => {
                let tree = input.load_tree(logger)?;
                // merkleize upfront, the dump only reads cached roots afterwards
                let root = tree.merkle_root(&hasher);
                debug!(logger, "Dumping tree"; "root" => hex::encode(root), "gindex" => ?gindex);
                let view = match gindex {
                    Some(gindex) => dump_subtree(&tree, *gindex, &hasher),
                    None => dump(&tree, &hasher),
                }
                .context("Can not dump tree")?;
                view.write_json(stdout.lock())?;
            }
            Commands::Root { input } => {
                let tree = input.load_tree(logger)?;
                writeln!(
                    stdout.lock(),
                    "0x{}",
                    hex::encode(tree.merkle_root(&hasher))
                )?;
            }
        }
        Ok(())
    }

    fn log_level(&self) -> Level {
        match self.verbose {
            0 => Level::Error,
            1 => Level::Warning,
            2 => Level::Info,
            3 => Level::Debug,
            _ => Level::Trace,
        }
    }

    fn build_logger(&self) -> Logger {
        let drain = if self.log_format_json {
            let drain = slog_bunyan::with_name("gindex-merkle", io::stderr())
                .set_pretty(false)
                .build()
                .fuse();
            let drain = slog::LevelFilter::new(drain, self.log_level()).fuse();
            slog_async::Async::new(drain).build().fuse()
        } else {
            let decorator = slog_term::TermDecorator::new().stderr().build();
            let drain = slog_term::CompactFormat::new(decorator).build().fuse();
            let drain = slog::LevelFilter::new(drain, self.log_level()).fuse();
            slog_async::Async::new(drain).build().fuse()
        };

        Logger::root(Arc::new(drain), o!())
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    let logger = args.build_logger();
    let result = args.execute(&logger);
    // flush the async drain before reporting
    drop(logger);
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("Error: {error:?}");
            ExitCode::FAILURE
        }
    }
}

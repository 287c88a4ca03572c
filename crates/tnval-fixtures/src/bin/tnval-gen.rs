use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::{ArgAction, Parser};
use flexi_logger::{Logger, opt_format};
use log::{LevelFilter, info};
use tnval_fixtures::{Plan, generate};

/// Generate seeded tensor contraction validation headers.
#[derive(Debug, Parser)]
#[command(version, about, long_about=None)]
struct Cli {
    /// Seed of the random generator.
    #[arg(long, default_value_t = 9457)]
    seed: u64,
    /// Directory the headers are written to.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
    /// TOML plan overriding the built-in one.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Print the headers to stdout instead of writing files.
    #[arg(long)]
    dry_run: bool,
    /// Raise log verbosity; repeat for more.
    #[arg(short, action = ArgAction::Count)]
    verbose: u8,
}

fn level(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _logger = Logger::with(level(cli.verbose))
        .format(opt_format)
        .log_to_stderr()
        .start()?;

    let plan = match &cli.config {
        Some(path) => {
            info!("loading plan from {}", path.display());
            Plan::load(path).with_context(|| format!("reading plan {}", path.display()))?
        }
        None => Plan::default(),
    };

    let fixtures = generate(&plan, cli.seed)?;
    if cli.dry_run {
        let mut out = BufWriter::new(io::stdout().lock());
        fixtures.render_all(&mut out)?;
        out.flush()?;
        return Ok(());
    }

    std::fs::create_dir_all(&cli.out_dir)
        .with_context(|| format!("creating {}", cli.out_dir.display()))?;
    for path in fixtures.write_all(&cli.out_dir)? {
        println!("{}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["tnval-gen"]).unwrap();
        assert_eq!(cli.seed, 9457);
        assert_eq!(cli.out_dir, PathBuf::from("."));
        assert_eq!(cli.config, None);
        assert!(!cli.dry_run);
        assert_eq!(cli.verbose, 0);
        assert_eq!(level(cli.verbose), LevelFilter::Warn);
    }

    #[test]
    fn test_flags() {
        let cli = Cli::try_parse_from([
            "tnval-gen",
            "--seed",
            "7",
            "--out-dir",
            "gen",
            "--config",
            "plan.toml",
            "--dry-run",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.seed, 7);
        assert_eq!(cli.out_dir, PathBuf::from("gen"));
        assert_eq!(cli.config, Some(PathBuf::from("plan.toml")));
        assert!(cli.dry_run);
        assert_eq!(cli.verbose, 2);
        assert_eq!(level(cli.verbose), LevelFilter::Debug);
    }

    #[test]
    fn test_verbosity_saturates_at_trace() {
        let cli = Cli::try_parse_from(["tnval-gen", "-v", "-v", "-v", "-v"]).unwrap();
        assert_eq!(cli.verbose, 4);
        assert_eq!(level(1), LevelFilter::Info);
        assert_eq!(level(cli.verbose), LevelFilter::Trace);
    }

    #[test]
    fn test_rejects_bad_seed() {
        assert!(Cli::try_parse_from(["tnval-gen", "--seed", "-3"]).is_err());
        assert!(Cli::try_parse_from(["tnval-gen", "--seed", "abc"]).is_err());
    }
}

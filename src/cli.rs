extern crate clap;

use std::{num::NonZeroU64, path::PathBuf, time::Duration};

use clap::{Parser, Subcommand, ValueEnum};
use corpus_engine::{EngineOptions, Norm, TokenizerKind};

use crate::config::{Bm25Overrides, Settings};

#[derive(Debug, Parser)]
#[command(name = "corpora", version, about = "Multi-corpus BM25 session service")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Log filter used when RUST_LOG is unset.
    #[arg(long, global = true, env = "CORPORA_LOG", default_value = "info")]
    pub log: String,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Answer JSON-line requests from a script file or stdin.
    Run(Run),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum NormArg {
    None,
    L1,
    L2,
}

impl From<NormArg> for Norm {
    fn from(value: NormArg) -> Self {
        match value {
            NormArg::None => Norm::None,
            NormArg::L1 => Norm::L1,
            NormArg::L2 => Norm::L2,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum TokenizerArg {
    Standard,
    Whitespace,
    Html,
}

impl From<TokenizerArg> for TokenizerKind {
    fn from(value: TokenizerArg) -> Self {
        match value {
            TokenizerArg::Standard => TokenizerKind::Standard,
            TokenizerArg::Whitespace => TokenizerKind::Whitespace,
            TokenizerArg::Html => TokenizerKind::Html,
        }
    }
}

#[derive(Debug, Parser)]
pub struct Run {
    #[arg(long, short = 's', env = "CORPORA_SCRIPT")]
    pub script: Option<PathBuf>,

    #[arg(long, env = "CORPORA_K1")]
    pub k1: Option<f64>,

    #[arg(long, env = "CORPORA_B")]
    pub b: Option<f64>,

    #[arg(long, env = "CORPORA_K")]
    pub k: Option<f64>,

    #[arg(long, value_enum, env = "CORPORA_NORM")]
    pub norm: Option<NormArg>,

    #[arg(long, env = "CORPORA_PRECISION")]
    pub precision: Option<u32>,

    #[arg(long, value_enum, env = "CORPORA_TOKENIZER", default_value_t = TokenizerArg::Standard)]
    pub tokenizer: TokenizerArg,

    #[arg(long, env = "CORPORA_STOPWORDS")]
    pub stopwords: bool,

    #[arg(long, env = "CORPORA_LOCK_TIMEOUT_MS")]
    pub lock_timeout_ms: Option<NonZeroU64>,
}

impl Run {
    pub fn settings(&self) -> Settings {
        let overrides = Bm25Overrides {
            k1: self.k1,
            b: self.b,
            k: self.k,
            norm: self.norm.map(Norm::from),
            precision: self.precision,
        };

        Settings {
            bm25: overrides.apply(Default::default()),
            engine: EngineOptions {
                tokenizer: self.tokenizer.into(),
                stopwords: self.stopwords,
            },
            lock_timeout: self
                .lock_timeout_ms
                .map(|millis| Duration::from_millis(millis.get())),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use clap::Parser;
    use corpus_engine::{Norm, TokenizerKind};

    use super::{Cli, Command};

    #[test]
    fn test_cli_run_settings() {
        let cli = Cli::try_parse_from([
            "corpora",
            "run",
            "--b",
            "0.5",
            "--norm",
            "l2",
            "--tokenizer",
            "whitespace",
            "--stopwords",
            "--lock-timeout-ms",
            "250",
        ])
        .unwrap();

        let Command::Run(run) = cli.command;
        let settings = run.settings();

        assert_eq!(settings.bm25.b, 0.5);
        assert_eq!(settings.bm25.k1, 1.2);
        assert_eq!(settings.bm25.norm, Norm::L2);
        assert_eq!(settings.engine.tokenizer, TokenizerKind::Whitespace);
        assert!(settings.engine.stopwords);
        assert_eq!(settings.lock_timeout, Some(Duration::from_millis(250)));
    }

    #[test]
    fn test_cli_rejects_zero_timeout() {
        assert!(Cli::try_parse_from(["corpora", "run", "--lock-timeout-ms", "0"]).is_err());
    }
}

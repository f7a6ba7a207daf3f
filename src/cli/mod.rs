use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use std::io;
use std::path::PathBuf;
use tracing::info;

use crate::application::{LocalIdentityProvider, Session};
use crate::config::Settings;
use crate::domain::{Currency, Frequency, TransactionKind};
use crate::io::{Snapshot, load_seed_file};
use crate::logging::init_tracing;
use crate::storage::{Ledger, Tracker};

mod repl;

pub use repl::{LoopControl, Repl};

/// Pitaka - Personal Finance Ledger and Savings Challenges
#[derive(Parser, Debug)]
#[command(name = "pitaka")]
#[command(about = "Track income, expenses and savings challenges from an interactive prompt")]
#[command(version)]
pub struct Cli {
    /// Settings file (JSON)
    #[arg(short, long, env = "PITAKA_CONFIG")]
    pub config: Option<PathBuf>,

    /// Seed the session from a snapshot (.json) or transactions (.csv) file
    #[arg(short, long, env = "PITAKA_SEED", conflicts_with = "sample")]
    pub seed: Option<PathBuf>,

    /// Seed the session with demo transactions and challenges
    #[arg(long)]
    pub sample: bool,

    /// Display currency code (PHP, USD, EUR, GBP, JPY, CAD, AUD)
    #[arg(long, value_parser = parse_currency)]
    pub currency: Option<Currency>,

    /// Enable verbose logging on stderr
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        init_tracing(self.verbose);

        let settings = self.settings()?;
        let (ledger, tracker) = self.seed_stores(&settings)?;

        let session = Session::with_stores(Box::new(LocalIdentityProvider::new()), ledger, tracker);
        info!(currency = %settings.currency, "Session started");

        let mut repl = Repl::new(session, settings);
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        repl.run(stdin.lock(), &mut stdout)
    }

    /// Settings from the config file (or defaults), with flags applied on top.
    pub fn settings(&self) -> Result<Settings> {
        let mut settings = match &self.config {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };

        if let Some(currency) = self.currency {
            settings.currency = currency;
        }
        if let Some(seed) = &self.seed {
            settings.seed = Some(seed.clone());
        }
        Ok(settings)
    }

    fn seed_stores(&self, settings: &Settings) -> Result<(Ledger, Tracker)> {
        let snapshot = if self.sample {
            Snapshot::sample(Utc::now())
        } else if let Some(path) = &settings.seed {
            load_seed_file(path)?
        } else {
            return Ok((Ledger::new(), Tracker::new()));
        };

        snapshot.into_stores().context("Seed data is inconsistent")
    }
}

fn parse_currency(s: &str) -> Result<Currency, String> {
    Currency::from_code(s).ok_or_else(|| {
        let codes: Vec<&str> = Currency::ALL.iter().map(|c| c.code()).collect();
        format!("unknown currency '{}', expected one of {}", s, codes.join(", "))
    })
}

fn parse_kind(s: &str) -> Result<TransactionKind, String> {
    TransactionKind::from_str(s).ok_or_else(|| format!("expected 'income' or 'expense', got '{}'", s))
}

fn parse_frequency(s: &str) -> Result<Frequency, String> {
    Frequency::from_str(s)
        .ok_or_else(|| format!("expected 'daily', 'weekly' or 'monthly', got '{}'", s))
}

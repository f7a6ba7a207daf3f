use anyhow::{Context, Result, anyhow, bail};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use tracing::debug;

use crate::application::Session;
use crate::config::Settings;
use crate::domain::{
    ChallengeDraft, ChallengeId, Frequency, SavingsChallenge, Transaction, TransactionKind,
    categories, days_until, find_category, find_category_by_name, format_date, format_date_time,
    format_money, format_time_ago, parse_cents, parse_date, truncate_note,
};
use crate::io::Exporter;

use super::{parse_frequency, parse_kind};

/// One line typed at the prompt.
#[derive(Parser, Debug)]
#[command(no_binary_name = true, disable_version_flag = true)]
struct Line {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create an account and sign in
    Signup { email: String, password: String },

    /// Sign in to an existing account
    Login { email: String, password: String },

    /// Sign out
    Logout,

    /// Record an income or expense
    Add {
        /// income or expense
        #[arg(value_parser = parse_kind)]
        kind: TransactionKind,

        /// Amount (e.g., "45.50" or "1,200")
        amount: String,

        /// Category id or name (see `categories`)
        #[arg(short, long)]
        category: String,

        #[arg(short, long)]
        note: Option<String>,
    },

    /// Show all transactions, most recent first
    List,

    /// Show the latest transactions
    Recent {
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Find transactions by category name or note
    Search { query: Vec<String> },

    /// Show total income, expenses and balance
    Summary,

    /// Break income or expenses down by category
    Report {
        #[arg(value_parser = parse_kind, default_value = "expense")]
        kind: TransactionKind,
    },

    /// List the categories available for a kind
    Categories {
        #[arg(value_parser = parse_kind, default_value = "expense")]
        kind: TransactionKind,
    },

    /// Savings challenge commands
    #[command(subcommand)]
    Challenge(ChallengeCommand),

    /// Write transactions (.csv) or a full snapshot (.json) to a file
    Export { path: PathBuf },

    /// Leave the prompt
    #[command(alias = "exit")]
    Quit,
}

#[derive(Subcommand, Debug)]
enum ChallengeCommand {
    /// Start a new savings challenge
    Create {
        name: String,

        /// Goal amount
        goal: String,

        /// Finish date (YYYY-MM-DD)
        #[arg(long)]
        finish: String,

        /// daily, weekly or monthly
        #[arg(short, long, value_parser = parse_frequency, default_value = "monthly")]
        frequency: Frequency,

        #[arg(long)]
        icon: Option<String>,

        #[arg(long)]
        color: Option<String>,

        #[arg(short, long)]
        description: Option<String>,
    },

    /// Change a challenge; omitted options keep their current value
    Edit {
        /// Challenge number from `challenge list` (`@N` or `N`), or id prefix
        challenge: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        goal: Option<String>,

        #[arg(long)]
        finish: Option<String>,

        #[arg(short, long, value_parser = parse_frequency)]
        frequency: Option<Frequency>,

        #[arg(long)]
        icon: Option<String>,

        #[arg(long)]
        color: Option<String>,

        #[arg(short, long)]
        description: Option<String>,
    },

    /// Delete a challenge and its saving entries
    Delete {
        /// Challenge number from `challenge list` (`@N` or `N`), or id prefix
        challenge: String,
    },

    /// List challenges with their progress
    List,

    /// Show a challenge and its saving history
    Show {
        /// Challenge number from `challenge list` (`@N` or `N`), or id prefix
        challenge: String,
    },

    /// Put money aside for a challenge
    Save {
        /// Challenge number from `challenge list` (`@N` or `N`), or id prefix
        challenge: String,

        amount: String,

        #[arg(short, long)]
        note: Option<String>,

        /// Date of the saving (YYYY-MM-DD, defaults to now)
        #[arg(long)]
        date: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Exit,
}

/// Line-oriented front end over a [`Session`].
pub struct Repl {
    session: Session,
    settings: Settings,
}

impl Repl {
    pub fn new(session: Session, settings: Settings) -> Self {
        Self { session, settings }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Read commands until `quit` or end of input. Command failures are
    /// reported on `out` and do not end the loop.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> Result<()> {
        writeln!(out, "pitaka {} - type `help` for commands", env!("CARGO_PKG_VERSION"))?;

        for line in input.lines() {
            let line = line.context("Failed to read input")?;
            if self.execute_line(&line, out)? == LoopControl::Exit {
                break;
            }
        }
        Ok(())
    }

    /// Parse and run one line of input.
    pub fn execute_line<W: Write>(&mut self, line: &str, out: &mut W) -> Result<LoopControl> {
        let words = match shell_words::split(line) {
            Ok(words) => words,
            Err(e) => {
                writeln!(out, "Error: {}", e)?;
                return Ok(LoopControl::Continue);
            }
        };
        if words.is_empty() {
            return Ok(LoopControl::Continue);
        }

        let command = match Line::try_parse_from(&words) {
            Ok(parsed) => parsed.command,
            Err(e) => {
                // Covers `help` and `--help` as well as usage errors
                write!(out, "{}", e.render())?;
                return Ok(LoopControl::Continue);
            }
        };

        debug!(command = %words[0], "Running command");
        match self.dispatch(command, out, Utc::now()) {
            Ok(control) => Ok(control),
            Err(e) => {
                writeln!(out, "Error: {:#}", e)?;
                Ok(LoopControl::Continue)
            }
        }
    }

    fn dispatch<W: Write>(
        &mut self,
        command: Command,
        out: &mut W,
        now: DateTime<Utc>,
    ) -> Result<LoopControl> {
        match command {
            Command::Signup { email, password } => {
                let user = self.session.sign_up(&email, &password)?;
                writeln!(out, "Account created. Signed in as {}", user.email)?;
            }
            Command::Login { email, password } => {
                let user = self.session.sign_in(&email, &password)?;
                writeln!(out, "Signed in as {}", user.email)?;
            }
            Command::Logout => match self.session.sign_out() {
                Some(user) => writeln!(out, "Signed out {}", user.email)?,
                None => writeln!(out, "Not signed in")?,
            },
            Command::Add {
                kind,
                amount,
                category,
                note,
            } => {
                let amount_cents = parse_amount(&amount)?;
                let category_id = resolve_category_id(kind, &category);
                let t = self
                    .session
                    .record_transaction(amount_cents, note, kind, &category_id)?;
                writeln!(
                    out,
                    "Recorded {} {} ({})",
                    kind,
                    self.money(t.amount_cents),
                    t.category.name
                )?;
            }
            Command::List => {
                let transactions = self.session.transactions()?;
                self.print_transactions(out, &transactions, now)?;
            }
            Command::Recent { limit } => {
                let limit = limit.unwrap_or(self.settings.recent_limit);
                let transactions = self.session.recent_transactions(limit)?;
                self.print_transactions(out, &transactions, now)?;
            }
            Command::Search { query } => {
                let transactions = self.session.search_transactions(&query.join(" "))?;
                self.print_transactions(out, &transactions, now)?;
            }
            Command::Summary => {
                let summary = self.session.summary()?;
                let overview = self.session.savings_overview()?;
                writeln!(out, "Income:    {:>16}", self.money(summary.total_income))?;
                writeln!(out, "Expenses:  {:>16}", self.money(summary.total_expenses))?;
                writeln!(out, "{}", "-".repeat(27))?;
                writeln!(out, "Balance:   {:>16}", self.money(summary.balance))?;
                writeln!(out)?;
                writeln!(
                    out,
                    "{} transaction(s), {} challenge(s), {} saved",
                    summary.transaction_count,
                    overview.active_challenges,
                    self.money(overview.total_saved)
                )?;
            }
            Command::Report { kind } => {
                let report = self.session.category_report(kind)?;
                if report.categories.is_empty() {
                    writeln!(out, "No {} transactions.", kind)?;
                    return Ok(LoopControl::Continue);
                }
                writeln!(out, "{:<24} {:>16} {:>6} {:>7}", "CATEGORY", "TOTAL", "COUNT", "SHARE")?;
                writeln!(out, "{}", "-".repeat(56))?;
                for row in &report.categories {
                    writeln!(
                        out,
                        "{:<24} {:>16} {:>6} {:>6.1}%",
                        row.category,
                        self.money(row.total),
                        row.count,
                        row.percentage
                    )?;
                }
                writeln!(out, "{}", "-".repeat(56))?;
                writeln!(out, "{:<24} {:>16}", "TOTAL", self.money(report.total))?;
            }
            Command::Categories { kind } => {
                for category in categories(kind) {
                    writeln!(out, "{:>3}  {}", category.id, category.name)?;
                }
            }
            Command::Challenge(cmd) => self.dispatch_challenge(cmd, out, now)?,
            Command::Export { path } => {
                let count = Exporter::new(&self.session).export_to_path(&path)?;
                writeln!(out, "Exported {} record(s) to {}", count, path.display())?;
            }
            Command::Quit => return Ok(LoopControl::Exit),
        }
        Ok(LoopControl::Continue)
    }

    fn dispatch_challenge<W: Write>(
        &mut self,
        cmd: ChallengeCommand,
        out: &mut W,
        now: DateTime<Utc>,
    ) -> Result<()> {
        match cmd {
            ChallengeCommand::Create {
                name,
                goal,
                finish,
                frequency,
                icon,
                color,
                description,
            } => {
                let mut draft =
                    ChallengeDraft::new(name, parse_amount(&goal)?, frequency, parse_day(&finish)?);
                draft.icon = icon;
                draft.color = color;
                draft.description = description;

                let challenge = self.session.create_challenge(draft, now)?;
                writeln!(
                    out,
                    "Created '{}': save {} per {} to reach {} by {}",
                    challenge.name,
                    self.money(challenge.estimated_cents),
                    challenge.frequency.unit(),
                    self.money(challenge.goal_amount_cents),
                    format_date(challenge.finish_date)
                )?;
            }
            ChallengeCommand::Edit {
                challenge,
                name,
                goal,
                finish,
                frequency,
                icon,
                color,
                description,
            } => {
                let id = self.resolve_challenge(&challenge)?;
                let mut draft = ChallengeDraft::from_challenge(&self.session.challenge(id)?);
                if let Some(name) = name {
                    draft.name = name;
                }
                if let Some(goal) = goal {
                    draft.goal_amount_cents = parse_amount(&goal)?;
                }
                if let Some(finish) = finish {
                    draft.finish_date = parse_day(&finish)?;
                }
                if let Some(frequency) = frequency {
                    draft.frequency = frequency;
                }
                if icon.is_some() {
                    draft.icon = icon;
                }
                if color.is_some() {
                    draft.color = color;
                }
                if description.is_some() {
                    draft.description = description;
                }

                let updated = self.session.edit_challenge(id, draft, now)?;
                writeln!(
                    out,
                    "Updated '{}': save {} per {}",
                    updated.name,
                    self.money(updated.estimated_cents),
                    updated.frequency.unit()
                )?;
            }
            ChallengeCommand::Delete { challenge } => {
                let id = self.resolve_challenge(&challenge)?;
                let removed = self.session.delete_challenge(id)?;
                writeln!(out, "Deleted '{}'", removed.name)?;
            }
            ChallengeCommand::List => {
                let challenges = self.session.challenges()?;
                if challenges.is_empty() {
                    writeln!(out, "No savings challenges yet.")?;
                }
                for (i, c) in challenges.iter().enumerate() {
                    writeln!(
                        out,
                        "{:>2}. {:<20} {:>5.1}%  {} of {}  ({}, until {})",
                        i + 1,
                        c.name,
                        c.progress_percent(),
                        self.money(c.current_amount_cents),
                        self.money(c.goal_amount_cents),
                        c.frequency,
                        format_date(c.finish_date)
                    )?;
                }
            }
            ChallengeCommand::Show { challenge } => {
                let id = self.resolve_challenge(&challenge)?;
                let progress = self.session.challenge_progress(id)?;
                self.print_challenge(out, &progress.challenge, progress.percent, now)?;
            }
            ChallengeCommand::Save {
                challenge,
                amount,
                note,
                date,
            } => {
                let id = self.resolve_challenge(&challenge)?;
                let date = match date {
                    Some(d) => parse_day(&d)?,
                    None => now,
                };
                let entry = self
                    .session
                    .add_saving(id, parse_amount(&amount)?, note, date, now)?;
                let progress = self.session.challenge_progress(id)?;
                writeln!(
                    out,
                    "Saved {} towards '{}' ({:.1}% reached)",
                    self.money(entry.amount_cents),
                    progress.challenge.name,
                    progress.percent
                )?;
            }
        }
        Ok(())
    }

    /// Accepts `@N` (a 1-based position from `challenge list`), a bare number
    /// that is a position, or a unique id prefix. A bare number that names one
    /// challenge by position and another by id prefix is ambiguous.
    fn resolve_challenge(&self, token: &str) -> Result<ChallengeId> {
        let challenges = self.session.challenges()?;
        let at_position = |position: usize| position.checked_sub(1).and_then(|i| challenges.get(i));

        if let Some(number) = token.strip_prefix('@') {
            let position: usize = number
                .parse()
                .map_err(|_| anyhow!("Invalid challenge number '{}'", token))?;
            return at_position(position)
                .map(|c| c.id)
                .ok_or_else(|| anyhow!("No challenge at position {}", position));
        }

        let by_position = token.parse::<usize>().ok().and_then(at_position);

        let prefix = token.to_lowercase();
        let mut matches = challenges
            .iter()
            .filter(|c| c.id.to_string().starts_with(&prefix));
        match (by_position, matches.next(), matches.next()) {
            (Some(c), None, _) => Ok(c.id),
            (Some(c), Some(m), None) if m.id == c.id => Ok(c.id),
            (Some(_), Some(_), _) => bail!(
                "'{}' is both a challenge number and an id prefix; use @{} for the number or a longer id prefix",
                token,
                token
            ),
            (None, Some(c), None) => Ok(c.id),
            (None, Some(_), Some(_)) => bail!("Ambiguous challenge id prefix: {}", prefix),
            (None, None, _) => bail!("No challenge matches '{}'", token),
        }
    }

    fn print_transactions<W: Write>(
        &self,
        out: &mut W,
        transactions: &[Transaction],
        now: DateTime<Utc>,
    ) -> Result<()> {
        if transactions.is_empty() {
            writeln!(out, "No transactions found.")?;
            return Ok(());
        }

        for t in transactions {
            let note = t
                .note
                .as_deref()
                .map(|n| truncate_note(n, self.settings.note_preview_len))
                .unwrap_or_default();
            writeln!(
                out,
                "{:>8}  {}{:>15}  {:<22} {}",
                format_time_ago(t.timestamp, now),
                t.kind.sign(),
                self.money(t.amount_cents),
                t.category.name,
                note
            )?;
        }
        Ok(())
    }

    fn print_challenge<W: Write>(
        &self,
        out: &mut W,
        c: &SavingsChallenge,
        percent: f64,
        now: DateTime<Utc>,
    ) -> Result<()> {
        writeln!(out, "{} ({})", c.name, c.id)?;
        if let Some(description) = &c.description {
            writeln!(out, "  {}", description)?;
        }
        writeln!(
            out,
            "  Saved:      {} of {} ({:.1}%)",
            self.money(c.current_amount_cents),
            self.money(c.goal_amount_cents),
            percent
        )?;
        writeln!(
            out,
            "  Plan:       {} per {}",
            self.money(c.estimated_cents),
            c.frequency.unit()
        )?;
        writeln!(
            out,
            "  Finish:     {} ({} day(s) left)",
            format_date(c.finish_date),
            days_until(c.finish_date, now)
        )?;
        writeln!(out, "  Created:    {}", format_date_time(c.created_at))?;

        if c.saving_entries.is_empty() {
            writeln!(out, "  No savings recorded yet.")?;
        } else {
            writeln!(out, "  History:")?;
            for entry in &c.saving_entries {
                writeln!(
                    out,
                    "    {:<14} {:>15}  {}",
                    format_date(entry.date),
                    self.money(entry.amount_cents),
                    entry.note.as_deref().unwrap_or("")
                )?;
            }
        }
        Ok(())
    }

    fn money(&self, cents: i64) -> String {
        format_money(cents, self.settings.currency)
    }
}

fn parse_amount(input: &str) -> Result<i64> {
    parse_cents(input).with_context(|| format!("Invalid amount '{}'", input))
}

fn parse_day(input: &str) -> Result<DateTime<Utc>> {
    parse_date(input).ok_or_else(|| anyhow!("Invalid date '{}', expected YYYY-MM-DD", input))
}

/// Categories may be given by id or by name; unknown input is passed through
/// so the session reports it.
fn resolve_category_id(kind: TransactionKind, input: &str) -> String {
    match find_category(kind, input).or_else(|| find_category_by_name(kind, input)) {
        Some(category) => category.id,
        None => input.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::LocalIdentityProvider;

    fn repl() -> Repl {
        Repl::new(
            Session::new(Box::new(LocalIdentityProvider::new())),
            Settings::default(),
        )
    }

    fn run(repl: &mut Repl, line: &str) -> String {
        let mut out = Vec::new();
        repl.execute_line(line, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_commands_need_login() {
        let mut repl = repl();
        assert_eq!(run(&mut repl, "summary"), "Error: Not signed in\n");
    }

    #[test]
    fn test_add_and_list() {
        let mut repl = repl();
        run(&mut repl, "signup ana@example.com secret1");

        let added = run(&mut repl, "add expense 45.50 -c 'Food & Dining' -n \"Lunch at restaurant\"");
        assert_eq!(added, "Recorded expense ₱45.50 (Food & Dining)\n");

        let listed = run(&mut repl, "list");
        assert!(listed.contains("Lunch at restaurant"));
        assert!(listed.contains("-         ₱45.50"));

        let bad = run(&mut repl, "add income abc -c 1");
        assert!(bad.starts_with("Error: Invalid amount 'abc'"));
    }

    #[test]
    fn test_quit_and_blank_lines() {
        let mut repl = repl();
        let mut out = Vec::new();
        assert_eq!(repl.execute_line("   ", &mut out).unwrap(), LoopControl::Continue);
        assert_eq!(repl.execute_line("exit", &mut out).unwrap(), LoopControl::Exit);
        assert!(out.is_empty());
    }

    #[test]
    fn test_resolve_challenge_number_and_id_prefix() {
        use crate::storage::{Ledger, Tracker};
        use chrono::Duration;
        use uuid::Uuid;

        let now = Utc::now();
        let make = |name: &str, id: &str| {
            let mut c = SavingsChallenge::from_draft(
                ChallengeDraft::new(name, 10000, Frequency::Monthly, now + Duration::days(30)),
                now,
            );
            c.id = Uuid::parse_str(id).unwrap();
            c
        };
        let first = make("Trip", "20000000-0000-4000-8000-000000000001");
        let second = make("Laptop", "b0000000-0000-4000-8000-000000000002");
        let tracker = Tracker::from_challenges(vec![first.clone(), second.clone()]).unwrap();

        let mut repl = Repl::new(
            Session::with_stores(Box::new(LocalIdentityProvider::new()), Ledger::new(), tracker),
            Settings::default(),
        );
        run(&mut repl, "signup ana@example.com secret1");

        // "2" is the second challenge's number and the first one's id prefix
        let err = repl.resolve_challenge("2").unwrap_err();
        assert!(err.to_string().contains("use @2"));

        assert_eq!(repl.resolve_challenge("@2").unwrap(), second.id);
        assert_eq!(repl.resolve_challenge("2000").unwrap(), first.id);
        assert_eq!(repl.resolve_challenge("1").unwrap(), first.id);
        assert_eq!(repl.resolve_challenge("B0").unwrap(), second.id);
        assert!(repl.resolve_challenge("@3").is_err());
        assert!(repl.resolve_challenge("@x").is_err());

        assert!(run(&mut repl, "challenge show @2").starts_with("Laptop ("));
    }

    #[test]
    fn test_resolve_category_id() {
        assert_eq!(resolve_category_id(TransactionKind::Expense, "29"), "29");
        assert_eq!(resolve_category_id(TransactionKind::Income, "salary"), "1");
        assert_eq!(resolve_category_id(TransactionKind::Income, "Coffee"), "Coffee");
    }
}

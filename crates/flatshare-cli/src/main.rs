//! `flatshare` — command-line client for a flatshare server.
//!
//! # Usage
//!
//! ```
//! flatshare --room flat-4b --password secret register
//! flatshare roommate add Asha --mobile "98450 12345"
//! flatshare expense add --paid-by Asha 500 -d Groceries
//! flatshare deposit add Asha 2000
//! flatshare dashboard
//! ```

mod client;
mod output;

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use client::{ApiClient, ApiConfig, Outcome};
use flatshare_core::{ledger::Category, money::Amount, period};
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "flatshare", about = "Track shared expenses and deposits for a room")]
struct Args {
  /// Path to a TOML config file (url, room, password, currency).
  #[arg(short, long, value_name = "FILE", env = "FLATSHARE_CONFIG")]
  config: Option<PathBuf>,

  /// Base URL of the flatshare server (default: http://localhost:8080).
  #[arg(long, env = "FLATSHARE_URL", global = true)]
  url: Option<String>,

  /// Room name to log in as.
  #[arg(long, env = "FLATSHARE_ROOM", global = true)]
  room: Option<String>,

  /// Room password.
  #[arg(long, env = "FLATSHARE_PASSWORD", hide_env_values = true, global = true)]
  password: Option<String>,

  /// Symbol printed before amounts (default: ₹).
  #[arg(long, env = "FLATSHARE_CURRENCY", global = true)]
  currency: Option<String>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Create the room named by --room with --password.
  Register,

  /// Manage the people sharing the room.
  #[command(subcommand)]
  Roommate(RoommateCmd),

  /// Record and inspect spending.
  #[command(subcommand)]
  Expense(ExpenseCmd),

  /// Record and inspect money paid into the shared pool.
  #[command(subcommand)]
  Deposit(DepositCmd),

  /// Today's spending, month-to-date deposits and remaining balance.
  Dashboard {
    /// Evaluate as of this date instead of the server's today.
    #[arg(long, value_parser = period::parse_date)]
    today: Option<NaiveDate>,
  },
}

#[derive(Subcommand, Debug)]
enum RoommateCmd {
  Add {
    name:   String,
    #[arg(long)]
    mobile: Option<String>,
  },
  List,
  Remove {
    name:  String,
    /// Remove even if expenses are recorded against this name.
    #[arg(long)]
    force: bool,
  },
}

#[derive(Subcommand, Debug)]
enum ExpenseCmd {
  Add {
    #[arg(long)]
    paid_by:     String,
    amount:      Amount,
    /// Defaults to today.
    #[arg(long, value_parser = period::parse_date)]
    date:        Option<NaiveDate>,
    #[arg(long, short, value_parser = Category::parse)]
    category:    Option<Category>,
    #[arg(long, short)]
    description: Option<String>,
  },
  List {
    #[arg(long, value_parser = period::parse_date)]
    on:      Option<NaiveDate>,
    #[arg(long)]
    paid_by: Option<String>,
  },
  Delete {
    id: i64,
  },
}

#[derive(Subcommand, Debug)]
enum DepositCmd {
  Add {
    roommate: String,
    amount:   Amount,
    /// Defaults to today.
    #[arg(long, value_parser = period::parse_date)]
    date:     Option<NaiveDate>,
  },
  List {
    #[arg(long, value_parser = period::parse_date)]
    from: Option<NaiveDate>,
    #[arg(long, value_parser = period::parse_date)]
    to:   Option<NaiveDate>,
  },
  Delete {
    id: i64,
  },
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default, Debug)]
struct ConfigFile {
  #[serde(default)]
  url:      String,
  #[serde(default)]
  room:     String,
  #[serde(default)]
  password: String,
  #[serde(default)]
  currency: String,
}

/// Flag (or env) if given, else a non-empty config file value, else `default`.
fn pick(flag: Option<String>, file: &str, default: &str) -> String {
  flag
    .or_else(|| (!file.is_empty()).then(|| file.to_owned()))
    .unwrap_or_else(|| default.to_owned())
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .init();

  let args = Args::parse();

  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  let currency = pick(args.currency, &file_cfg.currency, "₹");
  let client = ApiClient::new(ApiConfig {
    base_url: pick(args.url, &file_cfg.url, "http://localhost:8080"),
    room:     pick(args.room, &file_cfg.room, ""),
    password: pick(args.password, &file_cfg.password, ""),
  })?;

  run(&client, &currency, args.command).await
}

async fn run(client: &ApiClient, currency: &str, command: Command) -> Result<()> {
  match command {
    Command::Register => match client.register().await? {
      Outcome::Done(room) => println!("Registered room {:?}.", room.room_name),
      Outcome::Warning(w) => warn(&w),
    },

    Command::Roommate(RoommateCmd::Add { name, mobile }) => {
      match client.add_roommate(&name, mobile.as_deref()).await? {
        Outcome::Done(r) => println!("Added {}.", r.name),
        Outcome::Warning(w) => warn(&w),
      }
    }
    Command::Roommate(RoommateCmd::List) => {
      print!("{}", output::roommates(&client.list_roommates().await?));
    }
    Command::Roommate(RoommateCmd::Remove { name, force }) => {
      match client.remove_roommate(&name, force).await? {
        Outcome::Done(_) => println!("Removed {name}."),
        Outcome::Warning(w) => warn(&w),
      }
    }

    Command::Expense(ExpenseCmd::Add { paid_by, amount, date, category, description }) => {
      let e = client
        .add_expense(&paid_by, amount, date, category, description.as_deref())
        .await?;
      println!(
        "Recorded expense #{}: {} paid {} on {}.",
        e.id,
        e.paid_by,
        output::money(currency, e.amount),
        e.date
      );
    }
    Command::Expense(ExpenseCmd::List { on, paid_by }) => {
      let list = client.list_expenses(on, paid_by.as_deref()).await?;
      print!("{}", output::expenses(currency, &list));
    }
    Command::Expense(ExpenseCmd::Delete { id }) => {
      client.delete_expense(id).await?;
      println!("Deleted expense #{id}.");
    }

    Command::Deposit(DepositCmd::Add { roommate, amount, date }) => {
      let d = client.add_deposit(&roommate, amount, date).await?;
      println!(
        "Recorded deposit #{}: {} paid in {} on {}.",
        d.id,
        d.roommate,
        output::money(currency, d.amount),
        d.date
      );
    }
    Command::Deposit(DepositCmd::List { from, to }) => {
      let list = client.list_deposits(from, to).await?;
      print!("{}", output::deposits(currency, &list));
    }
    Command::Deposit(DepositCmd::Delete { id }) => {
      client.delete_deposit(id).await?;
      println!("Deleted deposit #{id}.");
    }

    Command::Dashboard { today } => {
      let dash = client.dashboard(today).await?;
      print!("{}", output::dashboard(currency, &dash));
    }
  }
  Ok(())
}

fn warn(message: &str) { eprintln!("warning: {message}"); }

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn flags_beat_file_beats_default() {
    assert_eq!(pick(Some("a".into()), "b", "c"), "a");
    assert_eq!(pick(None, "b", "c"), "b");
    assert_eq!(pick(None, "", "c"), "c");
  }

  #[test]
  fn config_file_fields_are_optional() {
    let cfg: ConfigFile = toml::from_str("room = \"flat-4b\"\ncurrency = \"$\"").unwrap();
    assert_eq!(cfg.room, "flat-4b");
    assert_eq!(cfg.currency, "$");
    assert!(cfg.url.is_empty());
  }

  #[test]
  fn parses_expense_add() {
    let args = Args::try_parse_from([
      "flatshare", "expense", "add", "--paid-by", "Asha", "12.50", "-c", "Groceries",
      "--date", "2026-10-14",
    ])
    .unwrap();
    let Command::Expense(ExpenseCmd::Add { paid_by, amount, date, category, .. }) = args.command
    else {
      panic!("expected expense add");
    };
    assert_eq!(paid_by, "Asha");
    assert_eq!(amount, Amount::from_minor(1250).unwrap());
    assert_eq!(date, NaiveDate::from_ymd_opt(2026, 10, 14));
    assert_eq!(category, Some(Category::Groceries));
  }

  #[test]
  fn rejects_dates_outside_four_digit_years() {
    assert!(
      Args::try_parse_from(["flatshare", "dashboard", "--today", "+10000-01-01"]).is_err()
    );
    let args = Args::try_parse_from(["flatshare", "dashboard", "--today", "2026-10-15"]).unwrap();
    assert!(matches!(args.command, Command::Dashboard { today: Some(_) }));
  }

  #[test]
  fn rejects_non_positive_amounts() {
    assert!(Args::try_parse_from(["flatshare", "deposit", "add", "Asha", "0"]).is_err());
    assert!(Args::try_parse_from(["flatshare", "deposit", "add", "Asha", "1.005"]).is_err());
  }
}

//! CLI module for hyauth-auth.
//!
//! Read-only inspection of a users file. It can be used either as a standalone
//! binary or as the `accounts` subcommand of the main hyauth CLI. Secrets are
//! never printed.
//!
//! # Usage
//!
//! ```bash
//! # List all accounts with their status
//! hyauth-accounts list -u /etc/hysteria/users.json
//!
//! # Same as JSON
//! hyauth-accounts list -u /etc/hysteria/users.json -f json
//!
//! # Show a single account
//! hyauth-accounts check -u /etc/hysteria/users.json alice
//! ```

use std::fmt;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use hyauth_core::DEFAULT_USERS_FILE;
use serde::Serialize;
use tabled::{Table, Tabled};
use time::{Date, OffsetDateTime};

use crate::record::{AccountRecord, ExpiredDatePolicy};
use crate::snapshot::Snapshot;
use crate::store::{AccountStore, FileStore};

/// Account inspection CLI arguments.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "hyauth-accounts",
    version,
    about = "Inspect hyauth accounts (read-only)"
)]
pub struct AccountsArgs {
    #[command(subcommand)]
    pub command: AccountsCommands,
}

/// Accounts CLI subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum AccountsCommands {
    /// List all accounts.
    List {
        /// Path to the users file.
        #[arg(short, long, env = "HYAUTH_USERS_FILE", default_value = DEFAULT_USERS_FILE)]
        users: PathBuf,

        /// Output format.
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        /// Treat unparseable creation dates as expired.
        #[arg(long)]
        fail_closed: bool,
    },

    /// Show one account.
    Check {
        /// Path to the users file.
        #[arg(short, long, env = "HYAUTH_USERS_FILE", default_value = DEFAULT_USERS_FILE)]
        users: PathBuf,

        /// Identity key to look up.
        username: String,

        /// Treat unparseable creation dates as expired.
        #[arg(long)]
        fail_closed: bool,
    },
}

/// Output format for listings.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}

/// Effective status of an account, ignoring the secret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AccountStatus {
    Active,
    Unlimited,
    Blocked,
    Expired,
    OverQuota,
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AccountStatus::Active => "active",
            AccountStatus::Unlimited => "unlimited",
            AccountStatus::Blocked => "blocked",
            AccountStatus::Expired => "expired",
            AccountStatus::OverQuota => "over quota",
        })
    }
}

/// Status an account would get from the decision engine with a correct secret.
pub fn account_status(
    record: &AccountRecord,
    today: Date,
    policy: ExpiredDatePolicy,
) -> AccountStatus {
    if record.blocked {
        AccountStatus::Blocked
    } else if record.unlimited {
        AccountStatus::Unlimited
    } else if record.is_expired(today, policy) {
        AccountStatus::Expired
    } else if record.is_over_quota() {
        AccountStatus::OverQuota
    } else {
        AccountStatus::Active
    }
}

/// Account row for display.
#[derive(Tabled, Serialize, Debug, Clone, PartialEq, Eq)]
struct AccountDisplay {
    #[tabled(rename = "Identity")]
    identity: String,
    #[tabled(rename = "Status")]
    status: AccountStatus,
    #[tabled(rename = "Quota")]
    quota: String,
    #[tabled(rename = "Used")]
    used: String,
    #[tabled(rename = "Created")]
    created: String,
    #[tabled(rename = "Expires")]
    expires: String,
}

impl AccountDisplay {
    fn new(identity: &str, record: &AccountRecord, today: Date, policy: ExpiredDatePolicy) -> Self {
        Self {
            identity: identity.to_string(),
            status: account_status(record, today, policy),
            quota: format_quota(record.quota()),
            used: format_bytes(record.used_bytes()),
            created: if record.created_on.is_empty() {
                "-".to_string()
            } else {
                record.created_on.clone()
            },
            expires: format_expires(record),
        }
    }
}

/// Run the accounts CLI with the given arguments.
///
/// This is the main entry point for the accounts CLI, used by both the
/// standalone binary and the unified hyauth CLI.
pub async fn run(args: AccountsArgs) -> Result<(), Box<dyn std::error::Error>> {
    let today = OffsetDateTime::now_utc().date();

    match args.command {
        AccountsCommands::List {
            users,
            format,
            fail_closed,
        } => {
            let snapshot = FileStore::new(users).load_all().await?;
            let rows = rows(&snapshot, today, policy(fail_closed));
            if rows.is_empty() {
                println!("No accounts found.");
                return Ok(());
            }
            println!("{}", render(&rows, format)?);
            Ok(())
        }
        AccountsCommands::Check {
            users,
            username,
            fail_closed,
        } => {
            let snapshot = FileStore::new(users).load_all().await?;
            let record = snapshot
                .get(&username)
                .ok_or_else(|| format!("account '{username}' not found"))?;
            let row = AccountDisplay::new(&username, record, today, policy(fail_closed));
            println!("{}", Table::new([row]));
            Ok(())
        }
    }
}

fn policy(fail_closed: bool) -> ExpiredDatePolicy {
    if fail_closed {
        ExpiredDatePolicy::FailClosed
    } else {
        ExpiredDatePolicy::FailOpen
    }
}

/// Build display rows sorted by identity.
fn rows(snapshot: &Snapshot, today: Date, policy: ExpiredDatePolicy) -> Vec<AccountDisplay> {
    let mut rows: Vec<AccountDisplay> = snapshot
        .iter()
        .map(|(identity, record)| AccountDisplay::new(identity, record, today, policy))
        .collect();
    rows.sort_by(|a, b| a.identity.cmp(&b.identity));
    rows
}

fn render(
    rows: &[AccountDisplay],
    format: OutputFormat,
) -> Result<String, Box<dyn std::error::Error>> {
    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(rows)?,
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(Vec::new());
            for row in rows {
                writer.serialize(row)?;
            }
            let out = String::from_utf8(writer.into_inner().map_err(|e| e.into_error())?)?;
            out.trim_end().to_string()
        }
        OutputFormat::Table => Table::new(rows).to_string(),
    })
}

/// Format bytes to human readable string.
fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;
    const TB: u64 = GB * 1024;

    if bytes >= TB {
        format!("{:.2} TB", bytes as f64 / TB as f64)
    } else if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Format quota (`None` means unlimited).
fn format_quota(quota: Option<u64>) -> String {
    match quota {
        Some(bytes) => format_bytes(bytes),
        None => "Unlimited".to_string(),
    }
}

fn format_expires(record: &AccountRecord) -> String {
    if record.expiration_days <= 0 {
        return "Never".to_string();
    }
    if record.creation_date().is_none() {
        return "invalid date".to_string();
    }
    match record.expires_on() {
        Some(date) => date.to_string(),
        None => "Never".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::*;

    const TODAY: Date = date!(2024 - 06 - 15);

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(1023), "1023 B");
        assert_eq!(format_bytes(1024), "1.00 KB");
        assert_eq!(format_bytes(1536 * 1024), "1.50 MB");
        assert_eq!(format_bytes(10 * 1024 * 1024 * 1024), "10.00 GB");
        assert_eq!(format_quota(None), "Unlimited");
        assert_eq!(format_quota(Some(2048)), "2.00 KB");
    }

    #[test]
    fn test_account_status() {
        let policy = ExpiredDatePolicy::FailOpen;
        let active = AccountRecord::new("pw");
        assert_eq!(account_status(&active, TODAY, policy), AccountStatus::Active);

        let blocked = AccountRecord {
            blocked: true,
            unlimited: true,
            ..AccountRecord::new("pw")
        };
        assert_eq!(account_status(&blocked, TODAY, policy), AccountStatus::Blocked);

        let unlimited = AccountRecord {
            unlimited: true,
            quota_bytes: 1,
            uploaded_bytes: 5,
            ..AccountRecord::new("pw")
        };
        assert_eq!(account_status(&unlimited, TODAY, policy), AccountStatus::Unlimited);

        let expired = AccountRecord {
            expiration_days: 1,
            created_on: "2020-01-01".into(),
            ..AccountRecord::new("pw")
        };
        assert_eq!(account_status(&expired, TODAY, policy), AccountStatus::Expired);

        let over = AccountRecord {
            quota_bytes: 10,
            downloaded_bytes: 10,
            ..AccountRecord::new("pw")
        };
        assert_eq!(account_status(&over, TODAY, policy), AccountStatus::OverQuota);
    }

    #[test]
    fn test_rows_sorted_and_secret_free() {
        let snapshot: Snapshot = [
            ("zed", AccountRecord::new("secret-z")),
            (
                "amy",
                AccountRecord {
                    expiration_days: 30,
                    created_on: "2024-06-01".into(),
                    ..AccountRecord::new("secret-a")
                },
            ),
        ]
        .into_iter()
        .collect();

        let rows = rows(&snapshot, TODAY, ExpiredDatePolicy::FailOpen);
        assert_eq!(rows[0].identity, "amy");
        assert_eq!(rows[0].expires, "2024-07-01");
        assert_eq!(rows[1].expires, "Never");

        for format in [OutputFormat::Table, OutputFormat::Json, OutputFormat::Csv] {
            let out = render(&rows, format).unwrap();
            assert!(out.contains("amy"));
            assert!(!out.contains("secret"), "{format:?} leaked a secret");
        }
    }

    #[test]
    fn test_render_csv() {
        let snapshot: Snapshot = [(
            "amy",
            AccountRecord {
                blocked: true,
                ..AccountRecord::new("pw")
            },
        )]
        .into_iter()
        .collect();
        let rows = rows(&snapshot, TODAY, ExpiredDatePolicy::FailOpen);
        assert_eq!(
            render(&rows, OutputFormat::Csv).unwrap(),
            "identity,status,quota,used,created,expires\namy,blocked,Unlimited,0 B,-,Never"
        );
    }

    #[test]
    fn test_render_csv_quotes_fields() {
        let snapshot: Snapshot = [("a,\"b", AccountRecord::new("pw"))].into_iter().collect();
        let rows = rows(&snapshot, TODAY, ExpiredDatePolicy::FailOpen);
        let out = render(&rows, OutputFormat::Csv).unwrap();
        assert_eq!(
            out.lines().nth(1),
            Some(r#""a,""b",active,Unlimited,0 B,-,Never"#)
        );

        let mut reader = csv::Reader::from_reader(out.as_bytes());
        let record = reader.records().next().unwrap().unwrap();
        assert_eq!(&record[0], "a,\"b");
    }

    #[test]
    fn test_format_expires_out_of_range() {
        let record = AccountRecord {
            expiration_days: 200_000_000_000_000,
            created_on: "2024-01-01".into(),
            ..AccountRecord::new("pw")
        };
        assert_eq!(format_expires(&record), "Never");
        assert_eq!(
            account_status(&record, TODAY, ExpiredDatePolicy::FailClosed),
            AccountStatus::Active
        );
    }

    #[test]
    fn test_render_json_uses_status_names() {
        let snapshot: Snapshot = [(
            "amy",
            AccountRecord {
                quota_bytes: 1,
                uploaded_bytes: 1,
                ..AccountRecord::new("pw")
            },
        )]
        .into_iter()
        .collect();
        let rows = rows(&snapshot, TODAY, ExpiredDatePolicy::FailOpen);
        let value: serde_json::Value =
            serde_json::from_str(&render(&rows, OutputFormat::Json).unwrap()).unwrap();
        assert_eq!(value[0]["status"], "over-quota");
        assert_eq!(value[0]["identity"], "amy");
    }
}

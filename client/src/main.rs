//! # Finance CLI
//!
//! Thin command-line front end over [`finance_client::App`].
//!
//! The cookie jar lives only as long as the process, so commands that need
//! a session log in first with `--email`/`--password` (or `FINANCE_EMAIL` /
//! `FINANCE_PASSWORD`).

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use finance_client::app::{App, EvaluationMode, Form};
use finance_client::config::ClientConfig;
use finance_client::logging::{self, LogConfig};
use finance_client::store::{FilterUpdate, LanguageCode, ThemeMode, TypeFilter};
use finance_client::{ClientError, Result};
use shared::utils::{format_amount, truncate};
use shared::{NewTransaction, TransactionMethod, TransactionType};

#[derive(Parser, Debug)]
#[command(author, version, about = "Personal finance tracker client")]
struct Cli {
    /// Account email
    #[arg(long, global = true, env = "FINANCE_EMAIL")]
    email: Option<String>,

    /// Account password
    #[arg(long, global = true, env = "FINANCE_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check the credentials
    Login {
        #[arg(long)]
        remember_me: bool,
    },
    Logout,
    /// Show the signed-in user
    Whoami,
    /// List transactions
    List {
        /// all, credit or debit
        #[arg(long = "type", default_value = "all")]
        kind: TypeFilter,
        #[arg(long)]
        category: Option<String>,
        /// First day, yyyy-MM-dd
        #[arg(long)]
        from: Option<String>,
        /// Last day, yyyy-MM-dd
        #[arg(long)]
        to: Option<String>,
        /// Text to look for in descriptions
        #[arg(long)]
        search: Option<String>,
    },
    /// Record a transaction
    Add {
        description: String,
        amount: f64,
        #[arg(long, default_value = "Other")]
        category: String,
        /// credit or debit
        #[arg(long = "type", default_value = "debit")]
        kind: TransactionType,
        #[arg(long)]
        method: Option<TransactionMethod>,
        #[arg(long)]
        notes: Option<String>,
    },
    Delete {
        id: String,
    },
    /// Income, expenses and balance
    Summary,
    /// Print the Google sign-in page
    GoogleUrl,
    /// Print the page that links a Gmail mailbox
    GmailConnect,
    /// Import transactions from Gmail
    GmailSync {
        #[arg(long)]
        current_month: bool,
    },
    /// Show the transactions found in mail
    GmailList,
    GmailDisconnect,
    /// Run the server-side email evaluation
    Evaluate {
        /// Queue the job instead of waiting for it
        #[arg(long, conflicts_with = "user")]
        background: bool,
        /// Evaluate this user's mail
        #[arg(long)]
        user: Option<String>,
    },
    /// When the email evaluation last ran
    EvaluationStatus,
    /// Show, toggle or set the theme (light/dark)
    Theme {
        mode: Option<ThemeMode>,
    },
    /// Show or set the language (en, hi, es, fr, ...)
    Language {
        code: Option<LanguageCode>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match ClientConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    // Keep the guard alive so buffered log lines are flushed on exit
    let _log_guard = match logging::init(&LogConfig::from_env()) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Logging disabled: {}", e);
            None
        }
    };

    tracing::info!(api_url = %config.api_url, command = ?cli.command, "Starting finance CLI");

    match run(cli, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, config: &ClientConfig) -> Result<()> {
    let mut app = App::from_config(config)?;

    match cli.command {
        Command::Login { remember_me } => {
            sign_in(&mut app, &cli.email, &cli.password, remember_me).await?;
            whoami(&app);
        }
        Command::Logout => {
            sign_in(&mut app, &cli.email, &cli.password, false).await?;
            app.logout();
            app.settle().await;
            println!("Logged out");
        }
        Command::Whoami => {
            sign_in(&mut app, &cli.email, &cli.password, false).await?;
            whoami(&app);
        }
        Command::List {
            kind,
            category,
            from,
            to,
            search,
        } => {
            sign_in(&mut app, &cli.email, &cli.password, false).await?;
            app.navigate(finance_client::View::Transactions);
            app.set_filter(FilterUpdate {
                kind: Some(kind),
                category: Some(category),
                start_date: Some(from),
                end_date: Some(to),
                search_term: search,
            });
            app.settle().await;
            print_transactions(&app)?;
        }
        Command::Add {
            description,
            amount,
            category,
            kind,
            method,
            notes,
        } => {
            sign_in(&mut app, &cli.email, &cli.password, false).await?;
            app.create_transaction(NewTransaction {
                description,
                amount,
                currency: None,
                category,
                kind,
                notes,
                transaction_method: method,
            });
            app.settle().await;
            form_result(&app, Form::Transaction)?;

            let state = app.state.read();
            if let Some(created) = state.transactions.items.first() {
                println!("Created {} ({})", created.id, created.date);
            }
        }
        Command::Delete { id } => {
            sign_in(&mut app, &cli.email, &cli.password, false).await?;
            app.delete_transaction(id.clone());
            app.settle().await;
            form_result(&app, Form::Transaction)?;
            println!("Deleted {}", id);
        }
        Command::Summary => {
            sign_in(&mut app, &cli.email, &cli.password, false).await?;
            app.navigate(finance_client::View::Dashboard);
            app.fetch_transactions(None);
            app.settle().await;
            list_result(&app)?;

            let summary = app.state.read().summary();
            let currency = Default::default();
            println!("Transactions: {}", summary.count);
            println!("Income:       {}", format_amount(summary.total_income, currency));
            println!("Expenses:     {}", format_amount(summary.total_expenses, currency));
            println!("Balance:      {}", format_amount(summary.net_balance, currency));
        }
        Command::GoogleUrl => {
            app.google_auth_url();
            app.settle().await;
            form_result(&app, Form::Login)?;

            if let Some(url) = app.state.read().google_auth_url.as_ref() {
                println!("{}", url);
            }
        }
        Command::GmailConnect => {
            sign_in(&mut app, &cli.email, &cli.password, false).await?;
            app.gmail_connect();
            app.settle().await;
            form_result(&app, Form::Gmail)?;

            if let Some(url) = app.state.read().gmail.connect_url.as_ref() {
                println!("Open this page to link Gmail:\n{}", url);
            }
        }
        Command::GmailSync { current_month } => {
            sign_in(&mut app, &cli.email, &cli.password, false).await?;
            app.gmail_sync(current_month);
            app.settle().await;
            form_result(&app, Form::Gmail)?;

            if let Some(sync) = app.state.read().gmail.last_sync.as_ref() {
                println!(
                    "Synced {} (processed {}, skipped {}, duplicates {})",
                    sync.synced, sync.processed, sync.skipped, sync.duplicates
                );
            }
        }
        Command::GmailList => {
            sign_in(&mut app, &cli.email, &cli.password, false).await?;
            app.load_email_transactions();
            app.settle().await;
            form_result(&app, Form::Gmail)?;
            print_email_transactions(&app);
        }
        Command::GmailDisconnect => {
            sign_in(&mut app, &cli.email, &cli.password, false).await?;
            app.gmail_disconnect();
            app.settle().await;
            form_result(&app, Form::Gmail)?;
            println!("Gmail disconnected");
        }
        Command::Evaluate { background, user } => {
            sign_in(&mut app, &cli.email, &cli.password, false).await?;
            let mode = match (background, user) {
                (_, Some(user)) => EvaluationMode::ForUser(user),
                (true, None) => EvaluationMode::Background,
                (false, None) => EvaluationMode::Now,
            };
            app.evaluate_emails(mode);
            app.settle().await;
            form_result(&app, Form::Gmail)?;

            if let Some(result) = app.state.read().gmail.last_evaluation.as_ref() {
                if background {
                    println!("{}", result.message.as_deref().unwrap_or("Evaluation queued"));
                } else {
                    println!(
                        "Added {}, duplicates {}, skipped {}",
                        result.added.unwrap_or(0),
                        result.duplicates.unwrap_or(0),
                        result.skipped.unwrap_or(0)
                    );
                }
            }
        }
        Command::EvaluationStatus => {
            sign_in(&mut app, &cli.email, &cli.password, false).await?;
            app.email_evaluation_status();
            app.settle().await;
            form_result(&app, Form::Gmail)?;

            if let Some(status) = app.state.read().gmail.evaluation_status.as_ref() {
                let last = chrono::DateTime::<chrono::Utc>::from_timestamp_millis(status.last_check)
                    .map(|at| at.format("%Y-%m-%d %H:%M UTC").to_string())
                    .unwrap_or_else(|| "never".to_string());
                println!("{} (last run: {})", status.message, last);
            }
        }
        Command::Theme { mode } => {
            let mode = match mode {
                Some(mode) => {
                    app.set_theme(mode);
                    mode
                }
                None => app.toggle_theme(),
            };
            form_result(&app, Form::Settings)?;
            println!("Theme: {}", mode.as_str());
        }
        Command::Language { code } => {
            if let Some(code) = code {
                app.set_language(code);
                form_result(&app, Form::Settings)?;
            }
            let state = app.state.read();
            println!("Language: {} ({})", state.language.name, state.language.code.code());
        }
    }

    Ok(())
}

/// Log in with the given credentials, or fall back to the cookie check.
async fn sign_in(
    app: &mut App,
    email: &Option<String>,
    password: &Option<String>,
    remember_me: bool,
) -> Result<()> {
    match (email, password) {
        (Some(email), Some(password)) => {
            app.login(email.as_str(), password.as_str(), remember_me);
        }
        _ => {
            app.bootstrap();
        }
    }
    app.settle().await;
    form_result(app, Form::Login)?;

    if app.state.read().is_authenticated() {
        Ok(())
    } else {
        Err(ClientError::Authentication(
            "Not logged in. Pass --email and --password".to_string(),
        ))
    }
}

fn form_result(app: &App, form: Form) -> Result<()> {
    match app.state.read().error(form) {
        Some(message) => Err(ClientError::Validation(message.to_string())),
        None => Ok(()),
    }
}

fn list_result(app: &App) -> Result<()> {
    match app.state.read().transactions.error.as_ref() {
        Some(message) => Err(ClientError::Validation(message.clone())),
        None => Ok(()),
    }
}

fn whoami(app: &App) {
    let state = app.state.read();
    if let Some(user) = state.session.user.as_ref() {
        println!("{} <{}>", user.display_name(), user.email);
    }
}

fn print_email_transactions(app: &App) {
    let state = app.state.read();
    let rows = &state.gmail.email_transactions;
    if rows.is_empty() {
        println!("No email transactions");
        return;
    }
    for tx in rows {
        let amount = format_amount(tx.amount, tx.currency.unwrap_or_default());
        let kind = tx.kind.map(|k| k.as_str()).unwrap_or("-");
        let label = tx
            .merchant
            .as_deref()
            .or(tx.description.as_deref())
            .unwrap_or("");
        println!(
            "{:<10} {:<6} {:>14}  {}",
            tx.date.as_deref().unwrap_or("-"),
            kind,
            amount,
            truncate(label, 40)
        );
    }
}

fn print_transactions(app: &App) -> Result<()> {
    list_result(app)?;

    let state = app.state.read();
    let mut shown = 0;
    for tx in state.transactions.visible_items() {
        let amount = format_amount(tx.amount, tx.currency.unwrap_or_default());
        let day = tx.date.get(..10).unwrap_or(tx.date.as_str());
        println!(
            "{:<12} {:<10} {:<6} {:>14}  {:<16} {}",
            tx.id,
            day,
            tx.kind.as_str(),
            amount,
            truncate(&tx.category, 16),
            truncate(&tx.description, 40)
        );
        shown += 1;
    }
    if shown == 0 {
        println!("No transactions");
    }
    Ok(())
}

use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tabled::{settings::Style, Table, Tabled};

use atendimentos::config::{
    config_dir, expand_path, load_config, load_sessions, load_snapshot, resolve_output_dir,
    save_sessions, CONFIG_TEMPLATE, SESSIONS_TEMPLATE,
};
use atendimentos::error::{AppError, Result};
use atendimentos::logging::init_logging;
use atendimentos::pdf::TypstEngine;
use atendimentos::report::{
    export_report, format_currency, format_row, layout_document, parse_amount, summarize,
    ConsoleReporter, FormattedRow,
};
use atendimentos::session::{
    birthday_age, birthdays_on, parse_date, PaymentStatus, ServiceType, SessionRecord, ZodiacSign,
};

#[derive(Parser)]
#[command(name = "atendimentos")]
#[command(
    version,
    about = "Session log and general report for a tarot and therapy practice",
    long_about = None
)]
struct Cli {
    /// Path to config directory (default: XDG config dir or ~/.atendimentos)
    #[arg(short = 'C', long, global = true)]
    config_dir: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize config directory with template files
    Init,

    /// Record a new session
    Add(AddArgs),

    /// List recorded sessions
    List {
        /// Number of sessions to show (default: all)
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Generate the general PDF report of all sessions
    Report {
        /// Read sessions from a JSON export instead of sessions.toml
        #[arg(short, long, value_name = "FILE")]
        input: Option<PathBuf>,

        /// Directory for the PDF (default: report.output_dir from config.toml)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Only lay out the pages and print them, without producing a PDF
        #[arg(long)]
        dry_run: bool,

        /// Open generated PDF with system default viewer
        #[arg(long)]
        open: bool,
    },

    /// Show clients whose birthday is today
    Birthdays,

    /// Show the zodiac sign for a birth date
    Sign {
        /// Birth date (YYYY-MM-DD)
        date: String,
    },
}

#[derive(Args)]
struct AddArgs {
    /// Client name
    #[arg(short, long)]
    client: String,

    /// Client birth date (YYYY-MM-DD)
    #[arg(long)]
    birth_date: Option<String>,

    /// Service provided
    #[arg(short, long, value_enum)]
    service: Option<ServiceType>,

    /// Session date (YYYY-MM-DD, default: today)
    #[arg(short, long)]
    date: Option<String>,

    /// Amount charged
    #[arg(short, long)]
    amount: Option<String>,

    /// Payment status
    #[arg(long, value_enum)]
    status: Option<PaymentStatus>,

    /// Destination reading for the client
    #[arg(long)]
    destination: Option<String>,

    /// Specific year the reading refers to
    #[arg(long)]
    year: Option<String>,

    /// Flag the session as needing attention
    #[arg(long)]
    attention: bool,

    /// Points of attention
    #[arg(long)]
    attention_note: Option<String>,

    /// Session details: revelations, advice and guidance
    #[arg(long)]
    details: Option<String>,

    /// Notes about the treatment
    #[arg(long)]
    treatment: Option<String>,

    /// Additional information and referrals
    #[arg(long)]
    referral: Option<String>,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Determine config directory
    let cfg_dir = match cli.config_dir {
        Some(p) => p,
        None => config_dir()?,
    };
    tracing::debug!(config_dir = %cfg_dir.display(), "resolved config directory");

    match cli.command {
        Commands::Init => cmd_init(&cfg_dir),
        Commands::Add(args) => cmd_add(&cfg_dir, args),
        Commands::List { limit } => cmd_list(&cfg_dir, limit),
        Commands::Report {
            input,
            output,
            dry_run,
            open,
        } => cmd_report(&cfg_dir, input, output, dry_run, open),
        Commands::Birthdays => cmd_birthdays(&cfg_dir),
        Commands::Sign { date } => cmd_sign(&date),
    }
}

/// Initialize config directory with template files
fn cmd_init(cfg_dir: &Path) -> Result<()> {
    use std::fs;

    if cfg_dir.exists() {
        return Err(AppError::AlreadyInitialized(cfg_dir.to_path_buf()));
    }

    fs::create_dir_all(cfg_dir)?;
    fs::create_dir_all(cfg_dir.join("output"))?;

    fs::write(cfg_dir.join("config.toml"), CONFIG_TEMPLATE)?;
    fs::write(cfg_dir.join("sessions.toml"), SESSIONS_TEMPLATE)?;

    println!("Initialized atendimentos config at: {}", cfg_dir.display());
    println!();
    println!("Next steps:");
    println!(
        "  1. Set your practice name:  $EDITOR {}/config.toml",
        cfg_dir.display()
    );
    println!("  2. Record a session:        atendimentos add --client <name> --amount <value>");
    println!("  3. Export the report:       atendimentos report");

    Ok(())
}

fn parse_date_arg(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::InvalidDate(value.to_string()))
}

fn parse_amount_arg(value: &str) -> Result<String> {
    let trimmed = value.trim();
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => Ok(trimmed.to_string()),
        _ => Err(AppError::InvalidAmount(value.to_string())),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Record a new session
fn cmd_add(cfg_dir: &Path, args: AddArgs) -> Result<()> {
    if !cfg_dir.exists() {
        return Err(AppError::ConfigNotFound(cfg_dir.to_path_buf()));
    }

    let client = args.client.trim().to_string();
    if client.is_empty() {
        return Err(AppError::MissingClientName);
    }

    let today = Local::now().date_naive();
    let birth = args.birth_date.as_deref().map(parse_date_arg).transpose()?;
    let session_date = match args.date.as_deref() {
        Some(d) => parse_date_arg(d)?,
        None => today,
    };
    let amount = args.amount.as_deref().map(parse_amount_arg).transpose()?;
    let sign = birth.map(ZodiacSign::from_date);

    let config = load_config(cfg_dir)?;
    let mut store = load_sessions(cfg_dir)?;

    let now = Local::now();
    let record = SessionRecord {
        id: store.next_id(now.timestamp_millis()),
        client_name: Some(client.clone()),
        birth_date: birth.map(|d| d.format("%Y-%m-%d").to_string()),
        sign: sign.map(|s| s.name().to_string()),
        service_type: args.service.map(|s| s.as_tag().to_string()),
        session_date: Some(session_date.format("%Y-%m-%d").to_string()),
        amount,
        payment_status: args.status.map(|s| s.as_tag().to_string()),
        destination: non_blank(args.destination),
        year: non_blank(args.year),
        attention: args.attention,
        attention_note: non_blank(args.attention_note),
        details: non_blank(args.details),
        treatment: non_blank(args.treatment),
        referral: non_blank(args.referral),
        created_at: Some(now.to_rfc3339()),
    };

    let amount_display = format_currency(
        parse_amount(record.amount_text()),
        &config.report.currency_symbol,
    );
    let id = store.append(record);
    save_sessions(cfg_dir, &store)?;
    tracing::info!(id = %id, "session saved");

    println!("Saved session {id}");
    println!("  Client: {client}");
    if let Some(sign) = sign {
        println!("  Sign:   {sign}");
    }
    println!("  Date:   {}", session_date.format("%d/%m/%Y"));
    println!("  Amount: {amount_display}");

    if let Some(age) = birth.and_then(|b| birthday_age(b, today)) {
        println!();
        println!("🎉 Hoje é aniversário desta pessoa! {age} anos");
        println!("   Não esqueça de parabenizar!");
    }

    Ok(())
}

#[derive(Tabled)]
struct SessionRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "DATE")]
    date: String,
    #[tabled(rename = "CLIENT")]
    client: String,
    #[tabled(rename = "SERVICE")]
    service: String,
    #[tabled(rename = "AMOUNT")]
    amount: String,
    #[tabled(rename = "STATUS")]
    status: String,
}

/// List recorded sessions, newest first
fn cmd_list(cfg_dir: &Path, limit: Option<usize>) -> Result<()> {
    if !cfg_dir.exists() {
        return Err(AppError::ConfigNotFound(cfg_dir.to_path_buf()));
    }

    let config = load_config(cfg_dir)?;
    let store = load_sessions(cfg_dir)?;

    if store.sessions.is_empty() {
        println!("No sessions recorded yet.");
        return Ok(());
    }

    let symbol = &config.report.currency_symbol;
    let shown: Vec<_> = store.sessions.iter().rev().enumerate().collect();
    let shown = match limit {
        Some(n) => &shown[..n.min(shown.len())],
        None => &shown[..],
    };

    let rows: Vec<SessionRow> = shown
        .iter()
        .map(|(idx, record)| {
            let FormattedRow {
                client,
                date,
                service,
                amount,
                status,
            } = format_row(record, symbol);
            SessionRow {
                index: idx + 1,
                id: record.id.clone(),
                date,
                client,
                service,
                amount,
                status,
            }
        })
        .collect();

    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{table}");

    // Totals always cover every recorded session
    let summary = summarize(&store.sessions);
    println!();
    for line in summary.lines(symbol) {
        println!("{line}");
    }

    Ok(())
}

/// Generate the general PDF report
fn cmd_report(
    cfg_dir: &Path,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    dry_run: bool,
    open: bool,
) -> Result<()> {
    if !cfg_dir.exists() {
        return Err(AppError::ConfigNotFound(cfg_dir.to_path_buf()));
    }

    let config = load_config(cfg_dir)?;
    let records = match input {
        Some(path) => load_snapshot(&path)?,
        None => load_sessions(cfg_dir)?.sessions,
    };
    let settings = config.report_settings();
    let generated_at = Local::now().naive_local();

    if dry_run {
        let summary = summarize(&records);
        let rows: Vec<FormattedRow> = records
            .iter()
            .map(|r| format_row(r, &settings.currency_symbol))
            .collect();
        let pages = layout_document(&summary, &rows, generated_at, &settings);

        println!("Report layout: {} page(s)", pages.len());
        for page in &pages {
            if page.rows.is_empty() {
                println!("  Page {}: no sessions", page.number);
            } else {
                println!(
                    "  Page {}: sessions {}-{}",
                    page.number,
                    page.rows.start + 1,
                    page.rows.end
                );
            }
            println!("    {}", page.footer);
        }
        return Ok(());
    }

    let output_dir = match output {
        Some(dir) => dir,
        None => resolve_output_dir(&config.report.output_dir, cfg_dir),
    };
    let engine = TypstEngine::new(expand_path(&config.report.typst_bin));

    let exported = export_report(
        &records,
        generated_at,
        &settings,
        &engine,
        &output_dir,
        &ConsoleReporter,
    )?;

    println!("  Sessions: {}", exported.summary.total_count);
    println!(
        "  Total:    {}",
        format_currency(exported.summary.total_amount, &settings.currency_symbol)
    );
    println!("  Pages:    {}", exported.page_count);
    println!("  Saved:    {}", exported.path.display());

    if open {
        open_path(&exported.path)?;
    }

    Ok(())
}

/// Show clients whose birthday is today
fn cmd_birthdays(cfg_dir: &Path) -> Result<()> {
    if !cfg_dir.exists() {
        return Err(AppError::ConfigNotFound(cfg_dir.to_path_buf()));
    }

    let store = load_sessions(cfg_dir)?;
    let today = Local::now().date_naive();
    let found = birthdays_on(&store.sessions, today);

    if found.is_empty() {
        println!("No birthdays today.");
        return Ok(());
    }

    for birthday in found {
        println!("🎂 {} faz {} anos hoje", birthday.name, birthday.age);
    }

    Ok(())
}

fn cmd_sign(date: &str) -> Result<()> {
    let date = parse_date(date).ok_or_else(|| AppError::InvalidDate(date.to_string()))?;
    println!("{}", ZodiacSign::from_date(date));
    Ok(())
}

fn open_path(pdf_path: &Path) -> Result<()> {
    // Open with system default viewer
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(pdf_path).spawn()?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open").arg(pdf_path).spawn()?;
    }

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", ""])
            .arg(pdf_path)
            .spawn()?;
    }
    Ok(())
}

use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tabled::{settings::Style, Table, Tabled};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use agency::config::{config_dir, init_config_dir, load_config, load_seed, Config};
use agency::display::{format_money, line_items_table};
use agency::invoice::{
    add_line_item, parse_number, recompute_totals, set_tax_config, update_line_item,
};
use agency::store::{NewProposal, TaskStatus};
use agency::{AgencyError, AppState, Command, InvoiceStatus, LineItem, LineItemEdit, Result};

#[derive(Parser)]
#[command(name = "agency")]
#[command(version, about = "Minimal agency management toolkit", long_about = None)]
struct Cli {
    /// Path to config directory (default: XDG config dir or ~/.agency)
    #[arg(short = 'C', long, global = true)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize config directory with template files
    Init,

    /// List clients
    Clients,

    /// List projects
    Projects,

    /// Show the task board
    Tasks,

    /// List invoices
    Invoices,

    /// Show one invoice with its line items
    Show {
        /// Invoice id or number (e.g., INV-001)
        invoice: String,
    },

    /// List proposals
    Proposals,

    /// Show dashboard statistics
    Dashboard {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Compute totals for ad-hoc line items
    Quote {
        /// Line items in format "description:quantity:rate" (can be repeated)
        #[arg(short, long, value_name = "DESC:QTY:RATE")]
        item: Vec<String>,

        /// Leave tax off
        #[arg(long)]
        no_tax: bool,

        /// Tax percentage (default from config.toml)
        #[arg(long)]
        tax_rate: Option<String>,
    },

    /// Build an invoice, submit it to the in-memory store and show it
    Draft {
        /// Client id from seed.toml
        #[arg(short, long)]
        client: String,

        /// Line items in format "description:quantity:rate" (can be repeated)
        #[arg(short, long, value_name = "DESC:QTY:RATE")]
        item: Vec<String>,

        /// Edit a line after it is added, e.g. "2:rate=200" (can be repeated)
        #[arg(long, value_name = "LINE:FIELD=VALUE")]
        set: Vec<String>,

        /// Remove a line by its number (can be repeated)
        #[arg(long, value_name = "LINE")]
        remove: Vec<usize>,

        /// Leave tax off
        #[arg(long)]
        no_tax: bool,

        /// Tax percentage (default from config.toml)
        #[arg(long)]
        tax_rate: Option<String>,

        /// Invoice status (draft, pending, paid, overdue)
        #[arg(long, default_value = "draft")]
        status: String,

        /// Invoice date (YYYY-MM-DD, default: today)
        #[arg(long)]
        date: Option<String>,

        /// Free-text notes
        #[arg(long)]
        notes: Option<String>,
    },

    /// Create a proposal and list proposals
    Propose {
        /// Client id from seed.toml
        #[arg(short, long)]
        client: String,

        /// Project id from seed.toml
        #[arg(short, long)]
        project: String,

        /// Proposal title
        #[arg(short, long)]
        title: String,

        /// Line items in format "description:quantity:rate" (can be repeated)
        #[arg(short, long, value_name = "DESC:QTY:RATE")]
        item: Vec<String>,

        /// Valid until (YYYY-MM-DD, default: 30 days from today)
        #[arg(long)]
        valid_until: Option<String>,
    },

    /// Set an invoice's status
    Mark {
        /// Invoice id or number
        invoice: String,

        /// New status (draft, pending, paid, overdue)
        status: String,
    },

    /// Move a task to another board column
    MoveTask {
        /// Task id
        task: String,

        /// Target column (todo, in-progress, completed)
        status: String,
    },
}

fn main() {
    init_tracing();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("AGENCY_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let cfg_dir = match cli.config_dir {
        Some(p) => p,
        None => config_dir()?,
    };

    match cli.command {
        Commands::Init => cmd_init(&cfg_dir),
        Commands::Clients => cmd_clients(&cfg_dir),
        Commands::Projects => cmd_projects(&cfg_dir),
        Commands::Tasks => cmd_tasks(&cfg_dir),
        Commands::Invoices => cmd_invoices(&cfg_dir),
        Commands::Show { invoice } => cmd_show(&cfg_dir, &invoice),
        Commands::Proposals => cmd_proposals(&cfg_dir),
        Commands::Dashboard { json } => cmd_dashboard(&cfg_dir, json),
        Commands::Quote {
            item,
            no_tax,
            tax_rate,
        } => cmd_quote(&cfg_dir, &item, no_tax, tax_rate.as_deref()),
        Commands::Draft {
            client,
            item,
            set,
            remove,
            no_tax,
            tax_rate,
            status,
            date,
            notes,
        } => cmd_draft(
            &cfg_dir,
            DraftArgs {
                client,
                items: item,
                edits: set,
                removals: remove,
                no_tax,
                tax_rate,
                status,
                date,
                notes,
            },
        ),
        Commands::Propose {
            client,
            project,
            title,
            item,
            valid_until,
        } => cmd_propose(&cfg_dir, client, project, title, &item, valid_until),
        Commands::Mark { invoice, status } => cmd_mark(&cfg_dir, &invoice, &status),
        Commands::MoveTask { task, status } => cmd_move_task(&cfg_dir, &task, &status),
    }
}

/// Load config.toml and build a fresh in-memory state from seed.toml
fn open(cfg_dir: &Path) -> Result<(Config, AppState)> {
    if !cfg_dir.exists() {
        return Err(AgencyError::ConfigNotFound(cfg_dir.to_path_buf()));
    }
    let config = load_config(cfg_dir)?;
    let state = AppState::from_seed(load_seed(cfg_dir)?);
    Ok((config, state))
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn parse_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .map_err(|_| AgencyError::InvalidDate(input.to_string()))
}

/// Parse item input like "Design:2:1500" into (description, quantity, rate).
/// The description may itself contain colons.
fn parse_item_input(input: &str) -> Result<(String, f64, f64)> {
    let mut parts = input.rsplitn(3, ':');
    let (Some(rate), Some(qty), Some(description)) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(AgencyError::InvalidItemFormat(input.to_string()));
    };
    Ok((description.to_string(), parse_number(qty), parse_number(rate)))
}

/// Parse "2:rate=200" into a 1-based line number and the edit
fn parse_line_edit(input: &str) -> Result<(usize, LineItemEdit)> {
    let (line, edit) = input
        .split_once(':')
        .ok_or_else(|| AgencyError::InvalidEdit(input.to_string()))?;
    let line: usize = line
        .trim()
        .parse()
        .map_err(|_| AgencyError::InvalidEdit(input.to_string()))?;
    Ok((line, edit.parse()?))
}

/// Convert a 1-based line number into an index, checking bounds
fn line_index(line: usize, count: usize) -> Result<usize> {
    if line == 0 || line > count {
        return Err(AgencyError::InvalidLineIndex { index: line, count });
    }
    Ok(line - 1)
}

/// Build line items through the engine, the way the invoice form does:
/// add a blank row, then fill in each field
fn build_items(inputs: &[String]) -> Result<Vec<LineItem>> {
    let mut items = Vec::new();
    for input in inputs {
        let (description, quantity, rate) = parse_item_input(input)?;
        items = add_line_item(&items);
        let idx = items.len() - 1;
        items = update_line_item(&items, idx, LineItemEdit::Description(description));
        items = update_line_item(&items, idx, LineItemEdit::Quantity(quantity));
        items = update_line_item(&items, idx, LineItemEdit::Rate(rate));
    }
    Ok(items)
}

/// Initialize config directory with template files
fn cmd_init(cfg_dir: &Path) -> Result<()> {
    init_config_dir(cfg_dir)?;

    println!("Initialized agency config at: {}", cfg_dir.display());
    println!();
    println!("Next steps:");
    println!(
        "  1. Edit your company details:  $EDITOR {}/config.toml",
        cfg_dir.display()
    );
    println!(
        "  2. Edit the starting records:  $EDITOR {}/seed.toml",
        cfg_dir.display()
    );
    println!();
    println!("Then try:");
    println!("  agency quote --item \"Design:2:1500\"");

    Ok(())
}

#[derive(Tabled)]
struct ClientRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "COMPANY")]
    company: String,
    #[tabled(rename = "EMAIL")]
    email: String,
    #[tabled(rename = "STATUS")]
    status: String,
}

#[derive(Tabled)]
struct ProjectRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "CLIENT")]
    client: String,
    #[tabled(rename = "STATUS")]
    status: String,
    #[tabled(rename = "PROGRESS")]
    progress: String,
    #[tabled(rename = "BUDGET")]
    budget: String,
    #[tabled(rename = "DATES")]
    dates: String,
}

#[derive(Tabled)]
struct InvoiceRow {
    #[tabled(rename = "NUMBER")]
    number: String,
    #[tabled(rename = "DATE")]
    date: String,
    #[tabled(rename = "DUE")]
    due: String,
    #[tabled(rename = "CLIENT")]
    client: String,
    #[tabled(rename = "TOTAL")]
    total: String,
    #[tabled(rename = "STATUS")]
    status: String,
}

#[derive(Tabled)]
struct ProposalRow {
    #[tabled(rename = "NUMBER")]
    number: String,
    #[tabled(rename = "TITLE")]
    title: String,
    #[tabled(rename = "CLIENT")]
    client: String,
    #[tabled(rename = "VALID UNTIL")]
    valid_until: String,
    #[tabled(rename = "TOTAL")]
    total: String,
    #[tabled(rename = "STATUS")]
    status: String,
}

fn client_name(state: &AppState, id: &str) -> String {
    state
        .client(id)
        .map(|c| c.name.clone())
        .unwrap_or_else(|_| id.to_string())
}

/// List clients
fn cmd_clients(cfg_dir: &Path) -> Result<()> {
    let (_, state) = open(cfg_dir)?;

    if state.clients.is_empty() {
        println!("No clients yet.");
        println!("Add clients to: {}/seed.toml", cfg_dir.display());
        return Ok(());
    }

    let rows: Vec<ClientRow> = state
        .clients
        .iter()
        .map(|client| ClientRow {
            id: client.id.clone(),
            name: client.name.clone(),
            company: client.company.clone(),
            email: client.email.clone(),
            status: format!("{:?}", client.status),
        })
        .collect();

    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{table}");

    Ok(())
}

/// List projects
fn cmd_projects(cfg_dir: &Path) -> Result<()> {
    let (config, state) = open(cfg_dir)?;

    if state.projects.is_empty() {
        println!("No projects yet.");
        return Ok(());
    }

    let rows: Vec<ProjectRow> = state
        .projects
        .iter()
        .map(|project| ProjectRow {
            id: project.id.clone(),
            name: project.name.clone(),
            client: client_name(&state, &project.client_id),
            status: format!("{:?}", project.status),
            progress: format!("{}%", project.progress),
            budget: format_money(project.budget, &config.invoice.currency_symbol),
            dates: format!("{} → {}", project.start_date, project.end_date),
        })
        .collect();

    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{table}");

    Ok(())
}

fn print_board(state: &AppState) {
    let board = state.board();
    for column in &board.columns {
        println!("{} ({})", column.status, column.tasks.len());
        for task in &column.tasks {
            println!(
                "  [{}] {} - {} (due {}, {})",
                task.id,
                task.title,
                task.priority,
                task.due_date,
                client_name(state, &task.client_id)
            );
        }
        println!();
    }
}

/// Show the task board
fn cmd_tasks(cfg_dir: &Path) -> Result<()> {
    let (_, state) = open(cfg_dir)?;
    print_board(&state);
    Ok(())
}

fn print_invoices(config: &Config, state: &AppState) {
    let symbol = &config.invoice.currency_symbol;
    let rows: Vec<InvoiceRow> = state
        .invoices
        .iter()
        .map(|invoice| InvoiceRow {
            number: invoice.number.clone(),
            date: invoice.date.to_string(),
            due: invoice.due_date.to_string(),
            client: client_name(state, &invoice.client_id),
            total: format_money(invoice.totals().total, symbol),
            status: invoice.status.to_string(),
        })
        .collect();

    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{table}");

    let stats = state.stats(today());
    println!();
    println!("Total: {} invoices", state.invoices.len());
    println!("  Paid:    {}", format_money(stats.total_revenue, symbol));
    println!("  Pending: {}", format_money(stats.pending_amount, symbol));
}

/// List invoices
fn cmd_invoices(cfg_dir: &Path) -> Result<()> {
    let (config, state) = open(cfg_dir)?;

    if state.invoices.is_empty() {
        println!("No invoices yet.");
        return Ok(());
    }

    print_invoices(&config, &state);
    Ok(())
}

fn print_invoice(config: &Config, state: &AppState, reference: &str) -> Result<()> {
    let invoice = state.invoice(reference)?;

    println!("Invoice {} ({})", invoice.number, invoice.status);
    println!("  Client: {}", client_name(state, &invoice.client_id));
    println!("  Date:   {}", invoice.date.format("%B %d, %Y"));
    println!("  Due:    {}", invoice.due_date.format("%B %d, %Y"));
    if !invoice.notes.is_empty() {
        println!("  Notes:  {}", invoice.notes);
    }
    println!(
        "{}",
        line_items_table(
            invoice.items(),
            &invoice.tax(),
            &invoice.totals(),
            &config.invoice.currency_symbol
        )
    );
    Ok(())
}

/// Show one invoice
fn cmd_show(cfg_dir: &Path, reference: &str) -> Result<()> {
    let (config, state) = open(cfg_dir)?;
    print_invoice(&config, &state, reference)
}

fn print_proposals(config: &Config, state: &AppState) {
    let rows: Vec<ProposalRow> = state
        .proposals
        .iter()
        .map(|proposal| ProposalRow {
            number: proposal.number.clone(),
            title: proposal.title.clone(),
            client: client_name(state, &proposal.client_id),
            valid_until: proposal.valid_until.to_string(),
            total: format_money(proposal.total, &config.invoice.currency_symbol),
            status: format!("{:?}", proposal.status),
        })
        .collect();

    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{table}");
}

/// List proposals
fn cmd_proposals(cfg_dir: &Path) -> Result<()> {
    let (config, state) = open(cfg_dir)?;

    if state.proposals.is_empty() {
        println!("No proposals yet.");
        return Ok(());
    }

    print_proposals(&config, &state);
    Ok(())
}

/// Show dashboard statistics
fn cmd_dashboard(cfg_dir: &Path, json: bool) -> Result<()> {
    let (config, state) = open(cfg_dir)?;
    let stats = state.stats(today());

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    let symbol = &config.invoice.currency_symbol;
    println!("{} Dashboard", config.company.name);
    println!("{}", "-".repeat(50));
    println!("Clients:          {}", stats.total_clients);
    println!("Projects:         {}", stats.total_projects);
    println!(
        "Tasks:            {} ({} completed, {} overdue)",
        stats.total_tasks, stats.completed_tasks, stats.overdue_tasks
    );
    println!(
        "Invoices:         {} ({} paid)",
        stats.total_invoices, stats.paid_invoices
    );
    println!("Revenue:          {}", format_money(stats.total_revenue, symbol));
    println!("Pending:          {}", format_money(stats.pending_amount, symbol));

    Ok(())
}

/// Compute totals for ad-hoc line items without touching the store
fn cmd_quote(
    cfg_dir: &Path,
    inputs: &[String],
    no_tax: bool,
    tax_rate: Option<&str>,
) -> Result<()> {
    let (config, _) = open(cfg_dir)?;

    let items = build_items(inputs)?;
    let tax = set_tax_config(
        config.invoice.default_tax(),
        no_tax.then_some(false),
        tax_rate.map(parse_number),
    );
    let totals = recompute_totals(&items, &tax);

    println!(
        "{}",
        line_items_table(&items, &tax, &totals, &config.invoice.currency_symbol)
    );
    Ok(())
}

struct DraftArgs {
    client: String,
    items: Vec<String>,
    edits: Vec<String>,
    removals: Vec<usize>,
    no_tax: bool,
    tax_rate: Option<String>,
    status: String,
    date: Option<String>,
    notes: Option<String>,
}

/// Build an invoice through the document API, submit it, and show the result
fn cmd_draft(cfg_dir: &Path, args: DraftArgs) -> Result<()> {
    let (config, state) = open(cfg_dir)?;

    let status: InvoiceStatus = args.status.parse()?;
    let date = match args.date {
        Some(s) => parse_date(&s)?,
        None => today(),
    };

    let mut doc = state.draft_invoice(&args.client, date, &config.invoice)?;

    if args.no_tax || args.tax_rate.is_some() {
        doc.set_tax(
            args.no_tax.then_some(false),
            args.tax_rate.as_deref().map(parse_number),
        );
    }

    // The draft starts with one blank row; fill it before adding more
    for (idx, input) in args.items.iter().enumerate() {
        let (description, quantity, rate) = parse_item_input(input)?;
        if idx >= doc.items().len() {
            doc.add_item();
        }
        doc.update_item(idx, LineItemEdit::Description(description));
        doc.update_item(idx, LineItemEdit::Quantity(quantity));
        doc.update_item(idx, LineItemEdit::Rate(rate));
    }

    for input in &args.edits {
        let (line, edit) = parse_line_edit(input)?;
        let idx = line_index(line, doc.items().len())?;
        doc.update_item(idx, edit);
    }

    // Highest first so earlier removals don't shift later line numbers
    let mut removals = args.removals;
    removals.sort_unstable_by(|a, b| b.cmp(a));
    removals.dedup();
    for line in removals {
        let idx = line_index(line, doc.items().len())?;
        doc.remove_item(idx);
    }

    doc.status = status;
    doc.notes = args.notes.unwrap_or_default();

    let number = doc.number.clone();
    let state = state.apply(Command::SubmitInvoice(doc))?;

    println!("Submitted {}", number);
    print_invoice(&config, &state, &number)?;
    println!(
        "{} invoices in memory (not saved)",
        state.invoices.len()
    );
    Ok(())
}

/// Create a proposal and list all proposals
fn cmd_propose(
    cfg_dir: &Path,
    client: String,
    project: String,
    title: String,
    inputs: &[String],
    valid_until: Option<String>,
) -> Result<()> {
    let (config, state) = open(cfg_dir)?;

    let valid_until = match valid_until {
        Some(s) => parse_date(&s)?,
        None => today() + chrono::Duration::days(30),
    };

    let proposal = NewProposal {
        client_id: client,
        project_id: project,
        title,
        valid_until,
        items: build_items(inputs)?,
    };
    let state = state.apply(Command::AddProposal {
        proposal,
        prefix: config.invoice.proposal_prefix.clone(),
    })?;

    if let Some(created) = state.proposals.last() {
        println!(
            "Created {} ({})",
            created.number,
            format_money(created.total, &config.invoice.currency_symbol)
        );
    }
    print_proposals(&config, &state);
    Ok(())
}

/// Set an invoice's status and list invoices
fn cmd_mark(cfg_dir: &Path, reference: &str, status: &str) -> Result<()> {
    let (config, state) = open(cfg_dir)?;
    let status: InvoiceStatus = status.parse()?;

    let state = state.apply(Command::SetInvoiceStatus {
        id: reference.to_string(),
        status,
    })?;

    println!("Marked {} as {}", reference, status);
    print_invoices(&config, &state);
    Ok(())
}

/// Move a task and show the board
fn cmd_move_task(cfg_dir: &Path, task: &str, status: &str) -> Result<()> {
    let (_, state) = open(cfg_dir)?;
    let status: TaskStatus = status.parse()?;

    let state = state.apply(Command::MoveTask {
        id: task.to_string(),
        status,
    })?;

    println!("Moved task {} to {}", task, status);
    println!();
    print_board(&state);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_item_input() {
        let (desc, qty, rate) = parse_item_input("Design:2:1500").unwrap();
        assert_eq!(desc, "Design");
        assert_eq!(qty, 2.0);
        assert_eq!(rate, 1500.0);

        let (desc, _, _) = parse_item_input("Phase 1: discovery:1:800").unwrap();
        assert_eq!(desc, "Phase 1: discovery");

        let (_, qty, _) = parse_item_input("Design:abc:1500").unwrap();
        assert!(qty.is_nan());

        assert!(parse_item_input("Design:2").is_err());
    }

    #[test]
    fn test_parse_line_edit() {
        assert_eq!(
            parse_line_edit("2:rate=200").unwrap(),
            (2, LineItemEdit::Rate(200.0))
        );
        assert!(parse_line_edit("x:rate=200").is_err());
        assert!(parse_line_edit("rate=200").is_err());
    }

    #[test]
    fn test_line_index() {
        assert_eq!(line_index(1, 1).unwrap(), 0);
        assert!(matches!(
            line_index(0, 1),
            Err(AgencyError::InvalidLineIndex { index: 0, count: 1 })
        ));
        assert!(line_index(3, 2).is_err());
    }

    #[test]
    fn test_build_items() {
        let inputs = ["Design:2:1500".to_string(), "Hosting:1:200".to_string()];
        let items = build_items(&inputs).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].amount, 3000.0);
        assert_eq!(items[1].amount, 200.0);
    }
}

// jewel-ledger: command line front end for the shop ledger
use clap::{Args, Parser, Subcommand, ValueEnum};
use engine::config::settings::EngineSettings;
use engine::data::snapshot;
use engine::data::store::MemoryStore;
use engine::error::EngineError;
use engine::models::form::{BillForm, ExpenseForm, ItemInput};
use engine::models::query::{wall_month, BillQuery, Period};
use engine::services::ledger_service::dashboard::render_dashboard;
use engine::services::LedgerService;
use shared::finance::{format_currency, sum_amounts};
use shared::models::{Bill, BillKind, Expense};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "jewel-ledger",
    version,
    about = "Purchase, sell and expense ledger for a jewelry shop"
)]
struct Cli {
    /// Settings JSON file; defaults apply when omitted.
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    /// Ledger snapshot file; overrides `store_path` from the settings.
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Record a purchase bill.
    Purchase(BillArgs),
    /// Record a sell bill.
    Sell(BillArgs),
    /// Record a miscellaneous expense.
    Expense(ExpenseArgs),
    /// List records for a month, a date range or a search term.
    List(ListArgs),
    /// Delete a record. Requires `--confirm DELETE`.
    Delete(DeleteArgs),
    /// Monthly totals across sales, purchases and expenses.
    Dashboard(MonthArgs),
    /// Print the invoice of a stored bill.
    Invoice {
        #[arg(value_enum)]
        kind: BillKindArg,
        id: u64,
    },
}

#[derive(Args, Debug)]
struct BillArgs {
    #[arg(long)]
    customer: String,
    #[arg(long, default_value = "")]
    contact: String,
    #[arg(long, default_value = "")]
    description: String,
    /// `metal:rate:weight`, repeatable.
    #[arg(long = "item", required = true)]
    items: Vec<ItemInput>,
}

#[derive(Args, Debug)]
struct ExpenseArgs {
    #[arg(long = "type")]
    kind: String,
    #[arg(long)]
    amount: String,
    #[arg(long, default_value = "")]
    gst: String,
    #[arg(long, default_value = "")]
    description: String,
}

#[derive(Args, Debug, Clone, Copy)]
struct MonthArgs {
    /// Month number, 1-12. Defaults to the current month.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
    month: Option<u32>,
    #[arg(long)]
    year: Option<i32>,
}

#[derive(Args, Debug)]
struct ListArgs {
    #[arg(value_enum)]
    records: RecordArg,
    #[command(flatten)]
    month: MonthArgs,
    /// First day of a custom range, YYYY-MM-DD.
    #[arg(long)]
    from: Option<String>,
    /// Last day of a custom range, YYYY-MM-DD.
    #[arg(long)]
    to: Option<String>,
    /// Customer, contact, description or bill number (bills only).
    #[arg(long)]
    search: Option<String>,
    /// Write CSV to stdout instead of a table.
    #[arg(long)]
    csv: bool,
}

#[derive(Args, Debug)]
struct DeleteArgs {
    #[arg(value_enum)]
    record: RecordArg,
    id: u64,
    #[arg(long, default_value = "")]
    confirm: String,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum BillKindArg {
    Purchase,
    Sell,
}

impl From<BillKindArg> for BillKind {
    fn from(arg: BillKindArg) -> Self {
        match arg {
            BillKindArg::Purchase => BillKind::Purchase,
            BillKindArg::Sell => BillKind::Sell,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum RecordArg {
    #[value(alias = "purchases")]
    Purchase,
    #[value(alias = "sells", alias = "sales")]
    Sell,
    #[value(alias = "expenses")]
    Expense,
}

impl RecordArg {
    fn bill_kind(self) -> Option<BillKind> {
        match self {
            RecordArg::Purchase => Some(BillKind::Purchase),
            RecordArg::Sell => Some(BillKind::Sell),
            RecordArg::Expense => None,
        }
    }
}

fn month_period(args: MonthArgs, service: &LedgerService<MemoryStore>) -> (i32, i32) {
    let (current_month, current_year) = wall_month(service.zone(), service.now());
    let month = args.month.map_or(current_month, |m| m as i32 - 1);
    (month, args.year.unwrap_or(current_year))
}

fn list_period(args: &ListArgs, service: &LedgerService<MemoryStore>) -> Period {
    if args.from.is_some() || args.to.is_some() {
        Period::Range {
            start: args.from.clone(),
            end: args.to.clone(),
        }
    } else {
        let (month, year) = month_period(args.month, service);
        Period::Month { month, year }
    }
}

fn print_bills(bills: &[Bill], service: &LedgerService<MemoryStore>) {
    println!(
        "{:>6}  {:<22}{:<24}{:>16}{:>14}{:>16}",
        "Bill", "Date", "Customer", "Taxable", "GST", "Total"
    );
    for bill in bills {
        println!(
            "{:>6}  {:<22}{:<24}{:>16}{:>14}{:>16}",
            bill.bill_number,
            service.zone().format_instant(bill.created_at),
            bill.customer,
            format_currency(bill.totals.taxable),
            format_currency(bill.totals.gst),
            format_currency(bill.totals.grand_total)
        );
    }
    let grand = sum_amounts(bills.iter().map(|b| b.totals.grand_total));
    println!("{} bills, total {}", bills.len(), format_currency(grand));
}

fn print_expenses(expenses: &[Expense], service: &LedgerService<MemoryStore>) {
    println!(
        "{:>6}  {:<22}{:<20}{:>16}{:>14}{:>16}",
        "Id", "Date", "Type", "Amount", "GST", "Total"
    );
    for expense in expenses {
        println!(
            "{:>6}  {:<22}{:<20}{:>16}{:>14}{:>16}",
            expense.id,
            service.zone().format_instant(expense.created_at),
            expense.kind,
            format_currency(expense.amount),
            format_currency(expense.gst),
            format_currency(expense.total())
        );
    }
    let total = sum_amounts(expenses.iter().map(Expense::total));
    println!("{} expenses, total {}", expenses.len(), format_currency(total));
}

/// Runs one command. Returns whether the store changed and must be saved.
async fn run(
    command: Command,
    service: &LedgerService<MemoryStore>,
    settings: &EngineSettings,
) -> Result<bool, EngineError> {
    match command {
        Command::Purchase(args) => record_bill(BillKind::Purchase, args, service).await,
        Command::Sell(args) => record_bill(BillKind::Sell, args, service).await,
        Command::Expense(args) => {
            let expense = service
                .record_expense(ExpenseForm {
                    kind: args.kind,
                    amount: args.amount,
                    description: args.description,
                    gst: args.gst,
                })
                .await?;
            println!(
                "Expense {} saved: {} {} (total {})",
                expense.id,
                expense.kind,
                format_currency(expense.amount),
                format_currency(expense.total())
            );
            Ok(true)
        }
        Command::List(args) => {
            let period = list_period(&args, service);
            match args.records.bill_kind() {
                Some(kind) => {
                    let query = BillQuery {
                        period,
                        search: args.search.clone(),
                    };
                    if args.csv {
                        service.export_bills_csv(kind, &query, std::io::stdout().lock()).await?;
                    } else {
                        let bills = service.list_bills(kind, &query).await?;
                        print_bills(&bills, service);
                    }
                }
                None => {
                    if args.search.is_some() {
                        warn!("--search applies to bills only; listing expenses by period.");
                    }
                    if args.csv {
                        service.export_expenses_csv(&period, std::io::stdout().lock()).await?;
                    } else {
                        let expenses = service.list_expenses(&period).await?;
                        print_expenses(&expenses, service);
                    }
                }
            }
            Ok(false)
        }
        Command::Delete(args) => {
            match args.record.bill_kind() {
                Some(kind) => service.delete_bill(kind, args.id, &args.confirm).await?,
                None => service.delete_expense(args.id, &args.confirm).await?,
            }
            println!("Deleted.");
            Ok(true)
        }
        Command::Dashboard(args) => {
            let (month, year) = month_period(args, service);
            let report = service.dashboard(month, year).await?;
            print!("{}", render_dashboard(&report));
            Ok(false)
        }
        Command::Invoice { kind, id } => {
            let text = service.invoice(kind.into(), id, &settings.shop).await?;
            print!("{}", text);
            Ok(false)
        }
    }
}

async fn record_bill(
    kind: BillKind,
    args: BillArgs,
    service: &LedgerService<MemoryStore>,
) -> Result<bool, EngineError> {
    let form = BillForm {
        customer: args.customer,
        contact: args.contact,
        description: args.description,
        items: args.items,
    };
    let bill = service.record_bill(kind, form).await?;
    println!(
        "{} #{} saved: taxable {}, GST {}, total {}",
        kind.label(),
        bill.bill_number,
        format_currency(bill.totals.taxable),
        format_currency(bill.totals.gst),
        format_currency(bill.totals.grand_total)
    );
    Ok(true)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so list and CSV output stay clean on stdout.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = EngineSettings::load_optional(cli.settings.as_deref())?;
    let store_path = cli.store.clone().unwrap_or_else(|| settings.store_path.clone());
    info!(
        store = %store_path.display(),
        offset_minutes = settings.reporting_offset_minutes,
        "Starting jewel-ledger."
    );

    let store = Arc::new(RwLock::new(snapshot::load_or_default(&store_path)?));
    let service = LedgerService::new(store.clone(), settings.zone());

    match run(cli.command, &service, &settings).await {
        Ok(true) => {
            let guard = store.read().await;
            snapshot::save(&guard, &store_path)?;
            Ok(())
        }
        Ok(false) => Ok(()),
        Err(e) => {
            if e.is_user_error() {
                warn!(error = %e, "Command rejected.");
            } else {
                error!(error = ?e, "Command failed.");
            }
            Err(e.into())
        }
    }
}

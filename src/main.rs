// Entry point and interactive terminal flow.
//
// - Option [1] loads the CSV once and publishes the records.
// - Options [2]-[4] render the overview cards, the charts and the browsable
//   vehicle table from the published records.
// - Option [5] exports the overview and chart series to JSON/CSV.
use clap::Parser;
use ev_dashboard::aggregate;
use ev_dashboard::config::Args;
use ev_dashboard::loader::{self, LoadState};
use ev_dashboard::logging;
use ev_dashboard::output;
use ev_dashboard::table::{Column, RowsPerPage, Table};
use ev_dashboard::types::{VehicleField, VehicleRecord};
use ev_dashboard::util;
use once_cell::sync::Lazy;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{error, info};

// The dataset is loaded once per run and shared by every view.
static APP_STATE: Lazy<Mutex<AppState>> = Lazy::new(|| Mutex::new(AppState::default()));

#[derive(Default)]
struct AppState {
    data: LoadState,
}

const VEHICLE_COLUMNS: [Column<VehicleField>; 5] = [
    Column::new(VehicleField::Make, "Make"),
    Column::new(VehicleField::Model, "Model"),
    Column::new(VehicleField::ModelYear, "Year"),
    Column::new(VehicleField::VehicleType, "Type"),
    Column::new(VehicleField::City, "City"),
];

fn app_state() -> MutexGuard<'static, AppState> {
    APP_STATE.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn prompt(label: &str) -> Option<String> {
    print!("{}", label);
    let _ = io::stdout().flush();
    let mut buf = String::new();
    match io::stdin().read_line(&mut buf) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(buf.trim().to_string()),
    }
}

/// Handle option [1]: load and normalize the CSV file.
fn handle_load(args: &Args) {
    let result = loader::load_vehicles(&args.csv_path);
    if let Ok((data, report)) = &result {
        println!(
            "Loaded {} vehicles from {} ({} rows read)\n",
            util::format_int(data.len()),
            args.csv_path.display(),
            util::format_int(report.rows_read)
        );
    }
    let state = LoadState::from_result(result.map(|(data, _)| data));
    if let LoadState::Failed(msg) = &state {
        error!(error = %msg, "load failed");
        eprintln!("Failed to load file: {}\n", msg);
    }
    app_state().data = state;
}

/// Records published by option [1], or a message explaining why there are none.
fn loaded_data() -> Option<Arc<[VehicleRecord]>> {
    match &app_state().data {
        LoadState::Loaded(data) => Some(Arc::clone(data)),
        LoadState::Pending => {
            println!("Error: No data loaded. Please load the CSV file first (option 1).\n");
            None
        }
        LoadState::Failed(msg) => {
            println!("Something went wrong! {}\n", msg);
            None
        }
    }
}

fn handle_overview() {
    let Some(data) = loaded_data() else {
        return;
    };
    let overview = aggregate::overview(&data);
    println!("Overview\n");
    println!("{}\n", output::render_overview(&overview.metrics()));
}

fn handle_charts() {
    let Some(data) = loaded_data() else {
        return;
    };
    let charts = aggregate::chart_data(&data);
    println!("{}", output::render_charts(&charts));
}

fn handle_export(args: &Args) {
    let Some(data) = loaded_data() else {
        return;
    };
    let overview = aggregate::overview(&data);
    let charts = aggregate::chart_data(&data);
    match output::export_summary(&args.output_dir, &overview, &charts) {
        Ok(files) => {
            println!("Exported:");
            for f in files {
                println!("  {}", f.display());
            }
            println!();
        }
        Err(e) => {
            error!(error = %e, "export failed");
            eprintln!("Write error: {}\n", e);
        }
    }
}

#[derive(Debug, PartialEq)]
enum BrowseCommand {
    Search(String),
    Sort(VehicleField),
    Page(usize),
    Next,
    Prev,
    RowsPerPage(RowsPerPage),
    Back,
}

/// Parse one browse prompt line. Sorting is limited to the `columns` on screen.
fn parse_browse_command(
    input: &str,
    columns: &[Column<VehicleField>],
) -> Result<BrowseCommand, String> {
    let input = input.trim();
    if let Some(text) = input.strip_prefix('/') {
        return Ok(BrowseCommand::Search(text.to_string()));
    }
    let (cmd, arg) = match input.split_once(char::is_whitespace) {
        Some((cmd, arg)) => (cmd, arg.trim()),
        None => (input, ""),
    };
    match cmd {
        "s" => {
            let field: VehicleField = arg.parse()?;
            if columns.iter().any(|c| c.key == field) {
                Ok(BrowseCommand::Sort(field))
            } else {
                Err(format!("column '{}' is not shown in the table", arg))
            }
        }
        "p" => arg
            .parse()
            .map(BrowseCommand::Page)
            .map_err(|_| format!("'{}' is not a page number", arg)),
        "r" => arg
            .parse::<usize>()
            .map_err(|_| format!("'{}' is not a number", arg))
            .and_then(|n| RowsPerPage::try_from(n).map_err(|e| e.to_string()))
            .map(BrowseCommand::RowsPerPage),
        "n" => Ok(BrowseCommand::Next),
        "b" => Ok(BrowseCommand::Prev),
        "c" => Ok(BrowseCommand::Search(String::new())),
        "q" | "" => Ok(BrowseCommand::Back),
        other => Err(format!("unknown command '{}'", other)),
    }
}

/// Handle option [4]: page through the vehicle table.
fn handle_browse(args: &Args) {
    let Some(data) = loaded_data() else {
        return;
    };
    let mut table = Table::new(&data[..], VEHICLE_COLUMNS.to_vec())
        .with_title("Electric Vehicle Data")
        .with_rows_per_page(args.rows_per_page());

    loop {
        println!("{}", output::render_table(&table));
        println!("Commands: /text search | c clear | s <column> sort | p <n> page | n next | b prev | r <10|25|50> rows | q back");
        let Some(line) = prompt("> ") else {
            return;
        };
        match parse_browse_command(&line, table.columns()) {
            Ok(BrowseCommand::Search(text)) => table.set_search(text),
            Ok(BrowseCommand::Sort(field)) => table.set_sort(field),
            Ok(BrowseCommand::Page(n)) => {
                if !table.set_page(n) {
                    println!("No page {}.", n);
                }
            }
            Ok(BrowseCommand::Next) => {
                table.next_page();
            }
            Ok(BrowseCommand::Prev) => {
                table.prev_page();
            }
            Ok(BrowseCommand::RowsPerPage(rows)) => table.set_rows_per_page(rows),
            Ok(BrowseCommand::Back) => {
                println!();
                return;
            }
            Err(msg) => println!("{}", msg),
        }
    }
}

fn main() {
    let args = Args::parse();
    logging::init(args.log_level());
    info!(csv = %args.csv_path.display(), "starting dashboard");

    if args.load {
        handle_load(&args);
    }

    loop {
        println!("Electric Vehicle Dashboard");
        println!("[1] Load the file");
        println!("[2] Overview");
        println!("[3] Charts");
        println!("[4] Browse vehicles");
        println!("[5] Export summary");
        println!("[0] Exit\n");
        let Some(choice) = prompt("Enter choice: ") else {
            break;
        };
        match choice.as_str() {
            "1" => handle_load(&args),
            "2" => handle_overview(),
            "3" => handle_charts(),
            "4" => handle_browse(&args),
            "5" => handle_export(&args),
            "0" => {
                println!("Exiting the program.");
                break;
            }
            _ => println!("Invalid choice. Please enter 0-5.\n"),
        }
    }
}

// Entry point and interactive menu.
//
// - Option [1] loads both CSV reports and previews what was read.
// - Option [2] prints the summary, writes it to `summary_report.txt`, and
//   writes a JSON digest to `summary.json`.
// - After generating, the user can go back to the menu or exit.
use finance_summary::output::{self, ReportPaths};
use finance_summary::types::{DailyProfit, OverheadRecord};
use finance_summary::{loader, logging, reports, util};
use std::io::{self, Write};

/// Data loaded by option [1], reused by every later option [2].
#[derive(Default)]
struct Session {
    overheads: Option<Vec<OverheadRecord>>,
    profit_loss: Option<Vec<DailyProfit>>,
}

/// Print `prompt` and read one trimmed line. `None` once stdin is closed.
fn read_line(prompt: &str) -> Option<String> {
    print!("{}", prompt);
    let _ = io::stdout().flush();
    let mut buf = String::new();
    match io::stdin().read_line(&mut buf) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(buf.trim().to_string()),
    }
}

/// Returns `true` for `Y`, `false` for `N` or end of input.
fn prompt_back_to_menu() -> bool {
    loop {
        let Some(resp) = read_line("Back to Menu (Y/N): ") else {
            return false;
        };
        match resp.to_uppercase().as_str() {
            "Y" => return true,
            "N" => return false,
            _ => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

/// Handle option [1]. Both files must load; a failure in either leaves the
/// session without data so no summary can be built from a partial load.
fn handle_load(session: &mut Session, paths: &ReportPaths) {
    *session = Session::default();

    let overheads = match loader::load_overheads(&paths.overheads) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("Failed to load overheads: {}\n", e);
            return;
        }
    };
    let profit_loss = match loader::load_profit_loss(&paths.profit_loss) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("Failed to load profit and loss: {}\n", e);
            return;
        }
    };

    println!(
        "Processing reports... ({} overhead categories, {} days loaded)\n",
        util::format_int(overheads.len()),
        util::format_int(profit_loss.len())
    );
    println!("Overheads ({}):", paths.overheads.display());
    output::preview_table_rows(&overheads, 5);
    println!("Profit and Loss ({}):", paths.profit_loss.display());
    output::preview_table_rows(&profit_loss, 5);

    session.overheads = Some(overheads);
    session.profit_loss = Some(profit_loss);
}

/// Handle option [2]: print and write the summary and its JSON digest.
fn handle_generate(session: &Session, paths: &ReportPaths) {
    let (Some(overheads), Some(profit_loss)) = (&session.overheads, &session.profit_loss) else {
        println!("Error: No data loaded. Please load the reports first (option 1).\n");
        return;
    };

    let (text, summary) = match (
        reports::full_report(overheads, profit_loss),
        reports::generate_summary(overheads, profit_loss),
    ) {
        (Ok(text), Ok(summary)) => (text, summary),
        (Err(e), _) | (_, Err(e)) => {
            eprintln!("Failed to build summary: {}\n", e);
            return;
        }
    };

    println!("{}", text);
    if let Err(e) = output::write_summary(paths, &text, &summary) {
        eprintln!("Write error: {}\n", e);
        return;
    }
    println!(
        "(Summary saved to {} and {})\n",
        paths.summary_text.display(),
        paths.summary_json.display()
    );
}

fn main() {
    logging::init();
    let paths = ReportPaths::default();
    let mut session = Session::default();

    loop {
        println!("Select an option:");
        println!("[1] Load the reports");
        println!("[2] Generate summary\n");
        let Some(choice) = read_line("Enter choice: ") else {
            break;
        };
        match choice.as_str() {
            "1" => handle_load(&mut session, &paths),
            "2" => {
                println!();
                handle_generate(&session, &paths);
                if !prompt_back_to_menu() {
                    println!("Exiting the program.");
                    break;
                }
            }
            _ => println!("Invalid choice. Please enter 1 or 2.\n"),
        }
    }
}

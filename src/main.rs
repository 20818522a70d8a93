// ==========================================
// Scorte - command line entry point
// ==========================================
// scorte import <file> [--yes]   preview, then import with --yes
// scorte list [--json]           materials with status and reorder advice
// scorte critical [--json]       orderNow materials and supplier contacts
// ==========================================

use anyhow::{bail, Context};
use scorte::app::{get_default_db_path, AppState};
use scorte::domain::{MaterialView, StockStatus};
use scorte::importer::ImportSession;
use std::path::PathBuf;

const USAGE: &str = "uso: scorte <import <file> [--yes] | list [--json] | critical [--json]>";

enum Command {
    Import { path: PathBuf, confirm: bool },
    List { json: bool },
    Critical { json: bool },
}

fn parse_args(args: &[String]) -> anyhow::Result<Command> {
    match args.first().map(String::as_str) {
        Some("import") => {
            let Some(path) = args.get(1) else {
                bail!("file mancante\n{}", USAGE);
            };
            let confirm = args[2..].iter().any(|a| a == "--yes" || a == "-y");
            Ok(Command::Import {
                path: PathBuf::from(path),
                confirm,
            })
        }
        Some("list") => Ok(Command::List { json: has_json_flag(args) }),
        Some("critical") => Ok(Command::Critical { json: has_json_flag(args) }),
        _ => bail!("{}", USAGE),
    }
}

fn has_json_flag(args: &[String]) -> bool {
    args[1..].iter().any(|a| a == "--json")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    scorte::logging::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = parse_args(&args)?;

    let db_path = get_default_db_path();
    tracing::info!(version = scorte::VERSION, db_path = %db_path, "scorte starting");
    let state = AppState::new(db_path)?;

    match command {
        Command::Import { path, confirm } => run_import(&state, path, confirm).await,
        Command::List { json } => {
            let views = state.material_api.list_materials().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&views)?);
                return Ok(());
            }
            if views.is_empty() {
                println!("Nessun materiale in magazzino.");
            }
            for view in &views {
                print_view(view);
            }
            Ok(())
        }
        Command::Critical { json } => {
            let overview = state.material_api.get_overview().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&overview)?);
                return Ok(());
            }
            println!(
                "{}: {}  {}: {}  {}: {}",
                StockStatus::Ok.title(),
                overview.ok_count,
                StockStatus::Attention.title(),
                overview.attention_count,
                StockStatus::OrderNow.title(),
                overview.order_now_count
            );
            for view in &overview.critical {
                print_view(view);
                if let Some(contact) = &view.contact {
                    println!("    contatto: {}", contact.link(&view.material.name));
                }
            }
            if overview.total_impact > 0.0 {
                println!("Impatto stimato totale: € {:.2}", overview.total_impact);
            }
            Ok(())
        }
    }
}

async fn run_import(state: &AppState, path: PathBuf, confirm: bool) -> anyhow::Result<()> {
    let mut session = ImportSession::new();
    let preview = state
        .import_api
        .upload_file(&mut session, &path)
        .await
        .with_context(|| format!("importazione di {}", path.display()))?;

    println!(
        "{}: {} righe valide, {} con errori",
        preview.file_name, preview.valid_count, preview.error_count
    );
    for error in &preview.errors {
        println!("  riga {}: {}", error.row, error.message);
    }

    if !confirm {
        println!("Anteprima soltanto: rilancia con --yes per importare.");
        state.import_api.cancel(&mut session)?;
        return Ok(());
    }

    let report = state
        .import_api
        .confirm_import_with_progress(&mut session, |p| {
            eprint!("\r{:>3}% ({}/{})", p.percent, p.completed, p.total);
        })
        .await?;
    eprintln!();

    if let Some(msg) = report.success_message() {
        println!("{}", msg);
    }
    if let Some(msg) = report.failure_message() {
        println!("{}", msg);
    }
    Ok(())
}

fn print_view(view: &MaterialView) {
    let m = &view.material;
    let remaining = view
        .remaining_days
        .map(|d| format!("{:.1} gg", d))
        .unwrap_or_else(|| "N/A".to_string());
    let advice = view
        .recommended_order_quantity
        .map(|q| format!("  ordina {} {}", q, m.unit))
        .unwrap_or_default();

    println!(
        "[{:<9}] {:<30} {:>10} {:<6} {:>9}{}",
        view.status.as_str(),
        m.name,
        m.available_quantity,
        m.unit,
        remaining,
        advice
    );
}

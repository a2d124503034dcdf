use std::path::PathBuf;

use blackbook::db::store;
use blackbook::{cli, logging, ops};

fn main() {
    let mut args = std::env::args().skip(1);
    let mut db_path: Option<PathBuf> = None;
    let mut import_path: Option<PathBuf> = None;
    let mut log_dir: Option<PathBuf> = None;
    let mut log_level: Option<String> = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--file" | "-f" => {
                db_path = args.next().map(PathBuf::from);
                if db_path.is_none() {
                    eprintln!("Error: --file requires a path argument");
                    std::process::exit(1);
                }
            }
            "--import" => {
                import_path = args.next().map(PathBuf::from);
                if import_path.is_none() {
                    eprintln!("Error: --import requires a .vcf file path");
                    std::process::exit(1);
                }
            }
            "--log-dir" => {
                log_dir = args.next().map(PathBuf::from);
                if log_dir.is_none() {
                    eprintln!("Error: --log-dir requires a path argument");
                    std::process::exit(1);
                }
            }
            "--log-level" => {
                log_level = args.next();
                if log_level.is_none() {
                    eprintln!("Error: --log-level requires a level");
                    std::process::exit(1);
                }
            }
            "--help" | "-h" => {
                println!("Blackbook - contacts and the events you share with them");
                println!();
                println!("Usage: blackbook [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -f, --file <PATH>      Database file path (default: .data/blackbook.db)");
                println!("  --import <VCF_PATH>    Import contacts from a vCard file and exit");
                println!("  --log-dir <PATH>       Log directory (default: .data/logs)");
                println!("  --log-level <LEVEL>    trace, debug, info, warn or error (default: $BLACKBOOK_LOG or info)");
                println!("  -h, --help             Show this help");
                return;
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                eprintln!("Use --help for usage information.");
                std::process::exit(1);
            }
        }
    }

    let db_path = db_path.unwrap_or_else(|| PathBuf::from(".data").join("blackbook.db"));
    let log_dir = log_dir.unwrap_or_else(|| PathBuf::from(".data").join("logs"));

    let level = logging::resolve_level(log_level.as_deref());
    if let Err(e) = logging::init_logging(&level, &log_dir) {
        eprintln!("Warning: logging disabled: {}", e);
    }

    let conn = match store::open(&db_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error opening database {}: {}", db_path.display(), e);
            std::process::exit(1);
        }
    };

    if let Some(vcf_path) = import_path {
        println!("Importing from {}...", vcf_path.display());
        match ops::import_ops::import_vcf_file(&conn, &vcf_path) {
            Ok(stats) => cli::book_commands::print_import_stats(&stats),
            Err(e) => {
                eprintln!("Import failed: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    cli::run(conn);
}

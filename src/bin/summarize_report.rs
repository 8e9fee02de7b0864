// Recompute and print the summary of a saved JSON report
use std::path::Path;
use cloudsniff::report_generator::{load_json_report, render_text_report};

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: summarize_report <report.json>");
        eprintln!("Example: summarize_report cloudsniff_results_20240309_140507.json");
        std::process::exit(1);
    }

    let report_path = Path::new(&args[1]);

    if !report_path.exists() {
        eprintln!("Error: Report not found: {}", report_path.display());
        std::process::exit(1);
    }

    match load_json_report(report_path) {
        Ok(document) => {
            println!("Run {} ({} v{})", document.metadata.run_id, document.metadata.tool, document.metadata.version);
            println!("Generated at: {}", document.metadata.generated_at.to_rfc3339());
            print!("{}", render_text_report(&document.results));
        }
        Err(e) => {
            eprintln!("Error reading report: {:#}", e);
            std::process::exit(1);
        }
    }
}

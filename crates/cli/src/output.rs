use std::path::Path;
use std::time::Duration;

use model_eval_loader::LoadReport;
use model_eval_report::{BestModels, SummaryTable};
use model_eval_shared::EvalConfig;

pub fn print_load_report(report: &LoadReport, config: &EvalConfig, elapsed: Duration) {
    println!("\n========================================");
    println!("  Results dir: {}", config.results_dir.display());
    println!("  Loaded:      {}/{}", report.loaded(), report.expected());
    println!("  Missing:     {}", report.missing.len());
    println!("  Malformed:   {}", report.errors.len());
    println!("  Time:        {:.3}s", elapsed.as_secs_f64());
    println!("========================================");
    if report.is_complete() {
        println!("  [PASS] every configured pair loaded");
    }
}

pub fn print_load_errors(report: &LoadReport) {
    println!("\nMalformed result documents:");
    for err in &report.errors {
        println!("  [FAIL] {err}");
    }
}

pub fn print_table(table: &SummaryTable) {
    println!("\nModel Results Summary:");
    print!("{table}");
}

pub fn print_best(best: &BestModels) {
    println!();
    print!("{best}");
}

pub fn print_written(what: &str, path: &Path) {
    println!("\n{what} written to '{}'", path.display());
}

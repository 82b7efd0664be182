use std::path::Path;

use model_eval_report::export::write_csv_file;
use model_eval_report::plot::write_svg_file;

use super::{require_rows, SourceArgs};
use crate::output;

pub fn run(source: &SourceArgs, csv_path: &Path, plot_path: &Path) -> anyhow::Result<()> {
    let evaluation = source.evaluate()?;
    require_rows(&evaluation)?;

    output::print_table(&evaluation.table);
    if let Some(best) = &evaluation.best {
        output::print_best(best);
    }

    write_svg_file(&evaluation.table, plot_path)?;
    output::print_written("Comparison plots", plot_path);

    write_csv_file(&evaluation.table, csv_path)?;
    output::print_written("Results", csv_path);

    println!("\nEvaluation complete!");
    Ok(())
}

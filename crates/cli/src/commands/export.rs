use std::path::Path;

use model_eval_report::export::write_csv_file;

use super::SourceArgs;
use crate::output;

pub fn run(source: &SourceArgs, output_path: &Path) -> anyhow::Result<()> {
    let evaluation = source.evaluate()?;
    write_csv_file(&evaluation.table, output_path)?;
    output::print_written("Results", output_path);
    Ok(())
}

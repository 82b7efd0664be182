use std::path::Path;

use model_eval_report::plot::write_svg_file;

use super::{require_rows, SourceArgs};
use crate::output;

pub fn run(source: &SourceArgs, output_path: &Path) -> anyhow::Result<()> {
    let evaluation = source.evaluate()?;
    require_rows(&evaluation)?;
    write_svg_file(&evaluation.table, output_path)?;
    output::print_written("Comparison plots", output_path);
    Ok(())
}

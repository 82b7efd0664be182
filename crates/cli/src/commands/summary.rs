use super::SourceArgs;
use crate::output;

pub fn run(source: &SourceArgs) -> anyhow::Result<()> {
    let evaluation = source.evaluate()?;
    output::print_table(&evaluation.table);
    Ok(())
}

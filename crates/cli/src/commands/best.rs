use super::{require_rows, SourceArgs};
use crate::output;

pub fn run(source: &SourceArgs) -> anyhow::Result<()> {
    let evaluation = source.evaluate()?;
    require_rows(&evaluation)?;
    if let Some(best) = &evaluation.best {
        output::print_best(best);
    }
    Ok(())
}

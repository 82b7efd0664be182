use model_eval_loader::{LoadReport, ResultLoader};
use model_eval_shared::EvalConfig;

use crate::select::BestModels;
use crate::summary::SummaryTable;

/// Output of one load -> aggregate -> select pass.
#[derive(Debug)]
pub struct Evaluation {
    pub load: LoadReport,
    pub table: SummaryTable,
    /// `None` when no result document was found.
    pub best: Option<BestModels>,
}

pub fn evaluate(config: &EvalConfig, n_workers: Option<usize>) -> anyhow::Result<Evaluation> {
    config.validate()?;

    let load = ResultLoader::new(config.clone()).load_with_workers(n_workers)?;
    let table = SummaryTable::build(&load.results, config)?;
    let best = if table.is_empty() {
        None
    } else {
        Some(BestModels::from_table(&table)?)
    };

    Ok(Evaluation { load, table, best })
}

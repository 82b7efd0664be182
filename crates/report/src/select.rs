use std::fmt;

use crate::error::ReportError;
use crate::summary::{SummaryRow, SummaryTable};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Accuracy,
    TrainingTime,
    Auc,
    Efficiency,
}

impl Metric {
    pub const ALL: [Metric; 4] = [
        Metric::Accuracy,
        Metric::TrainingTime,
        Metric::Auc,
        Metric::Efficiency,
    ];

    pub fn higher_is_better(self) -> bool {
        !matches!(self, Metric::TrainingTime)
    }

    /// Strict comparison: an equal value never displaces the current best,
    /// so the earliest row in table order wins ties.
    fn improves(self, candidate: f64, best: f64) -> bool {
        if self.higher_is_better() {
            candidate > best
        } else {
            candidate < best
        }
    }

    pub fn format_value(self, value: f64) -> String {
        match self {
            Metric::Accuracy => format!("{value:.2}%"),
            Metric::TrainingTime => format!("{value:.1}s"),
            Metric::Auc => format!("{value:.3}"),
            Metric::Efficiency => format!("{value:.4} acc/sec"),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Metric::Accuracy => "accuracy",
            Metric::TrainingTime => "training time",
            Metric::Auc => "AUC",
            Metric::Efficiency => "efficiency score",
        };
        f.write_str(name)
    }
}

impl SummaryTable {
    /// Extremal row under `metric`; ties go to the earliest row.
    pub fn select(&self, metric: Metric) -> Result<&SummaryRow, ReportError> {
        let mut rows = self.iter();
        let mut best = rows.next().ok_or(ReportError::EmptySelection { metric })?;
        for row in rows {
            if metric.improves(row.value(metric), best.value(metric)) {
                best = row;
            }
        }
        Ok(best)
    }

    pub fn best_accuracy(&self) -> Result<&SummaryRow, ReportError> {
        self.select(Metric::Accuracy)
    }

    pub fn fastest_training(&self) -> Result<&SummaryRow, ReportError> {
        self.select(Metric::TrainingTime)
    }

    pub fn best_auc(&self) -> Result<&SummaryRow, ReportError> {
        self.select(Metric::Auc)
    }

    pub fn best_efficiency(&self) -> Result<&SummaryRow, ReportError> {
        self.select(Metric::Efficiency)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BestModels {
    pub best_accuracy: SummaryRow,
    pub fastest_training: SummaryRow,
    pub best_auc: SummaryRow,
    pub best_efficiency: SummaryRow,
}

impl BestModels {
    pub fn from_table(table: &SummaryTable) -> Result<Self, ReportError> {
        Ok(Self {
            best_accuracy: table.best_accuracy()?.clone(),
            fastest_training: table.fastest_training()?.clone(),
            best_auc: table.best_auc()?.clone(),
            best_efficiency: table.best_efficiency()?.clone(),
        })
    }

    pub fn get(&self, metric: Metric) -> &SummaryRow {
        match metric {
            Metric::Accuracy => &self.best_accuracy,
            Metric::TrainingTime => &self.fastest_training,
            Metric::Auc => &self.best_auc,
            Metric::Efficiency => &self.best_efficiency,
        }
    }
}

impl fmt::Display for BestModels {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== BEST PERFORMING MODELS ===")?;
        writeln!(f)?;
        for metric in Metric::ALL {
            let title = match metric {
                Metric::Accuracy => "Highest Accuracy",
                Metric::TrainingTime => "Fastest Training",
                Metric::Auc => "Highest AUC",
                Metric::Efficiency => "Best Efficiency",
            };
            let row = self.get(metric);
            writeln!(
                f,
                "{title}: {} ({}) - {}",
                row.model_name,
                row.resolution_label(),
                metric.format_value(row.value(metric)),
            )?;
        }
        Ok(())
    }
}

use std::collections::BTreeMap;

/// One evaluation run, flattened from its on-disk document.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRecord {
    pub model_name: String,
    pub resolution: u32,
    /// Percent, 0-100.
    pub accuracy: f64,
    /// Seconds.
    pub training_time: f64,
    pub epochs: u32,
    pub auc: f64,
}

/// Records keyed by model, then resolution. At most one record per pair.
///
/// Map order is not the evaluation order; anything ordered goes through
/// `EvalConfig::pairs` instead.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    records: BTreeMap<String, BTreeMap<u32, ResultRecord>>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the record previously stored for the same pair, if any.
    pub fn insert(&mut self, record: ResultRecord) -> Option<ResultRecord> {
        self.records
            .entry(record.model_name.clone())
            .or_default()
            .insert(record.resolution, record)
    }

    pub fn get(&self, model: &str, resolution: u32) -> Option<&ResultRecord> {
        self.records.get(model)?.get(&resolution)
    }

    pub fn len(&self) -> usize {
        self.records.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResultRecord> {
        self.records.values().flat_map(BTreeMap::values)
    }
}

impl FromIterator<ResultRecord> for ResultSet {
    fn from_iter<I: IntoIterator<Item = ResultRecord>>(iter: I) -> Self {
        let mut set = ResultSet::new();
        for record in iter {
            set.insert(record);
        }
        set
    }
}

use super::params::FilterParams;
use crate::db::query::{Relation, SqlQuery};

/// One optional narrowing predicate bound to a parameter key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterStage {
    /// `column = value`
    Exact {
        param: &'static str,
        column: &'static str,
    },
    /// `date(column) >= value`, inclusive
    DateFrom {
        param: &'static str,
        column: &'static str,
    },
    /// `date(column) <= value`, inclusive
    DateTo {
        param: &'static str,
        column: &'static str,
    },
    /// `column = 1` for "true"/"1", `column = 0` otherwise
    Flag {
        param: &'static str,
        column: &'static str,
    },
    /// case-insensitive contains, OR across `columns`
    Search {
        param: &'static str,
        columns: &'static [&'static str],
    },
    /// related collection contains a row matching the value
    HasRelated {
        param: &'static str,
        relation: Relation,
    },
}

fn parse_flag(value: &str) -> bool {
    matches!(value.to_ascii_lowercase().as_str(), "true" | "1")
}

impl FilterStage {
    pub fn param(&self) -> &'static str {
        match self {
            FilterStage::Exact { param, .. }
            | FilterStage::DateFrom { param, .. }
            | FilterStage::DateTo { param, .. }
            | FilterStage::Flag { param, .. }
            | FilterStage::Search { param, .. }
            | FilterStage::HasRelated { param, .. } => *param,
        }
    }

    /// Narrow `query` when this stage's parameter is present.
    pub fn apply(&self, query: SqlQuery, params: &FilterParams) -> SqlQuery {
        match params.get(self.param()) {
            Some(value) => self.narrow(query, value),
            None => query,
        }
    }

    fn narrow(&self, query: SqlQuery, value: &str) -> SqlQuery {
        match self {
            FilterStage::Exact { column, .. } => query.where_eq(column, value),
            FilterStage::DateFrom { column, .. } => query.where_date_from(column, value),
            FilterStage::DateTo { column, .. } => query.where_date_to(column, value),
            FilterStage::Flag { column, .. } => query.where_flag(column, parse_flag(value)),
            FilterStage::Search { columns, .. } => query.where_search(columns, value),
            FilterStage::HasRelated { relation, .. } => query.where_related(relation, value),
        }
    }
}

/// A fixed, ordered sequence of stages.
#[derive(Debug, Clone, Copy)]
pub struct FilterPipeline {
    stages: &'static [FilterStage],
}

impl FilterPipeline {
    pub const fn new(stages: &'static [FilterStage]) -> Self {
        Self { stages }
    }

    pub fn stages(&self) -> &'static [FilterStage] {
        self.stages
    }

    /// Parameter keys understood by this pipeline, in execution order.
    pub fn keys(&self) -> Vec<&'static str> {
        self.stages.iter().map(FilterStage::param).collect()
    }

    pub fn apply(&self, base: SqlQuery, params: &FilterParams) -> SqlQuery {
        self.stages
            .iter()
            .fold(base, |query, stage| stage.apply(query, params))
    }
}

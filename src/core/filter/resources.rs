//! Per-resource filter tables.
//!
//! Keys understood by each resource (the order is the execution order):
//!
//! | resource  | keys |
//! |-----------|------|
//! | time logs | status, project_id, task_id, user_id, client_id, is_paid, non_billable, created_date_from, created_date_to, start_date_from, start_date_to, search (note, project name), tag_id |
//! | projects  | client_id, user_id (owner), created_date_from, created_date_to, search (name), member_id |
//! | tasks     | project_id, status, created_date_from, created_date_to, search (name) |
//! | clients   | created_date_from, created_date_to, search (name, email) |
//! | invoices  | client_id, project_id, status, created_date_from, created_date_to, search (number) |

use super::pipeline::{FilterPipeline, FilterStage};
use crate::db::query::{Relation, SqlQuery};
use clap::ValueEnum;

use FilterStage::{DateFrom, DateTo, Exact, Flag, HasRelated, Search};

const TIME_LOG_STAGES: &[FilterStage] = &[
    Exact { param: "status", column: "t.status" },
    Exact { param: "project_id", column: "t.project_id" },
    Exact { param: "task_id", column: "t.task_id" },
    Exact { param: "user_id", column: "t.user_id" },
    Exact { param: "client_id", column: "p.client_id" },
    Flag { param: "is_paid", column: "t.is_paid" },
    Flag { param: "non_billable", column: "t.non_billable" },
    DateFrom { param: "created_date_from", column: "t.created_at" },
    DateTo { param: "created_date_to", column: "t.created_at" },
    DateFrom { param: "start_date_from", column: "t.start_at" },
    DateTo { param: "start_date_to", column: "t.start_at" },
    Search { param: "search", columns: &["t.note", "p.name"] },
    HasRelated {
        param: "tag_id",
        relation: Relation { table: "time_log_tags", foreign_key: "time_log_id", column: "tag_id" },
    },
];

const PROJECT_STAGES: &[FilterStage] = &[
    Exact { param: "client_id", column: "p.client_id" },
    Exact { param: "user_id", column: "p.owner_id" },
    DateFrom { param: "created_date_from", column: "p.created_at" },
    DateTo { param: "created_date_to", column: "p.created_at" },
    Search { param: "search", columns: &["p.name"] },
    HasRelated {
        param: "member_id",
        relation: Relation { table: "project_members", foreign_key: "project_id", column: "user_id" },
    },
];

const TASK_STAGES: &[FilterStage] = &[
    Exact { param: "project_id", column: "k.project_id" },
    Exact { param: "status", column: "k.status" },
    DateFrom { param: "created_date_from", column: "k.created_at" },
    DateTo { param: "created_date_to", column: "k.created_at" },
    Search { param: "search", columns: &["k.name"] },
];

const CLIENT_STAGES: &[FilterStage] = &[
    DateFrom { param: "created_date_from", column: "c.created_at" },
    DateTo { param: "created_date_to", column: "c.created_at" },
    Search { param: "search", columns: &["c.name", "c.email"] },
];

const INVOICE_STAGES: &[FilterStage] = &[
    Exact { param: "client_id", column: "i.client_id" },
    Exact { param: "project_id", column: "i.project_id" },
    Exact { param: "status", column: "i.status" },
    DateFrom { param: "created_date_from", column: "i.created_at" },
    DateTo { param: "created_date_to", column: "i.created_at" },
    Search { param: "search", columns: &["i.number"] },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Resource {
    #[value(name = "logs")]
    TimeLogs,
    Projects,
    Tasks,
    Clients,
    Invoices,
}

impl Resource {
    pub fn pipeline(&self) -> FilterPipeline {
        match self {
            Resource::TimeLogs => FilterPipeline::new(TIME_LOG_STAGES),
            Resource::Projects => FilterPipeline::new(PROJECT_STAGES),
            Resource::Tasks => FilterPipeline::new(TASK_STAGES),
            Resource::Clients => FilterPipeline::new(CLIENT_STAGES),
            Resource::Invoices => FilterPipeline::new(INVOICE_STAGES),
        }
    }

    /// Unfiltered query for this resource.
    pub fn base_query(&self) -> SqlQuery {
        match self {
            Resource::TimeLogs => SqlQuery::new(
                "SELECT t.* FROM time_logs t JOIN projects p ON p.id = t.project_id",
                "t",
            )
            .order_by("COALESCE(t.start_at, t.created_at) ASC, t.id ASC"),
            Resource::Projects => SqlQuery::new("SELECT p.* FROM projects p", "p").order_by("p.id ASC"),
            Resource::Tasks => SqlQuery::new("SELECT k.* FROM tasks k", "k").order_by("k.id ASC"),
            Resource::Clients => SqlQuery::new("SELECT c.* FROM clients c", "c").order_by("c.id ASC"),
            Resource::Invoices => {
                SqlQuery::new("SELECT i.* FROM invoices i", "i").order_by("i.issue_date ASC, i.id ASC")
            }
        }
    }

    /// Base query narrowed by `params` through this resource's pipeline.
    pub fn query(&self, params: &super::FilterParams) -> SqlQuery {
        self.pipeline().apply(self.base_query(), params)
    }
}

use crate::core::filter::Resource;
use crate::export::ExportFormat;
use clap::{Parser, Subcommand};

/// Command-line interface definition for rTimesheet
/// CLI application to log project time, approve it and report on it with SQLite
#[derive(Parser)]
#[command(
    name = "rtimesheet",
    version = env!("CARGO_PKG_VERSION"),
    about = "Project time tracking CLI: log hours, approve or reject them and report paid/unpaid totals",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration file")]
        print_config: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print the internal audit log
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Create a client
    Client {
        name: String,

        #[arg(long, default_value = "")]
        email: String,
    },

    /// Create a project with its default billing terms
    Project {
        name: String,

        #[arg(long, help = "Owner (creator) user id; always allowed to approve")]
        owner: i64,

        #[arg(long)]
        client: Option<i64>,

        #[arg(long, help = "Default hourly rate")]
        rate: Option<String>,

        #[arg(long, help = "Currency code of the rate (default from config)")]
        currency: Option<String>,

        #[arg(long = "non-monetary", help = "Hours on this project are never paid")]
        non_monetary: bool,
    },

    /// Assign a user to a project, optionally overriding the rate
    Member {
        #[arg(long)]
        project: i64,

        #[arg(long)]
        user: i64,

        #[arg(long)]
        rate: Option<String>,

        #[arg(long)]
        currency: Option<String>,

        #[arg(long = "non-monetary")]
        non_monetary: bool,
    },

    /// Set the team relation between a leader and a member
    Team {
        #[arg(long)]
        leader: i64,

        #[arg(long)]
        member: i64,

        #[arg(long)]
        rate: Option<String>,

        #[arg(long)]
        currency: Option<String>,

        #[arg(long = "non-monetary")]
        non_monetary: bool,

        #[arg(long = "employee", help = "Mark the member as an employee of the leader")]
        employee: bool,
    },

    /// Designate an approver for a project
    Approver {
        #[arg(long)]
        project: i64,

        #[arg(long)]
        user: i64,
    },

    /// Create a task, or close/reopen one
    Task {
        name: Option<String>,

        #[arg(long, help = "Project of the new task")]
        project: Option<i64>,

        #[arg(long = "done", value_name = "ID", conflicts_with = "reopen")]
        done: Option<i64>,

        #[arg(long = "reopen", value_name = "ID")]
        reopen: Option<i64>,
    },

    /// Create a draft invoice, or change the status of one
    Invoice {
        #[arg(long, help = "Invoice to update (with --status)")]
        id: Option<i64>,

        #[arg(long, requires = "id", help = "New status: draft, sent, paid")]
        status: Option<String>,

        #[arg(long)]
        client: Option<i64>,

        #[arg(long)]
        project: Option<i64>,

        #[arg(long)]
        number: Option<String>,

        #[arg(long, help = "Issue date (YYYY-MM-DD, default today)")]
        date: Option<String>,

        #[arg(long, help = "Total; defaults to the project's paid amount")]
        total: Option<String>,

        #[arg(long)]
        currency: Option<String>,
    },

    /// Log time on a project (created pending and unpaid)
    Add {
        #[arg(long, help = "Owner of the time log")]
        user: i64,

        #[arg(long)]
        project: i64,

        #[arg(long)]
        task: Option<i64>,

        #[arg(long, help = "Start (YYYY-MM-DD HH:MM)")]
        start: Option<String>,

        #[arg(long, help = "End (YYYY-MM-DD HH:MM)")]
        end: Option<String>,

        #[arg(long, help = "Manual duration in hours, when no start/end is given")]
        hours: Option<String>,

        #[arg(long, default_value = "")]
        note: String,

        #[arg(long = "non-billable")]
        non_billable: bool,

        #[arg(long, help = "Manual rate used when no assignment provides one")]
        rate: Option<String>,

        #[arg(long)]
        currency: Option<String>,

        #[arg(long = "tag", help = "Tag to attach (repeatable)")]
        tags: Vec<String>,
    },

    /// Edit an unpaid time log you own
    Edit {
        id: i64,

        #[arg(long, help = "Acting user (must be the owner)")]
        user: i64,

        #[arg(long)]
        task: Option<i64>,

        #[arg(long)]
        start: Option<String>,

        #[arg(long)]
        end: Option<String>,

        #[arg(long)]
        hours: Option<String>,

        #[arg(long)]
        note: Option<String>,

        #[arg(long = "non-billable", value_name = "BOOL")]
        non_billable: Option<bool>,
    },

    /// Delete an unpaid time log you own
    Del {
        id: i64,

        #[arg(long, help = "Acting user (must be the owner)")]
        user: i64,

        #[arg(long, short = 'y', help = "Do not ask for confirmation")]
        yes: bool,
    },

    /// Attach a tag to a time log
    Tag { id: i64, name: String },

    /// Approve a pending time log
    Approve {
        id: i64,

        #[arg(long)]
        approver: i64,

        #[arg(long)]
        comment: Option<String>,
    },

    /// Reject a pending time log
    Reject {
        id: i64,

        #[arg(long)]
        approver: i64,

        #[arg(long)]
        comment: Option<String>,
    },

    /// List resources through their filter pipeline
    List {
        #[arg(value_enum, default_value = "logs")]
        resource: Resource,

        #[arg(long = "filter", short = 'f', value_name = "KEY=VALUE")]
        filters: Vec<String>,

        #[arg(long = "query", value_name = "QS", help = "Raw query string, e.g. 'status=pending&user_id=2'")]
        query: Option<String>,

        #[arg(long)]
        json: bool,
    },

    /// Paid / unpaid / unbillable totals over filtered time logs
    Stats {
        #[arg(long = "filter", short = 'f', value_name = "KEY=VALUE")]
        filters: Vec<String>,

        #[arg(long = "query", value_name = "QS")]
        query: Option<String>,

        #[arg(long)]
        json: bool,
    },

    /// Show or acknowledge a user's notifications
    Notifications {
        #[arg(long)]
        user: i64,

        #[arg(long, help = "Only unread notifications")]
        unread: bool,

        #[arg(long = "read", value_name = "ID", help = "Mark one notification as read")]
        read: Option<i64>,

        #[arg(long = "read-all", conflicts_with = "read")]
        read_all: bool,
    },

    /// Import time logs for one user from a CSV file
    Import {
        #[arg(long)]
        user: i64,

        #[arg(long, value_name = "FILE")]
        file: String,
    },

    /// Export filtered time logs
    Export {
        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,

        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long = "filter", short = 'f', value_name = "KEY=VALUE")]
        filters: Vec<String>,

        #[arg(long, short = 'F')]
        force: bool,
    },
}

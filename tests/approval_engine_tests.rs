use rtimesheet::core::add::AddLogic;
use rtimesheet::core::approval::ApprovalEngine;
use rtimesheet::core::catalog::CatalogLogic;
use rtimesheet::core::events::{EventSink, NullSink};
use rtimesheet::db::initialize::open_db;
use rtimesheet::db::log::load_log;
use rtimesheet::db::pool::DbPool;
use rtimesheet::db::time_logs;
use rtimesheet::errors::{AppError, AppResult};
use rtimesheet::models::approval_event::{ApprovalEvent, ApprovalEventKind};
use rtimesheet::models::project::ProjectMember;
use rtimesheet::models::rate::BillingTerms;
use rtimesheet::models::status::TimeLogStatus;
use rtimesheet::models::team::TeamAssignment;
use rtimesheet::models::time_log::NewTimeLog;
use rusqlite::Connection;
use rust_decimal_macros::dec;
use std::cell::RefCell;

mod common;
use common::setup_test_db;

#[derive(Default)]
struct RecordingSink {
    events: RefCell<Vec<ApprovalEvent>>,
}

impl EventSink for RecordingSink {
    fn publish(&self, _conn: &Connection, event: &ApprovalEvent) -> AppResult<()> {
        self.events.borrow_mut().push(event.clone());
        Ok(())
    }
}

struct FailingSink;

impl EventSink for FailingSink {
    fn publish(&self, _conn: &Connection, _event: &ApprovalEvent) -> AppResult<()> {
        Err(AppError::Other("mailbox unavailable".into()))
    }
}

/// Project #1 "Website" owned by user 1 at 50 USD/h.
fn setup(name: &str) -> (String, DbPool) {
    let db_path = setup_test_db(name);
    let mut pool = open_db(&db_path).unwrap();
    CatalogLogic::add_project(
        &mut pool,
        "Website",
        None,
        1,
        &BillingTerms::monetary(dec!(50), "USD"),
    )
    .unwrap();
    (db_path, pool)
}

fn two_hours(pool: &mut DbPool, user_id: i64) -> i64 {
    let new = NewTimeLog {
        user_id,
        project_id: 1,
        duration: Some(dec!(2)),
        note: "work".into(),
        ..Default::default()
    };
    AddLogic::apply(pool, &new, &[], "USD").unwrap().id
}

#[test]
fn one_event_per_successful_transition() {
    let (_db, mut pool) = setup("engine_one_event");
    let first = two_hours(&mut pool, 2);
    let second = two_hours(&mut pool, 3);
    let sink = RecordingSink::default();

    {
        let mut engine = ApprovalEngine::new(&mut pool, &sink, "USD");
        engine.approve(first, 1, None).unwrap();
        engine.reject(second, 1, Some("duplicate".into())).unwrap();
    }

    let events = sink.events.borrow();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].kind, ApprovalEventKind::Approved);
    assert_eq!(events[0].owner_id, 2);
    assert_eq!(events[0].approver_id, 1);
    assert_eq!(events[0].time_log.paid_amount, Some(dec!(100.00)));
    assert_eq!(events[1].kind, ApprovalEventKind::Rejected);
    assert_eq!(events[1].time_log.approval_comment.as_deref(), Some("duplicate"));
}

#[test]
fn failed_transitions_publish_nothing_and_change_nothing() {
    let (_db, mut pool) = setup("engine_failures");
    let id = two_hours(&mut pool, 2);
    let sink = RecordingSink::default();

    {
        let mut engine = ApprovalEngine::new(&mut pool, &sink, "USD");
        let err = engine.approve(id, 9, None).unwrap_err();
        assert!(matches!(err, AppError::NotAuthorized(_)));

        let err = engine.transition(id, TimeLogStatus::Pending, 1, None).unwrap_err();
        assert!(matches!(err, AppError::InvalidState(_)));

        let err = engine.approve(999, 1, None).unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }
    assert!(sink.events.borrow().is_empty());

    let log = time_logs::get(&pool.conn, id).unwrap();
    assert_eq!(log.status, TimeLogStatus::Pending);
    assert!(!log.is_paid);
    assert_eq!(log.approver_id, None);
}

#[test]
fn terminal_logs_cannot_transition_again() {
    let (_db, mut pool) = setup("engine_terminal");
    let id = two_hours(&mut pool, 2);
    let sink = RecordingSink::default();

    let mut engine = ApprovalEngine::new(&mut pool, &sink, "USD");
    engine.reject(id, 1, None).unwrap();
    assert!(matches!(
        engine.approve(id, 1, None).unwrap_err(),
        AppError::InvalidState(_)
    ));
    assert!(matches!(
        engine.reject(id, 1, None).unwrap_err(),
        AppError::InvalidState(_)
    ));
    drop(engine);

    assert_eq!(sink.events.borrow().len(), 1);
}

#[test]
fn second_connection_sees_the_committed_transition() {
    let (db_path, mut pool) = setup("engine_two_connections");
    let id = two_hours(&mut pool, 2);
    let mut other = open_db(&db_path).unwrap();

    ApprovalEngine::new(&mut pool, &NullSink, "USD")
        .approve(id, 1, None)
        .unwrap();
    let err = ApprovalEngine::new(&mut other, &NullSink, "USD")
        .reject(id, 1, None)
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidState(_)));

    let log = time_logs::get(&other.conn, id).unwrap();
    assert_eq!(log.status, TimeLogStatus::Approved);
    assert!(log.is_paid);
}

#[test]
fn sink_failure_keeps_the_transition_and_is_audited() {
    let (_db, mut pool) = setup("engine_sink_failure");
    let id = two_hours(&mut pool, 2);

    let log = ApprovalEngine::new(&mut pool, &FailingSink, "USD")
        .approve(id, 1, None)
        .unwrap();
    assert_eq!(log.status, TimeLogStatus::Approved);

    let stored = time_logs::get(&pool.conn, id).unwrap();
    assert!(stored.is_paid);
    assert_eq!(stored.paid_amount, Some(dec!(100.00)));

    let audit = load_log(&pool.conn).unwrap();
    assert!(audit.iter().any(|e| e.operation == "approved"));
    assert!(
        audit
            .iter()
            .any(|e| e.operation == "notify_failed" && e.message.contains("mailbox unavailable"))
    );
}

#[test]
fn designated_approvers_may_decide() {
    let (_db, mut pool) = setup("engine_designated");
    let id = two_hours(&mut pool, 2);
    CatalogLogic::add_approver(&mut pool, 1, 7).unwrap();

    let log = ApprovalEngine::new(&mut pool, &NullSink, "USD")
        .approve(id, 7, Some("ok".into()))
        .unwrap();
    assert_eq!(log.approver_id, Some(7));
    assert_eq!(log.approval_comment.as_deref(), Some("ok"));
}

#[test]
fn rate_precedence_is_member_then_team_then_project() {
    let (_db, mut pool) = setup("engine_rates");

    // user 2: project assignment at 80 USD
    CatalogLogic::set_member(
        &mut pool,
        &ProjectMember {
            project_id: 1,
            user_id: 2,
            billing: BillingTerms::monetary(dec!(80), "USD"),
        },
    )
    .unwrap();
    // users 2 and 3 are in the owner's team at 60 EUR
    for member_id in [2, 3] {
        CatalogLogic::set_team(
            &mut pool,
            &TeamAssignment {
                leader_id: 1,
                member_id,
                billing: BillingTerms::monetary(dec!(60), "EUR"),
                is_employee: false,
            },
        )
        .unwrap();
    }

    let member = two_hours(&mut pool, 2);
    let team = two_hours(&mut pool, 3);
    let project = two_hours(&mut pool, 4);

    let mut engine = ApprovalEngine::new(&mut pool, &NullSink, "USD");
    let m = engine.approve(member, 1, None).unwrap();
    let t = engine.approve(team, 1, None).unwrap();
    let p = engine.approve(project, 1, None).unwrap();

    assert_eq!((m.paid_amount, m.currency.as_deref()), (Some(dec!(160.00)), Some("USD")));
    assert_eq!((t.paid_amount, t.currency.as_deref()), (Some(dec!(120.00)), Some("EUR")));
    assert_eq!((p.paid_amount, p.currency.as_deref()), (Some(dec!(100.00)), Some("USD")));
}

#[test]
fn rate_is_resolved_again_at_approval() {
    let (_db, mut pool) = setup("engine_rate_refresh");
    let id = two_hours(&mut pool, 2);
    assert_eq!(time_logs::get(&pool.conn, id).unwrap().hourly_rate, Some(dec!(50)));

    CatalogLogic::set_member(
        &mut pool,
        &ProjectMember {
            project_id: 1,
            user_id: 2,
            billing: BillingTerms::monetary(dec!(75), "USD"),
        },
    )
    .unwrap();

    let log = ApprovalEngine::new(&mut pool, &NullSink, "USD")
        .approve(id, 1, None)
        .unwrap();
    assert_eq!(log.hourly_rate, Some(dec!(75)));
    assert_eq!(log.paid_amount, Some(dec!(150.00)));
}

#[test]
fn non_monetary_member_is_paid_without_amount() {
    let (_db, mut pool) = setup("engine_non_monetary");
    CatalogLogic::set_member(
        &mut pool,
        &ProjectMember {
            project_id: 1,
            user_id: 2,
            billing: BillingTerms::non_monetary(),
        },
    )
    .unwrap();
    let id = two_hours(&mut pool, 2);

    let log = ApprovalEngine::new(&mut pool, &NullSink, "USD")
        .approve(id, 1, None)
        .unwrap();
    assert!(log.is_paid);
    assert_eq!(log.paid_amount, None);
    assert_eq!(log.hourly_rate, None);
}

#[test]
fn stale_copy_cannot_overwrite_a_finished_log() {
    let (db_path, mut pool) = setup("engine_stale_copy");
    let id = two_hours(&mut pool, 2);
    let mut stale = time_logs::get(&pool.conn, id).unwrap();

    let mut other = open_db(&db_path).unwrap();
    ApprovalEngine::new(&mut other, &NullSink, "USD")
        .approve(id, 1, None)
        .unwrap();

    stale.status = TimeLogStatus::Rejected;
    stale.approver_id = Some(1);
    assert_eq!(time_logs::persist_transition(&pool.conn, &stale).unwrap(), 0);

    let log = time_logs::get(&pool.conn, id).unwrap();
    assert_eq!(log.status, TimeLogStatus::Approved);
    assert!(log.is_paid);
}

#[test]
fn losing_the_pending_guard_is_invalid_state_without_event() {
    let (_db, mut pool) = setup("engine_guard_lost");
    let id = two_hours(&mut pool, 2);

    // the row reads as pending but the guarded update touches nothing,
    // as when another writer wins between load and update
    pool.conn
        .execute_batch(
            "CREATE TEMP TRIGGER hold_time_logs BEFORE UPDATE ON time_logs
             BEGIN SELECT RAISE(IGNORE); END;",
        )
        .unwrap();

    let sink = RecordingSink::default();
    let err = ApprovalEngine::new(&mut pool, &sink, "USD")
        .approve(id, 1, None)
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidState(_)));
    assert!(sink.events.borrow().is_empty());

    pool.conn.execute_batch("DROP TRIGGER hold_time_logs;").unwrap();
    let log = time_logs::get(&pool.conn, id).unwrap();
    assert_eq!(log.status, TimeLogStatus::Pending);
    assert!(!log.is_paid);
    assert!(!load_log(&pool.conn).unwrap().iter().any(|e| e.operation == "approved"));
}

use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::stats::stats_for;
use crate::errors::AppResult;
use crate::models::stats::TimeLogStats;
use crate::ui::messages::header;
use crate::utils::colors::{CYAN, GREY, RESET};
use crate::utils::formatting::hours2readable;
use crate::utils::money::format_amount;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

use super::{filter_params, open_pool};

fn print_hours(label: &str, hours: Decimal) {
    println!(
        "{CYAN}{:<18}{RESET} {:>8}  ({})",
        label,
        hours,
        hours2readable(hours, false)
    );
}

fn print_amounts(label: &str, amounts: &BTreeMap<String, Decimal>) {
    if amounts.is_empty() {
        println!("{CYAN}{:<18}{RESET} {GREY}--{RESET}", label);
        return;
    }
    let joined: Vec<String> = amounts
        .iter()
        .map(|(cur, amount)| format_amount(cur, *amount))
        .collect();
    println!("{CYAN}{:<18}{RESET} {}", label, joined.join(", "));
}

fn print_stats(stats: &TimeLogStats) {
    header("Time log statistics");
    println!("{CYAN}{:<18}{RESET} {:>8}", "Time logs", stats.count);
    print_hours("Total hours", stats.total_duration);
    print_hours("Paid hours", stats.paid_hours);
    print_hours("Unpaid hours", stats.unpaid_hours);
    print_hours("Unbillable hours", stats.unbillable_hours);
    print_amounts("Paid amounts", &stats.paid_amounts_by_currency);
    print_amounts("Unpaid amounts", &stats.unpaid_amounts_by_currency);
    println!(
        "{CYAN}{:<18}{RESET} {:>8}  over {} week(s)",
        "Weekly average", stats.weekly_average, stats.weeks
    );
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Stats {
        filters,
        query,
        json,
    } = cmd
    {
        let params = filter_params(filters, query.as_deref())?;
        let pool = open_pool(cfg)?;
        let stats = stats_for(&pool.conn, &params)?;

        if *json {
            println!("{}", serde_json::to_string_pretty(&stats)?);
        } else {
            print_stats(&stats);
        }
    }

    Ok(())
}

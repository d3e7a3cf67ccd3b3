use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::notifications::{list_for_user, mark_all_read, mark_read};
use crate::errors::AppResult;
use crate::ui::messages::{info, success};
use crate::utils::colors::{GREY, RESET, YELLOW};
use crate::utils::time::format_datetime;

use super::open_pool;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Notifications {
        user,
        unread,
        read,
        read_all,
    } = cmd
    {
        let pool = open_pool(cfg)?;

        if let Some(id) = read {
            mark_read(&pool.conn, *user, *id)?;
            success(format!("Notification #{id} marked as read."));
            return Ok(());
        }
        if *read_all {
            let n = mark_all_read(&pool.conn, *user)?;
            success(format!("{n} notification(s) marked as read."));
            return Ok(());
        }

        let items = list_for_user(&pool.conn, *user, *unread)?;
        if items.is_empty() {
            info(format!("No notifications for user {user}."));
            return Ok(());
        }

        for n in items {
            let marker = if n.read_at.is_some() {
                format!("{GREY}read{RESET}")
            } else {
                format!("{YELLOW}new{RESET}")
            };
            println!(
                "#{:<4} {} {:<4} {} {}",
                n.id,
                format_datetime(&n.created_at),
                marker,
                n.kind,
                n.payload
            );
        }
    }

    Ok(())
}

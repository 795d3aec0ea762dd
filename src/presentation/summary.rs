// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 执行计划和执行状态的界面文案

use chrono::{NaiveDate, NaiveDateTime};

use crate::domain::models::crontab::{Crontab, CrontabInterval};
use crate::domain::models::day_limit::DayLimit;
use crate::domain::models::day_of_week::DayOfWeekWhitelist;
use crate::domain::models::task::TaskStatus;

const NO_LIMIT: &str = "无限制";
const WEEKDAY_NAMES: [&str; 7] = ["周一", "周二", "周三", "周四", "周五", "周六", "周日"];

/// 下一次开始时间的描述
///
/// # 参数
///
/// * `status` - 任务执行状态
/// * `now` - 当前本地时间
pub fn task_status_summary(status: &TaskStatus, now: NaiveDateTime) -> String {
    let next = status.next_start_date_time;
    if next <= now {
        return "现在开始".to_string();
    }
    if status.is_never() {
        return "永不开始".to_string();
    }

    let prefix = match (next.date() - now.date()).num_days() {
        0 => Some("今天"),
        1 => Some("明天"),
        2 => Some("后天"),
        3 => Some("大后天"),
        _ => None,
    };
    match prefix {
        Some(prefix) => format!("{}{}开始", prefix, next.format("%H:%M")),
        None => format!("{}开始", next.format("%Y/%m/%d %H:%M")),
    }
}

pub fn crontab_summary(crontab: &Crontab) -> String {
    if !crontab.enable {
        return "无计划任务".to_string();
    }
    format!(
        "{}点起，每日{}次",
        crontab.first.format("%H:%M"),
        crontab.resolve().len()
    )
}

pub fn interval_summary(interval: CrontabInterval) -> String {
    format!("{}小时", interval.hours())
}

/// 星期白名单的描述，列出被跳过的星期
pub fn day_of_week_summary(whitelist: &DayOfWeekWhitelist) -> String {
    if whitelist.is_all_allowed() {
        return NO_LIMIT.to_string();
    }
    let banned: Vec<&str> = whitelist
        .banned()
        .into_iter()
        .filter_map(|index| WEEKDAY_NAMES.get(index).copied())
        .collect();
    format!("跳过 {}", banned.join(", "))
}

pub fn day_limit_summary(day_limit: &DayLimit) -> String {
    match (day_limit.limit_first_day, day_limit.limit_last_day) {
        (false, false) => NO_LIMIT.to_string(),
        (true, false) => format!("{}0点起可执行", date(day_limit.first_day)),
        (false, true) => format!("{}24点前可执行", date(day_limit.last_day)),
        (true, true) => {
            if day_limit.is_infeasible() {
                return "无可执行日期，永不执行".to_string();
            }
            if day_limit.first_day == day_limit.last_day {
                format!("可执行日期: {}", date(day_limit.first_day))
            } else {
                format!(
                    "可执行日期: {}至{}",
                    date(day_limit.first_day),
                    date(day_limit.last_day)
                )
            }
        }
    }
}

fn date(day: NaiveDate) -> String {
    day.format("%Y年%-m月%-d日").to_string()
}

// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::crontab::Crontab;
use super::day_limit::DayLimit;
use super::day_of_week::DayOfWeekWhitelist;
use super::task::NEVER;

/// 向后查找的天数上限
///
/// 白名单里的星期若在这个窗口内不出现，视为永不执行
pub const LOOKAHEAD_DAYS: u64 = 7;

/// 默认优先级
pub const DEFAULT_PRIORITY: i32 = 50;

/// 任务的执行计划
///
/// 包含每日定时、星期白名单、日期范围和优先级。优先级只在多个任务
/// 同时到期时决定先后，由调度器使用。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Schedule {
    /// 优先级，0-100，数值越大越先执行
    pub priority: i32,
    /// 每日定时规则
    pub crontab: Crontab,
    /// 星期白名单
    pub day_of_week_whitelist: DayOfWeekWhitelist,
    /// 日期范围
    pub day_limit: DayLimit,
}

impl Default for Schedule {
    fn default() -> Self {
        Self {
            priority: DEFAULT_PRIORITY,
            crontab: Crontab::default(),
            day_of_week_whitelist: DayOfWeekWhitelist::default(),
            day_limit: DayLimit::default(),
        }
    }
}

impl Schedule {
    /// 计算严格晚于 `now` 的下一次执行时间
    ///
    /// 从今天（或首日，取较晚者）起最多查找 7 天，并受末日约束。
    /// 找不到时返回 [`NEVER`]。本函数对任何输入都有定义，不会失败。
    ///
    /// # 参数
    ///
    /// * `now` - 参考时间，本地墙上时间
    ///
    /// # 返回值
    ///
    /// 下一次执行时间，或 [`NEVER`]
    pub fn next_date_time(&self, now: NaiveDateTime) -> NaiveDateTime {
        let allow_time = self.crontab.resolve();
        if allow_time.is_empty() {
            return NEVER;
        }

        if self.day_of_week_whitelist.is_none_allowed() {
            return NEVER;
        }

        let today = now.date();
        if self.day_limit.is_after_last_day(today) {
            return NEVER;
        }

        if self.day_limit.is_infeasible() {
            return NEVER;
        }

        let mut day = today;
        if self.day_limit.limit_first_day && self.day_limit.first_day > day {
            day = self.day_limit.first_day;
        }

        let mut last_allow_day = day
            .checked_add_days(Days::new(LOOKAHEAD_DAYS))
            .unwrap_or(NaiveDate::MAX);
        if self.day_limit.limit_last_day && self.day_limit.last_day < last_allow_day {
            last_allow_day = self.day_limit.last_day;
        }

        while day <= last_allow_day {
            if self.day_of_week_whitelist.allows(day.weekday()) {
                if let Some(candidate) = allow_time
                    .iter()
                    .map(|time| day.and_time(*time))
                    .find(|candidate| *candidate > now)
                {
                    return candidate;
                }
            }

            match day.succ_opt() {
                Some(next) => day = next,
                None => break,
            }
        }

        NEVER
    }
}

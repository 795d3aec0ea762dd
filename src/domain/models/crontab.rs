// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{Duration, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// 定时规则解析错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CrontabError {
    /// 间隔不是能整除一天的小时数
    #[error("Invalid crontab interval: {0}")]
    InvalidInterval(String),
}

/// 每日重复间隔
///
/// 只允许能整除一天的小时数，保证每天的执行时刻一致
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CrontabInterval {
    Hour1,
    Hour2,
    Hour3,
    Hour4,
    Hour6,
    #[default]
    Hour8,
    Hour12,
}

impl CrontabInterval {
    /// 全部可选间隔，按小时数升序
    pub const ALL: [CrontabInterval; 7] = [
        CrontabInterval::Hour1,
        CrontabInterval::Hour2,
        CrontabInterval::Hour3,
        CrontabInterval::Hour4,
        CrontabInterval::Hour6,
        CrontabInterval::Hour8,
        CrontabInterval::Hour12,
    ];

    /// 间隔对应的小时数
    pub fn hours(&self) -> u32 {
        match self {
            CrontabInterval::Hour1 => 1,
            CrontabInterval::Hour2 => 2,
            CrontabInterval::Hour3 => 3,
            CrontabInterval::Hour4 => 4,
            CrontabInterval::Hour6 => 6,
            CrontabInterval::Hour8 => 8,
            CrontabInterval::Hour12 => 12,
        }
    }

    /// 根据小时数查找间隔
    pub fn from_hours(hours: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|interval| interval.hours() == hours)
    }
}

impl fmt::Display for CrontabInterval {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}h", self.hours())
    }
}

impl FromStr for CrontabInterval {
    type Err = CrontabError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CrontabError::InvalidInterval(s.to_string());
        let hours = s
            .trim_end_matches('h')
            .parse::<u32>()
            .map_err(|_| invalid())?;
        Self::from_hours(hours).ok_or_else(invalid)
    }
}

/// 每日定时规则
///
/// 从 `first` 开始，每隔 `interval` 小时执行一次，直到当天结束
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Crontab {
    /// 是否启用定时
    pub enable: bool,
    /// 当天第一次执行的时刻
    pub first: NaiveTime,
    /// 重复间隔
    pub interval: CrontabInterval,
}

impl Default for Crontab {
    fn default() -> Self {
        Self {
            enable: false,
            first: NaiveTime::from_hms_opt(4, 0, 0).unwrap_or(NaiveTime::MIN),
            interval: CrontabInterval::default(),
        }
    }
}

impl Crontab {
    /// 展开当天所有允许执行的时刻
    ///
    /// # 返回值
    ///
    /// 升序排列的时刻列表；未启用时返回空列表
    pub fn resolve(&self) -> Vec<NaiveTime> {
        if !self.enable {
            return Vec::new();
        }

        let step = Duration::hours(i64::from(self.interval.hours()));
        let mut times = vec![self.first];
        let mut candidate = self.first;
        loop {
            // wrap > 0 means the candidate rolled over into the next day
            let (next, wrap) = candidate.overflowing_add_signed(step);
            if wrap != 0 {
                break;
            }
            times.push(next);
            candidate = next;
        }
        times
    }
}

// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// 可执行日期范围
///
/// 首日与末日均为闭区间，各自可以单独开启
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayLimit {
    /// 是否限制首日
    pub limit_first_day: bool,
    /// 是否限制末日
    pub limit_last_day: bool,
    /// 首日，当天 0 点起可执行
    pub first_day: NaiveDate,
    /// 末日，当天 24 点前可执行
    pub last_day: NaiveDate,
}

impl Default for DayLimit {
    fn default() -> Self {
        let today = Local::now().date_naive();
        Self {
            limit_first_day: false,
            limit_last_day: false,
            first_day: today,
            last_day: today,
        }
    }
}

impl DayLimit {
    /// 不限制任何日期
    pub fn unlimited(today: NaiveDate) -> Self {
        Self {
            limit_first_day: false,
            limit_last_day: false,
            first_day: today,
            last_day: today,
        }
    }

    /// 首末日同时开启且首日晚于末日，不存在可执行日期
    pub fn is_infeasible(&self) -> bool {
        self.limit_first_day && self.limit_last_day && self.first_day > self.last_day
    }

    /// 某天是否已超过末日
    pub fn is_after_last_day(&self, day: NaiveDate) -> bool {
        self.limit_last_day && day > self.last_day
    }
}

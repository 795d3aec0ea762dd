// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::Weekday;
use serde::{Deserialize, Serialize};

/// 星期白名单
///
/// 七个独立开关，周一到周日，默认全部允许
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DayOfWeekWhitelist {
    pub monday: bool,
    pub tuesday: bool,
    pub wednesday: bool,
    pub thursday: bool,
    pub friday: bool,
    pub saturday: bool,
    pub sunday: bool,
}

impl Default for DayOfWeekWhitelist {
    fn default() -> Self {
        Self {
            monday: true,
            tuesday: true,
            wednesday: true,
            thursday: true,
            friday: true,
            saturday: true,
            sunday: true,
        }
    }
}

impl DayOfWeekWhitelist {
    /// 全部禁止的白名单
    pub fn none() -> Self {
        Self {
            monday: false,
            tuesday: false,
            wednesday: false,
            thursday: false,
            friday: false,
            saturday: false,
            sunday: false,
        }
    }

    /// 按周一到周日的顺序展开
    pub fn to_array(&self) -> [bool; 7] {
        [
            self.monday,
            self.tuesday,
            self.wednesday,
            self.thursday,
            self.friday,
            self.saturday,
            self.sunday,
        ]
    }

    /// 某天是否允许执行
    pub fn allows(&self, weekday: Weekday) -> bool {
        self.to_array()[weekday.num_days_from_monday() as usize]
    }

    /// 修改某天的开关
    pub fn with(mut self, weekday: Weekday, allowed: bool) -> Self {
        let slot = match weekday {
            Weekday::Mon => &mut self.monday,
            Weekday::Tue => &mut self.tuesday,
            Weekday::Wed => &mut self.wednesday,
            Weekday::Thu => &mut self.thursday,
            Weekday::Fri => &mut self.friday,
            Weekday::Sat => &mut self.saturday,
            Weekday::Sun => &mut self.sunday,
        };
        *slot = allowed;
        self
    }

    pub fn is_all_allowed(&self) -> bool {
        self.to_array().iter().all(|allowed| *allowed)
    }

    pub fn is_none_allowed(&self) -> bool {
        !self.to_array().iter().any(|allowed| *allowed)
    }

    /// 被禁止的星期（周一为 0）
    pub fn banned(&self) -> Vec<usize> {
        self.to_array()
            .iter()
            .enumerate()
            .filter(|(_, allowed)| !**allowed)
            .map(|(idx, _)| idx)
            .collect()
    }
}

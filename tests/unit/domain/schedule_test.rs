// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 执行计划解析测试模块
///
/// 覆盖跨天查找、星期白名单、日期范围和七天查找上限

#[cfg(test)]
mod tests {
    use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
    use gamebot::domain::models::crontab::{Crontab, CrontabInterval};
    use gamebot::domain::models::day_limit::DayLimit;
    use gamebot::domain::models::day_of_week::DayOfWeekWhitelist;
    use gamebot::domain::models::schedule::Schedule;
    use gamebot::domain::models::task::NEVER;

    // 2024-03-04 是周一
    fn day0() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
    }

    fn day(offset: u64) -> NaiveDate {
        day0().checked_add_days(Days::new(offset)).unwrap()
    }

    fn at(date: NaiveDate, h: u32, m: u32) -> NaiveDateTime {
        date.and_time(NaiveTime::from_hms_opt(h, m, 0).unwrap())
    }

    fn every_eight_hours() -> Schedule {
        Schedule {
            crontab: Crontab {
                enable: true,
                first: NaiveTime::from_hms_opt(4, 0, 0).unwrap(),
                interval: CrontabInterval::Hour8,
            },
            day_limit: DayLimit::unlimited(day0()),
            ..Default::default()
        }
    }

    #[test]
    fn test_next_slot_later_today() {
        let schedule = every_eight_hours();
        assert_eq!(
            schedule.next_date_time(at(day0(), 5, 0)),
            at(day0(), 12, 0)
        );
    }

    #[test]
    fn test_rolls_over_to_next_day() {
        let schedule = every_eight_hours();
        assert_eq!(schedule.next_date_time(at(day0(), 23, 0)), at(day(1), 4, 0));
    }

    #[test]
    fn test_past_last_day_is_never() {
        let mut schedule = every_eight_hours();
        schedule.day_limit = DayLimit {
            limit_last_day: true,
            last_day: day(0),
            ..DayLimit::unlimited(day0())
        };
        assert_eq!(schedule.next_date_time(at(day(1), 0, 0)), NEVER);
    }

    #[test]
    fn test_last_slot_of_last_day_is_never() {
        let mut schedule = every_eight_hours();
        schedule.day_limit.limit_last_day = true;
        schedule.day_limit.last_day = day0();
        assert_eq!(schedule.next_date_time(at(day0(), 19, 0)), at(day0(), 20, 0));
        assert_eq!(schedule.next_date_time(at(day0(), 20, 0)), NEVER);
    }

    #[test]
    fn test_disabled_crontab_is_never() {
        let mut schedule = every_eight_hours();
        schedule.crontab.enable = false;
        assert_eq!(schedule.next_date_time(at(day0(), 0, 0)), NEVER);
    }

    #[test]
    fn test_empty_whitelist_is_never() {
        let mut schedule = every_eight_hours();
        schedule.day_of_week_whitelist = DayOfWeekWhitelist::none();
        assert_eq!(schedule.next_date_time(at(day0(), 0, 0)), NEVER);
    }

    #[test]
    fn test_infeasible_window_is_never() {
        let mut schedule = every_eight_hours();
        schedule.day_limit = DayLimit {
            limit_first_day: true,
            limit_last_day: true,
            first_day: day(5),
            last_day: day(2),
        };
        assert_eq!(schedule.next_date_time(at(day0(), 0, 0)), NEVER);
    }

    #[test]
    fn test_first_day_in_future_starts_at_first_slot() {
        let mut schedule = every_eight_hours();
        schedule.day_limit.limit_first_day = true;
        schedule.day_limit.first_day = day(10);
        assert_eq!(schedule.next_date_time(at(day0(), 23, 0)), at(day(10), 4, 0));
    }

    #[test]
    fn test_whitelist_skips_banned_days() {
        let mut schedule = every_eight_hours();
        schedule.day_of_week_whitelist = DayOfWeekWhitelist::none().with(Weekday::Thu, true);
        let next = schedule.next_date_time(at(day0(), 5, 0));
        assert_eq!(next, at(day(3), 4, 0));
        assert_eq!(next.weekday(), Weekday::Thu);
    }

    #[test]
    fn test_same_weekday_next_week_is_within_lookahead() {
        let mut schedule = every_eight_hours();
        schedule.day_of_week_whitelist = DayOfWeekWhitelist::none().with(Weekday::Mon, true);
        // 周一的时刻都已过去，下一个周一正好在七天窗口的末尾
        assert_eq!(schedule.next_date_time(at(day0(), 21, 0)), at(day(7), 4, 0));
    }

    #[test]
    fn test_result_is_strictly_after_now() {
        let schedule = every_eight_hours();
        for hour in 0..24 {
            let now = at(day0(), hour, 0);
            let next = schedule.next_date_time(now);
            assert!(next > now, "{} should be after {}", next, now);
        }
        assert_eq!(schedule.next_date_time(at(day0(), 12, 0)), at(day0(), 20, 0));
    }
}

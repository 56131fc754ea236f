// ==========================================
// 地铁票务管理后台 - 统计日历工具
// ==========================================
// 职责: 时区归属、日期区间枚举、粒度判定、时间桶键/标签
// ==========================================

use crate::domain::types::Granularity;
use crate::i18n;
use chrono::{DateTime, Datelike, Duration, FixedOffset, Local, NaiveDate, NaiveDateTime, Utc};
use std::fmt;

/// 按日统计的最大跨度 (含)
pub const DAILY_MAX_DAYS: i64 = 31;

/// 按周统计的最大跨度 (含)
pub const WEEKLY_MAX_DAYS: i64 = 93;

// ==========================================
// BucketTimezone - 统计归属时区
// ==========================================
// 购票时间按此时区换算为日历日期后再分桶
// 默认 Local,与管理后台所在机器的本地日期一致
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BucketTimezone {
    #[default]
    Local,
    Fixed(FixedOffset),
}

impl BucketTimezone {
    /// 解析配置值
    ///
    /// 支持: "local" / "utc" / "+07:00" / "-03:30" / "+0700"
    pub fn parse(value: &str) -> Option<Self> {
        let v = value.trim();
        if v.is_empty() || v.eq_ignore_ascii_case("local") {
            return Some(BucketTimezone::Local);
        }
        if v.eq_ignore_ascii_case("utc") || v.eq_ignore_ascii_case("z") {
            return FixedOffset::east_opt(0).map(BucketTimezone::Fixed);
        }

        let (sign, rest) = match v.as_bytes()[0] {
            b'+' => (1, &v[1..]),
            b'-' => (-1, &v[1..]),
            _ => return None,
        };
        let digits: String = rest.chars().filter(|c| *c != ':').collect();
        if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        let hours: i32 = digits[..2].parse().ok()?;
        let minutes: i32 = digits[2..].parse().ok()?;
        if minutes >= 60 {
            return None;
        }
        FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).map(BucketTimezone::Fixed)
    }

    /// UTC 时间 → 归属时区的本地时间
    pub fn local_datetime(&self, instant: &DateTime<Utc>) -> NaiveDateTime {
        match self {
            BucketTimezone::Local => instant.with_timezone(&Local).naive_local(),
            BucketTimezone::Fixed(offset) => instant.with_timezone(offset).naive_local(),
        }
    }

    /// UTC 时间 → 归属日历日期
    pub fn local_date(&self, instant: &DateTime<Utc>) -> NaiveDate {
        self.local_datetime(instant).date()
    }

    /// UTC 时间 → "HH:MM" (24 小时制)
    pub fn clock_label(&self, instant: &DateTime<Utc>) -> String {
        self.local_datetime(instant).format("%H:%M").to_string()
    }

    /// 当前归属日期
    pub fn today(&self) -> NaiveDate {
        self.local_date(&Utc::now())
    }
}

impl fmt::Display for BucketTimezone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BucketTimezone::Local => write!(f, "local"),
            BucketTimezone::Fixed(offset) => write!(f, "{}", offset),
        }
    }
}

// ==========================================
// 区间与粒度
// ==========================================

/// 含首尾的天数
pub fn inclusive_days(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days() + 1
}

/// 按跨度选择统计粒度
///
/// ≤31 天按日; 32-93 天按周; 其余按月
pub fn granularity_for_span(total_days: i64) -> Granularity {
    if total_days <= DAILY_MAX_DAYS {
        Granularity::Daily
    } else if total_days <= WEEKLY_MAX_DAYS {
        Granularity::Weekly
    } else {
        Granularity::Monthly
    }
}

/// 枚举 [start, end] 内的每一天
pub fn dates_between(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    start
        .iter_days()
        .take_while(|d| *d <= end)
        .collect()
}

/// 所在周的周一
pub fn monday_of(date: NaiveDate) -> NaiveDate {
    let offset = Duration::days(i64::from(date.weekday().num_days_from_monday()));
    date.checked_sub_signed(offset).unwrap_or(NaiveDate::MIN)
}

/// 所在月的 1 号
pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

// ==========================================
// 时间桶键与标签
// ==========================================

/// 日桶键: YYYY-MM-DD
pub fn day_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// 月桶键: YYYY-MM
pub fn month_key(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

/// 日桶标签 (月份简称 + 日)
pub fn day_label(date: NaiveDate, locale: &str) -> String {
    let month = date.month().to_string();
    let day = date.day().to_string();
    let month_name = i18n::t_in(locale, &format!("month.m{}", month));
    i18n::t_in_with_args(
        locale,
        "revenue.daily_label",
        &[("day", &day), ("month", &month), ("month_name", &month_name)],
    )
}

/// 周桶标签: "D/M - D/M" (周一至周日)
pub fn week_label(monday: NaiveDate) -> String {
    let sunday = monday
        .checked_add_signed(Duration::days(6))
        .unwrap_or(NaiveDate::MAX);
    format!(
        "{}/{} - {}/{}",
        monday.day(),
        monday.month(),
        sunday.day(),
        sunday.month()
    )
}

/// 月桶标签 (本地化月份 + 年)
pub fn month_label(date: NaiveDate, locale: &str) -> String {
    let month = date.month().to_string();
    let year = date.year().to_string();
    let month_name = i18n::t_in(locale, &format!("month.m{}", month));
    i18n::t_in_with_args(
        locale,
        "revenue.monthly_label",
        &[("year", &year), ("month", &month), ("month_name", &month_name)],
    )
}

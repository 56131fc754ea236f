// ==========================================
// 地铁票务管理后台 - 营收统计引擎
// ==========================================
// 职责: 营收总览 (按状态/票种计数) + 按日期区间的营收时间序列
// 输入: 已售车票列表 (全量读取后的内存数据)
// 输出: RevenueSummary / RevenueSeries
// ==========================================
// 缺省策略:
// - price 缺失按 0 计入总览
// - booking_time 或 price 缺失 (含 0 元) 的车票不进入时间序列
// - 区间外车票忽略,不报错
// ==========================================

use crate::domain::revenue::{RevenueBucket, RevenueSeries, RevenueSummary};
use crate::domain::ticket::Ticket;
use crate::domain::types::Granularity;
use crate::engine::calendar::{self, BucketTimezone};
use crate::i18n::DEFAULT_LOCALE;
use chrono::{Duration, NaiveDate};
use std::collections::BTreeMap;
use tracing::instrument;

/// 默认滚动窗口天数
pub const DEFAULT_WINDOW_DAYS: u32 = 7;

/// 滚动窗口上限 (按日一年)
pub const MAX_WINDOW_DAYS: u32 = 366;

// ==========================================
// RevenueOptions - 统计参数
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct RevenueOptions {
    pub timezone: BucketTimezone, // 购票时间归属日期的时区
    pub locale: String,           // 时间桶标签语言
}

impl Default for RevenueOptions {
    fn default() -> Self {
        Self {
            timezone: BucketTimezone::Local,
            locale: DEFAULT_LOCALE.to_string(),
        }
    }
}

/// 单日累计
#[derive(Debug, Clone, Copy, Default)]
struct DayTotal {
    revenue: f64,
    tickets: u64,
}

// ==========================================
// RevenueAggregator - 营收统计引擎
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct RevenueAggregator {
    options: RevenueOptions,
}

impl RevenueAggregator {
    /// 创建新的营收统计引擎
    pub fn new(options: RevenueOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &RevenueOptions {
        &self.options
    }

    /// 按统计时区的今天
    pub fn today(&self) -> NaiveDate {
        self.options.timezone.today()
    }

    // ==========================================
    // 营收总览
    // ==========================================

    /// 汇总全部车票
    ///
    /// - total_revenue = Σ price (缺失按 0)
    /// - by_status / by_type 按原始字面量分组计数
    #[instrument(skip(self, tickets), fields(count = tickets.len()))]
    pub fn summarize(&self, tickets: &[Ticket]) -> RevenueSummary {
        let mut summary = RevenueSummary::default();

        for ticket in tickets {
            summary.total_revenue += ticket.price_or_zero();
            summary.total_count += 1;
            *summary
                .by_status
                .entry(ticket.status.as_str().to_string())
                .or_insert(0) += 1;
            *summary.by_type.entry(ticket.ticket_type.clone()).or_insert(0) += 1;
        }

        summary
    }

    // ==========================================
    // 时间序列
    // ==========================================

    /// 指定日期区间的营收序列 (自适应粒度)
    ///
    /// 区间含首尾; start > end 时交换
    /// - ≤31 天 → 按日
    /// - 32-93 天 → 按周 (周一为键)
    /// - >93 天 → 按月
    #[instrument(skip(self, tickets), fields(count = tickets.len()))]
    pub fn bucket_by_date_range(
        &self,
        tickets: &[Ticket],
        start: NaiveDate,
        end: NaiveDate,
    ) -> RevenueSeries {
        let (start, end) = if start <= end { (start, end) } else { (end, start) };
        let granularity = calendar::granularity_for_span(calendar::inclusive_days(start, end));
        self.build_series(tickets, start, end, granularity)
    }

    /// 最近 N 天的营收序列 (固定按日)
    ///
    /// 区间为 today-(N-1) ..= today; N 为 0 时按 1 天处理,
    /// 超过 MAX_WINDOW_DAYS 时截断为 MAX_WINDOW_DAYS
    #[instrument(skip(self, tickets), fields(count = tickets.len()))]
    pub fn fixed_window(
        &self,
        tickets: &[Ticket],
        window_days: u32,
        today: NaiveDate,
    ) -> RevenueSeries {
        let window_days = window_days.clamp(1, MAX_WINDOW_DAYS);
        let start = today
            .checked_sub_signed(Duration::days(i64::from(window_days) - 1))
            .unwrap_or(NaiveDate::MIN);
        self.build_series(tickets, start, today, Granularity::Daily)
    }

    /// 本周营收 (周一至今天,自适应粒度)
    pub fn current_week(&self, tickets: &[Ticket], today: NaiveDate) -> RevenueSeries {
        self.bucket_by_date_range(tickets, calendar::monday_of(today), today)
    }

    /// 本月营收 (1 号至今天,自适应粒度)
    pub fn current_month(&self, tickets: &[Ticket], today: NaiveDate) -> RevenueSeries {
        self.bucket_by_date_range(tickets, calendar::first_of_month(today), today)
    }

    // ==========================================
    // 内部实现
    // ==========================================

    fn build_series(
        &self,
        tickets: &[Ticket],
        start: NaiveDate,
        end: NaiveDate,
        granularity: Granularity,
    ) -> RevenueSeries {
        let dates = calendar::dates_between(start, end);
        let totals = self.accumulate_days(tickets, start, dates.len());

        let buckets = match granularity {
            Granularity::Daily => self.daily_buckets(&dates, &totals),
            Granularity::Weekly => self.weekly_buckets(&dates, &totals),
            Granularity::Monthly => self.monthly_buckets(&dates, &totals),
        };

        let series = RevenueSeries::from_buckets(granularity, start, end, buckets);
        tracing::debug!(
            granularity = %series.granularity,
            buckets = series.buckets.len(),
            total_revenue = series.total_revenue,
            total_tickets = series.total_tickets,
            "营收序列生成完成"
        );
        series
    }

    /// 按日累计 (索引 = 距 start 的天数)
    fn accumulate_days(&self, tickets: &[Ticket], start: NaiveDate, days: usize) -> Vec<DayTotal> {
        let mut totals = vec![DayTotal::default(); days];
        let mut skipped = 0usize;
        let mut out_of_range = 0usize;

        for ticket in tickets {
            let (booking_time, price) = match (ticket.booking_time, ticket.price) {
                (Some(t), Some(p)) if p != 0.0 && p.is_finite() => (t, p),
                _ => {
                    skipped += 1;
                    continue;
                }
            };

            let date = self.options.timezone.local_date(&booking_time);
            let offset = (date - start).num_days();
            match usize::try_from(offset).ok().filter(|i| *i < days) {
                Some(i) => {
                    totals[i].revenue += price;
                    totals[i].tickets += 1;
                }
                None => out_of_range += 1,
            }
        }

        if skipped > 0 || out_of_range > 0 {
            tracing::debug!(skipped, out_of_range, "部分车票未计入营收序列");
        }
        totals
    }

    fn daily_buckets(&self, dates: &[NaiveDate], totals: &[DayTotal]) -> Vec<RevenueBucket> {
        dates
            .iter()
            .zip(totals)
            .map(|(date, total)| RevenueBucket {
                date_key: calendar::day_key(*date),
                label: calendar::day_label(*date, &self.options.locale),
                revenue: total.revenue,
                ticket_count: total.tickets,
            })
            .collect()
    }

    fn weekly_buckets(&self, dates: &[NaiveDate], totals: &[DayTotal]) -> Vec<RevenueBucket> {
        let mut weeks: BTreeMap<NaiveDate, DayTotal> = BTreeMap::new();
        for (date, total) in dates.iter().zip(totals) {
            let entry = weeks.entry(calendar::monday_of(*date)).or_default();
            entry.revenue += total.revenue;
            entry.tickets += total.tickets;
        }

        weeks
            .into_iter()
            .map(|(monday, total)| RevenueBucket {
                date_key: calendar::day_key(monday),
                label: calendar::week_label(monday),
                revenue: total.revenue,
                ticket_count: total.tickets,
            })
            .collect()
    }

    fn monthly_buckets(&self, dates: &[NaiveDate], totals: &[DayTotal]) -> Vec<RevenueBucket> {
        let mut months: BTreeMap<NaiveDate, DayTotal> = BTreeMap::new();
        for (date, total) in dates.iter().zip(totals) {
            let entry = months.entry(calendar::first_of_month(*date)).or_default();
            entry.revenue += total.revenue;
            entry.tickets += total.tickets;
        }

        months
            .into_iter()
            .map(|(first_day, total)| RevenueBucket {
                date_key: calendar::month_key(first_day),
                label: calendar::month_label(first_day, &self.options.locale),
                revenue: total.revenue,
                ticket_count: total.tickets,
            })
            .collect()
    }
}

// ==========================================
// 地铁票务管理后台 - 近期动态与用户联表
// ==========================================
// 职责:
// - 近期动态: 最新注册用户与最新购票记录按时间合并
// - 车票列表联表: 为每张车票补充购票用户的显示名与邮箱
// 输入: 全量读取后的内存数据,不访问数据库
// ==========================================

use crate::domain::activity::{Activity, ActivityKind};
use crate::domain::ticket::Ticket;
use crate::domain::user::{User, UserTicketView};
use crate::engine::calendar::BucketTimezone;
use crate::i18n;
use std::cmp::Ordering;
use std::collections::HashMap;

/// 近期动态条数 (每个来源同样取前 N 条再合并)
pub const RECENT_ACTIVITY_LIMIT: usize = 5;

// ==========================================
// 近期动态
// ==========================================

/// 合并最新注册与最新购票,按时间倒序取前 limit 条
///
/// - 无注册时间的用户、无购票时间的车票不参与
/// - 同一时间按动态ID升序,保证结果稳定
pub fn recent_activities(
    users: &[User],
    tickets: &[Ticket],
    limit: usize,
    timezone: &BucketTimezone,
    locale: &str,
) -> Vec<Activity> {
    let mut registrations: Vec<Activity> = users
        .iter()
        .filter_map(|user| {
            let timestamp = user.created_at?;
            let name = first_non_empty(&[user.username.as_deref(), user.email.as_deref()])
                .unwrap_or_else(|| i18n::t_in(locale, "activity.new_user"));
            Some(Activity {
                id: format!("{}_{}", ActivityKind::User, user.id),
                kind: ActivityKind::User,
                description: i18n::t_in_with_args(
                    locale,
                    "activity.user_registered",
                    &[("name", &name)],
                ),
                timestamp,
                time: timezone.clock_label(&timestamp),
            })
        })
        .collect();

    let mut purchases: Vec<Activity> = tickets
        .iter()
        .filter_map(|ticket| {
            let timestamp = ticket.booking_time?;
            let ticket_label = first_non_empty(&[
                Some(ticket.ticket_name.as_str()),
                Some(ticket.ticket_type.as_str()),
            ])
            .unwrap_or_default();
            Some(Activity {
                id: format!("{}_{}", ActivityKind::Ticket, ticket.id),
                kind: ActivityKind::Ticket,
                description: i18n::t_in_with_args(
                    locale,
                    "activity.ticket_purchased",
                    &[("ticket", &ticket_label)],
                ),
                timestamp,
                time: timezone.clock_label(&timestamp),
            })
        })
        .collect();

    registrations.sort_by(newest_first);
    registrations.truncate(limit);
    purchases.sort_by(newest_first);
    purchases.truncate(limit);

    let mut merged = registrations;
    merged.append(&mut purchases);
    merged.sort_by(newest_first);
    merged.truncate(limit);
    merged
}

fn newest_first(a: &Activity, b: &Activity) -> Ordering {
    b.timestamp.cmp(&a.timestamp).then_with(|| a.id.cmp(&b.id))
}

fn first_non_empty(candidates: &[Option<&str>]) -> Option<String> {
    candidates
        .iter()
        .flatten()
        .map(|v| v.trim())
        .find(|v| !v.is_empty())
        .map(str::to_string)
}

// ==========================================
// 车票列表联表
// ==========================================

/// 为车票补充用户信息,按购票时间倒序 (无购票时间的排最后)
///
/// - 用户不存在 → "未知用户" 显示名,邮箱为空
/// - 用户存在但无任何名称 → "未命名用户" 显示名
pub fn join_ticket_users(
    mut tickets: Vec<Ticket>,
    users: &[User],
    locale: &str,
) -> Vec<UserTicketView> {
    let by_id: HashMap<&str, &User> = users.iter().map(|u| (u.id.as_str(), u)).collect();
    tickets.sort_by(|a, b| b.booking_time.cmp(&a.booking_time));

    tickets
        .into_iter()
        .map(|ticket| {
            let (user_name, user_email) = match by_id.get(ticket.user_id.as_str()) {
                Some(user) => (
                    user.display_name()
                        .unwrap_or_else(|| i18n::t_in(locale, "user.unnamed")),
                    user.email_or_empty(),
                ),
                None => (i18n::t_in(locale, "user.unknown"), String::new()),
            };
            UserTicketView {
                ticket,
                user_name,
                user_email,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::TicketStatus;
    use chrono::{DateTime, FixedOffset, TimeZone, Utc};

    fn utc() -> BucketTimezone {
        BucketTimezone::Fixed(FixedOffset::east_opt(0).unwrap())
    }

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, day, hour, 15, 0).unwrap()
    }

    fn user(id: &str, username: Option<&str>, created_at: Option<DateTime<Utc>>) -> User {
        let mut u = User::new(id);
        u.username = username.map(str::to_string);
        u.created_at = created_at;
        u
    }

    fn ticket(id: &str, user_id: &str, booking_time: Option<DateTime<Utc>>) -> Ticket {
        let mut t = Ticket::new(id, "monthly", TicketStatus::Unused, Some(200000.0), booking_time);
        t.user_id = user_id.to_string();
        t.ticket_name = "Vé Tháng".to_string();
        t
    }

    #[test]
    fn test_recent_activities_merge_newest_first() {
        let users = vec![
            user("U1", Some("lannt"), Some(at(10, 8))),
            user("U2", None, Some(at(12, 9))),
            user("U3", Some("old"), None),
        ];
        let tickets = vec![
            ticket("T1", "U1", Some(at(11, 7))),
            ticket("T2", "U1", Some(at(13, 6))),
            ticket("T3", "U1", None),
        ];

        let feed = recent_activities(&users, &tickets, 5, &utc(), "vi");
        let ids: Vec<&str> = feed.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["ticket_T2", "user_U2", "ticket_T1", "user_U1"]);
        assert_eq!(feed[0].description, "Mua vé Vé Tháng");
        assert_eq!(feed[0].time, "06:15");
        assert_eq!(feed[1].description, "Người dùng mới đăng ký");
        assert_eq!(feed[3].description, "Người dùng lannt đăng ký");
    }

    #[test]
    fn test_recent_activities_respects_limit_per_source() {
        let users: Vec<User> = (1..=7)
            .map(|i| user(&format!("U{}", i), Some("u"), Some(at(i, 0))))
            .collect();
        let tickets: Vec<Ticket> = (1..=7)
            .map(|i| ticket(&format!("T{}", i), "U1", Some(at(i + 10, 0))))
            .collect();

        let feed = recent_activities(&users, &tickets, RECENT_ACTIVITY_LIMIT, &utc(), "en");
        assert_eq!(feed.len(), RECENT_ACTIVITY_LIMIT);
        assert!(feed.iter().all(|a| a.kind == ActivityKind::Ticket));
        assert_eq!(feed[0].id, "ticket_T7");
        assert_eq!(feed[0].description, "Ticket purchased: Vé Tháng");
    }

    #[test]
    fn test_join_ticket_users() {
        let mut named = user("U1", Some("lannt"), None);
        named.email = Some("lan@example.vn".to_string());
        let anonymous = User::new("U2");
        let tickets = vec![
            ticket("T1", "U1", Some(at(1, 0))),
            ticket("T2", "U2", Some(at(3, 0))),
            ticket("T3", "U9", None),
        ];

        let views = join_ticket_users(tickets, &[named, anonymous], "vi");
        let ids: Vec<&str> = views.iter().map(|v| v.ticket.id.as_str()).collect();
        assert_eq!(ids, vec!["T2", "T1", "T3"]);
        assert_eq!(views[0].user_name, "Người dùng không tên");
        assert_eq!(views[1].user_name, "lannt");
        assert_eq!(views[1].user_email, "lan@example.vn");
        assert_eq!(views[2].user_name, "Người dùng không xác định");
        assert_eq!(views[2].user_email, "");
    }
}

use crate::db;
use crate::services::nutrition::round_half_up;
use anyhow::Result;
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};
use serde::Serialize;
use sqlx::PgPool;

const DAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
const COMPARISON_DAYS: i64 = 30;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_users: i64,
    pub active_users: i64,
    pub new_sign_ups: i64,
    pub sign_up_change: i64,
    pub workout_completion_rate: i64,
    pub completion_change: i64,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DailyUsers {
    pub day: &'static str,
    pub users: i64,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct WeeklyCompletion {
    pub week: String,
    pub completion: i64,
}

/// Half-open UTC interval `[start, end)` with a display label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Window {
    pub label: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Rounded share of `part` in `whole`, 0 for an empty whole.
pub fn percent(part: i64, whole: i64) -> i64 {
    if whole > 0 {
        round_half_up(part as f64 / whole as f64 * 100.0)
    } else {
        0
    }
}

/// Rounded relative change, 0 when there is nothing to compare against.
pub fn percent_change(current: i64, previous: i64) -> i64 {
    if previous > 0 {
        round_half_up((current - previous) as f64 / previous as f64 * 100.0)
    } else {
        0
    }
}

pub fn rate_change(current_rate: i64, previous_rate: i64) -> i64 {
    if previous_rate > 0 {
        current_rate - previous_rate
    } else {
        0
    }
}

pub fn day_label(date: NaiveDate) -> &'static str {
    DAY_LABELS[date.weekday().num_days_from_sunday() as usize]
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// The last seven UTC days ending with today, oldest first.
pub fn daily_windows(now: DateTime<Utc>) -> Vec<Window> {
    let today = now.date_naive();
    (0..7)
        .rev()
        .map(|i| {
            let date = today - Duration::days(i);
            let start = start_of_day(date);
            Window {
                label: day_label(date).to_string(),
                start,
                end: start + Duration::days(1),
            }
        })
        .collect()
}

/// Four seven-day windows; `Week 1` starts 28 days before today.
pub fn weekly_windows(now: DateTime<Utc>) -> Vec<Window> {
    let today = now.date_naive();
    (0..4)
        .rev()
        .map(|i| {
            let start = start_of_day(today - Duration::days(i * 7 + 7));
            Window {
                label: format!("Week {}", 4 - i),
                start,
                end: start + Duration::days(7),
            }
        })
        .collect()
}

pub async fn build_stats(pool: &PgPool, now: DateTime<Utc>) -> Result<DashboardStats> {
    let month_ago = now - Duration::days(COMPARISON_DAYS);
    let two_months_ago = now - Duration::days(COMPARISON_DAYS * 2);

    let total_users = db::count_members(pool).await?;
    let active_users = db::count_active_members(pool).await?;
    let new_sign_ups = db::count_signups_between(pool, month_ago, None).await?;
    let previous_sign_ups = db::count_signups_between(pool, two_months_ago, Some(month_ago)).await?;

    let (_, with_plans) = db::count_members_with_plans(pool, None).await?;
    let (older_members, older_with_plans) = db::count_members_with_plans(pool, Some(month_ago)).await?;

    let workout_completion_rate = percent(with_plans, total_users);
    let previous_rate = percent(older_with_plans, older_members);

    Ok(DashboardStats {
        total_users,
        active_users,
        new_sign_ups,
        sign_up_change: percent_change(new_sign_ups, previous_sign_ups),
        workout_completion_rate,
        completion_change: rate_change(workout_completion_rate, previous_rate),
    })
}

pub async fn build_daily_users(pool: &PgPool, now: DateTime<Utc>) -> Result<Vec<DailyUsers>> {
    let mut out = Vec::with_capacity(7);
    for window in daily_windows(now) {
        let users = db::count_updated_between(pool, window.start, window.end).await?;
        out.push(DailyUsers {
            day: day_label(window.start.date_naive()),
            users,
        });
    }
    Ok(out)
}

pub async fn build_weekly_completion(pool: &PgPool, now: DateTime<Utc>) -> Result<Vec<WeeklyCompletion>> {
    let mut out = Vec::with_capacity(4);
    for window in weekly_windows(now) {
        let (members, with_plans) = db::count_members_with_plans(pool, Some(window.end)).await?;
        out.push(WeeklyCompletion {
            week: window.label,
            completion: percent(with_plans, members),
        });
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 30, 0).unwrap()
    }

    #[test]
    fn test_percent() {
        assert_eq!(percent(1, 3), 33);
        assert_eq!(percent(2, 3), 67);
        assert_eq!(percent(1, 8), 13); // 12.5 rounds up
        assert_eq!(percent(5, 0), 0);
        assert_eq!(percent(0, 10), 0);
    }

    #[test]
    fn test_percent_change() {
        assert_eq!(percent_change(15, 10), 50);
        assert_eq!(percent_change(5, 10), -50);
        assert_eq!(percent_change(7, 0), 0);
        // -12.5 rounds toward positive infinity
        assert_eq!(percent_change(7, 8), -12);
    }

    #[test]
    fn test_rate_change_needs_previous_rate() {
        assert_eq!(rate_change(60, 40), 20);
        assert_eq!(rate_change(30, 45), -15);
        assert_eq!(rate_change(60, 0), 0);
    }

    #[test]
    fn test_daily_windows() {
        // 2024-03-13 is a Wednesday
        let windows = daily_windows(at(2024, 3, 13, 15));
        assert_eq!(windows.len(), 7);
        let labels: Vec<&str> = windows.iter().map(|w| w.label.as_str()).collect();
        assert_eq!(labels, ["Thu", "Fri", "Sat", "Sun", "Mon", "Tue", "Wed"]);

        assert_eq!(windows[0].start, Utc.with_ymd_and_hms(2024, 3, 7, 0, 0, 0).unwrap());
        assert_eq!(windows[6].end, Utc.with_ymd_and_hms(2024, 3, 14, 0, 0, 0).unwrap());
        for pair in windows.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
    }

    #[test]
    fn test_weekly_windows() {
        let windows = weekly_windows(at(2024, 3, 29, 9));
        let labels: Vec<&str> = windows.iter().map(|w| w.label.as_str()).collect();
        assert_eq!(labels, ["Week 1", "Week 2", "Week 3", "Week 4"]);

        assert_eq!(windows[0].start, Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap());
        assert_eq!(windows[0].end, Utc.with_ymd_and_hms(2024, 3, 8, 0, 0, 0).unwrap());
        // the last window ends at the start of today
        assert_eq!(windows[3].start, Utc.with_ymd_and_hms(2024, 3, 22, 0, 0, 0).unwrap());
        assert_eq!(windows[3].end, Utc.with_ymd_and_hms(2024, 3, 29, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_stats_serialize_camel_case() {
        let stats = DashboardStats {
            total_users: 10,
            active_users: 8,
            new_sign_ups: 3,
            sign_up_change: 50,
            workout_completion_rate: 40,
            completion_change: 0,
        };
        let json = serde_json::to_value(stats).unwrap();
        assert_eq!(json["newSignUps"], 3);
        assert_eq!(json["signUpChange"], 50);
        assert_eq!(json["workoutCompletionRate"], 40);
    }
}

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Palette offered when creating a project. The first entry is the default.
pub const COLORS: [&str; 10] = [
    "#FF6B6B", "#4ECDC4", "#FFD166", "#06D6A0", "#118AB2", "#073B4C", "#8338EC", "#3A86FF",
    "#FB5607", "#FFBE0B",
];

fn is_false(value: &bool) -> bool {
    !*value
}

/// Millisecond timestamp ids, bumped until unused.
pub fn time_based_id(now: NaiveDateTime, taken: impl Fn(&str) -> bool) -> String {
    let mut stamp = now.and_utc().timestamp_millis();
    loop {
        let id = stamp.to_string();
        if !taken(&id) {
            return id;
        }
        stamp += 1;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    pub color: String,
    #[serde(rename = "todayTime", default, with = "crate::duration::hms")]
    pub today_secs: u64,
    #[serde(rename = "totalTime", default, with = "crate::duration::hms")]
    pub total_secs: u64,
    /// Day `today_secs` was accumulated on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub today_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub completed: bool,
}

impl Project {
    pub fn today_secs_on(&self, today: NaiveDate) -> u64 {
        if self.today_date == Some(today) {
            self.today_secs
        } else {
            0
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub title: String,
    pub date: NaiveDate,
    pub project: String,
    pub time: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalKind {
    Daily,
    Monthly,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    pub id: String,
    pub name: String,
    pub target: u32,
    pub color: String,
    #[serde(rename = "type")]
    pub kind: GoalKind,
    pub unit: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyProgress {
    /// Minutes tracked today.
    pub focus: u64,
    pub tasks: u32,
    pub projects: u32,
    pub date: Option<NaiveDate>,
    /// `YYYY-MM`
    pub month: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: String,
    pub text: String,
    pub completed: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

#[derive(Debug, Deserialize)]
pub struct CreateProjectRequest {
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateEventRequest {
    pub title: String,
    #[serde(default)]
    pub project: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct CreateGoalRequest {
    pub name: String,
    pub target: i64,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(rename = "type")]
    pub kind: GoalKind,
    #[serde(default)]
    pub unit: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateTodoRequest {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ThemePayload {
    pub theme: Theme,
}

#[derive(Debug, Deserialize)]
pub struct DateQuery {
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectView {
    pub id: String,
    pub name: String,
    pub color: String,
    pub today_time: String,
    pub total_time: String,
    pub current_session: String,
    pub completed: bool,
    pub active: bool,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub date: String,
    pub projects: Vec<ProjectView>,
    pub completed_projects: Vec<ProjectView>,
    pub active_project_id: Option<String>,
    pub current_time: String,
    pub total_time_today: String,
    pub streak: u32,
    pub pending_delete: Option<String>,
    pub colors: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ActionResponse {
    pub message: String,
    pub dashboard: DashboardResponse,
}

#[derive(Debug, Serialize)]
pub struct TimerResponse {
    pub active_project_id: Option<String>,
    pub elapsed: String,
}

#[derive(Debug, Serialize)]
pub struct ProjectShare {
    pub id: String,
    pub name: String,
    pub color: String,
    pub minutes: f64,
    pub percent: f64,
}

#[derive(Debug, Serialize)]
pub struct TopProject {
    pub name: String,
    pub time: String,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub total_minutes: f64,
    pub total_time: String,
    pub active_projects: usize,
    pub completed_projects: usize,
    pub top_project: Option<TopProject>,
    pub breakdown: Vec<ProjectShare>,
}

#[derive(Debug, Serialize)]
pub struct WeekDay {
    pub date: String,
    pub weekday: String,
    pub has_events: bool,
    pub is_today: bool,
}

#[derive(Debug, Serialize)]
pub struct WeekResponse {
    pub month: String,
    pub days: Vec<WeekDay>,
    pub selected: String,
    pub events: Vec<Event>,
}

#[derive(Debug, Serialize)]
pub struct GoalProgressView {
    pub goal: Goal,
    pub current: u64,
    pub percent: f64,
    pub met: bool,
}

#[derive(Debug, Serialize)]
pub struct ProgressResponse {
    pub progress: DailyProgress,
    pub goals: Vec<GoalProgressView>,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub authenticated: bool,
    pub user: Option<User>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn time_based_id_skips_taken_values() {
        let now = at(9, 0, 0);
        let first = time_based_id(now, |_| false);
        let second = time_based_id(now, |id| id == first);
        assert_ne!(first, second);
        assert_eq!(
            second.parse::<i64>().unwrap(),
            first.parse::<i64>().unwrap() + 1
        );
    }

    #[test]
    fn project_serializes_times_as_clock_strings() {
        let project = Project {
            id: "1".into(),
            name: "Thesis".into(),
            color: COLORS[0].into(),
            today_secs: 5,
            total_secs: 3_605,
            today_date: None,
            completed: false,
        };
        let json = serde_json::to_value(&project).unwrap();
        assert_eq!(json["todayTime"], "00:00:05");
        assert_eq!(json["totalTime"], "01:00:05");
        assert!(json.get("completed").is_none());

        let back: Project = serde_json::from_value(json).unwrap();
        assert_eq!(back, project);
    }

    #[test]
    fn today_time_belongs_to_its_day() {
        let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let project = Project {
            id: "1".into(),
            name: "Thesis".into(),
            color: COLORS[0].into(),
            today_secs: 40,
            total_secs: 40,
            today_date: Some(day),
            completed: false,
        };
        assert_eq!(project.today_secs_on(day), 40);
        assert_eq!(project.today_secs_on(day.succ_opt().unwrap()), 0);
    }
}

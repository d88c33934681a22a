use crate::errors::TrackerError;
use crate::ledger::Ledger;
use crate::models::{COLORS, DailyProgress, Goal, GoalKind, GoalProgressView, time_based_id};
use crate::todos::TodoList;
use chrono::{NaiveDate, NaiveDateTime};
use tracing::debug;

/// Which derived counter a goal is measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoalMetric {
    Focus,
    Tasks,
    Projects,
}

impl GoalMetric {
    pub fn for_goal(goal: &Goal) -> Self {
        let unit = goal.unit.trim().to_lowercase();
        if unit.starts_with("min") {
            GoalMetric::Focus
        } else if unit.starts_with("task") {
            GoalMetric::Tasks
        } else if unit.starts_with("project") {
            GoalMetric::Projects
        } else {
            match goal.kind {
                GoalKind::Daily => GoalMetric::Focus,
                GoalKind::Monthly => GoalMetric::Projects,
            }
        }
    }
}

pub fn default_goals() -> Vec<Goal> {
    vec![
        Goal {
            id: "focus".into(),
            name: "Focus time".into(),
            target: 120,
            color: COLORS[0].into(),
            kind: GoalKind::Daily,
            unit: "minutes".into(),
        },
        Goal {
            id: "tasks".into(),
            name: "Tasks done".into(),
            target: 5,
            color: COLORS[1].into(),
            kind: GoalKind::Daily,
            unit: "tasks".into(),
        },
        Goal {
            id: "projects".into(),
            name: "Projects worked on".into(),
            target: 3,
            color: COLORS[6].into(),
            kind: GoalKind::Monthly,
            unit: "projects".into(),
        },
    ]
}

pub fn add_goal(
    goals: &mut Vec<Goal>,
    name: &str,
    target: i64,
    color: Option<&str>,
    kind: GoalKind,
    unit: Option<&str>,
    now: NaiveDateTime,
) -> Result<Goal, TrackerError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(TrackerError::EmptyGoalName);
    }
    if target <= 0 {
        return Err(TrackerError::InvalidGoalTarget);
    }
    let target = u32::try_from(target).unwrap_or(u32::MAX);
    let unit = unit
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .unwrap_or(match kind {
            GoalKind::Daily => "minutes",
            GoalKind::Monthly => "projects",
        });

    let goal = Goal {
        id: time_based_id(now, |id| goals.iter().any(|g| g.id == id)),
        name: name.to_string(),
        target,
        color: color
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(COLORS[0])
            .to_string(),
        kind,
        unit: unit.to_string(),
    };
    goals.push(goal.clone());
    Ok(goal)
}

pub fn remove_goal(goals: &mut Vec<Goal>, goal_id: &str) -> Result<Goal, TrackerError> {
    let index = goals
        .iter()
        .position(|g| g.id == goal_id)
        .ok_or_else(|| TrackerError::UnknownGoal(goal_id.to_string()))?;
    Ok(goals.remove(index))
}

fn month_key(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

impl DailyProgress {
    /// Zeroes counters whose period rolled over, then re-derives them.
    pub fn refresh(&mut self, now: NaiveDateTime, ledger: &Ledger, todos: &TodoList) {
        let today = now.date();
        let month = month_key(today);

        if self.date != Some(today) {
            debug!(previous = ?self.date, %today, "daily progress rolled over");
            self.focus = 0;
            self.tasks = 0;
            self.date = Some(today);
        }
        if self.month.as_deref() != Some(month.as_str()) {
            debug!(previous = ?self.month, %month, "monthly progress rolled over");
            self.projects = 0;
            self.month = Some(month);
        }

        self.focus = ledger.total_today(now) / 60;
        self.tasks = todos.completed_on(today);
        self.projects = ledger
            .projects()
            .iter()
            .chain(ledger.completed().iter())
            .filter(|p| p.total_secs > 0)
            .count() as u32;
    }

    pub fn value_of(&self, metric: GoalMetric) -> u64 {
        match metric {
            GoalMetric::Focus => self.focus,
            GoalMetric::Tasks => u64::from(self.tasks),
            GoalMetric::Projects => u64::from(self.projects),
        }
    }
}

pub fn goal_progress(goals: &[Goal], progress: &DailyProgress) -> Vec<GoalProgressView> {
    goals
        .iter()
        .map(|goal| {
            let current = progress.value_of(GoalMetric::for_goal(goal));
            let target = f64::from(goal.target.max(1));
            GoalProgressView {
                goal: goal.clone(),
                current,
                percent: (current as f64 / target * 100.0).min(100.0),
                met: current >= u64::from(goal.target),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn at(m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[test]
    fn goal_validation() {
        let mut goals = Vec::new();
        let now = at(1, 1, 9);
        assert_eq!(
            add_goal(&mut goals, "Read", 0, None, GoalKind::Daily, None, now).unwrap_err(),
            TrackerError::InvalidGoalTarget
        );
        assert_eq!(
            add_goal(&mut goals, "Read", -4, None, GoalKind::Daily, None, now).unwrap_err(),
            TrackerError::InvalidGoalTarget
        );
        assert_eq!(
            add_goal(&mut goals, "", 3, None, GoalKind::Daily, None, now).unwrap_err(),
            TrackerError::EmptyGoalName
        );
        let goal = add_goal(&mut goals, "Read", 30, None, GoalKind::Daily, None, now).unwrap();
        assert_eq!(goal.unit, "minutes");
        assert_eq!(goals.len(), 1);

        remove_goal(&mut goals, &goal.id).unwrap();
        assert!(remove_goal(&mut goals, &goal.id).is_err());
    }

    #[test]
    fn progress_is_derived_from_ledger_and_todos() {
        let now = at(1, 1, 9);
        let mut ledger = Ledger::default();
        let a = ledger.create("A", None, now).unwrap().id.clone();
        ledger.create("B", None, now).unwrap();
        ledger.start(&a, now).unwrap();
        ledger.stop(&a, now + Duration::minutes(25)).unwrap();

        let mut todos = TodoList::default();
        let id = todos.add("Ship it", now).unwrap().id.clone();
        todos.toggle(&id).unwrap();

        let mut progress = DailyProgress::default();
        progress.refresh(now + Duration::minutes(30), &ledger, &todos);
        assert_eq!(progress.focus, 25);
        assert_eq!(progress.tasks, 1);
        assert_eq!(progress.projects, 1);
        assert_eq!(progress.month.as_deref(), Some("2024-01"));

        let views = goal_progress(&default_goals(), &progress);
        assert_eq!(views[0].current, 25);
        assert!(!views[0].met);
        assert!((views[1].percent - 20.0).abs() < f64::EPSILON);
        assert_eq!(views[2].current, 1);
    }

    #[test]
    fn daily_counters_reset_but_monthly_survive_a_new_day() {
        let day_one = at(1, 1, 9);
        let mut ledger = Ledger::default();
        let a = ledger.create("A", None, day_one).unwrap().id.clone();
        ledger.start(&a, day_one).unwrap();
        ledger.stop(&a, day_one + Duration::minutes(10)).unwrap();
        let todos = TodoList::default();

        let mut progress = DailyProgress::default();
        progress.refresh(day_one, &ledger, &todos);
        assert_eq!(progress.focus, 10);

        progress.refresh(at(1, 2, 9), &ledger, &todos);
        assert_eq!(progress.focus, 0);
        assert_eq!(progress.projects, 1);
        assert_eq!(progress.date, Some(at(1, 2, 9).date()));
    }

    #[test]
    fn percent_is_capped() {
        let progress = DailyProgress {
            focus: 500,
            ..DailyProgress::default()
        };
        let views = goal_progress(&default_goals()[..1], &progress);
        assert_eq!(views[0].percent, 100.0);
        assert!(views[0].met);
    }

    #[test]
    fn metric_falls_back_to_goal_kind() {
        let mut goal = default_goals().remove(2);
        goal.unit = "things".into();
        assert_eq!(GoalMetric::for_goal(&goal), GoalMetric::Projects);
        goal.kind = GoalKind::Daily;
        assert_eq!(GoalMetric::for_goal(&goal), GoalMetric::Focus);
    }
}

use crate::calendar::Calendar;
use crate::duration::format_hms;
use crate::errors::AppError;
use crate::goals::{default_goals, goal_progress};
use crate::ledger::{Ledger, TimerState};
use crate::models::{
    AuthResponse, COLORS, DailyProgress, DashboardResponse, Goal, Project, ProjectView,
    ProgressResponse, Theme, User,
};
use crate::storage::{KvStore, keys};
use crate::streak::Streak;
use crate::todos::TodoList;
use chrono::{NaiveDate, NaiveDateTime};
use tracing::info;

/// Everything the application knows, owned in one place. Loaded from and
/// written back to a [`KvStore`].
#[derive(Debug, Clone, Default)]
pub struct Tracker {
    pub ledger: Ledger,
    pub streak: Streak,
    pub calendar: Calendar,
    pub goals: Vec<Goal>,
    pub progress: DailyProgress,
    pub todos: TodoList,
    pub user: Option<User>,
    pub theme: Theme,
}

impl Tracker {
    pub fn load(store: &KvStore, now: NaiveDateTime) -> Self {
        let active_id: Option<String> = store.get_opt(keys::ACTIVE_PROJECT_ID);
        let timer = match active_id {
            Some(project_id) => {
                // A missing marker restarts the session from now.
                let started_at = store
                    .get_opt(&keys::session_start(&project_id))
                    .unwrap_or(now);
                info!(project = %project_id, %started_at, "resuming running session");
                TimerState::Running {
                    project_id,
                    started_at,
                }
            }
            None => TimerState::Idle,
        };

        let last_active = store
            .get_opt::<String>(keys::LAST_ACTIVE_DAY)
            .and_then(|day| day.parse::<NaiveDate>().ok());

        let mut tracker = Self {
            ledger: Ledger::restore(
                store.get(keys::PROJECTS),
                store.get(keys::COMPLETED_PROJECTS),
                timer,
            ),
            streak: Streak::new(store.get(keys::STREAK_COUNT), last_active),
            calendar: Calendar::new(store.get(keys::CALENDAR_EVENTS)),
            goals: store
                .get_opt(keys::DAILY_GOALS)
                .unwrap_or_else(default_goals),
            progress: store.get(keys::DAILY_PROGRESS),
            todos: TodoList::new(store.get(keys::TODOS)),
            user: store.get_opt(keys::USER),
            theme: store.get(keys::THEME),
        };
        tracker.observe(now);
        tracker
    }

    /// Per-request day bookkeeping: streak rollover and derived progress.
    /// Returns whether a day or month boundary was crossed.
    pub fn observe(&mut self, now: NaiveDateTime) -> bool {
        let rolled = self.streak.observe(now.date());
        let period = (self.progress.date, self.progress.month.clone());
        self.refresh_progress(now);
        rolled || period != (self.progress.date, self.progress.month.clone())
    }

    pub fn refresh_progress(&mut self, now: NaiveDateTime) {
        self.progress.refresh(now, &self.ledger, &self.todos);
    }

    pub fn save(&self, store: &mut KvStore) -> Result<(), AppError> {
        store.set(keys::PROJECTS, &self.ledger.projects())?;
        store.set(keys::COMPLETED_PROJECTS, &self.ledger.completed())?;

        let stale: Vec<String> = store
            .keys_with_prefix(keys::SESSION_START_PREFIX)
            .map(str::to_string)
            .collect();
        for key in stale {
            store.remove(&key);
        }
        match self.ledger.running() {
            Some((project_id, started_at)) => {
                store.set(keys::ACTIVE_PROJECT_ID, &project_id)?;
                store.set(&keys::session_start(project_id), &started_at)?;
            }
            None => store.remove(keys::ACTIVE_PROJECT_ID),
        }

        store.set(keys::STREAK_COUNT, &self.streak.count)?;
        match self.streak.last_active {
            Some(day) => store.set(keys::LAST_ACTIVE_DAY, &day.to_string())?,
            None => store.remove(keys::LAST_ACTIVE_DAY),
        }

        store.set(keys::CALENDAR_EVENTS, &self.calendar.events())?;
        store.set(keys::TODOS, &self.todos.items())?;
        store.set(keys::DAILY_GOALS, &self.goals)?;
        store.set(keys::DAILY_PROGRESS, &self.progress)?;
        store.set(keys::THEME, &self.theme)?;
        match &self.user {
            Some(user) => store.set(keys::USER, user)?,
            None => store.remove(keys::USER),
        }
        Ok(())
    }

    pub fn project_view(&self, project: &Project, now: NaiveDateTime) -> ProjectView {
        let active = self.ledger.active_id() == Some(project.id.as_str());
        ProjectView {
            id: project.id.clone(),
            name: project.name.clone(),
            color: project.color.clone(),
            today_time: format_hms(project.today_secs_on(now.date())),
            total_time: format_hms(project.total_secs),
            current_session: format_hms(self.ledger.current_session_secs(&project.id, now)),
            completed: project.completed,
            active,
        }
    }

    pub fn dashboard(&self, now: NaiveDateTime) -> DashboardResponse {
        let views = |list: &[Project]| {
            list.iter()
                .map(|p| self.project_view(p, now))
                .collect::<Vec<_>>()
        };
        DashboardResponse {
            date: now.date().to_string(),
            projects: views(self.ledger.projects()),
            completed_projects: views(self.ledger.completed()),
            active_project_id: self.ledger.active_id().map(str::to_string),
            current_time: format_hms(self.ledger.session_secs(now)),
            total_time_today: format_hms(self.ledger.total_today(now)),
            streak: self.streak.count,
            pending_delete: self.ledger.pending_delete().map(str::to_string),
            colors: COLORS.iter().map(|c| c.to_string()).collect(),
        }
    }

    pub fn progress_report(&self) -> ProgressResponse {
        ProgressResponse {
            progress: self.progress.clone(),
            goals: goal_progress(&self.goals, &self.progress),
        }
    }

    pub fn auth(&self) -> AuthResponse {
        AuthResponse {
            authenticated: self.user.is_some(),
            user: self.user.clone(),
        }
    }
}

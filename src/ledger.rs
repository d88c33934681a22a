use crate::errors::TrackerError;
use crate::models::{COLORS, Project, time_based_id};
use chrono::NaiveDateTime;
use tracing::{info, warn};

const ENCOURAGING_PHRASES: [&str; 10] = [
    "Dream complete! ✨",
    "You flowed like a dream! 🌈",
    "Another successful journey! 🚀",
    "Time well spent in dreamland! 💫",
    "Focus mode conquered! 🏆",
    "Productivity at its finest! 🌟",
    "You're on a roll today! 🔥",
    "Fantastic work session! 💯",
    "Dream big, achieve bigger! 🌌",
    "Flow state mastered! 🧠",
];

pub const START_MESSAGE: &str = "Flow started! Let the dreams begin ✨";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TimerState {
    #[default]
    Idle,
    Running {
        project_id: String,
        started_at: NaiveDateTime,
    },
}

/// What a stopped session added to its project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    pub project_id: String,
    pub project_name: String,
    pub session_secs: u64,
    pub total_secs: u64,
}

impl SessionSummary {
    pub fn phrase(&self) -> &'static str {
        ENCOURAGING_PHRASES[self.session_secs as usize % ENCOURAGING_PHRASES.len()]
    }

    pub fn message(&self) -> String {
        format!("{}: {}", self.project_name, self.phrase())
    }
}

/// Message for a start; a project stopped on the way gets its phrase first.
pub fn start_message(previous: Option<&SessionSummary>) -> String {
    match previous {
        Some(summary) => format!("{} {START_MESSAGE}", summary.message()),
        None => START_MESSAGE.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Toggle {
    Started { previous: Option<SessionSummary> },
    Stopped(SessionSummary),
}

/// Active and completed projects plus the single running session.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    projects: Vec<Project>,
    completed: Vec<Project>,
    timer: TimerState,
    pending_delete: Option<String>,
}

pub fn elapsed_secs(started_at: NaiveDateTime, now: NaiveDateTime) -> u64 {
    (now - started_at).num_seconds().max(0) as u64
}

impl Ledger {
    pub fn restore(projects: Vec<Project>, completed: Vec<Project>, timer: TimerState) -> Self {
        let timer = match timer {
            TimerState::Running { ref project_id, .. }
                if !projects.iter().any(|p| &p.id == project_id) =>
            {
                warn!("stored active project {project_id} is not an active project, clearing it");
                TimerState::Idle
            }
            timer => timer,
        };
        Self {
            projects,
            completed,
            timer,
            pending_delete: None,
        }
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn completed(&self) -> &[Project] {
        &self.completed
    }

    pub fn timer(&self) -> &TimerState {
        &self.timer
    }

    pub fn pending_delete(&self) -> Option<&str> {
        self.pending_delete.as_deref()
    }

    pub fn active_id(&self) -> Option<&str> {
        match &self.timer {
            TimerState::Running { project_id, .. } => Some(project_id),
            TimerState::Idle => None,
        }
    }

    pub fn running(&self) -> Option<(&str, NaiveDateTime)> {
        match &self.timer {
            TimerState::Running {
                project_id,
                started_at,
            } => Some((project_id, *started_at)),
            TimerState::Idle => None,
        }
    }

    pub fn session_secs(&self, now: NaiveDateTime) -> u64 {
        self.running()
            .map(|(_, started_at)| elapsed_secs(started_at, now))
            .unwrap_or(0)
    }

    pub fn current_session_secs(&self, project_id: &str, now: NaiveDateTime) -> u64 {
        match self.running() {
            Some((id, started_at)) if id == project_id => elapsed_secs(started_at, now),
            _ => 0,
        }
    }

    /// Today's time across active projects, running session included.
    pub fn total_today(&self, now: NaiveDateTime) -> u64 {
        let today = now.date();
        let folded: u64 = self.projects.iter().map(|p| p.today_secs_on(today)).sum();
        folded + self.session_secs(now)
    }

    pub fn start(
        &mut self,
        project_id: &str,
        now: NaiveDateTime,
    ) -> Result<Option<SessionSummary>, TrackerError> {
        self.transition(Some(project_id), now)
    }

    pub fn stop(
        &mut self,
        project_id: &str,
        now: NaiveDateTime,
    ) -> Result<SessionSummary, TrackerError> {
        if self.active_id() != Some(project_id) {
            return Err(TrackerError::NotRunning(project_id.to_string()));
        }
        self.transition(None, now)?
            .ok_or_else(|| TrackerError::NotRunning(project_id.to_string()))
    }

    pub fn toggle(&mut self, project_id: &str, now: NaiveDateTime) -> Result<Toggle, TrackerError> {
        if self.active_id() == Some(project_id) {
            self.stop(project_id, now).map(Toggle::Stopped)
        } else {
            self.start(project_id, now)
                .map(|previous| Toggle::Started { previous })
        }
    }

    /// Sole mutation point of the timer. `None` means idle. A running
    /// session is always folded before another one begins.
    fn transition(
        &mut self,
        target: Option<&str>,
        now: NaiveDateTime,
    ) -> Result<Option<SessionSummary>, TrackerError> {
        if let Some(id) = target {
            if !self.projects.iter().any(|p| p.id == id) {
                return Err(TrackerError::UnknownProject(id.to_string()));
            }
            if self.active_id() == Some(id) {
                return Ok(None);
            }
        }

        let stopped = self.fold_running(now);

        if let Some(id) = target {
            info!(project = id, "timer started");
            self.timer = TimerState::Running {
                project_id: id.to_string(),
                started_at: now,
            };
        }

        Ok(stopped)
    }

    fn fold_running(&mut self, now: NaiveDateTime) -> Option<SessionSummary> {
        let TimerState::Running {
            project_id,
            started_at,
        } = std::mem::take(&mut self.timer)
        else {
            return None;
        };

        let session_secs = elapsed_secs(started_at, now);
        let today = now.date();
        let project = self.projects.iter_mut().find(|p| p.id == project_id)?;
        if project.today_date != Some(today) {
            project.today_secs = 0;
            project.today_date = Some(today);
        }
        project.today_secs = project.today_secs.saturating_add(session_secs);
        project.total_secs = project.total_secs.saturating_add(session_secs);

        info!(project = %project_id, session_secs, "timer stopped");
        Some(SessionSummary {
            project_id,
            project_name: project.name.clone(),
            session_secs,
            total_secs: project.total_secs,
        })
    }

    pub fn create(
        &mut self,
        name: &str,
        color: Option<&str>,
        now: NaiveDateTime,
    ) -> Result<&Project, TrackerError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(TrackerError::EmptyProjectName);
        }
        let color = color
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(COLORS[0]);

        let id = time_based_id(now, |id| self.contains(id));
        info!(project = %id, name, "project created");
        self.projects.push(Project {
            id,
            name: name.to_string(),
            color: color.to_string(),
            today_secs: 0,
            total_secs: 0,
            today_date: Some(now.date()),
            completed: false,
        });
        Ok(&self.projects[self.projects.len() - 1])
    }

    pub fn complete(
        &mut self,
        project_id: &str,
        now: NaiveDateTime,
    ) -> Result<(Project, Option<SessionSummary>), TrackerError> {
        let index = self
            .projects
            .iter()
            .position(|p| p.id == project_id)
            .ok_or_else(|| TrackerError::UnknownProject(project_id.to_string()))?;

        let stopped = if self.active_id() == Some(project_id) {
            self.transition(None, now)?
        } else {
            None
        };

        let mut project = self.projects.remove(index);
        project.completed = true;
        self.completed.push(project.clone());
        info!(project = project_id, "project completed");
        Ok((project, stopped))
    }

    /// First phase of deletion; nothing is removed until confirmed.
    pub fn request_delete(&mut self, project_id: &str) -> Result<(), TrackerError> {
        if !self.contains(project_id) {
            return Err(TrackerError::UnknownProject(project_id.to_string()));
        }
        self.pending_delete = Some(project_id.to_string());
        Ok(())
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    pub fn confirm_delete(&mut self) -> Result<Project, TrackerError> {
        let project_id = self
            .pending_delete
            .take()
            .ok_or(TrackerError::NoPendingDelete)?;

        if self.active_id() == Some(project_id.as_str()) {
            self.timer = TimerState::Idle;
        }

        let mut removed = None;
        if let Some(index) = self.projects.iter().position(|p| p.id == project_id) {
            removed = Some(self.projects.remove(index));
        }
        if let Some(index) = self.completed.iter().position(|p| p.id == project_id) {
            removed = Some(self.completed.remove(index));
        }

        let project = removed.ok_or(TrackerError::UnknownProject(project_id))?;
        info!(project = %project.id, "project deleted");
        Ok(project)
    }

    fn contains(&self, project_id: &str) -> bool {
        self.projects
            .iter()
            .chain(self.completed.iter())
            .any(|p| p.id == project_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::duration::format_hms;
    use chrono::{Duration, NaiveDate};

    fn at(day: u32, h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    fn ledger_with(names: &[&str]) -> (Ledger, Vec<String>) {
        let mut ledger = Ledger::default();
        let ids = names
            .iter()
            .map(|name| ledger.create(name, None, at(1, 8, 0, 0)).unwrap().id.clone())
            .collect();
        (ledger, ids)
    }

    #[test]
    fn five_second_session_folds_into_today_and_total() {
        let mut ledger = Ledger::default();
        let start = at(1, 9, 0, 0);
        let id = ledger.create("P", Some("#FF6B6B"), start).unwrap().id.clone();

        ledger.start(&id, start).unwrap();
        let summary = ledger.stop(&id, start + Duration::seconds(5)).unwrap();
        assert_eq!(summary.session_secs, 5);

        let project = &ledger.projects()[0];
        assert_eq!(project.color, "#FF6B6B");
        assert_eq!(format_hms(project.today_secs), "00:00:05");
        assert_eq!(format_hms(project.total_secs), "00:00:05");
        assert_eq!(
            format_hms(ledger.current_session_secs(&id, start + Duration::seconds(9))),
            "00:00:00"
        );
        assert_eq!(ledger.active_id(), None);
    }

    #[test]
    fn total_is_sum_of_sessions() {
        let (mut ledger, ids) = ledger_with(&["Writing"]);
        let id = &ids[0];
        let mut clock = at(1, 9, 0, 0);
        let mut expected = 0;
        for secs in [7, 60, 3_601, 0, 42] {
            ledger.start(id, clock).unwrap();
            clock += Duration::seconds(secs);
            ledger.stop(id, clock).unwrap();
            clock += Duration::seconds(30);
            expected += secs as u64;
        }
        let project = &ledger.projects()[0];
        assert_eq!(project.total_secs, expected);
        assert_eq!(project.today_secs, project.total_secs);
    }

    #[test]
    fn starting_another_project_stops_the_running_one_first() {
        let (mut ledger, ids) = ledger_with(&["A", "B"]);
        ledger.start(&ids[0], at(1, 9, 0, 0)).unwrap();

        let previous = ledger.start(&ids[1], at(1, 9, 0, 30)).unwrap();
        let previous = previous.expect("A should have been stopped");
        assert_eq!(previous.project_id, ids[0]);
        assert_eq!(previous.session_secs, 30);
        assert_eq!(ledger.projects()[0].total_secs, 30);
        assert_eq!(ledger.active_id(), Some(ids[1].as_str()));
        assert_eq!(ledger.session_secs(at(1, 9, 0, 40)), 10);

        let message = start_message(Some(&previous));
        assert!(message.starts_with(&format!("A: {}", previous.phrase())));
        assert!(message.ends_with(START_MESSAGE));
        assert_eq!(start_message(None), START_MESSAGE);
    }

    #[test]
    fn starting_the_running_project_is_a_no_op() {
        let (mut ledger, ids) = ledger_with(&["A"]);
        ledger.start(&ids[0], at(1, 9, 0, 0)).unwrap();
        assert_eq!(ledger.start(&ids[0], at(1, 9, 5, 0)).unwrap(), None);
        assert_eq!(ledger.running(), Some((ids[0].as_str(), at(1, 9, 0, 0))));
    }

    #[test]
    fn toggle_alternates_between_start_and_stop() {
        let (mut ledger, ids) = ledger_with(&["A"]);
        let started = ledger.toggle(&ids[0], at(1, 9, 0, 0)).unwrap();
        assert_eq!(started, Toggle::Started { previous: None });

        let Toggle::Stopped(summary) = ledger.toggle(&ids[0], at(1, 9, 1, 0)).unwrap() else {
            panic!("expected a stop");
        };
        assert_eq!(summary.total_secs, 60);
        assert!(ENCOURAGING_PHRASES.contains(&summary.phrase()));
        assert_eq!(summary.message(), format!("A: {}", summary.phrase()));
    }

    #[test]
    fn stopping_an_idle_project_is_rejected() {
        let (mut ledger, ids) = ledger_with(&["A"]);
        assert_eq!(
            ledger.stop(&ids[0], at(1, 9, 0, 0)),
            Err(TrackerError::NotRunning(ids[0].clone()))
        );
    }

    #[test]
    fn unknown_projects_cannot_start() {
        let mut ledger = Ledger::default();
        assert_eq!(
            ledger.start("nope", at(1, 9, 0, 0)),
            Err(TrackerError::UnknownProject("nope".into()))
        );
    }

    #[test]
    fn create_rejects_blank_names_and_defaults_color() {
        let mut ledger = Ledger::default();
        assert_eq!(
            ledger.create("   ", None, at(1, 9, 0, 0)).unwrap_err(),
            TrackerError::EmptyProjectName
        );
        let project = ledger.create(" Garden ", Some(""), at(1, 9, 0, 0)).unwrap();
        assert_eq!(project.name, "Garden");
        assert_eq!(project.color, COLORS[0]);
        assert_eq!(project.today_secs, 0);
        assert_eq!(project.total_secs, 0);
    }

    #[test]
    fn ids_are_unique_within_the_same_instant() {
        let (ledger, ids) = ledger_with(&["A", "B", "C"]);
        assert_eq!(ledger.projects().len(), 3);
        assert_ne!(ids[0], ids[1]);
        assert_ne!(ids[1], ids[2]);
    }

    #[test]
    fn completing_moves_the_project_exactly_once() {
        let (mut ledger, ids) = ledger_with(&["A", "B"]);
        ledger.start(&ids[0], at(1, 9, 0, 0)).unwrap();

        let (project, stopped) = ledger.complete(&ids[0], at(1, 9, 0, 20)).unwrap();
        assert!(project.completed);
        assert_eq!(project.total_secs, 20);
        assert!(stopped.is_some());
        assert_eq!(ledger.active_id(), None);
        assert_eq!(ledger.projects().len(), 1);
        assert_eq!(ledger.completed().len(), 1);

        assert!(ledger.complete(&ids[0], at(1, 9, 1, 0)).is_err());
        assert_eq!(ledger.completed().len(), 1);
    }

    #[test]
    fn deletion_waits_for_confirmation() {
        let (mut ledger, ids) = ledger_with(&["A"]);
        ledger.request_delete(&ids[0]).unwrap();
        assert_eq!(ledger.pending_delete(), Some(ids[0].as_str()));
        assert_eq!(ledger.projects().len(), 1);

        ledger.cancel_delete();
        assert_eq!(ledger.confirm_delete(), Err(TrackerError::NoPendingDelete));
        assert_eq!(ledger.projects().len(), 1);
    }

    #[test]
    fn deleting_the_active_project_clears_the_timer() {
        let (mut ledger, ids) = ledger_with(&["A", "B"]);
        ledger.start(&ids[1], at(1, 9, 0, 0)).unwrap();
        ledger.request_delete(&ids[1]).unwrap();

        let removed = ledger.confirm_delete().unwrap();
        assert_eq!(removed.id, ids[1]);
        assert_eq!(ledger.timer(), &TimerState::Idle);
        assert_eq!(ledger.projects().len(), 1);
        assert_eq!(ledger.pending_delete(), None);
    }

    #[test]
    fn completed_projects_can_be_deleted() {
        let (mut ledger, ids) = ledger_with(&["A"]);
        ledger.complete(&ids[0], at(1, 9, 0, 0)).unwrap();
        ledger.request_delete(&ids[0]).unwrap();
        ledger.confirm_delete().unwrap();
        assert!(ledger.completed().is_empty());
    }

    #[test]
    fn today_time_restarts_on_a_new_day() {
        let (mut ledger, ids) = ledger_with(&["A"]);
        ledger.start(&ids[0], at(1, 9, 0, 0)).unwrap();
        ledger.stop(&ids[0], at(1, 10, 0, 0)).unwrap();

        ledger.start(&ids[0], at(2, 9, 0, 0)).unwrap();
        ledger.stop(&ids[0], at(2, 9, 10, 0)).unwrap();

        let project = &ledger.projects()[0];
        assert_eq!(project.today_secs, 600);
        assert_eq!(project.total_secs, 4_200);
        assert_eq!(ledger.total_today(at(2, 12, 0, 0)), 600);
        assert_eq!(ledger.total_today(at(3, 12, 0, 0)), 0);
    }

    #[test]
    fn total_today_includes_the_running_session() {
        let (mut ledger, ids) = ledger_with(&["A", "B"]);
        ledger.start(&ids[0], at(1, 9, 0, 0)).unwrap();
        ledger.start(&ids[1], at(1, 9, 1, 0)).unwrap();
        assert_eq!(ledger.total_today(at(1, 9, 1, 30)), 90);
    }

    #[test]
    fn restore_drops_a_dangling_active_pointer() {
        let timer = TimerState::Running {
            project_id: "ghost".into(),
            started_at: at(1, 9, 0, 0),
        };
        let ledger = Ledger::restore(Vec::new(), Vec::new(), timer);
        assert_eq!(ledger.timer(), &TimerState::Idle);
    }
}

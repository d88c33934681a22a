use crate::duration::{format_minutes, to_minutes};
use crate::ledger::Ledger;
use crate::models::{ProjectShare, StatsResponse, TopProject};

pub fn build_stats(ledger: &Ledger) -> StatsResponse {
    let projects = ledger.projects();
    let total_minutes: f64 = projects.iter().map(|p| to_minutes(p.total_secs)).sum();

    let mut breakdown: Vec<ProjectShare> = projects
        .iter()
        .map(|project| {
            let minutes = to_minutes(project.total_secs);
            let percent = if total_minutes > 0.0 {
                minutes / total_minutes * 100.0
            } else {
                0.0
            };
            ProjectShare {
                id: project.id.clone(),
                name: project.name.clone(),
                color: project.color.clone(),
                minutes,
                percent,
            }
        })
        .collect();
    breakdown.sort_by(|a, b| b.minutes.total_cmp(&a.minutes));

    let top_project = breakdown.first().map(|top| TopProject {
        name: top.name.clone(),
        time: format_minutes(top.minutes),
    });

    StatsResponse {
        total_minutes,
        total_time: format_minutes(total_minutes),
        active_projects: projects.len(),
        completed_projects: ledger.completed().len(),
        top_project,
        breakdown,
    }
}

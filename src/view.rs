//! Read-only projections that combine several collections.

use chrono::NaiveDate;

use crate::derive::{self, ReflectionProgress, TopCompanies, TOP_COMPANIES_SHOWN};
use crate::models::{
    Application, ApplicationStatus, Category, Company, Contact, Reflection, Task,
};

/// The target company whose name equals the application's company, ignoring case.
pub fn target_company_for<'a>(app: &Application, companies: &'a [Company]) -> Option<&'a Company> {
    let wanted = app.company.to_lowercase();
    companies.iter().find(|c| c.name.to_lowercase() == wanted)
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApplicationDetail {
    pub application: Application,
    pub target: Option<Company>,
}

impl ApplicationDetail {
    pub fn new(application: Application, companies: &[Company]) -> Self {
        let target = target_company_for(&application, companies).cloned();
        Self {
            application,
            target,
        }
    }

    pub fn target_score(&self) -> Option<u8> {
        self.target.as_ref().map(|c| c.score)
    }
}

/// Every collection at one instant.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub applications: Vec<Application>,
    pub tasks: Vec<Task>,
    pub companies: Vec<Company>,
    pub contacts: Vec<Contact>,
    pub categories: Vec<Category>,
    pub reflection: Reflection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TaskStats {
    pub completed: usize,
    pub total: usize,
    /// Incomplete, regardless of date.
    pub upcoming: usize,
    pub overdue: usize,
    pub due_today: usize,
    pub due_soon: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSummary {
    /// One entry per status in lifecycle order, zero counts included.
    pub status_counts: Vec<(ApplicationStatus, usize)>,
    pub task_stats: TaskStats,
    pub urgent_tasks: Vec<Task>,
    pub other_tasks: Vec<Task>,
    pub top_companies: TopCompanies,
    pub follow_ups: Vec<Contact>,
    pub reflection: ReflectionProgress,
}

fn by_due_then_priority(mut tasks: Vec<Task>) -> Vec<Task> {
    tasks.sort_by(|a, b| {
        a.due_date
            .cmp(&b.due_date)
            .then(a.priority.rank().cmp(&b.priority.rank()))
    });
    tasks
}

impl DashboardSummary {
    pub fn compute(snapshot: &Snapshot, today: NaiveDate) -> Self {
        let status_counts = ApplicationStatus::ALL
            .iter()
            .map(|&status| {
                let n = snapshot
                    .applications
                    .iter()
                    .filter(|a| a.status == status)
                    .count();
                (status, n)
            })
            .collect();

        let tasks = &snapshot.tasks;
        let completed = tasks.iter().filter(|t| t.completed).count();
        let task_stats = TaskStats {
            completed,
            total: tasks.len(),
            upcoming: tasks.len() - completed,
            overdue: derive::overdue_tasks(tasks, today).len(),
            due_today: derive::tasks_due_today(tasks, today).len(),
            due_soon: derive::tasks_due_soon(tasks, today).len(),
        };

        let urgent = derive::urgent_tasks(tasks, today);
        let other = tasks
            .iter()
            .filter(|t| !t.completed && !urgent.iter().any(|u| u.id == t.id))
            .cloned()
            .collect();

        Self {
            status_counts,
            task_stats,
            urgent_tasks: by_due_then_priority(urgent),
            other_tasks: by_due_then_priority(other),
            top_companies: derive::top_companies(&snapshot.companies, TOP_COMPANIES_SHOWN),
            follow_ups: derive::contacts_needing_follow_up(&snapshot.contacts, today),
            reflection: derive::reflection_progress(&snapshot.reflection),
        }
    }

    pub fn total_applications(&self) -> usize {
        self.status_counts.iter().map(|(_, n)| n).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults;
    use crate::models::{Priority, TaskStatus};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn snapshot() -> Snapshot {
        Snapshot {
            applications: defaults::applications(),
            tasks: defaults::tasks(),
            companies: defaults::companies(),
            contacts: defaults::contacts(),
            categories: defaults::categories(),
            reflection: defaults::reflection(),
        }
    }

    #[test]
    fn test_target_company_lookup_is_case_insensitive() {
        let companies = defaults::companies();
        let mut app = defaults::applications()[0].clone();
        app.company = "mckinsey".into();
        assert_eq!(target_company_for(&app, &companies).map(|c| c.id.as_str()), Some("1"));

        app.company = "McKinsey & Co".into();
        assert!(target_company_for(&app, &companies).is_none());
    }

    #[test]
    fn test_application_detail_carries_target_score() {
        let mut app = defaults::applications()[0].clone();
        app.company = "Bain".into();
        let detail = ApplicationDetail::new(app, &defaults::companies());
        assert_eq!(detail.target_score(), Some(11));

        let detail = ApplicationDetail::new(defaults::applications()[0].clone(), &[]);
        assert_eq!(detail.target_score(), None);
    }

    #[test]
    fn test_status_counts_follow_lifecycle_order() {
        let summary = DashboardSummary::compute(&snapshot(), date("2023-05-20"));
        let order: Vec<ApplicationStatus> = summary.status_counts.iter().map(|(s, _)| *s).collect();
        assert_eq!(order, ApplicationStatus::ALL);
        let count = |status| {
            summary
                .status_counts
                .iter()
                .find(|(s, _)| *s == status)
                .map(|(_, n)| *n)
        };
        assert_eq!(count(ApplicationStatus::Interview), Some(1));
        assert_eq!(count(ApplicationStatus::Learning), Some(0));
        assert_eq!(summary.total_applications(), 5);
    }

    #[test]
    fn test_task_stats_and_urgent_split() {
        let mut snap = snapshot();
        snap.tasks = vec![
            task(1, "2023-05-19", Priority::Low, false),
            task(2, "2023-05-20", Priority::Low, false),
            task(3, "2023-05-20", Priority::High, false),
            task(4, "2023-05-28", Priority::High, false),
            task(5, "2023-05-21", Priority::High, true),
        ];
        let summary = DashboardSummary::compute(&snap, date("2023-05-20"));
        assert_eq!(
            summary.task_stats,
            TaskStats {
                completed: 1,
                total: 5,
                upcoming: 4,
                overdue: 1,
                due_today: 2,
                due_soon: 2,
            }
        );
        let urgent: Vec<i64> = summary.urgent_tasks.iter().map(|t| t.id).collect();
        let other: Vec<i64> = summary.other_tasks.iter().map(|t| t.id).collect();
        assert_eq!(urgent, vec![1, 3, 2]);
        assert_eq!(other, vec![4]);
    }

    #[test]
    fn test_dashboard_reports_top_companies_and_follow_ups() {
        let summary = DashboardSummary::compute(&snapshot(), date("2023-08-01"));
        let names: Vec<&str> = summary.top_companies.top.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["McKinsey", "Bain", "BCG"]);
        assert_eq!(summary.follow_ups.len(), 2);
    }

    fn task(id: i64, due: &str, priority: Priority, done: bool) -> Task {
        let mut task = Task {
            id,
            title: format!("task {}", id),
            due_date: date(due),
            priority,
            category: "Other".into(),
            notes: String::new(),
            completed: false,
            status: TaskStatus::Planning,
        };
        if done {
            task.set_status(TaskStatus::Completed);
        }
        task
    }
}

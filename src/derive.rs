//! Pure read-only computations over a collection and "today".

use chrono::{Days, Months, NaiveDate};

use crate::models::{Company, Contact, ContactStatus, Reflection, Task};

/// Tasks due within this many days of today (inclusive) are "due soon".
pub const DUE_SOON_DAYS: u64 = 2;

/// Contacts whose last contact is older than this many calendar months are stale.
pub const FOLLOW_UP_STALE_MONTHS: u32 = 3;

/// How many companies the dashboard lists before reporting "+K more".
pub const TOP_COMPANIES_SHOWN: usize = 3;

fn due_soon_horizon(today: NaiveDate) -> NaiveDate {
    today.checked_add_days(Days::new(DUE_SOON_DAYS)).unwrap_or(NaiveDate::MAX)
}

/// Incomplete and due between today and today + [`DUE_SOON_DAYS`], inclusive.
pub fn tasks_due_soon(tasks: &[Task], today: NaiveDate) -> Vec<Task> {
    let horizon = due_soon_horizon(today);
    tasks
        .iter()
        .filter(|t| !t.completed && t.due_date >= today && t.due_date <= horizon)
        .cloned()
        .collect()
}

pub fn overdue_tasks(tasks: &[Task], today: NaiveDate) -> Vec<Task> {
    tasks
        .iter()
        .filter(|t| !t.completed && t.due_date < today)
        .cloned()
        .collect()
}

pub fn tasks_due_today(tasks: &[Task], today: NaiveDate) -> Vec<Task> {
    tasks
        .iter()
        .filter(|t| !t.completed && t.due_date == today)
        .cloned()
        .collect()
}

/// Incomplete tasks due on or before the due-soon horizon, overdue included.
pub fn urgent_tasks(tasks: &[Task], today: NaiveDate) -> Vec<Task> {
    let horizon = due_soon_horizon(today);
    tasks
        .iter()
        .filter(|t| !t.completed && t.due_date <= horizon)
        .cloned()
        .collect()
}

/// Cut-off date: anything last contacted strictly before it is stale.
pub fn stale_before(today: NaiveDate) -> NaiveDate {
    today
        .checked_sub_months(Months::new(FOLLOW_UP_STALE_MONTHS))
        .unwrap_or(NaiveDate::MIN)
}

pub fn is_stale(contact: &Contact, today: NaiveDate) -> bool {
    contact.last_contact < stale_before(today)
}

pub fn needs_follow_up(contact: &Contact, today: NaiveDate) -> bool {
    contact.status == ContactStatus::FollowUp || is_stale(contact, today)
}

pub fn contacts_needing_follow_up(contacts: &[Contact], today: NaiveDate) -> Vec<Contact> {
    contacts
        .iter()
        .filter(|c| needs_follow_up(c, today))
        .cloned()
        .collect()
}

/// Stale contacts, or contacts at a target company (case-insensitive name).
pub fn outreach_candidates(
    contacts: &[Contact],
    companies: &[Company],
    today: NaiveDate,
) -> Vec<Contact> {
    contacts
        .iter()
        .filter(|c| {
            is_stale(c, today)
                || companies
                    .iter()
                    .any(|company| company.name.to_lowercase() == c.company.to_lowercase())
        })
        .cloned()
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct TopCompanies {
    /// First `n` by descending score; equal scores keep collection order.
    pub top: Vec<Company>,
    pub top_score: Option<u8>,
    /// Every company whose score equals `top_score`, not just those in `top`.
    pub with_top_score: usize,
    /// `with_top_score - n`, floored at zero.
    pub more_with_top_score: usize,
}

pub fn ranked_companies(companies: &[Company]) -> Vec<Company> {
    let mut ranked = companies.to_vec();
    // stable: ties keep their original order
    ranked.sort_by(|a, b| b.score.cmp(&a.score));
    ranked
}

pub fn top_companies(companies: &[Company], n: usize) -> TopCompanies {
    let mut top = ranked_companies(companies);
    let top_score = top.first().map(|c| c.score);
    let with_top_score = top_score
        .map(|max| companies.iter().filter(|c| c.score == max).count())
        .unwrap_or(0);
    top.truncate(n);
    TopCompanies {
        top,
        top_score,
        with_top_score,
        more_with_top_score: with_top_score.saturating_sub(n),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReflectionProgress {
    pub filled_sections: usize,
    pub completed: usize,
    pub total: usize,
    pub percentage: u8,
}

/// Narrative sections plus one unit each for having a strength and a value.
pub fn reflection_progress(reflection: &Reflection) -> ReflectionProgress {
    let filled_sections = reflection
        .story_sections
        .iter()
        .filter(|s| s.is_filled())
        .count();
    let completed = filled_sections
        + usize::from(!reflection.strengths.is_empty())
        + usize::from(!reflection.values.is_empty());
    let total = reflection.story_sections.len() + 2;
    let percentage = (100.0 * completed as f64 / total as f64).round() as u8;
    ReflectionProgress {
        filled_sections,
        completed,
        total,
        percentage,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults;
    use crate::models::{Affinity, Priority, SectionId, StorySection, TaskStatus};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn task(id: i64, due: &str, completed: bool) -> Task {
        let mut task = Task {
            id,
            title: format!("task {}", id),
            due_date: date(due),
            priority: Priority::Medium,
            category: "Other".into(),
            notes: String::new(),
            completed: false,
            status: TaskStatus::Planning,
        };
        if completed {
            task.set_status(TaskStatus::Completed);
        }
        task
    }

    fn contact(last: &str, status: ContactStatus) -> Contact {
        Contact {
            id: 1,
            name: "Sam".into(),
            company: "Acme".into(),
            position: String::new(),
            email: String::new(),
            phone: String::new(),
            linked_in: String::new(),
            status,
            notes: String::new(),
            last_contact: date(last),
        }
    }

    fn company(id: &str, m: u8, p: u8, s: u8, v: u8, affinity: Affinity) -> Company {
        Company {
            id: id.into(),
            name: format!("Company {}", id),
            affinity,
            motivation: m,
            posting: p,
            strengths: s,
            values: v,
            score: 0,
        }
        .rescored()
    }

    #[test]
    fn test_due_soon_window() {
        let today = date("2023-05-20");
        let tasks = vec![
            task(1, "2023-05-21", false),
            task(2, "2023-05-23", false),
            task(3, "2023-05-20", true),
            task(4, "2023-05-22", false),
            task(5, "2023-05-19", false),
        ];
        let ids: Vec<i64> = tasks_due_soon(&tasks, today).iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 4]);
    }

    #[test]
    fn test_overdue_and_due_today() {
        let today = date("2023-05-20");
        let tasks = vec![
            task(1, "2023-05-19", false),
            task(2, "2023-05-20", false),
            task(3, "2023-05-18", true),
        ];
        let overdue: Vec<i64> = overdue_tasks(&tasks, today).iter().map(|t| t.id).collect();
        let today_ids: Vec<i64> = tasks_due_today(&tasks, today).iter().map(|t| t.id).collect();
        assert_eq!(overdue, vec![1]);
        assert_eq!(today_ids, vec![2]);
    }

    #[test]
    fn test_urgent_includes_overdue() {
        let today = date("2023-05-20");
        let tasks = vec![task(1, "2023-05-01", false), task(2, "2023-05-23", false)];
        let ids: Vec<i64> = urgent_tasks(&tasks, today).iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn test_follow_up_uses_calendar_months() {
        let today = date("2023-08-20");
        assert!(needs_follow_up(&contact("2023-05-19", ContactStatus::Active), today));
        assert!(!needs_follow_up(&contact("2023-05-20", ContactStatus::Active), today));
        assert!(!needs_follow_up(&contact("2023-06-20", ContactStatus::Active), today));
    }

    #[test]
    fn test_follow_up_status_overrides_recent_contact() {
        let today = date("2023-08-20");
        assert!(needs_follow_up(&contact("2023-08-19", ContactStatus::FollowUp), today));
    }

    #[test]
    fn test_month_subtraction_clamps_to_month_end() {
        assert_eq!(stale_before(date("2023-05-31")), date("2023-02-28"));
    }

    #[test]
    fn test_outreach_matches_target_company_case_insensitively() {
        let today = date("2023-05-01");
        let mut target = company("1", 1, 1, 1, 1, Affinity::No);
        target.name = "ACME".into();
        let contacts = vec![contact("2023-04-30", ContactStatus::Active)];
        assert_eq!(outreach_candidates(&contacts, &[target], today).len(), 1);
        assert!(outreach_candidates(&contacts, &[], today).is_empty());
    }

    #[test]
    fn test_top_companies_scenario() {
        let companies = vec![
            company("a", 4, 2, 4, 4, Affinity::Yes),
            company("b", 4, 2, 3, 2, Affinity::No),
            company("c", 2, 0, 3, 2, Affinity::Yes),
        ];
        let top = top_companies(&companies, 3);
        let ids: Vec<&str> = top.top.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(top.top_score, Some(18));
        assert_eq!(top.with_top_score, 1);
        assert_eq!(top.more_with_top_score, 0);
    }

    #[test]
    fn test_top_companies_counts_ties_beyond_n() {
        let companies: Vec<Company> = (0..5)
            .map(|i| company(&i.to_string(), 4, 2, 4, 4, Affinity::No))
            .collect();
        let top = top_companies(&companies, 3);
        assert_eq!(top.top.len(), 3);
        assert_eq!(top.with_top_score, 5);
        assert_eq!(top.more_with_top_score, 2);
        let ids: Vec<&str> = top.top.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["0", "1", "2"]);
    }

    #[test]
    fn test_top_companies_empty() {
        let top = top_companies(&[], 3);
        assert!(top.top.is_empty());
        assert_eq!(top.top_score, None);
        assert_eq!(top.with_top_score, 0);
    }

    #[test]
    fn test_reflection_progress_scenario() {
        let mut reflection = defaults::reflection();
        reflection.values.clear();
        for (section, text) in reflection
            .story_sections
            .iter_mut()
            .zip(["I grew up", "  ", "Built a bot", "", "Rust"])
        {
            section.text = text.to_string();
        }
        let progress = reflection_progress(&reflection);
        assert_eq!(progress.filled_sections, 3);
        assert_eq!(progress.completed, 4);
        assert_eq!(progress.total, 11);
        assert_eq!(progress.percentage, 36);
    }

    #[test]
    fn test_reflection_progress_complete() {
        let mut reflection = defaults::reflection();
        reflection.story_sections = SectionId::ALL
            .iter()
            .map(|&id| StorySection {
                text: "done".into(),
                ..StorySection::empty(id)
            })
            .collect();
        assert_eq!(reflection_progress(&reflection).percentage, 100);
    }
}

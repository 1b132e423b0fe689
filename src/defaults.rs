//! Seed collections used whenever a store has nothing usable persisted.

use chrono::NaiveDate;

use crate::models::{
    Affinity, Application, ApplicationStatus, Category, Company, Contact, ContactStatus,
    Priority, Reflection, SectionId, StorySection, TagItem, Task, TaskStatus,
};
use crate::scoring;

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

pub fn applications() -> Vec<Application> {
    let app = |id, company: &str, position: &str, date, status, link: &str, notes: &str| Application {
        id,
        company: company.to_string(),
        position: position.to_string(),
        date,
        status,
        link: Some(link.to_string()),
        notes: Some(notes.to_string()),
    };
    vec![
        app(
            1,
            "Google",
            "Frontend Developer",
            ymd(2023, 5, 15),
            ApplicationStatus::Interview,
            "https://careers.google.com",
            "Applied for the Mountain View office. Interviewing with the Chrome team.",
        ),
        app(
            2,
            "Microsoft",
            "Software Engineer",
            ymd(2023, 5, 10),
            ApplicationStatus::Applied,
            "https://careers.microsoft.com",
            "Remote position. Need to follow up next week.",
        ),
        app(
            3,
            "Amazon",
            "Full Stack Developer",
            ymd(2023, 5, 8),
            ApplicationStatus::Screening,
            "https://amazon.jobs",
            "Will have a 30-minute call with HR on Friday.",
        ),
        app(
            4,
            "Meta",
            "React Developer",
            ymd(2023, 5, 5),
            ApplicationStatus::Rejected,
            "https://metacareers.com",
            "Got feedback that they wanted someone with more backend experience.",
        ),
        app(
            5,
            "Apple",
            "UI Engineer",
            ymd(2023, 5, 1),
            ApplicationStatus::Offer,
            "https://apple.com/careers",
            "Need to respond by May 15th. Salary negotiation in progress.",
        ),
    ]
}

pub fn tasks() -> Vec<Task> {
    let task = |id, title: &str, due_date, priority, category: &str, notes: &str, status| {
        let mut task = Task {
            id,
            title: title.to_string(),
            due_date,
            priority,
            category: category.to_string(),
            notes: notes.to_string(),
            completed: false,
            status,
        };
        task.set_status(status);
        task
    };
    vec![
        task(
            1,
            "Update resume",
            ymd(2023, 5, 20),
            Priority::High,
            "Preparation",
            "Focus on recent projects and technical skills",
            TaskStatus::Planning,
        ),
        task(
            2,
            "Research Company X",
            ymd(2023, 5, 22),
            Priority::Medium,
            "Research",
            "Look into their recent product launches and tech stack",
            TaskStatus::InProgress,
        ),
        task(
            3,
            "Practice coding interview questions",
            ymd(2023, 5, 25),
            Priority::High,
            "Practice",
            "Focus on algorithms and data structures",
            TaskStatus::Planning,
        ),
        task(
            4,
            "Connect with industry contacts",
            ymd(2023, 5, 30),
            Priority::Medium,
            "Networking",
            "Reach out to former colleagues and LinkedIn connections",
            TaskStatus::Completed,
        ),
        task(
            5,
            "Set up job search alerts",
            ymd(2023, 5, 15),
            Priority::Low,
            "Organization",
            "Set up alerts on LinkedIn, Indeed, and other job sites",
            TaskStatus::Completed,
        ),
    ]
}

pub fn companies() -> Vec<Company> {
    let company = |id: &str, name: &str, affinity, motivation, posting, strengths, values| Company {
        id: id.to_string(),
        name: name.to_string(),
        affinity,
        motivation,
        posting,
        strengths,
        values,
        score: scoring::score(motivation, posting, strengths, values, affinity),
    };
    vec![
        company("1", "McKinsey", Affinity::Yes, 4, 2, 4, 4),
        company("2", "Bain", Affinity::No, 4, 2, 3, 2),
        company("3", "BCG", Affinity::Yes, 2, 0, 3, 2),
    ]
}

pub fn contacts() -> Vec<Contact> {
    vec![
        Contact {
            id: 1,
            name: "John Smith".into(),
            company: "Google".into(),
            position: "Engineering Manager".into(),
            email: "john.smith@example.com".into(),
            phone: "555-123-4567".into(),
            linked_in: "https://linkedin.com/in/johnsmith".into(),
            status: ContactStatus::Active,
            notes: "Met at the tech conference. Interested in discussing frontend opportunities."
                .into(),
            last_contact: ymd(2023, 4, 15),
        },
        Contact {
            id: 2,
            name: "Jane Doe".into(),
            company: "Microsoft".into(),
            position: "Product Manager".into(),
            email: "jane.doe@example.com".into(),
            phone: "555-987-6543".into(),
            linked_in: "https://linkedin.com/in/janedoe".into(),
            status: ContactStatus::FollowUp,
            notes: "Referred by a mutual connection. Sent resume, awaiting feedback.".into(),
            last_contact: ymd(2023, 4, 20),
        },
    ]
}

pub fn categories() -> Vec<Category> {
    [
        ("Preparation", "bg-purple-100 text-purple-800"),
        ("Research", "bg-blue-100 text-blue-800"),
        ("Practice", "bg-green-100 text-green-800"),
        ("Networking", "bg-orange-100 text-orange-800"),
        ("Organization", "bg-pink-100 text-pink-800"),
        ("Other", "bg-gray-100 text-gray-800"),
    ]
    .into_iter()
    .map(|(name, color)| Category {
        name: name.to_string(),
        color: color.to_string(),
    })
    .collect()
}

fn tags(values: &[&str]) -> Vec<TagItem> {
    values
        .iter()
        .enumerate()
        .map(|(i, text)| TagItem {
            id: (i + 1).to_string(),
            text: text.to_string(),
        })
        .collect()
}

pub fn strengths() -> Vec<TagItem> {
    tags(&[
        "Creativity",
        "Imagination",
        "Communication",
        "Presentations",
        "Analytical Skills",
    ])
}

pub fn values() -> Vec<TagItem> {
    tags(&[
        "Influence",
        "Decision making",
        "Diversity and Inclusion",
        "Ethics",
        "Social Change",
        "Autonomy",
        "Flexibility",
        "Travel",
        "Compensation",
    ])
}

pub fn industries() -> Vec<TagItem> {
    tags(&["Tech", "Climate", "VC"])
}

pub fn roles() -> Vec<TagItem> {
    tags(&["Product Manager", "Strategy", "Sr Associate"])
}

pub fn intersections() -> Vec<TagItem> {
    tags(&["Climate Tech"])
}

pub fn story_sections() -> Vec<StorySection> {
    SectionId::ALL.iter().map(|&id| StorySection::empty(id)).collect()
}

pub fn reflection() -> Reflection {
    Reflection {
        strengths: strengths(),
        values: values(),
        industries: industries(),
        roles: roles(),
        intersections: intersections(),
        story_sections: story_sections(),
    }
}

//! Sortable columns of each entity, and each screen's query defaults.

use crate::models::{Application, Company, Contact, Task};
use crate::query::{Field, FieldValue, Record, SortDirection, SortKey};

labeled_enum! {
    pub enum ApplicationField ("application column") {
        Date => "date",
        Company => "company",
        Position => "position",
        Status => "status",
    }
}

impl Field for ApplicationField {
    fn default_direction(self) -> SortDirection {
        match self {
            ApplicationField::Date => SortDirection::Desc,
            _ => SortDirection::Asc,
        }
    }
}

impl Record for Application {
    type Field = ApplicationField;

    fn value(&self, field: ApplicationField) -> FieldValue<'_> {
        match field {
            ApplicationField::Date => FieldValue::Date(self.date),
            ApplicationField::Company => FieldValue::Text(&self.company),
            ApplicationField::Position => FieldValue::Text(&self.position),
            ApplicationField::Status => FieldValue::Text(self.status.label()),
        }
    }
}

labeled_enum! {
    pub enum TaskField ("task column") {
        Title => "title",
        Notes => "notes",
        DueDate => "dueDate" | "due",
        Priority => "priority",
        Category => "category",
        Status => "status",
        Completed => "completed",
    }
}

impl Field for TaskField {}

impl Record for Task {
    type Field = TaskField;

    fn value(&self, field: TaskField) -> FieldValue<'_> {
        match field {
            TaskField::Title => FieldValue::Text(&self.title),
            TaskField::Notes => FieldValue::Text(&self.notes),
            TaskField::DueDate => FieldValue::Date(self.due_date),
            TaskField::Priority => FieldValue::Ranked(self.priority.rank(), self.priority.label()),
            TaskField::Category => FieldValue::Text(&self.category),
            TaskField::Status => FieldValue::Text(self.status.label()),
            TaskField::Completed => FieldValue::Bool(self.completed),
        }
    }

    /// Completed tasks always sink below incomplete ones.
    fn pinned_keys() -> Vec<SortKey<TaskField>> {
        vec![SortKey::asc(TaskField::Completed)]
    }

    fn fallback_keys() -> Vec<SortKey<TaskField>> {
        vec![SortKey::asc(TaskField::DueDate), SortKey::asc(TaskField::Priority)]
    }
}

labeled_enum! {
    pub enum CompanyField ("company column") {
        Id => "id",
        Name => "name",
        Affinity => "affinity",
        Motivation => "motivation",
        Posting => "posting",
        Strengths => "strengths",
        Values => "values",
        Score => "score",
    }
}

impl Field for CompanyField {}

impl Record for Company {
    type Field = CompanyField;

    fn value(&self, field: CompanyField) -> FieldValue<'_> {
        match field {
            CompanyField::Id => FieldValue::Number(self.id.parse().unwrap_or(0)),
            CompanyField::Name => FieldValue::Text(&self.name),
            CompanyField::Affinity => FieldValue::Text(self.affinity.label()),
            CompanyField::Motivation => FieldValue::Number(self.motivation.into()),
            CompanyField::Posting => FieldValue::Number(self.posting.into()),
            CompanyField::Strengths => FieldValue::Number(self.strengths.into()),
            CompanyField::Values => FieldValue::Number(self.values.into()),
            CompanyField::Score => FieldValue::Number(self.score.into()),
        }
    }
}

labeled_enum! {
    pub enum ContactField ("contact column") {
        Name => "name",
        Company => "company",
        Position => "position",
        Status => "status",
        LastContact => "lastContact" | "last",
    }
}

impl Field for ContactField {
    fn default_direction(self) -> SortDirection {
        match self {
            ContactField::LastContact => SortDirection::Desc,
            _ => SortDirection::Asc,
        }
    }
}

impl Record for Contact {
    type Field = ContactField;

    fn value(&self, field: ContactField) -> FieldValue<'_> {
        match field {
            ContactField::Name => FieldValue::Text(&self.name),
            ContactField::Company => FieldValue::Text(&self.company),
            ContactField::Position => FieldValue::Text(&self.position),
            ContactField::Status => FieldValue::Text(self.status.label()),
            ContactField::LastContact => FieldValue::Date(self.last_contact),
        }
    }
}

/// Per-screen search columns, default sort and preference table id.
pub trait Screen: Record {
    const TABLE_ID: &'static str;
    const SEARCH_FIELDS: &'static [Self::Field];
    /// Whether the screen keeps an ordered list of sort keys.
    const MULTI_SORT: bool = false;

    fn default_sort() -> Vec<SortKey<Self::Field>>;
}

impl Screen for Application {
    const TABLE_ID: &'static str = "applications";
    const SEARCH_FIELDS: &'static [ApplicationField] =
        &[ApplicationField::Company, ApplicationField::Position];

    fn default_sort() -> Vec<SortKey<ApplicationField>> {
        vec![SortKey::desc(ApplicationField::Date)]
    }
}

impl Screen for Task {
    const TABLE_ID: &'static str = "tasks";
    const SEARCH_FIELDS: &'static [TaskField] = &[TaskField::Title, TaskField::Notes];
    const MULTI_SORT: bool = true;

    fn default_sort() -> Vec<SortKey<TaskField>> {
        Vec::new()
    }
}

impl Screen for Company {
    const TABLE_ID: &'static str = "companies";
    const SEARCH_FIELDS: &'static [CompanyField] = &[CompanyField::Name];

    fn default_sort() -> Vec<SortKey<CompanyField>> {
        vec![SortKey::asc(CompanyField::Id)]
    }
}

impl Screen for Contact {
    const TABLE_ID: &'static str = "contacts";
    const SEARCH_FIELDS: &'static [ContactField] = &[
        ContactField::Name,
        ContactField::Company,
        ContactField::Position,
    ];

    fn default_sort() -> Vec<SortKey<ContactField>> {
        vec![SortKey::desc(ContactField::LastContact)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults;
    use crate::models::{ApplicationStatus, Priority, TaskStatus};
    use crate::query::{query, FilterValue, Query};
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_applications_default_to_newest_first() {
        let q = Query::new().sort_by(&Application::default_sort());
        let companies: Vec<String> = query(&defaults::applications(), &q)
            .into_iter()
            .map(|a| a.company)
            .collect();
        assert_eq!(companies, vec!["Google", "Microsoft", "Amazon", "Meta", "Apple"]);
    }

    #[test]
    fn test_application_status_filter_and_search() {
        let q = Query::new()
            .search("soft", Application::SEARCH_FIELDS)
            .filter(
                ApplicationField::Status,
                FilterValue::Is(ApplicationStatus::Applied.label().into()),
            );
        let hits = query(&defaults::applications(), &q);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].company, "Microsoft");
    }

    #[test]
    fn test_tasks_fall_back_to_due_date_then_priority() {
        let mut tasks = defaults::tasks();
        tasks[2].due_date = tasks[0].due_date;
        tasks[0].priority = Priority::Low;
        let ids: Vec<i64> = query(&tasks, &Query::new()).iter().map(|t| t.id).collect();
        // incomplete: 3 (05-20 High), 1 (05-20 Low), 2 (05-22); completed: 5 (05-15), 4 (05-30)
        assert_eq!(ids, vec![3, 1, 2, 5, 4]);
    }

    #[test]
    fn test_tasks_user_keys_stay_behind_completion() {
        let q = Query::new().sort_by(&[SortKey::desc(TaskField::DueDate)]);
        let ids: Vec<i64> = query(&defaults::tasks(), &q).iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![3, 2, 1, 4, 5]);
    }

    #[test]
    fn test_tasks_completed_filter_uses_bool_key() {
        let q = Query::new().filter(TaskField::Completed, FilterValue::Is("true".into()));
        let ids: Vec<i64> = query(&defaults::tasks(), &q).iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![5, 4]);
    }

    #[test]
    fn test_task_priority_filters_by_label_and_sorts_by_rank() {
        let q = Query::new().filter(TaskField::Priority, FilterValue::Is("High".into()));
        let hits = query(&defaults::tasks(), &q);
        assert_eq!(hits.len(), 2);
        assert!(hits.iter().all(|t| t.priority == Priority::High));

        let searched = query(&defaults::tasks(), &Query::new().search("0", &[TaskField::Priority]));
        assert!(searched.is_empty());

        let mut tasks = defaults::tasks();
        for task in &mut tasks {
            task.set_status(TaskStatus::Planning);
        }
        tasks[0].priority = Priority::Low;
        tasks[1].priority = Priority::High;
        tasks[2].priority = Priority::Medium;
        let q = Query::new().sort_by(&[SortKey::asc(TaskField::Priority)]);
        let order: Vec<Priority> = query(&tasks, &q).iter().map(|t| t.priority).collect();
        let mut ranked = order.clone();
        ranked.sort_by_key(|p| p.rank());
        assert_eq!(order, ranked);
    }

    #[test]
    fn test_companies_sort_by_numeric_id() {
        let mut companies = defaults::companies();
        companies[0].id = "10".into();
        let q = Query::new().sort_by(&Company::default_sort());
        let ids: Vec<String> = query(&companies, &q).into_iter().map(|c| c.id).collect();
        assert_eq!(ids, vec!["2", "3", "10"]);
    }

    #[test]
    fn test_contacts_search_spans_name_company_position() {
        let q = Query::new().search("product", Contact::SEARCH_FIELDS);
        let hits = query(&defaults::contacts(), &q);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Jane Doe");
    }

    fn arb_tasks() -> impl Strategy<Value = Vec<Task>> {
        prop::collection::vec((0u32..40, 0usize..3, any::<bool>(), "[a-c]{1,2}"), 0..25).prop_map(
            |rows| {
                rows.into_iter()
                    .enumerate()
                    .map(|(i, (offset, p, done, cat))| {
                        let mut task = defaults::tasks()[0].clone();
                        task.id = i as i64 + 1;
                        task.due_date = date("2023-05-01") + chrono::Days::new(offset.into());
                        task.priority = Priority::ALL[p];
                        task.category = cat;
                        task.set_status(if done {
                            TaskStatus::Completed
                        } else {
                            TaskStatus::Planning
                        });
                        task
                    })
                    .collect()
            },
        )
    }

    fn arb_task_field() -> impl Strategy<Value = TaskField> {
        (0..TaskField::ALL.len()).prop_map(|i| TaskField::ALL[i])
    }

    proptest! {
        #[test]
        fn prop_no_completed_task_precedes_incomplete(
            tasks in arb_tasks(),
            fields in prop::collection::vec((arb_task_field(), any::<bool>()), 0..3),
        ) {
            let keys: Vec<SortKey<TaskField>> = fields
                .into_iter()
                .map(|(f, asc)| SortKey::new(f, if asc { SortDirection::Asc } else { SortDirection::Desc }))
                .collect();
            let sorted = query(&tasks, &Query::new().sort_by(&keys));
            let first_done = sorted.iter().position(|t| t.completed).unwrap_or(sorted.len());
            prop_assert!(sorted[first_done..].iter().all(|t| t.completed));
        }

        #[test]
        fn prop_category_filter_holds(tasks in arb_tasks(), cat in "[a-c]{1,2}") {
            let q = Query::new().filter(TaskField::Category, FilterValue::Is(cat.clone()));
            for task in query(&tasks, &q) {
                prop_assert_eq!(&task.category, &cat);
            }
        }
    }
}

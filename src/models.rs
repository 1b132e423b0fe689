use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

labeled_enum! {
    /// Lifecycle of an application, in the order the dashboard reports it.
    pub enum ApplicationStatus ("application status") {
        Learning => "Learning",
        Draft => "Draft",
        Applied => "Applied",
        Screening => "Screening" | "Phone Screen",
        Interview => "Interview",
        Rejected => "Rejected",
        Offer => "Offer",
        Declined => "Declined",
        Accepted => "Accepted",
    }
}

labeled_enum! {
    pub enum Priority ("priority") {
        High => "High",
        Medium => "Medium",
        Low => "Low",
    }
}

impl Priority {
    /// Sort rank: High first.
    pub fn rank(self) -> i64 {
        match self {
            Priority::High => 0,
            Priority::Medium => 1,
            Priority::Low => 2,
        }
    }
}

labeled_enum! {
    pub enum TaskStatus ("task status") {
        Planning => "Planning",
        InProgress => "In Progress" | "in-progress" | "progress",
        Completed => "Completed" | "done",
    }
}

labeled_enum! {
    pub enum Affinity ("affinity") {
        Yes => "Y" | "yes",
        No => "N" | "no",
    }
}

labeled_enum! {
    pub enum ContactStatus ("contact status") {
        New => "New",
        Active => "Active",
        FollowUp => "Follow-up" | "followup",
        Inactive => "Inactive",
    }
}

labeled_enum! {
    /// The five tag collections of the reflection journal.
    pub enum TagList ("tag list") {
        Strengths => "strengths" | "strength",
        Values => "values" | "value",
        Industries => "industries" | "industry",
        Roles => "roles" | "role",
        Intersections => "intersections" | "intersection",
    }
}

labeled_enum! {
    /// Narrative sections of the reflection journal, in display order.
    pub enum SectionId ("story section") {
        Story => "story",
        Passion => "passion",
        ProofOfPassion => "proofOfPassion",
        Skills => "skills",
        ProofOfSkills => "proofOfSkills",
        Goals => "goals",
        Potential => "potential",
        WantInJob => "wantInJob",
        OfferToJob => "offerToJob",
    }
}

impl SectionId {
    pub fn title(self) -> &'static str {
        match self {
            SectionId::Story => "Story",
            SectionId::Passion => "Passion",
            SectionId::ProofOfPassion => "Proof of Passion",
            SectionId::Skills => "Skills",
            SectionId::ProofOfSkills => "Proof of Skills",
            SectionId::Goals => "Goals",
            SectionId::Potential => "Potential",
            SectionId::WantInJob => "What you want in a job",
            SectionId::OfferToJob => "What you can offer to a job",
        }
    }
}

pub const OTHER_CATEGORY: &str = "Other";
pub const DEFAULT_CATEGORY_COLOR: &str = "bg-gray-100 text-gray-800";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: i64,
    pub company: String,
    pub position: String,
    pub date: NaiveDate,
    pub status: ApplicationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub due_date: NaiveDate,
    pub priority: Priority,
    #[serde(default = "other_category")]
    pub category: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default = "planning")]
    pub status: TaskStatus,
}

fn other_category() -> String {
    OTHER_CATEGORY.to_string()
}

fn planning() -> TaskStatus {
    TaskStatus::Planning
}

impl Task {
    /// Restores `completed == (status == Completed)`, trusting `completed`.
    pub fn normalized(mut self) -> Self {
        match (self.completed, self.status) {
            (true, TaskStatus::Completed) | (false, TaskStatus::Planning | TaskStatus::InProgress) => {}
            (true, _) => self.status = TaskStatus::Completed,
            (false, TaskStatus::Completed) => self.status = TaskStatus::InProgress,
        }
        self
    }

    pub fn set_status(&mut self, status: TaskStatus) {
        self.status = status;
        self.completed = status == TaskStatus::Completed;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub id: String,
    pub name: String,
    pub affinity: Affinity,
    pub motivation: u8,
    pub posting: u8,
    pub strengths: u8,
    pub values: u8,
    pub score: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub linked_in: String,
    pub status: ContactStatus,
    #[serde(default)]
    pub notes: String,
    pub last_contact: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagItem {
    pub id: String,
    #[serde(alias = "value")]
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorySection {
    pub id: SectionId,
    #[serde(default)]
    pub label: String,
    #[serde(default, alias = "value")]
    pub text: String,
    #[serde(default)]
    pub is_editing: bool,
}

impl StorySection {
    pub fn empty(id: SectionId) -> Self {
        Self {
            id,
            label: id.title().to_string(),
            text: String::new(),
            is_editing: false,
        }
    }

    pub fn is_filled(&self) -> bool {
        !self.text.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reflection {
    pub strengths: Vec<TagItem>,
    pub values: Vec<TagItem>,
    pub industries: Vec<TagItem>,
    pub roles: Vec<TagItem>,
    pub intersections: Vec<TagItem>,
    pub story_sections: Vec<StorySection>,
}

impl Reflection {
    pub fn tags(&self, list: TagList) -> &[TagItem] {
        match list {
            TagList::Strengths => &self.strengths,
            TagList::Values => &self.values,
            TagList::Industries => &self.industries,
            TagList::Roles => &self.roles,
            TagList::Intersections => &self.intersections,
        }
    }

    pub fn tags_mut(&mut self, list: TagList) -> &mut Vec<TagItem> {
        match list {
            TagList::Strengths => &mut self.strengths,
            TagList::Values => &mut self.values,
            TagList::Industries => &mut self.industries,
            TagList::Roles => &mut self.roles,
            TagList::Intersections => &mut self.intersections,
        }
    }

    pub fn section(&self, id: SectionId) -> Option<&StorySection> {
        self.story_sections.iter().find(|s| s.id == id)
    }

    /// Rebuilds `story_sections` as exactly one entry per [`SectionId`], in
    /// order, keeping any stored text. Duplicates after the first are dropped.
    pub fn normalized(mut self) -> Self {
        let stored = std::mem::take(&mut self.story_sections);
        self.story_sections = SectionId::ALL
            .iter()
            .map(|&id| {
                stored
                    .iter()
                    .find(|s| s.id == id)
                    .cloned()
                    .map(|mut s| {
                        if s.label.is_empty() {
                            s.label = id.title().to_string();
                        }
                        s
                    })
                    .unwrap_or_else(|| StorySection::empty(id))
            })
            .collect();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_parse_case_insensitively_with_aliases() {
        assert_eq!("interview".parse::<ApplicationStatus>(), Ok(ApplicationStatus::Interview));
        assert_eq!(
            "Phone Screen".parse::<ApplicationStatus>(),
            Ok(ApplicationStatus::Screening)
        );
        assert_eq!("in progress".parse::<TaskStatus>(), Ok(TaskStatus::InProgress));
        assert_eq!("y".parse::<Affinity>(), Ok(Affinity::Yes));
        assert_eq!("Follow-up".parse::<ContactStatus>(), Ok(ContactStatus::FollowUp));
        assert!("Ghosted".parse::<ApplicationStatus>().is_err());
    }

    #[test]
    fn test_unknown_label_lists_expected_values() {
        let err = "Urgent".parse::<Priority>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "unknown priority 'Urgent' (expected one of: High, Medium, Low)"
        );
    }

    #[test]
    fn test_task_json_uses_camel_case_fields() {
        let json = r#"{
            "id": 3,
            "title": "Practice coding interview questions",
            "dueDate": "2023-05-25",
            "priority": "High",
            "category": "Practice",
            "notes": "",
            "completed": false,
            "status": "In Progress"
        }"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.due_date, NaiveDate::from_ymd_opt(2023, 5, 25).unwrap());
        assert_eq!(task.status, TaskStatus::InProgress);

        let back = serde_json::to_value(&task).unwrap();
        assert_eq!(back["dueDate"], "2023-05-25");
        assert_eq!(back["status"], "In Progress");
    }

    #[test]
    fn test_contact_reads_linked_in_and_last_contact() {
        let json = r#"{
            "id": 2,
            "name": "Jane Doe",
            "company": "Microsoft",
            "position": "Product Manager",
            "email": "jane.doe@example.com",
            "phone": "555-987-6543",
            "linkedIn": "https://linkedin.com/in/janedoe",
            "status": "Follow-up",
            "notes": "",
            "lastContact": "2023-04-20"
        }"#;
        let contact: Contact = serde_json::from_str(json).unwrap();
        assert_eq!(contact.linked_in, "https://linkedin.com/in/janedoe");
        assert_eq!(contact.status, ContactStatus::FollowUp);
    }

    #[test]
    fn test_task_normalization_trusts_completed_flag() {
        let base = Task {
            id: 1,
            title: "t".into(),
            due_date: NaiveDate::from_ymd_opt(2023, 5, 20).unwrap(),
            priority: Priority::Low,
            category: OTHER_CATEGORY.into(),
            notes: String::new(),
            completed: true,
            status: TaskStatus::Planning,
        };
        assert_eq!(base.clone().normalized().status, TaskStatus::Completed);

        let reopened = Task {
            completed: false,
            status: TaskStatus::Completed,
            ..base
        };
        assert_eq!(reopened.normalized().status, TaskStatus::InProgress);
    }

    #[test]
    fn test_reflection_sections_are_rebuilt_in_fixed_order() {
        let reflection = Reflection {
            strengths: vec![],
            values: vec![],
            industries: vec![],
            roles: vec![],
            intersections: vec![],
            story_sections: vec![
                StorySection {
                    id: SectionId::Goals,
                    label: String::new(),
                    text: "Lead a team".into(),
                    is_editing: false,
                },
                StorySection::empty(SectionId::Story),
            ],
        }
        .normalized();

        let ids: Vec<SectionId> = reflection.story_sections.iter().map(|s| s.id).collect();
        assert_eq!(ids, SectionId::ALL);
        let goals = reflection.section(SectionId::Goals).unwrap();
        assert_eq!(goals.text, "Lead a team");
        assert_eq!(goals.label, "Goals");
    }

    #[test]
    fn test_tag_item_accepts_legacy_value_field() {
        let tag: TagItem = serde_json::from_str(r#"{"id":"1","value":"Creativity"}"#).unwrap();
        assert_eq!(tag.text, "Creativity");
    }
}

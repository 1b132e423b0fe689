//! Editing operations. Each takes the current collection and returns the
//! next one, or the reason the edit was refused. Nothing here touches a store.

use chrono::NaiveDate;

use crate::clock::Clock;
use crate::error::ValidationError;
use crate::models::{
    Application, ApplicationStatus, Category, Company, Contact, ContactStatus, OTHER_CATEGORY,
    Priority, Reflection, SectionId, TagItem, TagList, Task, TaskStatus,
};
use crate::scoring::CompanyInput;

type Edit<T> = Result<T, ValidationError>;

/// One past the largest id in use, starting at 1.
pub fn next_id(kind: &'static str, ids: impl IntoIterator<Item = i64>) -> Edit<i64> {
    match ids.into_iter().max() {
        None => Ok(1),
        Some(max) => max.checked_add(1).ok_or(ValidationError::IdsExhausted(kind)),
    }
}

fn required(value: &str, what: &'static str) -> Edit<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty(what));
    }
    Ok(trimmed.to_string())
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn position_of<T>(items: &[T], kind: &'static str, id: i64, key: impl Fn(&T) -> i64) -> Edit<usize> {
    items
        .iter()
        .position(|item| key(item) == id)
        .ok_or_else(|| ValidationError::not_found(kind, id))
}

// Applications

#[derive(Debug, Clone, PartialEq)]
pub struct ApplicationInput {
    pub company: String,
    pub position: String,
    pub date: NaiveDate,
    pub status: ApplicationStatus,
    pub link: Option<String>,
    pub notes: Option<String>,
}

impl ApplicationInput {
    fn into_application(self, id: i64) -> Edit<Application> {
        Ok(Application {
            id,
            company: required(&self.company, "company")?,
            position: required(&self.position, "position")?,
            date: self.date,
            status: self.status,
            link: optional(self.link),
            notes: optional(self.notes),
        })
    }
}

pub fn add_application(apps: &[Application], input: ApplicationInput) -> Edit<Vec<Application>> {
    let app = input.into_application(next_id("application", apps.iter().map(|a| a.id))?)?;
    let mut next = apps.to_vec();
    next.push(app);
    Ok(next)
}

pub fn update_application(
    apps: &[Application],
    id: i64,
    input: ApplicationInput,
) -> Edit<Vec<Application>> {
    let idx = position_of(apps, "application", id, |a| a.id)?;
    let mut next = apps.to_vec();
    next[idx] = input.into_application(id)?;
    Ok(next)
}

pub fn set_application_status(
    apps: &[Application],
    id: i64,
    status: ApplicationStatus,
) -> Edit<Vec<Application>> {
    let idx = position_of(apps, "application", id, |a| a.id)?;
    let mut next = apps.to_vec();
    next[idx].status = status;
    Ok(next)
}

pub fn delete_application(apps: &[Application], id: i64) -> Edit<Vec<Application>> {
    position_of(apps, "application", id, |a| a.id)?;
    Ok(apps.iter().filter(|a| a.id != id).cloned().collect())
}

// Tasks

#[derive(Debug, Clone, PartialEq)]
pub struct TaskInput {
    pub title: String,
    pub due_date: NaiveDate,
    pub priority: Priority,
    pub category: String,
    pub notes: String,
    pub status: TaskStatus,
}

impl TaskInput {
    fn into_task(self, id: i64) -> Edit<Task> {
        let category = match self.category.trim() {
            "" => OTHER_CATEGORY.to_string(),
            name => name.to_string(),
        };
        let mut task = Task {
            id,
            title: required(&self.title, "task title")?,
            due_date: self.due_date,
            priority: self.priority,
            category,
            notes: self.notes.trim().to_string(),
            completed: false,
            status: TaskStatus::Planning,
        };
        task.set_status(self.status);
        Ok(task)
    }
}

impl Task {
    pub fn to_input(&self) -> TaskInput {
        TaskInput {
            title: self.title.clone(),
            due_date: self.due_date,
            priority: self.priority,
            category: self.category.clone(),
            notes: self.notes.clone(),
            status: self.status,
        }
    }
}

pub fn add_task(tasks: &[Task], input: TaskInput) -> Edit<Vec<Task>> {
    let task = input.into_task(next_id("task", tasks.iter().map(|t| t.id))?)?;
    let mut next = tasks.to_vec();
    next.push(task);
    Ok(next)
}

pub fn update_task(tasks: &[Task], id: i64, input: TaskInput) -> Edit<Vec<Task>> {
    let idx = position_of(tasks, "task", id, |t| t.id)?;
    let mut next = tasks.to_vec();
    next[idx] = input.into_task(id)?;
    Ok(next)
}

/// Completes an open task, or reopens a completed one as In Progress.
pub fn toggle_task(tasks: &[Task], id: i64) -> Edit<Vec<Task>> {
    let idx = position_of(tasks, "task", id, |t| t.id)?;
    let mut next = tasks.to_vec();
    let task = &mut next[idx];
    if task.completed {
        task.set_status(TaskStatus::InProgress);
    } else {
        task.set_status(TaskStatus::Completed);
    }
    Ok(next)
}

pub fn delete_task(tasks: &[Task], id: i64) -> Edit<Vec<Task>> {
    position_of(tasks, "task", id, |t| t.id)?;
    Ok(tasks.iter().filter(|t| t.id != id).cloned().collect())
}

// Companies

/// Millisecond timestamp of `clock`, bumped past any id already taken.
fn company_id(companies: &[Company], clock: &dyn Clock) -> String {
    let mut millis = clock.now().and_utc().timestamp_millis();
    while companies.iter().any(|c| c.id == millis.to_string()) {
        millis += 1;
    }
    millis.to_string()
}

pub fn add_company(
    companies: &[Company],
    input: CompanyInput,
    clock: &dyn Clock,
) -> Edit<Vec<Company>> {
    input.validate()?;
    let company = input.into_company(company_id(companies, clock));
    let mut next = companies.to_vec();
    next.push(company);
    Ok(next)
}

pub fn update_company(companies: &[Company], id: &str, input: CompanyInput) -> Edit<Vec<Company>> {
    input.validate()?;
    let idx = companies
        .iter()
        .position(|c| c.id == id)
        .ok_or_else(|| ValidationError::not_found("company", id))?;
    let mut next = companies.to_vec();
    next[idx] = input.into_company(id.to_string());
    Ok(next)
}

pub fn delete_company(companies: &[Company], id: &str) -> Edit<Vec<Company>> {
    if !companies.iter().any(|c| c.id == id) {
        return Err(ValidationError::not_found("company", id));
    }
    Ok(companies.iter().filter(|c| c.id != id).cloned().collect())
}

// Contacts

#[derive(Debug, Clone, PartialEq)]
pub struct ContactInput {
    pub name: String,
    pub company: String,
    pub position: String,
    pub email: String,
    pub phone: String,
    pub linked_in: String,
    pub status: ContactStatus,
    pub notes: String,
    pub last_contact: NaiveDate,
}

impl ContactInput {
    fn into_contact(self, id: i64) -> Edit<Contact> {
        Ok(Contact {
            id,
            name: required(&self.name, "contact name")?,
            company: self.company.trim().to_string(),
            position: self.position.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            linked_in: self.linked_in.trim().to_string(),
            status: self.status,
            notes: self.notes.trim().to_string(),
            last_contact: self.last_contact,
        })
    }
}

impl Contact {
    pub fn to_input(&self) -> ContactInput {
        ContactInput {
            name: self.name.clone(),
            company: self.company.clone(),
            position: self.position.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            linked_in: self.linked_in.clone(),
            status: self.status,
            notes: self.notes.clone(),
            last_contact: self.last_contact,
        }
    }
}

pub fn add_contact(contacts: &[Contact], input: ContactInput) -> Edit<Vec<Contact>> {
    let contact = input.into_contact(next_id("contact", contacts.iter().map(|c| c.id))?)?;
    let mut next = contacts.to_vec();
    next.push(contact);
    Ok(next)
}

pub fn update_contact(contacts: &[Contact], id: i64, input: ContactInput) -> Edit<Vec<Contact>> {
    let idx = position_of(contacts, "contact", id, |c| c.id)?;
    let mut next = contacts.to_vec();
    next[idx] = input.into_contact(id)?;
    Ok(next)
}

/// Records that the contact was reached today.
pub fn touch_contact(contacts: &[Contact], id: i64, today: NaiveDate) -> Edit<Vec<Contact>> {
    let idx = position_of(contacts, "contact", id, |c| c.id)?;
    let mut next = contacts.to_vec();
    next[idx].last_contact = today;
    Ok(next)
}

pub fn delete_contact(contacts: &[Contact], id: i64) -> Edit<Vec<Contact>> {
    position_of(contacts, "contact", id, |c| c.id)?;
    Ok(contacts.iter().filter(|c| c.id != id).cloned().collect())
}

// Categories

// Category names are compared ignoring ASCII case, the same rule that
// protects Other.
fn same_name(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}

fn is_other(name: &str) -> bool {
    same_name(name, OTHER_CATEGORY)
}

/// Trimmed, non-empty name; any spelling of Other becomes Other itself.
fn category_name(name: &str) -> Edit<String> {
    let name = required(name, "category name")?;
    Ok(if is_other(&name) {
        OTHER_CATEGORY.to_string()
    } else {
        name
    })
}

/// Appends a category. A name already present is left alone.
pub fn add_category(categories: &[Category], name: &str, color: &str) -> Edit<Vec<Category>> {
    let name = category_name(name)?;
    let mut next = categories.to_vec();
    if !categories.iter().any(|c| same_name(&c.name, &name)) {
        next.push(Category {
            name,
            color: color.to_string(),
        });
    }
    Ok(next)
}

/// Renames a category in place and moves its tasks along with it.
pub fn rename_category(
    categories: &[Category],
    tasks: &[Task],
    old: &str,
    new: &str,
    color: Option<&str>,
) -> Edit<(Vec<Category>, Vec<Task>)> {
    let new = category_name(new)?;
    if is_other(old) {
        return Err(ValidationError::ProtectedCategory(old.to_string()));
    }
    let idx = categories
        .iter()
        .position(|c| c.name == old)
        .ok_or_else(|| ValidationError::not_found("category", old))?;
    let taken = categories
        .iter()
        .enumerate()
        .any(|(i, c)| i != idx && same_name(&c.name, &new));
    if taken {
        return Err(ValidationError::DuplicateCategory(new));
    }

    let mut next = categories.to_vec();
    next[idx].name = new.clone();
    if let Some(color) = color {
        next[idx].color = color.to_string();
    }
    let tasks = tasks
        .iter()
        .cloned()
        .map(|mut t| {
            if t.category == old {
                t.category = new.clone();
            }
            t
        })
        .collect();
    Ok((next, tasks))
}

/// Removes a category; its tasks fall back to Other.
pub fn delete_category(
    categories: &[Category],
    tasks: &[Task],
    name: &str,
) -> Edit<(Vec<Category>, Vec<Task>)> {
    if is_other(name) {
        return Err(ValidationError::ProtectedCategory(name.to_string()));
    }
    if !categories.iter().any(|c| c.name == name) {
        return Err(ValidationError::not_found("category", name));
    }
    let next = categories.iter().filter(|c| c.name != name).cloned().collect();
    let tasks = tasks
        .iter()
        .cloned()
        .map(|mut t| {
            if t.category == name {
                t.category = OTHER_CATEGORY.to_string();
            }
            t
        })
        .collect();
    Ok((next, tasks))
}

// Reflection

fn next_tag_id(tags: &[TagItem]) -> Edit<String> {
    let id = next_id("tag", tags.iter().filter_map(|t| t.id.parse::<i64>().ok()))?;
    Ok(id.to_string())
}

pub fn add_tag(reflection: &Reflection, list: TagList, text: &str) -> Edit<Reflection> {
    let text = required(text, "tag")?;
    let mut next = reflection.clone();
    let tags = next.tags_mut(list);
    let id = next_tag_id(tags)?;
    tags.push(TagItem { id, text });
    Ok(next)
}

pub fn update_tag(reflection: &Reflection, list: TagList, id: &str, text: &str) -> Edit<Reflection> {
    let text = required(text, "tag")?;
    let mut next = reflection.clone();
    let tag = next
        .tags_mut(list)
        .iter_mut()
        .find(|t| t.id == id)
        .ok_or_else(|| ValidationError::not_found("tag", id))?;
    tag.text = text;
    Ok(next)
}

pub fn delete_tag(reflection: &Reflection, list: TagList, id: &str) -> Edit<Reflection> {
    let mut next = reflection.clone();
    let tags = next.tags_mut(list);
    let before = tags.len();
    tags.retain(|t| t.id != id);
    if tags.len() == before {
        return Err(ValidationError::not_found("tag", id));
    }
    Ok(next)
}

/// Replaces a section's text and leaves editing mode.
pub fn set_section(reflection: &Reflection, id: SectionId, text: &str) -> Edit<Reflection> {
    let mut next = reflection.clone().normalized();
    if let Some(section) = next.story_sections.iter_mut().find(|s| s.id == id) {
        section.text = text.to_string();
        section.is_editing = false;
    }
    Ok(next)
}

pub fn toggle_editing(reflection: &Reflection, id: SectionId) -> Edit<Reflection> {
    let mut next = reflection.clone().normalized();
    if let Some(section) = next.story_sections.iter_mut().find(|s| s.id == id) {
        section.is_editing = !section.is_editing;
    }
    Ok(next)
}

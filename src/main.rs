use anyhow::{Result, anyhow};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::rc::Rc;
use tracing::info;

use pursuit::clock::{Clock, FixedClock, SystemClock};
use pursuit::columns::{ApplicationField, CompanyField, ContactField, Screen, TaskField};
use pursuit::config::Config;
use pursuit::db::Database;
use pursuit::derive::{self, TOP_COMPANIES_SHOWN};
use pursuit::edit::{self, ApplicationInput, ContactInput, TaskInput};
use pursuit::error::ValidationError;
use pursuit::logging::init_logging;
use pursuit::models::{
    Affinity, Application, ApplicationStatus, Company, Contact, ContactStatus,
    DEFAULT_CATEGORY_COLOR, Priority, SectionId, TagList, Task, TaskStatus,
};
use pursuit::query::{FilterValue, Query, SortKey, query};
use pursuit::scoring::{CompanyInput, MAX_SCORE, score_percentage};
use pursuit::session::{LocalSession, partition_key};
use pursuit::store::{Persisted, Store};
use pursuit::tracker::Tracker;
use pursuit::view::{ApplicationDetail, DashboardSummary};

#[derive(Parser)]
#[command(name = "pursuit")]
#[command(about = "Job search tracker - applications, tasks, target companies, contacts and reflection")]
struct Cli {
    /// Treat this date as today (YYYY-MM-DD)
    #[arg(long, global = true, value_parser = parse_date)]
    today: Option<NaiveDate>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the database and seed defaults
    Init,

    /// Show the dashboard summary
    Dashboard,

    /// Manage job applications
    App {
        #[command(subcommand)]
        command: AppCommands,
    },

    /// Manage tasks
    Task {
        #[command(subcommand)]
        command: TaskCommands,
    },

    /// Manage target companies
    Company {
        #[command(subcommand)]
        command: CompanyCommands,
    },

    /// Manage networking contacts
    Contact {
        #[command(subcommand)]
        command: ContactCommands,
    },

    /// Manage task categories
    Category {
        #[command(subcommand)]
        command: CategoryCommands,
    },

    /// Self-reflection journal
    Reflect {
        #[command(subcommand)]
        command: ReflectCommands,
    },
}

#[derive(Args)]
struct ListArgs {
    /// Case-insensitive substring search
    #[arg(short, long, default_value = "")]
    search: String,

    /// Sort by this column; selecting the active column flips its direction
    #[arg(long)]
    sort: Option<String>,

    /// Forget the remembered sort order
    #[arg(long)]
    reset_sort: bool,
}

#[derive(Subcommand)]
enum AppCommands {
    /// List applications
    List {
        #[command(flatten)]
        list: ListArgs,

        /// Filter by status, or "all"
        #[arg(long, default_value = "all")]
        status: String,
    },

    /// Add an application
    Add {
        company: String,
        position: String,

        /// Application date (default: today)
        #[arg(short, long, value_parser = parse_date)]
        date: Option<NaiveDate>,

        #[arg(long, default_value = "Applied")]
        status: ApplicationStatus,

        #[arg(short, long)]
        link: Option<String>,

        #[arg(short, long)]
        notes: Option<String>,
    },

    /// Show application details
    Show { id: i64 },

    /// Edit an application
    Edit {
        id: i64,

        #[arg(long)]
        company: Option<String>,

        #[arg(long)]
        position: Option<String>,

        #[arg(short, long, value_parser = parse_date)]
        date: Option<NaiveDate>,

        #[arg(long)]
        status: Option<ApplicationStatus>,

        /// Use "" to clear
        #[arg(short, long)]
        link: Option<String>,

        /// Use "" to clear
        #[arg(short, long)]
        notes: Option<String>,
    },

    /// Change an application's status
    Status { id: i64, status: ApplicationStatus },

    /// Delete an application
    Rm { id: i64 },
}

#[derive(Subcommand)]
enum TaskCommands {
    /// List tasks
    List {
        #[command(flatten)]
        list: ListArgs,

        #[arg(long, default_value = "all")]
        status: String,

        #[arg(long, default_value = "all")]
        priority: String,

        #[arg(long, default_value = "all")]
        category: String,

        /// completed, incomplete or all
        #[arg(long, default_value = "all")]
        completed: String,
    },

    /// Add a task
    Add {
        title: String,

        #[arg(long, value_parser = parse_date)]
        due: NaiveDate,

        #[arg(short, long, default_value = "Medium")]
        priority: Priority,

        #[arg(short, long, default_value = "Other")]
        category: String,

        #[arg(short, long, default_value = "")]
        notes: String,

        #[arg(long, default_value = "Planning")]
        status: TaskStatus,
    },

    /// Toggle a task between completed and in progress
    Done { id: i64 },

    /// Edit a task
    Edit {
        id: i64,

        #[arg(long)]
        title: Option<String>,

        #[arg(long, value_parser = parse_date)]
        due: Option<NaiveDate>,

        #[arg(short, long)]
        priority: Option<Priority>,

        #[arg(short, long)]
        category: Option<String>,

        #[arg(short, long)]
        notes: Option<String>,

        #[arg(long)]
        status: Option<TaskStatus>,
    },

    /// Delete a task
    Rm { id: i64 },
}

#[derive(Args)]
struct CompanyArgs {
    /// Motivation to work there (0-4)
    #[arg(short, long)]
    motivation: u8,

    /// Open posting fit (0-2)
    #[arg(short, long)]
    posting: u8,

    /// Match with your strengths (0-4)
    #[arg(short, long)]
    strengths: u8,

    /// Match with your values (0-4)
    #[arg(short, long)]
    values: u8,

    /// Alumni or personal connection (Y/N)
    #[arg(short, long, default_value = "N")]
    affinity: Affinity,
}

#[derive(Subcommand)]
enum CompanyCommands {
    /// List target companies
    List {
        #[command(flatten)]
        list: ListArgs,

        #[arg(long, default_value = "all")]
        affinity: String,
    },

    /// Add a target company
    Add {
        name: String,

        #[command(flatten)]
        scores: CompanyArgs,
    },

    /// Replace a company's attributes
    Edit {
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[command(flatten)]
        scores: CompanyArgs,
    },

    /// Show the highest-scoring companies
    Top {
        #[arg(short, long, default_value_t = TOP_COMPANIES_SHOWN)]
        limit: usize,
    },

    /// Delete a target company
    Rm { id: String },
}

#[derive(Subcommand)]
enum ContactCommands {
    /// List contacts
    List {
        #[command(flatten)]
        list: ListArgs,

        #[arg(long, default_value = "all")]
        status: String,
    },

    /// Add a contact
    Add {
        name: String,

        #[arg(short, long, default_value = "")]
        company: String,

        #[arg(short, long, default_value = "")]
        position: String,

        #[arg(short, long, default_value = "")]
        email: String,

        #[arg(long, default_value = "")]
        phone: String,

        #[arg(long, default_value = "")]
        linkedin: String,

        #[arg(long, default_value = "New")]
        status: ContactStatus,

        #[arg(short, long, default_value = "")]
        notes: String,

        /// Last contact date (default: today)
        #[arg(long, value_parser = parse_date)]
        last: Option<NaiveDate>,
    },

    /// Contacts due a follow-up
    Followup,

    /// Suggested outreach: stale contacts and contacts at target companies
    Outreach,

    /// Record that you reached out today
    Touch { id: i64 },

    /// Change a contact's status
    Status { id: i64, status: ContactStatus },

    /// Edit a contact
    Edit {
        id: i64,

        #[arg(long)]
        name: Option<String>,

        #[arg(short, long)]
        company: Option<String>,

        #[arg(short, long)]
        position: Option<String>,

        #[arg(short, long)]
        email: Option<String>,

        #[arg(long)]
        phone: Option<String>,

        #[arg(long)]
        linkedin: Option<String>,

        #[arg(long)]
        status: Option<ContactStatus>,

        #[arg(short, long)]
        notes: Option<String>,

        #[arg(long, value_parser = parse_date)]
        last: Option<NaiveDate>,
    },

    /// Delete a contact
    Rm { id: i64 },
}

#[derive(Subcommand)]
enum CategoryCommands {
    /// List categories
    List,

    /// Add a category
    Add {
        name: String,

        #[arg(short, long, default_value = DEFAULT_CATEGORY_COLOR)]
        color: String,
    },

    /// Rename a category; its tasks follow
    Rename {
        old: String,
        new: String,

        #[arg(short, long)]
        color: Option<String>,
    },

    /// Delete a category; its tasks move to Other
    Rm { name: String },
}

#[derive(Subcommand)]
enum ReflectCommands {
    /// Show tags, sections and progress
    Show,

    /// Manage strengths, values, industries, roles and intersections
    Tag {
        #[command(subcommand)]
        command: TagCommands,
    },

    /// Set the text of a story section
    Section { id: SectionId, text: String },

    /// Mark a story section as being edited, or clear the mark
    Edit { id: SectionId },
}

#[derive(Subcommand)]
enum TagCommands {
    Add { list: TagList, text: String },
    Edit { list: TagList, id: String, text: String },
    Rm { list: TagList, id: String },
}

fn parse_date(raw: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| ValidationError::InvalidDate(raw.to_string()))
}

/// Parses a filter argument, resolving enum labels to their canonical form.
fn enum_filter<E>(raw: &str, label: fn(E) -> &'static str) -> Result<FilterValue>
where
    E: std::str::FromStr<Err = ValidationError>,
{
    Ok(match FilterValue::parse(raw) {
        FilterValue::All => FilterValue::All,
        FilterValue::Is(value) => FilterValue::Is(label(value.parse::<E>()?).to_string()),
    })
}

/// Remembered sort keys for a screen, after applying this invocation's flags.
fn sort_keys<R>(tracker: &Tracker, list: &ListArgs) -> Result<Vec<SortKey<R::Field>>>
where
    R: Screen,
    R::Field: std::str::FromStr<Err = ValidationError> + serde::Serialize + serde::de::DeserializeOwned,
{
    if list.reset_sort {
        tracker.prefs.reset::<R>()?;
    }
    match &list.sort {
        Some(raw) => tracker.prefs.select::<R>(raw.parse()?),
        None => Ok(tracker.prefs.sort_keys::<R>()),
    }
}

fn save<T: Persisted>(store: &Store<T>, next: Result<T, ValidationError>) -> Result<()> {
    store.replace(next?)
}

fn find<'a, T>(items: &'a [T], kind: &'static str, id: i64, key: fn(&T) -> i64) -> Result<&'a T> {
    items
        .iter()
        .find(|item| key(item) == id)
        .ok_or_else(|| ValidationError::not_found(kind, id).into())
}

fn open_tracker(today: Option<NaiveDate>) -> Result<(Tracker, Rc<Database>)> {
    let config = Config::load();
    let session = LocalSession::new(config.session.user.as_deref());
    let path = config.db_path();
    let partition = partition_key(&session);
    let backend = Rc::new(Database::open(&path, &partition)?);
    let clock: Box<dyn Clock> = match today {
        Some(date) => Box::new(FixedClock::on(date)),
        None => Box::new(SystemClock),
    };
    let tracker = Tracker::open(backend.clone(), clock);
    Ok((tracker, backend))
}

fn main() -> Result<()> {
    init_logging("warn")?;
    let cli = Cli::parse();
    let (tracker, db) = open_tracker(cli.today)?;

    match cli.command {
        Commands::Init => {
            info!(path = %db.path().display(), "initialized");
            println!("Database initialized at {}", db.path().display());
            println!("Partition: {}", db.partition());
            for key in db.keys()? {
                println!("  {}", key);
            }
        }

        Commands::Dashboard => print_dashboard(&tracker),

        Commands::App { command } => run_app(&tracker, command)?,
        Commands::Task { command } => run_task(&tracker, command)?,
        Commands::Company { command } => run_company(&tracker, command)?,
        Commands::Contact { command } => run_contact(&tracker, command)?,
        Commands::Category { command } => run_category(&tracker, command)?,
        Commands::Reflect { command } => run_reflect(&tracker, command)?,
    }

    Ok(())
}

fn run_app(tracker: &Tracker, command: AppCommands) -> Result<()> {
    let store = &tracker.applications;
    match command {
        AppCommands::List { list, status } => {
            let q = Query::new()
                .search(&list.search, Application::SEARCH_FIELDS)
                .filter(
                    ApplicationField::Status,
                    enum_filter(&status, ApplicationStatus::label)?,
                )
                .sort_by(&sort_keys::<Application>(tracker, &list)?);
            let apps = store.with(|apps| query(apps, &q));
            if apps.is_empty() {
                println!("No applications found.");
            } else {
                println!("{:<5} {:<12} {:<12} {:<22} {:<28}", "ID", "DATE", "STATUS", "COMPANY", "POSITION");
                println!("{}", "-".repeat(82));
                for app in apps {
                    println!(
                        "{:<5} {:<12} {:<12} {:<22} {:<28}",
                        app.id,
                        app.date,
                        app.status,
                        truncate(&app.company, 20),
                        truncate(&app.position, 26)
                    );
                }
            }
        }

        AppCommands::Add {
            company,
            position,
            date,
            status,
            link,
            notes,
        } => {
            let input = ApplicationInput {
                company,
                position,
                date: date.unwrap_or_else(|| tracker.today()),
                status,
                link,
                notes,
            };
            let next = edit::add_application(&store.snapshot(), input)?;
            let id = next.last().map_or(0, |a| a.id);
            store.replace(next)?;
            println!("Added application #{}", id);
        }

        AppCommands::Show { id } => {
            let apps = store.snapshot();
            let app = find(&apps, "application", id, |a| a.id)?;
            let detail = ApplicationDetail::new(app.clone(), &tracker.companies.snapshot());
            let app = &detail.application;
            println!("Application #{}", app.id);
            println!("Company: {}", app.company);
            println!("Position: {}", app.position);
            println!("Date: {}", app.date);
            println!("Status: {}", app.status);
            if let Some(link) = &app.link {
                println!("Link: {}", link);
            }
            match detail.target_score() {
                Some(score) => println!(
                    "Target company score: {}/{} ({}%)",
                    score,
                    MAX_SCORE,
                    score_percentage(score)
                ),
                None => println!("Not on your target company list."),
            }
            if let Some(notes) = &app.notes {
                println!("\n--- Notes ---\n{}", textwrap::fill(notes, 70));
            }
        }

        AppCommands::Edit {
            id,
            company,
            position,
            date,
            status,
            link,
            notes,
        } => {
            let apps = store.snapshot();
            let current = find(&apps, "application", id, |a| a.id)?;
            let input = ApplicationInput {
                company: company.unwrap_or_else(|| current.company.clone()),
                position: position.unwrap_or_else(|| current.position.clone()),
                date: date.unwrap_or(current.date),
                status: status.unwrap_or(current.status),
                link: link.or_else(|| current.link.clone()),
                notes: notes.or_else(|| current.notes.clone()),
            };
            save(store, edit::update_application(&apps, id, input))?;
            println!("Updated application #{}.", id);
        }

        AppCommands::Status { id, status } => {
            save(store, edit::set_application_status(&store.snapshot(), id, status))?;
            println!("Application #{} is now {}.", id, status);
        }

        AppCommands::Rm { id } => {
            save(store, edit::delete_application(&store.snapshot(), id))?;
            println!("Deleted application #{}.", id);
        }
    }
    Ok(())
}

fn run_task(tracker: &Tracker, command: TaskCommands) -> Result<()> {
    let store = &tracker.tasks;
    match command {
        TaskCommands::List {
            list,
            status,
            priority,
            category,
            completed,
        } => {
            let q = Query::new()
                .search(&list.search, Task::SEARCH_FIELDS)
                .filter(TaskField::Status, enum_filter(&status, TaskStatus::label)?)
                .filter(TaskField::Priority, enum_filter(&priority, Priority::label)?)
                .filter(TaskField::Category, FilterValue::parse(&category))
                .filter(TaskField::Completed, completed_filter(&completed)?)
                .sort_by(&sort_keys::<Task>(tracker, &list)?);
            let tasks = store.with(|tasks| query(tasks, &q));
            if tasks.is_empty() {
                println!("No tasks found.");
            } else {
                print_task_header();
                for task in &tasks {
                    print_task_row(task);
                }
            }
        }

        TaskCommands::Add {
            title,
            due,
            priority,
            category,
            notes,
            status,
        } => {
            ensure_category(tracker, &category)?;
            let input = TaskInput {
                title,
                due_date: due,
                priority,
                category,
                notes,
                status,
            };
            let next = edit::add_task(&store.snapshot(), input)?;
            let id = next.last().map_or(0, |t| t.id);
            store.replace(next)?;
            println!("Added task #{}", id);
        }

        TaskCommands::Done { id } => {
            let next = edit::toggle_task(&store.snapshot(), id)?;
            let status = find(&next, "task", id, |t| t.id)?.status;
            store.replace(next)?;
            println!("Task #{} is now {}.", id, status);
        }

        TaskCommands::Edit {
            id,
            title,
            due,
            priority,
            category,
            notes,
            status,
        } => {
            let tasks = store.snapshot();
            let mut input = find(&tasks, "task", id, |t| t.id)?.to_input();
            if let Some(title) = title {
                input.title = title;
            }
            if let Some(due) = due {
                input.due_date = due;
            }
            if let Some(priority) = priority {
                input.priority = priority;
            }
            if let Some(category) = category {
                ensure_category(tracker, &category)?;
                input.category = category;
            }
            if let Some(notes) = notes {
                input.notes = notes;
            }
            if let Some(status) = status {
                input.status = status;
            }
            save(store, edit::update_task(&tasks, id, input))?;
            println!("Updated task #{}.", id);
        }

        TaskCommands::Rm { id } => {
            save(store, edit::delete_task(&store.snapshot(), id))?;
            println!("Deleted task #{}.", id);
        }
    }
    Ok(())
}

fn completed_filter(raw: &str) -> Result<FilterValue> {
    match raw.trim().to_lowercase().as_str() {
        "all" => Ok(FilterValue::All),
        "completed" | "done" => Ok(FilterValue::Is("true".into())),
        "incomplete" | "open" => Ok(FilterValue::Is("false".into())),
        other => Err(ValidationError::UnknownVariant {
            kind: "completion filter",
            value: other.to_string(),
            expected: "completed, incomplete, all".into(),
        }
        .into()),
    }
}

fn ensure_category(tracker: &Tracker, name: &str) -> Result<()> {
    let known = tracker
        .categories
        .with(|cats| cats.iter().any(|c| c.name == name.trim()));
    if known {
        Ok(())
    } else {
        Err(ValidationError::not_found("category", name).into())
    }
}

fn run_company(tracker: &Tracker, command: CompanyCommands) -> Result<()> {
    let store = &tracker.companies;
    match command {
        CompanyCommands::List { list, affinity } => {
            let q = Query::new()
                .search(&list.search, Company::SEARCH_FIELDS)
                .filter(CompanyField::Affinity, enum_filter(&affinity, Affinity::label)?)
                .sort_by(&sort_keys::<Company>(tracker, &list)?);
            let companies = store.with(|companies| query(companies, &q));
            if companies.is_empty() {
                println!("No target companies found.");
            } else {
                print_company_table(&companies);
            }
        }

        CompanyCommands::Add { name, scores } => {
            let input = company_input(name, scores);
            let next = edit::add_company(&store.snapshot(), input, tracker.clock())?;
            let added = next.last().cloned().ok_or_else(|| anyhow!("company was not added"))?;
            store.replace(next)?;
            println!("Added '{}' (ID: {}) with score {}/{}", added.name, added.id, added.score, MAX_SCORE);
        }

        CompanyCommands::Edit { id, name, scores } => {
            let companies = store.snapshot();
            let current = companies
                .iter()
                .find(|c| c.id == id)
                .ok_or_else(|| ValidationError::not_found("company", &id))?;
            let input = company_input(name.unwrap_or_else(|| current.name.clone()), scores);
            let score = input.score();
            save(store.as_ref(), edit::update_company(&companies, &id, input))?;
            println!("Updated company {} (score {}/{}).", id, score, MAX_SCORE);
        }

        CompanyCommands::Top { limit } => {
            let top = store.with(|companies| derive::top_companies(companies, limit));
            if top.top.is_empty() {
                println!("No target companies yet.");
            } else {
                print_company_table(&top.top);
                if top.more_with_top_score > 0 {
                    println!(
                        "+{} more with score {}",
                        top.more_with_top_score,
                        top.top_score.unwrap_or_default()
                    );
                }
            }
        }

        CompanyCommands::Rm { id } => {
            save(store.as_ref(), edit::delete_company(&store.snapshot(), &id))?;
            println!("Deleted company {}.", id);
        }
    }
    Ok(())
}

fn company_input(name: String, scores: CompanyArgs) -> CompanyInput {
    CompanyInput {
        name,
        affinity: scores.affinity,
        motivation: scores.motivation,
        posting: scores.posting,
        strengths: scores.strengths,
        values: scores.values,
    }
}

fn run_contact(tracker: &Tracker, command: ContactCommands) -> Result<()> {
    let book = &tracker.contacts;
    let today = tracker.today();
    match command {
        ContactCommands::List { list, status } => {
            let q = Query::new()
                .search(&list.search, Contact::SEARCH_FIELDS)
                .filter(ContactField::Status, enum_filter(&status, ContactStatus::label)?)
                .sort_by(&sort_keys::<Contact>(tracker, &list)?);
            let contacts = book.store().with(|contacts| query(contacts, &q));
            print_contacts(&contacts, today, "No contacts found.");
        }

        ContactCommands::Add {
            name,
            company,
            position,
            email,
            phone,
            linkedin,
            status,
            notes,
            last,
        } => {
            let input = ContactInput {
                name,
                company,
                position,
                email,
                phone,
                linked_in: linkedin,
                status,
                notes,
                last_contact: last.unwrap_or(today),
            };
            let next = edit::add_contact(&book.snapshot(), input)?;
            let id = next.last().map_or(0, |c| c.id);
            book.replace(next)?;
            println!("Added contact #{}", id);
        }

        ContactCommands::Followup => {
            let due = book
                .store()
                .with(|contacts| derive::contacts_needing_follow_up(contacts, today));
            print_contacts(&due, today, "Nobody needs a follow-up.");
        }

        ContactCommands::Outreach => {
            print_contacts(&book.outreach_candidates(today), today, "No outreach suggestions.");
        }

        ContactCommands::Touch { id } => {
            save(book.store(), edit::touch_contact(&book.snapshot(), id, today))?;
            println!("Contact #{} last contacted {}.", id, today);
        }

        ContactCommands::Status { id, status } => {
            let contacts = book.snapshot();
            let mut input = find(&contacts, "contact", id, |c| c.id)?.to_input();
            input.status = status;
            save(book.store(), edit::update_contact(&contacts, id, input))?;
            println!("Contact #{} is now {}.", id, status);
        }

        ContactCommands::Edit {
            id,
            name,
            company,
            position,
            email,
            phone,
            linkedin,
            status,
            notes,
            last,
        } => {
            let contacts = book.snapshot();
            let mut input = find(&contacts, "contact", id, |c| c.id)?.to_input();
            let text_fields = [
                (name, &mut input.name),
                (company, &mut input.company),
                (position, &mut input.position),
                (email, &mut input.email),
                (phone, &mut input.phone),
                (linkedin, &mut input.linked_in),
                (notes, &mut input.notes),
            ];
            for (value, field) in text_fields {
                if let Some(value) = value {
                    *field = value;
                }
            }
            if let Some(status) = status {
                input.status = status;
            }
            if let Some(last) = last {
                input.last_contact = last;
            }
            save(book.store(), edit::update_contact(&contacts, id, input))?;
            println!("Updated contact #{}.", id);
        }

        ContactCommands::Rm { id } => {
            save(book.store(), edit::delete_contact(&book.snapshot(), id))?;
            println!("Deleted contact #{}.", id);
        }
    }
    Ok(())
}

fn run_category(tracker: &Tracker, command: CategoryCommands) -> Result<()> {
    let store = &tracker.categories;
    match command {
        CategoryCommands::List => {
            let tasks = tracker.tasks.snapshot();
            println!("{:<20} {:>6}  {:<30}", "NAME", "TASKS", "COLOR");
            println!("{}", "-".repeat(58));
            for category in store.snapshot() {
                let count = tasks.iter().filter(|t| t.category == category.name).count();
                println!(
                    "{:<20} {:>6}  {:<30}",
                    truncate(&category.name, 18),
                    count,
                    category.color
                );
            }
        }

        CategoryCommands::Add { name, color } => {
            save(store, edit::add_category(&store.snapshot(), &name, &color))?;
            println!("Category '{}' added.", name.trim());
        }

        CategoryCommands::Rename { old, new, color } => {
            let (categories, tasks) = edit::rename_category(
                &store.snapshot(),
                &tracker.tasks.snapshot(),
                &old,
                &new,
                color.as_deref(),
            )?;
            tracker.replace_categories(categories, tasks)?;
            println!("Category '{}' renamed to '{}'.", old, new.trim());
        }

        CategoryCommands::Rm { name } => {
            let (categories, tasks) =
                edit::delete_category(&store.snapshot(), &tracker.tasks.snapshot(), &name)?;
            tracker.replace_categories(categories, tasks)?;
            println!("Category '{}' deleted.", name);
        }
    }
    Ok(())
}

fn run_reflect(tracker: &Tracker, command: ReflectCommands) -> Result<()> {
    let store = &tracker.reflection;
    match command {
        ReflectCommands::Show => {
            let reflection = store.snapshot();
            for &list in TagList::ALL {
                let tags: Vec<String> = reflection
                    .tags(list)
                    .iter()
                    .map(|t| format!("[{}] {}", t.id, t.text))
                    .collect();
                println!("{}: {}", list, if tags.is_empty() { "-".to_string() } else { tags.join(", ") });
            }
            for section in &reflection.story_sections {
                let marker = if section.is_editing { " [editing]" } else { "" };
                println!("\n== {} ({}){} ==", section.label, section.id, marker);
                if section.is_filled() {
                    println!("{}", textwrap::fill(&section.text, 70));
                } else {
                    println!("(empty)");
                }
            }
            let progress = derive::reflection_progress(&reflection);
            println!(
                "\nProgress: {}/{} ({}%)",
                progress.completed, progress.total, progress.percentage
            );
        }

        ReflectCommands::Tag { command } => {
            let current = store.snapshot();
            let (next, message) = match command {
                TagCommands::Add { list, text } => {
                    (edit::add_tag(&current, list, &text), format!("Added to {}.", list))
                }
                TagCommands::Edit { list, id, text } => (
                    edit::update_tag(&current, list, &id, &text),
                    format!("Updated {} [{}].", list, id),
                ),
                TagCommands::Rm { list, id } => (
                    edit::delete_tag(&current, list, &id),
                    format!("Removed {} [{}].", list, id),
                ),
            };
            save(store, next)?;
            println!("{}", message);
        }

        ReflectCommands::Section { id, text } => {
            save(store, edit::set_section(&store.snapshot(), id, &text))?;
            println!("Saved section '{}'.", id.title());
        }

        ReflectCommands::Edit { id } => {
            let next = edit::toggle_editing(&store.snapshot(), id)?;
            let editing = next.section(id).is_some_and(|s| s.is_editing);
            store.replace(next)?;
            if editing {
                println!("Editing section '{}'.", id.title());
            } else {
                println!("Stopped editing section '{}'.", id.title());
            }
        }
    }
    Ok(())
}

fn print_dashboard(tracker: &Tracker) {
    let today = tracker.today();
    let summary = DashboardSummary::compute(&tracker.snapshot(), today);

    println!("Dashboard for {}", today);
    println!("\nApplications ({}):", summary.total_applications());
    for (status, count) in &summary.status_counts {
        println!("  {:<12} {:>4}", status.label(), count);
    }

    let stats = summary.task_stats;
    println!(
        "\nTasks: {}/{} completed, {} upcoming, {} overdue, {} due today, {} due soon",
        stats.completed, stats.total, stats.upcoming, stats.overdue, stats.due_today, stats.due_soon
    );
    if !summary.urgent_tasks.is_empty() {
        println!("\nUrgent:");
        print_task_header();
        for task in &summary.urgent_tasks {
            print_task_row(task);
        }
    }
    if !summary.other_tasks.is_empty() {
        println!("\nLater:");
        print_task_header();
        for task in &summary.other_tasks {
            print_task_row(task);
        }
    }

    let top = &summary.top_companies;
    println!("\nTop companies:");
    if top.top.is_empty() {
        println!("  (none yet)");
    }
    for company in &top.top {
        println!(
            "  {:<24} {:>2}/{} ({}%)",
            truncate(&company.name, 22),
            company.score,
            MAX_SCORE,
            score_percentage(company.score)
        );
    }
    if top.more_with_top_score > 0 {
        println!("  +{} more with top score", top.more_with_top_score);
    }

    println!("\nFollow-ups ({}):", summary.follow_ups.len());
    for contact in &summary.follow_ups {
        println!(
            "  {:<20} {:<18} last {}",
            truncate(&contact.name, 18),
            truncate(&contact.company, 16),
            contact.last_contact
        );
    }

    let progress = summary.reflection;
    println!(
        "\nReflection: {}/{} ({}%)",
        progress.completed, progress.total, progress.percentage
    );
}

fn print_task_header() {
    println!("{:<5} {:<12} {:<8} {:<12} {:<14} {:<30}", "ID", "DUE", "PRIORITY", "STATUS", "CATEGORY", "TITLE");
    println!("{}", "-".repeat(84));
}

fn print_task_row(task: &Task) {
    println!(
        "{:<5} {:<12} {:<8} {:<12} {:<14} {:<30}",
        task.id,
        task.due_date,
        task.priority,
        task.status,
        truncate(&task.category, 12),
        truncate(&task.title, 30)
    );
}

fn print_company_table(companies: &[Company]) {
    println!(
        "{:<15} {:<22} {:<4} {:>4} {:>4} {:>4} {:>4} {:>7}",
        "ID", "NAME", "AFF", "MOT", "POST", "STR", "VAL", "SCORE"
    );
    println!("{}", "-".repeat(72));
    for c in companies {
        println!(
            "{:<15} {:<22} {:<4} {:>4} {:>4} {:>4} {:>4} {:>7}",
            truncate(&c.id, 15),
            truncate(&c.name, 20),
            c.affinity,
            c.motivation,
            c.posting,
            c.strengths,
            c.values,
            format!("{}/{}", c.score, MAX_SCORE)
        );
    }
}

fn print_contacts(contacts: &[Contact], today: NaiveDate, empty: &str) {
    if contacts.is_empty() {
        println!("{}", empty);
        return;
    }
    println!("{:<5} {:<20} {:<16} {:<20} {:<10} {:<12}", "ID", "NAME", "COMPANY", "POSITION", "STATUS", "LAST");
    println!("{}", "-".repeat(86));
    for contact in contacts {
        let marker = if derive::is_stale(contact, today) { " *" } else { "" };
        println!(
            "{:<5} {:<20} {:<16} {:<20} {:<10} {}{}",
            contact.id,
            truncate(&contact.name, 18),
            truncate(&contact.company, 14),
            truncate(&contact.position, 18),
            contact.status,
            contact.last_contact,
            marker
        );
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

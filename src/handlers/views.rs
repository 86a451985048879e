//! Screen rendering
//!
//! Pure functions from service results to message text and inline keyboards.
//! Handlers decide which screen to show; this module decides how it looks.

use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};
use uuid::Uuid;

use crate::handlers::actions::CallbackAction;
use crate::models::{Decision, Event, EventCategory, Rating, RegistrationStatus, MAX_COMMENT_CHARS};
use crate::services::{
    Affordance, CatalogView, CategoryFilter, EventFilter, FeedbackForm, RegistrationRow, RegistrationView,
};
use crate::utils::helpers::{format_date, format_timestamp, truncate_text};

/// Longest text Telegram accepts in one message
pub const MESSAGE_LIMIT: usize = 4096;
pub const CATALOG_PAGE_SIZE: usize = 15;
pub const REGISTRATIONS_PAGE_SIZE: usize = 15;
/// Event filter buttons shown at once on the registrations screen
pub const FILTER_PAGE_SIZE: usize = 8;

/// Text plus optional keyboard
#[derive(Debug, Clone)]
pub struct Screen {
    pub text: String,
    pub keyboard: Option<InlineKeyboardMarkup>,
}

impl Screen {
    fn new(text: String, rows: Vec<Vec<InlineKeyboardButton>>) -> Self {
        let keyboard = if rows.is_empty() { None } else { Some(InlineKeyboardMarkup::new(rows)) };
        // Emoji take two UTF-16 units in Telegram's count, so leave headroom
        Self { text: truncate_text(&text, MESSAGE_LIMIT / 2), keyboard }
    }
}

/// One page of a list, with the requested index clamped into range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub index: usize,
    pub count: usize,
    pub start: usize,
    pub end: usize,
}

impl Page {
    pub fn of(total: usize, requested: usize, size: usize) -> Self {
        let count = ((total + size - 1) / size).max(1);
        let index = requested.min(count - 1);
        let start = index * size;
        Self { index, count, start, end: (start + size).min(total) }
    }

    pub fn is_paged(&self) -> bool {
        self.count > 1
    }

    /// Previous/next buttons, or `None` when everything fits on one page
    fn nav_row(&self, prev: &str, next: &str, to: impl Fn(usize) -> CallbackAction) -> Option<Vec<InlineKeyboardButton>> {
        if !self.is_paged() {
            return None;
        }
        let mut row = Vec::new();
        if self.index > 0 {
            row.push(button(prev, to(self.index - 1)));
        }
        row.push(button(format!("{}/{}", self.index + 1, self.count), CallbackAction::Noop));
        if self.index + 1 < self.count {
            row.push(button(next, to(self.index + 1)));
        }
        Some(row)
    }
}

fn button(label: impl Into<String>, action: CallbackAction) -> InlineKeyboardButton {
    InlineKeyboardButton::callback(label.into(), action.to_string())
}

pub fn landing() -> Screen {
    let text = "🎓 Campus Event Hub\n\n\
        Discover and join events happening across colleges.\n\n\
        🔍 Browse hackathons, workshops, cultural nights and sports meets\n\
        📝 Register in one tap and track your approval\n\
        ⭐ Rate the events you attended\n\n\
        Tap Get Started to sign in."
        .to_string();
    Screen::new(text, vec![vec![button("🚀 Get Started", CallbackAction::GetStarted)]])
}

pub fn sign_in_required() -> Screen {
    Screen::new(
        "🔒 Please sign in first.".to_string(),
        vec![vec![button("🚀 Get Started", CallbackAction::GetStarted)]],
    )
}

pub fn help(is_admin: bool) -> String {
    let mut text = String::from(
        "📖 Commands\n\n\
        /start - Landing page or your events\n\
        /events - Browse events\n\
        /search <text> - Search event titles and descriptions\n\
        /cancel - Leave the current dialog\n\
        /signout - Sign out\n\
        /help - This message",
    );
    if is_admin {
        text.push_str(
            "\n\n🛠 Organizer\n\
            /admin - Review registrations\n\
            /newevent title | category | location | start | end | max | description\n\
            Dates use YYYY-MM-DD HH:MM (UTC). Categories: sports, hackathon, cultural, workshop, other",
        );
    }
    text
}

fn category_label(filter: CategoryFilter) -> &'static str {
    match filter {
        CategoryFilter::All => "All",
        CategoryFilter::Only(category) => category.label(),
    }
}

pub fn catalog(view: &CatalogView, filter: &EventFilter, page: usize) -> Screen {
    let page = Page::of(view.events.len(), page, CATALOG_PAGE_SIZE);
    let shown = &view.events[page.start..page.end];
    let mut text = String::from("📅 Events\n");
    if filter.is_active() {
        text.push_str(&format!(
            "Search: \"{}\" · Category: {}\n",
            filter.query,
            category_label(filter.category)
        ));
    }
    text.push('\n');

    if view.events.is_empty() {
        text.push_str("No events found");
    } else {
        for event in shown {
            text.push_str(&format!(
                "{} {} · {} · {}\n",
                event.category.badge(),
                truncate_text(&event.title, 60),
                format_date(event.start_date),
                truncate_text(&event.location, 40)
            ));
        }
        if filter.is_active() {
            text.push_str(&format!("\nShowing {} of {}", view.events.len(), view.total));
        }
        if page.is_paged() {
            text.push_str(&format!("\nPage {} of {}", page.index + 1, page.count));
        }
    }

    let mut rows: Vec<Vec<InlineKeyboardButton>> = shown
        .iter()
        .map(|e| vec![button(truncate_text(&e.title, 40), CallbackAction::ShowEvent(e.id))])
        .collect();
    rows.extend(page.nav_row("◀ Prev", "Next ▶", CallbackAction::CatalogPage));

    let choices: Vec<CategoryFilter> = std::iter::once(CategoryFilter::All)
        .chain(EventCategory::ALL.iter().copied().map(CategoryFilter::Only))
        .collect();
    for chunk in choices.chunks(3) {
        rows.push(
            chunk
                .iter()
                .map(|choice| {
                    let mark = if *choice == filter.category { "✓ " } else { "" };
                    button(format!("{}{}", mark, category_label(*choice)), CallbackAction::Category(*choice))
                })
                .collect(),
        );
    }

    let mut tools = vec![button("🔍 Search", CallbackAction::StartSearch)];
    if filter.is_active() {
        tools.push(button("✖ Clear filters", CallbackAction::ClearFilters));
    }
    rows.push(tools);

    Screen::new(text, rows)
}

fn status_badge(status: RegistrationStatus) -> &'static str {
    match status {
        RegistrationStatus::Pending => "🟡 pending",
        RegistrationStatus::Approved => "🟢 approved",
        RegistrationStatus::Rejected => "🔴 rejected",
    }
}

pub fn event_detail(event: &Event, registration: &RegistrationView, busy: bool) -> Screen {
    let mut text = format!(
        "{} {}\n\n{}\n\n{}\n\n📍 {}\n🗓 Starts: {}\n🏁 Ends: {}\n👥 Max participants: {}",
        event.category.badge(),
        event.category.label(),
        event.title,
        event.description,
        event.location,
        format_timestamp(event.start_date),
        format_timestamp(event.end_date),
        event.max_participants
    );
    if let Some(reg) = &registration.registration {
        text.push_str(&format!("\n\nYour registration: {}", status_badge(reg.status)));
    }

    let affordance = registration.affordance();
    let action_button = match affordance {
        Affordance::Register if busy => button("⏳ Registering...", CallbackAction::Noop),
        Affordance::Register => button(format!("📝 {}", affordance.label()), CallbackAction::Register(event.id)),
        Affordance::Pending => button(format!("⏳ {}", affordance.label()), CallbackAction::Noop),
        Affordance::Registered => button(format!("✅ {}", affordance.label()), CallbackAction::Noop),
        Affordance::Rejected => button(format!("❌ {}", affordance.label()), CallbackAction::Noop),
    };

    let mut rows = vec![vec![action_button]];
    if registration.is_registered() {
        rows.push(vec![button("⭐ Give Feedback", CallbackAction::OpenFeedback(event.id))]);
    }
    rows.push(vec![button("⬅️ Back to events", CallbackAction::ListEvents)]);

    Screen::new(text, rows)
}

pub fn feedback_form(event_title: &str, form: &FeedbackForm) -> Screen {
    let rating = match Rating::new(form.rating) {
        Ok(rating) => rating.stars(),
        Err(_) => "not selected".to_string(),
    };
    let comments = if form.comments.is_empty() { "none".to_string() } else { form.comments.clone() };
    let text = format!(
        "⭐ Feedback for {}\n\nRating: {}\nComments: {}\n({} of {} characters left)\n\nSend a message to set your comments.",
        event_title,
        rating,
        comments,
        form.remaining_chars(),
        MAX_COMMENT_CHARS
    );

    let stars = (Rating::MIN..=Rating::MAX)
        .map(|n| {
            let label = if n == form.rating { format!("✓ {}⭐", n) } else { format!("{}⭐", n) };
            button(label, CallbackAction::Rate(n))
        })
        .collect();

    Screen::new(
        text,
        vec![
            stars,
            vec![
                button("📨 Submit", CallbackAction::SubmitFeedback),
                button("Cancel", CallbackAction::CancelFeedback),
            ],
        ],
    )
}

/// Page positions for the registrations screen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegistrationPages {
    pub rows: usize,
    /// Page of the event filter buttons
    pub events: usize,
}

pub fn registrations(rows: &[RegistrationRow], events: &[Event], filter: Option<Uuid>, pages: RegistrationPages) -> Screen {
    let scope = filter
        .and_then(|id| events.iter().find(|e| e.id == id))
        .map(|e| truncate_text(&e.title, 60))
        .unwrap_or_else(|| "All events".to_string());
    let mut text = format!("🛠 Registrations · {}\n\n", scope);

    let page = Page::of(rows.len(), pages.rows, REGISTRATIONS_PAGE_SIZE);
    let shown = &rows[page.start..page.end];
    if rows.is_empty() {
        text.push_str("No registrations found");
    } else {
        for (offset, row) in shown.iter().enumerate() {
            text.push_str(&format!(
                "{}. {} ({})\n   {} · applied {} · {}\n",
                page.start + offset + 1,
                truncate_text(&row.profile.name, 40),
                truncate_text(&row.profile.college, 40),
                truncate_text(&row.event_title, 40),
                format_date(row.registration.created_at),
                status_badge(row.registration.status)
            ));
        }
        if page.is_paged() {
            text.push_str(&format!("\nPage {} of {} · {} registrations", page.index + 1, page.count, rows.len()));
        }
    }

    let mut keyboard: Vec<Vec<InlineKeyboardButton>> = shown
        .iter()
        .enumerate()
        .filter(|(_, row)| row.is_actionable())
        .map(|(offset, row)| {
            let number = page.start + offset + 1;
            vec![
                button(format!("✅ Approve #{}", number), CallbackAction::Decide(row.registration.id, Decision::Approve)),
                button(format!("❌ Reject #{}", number), CallbackAction::Decide(row.registration.id, Decision::Reject)),
            ]
        })
        .collect();
    keyboard.extend(page.nav_row("◀ Prev", "Next ▶", CallbackAction::AdminPage));

    let all_mark = if filter.is_none() { "✓ " } else { "" };
    keyboard.push(vec![button(format!("{}All events", all_mark), CallbackAction::AdminFilter(None))]);
    let event_page = Page::of(events.len(), pages.events, FILTER_PAGE_SIZE);
    for event in &events[event_page.start..event_page.end] {
        let mark = if filter == Some(event.id) { "✓ " } else { "" };
        keyboard.push(vec![button(
            format!("{}{}", mark, truncate_text(&event.title, 40)),
            CallbackAction::AdminFilter(Some(event.id)),
        )]);
    }
    keyboard.extend(event_page.nav_row("◀ Events", "Events ▶", CallbackAction::AdminEventsPage));

    Screen::new(text, keyboard)
}

//! Test data builders

use chrono::{Duration, Utc};
use fake::faker::company::en::CompanyName;
use fake::faker::name::en::Name;
use fake::Fake;
use uuid::Uuid;

use campus_event_hub::models::{Event, EventCategory, Profile, Registration, RegistrationStatus};

/// Event starting `days_from_now` days ahead, lasting four hours
pub fn event(title: &str, description: &str, category: EventCategory, days_from_now: i64) -> Event {
    let start = Utc::now() + Duration::days(days_from_now);
    Event {
        id: Uuid::new_v4(),
        title: title.to_string(),
        description: description.to_string(),
        category,
        location: format!("Block {}", (1..9).fake::<u8>()),
        start_date: start,
        end_date: start + Duration::hours(4),
        max_participants: (10..300).fake::<i32>(),
        created_at: Utc::now(),
    }
}

/// A small catalog in start-date order
pub fn sample_catalog() -> Vec<Event> {
    vec![
        event("Hackathon 2024", "Build anything in 48 hours", EventCategory::Hackathon, 1),
        event("Rust Workshop", "Hands-on systems programming", EventCategory::Workshop, 3),
        event("Inter-College Football", "Knockout tournament", EventCategory::Sports, 5),
        event("Cultural Night", "Music, dance and theatre", EventCategory::Cultural, 8),
    ]
}

pub fn random_profile(id: Uuid) -> Profile {
    Profile {
        id,
        name: Name().fake(),
        college: CompanyName().fake(),
    }
}

pub fn registration(event_id: Uuid, user_id: Uuid, status: RegistrationStatus, minutes_ago: i64) -> Registration {
    Registration {
        id: Uuid::new_v4(),
        event_id,
        user_id,
        status,
        created_at: Utc::now() - Duration::minutes(minutes_ago),
    }
}

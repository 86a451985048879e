//! Inline button payloads
//!
//! Every button carries a short `action[:argument]` string. Telegram limits
//! callback data to 64 bytes, which a UUID argument fits comfortably.

use std::fmt;

use uuid::Uuid;

use crate::models::Decision;
use crate::services::CategoryFilter;
use crate::utils::errors::{EventHubError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackAction {
    GetStarted,
    ListEvents,
    ShowEvent(Uuid),
    Register(Uuid),
    Category(CategoryFilter),
    StartSearch,
    ClearFilters,
    CatalogPage(usize),
    OpenFeedback(Uuid),
    Rate(u8),
    SubmitFeedback,
    CancelFeedback,
    /// `None` shows registrations for every event
    AdminFilter(Option<Uuid>),
    AdminPage(usize),
    /// Page of the event filter buttons
    AdminEventsPage(usize),
    Decide(Uuid, Decision),
    /// Status indicators that do nothing when pressed
    Noop,
}

impl CallbackAction {
    pub fn parse(data: &str) -> Result<Self> {
        let (action, argument) = match data.split_once(':') {
            Some((action, argument)) => (action, Some(argument)),
            None => (data, None),
        };

        let uuid = || -> Result<Uuid> {
            let raw = argument.ok_or_else(|| invalid(data))?;
            Uuid::parse_str(raw).map_err(|_| invalid(data))
        };

        let page = || -> Result<usize> {
            argument
                .and_then(|raw| raw.parse::<usize>().ok())
                .ok_or_else(|| invalid(data))
        };

        let parsed = match action {
            "start" => CallbackAction::GetStarted,
            "events" => CallbackAction::ListEvents,
            "ev" => CallbackAction::ShowEvent(uuid()?),
            "reg" => CallbackAction::Register(uuid()?),
            "cat" => CallbackAction::Category(CategoryFilter::parse(argument.ok_or_else(|| invalid(data))?)?),
            "search" => CallbackAction::StartSearch,
            "clear" => CallbackAction::ClearFilters,
            "page" => CallbackAction::CatalogPage(page()?),
            "fb" => CallbackAction::OpenFeedback(uuid()?),
            "rate" => {
                let stars = argument
                    .and_then(|raw| raw.parse::<u8>().ok())
                    .ok_or_else(|| invalid(data))?;
                CallbackAction::Rate(stars)
            }
            "fb_submit" => CallbackAction::SubmitFeedback,
            "fb_cancel" => CallbackAction::CancelFeedback,
            "adm" => match argument {
                Some("all") => CallbackAction::AdminFilter(None),
                _ => CallbackAction::AdminFilter(Some(uuid()?)),
            },
            "admpage" => CallbackAction::AdminPage(page()?),
            "admev" => CallbackAction::AdminEventsPage(page()?),
            "approve" => CallbackAction::Decide(uuid()?, Decision::Approve),
            "reject" => CallbackAction::Decide(uuid()?, Decision::Reject),
            "noop" => CallbackAction::Noop,
            _ => return Err(invalid(data)),
        };
        Ok(parsed)
    }
}

impl fmt::Display for CallbackAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallbackAction::GetStarted => f.write_str("start"),
            CallbackAction::ListEvents => f.write_str("events"),
            CallbackAction::ShowEvent(id) => write!(f, "ev:{}", id),
            CallbackAction::Register(id) => write!(f, "reg:{}", id),
            CallbackAction::Category(filter) => write!(f, "cat:{}", filter.as_str()),
            CallbackAction::StartSearch => f.write_str("search"),
            CallbackAction::ClearFilters => f.write_str("clear"),
            CallbackAction::CatalogPage(page) => write!(f, "page:{}", page),
            CallbackAction::OpenFeedback(id) => write!(f, "fb:{}", id),
            CallbackAction::Rate(stars) => write!(f, "rate:{}", stars),
            CallbackAction::SubmitFeedback => f.write_str("fb_submit"),
            CallbackAction::CancelFeedback => f.write_str("fb_cancel"),
            CallbackAction::AdminFilter(None) => f.write_str("adm:all"),
            CallbackAction::AdminFilter(Some(id)) => write!(f, "adm:{}", id),
            CallbackAction::AdminPage(page) => write!(f, "admpage:{}", page),
            CallbackAction::AdminEventsPage(page) => write!(f, "admev:{}", page),
            CallbackAction::Decide(id, Decision::Approve) => write!(f, "approve:{}", id),
            CallbackAction::Decide(id, Decision::Reject) => write!(f, "reject:{}", id),
            CallbackAction::Noop => f.write_str("noop"),
        }
    }
}

fn invalid(data: &str) -> EventHubError {
    EventHubError::InvalidInput(format!("Unrecognized button data '{}'", data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EventCategory;
    use assert_matches::assert_matches;

    #[test]
    fn payloads_fit_telegram_limit() {
        let id = Uuid::new_v4();
        for action in [
            CallbackAction::Decide(id, Decision::Approve),
            CallbackAction::AdminFilter(Some(id)),
            CallbackAction::OpenFeedback(id),
        ] {
            assert!(action.to_string().len() <= 64);
        }
    }

    #[test]
    fn parses_what_it_encodes() {
        let id = Uuid::new_v4();
        let cases = [
            CallbackAction::ShowEvent(id),
            CallbackAction::Category(CategoryFilter::Only(EventCategory::Workshop)),
            CallbackAction::Category(CategoryFilter::All),
            CallbackAction::Rate(4),
            CallbackAction::AdminFilter(None),
            CallbackAction::CatalogPage(3),
            CallbackAction::AdminEventsPage(1),
            CallbackAction::Decide(id, Decision::Reject),
        ];
        for action in cases {
            assert_eq!(CallbackAction::parse(&action.to_string()).unwrap(), action);
        }
    }

    #[test]
    fn rejects_malformed_data() {
        assert_matches!(CallbackAction::parse("ev:not-a-uuid"), Err(EventHubError::InvalidInput(_)));
        assert_matches!(CallbackAction::parse("rate"), Err(EventHubError::InvalidInput(_)));
        assert_matches!(CallbackAction::parse("admpage:-1"), Err(EventHubError::InvalidInput(_)));
        assert!(CallbackAction::parse("lang:en").is_err());
    }
}

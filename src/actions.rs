use crate::errors::ActionError;
use crate::navigation::Page;

pub const HABITS_NAVIGATION_BUTTON: &str = "HABITS_NAVIGATION_BUTTON";
pub const DATA_NAVIGATION_BUTTON: &str = "DATA_NAVIGATION_BUTTON";
pub const COPY_TO_CLIPBOARD_BUTTON: &str = "COPY_TO_CLIPBOARD_BUTTON";
pub const CUSTOM_HABIT_SAVE_BUTTON: &str = "CUSTOM_HABIT_SAVE_BUTTON";

pub const DELETE_HABIT_BUTTON_PREFIX: &str = "DELETE_HABIT_BUTTON_";
pub const DUPLICATE_HABIT_BUTTON_PREFIX: &str = "DUPLICATE_HABIT_BUTTON_";
pub const HABIT_BUTTON_PREFIX: &str = "HABIT_BUTTON_";

/// Everything a click on the page can mean.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Navigate(Page),
    Export,
    Delete(String),
    Duplicate(String),
    /// Carries the full preset button id (`HABIT_BUTTON_...`).
    AddPreset(String),
    AddCustom(String),
}

impl Action {
    /// Maps a clicked element id to its action.
    ///
    /// The literal ids are checked first, then the prefixes. No prefix is a
    /// prefix of another, so a target resolves to at most one action.
    pub fn parse(target: &str, custom_text: Option<&str>) -> Result<Self, ActionError> {
        match target {
            HABITS_NAVIGATION_BUTTON => return Ok(Action::Navigate(Page::Habits)),
            DATA_NAVIGATION_BUTTON => return Ok(Action::Navigate(Page::Data)),
            COPY_TO_CLIPBOARD_BUTTON => return Ok(Action::Export),
            CUSTOM_HABIT_SAVE_BUTTON => {
                return Ok(Action::AddCustom(custom_text.unwrap_or_default().to_string()));
            }
            _ => {}
        }

        if let Some(id) = target.strip_prefix(DELETE_HABIT_BUTTON_PREFIX) {
            return non_empty(id, target).map(Action::Delete);
        }
        if let Some(id) = target.strip_prefix(DUPLICATE_HABIT_BUTTON_PREFIX) {
            return non_empty(id, target).map(Action::Duplicate);
        }
        if let Some(id) = target.strip_prefix(HABIT_BUTTON_PREFIX) {
            return non_empty(id, target).map(|_| Action::AddPreset(target.to_string()));
        }

        Err(ActionError::UnknownTarget(target.to_string()))
    }

    /// Whether the action writes to the store.
    pub fn mutates(&self) -> bool {
        !matches!(self, Action::Navigate(_) | Action::Export)
    }
}

fn non_empty(id: &str, target: &str) -> Result<String, ActionError> {
    if id.is_empty() {
        Err(ActionError::EmptyId(target.to_string()))
    } else {
        Ok(id.to_string())
    }
}

pub fn delete_button_id(record_id: &str) -> String {
    format!("{DELETE_HABIT_BUTTON_PREFIX}{record_id}")
}

pub fn duplicate_button_id(record_id: &str) -> String {
    format!("{DUPLICATE_HABIT_BUTTON_PREFIX}{record_id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_targets() {
        assert_eq!(
            Action::parse("DATA_NAVIGATION_BUTTON", None),
            Ok(Action::Navigate(Page::Data))
        );
        assert_eq!(
            Action::parse("HABITS_NAVIGATION_BUTTON", None),
            Ok(Action::Navigate(Page::Habits))
        );
        assert_eq!(Action::parse("COPY_TO_CLIPBOARD_BUTTON", None), Ok(Action::Export));
    }

    #[test]
    fn row_buttons_round_trip_record_id() {
        let id = "0b5c7e9e-7f0f-4c55-9c2e-1f9d1c0a2b3c";
        assert_eq!(
            Action::parse(&delete_button_id(id), None),
            Ok(Action::Delete(id.to_string()))
        );
        assert_eq!(
            Action::parse(&duplicate_button_id(id), None),
            Ok(Action::Duplicate(id.to_string()))
        );
    }

    #[test]
    fn preset_keeps_full_button_id() {
        assert_eq!(
            Action::parse("HABIT_BUTTON_abc", None),
            Ok(Action::AddPreset("HABIT_BUTTON_abc".to_string()))
        );
    }

    #[test]
    fn custom_entry_accepts_empty_text() {
        assert_eq!(
            Action::parse("CUSTOM_HABIT_SAVE_BUTTON", None),
            Ok(Action::AddCustom(String::new()))
        );
        assert_eq!(
            Action::parse("CUSTOM_HABIT_SAVE_BUTTON", Some("  ")),
            Ok(Action::AddCustom("  ".to_string()))
        );
    }

    #[test]
    fn delete_prefix_does_not_also_match_preset() {
        // "DELETE_HABIT_BUTTON_x" contains "HABIT_BUTTON_" but must only delete.
        let parsed = Action::parse("DELETE_HABIT_BUTTON_HABIT_BUTTON_x", None).unwrap();
        assert_eq!(parsed, Action::Delete("HABIT_BUTTON_x".to_string()));
    }

    #[test]
    fn rejects_unknown_and_empty_targets() {
        assert_eq!(
            Action::parse("SOMETHING_ELSE", None),
            Err(ActionError::UnknownTarget("SOMETHING_ELSE".to_string()))
        );
        assert_eq!(
            Action::parse("DELETE_HABIT_BUTTON_", None),
            Err(ActionError::EmptyId("DELETE_HABIT_BUTTON_".to_string()))
        );
    }

    #[test]
    fn only_store_actions_mutate() {
        assert!(!Action::Export.mutates());
        assert!(!Action::Navigate(Page::Data).mutates());
        assert!(Action::Delete("x".into()).mutates());
        assert!(Action::AddCustom(String::new()).mutates());
    }
}

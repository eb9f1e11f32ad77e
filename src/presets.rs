use crate::actions::HABIT_BUTTON_PREFIX;
use uuid::Uuid;

const DEFAULT_LABELS: [&str; 15] = [
    "Wakker",
    "Glas Water (250 ml)",
    "Fles Water (500 ml)",
    "Slappe Kak",
    "Sterke Kak",
    "Tanden Gepoetst",
    "Tas Koffie",
    "Tas Thee",
    "Crossfit",
    "Primerose Pilletje",
    "Magnesium",
    "Frisdrank",
    "Alcohol",
    "Powernap",
    "Slapen",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresetHabit {
    pub button_id: String,
    pub label: String,
}

/// Immutable table of preset habit buttons, built once at start-up.
///
/// Button ids are `HABIT_BUTTON_<uuid>` and are regenerated per process.
#[derive(Debug, Clone)]
pub struct PresetHabits {
    entries: Vec<PresetHabit>,
}

impl PresetHabits {
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entries = labels
            .into_iter()
            .map(|label| PresetHabit {
                button_id: format!("{HABIT_BUTTON_PREFIX}{}", Uuid::new_v4()),
                label: label.into(),
            })
            .collect();
        Self { entries }
    }

    pub fn label(&self, button_id: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|preset| preset.button_id == button_id)
            .map(|preset| preset.label.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &PresetHabit> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for PresetHabits {
    fn default() -> Self {
        Self::from_labels(DEFAULT_LABELS)
    }
}

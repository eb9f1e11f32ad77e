use serde::Deserialize;

pub const HABITS_SECTION: &str = "HABITS_SECTION";
pub const DATA_SECTION: &str = "DATA_SECTION";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Page {
    #[default]
    Habits,
    Data,
}

impl Page {
    pub fn as_str(self) -> &'static str {
        match self {
            Page::Habits => "habits",
            Page::Data => "data",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "habits" => Some(Page::Habits),
            "data" => Some(Page::Data),
            _ => None,
        }
    }

    /// Id of the page section this page shows.
    pub fn section_id(self) -> &'static str {
        match self {
            Page::Habits => HABITS_SECTION,
            Page::Data => DATA_SECTION,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct PageQuery {
    pub page: Option<String>,
}

/// The current-page selector carried in the `?page=` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Navigation {
    page: Page,
}

impl Navigation {
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    /// Unrecognised values fall back to the habits page.
    pub fn from_query(query: &PageQuery) -> Self {
        let page = query
            .page
            .as_deref()
            .and_then(Page::parse)
            .unwrap_or_default();
        Self { page }
    }

    pub fn page(&self) -> Page {
        self.page
    }

    pub fn set_page(&mut self, page: Page) {
        self.page = page;
    }

    /// The URL to rewrite the address bar to.
    pub fn url(&self) -> String {
        format!("/?page={}", self.page.as_str())
    }

    /// `content-visibility` for the given page's section.
    pub fn content_visibility(&self, section: Page) -> &'static str {
        if section == self.page { "visible" } else { "hidden" }
    }
}

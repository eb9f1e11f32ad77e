use crate::actions::{
    delete_button_id, duplicate_button_id, COPY_TO_CLIPBOARD_BUTTON, CUSTOM_HABIT_SAVE_BUTTON,
    DATA_NAVIGATION_BUTTON, HABITS_NAVIGATION_BUTTON,
};
use crate::models::HabitRecord;
use crate::navigation::{Navigation, Page};
use crate::notifications::Notification;
use crate::presets::PresetHabits;
use crate::repository::format_table_timestamp;
use chrono::{Local, TimeZone};
use std::fmt::Display;

pub struct IndexView<'a> {
    pub navigation: Navigation,
    pub presets: &'a PresetHabits,
    pub entries: &'a [HabitRecord],
    pub export: Option<&'a str>,
    pub notifications: &'a [Notification],
}

pub fn render_index(view: &IndexView<'_>) -> String {
    let nav = view.navigation;
    INDEX_HTML
        .replace("{{PAGE}}", nav.page().as_str())
        .replace("{{HABITS_SECTION}}", Page::Habits.section_id())
        .replace("{{DATA_SECTION}}", Page::Data.section_id())
        .replace("{{HABITS_VISIBILITY}}", nav.content_visibility(Page::Habits))
        .replace("{{DATA_VISIBILITY}}", nav.content_visibility(Page::Data))
        .replace("{{HABITS_NAV}}", HABITS_NAVIGATION_BUTTON)
        .replace("{{DATA_NAV}}", DATA_NAVIGATION_BUTTON)
        .replace("{{COPY}}", COPY_TO_CLIPBOARD_BUTTON)
        .replace("{{SAVE}}", CUSTOM_HABIT_SAVE_BUTTON)
        .replace("{{NOTIFICATIONS}}", &render_notifications(view.notifications))
        .replace("{{HABIT_BUTTONS}}", &render_habit_buttons(view.presets))
        .replace("{{EXPORT}}", &render_export(view.export))
        .replace("{{TABLE_ROWS}}", &render_table_rows(view.entries, &Local))
}

/// One button per preset, in table order, built as a single fragment.
pub fn render_habit_buttons(presets: &PresetHabits) -> String {
    let mut fragment = String::new();
    for preset in presets.iter() {
        let id = escape_html(&preset.button_id);
        fragment.push_str(&format!(
            r#"<button type="submit" id="{id}" name="target" value="{id}">{}</button>"#,
            escape_html(&preset.label)
        ));
        fragment.push('\n');
    }
    fragment
}

/// Rebuilds every row from the sorted records.
pub fn render_table_rows<Tz>(entries: &[HabitRecord], tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut fragment = String::new();
    for entry in entries {
        let delete_id = escape_html(&delete_button_id(&entry.id));
        let duplicate_id = escape_html(&duplicate_button_id(&entry.id));
        fragment.push_str(&format!(
            concat!(
                r#"<tr id="{id}"><td>{date}</td><td>{description}</td><td>"#,
                r#"<button type="submit" class="table_button" id="{delete}" name="target" value="{delete}">Delete</button>"#,
                r#"<button type="submit" class="table_button" id="{duplicate}" name="target" value="{duplicate}">Duplicate</button>"#,
                "</td></tr>\n"
            ),
            id = escape_html(&entry.id),
            date = escape_html(&format_table_timestamp(&entry.timestamp, tz)),
            description = escape_html(&entry.description),
            delete = delete_id,
            duplicate = duplicate_id,
        ));
    }
    fragment
}

fn render_export(export: Option<&str>) -> String {
    match export {
        Some(text) => format!(
            r#"<label for="EXPORT_OUTPUT">Copied markdown</label><textarea id="EXPORT_OUTPUT" readonly rows="10">{}</textarea>"#,
            escape_html(text)
        ),
        None => String::new(),
    }
}

fn render_notifications(notifications: &[Notification]) -> String {
    notifications
        .iter()
        .map(|notification| {
            format!(
                r#"<form method="post" action="/notifications/{tag}/click" class="notification"><button type="submit"><strong>{title}</strong> {body}</button></form>"#,
                tag = escape_html(&notification.tag),
                title = escape_html(&notification.title),
                body = escape_html(&notification.body),
            )
        })
        .collect()
}

/// Escapes markup and template braces in user text.
pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            '{' => escaped.push_str("&#123;"),
            '}' => escaped.push_str("&#125;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="nl">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <meta name="theme-color" content="#2f4858" />
  <title>Habit Tracker</title>
  <link rel="manifest" href="/manifest.json" />
  <link rel="icon" href="/favicon.svg" type="image/svg+xml" />
  <link rel="stylesheet" href="/custom.css" />
</head>
<body>
  <main class="app">
    <header>
      <h1>Habit Tracker</h1>
      {{NOTIFICATIONS}}
      <form method="post" action="/click" class="navigation">
        <input type="hidden" name="page" value="{{PAGE}}" />
        <button type="submit" id="{{HABITS_NAV}}" name="target" value="{{HABITS_NAV}}">Habits</button>
        <button type="submit" id="{{DATA_NAV}}" name="target" value="{{DATA_NAV}}">Data</button>
      </form>
    </header>

    <section id="{{HABITS_SECTION}}" style="content-visibility: {{HABITS_VISIBILITY}}">
      <form method="post" action="/click">
        <input type="hidden" name="page" value="{{PAGE}}" />
        <div id="HABIT_BUTTONS" class="habit-buttons">
{{HABIT_BUTTONS}}        </div>
      </form>
      <form method="post" action="/click" class="custom-habit">
        <input type="hidden" name="page" value="{{PAGE}}" />
        <textarea id="CUSTOM_HABIT_TEXT_AREA" name="text" rows="3" placeholder="Something else..."></textarea>
        <button type="submit" id="{{SAVE}}" name="target" value="{{SAVE}}">Save</button>
      </form>
    </section>

    <section id="{{DATA_SECTION}}" style="content-visibility: {{DATA_VISIBILITY}}">
      <form method="post" action="/click">
        <input type="hidden" name="page" value="{{PAGE}}" />
        <button type="submit" id="{{COPY}}" name="target" value="{{COPY}}">Copy as markdown</button>
        <table>
          <thead>
            <tr><th>Date</th><th>Habit</th><th></th></tr>
          </thead>
          <tbody id="HABIT_DATA_TABLE_BODY">
{{TABLE_ROWS}}          </tbody>
        </table>
      </form>
      {{EXPORT}}
    </section>
  </main>
</body>
</html>
"##;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifications::{NOTIFICATION_BODY, NOTIFICATION_TAG, NOTIFICATION_TITLE};
    use chrono::Utc;

    fn record(id: &str, description: &str) -> HabitRecord {
        HabitRecord {
            id: id.into(),
            timestamp: "2024-01-01T09:00:00.000Z".into(),
            description: description.into(),
        }
    }

    fn view<'a>(
        page: Page,
        presets: &'a PresetHabits,
        entries: &'a [HabitRecord],
    ) -> IndexView<'a> {
        IndexView {
            navigation: Navigation::new(page),
            presets,
            entries,
            export: None,
            notifications: &[],
        }
    }

    #[test]
    fn template_renders_to_the_end() {
        let presets = PresetHabits::from_labels(["Wakker"]);
        let html = render_index(&view(Page::Habits, &presets, &[]));
        assert!(html.contains(r##"<meta name="theme-color" content="#2f4858" />"##));
        assert!(html.contains(r#"<tbody id="HABIT_DATA_TABLE_BODY">"#));
        assert!(html.trim_end().ends_with("</html>"));
    }

    #[test]
    fn sections_follow_page() {
        let presets = PresetHabits::from_labels(["Wakker"]);
        let html = render_index(&view(Page::Data, &presets, &[]));
        assert!(html.contains(r#"id="HABITS_SECTION" style="content-visibility: hidden""#));
        assert!(html.contains(r#"id="DATA_SECTION" style="content-visibility: visible""#));
        assert!(html.contains(r#"name="page" value="data""#));
    }

    #[test]
    fn rendering_twice_is_stable() {
        let presets = PresetHabits::from_labels(["Wakker"]);
        let entries = [record("a", "Wakker")];
        let first = render_index(&view(Page::Habits, &presets, &entries));
        let second = render_index(&view(Page::Habits, &presets, &entries));
        assert_eq!(first, second);
    }

    #[test]
    fn buttons_cover_every_preset() {
        let presets = PresetHabits::from_labels(["Tas Koffie", "Tas Thee"]);
        let html = render_habit_buttons(&presets);
        for preset in presets.iter() {
            assert!(html.contains(&format!(r#"id="{}""#, preset.button_id)));
            assert!(html.contains(&format!(">{}</button>", preset.label)));
        }
    }

    #[test]
    fn rows_carry_action_buttons() {
        let rows = render_table_rows(&[record("abc", "Crossfit")], &Utc);
        assert!(rows.contains(r#"<tr id="abc">"#));
        assert!(rows.contains("<td>1-1-2024, 09:00:00</td>"));
        assert!(rows.contains(r#"id="DELETE_HABIT_BUTTON_abc""#));
        assert!(rows.contains(r#"id="DUPLICATE_HABIT_BUTTON_abc""#));
    }

    #[test]
    fn deleted_records_leave_no_row() {
        let remaining = [record("keep", "Magnesium")];
        let rows = render_table_rows(&remaining, &Utc);
        assert!(!rows.contains("gone"));
        assert_eq!(rows.matches("<tr ").count(), 1);
    }

    #[test]
    fn user_text_is_escaped() {
        let rows = render_table_rows(&[record("x", "<b>{{EXPORT}}</b>")], &Utc);
        assert!(rows.contains("&lt;b&gt;&#123;&#123;EXPORT&#125;&#125;&lt;/b&gt;"));
    }

    #[test]
    fn notifications_link_to_click_route() {
        let presets = PresetHabits::from_labels(Vec::<String>::new());
        let notifications = [Notification {
            title: NOTIFICATION_TITLE.into(),
            body: NOTIFICATION_BODY.into(),
            tag: NOTIFICATION_TAG.into(),
            vibrate: vec![],
        }];
        let html = render_index(&IndexView {
            navigation: Navigation::default(),
            presets: &presets,
            entries: &[],
            export: Some("| 2024-01-01 |"),
            notifications: &notifications,
        });
        assert!(html.contains(r#"action="/notifications/local-notification/click""#));
        assert!(html.contains(r#"<textarea id="EXPORT_OUTPUT" readonly rows="10">| 2024-01-01 |</textarea>"#));
    }
}

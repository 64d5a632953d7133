use crate::dates::{format_display, today};
use crate::history::{DEFAULT_HISTORY_DAYS, HistoryRow};
use crate::share::{ShareCard, streak_headline};
use crate::storage::BlobStore;
use crate::store::CheckInStore;
use std::fmt::Write;

pub fn render_index<B: BlobStore>(store: &CheckInStore<B>) -> String {
    let current = store.current_streak();
    let longest = store.longest_streak();
    let card = ShareCard::new(current, longest);

    let status = match store.today_check_in() {
        Some(check_in) => match &check_in.prayer_type {
            Some(prayer_type) => format!("Checked in today · {}", escape_html(&prayer_type.label())),
            None => "Checked in today".to_string(),
        },
        None => "Not checked in yet".to_string(),
    };

    INDEX_HTML
        .replace("{{DATE}}", &format_display(today()))
        .replace("{{HEADLINE}}", &streak_headline(current))
        .replace("{{CURRENT}}", &current.to_string())
        .replace("{{LONGEST}}", &card.longest_label)
        .replace("{{STATUS}}", &status)
        .replace("{{CHECKIN_DISABLED}}", if store.is_checked_in_today() { "disabled" } else { "" })
        .replace("{{TYPE_CHOICES}}", &type_choices(store))
        .replace("{{HISTORY}}", &history_rows(&store.calendar(DEFAULT_HISTORY_DAYS)))
        .replace("{{TYPE_SETTINGS}}", &type_settings(store))
}

fn type_choices<B: BlobStore>(store: &CheckInStore<B>) -> String {
    let mut html = String::from(
        r#"<label class="chip"><input type="radio" name="prayer_type" value="" checked /> None</label>"#,
    );
    for prayer_type in store.prayer_types() {
        let _ = write!(
            html,
            r#"<label class="chip"><input type="radio" name="prayer_type" value="{}" /> {}</label>"#,
            escape_html(prayer_type.as_str()),
            escape_html(&prayer_type.label()),
        );
    }
    html
}

fn history_rows(rows: &[HistoryRow]) -> String {
    let mut html = String::new();
    for row in rows {
        match row {
            HistoryRow::MonthHeader { month_year } => {
                let _ = write!(html, r#"<li class="month">{}</li>"#, escape_html(month_year));
            }
            HistoryRow::Day(day) => {
                let mark = if day.checked { "&#10003;" } else { "&#10005;" };
                let class = if day.checked { "day checked" } else { "day" };
                let tag = day.prayer_label.as_deref().unwrap_or("");
                let _ = write!(
                    html,
                    r#"<li class="{class}"><span>{}</span><span class="tag">{}</span><span class="mark">{mark}</span></li>"#,
                    escape_html(&day.display_date),
                    escape_html(tag),
                );
            }
        }
    }
    html
}

fn type_settings<B: BlobStore>(store: &CheckInStore<B>) -> String {
    let mut html = String::new();
    for prayer_type in store.prayer_types() {
        let _ = write!(
            html,
            r#"<li><span>{}</span><form method="post" action="/prayer-types/remove"><input type="hidden" name="name" value="{}" /><button class="link" type="submit">Remove</button></form></li>"#,
            escape_html(&prayer_type.label()),
            escape_html(prayer_type.as_str()),
        );
    }
    html
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Prayer Streaks</title>
  <style>
    :root {
      --bg: #f4efe6;
      --ink: #2b2a28;
      --accent: #6b4ea2;
      --muted: #8b857d;
      --card: #ffffff;
      --ok: #2d7a4b;
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      background: linear-gradient(160deg, var(--bg), #efe6f7);
      color: var(--ink);
      font-family: "Trebuchet MS", sans-serif;
      display: grid;
      place-items: center;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(720px, 100%);
      display: grid;
      gap: 20px;
    }

    section {
      background: var(--card);
      border-radius: 20px;
      padding: 24px;
      box-shadow: 0 16px 40px rgba(60, 40, 100, 0.12);
    }

    h1, h2 {
      margin: 0 0 8px;
    }

    .hero {
      font-size: 4rem;
      font-weight: 700;
      color: var(--accent);
      margin: 0;
    }

    .muted {
      color: var(--muted);
      margin: 4px 0;
    }

    .chips {
      display: flex;
      flex-wrap: wrap;
      gap: 8px;
      margin: 16px 0;
    }

    .chip {
      border: 1px solid rgba(107, 78, 162, 0.3);
      border-radius: 999px;
      padding: 6px 12px;
      cursor: pointer;
    }

    button {
      border: none;
      border-radius: 999px;
      padding: 12px 20px;
      font-weight: 600;
      background: var(--accent);
      color: white;
      cursor: pointer;
    }

    button:disabled {
      opacity: 0.5;
      cursor: default;
    }

    button.link {
      background: transparent;
      color: var(--accent);
      padding: 4px 8px;
    }

    button.danger {
      background: #c63b2b;
    }

    ul {
      list-style: none;
      padding: 0;
      margin: 0;
    }

    li {
      display: flex;
      justify-content: space-between;
      align-items: center;
      padding: 8px 4px;
      border-bottom: 1px solid rgba(0, 0, 0, 0.05);
    }

    li.month {
      font-weight: 700;
      color: var(--muted);
      text-transform: uppercase;
      letter-spacing: 0.08em;
      border-bottom: none;
      padding-top: 16px;
    }

    li.checked .mark {
      color: var(--ok);
    }

    .tag {
      color: var(--muted);
      flex: 1;
      text-align: right;
      margin-right: 12px;
    }

    form.inline {
      display: flex;
      gap: 8px;
      margin-top: 12px;
    }

    input[type="text"] {
      flex: 1;
      border-radius: 999px;
      border: 1px solid rgba(0, 0, 0, 0.15);
      padding: 10px 14px;
    }
  </style>
</head>
<body>
  <main class="app">
    <section>
      <p class="muted">{{DATE}}</p>
      <p class="hero">{{CURRENT}}</p>
      <h1>{{HEADLINE}}</h1>
      <p class="muted">{{LONGEST}}</p>
      <p>{{STATUS}}</p>
      <form method="post" action="/checkin">
        <div class="chips">{{TYPE_CHOICES}}</div>
        <button type="submit" {{CHECKIN_DISABLED}}>I prayed today</button>
      </form>
    </section>

    <section>
      <h2>History</h2>
      <ul>{{HISTORY}}</ul>
    </section>

    <section>
      <h2>Prayer types</h2>
      <ul>{{TYPE_SETTINGS}}</ul>
      <form class="inline" method="post" action="/prayer-types/add">
        <input type="text" name="name" placeholder="Add a prayer type" required />
        <button type="submit">Add</button>
      </form>
    </section>

    <section>
      <h2>Reset</h2>
      <p class="muted">This permanently deletes all check-ins and streaks.</p>
      <form method="post" action="/reset" onsubmit="return confirm('Reset all data?');">
        <button class="danger" type="submit">Reset all data</button>
      </form>
    </section>
  </main>
</body>
</html>
"#;

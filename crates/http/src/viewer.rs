//! HTML rendering for log pages and the login form.
//!
//! Message content comes from an upstream chat service and is treated as
//! untrusted: every interpolated value goes through [`escape_html`].

use std::fmt::Write as _;

use chatlog_core::{ChatRow, MessageKind, SessionGroup, TIMESTAMP_FORMAT, format_date};
use chatlog_service::{LogPage, PageBody};

const STYLE: &str = r#"
        body { font-family: Arial, sans-serif; margin: 20px; line-height: 1.6; }
        .pagination { margin: 20px 0; padding: 10px; background-color: #f8f9fa; border-radius: 5px; }
        .pagination a, .pagination strong { margin-right: 10px; text-decoration: none; padding: 5px 10px; }
        .pagination a { background-color: #e9ecef; border-radius: 3px; }
        .human { background-color: #e6f7ff; padding: 15px; margin: 10px 0; border-radius: 5px; border-left: 4px solid #1890ff; }
        .ai { background-color: #f0f0f0; padding: 15px; margin: 10px 0; border-radius: 5px; border-left: 4px solid #52c41a; }
        .unknown, .error { background-color: #fff2e8; padding: 15px; margin: 10px 0; border-radius: 5px; border-left: 4px solid #fa541c; }
        .timestamp { color: #666; font-size: 0.8em; }
        .session-header { font-weight: bold; font-size: 1.2em; margin-top: 20px; padding: 10px; background-color: #fafafa; border-bottom: 1px solid #ddd; }
        .content { white-space: pre-wrap; }
        .account { float: right; }
        hr { margin: 30px 0; border: 0; border-top: 1px dashed #ddd; }
        form.login { max-width: 320px; margin: 80px auto; padding: 20px; background-color: #f8f9fa; border-radius: 5px; }
        form.login label, form.login input { display: block; width: 100%; margin-bottom: 10px; }
"#;

/// Escape text for use in HTML element content and double-quoted attributes.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            other => out.push(other),
        }
    }
    out
}

/// One message block; a payload that cannot be decoded yields an error block.
#[must_use]
pub fn render_message(row: &ChatRow) -> String {
    let message = match row.parse_message() {
        Ok(message) => message,
        Err(e) => {
            return format!(
                r#"<div class="error">Error parsing log: {}</div>"#,
                escape_html(&e.to_string())
            );
        },
    };
    let label = match &message.kind {
        MessageKind::Human => "Human:".to_owned(),
        MessageKind::Ai => "AI:".to_owned(),
        MessageKind::Unknown(kind) => format!("Unknown ({}):", escape_html(kind)),
    };
    format!(
        r#"<div class="{class}"><span class="timestamp">{ts}</span><br><strong>{label}</strong><br><div class="content">{content}</div></div>"#,
        class = message.kind.css_class(),
        ts = row.created_at.format(TIMESTAMP_FORMAT),
        content = escape_html(&message.content),
    )
}

/// Session headers followed by their message blocks, one `<hr>` per session.
#[must_use]
pub fn render_sessions(groups: &[SessionGroup]) -> String {
    let mut html = String::new();
    for group in groups {
        let _ = writeln!(
            html,
            r#"<div class="session-header">Session ID: {}</div>"#,
            escape_html(&group.session_id)
        );
        for row in &group.rows {
            html.push_str(&render_message(row));
            html.push('\n');
        }
        html.push_str("<hr>\n");
    }
    html
}

/// Inputs of a full log page.
pub struct PageContext<'a> {
    pub title: &'a str,
    pub refresh_secs: u64,
    pub page: &'a LogPage,
    /// Path the pagination links point at (`/` or `/logs/{scope}`).
    pub base_path: &'a str,
    /// Logged-in user, shown with a logout link.
    pub user: Option<&'a str>,
}

fn render_pagination(ctx: &PageContext<'_>) -> String {
    let mut html = String::from(r#"<div class="pagination">"#);
    for date in &ctx.page.pagination {
        let label = format_date(*date);
        if *date == ctx.page.date {
            let _ = write!(html, "<strong>{label}</strong>");
        } else {
            let _ = write!(
                html,
                r#"<a href="{}?date={label}">{label}</a>"#,
                escape_html(ctx.base_path)
            );
        }
    }
    html.push_str("</div>");
    html
}

#[must_use]
pub fn render_log_page(ctx: &PageContext<'_>) -> String {
    let body = match &ctx.page.body {
        PageBody::Sessions(groups) => render_sessions(groups),
        PageBody::Error(message) => {
            format!(r#"<div class="error">{}</div>"#, escape_html(message))
        },
    };
    let account = ctx.user.map_or_else(String::new, |user| {
        format!(
            r#"<div class="account">Logged in as {} · <a href="/logout">Log out</a></div>"#,
            escape_html(user)
        )
    });
    let title = escape_html(ctx.title);
    let date = format_date(ctx.page.date);
    format!(
        r#"<!DOCTYPE html>
<html>
    <head>
        <title>{title}</title>
        <meta charset="utf-8">
        <meta name="viewport" content="width=device-width, initial-scale=1">
        <meta http-equiv="refresh" content="{refresh}">
        <style>{STYLE}</style>
    </head>
    <body>
        {account}
        <h1>{title} for {date}</h1>
        {pagination}
        <div class="logs">{body}</div>
    </body>
</html>
"#,
        refresh = ctx.refresh_secs,
        pagination = render_pagination(ctx),
    )
}

#[must_use]
pub fn render_login_page(title: &str, failed: bool) -> String {
    let error = if failed {
        r#"<div class="error">Invalid username or password</div>"#
    } else {
        ""
    };
    let title = escape_html(title);
    format!(
        r#"<!DOCTYPE html>
<html>
    <head>
        <title>{title} · Login</title>
        <meta charset="utf-8">
        <meta name="viewport" content="width=device-width, initial-scale=1">
        <style>{STYLE}</style>
    </head>
    <body>
        <form class="login" method="post" action="/login">
            <h1>{title}</h1>
            {error}
            <label for="username">Username</label>
            <input id="username" name="username" type="text" autocomplete="username" required>
            <label for="password">Password</label>
            <input id="password" name="password" type="password" autocomplete="current-password" required>
            <input type="submit" value="Log in">
        </form>
    </body>
</html>
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};
    use serde_json::{Value, json};

    fn at(h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 3).unwrap().and_hms_opt(h, 4, 5).unwrap()
    }

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&amp;&#x27;&lt;/a&gt;"
        );
        assert_eq!(escape_html("plain text"), "plain text");
    }

    #[test]
    fn test_human_block_contains_content() {
        let row = ChatRow::new("s", json!({"type": "human", "content": "How are you?"}), at(9));
        let html = render_message(&row);
        assert!(html.starts_with(r#"<div class="human">"#));
        assert!(html.contains("2024-01-03 09:04:05"));
        assert!(html.contains("<strong>Human:</strong>"));
        assert!(html.contains("How are you?"));
    }

    #[test]
    fn test_ai_block() {
        let row = ChatRow::new("s", json!({"type": "ai", "content": "Fine."}), at(9));
        let html = render_message(&row);
        assert!(html.starts_with(r#"<div class="ai">"#));
        assert!(html.contains("<strong>AI:</strong>"));
    }

    #[test]
    fn test_unknown_block_names_type() {
        let row = ChatRow::new("s", json!({"type": "system", "content": "boot"}), at(9));
        assert!(render_message(&row).contains("<strong>Unknown (system):</strong>"));

        let row = ChatRow::new("s", json!({"content": "no type"}), at(9));
        let html = render_message(&row);
        assert!(html.starts_with(r#"<div class="unknown">"#));
        assert!(html.contains("Unknown (unknown):"));
    }

    #[test]
    fn test_content_is_escaped() {
        let row = ChatRow::new(
            "s",
            json!({"type": "human", "content": "<script>alert(1)</script>"}),
            at(9),
        );
        let html = render_message(&row);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    }

    #[test]
    fn test_malformed_message_is_error_block_and_siblings_render() {
        let group = SessionGroup {
            session_id: "s1".to_owned(),
            rows: vec![
                ChatRow::new("s1", json!({"type": "human", "content": "before"}), at(8)),
                ChatRow::new("s1", Value::String("{oops".to_owned()), at(9)),
                ChatRow::new("s1", json!({"type": "ai", "content": "after"}), at(10)),
            ],
        };
        let html = render_sessions(&[group]);
        assert!(html.contains(r#"<div class="error">Error parsing log: invalid JSON"#));
        assert!(html.contains("before"));
        assert!(html.contains("after"));
        assert_eq!(html.matches("<hr>").count(), 1);
    }

    #[test]
    fn test_session_header_per_group() {
        let groups = vec![
            SessionGroup { session_id: "a<b".to_owned(), rows: Vec::new() },
            SessionGroup { session_id: "c".to_owned(), rows: Vec::new() },
        ];
        let html = render_sessions(&groups);
        assert!(html.contains("Session ID: a&lt;b</div>"));
        assert!(html.contains("Session ID: c</div>"));
        assert_eq!(html.matches("<hr>").count(), 2);
    }

    #[test]
    fn test_log_page_pagination_and_refresh() {
        let page = LogPage {
            date: d(2),
            pagination: vec![d(3), d(2), d(1)],
            body: PageBody::Sessions(Vec::new()),
        };
        let ctx = PageContext {
            title: "Chat Logs",
            refresh_secs: 60,
            page: &page,
            base_path: "/logs/alpha",
            user: Some("ann"),
        };
        let html = render_log_page(&ctx);
        assert!(html.contains(r#"<meta http-equiv="refresh" content="60">"#));
        assert!(html.contains("<h1>Chat Logs for 2024-01-02</h1>"));
        assert!(html.contains("<strong>2024-01-02</strong>"));
        assert!(html.contains(r#"<a href="/logs/alpha?date=2024-01-03">2024-01-03</a>"#));
        assert!(html.contains(r#"<a href="/logs/alpha?date=2024-01-01">2024-01-01</a>"#));
        assert!(!html.contains(r#"?date=2024-01-02""#));
        assert!(html.contains(r#"<a href="/logout">"#));
    }

    #[test]
    fn test_log_page_error_body() {
        let page = LogPage {
            date: d(5),
            pagination: vec![d(5)],
            body: PageBody::Error("Error connecting to database".to_owned()),
        };
        let ctx =
            PageContext { title: "Logs", refresh_secs: 30, page: &page, base_path: "/", user: None };
        let html = render_log_page(&ctx);
        assert!(html.contains(r#"<div class="error">Error connecting to database</div>"#));
        assert!(html.contains("<strong>2024-01-05</strong>"));
        assert!(!html.contains("/logout"));
    }

    #[test]
    fn test_login_page_error_flag() {
        assert!(!render_login_page("Logs", false).contains("Invalid username or password"));
        let html = render_login_page("Logs", true);
        assert!(html.contains("Invalid username or password"));
        assert!(html.contains(r#"action="/login""#));
    }
}

//! Rendering for notification messages and emails: plain text, and HTML through Askama
//! with the SCSS stylesheet inlined.

use askama::Template;
use once_cell::sync::Lazy;
use time::Date;

use crate::entity::DocumentKind;

/// The email stylesheet compiled from SCSS. `None` if it failed to compile, in which case
/// emails go out unstyled.
static COMPILED_CSS: Lazy<Option<String>> = Lazy::new(|| {
    let scss = include_str!("../styles/email.scss");
    match grass::from_string(scss.to_string(), &grass::Options::default()) {
        Ok(css) => Some(css),
        Err(e) => {
            tracing::error!(
                name = "email.compile_css.failed",
                target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
                error = %e,
                message = "Failed to compile email stylesheet"
            );
            None
        }
    }
});

#[tracing::instrument(skip(html))]
fn inline_css(html: &str) -> String {
    let Some(css) = COMPILED_CSS.as_deref() else {
        return html.to_string();
    };
    let options = css_inline::InlineOptions {
        load_remote_stylesheets: false,
        ..css_inline::InlineOptions::default()
    };
    let inliner = css_inline::CSSInliner::new(options);

    let html_with_style = html.replace("</head>", &format!("<style>{css}</style></head>"));
    match inliner.inline(&html_with_style) {
        Ok(inlined) => inlined,
        Err(e) => {
            tracing::error!(
                name = "email.inline_css.failed",
                target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
                error = ?e,
                message = "Failed to inline CSS"
            );
            html.to_string()
        }
    }
}

fn days(n: i64) -> String {
    if n == 1 {
        "1 day".to_string()
    } else {
        format!("{n} days")
    }
}

/// The subject and short message stored on a notification row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationText {
    pub subject: String,
    pub message: String,
}

/// Everything needed to describe one document approaching or past its due date.
#[derive(Debug, Clone)]
pub struct NotificationTemplate<'a> {
    pub kind: DocumentKind,
    pub title: &'a str,
    pub owner_name: &'a str,
    pub due_date: Date,
    pub days_remaining: i64,
}

impl NotificationTemplate<'_> {
    fn is_certificate(&self) -> bool {
        matches!(
            self.kind,
            DocumentKind::CrewCertificate | DocumentKind::VesselCertificate
        )
    }

    #[tracing::instrument(skip(self))]
    pub fn subject(&self) -> String {
        let label = self.kind.label();
        match (self.is_certificate(), self.days_remaining <= 0) {
            (true, false) => format!("Certificate Expiry Alert: {}", self.title),
            (true, true) => format!("Certificate Expired: {}", self.title),
            (false, false) => format!("{label} Due Soon: {}", self.title),
            (false, true) => format!("{label} Overdue: {}", self.title),
        }
    }

    #[tracing::instrument(skip(self))]
    pub fn message(&self) -> String {
        let head = format!(
            "{} '{}' for {}",
            self.kind.label(),
            self.title,
            self.owner_name
        );
        let due = self.due_date;
        let d = self.days_remaining;
        if self.is_certificate() {
            match d {
                1.. => format!("{head} will expire in {} on {due}.", days(d)),
                0 => format!("{head} expires today ({due})."),
                _ => format!("{head} expired {} ago on {due}.", days(-d)),
            }
        } else {
            match d {
                1.. => format!("{head} is due in {} on {due}.", days(d)),
                0 => format!("{head} is due today ({due})."),
                _ => format!("{head} is overdue by {}. It was due on {due}.", days(-d)),
            }
        }
    }

    pub fn render(&self) -> NotificationText {
        NotificationText {
            subject: self.subject(),
            message: self.message(),
        }
    }
}

/// Body of the email sent for a stored notification.
#[derive(Template)]
#[template(path = "notification_email.html")]
pub struct NotificationEmailTemplate<'a> {
    pub subject: &'a str,
    pub message: &'a str,
    pub kind: DocumentKind,
    pub document_id: i32,
    pub frontend_url: &'a str,
}

impl NotificationEmailTemplate<'_> {
    pub fn document_url(&self) -> String {
        format!(
            "{}/documents/{}/{}",
            self.frontend_url.trim_end_matches('/'),
            self.kind,
            self.document_id
        )
    }

    #[tracing::instrument(skip(self))]
    pub fn render_html(&self) -> Result<String, askama::Error> {
        let html = self.render()?;
        Ok(inline_css(&html))
    }

    #[tracing::instrument(skip(self))]
    pub fn render_text(&self) -> String {
        format!(
            r#"Hello,

{}

Review the record and upload a renewal or completion at {}

You will keep receiving reminders at each configured threshold until the record is renewed, completed or the notification is acknowledged.

Best regards,
Fleet Compliance"#,
            self.message,
            self.document_url()
        )
    }
}

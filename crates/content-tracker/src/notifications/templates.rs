//! HTML bodies for the outbound e-mails.
//!
//! Every renderer is a pure function of already computed statistics so the
//! wording can be tested without a store or a transport.

use std::fmt::Write as _;

use crate::config::MailConfig;
use crate::tracker::domain::MonthKey;
use crate::tracker::stats::{Comeback, GoalProgress, LeaderboardEntry, Standings};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEmail {
    pub subject: String,
    pub html: String,
}

const WRAPPER_OPEN: &str =
    r#"<div style="font-family: sans-serif; color: #333; max-width: 600px; margin: 0 auto;">"#;
const WRAPPER_CLOSE: &str = "</div>";

/// Personal reminder with the recipient's yearly count and streak.
pub fn reminder(
    name: &str,
    month: MonthKey,
    yearly_published: usize,
    streak: u32,
    config: &MailConfig,
) -> RenderedEmail {
    let streak_line = if streak > 0 {
        format!(
            "<p>You are on a <strong>{streak}-month streak</strong>. Keep it alive this month!</p>"
        )
    } else {
        "<p>Your streak is at 0 months. A good month to start one?</p>".to_string()
    };

    let html = format!(
        "{WRAPPER_OPEN}\
         <h2>Hi {name}</h2>\
         <p>Time to write a contribution for the website.</p>\
         <div style=\"background: #f9f9f9; padding: 15px; border-radius: 8px;\">\
         <p>You have published <strong>{yearly_published}</strong> contributions this year.</p>\
         {streak_line}\
         </div>\
         <p>Log in to the <a href=\"{url}\">Content Tracker</a> to register your progress.</p>\
         <p style=\"font-size: 12px; color: #999;\">This is an automated reminder.</p>\
         {WRAPPER_CLOSE}",
        name = escape_html(name),
        url = config.dashboard_url,
    );

    RenderedEmail {
        subject: format!("Your status for {}", month.name()),
        html,
    }
}

/// Team-wide report: YTD and month progress, leaderboard, and comebacks.
pub fn team_status(
    month: MonthKey,
    year_to_date: GoalProgress,
    this_month: GoalProgress,
    standings: &Standings,
    comebacks: &[Comeback],
    on_schedule: bool,
    config: &MailConfig,
) -> RenderedEmail {
    let mut html = String::from(WRAPPER_OPEN);
    html.push_str("<h2>Hi team!</h2>");
    if on_schedule {
        html.push_str(
            "<p>It is the first Tuesday of the month: time for this month's website \
             contribution (one per person).</p>",
        );
    } else {
        html.push_str(
            "<p>Here is where the team stands on website contributions \
             (one per person each month).</p>",
        );
    }

    let _ = write!(
        html,
        "<h3>Year to date</h3><ul><li>Published: <strong>{} / {}</strong> ({}%)</li></ul>",
        year_to_date.published, year_to_date.goal, year_to_date.percent
    );
    let _ = write!(
        html,
        "<h3>This month ({})</h3><ul><li>Goal: <strong>{}</strong> contributions (one per person)</li>\
         <li>So far: <strong>{} / {}</strong></li></ul>",
        month.name(),
        this_month.goal,
        this_month.published,
        this_month.goal
    );

    html.push_str(&standings_section(standings));

    if !comebacks.is_empty() {
        html.push_str("<h3>Honorable mentions</h3><ul>");
        for comeback in comebacks {
            let _ = write!(
                html,
                "<li>Welcome back, <strong>{}</strong>! First publication in {} months.</li>",
                escape_html(&comeback.name),
                comeback.months_away
            );
        }
        html.push_str("</ul>");
    }

    let _ = write!(
        html,
        "<p>Register your contribution in the <a href=\"{}\">dashboard</a> once you get going.</p>\
         <p>Thanks for building visibility together!<br/>- Content Tracker</p>",
        config.dashboard_url
    );
    html.push_str(WRAPPER_CLOSE);

    RenderedEmail {
        subject: format!("Team status: {}", month.name()),
        html,
    }
}

fn standings_section(standings: &Standings) -> String {
    match standings {
        Standings::NoPublications => {
            "<h3>Leaderboard</h3><p>Nobody has published yet this year. The podium is wide open.</p>"
                .to_string()
        }
        Standings::Tied { published, leaders } => {
            let names = join_names(leaders);
            format!(
                "<h3>Leaderboard</h3><p>It's a tie! {names} share the lead with \
                 <strong>{published}</strong> published each.</p>"
            )
        }
        Standings::Podium { entries } => {
            let mut section = String::from("<h3>Leaderboard</h3><ol>");
            for entry in entries {
                let _ = write!(
                    section,
                    "<li>#{} {} ({} published)</li>",
                    entry.rank,
                    escape_html(&entry.name),
                    entry.published
                );
            }
            section.push_str("</ol>");
            section
        }
    }
}

fn join_names(entries: &[LeaderboardEntry]) -> String {
    let names: Vec<String> = entries.iter().map(|e| escape_html(&e.name)).collect();
    match names.split_last() {
        Some((last, rest)) if !rest.is_empty() => format!("{} and {}", rest.join(", "), last),
        Some((last, _)) => last.clone(),
        None => String::new(),
    }
}

/// Tells the team lead that something new went live.
pub fn publication_notice(
    title: Option<&str>,
    author: Option<&str>,
    config: &MailConfig,
) -> RenderedEmail {
    let what = match (title, author) {
        (Some(title), Some(author)) => format!(
            "<strong>{}</strong> just published <em>{}</em> on the website.",
            escape_html(author),
            escape_html(title)
        ),
        (Some(title), None) => format!(
            "Someone just published <em>{}</em> on the website.",
            escape_html(title)
        ),
        _ => "Someone just <strong>published new content on the website</strong>.".to_string(),
    };

    RenderedEmail {
        subject: "New content published - Instagram next!".to_string(),
        html: format!(
            "{WRAPPER_OPEN}<h2>Heads up</h2><p>{what}</p>\
             <p>Take a look and share it on Instagram when it suits you.</p>\
             <p><a href=\"{url}\">Open the dashboard</a></p><p>- Content Tracker</p>{WRAPPER_CLOSE}",
            url = config.dashboard_url,
        ),
    }
}

/// One-off announcement introducing the dashboard to the team.
pub fn launch_announcement(config: &MailConfig) -> RenderedEmail {
    RenderedEmail {
        subject: "Website content - overview".to_string(),
        html: format!(
            "{WRAPPER_OPEN}<h2>Hi everyone!</h2>\
             <p>There is now a shared overview that should make it easier (and more fun) to \
             deliver steady content to the website.</p>\
             <p>The idea is <strong>one contribution per person per month</strong> \
             (an article or a customer story).</p>\
             <h3>How it works</h3><ul>\
             <li>When you publish something, register it in the overview.</li>\
             <li>You get two e-mails a month: a small reminder, and a status on how the team is doing.</li>\
             </ul>\
             <p>Find the overview here: <a href=\"{url}/login\">Content Dashboard</a>. \
             Ask your team lead for the password.</p>\
             <p>Questions or ideas? Let us know!</p>{WRAPPER_CLOSE}",
            url = config.dashboard_url,
        ),
    }
}

/// Gentle nudge for someone who has not published this year.
pub fn gentle_nudge(name: Option<&str>, yearly_published: usize, streak: u32, config: &MailConfig) -> RenderedEmail {
    let greeting = match name {
        Some(name) => format!("Hi {}", escape_html(name)),
        None => "Hi there".to_string(),
    };
    let progress = if yearly_published == 0 {
        "So far this year you have not registered any contributions, and that is fine, \
         but maybe this month is the month?"
            .to_string()
    } else {
        format!("So far this year you have published {yearly_published} contributions.")
    };

    RenderedEmail {
        subject: "Maybe time to write something for the website?".to_string(),
        html: format!(
            "{WRAPPER_OPEN}<h2>{greeting}</h2><p>A small reminder about our website!</p>\
             <div style=\"background: #f9f9f9; padding: 15px; border-radius: 8px;\">\
             <p>{progress}</p><p>Your streak is at <strong>{streak} months</strong> right now.</p>\
             </div>\
             <p>Log in to the <a href=\"{url}\">Content Tracker</a> and register when you have \
             posted something.</p><p>- Content Tracker</p>{WRAPPER_CLOSE}",
            url = config.dashboard_url,
        ),
    }
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

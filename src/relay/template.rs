use regex::Regex;
use std::sync::LazyLock;

use super::Notification;

static TEMPLATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*(\w+)\s*\}\}").unwrap());

/// Replace {{field}} placeholders with values from the notification.
pub fn render(template: &str, notification: &Notification) -> String {
    TEMPLATE_RE
        .replace_all(template, |caps: &regex::Captures| {
            resolve(&caps[1], notification).unwrap_or_default()
        })
        .to_string()
}

fn resolve(key: &str, notification: &Notification) -> Option<String> {
    match key {
        "driveLink" => notification.link().map(str::to_string),
        _ => notification.get(key).map(str::to_string),
    }
}

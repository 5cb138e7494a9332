//! Built-in presets and shortcuts, seeded from code on every load

use super::models::{Preset, Shortcut};
use crate::query::TagLists;
use chrono::{DateTime, Utc};

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

/// Built-ins carry the epoch as creation time so re-seeding is stable
fn seeded_at() -> DateTime<Utc> {
    DateTime::<Utc>::default()
}

fn preset(id: &str, name: &str, description: &str, query: &str, tags: TagLists) -> Preset {
    Preset {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        query: query.to_string(),
        tags,
        is_favorite: false,
        created_at: seeded_at(),
    }
}

/// The immutable built-in preset catalog
pub fn builtin_presets() -> Vec<Preset> {
    vec![
        preset(
            "builtin-documents",
            "Public documents",
            "Office documents and PDFs",
            "",
            TagLists {
                file_types: strings(&["pdf", "doc", "docx", "xls", "xlsx", "ppt"]),
                ..Default::default()
            },
        ),
        preset(
            "builtin-directory-listing",
            "Open directory listings",
            "Web server index pages",
            "",
            TagLists {
                words_in_title: strings(&["index of"]),
                exclude_words: strings(&["html", "htm", "php"]),
                ..Default::default()
            },
        ),
        preset(
            "builtin-login-pages",
            "Login pages",
            "Sign-in and admin portals",
            "",
            TagLists {
                words_in_title: strings(&["login", "sign in"]),
                words_in_url: strings(&["login", "admin"]),
                ..Default::default()
            },
        ),
        preset(
            "builtin-government",
            "Government sources",
            "Results restricted to government domains",
            "",
            TagLists {
                sites: strings(&["gov", "gov.uk", "europa.eu"]),
                ..Default::default()
            },
        ),
        preset(
            "builtin-academic",
            "Academic papers",
            "Papers from universities and preprint servers",
            "",
            TagLists {
                sites: strings(&["edu", "arxiv.org", "researchgate.net"]),
                file_types: strings(&["pdf"]),
                ..Default::default()
            },
        ),
        preset(
            "builtin-config-files",
            "Exposed configuration",
            "Configuration and environment files",
            "",
            TagLists {
                file_types: strings(&["env", "ini", "conf", "yml"]),
                exclude_sites: strings(&["github.com", "gitlab.com"]),
                ..Default::default()
            },
        ),
        preset(
            "builtin-no-social",
            "No social media",
            "Hide the large social networks",
            "",
            TagLists {
                exclude_sites: strings(&[
                    "facebook.com",
                    "twitter.com",
                    "x.com",
                    "instagram.com",
                    "pinterest.com",
                    "tiktok.com",
                ]),
                ..Default::default()
            },
        ),
    ]
}

fn shortcut(id: &str, name: &str, description: &str, operators: &[&str]) -> Shortcut {
    Shortcut {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        query: None,
        tags: TagLists::default(),
        operators: strings(operators),
    }
}

/// The built-in additive shortcuts
pub fn builtin_shortcuts() -> Vec<Shortcut> {
    vec![
        Shortcut {
            tags: TagLists {
                file_types: strings(&["pdf"]),
                ..Default::default()
            },
            ..shortcut("shortcut-pdf", "PDF only", "Restrict to PDF files", &[])
        },
        Shortcut {
            tags: TagLists {
                sites: strings(&["reddit.com"]),
                ..Default::default()
            },
            ..shortcut("shortcut-reddit", "Reddit", "Search Reddit threads", &[])
        },
        Shortcut {
            tags: TagLists {
                sites: strings(&["stackoverflow.com", "github.com"]),
                ..Default::default()
            },
            ..shortcut("shortcut-code", "Code hosts", "Stack Overflow and GitHub", &[])
        },
        shortcut(
            "shortcut-index-of",
            "Index of",
            "Directory listings",
            &[r#"intitle:"index of""#],
        ),
        shortcut(
            "shortcut-admin",
            "Admin URLs",
            "Admin paths in the URL",
            &["inurl:admin"],
        ),
        shortcut(
            "shortcut-no-pinterest",
            "No Pinterest",
            "Exclude Pinterest",
            &["-site:pinterest.com"],
        ),
        Shortcut {
            query: Some("\"password\"".to_string()),
            ..shortcut(
                "shortcut-password-files",
                "Password files",
                "Text and log files mentioning passwords",
                &["ext:txt", "ext:log"],
            )
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_builtin_ids_are_unique() {
        let presets = builtin_presets();
        let ids: HashSet<_> = presets.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids.len(), presets.len());

        let shortcuts = builtin_shortcuts();
        let ids: HashSet<_> = shortcuts.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids.len(), shortcuts.len());
    }

    #[test]
    fn test_shortcut_operators_are_parseable() {
        for shortcut in builtin_shortcuts() {
            for op in &shortcut.operators {
                assert!(
                    crate::query::parse_operator(op).is_some(),
                    "{} carries unparseable operator {}",
                    shortcut.id,
                    op
                );
            }
        }
    }
}

//! Message templates with `{name}` placeholders.

use crate::error::TemplateError;
use chrono::Local;
use serde::Deserialize;
use std::collections::HashMap;

/// Company name rendered when neither the caller nor the template defaults
/// supply one.
pub const DEFAULT_COMPANY_NAME: &str = "Your Company";

/// A message body with `{name}` placeholders.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct MessageTemplate {
    content: String,
    #[serde(skip)]
    defaults: HashMap<String, String>,
}

impl MessageTemplate {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            defaults: HashMap::new(),
        }
    }

    /// Value used for `key` when the render context has none.
    pub fn with_default(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.defaults.insert(key.into(), value.into());
        self
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Placeholder names in order of first appearance.
    pub fn variables(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for (_, name) in placeholders(&self.content) {
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }

    /// Fail if any placeholder is not in `available`.
    pub fn validate(&self, available: &[&str]) -> Result<(), TemplateError> {
        let unsupported: Vec<String> = self
            .variables()
            .into_iter()
            .filter(|name| !available.contains(name))
            .map(str::to_string)
            .collect();

        if unsupported.is_empty() {
            Ok(())
        } else {
            Err(TemplateError::Unsupported {
                unsupported,
                available: available.iter().map(|s| s.to_string()).collect(),
            })
        }
    }

    /// Substitute placeholders from `context`.
    ///
    /// Lookup order is `context`, then the template defaults, then the
    /// built-ins: `company_name`, and `date` / `datetime` from the current
    /// local time. Placeholders without a value are left as written.
    /// Substituted values are not scanned again.
    pub fn render(&self, context: &HashMap<String, String>) -> String {
        let now = Local::now();
        let date = now.format("%d/%m/%Y").to_string();
        let datetime = now.format("%d/%m/%Y %H:%M").to_string();

        let lookup = |name: &str| -> Option<String> {
            context
                .get(name)
                .or_else(|| self.defaults.get(name))
                .cloned()
                .or_else(|| match name {
                    "company_name" => Some(DEFAULT_COMPANY_NAME.to_string()),
                    "date" => Some(date.clone()),
                    "datetime" => Some(datetime.clone()),
                    _ => None,
                })
        };

        let mut rendered = String::with_capacity(self.content.len());
        let mut cursor = 0;
        for (start, name) in placeholders(&self.content) {
            if let Some(value) = lookup(name) {
                rendered.push_str(&self.content[cursor..start]);
                rendered.push_str(&value);
                cursor = start + name.len() + 2;
            }
        }
        rendered.push_str(&self.content[cursor..]);
        rendered
    }
}

/// `(offset of '{', name)` for each non-empty `{name}` in `content`.
fn placeholders(content: &str) -> Vec<(usize, &str)> {
    let mut found = Vec::new();
    let mut pos = 0;

    while let Some(open) = content[pos..].find('{').map(|i| pos + i) {
        let Some(close) = content[open + 1..].find('}').map(|i| open + 1 + i) else {
            break;
        };
        if close == open + 1 {
            pos = open + 1;
            continue;
        }
        found.push((open, &content[open + 1..close]));
        pos = close + 1;
    }

    found
}

use core_roster::{Result, RosterError, UserMapping};

/// Direct message text with `{name}`, `{first_name}`, `{tag}` and
/// `{user_id}` placeholders. Unknown `{...}` tokens pass through untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageTemplate {
    text: String,
}

impl MessageTemplate {
    pub fn parse(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Err(RosterError::validation("message template is empty"));
        }
        Ok(Self {
            text: text.to_string(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn render(&self, mapping: &UserMapping) -> String {
        let mut out = String::with_capacity(self.text.len());
        let mut rest = self.text.as_str();

        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let Some(close) = after.find('}') else {
                out.push_str(&rest[open..]);
                return out;
            };
            let key = &after[..close];
            match placeholder(key, mapping) {
                Some(value) => out.push_str(value),
                None => {
                    out.push('{');
                    out.push_str(key);
                    out.push('}');
                }
            }
            rest = &after[close + 1..];
        }
        out.push_str(rest);
        out
    }
}

fn placeholder<'m>(key: &str, mapping: &'m UserMapping) -> Option<&'m str> {
    match key.trim() {
        "name" => Some(mapping.real_name.as_str()),
        "first_name" => Some(mapping.first_name()),
        "tag" => Some(mapping.slack_tag.as_str()),
        "user_id" => Some(mapping.user_id.as_str()),
        _ => None,
    }
}

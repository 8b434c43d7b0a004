use super::escape_markup;

/// Username as accepted for storage: trimmed, non-empty, markup escaped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Username(String);

impl TryFrom<&str> for Username {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            anyhow::bail!("Username is required");
        }
        Ok(Self(escape_markup(trimmed)))
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl Username {
    pub fn into_inner(self) -> String {
        self.0
    }
}

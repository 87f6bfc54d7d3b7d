#[derive(Clone, Debug)]
pub struct UserId(String);

impl UserId {
    /// Returns a `UserId` if the input is a usable recipient id, i.e. not
    /// empty and not whitespace only.
    pub fn parse(s: String) -> Result<UserId, String> {
        if s.trim().is_empty() {
            Err(format!("{:?} is not a valid recipient user id.", s))
        } else {
            Ok(UserId(s))
        }
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

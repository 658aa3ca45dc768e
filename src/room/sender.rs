use std::fmt;

/// Originator of a received message.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Sender {
    /// Fully qualified Matrix user ID, e.g. `@alice:example.org`.
    user_id: String,
    /// Name shown for the user.
    username: String,
}

impl Sender {
    pub fn new(user_id: &str, username: &str) -> Self {
        Sender {
            user_id: user_id.to_owned(),
            username: username.to_owned(),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn username(&self) -> &str {
        &self.username
    }
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "user_id={}, username={}", self.user_id, self.username)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sender_display() {
        let sender = Sender::new("@alice:example.org", "alice");

        assert_eq!(sender.user_id(), "@alice:example.org");
        assert_eq!(sender.username(), "alice");
        assert_eq!(
            format!("{}", sender),
            "user_id=@alice:example.org, username=alice"
        );
    }
}

use chrono::{DateTime, Utc};

/// Author of a transcript turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    User,
    Bot,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Bot => "bot",
        }
    }

    pub fn is_user(self) -> bool {
        self == Role::User
    }

    pub fn is_bot(self) -> bool {
        self == Role::Bot
    }
}

impl AsRef<str> for Role {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl TryFrom<&str> for Role {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "user" => Ok(Role::User),
            "bot" => Ok(Role::Bot),
            _ => Err(format!("invalid transcript role: {value}")),
        }
    }
}

/// Identifier of a transcript turn. Allocated by the conversation store;
/// unique and strictly increasing within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MessageId(pub u64);

/// One turn of the transcript. Immutable once appended; the content of bot
/// turns may contain markdown with fenced code blocks.
#[derive(Debug, Clone)]
pub struct Message {
    pub id: MessageId,
    pub role: Role,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Message {
    pub(crate) fn new(id: MessageId, role: Role, content: impl Into<String>) -> Self {
        Self {
            id,
            role,
            content: content.into(),
            created_at: Utc::now(),
        }
    }

    pub fn is_user(&self) -> bool {
        self.role.is_user()
    }

    pub fn is_bot(&self) -> bool {
        self.role.is_bot()
    }
}

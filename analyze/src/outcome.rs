use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

/// Result of an analyzer that ran to completion.
///
/// Not enough usable input is an expected, user-facing outcome rather than
/// an error.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Ready(T),
    Insufficient(String),
}

impl<T> Outcome<T> {
    pub fn insufficient(message: impl Into<String>) -> Self {
        Self::Insufficient(message.into())
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(v) => Some(v),
            Self::Insufficient(_) => None,
        }
    }

    pub fn into_ready(self) -> Option<T> {
        match self {
            Self::Ready(v) => Some(v),
            Self::Insufficient(_) => None,
        }
    }

    /// The insufficiency message, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Ready(_) => None,
            Self::Insufficient(m) => Some(m),
        }
    }
}

impl<T: Serialize> Serialize for Outcome<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Ready<'a, T> {
            ok: bool,
            #[serde(flatten)]
            body: &'a T,
        }

        match self {
            Self::Ready(body) => Ready { ok: true, body }.serialize(serializer),
            Self::Insufficient(message) => {
                let mut s = serializer.serialize_struct("Outcome", 2)?;
                s.serialize_field("ok", &false)?;
                s.serialize_field("error", message)?;
                s.end()
            }
        }
    }
}

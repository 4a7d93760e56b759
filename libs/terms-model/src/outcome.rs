//! Three-way answer type shared by every resolver.
//!
//! `NotFound` and `Unsupported` are ordinary answers, not errors: a backend that
//! is online but lacks the key answers `NotFound`, a backend that holds no data
//! at all answers `Unsupported`. Composition only falls through on the latter.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "value", rename_all = "camelCase")]
pub enum Outcome<T> {
    Found(T),
    NotFound,
    Unsupported,
}

impl<T> Outcome<T> {
    /// `Found` when the option holds a value, `NotFound` otherwise.
    pub fn of(value: Option<T>) -> Self {
        match value {
            Some(v) => Outcome::Found(v),
            None => Outcome::NotFound,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Outcome::Found(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Outcome::NotFound)
    }

    pub fn is_unsupported(&self) -> bool {
        matches!(self, Outcome::Unsupported)
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Outcome<U> {
        match self {
            Outcome::Found(v) => Outcome::Found(f(v)),
            Outcome::NotFound => Outcome::NotFound,
            Outcome::Unsupported => Outcome::Unsupported,
        }
    }

    pub fn and_then<U, F: FnOnce(T) -> Outcome<U>>(self, f: F) -> Outcome<U> {
        match self {
            Outcome::Found(v) => f(v),
            Outcome::NotFound => Outcome::NotFound,
            Outcome::Unsupported => Outcome::Unsupported,
        }
    }

    /// Drops the distinction between `NotFound` and `Unsupported`.
    pub fn found(self) -> Option<T> {
        match self {
            Outcome::Found(v) => Some(v),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_of_option() {
        assert_eq!(Outcome::of(Some(3)), Outcome::Found(3));
        assert_eq!(Outcome::<i32>::of(None), Outcome::NotFound);
    }

    #[test]
    fn test_map_preserves_unsupported() {
        let unsupported: Outcome<i32> = Outcome::Unsupported;
        assert!(unsupported.map(|v| v + 1).is_unsupported());

        let not_found: Outcome<i32> = Outcome::NotFound;
        assert!(not_found.and_then(|v| Outcome::Found(v * 2)).is_not_found());

        assert_eq!(Outcome::Found(2).and_then(|v| Outcome::Found(v * 2)), Outcome::Found(4));
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(Outcome::Found("x")).unwrap();
        assert_eq!(json, serde_json::json!({"outcome": "found", "value": "x"}));

        let json = serde_json::to_value(Outcome::<String>::NotFound).unwrap();
        assert_eq!(json, serde_json::json!({"outcome": "notFound"}));
    }
}

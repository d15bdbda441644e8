//! Field presence for upstream JSON.

use std::ops::Deref;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A JSON field that may be missing, explicitly `null`, or set.
///
/// The upstream sends `"platform": null` at some calls and leaves the key
/// out at others. Both read as "no value", but re-encoding writes back
/// whichever form arrived. Use with
/// `#[serde(default, skip_serializing_if = "Nullable::is_absent")]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Nullable<T> {
    /// The key was not in the payload.
    Absent,
    /// The key was present with a `null` value.
    Null,
    Present(T),
}

impl<T> Nullable<T> {
    /// Whether the key was missing.
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    pub fn as_ref(&self) -> Option<&T> {
        match self {
            Self::Present(v) => Some(v),
            Self::Absent | Self::Null => None,
        }
    }

    pub fn as_mut(&mut self) -> Option<&mut T> {
        match self {
            Self::Present(v) => Some(v),
            Self::Absent | Self::Null => None,
        }
    }

    pub fn as_deref(&self) -> Option<&T::Target>
    where
        T: Deref,
    {
        self.as_ref().map(Deref::deref)
    }

    pub fn get(&self) -> Option<T>
    where
        T: Copy,
    {
        self.as_ref().copied()
    }
}

impl<T> Default for Nullable<T> {
    fn default() -> Self {
        Self::Absent
    }
}

/// `None` becomes an explicit `null`.
impl<T> From<Option<T>> for Nullable<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Self::Present)
    }
}

impl<T: Serialize> Serialize for Nullable<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Present(v) => v.serialize(serializer),
            Self::Absent | Self::Null => serializer.serialize_none(),
        }
    }
}

// Only called when the key is present; a missing key goes through `Default`.
impl<'de, T: Deserialize<'de>> Deserialize<'de> for Nullable<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<T>::deserialize(deserializer).map(Self::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    #[derive(Debug, Default, Deserialize, Serialize)]
    struct Call {
        #[serde(default, skip_serializing_if = "Nullable::is_absent")]
        platform: Nullable<String>,
    }

    fn reencode(json: Value) -> (Call, Value) {
        let call: Call = serde_json::from_value(json).unwrap();
        let out = serde_json::to_value(&call).unwrap();
        (call, out)
    }

    #[test]
    fn absent_null_and_present_are_distinct() {
        let (call, out) = reencode(json!({}));
        assert_eq!(call.platform, Nullable::Absent);
        assert_eq!(out, json!({}));

        let (call, out) = reencode(json!({"platform": null}));
        assert_eq!(call.platform, Nullable::Null);
        assert_eq!(out, json!({"platform": null}));

        let (call, out) = reencode(json!({"platform": "4"}));
        assert_eq!(call.platform.as_deref(), Some("4"));
        assert_eq!(out, json!({"platform": "4"}));
    }

    #[test]
    fn null_and_absent_both_read_as_no_value() {
        assert_eq!(Nullable::<bool>::Absent.get(), None);
        assert_eq!(Nullable::<bool>::Null.get(), None);
        assert_eq!(Nullable::Present(true).get(), Some(true));
    }
}

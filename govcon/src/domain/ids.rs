use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }
    };
}

string_id!(
    /// Server-assigned contract identifier (a GUID string).
    ContractId
);

string_id!(
    /// Server-assigned resource (staff member) identifier.
    ResourceId
);

string_id!(
    /// Labor category identifier.
    LcatId
);

string_id!(
    /// Identifier of a single contract/resource assignment row.
    AssignmentId
);

string_id!(AlertId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_serialize_as_plain_strings() {
        let id = ContractId::new("c-42");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"c-42\"");
        let back: ContractId = serde_json::from_str("\"c-42\"").unwrap();
        assert_eq!(back, id);
    }
}

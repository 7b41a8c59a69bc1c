use crate::tree::DocumentType;
use crate::util::{GROUP_PREFIX, group_identity};

pub const ALL_OF_TYPE_PREFIX: &str = "all:";

/// Endpoint filter parsed from free text: `all:<type>`, `group:<base>`, or an exact identity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EndpointSelector {
    Inactive,
    AllOfType(DocumentType),
    Group(String),
    Exact(String),
    /// Unparseable input; matches nothing.
    Nothing,
}

impl EndpointSelector {
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() {
            return Self::Inactive;
        }

        if let Some(rest) = strip_prefix_ignore_case(value, ALL_OF_TYPE_PREFIX) {
            return DocumentType::parse(rest)
                .map(Self::AllOfType)
                .unwrap_or(Self::Nothing);
        }

        if let Some(rest) = strip_prefix_ignore_case(value, GROUP_PREFIX) {
            let base = rest.trim();
            return if base.is_empty() {
                Self::Nothing
            } else {
                Self::Group(group_identity(base))
            };
        }

        Self::Exact(value.to_owned())
    }

    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Inactive)
    }

    /// `doctype` is the resolved endpoint's type, or `None` when no document backs the identity.
    pub fn matches(&self, identity: &str, doctype: Option<DocumentType>) -> bool {
        match self {
            Self::Inactive | Self::Nothing => false,
            Self::AllOfType(wanted) => doctype == Some(*wanted),
            Self::Group(wanted) | Self::Exact(wanted) => identity == wanted,
        }
    }
}

fn strip_prefix_ignore_case<'a>(value: &'a str, prefix: &str) -> Option<&'a str> {
    let head = value.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        Some(&value[prefix.len()..])
    } else {
        None
    }
}

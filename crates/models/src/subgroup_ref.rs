use std::fmt::{Display, Formatter, Result as FmtResult};

/// A client-supplied subgroup reference, classified but not yet resolved.
///
/// Two addressing schemes coexist: small ordinal numbers from early data
/// entry and stable identifiers. Anything that cannot be classified falls
/// back to [`SubgroupRef::WholeGroup`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubgroupRef {
    /// No subgroup: the entry applies to the whole group
    WholeGroup,
    /// A subgroup addressed by its number within the group
    Ordinal(i32),
    /// A subgroup addressed by its identifier
    Direct(String),
}

impl SubgroupRef {
    /// Sentinel clients send to explicitly clear the subgroup
    pub const NONE_SENTINEL: &'static str = "none";

    /// Longest digit string still treated as an ordinal
    const MAX_ORDINAL_DIGITS: usize = 4;

    pub fn parse(raw: Option<&str>) -> Self {
        let raw = match raw {
            None => return Self::WholeGroup,
            Some(raw) if raw.is_empty() || raw == Self::NONE_SENTINEL => {
                return Self::WholeGroup;
            }
            Some(raw) => raw,
        };

        let is_ordinal = raw.len() <= Self::MAX_ORDINAL_DIGITS
            && raw.bytes().all(|b| b.is_ascii_digit());

        if is_ordinal {
            // At most four ASCII digits always fit in an i32
            raw.parse().map(Self::Ordinal).unwrap_or(Self::WholeGroup)
        } else {
            Self::Direct(raw.to_string())
        }
    }

    pub fn is_whole_group(&self) -> bool {
        matches!(self, Self::WholeGroup)
    }
}

impl From<Option<&str>> for SubgroupRef {
    fn from(raw: Option<&str>) -> Self {
        Self::parse(raw)
    }
}

impl Display for SubgroupRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::WholeGroup => write!(f, "whole group"),
            Self::Ordinal(number) => write!(f, "subgroup #{number}"),
            Self::Direct(id) => write!(f, "subgroup {id}"),
        }
    }
}

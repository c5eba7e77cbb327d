use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter, EnumString, IntoEnumIterator};

/// A pedagogical track for which a student may hold a subgroup assignment
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MembershipDimension {
    Commerce,
    Tutorial,
    Finance,
    SystemsThinking,
}

impl MembershipDimension {
    pub fn as_str(&self) -> &str {
        self.as_ref()
    }

    pub fn all() -> Vec<MembershipDimension> {
        MembershipDimension::iter().collect()
    }
}

/// A student's subgroup number within one dimension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubgroupAssignment {
    pub dimension: MembershipDimension,
    pub number: i32,
}

/// The subgroup numbers a member holds, at most one per dimension, ordered by dimension
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubgroupAssignments(Vec<SubgroupAssignment>);

impl SubgroupAssignments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns `number` for `dimension`, replacing any earlier assignment.
    /// A `None` number clears the dimension.
    pub fn set(&mut self, dimension: MembershipDimension, number: Option<i32>) {
        self.0.retain(|a| a.dimension != dimension);

        if let Some(number) = number {
            let at = self
                .0
                .iter()
                .position(|a| a.dimension > dimension)
                .unwrap_or(self.0.len());
            self.0.insert(at, SubgroupAssignment { dimension, number });
        }
    }

    pub fn get(&self, dimension: MembershipDimension) -> Option<i32> {
        self.0
            .iter()
            .find(|a| a.dimension == dimension)
            .map(|a| a.number)
    }

    /// Distinct subgroup numbers across all dimensions, ascending
    pub fn numbers(&self) -> Vec<i32> {
        let mut numbers: Vec<i32> = self.0.iter().map(|a| a.number).collect();
        numbers.sort_unstable();
        numbers.dedup();
        numbers
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SubgroupAssignment> {
        self.0.iter()
    }
}

impl FromIterator<(MembershipDimension, Option<i32>)> for SubgroupAssignments {
    fn from_iter<T: IntoIterator<Item = (MembershipDimension, Option<i32>)>>(iter: T) -> Self {
        let mut assignments = Self::new();
        for (dimension, number) in iter {
            assignments.set(dimension, number);
        }
        assignments
    }
}

//! The ordered, id-keyed member roster embedded in a team record.
//!
//! All edits happen on an in-memory [`TeamMembers`] loaded from the team's
//! `members_json` column and written back as a whole; see
//! `TeamRepository::save_members` for the version guard.

use crate::team::model::{NewMember, TeamMember};
use std::collections::HashSet;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("No team member found with id {0}")]
pub struct MemberNotFound(pub String);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamMembers(Vec<TeamMember>);

impl TeamMembers {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(raw).map(TeamMembers)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.0)
    }

    pub fn as_slice(&self) -> &[TeamMember] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<TeamMember> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&TeamMember> {
        self.0.iter().find(|m| m.id == id)
    }

    fn position_of(&self, id: &str) -> Result<usize, MemberNotFound> {
        self.0
            .iter()
            .position(|m| m.id == id)
            .ok_or_else(|| MemberNotFound(id.to_string()))
    }

    /// Appends a member under a freshly generated id.
    pub fn add(&mut self, payload: NewMember) -> &TeamMember {
        let mut id = uuid::Uuid::new_v4().to_string();
        while self.get(&id).is_some() {
            id = uuid::Uuid::new_v4().to_string();
        }
        self.0.push(payload.into_member(id));
        &self.0[self.0.len() - 1]
    }

    /// Swaps in `member` at the position of the entry sharing its id.
    pub fn replace(&mut self, member: TeamMember) -> Result<(), MemberNotFound> {
        let idx = self.position_of(&member.id)?;
        self.0[idx] = member;
        Ok(())
    }

    pub fn remove(&mut self, id: &str) -> Result<TeamMember, MemberNotFound> {
        let idx = self.position_of(id)?;
        Ok(self.0.remove(idx))
    }

    /// All-or-nothing: if any id is unknown the roster is left untouched and
    /// the first unknown id is reported.
    pub fn remove_many(&mut self, ids: &[String]) -> Result<usize, MemberNotFound> {
        if let Some(missing) = ids.iter().find(|id| self.get(id).is_none()) {
            return Err(MemberNotFound(missing.clone()));
        }
        let doomed: HashSet<&str> = ids.iter().map(String::as_str).collect();
        let before = self.0.len();
        self.0.retain(|m| !doomed.contains(m.id.as_str()));
        Ok(before - self.0.len())
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

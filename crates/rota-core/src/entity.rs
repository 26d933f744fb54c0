//! Members and routines, reduced to the attributes access control needs.

use serde::{Deserialize, Serialize};

use crate::scope::Role;
use crate::types::{MemberId, RoutineId, TeamId};

/// Anything subject to a view or manage decision.
///
/// Ownership is the only relation the evaluator needs; team affiliation
/// is derived by joining the owner against the member list.
pub trait Owned {
    /// The member that owns (or is assigned) this resource.
    fn owner_id(&self) -> MemberId;
}

/// A member of the workspace. Also the actor whose access is evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: MemberId,

    #[serde(default)]
    pub name: String,

    pub role: Role,

    /// `None` means the member is not assigned to any team.
    #[serde(default)]
    pub team_id: Option<TeamId>,
}

impl Member {
    /// Create a member without a team.
    pub fn new(id: u64, name: impl Into<String>, role: Role) -> Self {
        Self {
            id: MemberId(id),
            name: name.into(),
            role,
            team_id: None,
        }
    }

    /// Assign the member to a team.
    pub fn in_team(mut self, team_id: u64) -> Self {
        self.team_id = Some(TeamId(team_id));
        self
    }
}

impl Owned for Member {
    /// A member owns itself.
    fn owner_id(&self) -> MemberId {
        self.id
    }
}

/// What a routine represents on the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RoutineKind {
    #[default]
    TimeBlock,
    Task,
    Payment,
    Event,
}

/// A recurring time-block, task, payment or event assigned to a member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Routine {
    pub id: RoutineId,

    /// Owner of the routine.
    pub member_id: MemberId,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub kind: RoutineKind,
}

impl Routine {
    /// Create a time-block routine owned by `member_id`.
    pub fn new(id: u64, member_id: u64, title: impl Into<String>) -> Self {
        Self {
            id: RoutineId(id),
            member_id: MemberId(member_id),
            title: title.into(),
            kind: RoutineKind::default(),
        }
    }

    /// Set the routine kind.
    pub fn with_kind(mut self, kind: RoutineKind) -> Self {
        self.kind = kind;
        self
    }
}

impl Owned for Routine {
    fn owner_id(&self) -> MemberId {
        self.member_id
    }
}

//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use rota::{AccessConfig, AccessControl, AcceptAll, Result as AccessResult, Validator};
use rota_core::{Member, MemberId, Role, Routine};
use rota_store::MemoryStore;

/// A small organisation: two teams, one unassigned member, a handful of routines.
///
/// | id | name  | role   | team |
/// |----|-------|--------|------|
/// | 1  | Ana   | Admin  | 10   |
/// | 2  | Ben   | Owner  | 10   |
/// | 3  | Cy    | Member | 20   |
/// | 4  | Dee   | Member | 20   |
/// | 7  | Eli   | Member | 30   |
/// | 9  | Fay   | Member | none |
pub struct Fixture {
    pub members: Vec<Member>,
    pub routines: Vec<Routine>,
}

impl Fixture {
    pub fn new() -> Self {
        let members = vec![
            Member::new(1, "Ana", Role::Admin).in_team(10),
            Member::new(2, "Ben", Role::Owner).in_team(10),
            Member::new(3, "Cy", Role::Member).in_team(20),
            Member::new(4, "Dee", Role::Member).in_team(20),
            Member::new(7, "Eli", Role::Member).in_team(30),
            Member::new(9, "Fay", Role::Member),
        ];
        let routines = vec![
            Routine::new(100, 1, "Quarterly planning"),
            Routine::new(101, 2, "Payroll"),
            Routine::new(102, 3, "Morning run"),
            Routine::new(103, 4, "Rent"),
            Routine::new(104, 7, "Dentist"),
            Routine::new(105, 9, "Reading"),
            Routine::new(106, 42, "Left behind by a removed member"),
        ];
        Self { members, routines }
    }

    /// Look up a member by id.
    ///
    /// Panics if the fixture has no such member.
    pub fn member(&self, id: u64) -> &Member {
        self.members
            .iter()
            .find(|m| m.id == MemberId(id))
            .unwrap_or_else(|| panic!("fixture has no member {id}"))
    }

    /// Routines owned by `id`.
    pub fn routines_of(&self, id: u64) -> Vec<&Routine> {
        self.routines
            .iter()
            .filter(|r| r.member_id == MemberId(id))
            .collect()
    }

    /// An access-control instance over a fresh in-memory store.
    pub async fn access<V: Validator>(&self, validator: V) -> AccessResult<AccessControl<MemoryStore, V>> {
        AccessControl::open(MemoryStore::new(), validator, AccessConfig::default()).await
    }

    /// An access-control instance that accepts every commit.
    pub async fn permissive_access(&self) -> AccessResult<AccessControl<MemoryStore, AcceptAll>> {
        self.access(AcceptAll).await
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

/// The scenario members `[{1, team 10}, {2, team 10}, {3, team 20}]` and
/// routines `[{100, owner 1}, {101, owner 3}]`.
pub fn visibility_scenario() -> (Vec<Member>, Vec<Routine>) {
    let members = vec![
        Member::new(1, "a", Role::Member).in_team(10),
        Member::new(2, "b", Role::Member).in_team(10),
        Member::new(3, "c", Role::Member).in_team(20),
    ];
    let routines = vec![Routine::new(100, 1, "first"), Routine::new(101, 3, "second")];
    (members, routines)
}

/// Install a test-friendly tracing subscriber. Safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing_subscriber::filter::LevelFilter::DEBUG)
        .with_test_writer()
        .try_init();
}

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use fxhash::FxHashSet;
use indexmap::IndexMap;
use splittab_application::{EngineError, NotFound, SnapshotFetchError, SnapshotSource};
use splittab_domain::model::{
    Expense, ExpenseId, GroupId, LedgerSnapshot, Member, MemberId, Money, SnapshotError,
};
use uuid::Uuid;

use crate::notify::ChangeNotifier;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LedgerError {
    UnknownGroup(GroupId),
    UnknownInviteCode(String),
    UnknownExpense(ExpenseId),
    UnknownMember(MemberId),
    InvalidExpense(SnapshotError),
}

impl From<LedgerError> for EngineError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::UnknownGroup(group_id) => EngineError::NotFound(NotFound::Group(group_id)),
            LedgerError::UnknownInviteCode(code) => {
                EngineError::NotFound(NotFound::InviteCode(code))
            }
            LedgerError::UnknownExpense(expense_id) => {
                EngineError::NotFound(NotFound::Expense(expense_id))
            }
            LedgerError::UnknownMember(member_id) => {
                EngineError::NotFound(NotFound::Member(member_id))
            }
            LedgerError::InvalidExpense(err) => EngineError::Validation(err),
        }
    }
}

struct GroupRecord {
    name: String,
    invite_code: String,
    next_member_id: u64,
    next_expense_id: u64,
    members: IndexMap<MemberId, Member>,
    expenses: IndexMap<ExpenseId, Expense>,
}

impl GroupRecord {
    fn member_ids(&self) -> FxHashSet<MemberId> {
        self.members.keys().copied().collect()
    }
}

/// In-memory ledger store.
///
/// Each group lives under one map entry; mutations happen while holding that
/// entry, so an expense is inserted or removed together with its participant
/// list in a single step and snapshot reads never observe a half-written
/// expense.
pub struct InMemoryLedger {
    groups: DashMap<GroupId, GroupRecord>,
    invites: DashMap<String, GroupId>,
    notifier: ChangeNotifier,
    next_group_id: AtomicU64,
}

impl InMemoryLedger {
    pub fn new(notifier: ChangeNotifier) -> Self {
        Self {
            groups: DashMap::new(),
            invites: DashMap::new(),
            notifier,
            next_group_id: AtomicU64::new(1),
        }
    }

    pub fn notifier(&self) -> &ChangeNotifier {
        &self.notifier
    }

    /// Creates a group with a fresh invite code and its creator as the first
    /// member.
    pub fn create_group(&self, name: &str, creator_name: &str) -> (GroupId, MemberId) {
        let group_id = GroupId(self.next_group_id.fetch_add(1, Ordering::Relaxed));
        let invite_code = Uuid::new_v4().to_string();
        let creator_id = MemberId(1);

        let mut members = IndexMap::new();
        members.insert(
            creator_id,
            Member {
                id: creator_id,
                display_name: creator_name.to_string(),
            },
        );
        self.groups.insert(
            group_id,
            GroupRecord {
                name: name.to_string(),
                invite_code: invite_code.clone(),
                next_member_id: 2,
                next_expense_id: 1,
                members,
                expenses: IndexMap::new(),
            },
        );
        self.invites.insert(invite_code, group_id);

        (group_id, creator_id)
    }

    pub fn group_name(&self, group_id: GroupId) -> Result<String, LedgerError> {
        self.groups
            .get(&group_id)
            .map(|group| group.name.clone())
            .ok_or(LedgerError::UnknownGroup(group_id))
    }

    pub fn invite_code(&self, group_id: GroupId) -> Result<String, LedgerError> {
        self.groups
            .get(&group_id)
            .map(|group| group.invite_code.clone())
            .ok_or(LedgerError::UnknownGroup(group_id))
    }

    /// Resolves an invite code and adds a new member to its group.
    pub fn join_group(
        &self,
        invite_code: &str,
        display_name: &str,
    ) -> Result<(GroupId, MemberId), LedgerError> {
        let group_id = self
            .invites
            .get(invite_code)
            .map(|entry| *entry)
            .ok_or_else(|| LedgerError::UnknownInviteCode(invite_code.to_string()))?;
        let mut group = self
            .groups
            .get_mut(&group_id)
            .ok_or(LedgerError::UnknownGroup(group_id))?;

        let member_id = MemberId(group.next_member_id);
        group.next_member_id += 1;
        group.members.insert(
            member_id,
            Member {
                id: member_id,
                display_name: display_name.to_string(),
            },
        );

        Ok((group_id, member_id))
    }

    pub fn members(&self, group_id: GroupId) -> Result<Vec<Member>, LedgerError> {
        self.groups
            .get(&group_id)
            .map(|group| group.members.values().cloned().collect())
            .ok_or(LedgerError::UnknownGroup(group_id))
    }

    /// Display name is the one member field that may change after creation.
    pub fn rename_member(
        &self,
        group_id: GroupId,
        member_id: MemberId,
        display_name: &str,
    ) -> Result<(), LedgerError> {
        let mut group = self
            .groups
            .get_mut(&group_id)
            .ok_or(LedgerError::UnknownGroup(group_id))?;
        let member = group
            .members
            .get_mut(&member_id)
            .ok_or(LedgerError::UnknownMember(member_id))?;
        member.display_name = display_name.to_string();
        Ok(())
    }

    /// Validates and records an expense together with its participant list.
    /// A rejected expense leaves the group untouched and consumes no id.
    pub fn create_expense(
        &self,
        group_id: GroupId,
        description: &str,
        amount: Money,
        payer_id: MemberId,
        participant_ids: Vec<MemberId>,
    ) -> Result<ExpenseId, LedgerError> {
        let expense_id = {
            let mut group = self
                .groups
                .get_mut(&group_id)
                .ok_or(LedgerError::UnknownGroup(group_id))?;

            let expense_id = ExpenseId(group.next_expense_id);
            let expense = Expense {
                id: expense_id,
                description: description.to_string(),
                amount,
                payer_id,
                participant_ids,
            };
            expense
                .validate(&group.member_ids())
                .map_err(LedgerError::InvalidExpense)?;

            group.next_expense_id += 1;
            group.expenses.insert(expense_id, expense);
            expense_id
        };

        self.notifier.notify(group_id);
        Ok(expense_id)
    }

    /// Full replace: description, amount, payer, and participants change
    /// together. Partial field mutation is not supported.
    pub fn replace_expense(
        &self,
        group_id: GroupId,
        expense_id: ExpenseId,
        description: &str,
        amount: Money,
        payer_id: MemberId,
        participant_ids: Vec<MemberId>,
    ) -> Result<(), LedgerError> {
        {
            let mut group = self
                .groups
                .get_mut(&group_id)
                .ok_or(LedgerError::UnknownGroup(group_id))?;
            if !group.expenses.contains_key(&expense_id) {
                return Err(LedgerError::UnknownExpense(expense_id));
            }

            let expense = Expense {
                id: expense_id,
                description: description.to_string(),
                amount,
                payer_id,
                participant_ids,
            };
            expense
                .validate(&group.member_ids())
                .map_err(LedgerError::InvalidExpense)?;

            // Inserting over an existing key keeps its position.
            group.expenses.insert(expense_id, expense);
        }

        self.notifier.notify(group_id);
        Ok(())
    }

    /// Removes the expense and its participant links in one step.
    pub fn delete_expense(
        &self,
        group_id: GroupId,
        expense_id: ExpenseId,
    ) -> Result<(), LedgerError> {
        {
            let mut group = self
                .groups
                .get_mut(&group_id)
                .ok_or(LedgerError::UnknownGroup(group_id))?;
            group
                .expenses
                .shift_remove(&expense_id)
                .ok_or(LedgerError::UnknownExpense(expense_id))?;
        }

        self.notifier.notify(group_id);
        Ok(())
    }
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new(ChangeNotifier::new())
    }
}

impl SnapshotSource for InMemoryLedger {
    fn group_snapshot(&self, group_id: GroupId) -> Result<LedgerSnapshot, SnapshotFetchError> {
        let group = self
            .groups
            .get(&group_id)
            .ok_or(SnapshotFetchError::GroupNotFound(group_id))?;
        LedgerSnapshot::try_new(
            group.members.values().cloned().collect(),
            group.expenses.values().cloned().collect(),
        )
        .map_err(SnapshotFetchError::Corrupt)
    }
}

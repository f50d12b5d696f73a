use std::{
    fmt,
    iter::Sum,
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
};

use fxhash::FxHashSet;
use rust_decimal::{Decimal, RoundingStrategy};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MemberId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ExpenseId(pub u64);

/// A currency amount. Accumulation happens at full decimal precision;
/// rounding to display precision is confined to [`Money::round_display`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(Decimal);

/// Number of decimal places shown to callers.
const DISPLAY_SCALE: u32 = 2;

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);

    /// Builds a value from a scaled mantissa, e.g. `Money::new(1250, 2)` is 12.50.
    pub fn new(mantissa: i64, scale: u32) -> Self {
        Self(Decimal::new(mantissa, scale))
    }

    pub fn from_i64(value: i64) -> Self {
        Self(Decimal::from(value))
    }

    pub fn from_decimal(value: Decimal) -> Self {
        Self(value)
    }

    pub fn as_decimal(self) -> Decimal {
        self.0
    }

    pub fn abs(self) -> Self {
        Self(self.0.abs())
    }

    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    pub fn is_positive(self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Tolerance below which a balance counts as settled (0.01 currency units).
    pub fn epsilon() -> Self {
        Self(Decimal::new(1, DISPLAY_SCALE))
    }

    /// Rounds to display precision, half away from zero.
    pub fn round_display(self) -> Self {
        Self(
            self.0
                .round_dp_with_strategy(DISPLAY_SCALE, RoundingStrategy::MidpointAwayFromZero),
        )
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        Self(iter.map(|money| money.0).sum())
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        Self(iter.map(|money| money.0).sum())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Member {
    pub id: MemberId,
    pub display_name: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Expense {
    pub id: ExpenseId,
    pub description: String,
    pub amount: Money,
    pub payer_id: MemberId,
    pub participant_ids: Vec<MemberId>,
}

impl Expense {
    /// Checks the per-expense invariants against a group's member set:
    /// positive amount, non-empty duplicate-free participants, and payer
    /// plus every participant resolving to a member.
    pub fn validate(&self, member_ids: &FxHashSet<MemberId>) -> Result<(), SnapshotError> {
        if !self.amount.is_positive() {
            return Err(SnapshotError::NonPositiveAmount { expense: self.id });
        }
        if self.participant_ids.is_empty() {
            return Err(SnapshotError::EmptyParticipants { expense: self.id });
        }
        if !member_ids.contains(&self.payer_id) {
            return Err(SnapshotError::UnknownPayer {
                expense: self.id,
                member: self.payer_id,
            });
        }

        let mut seen = FxHashSet::default();
        for &participant in &self.participant_ids {
            if !member_ids.contains(&participant) {
                return Err(SnapshotError::UnknownParticipant {
                    expense: self.id,
                    member: participant,
                });
            }
            if !seen.insert(participant) {
                return Err(SnapshotError::DuplicateParticipant {
                    expense: self.id,
                    member: participant,
                });
            }
        }

        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SnapshotError {
    NoMembers,
    DuplicateMember { member: MemberId },
    NonPositiveAmount { expense: ExpenseId },
    EmptyParticipants { expense: ExpenseId },
    DuplicateParticipant { expense: ExpenseId, member: MemberId },
    UnknownPayer { expense: ExpenseId, member: MemberId },
    UnknownParticipant { expense: ExpenseId, member: MemberId },
}

/// A group's full member and expense lists at one point in time.
///
/// Construction validates referential integrity, so a snapshot that exists is
/// safe to hand to the engine.
#[derive(Clone, Debug, PartialEq)]
pub struct LedgerSnapshot {
    members: Vec<Member>,
    expenses: Vec<Expense>,
}

impl LedgerSnapshot {
    pub fn try_new(members: Vec<Member>, expenses: Vec<Expense>) -> Result<Self, SnapshotError> {
        if members.is_empty() {
            return Err(SnapshotError::NoMembers);
        }

        let mut member_ids = FxHashSet::default();
        for member in &members {
            if !member_ids.insert(member.id) {
                return Err(SnapshotError::DuplicateMember { member: member.id });
            }
        }

        for expense in &expenses {
            expense.validate(&member_ids)?;
        }

        Ok(Self { members, expenses })
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn member_ids(&self) -> impl Iterator<Item = MemberId> + '_ {
        self.members.iter().map(|member| member.id)
    }
}

/// Net position per member. Positive means the group owes the member money.
pub type MemberBalances = fxhash::FxHashMap<MemberId, Money>;

/// A suggested point-to-point payment. Never a source of truth; recomputed
/// from the snapshot on every read.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transfer {
    pub from: MemberId,
    pub to: MemberId,
    pub amount: Money,
}

pub mod balance_calculator;
pub mod settlement_planner;

pub use balance_calculator::{BalanceCalculator, BalanceError};
pub use settlement_planner::{PlanError, SettlementPlanner};

//! The fixed category taxonomy and the transaction types it is keyed by.
//!
//! Every transaction is either income or an expense, and its category must be
//! one of the categories listed for that type.

use std::{fmt::Display, str::FromStr};

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};

// Fixed costs
/// Rent.
pub const EXPENSE_RENT: &str = "家賃";
/// Repayments on a medical loan.
pub const EXPENSE_MEDICAL_LOAN: &str = "医療ローン";
/// Insurance premiums.
pub const EXPENSE_INSURANCE: &str = "保険";
/// Subscriptions.
pub const EXPENSE_SUBSCRIPTION: &str = "サブスク";
/// Purchases paid off in instalments.
pub const EXPENSE_INSTALLMENT: &str = "ショッピング分割";
/// Electricity, gas and water.
pub const EXPENSE_UTILITIES: &str = "光熱費";

// Variable costs
/// Groceries and eating out.
pub const EXPENSE_FOOD: &str = "食費";
/// Household necessities.
pub const EXPENSE_DAILY_NECESSITIES: &str = "日用品";
/// Public transport, taxis, fuel.
pub const EXPENSE_TRANSPORT: &str = "交通費";
/// Courses, books and other self-improvement.
pub const EXPENSE_SKILL_UP: &str = "スキルアップ";
/// Equipment bought for work.
pub const EXPENSE_WORK_SUPPLIES: &str = "仕事用品";
/// Medical bills.
pub const EXPENSE_MEDICAL: &str = "医療";
/// Haircuts, cosmetics.
pub const EXPENSE_BEAUTY: &str = "美容";
/// Entertainment.
pub const EXPENSE_ENTERTAINMENT: &str = "娯楽";
/// Any other expense.
pub const EXPENSE_OTHER: &str = "その他（支出）";

/// Salary.
pub const INCOME_SALARY: &str = "給与";
/// Bonus.
pub const INCOME_BONUS: &str = "賞与";
/// Sales of goods.
pub const INCOME_SALES: &str = "販売";
/// Any other income.
pub const INCOME_OTHER: &str = "その他（収入）";

/// The expense categories, fixed costs first and then variable costs.
pub const EXPENSE_CATEGORIES: [&str; 15] = [
    EXPENSE_RENT,
    EXPENSE_MEDICAL_LOAN,
    EXPENSE_INSURANCE,
    EXPENSE_SUBSCRIPTION,
    EXPENSE_INSTALLMENT,
    EXPENSE_UTILITIES,
    EXPENSE_FOOD,
    EXPENSE_DAILY_NECESSITIES,
    EXPENSE_TRANSPORT,
    EXPENSE_SKILL_UP,
    EXPENSE_WORK_SUPPLIES,
    EXPENSE_MEDICAL,
    EXPENSE_BEAUTY,
    EXPENSE_ENTERTAINMENT,
    EXPENSE_OTHER,
];

/// The income categories.
pub const INCOME_CATEGORIES: [&str; 4] = [INCOME_SALARY, INCOME_BONUS, INCOME_SALES, INCOME_OTHER];

/// Whether money was earned or spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money earned.
    Income,
    /// Money spent.
    Expense,
}

impl TransactionType {
    /// The tag used for this type in JSON and in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The error returned when a string is not a transaction type tag.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown transaction type '{0}'")]
pub struct UnknownTransactionType(pub String);

impl FromStr for TransactionType {
    type Err = UnknownTransactionType;

    /// Parse exactly "income" or "expense", nothing else.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            other => Err(UnknownTransactionType(other.to_owned())),
        }
    }
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error| FromSqlError::Other(Box::new(error)))
    }
}

/// The valid categories for each transaction type.
///
/// Built once when the server starts and never changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Taxonomy {
    expense: Vec<String>,
    income: Vec<String>,
}

impl Default for Taxonomy {
    fn default() -> Self {
        Self::new(&EXPENSE_CATEGORIES, &INCOME_CATEGORIES)
    }
}

impl Taxonomy {
    /// Create a taxonomy from ordered lists of expense and income categories.
    pub fn new(expense: &[&str], income: &[&str]) -> Self {
        Self {
            expense: expense.iter().map(|&category| category.to_owned()).collect(),
            income: income.iter().map(|&category| category.to_owned()).collect(),
        }
    }

    /// The categories for `transaction_type`, in their declared order.
    pub fn categories_for(&self, transaction_type: TransactionType) -> &[String] {
        match transaction_type {
            TransactionType::Income => &self.income,
            TransactionType::Expense => &self.expense,
        }
    }

    /// Whether `category` is one of the categories listed for `transaction_type`.
    ///
    /// Matching is exact and case-sensitive.
    pub fn contains(&self, transaction_type: TransactionType, category: &str) -> bool {
        self.categories_for(transaction_type)
            .iter()
            .any(|valid_category| valid_category == category)
    }

    /// Whether `category` is valid for the type tagged by `type_tag`.
    ///
    /// Any tag other than "income" or "expense" is never valid.
    pub fn is_valid_category(&self, type_tag: &str, category: &str) -> bool {
        type_tag
            .parse::<TransactionType>()
            .is_ok_and(|transaction_type| self.contains(transaction_type, category))
    }
}

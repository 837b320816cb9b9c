use crate::model::Amount;
use serde::{Deserialize, Serialize};

/// The investment category derived for a record.
#[derive(
    Default, Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize,
)]
pub enum Investment {
    /// The description was not recognized. Written as an empty cell.
    #[default]
    #[serde(rename = "")]
    Uncategorized,
    Dividend,
    Income,
    Expense,
    Buy,
    Sell,
}

serde_plain::derive_display_from_serialize!(Investment);
serde_plain::derive_fromstr_from_deserialize!(Investment);

/// The `description` values that carry meaning. Any other description is passed through.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Kind {
    Dividend,
    CashTransfer,
    SelmaFee,
    Trade,
    /// Synthetic row holding the stamp duty of an adjacent trade.
    StampDuty,
}

serde_plain::derive_display_from_serialize!(Kind);
serde_plain::derive_fromstr_from_deserialize!(Kind);

/// Represents a single row of a Selma transaction export, plus the fields derived from it.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Record {
    pub(crate) date: String,
    pub(crate) description: String,
    pub(crate) bookkeeping_no: String,
    pub(crate) fund: String,
    pub(crate) amount: Amount,
    pub(crate) currency: String,
    pub(crate) number_of_shares: String,
    pub(crate) stamp_duty_amount: Amount,
    pub(crate) investment: Investment,
}

impl Record {
    /// Creates a record with empty pass-through fields and no derived data.
    pub fn new(
        date: impl Into<String>,
        description: impl Into<String>,
        amount: impl Into<Amount>,
    ) -> Self {
        Self {
            date: date.into(),
            description: description.into(),
            amount: amount.into(),
            ..Default::default()
        }
    }

    pub fn with_bookkeeping_no(mut self, bookkeeping_no: impl Into<String>) -> Self {
        self.bookkeeping_no = bookkeeping_no.into();
        self
    }

    pub fn with_fund(mut self, fund: impl Into<String>) -> Self {
        self.fund = fund.into();
        self
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    pub fn with_number_of_shares(mut self, number_of_shares: impl Into<String>) -> Self {
        self.number_of_shares = number_of_shares.into();
        self
    }

    pub fn with_stamp_duty_amount(mut self, stamp_duty_amount: impl Into<Amount>) -> Self {
        self.stamp_duty_amount = stamp_duty_amount.into();
        self
    }

    pub fn with_investment(mut self, investment: Investment) -> Self {
        self.investment = investment;
        self
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn bookkeeping_no(&self) -> &str {
        &self.bookkeeping_no
    }

    pub fn fund(&self) -> &str {
        &self.fund
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn number_of_shares(&self) -> &str {
        &self.number_of_shares
    }

    pub fn stamp_duty_amount(&self) -> Amount {
        self.stamp_duty_amount
    }

    pub fn investment(&self) -> Investment {
        self.investment
    }

    /// The recognized kind of this record, `None` when the description means nothing to us.
    pub fn kind(&self) -> Option<Kind> {
        self.description.parse().ok()
    }

    pub fn is_trade(&self) -> bool {
        self.kind() == Some(Kind::Trade)
    }

    pub fn is_stamp_duty(&self) -> bool {
        self.kind() == Some(Kind::StampDuty)
    }
}

//! Validated decision request.

use serde::{Deserialize, Serialize};

use crate::domain::catalog::{AccountStage, Category};
use crate::domain::foundation::{UserId, ValidationError};

/// Minimum and maximum listing slots a seller can commit to per day.
pub const MIN_DAILY_SLOTS: u8 = 1;
pub const MAX_DAILY_SLOTS: u8 = 3;

/// A request for a single merchandising decision.
///
/// Category and stage are enforced by the type system; the slot bound is
/// enforced at construction so the engine never sees an invalid request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionRequest {
    pub user_id: UserId,
    pub category: Category,
    pub price_band: String,
    pub account_stage: AccountStage,
    pub daily_slots: u8,
    pub in_stock: bool,
    pub notes: Option<String>,
}

impl DecisionRequest {
    pub fn new(
        user_id: UserId,
        category: Category,
        price_band: impl Into<String>,
        account_stage: AccountStage,
        daily_slots: u8,
        in_stock: bool,
        notes: Option<String>,
    ) -> Result<Self, ValidationError> {
        if !(MIN_DAILY_SLOTS..=MAX_DAILY_SLOTS).contains(&daily_slots) {
            return Err(ValidationError::out_of_range(
                "daily_slots",
                MIN_DAILY_SLOTS as i32,
                MAX_DAILY_SLOTS as i32,
                daily_slots as i32,
            ));
        }

        Ok(Self {
            user_id,
            category,
            price_band: price_band.into(),
            account_stage,
            daily_slots,
            in_stock,
            notes,
        })
    }
}

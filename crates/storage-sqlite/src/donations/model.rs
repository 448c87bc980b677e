//! Database models for donations.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use healthpal_core::donations::Donation;
use healthpal_core::Result;

use crate::utils::{amount_from_column, amount_to_column};

/// Database model for donations. Rows are insert-only.
#[derive(Queryable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::donations)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct DonationDB {
    pub id: String,
    pub donor_id: String,
    pub treatment_id: String,
    pub amount: String,
    pub receipt_url: Option<String>,
    pub created_at: NaiveDateTime,
}

impl TryFrom<DonationDB> for Donation {
    type Error = healthpal_core::Error;

    fn try_from(db: DonationDB) -> Result<Self> {
        Ok(Self {
            amount: amount_from_column("donations.amount", &db.amount)?,
            id: db.id,
            donor_id: db.donor_id,
            treatment_id: db.treatment_id,
            receipt_url: db.receipt_url,
            created_at: db.created_at,
        })
    }
}

impl From<&Donation> for DonationDB {
    fn from(domain: &Donation) -> Self {
        Self {
            id: domain.id.clone(),
            donor_id: domain.donor_id.clone(),
            treatment_id: domain.treatment_id.clone(),
            amount: amount_to_column(domain.amount),
            receipt_url: domain.receipt_url.clone(),
            created_at: domain.created_at,
        }
    }
}

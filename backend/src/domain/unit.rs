//! Rentable unit aggregate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

use super::money::{Money, MoneyValidationError};
use super::user::UserId;

/// Maximum accepted description length in characters.
pub const MAX_DESCRIPTION_LEN: usize = 1000;

/// Unique unit identifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, PartialOrd, Ord,
)]
#[serde(transparent)]
pub struct UnitId(Uuid);

impl UnitId {
    /// Generate a fresh random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// The underlying UUID.
    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl std::fmt::Display for UnitId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Category of accommodation a unit offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AccommodationType {
    Home,
    Flat,
    Apartments,
    Hotel,
}

/// Field values supplied when creating or updating a unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitDraft {
    pub number_of_rooms: u32,
    pub accommodation_type: AccommodationType,
    pub floor: u32,
    pub base_cost: Money,
    /// Defaults to `base_cost` when omitted.
    pub final_cost: Option<Money>,
    pub description: String,
    pub owner_id: UserId,
}

/// Validation errors raised when constructing or updating a [`Unit`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnitValidationError {
    /// Units must offer at least one room.
    #[error("unit must have at least one room")]
    NoRooms,
    /// Base or final cost failed the positivity invariant.
    #[error("unit cost invalid: {0}")]
    Cost(#[from] MoneyValidationError),
    /// Description is empty or exceeds [`MAX_DESCRIPTION_LEN`].
    #[error("unit description must be between 1 and {MAX_DESCRIPTION_LEN} characters")]
    DescriptionLength,
}

/// A rentable unit listed by an owner.
///
/// ## Invariants
/// - `base_cost` and `final_cost` are strictly positive.
/// - `number_of_rooms >= 1`; description is 1..=1000 characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub id: UnitId,
    pub number_of_rooms: u32,
    pub accommodation_type: AccommodationType,
    pub floor: u32,
    pub base_cost: Money,
    pub final_cost: Money,
    pub description: String,
    pub owner_id: UserId,
    pub created_at: DateTime<Utc>,
}

fn validate_draft(draft: &UnitDraft) -> Result<(), UnitValidationError> {
    if draft.number_of_rooms == 0 {
        return Err(UnitValidationError::NoRooms);
    }
    Money::positive(draft.base_cost.cents())?;
    if let Some(final_cost) = draft.final_cost {
        Money::positive(final_cost.cents())?;
    }
    let len = draft.description.chars().count();
    if len == 0 || len > MAX_DESCRIPTION_LEN {
        return Err(UnitValidationError::DescriptionLength);
    }
    Ok(())
}

impl Unit {
    /// Construct a unit with a fresh id. The final cost defaults to the base
    /// cost when the draft leaves it unset.
    pub fn new(draft: UnitDraft, created_at: DateTime<Utc>) -> Result<Self, UnitValidationError> {
        validate_draft(&draft)?;
        Ok(Self {
            id: UnitId::random(),
            number_of_rooms: draft.number_of_rooms,
            accommodation_type: draft.accommodation_type,
            floor: draft.floor,
            base_cost: draft.base_cost,
            final_cost: draft.final_cost.unwrap_or(draft.base_cost),
            description: draft.description,
            owner_id: draft.owner_id,
            created_at,
        })
    }

    /// Replace every mutable field from a draft, preserving id and creation
    /// timestamp.
    pub fn apply_update(&mut self, draft: UnitDraft) -> Result<(), UnitValidationError> {
        validate_draft(&draft)?;
        self.number_of_rooms = draft.number_of_rooms;
        self.accommodation_type = draft.accommodation_type;
        self.floor = draft.floor;
        self.base_cost = draft.base_cost;
        self.final_cost = draft.final_cost.unwrap_or(draft.base_cost);
        self.description = draft.description;
        self.owner_id = draft.owner_id;
        Ok(())
    }
}

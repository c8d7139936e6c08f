//! Startup seeding of demo inventory.
//!
//! Populates an empty store with a system user and 90 generated units so the
//! service has something to book out of the box. Generation is deterministic
//! so repeated runs against a persistent store would produce the same
//! catalogue.

use tracing::info;

use crate::domain::{AccommodationType, Error, Money, UnitDraft, UnitService, UserService};

/// Number of units created on an empty store.
pub const SEED_UNIT_COUNT: u32 = 90;
/// Email of the user owning the seeded units.
pub const SEED_OWNER_EMAIL: &str = "system@booking.com";

/// What a seeding run did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// The store was empty; the catalogue was created.
    Applied { units: u32 },
    /// Units already exist; nothing was written.
    AlreadySeeded,
}

const ACCOMMODATION_TYPES: [AccommodationType; 4] = [
    AccommodationType::Home,
    AccommodationType::Flat,
    AccommodationType::Apartments,
    AccommodationType::Hotel,
];

fn seeded_draft(index: u32, owner_id: crate::domain::UserId) -> UnitDraft {
    // Spread rooms, floors, types, and costs across the catalogue.
    UnitDraft {
        number_of_rooms: 1 + index % 5,
        accommodation_type: ACCOMMODATION_TYPES[(index % 4) as usize],
        floor: 1 + index % 20,
        base_cost: Money::from_cents(5_000 + i64::from(index % 19) * 5_000),
        final_cost: None,
        description: format!("Generated unit #{}", index + 1),
        owner_id,
    }
}

/// Seed the demo catalogue when the store holds no units.
pub async fn seed_demo_data(
    users: &UserService,
    units: &UnitService,
) -> Result<SeedOutcome, Error> {
    if units.count_total_units().await? > 0 {
        return Ok(SeedOutcome::AlreadySeeded);
    }

    let owner = users.create_user(SEED_OWNER_EMAIL, "System User").await?;

    for index in 0..SEED_UNIT_COUNT {
        units.create_unit(seeded_draft(index, owner.id)).await?;
    }

    info!(units = SEED_UNIT_COUNT, owner = %owner.id, "demo catalogue seeded");
    Ok(SeedOutcome::Applied {
        units: SEED_UNIT_COUNT,
    })
}

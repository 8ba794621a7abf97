// ABOUTME: Activity sources feeding candidate lists to the selection engine
// ABOUTME: Source trait, default activity catalogue and an in-memory source
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// `SQLite`-backed activity store
pub mod sqlite;

pub use sqlite::SqliteActivityStore;

use crate::errors::SelectionError;
use crate::models::Activity;
use async_trait::async_trait;

/// Supplies candidate activities filtered by sun preference
#[async_trait]
pub trait ActivitySource: Send + Sync {
    /// Activities whose `favors_sun` equals `sunny`
    ///
    /// # Errors
    ///
    /// Returns `SelectionError::Store` if the backing store cannot be read
    async fn fetch_activities(&self, sunny: bool) -> Result<Vec<Activity>, SelectionError>;
}

/// Activities seeded into an empty store
#[must_use]
pub fn default_activities() -> Vec<Activity> {
    [
        ("shopping belfast", "Belfast", true),
        ("mini golf", "Craigavon", true),
        ("shopping dublin", "Dublin", true),
        ("cinema", "Lisburn", false),
        ("axe throwing", "Belfast", false),
        ("swimming", "Armagh", false),
        ("Walk around Stormount", "Belfast", false),
        ("Hike Cavehill", "Belfast", true),
        ("Trip to the causeway coast", "Coleraine", true),
        ("Walk around castlewellan", "Castlewellan", true),
        ("Gosford Forest Park", "Armagh", true),
        ("Go to the Ulster folk and Transport Museum", "Omagh", false),
        ("Slieve Guillion Trip", "Armagh", true),
        ("Marble Arch Caves", "Fermanagh", true),
        ("Cuilcagh (Stairway to Heaven)", "Fermanagh", true),
    ]
    .into_iter()
    .map(|(name, location, favors_sun)| Activity::new(name, location, favors_sun))
    .collect()
}

/// Fixed in-memory activity list
#[derive(Debug, Clone, Default)]
pub struct StaticActivitySource {
    activities: Vec<Activity>,
}

impl StaticActivitySource {
    /// Source over the given activities
    #[must_use]
    pub const fn new(activities: Vec<Activity>) -> Self {
        Self { activities }
    }

    /// Source over `default_activities()`
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(default_activities())
    }
}

#[async_trait]
impl ActivitySource for StaticActivitySource {
    async fn fetch_activities(&self, sunny: bool) -> Result<Vec<Activity>, SelectionError> {
        Ok(self
            .activities
            .iter()
            .filter(|activity| activity.favors_sun == sunny)
            .cloned()
            .collect())
    }
}

// ABOUTME: SQLite activity store built on sqlx
// ABOUTME: Creates the activities table, seeds defaults and serves candidate queries
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{default_activities, ActivitySource};
use crate::errors::SelectionError;
use crate::models::Activity;
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use tracing::{info, instrument};

/// Activity store backed by a `SQLite` pool
#[derive(Clone)]
pub struct SqliteActivityStore {
    pool: SqlitePool,
}

impl SqliteActivityStore {
    /// Open (creating if needed) the database at `database_url` and run migrations
    ///
    /// In-memory URLs use a single connection so every query sees the same database.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the database cannot be opened
    pub async fn connect(database_url: &str) -> Result<Self> {
        let in_memory = database_url.contains(":memory:");
        let options = SqliteConnectOptions::from_str(database_url)
            .with_context(|| format!("Invalid database URL: {database_url}"))?
            .create_if_missing(true);

        if !in_memory {
            if let Some(parent) = options
                .get_filename()
                .parent()
                .filter(|dir| !dir.as_os_str().is_empty())
            {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create database directory {}", parent.display())
                })?;
            }
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(if in_memory { 1 } else { 5 })
            .connect_with(options)
            .await
            .context("Failed to open activity database")?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    /// Get a reference to the database pool
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create the activities table
    ///
    /// # Errors
    ///
    /// Returns an error if the statement fails
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS activities (
                name TEXT NOT NULL,
                postcode TEXT NOT NULL,
                sunny BOOLEAN NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await
        .context("Failed to create activities table")?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_activities_sunny ON activities(sunny)")
            .execute(&self.pool)
            .await
            .context("Failed to create activities index")?;

        Ok(())
    }

    /// Number of stored activities
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn count(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS total FROM activities")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.try_get("total")?)
    }

    /// Insert one activity
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails
    pub async fn insert_activity(&self, activity: &Activity) -> Result<()> {
        sqlx::query("INSERT INTO activities (name, postcode, sunny) VALUES (?1, ?2, ?3)")
            .bind(&activity.name)
            .bind(&activity.location)
            .bind(activity.favors_sun)
            .execute(&self.pool)
            .await
            .with_context(|| format!("Failed to insert activity {}", activity.name))?;
        Ok(())
    }

    /// Insert the default activities when the table is empty
    ///
    /// Returns the number of rows inserted.
    ///
    /// # Errors
    ///
    /// Returns an error if counting or inserting fails
    pub async fn seed_defaults_if_empty(&self) -> Result<usize> {
        if self.count().await? > 0 {
            return Ok(0);
        }

        let defaults = default_activities();
        let mut tx = self.pool.begin().await?;
        for activity in &defaults {
            sqlx::query("INSERT INTO activities (name, postcode, sunny) VALUES (?1, ?2, ?3)")
                .bind(&activity.name)
                .bind(&activity.location)
                .bind(activity.favors_sun)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;

        info!(count = defaults.len(), "Seeded default activities");
        Ok(defaults.len())
    }
}

#[async_trait]
impl ActivitySource for SqliteActivityStore {
    #[instrument(skip(self))]
    async fn fetch_activities(&self, sunny: bool) -> Result<Vec<Activity>, SelectionError> {
        let rows = sqlx::query("SELECT name, postcode, sunny FROM activities WHERE sunny = ?1")
            .bind(sunny)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| SelectionError::Store(e.to_string()))?;

        rows.iter()
            .map(|row| {
                Ok(Activity::new(
                    row.try_get::<String, _>("name")?,
                    row.try_get::<String, _>("postcode")?,
                    row.try_get::<bool, _>("sunny")?,
                ))
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()
            .map_err(|e| SelectionError::Store(e.to_string()))
    }
}

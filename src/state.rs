// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Caller-owned view state kept between invocations in the `settings` table.
//!
//! Nothing in `filters` or `aggregate` reads this; commands load it and pass it in.

use crate::filters::Filters;
use crate::models::ViewType;
use anyhow::Result;
use rusqlite::{Connection, OptionalExtension, params};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

const FILTERS_KEY: &str = "filters";
const VIEW_KEY: &str = "view_type";

fn get_setting(conn: &Connection, key: &str) -> Result<Option<String>> {
    let v: Option<String> = conn
        .query_row(
            "SELECT value FROM settings WHERE key=?1",
            params![key],
            |r| r.get(0),
        )
        .optional()?;
    Ok(v)
}

fn set_setting(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, value],
    )?;
    Ok(())
}

/// Unreadable stored state falls back to the default instead of blocking the command.
fn load_json<T: DeserializeOwned + Default>(conn: &Connection, key: &str) -> Result<T> {
    match get_setting(conn, key)? {
        Some(raw) => match serde_json::from_str(&raw) {
            Ok(v) => Ok(v),
            Err(e) => {
                warn!("ignoring unreadable '{}' setting: {}", key, e);
                Ok(T::default())
            }
        },
        None => Ok(T::default()),
    }
}

fn save_json<T: Serialize>(conn: &Connection, key: &str, value: &T) -> Result<()> {
    set_setting(conn, key, &serde_json::to_string(value)?)
}

pub fn load_filters(conn: &Connection) -> Result<Filters> {
    load_json(conn, FILTERS_KEY)
}

pub fn save_filters(conn: &Connection, filters: &Filters) -> Result<()> {
    save_json(conn, FILTERS_KEY, filters)
}

/// Called after every insert, update and delete so no stale filtered view survives.
pub fn reset_filters(conn: &Connection) -> Result<()> {
    conn.execute("DELETE FROM settings WHERE key=?1", params![FILTERS_KEY])?;
    debug!("filters reset to defaults");
    Ok(())
}

pub fn load_view(conn: &Connection) -> Result<ViewType> {
    load_json(conn, VIEW_KEY)
}

pub fn save_view(conn: &Connection, view: ViewType) -> Result<()> {
    save_json(conn, VIEW_KEY, &view)
}

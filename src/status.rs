/*
 *  status.rs
 *
 *  stratux-screen - receiver status at a glance
 *	(c) 2026 Stratux Screen contributors
 *
 *  Receiver status acquisition - getStatus + getTowers merged into one snapshot
 *
 *	This program is free software: you can redistribute it and/or modify
 *	it under the terms of the GNU General Public License as published by
 *	the Free Software Foundation, either version 3 of the License, or
 *	(at your option) any later version.
 *
 *	This program is distributed in the hope that it will be useful,
 *	but WITHOUT ANY WARRANTY; without even the implied warranty of
 *	MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *	GNU General Public License for more details.
 *
 *	See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *	Public License.
 *
 */

use std::collections::HashMap;
use std::time::Duration;

use log::debug;
use reqwest::{Client, header};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::config::StatusConfig;
use crate::deutils::{deserialize_count, deserialize_numeric_f64, deserialize_truthy};

/// Marker in `GPS_solution` for an SBAS augmented fix.
pub const WAAS_MARKER: &str = "WAAS";

/// Errors raised while acquiring a status snapshot.
#[derive(Debug, Error)]
pub enum AcquisitionError {
    /// Connection failure, timeout or non-2xx response.
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    /// Body is not JSON, or a required field is missing or mistyped.
    #[error("unusable response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("unable to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// The fields of `getStatus` the screen consumes. All of them are required.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusReport {
    #[serde(rename = "UAT_messages_last_minute", deserialize_with = "deserialize_count")]
    pub uat_messages_last_minute: u64,
    #[serde(rename = "UAT_messages_max", deserialize_with = "deserialize_count")]
    pub uat_messages_max: u64,
    #[serde(rename = "ES_messages_last_minute", deserialize_with = "deserialize_count")]
    pub es_messages_last_minute: u64,
    #[serde(rename = "ES_messages_max", deserialize_with = "deserialize_count")]
    pub es_messages_max: u64,
    #[serde(rename = "CPUTemp", deserialize_with = "deserialize_numeric_f64")]
    pub cpu_temperature: f64,
    #[serde(rename = "GPS_satellites_locked", deserialize_with = "deserialize_count")]
    pub gps_satellites_locked: u64,
    #[serde(rename = "GPS_satellites_seen", deserialize_with = "deserialize_count")]
    pub gps_satellites_seen: u64,
    #[serde(rename = "GPS_satellites_tracked", deserialize_with = "deserialize_count")]
    pub gps_satellites_tracked: u64,
    #[serde(rename = "GPS_solution")]
    pub gps_solution: String,
}

/// One `getTowers` entry, reduced to whether it heard anything in the last minute.
#[derive(Debug, Clone, Deserialize)]
pub struct TowerReport {
    #[serde(rename = "Messages_last_minute", default, deserialize_with = "deserialize_truthy")]
    pub active: bool,
}

/// `getTowers` is keyed by an opaque "lat,lng" string. Stratux answers `null` when it has none.
pub type TowerMap = Option<HashMap<String, TowerReport>>;

/// One merged status record, valid for a single render cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusSnapshot {
    pub uat_messages_last_minute: u64,
    pub uat_messages_max: u64,
    pub es_messages_last_minute: u64,
    pub es_messages_max: u64,
    pub cpu_temperature: f64,
    pub gps_satellites_locked: u64,
    pub gps_satellites_seen: u64,
    pub gps_satellites_tracked: u64,
    pub gps_solution: String,
    pub tower_count: usize,
}

impl StatusSnapshot {
    /// Merge a status report with the full tower map; the tower count is always recomputed here.
    pub fn merge(report: StatusReport, towers: &TowerMap) -> Self {
        StatusSnapshot {
            uat_messages_last_minute: report.uat_messages_last_minute,
            uat_messages_max: report.uat_messages_max,
            es_messages_last_minute: report.es_messages_last_minute,
            es_messages_max: report.es_messages_max,
            cpu_temperature: report.cpu_temperature,
            gps_satellites_locked: report.gps_satellites_locked,
            gps_satellites_seen: report.gps_satellites_seen,
            gps_satellites_tracked: report.gps_satellites_tracked,
            gps_solution: report.gps_solution,
            tower_count: count_active_towers(towers),
        }
    }

    /// Whether the GPS solution is SBAS augmented.
    pub fn has_waas(&self) -> bool {
        self.gps_solution.contains(WAAS_MARKER)
    }
}

/// Number of towers with a nonzero last-minute message count.
pub fn count_active_towers(towers: &TowerMap) -> usize {
    match towers {
        Some(map) => {
            for (key, tower) in map {
                debug!("tower {} active={}", key, tower.active);
            }
            map.values().filter(|t| t.active).count()
        }
        None => 0,
    }
}

/// Anything that can produce a fresh snapshot per cycle.
#[allow(async_fn_in_trait)]
pub trait StatusSource {
    async fn fetch_snapshot(&self) -> Result<StatusSnapshot, AcquisitionError>;
}

/// HTTP client for the local Stratux status API.
#[derive(Debug, Clone)]
pub struct StatusClient {
    client: Client,
    status_url: String,
    towers_url: String,
}

impl StatusClient {
    /// Creates a client with bounded request and connect timeouts.
    pub fn new(config: &StatusConfig) -> Result<Self, AcquisitionError> {
        const VERSION: &str = concat!(env!("CARGO_PKG_NAME"), " v", env!("CARGO_PKG_VERSION"));

        let mut headers = header::HeaderMap::new();
        headers.insert("User-Agent", header::HeaderValue::from_static(VERSION));
        headers.insert("Accept", header::HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .http1_only()
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .timeout(Duration::from_millis(config.timeout_ms))
            .default_headers(headers)
            .build()
            .map_err(AcquisitionError::Client)?;

        let base = config.base_url.trim_end_matches('/');
        Ok(StatusClient {
            client,
            status_url: format!("{}/getStatus", base),
            towers_url: format!("{}/getTowers", base),
        })
    }

    pub fn status_url(&self) -> &str {
        &self.status_url
    }

    pub fn towers_url(&self) -> &str {
        &self.towers_url
    }

    /// GET `url` and decode the body as `T`.
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, AcquisitionError> {
        let request_error = |source| AcquisitionError::Request { url: url.to_string(), source };

        let response = self.client
            .get(url)
            .send()
            .await
            .map_err(request_error)?
            .error_for_status() // none 2xx raise
            .map_err(request_error)?;

        let body = response.text().await.map_err(request_error)?;

        serde_json::from_str(&body).map_err(|source| AcquisitionError::Decode {
            url: url.to_string(),
            source,
        })
    }
}

impl StatusSource for StatusClient {
    /// Both resources must arrive before a snapshot exists; there is no internal retry.
    async fn fetch_snapshot(&self) -> Result<StatusSnapshot, AcquisitionError> {
        let (report, towers) = tokio::try_join!(
            self.get_json::<StatusReport>(&self.status_url),
            self.get_json::<TowerMap>(&self.towers_url),
        )?;
        Ok(StatusSnapshot::merge(report, &towers))
    }
}

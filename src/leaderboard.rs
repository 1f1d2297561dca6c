//! REST client for the shared score table plus the pure aggregation that
//! turns raw rows into display stats. Network calls go through the browser
//! fetch API; everything below [`aggregate`] is host-testable.

use serde::{Deserialize, Serialize};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, Response};

use crate::config::ApiConfig;
use crate::errors::NetworkError;

const TABLE_PATH: &str = "/rest/v1/game_scores";

/// Rows shown in the top-scores view.
pub const LEADERBOARD_LIMIT: usize = 15;

/// A persisted score row. Optional fields tolerate narrow `select=` queries
/// that omit columns.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ScoreRecord {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub player_name: String,
    pub score: i64,
    pub attempts: u32,
    /// Milliseconds from first flip to last match.
    pub completion_time: i64,
    #[serde(default)]
    pub total_pairs: Option<u32>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Insert payload. The server computes `score` and `created_at` itself.
#[derive(Debug, Serialize)]
pub struct NewScore {
    pub player_name: String,
    pub attempts: u32,
    pub completion_time: i64,
    pub total_pairs: u32,
    pub difficulty: &'static str,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameStats {
    pub total_games: u64,
    pub average_score: i64,
    pub best_score: i64,
    pub average_time_seconds: i64,
    pub average_attempts: i64,
}

/// Fold score rows into the stats panel numbers. An empty slice yields all
/// zeros rather than NaN averages.
pub fn aggregate(records: &[ScoreRecord]) -> GameStats {
    if records.is_empty() {
        return GameStats::default();
    }
    let n = records.len() as f64;
    let mean = |f: &dyn Fn(&ScoreRecord) -> f64| {
        (records.iter().map(|r| f(r)).sum::<f64>() / n).round() as i64
    };
    GameStats {
        total_games: records.len() as u64,
        average_score: mean(&|r| r.score as f64),
        best_score: records.iter().map(|r| r.score).max().unwrap_or(0),
        average_time_seconds: mean(&|r| r.completion_time as f64 / 1000.0),
        average_attempts: mean(&|r| r.attempts as f64),
    }
}

fn js_err(value: JsValue) -> NetworkError {
    let text = value
        .as_string()
        .unwrap_or_else(|| format!("{value:?}"));
    NetworkError::Request(text)
}

/// One authenticated round trip. Returns the raw body text; callers decode.
async fn request_text(
    method: &str,
    url: &str,
    config: &ApiConfig,
    body: Option<String>,
    prefer: Option<&str>,
) -> Result<String, NetworkError> {
    let init = RequestInit::new();
    init.set_method(method);
    if let Some(payload) = &body {
        init.set_body(&JsValue::from_str(payload));
    }
    let request = Request::new_with_str_and_init(url, &init).map_err(js_err)?;
    let headers = request.headers();
    headers.set("apikey", &config.key).map_err(js_err)?;
    headers
        .set("Authorization", &format!("Bearer {}", config.key))
        .map_err(js_err)?;
    if body.is_some() {
        headers
            .set("Content-Type", "application/json")
            .map_err(js_err)?;
    }
    if let Some(value) = prefer {
        headers.set("Prefer", value).map_err(js_err)?;
    }

    let window = web_sys::window().ok_or(NetworkError::NotConfigured)?;
    let response = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(js_err)?;
    let response: Response = response.dyn_into().map_err(js_err)?;
    if !response.ok() {
        return Err(NetworkError::Status(response.status()));
    }
    let text = JsFuture::from(response.text().map_err(js_err)?)
        .await
        .map_err(js_err)?;
    Ok(text.as_string().unwrap_or_default())
}

/// Insert a finished game and return the stored row.
pub async fn submit_score(config: &ApiConfig, entry: &NewScore) -> Result<ScoreRecord, NetworkError> {
    if !config.is_configured() {
        return Err(NetworkError::NotConfigured);
    }
    let url = format!("{}{}", config.url, TABLE_PATH);
    let payload = serde_json::to_string(entry)?;
    let text = request_text(
        "POST",
        &url,
        config,
        Some(payload),
        Some("return=representation"),
    )
    .await?;
    let mut rows: Vec<ScoreRecord> = serde_json::from_str(&text)?;
    rows.pop()
        .ok_or_else(|| NetworkError::Request("empty insert response".to_string()))
}

/// Top rows, best score first, newest breaking ties.
pub async fn fetch_leaderboard(
    config: &ApiConfig,
    limit: usize,
) -> Result<Vec<ScoreRecord>, NetworkError> {
    if !config.is_configured() {
        return Err(NetworkError::NotConfigured);
    }
    let url = format!(
        "{}{}?select=*&order=score.desc,created_at.desc&limit={limit}",
        config.url, TABLE_PATH
    );
    let text = request_text("GET", &url, config, None, None).await?;
    Ok(serde_json::from_str(&text)?)
}

/// All rows reduced to aggregate stats. The query pulls only the columns the
/// aggregation needs.
pub async fn fetch_stats(config: &ApiConfig) -> Result<GameStats, NetworkError> {
    if !config.is_configured() {
        return Err(NetworkError::NotConfigured);
    }
    let url = format!(
        "{}{}?select=score,attempts,completion_time,created_at",
        config.url, TABLE_PATH
    );
    let text = request_text("GET", &url, config, None, None).await?;
    let rows: Vec<ScoreRecord> = serde_json::from_str(&text)?;
    Ok(aggregate(&rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(score: i64, attempts: u32, ms: i64) -> ScoreRecord {
        ScoreRecord {
            id: None,
            player_name: String::new(),
            score,
            attempts,
            completion_time: ms,
            total_pairs: None,
            created_at: None,
        }
    }

    #[test]
    fn empty_table_aggregates_to_zeros() {
        assert_eq!(aggregate(&[]), GameStats::default());
    }

    #[test]
    fn aggregates_round_their_means() {
        let rows = [row(900, 10, 60_000), row(800, 15, 45_500), row(1000, 8, 30_000)];
        let stats = aggregate(&rows);
        assert_eq!(stats.total_games, 3);
        assert_eq!(stats.average_score, 900);
        assert_eq!(stats.best_score, 1000);
        // (60.0 + 45.5 + 30.0) / 3 = 45.17 rounds to 45
        assert_eq!(stats.average_time_seconds, 45);
        assert_eq!(stats.average_attempts, 11);
    }

    #[test]
    fn full_rows_deserialize() {
        let json = r#"[{
            "id": 42,
            "player_name": "alice",
            "score": 940,
            "attempts": 9,
            "completion_time": 45400,
            "total_pairs": 8,
            "difficulty": "normal",
            "created_at": "2024-05-01T12:34:56.789Z"
        }]"#;
        let rows: Vec<ScoreRecord> = serde_json::from_str(json).unwrap();
        assert_eq!(rows[0].id, Some(42));
        assert_eq!(rows[0].player_name, "alice");
        assert_eq!(rows[0].score, 940);
        assert_eq!(rows[0].completion_time, 45400);
        assert_eq!(rows[0].total_pairs, Some(8));
    }

    #[test]
    fn narrow_selects_fill_in_defaults() {
        let json = r#"[{"score": 700, "attempts": 20, "completion_time": 61000}]"#;
        let rows: Vec<ScoreRecord> = serde_json::from_str(json).unwrap();
        assert_eq!(rows[0].player_name, "");
        assert_eq!(rows[0].id, None);
        assert_eq!(rows[0].created_at, None);
    }

    #[test]
    fn insert_payload_carries_every_column() {
        let entry = NewScore {
            player_name: "bob".to_string(),
            attempts: 12,
            completion_time: 52000,
            total_pairs: 8,
            difficulty: "normal",
        };
        let json = serde_json::to_string(&entry).unwrap();
        for needle in [
            "\"player_name\":\"bob\"",
            "\"attempts\":12",
            "\"completion_time\":52000",
            "\"total_pairs\":8",
            "\"difficulty\":\"normal\"",
        ] {
            assert!(json.contains(needle), "missing {needle} in {json}");
        }
    }
}

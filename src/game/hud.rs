//! DOM overlays around the canvas: the stat bar, status line, player name
//! input, buttons and the leaderboard modal. All HTML snippets are built by
//! pure string functions so they can be unit-tested off the browser; the DOM
//! glue is get-or-create by element id with inline styles.

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlInputElement};

use super::board::Board;
use super::session::GameSession;
use crate::leaderboard::{GameStats, ScoreRecord};

const PANEL_BG: &str = "background:rgba(0,0,0,0.42); border:1px solid #333; border-radius:8px;";

const MODAL_HIDDEN: &str = "position:fixed; inset:0; display:none; align-items:center; justify-content:center; background:rgba(0,0,0,0.6); z-index:90;";
const MODAL_SHOWN: &str = "position:fixed; inset:0; display:flex; align-items:center; justify-content:center; background:rgba(0,0,0,0.6); z-index:90;";

// --- Pure formatting helpers -------------------------------------------------

/// Milliseconds to a zero-padded MM:SS readout.
pub fn format_time(ms: f64) -> String {
    let total = (ms / 1000.0).floor().max(0.0) as u64;
    format!("{:02}:{:02}", total / 60, total % 60)
}

/// Minimal HTML escaping for player-supplied text.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Medals for the podium, plain numbering below it.
pub fn rank_label(rank: usize) -> String {
    match rank {
        1 => "🥇".to_string(),
        2 => "🥈".to_string(),
        3 => "🥉".to_string(),
        n => format!("{n}."),
    }
}

/// Trim an ISO timestamp ("2024-05-01T12:34:56.789Z") down to date + HH:MM.
pub fn format_timestamp(iso: &str) -> String {
    match (iso.get(0..10), iso.get(11..16)) {
        (Some(date), Some(time)) => format!("{date} {time}"),
        (Some(date), None) => date.to_string(),
        _ => iso.to_string(),
    }
}

pub fn leaderboard_html(records: &[ScoreRecord]) -> String {
    if records.is_empty() {
        return "<p style='text-align:center; color:#9aa0b4; padding:24px 0;'>No scores yet. Finish a game to claim the top spot!</p>".to_string();
    }
    let mut html = String::new();
    for (i, r) in records.iter().enumerate() {
        let when = r
            .created_at
            .as_deref()
            .map(format_timestamp)
            .unwrap_or_default();
        html.push_str(&format!(
            "<div style='display:flex; justify-content:space-between; align-items:baseline; gap:10px; padding:7px 4px; border-bottom:1px solid #2a2f45;'>\
<span style='min-width:2.2em;'>{rank}</span>\
<span style='flex:1; overflow:hidden; text-overflow:ellipsis;'>{name}</span>\
<span style='font-weight:bold;'>{score}</span>\
<span style='color:#9aa0b4;'>{attempts} tries · {secs}s</span>\
<span style='color:#6b7089; font-size:12px;'>{when}</span>\
</div>",
            rank = rank_label(i + 1),
            name = escape_html(&r.player_name),
            score = r.score,
            attempts = r.attempts,
            secs = (r.completion_time as f64 / 1000.0).round() as i64,
        ));
    }
    html
}

pub fn stats_html(stats: &GameStats) -> String {
    let cell = |number: String, label: &str| {
        format!(
            "<div style='padding:12px; {PANEL_BG} text-align:center;'>\
<div style='font-size:22px; font-weight:bold;'>{number}</div>\
<div style='color:#9aa0b4; font-size:12px;'>{label}</div></div>"
        )
    };
    format!(
        "<div style='display:grid; grid-template-columns:1fr 1fr; gap:10px;'>{}{}{}{}{}</div>",
        cell(stats.total_games.to_string(), "Games played"),
        cell(stats.best_score.to_string(), "Best score"),
        cell(stats.average_score.to_string(), "Average score"),
        cell(stats.average_attempts.to_string(), "Average attempts"),
        cell(format!("{}s", stats.average_time_seconds), "Average time"),
    )
}

pub fn loading_html(what: &str) -> String {
    format!("<p style='text-align:center; color:#9aa0b4; padding:24px 0;'>Loading {what}…</p>")
}

pub fn error_html(message: &str) -> String {
    format!(
        "<p style='text-align:center; color:#ff6b6b; padding:24px 0;'>Could not load: {}</p>",
        escape_html(message)
    )
}

// --- Overlay creation & sync --------------------------------------------------

/// Create the stat bar, controls and status line if the page does not
/// already provide them.
pub fn ensure_overlays(doc: &Document) -> Result<(), JsValue> {
    if doc.get_element_by_id("mm-stats").is_none() {
        if let Some(body) = doc.body() {
            let div = doc.create_element("div")?;
            div.set_id("mm-stats");
            div.set_inner_html(
                "<span>Time <b id='mm-timer'>00:00</b></span>\
                 <span>Attempts <b id='mm-attempts'>0</b></span>\
                 <span>Pairs <b id='mm-matches'>0/0</b></span>\
                 <span>Score <b id='mm-score'>0</b></span>",
            );
            div.set_attribute("style", &format!("position:fixed; top:10px; left:50%; transform:translateX(-50%); display:flex; gap:18px; font-family:'Fira Code', monospace; font-size:15px; padding:6px 14px; {PANEL_BG} color:#ffd166; z-index:45;")).ok();
            body.append_child(&div)?;
        }
    }
    if doc.get_element_by_id("mm-controls").is_none() {
        if let Some(body) = doc.body() {
            let div = doc.create_element("div")?;
            div.set_id("mm-controls");
            div.set_inner_html(
                "<input id='mm-name' maxlength='20' placeholder='Your name' \
                 style='padding:5px 8px; border-radius:6px; border:1px solid #333; background:#12131c; color:#eee;'>\
                 <button id='mm-reset' style='padding:5px 12px; border-radius:6px; border:none; background:#4a90e2; color:#fff; cursor:pointer;'>New Game</button>\
                 <button id='mm-lb-btn' style='padding:5px 12px; border-radius:6px; border:none; background:#667eea; color:#fff; cursor:pointer;'>Leaderboard</button>",
            );
            div.set_attribute("style", &format!("position:fixed; top:52px; left:50%; transform:translateX(-50%); display:flex; gap:8px; font-family:'Fira Code', monospace; font-size:14px; padding:6px 10px; {PANEL_BG} z-index:45;")).ok();
            body.append_child(&div)?;
        }
    }
    if doc.get_element_by_id("mm-status").is_none() {
        if let Some(body) = doc.body() {
            let div = doc.create_element("div")?;
            div.set_id("mm-status");
            div.set_text_content(Some(""));
            div.set_attribute("style", &format!("position:fixed; bottom:16px; left:50%; transform:translateX(-50%); font-family:'Fira Code', monospace; font-size:14px; padding:6px 12px; {PANEL_BG} color:#ffd166; z-index:45;")).ok();
            body.append_child(&div)?;
        }
    }
    Ok(())
}

/// Create the leaderboard modal (hidden) if missing.
pub fn ensure_modal(doc: &Document) -> Result<(), JsValue> {
    if doc.get_element_by_id("mm-lb-modal").is_some() {
        return Ok(());
    }
    let Some(body) = doc.body() else {
        return Err(JsValue::from_str("no body"));
    };
    let modal = doc.create_element("div")?;
    modal.set_id("mm-lb-modal");
    modal.set_attribute("style", MODAL_HIDDEN).ok();
    modal.set_inner_html(
        "<div id='mm-lb-content' style='width:min(440px, 92vw); max-height:80vh; overflow-y:auto; \
         padding:18px 20px; background:#191b28; border:1px solid #333; border-radius:12px; \
         color:#eee; font-family:\"Fira Code\", monospace; font-size:14px;'>\
         <h2 id='mm-lb-title' style='margin:0 0 12px; font-size:18px; text-align:center;'>Top Scores</h2>\
         <div id='mm-lb-body'></div>\
         <div style='display:flex; gap:8px; justify-content:center; margin-top:14px;'>\
         <button id='mm-lb-refresh' style='padding:5px 12px; border-radius:6px; border:none; background:#4a90e2; color:#fff; cursor:pointer;'>Refresh</button>\
         <button id='mm-lb-toggle' style='padding:5px 12px; border-radius:6px; border:none; background:#667eea; color:#fff; cursor:pointer;'>Show Stats</button>\
         <button id='mm-lb-close' style='padding:5px 12px; border-radius:6px; border:none; background:#444; color:#fff; cursor:pointer;'>Close</button>\
         </div></div>",
    );
    body.append_child(&modal)?;
    Ok(())
}

pub fn show_modal(doc: &Document) {
    if let Some(el) = doc.get_element_by_id("mm-lb-modal") {
        el.set_attribute("style", MODAL_SHOWN).ok();
    }
}

pub fn hide_modal(doc: &Document) {
    if let Some(el) = doc.get_element_by_id("mm-lb-modal") {
        el.set_attribute("style", MODAL_HIDDEN).ok();
    }
}

pub fn set_modal_body(doc: &Document, html: &str) {
    if let Some(el) = doc.get_element_by_id("mm-lb-body") {
        el.set_inner_html(html);
    }
}

pub fn set_modal_title(doc: &Document, text: &str) {
    if let Some(el) = doc.get_element_by_id("mm-lb-title") {
        el.set_text_content(Some(text));
    }
}

pub fn set_toggle_label(doc: &Document, text: &str) {
    if let Some(el) = doc.get_element_by_id("mm-lb-toggle") {
        el.set_text_content(Some(text));
    }
}

pub fn set_status(doc: &Document, text: &str) {
    if let Some(el) = doc.get_element_by_id("mm-status") {
        el.set_text_content(Some(text));
    }
}

/// Trimmed name from the input, or the anonymous fallback.
pub fn player_name(doc: &Document) -> String {
    doc.get_element_by_id("mm-name")
        .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        .map(|input| input.value().trim().to_string())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "Anonymous".to_string())
}

fn set_text(doc: &Document, id: &str, text: &str) {
    if let Some(el) = doc.get_element_by_id(id) {
        el.set_text_content(Some(text));
    }
}

/// Push session state into the stat bar. Called once per frame.
pub fn sync_stats(doc: &Document, board: &Board, session: &GameSession, now: f64) {
    set_text(doc, "mm-timer", &format_time(session.elapsed_ms(now)));
    set_text(doc, "mm-attempts", &session.attempts().to_string());
    set_text(
        doc,
        "mm-matches",
        &format!("{}/{}", session.matched_pairs(), board.pair_count()),
    );
    set_text(doc, "mm-score", &session.display_score(now).to_string());
}

/// Event target helper for the click-outside-closes behaviour: true when the
/// click landed on the backdrop itself rather than the dialog content.
pub fn hit_backdrop(target: Option<web_sys::EventTarget>) -> bool {
    target
        .and_then(|t| t.dyn_into::<Element>().ok())
        .map(|el| el.id() == "mm-lb-modal")
        .unwrap_or(false)
}

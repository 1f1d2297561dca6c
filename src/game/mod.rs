//! Canvas game shell. Owns the global app state, wires DOM events, runs the
//! requestAnimationFrame loop and reacts to session events with particles,
//! status text and the score submission.

pub mod board;
pub mod card;
pub mod hud;
pub mod particle;
pub mod render;
pub mod session;

use std::cell::RefCell;
use std::rc::Rc;

use rand::Rng;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, window};

use crate::errors::NetworkError;
use crate::leaderboard::NewScore;
use crate::{config, leaderboard};
use self::board::Board;
use self::particle::Particle;
use self::session::{GameSession, SessionEvent, Status};

/// Victory celebration: one particle burst per step, fifty in total,
/// raining across the top third of the canvas.
const CASCADE_STEP_MS: f64 = 50.0;
const CASCADE_BURSTS: u32 = 50;

const CANVAS_STYLE: &str = "position:fixed; left:50%; top:50%; transform:translate(-50%,-50%); box-shadow:0 0 32px 0 rgba(0,0,0,0.18); border-radius:18px; border:2px solid #222; background:#1a1a2e; z-index:20;";

/// Staggered burst spawner started by the celebrate event.
struct Cascade {
    started_ms: f64,
    spawned: u32,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum ModalView {
    Scores,
    Stats,
}

struct GameApp {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    board: Board,
    session: GameSession,
    particles: Vec<Particle>,
    cascade: Option<Cascade>,
    /// Bumped on every reset; async replies from older games are dropped.
    generation: u64,
    hover: bool,
    modal_view: ModalView,
}

thread_local! {
    static APP: RefCell<Option<GameApp>> = const { RefCell::new(None) };
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

fn performance_now() -> f64 {
    window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

/// Boot the game: canvas, overlays, listeners, frame loop. Calling it again
/// on a live instance just deals a fresh board.
pub fn start(pair_count: usize) -> Result<(), JsValue> {
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let doc = win
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let (canvas_w, canvas_h) = Board::canvas_size(pair_count);

    // Already running: validate the requested size, then deal a fresh game.
    if APP.with(|cell| cell.borrow().is_some()) {
        let mut rng = rand::thread_rng();
        let board = Board::setup(
            pair_count,
            crate::CARD_SYMBOLS,
            canvas_w as f64,
            canvas_h as f64,
            &mut rng,
        )
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
        let now = performance_now();
        APP.with(|cell| {
            if let Some(app) = cell.borrow_mut().as_mut() {
                app.canvas.set_width(canvas_w);
                app.canvas.set_height(canvas_h);
                app.board = board;
                app.session = GameSession::new(now);
                app.particles.clear();
                app.cascade = None;
                app.generation += 1;
            }
        });
        hud::set_status(&doc, "");
        return Ok(());
    }

    // Deal before touching the DOM so a bad pair count leaves no trace.
    let now = performance_now();
    let mut rng = rand::thread_rng();
    let board = Board::setup(
        pair_count,
        crate::CARD_SYMBOLS,
        canvas_w as f64,
        canvas_h as f64,
        &mut rng,
    )
    .map_err(|e| JsValue::from_str(&e.to_string()))?;

    // Create / reuse the playfield canvas
    let canvas: HtmlCanvasElement = if let Some(el) = doc.get_element_by_id("mm-canvas") {
        el.dyn_into()?
    } else {
        let c: HtmlCanvasElement = doc.create_element("canvas")?.dyn_into()?;
        c.set_id("mm-canvas");
        c.set_attribute("style", CANVAS_STYLE).ok();
        doc.body()
            .ok_or_else(|| JsValue::from_str("no body"))?
            .append_child(&c)?;
        c
    };
    canvas.set_width(canvas_w);
    canvas.set_height(canvas_h);
    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("no 2d context"))?
        .dyn_into()?;

    hud::ensure_overlays(&doc)?;
    hud::ensure_modal(&doc)?;

    APP.with(|cell| {
        cell.replace(Some(GameApp {
            canvas: canvas.clone(),
            ctx,
            board,
            session: GameSession::new(now),
            particles: Vec::new(),
            cascade: None,
            generation: 0,
            hover: false,
            modal_view: ModalView::Scores,
        }))
    });

    // Card selection
    {
        let closure = Closure::wrap(Box::new(move |evt: web_sys::MouseEvent| {
            let x = evt.offset_x() as f64;
            let y = evt.offset_y() as f64;
            let now = performance_now();
            APP.with(|cell| {
                if let Some(app) = cell.borrow_mut().as_mut() {
                    if let Some(idx) = app.board.hit_test(x, y) {
                        app.session.on_card_clicked(&mut app.board, idx, now);
                    }
                }
            });
        }) as Box<dyn FnMut(_)>);
        canvas.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Pointer cursor over a selectable card
    {
        let closure = Closure::wrap(Box::new(move |evt: web_sys::MouseEvent| {
            let x = evt.offset_x() as f64;
            let y = evt.offset_y() as f64;
            APP.with(|cell| {
                if let Some(app) = cell.borrow_mut().as_mut() {
                    let hover = app.session.status() == Status::Playing
                        && app.board.hit_test(x, y).is_some();
                    if hover != app.hover {
                        app.hover = hover;
                        let cursor = if hover { "pointer" } else { "default" };
                        app.canvas
                            .set_attribute("style", &format!("{CANVAS_STYLE} cursor:{cursor};"))
                            .ok();
                    }
                }
            });
        }) as Box<dyn FnMut(_)>);
        canvas.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Escape closes the leaderboard modal
    {
        let closure = Closure::wrap(Box::new(move |evt: web_sys::KeyboardEvent| {
            if evt.key() == "Escape" {
                if let Some(doc) = window().and_then(|w| w.document()) {
                    hud::hide_modal(&doc);
                }
            }
        }) as Box<dyn FnMut(_)>);
        doc.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    if let Some(btn) = doc.get_element_by_id("mm-reset") {
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::MouseEvent| {
            reset_app();
        }) as Box<dyn FnMut(_)>);
        btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    if let Some(btn) = doc.get_element_by_id("mm-lb-btn") {
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::MouseEvent| {
            open_leaderboard();
        }) as Box<dyn FnMut(_)>);
        btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    wire_modal(&doc)?;

    // Startup diagnostic on the page console.
    if config::resolve().is_configured() {
        crate::console_log("memory-match: leaderboard configured");
    } else {
        crate::console_warn("memory-match: no leaderboard config found; scores will not be saved");
    }

    start_frame_loop();
    Ok(())
}

fn wire_modal(doc: &Document) -> Result<(), JsValue> {
    if let Some(btn) = doc.get_element_by_id("mm-lb-close") {
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::MouseEvent| {
            if let Some(doc) = window().and_then(|w| w.document()) {
                hud::hide_modal(&doc);
            }
        }) as Box<dyn FnMut(_)>);
        btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    if let Some(btn) = doc.get_element_by_id("mm-lb-refresh") {
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::MouseEvent| {
            load_modal_content();
        }) as Box<dyn FnMut(_)>);
        btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    if let Some(btn) = doc.get_element_by_id("mm-lb-toggle") {
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::MouseEvent| {
            APP.with(|cell| {
                if let Some(app) = cell.borrow_mut().as_mut() {
                    app.modal_view = match app.modal_view {
                        ModalView::Scores => ModalView::Stats,
                        ModalView::Stats => ModalView::Scores,
                    };
                }
            });
            load_modal_content();
        }) as Box<dyn FnMut(_)>);
        btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    // Clicking the dimmed backdrop (not the dialog) also closes
    if let Some(modal) = doc.get_element_by_id("mm-lb-modal") {
        let closure = Closure::wrap(Box::new(move |evt: web_sys::MouseEvent| {
            if hud::hit_backdrop(evt.target()) {
                if let Some(doc) = window().and_then(|w| w.document()) {
                    hud::hide_modal(&doc);
                }
            }
        }) as Box<dyn FnMut(_)>);
        modal.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    Ok(())
}

/// Deal a fresh board and session with the current parameters. Pending
/// timers and in-flight submissions of the old game die with it.
fn reset_app() {
    let now = performance_now();
    APP.with(|cell| {
        if let Some(app) = cell.borrow_mut().as_mut() {
            let mut rng = rand::thread_rng();
            if let Ok(board) = Board::setup(
                app.board.pair_count(),
                crate::CARD_SYMBOLS,
                app.canvas.width() as f64,
                app.canvas.height() as f64,
                &mut rng,
            ) {
                app.board = board;
            }
            app.session = GameSession::new(now);
            app.particles.clear();
            app.cascade = None;
            app.generation += 1;
        }
    });
    if let Some(doc) = window().and_then(|w| w.document()) {
        hud::set_status(&doc, "");
    }
}

fn open_leaderboard() {
    if let Some(doc) = window().and_then(|w| w.document()) {
        hud::show_modal(&doc);
    }
    load_modal_content();
}

/// Fill the modal for the current view: loading text now, fetched content
/// when the request lands (unless the view changed meanwhile).
fn load_modal_content() {
    let Some(doc) = window().and_then(|w| w.document()) else {
        return;
    };
    let view = APP
        .with(|cell| cell.borrow().as_ref().map(|a| a.modal_view))
        .unwrap_or(ModalView::Scores);
    match view {
        ModalView::Scores => {
            hud::set_modal_title(&doc, "Top Scores");
            hud::set_toggle_label(&doc, "Show Stats");
            hud::set_modal_body(&doc, &hud::loading_html("scores"));
        }
        ModalView::Stats => {
            hud::set_modal_title(&doc, "Game Stats");
            hud::set_toggle_label(&doc, "Show Scores");
            hud::set_modal_body(&doc, &hud::loading_html("stats"));
        }
    }
    spawn_local(async move {
        let cfg = config::resolve();
        let html = match view {
            ModalView::Scores => {
                match leaderboard::fetch_leaderboard(&cfg, leaderboard::LEADERBOARD_LIMIT).await {
                    Ok(rows) => hud::leaderboard_html(&rows),
                    Err(err) => {
                        crate::console_error(&format!("leaderboard fetch failed: {err}"));
                        hud::error_html(&err.to_string())
                    }
                }
            }
            ModalView::Stats => match leaderboard::fetch_stats(&cfg).await {
                Ok(stats) => hud::stats_html(&stats),
                Err(err) => {
                    crate::console_error(&format!("stats fetch failed: {err}"));
                    hud::error_html(&err.to_string())
                }
            },
        };
        let current = APP.with(|cell| cell.borrow().as_ref().map(|a| a.modal_view));
        if current != Some(view) {
            return;
        }
        if let Some(doc) = window().and_then(|w| w.document()) {
            hud::set_modal_body(&doc, &html);
        }
    });
}

/// Ship the finished game to the score table in the background.
fn submit_completion(app: &GameApp) {
    let Some(done) = app.session.completion() else {
        return;
    };
    let attempts = app.session.attempts();
    let total_pairs = app.board.pair_count() as u32;
    let generation = app.generation;
    let name = window()
        .and_then(|w| w.document())
        .map(|doc| hud::player_name(&doc))
        .unwrap_or_else(|| "Anonymous".to_string());

    spawn_local(async move {
        let cfg = config::resolve();
        let entry = NewScore {
            player_name: name,
            attempts,
            completion_time: done.elapsed_ms as i64,
            total_pairs,
            difficulty: "normal",
        };
        let outcome = leaderboard::submit_score(&cfg, &entry).await;

        // The player may have dealt a new game while the request ran.
        let current = APP.with(|cell| cell.borrow().as_ref().map(|a| a.generation));
        if current != Some(generation) {
            return;
        }
        let Some(doc) = window().and_then(|w| w.document()) else {
            return;
        };
        match outcome {
            Ok(_) => hud::set_status(&doc, "Score saved to the leaderboard."),
            Err(NetworkError::NotConfigured) => {
                hud::set_status(&doc, "Leaderboard not configured; score not saved.")
            }
            Err(err) => {
                crate::console_error(&format!("score submission failed: {err}"));
                hud::set_status(&doc, "Could not save the score.");
            }
        }
    });
}

fn frame_tick(app: &mut GameApp, now: f64) {
    app.board.advance(now);
    let events = app.session.advance(&mut app.board, now);

    let mut rng = rand::thread_rng();
    for event in events {
        match event {
            SessionEvent::PairMatched { a, b } => {
                for idx in [a, b] {
                    let card = app.board.card(idx);
                    app.particles.extend(particle::burst(
                        card.x + card.w / 2.0,
                        card.y + card.h / 2.0,
                        &mut rng,
                    ));
                }
            }
            SessionEvent::Mismatch { .. } => {}
            SessionEvent::Won {
                score,
                elapsed_ms,
                attempts,
            } => {
                if let Some(doc) = window().and_then(|w| w.document()) {
                    hud::set_status(
                        &doc,
                        &format!(
                            "All pairs matched! Score {score} in {} after {attempts} attempts.",
                            hud::format_time(elapsed_ms)
                        ),
                    );
                }
            }
            SessionEvent::Celebrate => {
                app.cascade = Some(Cascade {
                    started_ms: now,
                    spawned: 0,
                });
                submit_completion(app);
            }
        }
    }

    let mut cascade_done = false;
    if let Some(cascade) = &mut app.cascade {
        let due = ((now - cascade.started_ms) / CASCADE_STEP_MS) as u32 + 1;
        let target = due.min(CASCADE_BURSTS);
        let w = app.canvas.width() as f64;
        let h = app.canvas.height() as f64;
        while cascade.spawned < target {
            let x = rng.gen_range(0.0..w);
            let y = rng.gen_range(0.0..h * 0.3);
            app.particles.extend(particle::burst(x, y, &mut rng));
            cascade.spawned += 1;
        }
        cascade_done = cascade.spawned >= CASCADE_BURSTS;
    }
    if cascade_done {
        app.cascade = None;
    }

    app.particles.retain_mut(|p| p.update());

    render::render(
        &app.ctx,
        app.canvas.width() as f64,
        app.canvas.height() as f64,
        &app.board,
        &app.particles,
    );
    if let Some(doc) = window().and_then(|w| w.document()) {
        hud::sync_stats(&doc, &app.board, &app.session, now);
    }
}

fn start_frame_loop() {
    let f: FrameCallback = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
        APP.with(|cell| {
            if let Some(app) = cell.borrow_mut().as_mut() {
                frame_tick(app, ts);
            }
        });
        if let Some(w) = window() {
            let _ =
                w.request_animation_frame(f.borrow().as_ref().unwrap().as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut(f64)>));
    if let Some(w) = window() {
        let _ = w.request_animation_frame(g.borrow().as_ref().unwrap().as_ref().unchecked_ref());
    }
}

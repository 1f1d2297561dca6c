//! Canvas drawing for cards and particles. Pure presentation: reads entity
//! state, writes pixels, mutates nothing.

use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::board::Board;
use super::card::Card;
use super::particle::Particle;

const CARD_BACK: &str = "#4a90e2";
const CARD_FACE: &str = "#fff";
const CARD_BORDER: &str = "#2c5aa0";
const CORNER_RADIUS: f64 = 10.0;

pub fn render(
    ctx: &CanvasRenderingContext2d,
    width: f64,
    height: f64,
    board: &Board,
    particles: &[Particle],
) {
    ctx.clear_rect(0.0, 0.0, width, height);
    for card in board.cards() {
        draw_card(ctx, card);
    }
    for p in particles {
        draw_particle(ctx, p);
    }
}

fn draw_card(ctx: &CanvasRenderingContext2d, card: &Card) {
    ctx.save();

    // Fold around the vertical centerline; the face switches at the midpoint.
    let center_x = card.x + card.w / 2.0;
    let scale_x = (card.flip_progress * PI).cos().abs();
    ctx.translate(center_x, 0.0).ok();
    ctx.scale(scale_x, 1.0).ok();
    ctx.translate(-center_x, 0.0).ok();

    ctx.set_shadow_color("rgba(0, 0, 0, 0.3)");
    ctx.set_shadow_blur(8.0);
    ctx.set_shadow_offset_x(3.0);
    ctx.set_shadow_offset_y(3.0);
    if card.matched && card.glow > 0.0 {
        ctx.set_shadow_color(&format!("rgba(255, 215, 0, {:.3})", card.glow));
        ctx.set_shadow_blur(20.0);
    }

    let show_front = card.flip_progress >= 0.5;
    ctx.set_fill_style_str(if show_front { CARD_FACE } else { CARD_BACK });
    ctx.set_stroke_style_str(CARD_BORDER);
    ctx.set_line_width(2.0);
    rounded_rect(ctx, card.x, card.y, card.w, card.h, CORNER_RADIUS);
    ctx.fill();
    ctx.stroke();

    if show_front {
        draw_symbol(ctx, card);
    } else {
        draw_back_pattern(ctx, card);
    }

    ctx.restore();
}

fn draw_symbol(ctx: &CanvasRenderingContext2d, card: &Card) {
    ctx.set_font("bold 40px Arial");
    ctx.set_text_align("center");
    ctx.set_text_baseline("middle");
    ctx.set_fill_style_str("#333");
    ctx.fill_text(card.symbol, card.x + card.w / 2.0, card.y + card.h / 2.0)
        .ok();
}

// "?" glyph plus four radial ticks.
fn draw_back_pattern(ctx: &CanvasRenderingContext2d, card: &Card) {
    let cx = card.x + card.w / 2.0;
    let cy = card.y + card.h / 2.0;

    ctx.set_fill_style_str("#fff");
    ctx.set_font("bold 24px Arial");
    ctx.set_text_align("center");
    ctx.set_text_baseline("middle");
    ctx.fill_text("?", cx, cy).ok();

    ctx.set_stroke_style_str("#fff");
    ctx.set_line_width(2.0);
    for i in 0..4 {
        let angle = i as f64 * PI / 2.0;
        ctx.begin_path();
        ctx.move_to(cx + angle.cos() * 20.0, cy + angle.sin() * 20.0);
        ctx.line_to(cx + angle.cos() * 30.0, cy + angle.sin() * 30.0);
        ctx.stroke();
    }
}

fn draw_particle(ctx: &CanvasRenderingContext2d, p: &Particle) {
    ctx.save();
    ctx.set_global_alpha(p.life.clamp(0.0, 1.0));
    ctx.set_fill_style_str(&p.color());
    ctx.begin_path();
    ctx.arc(p.x, p.y, p.size, 0.0, PI * 2.0).ok();
    ctx.fill();
    ctx.restore();
}

fn rounded_rect(ctx: &CanvasRenderingContext2d, x: f64, y: f64, w: f64, h: f64, r: f64) {
    ctx.begin_path();
    ctx.move_to(x + r, y);
    ctx.line_to(x + w - r, y);
    ctx.quadratic_curve_to(x + w, y, x + w, y + r);
    ctx.line_to(x + w, y + h - r);
    ctx.quadratic_curve_to(x + w, y + h, x + w - r, y + h);
    ctx.line_to(x + r, y + h);
    ctx.quadratic_curve_to(x, y + h, x, y + h - r);
    ctx.line_to(x, y + r);
    ctx.quadratic_curve_to(x, y, x + r, y);
    ctx.close_path();
}

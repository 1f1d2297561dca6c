//! Board manager: the shuffled card grid, its layout and hit-testing.

use rand::Rng;
use rand::seq::SliceRandom;

use super::card::{CARD_HEIGHT, CARD_WIDTH, Card};
use crate::errors::ConfigError;

/// Gap between neighbouring cards in pixels.
pub const CARD_MARGIN: f64 = 10.0;
/// Cards per row.
pub const GRID_COLS: usize = 4;
/// Clearance between the grid and every canvas edge.
pub const CANVAS_GUTTER: f64 = 65.0;

#[derive(Debug)]
pub struct Board {
    cards: Vec<Card>,
    pair_count: usize,
}

impl Board {
    /// Canvas dimensions that frame the grid for `pair_count` pairs with
    /// [`CANVAS_GUTTER`] on every side. The default eight pairs come out at
    /// 520 by 640.
    pub fn canvas_size(pair_count: usize) -> (u32, u32) {
        let cards = (pair_count * 2).max(1);
        let cols = GRID_COLS.min(cards);
        let rows = cards.div_ceil(cols);
        let w = cols as f64 * (CARD_WIDTH + CARD_MARGIN) - CARD_MARGIN + 2.0 * CANVAS_GUTTER;
        let h = rows as f64 * (CARD_HEIGHT + CARD_MARGIN) - CARD_MARGIN + 2.0 * CANVAS_GUTTER;
        (w as u32, h as u32)
    }

    /// Build a shuffled board from the first `pair_count` entries of
    /// `symbols`, each duplicated once, laid out as a centered grid.
    pub fn setup(
        pair_count: usize,
        symbols: &[&'static str],
        canvas_w: f64,
        canvas_h: f64,
        rng: &mut impl Rng,
    ) -> Result<Self, ConfigError> {
        if pair_count == 0 {
            return Err(ConfigError::NoPairs);
        }
        if symbols.len() < pair_count {
            return Err(ConfigError::NotEnoughSymbols {
                requested: pair_count,
                available: symbols.len(),
            });
        }

        let mut deck: Vec<&'static str> = Vec::with_capacity(pair_count * 2);
        for &s in &symbols[..pair_count] {
            deck.push(s);
            deck.push(s);
        }
        deck.shuffle(rng);

        let cols = GRID_COLS.min(deck.len());
        let rows = deck.len().div_ceil(cols);
        let start_x = (canvas_w - (cols as f64 * (CARD_WIDTH + CARD_MARGIN) - CARD_MARGIN)) / 2.0;
        let start_y = (canvas_h - (rows as f64 * (CARD_HEIGHT + CARD_MARGIN) - CARD_MARGIN)) / 2.0;

        let cards = deck
            .into_iter()
            .enumerate()
            .map(|(i, symbol)| {
                let col = (i % cols) as f64;
                let row = (i / cols) as f64;
                Card::new(
                    start_x + col * (CARD_WIDTH + CARD_MARGIN),
                    start_y + row * (CARD_HEIGHT + CARD_MARGIN),
                    symbol,
                )
            })
            .collect();

        Ok(Self { cards, pair_count })
    }

    pub fn pair_count(&self) -> usize {
        self.pair_count
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn card(&self, idx: usize) -> &Card {
        &self.cards[idx]
    }

    pub fn card_mut(&mut self, idx: usize) -> &mut Card {
        &mut self.cards[idx]
    }

    /// Advance every card's animation records. Called once per frame.
    pub fn advance(&mut self, now: f64) {
        for card in &mut self.cards {
            card.advance(now);
        }
    }

    /// Index of the face-down, idle card under the point, if any. Face-up,
    /// matched and mid-flip cards are not selectable.
    pub fn hit_test(&self, x: f64, y: f64) -> Option<usize> {
        self.cards
            .iter()
            .position(|c| c.contains(x, y) && !c.face_up && !c.animating())
    }
}

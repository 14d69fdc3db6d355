use crate::core::{score_hand, Card, HandScore};

/// The hand evaluation capability the showdown depends on.
///
/// The engine only ever asks two things: score one 5..7 card hand, and
/// pick the tied-best subset of several scores. Ties are legal and common
/// (identical straights from different suits, for example).
pub trait HandRanker {
    /// Score a hand of 5 to 7 cards.
    fn score(&self, cards: &[Card]) -> HandScore;

    /// Indices of the scores tied for best. Empty only for empty input.
    fn best(&self, scores: &[HandScore]) -> Vec<usize> {
        match scores.iter().max() {
            Some(best) => scores
                .iter()
                .enumerate()
                .filter(|(_, score)| *score == best)
                .map(|(idx, _)| idx)
                .collect(),
            None => Vec::new(),
        }
    }
}

/// The built-in evaluator, backed by the crate's own scorer.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardRanker;

impl HandRanker for StandardRanker {
    fn score(&self, cards: &[Card]) -> HandScore {
        score_hand(cards)
    }
}

use crate::page::{Card, Container};

/// Case-insensitive match on the display name, literal match on the `#N` label.
pub fn card_matches(card: &Card, term: &str) -> bool {
    let term = term.to_lowercase();
    card.name.to_lowercase().contains(&term) || card.number_label.contains(&term)
}

/// Shows matching cards, hides the rest. Returns the number left visible.
pub fn apply(container: &mut Container, term: &str) -> usize {
    let mut visible = 0;
    for card in container.cards_mut() {
        card.visible = card_matches(card, term);
        if card.visible {
            visible += 1;
        }
    }
    visible
}

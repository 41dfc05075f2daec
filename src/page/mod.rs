//! In-memory rendering surface the catalog writes into: a card container,
//! the category sidebar, the search input and the detail overlay.

use serde::Serialize;

use crate::detail::DetailView;
use crate::record::Record;

/// Sidebar labels, in display order.
pub const DEFAULT_CATEGORIES: [&str; 18] = [
    "Normal", "Fire", "Water", "Grass", "Electric", "Ice", "Fighting", "Poison", "Ground",
    "Flying", "Psychic", "Bug", "Rock", "Ghost", "Dragon", "Dark", "Steel", "Fairy",
];

#[derive(Clone, Debug, Serialize)]
pub struct Card {
    #[serde(skip)]
    pub record: Record,
    pub number: u32,
    pub image: Option<String>,
    pub name: String,
    pub number_label: String,
    pub types_label: String,
    pub species: String,
    pub visible: bool,
}

impl Card {
    pub fn new(record: Record) -> Self {
        Self {
            number: record.number,
            image: record.image.clone(),
            name: record.display_name(),
            number_label: record.number_label(),
            types_label: record.types_label(),
            species: record.species.clone(),
            visible: true,
            record,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Container {
    cards: Vec<Card>,
    pub full_width: bool,
}

impl Container {
    pub fn clear(&mut self) {
        self.cards.clear();
    }

    pub fn append(&mut self, card: Card) {
        self.cards.push(card);
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn cards_mut(&mut self) -> &mut [Card] {
        &mut self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn visible(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter().filter(|c| c.visible)
    }

    pub fn find(&self, number: u32) -> Option<&Card> {
        self.cards.iter().find(|c| c.number == number)
    }

    pub fn numbers(&self) -> Vec<u32> {
        self.cards.iter().map(|c| c.number).collect()
    }
}

#[derive(Clone, Debug)]
pub struct Sidebar {
    pub categories: Vec<String>,
    active: Option<String>,
    pub hidden: bool,
}

impl Default for Sidebar {
    fn default() -> Self {
        Self {
            categories: DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect(),
            active: None,
            hidden: false,
        }
    }
}

impl Sidebar {
    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn set_active(&mut self, label: Option<&str>) {
        self.active = label.map(|l| l.to_string());
    }
}

#[derive(Clone, Debug, Default)]
pub struct Overlay {
    open: bool,
    content: Option<DetailView>,
}

impl Overlay {
    /// Replaces the content and opens the overlay.
    pub fn show(&mut self, view: DetailView) {
        self.content = Some(view);
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn content(&self) -> Option<&DetailView> {
        self.content.as_ref()
    }
}

#[derive(Clone, Debug, Default)]
pub struct Page {
    pub container: Container,
    pub sidebar: Sidebar,
    pub search: String,
    pub overlay: Overlay,
}

impl Page {
    pub fn toggle_sidebar(&mut self) {
        self.sidebar.hidden = !self.sidebar.hidden;
        self.container.full_width = !self.container.full_width;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::fixtures::record;

    #[test]
    fn card_projects_record_labels() {
        let card = Card::new(record(4, "charmander", &["fire"]));
        assert_eq!(card.name, "Charmander");
        assert_eq!(card.number_label, "#4");
        assert_eq!(card.types_label, "fire");
        assert!(card.visible);
    }

    #[test]
    fn sidebar_toggle_flips_container_width() {
        let mut page = Page::default();
        page.toggle_sidebar();
        assert!(page.sidebar.hidden);
        assert!(page.container.full_width);
        page.toggle_sidebar();
        assert!(!page.sidebar.hidden);
        assert!(!page.container.full_width);
    }

    #[test]
    fn overlay_keeps_content_after_close() {
        let mut overlay = Overlay::default();
        overlay.show(DetailView::new(&record(1, "bulbasaur", &["grass"])));
        overlay.close();
        assert!(!overlay.is_open());
        assert_eq!(overlay.content().map(|v| v.number), Some(1));
    }
}

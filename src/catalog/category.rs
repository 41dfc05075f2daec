const CATEGORY_SLUGS: [(&str, &str); 17] = [
    ("Fire", "fire"),
    ("Water", "water"),
    ("Grass", "grass"),
    ("Electric", "electric"),
    ("Ice", "ice"),
    ("Fighting", "fighting"),
    ("Poison", "poison"),
    ("Ground", "ground"),
    ("Flying", "flying"),
    ("Psychic", "psychic"),
    ("Bug", "bug"),
    ("Rock", "rock"),
    ("Ghost", "ghost"),
    ("Dragon", "dragon"),
    ("Dark", "dark"),
    ("Steel", "steel"),
    ("Fairy", "fairy"),
];

/// Maps a sidebar label to the API's category slug. Labels missing from the
/// table are lowercased.
pub fn category_slug(label: &str) -> String {
    CATEGORY_SLUGS
        .iter()
        .find(|(l, _)| *l == label)
        .map(|(_, slug)| slug.to_string())
        .unwrap_or_else(|| label.to_lowercase())
}

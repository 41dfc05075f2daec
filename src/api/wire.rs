use serde::Deserialize;

use crate::record::{self, Record, Stat};

#[derive(Clone, Debug, Deserialize)]
pub struct NamedResource {
    pub name: String,
    pub url: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct PokemonResponse {
    pub id: u32,
    pub name: String,
    pub height: u32,
    pub weight: u32,
    pub species: NamedResource,
    #[serde(default)]
    pub sprites: Sprites,
    #[serde(default)]
    pub types: Vec<TypeSlot>,
    #[serde(default)]
    pub abilities: Vec<AbilitySlot>,
    #[serde(default)]
    pub stats: Vec<StatEntry>,
    #[serde(default)]
    pub moves: Vec<MoveEntry>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Sprites {
    #[serde(default)]
    pub other: OtherSprites,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct OtherSprites {
    #[serde(rename = "official-artwork", default)]
    pub official_artwork: Option<Artwork>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Artwork {
    pub front_default: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct TypeSlot {
    #[serde(rename = "type")]
    pub kind: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
pub struct AbilitySlot {
    pub ability: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
pub struct StatEntry {
    pub base_stat: u16,
    pub stat: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
pub struct MoveEntry {
    #[serde(rename = "move")]
    pub kind: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
pub struct SpeciesResponse {
    #[serde(default)]
    pub genera: Vec<Genus>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Genus {
    pub genus: String,
    pub language: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
pub struct TypeResponse {
    #[serde(default)]
    pub pokemon: Vec<TypeMember>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct TypeMember {
    pub pokemon: NamedResource,
}

impl SpeciesResponse {
    pub fn genus_for(&self, language: &str) -> Option<&str> {
        self.genera
            .iter()
            .find(|g| g.language.name == language)
            .map(|g| g.genus.as_str())
    }
}

impl PokemonResponse {
    pub fn into_record(self, species: String) -> Record {
        let image = self
            .sprites
            .other
            .official_artwork
            .and_then(|a| a.front_default);
        Record {
            name: self.name,
            number: self.id,
            image,
            types: self.types.into_iter().map(|t| t.kind.name).collect(),
            species,
            height: record::decimal_units(self.height),
            weight: record::decimal_units(self.weight),
            abilities: self.abilities.into_iter().map(|a| a.ability.name).collect(),
            stats: self
                .stats
                .into_iter()
                .map(|s| Stat {
                    name: s.stat.name,
                    value: s.base_stat,
                })
                .collect(),
            moves: self.moves.into_iter().map(|m| m.kind.name).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PIKACHU: &str = r#"{
        "id": 25,
        "name": "pikachu",
        "height": 4,
        "weight": 60,
        "species": {"name": "pikachu", "url": "https://pokeapi.co/api/v2/pokemon-species/25/"},
        "sprites": {
            "front_default": "https://example.invalid/front/25.png",
            "other": {
                "official-artwork": {"front_default": "https://example.invalid/artwork/25.png"}
            }
        },
        "types": [{"slot": 1, "type": {"name": "electric", "url": "https://pokeapi.co/api/v2/type/13/"}}],
        "abilities": [
            {"ability": {"name": "static", "url": "https://pokeapi.co/api/v2/ability/9/"}, "is_hidden": false, "slot": 1},
            {"ability": {"name": "lightning-rod", "url": "https://pokeapi.co/api/v2/ability/31/"}, "is_hidden": true, "slot": 3}
        ],
        "stats": [
            {"base_stat": 35, "effort": 0, "stat": {"name": "hp", "url": "https://pokeapi.co/api/v2/stat/1/"}},
            {"base_stat": 90, "effort": 2, "stat": {"name": "speed", "url": "https://pokeapi.co/api/v2/stat/6/"}}
        ],
        "moves": [
            {"move": {"name": "mega-punch", "url": "https://pokeapi.co/api/v2/move/5/"}},
            {"move": {"name": "pay-day", "url": "https://pokeapi.co/api/v2/move/6/"}}
        ]
    }"#;

    const SPECIES: &str = r#"{
        "genera": [
            {"genus": "ねずみポケモン", "language": {"name": "ja-Hrkt", "url": "https://pokeapi.co/api/v2/language/1/"}},
            {"genus": "Mouse Pokémon", "language": {"name": "en", "url": "https://pokeapi.co/api/v2/language/9/"}}
        ]
    }"#;

    #[test]
    fn pokemon_response_transforms_into_record() {
        let pokemon: PokemonResponse = serde_json::from_str(PIKACHU).unwrap();
        let species: SpeciesResponse = serde_json::from_str(SPECIES).unwrap();
        let genus = species.genus_for("en").unwrap().to_string();
        let record = pokemon.into_record(genus);

        assert_eq!(record.number, 25);
        assert_eq!(record.name, "pikachu");
        assert_eq!(record.species, "Mouse Pokémon");
        assert_eq!(record.height, 0.4);
        assert_eq!(record.weight, 6.0);
        assert_eq!(
            record.image.as_deref(),
            Some("https://example.invalid/artwork/25.png")
        );
        assert_eq!(record.types, vec!["electric"]);
        assert_eq!(record.abilities, vec!["static", "lightning-rod"]);
        assert_eq!(record.stats[1].name, "speed");
        assert_eq!(record.stats[1].value, 90);
        assert_eq!(record.moves, vec!["mega-punch", "pay-day"]);
    }

    #[test]
    fn missing_artwork_yields_no_image() {
        let json = r#"{
            "id": 1, "name": "bulbasaur", "height": 7, "weight": 69,
            "species": {"name": "bulbasaur", "url": "https://pokeapi.co/api/v2/pokemon-species/1/"},
            "sprites": {"other": {}}
        }"#;
        let pokemon: PokemonResponse = serde_json::from_str(json).unwrap();
        let record = pokemon.into_record(String::new());
        assert_eq!(record.image, None);
        assert_eq!(record.height, 0.7);
        assert_eq!(record.weight, 6.9);
    }

    #[test]
    fn genus_lookup_matches_language_tag() {
        let species: SpeciesResponse = serde_json::from_str(SPECIES).unwrap();
        assert_eq!(species.genus_for("ja-Hrkt"), Some("ねずみポケモン"));
        assert_eq!(species.genus_for("fr"), None);
    }
}

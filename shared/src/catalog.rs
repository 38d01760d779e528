//! Catalog records as served by the remote API.
//!
//! Field names follow the API's JSON so the types deserialize straight off
//! the wire. Nested objects are defaulted when absent so that a sparse record
//! still decodes; missing values surface as zeroes or `None` downstream.

use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

use crate::api::extract_identifier;

/// Identifier used to look up one entry: a numeric id or a name.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryKey(String);

impl EntryKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into().trim().to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for EntryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<u32> for EntryKey {
    fn from(id: u32) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for EntryKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<String> for EntryKey {
    fn from(key: String) -> Self {
        Self::new(key)
    }
}

/// One summary row of a list response. `url` is the reference URL that
/// identifies the entry and is the de-duplication key across pages.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListItem {
    pub name: String,
    pub url: String,
}

impl ListItem {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }

    /// Numeric id parsed from the reference URL; 0 when it carries none.
    #[must_use]
    pub fn id(&self) -> u32 {
        extract_identifier(&self.url)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListPage {
    pub count: u32,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    #[serde(default)]
    pub results: Vec<ListItem>,
}

impl ListPage {
    #[must_use]
    pub fn items(&self) -> &[ListItem] {
        &self.results
    }

    #[must_use]
    pub fn has_more(&self) -> bool {
        self.next.is_some()
    }

    /// Offset of the following page, read from the `offset` query parameter of
    /// `next`. `None` when the listing is exhausted or `next` carries no offset.
    #[must_use]
    pub fn next_offset(&self) -> Option<u32> {
        let next = Url::parse(self.next.as_deref()?).ok()?;
        next.query_pairs()
            .find(|(name, _)| name == "offset")
            .and_then(|(_, value)| value.parse().ok())
    }
}

/// A `{name, url}` pair the API uses for every cross reference.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedResource {
    pub name: String,
    #[serde(default)]
    pub url: String,
}

impl NamedResource {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: String::new(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeSlot {
    #[serde(default)]
    pub slot: u32,
    #[serde(rename = "type")]
    pub kind: NamedResource,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilitySlot {
    #[serde(default)]
    pub slot: u32,
    #[serde(default)]
    pub is_hidden: bool,
    pub ability: NamedResource,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatSlot {
    pub base_stat: u32,
    #[serde(default)]
    pub effort: u32,
    pub stat: NamedResource,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artwork {
    #[serde(default)]
    pub front_default: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtherSprites {
    #[serde(default, rename = "official-artwork")]
    pub official_artwork: Artwork,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sprites {
    #[serde(default)]
    pub front_default: Option<String>,
    #[serde(default)]
    pub other: OtherSprites,
}

/// Detail record for a single catalog entry. Height and weight are in the
/// API's native tenths (decimetres, hectograms).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub height: u32,
    #[serde(default)]
    pub weight: u32,
    #[serde(default)]
    pub base_experience: Option<u32>,
    #[serde(default)]
    pub sprites: Sprites,
    #[serde(default)]
    pub types: Vec<TypeSlot>,
    #[serde(default)]
    pub abilities: Vec<AbilitySlot>,
    #[serde(default)]
    pub stats: Vec<StatSlot>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIST_JSON: &str = r#"{
        "count": 1154,
        "next": "https://pokeapi.co/api/v2/pokemon?offset=20&limit=20",
        "previous": null,
        "results": [
            {"name": "bulbasaur", "url": "https://pokeapi.co/api/v2/pokemon/1/"},
            {"name": "ivysaur", "url": "https://pokeapi.co/api/v2/pokemon/2/"}
        ]
    }"#;

    const ENTRY_JSON: &str = r#"{
        "id": 25,
        "name": "pikachu",
        "height": 4,
        "weight": 60,
        "base_experience": 112,
        "sprites": {
            "front_default": "https://example.test/front/25.png",
            "other": {
                "official-artwork": {"front_default": "https://example.test/art/25.png"},
                "home": {"front_default": null}
            }
        },
        "types": [{"slot": 1, "type": {"name": "electric", "url": "https://pokeapi.co/api/v2/type/13/"}}],
        "abilities": [
            {"slot": 1, "is_hidden": false, "ability": {"name": "static", "url": ""}},
            {"slot": 3, "is_hidden": true, "ability": {"name": "lightning-rod", "url": ""}}
        ],
        "stats": [
            {"base_stat": 35, "effort": 0, "stat": {"name": "hp", "url": ""}},
            {"base_stat": 90, "effort": 2, "stat": {"name": "speed", "url": ""}}
        ],
        "moves": []
    }"#;

    #[test]
    fn decodes_list_page() {
        let page: ListPage = serde_json::from_str(LIST_JSON).unwrap();
        assert_eq!(page.count, 1154);
        assert_eq!(page.items().len(), 2);
        assert!(page.has_more());
        assert_eq!(page.next_offset(), Some(20));
        assert_eq!(page.items()[1].id(), 2);
    }

    #[test]
    fn last_page_has_no_next_offset() {
        let page = ListPage {
            count: 2,
            next: None,
            previous: Some("https://pokeapi.co/api/v2/pokemon?offset=0&limit=20".into()),
            results: vec![],
        };
        assert!(!page.has_more());
        assert_eq!(page.next_offset(), None);
    }

    #[test]
    fn decodes_entry_and_ignores_unknown_fields() {
        let entry: Entry = serde_json::from_str(ENTRY_JSON).unwrap();
        assert_eq!(entry.id, 25);
        assert_eq!(entry.base_experience, Some(112));
        assert_eq!(entry.types[0].kind.name, "electric");
        assert!(entry.abilities[1].is_hidden);
        assert_eq!(
            entry.sprites.other.official_artwork.front_default.as_deref(),
            Some("https://example.test/art/25.png")
        );
    }

    #[test]
    fn sparse_entry_still_decodes() {
        let entry: Entry =
            serde_json::from_str(r#"{"id": 1, "name": "x", "base_experience": null}"#).unwrap();
        assert_eq!(entry.base_experience, None);
        assert!(entry.stats.is_empty());
        assert_eq!(entry.sprites.front_default, None);
    }

    #[test]
    fn entry_key_trims_and_converts() {
        assert_eq!(EntryKey::from(25_u32).as_str(), "25");
        assert_eq!(EntryKey::from("  pikachu ").as_str(), "pikachu");
        assert!(EntryKey::new("   ").is_empty());
    }
}

//! Display derivations for catalog records. Everything here is a pure
//! function of an already-fetched record.

use serde::{Deserialize, Serialize};

use crate::catalog::{Entry, ListItem};
use crate::STAT_CEILING;

/// Canonical stat name and its display label, in display order.
pub const STAT_ORDER: [(&str, &str); 6] = [
    ("hp", "HP"),
    ("attack", "Attack"),
    ("defense", "Defense"),
    ("special-attack", "Sp. Attack"),
    ("special-defense", "Sp. Defense"),
    ("speed", "Speed"),
];

pub const DEFAULT_TYPE_COLOR: &str = "#A8A878";

const TYPE_COLORS: [(&str, &str); 18] = [
    ("normal", "#A8A878"),
    ("fire", "#F08030"),
    ("water", "#6890F0"),
    ("electric", "#F8D030"),
    ("grass", "#78C850"),
    ("ice", "#98D8D8"),
    ("fighting", "#C03028"),
    ("poison", "#A040A0"),
    ("ground", "#E0C068"),
    ("flying", "#A890F0"),
    ("psychic", "#F85888"),
    ("bug", "#A8B820"),
    ("rock", "#B8A038"),
    ("ghost", "#705898"),
    ("dragon", "#7038F8"),
    ("dark", "#705848"),
    ("steel", "#B8B8D0"),
    ("fairy", "#EE99AC"),
];

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct StatLine {
    pub label: String,
    pub value: u32,
    pub bar_percent: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TypeBadge {
    pub name: String,
    pub color: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AbilityView {
    pub label: String,
    pub is_hidden: bool,
}

/// Render-ready detail record.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct EntryView {
    pub id: u32,
    pub name: String,
    pub number_label: String,
    pub image_url: Option<String>,
    pub types: Vec<TypeBadge>,
    pub height_label: String,
    pub weight_label: String,
    pub stats: Vec<StatLine>,
    pub stat_total: u32,
    pub abilities: Vec<AbilityView>,
    pub base_experience_label: Option<String>,
}

/// Render-ready list card.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CardView {
    pub id: u32,
    pub name: String,
    pub number_label: String,
    pub image_url: String,
    pub url: String,
}

/// Base value of the named stat, 0 when the record lacks it.
#[must_use]
pub fn stat_value(entry: &Entry, name: &str) -> u32 {
    entry
        .stats
        .iter()
        .find(|slot| slot.stat.name == name)
        .map_or(0, |slot| slot.base_stat)
}

/// Bar width in percent against [`STAT_CEILING`], clamped to 100.
#[must_use]
pub fn stat_bar_percent(value: u32) -> f64 {
    (f64::from(value) / f64::from(STAT_CEILING) * 100.0).min(100.0)
}

#[must_use]
pub fn stat_lines(entry: &Entry) -> Vec<StatLine> {
    STAT_ORDER
        .iter()
        .map(|(name, label)| {
            let value = stat_value(entry, name);
            StatLine {
                label: (*label).to_string(),
                value,
                bar_percent: stat_bar_percent(value),
            }
        })
        .collect()
}

#[must_use]
pub fn stat_total(entry: &Entry) -> u32 {
    STAT_ORDER
        .iter()
        .map(|(name, _)| stat_value(entry, name))
        .fold(0, u32::saturating_add)
}

#[must_use]
pub fn type_color(name: &str) -> &'static str {
    TYPE_COLORS
        .iter()
        .find(|(kind, _)| *kind == name)
        .map_or(DEFAULT_TYPE_COLOR, |(_, color)| *color)
}

/// Official artwork when present, otherwise the default sprite.
#[must_use]
pub fn image_url(entry: &Entry) -> Option<String> {
    entry
        .sprites
        .other
        .official_artwork
        .front_default
        .clone()
        .or_else(|| entry.sprites.front_default.clone())
}

/// Tenths as a one-decimal number: 4 -> "0.4", 69 -> "6.9".
#[must_use]
pub fn format_tenths(tenths: u32) -> String {
    format!("{:.1}", f64::from(tenths) / 10.0)
}

#[must_use]
pub fn display_number(id: u32) -> String {
    format!("#{id:03}")
}

#[must_use]
pub fn ability_label(name: &str) -> String {
    name.replacen('-', " ", 1)
}

#[must_use]
pub fn present_entry(entry: &Entry) -> EntryView {
    EntryView {
        id: entry.id,
        name: entry.name.clone(),
        number_label: display_number(entry.id),
        image_url: image_url(entry),
        types: entry
            .types
            .iter()
            .map(|slot| TypeBadge {
                name: slot.kind.name.clone(),
                color: type_color(&slot.kind.name).to_string(),
            })
            .collect(),
        height_label: format!("{} m", format_tenths(entry.height)),
        weight_label: format!("{} kg", format_tenths(entry.weight)),
        stats: stat_lines(entry),
        stat_total: stat_total(entry),
        abilities: entry
            .abilities
            .iter()
            .map(|slot| AbilityView {
                label: ability_label(&slot.ability.name),
                is_hidden: slot.is_hidden,
            })
            .collect(),
        base_experience_label: entry
            .base_experience
            .filter(|xp| *xp > 0)
            .map(|xp| format!("{xp} XP")),
    }
}

#[must_use]
pub fn present_card(item: &ListItem, artwork_base: &str) -> CardView {
    let id = item.id();
    CardView {
        id,
        name: item.name.clone(),
        number_label: display_number(id),
        image_url: format!("{}/{id}.png", artwork_base.trim_end_matches('/')),
        url: item.url.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{AbilitySlot, NamedResource, StatSlot, TypeSlot};

    fn stat(name: &str, base_stat: u32) -> StatSlot {
        StatSlot {
            base_stat,
            effort: 0,
            stat: NamedResource::named(name),
        }
    }

    fn pikachu() -> Entry {
        let mut entry = Entry {
            id: 25,
            name: "pikachu".into(),
            height: 4,
            weight: 60,
            base_experience: Some(112),
            types: vec![TypeSlot {
                slot: 1,
                kind: NamedResource::named("electric"),
            }],
            abilities: vec![
                AbilitySlot {
                    slot: 1,
                    is_hidden: false,
                    ability: NamedResource::named("static"),
                },
                AbilitySlot {
                    slot: 3,
                    is_hidden: true,
                    ability: NamedResource::named("lightning-rod"),
                },
            ],
            stats: vec![
                stat("speed", 90),
                stat("hp", 35),
                stat("attack", 55),
                stat("defense", 40),
                stat("special-attack", 50),
                stat("special-defense", 50),
            ],
            ..Entry::default()
        };
        entry.sprites.front_default = Some("https://example.test/front/25.png".into());
        entry
    }

    #[test]
    fn stats_follow_display_order() {
        let lines = stat_lines(&pikachu());
        let labels: Vec<&str> = lines.iter().map(|l| l.label.as_str()).collect();
        assert_eq!(
            labels,
            ["HP", "Attack", "Defense", "Sp. Attack", "Sp. Defense", "Speed"]
        );
        assert_eq!(lines[0].value, 35);
        assert_eq!(lines[5].value, 90);
        assert_eq!(stat_total(&pikachu()), 320);
    }

    #[test]
    fn missing_speed_is_zero() {
        let mut entry = pikachu();
        entry.stats.retain(|s| s.stat.name != "speed");
        assert_eq!(stat_value(&entry, "speed"), 0);
        let view = present_entry(&entry);
        assert_eq!(view.stats[5].value, 0);
        assert!(view.stats[5].bar_percent.abs() < f64::EPSILON);
    }

    #[test]
    fn bar_is_clamped() {
        assert!((stat_bar_percent(255) - 100.0).abs() < f64::EPSILON);
        assert!((stat_bar_percent(300) - 100.0).abs() < f64::EPSILON);
        assert!((stat_bar_percent(51) - 20.0).abs() < 1e-9);
    }

    #[test]
    fn unknown_type_gets_default_color() {
        assert_eq!(type_color("electric"), "#F8D030");
        assert_eq!(type_color("stellar"), DEFAULT_TYPE_COLOR);
        assert_eq!(TYPE_COLORS.len(), 18);
    }

    #[test]
    fn image_prefers_artwork() {
        let mut entry = pikachu();
        assert_eq!(
            image_url(&entry).as_deref(),
            Some("https://example.test/front/25.png")
        );
        entry.sprites.other.official_artwork.front_default =
            Some("https://example.test/art/25.png".into());
        assert_eq!(
            image_url(&entry).as_deref(),
            Some("https://example.test/art/25.png")
        );
        entry = Entry::default();
        assert_eq!(image_url(&entry), None);
    }

    #[test]
    fn measurements_use_one_decimal() {
        let view = present_entry(&pikachu());
        assert_eq!(view.height_label, "0.4 m");
        assert_eq!(view.weight_label, "6.0 kg");
        assert_eq!(format_tenths(1234), "123.4");
    }

    #[test]
    fn labels_and_badges() {
        let view = present_entry(&pikachu());
        assert_eq!(view.number_label, "#025");
        assert_eq!(view.types[0].color, "#F8D030");
        assert_eq!(view.abilities[1].label, "lightning rod");
        assert!(view.abilities[1].is_hidden);
        assert_eq!(view.base_experience_label.as_deref(), Some("112 XP"));
        assert_eq!(ability_label("a-b-c"), "a b-c");
        assert_eq!(display_number(1025), "#1025");
    }

    #[test]
    fn zero_base_experience_is_hidden() {
        let mut entry = pikachu();
        entry.base_experience = Some(0);
        assert_eq!(present_entry(&entry).base_experience_label, None);
        entry.base_experience = None;
        assert_eq!(present_entry(&entry).base_experience_label, None);
    }

    #[test]
    fn card_uses_artwork_base() {
        let item = ListItem::new("ivysaur", "https://pokeapi.co/api/v2/pokemon/2/");
        let card = present_card(&item, "https://img.test/art/");
        assert_eq!(card.id, 2);
        assert_eq!(card.number_label, "#002");
        assert_eq!(card.image_url, "https://img.test/art/2.png");
    }
}

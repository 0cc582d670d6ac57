use crate::geo::LngLat;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CityEntry {
    pub key: &'static str,
    pub center: LngLat,
    pub zoom: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecommenderEntry {
    pub name: &'static str,
    pub avatar: Option<&'static str>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TileProviderKind {
    CartoVoyager,
    OpenStreetMap,
    MapboxStreets,
}

const CARTO_ATTRIBUTION: &str = "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors &copy; <a href=\"https://carto.com/attributions\">CARTO</a>";
const OSM_ATTRIBUTION: &str = "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors";
const MAPBOX_ATTRIBUTION: &str = "&copy; <a href=\"https://www.mapbox.com/about/maps/\">Mapbox</a> &copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a>";

impl TileProviderKind {
    pub fn requires_token(&self) -> bool {
        matches!(self, Self::MapboxStreets)
    }

    /// Tile URL template, or `None` when the provider needs a token that is missing.
    pub fn url_template(&self, access_token: Option<&str>) -> Option<String> {
        match self {
            Self::CartoVoyager => Some(
                "https://{s}.basemaps.cartocdn.com/rastertiles/voyager/{z}/{x}/{y}{r}.png"
                    .to_string(),
            ),
            Self::OpenStreetMap => {
                Some("https://tile.openstreetmap.org/{z}/{x}/{y}.png".to_string())
            }
            Self::MapboxStreets => {
                let token = access_token.map(str::trim).filter(|token| !token.is_empty())?;
                Some(format!(
                    "https://api.mapbox.com/styles/v1/mapbox/streets-v12/tiles/{{z}}/{{x}}/{{y}}?access_token={token}"
                ))
            }
        }
    }

    pub fn attribution(&self) -> &'static str {
        match self {
            Self::CartoVoyager => CARTO_ATTRIBUTION,
            Self::OpenStreetMap => OSM_ATTRIBUTION,
            Self::MapboxStreets => MAPBOX_ATTRIBUTION,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MapSettings {
    pub provider: TileProviderKind,
    pub initial_center: LngLat,
    pub initial_zoom: f64,
    pub overview_zoom: f64,
    pub focus_zoom: f64,
    pub max_zoom: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FormRules {
    pub require_recommender: bool,
    pub rating_min: u8,
    pub rating_max: u8,
    pub default_rating: u8,
}

include!(concat!(env!("OUT_DIR"), "/explorer_catalog.rs"));

pub fn city_by_key(key: &str) -> Option<&'static CityEntry> {
    let trimmed = key.trim();
    CITY_CATALOG.iter().find(|entry| entry.key == trimmed)
}

pub fn recommender_by_name(name: &str) -> Option<&'static RecommenderEntry> {
    let trimmed = name.trim();
    RECOMMENDERS.iter().find(|entry| entry.name == trimmed)
}

pub fn recommender_avatar(name: &str) -> Option<&'static str> {
    recommender_by_name(name).and_then(|entry| entry.avatar)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_city_is_in_catalog() {
        let city = city_by_key(DEFAULT_CITY_KEY).expect("default city");
        assert!(city.center.is_valid());
    }

    #[test]
    fn mapbox_needs_token() {
        assert!(TileProviderKind::MapboxStreets.url_template(None).is_none());
        assert!(TileProviderKind::MapboxStreets.url_template(Some("  ")).is_none());
        let url = TileProviderKind::MapboxStreets
            .url_template(Some("pk.abc"))
            .unwrap_or_default();
        assert!(url.ends_with("access_token=pk.abc"));
        assert!(url.contains("{z}/{x}/{y}"));
    }

    #[test]
    fn token_free_providers_always_resolve() {
        for provider in [TileProviderKind::CartoVoyager, TileProviderKind::OpenStreetMap] {
            assert!(!provider.requires_token());
            assert!(provider.url_template(None).is_some());
        }
    }

    #[test]
    fn form_rules_are_consistent() {
        assert!(FORM_RULES.rating_min >= 1);
        assert!(FORM_RULES.rating_min <= FORM_RULES.rating_max);
        assert!((FORM_RULES.rating_min..=FORM_RULES.rating_max).contains(&FORM_RULES.default_rating));
    }
}

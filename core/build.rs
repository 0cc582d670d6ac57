use std::collections::HashSet;
use std::env;
use std::fmt::Write;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

const RESERVED_FILTER_LABEL: &str = "All";
const PROVIDERS: &[(&str, &str)] = &[
    ("carto-voyager", "TileProviderKind::CartoVoyager"),
    ("openstreetmap", "TileProviderKind::OpenStreetMap"),
    ("mapbox-streets", "TileProviderKind::MapboxStreets"),
];

#[derive(Deserialize)]
struct CatalogFile {
    default_city: Option<String>,
    categories: Vec<String>,
    map: MapSection,
    form: FormSection,
    cities: Vec<CityEntry>,
    #[serde(default)]
    recommenders: Vec<RecommenderEntry>,
}

#[derive(Deserialize)]
struct MapSection {
    provider: String,
    initial_center: [f64; 2],
    initial_zoom: f64,
    overview_zoom: f64,
    focus_zoom: f64,
    max_zoom: f64,
}

#[derive(Deserialize)]
struct FormSection {
    require_recommender: bool,
    rating_min: u8,
    rating_max: u8,
    default_rating: Option<u8>,
}

#[derive(Deserialize)]
struct CityEntry {
    key: String,
    center: [f64; 2],
    zoom: f64,
}

#[derive(Deserialize)]
struct RecommenderEntry {
    name: String,
    avatar: Option<String>,
}

fn main() {
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").expect("missing CARGO_MANIFEST_DIR"));
    let workspace_root = manifest_dir.parent().unwrap_or(&manifest_dir);
    let env_path = workspace_root.join(".env");
    let env_local_path = workspace_root.join(".env.local");

    let _ = dotenvy::from_filename(&env_local_path);
    let _ = dotenvy::from_filename(&env_path);

    println!("cargo:rerun-if-env-changed=CITY_CATALOG_PATH");
    println!("cargo:rerun-if-changed={}", env_path.display());
    println!("cargo:rerun-if-changed={}", env_local_path.display());

    let catalog_path = resolve_catalog_path(workspace_root);
    println!("cargo:rerun-if-changed={}", catalog_path.display());

    let contents = fs::read_to_string(&catalog_path).unwrap_or_else(|err| {
        panic!(
            "failed to read city catalog at {}: {err}",
            catalog_path.display()
        )
    });

    let catalog: CatalogFile = toml::from_str(&contents).unwrap_or_else(|err| {
        panic!(
            "failed to parse city catalog at {}: {err}",
            catalog_path.display()
        )
    });

    if catalog.cities.is_empty() {
        panic!("city catalog {} has no cities", catalog_path.display());
    }
    if catalog.categories.is_empty() {
        panic!("city catalog {} has no categories", catalog_path.display());
    }

    validate_cities(&catalog.cities, &catalog_path);
    validate_categories(&catalog.categories, &catalog_path);
    validate_recommenders(&catalog.recommenders, &workspace_root.join("public"), &catalog_path);
    validate_map(&catalog.map, &catalog_path);
    let default_rating = validate_form(&catalog.form, &catalog_path);

    let default_city = catalog
        .default_city
        .as_deref()
        .unwrap_or(catalog.cities[0].key.as_str());
    if !catalog.cities.iter().any(|city| city.key == default_city) {
        panic!(
            "default_city '{}' not found in {}",
            default_city,
            catalog_path.display()
        );
    }

    let provider = PROVIDERS
        .iter()
        .find(|(name, _)| *name == catalog.map.provider)
        .map(|(_, variant)| *variant)
        .unwrap_or_else(|| {
            panic!(
                "unknown map provider '{}' in {}",
                catalog.map.provider,
                catalog_path.display()
            )
        });

    let mut output = String::new();
    writeln!(
        &mut output,
        "pub const DEFAULT_CITY_KEY: &str = {};",
        rust_string(default_city)
    )
    .unwrap();
    writeln!(&mut output).unwrap();

    writeln!(&mut output, "pub const CATEGORIES: &[&str] = &[").unwrap();
    for category in &catalog.categories {
        writeln!(&mut output, "    {},", rust_string(category)).unwrap();
    }
    writeln!(&mut output, "];").unwrap();
    writeln!(&mut output).unwrap();

    writeln!(&mut output, "pub const CITY_CATALOG: &[CityEntry] = &[").unwrap();
    for city in &catalog.cities {
        writeln!(&mut output, "    CityEntry {{").unwrap();
        writeln!(&mut output, "        key: {},", rust_string(&city.key)).unwrap();
        writeln!(&mut output, "        center: {},", rust_lng_lat(city.center)).unwrap();
        writeln!(&mut output, "        zoom: {:?},", city.zoom).unwrap();
        writeln!(&mut output, "    }},").unwrap();
    }
    writeln!(&mut output, "];").unwrap();
    writeln!(&mut output).unwrap();

    writeln!(&mut output, "pub const RECOMMENDERS: &[RecommenderEntry] = &[").unwrap();
    for entry in &catalog.recommenders {
        let avatar = match entry.avatar.as_deref() {
            Some(src) => format!("Some({})", rust_string(src)),
            None => "None".to_string(),
        };
        writeln!(&mut output, "    RecommenderEntry {{").unwrap();
        writeln!(&mut output, "        name: {},", rust_string(&entry.name)).unwrap();
        writeln!(&mut output, "        avatar: {},", avatar).unwrap();
        writeln!(&mut output, "    }},").unwrap();
    }
    writeln!(&mut output, "];").unwrap();
    writeln!(&mut output).unwrap();

    writeln!(&mut output, "pub const MAP_SETTINGS: MapSettings = MapSettings {{").unwrap();
    writeln!(&mut output, "    provider: {},", provider).unwrap();
    writeln!(
        &mut output,
        "    initial_center: {},",
        rust_lng_lat(catalog.map.initial_center)
    )
    .unwrap();
    writeln!(&mut output, "    initial_zoom: {:?},", catalog.map.initial_zoom).unwrap();
    writeln!(&mut output, "    overview_zoom: {:?},", catalog.map.overview_zoom).unwrap();
    writeln!(&mut output, "    focus_zoom: {:?},", catalog.map.focus_zoom).unwrap();
    writeln!(&mut output, "    max_zoom: {:?},", catalog.map.max_zoom).unwrap();
    writeln!(&mut output, "}};").unwrap();
    writeln!(&mut output).unwrap();

    writeln!(&mut output, "pub const FORM_RULES: FormRules = FormRules {{").unwrap();
    writeln!(
        &mut output,
        "    require_recommender: {},",
        catalog.form.require_recommender
    )
    .unwrap();
    writeln!(&mut output, "    rating_min: {},", catalog.form.rating_min).unwrap();
    writeln!(&mut output, "    rating_max: {},", catalog.form.rating_max).unwrap();
    writeln!(&mut output, "    default_rating: {},", default_rating).unwrap();
    writeln!(&mut output, "}};").unwrap();

    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("missing OUT_DIR"));
    let out_path = out_dir.join("explorer_catalog.rs");
    fs::write(&out_path, output).unwrap_or_else(|err| {
        panic!("failed to write {}: {err}", out_path.display())
    });
}

fn resolve_catalog_path(workspace_root: &Path) -> PathBuf {
    let env_value = env::var("CITY_CATALOG_PATH").ok();
    let raw_path = match env_value {
        Some(value) if !value.trim().is_empty() => PathBuf::from(value),
        _ => workspace_root.join("catalog/catalog.toml"),
    };
    if raw_path.is_relative() {
        workspace_root.join(raw_path)
    } else {
        raw_path
    }
}

fn rust_string(value: &str) -> String {
    format!("{:?}", value)
}

fn rust_lng_lat(pair: [f64; 2]) -> String {
    format!("LngLat {{ lng: {:?}, lat: {:?} }}", pair[0], pair[1])
}

fn valid_lng_lat(pair: [f64; 2]) -> bool {
    let [lng, lat] = pair;
    lng.is_finite() && lat.is_finite() && (-180.0..=180.0).contains(&lng) && (-90.0..=90.0).contains(&lat)
}

fn validate_cities(cities: &[CityEntry], catalog_path: &Path) {
    let mut keys = HashSet::new();
    for city in cities {
        if city.key.trim().is_empty() {
            panic!("city key cannot be empty in {}", catalog_path.display());
        }
        if !valid_lng_lat(city.center) {
            panic!(
                "city '{}' has an invalid center in {}",
                city.key,
                catalog_path.display()
            );
        }
        if !city.zoom.is_finite() || city.zoom < 0.0 {
            panic!(
                "city '{}' has an invalid zoom in {}",
                city.key,
                catalog_path.display()
            );
        }
        if !keys.insert(city.key.clone()) {
            panic!(
                "duplicate city key '{}' in {}",
                city.key,
                catalog_path.display()
            );
        }
    }
}

fn validate_categories(categories: &[String], catalog_path: &Path) {
    let mut seen = HashSet::new();
    for category in categories {
        if category.trim().is_empty() {
            panic!("category cannot be empty in {}", catalog_path.display());
        }
        if category.eq_ignore_ascii_case(RESERVED_FILTER_LABEL) {
            panic!(
                "category '{}' is reserved for the filter in {}",
                category,
                catalog_path.display()
            );
        }
        if !seen.insert(category.clone()) {
            panic!(
                "duplicate category '{}' in {}",
                category,
                catalog_path.display()
            );
        }
    }
}

fn validate_recommenders(entries: &[RecommenderEntry], public_dir: &Path, catalog_path: &Path) {
    let mut names = HashSet::new();
    for entry in entries {
        if entry.name.trim().is_empty() {
            panic!("recommender name cannot be empty in {}", catalog_path.display());
        }
        if entry.name.eq_ignore_ascii_case(RESERVED_FILTER_LABEL) {
            panic!(
                "recommender '{}' is reserved for the filter in {}",
                entry.name,
                catalog_path.display()
            );
        }
        if let Some(avatar) = entry.avatar.as_deref() {
            if avatar.starts_with("data:") {
                panic!(
                    "recommender '{}' avatar cannot be a data URL in {}",
                    entry.name,
                    catalog_path.display()
                );
            }
            let asset = public_dir.join(avatar.trim_start_matches('/'));
            println!("cargo:rerun-if-changed={}", asset.display());
            if !asset.is_file() {
                panic!(
                    "recommender '{}' avatar {} is missing from {}",
                    entry.name,
                    avatar,
                    public_dir.display()
                );
            }
        }
        if !names.insert(entry.name.clone()) {
            panic!(
                "duplicate recommender '{}' in {}",
                entry.name,
                catalog_path.display()
            );
        }
    }
}

fn validate_map(map: &MapSection, catalog_path: &Path) {
    if !valid_lng_lat(map.initial_center) {
        panic!("map initial_center is invalid in {}", catalog_path.display());
    }
    let zooms = [
        ("initial_zoom", map.initial_zoom),
        ("overview_zoom", map.overview_zoom),
        ("focus_zoom", map.focus_zoom),
    ];
    if !map.max_zoom.is_finite() || map.max_zoom <= 0.0 {
        panic!("map max_zoom is invalid in {}", catalog_path.display());
    }
    for (name, value) in zooms {
        if !value.is_finite() || value < 0.0 || value > map.max_zoom {
            panic!(
                "map {} must be within 0..={} in {}",
                name,
                map.max_zoom,
                catalog_path.display()
            );
        }
    }
}

fn validate_form(form: &FormSection, catalog_path: &Path) -> u8 {
    if form.rating_min == 0 || form.rating_min > form.rating_max {
        panic!(
            "form rating bounds {}..={} are invalid in {}",
            form.rating_min,
            form.rating_max,
            catalog_path.display()
        );
    }
    let default_rating = form.default_rating.unwrap_or(form.rating_max);
    if default_rating < form.rating_min || default_rating > form.rating_max {
        panic!(
            "form default_rating {} is outside {}..={} in {}",
            default_rating,
            form.rating_min,
            form.rating_max,
            catalog_path.display()
        );
    }
    default_rating
}

use crate::destination::{Destination, ImageRef};
use crate::slug::{fold, slugify};
use crate::CatalogError;
use nomad_shared::DestinationSnapshot;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Deserialize)]
struct RawCatalog {
    continents: Vec<RawContinent>,
}

#[derive(Debug, Deserialize)]
struct RawContinent {
    name: String,
    #[serde(default)]
    encontinent: String,
    #[serde(default)]
    countries: Vec<RawCountry>,
}

#[derive(Debug, Deserialize)]
struct RawCountry {
    name: String,
    #[serde(default)]
    encountry: String,
    #[serde(default)]
    cities: Vec<RawCity>,
}

#[derive(Debug, Deserialize)]
struct RawCity {
    name: String,
    #[serde(default)]
    enname: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    endescription: String,
    #[serde(default)]
    image: Option<ImageRef>,
}

/// How simulated prices are drawn while loading.
#[derive(Debug, Clone, Copy)]
pub struct CatalogOptions {
    pub min_price: u32,
    pub max_price: u32,
    pub price_seed: Option<u64>,
}

impl Default for CatalogOptions {
    fn default() -> Self {
        Self {
            min_price: 500,
            max_price: 2000,
            price_seed: None,
        }
    }
}

/// Read-only destination table, loaded once at start-up.
#[derive(Debug, Clone, Default)]
pub struct DestinationCatalog {
    destinations: Vec<Destination>,
    index: HashMap<String, usize>,
}

impl DestinationCatalog {
    pub fn load_from_path(path: impl AsRef<Path>, options: CatalogOptions) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::load_from_str(&raw, options)
    }

    /// Flattens continents → countries → cities into destinations.
    pub fn load_from_str(json: &str, options: CatalogOptions) -> Result<Self, CatalogError> {
        if options.min_price > options.max_price {
            return Err(CatalogError::InvalidPriceRange {
                min: options.min_price,
                max: options.max_price,
            });
        }
        let raw: RawCatalog = serde_json::from_str(json)?;
        let mut rng = match options.price_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut destinations = Vec::new();
        for continent in raw.continents {
            for country in continent.countries {
                for city in country.cities {
                    destinations.push(Destination {
                        id: slugify(&format!("{}-{}", city.name, country.name)),
                        name: city.name,
                        enname: city.enname,
                        country: country.name.clone(),
                        encountry: country.encountry.clone(),
                        continent: continent.name.clone(),
                        encontinent: continent.encontinent.clone(),
                        description: city.description,
                        endescription: city.endescription,
                        image: city.image,
                        price: rng.gen_range(options.min_price..=options.max_price),
                    });
                }
            }
        }

        let catalog = Self::from_destinations(destinations);
        info!("Destination catalog loaded: {} destinations", catalog.len());
        Ok(catalog)
    }

    /// First occurrence of an id wins.
    pub fn from_destinations(destinations: Vec<Destination>) -> Self {
        let mut catalog = Self::default();
        for destination in destinations {
            if catalog.index.contains_key(&destination.id) {
                warn!("Skipping duplicate destination id {}", destination.id);
                continue;
            }
            catalog.index.insert(destination.id.clone(), catalog.destinations.len());
            catalog.destinations.push(destination);
        }
        catalog
    }

    pub fn all(&self) -> &[Destination] {
        &self.destinations
    }

    pub fn get(&self, id: &str) -> Option<&Destination> {
        self.index.get(id).map(|&i| &self.destinations[i])
    }

    pub fn snapshot(&self, id: &str) -> Option<DestinationSnapshot> {
        self.get(id).map(Destination::snapshot)
    }

    /// Case- and accent-insensitive substring match on name, country and
    /// continent in both languages. An empty query matches everything.
    pub fn search(&self, query: &str) -> Vec<&Destination> {
        let needle = fold(query.trim());
        if needle.is_empty() {
            return self.destinations.iter().collect();
        }
        self.destinations
            .iter()
            .filter(|d| d.search_fields().iter().any(|f| fold(f).contains(&needle)))
            .collect()
    }

    /// Matches either the Spanish or the English continent name.
    pub fn by_continent(&self, continent: &str) -> Vec<&Destination> {
        let wanted = fold(continent.trim());
        self.destinations
            .iter()
            .filter(|d| fold(&d.continent) == wanted || fold(&d.encontinent) == wanted)
            .collect()
    }

    /// Continent names in catalog order, without repeats.
    pub fn continents(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for d in &self.destinations {
            if !seen.contains(&d.continent.as_str()) {
                seen.push(&d.continent);
            }
        }
        seen
    }

    /// Random selection for the home page.
    pub fn featured<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> Vec<&Destination> {
        self.destinations.choose_multiple(rng, count).collect()
    }

    pub fn len(&self) -> usize {
        self.destinations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.destinations.is_empty()
    }
}

use nomad_shared::{DestinationSnapshot, Language};
use serde::{Deserialize, Serialize};

/// Image reference: either a bare URL or `{url, alt}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ImageRef {
    Url(String),
    Detailed {
        url: String,
        #[serde(default)]
        alt: String,
    },
}

impl ImageRef {
    pub fn url(&self) -> &str {
        match self {
            ImageRef::Url(url) => url,
            ImageRef::Detailed { url, .. } => url,
        }
    }

    pub fn alt(&self) -> Option<&str> {
        match self {
            ImageRef::Url(_) => None,
            ImageRef::Detailed { alt, .. } => Some(alt),
        }
    }
}

/// A bookable city. Spanish fields are canonical, `en*` fields are the English
/// translations and may be empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Destination {
    pub id: String,
    pub name: String,
    pub enname: String,
    pub country: String,
    pub encountry: String,
    pub continent: String,
    pub encontinent: String,
    pub description: String,
    pub endescription: String,
    pub image: Option<ImageRef>,
    pub price: u32,
}

fn pick<'a>(lang: Language, es: &'a str, en: &'a str) -> &'a str {
    match lang {
        Language::En if !en.is_empty() => en,
        _ => es,
    }
}

impl Destination {
    pub fn display_name(&self, lang: Language) -> &str {
        pick(lang, &self.name, &self.enname)
    }

    pub fn display_country(&self, lang: Language) -> &str {
        pick(lang, &self.country, &self.encountry)
    }

    pub fn display_continent(&self, lang: Language) -> &str {
        pick(lang, &self.continent, &self.encontinent)
    }

    pub fn display_description(&self, lang: Language) -> &str {
        pick(lang, &self.description, &self.endescription)
    }

    /// Denormalized copy for bookings and the favorites side table.
    pub fn snapshot(&self) -> DestinationSnapshot {
        let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_string());
        DestinationSnapshot {
            id: self.id.clone(),
            name: self.name.clone(),
            enname: non_empty(&self.enname),
            country: self.country.clone(),
            encountry: non_empty(&self.encountry),
            image: self.image.as_ref().map(|i| i.url().to_string()),
            price: Some(self.price),
        }
    }

    /// Text fields searched by the catalog, in both languages.
    pub(crate) fn search_fields(&self) -> [&str; 8] {
        [
            self.name.as_str(),
            self.enname.as_str(),
            self.country.as_str(),
            self.encountry.as_str(),
            self.continent.as_str(),
            self.encontinent.as_str(),
            self.description.as_str(),
            self.endescription.as_str(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_shapes() {
        let plain: ImageRef = serde_json::from_str("\"images/a.jpg\"").unwrap();
        assert_eq!(plain.url(), "images/a.jpg");
        assert!(plain.alt().is_none());

        let detailed: ImageRef =
            serde_json::from_str(r#"{"url": "images/b.jpg", "alt": "Playa"}"#).unwrap();
        assert_eq!(detailed.url(), "images/b.jpg");
        assert_eq!(detailed.alt(), Some("Playa"));
    }

    #[test]
    fn test_localized_fallback() {
        let d = Destination {
            id: "cusco-peru".to_string(),
            name: "Cusco".to_string(),
            enname: String::new(),
            country: "Perú".to_string(),
            encountry: "Peru".to_string(),
            continent: "América del Sur".to_string(),
            encontinent: "South America".to_string(),
            description: "Puerta de Machu Picchu".to_string(),
            endescription: String::new(),
            image: None,
            price: 900,
        };
        assert_eq!(d.display_name(Language::En), "Cusco");
        assert_eq!(d.display_country(Language::En), "Peru");
        assert_eq!(d.display_country(Language::Es), "Perú");
        assert_eq!(d.display_description(Language::En), "Puerta de Machu Picchu");

        let snap = d.snapshot();
        assert_eq!(snap.enname, None);
        assert_eq!(snap.price, Some(900));
    }
}

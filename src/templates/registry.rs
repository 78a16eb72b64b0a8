//! Compiled-in template catalog.
//!
//! The set of templates is closed: an id that does not parse into
//! [`TemplateId`] is rejected when a site is created or updated, so lookups
//! here cannot fail.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a compiled-in template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TemplateId {
    ClassicElegance,
    ModernMinimal,
    RusticCharm,
}

/// Returned when parsing an id that is not in the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTemplate(pub String);

impl fmt::Display for UnknownTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown template '{}'", self.0)
    }
}

impl std::error::Error for UnknownTemplate {}

impl TemplateId {
    pub const ALL: [TemplateId; 3] = [
        TemplateId::ClassicElegance,
        TemplateId::ModernMinimal,
        TemplateId::RusticCharm,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TemplateId::ClassicElegance => "classic-elegance",
            TemplateId::ModernMinimal => "modern-minimal",
            TemplateId::RusticCharm => "rustic-charm",
        }
    }

    pub fn descriptor(self) -> &'static TemplateDescriptor {
        match self {
            TemplateId::ClassicElegance => &CLASSIC_ELEGANCE,
            TemplateId::ModernMinimal => &MODERN_MINIMAL,
            TemplateId::RusticCharm => &RUSTIC_CHARM,
        }
    }
}

impl FromStr for TemplateId {
    type Err = UnknownTemplate;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        TemplateId::ALL
            .into_iter()
            .find(|id| id.as_str() == needle)
            .ok_or_else(|| UnknownTemplate(needle.to_string()))
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateCategory {
    Classic,
    Modern,
    Rustic,
}

#[derive(Debug, Clone, Serialize)]
pub struct Palette {
    pub primary: &'static str,
    pub secondary: &'static str,
    pub accent: &'static str,
    pub text: &'static str,
    pub background: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct Fonts {
    pub heading: &'static str,
    pub body: &'static str,
    pub accent: &'static str,
}

/// Static description of a template.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateDescriptor {
    pub id: TemplateId,
    pub name: &'static str,
    pub description: &'static str,
    pub category: TemplateCategory,
    pub colors: Palette,
    pub fonts: Fonts,
    /// Class put on `<body>`.
    pub wrapper_class: &'static str,
    /// Name of the theme partial included by the page layout.
    #[serde(skip)]
    pub stylesheet: &'static str,
}

static CLASSIC_ELEGANCE: TemplateDescriptor = TemplateDescriptor {
    id: TemplateId::ClassicElegance,
    name: "Classic Elegance",
    description: "Timeless design with elegant serif fonts and sophisticated colors",
    category: TemplateCategory::Classic,
    colors: Palette {
        primary: "#8B7355",
        secondary: "#F5F5DC",
        accent: "#D4AF37",
        text: "#2C2C2C",
        background: "#FFFFFF",
    },
    fonts: Fonts {
        heading: "Playfair Display",
        body: "Lora",
        accent: "Cormorant Garamond",
    },
    wrapper_class: "template-classic-elegance",
    stylesheet: "themes/classic-elegance.html",
};

static MODERN_MINIMAL: TemplateDescriptor = TemplateDescriptor {
    id: TemplateId::ModernMinimal,
    name: "Modern Minimal",
    description: "Clean, contemporary design with bold typography and minimalist aesthetic",
    category: TemplateCategory::Modern,
    colors: Palette {
        primary: "#000000",
        secondary: "#FFFFFF",
        accent: "#808080",
        text: "#1A1A1A",
        background: "#F9FAFB",
    },
    fonts: Fonts {
        heading: "Montserrat",
        body: "Inter",
        accent: "Outfit",
    },
    wrapper_class: "template-modern-minimal",
    stylesheet: "themes/modern-minimal.html",
};

static RUSTIC_CHARM: TemplateDescriptor = TemplateDescriptor {
    id: TemplateId::RusticCharm,
    name: "Rustic Charm",
    description: "Warm, natural design with earthy tones and handcrafted feel",
    category: TemplateCategory::Rustic,
    colors: Palette {
        primary: "#8B4513",
        secondary: "#FFF8DC",
        accent: "#CD853F",
        text: "#3E2723",
        background: "#FFF8E7",
    },
    fonts: Fonts {
        heading: "Merriweather",
        body: "Open Sans",
        accent: "Pacifico",
    },
    wrapper_class: "template-rustic-charm",
    stylesheet: "themes/rustic-charm.html",
};

/// Every descriptor, in catalog order.
pub fn catalog() -> impl Iterator<Item = &'static TemplateDescriptor> {
    TemplateId::ALL.into_iter().map(TemplateId::descriptor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_ids() {
        assert_eq!(
            "classic-elegance".parse::<TemplateId>(),
            Ok(TemplateId::ClassicElegance)
        );
        assert_eq!(" rustic-charm ".parse::<TemplateId>(), Ok(TemplateId::RusticCharm));
        for id in TemplateId::ALL {
            assert_eq!(id.as_str().parse::<TemplateId>(), Ok(id));
            assert_eq!(id.descriptor().id, id);
        }
    }

    #[test]
    fn test_unknown_id_rejected() {
        let err = "neon-vegas".parse::<TemplateId>().unwrap_err();
        assert_eq!(err.to_string(), "unknown template 'neon-vegas'");
    }

    #[test]
    fn test_serde_uses_kebab_case() {
        let json = serde_json::to_string(&TemplateId::ModernMinimal).unwrap();
        assert_eq!(json, "\"modern-minimal\"");
        let err = serde_json::from_str::<TemplateId>("\"ModernMinimal\"");
        assert!(err.is_err());
    }

    #[test]
    fn test_catalog_serializes_metadata() {
        let entries: Vec<_> = catalog().collect();
        assert_eq!(entries.len(), 3);
        let json = serde_json::to_value(entries[2]).unwrap();
        assert_eq!(json["id"], "rustic-charm");
        assert_eq!(json["category"], "rustic");
        assert_eq!(json["fonts"]["accent"], "Pacifico");
        assert_eq!(json["wrapperClass"], "template-rustic-charm");
        assert!(json.get("stylesheet").is_none());
    }
}

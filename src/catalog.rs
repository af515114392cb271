//! Static material and color catalogs offered to the user.
//!
//! Nothing here constrains the registry: materials and colors outside these
//! lists are still accepted by the mutation operations.

use crate::model::{Category, HexColor};

/// Materials offered for a category, in presentation order.
pub fn materials_for(category: Category) -> &'static [&'static str] {
    match category {
        Category::Roof => &["shingles", "tile", "metal", "slate", "thatch", "solar panels"],
        Category::Wall => &["brick", "siding", "stucco", "stone", "wood", "concrete"],
        Category::Window => &["glass", "tinted glass", "frosted glass", "stained glass"],
        Category::Door => &["wood", "metal", "glass", "composite", "fiberglass"],
        Category::Chimney => &["brick", "stone", "metal", "concrete"],
        Category::Foundation => &["concrete", "stone", "brick", "block"],
    }
}

/// Whether `material` is one of the catalog entries for `category`.
pub fn is_known_material(category: Category, material: &str) -> bool {
    materials_for(category).iter().any(|&m| m == material)
}

/// Short description of a material as used on a given category.
///
/// The same material reads differently per category ("metal" on a roof is
/// not "metal" on a chimney), so lookups are keyed by both.
pub fn material_description(category: Category, material: &str) -> Option<&'static str> {
    let description = match (category, material) {
        (Category::Roof, "shingles") => "Classic asphalt shingles - affordable and versatile",
        (Category::Roof, "tile") => "Clay or concrete tiles - durable and elegant",
        (Category::Roof, "metal") => "Steel or aluminum - modern and energy efficient",
        (Category::Roof, "slate") => "Natural slate - premium and long-lasting",
        (Category::Roof, "thatch") => "Traditional straw - rustic and eco-friendly",
        (Category::Roof, "solar panels") => "Photovoltaic panels - sustainable energy",

        (Category::Wall, "brick") => "Traditional clay brick - timeless and sturdy",
        (Category::Wall, "siding") => "Vinyl or wood siding - low maintenance",
        (Category::Wall, "stucco") => "Textured cement finish - Mediterranean style",
        (Category::Wall, "stone") => "Natural stone veneer - luxurious appearance",
        (Category::Wall, "wood") => "Wood cladding - warm and natural",
        (Category::Wall, "concrete") => "Modern concrete - industrial aesthetic",

        (Category::Window, "glass") => "Clear standard glass - maximum light",
        (Category::Window, "tinted glass") => "Privacy and UV protection",
        (Category::Window, "frosted glass") => "Diffused light and privacy",
        (Category::Window, "stained glass") => "Decorative colored glass",

        (Category::Door, "wood") => "Solid wood - classic and warm",
        (Category::Door, "metal") => "Steel or aluminum - secure and modern",
        (Category::Door, "glass") => "Glass panels - contemporary and bright",
        (Category::Door, "composite") => "Wood fiber composite - durable",
        (Category::Door, "fiberglass") => "Fiberglass - weather resistant",

        (Category::Chimney, "brick") => "Traditional brick - classic appearance",
        (Category::Chimney, "stone") => "Natural stone - rustic charm",
        (Category::Chimney, "metal") => "Metal flue - modern and efficient",
        (Category::Chimney, "concrete") => "Concrete blocks - cost effective",

        (Category::Foundation, "concrete") => "Poured concrete - standard and strong",
        (Category::Foundation, "stone") => "Natural stone - traditional look",
        (Category::Foundation, "brick") => "Brick foundation - classic style",
        (Category::Foundation, "block") => "Concrete blocks - economical choice",

        _ => return None,
    };
    Some(description)
}

/// A named family of swatches in the color catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Swatches {
    pub name: &'static str,
    pub colors: &'static [HexColor],
}

const fn hex(rgb: u32) -> HexColor {
    HexColor::from_rgb([(rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8])
}

const COLOR_CATALOG: &[Swatches] = &[
    Swatches {
        name: "Neutrals",
        colors: &[
            hex(0xFFFFFF), hex(0xF5F5F5), hex(0xE5E5E5), hex(0xD4D4D4), hex(0xA3A3A3),
            hex(0x737373), hex(0x525252), hex(0x404040), hex(0x262626), hex(0x171717),
        ],
    },
    Swatches {
        name: "Reds",
        colors: &[
            hex(0xFEF2F2), hex(0xFCA5A5), hex(0xEF4444), hex(0xDC2626), hex(0xB91C1C),
            hex(0x991B1B), hex(0x7F1D1D),
        ],
    },
    Swatches {
        name: "Blues",
        colors: &[
            hex(0xEFF6FF), hex(0x93C5FD), hex(0x3B82F6), hex(0x2563EB), hex(0x1D4ED8),
            hex(0x1E40AF), hex(0x1E3A8A),
        ],
    },
    Swatches {
        name: "Greens",
        colors: &[
            hex(0xF0FDF4), hex(0x86EFAC), hex(0x22C55E), hex(0x16A34A), hex(0x15803D),
            hex(0x166534), hex(0x14532D),
        ],
    },
    Swatches {
        name: "Yellows",
        colors: &[
            hex(0xFFFBEB), hex(0xFDE68A), hex(0xF59E0B), hex(0xD97706), hex(0xB45309),
            hex(0x92400E), hex(0x78350F),
        ],
    },
    Swatches {
        name: "Purples",
        colors: &[
            hex(0xFAF5FF), hex(0xC4B5FD), hex(0x8B5CF6), hex(0x7C3AED), hex(0x6D28D9),
            hex(0x5B21B6), hex(0x4C1D95),
        ],
    },
    Swatches {
        name: "Browns",
        colors: &[
            hex(0xFDF2F8), hex(0xD2B48C), hex(0x8B4513), hex(0xA0522D), hex(0x654321),
            hex(0x3E2723), hex(0x1A0E0A),
        ],
    },
];

const SUGGESTED_PALETTES: &[Swatches] = &[
    Swatches {
        name: "Classic",
        colors: &[hex(0xFFFFFF), hex(0x8B4513), hex(0x2563EB)],
    },
    Swatches {
        name: "Modern",
        colors: &[hex(0xF5F5F5), hex(0x404040), hex(0x22C55E)],
    },
];

/// Predefined colors grouped by hue family.
pub fn color_catalog() -> &'static [Swatches] {
    COLOR_CATALOG
}

/// Small curated palettes for a whole house.
pub fn suggested_palettes() -> &'static [Swatches] {
    SUGGESTED_PALETTES
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_material_has_a_description() {
        for &category in Category::all() {
            for material in materials_for(category) {
                assert!(
                    material_description(category, material).is_some(),
                    "{} / {}",
                    category,
                    material
                );
            }
        }
    }

    #[test]
    fn test_description_depends_on_category() {
        let roof = material_description(Category::Roof, "metal").unwrap();
        let chimney = material_description(Category::Chimney, "metal").unwrap();
        assert_ne!(roof, chimney);
        assert_eq!(material_description(Category::Window, "brick"), None);
    }

    #[test]
    fn test_known_materials() {
        assert!(is_known_material(Category::Roof, "solar panels"));
        assert!(!is_known_material(Category::Window, "wood"));
        assert!(!is_known_material(Category::Door, "Wood"));
    }

    #[test]
    fn test_mock_materials_are_in_catalog() {
        for region in crate::acquisition::mock_house_elements() {
            assert!(is_known_material(region.category(), region.material()));
        }
    }

    #[test]
    fn test_color_catalog_contents() {
        let total: usize = color_catalog().iter().map(|s| s.colors.len()).sum();
        assert_eq!(total, 52);
        assert_eq!(color_catalog()[0].colors[0].to_string(), "#FFFFFF");

        let classic = &suggested_palettes()[0];
        assert_eq!(classic.name, "Classic");
        let names: Vec<String> = classic.colors.iter().map(|c| c.to_string()).collect();
        assert_eq!(names, ["#FFFFFF", "#8B4513", "#2563EB"]);
    }
}

// --- Gender ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gender {
    Men,
    Women,
    Kids,
}

impl Gender {
    pub const ALL: [Gender; 3] = [Gender::Men, Gender::Women, Gender::Kids];

    /// Parse the one-letter code used by the analysis model (`m`, `f`, `k`).
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "m" => Some(Self::Men),
            "f" => Some(Self::Women),
            "k" => Some(Self::Kids),
            _ => None,
        }
    }

    /// Table-name prefix. Women's tables use `w`, not the request code `f`.
    fn table_prefix(self) -> &'static str {
        match self {
            Self::Men => "m",
            Self::Women => "w",
            Self::Kids => "k",
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Gender::Men => write!(f, "m"),
            Gender::Women => write!(f, "f"),
            Gender::Kids => write!(f, "k"),
        }
    }
}

// --- FootwearType ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FootwearType {
    SportShoes,
    FlipFlops,
    Sandals,
    Flats,
    Heels,
    SchoolShoes,
}

impl FootwearType {
    pub const ALL: [FootwearType; 6] = [
        FootwearType::SportShoes,
        FootwearType::FlipFlops,
        FootwearType::Sandals,
        FootwearType::Flats,
        FootwearType::Heels,
        FootwearType::SchoolShoes,
    ];

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "sport_shoes" => Some(Self::SportShoes),
            "flip_flops" => Some(Self::FlipFlops),
            "sandals" => Some(Self::Sandals),
            "flats" => Some(Self::Flats),
            "heels" => Some(Self::Heels),
            "school_shoes" => Some(Self::SchoolShoes),
            _ => None,
        }
    }
}

// --- CatalogTable ---

/// One of the nine denormalized catalog tables.
///
/// `as_str()` is the only source of table identifiers that reach SQL text,
/// so a request can never name an arbitrary table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CatalogTable {
    name: &'static str,
}

impl CatalogTable {
    /// Look up the table for a (gender, footwear type) pair.
    ///
    /// Each gender carries three footwear types; every other pairing is `None`.
    pub fn resolve(gender: Gender, footwear: FootwearType) -> Option<Self> {
        use FootwearType::*;
        use Gender::*;

        let name = match (gender, footwear) {
            (Men, SportShoes) => "m_product_details_sport_shoes_processed",
            (Men, FlipFlops) => "m_product_details_flip_flops_processed",
            (Men, Sandals) => "m_product_details_sandals_processed",
            (Women, SportShoes) => "w_product_details_sport_shoes_processed",
            (Women, Flats) => "w_product_details_flats_processed",
            (Women, Heels) => "w_product_details_heels_processed",
            (Kids, SportShoes) => "k_product_details_sport_shoes_processed",
            (Kids, FlipFlops) => "k_product_details_flip_flops_processed",
            (Kids, SchoolShoes) => "k_product_details_school_shoes_processed",
            (Men, Flats | Heels | SchoolShoes)
            | (Women, FlipFlops | Sandals | SchoolShoes)
            | (Kids, Sandals | Flats | Heels) => return None,
        };

        debug_assert!(name.starts_with(gender.table_prefix()));
        Some(Self { name })
    }

    /// Resolve from the raw lowercase codes carried by a query intent.
    /// Absent or unknown codes resolve to `None`.
    pub fn from_codes(gender: Option<&str>, footwear: Option<&str>) -> Option<Self> {
        let gender = Gender::from_code(gender?)?;
        let footwear = FootwearType::from_code(footwear?)?;
        Self::resolve(gender, footwear)
    }

    /// Best-sellers table for `/top-selling`. Only men's and women's lists exist.
    pub fn top_sellers(gender: Gender) -> Option<Self> {
        match gender {
            Gender::Men | Gender::Women => Self::resolve(gender, FootwearType::SportShoes),
            Gender::Kids => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        self.name
    }
}

impl std::fmt::Display for CatalogTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name)
    }
}

//! Controlled vocabulary of map feature properties.
//!
//! OSM tags are free-form `key=value` strings. Only a fixed set of them is meaningful for
//! rendering, and each of those is represented by a [`PropEnum`] code. Every member has a
//! lookup name: either the first character of the tag key followed by the tag value
//! (`highway=motorway` → `hmotorway`) or the tag key itself (`building`). [`encode`] tries the
//! former first and falls back to the latter.

use ahash::AHashMap;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

macro_rules! prop_enum {
    ($($variant:ident = $code:literal => $name:literal,)*) => {
        /// Recognized `key[=value]` combination.
        ///
        /// The discriminant is the code stored in tile files, so the values must never change.
        /// Members that belong to one group (e.g. road classes) have consecutive codes, which
        /// the classifier relies on.
        #[allow(missing_docs)]
        #[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[repr(u16)]
        pub enum PropEnum {
            $($variant = $code,)*
        }

        impl PropEnum {
            /// All members of the vocabulary in code order.
            pub const ALL: &'static [PropEnum] = &[$(PropEnum::$variant,)*];

            /// Lookup name of the member (lowercase).
            pub fn name(self) -> &'static str {
                match self {
                    $(PropEnum::$variant => $name,)*
                }
            }
        }
    };
}

prop_enum! {
    Highway = 1 => "highway",
    HighwayMotorway = 10 => "hmotorway",
    HighwayTrunk = 11 => "htrunk",
    HighwayPrimary = 12 => "hprimary",
    HighwaySecondary = 13 => "hsecondary",
    HighwayTertiary = 14 => "htertiary",
    HighwayUnclassified = 15 => "hunclassified",
    HighwayResidential = 16 => "hresidential",
    HighwayRoad = 17 => "hroad",
    Water = 20 => "water",
    Waterway = 21 => "waterway",
    Boundary = 30 => "boundary",
    BoundaryAdministrative = 31 => "badministrative",
    BoundaryForest = 32 => "bforest",
    AdminLevel = 35 => "admin_level",
    AdminLevel2 = 36 => "a2",
    Place = 40 => "place",
    PlaceCity = 41 => "pcity",
    PlaceTown = 42 => "ptown",
    PlaceLocality = 43 => "plocality",
    PlaceHamlet = 44 => "phamlet",
    Railway = 50 => "railway",
    Natural = 60 => "natural",
    NaturalFell = 61 => "nfell",
    NaturalGrassland = 62 => "ngrassland",
    NaturalHeath = 63 => "nheath",
    NaturalMoor = 64 => "nmoor",
    NaturalScrub = 65 => "nscrub",
    NaturalWetland = 66 => "nwetland",
    NaturalWood = 67 => "nwood",
    NaturalTreeRow = 68 => "ntree_row",
    NaturalBareRock = 69 => "nbare_rock",
    NaturalRock = 70 => "nrock",
    NaturalScree = 71 => "nscree",
    NaturalBeach = 72 => "nbeach",
    NaturalSand = 73 => "nsand",
    NaturalWater = 74 => "nwater",
    Landuse = 80 => "landuse",
    LanduseForest = 81 => "lforest",
    LanduseOrchard = 82 => "lorchard",
    LanduseResidential = 83 => "lresidential",
    LanduseCemetery = 84 => "lcemetery",
    LanduseIndustrial = 85 => "lindustrial",
    LanduseCommercial = 86 => "lcommercial",
    LanduseSquare = 87 => "lsquare",
    LanduseConstruction = 88 => "lconstruction",
    LanduseMilitary = 89 => "lmilitary",
    LanduseQuarry = 90 => "lquarry",
    LanduseBrownfield = 91 => "lbrownfield",
    LanduseFarm = 92 => "lfarm",
    LanduseMeadow = 93 => "lmeadow",
    LanduseGrass = 94 => "lgrass",
    LanduseGreenfield = 95 => "lgreenfield",
    LanduseRecreationGround = 96 => "lrecreation_ground",
    LanduseWinterSports = 97 => "lwinter_sports",
    LanduseAllotments = 98 => "lallotments",
    LanduseReservoir = 99 => "lreservoir",
    LanduseBasin = 100 => "lbasin",
    Building = 110 => "building",
    Leisure = 120 => "leisure",
    Amenity = 130 => "amenity",
}

lazy_static! {
    static ref BY_NAME: AHashMap<&'static str, PropEnum> =
        PropEnum::ALL.iter().map(|p| (p.name(), *p)).collect();
    static ref BY_CODE: AHashMap<u16, PropEnum> =
        PropEnum::ALL.iter().map(|p| (p.code(), *p)).collect();
}

impl PropEnum {
    /// Numeric code of the member.
    pub fn code(self) -> u16 {
        self as u16
    }

    /// Finds the member with the given code.
    pub fn from_code(code: u16) -> Option<Self> {
        BY_CODE.get(&code).copied()
    }

    /// Finds the member by its lookup name, ignoring case.
    pub fn from_name(name: &str) -> Option<Self> {
        if let Some(v) = BY_NAME.get(name) {
            return Some(*v);
        }

        BY_NAME.get(name.to_lowercase().as_str()).copied()
    }

    /// Returns true if the code of the member is in the inclusive range `[start, end]`.
    pub fn is_between(self, start: PropEnum, end: PropEnum) -> bool {
        (start.code()..=end.code()).contains(&self.code())
    }
}

/// Encodes a tag into the property code.
///
/// Tries the first character of the key followed by the value (`landuse=forest` →
/// `lforest`), then the key alone (`building=yes` → `building`). Returns `None` if neither is a
/// member of the vocabulary, in which case the tag is dropped by the encoder.
pub fn encode(key: &str, value: &str) -> Option<PropEnum> {
    let combined = match key.chars().next() {
        Some(first) => {
            let mut s = String::with_capacity(first.len_utf8() + value.len());
            s.push(first);
            s.push_str(value);
            s
        }
        None => value.to_string(),
    };

    PropEnum::from_name(&combined).or_else(|| PropEnum::from_name(key))
}

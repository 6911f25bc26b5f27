//! Copernicus land-cover classes

use serde::{Deserialize, Serialize};

use crate::error::MapError;

/// Land-cover class from the Copernicus LCM10 raster
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Biome {
    TreeCover,
    Shrubland,
    Grassland,
    Cropland,
    Wetland,
    Mangroves,
    MossLichen,
    Bare,
    BuiltUp,
    Water,
    SnowIce,
    Unclassifiable,
}

/// All classes in raster code order
pub const ALL_BIOMES: [Biome; 12] = [
    Biome::TreeCover,
    Biome::Shrubland,
    Biome::Grassland,
    Biome::Cropland,
    Biome::Wetland,
    Biome::Mangroves,
    Biome::MossLichen,
    Biome::Bare,
    Biome::BuiltUp,
    Biome::Water,
    Biome::SnowIce,
    Biome::Unclassifiable,
];

impl Biome {
    /// Convert a raster classification code to a class
    pub fn from_code(code: u16) -> Result<Self, MapError> {
        match code {
            10 => Ok(Biome::TreeCover),
            20 => Ok(Biome::Shrubland),
            30 => Ok(Biome::Grassland),
            40 => Ok(Biome::Cropland),
            50 => Ok(Biome::Wetland),
            60 => Ok(Biome::Mangroves),
            70 => Ok(Biome::MossLichen),
            80 => Ok(Biome::Bare),
            90 => Ok(Biome::BuiltUp),
            100 => Ok(Biome::Water),
            110 => Ok(Biome::SnowIce),
            254 => Ok(Biome::Unclassifiable),
            other => Err(MapError::UnknownLandCover(other)),
        }
    }

    /// Raster classification code for this class
    pub fn code(self) -> u16 {
        match self {
            Biome::TreeCover => 10,
            Biome::Shrubland => 20,
            Biome::Grassland => 30,
            Biome::Cropland => 40,
            Biome::Wetland => 50,
            Biome::Mangroves => 60,
            Biome::MossLichen => 70,
            Biome::Bare => 80,
            Biome::BuiltUp => 90,
            Biome::Water => 100,
            Biome::SnowIce => 110,
            Biome::Unclassifiable => 254,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Biome::TreeCover => "Tree cover",
            Biome::Shrubland => "Shrubland",
            Biome::Grassland => "Grassland",
            Biome::Cropland => "Cropland",
            Biome::Wetland => "Herbaceous wetland",
            Biome::Mangroves => "Mangroves",
            Biome::MossLichen => "Moss and lichen",
            Biome::Bare => "Bare/sparse vegetation",
            Biome::BuiltUp => "Built-up",
            Biome::Water => "Permanent water bodies",
            Biome::SnowIce => "Snow and ice",
            Biome::Unclassifiable => "Unclassifiable",
        }
    }

    /// Classes whose raster extent is replaced during grid repair.
    ///
    /// Built-up and water cells are filled from their neighbors because their
    /// true extent comes from explicit vector snapping, not raster noise.
    pub fn default_disallowed() -> [Biome; 2] {
        [Biome::BuiltUp, Biome::Water]
    }
}

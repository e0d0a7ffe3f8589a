// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Design settings: closed sets of finishes, styles and view modes.
//!
//! Every enum here carries an exhaustive mapping to the descriptive phrase
//! used in generation prompts, so an unmapped value cannot be constructed.
//! The serde names match the labels the original product exposed to users
//! ("Slate Blue", "2D Architectural Plan", ...), which keeps the API
//! vocabulary stable for clients.

use serde::{Deserialize, Serialize};

/// Cabinet finish options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CabinetColor {
    Oyster,
    Shoji,
    Naval,
    Espresso,
    Saddle,
    #[serde(rename = "Slate Blue")]
    SlateBlue,
    Arctic,
    Taupe,
    Pebble,
    Walnut,
    Oak,
    White,
}

impl CabinetColor {
    /// All finishes, in catalog order.
    pub const ALL: [CabinetColor; 12] = [
        CabinetColor::Oyster,
        CabinetColor::Shoji,
        CabinetColor::Naval,
        CabinetColor::Espresso,
        CabinetColor::Saddle,
        CabinetColor::SlateBlue,
        CabinetColor::Arctic,
        CabinetColor::Taupe,
        CabinetColor::Pebble,
        CabinetColor::Walnut,
        CabinetColor::Oak,
        CabinetColor::White,
    ];

    /// Descriptive material phrase used verbatim in prompts.
    pub fn prompt_phrase(self) -> &'static str {
        match self {
            CabinetColor::Oyster => "Oyster light gray beige",
            CabinetColor::Shoji => "Shoji warm creamy white",
            CabinetColor::Naval => "Deep Naval blue",
            CabinetColor::Espresso => "Dark Espresso wood",
            CabinetColor::Saddle => "Saddle brown wood",
            CabinetColor::SlateBlue => "Muted Slate Blue",
            CabinetColor::Arctic => "Cool Arctic White",
            CabinetColor::Taupe => "Taupe brownish gray",
            CabinetColor::Pebble => "Pebble light gray",
            CabinetColor::Walnut => "Natural Walnut wood grain",
            CabinetColor::Oak => "Natural Oak wood grain",
            CabinetColor::White => "Pure White",
        }
    }
}

/// Cabinet door construction style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DoorStyle {
    Shaker,
    #[serde(rename = "Flat Panel")]
    FlatPanel,
}

impl DoorStyle {
    /// Full door description, including the solid-material enforcement the
    /// model tends to ignore when phrased loosely.
    pub fn prompt_phrase(self) -> &'static str {
        match self {
            DoorStyle::Shaker => {
                "Solid Wood Shaker style (Recessed Panel with flat center). \
                 OPAQUE PAINTED FINISH. SOLID DOORS ONLY. ABSOLUTELY NO GLASS \
                 INSERTS on wall cabinets unless explicitly labeled \"Glass\""
            }
            DoorStyle::FlatPanel => {
                "Modern Minimalist Flat Slab. SOLID OPAQUE FINISH. SOLID DOORS \
                 ONLY. ABSOLUTELY NO GLASS INSERTS"
            }
        }
    }
}

/// Wall paint options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WallColor {
    #[serde(rename = "Pure White")]
    PureWhite,
    #[serde(rename = "Off White")]
    OffWhite,
    #[serde(rename = "Light Gray")]
    LightGray,
    Beige,
    #[serde(rename = "Soft Blue")]
    SoftBlue,
}

impl WallColor {
    pub fn prompt_phrase(self) -> &'static str {
        match self {
            WallColor::PureWhite => "Pure White",
            WallColor::OffWhite => "Off White",
            WallColor::LightGray => "Light Gray",
            WallColor::Beige => "Beige",
            WallColor::SoftBlue => "Soft Blue",
        }
    }
}

/// Countertop surface options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Countertop {
    #[serde(rename = "White Quartz")]
    WhiteQuartz,
    #[serde(rename = "Black Granite")]
    BlackGranite,
    #[serde(rename = "Marble Light")]
    MarbleLight,
    #[serde(rename = "Concrete Gray")]
    ConcreteGray,
}

impl Countertop {
    pub fn prompt_phrase(self) -> &'static str {
        match self {
            Countertop::WhiteQuartz => "White Quartz",
            Countertop::BlackGranite => "Black Granite",
            Countertop::MarbleLight => "Marble Light",
            Countertop::ConcreteGray => "Concrete Gray",
        }
    }
}

/// Output view mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViewMode {
    #[serde(rename = "3D Realism")]
    ThreeDRealism,
    #[serde(rename = "2D Architectural Plan")]
    TwoDPlan,
}

/// Current material/style configuration.
///
/// Always fully populated; partial updates are expressed by replacing the
/// whole value. Owned by the session and mutated only through explicit
/// update operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignSettings {
    pub view_mode: ViewMode,
    pub wall_cabinet_color: CabinetColor,
    pub base_cabinet_color: CabinetColor,
    pub door_style: DoorStyle,
    pub wall_color: WallColor,
    pub countertop: Countertop,
}

impl Default for DesignSettings {
    fn default() -> Self {
        Self {
            view_mode: ViewMode::ThreeDRealism,
            wall_cabinet_color: CabinetColor::White,
            base_cabinet_color: CabinetColor::White,
            door_style: DoorStyle::Shaker,
            wall_color: WallColor::PureWhite,
            countertop: Countertop::WhiteQuartz,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_cabinet_color_has_a_phrase() {
        for color in CabinetColor::ALL {
            assert!(!color.prompt_phrase().is_empty());
        }
    }

    #[test]
    fn settings_round_trip_uses_display_names() {
        let settings = DesignSettings {
            view_mode: ViewMode::TwoDPlan,
            wall_cabinet_color: CabinetColor::SlateBlue,
            base_cabinet_color: CabinetColor::Oak,
            door_style: DoorStyle::FlatPanel,
            wall_color: WallColor::SoftBlue,
            countertop: Countertop::BlackGranite,
        };

        let json = serde_json::to_string(&settings).unwrap();
        assert!(json.contains("\"viewMode\":\"2D Architectural Plan\""));
        assert!(json.contains("\"wallCabinetColor\":\"Slate Blue\""));
        assert!(json.contains("\"doorStyle\":\"Flat Panel\""));

        let back: DesignSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(back, settings);
    }

    #[test]
    fn unknown_finish_is_rejected_at_the_boundary() {
        let json = r#"{
            "viewMode": "3D Realism",
            "wallCabinetColor": "Neon Pink",
            "baseCabinetColor": "White",
            "doorStyle": "Shaker",
            "wallColor": "Pure White",
            "countertop": "White Quartz"
        }"#;
        assert!(serde_json::from_str::<DesignSettings>(json).is_err());
    }
}

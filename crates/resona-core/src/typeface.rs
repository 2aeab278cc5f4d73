// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The catalog of typefaces bundled with the engine.
//!
//! This is a closed registry of named constants. Nothing here rasterizes or
//! loads fonts; font backends map each variant to the file they ship with.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A built-in typeface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Typeface {
    /// Noto Sans CJK, Japanese glyph forms.
    CjkRegularJp,
    /// Noto Sans CJK, Korean glyph forms.
    CjkRegularKr,
    /// Noto Sans CJK, Simplified Chinese glyph forms.
    CjkRegularSc,
    /// Noto Sans CJK, Traditional Chinese (Taiwan) glyph forms.
    CjkRegularTc,
    /// Noto Sans CJK, Traditional Chinese (Hong Kong) glyph forms.
    CjkRegularHk,
    /// Single-color emoji outlines.
    MonochromeEmoji,
    /// Full-color emoji bitmaps.
    ColorEmoji,
    /// M+ family, thin weight.
    MplusThin,
    /// M+ family, light weight.
    MplusLight,
    /// M+ family, regular weight.
    MplusRegular,
    /// M+ family, medium weight.
    MplusMedium,
    /// M+ family, bold weight.
    MplusBold,
    /// M+ family, heavy weight.
    MplusHeavy,
    /// M+ family, black weight.
    MplusBlack,
    /// Font Awesome, solid icon set.
    IconAwesomeSolid,
    /// Font Awesome, brand icon set.
    IconAwesomeBrand,
    /// Material Design icons.
    IconMaterialDesign,
}

impl Typeface {
    /// Revision of the bundled catalog. Bumped whenever a variant is added.
    pub const CATALOG_VERSION: u32 = 2;

    /// Alias for the thinnest member of the M+ family.
    pub const THIN: Typeface = Typeface::MplusThin;
    /// Alias for [`Typeface::MplusLight`].
    pub const LIGHT: Typeface = Typeface::MplusLight;
    /// The default text face: the medium member of the M+ family.
    pub const REGULAR: Typeface = Typeface::MplusMedium;
    /// Alias for [`Typeface::MplusMedium`].
    pub const MEDIUM: Typeface = Typeface::MplusMedium;
    /// Alias for [`Typeface::MplusBold`].
    pub const BOLD: Typeface = Typeface::MplusBold;
    /// Alias for [`Typeface::MplusHeavy`].
    pub const HEAVY: Typeface = Typeface::MplusHeavy;
    /// Alias for [`Typeface::MplusBlack`].
    pub const BLACK: Typeface = Typeface::MplusBlack;

    /// Every typeface, in catalog order.
    pub const ALL: [Typeface; 17] = [
        Typeface::CjkRegularJp,
        Typeface::CjkRegularKr,
        Typeface::CjkRegularSc,
        Typeface::CjkRegularTc,
        Typeface::CjkRegularHk,
        Typeface::MonochromeEmoji,
        Typeface::ColorEmoji,
        Typeface::MplusThin,
        Typeface::MplusLight,
        Typeface::MplusRegular,
        Typeface::MplusMedium,
        Typeface::MplusBold,
        Typeface::MplusHeavy,
        Typeface::MplusBlack,
        Typeface::IconAwesomeSolid,
        Typeface::IconAwesomeBrand,
        Typeface::IconMaterialDesign,
    ];

    /// Returns the stable name used in configuration files.
    pub const fn name(self) -> &'static str {
        match self {
            Typeface::CjkRegularJp => "CJK_Regular_JP",
            Typeface::CjkRegularKr => "CJK_Regular_KR",
            Typeface::CjkRegularSc => "CJK_Regular_SC",
            Typeface::CjkRegularTc => "CJK_Regular_TC",
            Typeface::CjkRegularHk => "CJK_Regular_HK",
            Typeface::MonochromeEmoji => "MonochromeEmoji",
            Typeface::ColorEmoji => "ColorEmoji",
            Typeface::MplusThin => "Mplus_Thin",
            Typeface::MplusLight => "Mplus_Light",
            Typeface::MplusRegular => "Mplus_Regular",
            Typeface::MplusMedium => "Mplus_Medium",
            Typeface::MplusBold => "Mplus_Bold",
            Typeface::MplusHeavy => "Mplus_Heavy",
            Typeface::MplusBlack => "Mplus_Black",
            Typeface::IconAwesomeSolid => "Icon_Awesome_Solid",
            Typeface::IconAwesomeBrand => "Icon_Awesome_Brand",
            Typeface::IconMaterialDesign => "Icon_MaterialDesign",
        }
    }

    /// Returns `true` for the CJK regional variants.
    pub const fn is_cjk(self) -> bool {
        matches!(
            self,
            Typeface::CjkRegularJp
                | Typeface::CjkRegularKr
                | Typeface::CjkRegularSc
                | Typeface::CjkRegularTc
                | Typeface::CjkRegularHk
        )
    }

    /// Returns `true` for the emoji faces.
    pub const fn is_emoji(self) -> bool {
        matches!(self, Typeface::MonochromeEmoji | Typeface::ColorEmoji)
    }

    /// Returns `true` for the icon fonts.
    pub const fn is_icon(self) -> bool {
        matches!(
            self,
            Typeface::IconAwesomeSolid | Typeface::IconAwesomeBrand | Typeface::IconMaterialDesign
        )
    }
}

impl Default for Typeface {
    fn default() -> Self {
        Typeface::REGULAR
    }
}

impl fmt::Display for Typeface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The name given to [`Typeface::from_str`] matches no catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTypeface(pub String);

impl fmt::Display for UnknownTypeface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown typeface '{}'", self.0)
    }
}

impl std::error::Error for UnknownTypeface {}

impl FromStr for Typeface {
    type Err = UnknownTypeface;

    /// Parses a catalog name, or one of the weight aliases (`"Regular"`, `"Bold"`, ...).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(face) = Typeface::ALL.iter().find(|face| face.name() == s) {
            return Ok(*face);
        }
        match s {
            "Thin" => Ok(Typeface::THIN),
            "Light" => Ok(Typeface::LIGHT),
            "Regular" => Ok(Typeface::REGULAR),
            "Medium" => Ok(Typeface::MEDIUM),
            "Bold" => Ok(Typeface::BOLD),
            "Heavy" => Ok(Typeface::HEAVY),
            "Black" => Ok(Typeface::BLACK),
            _ => Err(UnknownTypeface(s.to_string())),
        }
    }
}

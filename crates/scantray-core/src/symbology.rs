//! Barcode symbologies and camera facing.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

/// Barcode and QR formats a detector can be asked to recognize.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumIter,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum Symbology {
    Qr,
    Code128,
    Ean13,
    Ean8,
    Code39,
    UpcA,
    UpcE,
    Codabar,
}

impl Symbology {
    /// Every supported symbology, in declaration order.
    pub fn all() -> Vec<Symbology> {
        Self::iter().collect()
    }
}

/// Preferred camera facing for a detector.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum Facing {
    /// Rear camera, pointed at the world.
    #[default]
    Environment,
    /// Front camera, pointed at the user.
    User,
}

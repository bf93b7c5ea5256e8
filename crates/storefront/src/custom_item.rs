//! Custom-shirt configurator pricing.
//!
//! A custom shirt costs a fixed unique-art fee plus a material surcharge plus
//! a size surcharge. Color does not affect the price.

use core::fmt;
use core::str::FromStr;

use kangaroo_core::Price;
use thiserror::Error;

use crate::cart::CustomItemSpec;

/// Display name of every configurator line.
pub const CUSTOM_ITEM_NAME: &str = "Camisa Exclusiva (Customizada)";

/// Image shown for configurator lines.
pub const CUSTOM_ITEM_IMAGE: &str = "Imagens/Banners/exkangaroo1.png";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CustomItemError {
    #[error("Describe the shirt before adding it to the cart")]
    EmptyDescription,

    #[error("Unknown {kind}: {value}")]
    UnknownOption { kind: &'static str, value: String },
}

/// Cotton tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Material {
    #[default]
    Standard,
    Premium,
}

impl Material {
    pub const ALL: [Self; 2] = [Self::Standard, Self::Premium];

    /// Short key recorded in fulfilment details.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Standard => "padrao",
            Self::Premium => "premium",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Standard => "Algodão Padrão",
            Self::Premium => "Algodão Premium",
        }
    }
}

impl FromStr for Material {
    type Err = CustomItemError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "padrao" | "padrão" | "standard" => Ok(Self::Standard),
            "premium" => Ok(Self::Premium),
            _ => Err(CustomItemError::UnknownOption {
                kind: "material",
                value: s.to_owned(),
            }),
        }
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ShirtSize {
    Pp,
    P,
    #[default]
    M,
    G,
    Gg,
    Xg,
    Xxg,
}

impl ShirtSize {
    pub const ALL: [Self; 7] = [
        Self::Pp,
        Self::P,
        Self::M,
        Self::G,
        Self::Gg,
        Self::Xg,
        Self::Xxg,
    ];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pp => "PP",
            Self::P => "P",
            Self::M => "M",
            Self::G => "G",
            Self::Gg => "GG",
            Self::Xg => "XG",
            Self::Xxg => "XXG",
        }
    }
}

impl FromStr for ShirtSize {
    type Err = CustomItemError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_uppercase();
        Self::ALL
            .into_iter()
            .find(|size| size.label() == wanted)
            .ok_or_else(|| CustomItemError::UnknownOption {
                kind: "size",
                value: s.to_owned(),
            })
    }
}

impl fmt::Display for ShirtSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ShirtColor {
    #[default]
    Preto,
    Branco,
    Cinza,
}

impl ShirtColor {
    pub const ALL: [Self; 3] = [Self::Preto, Self::Branco, Self::Cinza];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Preto => "Preto",
            Self::Branco => "Branco",
            Self::Cinza => "Cinza",
        }
    }
}

impl FromStr for ShirtColor {
    type Err = CustomItemError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|color| color.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| CustomItemError::UnknownOption {
                kind: "color",
                value: s.to_owned(),
            })
    }
}

impl fmt::Display for ShirtColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Price components for custom shirts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CustomPriceTable {
    pub unique_art: Price,
    pub standard_cotton: Price,
    pub premium_cotton: Price,
}

impl Default for CustomPriceTable {
    fn default() -> Self {
        Self {
            unique_art: Price::from_cents(15_000),
            standard_cotton: Price::from_cents(4_500),
            premium_cotton: Price::from_cents(6_500),
        }
    }
}

impl CustomPriceTable {
    #[must_use]
    pub const fn material(&self, material: Material) -> Price {
        match material {
            Material::Standard => self.standard_cotton,
            Material::Premium => self.premium_cotton,
        }
    }

    #[must_use]
    pub fn size_surcharge(size: ShirtSize) -> Price {
        let cents = match size {
            ShirtSize::Pp | ShirtSize::P => 0,
            ShirtSize::M => 1_000,
            ShirtSize::G => 1_500,
            ShirtSize::Gg => 1_800,
            ShirtSize::Xg => 2_500,
            ShirtSize::Xxg => 5_000,
        };
        Price::from_cents(cents)
    }

    /// Unique art + material + size.
    #[must_use]
    pub fn price(&self, material: Material, size: ShirtSize) -> Price {
        self.unique_art + self.material(material) + Self::size_surcharge(size)
    }
}

/// Price a custom shirt with the store's standard table.
#[must_use]
pub fn price_custom_item(material: Material, size: ShirtSize) -> Price {
    CustomPriceTable::default().price(material, size)
}

/// Configurator answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomShirtOrder {
    pub description: String,
    /// The customer will send reference images over WhatsApp.
    pub has_reference: bool,
    pub material: Material,
    pub size: ShirtSize,
    pub color: ShirtColor,
}

impl CustomShirtOrder {
    #[must_use]
    pub fn price(&self) -> Price {
        price_custom_item(self.material, self.size)
    }

    /// Fulfilment details recorded on the line item.
    #[must_use]
    pub fn details(&self) -> String {
        let mut details = format!(
            "Material: {}, Desc: \"{}\"",
            self.material.key(),
            self.description.trim()
        );
        if self.has_reference {
            details.push_str(" (AVISO: Cliente tem referências!)");
        }
        details
    }

    /// Build the cart line for this order.
    ///
    /// # Errors
    ///
    /// Returns [`CustomItemError::EmptyDescription`] when the description is blank.
    pub fn into_item_spec(self) -> Result<CustomItemSpec, CustomItemError> {
        if self.description.trim().is_empty() {
            return Err(CustomItemError::EmptyDescription);
        }
        Ok(CustomItemSpec {
            name: CUSTOM_ITEM_NAME.to_owned(),
            image: CUSTOM_ITEM_IMAGE.to_owned(),
            price: self.price(),
            color: self.color.label().to_owned(),
            size: self.size.label().to_owned(),
            description: self.details(),
        })
    }
}

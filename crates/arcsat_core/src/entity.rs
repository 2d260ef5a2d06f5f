use std::collections::BTreeMap;

use arcsat_derive::CliValue;
use serde::{Deserialize, Serialize};

use crate::GeoPoint;

/// Business role of a located entity.
#[derive(
    Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, CliValue, Serialize, Deserialize,
)]
#[cli_value(option = "category")]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[cli(alias = "fornecedor")]
    Supplier,
    #[cli(alias = "comprador")]
    Buyer,
    /// Generic customer that matched neither supplier nor buyer keywords.
    #[cli(alias = "cliente")]
    Client,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Supplier, Category::Buyer, Category::Client];

    /// Marker color used by the map layer.
    pub fn color(&self) -> &'static str {
        match self {
            Self::Supplier => "#4a7c2e",
            Self::Buyer | Self::Client => "#daa520",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Supplier => "Supplier",
            Self::Buyer => "Buyer",
            Self::Client => "Client",
        }
    }
}

/// A geocoded business. Never mutated after construction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LocatedEntity {
    pub id: String,
    pub display_name: String,
    pub category: Category,
    pub location: GeoPoint,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

impl LocatedEntity {
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        category: Category,
        location: GeoPoint,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            category,
            location,
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::{Category, LocatedEntity};
    use crate::GeoPoint;

    #[test]
    fn category_parses_english_and_portuguese_names() {
        assert_eq!(Category::parse("supplier").expect("parse"), Category::Supplier);
        assert_eq!(Category::parse("Fornecedor").expect("parse"), Category::Supplier);
        assert_eq!(Category::parse("comprador").expect("parse"), Category::Buyer);
        assert_eq!(Category::parse("cliente").expect("parse"), Category::Client);
    }

    #[test]
    fn category_parse_rejects_unknown_names() {
        let err = Category::parse("vendor").expect_err("unknown category");
        assert!(err.to_string().contains("expected supplier|buyer|client"));
    }

    #[test]
    fn category_display_is_canonical() {
        assert_eq!(Category::Buyer.to_string(), "buyer");
        assert_eq!(Category::NAMES, &["supplier", "buyer", "client"]);
    }

    #[test]
    fn attributes_are_looked_up_by_key() {
        let entity = LocatedEntity::new(
            "1",
            "Fazenda Boa Vista",
            Category::Buyer,
            GeoPoint::new(-21.1699, -47.8099).expect("valid point"),
        )
        .with_attribute("sector", "Pecuária");

        assert_eq!(entity.attribute("sector"), Some("Pecuária"));
        assert_eq!(entity.attribute("address"), None);
    }
}

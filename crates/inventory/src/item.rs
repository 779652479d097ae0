use chrono::{DateTime, Utc};
use core::str::FromStr;
use serde::{Deserialize, Serialize};

use stockline_core::{DomainError, DomainResult};

// ─────────────────────────────────────────────────────────────────────────────
// Closed enumerations
// ─────────────────────────────────────────────────────────────────────────────

/// Top-level classification of an inventory record.
///
/// Drives the item-id prefix; immutable after creation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Material,
    Product,
    Asset,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Material, Category::Product, Category::Asset];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Material => "material",
            Category::Product => "product",
            Category::Asset => "asset",
        }
    }

    /// Item-id prefix: first three letters of the category name, uppercased.
    pub fn prefix(&self) -> &'static str {
        match self {
            Category::Material => "MAT",
            Category::Product => "PRO",
            Category::Asset => "ASS",
        }
    }

    /// Dense index, used for per-category lock tables.
    pub fn index(&self) -> usize {
        match self {
            Category::Material => 0,
            Category::Product => 1,
            Category::Asset => 2,
        }
    }
}

impl core::fmt::Display for Category {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "material" => Ok(Category::Material),
            "product" => Ok(Category::Product),
            "asset" => Ok(Category::Asset),
            other => Err(DomainError::validation(format!(
                "category must be one of: material, product, asset (got '{other}')"
            ))),
        }
    }
}

/// Material sub-classification. Meaningless outside `Category::Material`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaterialType {
    #[serde(rename = "virgin")]
    Virgin,
    #[serde(rename = "recycled")]
    Recycled,
    #[serde(rename = "master")]
    Master,
    #[serde(rename = "special added")]
    SpecialAdded,
}

impl MaterialType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MaterialType::Virgin => "virgin",
            MaterialType::Recycled => "recycled",
            MaterialType::Master => "master",
            MaterialType::SpecialAdded => "special added",
        }
    }
}

impl core::fmt::Display for MaterialType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MaterialType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "virgin" => Ok(MaterialType::Virgin),
            "recycled" => Ok(MaterialType::Recycled),
            "master" => Ok(MaterialType::Master),
            "special added" => Ok(MaterialType::SpecialAdded),
            other => Err(DomainError::validation(format!(
                "type must be one of: virgin, recycled, master, special added (got '{other}')"
            ))),
        }
    }
}

/// Operator-set availability label. Never derived from `stock`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemStatus {
    #[serde(rename = "in stock")]
    InStock,
    #[serde(rename = "repurchase needed")]
    RepurchaseNeeded,
    #[serde(rename = "temporarily unavailable")]
    TemporarilyUnavailable,
}

impl ItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::InStock => "in stock",
            ItemStatus::RepurchaseNeeded => "repurchase needed",
            ItemStatus::TemporarilyUnavailable => "temporarily unavailable",
        }
    }
}

impl core::fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in stock" => Ok(ItemStatus::InStock),
            "repurchase needed" => Ok(ItemStatus::RepurchaseNeeded),
            "temporarily unavailable" => Ok(ItemStatus::TemporarilyUnavailable),
            other => Err(DomainError::validation(format!(
                "status must be one of: in stock, repurchase needed, temporarily unavailable (got '{other}')"
            ))),
        }
    }
}

/// One of the two physical production lines. Partitions all queries and stats.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Location {
    #[serde(rename = "location-1")]
    LocationOne,
    #[serde(rename = "location-2")]
    LocationTwo,
}

impl Location {
    pub fn as_str(&self) -> &'static str {
        match self {
            Location::LocationOne => "location-1",
            Location::LocationTwo => "location-2",
        }
    }
}

impl core::fmt::Display for Location {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Location {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "location-1" => Ok(Location::LocationOne),
            "location-2" => Ok(Location::LocationTwo),
            other => Err(DomainError::validation(format!(
                "location must be one of: location-1, location-2 (got '{other}')"
            ))),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Classification (tagged union)
// ─────────────────────────────────────────────────────────────────────────────

/// Category plus its material sub-type, as one tagged union.
///
/// A non-material record cannot carry a material type by construction.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Classification {
    Material(MaterialType),
    Product,
    Asset,
}

impl Classification {
    /// Build from the flat (category, optional type) pair that arrives on the
    /// wire, rejecting invalid combinations.
    pub fn new(category: Category, material_type: Option<MaterialType>) -> DomainResult<Self> {
        match (category, material_type) {
            (Category::Material, Some(t)) => Ok(Classification::Material(t)),
            (Category::Material, None) => Err(DomainError::validation(
                "material items require a type (virgin, recycled, master, special added)",
            )),
            (Category::Product, None) => Ok(Classification::Product),
            (Category::Asset, None) => Ok(Classification::Asset),
            (category, Some(_)) => Err(DomainError::validation(format!(
                "type is only valid for materials (category is '{category}')"
            ))),
        }
    }

    pub fn category(&self) -> Category {
        match self {
            Classification::Material(_) => Category::Material,
            Classification::Product => Category::Product,
            Classification::Asset => Category::Asset,
        }
    }

    pub fn material_type(&self) -> Option<MaterialType> {
        match self {
            Classification::Material(t) => Some(*t),
            Classification::Product | Classification::Asset => None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Item id
// ─────────────────────────────────────────────────────────────────────────────

/// Inventory item identifier: `<CategoryPrefix><SequenceNumber>` (e.g. `MAT001`).
///
/// Assigned at creation from the count of existing items sharing the
/// category; immutable thereafter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Derive the id for the next item of `category`, given how many items of
    /// that category already exist. Zero-padding is a minimum width: the
    /// 1000th material becomes `MAT1000`.
    pub fn derive(category: Category, existing_count: u64) -> Self {
        Self(format!("{}{:03}", category.prefix(), existing_count + 1))
    }

    /// Parse and validate an id received from the outside.
    pub fn parse(s: &str) -> DomainResult<Self> {
        let (prefix, digits) = s.split_at_checked(3).ok_or_else(|| {
            DomainError::invalid_id(format!("item id too short: '{s}'"))
        })?;

        if Category::ALL.iter().all(|c| c.prefix() != prefix) {
            return Err(DomainError::invalid_id(format!(
                "unknown item id prefix: '{s}'"
            )));
        }
        if digits.len() < 3 || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DomainError::invalid_id(format!(
                "item id must end in a zero-padded sequence: '{s}'"
            )));
        }

        Ok(Self(s.to_string()))
    }

    /// Category encoded in the prefix.
    pub fn category(&self) -> Option<Category> {
        Category::ALL
            .into_iter()
            .find(|c| self.0.starts_with(c.prefix()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for ItemId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ItemId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// InventoryItem
// ─────────────────────────────────────────────────────────────────────────────

/// A stock-keeping record.
///
/// # Invariants
/// - `stock` is non-negative by construction; decrements clamp at zero.
/// - `classification` (and therefore the id prefix) and `location` are
///   immutable after creation.
/// - `updated_at` is refreshed on every mutation; `created_at` never changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: ItemId,
    pub name: String,
    pub classification: Classification,
    pub price: f64,
    pub stock: u32,
    pub status: ItemStatus,
    pub note: String,
    pub location: Location,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl InventoryItem {
    pub fn category(&self) -> Category {
        self.classification.category()
    }

    /// Monetary value on hand (price × stock). Pricing-bearing: render only
    /// for roles that may view pricing.
    pub fn value(&self) -> f64 {
        self.price * f64::from(self.stock)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ItemDraft
// ─────────────────────────────────────────────────────────────────────────────

/// A record as submitted for creation: lacking `id` and timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDraft {
    pub name: String,
    pub classification: Classification,
    pub price: f64,
    pub stock: u32,
    pub status: ItemStatus,
    pub note: String,
    pub location: Location,
}

impl ItemDraft {
    /// Validate the draft before any backend call is attempted.
    ///
    /// Enum fields and the category/type coupling are already valid by
    /// construction; what remains is the name and the price.
    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("item name cannot be empty"));
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(DomainError::validation("price must be a non-negative number"));
        }
        Ok(())
    }

    /// Materialize the draft into a full record with an assigned id.
    pub fn materialize(self, id: ItemId, now: DateTime<Utc>) -> InventoryItem {
        InventoryItem {
            id,
            name: self.name.trim().to_string(),
            classification: self.classification,
            price: self.price,
            stock: self.stock,
            status: self.status,
            note: self.note,
            location: self.location,
            created_at: now,
            updated_at: now,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(classification: Classification) -> ItemDraft {
        ItemDraft {
            name: "HDPE Pellets".to_string(),
            classification,
            price: 1.25,
            stock: 5000,
            status: ItemStatus::InStock,
            note: String::new(),
            location: Location::LocationOne,
        }
    }

    #[test]
    fn classification_requires_type_for_materials() {
        let err = Classification::new(Category::Material, None).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let ok = Classification::new(Category::Material, Some(MaterialType::Virgin)).unwrap();
        assert_eq!(ok.category(), Category::Material);
        assert_eq!(ok.material_type(), Some(MaterialType::Virgin));
    }

    #[test]
    fn classification_rejects_type_on_non_materials() {
        for category in [Category::Product, Category::Asset] {
            let err = Classification::new(category, Some(MaterialType::Recycled)).unwrap_err();
            assert!(matches!(err, DomainError::Validation(_)));
        }
    }

    #[test]
    fn non_material_classification_has_no_type() {
        assert_eq!(Classification::Product.material_type(), None);
        assert_eq!(Classification::Asset.material_type(), None);
    }

    #[test]
    fn id_derivation_counts_from_one() {
        assert_eq!(ItemId::derive(Category::Material, 0).as_str(), "MAT001");
        assert_eq!(ItemId::derive(Category::Material, 1).as_str(), "MAT002");
        assert_eq!(ItemId::derive(Category::Product, 0).as_str(), "PRO001");
        assert_eq!(ItemId::derive(Category::Asset, 11).as_str(), "ASS012");
    }

    #[test]
    fn id_padding_is_a_minimum_width() {
        assert_eq!(ItemId::derive(Category::Material, 999).as_str(), "MAT1000");
    }

    #[test]
    fn id_parse_round_trip() {
        let id = ItemId::parse("MAT042").unwrap();
        assert_eq!(id.category(), Some(Category::Material));
        assert_eq!(id.to_string(), "MAT042");
    }

    #[test]
    fn id_parse_rejects_garbage() {
        assert!(ItemId::parse("").is_err());
        assert!(ItemId::parse("MA").is_err());
        assert!(ItemId::parse("XYZ001").is_err());
        assert!(ItemId::parse("MAT01").is_err());
        assert!(ItemId::parse("MAT0x1").is_err());
    }

    #[test]
    fn draft_rejects_blank_name() {
        let mut d = draft(Classification::Product);
        d.name = "   ".to_string();
        assert!(d.validate().is_err());
    }

    #[test]
    fn draft_rejects_negative_or_non_finite_price() {
        let mut d = draft(Classification::Product);
        d.price = -0.01;
        assert!(d.validate().is_err());
        d.price = f64::NAN;
        assert!(d.validate().is_err());
        d.price = 0.0;
        assert!(d.validate().is_ok());
    }

    #[test]
    fn materialize_sets_both_timestamps() {
        let now = Utc::now();
        let item = draft(Classification::Material(MaterialType::Master))
            .materialize(ItemId::derive(Category::Material, 2), now);
        assert_eq!(item.id.as_str(), "MAT003");
        assert_eq!(item.created_at, now);
        assert_eq!(item.updated_at, now);
        assert_eq!(item.category(), Category::Material);
    }

    #[test]
    fn wire_strings_round_trip() {
        for (status, wire) in [
            (ItemStatus::InStock, "\"in stock\""),
            (ItemStatus::RepurchaseNeeded, "\"repurchase needed\""),
            (ItemStatus::TemporarilyUnavailable, "\"temporarily unavailable\""),
        ] {
            assert_eq!(serde_json::to_string(&status).unwrap(), wire);
            assert_eq!(status.as_str().parse::<ItemStatus>().unwrap(), status);
        }

        assert_eq!(
            serde_json::to_string(&MaterialType::SpecialAdded).unwrap(),
            "\"special added\""
        );
        assert_eq!(
            "special added".parse::<MaterialType>().unwrap(),
            MaterialType::SpecialAdded
        );
        assert_eq!(serde_json::to_string(&Location::LocationOne).unwrap(), "\"location-1\"");
        assert_eq!("location-2".parse::<Location>().unwrap(), Location::LocationTwo);
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        fn any_category() -> impl Strategy<Value = Category> {
            prop_oneof![
                Just(Category::Material),
                Just(Category::Product),
                Just(Category::Asset),
            ]
        }

        proptest! {
            /// Property: the id prefix always equals the first three letters of
            /// the category name, uppercased.
            #[test]
            fn id_prefix_matches_category_name(category in any_category(), count in 0u64..10_000) {
                let id = ItemId::derive(category, count);
                let expected: String = category
                    .as_str()
                    .chars()
                    .take(3)
                    .map(|c| c.to_ascii_uppercase())
                    .collect();
                prop_assert!(id.as_str().starts_with(&expected));
                prop_assert_eq!(id.category(), Some(category));
            }

            /// Property: derived ids are strictly increasing in their sequence
            /// suffix for a fixed category.
            #[test]
            fn id_sequence_is_strictly_increasing(category in any_category(), count in 0u64..9_998) {
                let a = ItemId::derive(category, count);
                let b = ItemId::derive(category, count + 1);
                prop_assert_ne!(a.as_str(), b.as_str());
                let seq = |id: &ItemId| id.as_str()[3..].parse::<u64>().unwrap();
                prop_assert_eq!(seq(&a) + 1, seq(&b));
            }

            /// Property: every derived id parses back.
            #[test]
            fn derived_ids_parse(category in any_category(), count in 0u64..100_000) {
                let id = ItemId::derive(category, count);
                prop_assert!(ItemId::parse(id.as_str()).is_ok());
            }
        }
    }
}

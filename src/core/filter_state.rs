use crate::domain::model::{BoundingBox, CoordField, Product, COORDINATE_PRECISION};
use crate::utils::error::Result;
use crate::utils::validation::parse_coordinate;
use std::collections::BTreeMap;

/// Current area-of-interest text fields and product selection.
///
/// Coordinates stay as the raw text the user typed until a query is built, so
/// partial input such as `"-"` or `""` is held without error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterStateStore {
    top: String,
    bottom: String,
    left: String,
    right: String,
    products: BTreeMap<Product, bool>,
}

impl FilterStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_field(&mut self, field: CoordField, value: impl Into<String>) {
        *self.field_mut(field) = value.into();
    }

    /// Like [`set_field`](Self::set_field) but addressed by the form input name.
    pub fn set_field_name(&mut self, name: &str, value: impl Into<String>) -> Result<()> {
        let field: CoordField = name.parse()?;
        self.set_field(field, value);
        Ok(())
    }

    pub fn field(&self, field: CoordField) -> &str {
        match field {
            CoordField::Top => &self.top,
            CoordField::Bottom => &self.bottom,
            CoordField::Left => &self.left,
            CoordField::Right => &self.right,
        }
    }

    fn field_mut(&mut self, field: CoordField) -> &mut String {
        match field {
            CoordField::Top => &mut self.top,
            CoordField::Bottom => &mut self.bottom,
            CoordField::Left => &mut self.left,
            CoordField::Right => &mut self.right,
        }
    }

    pub fn set_product(&mut self, product: Product, selected: bool) {
        self.products.insert(product, selected);
    }

    /// Toggles a product by its identifier. Unknown identifiers are rejected
    /// and leave the selection unchanged.
    pub fn set_product_id(&mut self, id: &str, selected: bool) -> Result<()> {
        match id.parse::<Product>() {
            Ok(product) => {
                self.set_product(product, selected);
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Ignoring selection of unknown product '{}'", id);
                Err(e)
            }
        }
    }

    pub fn is_selected(&self, product: Product) -> bool {
        self.products.get(&product).copied().unwrap_or(false)
    }

    /// Selected products in declaration order.
    pub fn selected_products(&self) -> impl Iterator<Item = Product> + '_ {
        self.products
            .iter()
            .filter(|(_, selected)| **selected)
            .map(|(product, _)| *product)
    }

    /// Overwrites all four fields at once with fixed-precision text.
    pub fn apply_bounding_box(&mut self, bbox: &BoundingBox) {
        self.top = format_coordinate(bbox.top);
        self.bottom = format_coordinate(bbox.bottom);
        self.left = format_coordinate(bbox.left);
        self.right = format_coordinate(bbox.right);
        tracing::debug!(
            "AOI set from drawing: top={} bottom={} left={} right={}",
            self.top,
            self.bottom,
            self.left,
            self.right
        );
    }

    /// The fields parsed as numbers, or `None` if any is empty or not numeric.
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        Some(BoundingBox {
            top: parse_coordinate(&self.top)?.1,
            bottom: parse_coordinate(&self.bottom)?.1,
            left: parse_coordinate(&self.left)?.1,
            right: parse_coordinate(&self.right)?.1,
        })
    }
}

pub fn format_coordinate(value: f64) -> String {
    format!("{:.*}", COORDINATE_PRECISION, value)
}

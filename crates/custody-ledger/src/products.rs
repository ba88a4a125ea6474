//! # Product Registry
//!
//! Owns the id space and the record for every tracked good. Ids are
//! allocated sequentially from 1 and never reused; records are never
//! deleted. Products are stored in allocation order, so the position of a
//! record is its id minus one and the next id is always `len + 1`.

use serde::{Deserialize, Serialize};

use custody_core::{CustodyError, Identity, ProductId};
use custody_state::Product;

use crate::error::SnapshotError;

/// Every product the ledger has ever created.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Product>", into = "Vec<Product>")]
pub struct ProductRegistry {
    products: Vec<Product>,
}

impl ProductRegistry {
    /// An empty registry. The first product created gets id 1.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a product.
    ///
    /// # Errors
    ///
    /// [`CustodyError::NotFound`] if `id` was never allocated.
    pub fn get(&self, id: ProductId) -> Result<&Product, CustodyError> {
        id.index()
            .and_then(|index| self.products.get(index))
            .ok_or(CustodyError::NotFound { product_id: id })
    }

    /// The id the next [`create`](Self::create) will allocate.
    pub fn next_id(&self) -> ProductId {
        ProductId::from_index(self.products.len())
    }

    /// Number of products ever created.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Products in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.products.iter()
    }

    /// Allocate the next id and store a new product owned by `creator`.
    ///
    /// Role membership is checked by the caller before this runs; once here,
    /// creation cannot fail.
    pub(crate) fn create(&mut self, details: impl Into<String>, creator: Identity) -> ProductId {
        let id = self.next_id();
        self.products.push(Product::originate(id, details, creator));
        id
    }

    pub(crate) fn get_mut(&mut self, id: ProductId) -> Result<&mut Product, CustodyError> {
        id.index()
            .and_then(|index| self.products.get_mut(index))
            .ok_or(CustodyError::NotFound { product_id: id })
    }
}

impl TryFrom<Vec<Product>> for ProductRegistry {
    type Error = SnapshotError;

    fn try_from(products: Vec<Product>) -> Result<Self, Self::Error> {
        for (position, product) in products.iter().enumerate() {
            let expected = ProductId::from_index(position);
            if product.id() != expected {
                return Err(SnapshotError::NonSequentialId {
                    position,
                    found: product.id(),
                    expected,
                });
            }
        }
        Ok(Self { products })
    }
}

impl From<ProductRegistry> for Vec<Product> {
    fn from(registry: ProductRegistry) -> Self {
        registry.products
    }
}

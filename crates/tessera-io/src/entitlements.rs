//! Premium entitlement.
//!
//! A user is premium when any purchase is on record. Billing itself is
//! out of process; whatever completes a purchase records its product id
//! here.

use std::sync::Arc;

use crate::error::StoreError;
use crate::storage::{Storage, read_json, write_json};

/// Source of the premium flag.
pub trait Entitlements: Send + Sync {
    /// Whether premium content is unlocked.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the entitlement cannot be determined.
    fn is_premium(&self) -> Result<bool, StoreError>;
}

/// Premium status with failures treated as "not premium".
#[must_use]
pub fn premium_status(entitlements: &dyn Entitlements) -> bool {
    entitlements.is_premium().unwrap_or_else(|e| {
        log::warn!("entitlement query failed, treating as not premium: {e}");
        false
    })
}

const KEY: &str = "purchases";

/// [`Entitlements`] derived from a persisted list of purchased products.
#[derive(Clone)]
pub struct PurchaseLedger {
    storage: Arc<dyn Storage>,
}

impl PurchaseLedger {
    /// Persist through `storage`.
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Purchased product ids, in purchase order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend fails.
    pub fn purchases(&self) -> Result<Vec<String>, StoreError> {
        Ok(read_json(self.storage.as_ref(), KEY)?.unwrap_or_default())
    }

    /// Record a completed purchase. Recording the same product twice is
    /// a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend fails.
    pub fn record_purchase(&self, product_id: &str) -> Result<(), StoreError> {
        let mut purchases = self.purchases()?;
        if purchases.iter().any(|p| p == product_id) {
            return Ok(());
        }
        purchases.push(product_id.to_owned());
        log::info!("recorded purchase {product_id:?}");
        write_json(self.storage.as_ref(), KEY, &purchases)
    }
}

impl Entitlements for PurchaseLedger {
    fn is_premium(&self) -> Result<bool, StoreError> {
        Ok(!self.purchases()?.is_empty())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    struct Broken;

    impl Entitlements for Broken {
        fn is_premium(&self) -> Result<bool, StoreError> {
            Err(StoreError::NotFound("billing service".into()))
        }
    }

    #[test]
    fn premium_iff_any_purchase() {
        let ledger = PurchaseLedger::new(Arc::new(MemoryStorage::new()));
        assert!(!ledger.is_premium().unwrap());
        ledger.record_purchase("premium_monthly").unwrap();
        ledger.record_purchase("premium_monthly").unwrap();
        assert!(ledger.is_premium().unwrap());
        assert_eq!(ledger.purchases().unwrap().len(), 1);
    }

    #[test]
    fn failure_means_not_premium() {
        assert!(!premium_status(&Broken));
    }

    #[test]
    fn corrupt_ledger_means_not_premium() {
        let storage = Arc::new(MemoryStorage::new());
        storage.write(KEY, b"oops").unwrap();
        let ledger = PurchaseLedger::new(storage);
        assert!(ledger.is_premium().is_err());
        assert!(!premium_status(&ledger));
    }
}

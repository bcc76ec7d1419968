use std::collections::BTreeMap;
use std::sync::RwLock;

use forgeprice_core::{ItemId, PricingResult};
use forgeprice_pricing::item::PricingItem;
use forgeprice_pricing::store::{ItemStore, WriteCheck};

use super::poisoned;

/// Items keyed by id; writes are serialized like [`super::InMemoryRuleStore`].
#[derive(Debug, Default)]
pub struct InMemoryItemStore {
    items: RwLock<BTreeMap<ItemId, PricingItem>>,
}

impl InMemoryItemStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ItemStore for InMemoryItemStore {
    fn items(&self) -> PricingResult<Vec<PricingItem>> {
        let items = self.items.read().map_err(|_| poisoned("item"))?;
        Ok(items.values().cloned().collect())
    }

    fn get(&self, id: ItemId) -> PricingResult<Option<PricingItem>> {
        let items = self.items.read().map_err(|_| poisoned("item"))?;
        Ok(items.get(&id).cloned())
    }

    fn save_checked(
        &self,
        item: PricingItem,
        check: WriteCheck<'_, PricingItem>,
    ) -> PricingResult<PricingItem> {
        let mut items = self.items.write().map_err(|_| poisoned("item"))?;
        let all: Vec<PricingItem> = items.values().cloned().collect();
        check(&item, all.as_slice())?;
        items.insert(item.id, item.clone());
        Ok(item)
    }
}

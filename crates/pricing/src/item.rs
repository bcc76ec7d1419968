//! Priced items: the things pricing rules belong to.

use serde::{Deserialize, Serialize};

use forgeprice_core::{Entity, ItemId, PricingError, PricingResult};

pub const DUPLICATE_NAME_MESSAGE: &str = "Item Name must be unique.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingItem {
    pub id: ItemId,
    pub item_name: String,
    pub active: bool,
}

impl PricingItem {
    pub fn new(item_name: impl Into<String>) -> Self {
        Self {
            id: ItemId::new(),
            item_name: item_name.into(),
            active: true,
        }
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }
}

impl Entity for PricingItem {
    type Id = ItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Active items need a name no other item uses. Inactive items are unchecked.
pub fn validate_item(candidate: &PricingItem, existing: &[PricingItem]) -> PricingResult<()> {
    if candidate.item_name.trim().is_empty() {
        return Err(PricingError::validation("Item Name cannot be empty."));
    }
    if !candidate.active {
        return Ok(());
    }

    let taken = existing
        .iter()
        .any(|other| !other.is_same_record(candidate) && other.item_name == candidate.item_name);
    if taken {
        return Err(PricingError::conflict(DUPLICATE_NAME_MESSAGE));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_active_name_is_rejected() {
        let existing = vec![PricingItem::new("Banner")];
        let err = validate_item(&PricingItem::new("Banner"), &existing).unwrap_err();
        assert_eq!(err, PricingError::conflict(DUPLICATE_NAME_MESSAGE));
    }

    #[test]
    fn inactive_items_skip_the_uniqueness_check() {
        let existing = vec![PricingItem::new("Banner")];
        assert!(validate_item(&PricingItem::new("Banner").inactive(), &existing).is_ok());
    }

    #[test]
    fn renaming_an_item_to_its_own_name_is_fine() {
        let item = PricingItem::new("Banner");
        assert!(validate_item(&item, &[item.clone()]).is_ok());
    }

    #[test]
    fn blank_name_is_rejected() {
        assert!(matches!(
            validate_item(&PricingItem::new("  "), &[]),
            Err(PricingError::Validation(_))
        ));
    }
}

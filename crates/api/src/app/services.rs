use std::sync::Arc;

use stockroom_infra::Stores;
use stockroom_invoicing::InvoiceService;
use stockroom_items::ItemService;
use stockroom_persons::PersonService;

/// Services shared by every handler.
#[derive(Clone)]
pub struct AppServices {
    pub persons: PersonService,
    pub items: ItemService,
    pub invoices: InvoiceService,
    pub stores: Stores,
}

impl AppServices {
    pub fn from_stores(stores: Stores) -> Self {
        Self {
            persons: PersonService::new(Arc::clone(&stores.persons)),
            items: ItemService::new(Arc::clone(&stores.items)),
            invoices: InvoiceService::new(Arc::clone(&stores.invoices)),
            stores,
        }
    }
}

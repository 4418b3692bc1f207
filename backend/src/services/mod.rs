//! Business logic services for the Hotel Stock Management Platform

pub mod auth;
pub mod fulfillment;
pub mod inventory;
pub mod ledger;
pub mod purchase;
pub mod reconciliation;
pub mod request;

pub use auth::AuthService;
pub use fulfillment::FulfillmentService;
pub use inventory::InventoryService;
pub use ledger::LedgerService;
pub use purchase::PurchaseService;
pub use reconciliation::ReconciliationService;
pub use request::RequestService;

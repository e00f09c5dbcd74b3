//! Business logic services for the Flour Mill Management Platform

pub mod auth;
pub mod employee;
pub mod inventory;
pub mod party;
pub mod product;
pub mod production;
pub mod purchase;
pub mod reporting;
pub mod sale;
pub mod warehouse;

pub use auth::AuthService;
pub use employee::EmployeeService;
pub use inventory::InventoryService;
pub use party::PartyService;
pub use product::ProductService;
pub use production::ProductionService;
pub use purchase::PurchaseService;
pub use reporting::ReportingService;
pub use sale::SaleService;
pub use warehouse::WarehouseService;

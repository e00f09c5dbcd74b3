//! HTTP handlers for the Flour Mill Management Platform

pub mod auth;
pub mod employee;
pub mod health;
pub mod inventory;
pub mod party;
pub mod product;
pub mod production;
pub mod purchase;
pub mod reporting;
pub mod sale;
pub mod warehouse;

pub use auth::{login, refresh, register};
pub use employee::{
    create_employee, daily_sheet, get_employee, list_employees, mark_attendance, monthly_summary,
    update_employee,
};
pub use health::health_check;
pub use inventory::{
    audit_consistency, get_item, get_item_movements, get_or_create_item, list_items,
    list_recent_movements, recalculate_all, record_movement,
};
pub use party::{
    create_party, delete_party, get_party, get_party_balance, list_parties, update_party,
};
pub use product::{create_product, delete_product, get_product, list_products, update_product};
pub use production::{create_batch, get_batch, list_batches};
pub use purchase::{create_purchase, get_purchase, list_purchases, record_payment};
pub use reporting::{
    get_dashboard, get_movement_report, get_purchase_summary, get_sales_summary, get_stock_report,
};
pub use sale::{create_sale, get_sale, list_sales, record_receipt};
pub use warehouse::{
    create_warehouse, delete_warehouse, get_warehouse, list_warehouses, update_warehouse,
};

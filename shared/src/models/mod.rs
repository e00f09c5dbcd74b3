//! Domain models for the Flour Mill Management Platform

mod employee;
mod inventory;
mod mill;
mod party;
mod product;
mod production;
mod purchase;
mod user;

pub use employee::*;
pub use inventory::*;
pub use mill::*;
pub use party::*;
pub use product::*;
pub use production::*;
pub use purchase::*;
pub use user::*;

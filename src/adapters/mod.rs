// Adapters layer: concrete implementations of the domain ports for hosts without a map UI.

pub mod catalog;
pub mod drawing;

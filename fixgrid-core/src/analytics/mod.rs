//! Read-only analytics over reconciled data.
/// Basket-share weights.
pub mod basket;
/// Pearson correlation matrices.
pub mod correlation;
/// Large moves over a fixed horizon.
pub mod excursion;
/// Rolling forward-window analytics.
pub mod window;

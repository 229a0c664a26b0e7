//! Flutter-facing bindings over `trackit_core`.

pub mod api;

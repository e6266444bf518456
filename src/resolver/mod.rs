//! Resolution of addresses into cached map items and political places.

mod map_item;
mod political_place;

pub use map_item::MapItemResolver;
pub use political_place::PoliticalPlaceResolver;

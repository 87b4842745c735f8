// Adapters layer: concrete implementations of the domain ports.

pub mod shippo;

pub use shippo::ShippoClient;

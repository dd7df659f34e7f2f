pub mod driver;
pub mod plot;
pub mod profile;
pub mod registry;
pub mod stats;
pub mod walk;

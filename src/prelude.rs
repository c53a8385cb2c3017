pub use crate::galaxy::{ActiveGalaxy, GalaxyConfig, GalaxyConfigUi, GalaxyParameters};

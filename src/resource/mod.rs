pub mod io;
pub mod locator;
pub mod symbols;

pub use locator::{LOCALES_DIR_NAME, ResourceLocator};
pub use symbols::ResourceIndex;

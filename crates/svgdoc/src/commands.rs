//! Various commands that can be executed by svgdoc
mod export;
mod find;
mod format;

pub use export::Export;
pub use find::Find;
pub use format::Format;

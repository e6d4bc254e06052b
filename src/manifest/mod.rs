/// Manifest rendering and persistence
pub mod template;
pub mod writer;

pub use template::{render, RenderedManifest};
pub use writer::{FileNaming, ManifestWriter};

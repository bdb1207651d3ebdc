// Layout: markdown blocks → positioned text and rectangles → PDF bytes.
// Implements: font metrics, page/column cursors, cover page, TOC, references, footers.
// Rendering is CPU-bound and must run inside tokio::task::spawn_blocking.

pub mod canvas;
pub mod cursor;
pub mod engine;
pub mod font_metrics;
pub mod inline;
pub mod pdf;
pub mod surface;
pub mod toc;

// Re-export the public API consumed by other modules (export, handlers).
pub use canvas::Canvas;
pub use engine::render_academic_document;
pub use pdf::write_pdf;
pub use surface::SurfaceError;

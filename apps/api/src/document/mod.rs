pub mod blocks;
pub mod headings;
pub mod metadata;

pub use blocks::{parse_markdown_to_blocks, Block};

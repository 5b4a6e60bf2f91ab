// Rendering: structured text, images, and the catalog page

pub mod blocks;
pub mod image;
pub mod page;

pub use page::render_works_page;

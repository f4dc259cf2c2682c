//! Source adapters for the public book catalogs

pub mod google_books;
pub mod gutendex;
pub mod traits;

pub use google_books::GoogleBooksSource;
pub use gutendex::GutendexSource;
pub use traits::{PageScheme, SearchPage, SourceError, SourceMetadata};

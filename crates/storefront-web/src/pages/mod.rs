//! Page Components

mod download;
mod product;
mod success;

pub use download::ProtectedDownloadPage;
pub use product::ProductPage;
pub use success::SuccessPage;

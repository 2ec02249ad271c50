// Storage operation traits and implementations
pub mod copy;
pub mod delete;
pub mod list;
pub mod mkdir;
pub mod mv;
pub mod presign;
pub mod stat;
pub mod upload;

pub use copy::Copier;
pub use delete::Deleter;
pub use list::Lister;
pub use mkdir::Mkdirer;
pub use mv::Mover;
pub use presign::Presigner;
pub use stat::Stater;
pub use upload::Uploader;

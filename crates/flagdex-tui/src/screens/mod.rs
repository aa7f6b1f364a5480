pub mod directory;

pub use directory::DirectoryScreen;

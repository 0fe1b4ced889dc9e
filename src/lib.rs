pub mod anims;
pub mod arcade;
pub mod assets;
pub mod compute;
pub mod config;
pub mod engine;
pub mod entities;
pub mod host;
pub mod input;
pub mod scene;

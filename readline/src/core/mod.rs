/// L3 Core: implementations behind the API layer.
pub mod buffer;
pub mod completion;
pub mod config;
pub mod editor;
pub mod history;
pub mod pairing;
pub mod validity;

mod client;
mod jsonl;

pub use client::Storage;
pub use jsonl::{JsonlStorage, ShardMode};

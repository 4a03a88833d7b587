use crate::{chunking::ChunkRecord, prelude::*};

pub trait Storage {
    /// Append the records of one file, keeping their order
    async fn store_chunks(&mut self, group: Option<&str>, chunks: &[ChunkRecord]) -> Result<()>;

    /// Flush everything written so far
    async fn finish(&mut self) -> Result<()>;
}

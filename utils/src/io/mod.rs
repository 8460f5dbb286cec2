mod vec_read;
pub use vec_read::VecRead;

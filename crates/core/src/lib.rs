pub mod acquisition;
pub mod decoding;
pub mod inference;
pub mod pipeline;
pub mod preprocessing;
pub mod rendering;
pub mod shared;

#[cfg(test)]
mod test_support;

pub mod error;
pub mod model;
pub mod seed_data;
#[cfg(test)]
pub(crate) mod test_util;

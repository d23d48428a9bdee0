pub mod geo;
#[cfg(test)]
pub mod test_helpers;
pub mod types;

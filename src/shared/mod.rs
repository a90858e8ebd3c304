pub mod constants;
pub mod format;
pub mod multipart;
pub mod types;

#[cfg(test)]
pub mod test_helpers;

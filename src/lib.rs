pub mod api;
pub mod auth;
pub mod dashboard;
pub mod storage;

#[cfg(test)]
pub mod test_utils;

pub mod health;
pub mod internal;
pub mod users;
pub mod webhooks;

#[cfg(test)]
pub(crate) mod test_support;

pub mod ports;
pub mod route_guard;
pub mod use_cases;

#[cfg(test)]
pub(crate) mod test_support;

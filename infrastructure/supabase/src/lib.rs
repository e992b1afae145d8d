pub mod cart;
pub mod client;
pub mod connectivity;

#[cfg(test)]
mod test_server;

pub mod health;
pub mod simulations;

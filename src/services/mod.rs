pub mod advanced_hedge;
pub mod hedge;
pub mod holdings;
pub mod news;
pub mod pl;
pub mod pricing;
pub mod risk;
pub mod sentiment;
pub mod snapshot;

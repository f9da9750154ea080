pub mod currencylayer;
pub mod util;

pub use currencylayer::CurrencyLayerProvider;

pub mod raiffeisen;

pub use raiffeisen::RaiffeisenProvider;

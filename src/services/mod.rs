//! Services module for checkout and payment outcome handling

pub mod checkout;
pub mod receipt;
pub mod reconciler;

pub use checkout::{CheckoutRedirect, CheckoutService};
pub use receipt::{ReceiptService, SdkScript};
pub use reconciler::{CallbackAck, PaymentReconciler, ReconcileOutcome, ReturnTarget};

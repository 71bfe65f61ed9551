pub mod inbox;
pub mod ledger;
pub mod notify;
pub mod scheduling;
